use crate::errors::internal::AcademicYearError;

/// Split a "YYYY-YYYY" label into its two four-digit components
fn split_label(label: &str) -> Option<(u32, u32)> {
    let (start, end) = label.split_once('-')?;
    if start.len() != 4 || end.len() != 4 {
        return None;
    }
    if !start.bytes().chain(end.bytes()).all(|b| b.is_ascii_digit()) {
        return None;
    }
    Some((start.parse().ok()?, end.parse().ok()?))
}

/// Label of the year following `current`, both components incremented by one
///
/// Returns `None` when `current` is not of the form "YYYY-YYYY" or the
/// increment would leave four digits.
pub fn next_year_label(current: &str) -> Option<String> {
    let (start, end) = split_label(current.trim())?;
    let (next_start, next_end) = (start + 1, end + 1);
    if next_start > 9999 || next_end > 9999 {
        return None;
    }
    Some(format!("{:04}-{:04}", next_start, next_end))
}

/// Check a year name submitted for creation
///
/// The name must be "YYYY-YYYY" with the second year directly following the first.
pub fn validate_year_name(name: &str) -> Result<(), AcademicYearError> {
    if name.trim().is_empty() {
        return Err(AcademicYearError::EmptyName);
    }

    match split_label(name) {
        Some((start, end)) if end == start + 1 => Ok(()),
        _ => Err(AcademicYearError::InvalidName(name.to_string())),
    }
}
