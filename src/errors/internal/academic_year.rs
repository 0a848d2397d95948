use thiserror::Error;

#[derive(Error, Debug)]
pub enum AcademicYearError {
    #[error("Academic year name is required")]
    EmptyName,

    #[error("Invalid academic year name: {0} (expected YYYY-YYYY with consecutive years)")]
    InvalidName(String),

    #[error("Academic year already exists: {0}")]
    Duplicate(String),

    #[error("Academic year not found: {0}")]
    NotFound(String),

    #[error("No active academic year")]
    NoActiveYear,
}
