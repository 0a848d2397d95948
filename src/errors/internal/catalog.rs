use thiserror::Error;

/// Errors for subjects, levels and lessons
#[derive(Error, Debug)]
pub enum CatalogError {
    #[error("Validation failed: {0}")]
    Validation(String),

    #[error("Code already in use: {0}")]
    DuplicateCode(String),
}
