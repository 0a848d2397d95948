use thiserror::Error;

#[derive(Error, Debug)]
pub enum NotificationError {
    #[error("Notification not found: {0}")]
    NotFound(i32),

    #[error("Validation failed: {0}")]
    Validation(String),
}
