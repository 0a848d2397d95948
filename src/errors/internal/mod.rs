use thiserror::Error;

pub mod academic_year;
pub mod catalog;
pub mod credential;
pub mod database;
pub mod notification;

pub use academic_year::AcademicYearError;
pub use catalog::CatalogError;
pub use credential::CredentialError;
pub use database::DatabaseError;
pub use notification::NotificationError;

/// Internal error type for store and service operations
///
/// Hybrid design separates infrastructure errors (shared) from domain errors (store-specific).
/// Not exposed via API - endpoints must convert to AuthError or ApiError.
#[derive(Error, Debug)]
pub enum InternalError {
    #[error(transparent)]
    Database(#[from] DatabaseError),

    #[error("Parse error: failed to parse {value_type}: {message}")]
    Parse {
        value_type: String,
        message: String,
    },

    #[error("Crypto error: {operation} failed: {message}")]
    Crypto {
        operation: String,
        message: String,
    },

    #[error(transparent)]
    Credential(#[from] CredentialError),

    #[error(transparent)]
    AcademicYear(#[from] AcademicYearError),

    #[error(transparent)]
    Catalog(#[from] CatalogError),

    #[error(transparent)]
    Notification(#[from] NotificationError),
}

impl InternalError {
    pub fn database(operation: &str, source: sea_orm::DbErr) -> InternalError {
        InternalError::Database(DatabaseError::Operation {
            operation: operation.to_string(),
            source,
        })
    }

    pub fn transaction_begin(source: sea_orm::DbErr) -> InternalError {
        InternalError::Database(DatabaseError::TransactionBegin { source })
    }

    pub fn transaction_commit(source: sea_orm::DbErr) -> InternalError {
        InternalError::Database(DatabaseError::TransactionCommit { source })
    }

    pub fn parse(value_type: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Parse {
            value_type: value_type.into(),
            message: message.into(),
        }
    }

    pub fn crypto(operation: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Crypto {
            operation: operation.into(),
            message: message.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_database_error_display_includes_operation() {
        let err = InternalError::database("insert_subject", sea_orm::DbErr::Custom("boom".into()));
        let display = format!("{}", err);
        assert!(display.contains("insert_subject"));
        assert!(display.contains("boom"));
    }

    #[test]
    fn test_domain_errors_are_transparent() {
        let err: InternalError = AcademicYearError::Duplicate("2025-2026".to_string()).into();
        assert_eq!(format!("{}", err), "Academic year already exists: 2025-2026");

        let err: InternalError = CredentialError::InvalidCredentials.into();
        assert_eq!(format!("{}", err), "Invalid credentials");
    }

    #[test]
    fn test_parse_error_formatting() {
        let err = InternalError::parse("role", "unknown value");
        assert_eq!(format!("{}", err), "Parse error: failed to parse role: unknown value");
    }
}
