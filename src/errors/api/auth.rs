use crate::errors::internal::{CredentialError, InternalError};
use crate::types::dto::common::ErrorResponse;
use poem_openapi::{payload::Json, ApiResponse};
use std::fmt;

/// Authentication error types
#[derive(ApiResponse, Debug)]
pub enum AuthError {
    /// Invalid username or password
    #[oai(status = 401)]
    InvalidCredentials(Json<ErrorResponse>),

    /// Username already exists
    #[oai(status = 400)]
    DuplicateUsername(Json<ErrorResponse>),

    /// Required registration field missing or malformed
    #[oai(status = 400)]
    ValidationFailed(Json<ErrorResponse>),

    /// Invalid, malformed or revoked token
    #[oai(status = 401)]
    InvalidToken(Json<ErrorResponse>),

    /// Token has expired
    #[oai(status = 401)]
    ExpiredToken(Json<ErrorResponse>),

    /// Internal server error
    #[oai(status = 500)]
    InternalError(Json<ErrorResponse>),
}

fn body(error: &str, message: String, status_code: u16) -> Json<ErrorResponse> {
    Json(ErrorResponse {
        error: error.to_string(),
        message,
        status_code,
    })
}

impl AuthError {
    /// Create an InvalidCredentials error
    pub fn invalid_credentials() -> Self {
        AuthError::InvalidCredentials(body(
            "invalid_credentials",
            "Invalid username or password".to_string(),
            401,
        ))
    }

    /// Create a DuplicateUsername error
    pub fn duplicate_username() -> Self {
        AuthError::DuplicateUsername(body(
            "duplicate_username",
            "Username already exists".to_string(),
            400,
        ))
    }

    pub fn validation_failed(message: String) -> Self {
        AuthError::ValidationFailed(body("validation_error", message, 400))
    }

    /// Create an InvalidToken error
    pub fn invalid_token() -> Self {
        AuthError::InvalidToken(body(
            "invalid_token",
            "Invalid or revoked token".to_string(),
            401,
        ))
    }

    /// Create an ExpiredToken error
    pub fn expired_token() -> Self {
        AuthError::ExpiredToken(body("expired_token", "Token has expired".to_string(), 401))
    }

    /// Create a generic internal server error
    ///
    /// Always returns a generic message without exposing internal details.
    pub fn internal_server_error() -> Self {
        AuthError::InternalError(body(
            "internal_error",
            "An internal error occurred".to_string(),
            500,
        ))
    }

    /// Convert InternalError to AuthError
    ///
    /// This is the explicit conversion point from internal errors to API errors.
    /// Internal error details are logged but not exposed to clients.
    pub fn from_internal_error(err: InternalError) -> Self {
        match &err {
            InternalError::Credential(CredentialError::InvalidCredentials) => {
                tracing::debug!("Invalid credentials attempt");
                Self::invalid_credentials()
            }
            InternalError::Credential(CredentialError::DuplicateUsername(username)) => {
                tracing::warn!("Duplicate username attempt: {}", username);
                Self::duplicate_username()
            }
            InternalError::Credential(CredentialError::Validation(message)) => {
                tracing::debug!("Registration validation failed: {}", message);
                Self::validation_failed(message.clone())
            }
            InternalError::Credential(CredentialError::InvalidToken(reason)) => {
                tracing::debug!("Invalid token: {}", reason);
                Self::invalid_token()
            }
            InternalError::Credential(CredentialError::SessionNotFound(session_id)) => {
                tracing::debug!("Session not found or revoked: {}", session_id);
                Self::invalid_token()
            }
            InternalError::Credential(CredentialError::UserNotFound(user_id)) => {
                tracing::debug!("Token refers to a deleted user: {}", user_id);
                Self::invalid_token()
            }
            InternalError::Credential(CredentialError::ExpiredToken) => {
                tracing::debug!("Expired token");
                Self::expired_token()
            }
            _ => {
                tracing::error!("Unexpected error in auth operation: {}", err);
                Self::internal_server_error()
            }
        }
    }

    /// Get the error message from the error variant
    pub fn message(&self) -> String {
        self.response().message.clone()
    }

    pub fn response(&self) -> &ErrorResponse {
        match self {
            AuthError::InvalidCredentials(json)
            | AuthError::DuplicateUsername(json)
            | AuthError::ValidationFailed(json)
            | AuthError::InvalidToken(json)
            | AuthError::ExpiredToken(json)
            | AuthError::InternalError(json) => &json.0,
        }
    }
}

impl From<InternalError> for AuthError {
    fn from(err: InternalError) -> Self {
        Self::from_internal_error(err)
    }
}

impl fmt::Display for AuthError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.message())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_invalid_credentials_maps_to_401_body() {
        let err = AuthError::from_internal_error(CredentialError::InvalidCredentials.into());
        assert!(matches!(err, AuthError::InvalidCredentials(_)));
        assert_eq!(err.response().status_code, 401);
        assert_eq!(err.message(), "Invalid username or password");
    }

    #[test]
    fn test_revoked_session_reads_as_invalid_token() {
        let err = AuthError::from_internal_error(
            CredentialError::SessionNotFound("abc".to_string()).into(),
        );
        assert!(matches!(err, AuthError::InvalidToken(_)));
    }

    #[test]
    fn test_database_errors_do_not_leak_details() {
        let err = AuthError::from_internal_error(InternalError::database(
            "find_user",
            sea_orm::DbErr::Custom("secret table layout".into()),
        ));
        assert!(matches!(err, AuthError::InternalError(_)));
        assert_eq!(err.message(), "An internal error occurred");
    }
}
