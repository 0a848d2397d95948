use crate::errors::api::auth::AuthError;
use crate::errors::internal::{
    AcademicYearError, CatalogError, CredentialError, InternalError, NotificationError,
};
use crate::types::dto::common::ErrorResponse;
use poem_openapi::{payload::Json, ApiResponse};
use std::fmt;

/// Error type for every non-auth endpoint
#[derive(ApiResponse, Debug)]
pub enum ApiError {
    /// Request body failed validation
    #[oai(status = 400)]
    BadRequest(Json<ErrorResponse>),

    /// Missing, invalid or expired bearer token
    #[oai(status = 401)]
    Unauthorized(Json<ErrorResponse>),

    /// Authenticated but the role is not allowed
    #[oai(status = 403)]
    Forbidden(Json<ErrorResponse>),

    #[oai(status = 404)]
    NotFound(Json<ErrorResponse>),

    /// Uniqueness violation
    #[oai(status = 409)]
    Conflict(Json<ErrorResponse>),

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

impl ApiError {
    pub fn bad_request(message: impl Into<String>) -> Self {
        ApiError::BadRequest(body("validation_error", message.into(), 400))
    }

    pub fn unauthorized(message: impl Into<String>) -> Self {
        ApiError::Unauthorized(body("unauthorized", message.into(), 401))
    }

    pub fn forbidden() -> Self {
        ApiError::Forbidden(body(
            "forbidden",
            "Your role does not allow this operation".to_string(),
            403,
        ))
    }

    pub fn not_found(message: impl Into<String>) -> Self {
        ApiError::NotFound(body("not_found", message.into(), 404))
    }

    pub fn conflict(message: impl Into<String>) -> Self {
        ApiError::Conflict(body("conflict", message.into(), 409))
    }

    pub fn internal_server_error() -> Self {
        ApiError::InternalError(body(
            "internal_error",
            "An internal error occurred".to_string(),
            500,
        ))
    }

    /// Convert InternalError to ApiError
    ///
    /// Internal error details are logged but not exposed to clients.
    pub fn from_internal_error(err: InternalError) -> Self {
        match &err {
            InternalError::AcademicYear(year_err) => match year_err {
                AcademicYearError::EmptyName | AcademicYearError::InvalidName(_) => {
                    tracing::debug!("Academic year validation failed: {}", year_err);
                    Self::bad_request(year_err.to_string())
                }
                AcademicYearError::Duplicate(_) => {
                    tracing::warn!("{}", year_err);
                    Self::conflict(year_err.to_string())
                }
                AcademicYearError::NotFound(_) | AcademicYearError::NoActiveYear => {
                    Self::not_found(year_err.to_string())
                }
            },
            InternalError::Catalog(CatalogError::Validation(message)) => {
                tracing::debug!("Catalog validation failed: {}", message);
                Self::bad_request(message.clone())
            }
            InternalError::Catalog(CatalogError::DuplicateCode(code)) => {
                tracing::warn!("Duplicate code: {}", code);
                Self::conflict(format!("Code already in use: {}", code))
            }
            InternalError::Notification(NotificationError::NotFound(id)) => {
                Self::not_found(format!("Notification not found: {}", id))
            }
            InternalError::Notification(NotificationError::Validation(message)) => {
                Self::bad_request(message.clone())
            }
            InternalError::Credential(
                CredentialError::InvalidToken(_)
                | CredentialError::ExpiredToken
                | CredentialError::SessionNotFound(_),
            ) => Self::unauthorized("Invalid or expired token"),
            _ => {
                tracing::error!("Unexpected error in API operation: {}", err);
                Self::internal_server_error()
            }
        }
    }

    pub fn message(&self) -> String {
        self.response().message.clone()
    }

    pub fn response(&self) -> &ErrorResponse {
        match self {
            ApiError::BadRequest(json)
            | ApiError::Unauthorized(json)
            | ApiError::Forbidden(json)
            | ApiError::NotFound(json)
            | ApiError::Conflict(json)
            | ApiError::InternalError(json) => &json.0,
        }
    }
}

impl From<InternalError> for ApiError {
    fn from(err: InternalError) -> Self {
        Self::from_internal_error(err)
    }
}

/// Authentication failures on resource endpoints all surface as 401
impl From<AuthError> for ApiError {
    fn from(err: AuthError) -> Self {
        match err {
            AuthError::InternalError(_) => Self::internal_server_error(),
            other => Self::unauthorized(other.message()),
        }
    }
}

impl fmt::Display for ApiError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.message())
    }
}
