use thiserror::Error;

/// Errors surfaced by the dashboard client
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ClientError {
    /// Missing, invalid or expired token; the stored token has been cleared
    #[error("Authentication required: {0}")]
    Authentication(String),

    /// Rejected locally before any request was sent
    #[error("{0}")]
    Validation(String),

    /// Any other non-2xx response
    #[error("Server error ({status}): {message}")]
    Server { status: u16, message: String },

    /// The request never produced a response, or the response was unreadable
    #[error("Transport error: {0}")]
    Transport(String),
}

impl ClientError {
    pub fn validation(message: impl Into<String>) -> Self {
        ClientError::Validation(message.into())
    }

    pub fn is_authentication(&self) -> bool {
        matches!(self, ClientError::Authentication(_))
    }

    /// Text shown to the user in a toast or inline message
    ///
    /// Server errors are reduced to a generic message.
    pub fn user_message(&self) -> String {
        match self {
            ClientError::Authentication(_) => "Your session has expired, please sign in again".to_string(),
            ClientError::Validation(message) => message.clone(),
            ClientError::Server { .. } | ClientError::Transport(_) => {
                "Something went wrong, please try again".to_string()
            }
        }
    }
}

impl From<reqwest::Error> for ClientError {
    fn from(err: reqwest::Error) -> Self {
        ClientError::Transport(err.to_string())
    }
}

impl From<serde_json::Error> for ClientError {
    fn from(err: serde_json::Error) -> Self {
        ClientError::Transport(format!("invalid response body: {}", err))
    }
}
