use std::fmt;

use thiserror::Error;

use crate::config::{EnvironmentProvider, SecretConfig, SystemEnvironment};

/// Error type for secret-related failures
#[derive(Debug, Error)]
pub enum SecretError {
    #[error("Required secret '{secret_name}' is missing")]
    Missing { secret_name: String },

    #[error("Secret '{secret_name}' must be at least {expected} characters, got {actual}")]
    InvalidLength {
        secret_name: String,
        expected: usize,
        actual: usize,
    },
}

/// Centralized manager for application secrets
pub struct SecretManager {
    jwt_secret: String,
    password_pepper: String,
}

impl SecretManager {
    /// Initialize the SecretManager from the process environment
    ///
    /// # Errors
    /// Returns `SecretError` if any required secret is missing or fails validation
    pub fn init() -> Result<Self, SecretError> {
        Self::init_from(&SystemEnvironment)
    }

    /// Initialize the SecretManager from an arbitrary environment provider
    pub fn init_from(env: &dyn EnvironmentProvider) -> Result<Self, SecretError> {
        let jwt_secret = SecretConfig::JWT_SECRET.load(env)?;
        let password_pepper = SecretConfig::PASSWORD_PEPPER.load(env)?;

        Ok(Self {
            jwt_secret,
            password_pepper,
        })
    }

    /// Build directly from values, used by tests and the CLI
    pub fn from_values(jwt_secret: impl Into<String>, password_pepper: impl Into<String>) -> Self {
        Self {
            jwt_secret: jwt_secret.into(),
            password_pepper: password_pepper.into(),
        }
    }

    pub fn jwt_secret(&self) -> &str {
        &self.jwt_secret
    }

    pub fn password_pepper(&self) -> &str {
        &self.password_pepper
    }
}

impl fmt::Debug for SecretManager {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SecretManager")
            .field("jwt_secret", &"<redacted>")
            .field("password_pepper", &"<redacted>")
            .finish()
    }
}
