use crate::config::{EnvironmentProvider, SecretError};

/// Environment variable holding a secret and the shortest value accepted
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SecretConfig {
    pub env_var: &'static str,
    pub min_length: usize,
}

impl SecretConfig {
    /// HS256 signing key for session tokens
    pub const JWT_SECRET: SecretConfig = SecretConfig {
        env_var: "JWT_SECRET",
        min_length: 32,
    };

    /// Server-side secret mixed into every password hash
    pub const PASSWORD_PEPPER: SecretConfig = SecretConfig {
        env_var: "PASSWORD_PEPPER",
        min_length: 16,
    };

    /// Read the secret; it must be present and at least `min_length` long
    pub fn load(&self, env: &dyn EnvironmentProvider) -> Result<String, SecretError> {
        let value = env.get_var(self.env_var).ok_or_else(|| SecretError::Missing {
            secret_name: self.env_var.to_string(),
        })?;

        if value.len() < self.min_length {
            return Err(SecretError::InvalidLength {
                secret_name: self.env_var.to_string(),
                expected: self.min_length,
                actual: value.len(),
            });
        }

        Ok(value)
    }
}
