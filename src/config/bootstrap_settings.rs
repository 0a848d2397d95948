use std::fmt;
use std::net::IpAddr;

use crate::config::errors::ConfigError;
use crate::config::{EnvironmentProvider, SystemEnvironment};

const DEFAULT_DATABASE_URL: &str = "sqlite://edutrack.db?mode=rwc";
const DEFAULT_HOST: &str = "0.0.0.0";
const DEFAULT_PORT: u16 = 3000;
const DEFAULT_SESSION_TTL_HOURS: i64 = 24;

/// Bootstrap settings for infrastructure configuration
pub struct BootstrapSettings {
    database_url: String,
    server_host: String,
    server_port: u16,
    session_ttl_hours: i64,
    seed_demo_accounts: bool,
}

impl BootstrapSettings {
    /// Load bootstrap settings from an environment provider, applying defaults
    pub fn from_env_provider(env: &dyn EnvironmentProvider) -> Result<Self, ConfigError> {
        let database_url = env
            .get_var("DATABASE_URL")
            .unwrap_or_else(|| DEFAULT_DATABASE_URL.to_string());
        if database_url.trim().is_empty() {
            return Err(ConfigError::invalid("DATABASE_URL", "must not be empty"));
        }

        let server_host = env
            .get_var("HOST")
            .unwrap_or_else(|| DEFAULT_HOST.to_string());
        Self::validate_host_address(&server_host)?;

        let server_port = match env.get_var("PORT") {
            Some(raw) => Self::parse_port(&raw)?,
            None => DEFAULT_PORT,
        };

        let session_ttl_hours = match env.get_var("SESSION_TTL_HOURS") {
            Some(raw) => {
                let hours: i64 = raw
                    .parse()
                    .map_err(|e| ConfigError::parse("SESSION_TTL_HOURS", format!("{}", e)))?;
                if hours <= 0 {
                    return Err(ConfigError::invalid("SESSION_TTL_HOURS", "must be positive"));
                }
                hours
            }
            None => DEFAULT_SESSION_TTL_HOURS,
        };

        let seed_demo_accounts = match env.get_var("SEED_DEMO_ACCOUNTS") {
            Some(raw) => Self::parse_bool("SEED_DEMO_ACCOUNTS", &raw)?,
            None => true,
        };

        Ok(Self {
            database_url,
            server_host,
            server_port,
            session_ttl_hours,
            seed_demo_accounts,
        })
    }

    /// Convenience method that uses the system environment provider
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_env_provider(&SystemEnvironment)
    }

    fn validate_host_address(value: &str) -> Result<(), ConfigError> {
        if value == "localhost" || value.parse::<IpAddr>().is_ok() {
            Ok(())
        } else {
            Err(ConfigError::invalid(
                "HOST",
                format!("'{}' is not an IP address or localhost", value),
            ))
        }
    }

    fn parse_port(value: &str) -> Result<u16, ConfigError> {
        let port: u16 = value
            .parse()
            .map_err(|e| ConfigError::parse("PORT", format!("{}", e)))?;
        if port == 0 {
            return Err(ConfigError::invalid("PORT", "must be between 1 and 65535"));
        }
        Ok(port)
    }

    fn parse_bool(setting_name: &str, value: &str) -> Result<bool, ConfigError> {
        match value.to_ascii_lowercase().as_str() {
            "true" | "1" | "yes" => Ok(true),
            "false" | "0" | "no" => Ok(false),
            other => Err(ConfigError::parse(
                setting_name,
                format!("expected a boolean, got '{}'", other),
            )),
        }
    }

    pub fn database_url(&self) -> &str {
        &self.database_url
    }

    pub fn server_host(&self) -> &str {
        &self.server_host
    }

    pub fn server_port(&self) -> u16 {
        self.server_port
    }

    pub fn server_address(&self) -> String {
        format!("{}:{}", self.server_host, self.server_port)
    }

    pub fn session_ttl_hours(&self) -> i64 {
        self.session_ttl_hours
    }

    pub fn seed_demo_accounts(&self) -> bool {
        self.seed_demo_accounts
    }
}

impl fmt::Debug for BootstrapSettings {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BootstrapSettings")
            .field("database_url", &self.database_url)
            .field("server_host", &self.server_host)
            .field("server_port", &self.server_port)
            .field("session_ttl_hours", &self.session_ttl_hours)
            .field("seed_demo_accounts", &self.seed_demo_accounts)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::MockEnvironment;

    #[test]
    fn test_bootstrap_settings_with_all_vars() {
        let env = MockEnvironment::empty().with_vars(&[
            ("DATABASE_URL", "sqlite://test.db"),
            ("HOST", "127.0.0.1"),
            ("PORT", "8080"),
            ("SESSION_TTL_HOURS", "2"),
            ("SEED_DEMO_ACCOUNTS", "false"),
        ]);

        let settings = BootstrapSettings::from_env_provider(&env).unwrap();

        assert_eq!(settings.database_url(), "sqlite://test.db");
        assert_eq!(settings.server_address(), "127.0.0.1:8080");
        assert_eq!(settings.session_ttl_hours(), 2);
        assert!(!settings.seed_demo_accounts());
    }

    #[test]
    fn test_bootstrap_settings_with_defaults() {
        let settings = BootstrapSettings::from_env_provider(&MockEnvironment::empty()).unwrap();

        assert_eq!(settings.database_url(), "sqlite://edutrack.db?mode=rwc");
        assert_eq!(settings.server_host(), "0.0.0.0");
        assert_eq!(settings.server_port(), 3000);
        assert_eq!(settings.session_ttl_hours(), 24);
        assert!(settings.seed_demo_accounts());
    }

    #[test]
    fn test_invalid_port_is_rejected() {
        let env = MockEnvironment::empty().with_var("PORT", "not-a-port");
        let result = BootstrapSettings::from_env_provider(&env);
        assert!(matches!(result, Err(ConfigError::ParseError { .. })));

        let env = MockEnvironment::empty().with_var("PORT", "0");
        let result = BootstrapSettings::from_env_provider(&env);
        assert!(matches!(result, Err(ConfigError::InvalidSetting { .. })));
    }

    #[test]
    fn test_invalid_host_is_rejected() {
        let env = MockEnvironment::empty().with_var("HOST", "not a host");
        assert!(BootstrapSettings::from_env_provider(&env).is_err());
    }

    #[test]
    fn test_non_positive_session_ttl_is_rejected() {
        let env = MockEnvironment::empty().with_var("SESSION_TTL_HOURS", "0");
        assert!(BootstrapSettings::from_env_provider(&env).is_err());
    }
}
