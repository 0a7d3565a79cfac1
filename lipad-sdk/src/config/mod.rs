//! Client configuration.
//!
//! These types carry the credentials issued by Lipad and the environment
//! selector. Loading them (from a file, the process environment or a secret
//! store) is left to the host application; [`ClientConfig`] only derives
//! `Deserialize` so it can be embedded in the host's own config format.

mod environment;

pub use environment::{Endpoints, Environment};

use serde::Deserialize;
use std::fmt;

/// Errors raised while resolving a [`ClientConfig`].
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ConfigError {
    #[error("environment is required")]
    MissingEnvironment,

    #[error("invalid environment: {0}")]
    UnknownEnvironment(String),
}

/// Credentials and environment for a [`GatewayClient`](crate::client::GatewayClient).
#[derive(Clone, Deserialize)]
pub struct ClientConfig {
    /// Passphrase the checkout encryption IV is derived from.
    pub encryption_key: String,
    /// Consumer secret; also the passphrase of the checkout encryption key.
    pub shared_secret: String,
    /// `"production"` or `"sandbox"`.
    pub environment: String,
    /// Consumer key used by both token flows.
    pub consumer_key: String,
}

impl ClientConfig {
    pub fn new(
        encryption_key: impl Into<String>,
        shared_secret: impl Into<String>,
        environment: impl Into<String>,
        consumer_key: impl Into<String>,
    ) -> Self {
        Self {
            encryption_key: encryption_key.into(),
            shared_secret: shared_secret.into(),
            environment: environment.into(),
            consumer_key: consumer_key.into(),
        }
    }

    /// Resolve the configured environment name.
    pub fn environment(&self) -> Result<Environment, ConfigError> {
        self.environment.parse()
    }
}

impl fmt::Debug for ClientConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ClientConfig")
            .field("encryption_key", &"<redacted>")
            .field("shared_secret", &"<redacted>")
            .field("environment", &self.environment)
            .field("consumer_key", &"<redacted>")
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_parsing() {
        let toml_str = r#"
encryption_key = "iv-passphrase"
shared_secret = "consumer-secret"
environment = "sandbox"
consumer_key = "consumer-key"
"#;
        let config: ClientConfig = toml::from_str(toml_str).unwrap();
        assert_eq!(config.consumer_key, "consumer-key");
        assert_eq!(config.environment().unwrap(), Environment::Sandbox);
    }

    #[test]
    fn test_unknown_environment_is_reported() {
        let config = ClientConfig::new("iv", "secret", "staging", "key");
        assert_eq!(
            config.environment(),
            Err(ConfigError::UnknownEnvironment("staging".to_string()))
        );
    }

    #[test]
    fn test_debug_redacts_secrets() {
        let config = ClientConfig::new("iv-passphrase", "consumer-secret", "sandbox", "ck");
        let rendered = format!("{config:?}");
        assert!(rendered.contains("sandbox"));
        assert!(!rendered.contains("iv-passphrase"));
        assert!(!rendered.contains("consumer-secret"));
    }
}
