//! Gateway environments and their endpoint table.

use std::fmt;
use std::str::FromStr;

use super::ConfigError;

/// Gateway environment a client talks to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Environment {
    Production,
    Sandbox,
}

impl Environment {
    pub fn as_str(&self) -> &'static str {
        match self {
            Environment::Production => "production",
            Environment::Sandbox => "sandbox",
        }
    }

    /// Base URL of the checkout API (auth and checkout status).
    pub fn checkout_base_url(&self) -> &'static str {
        match self {
            Environment::Production => "https://api.lipad.io/api/v1",
            Environment::Sandbox => "https://uat.checkout-api.lipad.io/api/v1",
        }
    }

    /// Base URL of the direct charge API.
    pub fn direct_charge_base_url(&self) -> &'static str {
        match self {
            Environment::Production => "https://charge.lipad.io/v1",
            Environment::Sandbox => "https://dev.charge.lipad.io/v1",
        }
    }

    /// Token endpoint of the direct charge API.
    pub fn direct_auth_url(&self) -> &'static str {
        match self {
            Environment::Production => "https://api.lipad.io/v1/auth",
            Environment::Sandbox => "https://dev.lipad.io/v1/auth",
        }
    }
}

impl fmt::Display for Environment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Environment {
    type Err = ConfigError;

    /// Names are matched exactly; `"Production"` is not a known environment.
    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value {
            "" => Err(ConfigError::MissingEnvironment),
            "production" => Ok(Environment::Production),
            "sandbox" => Ok(Environment::Sandbox),
            other => Err(ConfigError::UnknownEnvironment(other.to_owned())),
        }
    }
}

/// Resolved base URLs for one client.
///
/// Built from an [`Environment`] at construction time, or supplied directly
/// to point the client at a proxy or a local test server.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Endpoints {
    /// Checkout API root, e.g. `https://api.lipad.io/api/v1`.
    pub checkout_base_url: String,
    /// Direct charge API root, e.g. `https://charge.lipad.io/v1`.
    pub direct_charge_base_url: String,
    /// Full URL of the direct charge token endpoint.
    pub direct_auth_url: String,
}

impl Endpoints {
    pub fn new(
        checkout_base_url: impl Into<String>,
        direct_charge_base_url: impl Into<String>,
        direct_auth_url: impl Into<String>,
    ) -> Self {
        Self {
            checkout_base_url: checkout_base_url.into(),
            direct_charge_base_url: direct_charge_base_url.into(),
            direct_auth_url: direct_auth_url.into(),
        }
    }
}

impl From<Environment> for Endpoints {
    fn from(environment: Environment) -> Self {
        Self::new(
            environment.checkout_base_url(),
            environment.direct_charge_base_url(),
            environment.direct_auth_url(),
        )
    }
}
