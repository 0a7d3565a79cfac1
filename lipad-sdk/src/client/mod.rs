//! HTTP client for the Lipad checkout and direct charge APIs.
//!
//! Gated behind the `client` cargo feature so downstream crates that only
//! need payload validation and encryption do not pull in `reqwest`.

mod auth;
mod charge;
mod checkout;

pub use auth::AccessToken;
pub use charge::ACCESS_TOKEN_HEADER;

use reqwest::{Client, StatusCode};
use std::fmt;
use url::Url;

use crate::config::{ClientConfig, ConfigError, Endpoints};
use crate::encryption::{EncryptionError, PayloadCipher};
use crate::objects::{ChargePayloadError, InvalidPaymentMethod, PaymentMethodPolicy, ValidationError};

/// Errors produced by [`GatewayClient`].
#[derive(Debug, thiserror::Error)]
pub enum ClientError {
    /// The client was built with an empty or unknown environment.
    #[error("configuration error: {0}")]
    Configuration(#[from] ConfigError),

    /// A payload is missing a required key.
    #[error("validation error: {0}")]
    Validation(#[from] ValidationError),

    /// An auth endpoint answered 401.
    #[error("invalid credentials")]
    Credentials,

    /// An auth endpoint answered 201 without an `access_token`.
    #[error("access token not found in response")]
    MissingToken,

    /// The gateway returned a status code the operation does not expect.
    #[error("api error: status {status}, body: {body}")]
    Status { status: StatusCode, body: String },

    /// Transport-level failure (DNS, TLS, connection reset, …).
    #[error("transport error: {0}")]
    Transport(#[from] reqwest::Error),

    /// The checkout API does not know the merchant transaction id.
    #[error("merchant transaction id '{merchant_transaction_id}' not found")]
    NotFound { merchant_transaction_id: String },

    #[error(transparent)]
    InvalidPaymentMethod(#[from] InvalidPaymentMethod),

    #[error("encryption error: {0}")]
    Encryption(#[from] EncryptionError),

    /// Response body could not be deserialized.
    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),

    /// A base URL could not be joined with the endpoint path.
    #[error("invalid url: {0}")]
    Url(#[from] url::ParseError),
}

impl From<ChargePayloadError> for ClientError {
    fn from(err: ChargePayloadError) -> Self {
        match err {
            ChargePayloadError::Validation(e) => ClientError::Validation(e),
            ChargePayloadError::PaymentMethod(e) => ClientError::InvalidPaymentMethod(e),
        }
    }
}

/// Typed client for the Lipad gateway.
///
/// Holds the merchant credentials and the resolved endpoint table. Every
/// network operation fetches a fresh access token first; nothing is cached
/// between calls, so a single client can be cloned and shared freely.
#[derive(Clone)]
pub struct GatewayClient {
    http: Client,
    cipher: PayloadCipher,
    consumer_key: String,
    consumer_secret: String,
    endpoints: Result<Endpoints, ConfigError>,
    payment_method_policy: PaymentMethodPolicy,
}

impl GatewayClient {
    /// Create a client, rejecting an empty or unknown environment.
    pub fn new(config: ClientConfig) -> Result<Self, ClientError> {
        let environment = config.environment()?;
        Ok(Self::build(config, Ok(environment.into())))
    }

    /// Create a client even when the environment cannot be resolved.
    ///
    /// The configuration error is logged, validation and encryption keep
    /// working, and every network call fails with
    /// [`ClientError::Configuration`] without contacting any server.
    pub fn new_permissive(config: ClientConfig) -> Self {
        let endpoints = config.environment().map(Endpoints::from);
        if let Err(e) = &endpoints {
            tracing::error!(error = %e, "gateway client created without a usable environment");
        }
        Self::build(config, endpoints)
    }

    fn build(config: ClientConfig, endpoints: Result<Endpoints, ConfigError>) -> Self {
        let cipher = PayloadCipher::new(&config.encryption_key, &config.shared_secret);
        Self {
            http: Client::new(),
            cipher,
            consumer_key: config.consumer_key,
            consumer_secret: config.shared_secret,
            endpoints,
            payment_method_policy: PaymentMethodPolicy::default(),
        }
    }

    /// Replace the default `reqwest::Client` with a custom one (e.g. to
    /// configure timeouts or a proxy).
    pub fn with_http_client(mut self, client: Client) -> Self {
        self.http = client;
        self
    }

    /// Talk to `endpoints` instead of the environment's table.
    pub fn with_endpoints(mut self, endpoints: Endpoints) -> Self {
        self.endpoints = Ok(endpoints);
        self
    }

    /// Reject payment method codes other than `MPESA_KEN` and `AIRTEL_KEN`
    /// instead of charging them over Airtel.
    pub fn with_strict_payment_methods(mut self, strict: bool) -> Self {
        self.payment_method_policy = if strict {
            PaymentMethodPolicy::Strict
        } else {
            PaymentMethodPolicy::Lenient
        };
        self
    }

    /// Cipher derived from this client's encryption key and shared secret.
    pub fn cipher(&self) -> &PayloadCipher {
        &self.cipher
    }

    fn endpoints(&self) -> Result<&Endpoints, ClientError> {
        self.endpoints
            .as_ref()
            .map_err(|e| ClientError::Configuration(e.clone()))
    }
}

impl fmt::Debug for GatewayClient {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("GatewayClient")
            .field("endpoints", &self.endpoints)
            .field("payment_method_policy", &self.payment_method_policy)
            .finish_non_exhaustive()
    }
}

/// Append `path` to a base URL kept as text, so the base path survives.
fn endpoint_url(base: &str, path: &str) -> Result<Url, url::ParseError> {
    Url::parse(&format!("{}{}", base.trim_end_matches('/'), path))
}

async fn parse_response<T: serde::de::DeserializeOwned>(
    resp: reqwest::Response,
) -> Result<T, ClientError> {
    let status = resp.status();
    if !status.is_success() {
        let body = resp.text().await.unwrap_or_default();
        return Err(ClientError::Status { status, body });
    }
    let bytes = resp.bytes().await?;
    serde_json::from_slice(&bytes).map_err(ClientError::Json)
}
