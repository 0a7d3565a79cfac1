//! Access token flows.
//!
//! The checkout API and the direct charge API each issue their own tokens.
//! Both endpoints take form-encoded client credentials and answer `201
//! Created` with `{"access_token": "..."}`.

use reqwest::StatusCode;
use serde::Deserialize;
use std::fmt;
use tracing::{debug, warn};
use url::Url;

use super::{ClientError, GatewayClient, endpoint_url};

/// Path of the checkout token endpoint, relative to the checkout base URL.
const CHECKOUT_TOKEN_PATH: &str = "/api-auth/access-token";

/// Opaque bearer credential for one request.
#[derive(Clone, PartialEq, Eq)]
pub struct AccessToken(String);

impl AccessToken {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for AccessToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("AccessToken(<redacted>)")
    }
}

#[derive(Deserialize)]
struct TokenResponse {
    access_token: Option<String>,
}

impl GatewayClient {
    /// `POST {checkout}/api-auth/access-token`: token for the checkout API.
    pub(crate) async fn checkout_access_token(&self) -> Result<AccessToken, ClientError> {
        let endpoints = self.endpoints()?;
        let url = endpoint_url(&endpoints.checkout_base_url, CHECKOUT_TOKEN_PATH)?;
        let form = [
            ("consumerKey", self.consumer_key.as_str()),
            ("consumerSecret", self.consumer_secret.as_str()),
        ];
        self.fetch_access_token(url, &form).await
    }

    /// `POST {direct auth}`: token for the direct charge API.
    pub(crate) async fn direct_api_access_token(&self) -> Result<AccessToken, ClientError> {
        let endpoints = self.endpoints()?;
        let url = Url::parse(&endpoints.direct_auth_url)?;
        let form = [
            ("consumer_key", self.consumer_key.as_str()),
            ("consumer_secret", self.consumer_secret.as_str()),
        ];
        self.fetch_access_token(url, &form).await
    }

    async fn fetch_access_token(
        &self,
        url: Url,
        form: &[(&str, &str)],
    ) -> Result<AccessToken, ClientError> {
        debug!(%url, "requesting access token");

        let resp = self.http.post(url).form(form).send().await?;

        let status = resp.status();
        match status {
            StatusCode::UNAUTHORIZED => {
                warn!("gateway rejected the client credentials");
                Err(ClientError::Credentials)
            }
            StatusCode::CREATED => {
                let bytes = resp.bytes().await?;
                serde_json::from_slice::<TokenResponse>(&bytes)
                    .ok()
                    .and_then(|body| body.access_token)
                    .map(AccessToken)
                    .ok_or(ClientError::MissingToken)
            }
            _ => {
                let body = resp.text().await.unwrap_or_default();
                Err(ClientError::Status { status, body })
            }
        }
    }
}
