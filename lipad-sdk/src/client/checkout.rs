//! Checkout API: payload preparation and status polling.

use reqwest::StatusCode;
use serde::Serialize;
use serde_json::Value;
use tracing::{debug, error};

use super::{ClientError, GatewayClient, endpoint_url, parse_response};
use crate::objects::{CheckoutPayload, ValidationError, validate_checkout_payload};

/// Path of the checkout status endpoint, relative to the checkout base URL.
const CHECKOUT_STATUS_PATH: &str = "/checkout/request/status";

impl GatewayClient {
    /// Check that `payload` carries every required checkout key.
    ///
    /// See [`validate_checkout_payload`] for the exact rules.
    pub fn validate_checkout_payload(&self, payload: &CheckoutPayload) -> Result<(), ClientError> {
        validate_checkout_payload(payload).map_err(|e| {
            error!(error = %e, "checkout payload rejected");
            ClientError::Validation(e)
        })
    }

    /// Encrypt an arbitrary payload for the hosted checkout page.
    pub fn encrypt<T: Serialize + ?Sized>(&self, payload: &T) -> Result<String, ClientError> {
        Ok(self.cipher.encrypt(payload)?)
    }

    /// Validate and encrypt a checkout payload in one step.
    ///
    /// `payload` may be a [`CheckoutRequest`](crate::objects::CheckoutRequest),
    /// a [`CheckoutPayload`] map, or anything else that serializes to a JSON
    /// object.
    pub fn prepare_checkout<T: Serialize + ?Sized>(&self, payload: &T) -> Result<String, ClientError> {
        let Value::Object(payload) = serde_json::to_value(payload)? else {
            return Err(ValidationError::NotAnObject.into());
        };
        self.validate_checkout_payload(&payload)?;
        self.encrypt(&payload)
    }

    /// `GET {checkout}/checkout/request/status`: poll a checkout request by
    /// the merchant's transaction id.
    ///
    /// Returns the gateway's JSON body unchanged.
    pub async fn get_checkout_status(&self, merchant_transaction_id: &str) -> Result<Value, ClientError> {
        self.fetch_checkout_status(merchant_transaction_id)
            .await
            .inspect_err(|e| {
                error!(merchant_transaction_id, error = %e, "checkout status request failed");
            })
    }

    async fn fetch_checkout_status(&self, merchant_transaction_id: &str) -> Result<Value, ClientError> {
        let endpoints = self.endpoints()?;
        let token = self.checkout_access_token().await?;

        let mut url = endpoint_url(&endpoints.checkout_base_url, CHECKOUT_STATUS_PATH)?;
        url.query_pairs_mut()
            .append_pair("merchant_transaction_id", merchant_transaction_id);
        debug!(%url, "fetching checkout status");

        let resp = self
            .http
            .get(url)
            .bearer_auth(token.as_str())
            .send()
            .await?;

        if resp.status() == StatusCode::NOT_FOUND {
            return Err(ClientError::NotFound {
                merchant_transaction_id: merchant_transaction_id.to_owned(),
            });
        }

        parse_response(resp).await
    }
}

#[cfg(test)]
mod tests {
    use super::super::test_support::*;
    use super::*;
    use crate::objects::checkout::tests::full_payload;
    use httpmock::prelude::*;
    use serde_json::json;

    #[tokio::test]
    async fn test_status_returns_body_verbatim() {
        let server = MockServer::start_async().await;
        mock_checkout_token(&server, "checkout-token").await;
        let body = json!({
            "merchant_transaction_id": "TX-0001",
            "request_status_code": 178,
            "payments": [{ "amount_paid": 150, "payment_status": "SUCCESS" }],
        });
        let expected = body.clone();
        let status = server
            .mock_async(|when, then| {
                when.method(GET)
                    .path("/api/v1/checkout/request/status")
                    .query_param("merchant_transaction_id", "TX-0001")
                    .header("authorization", "Bearer checkout-token");
                then.status(200).json_body(body);
            })
            .await;

        let result = mock_client(&server).get_checkout_status("TX-0001").await.unwrap();

        status.assert_async().await;
        assert_eq!(result, expected);
    }

    #[tokio::test]
    async fn test_status_not_found() {
        let server = MockServer::start_async().await;
        mock_checkout_token(&server, "checkout-token").await;
        server
            .mock_async(|when, then| {
                when.method(GET).path("/api/v1/checkout/request/status");
                then.status(404).json_body(json!({ "message": "not found" }));
            })
            .await;

        let err = mock_client(&server).get_checkout_status("TX-404").await.unwrap_err();
        assert!(
            matches!(&err, ClientError::NotFound { merchant_transaction_id } if merchant_transaction_id == "TX-404"),
            "got {err:?}"
        );
    }

    #[tokio::test]
    async fn test_status_transport_failure() {
        init_tracing();
        let client = GatewayClient::new(config("sandbox"))
            .unwrap()
            .with_endpoints(unreachable_endpoints());

        assert!(matches!(
            client.get_checkout_status("TX-1").await,
            Err(ClientError::Transport(_))
        ));
    }

    #[tokio::test]
    async fn test_rejected_token_stops_status_request() {
        let server = MockServer::start_async().await;
        server
            .mock_async(|when, then| {
                when.method(POST).path("/api/v1/api-auth/access-token");
                then.status(401);
            })
            .await;
        let status = server
            .mock_async(|when, then| {
                when.method(GET).path("/api/v1/checkout/request/status");
                then.status(200).json_body(json!({}));
            })
            .await;

        let err = mock_client(&server).get_checkout_status("TX-1").await.unwrap_err();
        assert!(matches!(err, ClientError::Credentials));
        assert_eq!(status.hits_async().await, 0);
    }

    #[tokio::test]
    async fn test_permissive_client_with_unknown_environment() {
        init_tracing();
        let client = GatewayClient::new_permissive(config("staging"));

        let err = client.get_checkout_status("TX-1").await.unwrap_err();
        assert!(matches!(err, ClientError::Configuration(_)), "got {err:?}");

        // local operations still work
        assert!(client.validate_checkout_payload(&full_payload()).is_ok());
        assert!(client.encrypt(&json!({ "a": 1 })).is_ok());
    }

    #[test]
    fn test_prepare_checkout_validates_then_encrypts() {
        let client = GatewayClient::new(config("sandbox")).unwrap();

        let encrypted = client.prepare_checkout(&full_payload()).unwrap();
        let decrypted = client.cipher().decrypt(&encrypted).unwrap();
        assert_eq!(decrypted, Value::Object(full_payload()));

        let mut incomplete = full_payload();
        incomplete.remove("callback_url");
        assert!(matches!(
            client.prepare_checkout(&incomplete),
            Err(ClientError::Validation(ValidationError::MissingField(key))) if key == "callback_url"
        ));

        assert!(matches!(
            client.prepare_checkout(&["not", "an", "object"]),
            Err(ClientError::Validation(ValidationError::NotAnObject))
        ));
    }
}
