//! Direct charge API: mobile-money charges and their status.

use serde_json::Value;
use tracing::{debug, error};
use url::Url;

use super::{ClientError, GatewayClient, endpoint_url, parse_response};
use crate::objects::ChargeRequest;

/// Header carrying the direct charge API token.
pub const ACCESS_TOKEN_HEADER: &str = "x-access-token";

impl GatewayClient {
    /// `POST {direct charge}?payment_method={mpesa|airtel_money}`: start a
    /// mobile-money charge.
    ///
    /// The request is shaped by [`ChargeRequest::to_payload`] under this
    /// client's payment method policy. Returns the gateway's JSON body.
    pub async fn direct_charge(&self, request: &ChargeRequest) -> Result<Value, ClientError> {
        self.send_direct_charge(request).await.inspect_err(|e| {
            error!(
                external_reference = %request.external_reference,
                error = %e,
                "direct charge failed"
            );
        })
    }

    async fn send_direct_charge(&self, request: &ChargeRequest) -> Result<Value, ClientError> {
        let endpoints = self.endpoints()?;
        let payload = request.to_payload(self.payment_method_policy)?;
        let token = self.direct_api_access_token().await?;

        let mut url = Url::parse(&endpoints.direct_charge_base_url)?;
        url.query_pairs_mut()
            .append_pair("payment_method", payload.payment_method_code.endpoint());
        debug!(%url, payment_method = %payload.payment_method_code, "submitting direct charge");

        let resp = self
            .http
            .post(url)
            .header(ACCESS_TOKEN_HEADER, token.as_str())
            .json(&payload)
            .send()
            .await?;

        parse_response(resp).await
    }

    /// `GET {direct charge}/transaction/{charge_request_id}/status`: poll a
    /// charge started with [`direct_charge`](Self::direct_charge).
    pub async fn get_charge_request_status(&self, charge_request_id: &str) -> Result<Value, ClientError> {
        self.fetch_charge_request_status(charge_request_id)
            .await
            .inspect_err(|e| {
                error!(charge_request_id, error = %e, "charge status request failed");
            })
    }

    async fn fetch_charge_request_status(&self, charge_request_id: &str) -> Result<Value, ClientError> {
        let endpoints = self.endpoints()?;
        let token = self.direct_api_access_token().await?;

        let url = endpoint_url(
            &endpoints.direct_charge_base_url,
            &format!("/transaction/{}/status", urlencoding::encode(charge_request_id)),
        )?;
        debug!(%url, "fetching charge status");

        let resp = self
            .http
            .get(url)
            .header(ACCESS_TOKEN_HEADER, token.as_str())
            .header(reqwest::header::CONTENT_TYPE, "application/json")
            .send()
            .await?;

        parse_response(resp).await
    }
}
