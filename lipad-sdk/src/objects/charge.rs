//! Direct charge payloads.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use super::ValidationError;

/// Mobile-money rails supported by the direct charge API.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PaymentMethod {
    #[serde(rename = "MPESA_KEN")]
    MpesaKen,
    #[serde(rename = "AIRTEL_KEN")]
    AirtelKen,
}

impl PaymentMethod {
    pub fn code(&self) -> &'static str {
        match self {
            PaymentMethod::MpesaKen => "MPESA_KEN",
            PaymentMethod::AirtelKen => "AIRTEL_KEN",
        }
    }

    /// Value of the `payment_method` query parameter on the charge endpoint.
    pub fn endpoint(&self) -> &'static str {
        match self {
            PaymentMethod::MpesaKen => "mpesa",
            PaymentMethod::AirtelKen => "airtel_money",
        }
    }

    /// Look up a payment method code, rejecting anything unmapped.
    pub fn from_code(code: &str) -> Result<Self, InvalidPaymentMethod> {
        match code {
            "MPESA_KEN" => Ok(PaymentMethod::MpesaKen),
            "AIRTEL_KEN" => Ok(PaymentMethod::AirtelKen),
            other => Err(InvalidPaymentMethod(other.to_owned())),
        }
    }

    /// Legacy mapping used by the gateway's own SDKs: anything that is not
    /// `MPESA_KEN` is charged over Airtel.
    pub fn from_code_lenient(code: &str) -> Self {
        match code {
            "MPESA_KEN" => PaymentMethod::MpesaKen,
            _ => PaymentMethod::AirtelKen,
        }
    }
}

impl fmt::Display for PaymentMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

impl FromStr for PaymentMethod {
    type Err = InvalidPaymentMethod;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        Self::from_code(value)
    }
}

/// A payment method code with no charge endpoint.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("invalid payment method code: {0}")]
pub struct InvalidPaymentMethod(pub String);

/// Caller-side description of a direct mobile-money charge.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChargeRequest {
    pub external_reference: String,
    pub originator_msisdn: String,
    pub payer_msisdn: String,
    pub service_code: String,
    pub account_number: String,
    pub client_code: String,
    pub payer_email: String,
    pub country_code: String,
    pub invoice_number: String,
    pub currency_code: String,
    #[serde(with = "rust_decimal::serde::float")]
    pub amount: Decimal,
    pub add_transaction_charge: bool,
    #[serde(with = "rust_decimal::serde::float")]
    pub transaction_charge: Decimal,
    #[serde(default)]
    pub extra_data: serde_json::Value,
    pub notify_client: bool,
    pub notify_originator: bool,
    /// Raw code as supplied by the caller, e.g. `MPESA_KEN`.
    pub payment_method_code: String,
    /// Till/paybill number; required for M-Pesa.
    #[serde(default)]
    pub paybill: Option<String>,
}

/// How [`ChargeRequest::to_payload`] treats codes other than the two known
/// ones.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PaymentMethodPolicy {
    /// Anything that is not `MPESA_KEN` becomes `AIRTEL_KEN`.
    #[default]
    Lenient,
    /// Unknown codes are rejected.
    Strict,
}

/// Errors raised while building a [`ChargePayload`].
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ChargePayloadError {
    #[error(transparent)]
    Validation(#[from] ValidationError),
    #[error(transparent)]
    PaymentMethod(#[from] InvalidPaymentMethod),
}

/// Wire body posted to the direct charge endpoint.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChargePayload {
    pub external_reference: String,
    pub origin_channel_code: &'static str,
    pub originator_msisdn: String,
    pub payer_msisdn: String,
    pub service_code: String,
    pub account_number: String,
    pub client_code: String,
    pub payer_email: String,
    pub country_code: String,
    pub invoice_number: String,
    pub currency_code: String,
    #[serde(with = "rust_decimal::serde::float")]
    pub amount: Decimal,
    pub add_transaction_charge: bool,
    #[serde(with = "rust_decimal::serde::float")]
    pub transaction_charge: Decimal,
    pub extra_data: serde_json::Value,
    pub description: String,
    pub notify_client: bool,
    pub notify_originator: bool,
    pub payment_method_code: PaymentMethod,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub paybill: Option<String>,
}

/// Channel code the gateway expects for server-initiated charges.
pub const ORIGIN_CHANNEL_CODE: &str = "API";

impl ChargeRequest {
    /// Shape the request into the gateway's charge body.
    ///
    /// M-Pesa charges carry `paybill`; Airtel charges never do.
    pub fn to_payload(&self, policy: PaymentMethodPolicy) -> Result<ChargePayload, ChargePayloadError> {
        let payment_method = match policy {
            PaymentMethodPolicy::Strict => PaymentMethod::from_code(&self.payment_method_code)?,
            PaymentMethodPolicy::Lenient => {
                let method = PaymentMethod::from_code_lenient(&self.payment_method_code);
                if method.code() != self.payment_method_code {
                    tracing::warn!(
                        code = %self.payment_method_code,
                        "unknown payment method code, charging as AIRTEL_KEN"
                    );
                }
                method
            }
        };

        let paybill = match payment_method {
            PaymentMethod::MpesaKen => Some(
                self.paybill
                    .clone()
                    .ok_or_else(|| ValidationError::MissingField("paybill".to_owned()))?,
            ),
            PaymentMethod::AirtelKen => None,
        };

        Ok(ChargePayload {
            external_reference: self.external_reference.clone(),
            origin_channel_code: ORIGIN_CHANNEL_CODE,
            originator_msisdn: self.originator_msisdn.clone(),
            payer_msisdn: self.payer_msisdn.clone(),
            service_code: self.service_code.clone(),
            account_number: self.account_number.clone(),
            client_code: self.client_code.clone(),
            payer_email: self.payer_email.clone(),
            country_code: self.country_code.clone(),
            invoice_number: self.invoice_number.clone(),
            currency_code: self.currency_code.clone(),
            amount: self.amount,
            add_transaction_charge: self.add_transaction_charge,
            transaction_charge: self.transaction_charge,
            extra_data: self.extra_data.clone(),
            description: format!("Payment by {}", self.payer_msisdn),
            notify_client: self.notify_client,
            notify_originator: self.notify_originator,
            payment_method_code: payment_method,
            paybill,
        })
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use serde_json::json;

    pub(crate) fn charge_request(code: &str, paybill: Option<&str>) -> ChargeRequest {
        ChargeRequest {
            external_reference: "EXT-1".to_string(),
            originator_msisdn: "254711000000".to_string(),
            payer_msisdn: "254722000000".to_string(),
            service_code: "SERVICE".to_string(),
            account_number: "ACC-1".to_string(),
            client_code: "CLIENT".to_string(),
            payer_email: "payer@example.com".to_string(),
            country_code: "KEN".to_string(),
            invoice_number: "INV-1".to_string(),
            currency_code: "KES".to_string(),
            amount: Decimal::new(150, 0),
            add_transaction_charge: false,
            transaction_charge: Decimal::ZERO,
            extra_data: json!({"order": "42"}),
            notify_client: true,
            notify_originator: false,
            payment_method_code: code.to_string(),
            paybill: paybill.map(str::to_string),
        }
    }

    /// Expected wire body for [`charge_request`], without the method fields.
    pub(crate) fn common_body() -> serde_json::Value {
        json!({
            "external_reference": "EXT-1",
            "origin_channel_code": "API",
            "originator_msisdn": "254711000000",
            "payer_msisdn": "254722000000",
            "service_code": "SERVICE",
            "account_number": "ACC-1",
            "client_code": "CLIENT",
            "payer_email": "payer@example.com",
            "country_code": "KEN",
            "invoice_number": "INV-1",
            "currency_code": "KES",
            "amount": 150.0,
            "add_transaction_charge": false,
            "transaction_charge": 0.0,
            "extra_data": {"order": "42"},
            "description": "Payment by 254722000000",
            "notify_client": true,
            "notify_originator": false,
        })
    }

    #[test]
    fn test_mpesa_payload_carries_paybill() {
        let payload = charge_request("MPESA_KEN", Some("400200"))
            .to_payload(PaymentMethodPolicy::Lenient)
            .unwrap();
        assert_eq!(payload.payment_method_code, PaymentMethod::MpesaKen);

        let mut expected = common_body();
        expected["payment_method_code"] = json!("MPESA_KEN");
        expected["paybill"] = json!("400200");
        assert_eq!(serde_json::to_value(&payload).unwrap(), expected);
    }

    #[test]
    fn test_airtel_payload_has_no_paybill() {
        let payload = charge_request("AIRTEL_KEN", Some("400200"))
            .to_payload(PaymentMethodPolicy::Lenient)
            .unwrap();

        let mut expected = common_body();
        expected["payment_method_code"] = json!("AIRTEL_KEN");
        assert_eq!(serde_json::to_value(&payload).unwrap(), expected);
    }

    #[test]
    fn test_unknown_code_is_normalized_to_airtel() {
        let payload = charge_request("TKASH_KEN", None)
            .to_payload(PaymentMethodPolicy::Lenient)
            .unwrap();
        assert_eq!(payload.payment_method_code, PaymentMethod::AirtelKen);
        assert_eq!(payload.paybill, None);
    }

    #[test]
    fn test_strict_policy_rejects_unknown_code() {
        let err = charge_request("TKASH_KEN", None)
            .to_payload(PaymentMethodPolicy::Strict)
            .unwrap_err();
        assert_eq!(
            err,
            ChargePayloadError::PaymentMethod(InvalidPaymentMethod("TKASH_KEN".to_string()))
        );
    }

    #[test]
    fn test_mpesa_without_paybill_is_rejected() {
        let err = charge_request("MPESA_KEN", None)
            .to_payload(PaymentMethodPolicy::Lenient)
            .unwrap_err();
        assert_eq!(
            err,
            ChargePayloadError::Validation(ValidationError::MissingField("paybill".to_string()))
        );
    }

    #[test]
    fn test_endpoint_mapping() {
        assert_eq!(PaymentMethod::MpesaKen.endpoint(), "mpesa");
        assert_eq!(PaymentMethod::AirtelKen.endpoint(), "airtel_money");
        assert_eq!("AIRTEL_KEN".parse::<PaymentMethod>(), Ok(PaymentMethod::AirtelKen));
        assert!("mpesa_ken".parse::<PaymentMethod>().is_err());
    }
}
