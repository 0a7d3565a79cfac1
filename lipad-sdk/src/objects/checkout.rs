//! Hosted checkout payloads.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::{JsonMap, ValidationError};

/// An open checkout payload, as handed to the hosted checkout page.
pub type CheckoutPayload = JsonMap;

/// Keys every checkout payload must carry, in the order they are checked.
pub const REQUIRED_CHECKOUT_FIELDS: [&str; 19] = [
    "msisdn",
    "account_number",
    "country_code",
    "currency_code",
    "client_code",
    "due_date",
    "customer_email",
    "customer_first_name",
    "customer_last_name",
    "merchant_transaction_id",
    "preferred_payment_option_code",
    "callback_url",
    "request_amount",
    "request_description",
    "success_redirect_url",
    "fail_redirect_url",
    "invoice_number",
    "language_code",
    "service_code",
];

/// Check that every key of [`REQUIRED_CHECKOUT_FIELDS`] is present.
///
/// Only the first missing key is reported. Presence means the key exists;
/// empty strings and `null` values are accepted.
pub fn validate_checkout_payload(payload: &CheckoutPayload) -> Result<(), ValidationError> {
    match REQUIRED_CHECKOUT_FIELDS
        .iter()
        .find(|key| !payload.contains_key(**key))
    {
        Some(key) => Err(ValidationError::MissingField((*key).to_owned())),
        None => Ok(()),
    }
}

/// Typed checkout payload carrying every required field.
///
/// Optional gateway fields not modelled here go into `extra` and are
/// serialized alongside the required ones.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CheckoutRequest {
    pub msisdn: String,
    pub account_number: String,
    pub country_code: String,
    pub currency_code: String,
    pub client_code: String,
    pub due_date: String,
    pub customer_email: String,
    pub customer_first_name: String,
    pub customer_last_name: String,
    pub merchant_transaction_id: String,
    pub preferred_payment_option_code: String,
    pub callback_url: String,
    #[serde(with = "rust_decimal::serde::float")]
    pub request_amount: Decimal,
    pub request_description: String,
    pub success_redirect_url: String,
    pub fail_redirect_url: String,
    pub invoice_number: String,
    pub language_code: String,
    pub service_code: String,
    #[serde(flatten)]
    pub extra: JsonMap,
}
