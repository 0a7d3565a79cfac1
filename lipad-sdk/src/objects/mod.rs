pub mod charge;
pub mod checkout;

pub use charge::{
    ChargePayload, ChargePayloadError, ChargeRequest, InvalidPaymentMethod, PaymentMethod,
    PaymentMethodPolicy,
};
pub use checkout::{
    CheckoutPayload, CheckoutRequest, REQUIRED_CHECKOUT_FIELDS, validate_checkout_payload,
};

/// Open JSON record, the shape of every gateway payload.
pub type JsonMap = serde_json::Map<String, serde_json::Value>;

/// A payload is missing something the gateway requires.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ValidationError {
    #[error("missing required key: {0}")]
    MissingField(String),
    #[error("payload must serialize to a JSON object")]
    NotAnObject,
}
