//! Client SDK for the Lipad payment gateway.
//!
//! The crate is split the same way the gateway is:
//!
//! * [`objects`]: request payloads for the checkout and direct charge
//!   APIs, plus the checkout required-key validation.
//! * [`encryption`]: the payload cipher the hosted checkout page expects.
//! * [`config`]: client credentials and the per-environment endpoint table.
//! * `client`: the async [`GatewayClient`](client::GatewayClient) that talks
//!   to the gateway (behind the `client` cargo feature, enabled by default).

#![cfg_attr(not(test), deny(clippy::unwrap_used))]
#![cfg_attr(not(test), deny(clippy::expect_used))]
#![cfg_attr(not(test), deny(clippy::panic))]
#![forbid(unsafe_code)]

#[cfg(feature = "client")]
pub mod client;
pub mod config;
pub mod encryption;
pub mod objects;

#[cfg(feature = "client")]
pub use client::{ClientError, GatewayClient};
pub use config::{ClientConfig, Endpoints, Environment};
pub use encryption::PayloadCipher;
