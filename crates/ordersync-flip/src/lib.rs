//! Client for the Flip fulfillment API.
//!
//! The order-status lookup is token-gated: every attempt fetches a fresh
//! bearer token from a [`TokenProvider`], and a 401 or transport failure is
//! retried a bounded number of times with a fixed pause. The mutation
//! wrappers (disable SKU, lookup order id, cancel order) are fire-once with
//! no retry — that is deliberate; retry semantics live in the status lookup
//! alone.

pub mod client;
pub mod error;
pub mod token;
pub mod types;

pub use client::{FlipClient, FlipClientConfig, StatusLookup};
pub use error::FlipError;
pub use token::{OauthTokenProvider, TokenError, TokenProvider};
pub use types::{AuditStatus, FlipOrder, FlipOrdersResponse};
