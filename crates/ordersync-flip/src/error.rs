use thiserror::Error;

use crate::token::TokenError;

/// Errors returned by the fire-once Flip API wrappers.
///
/// The token-gated status lookup does not use this type — its failure modes
/// are data (sentinel states), not errors.
#[derive(Debug, Error)]
pub enum FlipError {
    /// Network or TLS failure from the underlying HTTP client.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// The bearer token could not be obtained.
    #[error("token acquisition failed: {0}")]
    Token(#[from] TokenError),

    /// The API answered with a non-2xx status.
    #[error("unexpected HTTP status {status} from Flip: {body}")]
    UnexpectedStatus { status: u16, body: String },

    /// The response body could not be deserialized into the expected type.
    #[error("JSON deserialization error for {context}: {source}")]
    Deserialize {
        context: String,
        #[source]
        source: serde_json::Error,
    },

    /// A cancellation request was accepted but reported a non-success result.
    #[error("cancellation rejected for order {order_id}: result was \"{result}\"")]
    CancelRejected { order_id: String, result: String },
}
