use thiserror::Error;

/// Errors returned by the Convictional API client.
#[derive(Debug, Error)]
pub enum ConvictionalError {
    /// Network or TLS failure from the underlying HTTP client.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// The API answered with a non-2xx status.
    #[error("unexpected HTTP status {status} from Convictional: {body}")]
    UnexpectedStatus { status: u16, body: String },

    /// The response body could not be deserialized into the expected envelope.
    #[error("JSON deserialization error for {context}: {source}")]
    Deserialize {
        context: String,
        #[source]
        source: serde_json::Error,
    },

    /// The configured base URL or search path is not a valid URL.
    #[error("invalid Convictional URL \"{url}\": {reason}")]
    InvalidUrl { url: String, reason: String },
}
