//! Bearer-token acquisition for the Flip API.
//!
//! The client treats tokens as always-fresh: it calls [`TokenProvider::fetch`]
//! before every attempt and never caches the result, so a retry after a 401
//! observes whatever the provider hands out next. Implementations may cache
//! internally as long as they honor that contract.

use std::future::Future;
use std::time::Duration;

use serde::Deserialize;
use thiserror::Error;

/// Errors from a token provider.
#[derive(Debug, Error)]
pub enum TokenError {
    /// Network or TLS failure reaching the token endpoint.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// The token endpoint answered with a non-2xx status.
    #[error("token endpoint returned status {status}")]
    UnexpectedStatus { status: u16 },

    /// The token endpoint answered 2xx but the body had no usable token.
    #[error("token response could not be parsed: {0}")]
    MalformedResponse(String),
}

/// Capability to obtain a bearer token for the Flip API.
pub trait TokenProvider {
    /// Fetches a token. May be called once per request attempt.
    fn fetch(&self) -> impl Future<Output = Result<String, TokenError>> + Send;
}

#[derive(Debug, Deserialize)]
struct TokenResponse {
    access_token: String,
}

/// OAuth-style client-credentials token provider.
///
/// Posts a form-encoded `client_credentials` grant to the configured token
/// endpoint and returns the `access_token` field of the JSON response.
pub struct OauthTokenProvider {
    http: reqwest::Client,
    token_url: String,
    client_id: String,
    client_secret: String,
}

impl OauthTokenProvider {
    /// Creates a provider for the given token endpoint and credentials.
    ///
    /// # Errors
    ///
    /// Returns [`TokenError::Http`] if the underlying `reqwest::Client`
    /// cannot be constructed.
    pub fn new(
        token_url: &str,
        client_id: &str,
        client_secret: &str,
        timeout_secs: u64,
    ) -> Result<Self, TokenError> {
        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(timeout_secs))
            .connect_timeout(Duration::from_secs(10))
            .user_agent("ordersync/0.1 (order-reconciliation)")
            .build()?;
        Ok(Self {
            http,
            token_url: token_url.to_owned(),
            client_id: client_id.to_owned(),
            client_secret: client_secret.to_owned(),
        })
    }
}

impl TokenProvider for OauthTokenProvider {
    async fn fetch(&self) -> Result<String, TokenError> {
        let params = [
            ("grant_type", "client_credentials"),
            ("client_id", self.client_id.as_str()),
            ("client_secret", self.client_secret.as_str()),
        ];
        let response = self.http.post(&self.token_url).form(&params).send().await?;
        let status = response.status();
        if !status.is_success() {
            return Err(TokenError::UnexpectedStatus {
                status: status.as_u16(),
            });
        }

        let parsed: TokenResponse = response
            .json()
            .await
            .map_err(|e| TokenError::MalformedResponse(e.to_string()))?;
        Ok(parsed.access_token)
    }
}
