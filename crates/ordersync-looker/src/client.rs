use std::time::Duration;

use reqwest::Client;
use serde::Deserialize;

use crate::error::LookerError;

#[derive(Debug, Deserialize)]
struct LoginResponse {
    access_token: String,
}

/// Client for the Looker 4.0 REST API.
pub struct LookerClient {
    http: Client,
    base_url: String,
    client_id: String,
    client_secret: String,
}

impl LookerClient {
    /// Creates a client for the Looker instance at `base_url`.
    ///
    /// # Errors
    ///
    /// Returns [`LookerError::Http`] if the underlying `reqwest::Client`
    /// cannot be constructed.
    pub fn new(
        base_url: &str,
        client_id: &str,
        client_secret: &str,
        timeout_secs: u64,
    ) -> Result<Self, LookerError> {
        let http = Client::builder()
            .timeout(Duration::from_secs(timeout_secs))
            .connect_timeout(Duration::from_secs(10))
            .user_agent("ordersync/0.1 (order-reconciliation)")
            .build()?;
        Ok(Self {
            http,
            base_url: base_url.trim_end_matches('/').to_owned(),
            client_id: client_id.to_owned(),
            client_secret: client_secret.to_owned(),
        })
    }

    /// Runs a saved look and returns its rows as JSON objects.
    ///
    /// Logs in first; Looker API tokens are short-lived, so each run
    /// authenticates fresh rather than caching.
    ///
    /// # Errors
    ///
    /// - [`LookerError::Http`] on network failure.
    /// - [`LookerError::UnexpectedStatus`] on a non-2xx login or run response.
    /// - [`LookerError::Deserialize`] if either body does not parse.
    pub async fn run_look(&self, look_id: &str) -> Result<Vec<serde_json::Value>, LookerError> {
        let token = self.login().await?;

        let url = format!("{}/api/4.0/looks/{look_id}/run/json", self.base_url);
        tracing::info!(look_id, "running Looker look");
        let response = self.http.get(&url).bearer_auth(&token).send().await?;
        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(LookerError::UnexpectedStatus {
                status: status.as_u16(),
                body,
            });
        }

        let body = response.text().await?;
        let rows: Vec<serde_json::Value> =
            serde_json::from_str(&body).map_err(|e| LookerError::Deserialize {
                context: format!("look {look_id}"),
                source: e,
            })?;
        tracing::info!(look_id, rows = rows.len(), "fetched look data");
        Ok(rows)
    }

    async fn login(&self) -> Result<String, LookerError> {
        let url = format!("{}/api/4.0/login", self.base_url);
        let params = [
            ("client_id", self.client_id.as_str()),
            ("client_secret", self.client_secret.as_str()),
        ];
        let response = self.http.post(&url).form(&params).send().await?;
        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(LookerError::UnexpectedStatus {
                status: status.as_u16(),
                body,
            });
        }

        let body = response.text().await?;
        let parsed: LoginResponse =
            serde_json::from_str(&body).map_err(|e| LookerError::Deserialize {
                context: "login".to_owned(),
                source: e,
            })?;
        Ok(parsed.access_token)
    }
}
