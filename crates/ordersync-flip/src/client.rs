use std::time::Duration;

use ordersync_core::FulfillmentState;
use reqwest::header::{ACCEPT, CONTENT_TYPE};
use reqwest::{Client, StatusCode};

use crate::error::FlipError;
use crate::token::{TokenError, TokenProvider};
use crate::types::{
    AuditStatus, CancelOrderRequest, CancelResponse, DisableSkusRequest, FlipOrdersResponse,
};

/// Header identifying this tool to the Flip API.
const TOOLS_HEADER: &str = "x-flipinator-tools";

/// Settings for [`FlipClient`]. Built from the application config by the CLI;
/// tests fill it in directly with a mock server URL and zero retry delays.
#[derive(Debug, Clone)]
pub struct FlipClientConfig {
    pub base_url: String,
    pub orders_path: String,
    pub disable_skus_path: String,
    /// Path template containing an `{order_id}` placeholder.
    pub cancel_order_path: String,
    /// Value for the `x-flipinator-tools` header.
    pub tools_header: String,
    /// Page size for the status lookup.
    pub page_limit: u32,
    /// Additional attempts after the first for 401 and transport failures.
    pub max_retries: u32,
    pub timeout_secs: u64,
    /// Pause before retrying after a 401.
    pub auth_retry_delay_ms: u64,
    /// Pause before retrying after a transport failure.
    pub transport_retry_delay_ms: u64,
}

/// Outcome of the token-gated status lookup.
///
/// Mirrors the contract of the upstream call: a payload when one could be
/// decoded, and the last HTTP status seen, each independently absent. All
/// failure modes are folded into this value — the lookup itself never errors.
#[derive(Debug)]
pub struct StatusLookup {
    pub response: Option<FlipOrdersResponse>,
    pub status: Option<u16>,
}

impl StatusLookup {
    /// Resolves the fulfillment state for the first matching order, mapping
    /// each terminal condition to its sentinel.
    #[must_use]
    pub fn resolve_state(&self) -> FulfillmentState {
        match (&self.response, self.status) {
            (Some(response), _) => match response.data.first() {
                Some(order) => order.state.clone().map_or(
                    FulfillmentState::NotFound,
                    FulfillmentState::Known,
                ),
                None => FulfillmentState::Empty,
            },
            (None, Some(status)) => FulfillmentState::ApiError(status),
            (None, None) => FulfillmentState::Unresolved,
        }
    }
}

/// Client for the Flip fulfillment API.
///
/// The status lookup obtains a fresh bearer token from the [`TokenProvider`]
/// before every attempt and retries on 401 and transport failures up to
/// `max_retries` additional attempts. Every other call is fire-once.
pub struct FlipClient<P> {
    http: Client,
    config: FlipClientConfig,
    token_provider: P,
}

impl<P: TokenProvider> FlipClient<P> {
    /// Creates a client from the given settings and token provider.
    ///
    /// # Errors
    ///
    /// Returns [`FlipError::Http`] if the underlying `reqwest::Client`
    /// cannot be constructed.
    pub fn new(config: FlipClientConfig, token_provider: P) -> Result<Self, FlipError> {
        let http = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .connect_timeout(Duration::from_secs(10))
            .user_agent("ordersync/0.1 (order-reconciliation)")
            .build()?;
        Ok(Self {
            http,
            config,
            token_provider,
        })
    }

    /// Obtains a bearer token from the provider.
    ///
    /// The downstream batch flows fetch one token up front and reuse it for
    /// their fire-once calls.
    ///
    /// # Errors
    ///
    /// Propagates the provider's [`TokenError`].
    pub async fn fetch_token(&self) -> Result<String, TokenError> {
        self.token_provider.fetch().await
    }

    /// Looks up the fulfillment status for a buyer order code.
    ///
    /// Retry protocol, with `max_retries` additional attempts:
    /// - 200 with a decodable body returns the payload.
    /// - 200 with an undecodable body returns no payload, status 200, no retry.
    /// - 401 sleeps briefly and retries with a freshly fetched token.
    /// - Any other status returns immediately with that status, no retry.
    /// - A transport failure sleeps and retries; its status is used if the
    ///   failure carried one.
    /// - A token-provider failure returns no payload and no status.
    pub async fn lookup_order_status(&self, buyer_order_code: &str) -> StatusLookup {
        let url = self.endpoint(&self.config.orders_path);
        let limit = self.config.page_limit.to_string();
        let params = [
            ("page", "1"),
            ("limit", limit.as_str()),
            ("customerOrderId", buyer_order_code),
        ];

        let max_retries = self.config.max_retries;
        let mut last_status: Option<u16> = None;

        for attempt in 0..=max_retries {
            let token = match self.token_provider.fetch().await {
                Ok(token) => token,
                Err(err) => {
                    tracing::error!(
                        buyer_order_code,
                        error = %err,
                        "failed to obtain Flip access token; giving up on lookup"
                    );
                    return StatusLookup {
                        response: None,
                        status: None,
                    };
                }
            };

            tracing::debug!(buyer_order_code, attempt = attempt + 1, "calling Flip orders endpoint");
            let result = self
                .http
                .get(&url)
                .query(&params)
                .bearer_auth(&token)
                .header(CONTENT_TYPE, "application/json")
                .header(TOOLS_HEADER, &self.config.tools_header)
                .send()
                .await;

            match result {
                Ok(response) => {
                    let status = response.status();
                    last_status = Some(status.as_u16());

                    if status == StatusCode::OK {
                        match response.json::<FlipOrdersResponse>().await {
                            Ok(payload) => {
                                return StatusLookup {
                                    response: Some(payload),
                                    status: last_status,
                                };
                            }
                            Err(err) => {
                                tracing::error!(
                                    buyer_order_code,
                                    error = %err,
                                    "failed to decode Flip response body"
                                );
                                return StatusLookup {
                                    response: None,
                                    status: last_status,
                                };
                            }
                        }
                    }

                    if status == StatusCode::UNAUTHORIZED {
                        tracing::warn!(
                            buyer_order_code,
                            attempt = attempt + 1,
                            attempts_allowed = max_retries + 1,
                            "received 401 from Flip"
                        );
                        if attempt < max_retries {
                            tracing::info!("retrying with a fresh token");
                            tokio::time::sleep(Duration::from_millis(
                                self.config.auth_retry_delay_ms,
                            ))
                            .await;
                            continue;
                        }
                        tracing::error!(buyer_order_code, "max retries reached after 401");
                        break;
                    }

                    let body = response.text().await.unwrap_or_default();
                    tracing::error!(
                        buyer_order_code,
                        status = status.as_u16(),
                        body,
                        "Flip request failed"
                    );
                    break;
                }
                Err(err) => {
                    if let Some(status) = err.status() {
                        last_status = Some(status.as_u16());
                    }
                    tracing::error!(
                        buyer_order_code,
                        attempt = attempt + 1,
                        error = %err,
                        "transport error during Flip request"
                    );
                    if attempt < max_retries {
                        tokio::time::sleep(Duration::from_millis(
                            self.config.transport_retry_delay_ms,
                        ))
                        .await;
                        continue;
                    }
                    tracing::error!(
                        buyer_order_code,
                        "max retries reached after transport error"
                    );
                    break;
                }
            }
        }

        StatusLookup {
            response: None,
            status: last_status,
        }
    }

    /// Finds Flip's internal order id for a buyer order code.
    ///
    /// Fire-once. Returns `Ok(None)` when no matching order (or an order
    /// without an id) comes back.
    ///
    /// # Errors
    ///
    /// - [`FlipError::Http`] on transport failure.
    /// - [`FlipError::UnexpectedStatus`] on a non-2xx response.
    /// - [`FlipError::Deserialize`] if the body does not match the envelope.
    pub async fn lookup_order_id(
        &self,
        token: &str,
        buyer_order_code: &str,
    ) -> Result<Option<String>, FlipError> {
        let url = self.endpoint(&self.config.orders_path);
        let params = [
            ("page", "1"),
            ("limit", "10"),
            ("customerOrderId", buyer_order_code),
        ];

        let response = self
            .http
            .get(&url)
            .query(&params)
            .bearer_auth(token)
            .header(ACCEPT, "application/json, text/plain, */*")
            .header(TOOLS_HEADER, &self.config.tools_header)
            .send()
            .await?;
        let payload: FlipOrdersResponse = self
            .decode(response, &format!("order lookup for {buyer_order_code}"))
            .await?;

        let order_id = payload.data.first().and_then(|order| order.id.clone());
        match &order_id {
            Some(id) => tracing::info!(buyer_order_code, order_id = %id, "found Flip order"),
            None => tracing::warn!(buyer_order_code, "no Flip order id found"),
        }
        Ok(order_id)
    }

    /// Disables a SKU with the given audit status. Fire-once.
    ///
    /// # Errors
    ///
    /// - [`FlipError::Http`] on transport failure.
    /// - [`FlipError::UnexpectedStatus`] on a non-2xx response.
    pub async fn disable_sku(
        &self,
        token: &str,
        sku: &str,
        audit_status: AuditStatus,
    ) -> Result<(), FlipError> {
        let url = self.endpoint(&self.config.disable_skus_path);
        let body = DisableSkusRequest {
            skus: [sku],
            audit_status,
        };

        let response = self
            .http
            .put(&url)
            .json(&body)
            .bearer_auth(token)
            .header(ACCEPT, "application/json, text/plain, */*")
            .header(TOOLS_HEADER, &self.config.tools_header)
            .send()
            .await?;
        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(FlipError::UnexpectedStatus {
                status: status.as_u16(),
                body,
            });
        }

        tracing::info!(sku, ?audit_status, "disabled SKU");
        Ok(())
    }

    /// Cancels an order by Flip order id with the fixed integration-failure
    /// body. Fire-once.
    ///
    /// # Errors
    ///
    /// - [`FlipError::Http`] on transport failure.
    /// - [`FlipError::UnexpectedStatus`] on a non-2xx response.
    /// - [`FlipError::Deserialize`] if the body does not match the envelope.
    /// - [`FlipError::CancelRejected`] when the response result is not
    ///   `"success"`.
    pub async fn cancel_order(&self, token: &str, order_id: &str) -> Result<(), FlipError> {
        let path = self
            .config
            .cancel_order_path
            .replace("{order_id}", order_id);
        let url = self.endpoint(&path);

        let response = self
            .http
            .post(&url)
            .json(&CancelOrderRequest::integration_failure())
            .bearer_auth(token)
            .header(ACCEPT, "application/json, text/plain, */*")
            .header(TOOLS_HEADER, &self.config.tools_header)
            .send()
            .await?;
        let payload: CancelResponse = self
            .decode(response, &format!("cancellation of {order_id}"))
            .await?;

        let result = payload
            .data
            .and_then(|d| d.result)
            .unwrap_or_default();
        if result == "success" {
            tracing::info!(order_id, "cancelled order");
            Ok(())
        } else {
            Err(FlipError::CancelRejected {
                order_id: order_id.to_owned(),
                result,
            })
        }
    }

    fn endpoint(&self, path: &str) -> String {
        format!("{}{path}", self.config.base_url.trim_end_matches('/'))
    }

    /// Asserts a 2xx status and decodes the body, capturing the raw text in
    /// the error context on mismatch.
    async fn decode<T: serde::de::DeserializeOwned>(
        &self,
        response: reqwest::Response,
        context: &str,
    ) -> Result<T, FlipError> {
        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(FlipError::UnexpectedStatus {
                status: status.as_u16(),
                body,
            });
        }
        let body = response.text().await?;
        serde_json::from_str(&body).map_err(|e| FlipError::Deserialize {
            context: context.to_owned(),
            source: e,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::FlipOrder;

    fn lookup(response: Option<FlipOrdersResponse>, status: Option<u16>) -> StatusLookup {
        StatusLookup { response, status }
    }

    fn orders(entries: Vec<FlipOrder>) -> FlipOrdersResponse {
        FlipOrdersResponse { data: entries }
    }

    fn order(state: Option<&str>) -> FlipOrder {
        FlipOrder {
            id: Some("flip-1".to_owned()),
            state: state.map(str::to_owned),
        }
    }

    #[test]
    fn resolves_known_state_from_first_order() {
        let result = lookup(
            Some(orders(vec![order(Some("Created")), order(Some("Cancelled"))])),
            Some(200),
        )
        .resolve_state();
        assert_eq!(result, FulfillmentState::Known("Created".to_owned()));
    }

    #[test]
    fn resolves_missing_state_field() {
        let result = lookup(Some(orders(vec![order(None)])), Some(200)).resolve_state();
        assert_eq!(result, FulfillmentState::NotFound);
    }

    #[test]
    fn resolves_empty_data_list() {
        let result = lookup(Some(orders(vec![])), Some(200)).resolve_state();
        assert_eq!(result, FulfillmentState::Empty);
    }

    #[test]
    fn resolves_api_error_from_status() {
        let result = lookup(None, Some(401)).resolve_state();
        assert_eq!(result, FulfillmentState::ApiError(401));
    }

    #[test]
    fn resolves_unresolved_when_nothing_returned() {
        let result = lookup(None, None).resolve_state();
        assert_eq!(result, FulfillmentState::Unresolved);
    }
}
