use std::time::Duration;

use reqwest::header::{ACCEPT, AUTHORIZATION, CONTENT_TYPE};
use reqwest::{Client, Url};

use crate::error::ConvictionalError;
use crate::types::{ConvictionalOrder, OrdersEnvelope};

/// Maximum number of pages to follow before giving up on a `next` chain.
/// Prevents infinite loops on cycling continuation URLs; hitting the cap
/// terminates with the orders accumulated so far.
const MAX_PAGES: usize = 500;

/// Client for the Convictional order-management API.
///
/// Auth is a static bearer-style token sent in the `Authorization` header.
/// Use [`ConvictionalClient::new`] for production or point `base_url` at a
/// mock server in tests.
pub struct ConvictionalClient {
    http: Client,
    token: String,
    search_url: Url,
    page_delay: Duration,
}

impl ConvictionalClient {
    /// Creates a client for the orders search endpoint at
    /// `{base_url}{search_path}`.
    ///
    /// `page_delay_ms` is the pause between successful page fetches.
    ///
    /// # Errors
    ///
    /// Returns [`ConvictionalError::Http`] if the underlying `reqwest::Client`
    /// cannot be constructed, or [`ConvictionalError::InvalidUrl`] if the
    /// joined URL does not parse.
    pub fn new(
        token: &str,
        base_url: &str,
        search_path: &str,
        timeout_secs: u64,
        page_delay_ms: u64,
    ) -> Result<Self, ConvictionalError> {
        let http = Client::builder()
            .timeout(Duration::from_secs(timeout_secs))
            .connect_timeout(Duration::from_secs(10))
            .user_agent("ordersync/0.1 (order-reconciliation)")
            .build()?;

        let joined = format!("{}{search_path}", base_url.trim_end_matches('/'));
        let search_url = Url::parse(&joined).map_err(|e| ConvictionalError::InvalidUrl {
            url: joined,
            reason: e.to_string(),
        })?;

        Ok(Self {
            http,
            token: token.to_owned(),
            search_url,
            page_delay: Duration::from_millis(page_delay_ms),
        })
    }

    /// Fetches every order matching the date window and flagged filter,
    /// following server-supplied `next` URLs until exhaustion.
    ///
    /// This is infallible by design: any transport error, non-2xx status, or
    /// decode failure aborts pagination and returns the orders accumulated
    /// from earlier pages. A truthy `error` field in the envelope terminates
    /// the same way. The first request carries the full query parameter set;
    /// every subsequent request uses the `next` URL verbatim.
    pub async fn fetch_orders(
        &self,
        created_after: &str,
        created_before: &str,
        flagged: bool,
    ) -> Vec<ConvictionalOrder> {
        let flagged_value = if flagged { "true" } else { "false" };
        let params = [
            ("createdAt[after]", created_after),
            ("createdAt[before]", created_before),
            ("filters[flagged]", flagged_value),
        ];
        tracing::info!(
            created_after,
            created_before,
            flagged,
            "starting Convictional order fetch"
        );

        let mut all_orders: Vec<ConvictionalOrder> = Vec::new();
        let mut next_url = self.search_url.to_string();
        let mut page = 1usize;

        loop {
            if page > MAX_PAGES {
                tracing::warn!(
                    max_pages = MAX_PAGES,
                    accumulated = all_orders.len(),
                    "page cap reached; stopping with accumulated orders"
                );
                break;
            }

            let first_page = page == 1;
            let result = self
                .fetch_page(&next_url, first_page.then_some(&params[..]))
                .await;
            let envelope = match result {
                Ok(envelope) => envelope,
                Err(err) => {
                    tracing::error!(
                        page,
                        accumulated = all_orders.len(),
                        error = %err,
                        "aborting pagination; keeping accumulated orders"
                    );
                    break;
                }
            };

            if envelope.error.unwrap_or(false) {
                tracing::warn!(
                    page,
                    accumulated = all_orders.len(),
                    "source reported an error envelope; stopping"
                );
                break;
            }

            let orders = envelope.data.map(|d| d.orders).unwrap_or_default();
            if orders.is_empty() {
                tracing::info!(page, "no orders on page");
            } else {
                tracing::info!(page, count = orders.len(), "fetched page");
                all_orders.extend(orders);
            }

            if !envelope.has_more {
                tracing::info!(page, "no more pages");
                break;
            }
            match envelope.next {
                Some(next) => {
                    next_url = next;
                    page += 1;
                    if !self.page_delay.is_zero() {
                        tokio::time::sleep(self.page_delay).await;
                    }
                }
                None => {
                    tracing::warn!(page, "has_more set but next URL missing; stopping");
                    break;
                }
            }
        }

        tracing::info!(
            total = all_orders.len(),
            flagged,
            "finished Convictional order fetch"
        );
        all_orders
    }

    /// Fetches a single page. Query parameters are attached only when
    /// `params` is `Some` (the first page); continuation URLs already encode
    /// the server's own state.
    async fn fetch_page(
        &self,
        url: &str,
        params: Option<&[(&str, &str)]>,
    ) -> Result<OrdersEnvelope, ConvictionalError> {
        let mut request = self
            .http
            .get(url)
            .header(ACCEPT, "application/json")
            .header(CONTENT_TYPE, "application/json")
            .header(AUTHORIZATION, &self.token);
        if let Some(params) = params {
            request = request.query(params);
        }

        let response = request.send().await?;
        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(ConvictionalError::UnexpectedStatus {
                status: status.as_u16(),
                body,
            });
        }

        let body = response.text().await?;
        serde_json::from_str(&body).map_err(|e| ConvictionalError::Deserialize {
            context: url.to_owned(),
            source: e,
        })
    }
}
