//! Builders wiring the application config into the API clients.

use ordersync_convictional::ConvictionalClient;
use ordersync_core::AppConfig;
use ordersync_flip::{FlipClient, FlipClientConfig, OauthTokenProvider};
use ordersync_looker::LookerClient;

/// Pause before retrying the Flip status lookup after a 401.
const AUTH_RETRY_DELAY_MS: u64 = 1_000;
/// Pause before retrying the Flip status lookup after a transport failure.
const TRANSPORT_RETRY_DELAY_MS: u64 = 2_000;

pub(crate) fn build_convictional_client(config: &AppConfig) -> anyhow::Result<ConvictionalClient> {
    Ok(ConvictionalClient::new(
        &config.convictional_api_token,
        &config.convictional_base_url,
        &config.convictional_orders_search_path,
        config.request_timeout_secs,
        config.page_delay_ms,
    )?)
}

pub(crate) fn build_flip_client(
    config: &AppConfig,
) -> anyhow::Result<FlipClient<OauthTokenProvider>> {
    let provider = OauthTokenProvider::new(
        &config.flip_auth_token_url,
        &config.flip_auth_client_id,
        &config.flip_auth_client_secret,
        config.request_timeout_secs,
    )?;
    let client_config = FlipClientConfig {
        base_url: config.flip_base_url.clone(),
        orders_path: config.flip_orders_path.clone(),
        disable_skus_path: config.flip_disable_skus_path.clone(),
        cancel_order_path: config.flip_cancel_order_path.clone(),
        tools_header: config.flip_tools_header.clone(),
        page_limit: config.flip_page_limit,
        max_retries: config.flip_max_retries,
        timeout_secs: config.request_timeout_secs,
        auth_retry_delay_ms: AUTH_RETRY_DELAY_MS,
        transport_retry_delay_ms: TRANSPORT_RETRY_DELAY_MS,
    };
    Ok(FlipClient::new(client_config, provider)?)
}

pub(crate) fn build_looker_client(config: &AppConfig) -> anyhow::Result<LookerClient> {
    let (Some(base_url), Some(client_id), Some(client_secret)) = (
        config.looker_base_url.as_deref(),
        config.looker_client_id.as_deref(),
        config.looker_client_secret.as_deref(),
    ) else {
        anyhow::bail!(
            "Looker is not configured; set LOOKER_BASE_URL, LOOKER_CLIENT_ID and LOOKER_CLIENT_SECRET"
        );
    };
    Ok(LookerClient::new(
        base_url,
        client_id,
        client_secret,
        config.request_timeout_secs,
    )?)
}
