use std::path::PathBuf;

use chrono::NaiveTime;

/// Process-wide configuration, loaded once at startup and threaded into each
/// component's constructor.
#[derive(Clone)]
pub struct AppConfig {
    pub convictional_api_token: String,
    pub convictional_base_url: String,
    pub convictional_orders_search_path: String,
    pub flip_base_url: String,
    pub flip_orders_path: String,
    pub flip_disable_skus_path: String,
    pub flip_cancel_order_path: String,
    pub flip_tools_header: String,
    pub flip_auth_token_url: String,
    pub flip_auth_client_id: String,
    pub flip_auth_client_secret: String,
    pub flip_max_retries: u32,
    pub flip_page_limit: u32,
    pub allowed_flip_state: String,
    pub report_path: PathBuf,
    pub log_level: String,
    pub request_timeout_secs: u64,
    pub page_delay_ms: u64,
    pub window_start_time: NaiveTime,
    pub window_end_time: NaiveTime,
    pub looker_base_url: Option<String>,
    pub looker_client_id: Option<String>,
    pub looker_client_secret: Option<String>,
    pub looker_look_id: String,
}

impl std::fmt::Debug for AppConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppConfig")
            .field("convictional_api_token", &"[redacted]")
            .field("convictional_base_url", &self.convictional_base_url)
            .field(
                "convictional_orders_search_path",
                &self.convictional_orders_search_path,
            )
            .field("flip_base_url", &self.flip_base_url)
            .field("flip_orders_path", &self.flip_orders_path)
            .field("flip_disable_skus_path", &self.flip_disable_skus_path)
            .field("flip_cancel_order_path", &self.flip_cancel_order_path)
            .field("flip_tools_header", &self.flip_tools_header)
            .field("flip_auth_token_url", &self.flip_auth_token_url)
            .field("flip_auth_client_id", &self.flip_auth_client_id)
            .field("flip_auth_client_secret", &"[redacted]")
            .field("flip_max_retries", &self.flip_max_retries)
            .field("flip_page_limit", &self.flip_page_limit)
            .field("allowed_flip_state", &self.allowed_flip_state)
            .field("report_path", &self.report_path)
            .field("log_level", &self.log_level)
            .field("request_timeout_secs", &self.request_timeout_secs)
            .field("page_delay_ms", &self.page_delay_ms)
            .field("window_start_time", &self.window_start_time)
            .field("window_end_time", &self.window_end_time)
            .field("looker_base_url", &self.looker_base_url)
            .field("looker_client_id", &self.looker_client_id)
            .field(
                "looker_client_secret",
                &self.looker_client_secret.as_ref().map(|_| "[redacted]"),
            )
            .field("looker_look_id", &self.looker_look_id)
            .finish()
    }
}
