use std::path::PathBuf;

use chrono::NaiveTime;

use crate::app_config::AppConfig;
use crate::ConfigError;

/// Format accepted for the window time-of-day overrides, e.g. `08:00:00.000`.
const TIME_OF_DAY_FORMAT: &str = "%H:%M:%S%.3f";

/// Load application configuration from environment variables.
///
/// Calls `dotenvy::dotenv().ok()` to load `.env` files before reading env vars.
///
/// # Errors
///
/// Returns `ConfigError` if required env vars are missing or values are invalid.
pub fn load_config() -> Result<AppConfig, ConfigError> {
    dotenvy::dotenv().ok();
    load_config_from_env()
}

/// Load application configuration from environment variables already in the process.
///
/// Unlike [`load_config`], this does NOT load `.env` files — useful for testing
/// or when the caller manages env setup.
///
/// # Errors
///
/// Returns `ConfigError` if required env vars are missing or values are invalid.
pub fn load_config_from_env() -> Result<AppConfig, ConfigError> {
    build_config(|key| std::env::var(key))
}

/// Build application configuration using the provided env-var lookup function.
///
/// This is the core parsing/validation logic, decoupled from the actual
/// environment so it can be tested with a pure `HashMap` lookup — no
/// `set_var`/`remove_var` needed.
fn build_config<F>(lookup: F) -> Result<AppConfig, ConfigError>
where
    F: Fn(&str) -> Result<String, std::env::VarError>,
{
    let require = |var: &str| -> Result<String, ConfigError> {
        lookup(var).map_err(|_| ConfigError::MissingEnvVar(var.to_string()))
    };

    let or_default = |var: &str, default: &str| -> String {
        lookup(var).unwrap_or_else(|_| default.to_string())
    };

    let parse_u32 = |var: &str, default: &str| -> Result<u32, ConfigError> {
        let raw = or_default(var, default);
        raw.parse::<u32>().map_err(|e| ConfigError::InvalidEnvVar {
            var: var.to_string(),
            reason: e.to_string(),
        })
    };

    let parse_u64 = |var: &str, default: &str| -> Result<u64, ConfigError> {
        let raw = or_default(var, default);
        raw.parse::<u64>().map_err(|e| ConfigError::InvalidEnvVar {
            var: var.to_string(),
            reason: e.to_string(),
        })
    };

    let parse_time = |var: &str, default: &str| -> Result<NaiveTime, ConfigError> {
        let raw = or_default(var, default);
        NaiveTime::parse_from_str(&raw, TIME_OF_DAY_FORMAT).map_err(|e| {
            ConfigError::InvalidEnvVar {
                var: var.to_string(),
                reason: e.to_string(),
            }
        })
    };

    let convictional_api_token = require("CONVICTIONAL_API_TOKEN")?;
    let convictional_base_url = require("CONVICTIONAL_API_BASE_URL")?;
    let convictional_orders_search_path = require("CONVICTIONAL_ORDERS_SEARCH_PATH")?;

    let flip_base_url = require("FLIP_BASE_URL")?;
    let flip_orders_path = require("FLIP_ORDERS_PATH")?;
    let flip_disable_skus_path = require("FLIP_DISABLE_SKUS_PATH")?;
    let flip_cancel_order_path = or_default(
        "FLIP_CANCEL_ORDERS_PATH",
        "/shop/admin/orders/{order_id}/cancel/v1",
    );
    let flip_tools_header = require("X_FLIPINATOR_TOOLS")?;
    let flip_auth_token_url = require("FLIP_AUTH_TOKEN_URL")?;
    let flip_auth_client_id = require("FLIP_AUTH_CLIENT_ID")?;
    let flip_auth_client_secret = require("FLIP_AUTH_CLIENT_SECRET")?;
    let flip_max_retries = parse_u32("MAX_RETRIES_FLIP", "1")?;
    let flip_page_limit = parse_u32("ORDERSYNC_FLIP_PAGE_LIMIT", "250")?;

    let allowed_flip_state = require("ALLOWED_FLIP_STATE")?;

    let report_path = PathBuf::from(or_default("ORDERSYNC_REPORT_PATH", "flagged_orders.csv"));
    let log_level = or_default("ORDERSYNC_LOG_LEVEL", "info");
    let request_timeout_secs = parse_u64("ORDERSYNC_REQUEST_TIMEOUT_SECS", "30")?;
    let page_delay_ms = parse_u64("ORDERSYNC_PAGE_DELAY_MS", "500")?;
    let window_start_time = parse_time("ORDERSYNC_WINDOW_START_TIME", "08:00:00.000")?;
    let window_end_time = parse_time("ORDERSYNC_WINDOW_END_TIME", "19:32:01.584")?;

    let looker_base_url = lookup("LOOKER_BASE_URL").ok();
    let looker_client_id = lookup("LOOKER_CLIENT_ID").ok();
    let looker_client_secret = lookup("LOOKER_CLIENT_SECRET").ok();
    let looker_look_id = or_default("LOOKER_LOOK_ID", "851");

    Ok(AppConfig {
        convictional_api_token,
        convictional_base_url,
        convictional_orders_search_path,
        flip_base_url,
        flip_orders_path,
        flip_disable_skus_path,
        flip_cancel_order_path,
        flip_tools_header,
        flip_auth_token_url,
        flip_auth_client_id,
        flip_auth_client_secret,
        flip_max_retries,
        flip_page_limit,
        allowed_flip_state,
        report_path,
        log_level,
        request_timeout_secs,
        page_delay_ms,
        window_start_time,
        window_end_time,
        looker_base_url,
        looker_client_id,
        looker_client_secret,
        looker_look_id,
    })
}
