pub mod app_config;
pub mod config;
pub mod report;
pub mod state;
pub mod window;

use thiserror::Error;

pub use app_config::AppConfig;
pub use config::{load_config, load_config_from_env};
pub use report::{ReconciledRow, ReportError, REPORT_HEADER};
pub use state::FulfillmentState;
pub use window::FetchWindow;

/// Errors raised while loading configuration from the environment.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("missing required environment variable: {0}")]
    MissingEnvVar(String),

    #[error("invalid value for environment variable {var}: {reason}")]
    InvalidEnvVar { var: String, reason: String },
}
