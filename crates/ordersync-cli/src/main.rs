//! Batch CLI reconciling flagged Convictional orders against Flip.
//!
//! Each subcommand is one step of the nightly pipeline; `run-all` (also the
//! default when no subcommand is given) chains all four in order. Per-unit
//! failures inside a step are logged and skipped; a step only fails as a
//! whole on a fatal precondition such as an unobtainable Flip token.

mod cancel;
mod clients;
mod flagged;
mod runlock;
mod skus;
mod soid;

use clap::{Parser, Subcommand};
use ordersync_core::AppConfig;
use tracing_subscriber::EnvFilter;

#[derive(Debug, Parser)]
#[command(name = "ordersync")]
#[command(about = "Flagged-order reconciliation between Convictional and Flip")]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Fetch flagged Convictional orders, reconcile against Flip, write the report
    ProcessFlagged,
    /// Disable SKUs listed in the report whose flag message warrants it
    DisableSkus,
    /// Cancel Flip orders listed in the report whose flag message warrants it
    CancelFlagged,
    /// Cancel Flip orders missing a seller order id, per the Looker report
    CancelSoid,
    /// Run all four steps in order
    RunAll,
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    let config = ordersync_core::load_config_from_env()?;
    let env_filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(config.log_level.clone()))?;
    tracing_subscriber::fmt().with_env_filter(env_filter).init();

    let cli = Cli::parse();
    match cli.command.unwrap_or(Commands::RunAll) {
        Commands::ProcessFlagged => {
            let _lock = runlock::RunLock::acquire(&config.report_path)?;
            flagged::process_flagged_orders(&config).await?;
        }
        Commands::DisableSkus => skus::disable_flagged_skus(&config).await?,
        Commands::CancelFlagged => cancel::cancel_flagged_orders(&config).await?,
        Commands::CancelSoid => soid::cancel_soid_orders(&config).await?,
        Commands::RunAll => run_all(&config).await?,
    }

    Ok(())
}

async fn run_all(config: &AppConfig) -> anyhow::Result<()> {
    tracing::info!("=== starting order and SKU disablement pipeline ===");
    let _lock = runlock::RunLock::acquire(&config.report_path)?;

    tracing::info!("step 1: fetch and reconcile flagged orders");
    flagged::process_flagged_orders(config).await?;

    tracing::info!("step 2: disable SKUs based on flag messages");
    skus::disable_flagged_skus(config).await?;

    tracing::info!("step 3: cancel orders based on flag messages");
    cancel::cancel_flagged_orders(config).await?;

    tracing::info!("step 4: cancel orders missing a seller order id");
    soid::cancel_soid_orders(config).await?;

    tracing::info!("=== full processing pipeline completed ===");
    Ok(())
}
