//! The flagged-order reconciliation pipeline.
//!
//! Fetches flagged Convictional orders for the yesterday/today window,
//! resolves each one's Flip fulfillment state, keeps the rows whose state
//! matches the configured allow-listed value, and overwrites the report.
//! Output preserves the source order sequence; duplicate buyer order codes
//! are not deduplicated.

use ordersync_convictional::{ConvictionalClient, ConvictionalOrder};
use ordersync_core::{report, AppConfig, FetchWindow, FulfillmentState, ReconciledRow};
use ordersync_flip::{FlipClient, TokenProvider};

use crate::clients;

pub(crate) async fn process_flagged_orders(config: &AppConfig) -> anyhow::Result<()> {
    tracing::info!("--- starting processing of flagged orders ---");

    let window = FetchWindow::yesterday_to_today();
    let (after, before) = window.bounds(config.window_start_time, config.window_end_time);
    tracing::info!(%after, %before, "using date window");

    let convictional = clients::build_convictional_client(config)?;
    let flip = clients::build_flip_client(config)?;

    let rows = reconcile(
        &convictional,
        &flip,
        &after,
        &before,
        &config.allowed_flip_state,
    )
    .await;

    if rows.is_empty() {
        tracing::info!("no flagged orders met the required Flip state");
        if config.report_path.exists() {
            report::clear_report(&config.report_path)?;
            tracing::info!(
                path = %config.report_path.display(),
                "cleared existing report data"
            );
        }
    } else {
        report::overwrite_report(&config.report_path, &rows)?;
    }

    tracing::info!("--- finished processing flagged orders ---");
    Ok(())
}

/// Fetches flagged orders in the window and cross-references each against
/// Flip, returning the rows whose resolved state matches `allowed_state`.
async fn reconcile<P: TokenProvider>(
    convictional: &ConvictionalClient,
    flip: &FlipClient<P>,
    after: &str,
    before: &str,
    allowed_state: &str,
) -> Vec<ReconciledRow> {
    let orders = convictional.fetch_orders(after, before, true).await;
    if orders.is_empty() {
        tracing::info!("no flagged orders fetched for this window");
        return Vec::new();
    }

    let mut rows: Vec<ReconciledRow> = Vec::new();
    for order in &orders {
        let Some(buyer_order_code) = order
            .buyer_order_code
            .as_deref()
            .filter(|code| !code.is_empty())
        else {
            tracing::warn!(order_id = %order.id, "skipping order: missing buyer order code");
            continue;
        };

        tracing::info!(order_id = %order.id, buyer_order_code, "checking Flip status");
        let lookup = flip.lookup_order_status(buyer_order_code).await;
        let state = lookup.resolve_state();

        if state.is_allowed(allowed_state) {
            tracing::info!(
                order_id = %order.id,
                state = %state,
                "state matched the allow-listed value; row will be saved"
            );
            rows.push(build_row(order, buyer_order_code, &state));
        } else {
            tracing::info!(
                order_id = %order.id,
                state = %state,
                allowed = allowed_state,
                "state did not match; row skipped"
            );
        }
    }
    rows
}

fn build_row(
    order: &ConvictionalOrder,
    buyer_order_code: &str,
    state: &FulfillmentState,
) -> ReconciledRow {
    ReconciledRow {
        convictional_order_id: order.id.clone(),
        flagged_message: order.flagged_message.clone(),
        buyer_order_code: buyer_order_code.to_owned(),
        flip_order_state: state.to_string(),
        buyer_item_codes: order.buyer_item_codes(),
    }
}
