//! Disables SKUs for report rows whose flag message warrants it.

use ordersync_core::{report, AppConfig};
use ordersync_flip::AuditStatus;

use crate::clients;

/// Decides whether a flag message calls for disabling the row's SKUs, and
/// with which audit status. Matching is a case-insensitive substring check
/// against the two known messages; the variant-with-components message wins
/// when both appear.
pub(crate) fn classify_flagged_message(message: &str) -> Option<AuditStatus> {
    let normalized = message.trim().to_lowercase();
    if normalized.contains("cannot be a variant with components") {
        Some(AuditStatus::UnsupportedBundle)
    } else if normalized.contains("item is out of stock unexpectedly") {
        Some(AuditStatus::Connectivity)
    } else {
        None
    }
}

/// Splits the `;`-joined SKU column back into individual codes.
pub(crate) fn split_skus(codes: &str) -> Vec<&str> {
    codes
        .split(';')
        .map(str::trim)
        .filter(|sku| !sku.is_empty())
        .collect()
}

pub(crate) async fn disable_flagged_skus(config: &AppConfig) -> anyhow::Result<()> {
    let flip = clients::build_flip_client(config)?;
    let token = match flip.fetch_token().await {
        Ok(token) => token,
        Err(err) => {
            tracing::error!(error = %err, "could not obtain Flip access token; skipping SKU disablement");
            return Ok(());
        }
    };

    let rows = match report::read_report(&config.report_path) {
        Ok(rows) => rows,
        Err(err) => {
            tracing::error!(
                path = %config.report_path.display(),
                error = %err,
                "failed to read report; skipping SKU disablement"
            );
            return Ok(());
        }
    };
    tracing::info!(rows = rows.len(), "read report for SKU disablement");

    for row in &rows {
        let Some(audit_status) = classify_flagged_message(&row.flagged_message) else {
            tracing::info!(
                order_id = %row.convictional_order_id,
                "flag message does not meet disable criteria; skipping row"
            );
            continue;
        };

        for sku in split_skus(&row.buyer_item_codes) {
            if let Err(err) = flip.disable_sku(&token, sku, audit_status).await {
                tracing::error!(sku, error = %err, "failed to disable SKU");
            }
        }
    }

    Ok(())
}
