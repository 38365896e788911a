//! Cancels Flip orders for report rows whose flag message warrants it.

use ordersync_core::{report, AppConfig};

use crate::clients;
use crate::skus::classify_flagged_message;

pub(crate) async fn cancel_flagged_orders(config: &AppConfig) -> anyhow::Result<()> {
    let flip = clients::build_flip_client(config)?;
    // No cancellation work is possible without a token, so this one is fatal.
    let token = flip
        .fetch_token()
        .await
        .map_err(|err| anyhow::anyhow!("failed to retrieve Flip access token: {err}"))?;

    let rows = match report::read_report(&config.report_path) {
        Ok(rows) => rows,
        Err(err) => {
            tracing::error!(
                path = %config.report_path.display(),
                error = %err,
                "failed to read report; skipping order cancellation"
            );
            return Ok(());
        }
    };
    tracing::info!(rows = rows.len(), "read report for order cancellation");

    for (index, row) in rows.iter().enumerate() {
        if classify_flagged_message(&row.flagged_message).is_none() {
            tracing::info!(index, "flag message does not meet cancel criteria; skipping row");
            continue;
        }

        let buyer_order_code = row.buyer_order_code.trim();
        if buyer_order_code.is_empty() {
            tracing::error!(index, "no buyer order code in row; skipping");
            continue;
        }

        match flip.lookup_order_id(&token, buyer_order_code).await {
            Ok(Some(order_id)) => {
                if let Err(err) = flip.cancel_order(&token, &order_id).await {
                    tracing::error!(order_id, error = %err, "failed to cancel order");
                }
            }
            Ok(None) => {
                tracing::error!(
                    buyer_order_code,
                    "skipping cancellation: no Flip order id found"
                );
            }
            Err(err) => {
                tracing::error!(buyer_order_code, error = %err, "order lookup failed");
            }
        }
    }

    Ok(())
}
