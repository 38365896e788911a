//! Cancels Flip orders missing a seller order id, driven by a Looker look.

use ordersync_core::AppConfig;

use crate::clients;

/// Field carrying the buyer order code in the look's result rows.
const ORDER_ID_FIELD: &str = "flip_orders_all.orderid";

/// Extracts the buyer order code from one look row, treating a missing,
/// non-string, or empty value as absent.
pub(crate) fn order_code(row: &serde_json::Value) -> Option<&str> {
    row.get(ORDER_ID_FIELD)
        .and_then(serde_json::Value::as_str)
        .filter(|code| !code.is_empty())
}

pub(crate) async fn cancel_soid_orders(config: &AppConfig) -> anyhow::Result<()> {
    tracing::info!("starting SOID cancellation flow");

    let looker = clients::build_looker_client(config)?;
    let rows = looker.run_look(&config.looker_look_id).await?;
    tracing::info!(rows = rows.len(), "extracted look data");

    let flip = clients::build_flip_client(config)?;
    // No cancellation work is possible without a token, so this one is fatal.
    let token = flip
        .fetch_token()
        .await
        .map_err(|err| anyhow::anyhow!("failed to retrieve Flip access token: {err}"))?;

    for row in &rows {
        let Some(code) = order_code(row) else {
            tracing::warn!("empty or missing buyer order code in look row; skipping");
            continue;
        };

        tracing::info!(buyer_order_code = code, "processing buyer order code");
        match flip.lookup_order_id(&token, code).await {
            Ok(Some(order_id)) => {
                if let Err(err) = flip.cancel_order(&token, &order_id).await {
                    tracing::error!(order_id, error = %err, "failed to cancel order");
                }
            }
            Ok(None) => {
                tracing::warn!(
                    buyer_order_code = code,
                    "lookup found no Flip order id; skipping"
                );
            }
            Err(err) => {
                tracing::error!(buyer_order_code = code, error = %err, "order lookup failed");
            }
        }
    }

    tracing::info!("SOID order processing completed");
    Ok(())
}
