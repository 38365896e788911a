use serde::{Deserialize, Serialize};

/// Response envelope for the Flip orders lookup.
#[derive(Debug, Clone, Deserialize)]
pub struct FlipOrdersResponse {
    #[serde(default)]
    pub data: Vec<FlipOrder>,
}

/// One fulfillment order. The `id` is Flip's own identifier, distinct from
/// the buyer order code used to find it.
#[derive(Debug, Clone, Deserialize)]
pub struct FlipOrder {
    #[serde(default)]
    pub id: Option<String>,
    #[serde(default)]
    pub state: Option<String>,
}

/// Audit status attached when disabling a SKU.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum AuditStatus {
    Connectivity,
    UnsupportedBundle,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct DisableSkusRequest<'a> {
    pub skus: [&'a str; 1],
    pub audit_status: AuditStatus,
}

/// Fixed cancellation body: items are not returned to the cart, and sibling
/// orders are left alone.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct CancelOrderRequest {
    pub items_back_to_cart: bool,
    pub reason_for_cancellation: &'static str,
    pub should_cancel_additional_orders: bool,
}

impl CancelOrderRequest {
    pub(crate) fn integration_failure() -> Self {
        Self {
            items_back_to_cart: false,
            reason_for_cancellation: "integrationFailure",
            should_cancel_additional_orders: false,
        }
    }
}

#[derive(Debug, Deserialize)]
pub(crate) struct CancelResponse {
    #[serde(default)]
    pub data: Option<CancelData>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct CancelData {
    #[serde(default)]
    pub result: Option<String>,
}
