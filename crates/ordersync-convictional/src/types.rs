use serde::Deserialize;

/// Response envelope for the orders search endpoint.
///
/// `next` is an absolute URL the server supplies for page 2 onward; it is
/// followed verbatim with no query parameters re-attached. A truthy `error`
/// terminates pagination with whatever has been accumulated.
#[derive(Debug, Clone, Deserialize)]
pub struct OrdersEnvelope {
    #[serde(default)]
    pub data: Option<OrdersData>,
    #[serde(default)]
    pub has_more: bool,
    #[serde(default)]
    pub next: Option<String>,
    #[serde(default)]
    pub error: Option<bool>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct OrdersData {
    #[serde(default)]
    pub orders: Vec<ConvictionalOrder>,
}

/// One order as returned by the search endpoint.
#[derive(Debug, Clone, Deserialize)]
pub struct ConvictionalOrder {
    #[serde(rename = "_id")]
    pub id: String,
    /// The cross-system join key. Orders without one are dropped by the
    /// reconciliation pipeline.
    #[serde(rename = "buyerOrderCode", default)]
    pub buyer_order_code: Option<String>,
    #[serde(rename = "flaggedMessage", default)]
    pub flagged_message: String,
    #[serde(default)]
    pub items: Vec<OrderItem>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct OrderItem {
    #[serde(rename = "buyerItemCode", default)]
    pub buyer_item_code: Option<String>,
}

impl ConvictionalOrder {
    /// Joins the line items' SKU references with `"; "`, skipping items
    /// without one.
    #[must_use]
    pub fn buyer_item_codes(&self) -> String {
        self.items
            .iter()
            .filter_map(|item| item.buyer_item_code.as_deref())
            .filter(|code| !code.is_empty())
            .collect::<Vec<_>>()
            .join("; ")
    }
}
