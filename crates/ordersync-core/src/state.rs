//! Resolved fulfillment state for a reconciled order.
//!
//! The Flip lookup can land in several terminal conditions besides a real
//! state string. Those sentinel outcomes are data, not errors: they render to
//! fixed labels and participate in the allow-list filter exactly like a real
//! state would.

use std::fmt;

/// The fulfillment-side state resolved for one buyer order code.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FulfillmentState {
    /// A state string returned by the Flip API.
    Known(String),
    /// Flip returned a matching order without a `state` field.
    NotFound,
    /// Flip answered with an empty `data` list — no matching order.
    Empty,
    /// The lookup failed with the given HTTP status.
    ApiError(u16),
    /// The lookup failed without any HTTP status to report.
    Unresolved,
}

impl FulfillmentState {
    /// Exact, case-sensitive comparison of the rendered label against the
    /// configured allow-listed state.
    #[must_use]
    pub fn is_allowed(&self, allowed: &str) -> bool {
        match self {
            Self::Known(state) => state.as_str() == allowed,
            other => other.to_string() == allowed,
        }
    }
}

impl fmt::Display for FulfillmentState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Known(state) => write!(f, "{state}"),
            Self::NotFound => write!(f, "State Not Found"),
            Self::Empty => write!(f, "Flip Data Empty"),
            Self::ApiError(code) => write!(f, "Flip API Error ({code})"),
            Self::Unresolved => write!(f, "Error or Not Found"),
        }
    }
}
