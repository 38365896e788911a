//! Client for the Convictional order-management API.
//!
//! The one operation that matters here is the paginated search for flagged
//! orders. Pagination is partial-success by design: any failure mid-way
//! returns whatever pages were already accumulated instead of erroring.

pub mod client;
pub mod error;
pub mod types;

pub use client::ConvictionalClient;
pub use error::ConvictionalError;
pub use types::{ConvictionalOrder, OrderItem, OrdersData, OrdersEnvelope};
