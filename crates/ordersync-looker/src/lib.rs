//! Client for the Looker reporting API.
//!
//! Only what the SOID-cancellation flow needs: authenticate with API
//! credentials and run a saved look, returning its rows as JSON objects.

pub mod client;
pub mod error;

pub use client::LookerClient;
pub use error::LookerError;
