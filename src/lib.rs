//! Per-seller settlement reporting for marketplace invoiced orders.
//!
//! Retrieves the previous day's invoiced orders from the platform's
//! order-management API, flattens them into per-seller settlement rows
//! (amount splitting, installment expansion, deduplication), and
//! distributes one CSV report per seller by email.

pub mod client;
pub mod config;
pub mod error;
pub mod models;
pub mod notify;
pub mod pipeline;
pub mod report;
pub mod rows;
pub mod sellers;
pub mod window;

pub use error::{RemitError, Result};
