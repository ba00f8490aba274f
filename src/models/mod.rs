//! Wire models for the OMS API.
//!
//! Contains the paginated order-search listing types; the full order detail
//! payload lives in [`order`].

pub mod order;

use serde::Deserialize;

/// One record from the order-search listing.
///
/// The listing returns a richer summary, but only the order id feeds the
/// detail fetch, so nothing else is decoded.
#[derive(Debug, Clone, Deserialize)]
pub struct OrderSummary {
    #[serde(rename = "orderId")]
    pub order_id: String,
}

/// One page of the order-search endpoint.
#[derive(Debug, Clone, Deserialize)]
pub struct OrderListResponse {
    #[serde(default)]
    pub list: Vec<OrderSummary>,
    #[serde(default)]
    pub paging: Option<ListPaging>,
}

/// Paging block echoed back by the listing endpoint.
///
/// Informational only: pagination terminates on a short or empty page, not
/// on the advertised totals.
#[derive(Debug, Clone, Deserialize)]
pub struct ListPaging {
    #[serde(default)]
    pub total: Option<i64>,
    #[serde(default)]
    pub pages: Option<i64>,
    #[serde(rename = "currentPage", default)]
    pub current_page: Option<i64>,
    #[serde(rename = "perPage", default)]
    pub per_page: Option<i64>,
}
