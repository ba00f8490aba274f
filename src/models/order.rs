//! Full order detail payload.
//!
//! Decodes only the slice of the (very large) OMS order document that
//! settlement rows are derived from: participants, named totals, and the
//! payment transactions. Everything else in the body is ignored, and every
//! list defaults to empty so a sparse document still decodes.

use serde::Deserialize;

/// Full record for one order, fetched by id.
#[derive(Debug, Clone, Deserialize)]
pub struct OrderDetail {
    #[serde(rename = "orderId")]
    pub order_id: String,
    #[serde(rename = "invoicedDate", default)]
    pub invoiced_date: Option<String>,
    #[serde(rename = "statusDescription", default)]
    pub status_description: Option<String>,
    /// Composite seller-order identifier, e.g. `"GCB-1069057-01"`.
    #[serde(rename = "sellerOrderId", default)]
    pub seller_order_id: Option<String>,
    #[serde(default)]
    pub sellers: Vec<OrderSeller>,
    #[serde(default)]
    pub totals: Vec<OrderTotal>,
    #[serde(rename = "paymentData", default)]
    pub payment_data: PaymentData,
}

/// A seller participating in the order.
#[derive(Debug, Clone, Deserialize)]
pub struct OrderSeller {
    pub id: String,
    #[serde(default)]
    pub name: Option<String>,
}

/// A named total in minor units (cents), e.g. `{"id": "Shipping", "value": 500}`.
#[derive(Debug, Clone, Deserialize)]
pub struct OrderTotal {
    pub id: String,
    #[serde(default)]
    pub name: Option<String>,
    pub value: i64,
}

/// Payment section of the order document.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct PaymentData {
    #[serde(default)]
    pub transactions: Vec<Transaction>,
}

/// One payment transaction; only active transactions contribute rows.
#[derive(Debug, Clone, Deserialize)]
pub struct Transaction {
    #[serde(rename = "isActive", default)]
    pub is_active: bool,
    #[serde(default)]
    pub payments: Vec<Payment>,
}

/// One payment instrument within a transaction.
#[derive(Debug, Clone, Deserialize)]
pub struct Payment {
    #[serde(default)]
    pub installments: Option<u32>,
    #[serde(rename = "paymentSystemName", default)]
    pub payment_system_name: Option<String>,
}
