//! Settlement row derivation.
//!
//! Flattens one order detail into zero or more [`SettlementRow`]s for a
//! configured seller: membership check against the order's participants,
//! minor-unit amount extraction, and one row per payment on an active
//! transaction (capped, with a placeholder when no payment qualifies).

use std::collections::{HashMap, HashSet};
use std::sync::Mutex;

use chrono::{DateTime, FixedOffset};
use rust_decimal::Decimal;
use serde::Serialize;

use crate::models::order::{OrderDetail, OrderTotal};
use crate::sellers::SellerConfig;
use crate::window::local_offset;

/// At most this many rows are emitted per order, however many payments it has.
const MAX_ROWS_PER_ORDER: usize = 2;

/// One flattened settlement record, the unit written to the report artifact.
///
/// Rows are compared on all fields for deduplication; there is no synthetic
/// key. Field order here is the artifact column order.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub struct SettlementRow {
    /// Invoiced date rendered as `DD/MM/YYYY` in the fixed local offset.
    pub invoiced_date: String,
    pub order_id: String,
    /// Normalized numeric core of the composite seller-order id; may be empty.
    pub seller_order: String,
    pub status: String,
    pub seller: String,
    pub shipping: Decimal,
    pub items: Decimal,
    pub total: Decimal,
    pub installments: Option<u32>,
}

/// Short-date formatter with a memo keyed by the raw input string.
///
/// The same invoiced-date string recurs across an order's payment rows and
/// across listing pages, so formatting is memoized. The memo is owned here
/// and injected into derivation; the lock keeps it safe if derivation is
/// ever parallelized.
pub struct DateFormatter {
    offset: FixedOffset,
    cache: Mutex<HashMap<String, String>>,
}

impl DateFormatter {
    pub fn new() -> Self {
        DateFormatter {
            offset: local_offset(),
            cache: Mutex::new(HashMap::new()),
        }
    }

    /// Renders an ISO-8601 timestamp as `DD/MM/YYYY` in the fixed offset.
    ///
    /// Anything that does not parse comes back unchanged; a malformed date
    /// in one order must not sink the whole report.
    pub fn short_date(&self, raw: &str) -> String {
        if raw.is_empty() {
            return String::new();
        }
        let mut cache = self.cache.lock().expect("date cache lock poisoned");
        if let Some(hit) = cache.get(raw) {
            return hit.clone();
        }
        let rendered = match DateTime::parse_from_rfc3339(raw) {
            Ok(parsed) => parsed
                .with_timezone(&self.offset)
                .format("%d/%m/%Y")
                .to_string(),
            Err(_) => raw.to_string(),
        };
        cache.insert(raw.to_string(), rendered.clone());
        rendered
    }
}

impl Default for DateFormatter {
    fn default() -> Self {
        Self::new()
    }
}

/// Derives the settlement rows one order contributes for one seller.
///
/// Returns empty when the seller does not participate in the order: the
/// listing filters by seller *name*, and names can collide or drift from
/// ids, so membership is re-checked against ids here.
pub fn derive_rows(
    order: &OrderDetail,
    seller: &SellerConfig,
    dates: &DateFormatter,
) -> Vec<SettlementRow> {
    if !order.sellers.iter().any(|s| s.id == seller.id) {
        return Vec::new();
    }

    let shipping = total_by_id(&order.totals, "Shipping");
    let items = total_by_id(&order.totals, "Items");

    let mut installment_counts: Vec<Option<u32>> = order
        .payment_data
        .transactions
        .iter()
        .filter(|tx| tx.is_active)
        .flat_map(|tx| tx.payments.iter().map(|payment| payment.installments))
        .collect();
    if installment_counts.is_empty() {
        // No active payment on the order; it still settles as one row.
        installment_counts.push(None);
    }
    installment_counts.truncate(MAX_ROWS_PER_ORDER);

    let invoiced_date = dates.short_date(order.invoiced_date.as_deref().unwrap_or(""));
    let seller_order =
        normalize_seller_order_id(order.seller_order_id.as_deref().unwrap_or(""));
    let status = order.status_description.clone().unwrap_or_default();

    installment_counts
        .into_iter()
        .map(|installments| SettlementRow {
            invoiced_date: invoiced_date.clone(),
            order_id: order.order_id.clone(),
            seller_order: seller_order.clone(),
            status: status.clone(),
            seller: seller.display.clone(),
            shipping,
            items,
            total: shipping + items,
            installments,
        })
        .collect()
}

/// Looks up a named total and converts minor units to currency units.
///
/// Absent entries contribute zero rather than failing the order.
fn total_by_id(totals: &[OrderTotal], id: &str) -> Decimal {
    totals
        .iter()
        .find(|total| total.id == id)
        .map(|total| Decimal::new(total.value, 2))
        .unwrap_or(Decimal::ZERO)
}

/// Extracts the numeric core of a composite seller-order identifier.
///
/// Takes the second-to-last hyphen-separated segment, strips non-digits,
/// and keeps the trailing 7 digits. Anything shorter (fewer than two
/// segments, or fewer than 7 digits) normalizes to the empty string.
pub fn normalize_seller_order_id(raw: &str) -> String {
    let segments: Vec<&str> = raw.split('-').collect();
    if segments.len() < 2 {
        return String::new();
    }
    let digits: String = segments[segments.len() - 2]
        .chars()
        .filter(char::is_ascii_digit)
        .collect();
    if digits.len() < 7 {
        return String::new();
    }
    digits[digits.len() - 7..].to_string()
}

/// Drops fully-identical duplicate rows, keeping first occurrences in order.
pub fn dedup_rows(rows: Vec<SettlementRow>) -> Vec<SettlementRow> {
    let mut seen = HashSet::new();
    rows.into_iter()
        .filter(|row| seen.insert(row.clone()))
        .collect()
}

/// Sorts rows by order id, then installment count with `None` first.
pub fn sort_rows(rows: &mut [SettlementRow]) {
    rows.sort_by(|a, b| {
        a.order_id
            .cmp(&b.order_id)
            .then(a.installments.cmp(&b.installments))
    });
}
