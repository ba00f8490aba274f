//! OMS API client: paginated order listing and bounded detail fan-out.
//!
//! A single [`OmsClient`] is built at startup from the loaded configuration
//! and shared across all sellers. Credentials ride as default headers on
//! every request; each request carries the fixed 30 second timeout.

use std::collections::HashMap;
use std::fmt;
use std::time::Duration;

use futures_util::StreamExt;
use futures_util::stream;
use reqwest::header::{CONTENT_TYPE, HeaderMap, HeaderValue};
use tracing::{debug, warn};

use crate::config::OmsConfig;
use crate::models::order::OrderDetail;
use crate::models::{OrderListResponse, OrderSummary};
use crate::window::ReportWindow;

/// Fixed listing page size; a shorter page signals the last one.
const PAGE_SIZE: usize = 100;

/// Per-request timeout applied to every call, listing and detail alike.
const HTTP_TIMEOUT: Duration = Duration::from_secs(30);

/// Credential headers expected by the OMS API.
const APP_KEY_HEADER: &str = "X-VTEX-API-AppKey";
const APP_TOKEN_HEADER: &str = "X-VTEX-API-AppToken";

/// Client for the order-management API.
pub struct OmsClient {
    http: reqwest::Client,
    base_url: String,
    max_workers: usize,
}

/// Why a single order's detail fetch contributed nothing to the batch.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FetchFailureReason {
    /// The request never completed (connect, timeout, broken transfer).
    Transport(String),
    /// The endpoint answered with a non-success status.
    Status(u16),
    /// The body was not a decodable order document.
    Decode(String),
}

/// One dropped order from a detail-fetch batch.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FetchFailure {
    pub order_id: String,
    pub reason: FetchFailureReason,
}

impl fmt::Display for FetchFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.reason {
            FetchFailureReason::Transport(detail) => {
                write!(f, "{}: transport failure: {detail}", self.order_id)
            }
            FetchFailureReason::Status(code) => {
                write!(f, "{}: unexpected status {code}", self.order_id)
            }
            FetchFailureReason::Decode(detail) => {
                write!(f, "{}: undecodable body: {detail}", self.order_id)
            }
        }
    }
}

/// Outcome of a detail-fetch fan-out: the details that arrived, and an
/// explicit record of every order that was dropped.
///
/// Dropping is the policy: a failed fetch is not retried and does not
/// abort its siblings; it is simply absent from that run's output.
#[derive(Debug, Default)]
pub struct DetailBatch {
    pub details: HashMap<String, OrderDetail>,
    pub failures: Vec<FetchFailure>,
}

impl DetailBatch {
    /// Number of orders dropped from this batch.
    pub fn dropped(&self) -> usize {
        self.failures.len()
    }
}

impl OmsClient {
    /// Builds the shared HTTP client with credential headers and timeout.
    ///
    /// # Errors
    ///
    /// Returns [`RemitError::Config`](crate::RemitError::Config) if a
    /// credential contains bytes that cannot form a header value, or
    /// [`RemitError::Http`](crate::RemitError::Http) if the client cannot
    /// be constructed.
    pub fn new(config: &OmsConfig) -> crate::Result<Self> {
        let mut headers = HeaderMap::new();
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
        headers.insert(
            APP_KEY_HEADER,
            HeaderValue::from_str(&config.app_key)
                .map_err(|e| crate::RemitError::Config(format!("invalid app key: {e}")))?,
        );
        headers.insert(
            APP_TOKEN_HEADER,
            HeaderValue::from_str(&config.app_token)
                .map_err(|e| crate::RemitError::Config(format!("invalid app token: {e}")))?,
        );

        let http = reqwest::Client::builder()
            .default_headers(headers)
            .timeout(HTTP_TIMEOUT)
            .build()?;

        Ok(OmsClient {
            http,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            max_workers: config.max_workers,
        })
    }

    /// Lists invoiced-order summaries for one seller across the window.
    ///
    /// Pages through the search endpoint from page 1 until a page comes back
    /// empty or short. A non-success status truncates the listing and
    /// returns whatever accumulated so far; the platform search tier
    /// occasionally refuses deep pages, and a partial day is more useful
    /// than none.
    ///
    /// # Errors
    ///
    /// Returns [`RemitError::Http`](crate::RemitError::Http) only for
    /// transport-level failures (connect, timeout) or an undecodable
    /// success body.
    pub async fn list_orders(
        &self,
        window: &ReportWindow,
        seller_display: &str,
    ) -> crate::Result<Vec<OrderSummary>> {
        let url = format!("{}/api/oms/pvt/orders", self.base_url);
        let invoiced_range = format!("invoicedDate:[{} TO {}]", window.start_utc, window.end_utc);

        let mut orders = Vec::new();
        let mut page = 1u32;
        loop {
            let response = self
                .http
                .get(&url)
                .query(&[
                    ("page", page.to_string()),
                    ("per_page", PAGE_SIZE.to_string()),
                    ("f_invoicedDate", invoiced_range.clone()),
                    ("f_status", "invoiced".to_string()),
                    ("f_sellerNames", seller_display.to_string()),
                ])
                .send()
                .await?;

            if !response.status().is_success() {
                warn!(
                    status = %response.status(),
                    page,
                    seller = seller_display,
                    "order listing returned non-success status, truncating"
                );
                break;
            }

            let body: OrderListResponse = response.json().await?;
            let count = body.list.len();
            debug!(page, count, seller = seller_display, "listed order page");
            if count == 0 {
                break;
            }
            orders.extend(body.list);
            if count < PAGE_SIZE {
                break;
            }
            page += 1;
        }

        Ok(orders)
    }

    /// Fetches full order detail for every id, at most
    /// `min(max_workers, ids)` requests in flight.
    ///
    /// The whole fan-out is drained before returning; per-order failures are
    /// collected into the batch instead of propagating.
    pub async fn fetch_details(&self, order_ids: &[String]) -> DetailBatch {
        let limit = self.max_workers.min(order_ids.len()).max(1);

        let outcomes: Vec<Result<(String, OrderDetail), FetchFailure>> =
            stream::iter(order_ids.iter().cloned())
                .map(|order_id| self.fetch_detail(order_id))
                .buffer_unordered(limit)
                .collect()
                .await;

        let mut batch = DetailBatch::default();
        for outcome in outcomes {
            match outcome {
                Ok((order_id, detail)) => {
                    batch.details.insert(order_id, detail);
                }
                Err(failure) => {
                    debug!(%failure, "order detail dropped");
                    batch.failures.push(failure);
                }
            }
        }
        batch
    }

    /// Fetches one order's detail, keyed by the id that was asked for.
    async fn fetch_detail(
        &self,
        order_id: String,
    ) -> Result<(String, OrderDetail), FetchFailure> {
        let url = format!("{}/api/oms/pvt/orders/{}", self.base_url, order_id);

        let response = match self.http.get(&url).send().await {
            Ok(response) => response,
            Err(e) => {
                return Err(FetchFailure {
                    order_id,
                    reason: FetchFailureReason::Transport(e.to_string()),
                });
            }
        };

        let status = response.status();
        if !status.is_success() {
            return Err(FetchFailure {
                order_id,
                reason: FetchFailureReason::Status(status.as_u16()),
            });
        }

        match response.json::<OrderDetail>().await {
            Ok(detail) => Ok((order_id, detail)),
            Err(e) => Err(FetchFailure {
                order_id,
                reason: FetchFailureReason::Decode(e.to_string()),
            }),
        }
    }
}
