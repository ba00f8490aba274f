//! Per-seller pipeline driver.
//!
//! Sellers are processed strictly one at a time, in configuration order:
//! list the window's invoiced orders, fan-out fetch their detail, derive
//! and deduplicate settlement rows, then hand the sorted set to the report
//! writer and notifier. A failure inside one seller's run is recorded in
//! that seller's outcome and the loop moves on; one seller can never take
//! the rest of the run down with it.

use std::path::PathBuf;

use tracing::{error, info, warn};

use crate::RemitError;
use crate::client::OmsClient;
use crate::notify::Notifier;
use crate::report::ReportWriter;
use crate::rows::{DateFormatter, dedup_rows, derive_rows, sort_rows};
use crate::sellers::SellerConfig;
use crate::window::ReportWindow;

/// What happened for one seller.
#[derive(Debug)]
pub enum SellerOutcome {
    /// The seller was processed to the end. `artifact` is `None` when the
    /// derived row set came out empty (nothing written, nothing sent).
    Completed {
        rows: usize,
        dropped: usize,
        artifact: Option<PathBuf>,
    },
    /// The listing returned nothing; the seller was skipped entirely.
    NoOrders,
    /// Processing failed; later sellers were unaffected.
    Failed(RemitError),
}

/// One seller's entry in the run report.
#[derive(Debug)]
pub struct SellerReport {
    pub seller: String,
    pub outcome: SellerOutcome,
}

/// Structured result of a full run, returned to the binary for logging.
#[derive(Debug)]
pub struct RunReport {
    pub window: ReportWindow,
    pub sellers: Vec<SellerReport>,
}

impl RunReport {
    /// Number of sellers whose run failed.
    pub fn failed(&self) -> usize {
        self.sellers
            .iter()
            .filter(|report| matches!(report.outcome, SellerOutcome::Failed(_)))
            .count()
    }
}

/// Runs the full per-seller pipeline over one reporting window.
///
/// Never fails as a whole: per-seller errors land in the corresponding
/// [`SellerOutcome::Failed`] and processing continues with the next seller.
pub async fn run(
    client: &OmsClient,
    sellers: &[SellerConfig],
    window: &ReportWindow,
    writer: &dyn ReportWriter,
    notifier: &dyn Notifier,
) -> RunReport {
    let dates = DateFormatter::new();

    let mut reports = Vec::with_capacity(sellers.len());
    for seller in sellers {
        info!(seller = %seller.display, "processing seller");
        let outcome = match process_seller(client, seller, window, &dates, writer, notifier).await
        {
            Ok(outcome) => outcome,
            Err(e) => {
                error!(seller = %seller.display, error = %e, "seller run failed");
                SellerOutcome::Failed(e)
            }
        };
        reports.push(SellerReport {
            seller: seller.display.clone(),
            outcome,
        });
    }

    RunReport {
        window: window.clone(),
        sellers: reports,
    }
}

async fn process_seller(
    client: &OmsClient,
    seller: &SellerConfig,
    window: &ReportWindow,
    dates: &DateFormatter,
    writer: &dyn ReportWriter,
    notifier: &dyn Notifier,
) -> crate::Result<SellerOutcome> {
    let summaries = client.list_orders(window, &seller.display).await?;
    if summaries.is_empty() {
        warn!(seller = %seller.display, "no invoiced orders in window");
        return Ok(SellerOutcome::NoOrders);
    }
    info!(seller = %seller.display, orders = summaries.len(), "orders listed");

    let order_ids: Vec<String> = summaries
        .iter()
        .map(|summary| summary.order_id.clone())
        .collect();
    let batch = client.fetch_details(&order_ids).await;
    if batch.dropped() > 0 {
        warn!(
            seller = %seller.display,
            dropped = batch.dropped(),
            "order detail fetches dropped"
        );
    }

    // Derivation walks the original summaries so row order reflects the
    // listing order before the final sort.
    let mut rows = Vec::new();
    for summary in &summaries {
        if let Some(detail) = batch.details.get(&summary.order_id) {
            rows.extend(derive_rows(detail, seller, dates));
        }
    }
    let mut rows = dedup_rows(rows);
    sort_rows(&mut rows);

    if rows.is_empty() {
        warn!(
            seller = %seller.display,
            "no settlement rows derived, skipping artifact and notification"
        );
        return Ok(SellerOutcome::Completed {
            rows: 0,
            dropped: batch.dropped(),
            artifact: None,
        });
    }

    let artifact = writer.write(seller, &rows, &window.local_date_iso)?;
    if let Some(path) = &artifact {
        notifier
            .notify(path, seller, &window.local_date_display)
            .await?;
    }

    Ok(SellerOutcome::Completed {
        rows: rows.len(),
        dropped: batch.dropped(),
        artifact,
    })
}
