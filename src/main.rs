use chrono::Utc;
use tracing::{error, info, warn};

use remit::RemitError;
use remit::client::OmsClient;
use remit::config::fetch_config;
use remit::notify::SmtpNotifier;
use remit::pipeline::{self, SellerOutcome};
use remit::report::CsvReportWriter;
use remit::sellers::load_sellers;
use remit::window::ReportWindow;

#[tokio::main]
async fn main() {
    // Initialize tracing subscriber for logging output.
    tracing_subscriber::fmt::init();

    if let Err(e) = run().await {
        error!(error = %e, "run aborted");
        std::process::exit(1);
    }
}

async fn run() -> Result<(), RemitError> {
    let config = fetch_config()?;
    let sellers = load_sellers(&config.sellers_file)?;
    if sellers.is_empty() {
        warn!("no active sellers configured, nothing to do");
        return Ok(());
    }

    let window = ReportWindow::previous_day(Utc::now());
    info!(
        date = %window.local_date_iso,
        start = %window.start_utc,
        end = %window.end_utc,
        "reporting window resolved"
    );

    let client = OmsClient::new(&config.oms)?;
    let writer = CsvReportWriter::new(&config.output_dir);
    let notifier = SmtpNotifier::new(config.smtp);

    let report = pipeline::run(&client, &sellers, &window, &writer, &notifier).await;

    for seller_report in &report.sellers {
        match &seller_report.outcome {
            SellerOutcome::Completed {
                rows,
                dropped,
                artifact,
            } => info!(
                seller = %seller_report.seller,
                rows,
                dropped,
                artifact = ?artifact,
                "seller completed"
            ),
            SellerOutcome::NoOrders => {
                info!(seller = %seller_report.seller, "seller skipped, no orders")
            }
            SellerOutcome::Failed(e) => {
                warn!(seller = %seller_report.seller, error = %e, "seller failed")
            }
        }
    }
    info!(
        sellers = report.sellers.len(),
        failed = report.failed(),
        "run complete"
    );

    Ok(())
}
