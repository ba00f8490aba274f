//! Report delivery by email.
//!
//! [`Notifier`] is the seam the pipeline calls once a seller's artifact is
//! written; [`SmtpNotifier`] delivers it as an attachment over
//! implicit-TLS SMTP using the credentials from the loaded configuration.

use std::path::Path;

use async_trait::async_trait;
use lettre::message::header::ContentType;
use lettre::message::{Attachment, Mailbox, MultiPart, SinglePart, header};
use lettre::transport::smtp::authentication::Credentials;
use lettre::{AsyncSmtpTransport, AsyncTransport, Message, Tokio1Executor};
use tracing::{info, warn};

use crate::config::SmtpConfig;
use crate::sellers::SellerConfig;

/// Delivers a finished report artifact to a seller's recipients.
#[async_trait]
pub trait Notifier: Send + Sync {
    /// Sends the artifact for one seller and one report date.
    ///
    /// A seller without destination addresses is skipped with a warning,
    /// not an error.
    ///
    /// # Errors
    ///
    /// Implementations return an error when the message cannot be composed
    /// or delivery fails.
    async fn notify(
        &self,
        artifact: &Path,
        seller: &SellerConfig,
        local_date_display: &str,
    ) -> crate::Result<()>;
}

/// SMTP implementation of [`Notifier`].
pub struct SmtpNotifier {
    config: SmtpConfig,
}

impl SmtpNotifier {
    pub fn new(config: SmtpConfig) -> Self {
        SmtpNotifier { config }
    }

    fn mailbox(raw: &str) -> crate::Result<Mailbox> {
        raw.parse()
            .map_err(|e| crate::RemitError::Mail(format!("invalid address {raw:?}: {e}")))
    }
}

#[async_trait]
impl Notifier for SmtpNotifier {
    async fn notify(
        &self,
        artifact: &Path,
        seller: &SellerConfig,
        local_date_display: &str,
    ) -> crate::Result<()> {
        if seller.email_to.is_empty() {
            warn!(
                seller = %seller.display,
                "no destination addresses configured, skipping notification"
            );
            return Ok(());
        }

        let mut builder = Message::builder()
            .from(Self::mailbox(&self.config.from)?)
            .subject(format!(
                "Invoiced sales report – {} – {}",
                seller.display, local_date_display
            ));
        for to in &seller.email_to {
            builder = builder.to(Self::mailbox(to)?);
        }
        for cc in &seller.email_cc {
            builder = builder.cc(Self::mailbox(cc)?);
        }

        let file_name = artifact
            .file_name()
            .and_then(|name| name.to_str())
            .unwrap_or("report.csv")
            .to_string();
        let contents = tokio::fs::read(artifact)
            .await
            .map_err(|e| crate::RemitError::Io(format!("failed to read {}: {e}", artifact.display())))?;
        let attachment = Attachment::new(file_name).body(
            contents,
            ContentType::parse("text/csv; charset=utf-8")
                .map_err(|e| crate::RemitError::Mail(format!("invalid content type: {e}")))?,
        );

        let body = format!(
            "Attached is the invoiced sales settlement report for {local_date_display}."
        );
        let message = builder
            .multipart(
                MultiPart::mixed()
                    .singlepart(
                        SinglePart::builder()
                            .header(header::ContentType::TEXT_PLAIN)
                            .body(body),
                    )
                    .singlepart(attachment),
            )
            .map_err(|e| crate::RemitError::Mail(format!("failed to compose message: {e}")))?;

        let mailer = AsyncSmtpTransport::<Tokio1Executor>::relay(&self.config.server)?
            .port(self.config.port)
            .credentials(Credentials::new(
                self.config.user.clone(),
                self.config.password.clone(),
            ))
            .build();
        mailer.send(message).await?;

        info!(
            seller = %seller.display,
            recipients = seller.email_to.len(),
            cc = seller.email_cc.len(),
            "notification delivered"
        );
        Ok(())
    }
}
