//! Reporting window resolution.
//!
//! Every run covers the previous full calendar day in the platform's fixed
//! UTC-3 offset, regardless of the host timezone. The window is computed
//! once at startup and carried through the run as pre-rendered strings: the
//! OMS range filter wants millisecond-precision UTC bounds, the artifact
//! name wants the ISO date, and the email subject wants `DD/MM/YYYY`.

use chrono::{DateTime, Duration, FixedOffset, Utc};

/// Fixed UTC-3 offset used for all calendar rendering.
pub fn local_offset() -> FixedOffset {
    FixedOffset::west_opt(3 * 3600).expect("UTC-3 is a valid offset")
}

/// The one-day reporting window, pre-rendered in every form the run needs.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReportWindow {
    /// Window start in UTC, `YYYY-MM-DDTHH:MM:SS.mmmZ`.
    pub start_utc: String,
    /// Window end in UTC, same format, inclusive (`...:59.999`).
    pub end_utc: String,
    /// Local date as `YYYY-MM-DD`, used in artifact file names.
    pub local_date_iso: String,
    /// Local date as `DD/MM/YYYY`, used in user-facing text.
    pub local_date_display: String,
}

impl ReportWindow {
    /// Resolves the window for the day before `now`, in the fixed local offset.
    ///
    /// The local interval is the closed [00:00:00.000, 23:59:59.999]; both
    /// endpoints are converted to UTC for the invoiced-date range filter.
    /// Deterministic given `now` and independent of host timezone settings.
    pub fn previous_day(now: DateTime<Utc>) -> Self {
        let offset = local_offset();
        let yesterday = now.with_timezone(&offset).date_naive() - Duration::days(1);

        let start_local = yesterday
            .and_hms_milli_opt(0, 0, 0, 0)
            .expect("midnight is valid")
            .and_local_timezone(offset)
            .single()
            .expect("fixed offsets have no gaps");
        let end_local = yesterday
            .and_hms_milli_opt(23, 59, 59, 999)
            .expect("23:59:59.999 is valid")
            .and_local_timezone(offset)
            .single()
            .expect("fixed offsets have no gaps");

        ReportWindow {
            start_utc: start_local
                .with_timezone(&Utc)
                .format("%Y-%m-%dT%H:%M:%S%.3fZ")
                .to_string(),
            end_utc: end_local
                .with_timezone(&Utc)
                .format("%Y-%m-%dT%H:%M:%S%.3fZ")
                .to_string(),
            local_date_iso: yesterday.format("%Y-%m-%d").to_string(),
            local_date_display: yesterday.format("%d/%m/%Y").to_string(),
        }
    }
}
