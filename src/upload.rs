//! Batch orchestration: pick the date, upload each file, tally the result.

use anyhow::{anyhow, Result};
use chrono::{Local, NaiveDate};

use crate::scan::TransferTask;
use crate::transfer::Uploader;

/// Format accepted by `--date`.
pub const DATE_ARG_FORMAT: &str = "%Y-%m-%d";

/// Format of the date embedded in export filenames.
pub const FILENAME_DATE_FORMAT: &str = "%Y%m%d";

/// A calendar day used to select exports by filename.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DateFilter(NaiveDate);

impl DateFilter {
    /// Parse a `YYYY-MM-DD` argument.
    ///
    /// # Errors
    ///
    /// Returns an error if `input` is not a valid date in that format.
    pub fn parse(input: &str) -> Result<Self> {
        NaiveDate::parse_from_str(input, DATE_ARG_FORMAT)
            .map(Self)
            .map_err(|_| anyhow!("Invalid date format: {input}. Use YYYY-MM-DD"))
    }

    #[must_use]
    pub fn today() -> Self {
        Self(Local::now().date_naive())
    }

    /// The `YYYYMMDD` token looked for in filenames.
    #[must_use]
    pub fn filename_token(&self) -> String {
        self.0.format(FILENAME_DATE_FORMAT).to_string()
    }
}

/// Work out which filename token to filter on.
///
/// `all` disables filtering; otherwise the explicit date wins, falling back
/// to today.
///
/// # Errors
///
/// Returns an error if `explicit` is not a valid `YYYY-MM-DD` date.
pub fn resolve_date_token(explicit: Option<&str>, all: bool) -> Result<Option<String>> {
    if all {
        tracing::info!("No date filter, considering every export");
        return Ok(None);
    }

    let filter = if let Some(raw) = explicit {
        let filter = DateFilter::parse(raw)?;
        tracing::info!("Filtering for files from date: {}", filter.filename_token());
        filter
    } else {
        let filter = DateFilter::today();
        tracing::info!("No date specified, using today: {}", filter.filename_token());
        filter
    };

    Ok(Some(filter.filename_token()))
}

/// Outcome of one batch run.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct BatchSummary {
    pub succeeded: Vec<String>,
    /// Filename and rendered error.
    pub failed: Vec<(String, String)>,
}

impl BatchSummary {
    #[must_use]
    pub fn success_count(&self) -> usize {
        self.succeeded.len()
    }

    #[must_use]
    pub fn failure_count(&self) -> usize {
        self.failed.len()
    }

    /// `0` when nothing failed (including an empty batch), `1` otherwise.
    #[must_use]
    pub fn exit_code(&self) -> u8 {
        u8::from(!self.failed.is_empty())
    }
}

/// Upload every task in order. A failure is logged and counted; the batch
/// always runs to the end and nothing is retried.
pub async fn upload_all<U: Uploader>(uploader: &U, tasks: &[TransferTask]) -> BatchSummary {
    let mut summary = BatchSummary::default();

    for task in tasks {
        match uploader.upload(task).await {
            Ok(bytes) => {
                tracing::info!("Uploaded {} ({} bytes)", task.remote_filename, bytes);
                summary.succeeded.push(task.remote_filename.clone());
            }
            Err(e) => {
                tracing::error!("Failed to upload {}: {:#}", task.remote_filename, e);
                summary
                    .failed
                    .push((task.remote_filename.clone(), format!("{e:#}")));
            }
        }
    }

    tracing::info!(
        "Upload summary: {} succeeded, {} failed",
        summary.success_count(),
        summary.failure_count()
    );
    summary
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_iso_date_into_filename_token() {
        let filter = DateFilter::parse("2024-05-01").unwrap();
        assert_eq!(filter.filename_token(), "20240501");
    }

    #[test]
    fn rejects_other_date_layouts() {
        assert!(DateFilter::parse("05/01/2024").is_err());
        assert!(DateFilter::parse("20240501").is_err());
        assert!(DateFilter::parse("2024-13-01").is_err());
        assert!(DateFilter::parse("").is_err());
    }

    #[test]
    fn rejects_surrounding_whitespace() {
        assert!(DateFilter::parse(" 2024-05-01").is_err());
        assert!(DateFilter::parse("2024-05-01 ").is_err());
    }

    #[test]
    fn all_disables_the_filter() {
        assert_eq!(resolve_date_token(None, true).unwrap(), None);
    }

    #[test]
    fn missing_date_defaults_to_today() {
        let token = resolve_date_token(None, false).unwrap();
        assert_eq!(token, Some(DateFilter::today().filename_token()));
    }

    #[test]
    fn empty_summary_exits_zero() {
        assert_eq!(BatchSummary::default().exit_code(), 0);
    }
}
