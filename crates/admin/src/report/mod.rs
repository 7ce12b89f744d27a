//! Daily changed-products report.
//!
//! The report service lists, per day, the products whose stock, price or
//! content changed. A loaded report is kept in the operator's workspace so
//! row details can be shown without asking the service again.

mod view;

pub use view::{ReportDetailView, ReportRowView};

use std::collections::HashMap;

use catalog_sync_core::{ReportDate, ReportRow};
use tracing::{error, instrument};

use crate::api::{ApiError, BackendClient};
use crate::catalog::SharedWorkspace;

/// Shown instead of the table when a day cannot be loaded.
pub const NO_DATA_MESSAGE: &str = "No data found for this date.";

/// Rows of one day's report, indexed by row `ID`.
#[derive(Debug, Clone)]
pub struct DailyReport {
    date: ReportDate,
    rows: Vec<ReportRow>,
    by_id: HashMap<String, usize>,
}

impl DailyReport {
    #[must_use]
    pub fn new(date: ReportDate, rows: Vec<ReportRow>) -> Self {
        let mut by_id = HashMap::with_capacity(rows.len());
        for (index, row) in rows.iter().enumerate() {
            if let Some(id) = row.id.as_deref() {
                by_id.entry(id.to_string()).or_insert(index);
            }
        }
        Self { date, rows, by_id }
    }

    #[must_use]
    pub const fn date(&self) -> ReportDate {
        self.date
    }

    #[must_use]
    pub fn rows(&self) -> &[ReportRow] {
        &self.rows
    }

    /// First row with the given `ID`.
    #[must_use]
    pub fn row(&self, id: &str) -> Option<&ReportRow> {
        self.by_id.get(id).and_then(|&index| self.rows.get(index))
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// `N items with changes`, or nothing for an empty day.
    #[must_use]
    pub fn summary(&self) -> Option<String> {
        match self.rows.len() {
            0 => None,
            1 => Some("1 item with changes".to_string()),
            n => Some(format!("{n} items with changes")),
        }
    }
}

/// Fetch a day's report and keep it in the workspace.
///
/// # Errors
///
/// Returns the backend error; the workspace keeps no report in that case.
#[instrument(skip_all, fields(date = %date))]
pub async fn load(
    client: &BackendClient,
    workspace: &SharedWorkspace,
    date: ReportDate,
) -> Result<DailyReport, ApiError> {
    let result = client.daily_report(date).await;

    let mut ws = workspace.lock().await;
    match result {
        Ok(rows) => {
            let report = DailyReport::new(date, rows);
            ws.report = Some(report.clone());
            Ok(report)
        }
        Err(e) => {
            error!(error = %e, "Failed to load daily report");
            ws.report = None;
            Err(e)
        }
    }
}

/// Find a row of a day's report, loading the day if the workspace holds
/// another one.
///
/// # Errors
///
/// Returns the backend error if the day had to be loaded and could not be.
pub async fn find_row(
    client: &BackendClient,
    workspace: &SharedWorkspace,
    date: ReportDate,
    id: &str,
) -> Result<Option<ReportRow>, ApiError> {
    {
        let ws = workspace.lock().await;
        if let Some(report) = ws.report.as_ref().filter(|r| r.date() == date) {
            return Ok(report.row(id).cloned());
        }
    }

    let report = load(client, workspace, date).await?;
    Ok(report.row(id).cloned())
}
