//! Daily changed-products report pages.

use askama::Template;
use axum::{
    Router,
    extract::{Path, Query, State},
    http::HeaderMap,
    response::Html,
    routing::get,
};
use catalog_sync_core::ReportDate;
use serde::Deserialize;
use tracing::instrument;

use super::{AlertTemplate, render};
use crate::error::AppError;
use crate::filters;
use crate::middleware::{RequireLogin, is_htmx};
use crate::report::{self, NO_DATA_MESSAGE, ReportDetailView, ReportRowView};
use crate::state::AppState;

/// Query parameters for the report page.
#[derive(Debug, Deserialize)]
pub struct ReportQuery {
    #[serde(default)]
    pub date: Option<String>,
}

/// The report table area.
#[derive(Debug, Clone)]
pub struct ReportPanelView {
    /// Date in `YYYY-MM-DD` form, for the date picker and row links.
    pub date: String,
    pub summary: Option<String>,
    pub error: Option<String>,
    pub rows: Vec<ReportRowView>,
}

/// Report page template.
#[derive(Template)]
#[template(path = "reports/index.html")]
pub struct ReportPageTemplate {
    pub operator: Option<String>,
    pub current_path: &'static str,
    pub report: ReportPanelView,
}

/// Report table fragment, swapped in when the date changes.
#[derive(Template)]
#[template(path = "reports/_panel.html")]
pub struct ReportPanelTemplate {
    pub report: ReportPanelView,
}

/// Report row detail modal.
#[derive(Template)]
#[template(path = "reports/_detail.html")]
pub struct ReportDetailTemplate {
    pub row: ReportDetailView,
}

/// Build the reports router.
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/reports", get(index))
        .route("/reports/{date}/rows/{id}", get(show_row))
}

/// Report for one day, today by default.
///
/// Full page for normal requests, the table fragment for HTMX requests.
///
/// GET /reports?date=YYYY-MM-DD
#[instrument(skip_all, fields(operator = %operator.username, date = ?query.date))]
pub async fn index(
    RequireLogin(operator): RequireLogin,
    State(state): State<AppState>,
    headers: HeaderMap,
    Query(query): Query<ReportQuery>,
) -> Html<String> {
    let requested = query
        .date
        .as_deref()
        .map(str::trim)
        .filter(|d| !d.is_empty());

    let report = match requested.map(ReportDate::parse) {
        Some(Err(e)) => ReportPanelView {
            date: ReportDate::today().input_value(),
            summary: None,
            error: Some(e.to_string()),
            rows: Vec::new(),
        },
        Some(Ok(date)) => load_panel(&state, &operator, date).await,
        None => load_panel(&state, &operator, ReportDate::today()).await,
    };

    if is_htmx(&headers) {
        render(&ReportPanelTemplate { report })
    } else {
        render(&ReportPageTemplate {
            operator: Some(operator.username.clone()),
            current_path: "/reports",
            report,
        })
    }
}

async fn load_panel(
    state: &AppState,
    operator: &crate::models::CurrentOperator,
    date: ReportDate,
) -> ReportPanelView {
    let workspace = state.workspace(operator).await;
    match report::load(state.reports(), &workspace, date).await {
        Ok(daily) => ReportPanelView {
            date: date.input_value(),
            summary: daily.summary(),
            error: None,
            rows: daily.rows().iter().map(ReportRowView::from).collect(),
        },
        Err(_) => ReportPanelView {
            date: date.input_value(),
            summary: None,
            error: Some(NO_DATA_MESSAGE.to_string()),
            rows: Vec::new(),
        },
    }
}

/// Detail modal for one report row.
///
/// GET /reports/{date}/rows/{id}
#[instrument(skip_all, fields(operator = %operator.username, date = %date, row = %id))]
pub async fn show_row(
    RequireLogin(operator): RequireLogin,
    State(state): State<AppState>,
    Path((date, id)): Path<(String, String)>,
) -> Result<Html<String>, AppError> {
    let date = ReportDate::parse(&date).map_err(|e| AppError::BadRequest(e.to_string()))?;
    let workspace = state.workspace(&operator).await;

    let row = match report::find_row(state.reports(), &workspace, date, &id).await {
        Ok(row) => row,
        Err(_) => return Ok(render(&AlertTemplate::error("Error", NO_DATA_MESSAGE))),
    };

    Ok(match row {
        Some(row) => render(&ReportDetailTemplate {
            row: ReportDetailView::from(&row),
        }),
        None => render(&AlertTemplate::warning(
            "Not found",
            format!("Product {id} is not part of this report."),
        )),
    })
}
