//! Catalog page and its HTMX fragments.
//!
//! Every handler follows the same pattern: lock the operator's workspace to
//! start a step, release it while the backend answers, then lock again to
//! apply the answer and render from whatever the navigator now holds.

use std::sync::Arc;

use askama::Template;
use axum::{
    Form, Router,
    extract::{Path, State},
    http::StatusCode,
    response::{Html, IntoResponse, Response},
    routing::{get, post},
};
use catalog_sync_core::{CategoryId, ProductId, SubcategoryId};
use serde::Deserialize;
use tracing::{Instrument, error, info, instrument, warn};

use super::{AlertTemplate, render};
use crate::catalog::{
    Applied, CatalogNavigator, CategoryChange, NavError, ProductsPanel, SELECTION_REQUIRED_MESSAGE,
    Selector, SelectorOption, SharedWorkspace, Ticket,
};
use crate::config::DetailStrategy;
use crate::detail::{self, DetailError, DetailView};
use crate::error::AppError;
use crate::filters;
use crate::middleware::RequireLogin;
use crate::state::AppState;
use crate::submit::{BatchProgress, ElapsedTimer, SingleOutcome, SummaryLine};

const CATEGORIES_FAILED: &str = "Categories could not be loaded. Reload the page to try again.";
const SUBCATEGORIES_FAILED: &str = "Subcategories could not be loaded.";
const PRODUCTS_FAILED: &str = "Products could not be loaded. Please try again.";
const DETAIL_FAILED: &str = "The product details could not be loaded. Please try again.";

// =============================================================================
// View Types
// =============================================================================

/// One `<option>` of a selector.
#[derive(Debug, Clone)]
pub struct OptionView {
    pub value: String,
    pub label: String,
    pub selected: bool,
}

/// A cascading `<select>`.
///
/// The placeholder option is always rendered first, so a populated
/// selector with N options shows N + 1 entries.
#[derive(Debug, Clone)]
pub struct SelectView {
    pub placeholder: &'static str,
    pub options: Vec<OptionView>,
    pub disabled: bool,
    pub loading: bool,
    pub notice: Option<&'static str>,
}

impl SelectView {
    fn new<T: SelectorOption>(
        selector: &Selector<T>,
        placeholder: &'static str,
        failed: &'static str,
    ) -> Self {
        let selected = selector.selected();
        Self {
            placeholder,
            options: selector
                .options()
                .iter()
                .map(|option| OptionView {
                    value: option.option_id().to_string(),
                    label: option.label().to_string(),
                    selected: selected == Some(option.option_id()),
                })
                .collect(),
            disabled: false,
            loading: selector.is_loading(),
            notice: selector.error().map(|_| failed),
        }
    }

    fn categories(nav: &CatalogNavigator) -> Self {
        let selector = nav.categories();
        let placeholder = if selector.is_loading() {
            "Loading categories..."
        } else {
            "Select a category"
        };
        let mut view = Self::new(selector, placeholder, CATEGORIES_FAILED);
        view.disabled = view.loading;
        view
    }

    fn subcategories(nav: &CatalogNavigator) -> Self {
        let selector = nav.subcategories();
        let placeholder = if selector.is_populated() {
            "Select a subcategory"
        } else {
            "Select a category first"
        };
        let mut view = Self::new(selector, placeholder, SUBCATEGORIES_FAILED);
        view.disabled = !selector.is_populated();
        view
    }
}

/// Product row view for templates.
#[derive(Debug, Clone)]
pub struct ProductRowView {
    pub id: String,
    pub title: String,
    pub description: String,
    pub thumbnail: String,
    pub checked: bool,
}

/// The rendered product table.
#[derive(Debug, Clone)]
pub struct TableView {
    pub rows: Vec<ProductRowView>,
    pub all_checked: bool,
}

/// Content of the products area.
#[derive(Debug, Clone, Default)]
pub struct PanelView {
    pub error: Option<&'static str>,
    pub table: Option<TableView>,
}

impl PanelView {
    fn from_navigator(nav: &CatalogNavigator) -> Self {
        match nav.products() {
            ProductsPanel::Hidden | ProductsPanel::Loading => Self::default(),
            ProductsPanel::Failed(_) => Self {
                error: Some(PRODUCTS_FAILED),
                table: None,
            },
            ProductsPanel::Table(table) => Self {
                error: None,
                table: Some(TableView {
                    rows: table
                        .products()
                        .iter()
                        .map(|product| ProductRowView {
                            id: product.id.to_string(),
                            title: product.title.clone(),
                            description: product.description.clone(),
                            thumbnail: product.thumbnail_url().to_string(),
                            checked: table.is_checked(&product.id),
                        })
                        .collect(),
                    all_checked: table.all_checked(),
                }),
            },
        }
    }
}

/// State of the bulk-submit control.
#[derive(Debug, Clone)]
pub struct BulkView {
    pub enabled: bool,
    pub selected: usize,
    pub running: bool,
}

impl BulkView {
    fn from_navigator(nav: &CatalogNavigator) -> Self {
        Self {
            enabled: nav.bulk_submit_enabled(),
            selected: nav.table().map_or(0, |table| table.selection().len()),
            running: nav.batch().is_some_and(BatchProgress::is_running),
        }
    }
}

/// Progress or result of a bulk submission.
#[derive(Debug, Clone)]
pub struct BatchView {
    pub running: bool,
    pub product_ids: String,
    pub elapsed_secs: u64,
    pub lines: Vec<SummaryLine>,
    pub failure: Option<String>,
}

impl From<&BatchProgress> for BatchView {
    fn from(batch: &BatchProgress) -> Self {
        let outcome = batch.outcome();
        Self {
            running: batch.is_running(),
            product_ids: batch
                .product_ids()
                .iter()
                .map(ProductId::as_str)
                .collect::<Vec<_>>()
                .join(", "),
            elapsed_secs: batch.elapsed_secs(),
            lines: outcome.map(|o| o.summary_lines()).unwrap_or_default(),
            failure: match outcome {
                Some(crate::submit::BatchOutcome::Failed { message, .. }) => Some(message.clone()),
                _ => None,
            },
        }
    }
}

// =============================================================================
// Templates
// =============================================================================

/// Catalog page template.
#[derive(Template)]
#[template(path = "catalog/index.html")]
pub struct CatalogPageTemplate {
    pub operator: Option<String>,
    pub current_path: &'static str,
    pub categories: SelectView,
    pub subcategories: SelectView,
    pub panel: PanelView,
    pub bulk: BulkView,
    /// Submission still running, or finished and not yet shown.
    pub batch: Option<BatchView>,
}

/// Category selector, fetched once the page has loaded.
#[derive(Template)]
#[template(path = "catalog/_category_select.html")]
pub struct CategoriesTemplate {
    pub categories: SelectView,
}

/// Subcategory selector, with the product area and bulk control cleared.
#[derive(Template)]
#[template(path = "catalog/_subcategories.html")]
pub struct SubcategoriesTemplate {
    pub subcategories: SelectView,
    pub panel: PanelView,
    pub bulk: BulkView,
}

/// Product area, with the bulk control updated out of band.
#[derive(Template)]
#[template(path = "catalog/_products.html")]
pub struct ProductsTemplate {
    pub panel: PanelView,
    pub bulk: BulkView,
}

/// Bulk-submit control.
#[derive(Template)]
#[template(path = "catalog/_bulk.html")]
pub struct BulkTemplate {
    pub bulk: BulkView,
}

/// Product detail modal.
#[derive(Template)]
#[template(path = "catalog/_detail.html")]
pub struct DetailTemplate {
    pub detail: DetailView,
}

/// Bulk submission modal.
#[derive(Template)]
#[template(path = "catalog/_batch.html")]
pub struct BatchTemplate {
    pub batch: BatchView,
    pub panel: PanelView,
    pub bulk: BulkView,
}

impl BatchTemplate {
    fn from_navigator(nav: &CatalogNavigator, batch: &BatchProgress) -> Self {
        Self {
            batch: BatchView::from(batch),
            panel: PanelView::from_navigator(nav),
            bulk: BulkView::from_navigator(nav),
        }
    }
}

// =============================================================================
// Forms
// =============================================================================

#[derive(Debug, Deserialize)]
pub struct CategoryForm {
    #[serde(default)]
    pub category: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct SubcategoryForm {
    #[serde(default)]
    pub subcategory: Option<String>,
}

/// Unchecked checkboxes are not submitted, so `checked` is absent for them.
#[derive(Debug, Deserialize)]
pub struct ToggleForm {
    pub product_id: String,
    #[serde(default)]
    pub checked: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct SelectAllForm {
    #[serde(default)]
    pub checked: Option<String>,
}

fn is_checked(value: Option<&str>) -> bool {
    matches!(value, Some("true" | "on"))
}

fn parse_product_id(raw: &str) -> Result<ProductId, AppError> {
    ProductId::parse(raw).map_err(|e| AppError::BadRequest(e.to_string()))
}

// =============================================================================
// Router
// =============================================================================

/// Build the catalog router.
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/catalog", get(index))
        .route("/catalog/categories", get(load_categories))
        .route("/catalog/category", post(change_category))
        .route("/catalog/products", post(load_products))
        .route("/catalog/selection/toggle", post(toggle_selection))
        .route("/catalog/selection/all", post(select_all))
        .route("/catalog/products/{id}", get(show_product))
        .route("/catalog/products/{id}/shopify", post(submit_product))
        .route("/catalog/submissions", post(start_submission))
        .route("/catalog/submissions/current", get(current_submission))
}

// =============================================================================
// Handlers
// =============================================================================

/// Catalog page. Resets the selectors and shows the category list as
/// loading; the page then fetches it from `/catalog/categories`.
///
/// A submission started before a reload is shown again in the modal.
///
/// GET /catalog
#[instrument(skip_all, fields(operator = %operator.username))]
pub async fn index(
    RequireLogin(operator): RequireLogin,
    State(state): State<AppState>,
) -> Html<String> {
    let workspace = state.workspace(&operator).await;
    let mut ws = workspace.lock().await;

    let _ = ws.navigator.begin_load_categories();
    ws.displayed_detail = None;

    let batch = ws.navigator.batch().map(BatchView::from);
    if batch.as_ref().is_some_and(|b| !b.running) {
        ws.navigator.dismiss_batch();
    }

    let nav = &ws.navigator;
    render(&CatalogPageTemplate {
        operator: Some(operator.username.clone()),
        current_path: "/catalog",
        categories: SelectView::categories(nav),
        subcategories: SelectView::subcategories(nav),
        panel: PanelView::from_navigator(nav),
        bulk: BulkView::from_navigator(nav),
        batch,
    })
}

/// Load the category list.
///
/// The fresh ticket supersedes the one issued by the page render.
///
/// GET /catalog/categories
#[instrument(skip_all, fields(operator = %operator.username))]
pub async fn load_categories(
    RequireLogin(operator): RequireLogin,
    State(state): State<AppState>,
) -> Html<String> {
    let workspace = state.workspace(&operator).await;

    let ticket = workspace.lock().await.navigator.begin_load_categories();
    let result = state.catalog().categories().await.map(|v| v.entries);

    let mut ws = workspace.lock().await;
    let _ = ws.navigator.finish_load_categories(ticket, result);

    render(&CategoriesTemplate {
        categories: SelectView::categories(&ws.navigator),
    })
}

/// Category chosen: reload the subcategory selector.
///
/// POST /catalog/category
#[instrument(skip_all, fields(operator = %operator.username, category = ?form.category))]
pub async fn change_category(
    RequireLogin(operator): RequireLogin,
    State(state): State<AppState>,
    Form(form): Form<CategoryForm>,
) -> Result<Html<String>, AppError> {
    let workspace = state.workspace(&operator).await;
    let category = CategoryId::parse_optional(form.category.as_deref());

    let change = workspace
        .lock()
        .await
        .navigator
        .begin_category_change(category)?;

    if let CategoryChange::Fetch { ticket, category } = change {
        let result = state.catalog().subcategories(&category).await.map(|v| v.entries);
        let _ = workspace
            .lock()
            .await
            .navigator
            .finish_category_change(ticket, result);
    }

    let ws = workspace.lock().await;
    let nav = &ws.navigator;
    Ok(render(&SubcategoriesTemplate {
        subcategories: SelectView::subcategories(nav),
        panel: PanelView::from_navigator(nav),
        bulk: BulkView::from_navigator(nav),
    }))
}

/// Subcategory chosen: load its products.
///
/// Without both selections the modal prompt is shown instead.
///
/// POST /catalog/products
#[instrument(skip_all, fields(operator = %operator.username, subcategory = ?form.subcategory))]
pub async fn load_products(
    RequireLogin(operator): RequireLogin,
    State(state): State<AppState>,
    Form(form): Form<SubcategoryForm>,
) -> Result<Response, AppError> {
    let workspace = state.workspace(&operator).await;
    let subcategory = SubcategoryId::parse_optional(form.subcategory.as_deref());

    let begun = workspace
        .lock()
        .await
        .navigator
        .begin_load_products(subcategory);
    let load = match begun {
        Ok(load) => load,
        Err(NavError::SelectionRequired) => {
            let prompt = render(&AlertTemplate::warning(
                "Missing selection",
                SELECTION_REQUIRED_MESSAGE,
            ));
            return Ok(retarget_to_modal(prompt));
        }
        Err(e) => return Err(e.into()),
    };

    let result = state
        .catalog()
        .products(&load.category, &load.subcategory)
        .await
        .map(|v| v.entries);
    let applied = workspace
        .lock()
        .await
        .navigator
        .finish_load_products(load.ticket, result);

    if applied == Applied::Current && state.config().detail_strategy == DetailStrategy::Prefetch {
        prefetch_details(&state, &workspace, load.ticket).await;
    }

    let ws = workspace.lock().await;
    Ok(render(&ProductsTemplate {
        panel: PanelView::from_navigator(&ws.navigator),
        bulk: BulkView::from_navigator(&ws.navigator),
    })
    .into_response())
}

/// Fetch full records for every product of the table produced by `ticket`.
async fn prefetch_details(state: &AppState, workspace: &SharedWorkspace, ticket: Ticket) {
    let ids: Vec<ProductId> = match workspace.lock().await.navigator.table() {
        Some(table) if table.ticket() == ticket => {
            table.products().iter().map(|p| p.id.clone()).collect()
        }
        _ => return,
    };
    if ids.is_empty() {
        return;
    }

    match state.catalog().product_details(&ids).await {
        Ok(validated) => {
            let _ = workspace
                .lock()
                .await
                .navigator
                .attach_details(ticket, validated.entries);
        }
        Err(e) => warn!(error = %e, "Failed to prefetch product details"),
    }
}

/// One checkbox changed.
///
/// POST /catalog/selection/toggle
#[instrument(skip_all, fields(operator = %operator.username, product = %form.product_id))]
pub async fn toggle_selection(
    RequireLogin(operator): RequireLogin,
    State(state): State<AppState>,
    Form(form): Form<ToggleForm>,
) -> Result<Html<String>, AppError> {
    let id = parse_product_id(&form.product_id)?;
    let workspace = state.workspace(&operator).await;

    let mut ws = workspace.lock().await;
    ws.navigator
        .toggle_product(&id, is_checked(form.checked.as_deref()))?;

    Ok(render(&BulkTemplate {
        bulk: BulkView::from_navigator(&ws.navigator),
    }))
}

/// Select-all checkbox changed.
///
/// POST /catalog/selection/all
#[instrument(skip_all, fields(operator = %operator.username))]
pub async fn select_all(
    RequireLogin(operator): RequireLogin,
    State(state): State<AppState>,
    Form(form): Form<SelectAllForm>,
) -> Result<Html<String>, AppError> {
    let workspace = state.workspace(&operator).await;

    let mut ws = workspace.lock().await;
    ws.navigator.select_all(is_checked(form.checked.as_deref()))?;

    Ok(render(&ProductsTemplate {
        panel: PanelView::from_navigator(&ws.navigator),
        bulk: BulkView::from_navigator(&ws.navigator),
    }))
}

/// Product detail modal.
///
/// A click on a product that is still loading gets `204`, which HTMX
/// ignores.
///
/// GET /catalog/products/{id}
#[instrument(skip_all, fields(operator = %operator.username, product = %id))]
pub async fn show_product(
    RequireLogin(operator): RequireLogin,
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Response, AppError> {
    let id = parse_product_id(&id)?;
    let workspace = state.workspace(&operator).await;

    match detail::load(state.config().detail_strategy, &workspace, state.catalog(), &id).await {
        Ok(product) => Ok(render(&DetailTemplate {
            detail: DetailView::from(&product),
        })
        .into_response()),
        Err(DetailError::Busy(_)) => Ok(StatusCode::NO_CONTENT.into_response()),
        Err(e) => {
            error!(error = %e, "Failed to load product details");
            Ok(render(&AlertTemplate::error("Error", DETAIL_FAILED)).into_response())
        }
    }
}

/// Send the product shown in the detail modal to Shopify.
///
/// POST /catalog/products/{id}/shopify
#[instrument(skip_all, fields(operator = %operator.username, product = %id))]
pub async fn submit_product(
    RequireLogin(operator): RequireLogin,
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Html<String>, AppError> {
    let id = parse_product_id(&id)?;
    let workspace = state.workspace(&operator).await;

    let displayed = workspace
        .lock()
        .await
        .displayed_detail
        .clone()
        .filter(|detail| *detail.id() == id);
    let product = match displayed {
        Some(product) => product,
        None => match detail::load(state.config().detail_strategy, &workspace, state.catalog(), &id)
            .await
        {
            Ok(product) => product,
            Err(e) => {
                error!(error = %e, "Failed to load product before sending");
                return Ok(render(&AlertTemplate::error("Error", DETAIL_FAILED)));
            }
        },
    };

    let alert = match state.submitter().submit_one(&product).await {
        SingleOutcome::Sent => {
            AlertTemplate::success("Success", "The product was sent to Shopify.")
        }
        SingleOutcome::Failed(message) => AlertTemplate::error("Error", message),
    };
    Ok(render(&alert))
}

/// Send the checked products to Shopify.
///
/// The request runs in the background; the returned modal polls
/// `/catalog/submissions/current` once per second.
///
/// POST /catalog/submissions
#[instrument(skip_all, fields(operator = %operator.username))]
pub async fn start_submission(
    RequireLogin(operator): RequireLogin,
    State(state): State<AppState>,
) -> Result<Html<String>, AppError> {
    let workspace = state.workspace(&operator).await;

    let timer = ElapsedTimer::start();
    let begun = workspace.lock().await.navigator.begin_batch(timer.subscribe());
    let (ticket, ids) = match begun {
        Ok(started) => started,
        Err(NavError::EmptySelection) => {
            return Ok(render(&AlertTemplate::warning(
                "No products selected",
                "Select at least one product to send.",
            )));
        }
        Err(NavError::BatchRunning) => {
            let ws = workspace.lock().await;
            let nav = &ws.navigator;
            return nav
                .batch()
                .map(|batch| render(&BatchTemplate::from_navigator(nav, batch)))
                .ok_or(AppError::Navigation(NavError::BatchRunning));
        }
        Err(e) => return Err(e.into()),
    };

    info!(count = ids.len(), "Bulk submission started");
    let submitter = state.submitter().clone();
    let task_workspace = Arc::clone(&workspace);
    tokio::spawn(
        async move {
            let outcome = submitter.submit_many(&ids, timer).await;
            task_workspace
                .lock()
                .await
                .navigator
                .finish_batch(ticket, outcome);
        }
        .in_current_span(),
    );

    let ws = workspace.lock().await;
    let nav = &ws.navigator;
    nav.batch()
        .map(|batch| render(&BatchTemplate::from_navigator(nav, batch)))
        .ok_or_else(|| AppError::Internal("submission vanished after start".to_string()))
}

/// Progress of the running submission, or its result.
///
/// A result is shown once; the next poll after it finds nothing.
///
/// GET /catalog/submissions/current
#[instrument(skip_all, fields(operator = %operator.username))]
pub async fn current_submission(
    RequireLogin(operator): RequireLogin,
    State(state): State<AppState>,
) -> Html<String> {
    let workspace = state.workspace(&operator).await;
    let mut ws = workspace.lock().await;

    let Some(batch) = ws.navigator.batch() else {
        return Html(String::new());
    };
    let finished = !batch.is_running();
    let page = render(&BatchTemplate::from_navigator(&ws.navigator, batch));

    if finished {
        ws.navigator.dismiss_batch();
    }
    page
}

/// Send a fragment to the modal container instead of the request's target.
fn retarget_to_modal(fragment: Html<String>) -> Response {
    (
        [("HX-Retarget", "#modal"), ("HX-Reswap", "innerHTML")],
        fragment,
    )
        .into_response()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_is_checked() {
        assert!(is_checked(Some("true")));
        assert!(is_checked(Some("on")));
        assert!(!is_checked(Some("false")));
        assert!(!is_checked(None));
    }

    #[test]
    fn test_category_select_has_placeholder_plus_options() {
        let mut nav = CatalogNavigator::default();
        let ticket = nav.begin_load_categories();
        let categories = serde_json::from_value(serde_json::json!([
            {"id": 1, "title": "Audio"},
            {"id": 2, "title": "Video"},
            {"id": 3, "title": "Redes"}
        ]))
        .unwrap();
        let _ = nav.finish_load_categories(ticket, Ok(categories));

        let template = CatalogPageTemplate {
            operator: Some("ana".to_string()),
            current_path: "/catalog",
            categories: SelectView::categories(&nav),
            subcategories: SelectView::subcategories(&nav),
            panel: PanelView::from_navigator(&nav),
            bulk: BulkView::from_navigator(&nav),
            batch: None,
        };
        let html = template.render().unwrap();

        let category_select = html
            .split("id=\"category-select\"")
            .nth(1)
            .and_then(|rest| rest.split("</select>").next())
            .unwrap();
        assert_eq!(category_select.matches("<option").count(), 4);
        assert!(template.subcategories.disabled);
        assert!(!template.bulk.enabled);
    }

    #[test]
    fn test_page_fetches_categories_after_load() {
        let mut nav = CatalogNavigator::default();
        let _ = nav.begin_load_categories();

        let template = CatalogPageTemplate {
            operator: Some("ana".to_string()),
            current_path: "/catalog",
            categories: SelectView::categories(&nav),
            subcategories: SelectView::subcategories(&nav),
            panel: PanelView::from_navigator(&nav),
            bulk: BulkView::from_navigator(&nav),
            batch: None,
        };
        let html = template.render().unwrap();

        assert!(template.categories.disabled);
        assert!(html.contains("hx-get=\"/catalog/categories\" hx-trigger=\"load\""));
        assert!(html.contains("Loading categories..."));
        assert!(!html.contains("batch-progress"));
    }

    #[test]
    fn test_page_shows_running_submission() {
        let nav = CatalogNavigator::default();

        let html = CatalogPageTemplate {
            operator: Some("ana".to_string()),
            current_path: "/catalog",
            categories: SelectView::categories(&nav),
            subcategories: SelectView::subcategories(&nav),
            panel: PanelView::from_navigator(&nav),
            bulk: BulkView::from_navigator(&nav),
            batch: Some(BatchView {
                running: true,
                product_ids: "101, 102".to_string(),
                elapsed_secs: 7,
                lines: Vec::new(),
                failure: None,
            }),
        }
        .render()
        .unwrap();

        assert!(html.contains("id=\"batch-progress\""));
        assert!(html.contains("hx-get=\"/catalog/submissions/current\""));
        assert!(html.contains("101, 102"));
        assert!(html.contains("7 seconds"));
        assert_eq!(html.matches("id=\"products-panel\"").count(), 1);
    }

    #[test]
    fn test_product_links_encode_ids() {
        let html = ProductsTemplate {
            panel: PanelView {
                error: None,
                table: Some(TableView {
                    rows: vec![ProductRowView {
                        id: "A/1#2".to_string(),
                        title: "Cable".to_string(),
                        description: String::new(),
                        thumbnail: catalog_sync_core::PLACEHOLDER_THUMBNAIL.to_string(),
                        checked: false,
                    }],
                    all_checked: false,
                }),
            },
            bulk: BulkView {
                enabled: false,
                selected: 0,
                running: false,
            },
        }
        .render()
        .unwrap();

        assert!(html.contains("hx-get=\"/catalog/products/A%2F1%232\""));
    }

    #[test]
    fn test_detail_modal_shows_out_of_stock() {
        let product = catalog_sync_core::ProductDetail::from_value(serde_json::json!({
            "id": 12,
            "title": "Parlante",
            "availability": {"availability": false}
        }))
        .unwrap();

        let html = DetailTemplate {
            detail: DetailView::from(&product),
        }
        .render()
        .unwrap();

        assert!(html.contains("Out of stock"));
        assert!(html.contains("/catalog/products/12/shopify"));
    }
}
