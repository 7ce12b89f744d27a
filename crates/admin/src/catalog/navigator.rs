//! Category → subcategory → products cascade for one operator.

use catalog_sync_core::{
    Category, CategoryId, ProductDetail, ProductId, ProductSummary, Subcategory, SubcategoryId,
};
use thiserror::Error;
use tokio::sync::watch;
use tracing::{debug, error};

use super::selector::{Applied, Generation, Selector, Ticket};
use super::table::ProductTable;
use crate::api::ApiError;
use crate::submit::{BatchOutcome, BatchProgress};

/// Prompt shown when products are requested without both selections.
pub const SELECTION_REQUIRED_MESSAGE: &str = "Please select a category and a subcategory";

/// A navigator operation that cannot run in the current state.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum NavError {
    #[error("{SELECTION_REQUIRED_MESSAGE}")]
    SelectionRequired,

    #[error("Unknown {kind} '{id}'")]
    UnknownOption { kind: &'static str, id: String },

    #[error("No products are displayed")]
    NoTable,

    #[error("Product {0} is not displayed")]
    NotRendered(ProductId),

    #[error("No products are selected")]
    EmptySelection,

    #[error("A submission is already running")]
    BatchRunning,
}

/// What the caller must fetch after a category change.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CategoryChange {
    /// The placeholder was chosen; nothing to fetch.
    Cleared,
    Fetch {
        ticket: Ticket,
        category: CategoryId,
    },
}

/// A product load the caller must perform.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProductsLoad {
    pub ticket: Ticket,
    pub category: CategoryId,
    pub subcategory: SubcategoryId,
}

/// What the products area currently shows.
#[derive(Debug, Clone, Default)]
pub enum ProductsPanel {
    #[default]
    Hidden,
    Loading,
    Failed(String),
    Table(ProductTable),
}

/// State of the catalog page for one operator session.
///
/// Every network step is split into `begin_*`, which updates the state and
/// returns what to fetch, and `finish_*`, which applies the response only if
/// nothing newer started in between. Callers hold the navigator lock for
/// each half but never across the request itself.
#[derive(Debug, Default)]
pub struct CatalogNavigator {
    categories: Selector<Category>,
    subcategories: Selector<Subcategory>,
    products: ProductsPanel,
    products_generation: Generation,
    batch: Option<BatchProgress>,
}

impl CatalogNavigator {
    #[must_use]
    pub const fn categories(&self) -> &Selector<Category> {
        &self.categories
    }

    #[must_use]
    pub const fn subcategories(&self) -> &Selector<Subcategory> {
        &self.subcategories
    }

    #[must_use]
    pub const fn products(&self) -> &ProductsPanel {
        &self.products
    }

    /// The displayed product table, if any.
    #[must_use]
    pub const fn table(&self) -> Option<&ProductTable> {
        match &self.products {
            ProductsPanel::Table(table) => Some(table),
            _ => None,
        }
    }

    #[must_use]
    pub const fn batch(&self) -> Option<&BatchProgress> {
        self.batch.as_ref()
    }

    /// Whether the bulk action is available right now.
    #[must_use]
    pub fn bulk_submit_enabled(&self) -> bool {
        self.table().is_some_and(ProductTable::bulk_submit_enabled)
            && !self.batch.as_ref().is_some_and(BatchProgress::is_running)
    }

    /// Start (re)loading the category list. Everything below it is reset.
    pub fn begin_load_categories(&mut self) -> Ticket {
        self.subcategories.reset();
        self.clear_products();
        self.categories.begin()
    }

    pub fn finish_load_categories(
        &mut self,
        ticket: Ticket,
        result: Result<Vec<Category>, ApiError>,
    ) -> Applied {
        let result = result.map_err(|e| {
            error!(error = %e, "Failed to load categories");
            e.to_string()
        });
        log_stale("categories", self.categories.finish(ticket, result))
    }

    /// React to a new category choice.
    ///
    /// The subcategory selector and product table are reset whatever the
    /// choice. Choosing the placeholder stops there.
    ///
    /// # Errors
    ///
    /// Returns [`NavError::UnknownOption`] if `category` is not listed.
    pub fn begin_category_change(
        &mut self,
        category: Option<CategoryId>,
    ) -> Result<CategoryChange, NavError> {
        self.subcategories.reset();
        self.clear_products();

        let Some(category) = category else {
            let _ = self.categories.select(None);
            return Ok(CategoryChange::Cleared);
        };

        if !self.categories.select(Some(category.clone())) {
            return Err(NavError::UnknownOption {
                kind: "category",
                id: category.to_string(),
            });
        }

        Ok(CategoryChange::Fetch {
            ticket: self.subcategories.begin(),
            category,
        })
    }

    pub fn finish_category_change(
        &mut self,
        ticket: Ticket,
        result: Result<Vec<Subcategory>, ApiError>,
    ) -> Applied {
        let result = result.map_err(|e| {
            error!(error = %e, "Failed to load subcategories");
            e.to_string()
        });
        log_stale("subcategories", self.subcategories.finish(ticket, result))
    }

    /// Start loading the products of a subcategory.
    ///
    /// Any previous table, and with it the selection, is discarded.
    ///
    /// # Errors
    ///
    /// Returns [`NavError::SelectionRequired`] unless a category is selected
    /// and `subcategory` is given, and [`NavError::UnknownOption`] if the
    /// subcategory is not listed.
    pub fn begin_load_products(
        &mut self,
        subcategory: Option<SubcategoryId>,
    ) -> Result<ProductsLoad, NavError> {
        let (Some(category), Some(subcategory)) = (self.categories.selected().cloned(), subcategory)
        else {
            return Err(NavError::SelectionRequired);
        };

        if !self.subcategories.select(Some(subcategory.clone())) {
            return Err(NavError::UnknownOption {
                kind: "subcategory",
                id: subcategory.to_string(),
            });
        }

        let ticket = self.products_generation.advance();
        self.products = ProductsPanel::Loading;
        Ok(ProductsLoad {
            ticket,
            category,
            subcategory,
        })
    }

    pub fn finish_load_products(
        &mut self,
        ticket: Ticket,
        result: Result<Vec<ProductSummary>, ApiError>,
    ) -> Applied {
        if !self.products_generation.is_current(ticket) {
            return log_stale("products", Applied::Stale);
        }

        self.products = match result {
            Ok(products) => ProductsPanel::Table(ProductTable::new(ticket, products)),
            Err(e) => {
                error!(error = %e, "Failed to load products");
                ProductsPanel::Failed(e.to_string())
            }
        };
        Applied::Current
    }

    /// Attach prefetched full records to the table produced by `ticket`.
    pub fn attach_details(&mut self, ticket: Ticket, details: Vec<ProductDetail>) -> Applied {
        match &mut self.products {
            ProductsPanel::Table(table) if table.ticket() == ticket => {
                table.attach_details(details);
                Applied::Current
            }
            _ => log_stale("product details", Applied::Stale),
        }
    }

    /// Check or uncheck one displayed product.
    ///
    /// # Errors
    ///
    /// Returns [`NavError::NoTable`] if no table is shown and
    /// [`NavError::NotRendered`] if the product is not in it.
    pub fn toggle_product(&mut self, id: &ProductId, checked: bool) -> Result<(), NavError> {
        let table = self.table_mut()?;
        if table.toggle(id, checked) {
            Ok(())
        } else {
            Err(NavError::NotRendered(id.clone()))
        }
    }

    /// Check or uncheck every displayed product.
    ///
    /// # Errors
    ///
    /// Returns [`NavError::NoTable`] if no table is shown.
    pub fn select_all(&mut self, checked: bool) -> Result<(), NavError> {
        self.table_mut()?.set_all(checked);
        Ok(())
    }

    /// Snapshot the selection and record a running bulk submission.
    ///
    /// # Errors
    ///
    /// Returns [`NavError::BatchRunning`] while another submission runs,
    /// [`NavError::NoTable`] without a table and [`NavError::EmptySelection`]
    /// if nothing is checked.
    pub fn begin_batch(
        &mut self,
        elapsed: watch::Receiver<u64>,
    ) -> Result<(Ticket, Vec<ProductId>), NavError> {
        if self.batch.as_ref().is_some_and(BatchProgress::is_running) {
            return Err(NavError::BatchRunning);
        }

        let table = self.table().ok_or(NavError::NoTable)?;
        if table.selection().is_empty() {
            return Err(NavError::EmptySelection);
        }

        let ticket = table.ticket();
        let ids = table.selection().ids();
        self.batch = Some(BatchProgress::new(ticket, ids.clone(), elapsed));
        Ok((ticket, ids))
    }

    /// Record the outcome of the submission started for table `ticket`.
    ///
    /// A completed request clears the selection if that table is still
    /// shown. A failed one leaves it untouched so the operator can retry.
    pub fn finish_batch(&mut self, ticket: Ticket, outcome: BatchOutcome) {
        if outcome.is_completed()
            && let ProductsPanel::Table(table) = &mut self.products
            && table.ticket() == ticket
        {
            table.clear_selection();
        }

        match &mut self.batch {
            Some(batch) if batch.table() == ticket && batch.is_running() => batch.finish(outcome),
            _ => debug!("Discarding outcome of a replaced submission"),
        }
    }

    /// Forget a finished submission once its result has been shown.
    pub fn dismiss_batch(&mut self) {
        if !self.batch.as_ref().is_some_and(BatchProgress::is_running) {
            self.batch = None;
        }
    }

    fn clear_products(&mut self) {
        self.products_generation.advance();
        self.products = ProductsPanel::Hidden;
    }

    fn table_mut(&mut self) -> Result<&mut ProductTable, NavError> {
        match &mut self.products {
            ProductsPanel::Table(table) => Ok(table),
            _ => Err(NavError::NoTable),
        }
    }
}

fn log_stale(what: &'static str, applied: Applied) -> Applied {
    if applied == Applied::Stale {
        debug!(what, "Discarding stale response");
    }
    applied
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    fn categories() -> Vec<Category> {
        serde_json::from_value(json!([
            {"id": 1, "title": "Audio"},
            {"id": 2, "title": "Video"}
        ]))
        .unwrap()
    }

    fn subcategories() -> Vec<Subcategory> {
        serde_json::from_value(json!([{"id": 10, "title": "Auriculares"}])).unwrap()
    }

    fn products() -> Vec<ProductSummary> {
        serde_json::from_value(json!([
            {"id": 100, "title": "Mouse"},
            {"id": 101, "title": "Teclado"}
        ]))
        .unwrap()
    }

    fn pid(raw: &str) -> ProductId {
        ProductId::parse(raw).unwrap()
    }

    /// Navigator with categories loaded, category 1 chosen and its
    /// subcategories listed.
    fn with_subcategories() -> CatalogNavigator {
        let mut nav = CatalogNavigator::default();
        let ticket = nav.begin_load_categories();
        let _ = nav.finish_load_categories(ticket, Ok(categories()));

        let CategoryChange::Fetch { ticket, .. } = nav
            .begin_category_change(CategoryId::parse_optional(Some("1")))
            .unwrap()
        else {
            panic!("expected a fetch");
        };
        let _ = nav.finish_category_change(ticket, Ok(subcategories()));
        nav
    }

    fn with_table() -> CatalogNavigator {
        let mut nav = with_subcategories();
        let load = nav
            .begin_load_products(SubcategoryId::parse_optional(Some("10")))
            .unwrap();
        let _ = nav.finish_load_products(load.ticket, Ok(products()));
        nav
    }

    #[test]
    fn test_categories_populate_selector() {
        let mut nav = CatalogNavigator::default();
        let ticket = nav.begin_load_categories();
        assert!(nav.categories().is_loading());

        let _ = nav.finish_load_categories(ticket, Ok(categories()));

        assert_eq!(nav.categories().options().len(), 2);
        assert!(!nav.subcategories().is_populated());
    }

    #[test]
    fn test_category_failure_keeps_selector_empty() {
        let mut nav = CatalogNavigator::default();
        let ticket = nav.begin_load_categories();

        let _ = nav.finish_load_categories(ticket, Err(ApiError::Transport("refused".into())));

        assert!(nav.categories().options().is_empty());
        assert!(nav.categories().error().is_some());
    }

    #[test]
    fn test_placeholder_resets_lower_levels() {
        let mut nav = with_table();

        let change = nav.begin_category_change(None).unwrap();

        assert_eq!(change, CategoryChange::Cleared);
        assert!(!nav.subcategories().is_populated());
        assert!(matches!(nav.products(), ProductsPanel::Hidden));
        assert!(!nav.bulk_submit_enabled());
    }

    #[test]
    fn test_stale_subcategories_are_discarded() {
        let mut nav = CatalogNavigator::default();
        let ticket = nav.begin_load_categories();
        let _ = nav.finish_load_categories(ticket, Ok(categories()));

        let CategoryChange::Fetch { ticket: first, .. } = nav
            .begin_category_change(CategoryId::parse_optional(Some("1")))
            .unwrap()
        else {
            panic!("expected a fetch");
        };
        let CategoryChange::Fetch { ticket: second, .. } = nav
            .begin_category_change(CategoryId::parse_optional(Some("2")))
            .unwrap()
        else {
            panic!("expected a fetch");
        };

        let newer: Vec<Subcategory> =
            serde_json::from_value(json!([{"id": 20, "title": "Proyectores"}])).unwrap();
        assert_eq!(nav.finish_category_change(second, Ok(newer)), Applied::Current);
        assert_eq!(
            nav.finish_category_change(first, Ok(subcategories())),
            Applied::Stale
        );
        assert_eq!(nav.subcategories().options()[0].title, "Proyectores");
    }

    #[test]
    fn test_unknown_category_is_rejected() {
        let mut nav = with_subcategories();
        let err = nav
            .begin_category_change(CategoryId::parse_optional(Some("99")))
            .unwrap_err();
        assert!(matches!(err, NavError::UnknownOption { kind: "category", .. }));
    }

    #[test]
    fn test_products_require_both_selections() {
        let mut nav = with_subcategories();
        assert_eq!(
            nav.begin_load_products(None).unwrap_err(),
            NavError::SelectionRequired
        );

        let mut empty = CatalogNavigator::default();
        assert_eq!(
            empty
                .begin_load_products(SubcategoryId::parse_optional(Some("10")))
                .unwrap_err(),
            NavError::SelectionRequired
        );
    }

    #[test]
    fn test_new_product_load_starts_with_empty_selection() {
        let mut nav = with_table();
        nav.toggle_product(&pid("100"), true).unwrap();
        assert!(nav.bulk_submit_enabled());

        let load = nav
            .begin_load_products(SubcategoryId::parse_optional(Some("10")))
            .unwrap();
        let _ = nav.finish_load_products(load.ticket, Ok(products()));

        assert!(nav.table().unwrap().selection().is_empty());
        assert!(!nav.bulk_submit_enabled());
    }

    #[test]
    fn test_stale_products_are_discarded() {
        let mut nav = with_subcategories();
        let first = nav
            .begin_load_products(SubcategoryId::parse_optional(Some("10")))
            .unwrap();
        let _ = nav.begin_category_change(None).unwrap();

        assert_eq!(
            nav.finish_load_products(first.ticket, Ok(products())),
            Applied::Stale
        );
        assert!(nav.table().is_none());
    }

    #[test]
    fn test_toggle_unknown_product_is_rejected() {
        let mut nav = with_table();
        assert_eq!(
            nav.toggle_product(&pid("5"), true),
            Err(NavError::NotRendered(pid("5")))
        );

        let mut empty = CatalogNavigator::default();
        assert_eq!(empty.select_all(true), Err(NavError::NoTable));
    }

    #[test]
    fn test_completed_batch_clears_selection() {
        let mut nav = with_table();
        nav.toggle_product(&pid("100"), true).unwrap();

        let (_tx, rx) = watch::channel(0);
        let (ticket, ids) = nav.begin_batch(rx).unwrap();
        assert_eq!(ids, vec![pid("100")]);
        assert!(!nav.bulk_submit_enabled());

        nav.finish_batch(
            ticket,
            BatchOutcome::Completed {
                results: vec![catalog_sync_core::SubmissionResult::Created {
                    product_id: pid("100"),
                    shopify_product_id: "9001".to_string(),
                }],
                elapsed_secs: 2,
            },
        );

        assert!(nav.table().unwrap().selection().is_empty());
        let batch = nav.batch().unwrap();
        let lines = batch.outcome().unwrap().summary_lines();
        assert_eq!(lines.len(), 1);
        assert_eq!(lines[0].text, "Product 100 - Shopify product 9001");
    }

    #[test]
    fn test_failed_batch_keeps_selection() {
        let mut nav = with_table();
        nav.select_all(true).unwrap();

        let (_tx, rx) = watch::channel(0);
        let (ticket, _) = nav.begin_batch(rx).unwrap();
        nav.finish_batch(
            ticket,
            BatchOutcome::Failed {
                message: crate::submit::BATCH_FAILURE_MESSAGE.to_string(),
                elapsed_secs: 1,
            },
        );

        assert_eq!(nav.table().unwrap().selection().len(), 2);
        assert!(nav.bulk_submit_enabled());
    }

    #[test]
    fn test_second_batch_is_refused_while_running() {
        let mut nav = with_table();
        nav.select_all(true).unwrap();

        let (_tx, rx) = watch::channel(0);
        nav.begin_batch(rx.clone()).unwrap();

        assert_eq!(nav.begin_batch(rx), Err(NavError::BatchRunning));
    }

    #[test]
    fn test_batch_requires_selection() {
        let mut nav = with_table();
        let (_tx, rx) = watch::channel(0);
        assert_eq!(nav.begin_batch(rx), Err(NavError::EmptySelection));
    }
}
