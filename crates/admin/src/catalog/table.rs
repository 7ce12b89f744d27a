//! One rendered product table and the selection scoped to it.

use std::collections::HashMap;

use catalog_sync_core::{ProductDetail, ProductId, ProductSummary};

use super::selection::SelectionSet;
use super::selector::Ticket;

/// Products shown after a subcategory load.
///
/// The selection belongs to the table: loading another subcategory creates
/// a new table and so an empty selection. Full product records fetched in
/// bulk after the load are kept alongside, keyed by product id.
#[derive(Debug, Clone)]
pub struct ProductTable {
    ticket: Ticket,
    products: Vec<ProductSummary>,
    selection: SelectionSet,
    details: HashMap<ProductId, ProductDetail>,
}

impl ProductTable {
    #[must_use]
    pub fn new(ticket: Ticket, products: Vec<ProductSummary>) -> Self {
        Self {
            ticket,
            products,
            selection: SelectionSet::default(),
            details: HashMap::new(),
        }
    }

    /// Ticket of the load that produced this table.
    #[must_use]
    pub const fn ticket(&self) -> Ticket {
        self.ticket
    }

    #[must_use]
    pub fn products(&self) -> &[ProductSummary] {
        &self.products
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.products.is_empty()
    }

    #[must_use]
    pub fn contains(&self, id: &ProductId) -> bool {
        self.products.iter().any(|p| p.id == *id)
    }

    #[must_use]
    pub const fn selection(&self) -> &SelectionSet {
        &self.selection
    }

    #[must_use]
    pub fn is_checked(&self, id: &ProductId) -> bool {
        self.selection.contains(id)
    }

    /// Check or uncheck a rendered product.
    ///
    /// Returns `false` without touching the selection if `id` is not part
    /// of this table.
    pub fn toggle(&mut self, id: &ProductId, checked: bool) -> bool {
        if !self.contains(id) {
            return false;
        }
        self.selection.toggle(id.clone(), checked);
        true
    }

    /// Check or uncheck every rendered product.
    pub fn set_all(&mut self, checked: bool) {
        if checked {
            self.selection = self.products.iter().map(|p| p.id.clone()).collect();
        } else {
            self.selection.clear();
        }
    }

    /// Whether every rendered product is checked.
    #[must_use]
    pub fn all_checked(&self) -> bool {
        !self.products.is_empty() && self.products.iter().all(|p| self.selection.contains(&p.id))
    }

    pub fn clear_selection(&mut self) {
        self.selection.clear();
    }

    /// The bulk action is available exactly when something is checked.
    #[must_use]
    pub fn bulk_submit_enabled(&self) -> bool {
        !self.selection.is_empty()
    }

    /// Store prefetched full records for this table's products.
    pub fn attach_details(&mut self, details: impl IntoIterator<Item = ProductDetail>) {
        for detail in details {
            if self.contains(detail.id()) {
                self.details.insert(detail.id().clone(), detail);
            }
        }
    }

    /// Prefetched full record of a product, if one was attached.
    #[must_use]
    pub fn detail(&self, id: &ProductId) -> Option<&ProductDetail> {
        self.details.get(id)
    }
}
