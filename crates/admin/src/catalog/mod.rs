//! Catalog browsing state.
//!
//! - [`Selector`]: a backend-populated dropdown with stale-response protection
//! - [`ProductTable`]: one rendered product list and its [`SelectionSet`]
//! - [`CatalogNavigator`]: the category → subcategory → products cascade
//! - [`WorkspaceRegistry`]: per-session state, shared between requests

mod navigator;
mod selection;
mod selector;
mod table;
mod workspace;

pub use navigator::{
    CatalogNavigator, CategoryChange, NavError, ProductsLoad, ProductsPanel,
    SELECTION_REQUIRED_MESSAGE,
};
pub use selection::SelectionSet;
pub use selector::{Applied, Generation, Selector, SelectorOption, SelectorState, Ticket};
pub use table::ProductTable;
pub use workspace::{SharedWorkspace, Workspace, WorkspaceRegistry};
