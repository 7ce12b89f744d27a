//! HTTP route handlers for admin.
//!
//! # Route Structure
//!
//! ```text
//! GET  /                                  - Redirect to the catalog
//!
//! # Auth
//! GET  /login                             - Login page (or welcome back)
//! POST /login                             - Check credentials with the auth service
//! POST /logout                            - Logout
//!
//! # Catalog (HTMX fragments unless noted)
//! GET  /catalog                           - Catalog page (full page)
//! GET  /catalog/categories                - Category selector, fetched on page load
//! POST /catalog/category                  - Category chosen: subcategory selector
//! POST /catalog/products                  - Subcategory chosen: product table
//! POST /catalog/selection/toggle          - One checkbox: bulk-submit control
//! POST /catalog/selection/all             - Select all: table + bulk-submit control
//! GET  /catalog/products/{id}             - Detail modal
//! POST /catalog/products/{id}/shopify     - Send the displayed product
//! POST /catalog/submissions               - Send the checked products
//! GET  /catalog/submissions/current       - Progress or result of the running send
//!
//! # Reports
//! GET  /reports                           - Daily changed-products report
//! GET  /reports/{date}/rows/{id}          - Report row detail modal
//! ```

pub mod auth;
pub mod catalog;
pub mod reports;

use askama::Template;
use axum::{
    Router,
    response::{Html, Redirect},
    routing::get,
};

use crate::state::AppState;

/// Build the router for every page and fragment.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/", get(index))
        .merge(auth::router())
        .merge(catalog::router())
        .merge(reports::router())
}

async fn index() -> Redirect {
    Redirect::to("/catalog")
}

/// Render a template, logging and hiding render failures.
pub(crate) fn render<T: Template>(template: &T) -> Html<String> {
    Html(template.render().unwrap_or_else(|e| {
        tracing::error!("Template render error: {}", e);
        "Internal Server Error".to_string()
    }))
}

/// A message shown in the modal container.
#[derive(Template)]
#[template(path = "partials/alert.html")]
pub struct AlertTemplate {
    pub kind: AlertKind,
    pub title: &'static str,
    pub message: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AlertKind {
    Success,
    Warning,
    Error,
}

impl AlertKind {
    #[must_use]
    pub const fn css_class(self) -> &'static str {
        match self {
            Self::Success => "alert-success",
            Self::Warning => "alert-warning",
            Self::Error => "alert-error",
        }
    }
}

impl AlertTemplate {
    pub fn success(title: &'static str, message: impl Into<String>) -> Self {
        Self {
            kind: AlertKind::Success,
            title,
            message: message.into(),
        }
    }

    pub fn warning(title: &'static str, message: impl Into<String>) -> Self {
        Self {
            kind: AlertKind::Warning,
            title,
            message: message.into(),
        }
    }

    pub fn error(title: &'static str, message: impl Into<String>) -> Self {
        Self {
            kind: AlertKind::Error,
            title,
            message: message.into(),
        }
    }
}
