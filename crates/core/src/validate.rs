//! Shape validation for catalog backend responses.
//!
//! Two levels of strictness apply:
//!
//! - **Top-level shape** is strict. A response without the expected
//!   container (`childs`, `childs[0].products`, `results`) is a
//!   [`ShapeError`] and fails the whole operation.
//! - **List entries** are validated one by one. An entry that does not
//!   decode is skipped and reported in [`Validated::skipped`] so the
//!   caller can log it; the rest of the list is kept.

use serde::de::DeserializeOwned;
use serde_json::Value;

use crate::types::{Category, ProductDetail, ProductSummary, Subcategory, SubmissionResult};

/// A response whose top-level structure is not what the operation expects.
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum ShapeError {
    #[error("expected a JSON array of {0}")]
    NotAList(&'static str),
    #[error("response does not contain a `childs` array")]
    MissingChilds,
    #[error("response does not contain a `childs[0].products` array")]
    MissingProducts,
    #[error("response does not contain a `results` array")]
    MissingResults,
    #[error("no product found in the response")]
    NoProduct,
}

/// Entries that passed validation, plus the raw entries that did not.
#[derive(Debug, Clone, PartialEq)]
pub struct Validated<T> {
    pub entries: Vec<T>,
    pub skipped: Vec<Value>,
}

impl<T> Validated<T> {
    #[must_use]
    pub const fn has_skipped(&self) -> bool {
        !self.skipped.is_empty()
    }
}

/// A list entry that validates independently of its siblings.
pub trait ListEntry: DeserializeOwned {
    /// Checks beyond decoding (e.g. non-blank title).
    fn is_complete(&self) -> bool {
        true
    }
}

impl ListEntry for Category {
    fn is_complete(&self) -> bool {
        !self.title.trim().is_empty()
    }
}

impl ListEntry for Subcategory {
    fn is_complete(&self) -> bool {
        !self.title.trim().is_empty()
    }
}

impl ListEntry for ProductSummary {}

/// Validate each entry of a list independently.
#[must_use]
pub fn entries<T: ListEntry>(list: &[Value]) -> Validated<T> {
    let mut validated = Validated {
        entries: Vec::with_capacity(list.len()),
        skipped: Vec::new(),
    };

    for raw in list {
        match serde_json::from_value::<T>(raw.clone()) {
            Ok(entry) if entry.is_complete() => validated.entries.push(entry),
            _ => validated.skipped.push(raw.clone()),
        }
    }

    validated
}

/// `GET /api/categories/` - a flat array of `{id, title}`.
///
/// # Errors
///
/// Returns [`ShapeError::NotAList`] if the body is not an array.
pub fn categories(body: &Value) -> Result<Validated<Category>, ShapeError> {
    body.as_array()
        .map(|list| entries(list))
        .ok_or(ShapeError::NotAList("categories"))
}

/// `GET /api/categories/{id}` - `{childs: [{id, title}, ...]}`.
///
/// # Errors
///
/// Returns [`ShapeError::MissingChilds`] if `childs` is absent or not an array.
pub fn subcategories(body: &Value) -> Result<Validated<Subcategory>, ShapeError> {
    body.get("childs")
        .and_then(Value::as_array)
        .map(|list| entries(list))
        .ok_or(ShapeError::MissingChilds)
}

/// `GET /api/categories/{id}/{sub}` - `{childs: [{products: [...]}]}`.
///
/// # Errors
///
/// Returns [`ShapeError::MissingChilds`] if there is no non-empty `childs`
/// array and [`ShapeError::MissingProducts`] if `childs[0].products` is not
/// an array.
pub fn products(body: &Value) -> Result<Validated<ProductSummary>, ShapeError> {
    let first_child = body
        .get("childs")
        .and_then(Value::as_array)
        .and_then(|childs| childs.first())
        .ok_or(ShapeError::MissingChilds)?;

    first_child
        .get("products")
        .and_then(Value::as_array)
        .map(|list| entries(list))
        .ok_or(ShapeError::MissingProducts)
}

/// `POST /api/products` - `{results: [{data: {...}}, ...]}`.
///
/// Items reported as errors, or whose `data` does not decode, are skipped.
///
/// # Errors
///
/// Returns [`ShapeError::MissingResults`] if `results` is absent.
pub fn product_details(body: &Value) -> Result<Validated<ProductDetail>, ShapeError> {
    let results = body
        .get("results")
        .and_then(Value::as_array)
        .ok_or(ShapeError::MissingResults)?;

    let mut validated = Validated {
        entries: Vec::with_capacity(results.len()),
        skipped: Vec::new(),
    };
    for item in results {
        match item.get("data").cloned().map(ProductDetail::from_value) {
            Some(Ok(detail)) => validated.entries.push(detail),
            _ => validated.skipped.push(item.clone()),
        }
    }
    Ok(validated)
}

/// `GET /api/product/{id}` - a single product detail object.
///
/// # Errors
///
/// Returns [`ShapeError::NoProduct`] if the body does not decode as a product.
pub fn product_detail(body: Value) -> Result<ProductDetail, ShapeError> {
    ProductDetail::from_value(body).map_err(|_| ShapeError::NoProduct)
}

/// `POST /api/shopify/create_products` - `{results: [...]}`.
///
/// # Errors
///
/// Returns [`ShapeError::MissingResults`] if `results` is absent.
pub fn submission_results(body: &Value) -> Result<Validated<SubmissionResult>, ShapeError> {
    let results = body
        .get("results")
        .and_then(Value::as_array)
        .ok_or(ShapeError::MissingResults)?;

    let mut validated = Validated {
        entries: Vec::with_capacity(results.len()),
        skipped: Vec::new(),
    };
    for item in results {
        match SubmissionResult::from_value(item) {
            Some(result) => validated.entries.push(result),
            None => validated.skipped.push(item.clone()),
        }
    }
    Ok(validated)
}
