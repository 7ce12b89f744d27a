//! Catalog Sync Core - Shared types library.
//!
//! This crate provides the types used by the Catalog Sync admin panel:
//! - catalog taxonomy (categories, subcategories) and product records as
//!   returned by the catalog backend
//! - per-item results of pushing products to Shopify
//! - rows of the daily changed-products report
//!
//! # Architecture
//!
//! The core crate contains only types and response validation - no I/O, no
//! HTTP clients. Backend responses are decoded into `serde_json::Value` by
//! the caller and handed to [`validate`] to check their shape.
//!
//! # Modules
//!
//! - [`types`] - Newtype IDs, catalog records, prices, report rows
//! - [`validate`] - Shape validation with per-entry tolerance

#![cfg_attr(not(test), forbid(unsafe_code))]

mod de;
pub mod types;
pub mod validate;

pub use types::*;
pub use validate::{ShapeError, Validated};
