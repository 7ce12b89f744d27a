//! Core types for Catalog Sync.
//!
//! This module provides type-safe wrappers for catalog backend records.

pub mod catalog;
pub mod id;
pub mod price;
pub mod report;
pub mod submission;

pub use catalog::{
    Availability, Category, ExtraData, ImageSize, ImageVariation, PLACEHOLDER_THUMBNAIL,
    ProductDetail, ProductImage, ProductSummary, Subcategory,
};
pub use id::{CategoryId, IdError, ProductId, SubcategoryId};
pub use price::Price;
pub use report::{ReportDate, ReportDateError, ReportRow};
pub use submission::{SubmissionResult, error_message};
