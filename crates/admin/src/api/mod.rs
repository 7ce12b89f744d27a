//! Catalog backend API client.
//!
//! This module provides:
//! - [`BackendClient`] for the catalog, report and login services
//! - [`ApiError`], the failure taxonomy shared by every call
//!
//! # Error taxonomy
//!
//! 1. Transport - the request never completed (connection refused, timeout)
//! 2. Rejected - the backend answered with a non-2xx status and an `{error}` body
//! 3. Shape - the body parsed but is missing the expected structure
//! 4. Decode - the body was not JSON at all

mod client;
mod error;

pub use client::BackendClient;
pub use error::ApiError;
