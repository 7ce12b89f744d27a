//! Integration tests for Catalog Sync.
//!
//! Every test stands up a local `wiremock` server in place of the catalog,
//! report and login backends, so no real network traffic is made.
//!
//! # Running Tests
//!
//! ```bash
//! cargo test -p catalog-sync-integration-tests
//! ```
//!
//! # Test Categories
//!
//! - `backend_client` - `BackendClient` against mocked backend responses
//! - `panel_flow` - the full router driven request by request

use std::collections::HashMap;

use catalog_sync_admin::config::{AdminConfig, ConfigError};

/// Build a config whose backends all point at `backend_url`.
///
/// # Errors
///
/// Returns error if the URL or an override is invalid.
pub fn config_for(backend_url: &str, overrides: &[(&str, &str)]) -> Result<AdminConfig, ConfigError> {
    let mut vars: HashMap<String, String> = HashMap::from([
        ("CATALOG_API_URL".to_string(), backend_url.to_string()),
        ("REPORT_API_URL".to_string(), backend_url.to_string()),
        ("BACKEND_TIMEOUT_SECS".to_string(), "5".to_string()),
    ]);
    for (key, value) in overrides {
        vars.insert((*key).to_string(), (*value).to_string());
    }
    AdminConfig::from_lookup(|key| vars.get(key).cloned())
}
