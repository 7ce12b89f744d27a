//! Session middleware configuration for admin.
//!
//! Sessions live in memory: they only carry the login flag and the
//! operator's workspace id, and a restart simply asks operators to log in
//! again.

use tower_sessions::cookie::SameSite;
use tower_sessions::cookie::time::Duration;
use tower_sessions::{Expiry, MemoryStore, SessionManagerLayer};

use crate::config::AdminConfig;

/// Session cookie name for admin.
pub const SESSION_COOKIE_NAME: &str = "catalog_sync_session";

/// Create the session layer with an in-memory store.
///
/// Anonymous sessions expire after the configured session lifetime of
/// inactivity; logging in replaces this with an absolute expiry.
#[must_use]
pub fn create_session_layer(config: &AdminConfig) -> SessionManagerLayer<MemoryStore> {
    SessionManagerLayer::new(MemoryStore::default())
        .with_name(SESSION_COOKIE_NAME)
        .with_expiry(Expiry::OnInactivity(Duration::hours(config.session_hours)))
        .with_secure(config.is_secure())
        .with_same_site(SameSite::Lax)
        .with_http_only(true)
        .with_path("/")
}
