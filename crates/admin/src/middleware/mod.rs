//! HTTP middleware for admin.
//!
//! # Middleware Order (outermost first)
//!
//! 1. Sentry layers (capture errors, transactions)
//! 2. `TraceLayer` (request span with status and latency)
//! 3. Session layer (tower-sessions, in-memory store)
//!
//! Route protection is done per handler with the [`auth::RequireLogin`]
//! extractor rather than a blanket layer, so `/login` and `/health` stay
//! reachable.

pub mod auth;
pub mod session;

pub use auth::{OptionalLogin, RequireLogin, clear_login, is_htmx, set_logged_in};
pub use session::create_session_layer;
