//! Types stored outside the backend.

pub mod session;

pub use session::{CurrentOperator, keys as session_keys};
