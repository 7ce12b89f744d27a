//! Session-stored operator identity.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// The logged-in operator.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CurrentOperator {
    pub username: String,
    /// Key of this session's entry in the workspace registry.
    pub workspace_id: Uuid,
}

impl CurrentOperator {
    #[must_use]
    pub fn new(username: impl Into<String>) -> Self {
        Self {
            username: username.into(),
            workspace_id: Uuid::new_v4(),
        }
    }
}

/// Session keys for login state.
pub mod keys {
    /// `true` while the operator is logged in.
    pub const LOGGED_IN: &str = "logged_in";

    /// The [`super::CurrentOperator`].
    pub const CURRENT_OPERATOR: &str = "current_operator";
}
