//! Per-session working state.

use std::sync::Arc;
use std::time::Duration;

use catalog_sync_core::ProductDetail;
use moka::future::Cache;
use tokio::sync::Mutex;
use uuid::Uuid;

use super::navigator::CatalogNavigator;
use crate::detail::BusySet;
use crate::report::DailyReport;

/// Everything an operator has on screen.
#[derive(Debug, Default)]
pub struct Workspace {
    pub navigator: CatalogNavigator,
    /// Product whose detail view is open, for the single-submit action.
    pub displayed_detail: Option<ProductDetail>,
    pub report: Option<DailyReport>,
    pub busy: BusySet,
}

pub type SharedWorkspace = Arc<Mutex<Workspace>>;

/// Workspaces keyed by the id stored in the operator's session.
///
/// Entries expire after the same idle time as the session itself.
#[derive(Clone)]
pub struct WorkspaceRegistry {
    workspaces: Cache<Uuid, SharedWorkspace>,
}

impl WorkspaceRegistry {
    #[must_use]
    pub fn new(time_to_idle: Duration) -> Self {
        Self {
            workspaces: Cache::builder()
                .max_capacity(10_000)
                .time_to_idle(time_to_idle)
                .build(),
        }
    }

    /// Get the workspace for `id`, creating an empty one if needed.
    pub async fn get_or_create(&self, id: Uuid) -> SharedWorkspace {
        self.workspaces
            .get_with(id, async { Arc::new(Mutex::new(Workspace::default())) })
            .await
    }

    pub async fn remove(&self, id: Uuid) {
        self.workspaces.invalidate(&id).await;
    }
}

impl std::fmt::Debug for WorkspaceRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("WorkspaceRegistry")
            .field("entries", &self.workspaces.entry_count())
            .finish()
    }
}
