//! Application state shared across handlers.

use std::sync::Arc;
use std::time::Duration;

use tower_sessions::Session;

use crate::api::{ApiError, BackendClient};
use crate::catalog::{SharedWorkspace, WorkspaceRegistry};
use crate::config::AdminConfig;
use crate::models::CurrentOperator;
use crate::submit::BatchSubmitter;

/// Application state shared across all handlers.
#[derive(Clone)]
pub struct AppState {
    inner: Arc<AppStateInner>,
}

struct AppStateInner {
    config: AdminConfig,
    catalog: BackendClient,
    reports: BackendClient,
    auth: BackendClient,
    submitter: BatchSubmitter,
    workspaces: WorkspaceRegistry,
}

impl AppState {
    /// Build the state, creating one backend client per service.
    ///
    /// # Errors
    ///
    /// Returns error if an HTTP client cannot be built.
    pub fn new(config: AdminConfig) -> Result<Self, ApiError> {
        let timeout = config.backend_timeout;
        let catalog = BackendClient::new(&config.backends.catalog, timeout)?
            .with_bulk_timeout(config.bulk_timeout);
        let reports = BackendClient::new(&config.backends.report, timeout)?;
        let auth = BackendClient::new(&config.backends.auth, timeout)?;

        let session_lifetime = Duration::from_secs(config.session_hours.unsigned_abs() * 3600);

        Ok(Self {
            inner: Arc::new(AppStateInner {
                submitter: BatchSubmitter::new(catalog.clone()),
                workspaces: WorkspaceRegistry::new(session_lifetime),
                config,
                catalog,
                reports,
                auth,
            }),
        })
    }

    #[must_use]
    pub fn config(&self) -> &AdminConfig {
        &self.inner.config
    }

    /// Client for categories, products and the Shopify push endpoints.
    #[must_use]
    pub fn catalog(&self) -> &BackendClient {
        &self.inner.catalog
    }

    /// Client for the daily changed-products report.
    #[must_use]
    pub fn reports(&self) -> &BackendClient {
        &self.inner.reports
    }

    /// Client for operator login.
    #[must_use]
    pub fn auth(&self) -> &BackendClient {
        &self.inner.auth
    }

    #[must_use]
    pub fn submitter(&self) -> &BatchSubmitter {
        &self.inner.submitter
    }

    #[must_use]
    pub fn workspaces(&self) -> &WorkspaceRegistry {
        &self.inner.workspaces
    }

    /// The working state of a logged-in operator.
    pub async fn workspace(&self, operator: &CurrentOperator) -> SharedWorkspace {
        self.inner.workspaces.get_or_create(operator.workspace_id).await
    }

    /// Forget the working state of the session's operator, if any.
    pub async fn drop_workspace(&self, session: &Session) {
        if let Ok(Some(operator)) = session
            .get::<CurrentOperator>(crate::models::session_keys::CURRENT_OPERATOR)
            .await
        {
            self.inner.workspaces.remove(operator.workspace_id).await;
        }
    }
}
