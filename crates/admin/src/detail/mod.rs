//! Product detail modal.
//!
//! A product's full record comes from a [`DetailSource`]: either the side
//! table prefetched with the product list ([`Prefetched`]) or a request per
//! click ([`Lazy`]). While a load runs the product is marked in a
//! [`BusySet`] so repeated clicks are refused instead of stacking requests.

mod busy;
mod source;
mod view;

pub use busy::{BusyGuard, BusySet};
pub use source::{DetailSource, Lazy, Prefetched};
pub use view::{DetailView, IN_STOCK, NOT_AVAILABLE, NOT_SPECIFIED, OUT_OF_STOCK, sanitize};

use catalog_sync_core::{ProductDetail, ProductId};
use thiserror::Error;
use tracing::{debug, instrument};

use crate::api::{ApiError, BackendClient};
use crate::catalog::SharedWorkspace;
use crate::config::DetailStrategy;

/// Errors from loading a product's detail.
#[derive(Debug, Error)]
pub enum DetailError {
    #[error("Product {0} is already loading")]
    Busy(ProductId),

    #[error("No prefetched detail for product {0}")]
    NotPrefetched(ProductId),

    #[error(transparent)]
    Api(#[from] ApiError),
}

/// Load a product's full record and remember it as the displayed product.
///
/// With [`DetailStrategy::Prefetch`] a miss in the side table falls back to
/// a direct request.
///
/// # Errors
///
/// Returns [`DetailError::Busy`] if the same product is already loading,
/// or the backend error of the direct request.
#[instrument(skip_all, fields(product = %id, ?strategy))]
pub async fn load(
    strategy: DetailStrategy,
    workspace: &SharedWorkspace,
    client: &BackendClient,
    id: &ProductId,
) -> Result<ProductDetail, DetailError> {
    let busy = workspace.lock().await.busy.clone();
    let _guard = busy.enter(id)?;

    let prefetched = match strategy {
        DetailStrategy::Prefetch => {
            let ws = workspace.lock().await;
            Prefetched::new(ws.navigator.table()).fetch(id).await
        }
        DetailStrategy::Lazy => Err(DetailError::NotPrefetched(id.clone())),
    };

    let detail = match prefetched {
        Ok(detail) => detail,
        Err(e) => {
            if strategy == DetailStrategy::Prefetch {
                debug!(error = %e, "Prefetched detail missing, fetching directly");
            }
            Lazy::new(client).fetch(id).await?
        }
    };

    workspace.lock().await.displayed_detail = Some(detail.clone());
    Ok(detail)
}
