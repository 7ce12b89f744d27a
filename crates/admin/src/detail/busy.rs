//! Per-product busy markers for detail loads.

use std::collections::HashSet;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use catalog_sync_core::ProductId;

use super::DetailError;

/// Products whose detail is being loaded.
#[derive(Debug, Clone, Default)]
pub struct BusySet {
    ids: Arc<Mutex<HashSet<ProductId>>>,
}

impl BusySet {
    /// Mark `id` busy until the returned guard is dropped.
    ///
    /// # Errors
    ///
    /// Returns [`DetailError::Busy`] if `id` is already busy.
    pub fn enter(&self, id: &ProductId) -> Result<BusyGuard, DetailError> {
        if !self.lock().insert(id.clone()) {
            return Err(DetailError::Busy(id.clone()));
        }
        Ok(BusyGuard {
            set: self.clone(),
            id: id.clone(),
        })
    }

    #[must_use]
    pub fn is_busy(&self, id: &ProductId) -> bool {
        self.lock().contains(id)
    }

    fn lock(&self) -> MutexGuard<'_, HashSet<ProductId>> {
        self.ids.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

/// Returns its product to idle when dropped.
#[derive(Debug)]
#[must_use = "the product is idle again as soon as the guard is dropped"]
pub struct BusyGuard {
    set: BusySet,
    id: ProductId,
}

impl Drop for BusyGuard {
    fn drop(&mut self) {
        self.set.lock().remove(&self.id);
    }
}
