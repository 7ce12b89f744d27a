//! Products checked for bulk submission.

use std::collections::BTreeSet;

use catalog_sync_core::ProductId;

/// Set of checked product ids.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SelectionSet {
    ids: BTreeSet<ProductId>,
}

impl SelectionSet {
    /// Check or uncheck one product. Returns whether the set changed.
    pub fn toggle(&mut self, id: ProductId, checked: bool) -> bool {
        if checked {
            self.ids.insert(id)
        } else {
            self.ids.remove(&id)
        }
    }

    #[must_use]
    pub fn contains(&self, id: &ProductId) -> bool {
        self.ids.contains(id)
    }

    pub fn clear(&mut self) {
        self.ids.clear();
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.ids.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &ProductId> {
        self.ids.iter()
    }

    /// Checked ids in ascending order.
    #[must_use]
    pub fn ids(&self) -> Vec<ProductId> {
        self.ids.iter().cloned().collect()
    }
}

impl FromIterator<ProductId> for SelectionSet {
    fn from_iter<I: IntoIterator<Item = ProductId>>(iter: I) -> Self {
        Self {
            ids: iter.into_iter().collect(),
        }
    }
}
