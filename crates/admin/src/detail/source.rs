//! Where a product's full record comes from.

use std::future::Future;

use catalog_sync_core::{ProductDetail, ProductId};

use super::DetailError;
use crate::api::BackendClient;
use crate::catalog::ProductTable;

/// A way of obtaining a product's full record.
pub trait DetailSource {
    fn fetch(
        &self,
        id: &ProductId,
    ) -> impl Future<Output = Result<ProductDetail, DetailError>> + Send;
}

/// Reads the records fetched in bulk right after the table was loaded.
#[derive(Debug, Clone, Copy)]
pub struct Prefetched<'a> {
    table: Option<&'a ProductTable>,
}

impl<'a> Prefetched<'a> {
    #[must_use]
    pub const fn new(table: Option<&'a ProductTable>) -> Self {
        Self { table }
    }
}

impl DetailSource for Prefetched<'_> {
    async fn fetch(&self, id: &ProductId) -> Result<ProductDetail, DetailError> {
        self.table
            .and_then(|table| table.detail(id))
            .cloned()
            .ok_or_else(|| DetailError::NotPrefetched(id.clone()))
    }
}

/// Fetches the record from the catalog service on demand.
#[derive(Debug, Clone, Copy)]
pub struct Lazy<'a> {
    client: &'a BackendClient,
}

impl<'a> Lazy<'a> {
    #[must_use]
    pub const fn new(client: &'a BackendClient) -> Self {
        Self { client }
    }
}

impl DetailSource for Lazy<'_> {
    async fn fetch(&self, id: &ProductId) -> Result<ProductDetail, DetailError> {
        Ok(self.client.product(id).await?)
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;
    use crate::catalog::Generation;

    #[tokio::test]
    async fn test_prefetched_reads_side_table() {
        let products = serde_json::from_value(json!([{"id": 1, "title": "Mouse"}])).unwrap();
        let mut table = ProductTable::new(Generation::default().advance(), products);
        table.attach_details(vec![
            ProductDetail::from_value(json!({"id": 1, "title": "Mouse", "sku": "M-1"})).unwrap(),
        ]);

        let source = Prefetched::new(Some(&table));
        let detail = source.fetch(&ProductId::parse("1").unwrap()).await.unwrap();
        assert_eq!(detail.sku(), Some("M-1"));

        let missing = source.fetch(&ProductId::parse("2").unwrap()).await;
        assert!(matches!(missing, Err(DetailError::NotPrefetched(_))));
    }

    #[tokio::test]
    async fn test_prefetched_without_table() {
        let source = Prefetched::new(None);
        assert!(source.fetch(&ProductId::parse("1").unwrap()).await.is_err());
    }
}
