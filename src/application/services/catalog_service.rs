use crate::application::errors::StoreError;
use crate::domain::entities::CatalogRecord;
use crate::domain::traits::CatalogStore;

/// Catalog query engine: list and keyword search over a store
pub struct CatalogService<S: CatalogStore> {
    store: S,
}

impl<S: CatalogStore> CatalogService<S> {
    pub fn new(store: S) -> Self {
        Self { store }
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    /// Every record in store order
    pub async fn list_all(&self) -> Result<Vec<CatalogRecord>, StoreError> {
        let records = self.store.list_all().await?;
        tracing::debug!("Catalog listing returned {} records", records.len());
        Ok(records)
    }

    /// Records whose name contains `keyword`, in store order.
    ///
    /// Blank keywords are the caller's problem; this never filters them.
    pub async fn search(&self, keyword: &str) -> Result<Vec<CatalogRecord>, StoreError> {
        let records = self.store.find_by_keyword(keyword).await?;
        tracing::debug!("Search '{}' matched {} records", keyword, records.len());
        Ok(records)
    }
}
