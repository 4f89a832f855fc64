use async_trait::async_trait;

use crate::application::errors::StoreError;
use crate::domain::entities::CatalogRecord;

/// CatalogStore trait - read access to the catalog of sellable records
#[async_trait]
pub trait CatalogStore: Send + Sync {
    /// Every record, in insertion order
    async fn list_all(&self) -> Result<Vec<CatalogRecord>, StoreError>;

    /// Records whose name contains `keyword` (case-sensitive), in insertion order
    async fn find_by_keyword(&self, keyword: &str) -> Result<Vec<CatalogRecord>, StoreError>;
}

