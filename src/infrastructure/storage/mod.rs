//! In-memory catalog store and record file loading

use async_trait::async_trait;
use std::path::Path;
use std::sync::Arc;
use tokio::sync::RwLock;

use crate::application::errors::StoreError;
use crate::domain::entities::CatalogRecord;
use crate::domain::traits::CatalogStore;

/// Catalog held in memory, in insertion order
#[derive(Clone, Default)]
pub struct MemoryCatalog {
    records: Arc<RwLock<Vec<CatalogRecord>>>,
}

impl MemoryCatalog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build from records; later duplicates of a name are dropped
    pub fn from_records(records: Vec<CatalogRecord>) -> Self {
        let mut unique: Vec<CatalogRecord> = Vec::with_capacity(records.len());
        for record in records {
            if unique.iter().any(|r| r.name == record.name) {
                tracing::warn!("Skipping duplicate record {}", record.name);
                continue;
            }
            unique.push(record);
        }
        Self {
            records: Arc::new(RwLock::new(unique)),
        }
    }

    /// Load a YAML or JSON records file
    pub async fn load(path: impl AsRef<Path>) -> Result<Self, StoreError> {
        let records = load_records(path.as_ref()).await?;
        Ok(Self::from_records(records))
    }

    pub async fn len(&self) -> usize {
        self.records.read().await.len()
    }
}

#[async_trait]
impl CatalogStore for MemoryCatalog {
    async fn list_all(&self) -> Result<Vec<CatalogRecord>, StoreError> {
        let records = self.records.read().await;
        Ok(records.clone())
    }

    async fn find_by_keyword(&self, keyword: &str) -> Result<Vec<CatalogRecord>, StoreError> {
        let records = self.records.read().await;
        Ok(records
            .iter()
            .filter(|r| r.name.contains(keyword))
            .cloned()
            .collect())
    }
}

/// Read a list of records; `.json` files are JSON, anything else YAML
pub async fn load_records(path: &Path) -> Result<Vec<CatalogRecord>, StoreError> {
    let content = tokio::fs::read_to_string(path).await?;
    let is_json = path
        .extension()
        .and_then(|e| e.to_str())
        .is_some_and(|e| e.eq_ignore_ascii_case("json"));

    let records: Vec<CatalogRecord> = if is_json {
        serde_json::from_str(&content)
            .map_err(|e| StoreError::InvalidRecord(format!("{}: {}", path.display(), e)))?
    } else {
        serde_yaml::from_str(&content)
            .map_err(|e| StoreError::InvalidRecord(format!("{}: {}", path.display(), e)))?
    };

    for record in &records {
        record.validate().map_err(StoreError::InvalidRecord)?;
    }
    Ok(records)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_duplicates_dropped() {
        let catalog = MemoryCatalog::from_records(vec![
            CatalogRecord::new("a.ru", 1),
            CatalogRecord::new("a.ru", 2),
            CatalogRecord::new("b.ru", 3),
        ]);
        let all = catalog.list_all().await.unwrap();
        assert_eq!(all.len(), 2);
        assert_eq!(all[0].price, 1);
    }

    #[tokio::test]
    async fn test_load_yaml_file() {
        let path = std::env::temp_dir().join(format!("catalog-{}.yaml", uuid::Uuid::new_v4()));
        tokio::fs::write(
            &path,
            "- name: crimea.ru\n  price: 100\n  indexed: true\n- name: yalta.ru\n  price: 50\n  description: Ялта\n",
        )
        .await
        .unwrap();

        let catalog = MemoryCatalog::load(&path).await.unwrap();
        let _ = tokio::fs::remove_file(&path).await;

        let all = catalog.list_all().await.unwrap();
        assert_eq!(all.len(), 2);
        assert!(all[0].indexed);
        assert_eq!(all[1].description(), Some("Ялта"));
    }

    #[tokio::test]
    async fn test_load_rejects_blank_name() {
        let path = std::env::temp_dir().join(format!("catalog-{}.json", uuid::Uuid::new_v4()));
        tokio::fs::write(&path, r#"[{"name": "", "price": 1}]"#).await.unwrap();

        let result = load_records(&path).await;
        let _ = tokio::fs::remove_file(&path).await;
        assert!(matches!(result, Err(StoreError::InvalidRecord(_))));
    }

    #[tokio::test]
    async fn test_missing_file_is_unavailable() {
        let result = MemoryCatalog::load("/nonexistent/catalog.yaml").await;
        assert!(matches!(result, Err(StoreError::Unavailable(_))));
    }
}
