use serde::{Deserialize, Serialize};
use std::fmt;

/// One sellable item in the catalog
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CatalogRecord {
    pub name: String,
    pub price: u64,
    #[serde(default)]
    pub indexed: bool,
    #[serde(default)]
    pub backlinks: u64,
    #[serde(default)]
    pub traffic: u64,
    #[serde(default)]
    pub description: Option<String>,
}

impl CatalogRecord {
    pub fn new(name: impl Into<String>, price: u64) -> Self {
        Self {
            name: name.into(),
            price,
            indexed: false,
            backlinks: 0,
            traffic: 0,
            description: None,
        }
    }

    pub fn with_indexed(mut self, indexed: bool) -> Self {
        self.indexed = indexed;
        self
    }

    pub fn with_backlinks(mut self, backlinks: u64) -> Self {
        self.backlinks = backlinks;
        self
    }

    pub fn with_traffic(mut self, traffic: u64) -> Self {
        self.traffic = traffic;
        self
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    /// Description if present and not blank
    pub fn description(&self) -> Option<&str> {
        self.description
            .as_deref()
            .filter(|d| !d.trim().is_empty())
    }

    /// Check record invariants before it is written to a store
    pub fn validate(&self) -> Result<(), String> {
        if self.name.trim().is_empty() {
            return Err("record name must not be empty".to_string());
        }
        Ok(())
    }
}

impl fmt::Display for CatalogRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({})", self.name, self.price)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let record = CatalogRecord::new("example.com", 1500);
        assert!(!record.indexed);
        assert_eq!(record.backlinks, 0);
        assert_eq!(record.traffic, 0);
        assert_eq!(record.description(), None);
    }

    #[test]
    fn test_blank_description_is_absent() {
        let record = CatalogRecord::new("example.com", 1).with_description("   ");
        assert_eq!(record.description(), None);
    }

    #[test]
    fn test_validate_rejects_empty_name() {
        assert!(CatalogRecord::new("  ", 10).validate().is_err());
        assert!(CatalogRecord::new("a.ru", 10).validate().is_ok());
    }

    #[test]
    fn test_yaml_defaults() {
        let yaml = "name: crimea-tour.ru\nprice: 5000\n";
        let record: CatalogRecord = serde_yaml::from_str(yaml).unwrap();
        assert_eq!(record, CatalogRecord::new("crimea-tour.ru", 5000));
    }
}
