//! Configuration management

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use crate::application::errors::ConfigError;
use crate::application::formatter::ReplyFormatter;
use crate::application::messaging::RouterSettings;

/// Bot configuration
#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
#[serde(rename_all = "kebab-case", default)]
pub struct Config {
    pub bot: BotConfig,
    pub catalog: CatalogConfig,
    pub storefront: StorefrontConfig,
    pub adapters: AdaptersConfig,
}

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(rename_all = "kebab-case", default)]
pub struct BotConfig {
    pub name: String,
    pub prefix: String,
}

/// Catalog source and listing limits
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(rename_all = "kebab-case", default)]
pub struct CatalogConfig {
    pub database: PathBuf,
    /// Records file served from memory instead of the database
    pub seed_file: Option<PathBuf>,
    pub page_size: usize,
    pub free_text_limit: usize,
    pub min_query_length: usize,
}

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(rename_all = "kebab-case", default)]
pub struct StorefrontConfig {
    pub contact: String,
    pub currency: String,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
#[serde(rename_all = "kebab-case", default)]
pub struct AdaptersConfig {
    pub telegram: TelegramConfig,
    pub console: ConsoleConfig,
}

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(rename_all = "kebab-case", default)]
pub struct TelegramConfig {
    pub enabled: bool,
    pub token: Option<String>,
    /// Long-poll timeout for getUpdates, in seconds
    pub poll_timeout: i64,
}

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(rename_all = "kebab-case", default)]
pub struct ConsoleConfig {
    pub enabled: bool,
}

impl Default for BotConfig {
    fn default() -> Self {
        Self {
            name: "domain-store-bot".to_string(),
            prefix: "/".to_string(),
        }
    }
}

impl Default for CatalogConfig {
    fn default() -> Self {
        let limits = RouterSettings::default();
        Self {
            database: PathBuf::from("domains.db"),
            seed_file: None,
            page_size: limits.page_size,
            free_text_limit: limits.free_text_limit,
            min_query_length: limits.min_query_length,
        }
    }
}

impl Default for StorefrontConfig {
    fn default() -> Self {
        let formatter = ReplyFormatter::default();
        Self {
            contact: formatter.contact().to_string(),
            currency: "руб.".to_string(),
        }
    }
}

impl Default for TelegramConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            token: None,
            poll_timeout: 30,
        }
    }
}

impl Default for ConsoleConfig {
    fn default() -> Self {
        Self { enabled: true }
    }
}

impl Config {
    pub fn load(path: impl Into<PathBuf>) -> Result<Self, ConfigError> {
        let path = path.into();
        let content = std::fs::read_to_string(&path)
            .map_err(|e| ConfigError::Parse(format!("Failed to read config: {}", e)))?;

        Self::from_yaml(&content)
    }

    /// Load `path` if it exists, otherwise start from defaults. A file that
    /// exists but does not parse or validate is an error.
    pub fn load_or_default(path: impl Into<PathBuf>) -> Result<Self, ConfigError> {
        let path = path.into();
        if path.exists() {
            Self::load(path)
        } else {
            tracing::debug!("No config at {}, using defaults", path.display());
            Ok(Self::default())
        }
    }

    pub fn from_yaml(content: &str) -> Result<Self, ConfigError> {
        let config: Config = serde_yaml::from_str(content)
            .map_err(|e| ConfigError::Parse(format!("Failed to parse config: {}", e)))?;
        config.validate()?;
        Ok(config)
    }

    pub fn to_yaml(&self) -> Result<String, ConfigError> {
        serde_yaml::to_string(self)
            .map_err(|e| ConfigError::Parse(format!("Failed to serialize config: {}", e)))
    }

    /// Override settings from environment variables
    pub fn apply_env(&mut self) {
        let token = std::env::var("BOT_TOKEN").or_else(|_| std::env::var("TOKEN"));
        if let Ok(token) = token {
            self.set_token(token);
        }

        if let Ok(prefix) = std::env::var("BOT_PREFIX") {
            self.bot.prefix = prefix;
        }

        if let Ok(path) = std::env::var("CATALOG_DB") {
            self.catalog.database = PathBuf::from(path);
        }
    }

    pub fn set_token(&mut self, token: impl Into<String>) {
        self.adapters.telegram.token = Some(token.into());
        self.adapters.telegram.enabled = true;
    }

    /// Token to run the Telegram adapter with, if it is enabled
    pub fn telegram_token(&self) -> Option<&str> {
        let telegram = &self.adapters.telegram;
        telegram
            .token
            .as_deref()
            .filter(|t| telegram.enabled && !t.trim().is_empty())
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        let limits = [
            ("catalog.page-size", self.catalog.page_size),
            ("catalog.free-text-limit", self.catalog.free_text_limit),
            ("catalog.min-query-length", self.catalog.min_query_length),
        ];
        for (key, value) in limits {
            if value == 0 {
                return Err(ConfigError::InvalidValue(format!("{} must be at least 1", key)));
            }
        }

        if self.adapters.telegram.poll_timeout < 0 {
            return Err(ConfigError::InvalidValue(
                "adapters.telegram.poll-timeout must not be negative".to_string(),
            ));
        }
        Ok(())
    }

    pub fn router_settings(&self) -> RouterSettings {
        RouterSettings {
            page_size: self.catalog.page_size,
            free_text_limit: self.catalog.free_text_limit,
            min_query_length: self.catalog.min_query_length,
        }
    }

    pub fn formatter(&self) -> ReplyFormatter {
        ReplyFormatter::new(&self.storefront.contact, &self.storefront.currency)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_match_router() {
        let config = Config::default();
        assert_eq!(config.router_settings(), RouterSettings::default());
        assert_eq!(config.formatter(), ReplyFormatter::default());
        assert_eq!(config.telegram_token(), None);
    }

    #[test]
    fn test_partial_yaml() {
        let config = Config::from_yaml(
            "catalog:\n  page-size: 20\nstorefront:\n  contact: \"@sales\"\n",
        )
        .unwrap();
        assert_eq!(config.catalog.page_size, 20);
        assert_eq!(config.catalog.free_text_limit, 5);
        assert_eq!(config.storefront.contact, "@sales");
        assert_eq!(config.storefront.currency, "руб.");
    }

    #[test]
    fn test_zero_limit_rejected() {
        let result = Config::from_yaml("catalog:\n  free-text-limit: 0\n");
        assert!(matches!(result, Err(ConfigError::InvalidValue(_))));
    }

    #[test]
    fn test_yaml_round_trip_of_defaults() {
        let yaml = Config::default().to_yaml().unwrap();
        assert_eq!(Config::from_yaml(&yaml).unwrap(), Config::default());
    }

    #[test]
    fn test_invalid_file_is_rejected_not_replaced() {
        let path = std::env::temp_dir().join(format!("domain-store-bot-{}.yaml", uuid::Uuid::new_v4()));
        std::fs::write(&path, "catalog:\n  database: custom.db\n  page-size: 0\n").unwrap();

        let result = Config::load_or_default(&path);
        std::fs::remove_file(&path).unwrap();
        assert!(matches!(result, Err(ConfigError::InvalidValue(_))));
    }

    #[test]
    fn test_valid_file_is_loaded() {
        let path = std::env::temp_dir().join(format!("domain-store-bot-{}.yaml", uuid::Uuid::new_v4()));
        std::fs::write(&path, "catalog:\n  database: custom.db\n").unwrap();

        let config = Config::load_or_default(&path);
        std::fs::remove_file(&path).unwrap();
        assert_eq!(config.unwrap().catalog.database, PathBuf::from("custom.db"));
    }

    #[test]
    fn test_missing_file_uses_defaults() {
        let path = std::env::temp_dir().join(format!("domain-store-bot-{}.yaml", uuid::Uuid::new_v4()));
        assert_eq!(Config::load_or_default(&path).unwrap(), Config::default());
    }

    #[test]
    fn test_token_requires_enabled() {
        let mut config = Config::default();
        config.adapters.telegram.token = Some("123:abc".to_string());
        assert_eq!(config.telegram_token(), None);

        config.set_token("123:abc");
        assert_eq!(config.telegram_token(), Some("123:abc"));
    }
}
