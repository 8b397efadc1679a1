use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::time::Duration;

/// Upper bound on items pulled from an external source
pub const MAX_SOURCE_ITEMS: u32 = 300;

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct Config {
    #[serde(default)]
    pub provider: ProviderConfig,
    #[serde(default)]
    pub lists: ListsConfig,
}

/// External metadata provider (TMDB) settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProviderConfig {
    #[serde(default = "default_true")]
    pub enabled: bool,
    #[serde(default = "default_base_url")]
    pub base_url: String,
    #[serde(default = "default_language")]
    pub language: String,
    /// Bound on a single provider call during item resolution
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

impl ProviderConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

impl Default for ProviderConfig {
    fn default() -> Self {
        Self {
            enabled: default_true(),
            base_url: default_base_url(),
            language: default_language(),
            timeout_secs: default_timeout_secs(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ListsConfig {
    #[serde(default = "default_max_source_items")]
    pub max_source_items: u32,
    #[serde(default = "default_page_size")]
    pub default_page_size: usize,
}

impl Default for ListsConfig {
    fn default() -> Self {
        Self {
            max_source_items: default_max_source_items(),
            default_page_size: default_page_size(),
        }
    }
}

fn default_true() -> bool {
    true
}

fn default_base_url() -> String {
    "https://api.themoviedb.org/3".to_string()
}

fn default_language() -> String {
    "en".to_string()
}

fn default_timeout_secs() -> u64 {
    10
}

fn default_max_source_items() -> u32 {
    MAX_SOURCE_ITEMS
}

fn default_page_size() -> usize {
    10
}

impl Config {
    pub fn load_from_file(path: &PathBuf) -> anyhow::Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let config: Config = toml::from_str(&content)?;
        Ok(config)
    }

    /// Load the config file, or defaults when it has not been written yet
    pub fn load_or_default(path: &PathBuf) -> anyhow::Result<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }
        let config = Self::load_from_file(path)?;
        config.validate()?;
        Ok(config)
    }

    pub fn save_to_file(&self, path: &PathBuf) -> anyhow::Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let content = toml::to_string_pretty(self)?;
        std::fs::write(path, content)?;
        Ok(())
    }

    pub fn validate(&self) -> anyhow::Result<()> {
        if self.provider.timeout_secs == 0 {
            return Err(anyhow::anyhow!("provider.timeout_secs must be greater than zero"));
        }
        if self.provider.enabled && self.provider.base_url.trim().is_empty() {
            return Err(anyhow::anyhow!(
                "provider.base_url is required when the provider is enabled"
            ));
        }
        if self.lists.max_source_items < 2 {
            return Err(anyhow::anyhow!("lists.max_source_items must be at least 2"));
        }
        if self.lists.default_page_size == 0 {
            return Err(anyhow::anyhow!("lists.default_page_size must be greater than zero"));
        }
        Ok(())
    }
}
