use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;

use super::platform;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub service: ServiceConfig,
    #[serde(default)]
    pub collection: CollectionConfig,
}

/// Where the file-collection service lives.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServiceConfig {
    /// Collection endpoint; records are addressed as `{base_url}/{id}`.
    #[serde(default = "default_base_url")]
    pub base_url: String,
    #[serde(default = "default_request_timeout_secs")]
    pub request_timeout_secs: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CollectionConfig {
    /// Records requested per page while assembling the full collection.
    #[serde(default = "default_page_size")]
    pub page_size: usize,
    /// Upper bound on delete requests in flight during a batch delete.
    #[serde(default = "default_delete_concurrency")]
    pub delete_concurrency: usize,
}

impl Default for ServiceConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            request_timeout_secs: default_request_timeout_secs(),
        }
    }
}

impl Default for CollectionConfig {
    fn default() -> Self {
        Self {
            page_size: default_page_size(),
            delete_concurrency: default_delete_concurrency(),
        }
    }
}

impl ServiceConfig {
    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs.max(1))
    }
}

impl CollectionConfig {
    /// Page size with the zero case clamped away; a zero page would never
    /// terminate the paged load.
    pub fn effective_page_size(&self) -> usize {
        self.page_size.max(1)
    }

    pub fn effective_delete_concurrency(&self) -> usize {
        self.delete_concurrency.max(1)
    }
}

fn default_base_url() -> String {
    "http://127.0.0.1:8000/files".to_string()
}

fn default_request_timeout_secs() -> u64 {
    10
}

fn default_page_size() -> usize {
    10
}

fn default_delete_concurrency() -> usize {
    64
}

impl Config {
    pub fn load() -> anyhow::Result<Self> {
        Self::load_from(&Self::config_path())
    }

    /// Read `path`, writing a default config there first if it is missing.
    pub fn load_from(path: &Path) -> anyhow::Result<Self> {
        if !path.exists() {
            let config = Self::default();
            config.save_to(path)?;
            return Ok(config);
        }

        let content = std::fs::read_to_string(path)?;
        let config: Self = toml::from_str(&content)?;
        Ok(config)
    }

    pub fn save_to(&self, path: &Path) -> anyhow::Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let content = toml::to_string_pretty(self)?;
        std::fs::write(path, content)?;
        Ok(())
    }

    pub fn config_path() -> PathBuf {
        platform::config_dir().join("config.toml")
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            service: ServiceConfig::default(),
            collection: CollectionConfig::default(),
        }
    }
}
