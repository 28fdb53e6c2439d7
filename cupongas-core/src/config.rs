//! Service configuration loaded from TOML

use anyhow::Result;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

/// Main service configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ServiceConfig {
    #[serde(default)]
    pub source: SourceConfig,
    #[serde(default)]
    pub cache: CacheConfig,
}

impl ServiceConfig {
    /// Load configuration from a TOML file
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = fs::read_to_string(path)?;
        let config: ServiceConfig = toml::from_str(&content)?;
        Ok(config)
    }
}

/// Where workbook payloads come from
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SourceConfig {
    /// Alternative download URLs for the same document, tried in order
    #[serde(default)]
    pub urls: Vec<String>,
}

/// Cache slot behavior
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CacheConfig {
    /// Where the last fetched payload is mirrored on disk
    #[serde(default)]
    pub path: Option<PathBuf>,
    /// Cache age (minutes) below which an explicit refresh is skipped
    #[serde(default = "default_fresh_minutes")]
    pub fresh_minutes: i64,
    /// Cache age (minutes) beyond which a search refetches first
    #[serde(default = "default_refresh_minutes")]
    pub refresh_minutes: i64,
}

impl Default for CacheConfig {
    fn default() -> Self {
        CacheConfig {
            path: None,
            fresh_minutes: default_fresh_minutes(),
            refresh_minutes: default_refresh_minutes(),
        }
    }
}

fn default_fresh_minutes() -> i64 {
    5
}

fn default_refresh_minutes() -> i64 {
    10
}
