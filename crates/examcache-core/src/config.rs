//! Application configuration management.
//!
//! This module loads the configuration: remote API
//! location and key, the student id results are filed under, and where the
//! offline store keeps its files.
//!
//! Configuration is stored at `~/.config/examcache/config.json`; the
//! `EXAMCACHE_*` environment variables override individual fields.

use std::path::PathBuf;

use anyhow::Result;
use serde::{Deserialize, Serialize};

/// Application name used for config/data directory paths
const APP_NAME: &str = "examcache";

/// Config file name
const CONFIG_FILE: &str = "config.json";

const ENV_API_URL: &str = "EXAMCACHE_API_URL";
const ENV_API_KEY: &str = "EXAMCACHE_API_KEY";
const ENV_STUDENT_ID: &str = "EXAMCACHE_STUDENT_ID";
const ENV_DATA_DIR: &str = "EXAMCACHE_DATA_DIR";

#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq, Eq)]
pub struct Config {
    pub api_url: Option<String>,
    pub api_key: Option<String>,
    pub student_id: Option<String>,
    pub data_dir: Option<PathBuf>,
}

impl Config {
    pub fn load() -> Result<Self> {
        let path = Self::config_path()?;
        if path.exists() {
            let contents = std::fs::read_to_string(&path)?;
            Ok(serde_json::from_str(&contents)?)
        } else {
            Ok(Self::default())
        }
    }

    fn config_path() -> Result<PathBuf> {
        let config_dir = dirs::config_dir()
            .ok_or_else(|| anyhow::anyhow!("Could not find config directory"))?;
        Ok(config_dir.join(APP_NAME).join(CONFIG_FILE))
    }

    /// Override fields from `EXAMCACHE_*` environment variables.
    pub fn apply_env(mut self) -> Self {
        self.apply_overrides(|name| std::env::var(name).ok());
        self
    }

    fn apply_overrides(&mut self, lookup: impl Fn(&str) -> Option<String>) {
        let lookup = |name: &str| lookup(name).filter(|v| !v.trim().is_empty());
        if let Some(url) = lookup(ENV_API_URL) {
            self.api_url = Some(url);
        }
        if let Some(key) = lookup(ENV_API_KEY) {
            self.api_key = Some(key);
        }
        if let Some(id) = lookup(ENV_STUDENT_ID) {
            self.student_id = Some(id);
        }
        if let Some(dir) = lookup(ENV_DATA_DIR) {
            self.data_dir = Some(PathBuf::from(dir));
        }
    }

    /// Directory the offline store writes to.
    pub fn storage_dir(&self) -> Result<PathBuf> {
        if let Some(ref dir) = self.data_dir {
            return Ok(dir.clone());
        }
        let data_dir = dirs::data_local_dir()
            .ok_or_else(|| anyhow::anyhow!("Could not find data directory"))?;
        Ok(data_dir.join(APP_NAME))
    }
}
