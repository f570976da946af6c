//! Client configuration
//!
//! Built-in defaults, then `<config dir>/archivist/config.toml` if present,
//! then `ARCHIVIST_*` environment variables.

use std::path::PathBuf;
use std::time::Duration;

use config::{Config, Environment, File};
use serde::Deserialize;

#[derive(Debug, Clone, Deserialize, PartialEq)]
pub struct ClientConfig {
    /// Base URL of the archive backend, without the `/api` suffix
    pub server_url: String,
    /// Session token sent as the `token` cookie
    pub auth_token: Option<String>,
    /// Messages requested per page
    pub per_page: u32,
    /// Submit searches automatically once typing pauses
    pub auto_search: bool,
    pub search_debounce_ms: u64,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            server_url: "http://localhost:3000".to_string(),
            auth_token: None,
            per_page: 20,
            auto_search: false,
            search_debounce_ms: 300,
        }
    }
}

impl ClientConfig {
    fn config_path() -> Option<PathBuf> {
        dirs::config_dir().map(|p| p.join("archivist").join("config.toml"))
    }

    pub fn load() -> anyhow::Result<Self> {
        let path = Self::config_path();
        if path.is_none() {
            tracing::warn!("Could not determine config directory");
        }
        Self::load_from(path, Environment::with_prefix("ARCHIVIST"))
    }

    fn load_from(path: Option<PathBuf>, env: Environment) -> anyhow::Result<Self> {
        let defaults = Self::default();
        let mut builder = Config::builder()
            .set_default("server_url", defaults.server_url)?
            .set_default("per_page", i64::from(defaults.per_page))?
            .set_default("auto_search", defaults.auto_search)?
            .set_default("search_debounce_ms", defaults.search_debounce_ms as i64)?;

        if let Some(path) = path {
            tracing::debug!("Reading config from {:?}", path);
            builder = builder.add_source(File::from(path).required(false));
        }

        let config: Self = builder.add_source(env).build()?.try_deserialize()?;

        if config.per_page == 0 {
            anyhow::bail!("per_page must be at least 1");
        }

        Ok(config)
    }

    pub fn search_debounce(&self) -> Duration {
        Duration::from_millis(self.search_debounce_ms)
    }
}
