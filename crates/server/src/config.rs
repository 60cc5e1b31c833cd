use std::path::Path;

use anyhow::Context;
use config::{Config, Environment, File};
use serde::Deserialize;
use server_api::{PagingConfig, DEFAULT_PAGE_LIMIT, MAX_PAGE_LIMIT};
use storage::DEFAULT_MOCK_COMPANY_COUNT;

const SETTINGS_FILE: &str = "server.toml";
const ENV_PREFIX: &str = "APP";

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub server_bind: String,
    /// JSON dataset to serve instead of the generated mock table.
    pub dataset_path: Option<String>,
    pub mock_company_count: usize,
    pub mock_seed: u64,
    pub default_page_limit: u32,
    pub max_page_limit: u32,
    pub cors_allow_any_origin: bool,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            server_bind: "127.0.0.1:5000".into(),
            dataset_path: None,
            mock_company_count: DEFAULT_MOCK_COMPANY_COUNT,
            mock_seed: 42,
            default_page_limit: DEFAULT_PAGE_LIMIT,
            max_page_limit: MAX_PAGE_LIMIT,
            cors_allow_any_origin: true,
        }
    }
}

impl Settings {
    pub fn paging(&self) -> PagingConfig {
        let max_limit = self.max_page_limit.max(1);
        PagingConfig {
            default_limit: self.default_page_limit.clamp(1, max_limit),
            max_limit,
        }
    }
}

pub fn load_settings() -> anyhow::Result<Settings> {
    load_settings_from(Path::new(SETTINGS_FILE), ENV_PREFIX)
}

/// Layers an optional TOML file under `{env_prefix}__*` environment variables.
pub(crate) fn load_settings_from(file: &Path, env_prefix: &str) -> anyhow::Result<Settings> {
    Config::builder()
        .add_source(File::from(file).required(false))
        .add_source(
            Environment::with_prefix(env_prefix)
                .prefix_separator("__")
                .separator("__")
                .try_parsing(true),
        )
        .build()
        .and_then(Config::try_deserialize)
        .with_context(|| format!("failed to load settings from '{}'", file.display()))
}

#[cfg(test)]
#[path = "tests/config_tests.rs"]
mod tests;
