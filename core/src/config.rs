//! Configuration for luax
//!
//! Sources, lowest to highest precedence:
//! 1. Built-in defaults
//! 2. A TOML file: the explicit path (must exist), else `LUAX_CONFIG_PATH`
//!    (must exist), else `luax.toml` in the working directory (optional)
//! 3. Environment variables prefixed `LUAX_`, sections split by `__`
//!    (`LUAX_SESSION__OPEN_LIBS=false`, `LUAX_LOGGING__FILTER=debug`)
//! 4. Builder overrides (CLI flags)
//!
//! A `.env` file is loaded first, so it can feed step 3.

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Environment variable naming a config file.
pub const CONFIG_PATH_ENV: &str = "LUAX_CONFIG_PATH";

/// File looked up in the working directory when no path is given.
pub const DEFAULT_CONFIG_FILE: &str = "luax.toml";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct Config {
    pub session: SessionConfig,
    pub logging: LoggingConfig,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SessionConfig {
    /// Load the engine's standard libraries into every new state.
    pub open_libs: bool,

    /// Chunk name shown in diagnostics for `parse_line`.
    pub chunk_name: String,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            open_libs: true,
            chunk_name: "line".to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// `tracing_subscriber::EnvFilter` directive used when `RUST_LOG` is unset.
    pub filter: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            filter: "warn".to_string(),
        }
    }
}

impl Config {
    pub fn builder() -> ConfigBuilder {
        ConfigBuilder::default()
    }

    /// Load from the default sources without overrides.
    pub fn load() -> Result<Self> {
        Self::builder().build()
    }

    /// Render the effective configuration as TOML.
    pub fn to_toml(&self) -> Result<String> {
        toml::to_string_pretty(self).context("Failed to render configuration as TOML")
    }
}

/// Builder for [`Config`]; every override is optional.
#[derive(Debug, Default)]
pub struct ConfigBuilder {
    config_path: Option<PathBuf>,
    open_libs: Option<bool>,
    chunk_name: Option<String>,
    log_filter: Option<String>,
    skip_env: bool,
}

impl ConfigBuilder {
    /// Config file path (overrides `LUAX_CONFIG_PATH` and the default search)
    pub fn config_path(mut self, path: Option<PathBuf>) -> Self {
        self.config_path = path;
        self
    }

    pub fn open_libs(mut self, open_libs: Option<bool>) -> Self {
        self.open_libs = open_libs;
        self
    }

    pub fn chunk_name(mut self, name: Option<String>) -> Self {
        self.chunk_name = name;
        self
    }

    pub fn log_filter(mut self, filter: Option<String>) -> Self {
        self.log_filter = filter;
        self
    }

    /// Ignore `.env` and `LUAX_*` variables (used by tests).
    pub fn skip_env(mut self, skip: bool) -> Self {
        self.skip_env = skip;
        self
    }

    pub fn build(self) -> Result<Config> {
        if !self.skip_env {
            dotenvy::dotenv().ok();
        }

        let file = match (&self.config_path, self.env_config_path()) {
            (Some(path), _) => config::File::from(path.clone()).required(true),
            (None, Some(path)) => config::File::from(path).required(true),
            (None, None) => config::File::with_name(DEFAULT_CONFIG_FILE).required(false),
        };

        let mut sources = config::Config::builder().add_source(file);
        if !self.skip_env {
            sources = sources.add_source(
                config::Environment::with_prefix("LUAX")
                    .prefix_separator("_")
                    .separator("__"),
            );
        }

        let mut config: Config = sources
            .build()
            .context("Failed to read configuration sources")?
            .try_deserialize()
            .context("Invalid configuration")?;

        if let Some(open_libs) = self.open_libs {
            config.session.open_libs = open_libs;
        }
        if let Some(name) = self.chunk_name {
            config.session.chunk_name = name;
        }
        if let Some(filter) = self.log_filter {
            config.logging.filter = filter;
        }

        tracing::debug!(?config, "configuration loaded");
        Ok(config)
    }

    fn env_config_path(&self) -> Option<PathBuf> {
        if self.skip_env {
            return None;
        }
        std::env::var_os(CONFIG_PATH_ENV).map(PathBuf::from)
    }
}
