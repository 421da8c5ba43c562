//! Extractor configuration with builder pattern
//!
//! Values come from built-in defaults, then an optional TOML file, then
//! environment/CLI overrides applied by the caller.

use anyhow::{Context, Result};
use log::debug;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Directory name under the user config dir
pub const APP_DIR_NAME: &str = "panelapp-cli";
pub const CONFIG_FILE_NAME: &str = "config.toml";

/// Top-level configuration
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub api: ApiConfig,
    pub extract: ExtractConfig,
}

/// PanelApp API endpoints and request settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ApiConfig {
    /// API root, without version segment
    pub base_url: String,
    /// Version path segment (e.g. "v1")
    pub api_version: String,
    /// OpenAPI document used for the version check
    pub openapi_url: String,
    /// Version the extractor was written against
    pub expected_api_version: String,
    /// Timeout for data requests
    pub timeout_secs: u64,
    /// Timeout for the connectivity probe
    pub probe_timeout_secs: u64,
}

/// Output layout and pagination limits
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ExtractConfig {
    /// Root of the data directory
    pub data_path: PathBuf,
    /// Upper bound on panel list pages
    pub max_panel_pages: u32,
    /// Upper bound on gene pages per panel
    pub max_gene_pages: u32,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            base_url: "https://panelapp-aus.org/api".to_string(),
            api_version: "v1".to_string(),
            openapi_url: "https://panelapp-aus.org/api/docs/?format=openapi".to_string(),
            expected_api_version: "v1".to_string(),
            timeout_secs: 30,
            probe_timeout_secs: 10,
        }
    }
}

impl Default for ExtractConfig {
    fn default() -> Self {
        Self {
            data_path: PathBuf::from("../data"),
            max_panel_pages: 1000,
            max_gene_pages: 100,
        }
    }
}

impl ApiConfig {
    /// `<base>/<version>` with no trailing slash
    pub fn versioned_root(&self) -> String {
        format!(
            "{}/{}",
            self.base_url.trim_end_matches('/'),
            self.api_version.trim_matches('/')
        )
    }

    /// First page of the panel list
    pub fn panels_url(&self) -> String {
        format!("{}/panels/", self.versioned_root())
    }

    /// First page of a panel's genes
    pub fn genes_url(&self, panel_id: &str) -> String {
        format!("{}/panels/{}/genes/", self.versioned_root(), panel_id)
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    pub fn probe_timeout(&self) -> Duration {
        Duration::from_secs(self.probe_timeout_secs)
    }
}

impl Config {
    /// Create a new builder for Config
    pub fn builder() -> ConfigBuilder {
        ConfigBuilder::new()
    }

    /// Default location of the config file, if a config dir exists
    pub fn default_path() -> Option<PathBuf> {
        dirs::config_dir().map(|dir| dir.join(APP_DIR_NAME).join(CONFIG_FILE_NAME))
    }

    /// Parse a TOML document; missing keys keep their defaults
    pub fn from_toml_str(content: &str) -> Result<Self> {
        toml::from_str(content).context("Failed to parse config TOML")
    }

    /// Load from a TOML file
    pub fn from_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;
        Self::from_toml_str(&content)
            .with_context(|| format!("Invalid config file: {}", path.display()))
    }

    /// Load the effective config
    ///
    /// An explicit path must exist. Without one, the default location is used
    /// when present, otherwise built-in defaults.
    pub fn load(explicit: Option<&Path>) -> Result<Self> {
        if let Some(path) = explicit {
            if !path.exists() {
                anyhow::bail!("Config file does not exist: {}", path.display());
            }
            debug!("Loading config from {}", path.display());
            return Self::from_file(path);
        }

        match Self::default_path() {
            Some(path) if path.exists() => {
                debug!("Loading config from {}", path.display());
                Self::from_file(&path)
            }
            _ => {
                debug!("No config file found, using defaults");
                Ok(Self::default())
            }
        }
    }
}

/// Builder for Config
#[derive(Debug)]
pub struct ConfigBuilder {
    config: Config,
}

impl ConfigBuilder {
    pub fn new() -> Self {
        Self {
            config: Config::default(),
        }
    }

    /// Start from an existing config (e.g. one loaded from file)
    pub fn from_config(config: Config) -> Self {
        Self { config }
    }

    /// Set the API root
    pub fn base_url(mut self, url: impl Into<String>) -> Self {
        self.config.api.base_url = url.into();
        self
    }

    /// Set the API version segment
    pub fn api_version(mut self, version: impl Into<String>) -> Self {
        self.config.api.api_version = version.into();
        self
    }

    /// Set the OpenAPI document URL
    pub fn openapi_url(mut self, url: impl Into<String>) -> Self {
        self.config.api.openapi_url = url.into();
        self
    }

    /// Set the request timeout in seconds
    pub fn timeout_secs(mut self, secs: u64) -> Self {
        self.config.api.timeout_secs = secs;
        self
    }

    /// Set the data directory
    pub fn data_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.config.extract.data_path = path.into();
        self
    }

    /// Set the panel list page limit
    pub fn max_panel_pages(mut self, pages: u32) -> Self {
        self.config.extract.max_panel_pages = pages;
        self
    }

    /// Set the per-panel gene page limit
    pub fn max_gene_pages(mut self, pages: u32) -> Self {
        self.config.extract.max_gene_pages = pages;
        self
    }

    /// Apply optional overrides, leaving unset values alone
    pub fn overrides(mut self, base_url: Option<String>, data_path: Option<PathBuf>) -> Self {
        if let Some(url) = base_url {
            self.config.api.base_url = url;
        }
        if let Some(path) = data_path {
            self.config.extract.data_path = path;
        }
        self
    }

    /// Build the final configuration
    pub fn build(self) -> Config {
        self.config
    }
}

impl Default for ConfigBuilder {
    fn default() -> Self {
        Self::new()
    }
}
