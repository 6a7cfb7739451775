// File: src/config.rs
// Purpose: Route table and history configuration parsing from nav.toml

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

use crate::error::{ConfigurationError, HistoryError};
#[cfg(feature = "browser")]
use crate::history::BrowserHistory;
use crate::history::{ConfiguredHistory, MemoryHistory};
use crate::route::{RouteEntry, RouteTable};

/// Navigation configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NavConfig {
    #[serde(default)]
    pub history: HistoryConfig,

    #[serde(default = "default_routes")]
    pub routes: Vec<RouteConfig>,
}

/// History adapter selection
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HistoryConfig {
    /// Which adapter the application should build (default: browser)
    #[serde(default)]
    pub mode: HistoryMode,

    /// Deployment base stripped from browser paths (e.g., "/app")
    #[serde(default)]
    pub base: Option<String>,

    /// First entry of an in-memory history (default: "/")
    #[serde(default = "default_start_path")]
    pub start_path: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum HistoryMode {
    #[default]
    Browser,
    Memory,
}

/// One `[[routes]]` table
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RouteConfig {
    pub path: String,
    pub name: String,
    /// View identifier handed to the mount point
    pub view: String,
}

// Default values
fn default_start_path() -> String {
    "/".to_string()
}

fn default_routes() -> Vec<RouteConfig> {
    [("/", "Index", "index"), ("/entries", "Entry", "entries"), ("/about", "About", "about")]
        .into_iter()
        .map(|(path, name, view)| RouteConfig {
            path: path.to_string(),
            name: name.to_string(),
            view: view.to_string(),
        })
        .collect()
}

// Default implementations
impl Default for NavConfig {
    fn default() -> Self {
        Self {
            history: HistoryConfig::default(),
            routes: default_routes(),
        }
    }
}

impl Default for HistoryConfig {
    fn default() -> Self {
        Self {
            mode: HistoryMode::default(),
            base: None,
            start_path: default_start_path(),
        }
    }
}

impl From<RouteConfig> for RouteEntry<String> {
    fn from(route: RouteConfig) -> Self {
        RouteEntry::new(route.path, route.name, route.view)
    }
}

impl NavConfig {
    /// Load configuration from a TOML file
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();

        // If file doesn't exist or is empty, return default config
        if !path.exists() {
            return Ok(Self::default());
        }

        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {:?}", path))?;

        if content.trim().is_empty() {
            return Ok(Self::default());
        }

        let config: NavConfig = toml::from_str(&content)
            .with_context(|| format!("Failed to parse config file: {:?}", path))?;

        Ok(config)
    }

    /// Load configuration from default path (./nav.toml)
    pub fn load_default() -> Result<Self> {
        Self::load("nav.toml")
    }

    /// Validated route table with string view identifiers
    pub fn route_table(&self) -> std::result::Result<RouteTable<String>, ConfigurationError> {
        RouteTable::new(self.routes.iter().cloned().map(RouteEntry::from))
    }

    /// In-memory history starting at `history.start_path`
    pub fn memory_history(&self) -> MemoryHistory {
        MemoryHistory::new(&self.history.start_path)
    }

    /// `window.history` adapter under `history.base` (empty when unset)
    #[cfg(feature = "browser")]
    pub fn browser_history(&self) -> std::result::Result<BrowserHistory, HistoryError> {
        BrowserHistory::with_base(self.history.base.clone().unwrap_or_default())
    }

    /// History adapter selected by `history.mode`
    ///
    /// Browser mode fails when the crate is built without the `browser` feature.
    pub fn history(&self) -> std::result::Result<ConfiguredHistory, HistoryError> {
        match self.history.mode {
            HistoryMode::Memory => Ok(ConfiguredHistory::Memory(self.memory_history())),
            #[cfg(feature = "browser")]
            HistoryMode::Browser => self.browser_history().map(ConfiguredHistory::Browser),
            #[cfg(not(feature = "browser"))]
            HistoryMode::Browser => Err(HistoryError::Unavailable(
                "built without the `browser` feature".to_string(),
            )),
        }
    }
}
