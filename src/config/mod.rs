//! Configuration module for Crew Deck
//!
//! This module handles:
//! - Application configuration (`config.toml`): API endpoint, list behavior, UI
//! - Application state persistence (`app_state.json`): last active page and
//!   the navigation state of every list view
//!
//! # App Data Location
//!
//! Application data is stored in the platform-appropriate location:
//! - **Linux**: `~/.local/share/dev.crewdeck.dashboard/`
//! - **macOS**: `~/Library/Application Support/dev.crewdeck.dashboard/`
//! - **Windows**: `%APPDATA%\dev.crewdeck.dashboard\`
//!
//! # Environment Overrides
//!
//! - `CREWDECK_API_URL` - replaces `api.base_url`
//! - `CREWDECK_TIMEOUT_SECS` - replaces `api.timeout_secs`
//!
//! # Example
//!
//! ```ignore
//! use crewdeck::config::{AppConfig, AppState};
//!
//! let config = AppConfig::load_or_default();
//! let mut state = AppState::load_or_default();
//! state.set_view_query("flights", "page=2&airline=AI");
//! state.save()?;
//! ```

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::error::{DashboardError, Result};
use crate::list::{FetchAllPolicy, ListOptions};

/// Application identifier for data directories
pub const APP_ID: &str = "dev.crewdeck.dashboard";

/// Config filename
pub const CONFIG_FILE: &str = "config.toml";

/// App state filename
pub const APP_STATE_FILE: &str = "app_state.json";

/// Directory (inside the app data dir) for rolling log files
pub const LOG_DIR: &str = "logs";

/// Default roster API base URL
pub const DEFAULT_API_URL: &str = "http://127.0.0.1:8000";

/// Default request timeout in seconds
pub const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// Default page size of list views
pub const DEFAULT_PAGE_LIMIT: u32 = 50;

pub const ENV_API_URL: &str = "CREWDECK_API_URL";
pub const ENV_TIMEOUT_SECS: &str = "CREWDECK_TIMEOUT_SECS";

// ==================== App Data Directory ====================

/// Get the application data directory path
pub fn app_data_dir() -> Option<PathBuf> {
    dirs_next::data_dir().map(|p| p.join(APP_ID))
}

/// Ensure the app data directory exists
pub fn ensure_app_data_dir() -> Result<PathBuf> {
    let dir = app_data_dir().ok_or_else(|| {
        DashboardError::Config("Could not determine app data directory".to_string())
    })?;

    if !dir.exists() {
        std::fs::create_dir_all(&dir).map_err(|e| {
            DashboardError::Config(format!("Failed to create app data directory: {}", e))
        })?;
    }

    Ok(dir)
}

/// Get the path to the config file
pub fn config_path() -> Option<PathBuf> {
    app_data_dir().map(|p| p.join(CONFIG_FILE))
}

/// Get the path to the app state file
pub fn app_state_path() -> Option<PathBuf> {
    app_data_dir().map(|p| p.join(APP_STATE_FILE))
}

/// Get the log directory path
pub fn log_dir() -> Option<PathBuf> {
    app_data_dir().map(|p| p.join(LOG_DIR))
}

// ==================== App Config ====================

/// Main application configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct AppConfig {
    #[serde(default)]
    pub api: ApiConfig,

    #[serde(default)]
    pub lists: ListsConfig,

    #[serde(default)]
    pub ui: UiConfig,
}

impl AppConfig {
    /// Load from the default location, then apply environment overrides
    pub fn load() -> Result<Self> {
        let path = config_path().ok_or_else(|| {
            DashboardError::Config("Could not determine config path".to_string())
        })?;
        let mut config = if path.exists() {
            Self::load_from(&path)?
        } else {
            Self::default()
        };
        config.apply_env_overrides();
        Ok(config)
    }

    /// Load configuration, returning defaults (with overrides) on any error
    pub fn load_or_default() -> Self {
        Self::load().unwrap_or_else(|e| {
            tracing::warn!("Failed to load config, using defaults: {}", e);
            let mut config = Self::default();
            config.apply_env_overrides();
            config
        })
    }

    /// Load a config file from an explicit path
    pub fn load_from(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|e| {
            DashboardError::Config(format!("Failed to read config {:?}: {}", path, e))
        })?;
        toml::from_str(&content).map_err(|e| {
            DashboardError::Config(format!("Failed to parse config {:?}: {}", path, e))
        })
    }

    /// Save the config to the default location
    pub fn save(&self) -> Result<()> {
        let dir = ensure_app_data_dir()?;
        self.save_to(dir.join(CONFIG_FILE))
    }

    /// Save the config to an explicit path
    pub fn save_to(&self, path: impl AsRef<Path>) -> Result<()> {
        let path = path.as_ref();
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).map_err(|e| {
                DashboardError::Config(format!("Failed to create config directory: {}", e))
            })?;
        }
        let content = toml::to_string_pretty(self)
            .map_err(|e| DashboardError::Config(format!("Failed to serialize config: {}", e)))?;
        std::fs::write(path, content)
            .map_err(|e| DashboardError::Config(format!("Failed to write config {:?}: {}", path, e)))
    }

    /// Apply `CREWDECK_*` environment variables
    pub fn apply_env_overrides(&mut self) {
        if let Ok(url) = std::env::var(ENV_API_URL) {
            if !url.trim().is_empty() {
                tracing::info!("API URL overridden by {}: {}", ENV_API_URL, url);
                self.api.base_url = url.trim().to_string();
            }
        }
        if let Ok(secs) = std::env::var(ENV_TIMEOUT_SECS) {
            match secs.trim().parse::<u64>() {
                Ok(secs) if secs > 0 => self.api.timeout_secs = secs,
                _ => tracing::warn!("Ignoring invalid {}={:?}", ENV_TIMEOUT_SECS, secs),
            }
        }
    }

    /// Controller options derived from the list settings
    pub fn list_options(&self) -> ListOptions {
        ListOptions {
            keep_stale_on_error: self.lists.keep_stale_on_error,
            fetch_all: FetchAllPolicy {
                page_size: self.lists.fetch_all_page_size.max(1),
                max_pages: self.lists.fetch_all_max_pages.max(1),
            },
        }
    }
}

/// Roster API connection settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ApiConfig {
    #[serde(default = "default_api_url")]
    pub base_url: String,

    /// Per-request timeout in seconds
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,

    #[serde(default = "default_user_agent")]
    pub user_agent: String,
}

fn default_api_url() -> String {
    DEFAULT_API_URL.to_string()
}

fn default_timeout_secs() -> u64 {
    DEFAULT_TIMEOUT_SECS
}

fn default_user_agent() -> String {
    format!("crewdeck/{}", env!("CARGO_PKG_VERSION"))
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            base_url: default_api_url(),
            timeout_secs: DEFAULT_TIMEOUT_SECS,
            user_agent: default_user_agent(),
        }
    }
}

impl ApiConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs.max(1))
    }
}

/// Behavior shared by every list view
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ListsConfig {
    #[serde(default = "default_limit")]
    pub default_limit: u32,

    #[serde(default = "default_page_size_choices")]
    pub page_size_choices: Vec<u32>,

    /// Keep previously shown items when a refresh fails
    #[serde(default)]
    pub keep_stale_on_error: bool,

    #[serde(default = "default_fetch_all_page_size")]
    pub fetch_all_page_size: u32,

    #[serde(default = "default_fetch_all_max_pages")]
    pub fetch_all_max_pages: u32,

    /// Drop an approval from the list once its decision is confirmed
    #[serde(default = "default_true")]
    pub remove_on_decision: bool,
}

fn default_limit() -> u32 {
    DEFAULT_PAGE_LIMIT
}

fn default_page_size_choices() -> Vec<u32> {
    vec![10, 25, 50, 100]
}

fn default_fetch_all_page_size() -> u32 {
    100
}

fn default_fetch_all_max_pages() -> u32 {
    1000
}

fn default_true() -> bool {
    true
}

impl Default for ListsConfig {
    fn default() -> Self {
        Self {
            default_limit: DEFAULT_PAGE_LIMIT,
            page_size_choices: default_page_size_choices(),
            keep_stale_on_error: false,
            fetch_all_page_size: 100,
            fetch_all_max_pages: 1000,
            remove_on_decision: true,
        }
    }
}

/// UI configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UiConfig {
    #[serde(default = "default_true")]
    pub dark_mode: bool,

    /// Serve every view from built-in fixtures instead of the API
    #[serde(default)]
    pub offline_demo: bool,
}

impl Default for UiConfig {
    fn default() -> Self {
        Self {
            dark_mode: true,
            offline_demo: false,
        }
    }
}

// ==================== App State ====================

/// Persistent application state
///
/// Stores which page was open and the navigation state (as a query string)
/// of every list view, so a restart reproduces the same views.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AppState {
    /// Version for future migration support
    #[serde(default = "default_app_state_version")]
    pub version: u32,

    /// Key of the last active page
    #[serde(default)]
    pub last_page: Option<String>,

    /// Query string per view key
    #[serde(default)]
    pub view_queries: BTreeMap<String, String>,

    /// Last airport entered on the availability page
    #[serde(default)]
    pub last_airport: Option<String>,
}

fn default_app_state_version() -> u32 {
    1
}

impl Default for AppState {
    fn default() -> Self {
        Self {
            version: 1,
            last_page: None,
            view_queries: BTreeMap::new(),
            last_airport: None,
        }
    }
}

impl AppState {
    /// Load app state from the default location
    pub fn load() -> Result<Self> {
        let path = app_state_path().ok_or_else(|| {
            DashboardError::Config("Could not determine app state path".to_string())
        })?;
        if !path.exists() {
            return Ok(Self::default());
        }
        Self::load_from(&path)
    }

    /// Load app state, returning defaults on any error
    pub fn load_or_default() -> Self {
        Self::load().unwrap_or_else(|e| {
            tracing::warn!("Failed to load app state, using defaults: {}", e);
            Self::default()
        })
    }

    pub fn load_from(path: impl AsRef<Path>) -> Result<Self> {
        let content = std::fs::read_to_string(path.as_ref())
            .map_err(|e| DashboardError::Config(format!("Failed to read app state: {}", e)))?;
        serde_json::from_str(&content)
            .map_err(|e| DashboardError::Config(format!("Failed to parse app state: {}", e)))
    }

    /// Save app state to the default location
    pub fn save(&self) -> Result<()> {
        let dir = ensure_app_data_dir()?;
        self.save_to(dir.join(APP_STATE_FILE))
    }

    pub fn save_to(&self, path: impl AsRef<Path>) -> Result<()> {
        let content = serde_json::to_string_pretty(self)
            .map_err(|e| DashboardError::Config(format!("Failed to serialize app state: {}", e)))?;
        std::fs::write(path.as_ref(), content)
            .map_err(|e| DashboardError::Config(format!("Failed to write app state: {}", e)))
    }

    /// Remember a view's navigation state; empty queries are forgotten
    pub fn set_view_query(&mut self, view: &str, query: &str) {
        if query.is_empty() {
            self.view_queries.remove(view);
        } else {
            self.view_queries
                .insert(view.to_string(), query.to_string());
        }
    }

    pub fn view_query(&self, view: &str) -> &str {
        self.view_queries.get(view).map(String::as_str).unwrap_or("")
    }
}
