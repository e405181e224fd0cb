use crate::errors::{CoreError, CoreResult};
use serde::{Deserialize, Serialize};
use std::env;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::debug;

pub const DEFAULT_MODEL: &str = "gemini-1.5-flash";
pub const DEFAULT_API_BASE_URL: &str = "https://generativelanguage.googleapis.com";
pub const DEFAULT_TIMEOUT_SECS: u64 = 10;
/// Upper bound on the number of prior turns sent with each request.
pub const MAX_HISTORY_WINDOW: usize = 10;

/// Configuration struct for the CURA companion
#[derive(Debug, Serialize, Deserialize, Clone, Default, PartialEq)]
pub struct CuraConfig {
    pub api_key: Option<String>,
    pub model_name: Option<String>,
    pub api_base_url: Option<String>,
    /// Replaces the built-in CURA persona when set
    pub system_prompt: Option<String>,
    pub request_timeout_secs: Option<u64>,
    pub history_window: Option<usize>,
    pub data_dir: Option<PathBuf>,
    pub log_level: Option<String>,
}

impl CuraConfig {
    /// Built-in values used wherever neither the file nor the environment says otherwise
    pub fn defaults() -> Self {
        Self {
            api_key: None,
            model_name: Some(DEFAULT_MODEL.to_string()),
            api_base_url: Some(DEFAULT_API_BASE_URL.to_string()),
            system_prompt: None,
            request_timeout_secs: Some(DEFAULT_TIMEOUT_SECS),
            history_window: Some(MAX_HISTORY_WINDOW),
            data_dir: None,
            log_level: Some("error".to_string()),
        }
    }

    /// Loads configuration from a file if it exists, otherwise returns an empty config
    pub fn load_from_file(path: &Path) -> CoreResult<Self> {
        if !path.exists() {
            debug!(path = %path.display(), "No config file found");
            return Ok(Self::default());
        }

        let content = fs::read_to_string(path)
            .map_err(|e| CoreError::ConfigError(format!("Failed to read config file: {}", e)))?;

        toml::from_str(&content)
            .map_err(|e| CoreError::ConfigError(format!("Failed to parse config file: {}", e)))
    }

    /// Saves configuration to a file
    pub fn save_to_file(&self, path: &Path) -> CoreResult<()> {
        let content = toml::to_string(self)
            .map_err(|e| CoreError::ConfigError(format!("Failed to serialize config: {}", e)))?;

        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).map_err(|e| {
                CoreError::ConfigError(format!("Failed to create config directory: {}", e))
            })?;
        }

        fs::write(path, content)
            .map_err(|e| CoreError::ConfigError(format!("Failed to write config file: {}", e)))?;

        Ok(())
    }

    /// Merges this config with another config, preferring values from the other config if present
    pub fn merge(&self, other: &Self) -> Self {
        Self {
            api_key: other.api_key.clone().or_else(|| self.api_key.clone()),
            model_name: other.model_name.clone().or_else(|| self.model_name.clone()),
            api_base_url: other
                .api_base_url
                .clone()
                .or_else(|| self.api_base_url.clone()),
            system_prompt: other
                .system_prompt
                .clone()
                .or_else(|| self.system_prompt.clone()),
            request_timeout_secs: other.request_timeout_secs.or(self.request_timeout_secs),
            history_window: other.history_window.or(self.history_window),
            data_dir: other.data_dir.clone().or_else(|| self.data_dir.clone()),
            log_level: other.log_level.clone().or_else(|| self.log_level.clone()),
        }
    }

    /// Reads `GEMINI_API_KEY` and `CURA_DATA_DIR` after loading any `.env` file
    pub fn from_env() -> Self {
        dotenvy::dotenv().ok();

        Self {
            api_key: env::var("GEMINI_API_KEY").ok().filter(|k| !k.trim().is_empty()),
            data_dir: env::var("CURA_DATA_DIR").ok().map(PathBuf::from),
            ..Self::default()
        }
    }

    /// Defaults, then the config file, then the environment.
    pub fn load(path: Option<&Path>) -> CoreResult<Self> {
        Ok(Self::load_file_only(path)?.merge(&Self::from_env()))
    }

    /// Defaults and the config file only. An API key set in the environment is not included.
    pub fn load_file_only(path: Option<&Path>) -> CoreResult<Self> {
        let path = match path {
            Some(p) => p.to_path_buf(),
            None => get_default_config_file("cura")?,
        };
        let from_file = Self::load_from_file(&path)?;
        Ok(Self::defaults().merge(&from_file))
    }

    pub fn model(&self) -> &str {
        self.model_name.as_deref().unwrap_or(DEFAULT_MODEL)
    }

    pub fn base_url(&self) -> &str {
        self.api_base_url
            .as_deref()
            .unwrap_or(DEFAULT_API_BASE_URL)
            .trim_end_matches('/')
    }

    pub fn timeout_secs(&self) -> u64 {
        self.request_timeout_secs.unwrap_or(DEFAULT_TIMEOUT_SECS).max(1)
    }

    /// Number of prior turns to send, never more than [`MAX_HISTORY_WINDOW`]
    pub fn history_window(&self) -> usize {
        self.history_window
            .unwrap_or(MAX_HISTORY_WINDOW)
            .min(MAX_HISTORY_WINDOW)
    }

    /// Directory holding the persisted chat and mood history
    pub fn resolved_data_dir(&self) -> CoreResult<PathBuf> {
        match &self.data_dir {
            Some(dir) => Ok(dir.clone()),
            None => get_default_data_dir("cura"),
        }
    }
}

/// Helper function to get default config directory
pub fn get_default_config_dir(app_name: &str) -> CoreResult<PathBuf> {
    let home_dir = dirs::home_dir().ok_or_else(|| {
        CoreError::ConfigError("Could not determine home directory".to_string())
    })?;

    Ok(home_dir.join(".config").join(app_name))
}

/// Helper function to get default config file path
pub fn get_default_config_file(app_name: &str) -> CoreResult<PathBuf> {
    let config_dir = get_default_config_dir(app_name)?;
    Ok(config_dir.join("config.toml"))
}

/// Helper function to get the default directory for persisted session data
pub fn get_default_data_dir(app_name: &str) -> CoreResult<PathBuf> {
    let data_dir = dirs::data_dir().ok_or_else(|| {
        CoreError::ConfigError("Could not determine data directory".to_string())
    })?;

    Ok(data_dir.join(app_name))
}
