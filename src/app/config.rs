use anyhow::{Context, Result};
use directories::ProjectDirs;
use figment::{
    providers::{Env, Format, Serialized, Toml},
    Figment,
};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::constants::{
    APP_NAME, DEFAULT_API_KEY_ENV, DEFAULT_GEMINI_ENDPOINT, DEFAULT_LOG_FILE, DEFAULT_LOG_LEVEL,
    DEFAULT_MODEL, DEFAULT_TEMPERATURE, DEFAULT_TOP_K, DEFAULT_TOP_P, ENV_PREFIX,
    LOCAL_CONFIG_PATH,
};
use crate::utils::SafeSpaceError;

/// Main configuration structure
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Config {
    /// Remote service settings
    #[serde(default)]
    pub api: ApiConfig,

    /// Model and sampling settings
    #[serde(default)]
    pub model: ModelSettings,

    /// Logging settings
    #[serde(default)]
    pub logging: LoggingConfig,
}

/// Remote service configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ApiConfig {
    /// Base URL of the generative language API
    pub endpoint: String,
    /// Environment variable containing the API key
    pub api_key_env: String,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            endpoint: DEFAULT_GEMINI_ENDPOINT.to_string(),
            api_key_env: DEFAULT_API_KEY_ENV.to_string(),
        }
    }
}

impl ApiConfig {
    /// Read the credential once. A missing variable yields an empty key;
    /// the remote service rejects it on the first send.
    pub fn read_api_key(&self) -> String {
        std::env::var(&self.api_key_env).unwrap_or_default()
    }

    pub fn has_api_key(&self) -> bool {
        std::env::var(&self.api_key_env).is_ok_and(|key| !key.is_empty())
    }
}

/// Default model settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ModelSettings {
    /// Model name
    pub name: String,
    /// Temperature for generation
    pub temperature: f32,
    /// Nucleus sampling cutoff
    pub top_p: f32,
    /// Top-k sampling cutoff
    pub top_k: u32,
}

impl Default for ModelSettings {
    fn default() -> Self {
        Self {
            name: DEFAULT_MODEL.to_string(),
            temperature: DEFAULT_TEMPERATURE,
            top_p: DEFAULT_TOP_P,
            top_k: DEFAULT_TOP_K,
        }
    }
}

/// Logging configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Default filter directive when RUST_LOG is unset
    pub level: String,
    /// Log file; relative paths resolve against the data directory
    pub file: PathBuf,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: DEFAULT_LOG_LEVEL.to_string(),
            file: PathBuf::from(DEFAULT_LOG_FILE),
        }
    }
}

impl LoggingConfig {
    /// Absolute path of the log file
    pub fn resolved_file(&self) -> PathBuf {
        if self.file.is_absolute() {
            return self.file.clone();
        }
        match ProjectDirs::from("", "", APP_NAME) {
            Some(dirs) => dirs.data_dir().join(&self.file),
            None => self.file.clone(),
        }
    }
}

/// Load configuration from multiple sources.
///
/// An explicit file replaces the global and local config files; the
/// environment still applies on top.
pub fn load_config(explicit: Option<&Path>) -> Result<Config> {
    let mut figment = Figment::from(Serialized::defaults(Config::default()));

    if let Some(path) = explicit {
        if !path.exists() {
            return Err(SafeSpaceError::ConfigError(format!(
                "Config file not found: {}",
                path.display()
            ))
            .into());
        }
        figment = figment.merge(Toml::file(path));
    } else {
        let global_config = get_config_dir()?.join("config.toml");
        if global_config.exists() {
            figment = figment.merge(Toml::file(&global_config));
        }

        let local_config = PathBuf::from(LOCAL_CONFIG_PATH);
        if local_config.exists() {
            figment = figment.merge(Toml::file(&local_config));
        }
    }

    // SAFESPACE_MODEL__NAME=... maps to [model] name
    figment = figment.merge(Env::prefixed(ENV_PREFIX).split("__"));

    figment
        .extract()
        .context("Failed to load configuration")
}

/// Get the configuration directory
pub fn get_config_dir() -> Result<PathBuf> {
    if let Some(proj_dirs) = ProjectDirs::from("", "", APP_NAME) {
        Ok(proj_dirs.config_dir().to_path_buf())
    } else {
        let home = std::env::var("HOME")
            .or_else(|_| std::env::var("USERPROFILE"))
            .context("Could not determine home directory")?;
        Ok(PathBuf::from(home).join(".config").join(APP_NAME))
    }
}

/// Save configuration to file
pub fn save_config(config: &Config, path: Option<PathBuf>) -> Result<PathBuf> {
    let path = match path {
        Some(p) => p,
        None => get_config_dir()?.join("config.toml"),
    };

    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("Failed to create {}", parent.display()))?;
    }

    let toml_string = toml::to_string_pretty(config)?;
    std::fs::write(&path, toml_string)
        .with_context(|| format!("Failed to write config to {}", path.display()))?;

    Ok(path)
}

/// Create a default configuration file if it doesn't exist.
/// Returns the path and whether it was newly written.
pub fn init_config() -> Result<(PathBuf, bool)> {
    let config_file = get_config_dir()?.join("config.toml");

    if config_file.exists() {
        return Ok((config_file, false));
    }

    let path = save_config(&Config::default(), Some(config_file))?;
    Ok((path, true))
}
