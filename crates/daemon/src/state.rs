use std::{fs, path::PathBuf};

use serde::{Deserialize, Serialize};
use url::Url;

use crate::generate::{
    DEFAULT_GEMINI_MODEL, DEFAULT_GEMINI_RATE_LIMIT, DEFAULT_OPENAI_MODEL,
    DEFAULT_OPENAI_RATE_LIMIT,
};
use crate::runner::DEFAULT_PISTON_URL;

pub const APP_NAME: &str = "codeflow";
pub const CONFIG_FILE_NAME: &str = "config.toml";
pub const DB_FILE_NAME: &str = "db.sqlite";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AppConfig {
    /// Port for the API server
    #[serde(default = "default_api_port")]
    pub api_port: u16,
    /// Identity all records are stored under
    #[serde(default = "default_owner")]
    pub owner: String,
    /// Base URL of the Piston execution service
    #[serde(default = "default_piston_url")]
    pub piston_url: String,
    #[serde(default = "default_openai_model")]
    pub openai_model: String,
    #[serde(default = "default_gemini_model")]
    pub gemini_model: String,
    /// Requests per minute admitted to OpenAI
    #[serde(default = "default_openai_rate_limit")]
    pub openai_rate_limit: usize,
    /// Requests per minute admitted to Gemini
    #[serde(default = "default_gemini_rate_limit")]
    pub gemini_rate_limit: usize,
    /// One of trace, debug, info, warn, error
    #[serde(default = "default_log_level")]
    pub log_level: String,
}

fn default_api_port() -> u16 {
    8080
}

fn default_owner() -> String {
    "admin".to_string()
}

fn default_piston_url() -> String {
    DEFAULT_PISTON_URL.to_string()
}

fn default_openai_model() -> String {
    DEFAULT_OPENAI_MODEL.to_string()
}

fn default_gemini_model() -> String {
    DEFAULT_GEMINI_MODEL.to_string()
}

fn default_openai_rate_limit() -> usize {
    DEFAULT_OPENAI_RATE_LIMIT
}

fn default_gemini_rate_limit() -> usize {
    DEFAULT_GEMINI_RATE_LIMIT
}

fn default_log_level() -> String {
    "info".to_string()
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            api_port: default_api_port(),
            owner: default_owner(),
            piston_url: default_piston_url(),
            openai_model: default_openai_model(),
            gemini_model: default_gemini_model(),
            openai_rate_limit: default_openai_rate_limit(),
            gemini_rate_limit: default_gemini_rate_limit(),
            log_level: default_log_level(),
        }
    }
}

impl AppConfig {
    pub fn piston_url(&self) -> Result<Url, StateError> {
        Url::parse(&self.piston_url).map_err(|e| StateError::InvalidConfig(e.to_string()))
    }

    pub fn log_level(&self) -> Result<tracing::Level, StateError> {
        self.log_level
            .parse()
            .map_err(|_| StateError::InvalidConfig(format!("unknown log level: {}", self.log_level)))
    }
}

#[derive(Debug, Clone)]
pub struct AppState {
    /// Path to the codeflow directory (~/.codeflow)
    pub app_dir: PathBuf,
    /// Path to the SQLite database
    pub db_path: PathBuf,
    /// Path to the config file
    pub config_path: PathBuf,
    /// Loaded configuration
    pub config: AppConfig,
}

impl AppState {
    /// Get the app directory path (custom or default ~/.codeflow)
    pub fn app_dir(custom_path: Option<PathBuf>) -> Result<PathBuf, StateError> {
        if let Some(path) = custom_path {
            return Ok(path);
        }

        let home = dirs::home_dir().ok_or(StateError::NoHomeDirectory)?;
        Ok(home.join(format!(".{}", APP_NAME)))
    }

    /// Initialize a new app directory
    pub fn init(
        custom_path: Option<PathBuf>,
        config: Option<AppConfig>,
    ) -> Result<Self, StateError> {
        let app_dir = Self::app_dir(custom_path)?;

        if app_dir.exists() {
            return Err(StateError::AlreadyInitialized);
        }

        fs::create_dir_all(&app_dir)?;

        // Create config (use provided or default)
        let config = config.unwrap_or_default();
        let config_path = app_dir.join(CONFIG_FILE_NAME);
        let config_toml = toml::to_string_pretty(&config)?;
        fs::write(&config_path, config_toml)?;

        // Create empty database (just touch the file, migrations run when the service starts)
        let db_path = app_dir.join(DB_FILE_NAME);
        fs::write(&db_path, "")?;

        Ok(Self {
            app_dir,
            db_path,
            config_path,
            config,
        })
    }

    /// Load existing state from the app directory
    pub fn load(custom_path: Option<PathBuf>) -> Result<Self, StateError> {
        let app_dir = Self::app_dir(custom_path)?;

        if !app_dir.exists() {
            return Err(StateError::NotInitialized);
        }

        let db_path = app_dir.join(DB_FILE_NAME);
        let config_path = app_dir.join(CONFIG_FILE_NAME);

        if !db_path.exists() {
            return Err(StateError::MissingFile(DB_FILE_NAME.to_string()));
        }
        if !config_path.exists() {
            return Err(StateError::MissingFile(CONFIG_FILE_NAME.to_string()));
        }

        let config_toml = fs::read_to_string(&config_path)?;
        let config: AppConfig = toml::from_str(&config_toml)?;

        Ok(Self {
            app_dir,
            db_path,
            config_path,
            config,
        })
    }
}

#[derive(Debug, thiserror::Error)]
pub enum StateError {
    #[error("codeflow directory not initialized. Run 'codeflow init' first")]
    NotInitialized,

    #[error("codeflow directory already initialized")]
    AlreadyInitialized,

    #[error("no home directory found")]
    NoHomeDirectory,

    #[error("missing required file: {0}")]
    MissingFile(String),

    #[error("invalid config: {0}")]
    InvalidConfig(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("TOML serialization error: {0}")]
    TomlSer(#[from] toml::ser::Error),

    #[error("TOML deserialization error: {0}")]
    TomlDe(#[from] toml::de::Error),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_init_then_load() {
        let dir = tempfile::tempdir().unwrap();
        let app_dir = dir.path().join("codeflow");

        let config = AppConfig {
            api_port: 9191,
            ..Default::default()
        };
        let state = AppState::init(Some(app_dir.clone()), Some(config.clone())).unwrap();
        assert!(state.db_path.exists());
        assert!(state.config_path.exists());

        let loaded = AppState::load(Some(app_dir)).unwrap();
        assert_eq!(loaded.config, config);
    }

    #[test]
    fn test_init_twice_fails() {
        let dir = tempfile::tempdir().unwrap();
        let app_dir = dir.path().join("codeflow");

        AppState::init(Some(app_dir.clone()), None).unwrap();
        assert!(matches!(
            AppState::init(Some(app_dir), None),
            Err(StateError::AlreadyInitialized)
        ));
    }

    #[test]
    fn test_load_uninitialized() {
        let dir = tempfile::tempdir().unwrap();
        assert!(matches!(
            AppState::load(Some(dir.path().join("missing"))),
            Err(StateError::NotInitialized)
        ));
    }

    #[test]
    fn test_partial_config_uses_defaults() {
        let config: AppConfig = toml::from_str("api_port = 3000\nlog_level = \"debug\"").unwrap();
        assert_eq!(config.api_port, 3000);
        assert_eq!(config.owner, "admin");
        assert_eq!(config.openai_rate_limit, 50);
        assert_eq!(config.gemini_rate_limit, 100);
        assert_eq!(config.log_level().unwrap(), tracing::Level::DEBUG);
        assert!(config.piston_url().is_ok());
    }
}
