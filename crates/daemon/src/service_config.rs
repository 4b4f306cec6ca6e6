use std::path::PathBuf;

use url::Url;

use common::prelude::OwnerId;

use crate::generate::{
    DEFAULT_GEMINI_MODEL, DEFAULT_GEMINI_RATE_LIMIT, DEFAULT_GEMINI_URL, DEFAULT_OPENAI_MODEL,
    DEFAULT_OPENAI_RATE_LIMIT, DEFAULT_OPENAI_URL,
};
use crate::runner::DEFAULT_PISTON_URL;

#[derive(Debug, Clone)]
pub struct Config {
    // http server configuration
    /// Port for the API HTTP server
    pub api_port: u16,

    // data store configuration
    /// a path to a sqlite database, if not set then an
    ///  in-memory database will be used
    pub sqlite_path: Option<PathBuf>,

    // logging
    pub log_level: tracing::Level,
    /// Directory for log files (optional, logs to stdout only if not set)
    pub log_dir: Option<PathBuf>,

    // access
    /// Identity every record is created under
    pub owner: OwnerId,
    /// Bearer token required on writes; open writes when unset
    pub admin_token: Option<String>,

    // code execution
    pub piston_url: Url,

    // ai generation, tried in this order
    pub openai_url: Url,
    pub openai_api_key: Option<String>,
    pub openai_model: String,
    pub openai_rate_limit: usize,
    pub gemini_url: Url,
    pub gemini_api_key: Option<String>,
    pub gemini_model: String,
    pub gemini_rate_limit: usize,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            api_port: 8080,
            sqlite_path: None,
            log_level: tracing::Level::INFO,
            log_dir: None,
            owner: OwnerId::default(),
            admin_token: None,
            piston_url: default_url(DEFAULT_PISTON_URL),
            openai_url: default_url(DEFAULT_OPENAI_URL),
            openai_api_key: None,
            openai_model: DEFAULT_OPENAI_MODEL.to_string(),
            openai_rate_limit: DEFAULT_OPENAI_RATE_LIMIT,
            gemini_url: default_url(DEFAULT_GEMINI_URL),
            gemini_api_key: None,
            gemini_model: DEFAULT_GEMINI_MODEL.to_string(),
            gemini_rate_limit: DEFAULT_GEMINI_RATE_LIMIT,
        }
    }
}

fn default_url(url: &str) -> Url {
    Url::parse(url).expect("built-in default urls are valid")
}
