use clap::Args;
use url::Url;

use codeflow_daemon::generate::{DEFAULT_GEMINI_URL, DEFAULT_OPENAI_URL};
use codeflow_daemon::state::{AppState, StateError};
use codeflow_daemon::{spawn_service, ServiceConfig};
use common::prelude::OwnerId;

#[derive(Args, Debug, Clone)]
pub struct Daemon {
    /// Override API server port (default from config)
    #[arg(long)]
    pub api_port: Option<u16>,

    /// Directory for log files (logs to stdout only if not set)
    #[arg(long)]
    pub log_dir: Option<std::path::PathBuf>,

    /// Keep everything in memory instead of the configured db.sqlite
    #[arg(long)]
    pub in_memory: bool,

    #[arg(long, env = "OPENAI_API_KEY", hide_env_values = true)]
    pub openai_api_key: Option<String>,

    #[arg(long, env = "OPENAI_BASE_URL", default_value = DEFAULT_OPENAI_URL)]
    pub openai_url: Url,

    #[arg(long, env = "GEMINI_API_KEY", hide_env_values = true)]
    pub gemini_api_key: Option<String>,

    #[arg(long, env = "GEMINI_BASE_URL", default_value = DEFAULT_GEMINI_URL)]
    pub gemini_url: Url,
}

#[derive(Debug, thiserror::Error)]
pub enum DaemonError {
    #[error("state error: {0}")]
    StateError(#[from] StateError),
}

#[async_trait::async_trait]
impl crate::cli::op::Op for Daemon {
    type Error = DaemonError;
    type Output = String;

    async fn execute(&self, ctx: &crate::cli::op::OpContext) -> Result<Self::Output, Self::Error> {
        // Load state from config path (or default ~/.codeflow)
        let state = AppState::load(ctx.config_path.clone())?;
        let app = &state.config;

        let config = ServiceConfig {
            api_port: self.api_port.unwrap_or(app.api_port),
            sqlite_path: (!self.in_memory).then(|| state.db_path.clone()),
            log_level: app.log_level()?,
            log_dir: self.log_dir.clone(),
            owner: OwnerId::new(app.owner.clone()),
            admin_token: ctx.admin_token.clone(),
            piston_url: app.piston_url()?,
            openai_url: self.openai_url.clone(),
            openai_api_key: self.openai_api_key.clone(),
            openai_model: app.openai_model.clone(),
            openai_rate_limit: app.openai_rate_limit,
            gemini_url: self.gemini_url.clone(),
            gemini_api_key: self.gemini_api_key.clone(),
            gemini_model: app.gemini_model.clone(),
            gemini_rate_limit: app.gemini_rate_limit,
        };

        spawn_service(&config).await;
        Ok("daemon ended".to_string())
    }
}
