use clap::Args;

use codeflow_daemon::state::{AppConfig, AppState, StateError};

#[derive(Args, Debug, Clone)]
pub struct Init {
    /// API server port
    #[arg(long, default_value_t = 8080)]
    pub api_port: u16,

    /// Identity all records are stored under
    #[arg(long, default_value = "admin")]
    pub owner: String,

    /// Base URL of the Piston execution service
    #[arg(long)]
    pub piston_url: Option<String>,
}

#[derive(Debug, thiserror::Error)]
pub enum InitError {
    #[error("init failed: {0}")]
    StateFailed(#[from] StateError),
}

#[async_trait::async_trait]
impl crate::cli::op::Op for Init {
    type Error = InitError;
    type Output = String;

    async fn execute(&self, ctx: &crate::cli::op::OpContext) -> Result<Self::Output, Self::Error> {
        let mut config = AppConfig {
            api_port: self.api_port,
            owner: self.owner.clone(),
            ..Default::default()
        };
        if let Some(ref piston_url) = self.piston_url {
            config.piston_url = piston_url.clone();
        }
        // reject a bad url now rather than when the daemon starts
        config.piston_url()?;

        let state = AppState::init(ctx.config_path.clone(), Some(config))?;

        let output = format!(
            "Initialized codeflow directory at: {}\n\
             - Database: {}\n\
             - Config: {}\n\
             - API port: {}\n\
             - Owner: {}\n\
             - Piston: {}",
            state.app_dir.display(),
            state.db_path.display(),
            state.config_path.display(),
            state.config.api_port,
            state.config.owner,
            state.config.piston_url,
        );

        Ok(output)
    }
}
