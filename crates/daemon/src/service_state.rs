use std::sync::Arc;

use axum::extract::FromRef;
use url::Url;

use common::prelude::Workspace;

use crate::auth::{AdminTokenGate, AuthGate};
use crate::database::{Database, DatabaseSetupError};
use crate::generate::{
    CodeGenerator, GeminiProvider, OpenAiProvider, ProviderError, RateLimiter,
};
use crate::runner::{CodeRunner, PistonRunner, RunnerError};
use crate::service_config::Config;

/// Main service state - everything a request handler can reach
#[derive(Clone)]
pub struct State {
    database: Database,
    workspace: Workspace<Database>,
    auth: Arc<dyn AuthGate>,
    runner: Arc<dyn CodeRunner>,
    generator: Arc<CodeGenerator>,
}

impl std::fmt::Debug for State {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("State")
            .field("database", &self.database)
            .field("generator", &self.generator)
            .finish()
    }
}

impl State {
    pub async fn from_config(config: &Config) -> Result<Self, StateSetupError> {
        // 1. Setup database
        let sqlite_database_url = match config.sqlite_path {
            Some(ref path) => {
                // check that the path exists
                if !path.exists() {
                    return Err(StateSetupError::DatabasePathDoesNotExist);
                }
                // parse the path into a URL
                Url::parse(&format!("sqlite://{}", path.display()))
                    .map_err(|_| StateSetupError::InvalidDatabaseUrl)
            }
            // otherwise just set up an in-memory database
            None => Url::parse("sqlite::memory:").map_err(|_| StateSetupError::InvalidDatabaseUrl),
        }?;
        tracing::info!("Database URL: {:?}", sqlite_database_url);
        let database = Database::connect(&sqlite_database_url).await?;

        // 2. Setup access gate
        let auth = AdminTokenGate::new(config.owner.clone(), config.admin_token.clone());
        if config.admin_token.is_none() {
            tracing::warn!("no admin token configured, writes are open");
        }

        // 3. Setup proxies
        let runner = PistonRunner::new(config.piston_url.clone())?;
        tracing::info!(url = %config.piston_url, "code execution via piston");

        let generator = CodeGenerator::new()
            .with_provider(
                OpenAiProvider::new(
                    config.openai_url.clone(),
                    config.openai_api_key.clone(),
                    config.openai_model.clone(),
                )?,
                RateLimiter::per_minute(config.openai_rate_limit),
            )
            .with_provider(
                GeminiProvider::new(
                    config.gemini_url.clone(),
                    config.gemini_api_key.clone(),
                    config.gemini_model.clone(),
                )?,
                RateLimiter::per_minute(config.gemini_rate_limit),
            );
        tracing::debug!(?generator, "code generation providers ready");

        Ok(Self::with_components(database, auth, runner, generator))
    }

    /// Assemble state from prebuilt parts, e.g. mocks in tests
    pub fn with_components(
        database: Database,
        auth: impl AuthGate,
        runner: impl CodeRunner,
        generator: CodeGenerator,
    ) -> Self {
        Self {
            workspace: Workspace::new(database.clone()),
            database,
            auth: Arc::new(auth),
            runner: Arc::new(runner),
            generator: Arc::new(generator),
        }
    }

    pub fn database(&self) -> &Database {
        &self.database
    }

    pub fn workspace(&self) -> &Workspace<Database> {
        &self.workspace
    }

    pub fn auth(&self) -> &dyn AuthGate {
        self.auth.as_ref()
    }

    pub fn runner(&self) -> &dyn CodeRunner {
        self.runner.as_ref()
    }

    pub fn generator(&self) -> &CodeGenerator {
        &self.generator
    }
}

impl AsRef<Database> for State {
    fn as_ref(&self) -> &Database {
        self.database()
    }
}

impl FromRef<State> for Database {
    fn from_ref(state: &State) -> Self {
        state.database.clone()
    }
}

#[derive(Debug, thiserror::Error)]
pub enum StateSetupError {
    #[error("Database path does not exist")]
    DatabasePathDoesNotExist,
    #[error("Database setup error")]
    DatabaseSetupError(#[from] DatabaseSetupError),
    #[error("Invalid database URL")]
    InvalidDatabaseUrl,
    #[error("Code runner setup error: {0}")]
    Runner(#[from] RunnerError),
    #[error("Generation provider setup error: {0}")]
    Generator(#[from] ProviderError),
}
