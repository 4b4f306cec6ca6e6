pub mod utils;

use std::net::SocketAddr;
use std::path::Path;
use std::time::Duration;

use futures::future::join_all;
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::fmt::format::FmtSpan;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{EnvFilter, Layer};

use crate::http_server;
use crate::{ServiceConfig, ServiceState};

/// Tasks still running this long after shutdown began are abandoned
const DRAIN_TIMEOUT: Duration = Duration::from_secs(30);

const LOG_FILE_PREFIX: &str = "codeflow.log";

/// Keeps a running service alive and lets the caller stop it.
pub struct ShutdownHandle {
    signal_task: JoinHandle<()>,
    tasks: Vec<JoinHandle<()>>,
    shutdown_tx: watch::Sender<()>,
}

impl ShutdownHandle {
    /// Resolves once a signal or [`ShutdownHandle::shutdown`] has stopped every task.
    pub async fn wait(self) {
        drain(self.signal_task, self.tasks).await;
    }

    pub fn shutdown(&self) {
        let _ = self.shutdown_tx.send(());
    }
}

fn level_filter(level: tracing::Level) -> EnvFilter {
    EnvFilter::builder()
        .with_default_directive(level.into())
        .from_env_lossy()
}

/// Install the global subscriber: compact stdout, plus a plain-text daily file
/// under `log_dir` when one is configured. `RUST_LOG` overrides the level.
fn init_logging(level: tracing::Level, log_dir: Option<&Path>) -> Vec<WorkerGuard> {
    let (stdout, stdout_guard) = tracing_appender::non_blocking(std::io::stdout());
    let mut guards = vec![stdout_guard];

    let console = tracing_subscriber::fmt::layer()
        .compact()
        .with_writer(stdout)
        .with_filter(level_filter(level));

    let file = log_dir.and_then(|dir| match std::fs::create_dir_all(dir) {
        Ok(()) => {
            let appender = tracing_appender::rolling::daily(dir, LOG_FILE_PREFIX);
            let (writer, guard) = tracing_appender::non_blocking(appender);
            guards.push(guard);
            Some(
                tracing_subscriber::fmt::layer()
                    .with_writer(writer)
                    .with_ansi(false)
                    .with_span_events(FmtSpan::CLOSE)
                    .with_filter(level_filter(level)),
            )
        }
        Err(e) => {
            eprintln!("not logging to {}: {}", dir.display(), e);
            None
        }
    });

    tracing_subscriber::registry()
        .with(console)
        .with(file)
        .init();

    utils::register_panic_logger();
    utils::report_build_info();

    guards
}

async fn drain(signal_task: JoinHandle<()>, tasks: Vec<JoinHandle<()>>) {
    let _ = signal_task.await;

    if tokio::time::timeout(DRAIN_TIMEOUT, join_all(tasks))
        .await
        .is_err()
    {
        tracing::error!(
            timeout_secs = DRAIN_TIMEOUT.as_secs(),
            "tasks still running after shutdown, exiting"
        );
        std::process::exit(4);
    }
}

/// Build the service state and start the API server on `api_port`.
///
/// Exits the process if the state cannot be built, e.g. the database cannot
/// be opened or migrated.
pub async fn start_service(config: &ServiceConfig) -> (ServiceState, ShutdownHandle) {
    let (signal_task, shutdown_tx, shutdown_rx) = utils::graceful_shutdown_blocker();

    let state = match ServiceState::from_config(config).await {
        Ok(state) => state,
        Err(e) => {
            tracing::error!(error = %e, "unable to build service state");
            std::process::exit(3);
        }
    };

    let addr = SocketAddr::from(([0, 0, 0, 0], config.api_port));
    let server_config = http_server::Config::new(addr, config.log_level);
    let server_state = state.clone();
    let server = tokio::spawn(async move {
        if let Err(e) = http_server::run_api(server_config, server_state, shutdown_rx).await {
            tracing::error!(error = %e, "API server stopped");
        }
    });
    tracing::info!(port = config.api_port, owner = %config.owner, "codeflow API started");

    let handle = ShutdownHandle {
        signal_task,
        tasks: vec![server],
        shutdown_tx,
    };
    (state, handle)
}

/// Run the daemon in the foreground until it is told to stop.
pub async fn spawn_service(config: &ServiceConfig) {
    let _guards = init_logging(config.log_level, config.log_dir.as_deref());
    let (_state, handle) = start_service(config).await;
    handle.wait().await;
}
