pub use clap::Parser;

use std::path::PathBuf;
use url::Url;

#[derive(Parser, Debug)]
#[command(name = "codeflow")]
#[command(about = "Store, run and generate code in nested workspaces")]
pub struct Args {
    /// API server to talk to (defaults to localhost on the configured api_port)
    #[arg(long, global = true)]
    pub remote: Option<Url>,

    /// Path to the codeflow config directory (defaults to ~/.codeflow)
    #[arg(long, global = true)]
    pub config_path: Option<PathBuf>,

    /// Admin token: sent as a bearer credential by client commands,
    /// required on writes by the daemon
    #[arg(long, global = true, env = "ADMIN_TOKEN", hide_env_values = true)]
    pub admin_token: Option<String>,

    #[command(subcommand)]
    pub command: crate::Command,
}
