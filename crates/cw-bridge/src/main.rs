//! cw-bridge: ChatWork command-line bridge
//!
//! Usage:
//!   cw-bridge me                      - Show the token's account
//!   cw-bridge rooms                   - List rooms
//!   cw-bridge read <room> [filters]   - Read message history
//!   cw-bridge send <room> -m <text>   - Post a message
//!
//! Results go to stdout as JSON, logs go to stderr.

mod cli;
mod input;
mod render;

use std::process::ExitCode;

use clap::Parser;
use tracing_subscriber::EnvFilter;

use crate::cli::Cli;

#[tokio::main(flavor = "current_thread")]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    init_logging(&cli.log_level);

    match cli::run(cli).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            tracing::debug!("Command failed: {:?}", e);
            eprintln!("error: {:#}", e);
            ExitCode::from(cli::exit_code(&e))
        }
    }
}

/// Initialize logging on stderr; `RUST_LOG` wins over `--log-level`
fn init_logging(level: &str) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}
