//! liveturn: command-line front end for live model sessions.
//!
//! Each subcommand is a small session built on the turn coordinator: a text
//! chat, a tool-calling lights demo, a Business Model Canvas assistant, and
//! an audio round trip.

mod bootstrap;
mod cli;
mod demos;

use std::process::ExitCode;

use liveturn_common::LiveturnError;
use liveturn_config::LiveturnConfig;
use tracing_subscriber::EnvFilter;

use crate::cli::{Args, Command};

#[tokio::main]
async fn main() -> ExitCode {
    // .env before anything reads the environment
    if let Ok(path) = dotenvy::dotenv() {
        eprintln!("loaded environment from {}", path.display());
    }

    let args = cli::parse();
    let config = liveturn_config::load_config(args.config.as_deref());

    let default_level = config
        .as_ref()
        .map(|c| c.logging.level.as_str())
        .unwrap_or("info");
    init_logging(args.log_level.as_deref(), default_level);

    let config = match config {
        Ok(config) => config,
        Err(e) => {
            tracing::error!(error = %e, "Failed to load config");
            return ExitCode::FAILURE;
        }
    };

    tracing::info!("liveturn v{} starting", env!("CARGO_PKG_VERSION"));

    match run(args, config).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            tracing::error!(error = %e, "Session failed");
            ExitCode::FAILURE
        }
    }
}

fn init_logging(override_directive: Option<&str>, default_level: &str) {
    // --log-level, then RUST_LOG, then the config file
    let filter = match override_directive {
        Some(directive) => EnvFilter::try_new(directive),
        None => EnvFilter::try_from_default_env()
            .or_else(|_| EnvFilter::try_new(format!("liveturn={default_level}"))),
    }
    .unwrap_or_else(|_| EnvFilter::new("liveturn=info"));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

async fn run(args: Args, config: LiveturnConfig) -> Result<(), LiveturnError> {
    match args.command {
        Command::Chat => demos::chat::run(&config).await,
        Command::Lights { prompt } => demos::lights::run(&config, &prompt).await,
        Command::Canvas => demos::canvas::run(&config).await,
        Command::Audio { input, output } => demos::audio::run(&config, &input, &output).await,
    }
}
