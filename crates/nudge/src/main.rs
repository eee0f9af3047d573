// SPDX-FileCopyrightText: 2026 Nudge Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Nudge - recurring reminders with daily completion tracking.
//!
//! This is the binary entry point. `tick` runs one scheduling pass (for use
//! under an external cron); `serve` runs the periodic scheduler plus the
//! completion-event webhook.

use std::path::PathBuf;

use clap::{Parser, Subcommand};

mod channel;
mod serve;
mod tick;

/// Nudge - recurring reminders with daily completion tracking.
#[derive(Parser, Debug)]
#[command(name = "nudge", version, about, long_about = None)]
struct Cli {
    /// Path to a configuration file (skips the XDG lookup).
    #[arg(short, long, global = true, value_name = "FILE")]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

/// Available subcommands.
#[derive(Subcommand, Debug)]
enum Commands {
    /// Run a single scheduling pass and exit.
    Tick,
    /// Run the periodic scheduler and the completion webhook server.
    Serve,
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    // Load and validate configuration at startup.
    let loaded = match &cli.config {
        Some(path) => nudge_config::load_and_validate_path(path),
        None => nudge_config::load_and_validate(),
    };
    let config = match loaded {
        Ok(config) => config,
        Err(errors) => {
            nudge_config::render_errors(&errors);
            std::process::exit(1);
        }
    };

    init_tracing(&config.engine.log_level);

    let result = match cli.command {
        Commands::Tick => tick::run_tick(config).await,
        Commands::Serve => serve::run_serve(config).await,
    };

    if let Err(e) = result {
        eprintln!("nudge: {e}");
        std::process::exit(1);
    }
}

/// Initializes the tracing subscriber with the given log level.
fn init_tracing(log_level: &str) {
    use tracing_subscriber::EnvFilter;

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        EnvFilter::new(format!(
            "warn,nudge={log_level},nudge_engine={log_level},nudge_storage={log_level},nudge_discord={log_level}"
        ))
    });

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_thread_names(false)
        .init();
}
