//! holyclub - command-line client for the HolyClub POBER journal.
//!
//! A thin wrapper over `holyclub-http`: read the feed, write entries,
//! comment, and check the week's statistics from a terminal.

mod cli;
mod commands;
mod output;
mod session;

use anyhow::Result;
use clap::Parser;
use tracing_subscriber::{EnvFilter, fmt, prelude::*};

use cli::{Cli, Commands};
use commands::{auth, comment, pober, profile, stats};
use session::SessionConfig;

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    init_logging(cli.verbose, cli.json_logs);

    let config = SessionConfig::resolve(&cli.api, cli.store.as_deref())?;

    match cli.command {
        Commands::Auth(cmd) => auth::handle(cmd, &config).await,
        Commands::Pober(cmd) => pober::handle(cmd, &config).await,
        Commands::Comment(cmd) => comment::handle(cmd, &config).await,
        Commands::Stats(args) => stats::run(args, &config).await,
        Commands::Profile(cmd) => profile::handle(cmd, &config).await,
    }
}

fn init_logging(verbosity: u8, json: bool) {
    let filter = match verbosity {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(filter));

    if json {
        tracing_subscriber::registry()
            .with(filter)
            .with(fmt::layer().json().with_writer(std::io::stderr))
            .init();
    } else {
        tracing_subscriber::registry()
            .with(filter)
            .with(fmt::layer().with_target(false).with_writer(std::io::stderr))
            .init();
    }
}
