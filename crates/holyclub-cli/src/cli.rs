//! CLI argument definitions.

use std::path::PathBuf;

use clap::{Parser, Subcommand};

use crate::commands::auth::AuthCommand;
use crate::commands::comment::CommentCommand;
use crate::commands::pober::PoberCommand;
use crate::commands::profile::ProfileCommand;
use crate::commands::stats::StatsArgs;

/// Production backend.
pub const DEFAULT_API: &str = "https://holy-club-back-production.up.railway.app";

/// HolyClub POBER journal from the terminal.
#[derive(Parser, Debug)]
#[command(name = "holyclub")]
#[command(author, version = env!("HOLYCLUB_VERSION"), about, long_about = None)]
pub struct Cli {
    /// Increase verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Output logs as JSON
    #[arg(long, global = true)]
    pub json_logs: bool,

    /// Backend base URL
    #[arg(long, global = true, env = "HOLYCLUB_API", default_value = DEFAULT_API)]
    pub api: String,

    /// Session file (defaults to the user data directory)
    #[arg(long, global = true, env = "HOLYCLUB_STORE")]
    pub store: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Sign in, sign out, and inspect the session
    Auth(AuthCommand),

    /// Read and write journal entries
    Pober(PoberCommand),

    /// Comment on entries
    Comment(CommentCommand),

    /// This week's prayer and Bible reading
    Stats(StatsArgs),

    /// Manage your profile
    Profile(ProfileCommand),
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn cli_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn global_flags_after_subcommand() {
        let cli = Cli::try_parse_from([
            "holyclub",
            "pober",
            "list",
            "--api",
            "http://localhost:8080",
            "-vv",
        ])
        .unwrap();
        assert_eq!(cli.api, "http://localhost:8080");
        assert_eq!(cli.verbose, 2);
    }
}
