//! Profile commands.

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Args, Subcommand};

use holyclub_core::journal::ProfileUpdate;

use crate::commands::read_image;
use crate::output;
use crate::session::{CliSession, SessionConfig};

#[derive(Args, Debug)]
pub struct ProfileCommand {
    #[command(subcommand)]
    pub command: ProfileSubcommand,
}

#[derive(Subcommand, Debug)]
pub enum ProfileSubcommand {
    /// Change nickname or profile picture
    Update(UpdateArgs),
}

#[derive(Args, Debug)]
pub struct UpdateArgs {
    /// New nickname
    #[arg(long)]
    pub nickname: String,

    /// Remove the current profile picture
    #[arg(long, conflicts_with = "picture")]
    pub delete_picture: bool,

    /// Upload a new profile picture
    #[arg(long, value_name = "PATH")]
    pub picture: Option<PathBuf>,
}

pub async fn handle(cmd: ProfileCommand, config: &SessionConfig) -> Result<()> {
    match cmd.command {
        ProfileSubcommand::Update(args) => update(args, config).await,
    }
}

async fn update(args: UpdateArgs, config: &SessionConfig) -> Result<()> {
    let mut update = ProfileUpdate::new(args.nickname).context("Invalid nickname")?;
    if args.delete_picture {
        update = update.delete_picture();
    }
    if let Some(path) = &args.picture {
        update = update.picture(read_image(path).await?);
    }

    let session = CliSession::open_logged_in(config)?;
    let result = session
        .club()
        .update_profile(&update)
        .await
        .context("Failed to update profile");
    session.save()?;
    result?;

    output::success(&format!("Profile updated ({})", update.nickname()));
    Ok(())
}
