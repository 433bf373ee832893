//! Comment commands.

use anyhow::{Context, Result};
use clap::{Args, Subcommand};

use holyclub_core::journal::{CommentDraft, CommentId, EntryId};

use crate::output;
use crate::session::{CliSession, SessionConfig};

#[derive(Args, Debug)]
pub struct CommentCommand {
    #[command(subcommand)]
    pub command: CommentSubcommand,
}

#[derive(Subcommand, Debug)]
pub enum CommentSubcommand {
    /// Comment on an entry, or reply to a comment
    Add(AddArgs),

    /// Change a comment's text
    Edit(EditArgs),

    /// Delete a comment
    Delete(DeleteArgs),
}

#[derive(Args, Debug)]
pub struct AddArgs {
    /// Entry to comment on
    pub entry: EntryId,

    pub content: String,

    /// Reply to this top-level comment
    #[arg(long)]
    pub reply_to: Option<CommentId>,
}

#[derive(Args, Debug)]
pub struct EditArgs {
    pub id: CommentId,

    pub content: String,
}

#[derive(Args, Debug)]
pub struct DeleteArgs {
    pub id: CommentId,
}

pub async fn handle(cmd: CommentCommand, config: &SessionConfig) -> Result<()> {
    let session = CliSession::open_logged_in(config)?;

    let result = match cmd.command {
        CommentSubcommand::Add(args) => add(&session, args).await,
        CommentSubcommand::Edit(args) => edit(&session, args).await,
        CommentSubcommand::Delete(args) => delete(&session, args).await,
    };

    session.save()?;
    result
}

async fn add(session: &CliSession, args: AddArgs) -> Result<()> {
    let mut draft = CommentDraft::new(args.entry, args.content).context("Invalid comment")?;
    if let Some(parent) = args.reply_to {
        draft = draft.reply_to(parent);
    }

    session
        .club()
        .add_comment(&draft)
        .await
        .context("Failed to add comment")?;

    output::success(&format!("Comment added to entry #{}", args.entry));
    Ok(())
}

async fn edit(session: &CliSession, args: EditArgs) -> Result<()> {
    session
        .club()
        .update_comment(args.id, &args.content)
        .await
        .context("Failed to edit comment")?;

    output::success(&format!("Comment #{} updated", args.id));
    Ok(())
}

async fn delete(session: &CliSession, args: DeleteArgs) -> Result<()> {
    session
        .club()
        .delete_comment(args.id)
        .await
        .context("Failed to delete comment")?;

    output::success(&format!("Comment #{} deleted", args.id));
    Ok(())
}
