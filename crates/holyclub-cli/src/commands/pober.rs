//! Journal entry commands.

use std::path::PathBuf;

use anyhow::{Context, Result};
use chrono::{Local, NaiveDate};
use clap::{Args, Subcommand};
use colored::Colorize;

use holyclub_core::journal::{EntryDraft, EntryId, EntryQuery, Feed, Passage, PoberSummary};

use crate::commands::read_image;
use crate::output;
use crate::session::{CliSession, SessionConfig};

#[derive(Args, Debug)]
pub struct PoberCommand {
    #[command(subcommand)]
    pub command: PoberSubcommand,
}

#[derive(Subcommand, Debug)]
pub enum PoberSubcommand {
    /// List entries
    List(ListArgs),

    /// Show one entry with its comments
    Show(ShowArgs),

    /// Write a new entry
    Write(DraftArgs),

    /// Replace an existing entry
    Edit(EditArgs),

    /// Delete an entry
    Delete(IdArgs),

    /// Like an entry, or take the like back
    Like(IdArgs),
}

#[derive(Args, Debug)]
pub struct ListArgs {
    /// Only entries written on this day (YYYY-MM-DD)
    #[arg(long)]
    pub date: Option<NaiveDate>,

    /// Only entries by this nickname
    #[arg(long)]
    pub author: Option<String>,

    /// Page to show, starting at 1
    #[arg(long, default_value_t = 1, conflicts_with = "all")]
    pub page: u32,

    /// Entries per page
    #[arg(long, default_value_t = 10)]
    pub size: u32,

    /// Keep loading pages until the feed is exhausted
    #[arg(long)]
    pub all: bool,

    /// Print entries as JSON lines
    #[arg(long)]
    pub json: bool,
}

#[derive(Args, Debug)]
pub struct ShowArgs {
    pub id: EntryId,

    /// Print the entry as JSON
    #[arg(long)]
    pub json: bool,
}

#[derive(Args, Debug)]
pub struct IdArgs {
    pub id: EntryId,
}

#[derive(Args, Debug)]
pub struct DraftArgs {
    /// Entry date (YYYY-MM-DD), today if omitted
    #[arg(long)]
    pub date: Option<NaiveDate>,

    /// Prayer hours
    #[arg(long, default_value_t = 0)]
    pub prayer_hours: u32,

    /// Prayer minutes
    #[arg(long, default_value_t = 0)]
    pub prayer_minutes: u32,

    /// Passage read, e.g. "창세기 1-3장" (repeatable)
    #[arg(long = "passage", value_name = "PASSAGE")]
    pub passages: Vec<Passage>,

    /// Obedience
    #[arg(long, default_value = "")]
    pub obedience: String,

    /// Exercise or evangelism
    #[arg(long, default_value = "")]
    pub exercise: String,

    /// Reading and relationships
    #[arg(long, default_value = "")]
    pub reading: String,

    /// Media minutes
    #[arg(long, default_value_t = 0)]
    pub media: u32,

    /// Free-form memo
    #[arg(long, default_value = "")]
    pub memo: String,

    /// Photo to attach
    #[arg(long, value_name = "PATH")]
    pub image: Option<PathBuf>,
}

#[derive(Args, Debug)]
pub struct EditArgs {
    pub id: EntryId,

    #[command(flatten)]
    pub draft: DraftArgs,
}

impl DraftArgs {
    async fn into_draft(self) -> Result<EntryDraft> {
        let date = self.date.unwrap_or_else(|| Local::now().date_naive());
        let mut draft = EntryDraft::new(date)
            .prayer(self.prayer_hours, self.prayer_minutes)
            .memo(self.memo)
            .obedience(self.obedience)
            .exercise(self.exercise)
            .reading(self.reading)
            .media(self.media);
        if let Some(path) = &self.image {
            draft = draft.image(read_image(path).await?);
        }
        Ok(self.passages.into_iter().fold(draft, EntryDraft::passage))
    }
}

pub async fn handle(cmd: PoberCommand, config: &SessionConfig) -> Result<()> {
    let session = CliSession::open_logged_in(config)?;

    let result = match cmd.command {
        PoberSubcommand::List(args) => list(&session, args).await,
        PoberSubcommand::Show(args) => show(&session, args).await,
        PoberSubcommand::Write(args) => write(&session, args).await,
        PoberSubcommand::Edit(args) => edit(&session, args).await,
        PoberSubcommand::Delete(args) => delete(&session, args).await,
        PoberSubcommand::Like(args) => like(&session, args).await,
    };

    session.save()?;
    result
}

fn query_for(args: &ListArgs) -> EntryQuery {
    let mut query = match args.date {
        Some(day) => EntryQuery::for_day(day),
        None => EntryQuery::default(),
    };
    query.name = args.author.clone();
    query
}

fn print_summary(entry: &PoberSummary) {
    let prayer = entry.prayer.map(output::minutes).unwrap_or_default();
    println!(
        "{} {} {} {} {} {}",
        format!("#{}", entry.id).dimmed(),
        entry.date,
        entry.user.name.bold(),
        prayer.cyan(),
        output::passages(&entry.bibles),
        format!(
            "♥{} 💬{}",
            entry.likes.unwrap_or(0),
            entry.comments.unwrap_or(0)
        )
        .dimmed(),
    );
}

async fn list(session: &CliSession, args: ListArgs) -> Result<()> {
    let query = query_for(&args);

    let entries = if args.all {
        let mut feed = Feed::new(args.size);
        while session
            .club()
            .load_next(&mut feed, &query)
            .await
            .context("Failed to list entries")?
        {}
        feed.items().to_vec()
    } else {
        let query = query.page(args.page, args.size);
        session
            .club()
            .list_entries(&query)
            .await
            .context("Failed to list entries")?
            .items
    };

    if entries.is_empty() {
        eprintln!("{}", "No entries found.".dimmed());
        return Ok(());
    }

    for entry in &entries {
        if args.json {
            output::json(entry)?;
        } else {
            print_summary(entry);
        }
    }

    Ok(())
}

async fn show(session: &CliSession, args: ShowArgs) -> Result<()> {
    let entry = session
        .club()
        .entry(args.id)
        .await
        .context("Failed to get entry")?;

    if args.json {
        return output::json_pretty(&entry);
    }

    output::field("Date", &entry.date);
    output::field("Author", &entry.user.name);
    if let Some(prayer) = entry.prayer {
        output::field("Prayer", &output::minutes(prayer));
    }
    if !entry.bibles.is_empty() {
        output::field("Bible", &output::passages(&entry.bibles));
    }
    for (label, value) in [
        ("Obedience", &entry.obd),
        ("Exercise", &entry.exer),
        ("Reading", &entry.reading),
        ("Memo", &entry.memo),
    ] {
        if let Some(value) = value.as_deref().filter(|v| !v.is_empty()) {
            output::field(label, value);
        }
    }
    if let Some(media) = entry.media {
        output::field("Media", &output::minutes(media));
    }
    if let Some(picture) = &entry.media_pic {
        output::field("Photo", &session.club().file_url(picture));
    }
    let liked = if entry.liked { " (liked)" } else { "" };
    output::field("Likes", &format!("{}{}", entry.like_count, liked));

    if !entry.comments.is_empty() {
        println!();
        for comment in &entry.comments {
            output::comment_thread(comment, 0);
        }
    }

    Ok(())
}

async fn write(session: &CliSession, args: DraftArgs) -> Result<()> {
    let draft = args.into_draft().await?;
    session
        .club()
        .create_entry(&draft)
        .await
        .context("Failed to write entry")?;

    output::success(&format!("Entry for {} saved", draft.date));
    Ok(())
}

async fn edit(session: &CliSession, args: EditArgs) -> Result<()> {
    let draft = args.draft.into_draft().await?;
    session
        .club()
        .update_entry(args.id, &draft)
        .await
        .context("Failed to update entry")?;

    output::success(&format!("Entry #{} updated", args.id));
    Ok(())
}

async fn delete(session: &CliSession, args: IdArgs) -> Result<()> {
    session
        .club()
        .delete_entry(args.id)
        .await
        .context("Failed to delete entry")?;

    output::success(&format!("Entry #{} deleted", args.id));
    Ok(())
}

async fn like(session: &CliSession, args: IdArgs) -> Result<()> {
    session
        .club()
        .toggle_like(args.id)
        .await
        .context("Failed to toggle like")?;

    output::success(&format!("Like toggled on entry #{}", args.id));
    Ok(())
}
