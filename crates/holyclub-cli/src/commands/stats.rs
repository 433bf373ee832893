//! Weekly statistics command.

use anyhow::{Context, Result};
use clap::Args;
use colored::Colorize;

use holyclub_core::journal::weekday_label;

use crate::output;
use crate::session::{CliSession, SessionConfig};

#[derive(Args, Debug)]
pub struct StatsArgs {
    /// Print the summary as JSON
    #[arg(long)]
    pub json: bool,
}

pub async fn run(args: StatsArgs, config: &SessionConfig) -> Result<()> {
    let session = CliSession::open_logged_in(config)?;

    let summary = session
        .club()
        .weekly_summary()
        .await
        .context("Failed to load weekly statistics");
    session.save()?;
    let summary = summary?;

    if args.json {
        return output::json_pretty(&summary);
    }

    if summary.days.is_empty() {
        eprintln!("{}", "Nothing recorded this week.".dimmed());
        return Ok(());
    }

    for day in &summary.days {
        println!(
            "{} {:>10} {}",
            weekday_label(day.weekday).bold(),
            output::minutes(day.prayer_minutes).cyan(),
            day.passages.join(", ")
        );
    }

    println!();
    output::field(
        "Prayer",
        &format!(
            "{} over {} days",
            output::minutes(summary.total_prayer_minutes),
            summary.prayer_days
        ),
    );
    output::field(
        "Bible",
        &format!(
            "{} chapters over {} days",
            summary.total_chapters, summary.bible_days
        ),
    );

    Ok(())
}
