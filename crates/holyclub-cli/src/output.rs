//! Output formatting helpers.

use anyhow::Result;
use colored::Colorize;
use serde::Serialize;

use holyclub_core::journal::{Comment, Passage};

/// Print a success message.
pub fn success(msg: &str) {
    println!("{} {}", "✓".green(), msg);
}

/// Print an error message.
pub fn error(msg: &str) {
    eprintln!("{} {}", "✗".red(), msg);
}

/// Print a labeled field.
pub fn field(label: &str, value: &str) {
    println!("{}: {}", label.dimmed(), value);
}

/// Print a value as compact JSON.
pub fn json<T: Serialize>(value: &T) -> Result<()> {
    let json = serde_json::to_string(value)?;
    println!("{}", json);
    Ok(())
}

/// Print a value as pretty-printed JSON.
pub fn json_pretty<T: Serialize>(value: &T) -> Result<()> {
    let json = serde_json::to_string_pretty(value)?;
    println!("{}", json);
    Ok(())
}

/// Minutes as `1시간 30분`.
pub fn minutes(total: u32) -> String {
    match (total / 60, total % 60) {
        (0, m) => format!("{}분", m),
        (h, 0) => format!("{}시간", h),
        (h, m) => format!("{}시간 {}분", h, m),
    }
}

/// Passages joined for a single line.
pub fn passages(passages: &[Passage]) -> String {
    passages
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join(", ")
}

/// Print a comment and its replies, indented by depth.
pub fn comment_thread(comment: &Comment, depth: usize) {
    let indent = "  ".repeat(depth);
    println!(
        "{}{} {} {}",
        indent,
        format!("#{}", comment.id).dimmed(),
        comment.user.name.bold(),
        comment.content
    );
    for reply in &comment.comments {
        comment_thread(reply, depth + 1);
    }
}
