//! Journal domain models.
//!
//! These mirror the JSON the backend sends and accepts for POBER entries,
//! comments, profiles, and weekly statistics.

mod comment;
mod entry;
mod feed;
mod image;
mod passage;
mod stats;
mod user;

pub use comment::{Comment, CommentDraft};
pub use entry::{EntryDraft, EntryQuery, Page, PoberDetail, PoberSummary};
pub use feed::Feed;
pub use image::{ENTRY_IMAGE_FIELD, ImagePart, PROFILE_IMAGE_FIELD};
pub use passage::Passage;
pub use stats::{DayStats, WeeklyBibleStats, WeeklyPrayerStats, WeeklySummary, weekday_label};
pub use user::{Author, ProfileUpdate, UserProfile};

/// Identifier of a POBER entry.
pub type EntryId = i64;

/// Identifier of a comment.
pub type CommentId = i64;
