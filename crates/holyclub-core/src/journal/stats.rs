//! Weekly statistics and their aggregation.

use std::collections::BTreeMap;

use chrono::Weekday;
use serde::{Deserialize, Serialize};

use super::passage::Passage;

/// Minutes prayed per weekday, keyed `"1"` (Sunday) to `"7"` (Saturday).
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct WeeklyPrayerStats {
    #[serde(default)]
    pub stats: BTreeMap<String, u32>,
}

/// Passages read per weekday, keyed `"1"` (Sunday) to `"7"` (Saturday).
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct WeeklyBibleStats {
    #[serde(default)]
    pub stats: BTreeMap<String, Vec<Passage>>,
}

/// One weekday's totals.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DayStats {
    pub weekday: Weekday,
    pub prayer_minutes: u32,
    pub chapters: u32,
    /// Passage labels such as `"창세기 1-3장"`.
    pub passages: Vec<String>,
}

/// The week at a glance.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct WeeklySummary {
    /// Sunday first; weekdays the backend reported nothing for are absent.
    pub days: Vec<DayStats>,
    pub total_prayer_minutes: u32,
    pub total_chapters: u32,
    /// Days with any prayer time.
    pub prayer_days: usize,
    /// Days with any chapter read.
    pub bible_days: usize,
}

const WEEK: [(&str, Weekday); 7] = [
    ("1", Weekday::Sun),
    ("2", Weekday::Mon),
    ("3", Weekday::Tue),
    ("4", Weekday::Wed),
    ("5", Weekday::Thu),
    ("6", Weekday::Fri),
    ("7", Weekday::Sat),
];

impl WeeklySummary {
    /// Combine the two backend buckets. Keys outside `"1"..="7"` are ignored.
    pub fn from_stats(prayer: &WeeklyPrayerStats, bible: &WeeklyBibleStats) -> Self {
        let mut days = Vec::new();

        for (key, weekday) in WEEK {
            let minutes = prayer.stats.get(key);
            let passages = bible.stats.get(key);
            if minutes.is_none() && passages.is_none() {
                continue;
            }

            let passages = passages.map(Vec::as_slice).unwrap_or_default();
            days.push(DayStats {
                weekday,
                prayer_minutes: minutes.copied().unwrap_or(0),
                chapters: passages
                    .iter()
                    .map(Passage::chapters)
                    .fold(0, u32::saturating_add),
                passages: passages.iter().map(ToString::to_string).collect(),
            });
        }

        Self {
            total_prayer_minutes: days
                .iter()
                .map(|d| d.prayer_minutes)
                .fold(0, u32::saturating_add),
            total_chapters: days
                .iter()
                .map(|d| d.chapters)
                .fold(0, u32::saturating_add),
            prayer_days: days.iter().filter(|d| d.prayer_minutes > 0).count(),
            bible_days: days.iter().filter(|d| d.chapters > 0).count(),
            days,
        }
    }
}

/// Short Korean label for a weekday, as the journal shows it.
pub fn weekday_label(weekday: Weekday) -> &'static str {
    match weekday {
        Weekday::Sun => "일",
        Weekday::Mon => "월",
        Weekday::Tue => "화",
        Weekday::Wed => "수",
        Weekday::Thu => "목",
        Weekday::Fri => "금",
        Weekday::Sat => "토",
    }
}
