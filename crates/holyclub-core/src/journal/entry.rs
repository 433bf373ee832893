//! POBER entries, drafts, and list queries.

use chrono::{Days, NaiveDate};
use serde::{Deserialize, Deserializer, Serialize};

use super::comment::Comment;
use super::image::{ENTRY_IMAGE_FIELD, ImagePart};
use super::passage::Passage;
use super::user::Author;
use super::EntryId;

/// An entry as it appears in the feed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PoberSummary {
    pub id: EntryId,
    pub user: Author,
    pub date: String,
    #[serde(default)]
    pub memo: Option<String>,
    /// Prayer time in minutes.
    #[serde(default)]
    pub prayer: Option<u32>,
    #[serde(default)]
    pub bibles: Vec<Passage>,
    #[serde(default)]
    pub exer: Option<String>,
    #[serde(default)]
    pub obd: Option<String>,
    #[serde(default)]
    pub reading: Option<String>,
    /// Media time in minutes.
    #[serde(default)]
    pub media: Option<u32>,
    #[serde(default)]
    pub comments: Option<u32>,
    #[serde(default)]
    pub likes: Option<u32>,
    #[serde(default)]
    pub media_pic: Vec<String>,
}

/// A single entry with its comment thread and like state.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PoberDetail {
    pub id: EntryId,
    pub user: Author,
    pub date: String,
    #[serde(default)]
    pub memo: Option<String>,
    #[serde(default)]
    pub prayer: Option<u32>,
    #[serde(default)]
    pub bibles: Vec<Passage>,
    #[serde(default)]
    pub exer: Option<String>,
    #[serde(default)]
    pub obd: Option<String>,
    #[serde(default)]
    pub reading: Option<String>,
    #[serde(default)]
    pub media: Option<u32>,
    #[serde(default)]
    pub media_pic: Option<String>,
    #[serde(default)]
    pub comments: Vec<Comment>,
    #[serde(default)]
    pub comment_count: u32,
    #[serde(default)]
    pub like_count: u32,
    #[serde(default)]
    pub liked: bool,
}

/// One page of the entry feed.
///
/// The list endpoint answers either with a bare array or with a page object;
/// both decode into this type.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Page<T> {
    pub items: Vec<T>,
    pub total_pages: Option<u32>,
    pub total_entries: Option<u64>,
}

#[derive(Deserialize)]
#[serde(untagged)]
enum PageWire<T> {
    Bare(Vec<T>),
    Paged {
        #[serde(alias = "entries")]
        content: Vec<T>,
        #[serde(default, rename = "totalPages")]
        total_pages: Option<u32>,
        #[serde(default, rename = "totalElements", alias = "totalEntries")]
        total_entries: Option<u64>,
    },
}

impl<'de, T> Deserialize<'de> for Page<T>
where
    T: Deserialize<'de>,
{
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        Ok(match PageWire::deserialize(deserializer)? {
            PageWire::Bare(items) => Page {
                items,
                total_pages: None,
                total_entries: None,
            },
            PageWire::Paged {
                content,
                total_pages,
                total_entries,
            } => Page {
                items: content,
                total_pages,
                total_entries,
            },
        })
    }
}

/// Filters for the entry feed.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EntryQuery {
    pub page: Option<u32>,
    pub size: Option<u32>,
    pub start_date: Option<NaiveDate>,
    pub end_date: Option<NaiveDate>,
    /// Author nickname.
    pub name: Option<String>,
}

impl EntryQuery {
    /// Entries written on `day`, expressed as the range `[day, day + 1]`.
    pub fn for_day(day: NaiveDate) -> Self {
        Self {
            start_date: Some(day),
            end_date: day.checked_add_days(Days::new(1)),
            ..Self::default()
        }
    }

    /// Entries by the author with nickname `name`.
    pub fn by_author(name: impl Into<String>) -> Self {
        Self {
            name: Some(name.into()),
            ..Self::default()
        }
    }

    /// Set the 1-based page and page size.
    pub fn page(mut self, page: u32, size: u32) -> Self {
        self.page = Some(page);
        self.size = Some(size);
        self
    }

    /// Query-string pairs. Zero page numbers and sizes are omitted.
    pub fn query_pairs(&self) -> Vec<(&'static str, String)> {
        let mut pairs = Vec::new();
        if let Some(page) = self.page.filter(|p| *p > 0) {
            pairs.push(("page", page.to_string()));
        }
        if let Some(size) = self.size.filter(|s| *s > 0) {
            pairs.push(("size", size.to_string()));
        }
        if let Some(start) = self.start_date {
            pairs.push(("startDate", start.format("%Y-%m-%d").to_string()));
        }
        if let Some(end) = self.end_date {
            pairs.push(("endDate", end.format("%Y-%m-%d").to_string()));
        }
        if let Some(name) = self.name.as_deref().filter(|n| !n.is_empty()) {
            pairs.push(("name", name.to_string()));
        }
        pairs
    }
}

/// A new or edited entry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EntryDraft {
    pub date: NaiveDate,
    pub prayer_minutes: u32,
    pub memo: String,
    pub obedience: String,
    pub exercise: String,
    pub reading: String,
    pub media_minutes: u32,
    pub passages: Vec<Passage>,
    /// Photo sent as the `images` part; the draft goes out as multipart
    /// when present.
    pub image: Option<ImagePart>,
}

impl EntryDraft {
    /// An empty entry for `date`.
    pub fn new(date: NaiveDate) -> Self {
        Self {
            date,
            prayer_minutes: 0,
            memo: String::new(),
            obedience: String::new(),
            exercise: String::new(),
            reading: String::new(),
            media_minutes: 0,
            passages: Vec::new(),
            image: None,
        }
    }

    /// Set prayer time from an hours/minutes pair.
    pub fn prayer(mut self, hours: u32, minutes: u32) -> Self {
        self.prayer_minutes = hours.saturating_mul(60).saturating_add(minutes);
        self
    }

    pub fn memo(mut self, memo: impl Into<String>) -> Self {
        self.memo = memo.into();
        self
    }

    pub fn obedience(mut self, obedience: impl Into<String>) -> Self {
        self.obedience = obedience.into();
        self
    }

    pub fn exercise(mut self, exercise: impl Into<String>) -> Self {
        self.exercise = exercise.into();
        self
    }

    pub fn reading(mut self, reading: impl Into<String>) -> Self {
        self.reading = reading.into();
        self
    }

    pub fn media(mut self, minutes: u32) -> Self {
        self.media_minutes = minutes;
        self
    }

    pub fn passage(mut self, passage: Passage) -> Self {
        self.passages.push(passage);
        self
    }

    pub fn image(mut self, image: ImagePart) -> Self {
        self.image = Some(image);
        self
    }

    /// The attached photo with its multipart field name.
    pub fn file_part(&self) -> Option<(&'static str, &ImagePart)> {
        self.image.as_ref().map(|image| (ENTRY_IMAGE_FIELD, image))
    }

    /// Form fields in the order and naming the backend binds them.
    pub fn form_fields(&self) -> Vec<(String, String)> {
        let mut fields = vec![
            ("prayer".to_string(), self.prayer_minutes.to_string()),
            ("poberDate".to_string(), self.date.format("%Y-%m-%d").to_string()),
            ("memo".to_string(), self.memo.clone()),
            ("obd".to_string(), self.obedience.clone()),
            ("exer".to_string(), self.exercise.clone()),
            ("reading".to_string(), self.reading.clone()),
            ("media".to_string(), self.media_minutes.to_string()),
        ];
        for (idx, passage) in self.passages.iter().enumerate() {
            fields.push((format!("bibles[{idx}].chapter"), passage.book.clone()));
            fields.push((format!("bibles[{idx}].start"), passage.start.to_string()));
            fields.push((format!("bibles[{idx}].end"), passage.end.to_string()));
        }
        fields
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn day(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn day_query_spans_to_next_day() {
        let query = EntryQuery::for_day(day(2025, 12, 31)).page(2, 5);
        assert_eq!(
            query.query_pairs(),
            vec![
                ("page", "2".to_string()),
                ("size", "5".to_string()),
                ("startDate", "2025-12-31".to_string()),
                ("endDate", "2026-01-01".to_string()),
            ]
        );
    }

    #[test]
    fn empty_query_has_no_pairs() {
        assert!(EntryQuery::default().query_pairs().is_empty());
        assert!(EntryQuery::by_author("").query_pairs().is_empty());
    }

    #[test]
    fn draft_form_fields() {
        let draft = EntryDraft::new(day(2025, 3, 9))
            .prayer(1, 15)
            .memo("감사")
            .media(20)
            .passage(Passage::new("창세기", 1, 3).unwrap())
            .passage(Passage::new("시편", 23, 23).unwrap());
        let fields = draft.form_fields();

        assert_eq!(fields[0], ("prayer".to_string(), "75".to_string()));
        assert_eq!(fields[1], ("poberDate".to_string(), "2025-03-09".to_string()));
        assert_eq!(fields[6], ("media".to_string(), "20".to_string()));
        assert!(fields.contains(&("bibles[0].chapter".to_string(), "창세기".to_string())));
        assert!(fields.contains(&("bibles[0].end".to_string(), "3".to_string())));
        assert!(fields.contains(&("bibles[1].start".to_string(), "23".to_string())));
        assert_eq!(fields.len(), 7 + 6);
    }

    #[test]
    fn image_is_a_file_part_not_a_field() {
        let draft = EntryDraft::new(day(2025, 3, 9));
        assert!(draft.file_part().is_none());

        let image = ImagePart::new("walk.png", b"png".to_vec()).unwrap();
        let draft = draft.image(image.clone());
        assert_eq!(draft.file_part(), Some(("images", &image)));
        assert_eq!(draft.form_fields().len(), 7);
    }

    #[test]
    fn page_from_bare_array() {
        let page: Page<u32> = serde_json::from_value(json!([1, 2, 3])).unwrap();
        assert_eq!(page.items, vec![1, 2, 3]);
        assert!(page.total_pages.is_none());
    }

    #[test]
    fn page_from_page_object() {
        let page: Page<u32> = serde_json::from_value(json!({
            "content": [4, 5],
            "totalPages": 3,
            "totalElements": 12
        }))
        .unwrap();
        assert_eq!(page.items, vec![4, 5]);
        assert_eq!(page.total_pages, Some(3));
        assert_eq!(page.total_entries, Some(12));
    }

    #[test]
    fn decodes_feed_item() {
        let entry: PoberSummary = serde_json::from_value(json!({
            "id": 10,
            "user": {"name": "kim"},
            "date": "2025-06-01",
            "prayer": 30,
            "bibles": [{"id": 1, "chapter": "룻기", "start": 1, "end": 4}],
            "likes": 2,
            "mediaPic": ["a.jpg"]
        }))
        .unwrap();
        assert_eq!(entry.bibles[0].chapters(), 4);
        assert_eq!(entry.likes, Some(2));
        assert_eq!(entry.media_pic, vec!["a.jpg".to_string()]);
    }
}
