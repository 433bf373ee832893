//! Bible passage ranges.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::{Error, InvalidInputError};

/// A range of chapters read from one book.
///
/// The backend calls this a `Bible` and names the book field `chapter`.
///
/// # Example
///
/// ```
/// use holyclub_core::journal::Passage;
///
/// let passage: Passage = "창세기 1-3장".parse().unwrap();
/// assert_eq!(passage.chapters(), 3);
/// assert_eq!(passage.to_string(), "창세기 1-3장");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Passage {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<i64>,
    #[serde(rename = "chapter")]
    pub book: String,
    pub start: u32,
    pub end: u32,
}

impl Passage {
    /// Create a passage, validating the range.
    pub fn new(book: impl Into<String>, start: u32, end: u32) -> Result<Self, Error> {
        let book = book.into();
        let value = format!("{} {}-{}", book, start, end);
        if book.trim().is_empty() {
            return Err(InvalidInputError::Passage {
                value,
                reason: "book name is empty".to_string(),
            }
            .into());
        }
        if start == 0 || end < start {
            return Err(InvalidInputError::Passage {
                value,
                reason: "chapter range must start at 1 and not run backwards".to_string(),
            }
            .into());
        }
        Ok(Self {
            id: None,
            book: book.trim().to_string(),
            start,
            end,
        })
    }

    /// Number of chapters covered. A backwards range from the backend counts as zero.
    pub fn chapters(&self) -> u32 {
        if self.end < self.start {
            0
        } else {
            (self.end - self.start).saturating_add(1)
        }
    }
}

impl fmt::Display for Passage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.start == self.end {
            write!(f, "{} {}장", self.book, self.start)
        } else {
            write!(f, "{} {}-{}장", self.book, self.start, self.end)
        }
    }
}

impl FromStr for Passage {
    type Err = Error;

    /// Parses `"<book> <start>장"` or `"<book> <start>-<end>장"`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = |reason: &str| -> Error {
            InvalidInputError::Passage {
                value: s.to_string(),
                reason: reason.to_string(),
            }
            .into()
        };

        let body = s
            .trim()
            .strip_suffix('장')
            .ok_or_else(|| invalid("expected a trailing '장'"))?;
        let (book, range) = body
            .rsplit_once(char::is_whitespace)
            .ok_or_else(|| invalid("expected '<book> <chapters>'"))?;
        let (start, end) = match range.split_once('-') {
            Some((start, end)) => (start, end),
            None => (range, range),
        };
        let start = start
            .parse::<u32>()
            .map_err(|_| invalid("start chapter is not a number"))?;
        let end = end
            .parse::<u32>()
            .map_err(|_| invalid("end chapter is not a number"))?;

        Passage::new(book, start, end)
    }
}
