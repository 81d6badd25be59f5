use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

pub const MIN_RATING: i32 = 1;
pub const MAX_RATING: i32 = 3;

const PREVIEW_CHARS: usize = 80;

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Entry {
    pub id: Uuid,
    pub user_id: Uuid,
    pub entry_date: NaiveDate,
    pub text: Option<String>,
    pub rating: Option<i32>,
    pub skipped: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Entry {
    /// Counts toward streaks, stats and random selection.
    pub fn is_qualifying(&self) -> bool {
        !self.skipped && self.text.as_deref().is_some_and(|t| !t.is_empty())
    }
}

/// Human-readable label for a stored rating.
pub fn rating_label(rating: Option<i32>) -> Option<&'static str> {
    match rating? {
        1 => Some("Good"),
        2 => Some("Great"),
        3 => Some("Amazing"),
        _ => None,
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct UpsertEntryRequest {
    pub date: Option<NaiveDate>,
    pub text: Option<String>,
    pub rating: Option<i32>,
    #[serde(default)]
    pub skipped: bool,
}

/// Payload of an entry after validation. A skipped day carries nothing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EntryContent {
    Written { text: String, rating: Option<i32> },
    Skipped,
}

impl EntryContent {
    pub fn text(&self) -> Option<&str> {
        match self {
            EntryContent::Written { text, .. } => Some(text),
            EntryContent::Skipped => None,
        }
    }

    pub fn rating(&self) -> Option<i32> {
        match self {
            EntryContent::Written { rating, .. } => *rating,
            EntryContent::Skipped => None,
        }
    }

    pub fn is_skipped(&self) -> bool {
        matches!(self, EntryContent::Skipped)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidEntry {
    pub date: NaiveDate,
    pub content: EntryContent,
}

#[derive(Debug, Clone, Serialize)]
pub struct EntrySummary {
    pub date: NaiveDate,
    pub rating: Option<i32>,
    pub rating_label: Option<&'static str>,
    pub skipped: bool,
    pub preview: Option<String>,
}

impl From<&Entry> for EntrySummary {
    fn from(e: &Entry) -> Self {
        Self {
            date: e.entry_date,
            rating: e.rating,
            rating_label: rating_label(e.rating),
            skipped: e.skipped,
            preview: e
                .text
                .as_deref()
                .map(|t| t.chars().take(PREVIEW_CHARS).collect()),
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct MonthPath {
    pub year: i32,
    pub month: u32,
}
