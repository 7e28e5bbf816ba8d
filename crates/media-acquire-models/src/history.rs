use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::MediaKind;

/// Append-only entry written after a confirmed acquisition
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct AcquiredMediaRecord {
    pub kind: MediaKind,
    pub title: String,
    pub year: Option<u32>,
    #[serde(default)]
    pub summary: String,
    pub imdb_id: Option<String>,
    #[serde(default)]
    pub poster_url: String,
    pub added_at: DateTime<Utc>,
}

impl AcquiredMediaRecord {
    /// Whether two records describe the same item (IMDb id, else kind+title+year)
    pub fn same_item(&self, other: &AcquiredMediaRecord) -> bool {
        match (&self.imdb_id, &other.imdb_id) {
            (Some(a), Some(b)) => a == b,
            _ => {
                self.kind == other.kind
                    && self.year == other.year
                    && self.title.eq_ignore_ascii_case(&other.title)
            }
        }
    }
}

/// Metadata looked up after a successful request; empty fields on degradation
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct Enrichment {
    pub title: String,
    pub poster: String,
    pub summary: String,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum NotificationKind {
    MovieAdded,
    ShowAdded,
}

impl NotificationKind {
    pub fn for_media(kind: MediaKind) -> Self {
        match kind {
            MediaKind::Movie => NotificationKind::MovieAdded,
            MediaKind::Show => NotificationKind::ShowAdded,
        }
    }
}

/// "Item acquired" event delivered to every notification provider
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct NotificationEvent {
    pub kind: NotificationKind,
    pub title: String,
    pub year: Option<u32>,
    pub overview: String,
    pub genres: Vec<String>,
    pub rating: Option<f64>,
    pub imdb_id: Option<String>,
    pub poster_url: String,
}
