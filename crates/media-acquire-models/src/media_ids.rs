use serde::{Deserialize, Serialize};

use crate::MediaKind;

/// External identifiers carried by a catalog entry
///
/// The catalog publishes its own numeric id and slug, plus cross references
/// into IMDb, TMDb (movies) and TVDB (shows). Acquisition backends key on
/// the latter two.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct ExternalIds {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub trakt: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub slug: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub imdb: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tmdb: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tvdb: Option<u64>,
}

impl ExternalIds {
    /// The id the deny-list is matched against: TMDb for movies, TVDB for shows
    pub fn deny_list_id(&self, kind: MediaKind) -> Option<u64> {
        match kind {
            MediaKind::Movie => self.tmdb,
            MediaKind::Show => self.tvdb,
        }
    }
}
