use media_acquire_models::{CandidateItem, ExternalIds, MediaKind};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TraktIds {
    #[serde(default)]
    pub trakt: Option<u64>,
    #[serde(default)]
    pub slug: Option<String>,
    #[serde(default)]
    pub imdb: Option<String>,
    #[serde(default)]
    pub tmdb: Option<u64>,
    #[serde(default)]
    pub tvdb: Option<u64>,
}

/// Movie or show as returned with `extended=full`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TraktMedia {
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub year: Option<u32>,
    pub ids: TraktIds,
    #[serde(default)]
    pub overview: Option<String>,
    #[serde(default)]
    pub runtime: Option<u32>,
    #[serde(default)]
    pub country: Option<String>,
    #[serde(default)]
    pub language: Option<String>,
    #[serde(default)]
    pub genres: Vec<String>,
    #[serde(default)]
    pub rating: Option<f64>,
    /// Shows only
    #[serde(default)]
    pub network: Option<String>,
}

/// Popular lists return bare media objects; trending, anticipated and box
/// office wrap them alongside a counter (`watchers`, `list_count`, `revenue`)
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum TraktListEntry {
    Bare(TraktMedia),
    Wrapped {
        #[serde(default)]
        movie: Option<TraktMedia>,
        #[serde(default)]
        show: Option<TraktMedia>,
    },
}

impl TraktListEntry {
    fn into_media(self, kind: MediaKind) -> Option<TraktMedia> {
        match self {
            TraktListEntry::Bare(media) => Some(media),
            TraktListEntry::Wrapped { movie, show } => match kind {
                MediaKind::Movie => movie,
                MediaKind::Show => show,
            },
        }
    }
}

/// Trakt sometimes includes slashes in IMDb ids
fn clean_imdb(id: Option<String>) -> Option<String> {
    id.map(|s| s.replace('/', "")).filter(|s| !s.is_empty())
}

fn non_empty(value: Option<String>) -> Option<String> {
    value.map(|s| s.trim().to_string()).filter(|s| !s.is_empty())
}

impl TraktMedia {
    pub fn into_candidate(self) -> CandidateItem {
        CandidateItem {
            title: self.title.unwrap_or_default(),
            year: self.year,
            runtime_minutes: self.runtime.filter(|r| *r > 0),
            genres: self.genres,
            country_code: non_empty(self.country),
            language_code: non_empty(self.language),
            network: non_empty(self.network),
            overview: non_empty(self.overview),
            rating: self.rating,
            ids: ExternalIds {
                trakt: self.ids.trakt,
                slug: self.ids.slug,
                imdb: clean_imdb(self.ids.imdb),
                tmdb: self.ids.tmdb,
                tvdb: self.ids.tvdb,
            },
        }
    }
}

/// Decode any list response into candidates, preserving catalog order
pub fn parse_list(body: &str, kind: MediaKind) -> Result<Vec<CandidateItem>, serde_json::Error> {
    let entries: Vec<TraktListEntry> = serde_json::from_str(body)?;
    Ok(entries
        .into_iter()
        .filter_map(|entry| entry.into_media(kind))
        .map(TraktMedia::into_candidate)
        .filter(|item| !item.title.is_empty())
        .collect())
}
