use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[serde(rename_all = "snake_case")]
pub enum MediaKind {
    Movie,
    Show,
}

impl MediaKind {
    pub const ALL: [MediaKind; 2] = [MediaKind::Movie, MediaKind::Show];

    pub fn as_str(&self) -> &'static str {
        match self {
            MediaKind::Movie => "movie",
            MediaKind::Show => "show",
        }
    }

    /// Upper-case label used in history records ("MOVIE", "SHOW")
    pub fn label(&self) -> &'static str {
        match self {
            MediaKind::Movie => "MOVIE",
            MediaKind::Show => "SHOW",
        }
    }

    /// List types the catalog publishes for this kind
    pub fn list_types(&self) -> &'static [ListType] {
        match self {
            MediaKind::Movie => &[
                ListType::Anticipated,
                ListType::BoxOffice,
                ListType::Popular,
                ListType::Trending,
            ],
            MediaKind::Show => &[ListType::Anticipated, ListType::Popular, ListType::Trending],
        }
    }
}

impl fmt::Display for MediaKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for MediaKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "movie" | "movies" => Ok(MediaKind::Movie),
            "show" | "shows" | "tv" => Ok(MediaKind::Show),
            other => Err(format!("Unknown media kind: {}", other)),
        }
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[serde(rename_all = "snake_case")]
pub enum ListType {
    Anticipated,
    BoxOffice,
    Popular,
    Trending,
}

impl ListType {
    pub const ALL: [ListType; 4] = [
        ListType::Anticipated,
        ListType::BoxOffice,
        ListType::Popular,
        ListType::Trending,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            ListType::Anticipated => "anticipated",
            ListType::BoxOffice => "box_office",
            ListType::Popular => "popular",
            ListType::Trending => "trending",
        }
    }

    /// Path segment used by the catalog API
    pub fn catalog_path(&self) -> &'static str {
        match self {
            ListType::Anticipated => "anticipated",
            ListType::BoxOffice => "boxoffice",
            ListType::Popular => "popular",
            ListType::Trending => "trending",
        }
    }

    pub fn display_name(&self) -> &'static str {
        match self {
            ListType::Anticipated => "Anticipated",
            ListType::BoxOffice => "Box Office",
            ListType::Popular => "Popular",
            ListType::Trending => "Trending",
        }
    }

    /// Anticipated lists look forward in time, everything else looks back
    pub fn is_forward_looking(&self) -> bool {
        matches!(self, ListType::Anticipated)
    }
}

impl fmt::Display for ListType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ListType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().replace('-', "_").as_str() {
            "anticipated" => Ok(ListType::Anticipated),
            "box_office" | "boxoffice" => Ok(ListType::BoxOffice),
            "popular" => Ok(ListType::Popular),
            "trending" => Ok(ListType::Trending),
            other => Err(format!("Unknown list type: {}", other)),
        }
    }
}

/// Stable identifier of one schedulable pipeline: `{kind}-{list}`.
///
/// Serialized as the plain string form (`movie-anticipated`, `show-trending`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct JobKey {
    pub kind: MediaKind,
    pub list: ListType,
}

impl JobKey {
    pub fn new(kind: MediaKind, list: ListType) -> Self {
        Self { kind, list }
    }

    pub fn is_supported(&self) -> bool {
        self.kind.list_types().contains(&self.list)
    }
}

impl fmt::Display for JobKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}-{}", self.kind.as_str(), self.list.as_str())
    }
}

impl FromStr for JobKey {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (kind, list) = s
            .split_once('-')
            .ok_or_else(|| format!("Invalid job key '{}': expected '{{kind}}-{{list}}'", s))?;
        let key = JobKey::new(kind.parse()?, list.parse()?);
        if !key.is_supported() {
            return Err(format!("The catalog has no {} list for {}s", key.list, key.kind));
        }
        Ok(key)
    }
}

impl Serialize for JobKey {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for JobKey {
    fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        raw.parse().map_err(serde::de::Error::custom)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_job_key_round_trips_through_string() {
        let key = JobKey::new(MediaKind::Movie, ListType::BoxOffice);
        assert_eq!(key.to_string(), "movie-box_office");
        assert_eq!("movie-box_office".parse::<JobKey>().unwrap(), key);
        assert_eq!(
            "show-trending".parse::<JobKey>().unwrap(),
            JobKey::new(MediaKind::Show, ListType::Trending)
        );
    }

    #[test]
    fn test_job_key_rejects_unsupported_pairs() {
        assert!("show-box_office".parse::<JobKey>().is_err());
        assert!("movie".parse::<JobKey>().is_err());
        assert!("album-popular".parse::<JobKey>().is_err());
    }
}
