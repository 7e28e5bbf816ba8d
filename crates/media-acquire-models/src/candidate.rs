use serde::{Deserialize, Serialize};

use crate::ExternalIds;

/// Normalized catalog entry, produced fresh on every run
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct CandidateItem {
    pub title: String,
    pub year: Option<u32>,
    pub runtime_minutes: Option<u32>,
    #[serde(default)]
    pub genres: Vec<String>,
    pub country_code: Option<String>,
    pub language_code: Option<String>,
    /// Broadcasting network (shows only)
    pub network: Option<String>,
    pub overview: Option<String>,
    pub rating: Option<f64>,
    #[serde(default)]
    pub ids: ExternalIds,
}

impl CandidateItem {
    /// "Title (Year)" for logs and notifications
    pub fn label(&self) -> String {
        match self.year {
            Some(year) => format!("{} ({})", self.title, year),
            None => self.title.clone(),
        }
    }
}

/// Query parameters sent to the catalog with every list fetch
///
/// Allow-lists travel here rather than being enforced locally.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct CatalogQuery {
    pub extended: String,
    pub limit: u32,
    pub countries: Option<String>,
    pub languages: Option<String>,
    pub runtimes: Option<String>,
    pub years: Option<String>,
}

impl CatalogQuery {
    /// Non-empty parameters as key/value pairs, ready for a query string
    pub fn to_pairs(&self) -> Vec<(&'static str, String)> {
        let mut pairs = vec![("limit", self.limit.to_string())];
        if !self.extended.is_empty() {
            pairs.insert(0, ("extended", self.extended.clone()));
        }
        let optional = [
            ("countries", &self.countries),
            ("languages", &self.languages),
            ("runtimes", &self.runtimes),
            ("years", &self.years),
        ];
        for (name, value) in optional {
            if let Some(value) = value.as_ref().filter(|v| !v.is_empty()) {
                pairs.push((name, value.clone()));
            }
        }
        pairs
    }
}
