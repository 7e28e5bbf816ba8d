use serde::{Deserialize, Serialize};

use crate::ListType;

/// Inclusion/exclusion rules attached to one media kind
///
/// Allow-lists (countries, languages) are empty = unrestricted and are sent
/// to the catalog as query parameters. Deny-lists exclude on any match.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct FilterRule {
    #[serde(default)]
    pub allowed_countries: Vec<String>,
    #[serde(default)]
    pub allowed_languages: Vec<String>,
    #[serde(default)]
    pub blacklisted_genres: Vec<String>,
    #[serde(default)]
    pub blacklisted_title_keywords: Vec<String>,
    /// TMDb ids for movies, TVDB ids for shows
    #[serde(default)]
    pub blacklisted_external_ids: Vec<u64>,
    #[serde(default)]
    pub blacklisted_networks: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub min_runtime: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_runtime: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub min_year: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_year: Option<u32>,
}

/// One optional value per list type
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct PerList<T> {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub anticipated: Option<T>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub box_office: Option<T>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub popular: Option<T>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub trending: Option<T>,
}

impl<T> PerList<T> {
    pub fn get(&self, list: ListType) -> Option<&T> {
        match list {
            ListType::Anticipated => self.anticipated.as_ref(),
            ListType::BoxOffice => self.box_office.as_ref(),
            ListType::Popular => self.popular.as_ref(),
            ListType::Trending => self.trending.as_ref(),
        }
    }

    pub fn set(&mut self, list: ListType, value: T) {
        let slot = match list {
            ListType::Anticipated => &mut self.anticipated,
            ListType::BoxOffice => &mut self.box_office,
            ListType::Popular => &mut self.popular,
            ListType::Trending => &mut self.trending,
        };
        *slot = Some(value);
    }
}

/// Per-kind settings: quotas and cron schedules per list, plus filter rules
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct ListSettings {
    #[serde(default)]
    pub quotas: PerList<u32>,
    #[serde(default)]
    pub schedules: PerList<String>,
    #[serde(flatten)]
    pub rules: FilterRule,
}

impl ListSettings {
    /// Quota for a list; unset means zero
    pub fn quota(&self, list: ListType) -> u32 {
        self.quotas.get(list).copied().unwrap_or(0)
    }

    pub fn schedule(&self, list: ListType) -> Option<&str> {
        self.schedules
            .get(list)
            .map(|s| s.trim())
            .filter(|s| !s.is_empty())
    }
}
