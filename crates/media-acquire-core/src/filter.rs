//! Deny-list filtering and quota truncation.
//!
//! Allow-lists (country, language) and numeric bounds travel to the catalog
//! as query parameters and are not re-checked here.

use media_acquire_models::{CandidateItem, FilterRule, MediaKind};

/// Why a candidate was dropped
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Rejection {
    BlacklistedId,
    BlacklistedGenre,
    BlacklistedKeyword,
    BlacklistedNetwork,
}

/// Deny-lists lowercased once per run
struct DenyLists<'a> {
    ids: &'a [u64],
    genres: Vec<String>,
    keywords: Vec<String>,
    networks: Vec<String>,
}

fn lowered(values: &[String]) -> Vec<String> {
    values
        .iter()
        .map(|v| v.trim().to_lowercase())
        .filter(|v| !v.is_empty())
        .collect()
}

impl<'a> DenyLists<'a> {
    fn new(rules: &'a FilterRule) -> Self {
        Self {
            ids: &rules.blacklisted_external_ids,
            genres: lowered(&rules.blacklisted_genres),
            keywords: lowered(&rules.blacklisted_title_keywords),
            networks: lowered(&rules.blacklisted_networks),
        }
    }

    fn check(&self, item: &CandidateItem, kind: MediaKind) -> Option<Rejection> {
        if let Some(id) = item.ids.deny_list_id(kind) {
            if self.ids.contains(&id) {
                return Some(Rejection::BlacklistedId);
            }
        }

        if item
            .genres
            .iter()
            .any(|genre| self.genres.contains(&genre.trim().to_lowercase()))
        {
            return Some(Rejection::BlacklistedGenre);
        }

        let title = item.title.to_lowercase();
        if self.keywords.iter().any(|keyword| title.contains(keyword.as_str())) {
            return Some(Rejection::BlacklistedKeyword);
        }

        if let Some(network) = &item.network {
            if self.networks.contains(&network.trim().to_lowercase()) {
                return Some(Rejection::BlacklistedNetwork);
            }
        }

        None
    }
}

/// First deny-list rule that matches `item`, checked in fixed order:
/// external id, genre, title keyword, network.
pub fn first_rejection(
    item: &CandidateItem,
    rules: &FilterRule,
    kind: MediaKind,
) -> Option<Rejection> {
    DenyLists::new(rules).check(item, kind)
}

/// Drop deny-listed candidates and keep at most `quota` of the rest, in input order.
///
/// Under-fill is not an error. Stops inspecting candidates once the quota is met.
pub fn reduce(
    candidates: Vec<CandidateItem>,
    rules: &FilterRule,
    kind: MediaKind,
    quota: usize,
) -> Vec<CandidateItem> {
    if quota == 0 {
        return Vec::new();
    }
    let deny = DenyLists::new(rules);
    candidates
        .into_iter()
        .filter(|item| deny.check(item, kind).is_none())
        .take(quota)
        .collect()
}
