use media_acquire_models::{CatalogQuery, FilterRule, ListType};

/// How far ahead anticipated lists look
const ANTICIPATED_YEARS_AHEAD: i32 = 10;
/// Upper runtime bound sent when only a minimum is configured
const OPEN_RUNTIME_MAX: u32 = 999;

fn join_codes(values: &[String]) -> Option<String> {
    let codes: Vec<String> = values
        .iter()
        .map(|v| v.trim().to_lowercase())
        .filter(|v| !v.is_empty())
        .collect();
    (!codes.is_empty()).then(|| codes.join(","))
}

/// Catalog request parameters for one list fetch
///
/// Anticipated lists search from the minimum year (or now) to ten years out.
/// Every other list is bounded above by `max_year`, or the current year.
pub fn build_catalog_query(
    list: ListType,
    rules: &FilterRule,
    limit: u32,
    now_year: i32,
) -> CatalogQuery {
    let runtimes = match (rules.min_runtime, rules.max_runtime) {
        (None, None) => None,
        (min, max) => Some(format!("{}-{}", min.unwrap_or(0), max.unwrap_or(OPEN_RUNTIME_MAX))),
    };

    let years = if list.is_forward_looking() {
        let from = rules.min_year.map(|y| y as i32).unwrap_or(now_year);
        format!("{}-{}", from, now_year + ANTICIPATED_YEARS_AHEAD)
    } else {
        let from = rules.min_year.unwrap_or(0);
        let to = rules.max_year.map(|y| y as i32).unwrap_or(now_year);
        format!("{}-{}", from, to)
    };

    CatalogQuery {
        extended: "full".to_string(),
        limit,
        countries: join_codes(&rules.allowed_countries),
        languages: join_codes(&rules.allowed_languages),
        runtimes,
        years: Some(years),
    }
}
