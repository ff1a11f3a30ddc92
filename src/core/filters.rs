use crate::models::{Coordinates, Gender};

/// How a search narrows results after the gender filter. Exactly one mode
/// is active at a time; a resolved location takes precedence over the text
/// that produced it.
#[derive(Debug, Clone, PartialEq)]
pub enum SearchMode {
    /// Proximity filter + sort around a resolved location.
    Proximity(Coordinates),
    /// Case-insensitive substring match on address/city text.
    Text(String),
    /// No further narrowing.
    None,
}

impl SearchMode {
    /// Resolve the active mode from the request pieces. Location wins over
    /// text; blank text counts as absent.
    pub fn from_parts(location: Option<Coordinates>, query: Option<&str>) -> Self {
        if let Some(origin) = location {
            return SearchMode::Proximity(origin);
        }
        match query.map(str::trim) {
            Some(q) if !q.is_empty() => SearchMode::Text(q.to_string()),
            _ => SearchMode::None,
        }
    }
}

/// Exact-match gender filter. `Any` as the filter value passes everything;
/// any other value requires strict equality, so a listing looking for `Any`
/// is excluded by a `Male` or `Female` filter.
#[inline]
pub fn matches_gender(target: Gender, filter: Gender) -> bool {
    filter == Gender::Any || target == filter
}

/// Case-insensitive substring match used in text mode.
#[inline]
pub fn matches_text(haystack: &str, needle: &str) -> bool {
    haystack.to_lowercase().contains(&needle.to_lowercase())
}
