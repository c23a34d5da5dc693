//! Client-side filter engine
//!
//! Narrows the currently loaded page without issuing a fetch. A record is
//! visible when it satisfies every active dropdown selection AND the
//! free-text search. Totals shown to the user keep reflecting the server
//! count, not the filtered count.

use std::collections::BTreeMap;

use super::normalize::{MatchMode, ResourceProfile};
use crate::types::Record;

/// Sentinel selection meaning "no filter"
pub const ALL: &str = "all";

/// Free-text search plus dropdown selections
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ClientFilter {
    search: String,
    selections: BTreeMap<String, String>,
}

impl ClientFilter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder-style search setter
    pub fn with_search(mut self, query: impl Into<String>) -> Self {
        self.set_search(query);
        self
    }

    /// Builder-style selection setter
    pub fn with_selection(mut self, key: &str, value: impl Into<String>) -> Self {
        self.select(key, value);
        self
    }

    pub fn search(&self) -> &str {
        &self.search
    }

    pub fn set_search(&mut self, query: impl Into<String>) {
        self.search = query.into();
    }

    /// Current selection for a filter key (`"all"` when unset)
    pub fn selection(&self, key: &str) -> &str {
        self.selections.get(key).map(String::as_str).unwrap_or(ALL)
    }

    /// Select a value for a filter key; `"all"` or empty clears it
    pub fn select(&mut self, key: &str, value: impl Into<String>) {
        let value = value.into();
        if value.is_empty() || value == ALL {
            self.selections.remove(key);
        } else {
            self.selections.insert(key.to_string(), value);
        }
    }

    /// Reset search and every selection
    pub fn clear(&mut self) {
        self.search.clear();
        self.selections.clear();
    }

    /// Whether any narrowing is active
    pub fn is_active(&self) -> bool {
        !self.search.trim().is_empty() || !self.selections.is_empty()
    }

    /// Whether a record passes every selection and the search
    pub fn matches(&self, profile: &ResourceProfile, record: &Record) -> bool {
        self.matches_selections(profile, record) && self.matches_search(profile, record)
    }

    fn matches_selections(&self, profile: &ResourceProfile, record: &Record) -> bool {
        self.selections.iter().all(|(key, wanted)| {
            let mode = profile
                .filter(key)
                .map(|f| f.mode)
                .unwrap_or(MatchMode::Exact);
            match profile.filter_value(record, key) {
                Some(actual) => match mode {
                    MatchMode::Exact => actual == *wanted,
                    MatchMode::CaseInsensitive => actual.to_lowercase() == wanted.to_lowercase(),
                },
                None => false,
            }
        })
    }

    fn matches_search(&self, profile: &ResourceProfile, record: &Record) -> bool {
        let needle = self.search.trim().to_lowercase();
        if needle.is_empty() {
            return true;
        }
        profile.searchable_fields.iter().any(|field| {
            record
                .text(field)
                .is_some_and(|text| text.to_lowercase().contains(&needle))
        })
    }

    /// Visible subset of `items`, in original order
    pub fn apply<'a>(&self, profile: &ResourceProfile, items: &'a [Record]) -> Vec<&'a Record> {
        items.iter().filter(|r| self.matches(profile, r)).collect()
    }
}

/// Distinct selectable values of a filter over the loaded page
///
/// The list starts with the `"all"` sentinel followed by the sorted
/// distinct non-empty values. It is a snapshot of `items` only. Filters
/// compared case-insensitively list each value once, spelled as it first
/// appears.
pub fn derive_options(profile: &ResourceProfile, items: &[Record], key: &str) -> Vec<String> {
    let case_insensitive = profile
        .filter(key)
        .is_some_and(|f| f.mode == MatchMode::CaseInsensitive);
    let mut distinct: BTreeMap<String, String> = BTreeMap::new();
    for value in items
        .iter()
        .filter_map(|record| profile.filter_value(record, key))
        .filter(|value| !value.trim().is_empty())
    {
        let folded = if case_insensitive {
            value.to_lowercase()
        } else {
            value.clone()
        };
        distinct.entry(folded).or_insert(value);
    }
    std::iter::once(ALL.to_string())
        .chain(distinct.into_values())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::list::normalize::{FilterField, StatusRule};
    use proptest::prelude::*;

    fn crew_profile() -> ResourceProfile {
        ResourceProfile::new("crew")
            .with_search(&["full_name", "base_airport", "role", "qualifications"])
            .with_filter(FilterField::new("role", "Role", MatchMode::CaseInsensitive))
            .with_filter(FilterField::new("status", "Status", MatchMode::Exact))
            .with_status("status", StatusRule::active_inactive())
    }

    fn crew(name: &str, role: &str, status: &str, base: &str) -> Record {
        Record::new()
            .with("full_name", name)
            .with("role", role)
            .with("status", status)
            .with("base_airport", base)
    }

    fn roster() -> Vec<Record> {
        vec![
            crew("Asha Patel", "Captain", "active", "BLR"),
            crew("Ravi Singh", "First Officer", "Available", "DEL"),
            crew("Meera Nair", "captain", "inactive", "BLR"),
            crew("John Dsouza", "Cabin Crew", "pending", "BOM"),
        ]
    }

    #[test]
    fn test_empty_filter_shows_everything() {
        let items = roster();
        assert_eq!(ClientFilter::new().apply(&crew_profile(), &items).len(), 4);
    }

    #[test]
    fn test_search_is_case_insensitive_substring() {
        let items = roster();
        let filter = ClientFilter::new().with_search("blr");
        let names: Vec<_> = filter
            .apply(&crew_profile(), &items)
            .iter()
            .filter_map(|r| r.text("full_name"))
            .collect();
        assert_eq!(names, vec!["Asha Patel", "Meera Nair"]);
    }

    #[test]
    fn test_role_filter_ignores_case() {
        let items = roster();
        let filter = ClientFilter::new().with_selection("role", "CAPTAIN");
        assert_eq!(filter.apply(&crew_profile(), &items).len(), 2);
    }

    #[test]
    fn test_status_filter_uses_normalized_tag() {
        let items = roster();
        let filter = ClientFilter::new().with_selection("status", "active");
        assert_eq!(filter.apply(&crew_profile(), &items).len(), 2);
    }

    #[test]
    fn test_selection_and_search_are_conjunctive() {
        let items = roster();
        let filter = ClientFilter::new()
            .with_selection("role", "captain")
            .with_search("meera");
        let visible = filter.apply(&crew_profile(), &items);
        assert_eq!(visible.len(), 1);
        assert_eq!(visible[0].text("full_name").as_deref(), Some("Meera Nair"));
    }

    #[test]
    fn test_selecting_all_clears() {
        let mut filter = ClientFilter::new().with_selection("role", "captain");
        filter.select("role", ALL);
        assert!(!filter.is_active());
        assert_eq!(filter.selection("role"), ALL);
    }

    #[test]
    fn test_derive_options_from_loaded_page() {
        let items = roster();
        let profile = crew_profile();
        assert_eq!(
            derive_options(&profile, &items, "status"),
            vec!["all", "active", "inactive"]
        );
        assert_eq!(
            derive_options(&profile, &items, "role"),
            vec!["all", "Cabin Crew", "Captain", "First Officer"]
        );
        assert_eq!(derive_options(&profile, &[], "role"), vec!["all"]);
    }

    #[test]
    fn test_exact_filters_keep_case_variants() {
        let profile = ResourceProfile::new("rosters")
            .with_filter(FilterField::new("base_airport", "Base", MatchMode::Exact));
        let items = vec![
            Record::new().with("base_airport", "blr"),
            Record::new().with("base_airport", "BLR"),
        ];
        assert_eq!(
            derive_options(&profile, &items, "base_airport"),
            vec!["all", "BLR", "blr"]
        );
    }

    proptest! {
        #[test]
        fn prop_filter_is_conjunction_of_parts(
            search in "[a-z]{0,3}",
            role in prop::sample::select(vec!["all", "captain", "cabin crew"]),
            status in prop::sample::select(vec!["all", "active", "inactive"]),
        ) {
            let items = roster();
            let profile = crew_profile();
            let combined = ClientFilter::new()
                .with_search(search.clone())
                .with_selection("role", role)
                .with_selection("status", status);
            let search_only = ClientFilter::new().with_search(search);
            let selection_only = ClientFilter::new()
                .with_selection("role", role)
                .with_selection("status", status);

            for record in &items {
                prop_assert_eq!(
                    combined.matches(&profile, record),
                    search_only.matches(&profile, record) && selection_only.matches(&profile, record)
                );
            }
        }
    }
}
