//! Query state and its mapping to navigation parameters

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::navigation::{NavigationParams, NavigationStore};

pub const PAGE_KEY: &str = "page";
pub const LIMIT_KEY: &str = "limit";

/// Page, page size and server-side filter values of one list view
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QueryState {
    pub page: u32,
    pub limit: u32,
    #[serde(default)]
    pub filters: BTreeMap<String, String>,
}

impl QueryState {
    pub fn new(page: u32, limit: u32) -> Self {
        Self {
            page: page.max(1),
            limit: limit.max(1),
            filters: BTreeMap::new(),
        }
    }

    /// Builder-style filter setter
    pub fn with_filter(mut self, key: &str, value: impl Into<String>) -> Self {
        self.set_filter(key, value);
        self
    }

    /// Set a filter value; empty values remove the filter
    pub fn set_filter(&mut self, key: &str, value: impl Into<String>) {
        let value = value.into();
        if value.trim().is_empty() {
            self.filters.remove(key);
        } else {
            self.filters.insert(key.to_string(), value);
        }
    }

    /// Replace every filter; empty values are dropped
    pub fn with_filters(mut self, filters: BTreeMap<String, String>) -> Self {
        self.filters.clear();
        for (key, value) in filters {
            self.set_filter(&key, value);
        }
        self
    }

    pub fn filter(&self, key: &str) -> Option<&str> {
        self.filters.get(key).map(String::as_str)
    }

    /// Read the query from a navigation store
    ///
    /// Missing or malformed `page`/`limit` fall back to the defaults; only
    /// filter keys the view recognizes are picked up, and recognized keys
    /// absent from the store take their default value if they have one.
    pub fn from_navigation(store: &dyn NavigationStore, defaults: &QueryDefaults) -> Self {
        let mut query = defaults.initial();
        if let Some(page) = store
            .get(PAGE_KEY)
            .and_then(|v| v.trim().parse::<u32>().ok())
            .filter(|p| *p >= 1)
        {
            query.page = page;
        }
        if let Some(limit) = store
            .get(LIMIT_KEY)
            .and_then(|v| v.trim().parse::<u32>().ok())
            .filter(|l| *l >= 1)
        {
            query.limit = limit;
        }
        for key in &defaults.filter_keys {
            if let Some(value) = store.get(key) {
                query.set_filter(key, value);
            }
        }
        query
    }

    /// Navigation parameters for this query
    ///
    /// Default values are omitted so the address stays short.
    pub fn to_navigation(&self, defaults: &QueryDefaults) -> NavigationParams {
        let mut params = NavigationParams::new();
        if self.page != 1 {
            params.insert(PAGE_KEY.to_string(), self.page.to_string());
        }
        if self.limit != defaults.limit {
            params.insert(LIMIT_KEY.to_string(), self.limit.to_string());
        }
        for (key, value) in &self.filters {
            if defaults.filter_default(key) != Some(value.as_str()) {
                params.insert(key.clone(), value.clone());
            }
        }
        params
    }

    /// Request parameters sent to the remote data source
    pub fn api_params(&self) -> Vec<(String, String)> {
        let mut params = vec![
            (PAGE_KEY.to_string(), self.page.to_string()),
            (LIMIT_KEY.to_string(), self.limit.to_string()),
        ];
        params.extend(self.filters.iter().map(|(k, v)| (k.clone(), v.clone())));
        params
    }
}

/// Per-view defaults used when navigation state is missing values
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QueryDefaults {
    pub limit: u32,
    /// Navigation keys read as server-side filters
    pub filter_keys: Vec<String>,
    /// Values of filter keys the view cannot fetch without
    pub filter_defaults: BTreeMap<String, String>,
}

impl QueryDefaults {
    pub fn new(limit: u32) -> Self {
        Self {
            limit: limit.max(1),
            filter_keys: Vec::new(),
            filter_defaults: BTreeMap::new(),
        }
    }

    pub fn with_filter_keys(mut self, keys: &[&str]) -> Self {
        self.filter_keys = keys.iter().map(|k| k.to_string()).collect();
        self
    }

    /// Value used for `key` while navigation holds none
    ///
    /// The key is registered as a filter key if it was not one yet.
    pub fn with_filter_default(mut self, key: &str, value: impl Into<String>) -> Self {
        if !self.accepts_filter(key) {
            self.filter_keys.push(key.to_string());
        }
        self.filter_defaults.insert(key.to_string(), value.into());
        self
    }

    pub fn accepts_filter(&self, key: &str) -> bool {
        self.filter_keys.iter().any(|k| k == key)
    }

    pub fn filter_default(&self, key: &str) -> Option<&str> {
        self.filter_defaults.get(key).map(String::as_str)
    }

    /// The query shown before any navigation happened
    pub fn initial(&self) -> QueryState {
        QueryState::new(1, self.limit).with_filters(self.filter_defaults.clone())
    }

    /// Bring a requested query in line with what navigation can hold
    ///
    /// Unknown filter keys are dropped and cleared keys fall back to their
    /// default, so the result reads back unchanged from navigation.
    pub fn normalize(&self, query: QueryState) -> QueryState {
        let mut normalized = QueryState::new(query.page, query.limit);
        for (key, value) in query.filters {
            if self.accepts_filter(&key) {
                normalized.set_filter(&key, value);
            } else {
                tracing::warn!("Ignoring unknown filter '{}' = '{}'", key, value);
            }
        }
        for (key, value) in &self.filter_defaults {
            if !normalized.filters.contains_key(key) {
                normalized.set_filter(key, value.clone());
            }
        }
        normalized
    }
}

impl Default for QueryDefaults {
    fn default() -> Self {
        Self::new(50)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::navigation::HistoryNavigationStore;

    fn defaults() -> QueryDefaults {
        QueryDefaults::new(50).with_filter_keys(&["date_from", "airline"])
    }

    #[test]
    fn test_defaults_when_store_is_empty() {
        let store = HistoryNavigationStore::new();
        let query = QueryState::from_navigation(&store, &defaults());
        assert_eq!(query, QueryState::new(1, 50));
    }

    #[test]
    fn test_reads_page_limit_and_known_filters() {
        let store = HistoryNavigationStore::from_query_string(
            "page=3&limit=25&airline=AI&unknown=x",
        );
        let query = QueryState::from_navigation(&store, &defaults());
        assert_eq!(query.page, 3);
        assert_eq!(query.limit, 25);
        assert_eq!(query.filter("airline"), Some("AI"));
        assert_eq!(query.filter("unknown"), None);
    }

    #[test]
    fn test_malformed_values_fall_back() {
        let store = HistoryNavigationStore::from_query_string("page=0&limit=abc");
        let query = QueryState::from_navigation(&store, &defaults());
        assert_eq!(query.page, 1);
        assert_eq!(query.limit, 50);
    }

    #[test]
    fn test_navigation_omits_defaults() {
        let query = QueryState::new(1, 50).with_filter("airline", "AI");
        let params = query.to_navigation(&defaults());
        assert_eq!(params.len(), 1);
        assert_eq!(params.get("airline").map(String::as_str), Some("AI"));

        let query = QueryState::new(2, 25);
        let params = query.to_navigation(&defaults());
        assert_eq!(params.get("page").map(String::as_str), Some("2"));
        assert_eq!(params.get("limit").map(String::as_str), Some("25"));
    }

    #[test]
    fn test_empty_filter_value_is_removed() {
        let mut query = QueryState::new(1, 50).with_filter("airline", "AI");
        query.set_filter("airline", "  ");
        assert!(query.filters.is_empty());
    }

    #[test]
    fn test_filter_defaults_fill_missing_keys() {
        let defaults = QueryDefaults::new(50)
            .with_filter_default("airport", "BLR")
            .with_filter_default("date", "2025-03-01");
        let store = HistoryNavigationStore::from_query_string("date=2025-04-02");
        let query = QueryState::from_navigation(&store, &defaults);
        assert_eq!(query.filter("airport"), Some("BLR"));
        assert_eq!(query.filter("date"), Some("2025-04-02"));

        // Default values stay out of the address
        let params = query.to_navigation(&defaults);
        assert_eq!(params.get("airport"), None);
        assert_eq!(params.get("date").map(String::as_str), Some("2025-04-02"));
    }

    #[test]
    fn test_normalize_drops_unknown_and_restores_defaults() {
        let defaults = defaults().with_filter_default("airline", "AI");
        let requested = QueryState::new(2, 25)
            .with_filter("role", "Captain")
            .with_filter("date_from", "2025-01-01");
        let query = defaults.normalize(requested);
        assert_eq!(query.filter("role"), None);
        assert_eq!(query.filter("date_from"), Some("2025-01-01"));
        assert_eq!(query.filter("airline"), Some("AI"));
        assert_eq!((query.page, query.limit), (2, 25));
    }

    #[test]
    fn test_api_params_order() {
        let query = QueryState::new(2, 100).with_filter("date_from", "2025-01-01");
        assert_eq!(
            query.api_params(),
            vec![
                ("page".to_string(), "2".to_string()),
                ("limit".to_string(), "100".to_string()),
                ("date_from".to_string(), "2025-01-01".to_string()),
            ]
        );
    }
}
