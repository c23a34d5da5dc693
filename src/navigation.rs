//! Navigation state store
//!
//! The navigation store is the addressable, history-aware parameter state
//! of a view (the desktop equivalent of a URL query string). List views
//! treat it as the single source of truth for `page`, `limit` and filter
//! values: every read derives from it and every write goes through it
//! before a fetch is triggered.
//!
//! [`HistoryNavigationStore`] keeps a linear history of parameter sets with
//! back/forward traversal, so reproducing a view after navigating away (or
//! after a restart, via the persisted query string) yields the same fetch.

use std::collections::BTreeMap;

use reqwest::Url;

/// A full set of navigation parameters
pub type NavigationParams = BTreeMap<String, String>;

/// Options for [`NavigationStore::set`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct SetOptions {
    /// Overwrite the current history entry instead of pushing a new one
    pub replace_history_entry: bool,
}

impl SetOptions {
    /// Push a new history entry
    pub fn push() -> Self {
        Self {
            replace_history_entry: false,
        }
    }

    /// Replace the current history entry
    pub fn replace() -> Self {
        Self {
            replace_history_entry: true,
        }
    }
}

/// Addressable parameter state shared between a view and its history
pub trait NavigationStore: Send {
    /// Read a single parameter
    fn get(&self, key: &str) -> Option<String>;

    /// Replace the full parameter set
    fn set(&mut self, params: NavigationParams, options: SetOptions);

    /// Snapshot of all current parameters
    fn params(&self) -> NavigationParams;

    /// Step back in history. Returns `false` when already at the oldest entry.
    fn back(&mut self) -> bool {
        false
    }

    /// Step forward in history. Returns `false` when already at the newest entry.
    fn forward(&mut self) -> bool {
        false
    }

    /// Whether [`NavigationStore::back`] would move
    fn can_go_back(&self) -> bool {
        false
    }

    /// Whether [`NavigationStore::forward`] would move
    fn can_go_forward(&self) -> bool {
        false
    }
}

/// In-memory navigation store with linear back/forward history
#[derive(Debug, Clone)]
pub struct HistoryNavigationStore {
    entries: Vec<NavigationParams>,
    cursor: usize,
}

impl Default for HistoryNavigationStore {
    fn default() -> Self {
        Self {
            entries: vec![NavigationParams::new()],
            cursor: 0,
        }
    }
}

impl HistoryNavigationStore {
    /// Create an empty store
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a store whose first entry is parsed from a query string
    ///
    /// Accepts either `page=2&limit=25` or `?page=2&limit=25`.
    pub fn from_query_string(query: &str) -> Self {
        Self {
            entries: vec![parse_query_string(query)],
            cursor: 0,
        }
    }

    /// Render the current entry as a query string (without the leading `?`)
    pub fn query_string(&self) -> String {
        to_query_string(self.current())
    }

    /// Number of entries in the history
    pub fn history_len(&self) -> usize {
        self.entries.len()
    }

    fn current(&self) -> &NavigationParams {
        &self.entries[self.cursor]
    }
}

impl NavigationStore for HistoryNavigationStore {
    fn get(&self, key: &str) -> Option<String> {
        self.current().get(key).cloned()
    }

    fn set(&mut self, params: NavigationParams, options: SetOptions) {
        if options.replace_history_entry {
            self.entries[self.cursor] = params;
            return;
        }
        if *self.current() == params {
            return;
        }
        self.entries.truncate(self.cursor + 1);
        self.entries.push(params);
        self.cursor = self.entries.len() - 1;
    }

    fn params(&self) -> NavigationParams {
        self.current().clone()
    }

    fn back(&mut self) -> bool {
        if self.cursor == 0 {
            return false;
        }
        self.cursor -= 1;
        true
    }

    fn forward(&mut self) -> bool {
        if self.cursor + 1 >= self.entries.len() {
            return false;
        }
        self.cursor += 1;
        true
    }

    fn can_go_back(&self) -> bool {
        self.cursor > 0
    }

    fn can_go_forward(&self) -> bool {
        self.cursor + 1 < self.entries.len()
    }
}

/// Parse a query string into navigation parameters
///
/// Later duplicates win. Percent-encoding is decoded.
pub fn parse_query_string(query: &str) -> NavigationParams {
    let query = query.trim().trim_start_matches('?');
    Url::parse(&format!("{BASE_URL}?{query}"))
        .map(|url| {
            url.query_pairs()
                .map(|(k, v)| (k.into_owned(), v.into_owned()))
                .filter(|(k, _)| !k.is_empty())
                .collect()
        })
        .unwrap_or_default()
}

/// Render navigation parameters as a query string
pub fn to_query_string(params: &NavigationParams) -> String {
    if params.is_empty() {
        return String::new();
    }
    Url::parse(BASE_URL)
        .map(|mut url| {
            url.query_pairs_mut().extend_pairs(params.iter());
            url.query().unwrap_or_default().to_string()
        })
        .unwrap_or_default()
}

const BASE_URL: &str = "crewdeck://view/";
