//! Field normalization
//!
//! Resource profiles describe how the loosely-typed records of one resource
//! are identified, searched, filtered and mapped onto a small canonical
//! status vocabulary.

use crate::types::{Record, RecordId};

/// Alias rules mapping raw status strings to canonical tags
///
/// The mapping is total: input is trimmed and lowercased, matched against
/// each rule in order, and anything unmatched (including a missing value)
/// maps to `default_tag`.
#[derive(Debug, Clone, PartialEq)]
pub struct StatusRule {
    rules: Vec<(&'static str, Vec<&'static str>)>,
    default_tag: &'static str,
}

impl StatusRule {
    /// Create a rule set with the given fallback tag
    pub fn new(default_tag: &'static str) -> Self {
        Self {
            rules: Vec::new(),
            default_tag,
        }
    }

    /// Add a canonical tag and the raw aliases that map to it
    pub fn with_tag(mut self, tag: &'static str, aliases: &[&'static str]) -> Self {
        self.rules.push((tag, aliases.to_vec()));
        self
    }

    /// `active`/`available`/`1`/`true` are active, everything else inactive
    pub fn active_inactive() -> Self {
        Self::new("inactive").with_tag("active", &["active", "available", "1", "true"])
    }

    /// Normalize a raw status value
    pub fn normalize(&self, raw: Option<&str>) -> &'static str {
        let Some(raw) = raw else {
            return self.default_tag;
        };
        let needle = raw.trim().to_lowercase();
        self.rules
            .iter()
            .find(|(_, aliases)| aliases.iter().any(|alias| *alias == needle))
            .map(|(tag, _)| *tag)
            .unwrap_or(self.default_tag)
    }

    /// Every tag this rule can produce, default last
    pub fn tags(&self) -> Vec<&'static str> {
        let mut tags: Vec<&'static str> = self.rules.iter().map(|(tag, _)| *tag).collect();
        if !tags.contains(&self.default_tag) {
            tags.push(self.default_tag);
        }
        tags
    }

    /// The fallback tag
    pub fn default_tag(&self) -> &'static str {
        self.default_tag
    }
}

/// How a dropdown filter compares values
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MatchMode {
    Exact,
    CaseInsensitive,
}

/// A dropdown filter over one record field
#[derive(Debug, Clone, PartialEq)]
pub struct FilterField {
    /// Key in the filter selection
    pub key: &'static str,
    /// Display label
    pub label: &'static str,
    /// Record fields read for this filter, first present wins
    pub fields: Vec<&'static str>,
    pub mode: MatchMode,
}

impl FilterField {
    pub fn new(key: &'static str, label: &'static str, mode: MatchMode) -> Self {
        Self {
            key,
            label,
            fields: vec![key],
            mode,
        }
    }

    /// Read the filter value from alternate field names
    pub fn with_fields(mut self, fields: &[&'static str]) -> Self {
        self.fields = fields.to_vec();
        self
    }
}

/// Per-resource description used by the generic list controller
#[derive(Debug, Clone)]
pub struct ResourceProfile {
    /// Human-readable resource name ("crew", "flights", ...)
    pub name: &'static str,
    /// Identifier fields, tried in order
    pub id_keys: Vec<&'static str>,
    /// Fields consulted by free-text search
    pub searchable_fields: Vec<&'static str>,
    /// Dropdown filters applied to the loaded page
    pub filters: Vec<FilterField>,
    /// Field holding the record status, if any
    pub status_field: Option<&'static str>,
    pub status_rule: StatusRule,
}

impl ResourceProfile {
    pub fn new(name: &'static str) -> Self {
        Self {
            name,
            id_keys: vec!["id", "_id"],
            searchable_fields: Vec::new(),
            filters: Vec::new(),
            status_field: None,
            status_rule: StatusRule::active_inactive(),
        }
    }

    /// Append an alternate identifier key after `id` and `_id`
    pub fn with_alternate_id(mut self, key: &'static str) -> Self {
        self.id_keys.push(key);
        self
    }

    pub fn with_search(mut self, fields: &[&'static str]) -> Self {
        self.searchable_fields = fields.to_vec();
        self
    }

    pub fn with_filter(mut self, filter: FilterField) -> Self {
        self.filters.push(filter);
        self
    }

    pub fn with_status(mut self, field: &'static str, rule: StatusRule) -> Self {
        self.status_field = Some(field);
        self.status_rule = rule;
        self
    }

    /// Identifier of a record
    pub fn record_id(&self, record: &Record) -> Option<RecordId> {
        record.id(&self.id_keys)
    }

    /// Canonical status tag of a record
    pub fn status_tag(&self, record: &Record) -> &'static str {
        let raw = self.status_field.and_then(|field| record.text(field));
        self.status_rule.normalize(raw.as_deref())
    }

    /// Look up a filter definition by key
    pub fn filter(&self, key: &str) -> Option<&FilterField> {
        self.filters.iter().find(|f| f.key == key)
    }

    /// Value a record exposes for a given filter key
    ///
    /// The status field yields its normalized tag; other fields yield the
    /// raw text of the first present alias.
    pub fn filter_value(&self, record: &Record, key: &str) -> Option<String> {
        if self.status_field == Some(key) {
            return Some(self.status_tag(record).to_string());
        }
        match self.filter(key) {
            Some(filter) => record.text_any(&filter.fields),
            None => record.text(key),
        }
    }
}

/// Two-letter initials for avatar badges
///
/// Uses the first letter of the first and last word, or the first two
/// letters of a single word. Empty names yield `"--"`.
pub fn initials_from(name: &str) -> String {
    let words: Vec<&str> = name.split_whitespace().collect();
    let initials: String = match words.as_slice() {
        [] => return "--".to_string(),
        [single] => single.chars().take(2).collect(),
        [first, .., last] => first.chars().take(1).chain(last.chars().take(1)).collect(),
    };
    initials.to_uppercase()
}
