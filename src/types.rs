//! Core data types for Crew Deck
//!
//! This module contains the data structures shared by every list view:
//!
//! - [`Record`] - An opaque field map as returned by the roster API
//! - [`RecordId`] - Stable identifier resolved from a record's key fields
//! - [`ResourcePage`] - One page of records plus optional pagination metadata
//!
//! # Response Shapes
//!
//! The API is not consistent about how it wraps collections. Some endpoints
//! return `{ "data": [...], "meta": { "total": N } }`, others return the
//! array directly. [`ResourcePage::from_body`] accepts both.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Identifier of a record inside one list view
pub type RecordId = String;

/// A single resource record
///
/// Records are kept as raw JSON objects because the API returns
/// heterogeneous shapes across endpoints and versions. Typed access goes
/// through [`Record::text`] and friends.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Record(Map<String, Value>);

impl Record {
    /// Create an empty record
    pub fn new() -> Self {
        Self::default()
    }

    /// Wrap an existing JSON object
    pub fn from_map(map: Map<String, Value>) -> Self {
        Self(map)
    }

    /// Wrap a JSON value if it is an object
    pub fn from_value(value: Value) -> Option<Self> {
        match value {
            Value::Object(map) => Some(Self(map)),
            _ => None,
        }
    }

    /// Builder-style field setter
    pub fn with(mut self, field: &str, value: impl Into<Value>) -> Self {
        self.set(field, value);
        self
    }

    /// Get the raw value of a field
    pub fn get(&self, field: &str) -> Option<&Value> {
        self.0.get(field)
    }

    /// Set a field, replacing any previous value
    pub fn set(&mut self, field: &str, value: impl Into<Value>) {
        self.0.insert(field.to_string(), value.into());
    }

    /// Remove a field
    pub fn remove(&mut self, field: &str) -> Option<Value> {
        self.0.remove(field)
    }

    /// Render a field as display text
    ///
    /// Strings are returned as-is, numbers and booleans are formatted,
    /// arrays are joined with `", "`. `null`, objects and missing fields
    /// yield `None`.
    pub fn text(&self, field: &str) -> Option<String> {
        value_text(self.0.get(field)?)
    }

    /// Render the first present field out of a list of aliases
    pub fn text_any(&self, fields: &[&str]) -> Option<String> {
        fields.iter().find_map(|field| self.text(field))
    }

    /// Read a field as an integer, accepting numeric strings
    pub fn integer(&self, field: &str) -> Option<i64> {
        match self.0.get(field)? {
            Value::Number(n) => n.as_i64(),
            Value::String(s) => s.trim().parse().ok(),
            _ => None,
        }
    }

    /// Resolve the record's identifier from an ordered list of key fields
    pub fn id(&self, keys: &[&str]) -> Option<RecordId> {
        self.text_any(keys).filter(|id| !id.is_empty())
    }

    /// Overwrite fields with those present in `other`
    pub fn merge(&mut self, other: &Record) {
        for (key, value) in &other.0 {
            self.0.insert(key.clone(), value.clone());
        }
    }

    /// Access the underlying JSON object
    pub fn as_map(&self) -> &Map<String, Value> {
        &self.0
    }

    /// Convert back into a JSON value
    pub fn into_value(self) -> Value {
        Value::Object(self.0)
    }
}

fn value_text(value: &Value) -> Option<String> {
    match value {
        Value::Null | Value::Object(_) => None,
        Value::String(s) => Some(s.clone()),
        Value::Bool(b) => Some(b.to_string()),
        Value::Number(n) => Some(n.to_string()),
        Value::Array(items) => Some(
            items
                .iter()
                .filter_map(value_text)
                .collect::<Vec<_>>()
                .join(", "),
        ),
    }
}

/// One page of records produced by a successful fetch
///
/// A fresh page replaces the previous one entirely. The only exception is
/// fetch-all mode, where the concatenated result is wrapped into a single
/// page covering everything.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct ResourcePage {
    /// Records in server order
    pub items: Vec<Record>,
    /// Total number of records on the server, when reported
    pub total_count: Option<u64>,
    /// 1-based page number
    pub page_number: u32,
    /// Requested page size (always >= items.len())
    pub page_size: u32,
    /// Extra top-level fields of the response (e.g. availability counts)
    pub summary: Option<Record>,
    /// The page holds everything the server returned in one response
    pub unpaginated: bool,
}

impl ResourcePage {
    /// Create a page, enforcing `items.len() <= page_size`
    pub fn new(items: Vec<Record>, page_number: u32, page_size: u32) -> Self {
        let page_size = page_size.max(1);
        let mut items = items;
        if items.len() > page_size as usize {
            tracing::warn!(
                "Server returned {} items for a page of {}, truncating",
                items.len(),
                page_size
            );
            items.truncate(page_size as usize);
        }
        Self {
            items,
            total_count: None,
            page_number: page_number.max(1),
            page_size,
            summary: None,
            unpaginated: false,
        }
    }

    /// Wrap an unpaginated result (every item the server sent)
    pub fn unpaginated(items: Vec<Record>) -> Self {
        let size = u32::try_from(items.len()).unwrap_or(u32::MAX);
        let mut page = Self::new(items, 1, size);
        page.unpaginated = true;
        page
    }

    /// Attach a server-reported total
    pub fn with_total(mut self, total: Option<u64>) -> Self {
        self.total_count = total;
        self
    }

    /// Interpret a response body
    ///
    /// Accepts an object carrying the array under `items_key` (normally
    /// `"data"`) with an optional `meta.total`, or a bare top-level array.
    /// Any other shape yields an empty page. When `limit` is `None` the
    /// endpoint is treated as unpaginated.
    pub fn from_body(body: Value, items_key: &str, page: u32, limit: Option<u32>) -> Self {
        let (raw_items, total, summary) = match body {
            Value::Array(items) => (items, None, None),
            Value::Object(mut map) => {
                let items = match map.remove(items_key) {
                    Some(Value::Array(items)) => items,
                    _ => {
                        tracing::debug!("Response has no '{}' array, treating as empty", items_key);
                        Vec::new()
                    }
                };
                let total = map.remove("meta").and_then(|meta| meta_total(&meta));
                let summary = (!map.is_empty()).then(|| Record::from_map(map));
                (items, total, summary)
            }
            _ => (Vec::new(), None, None),
        };

        let items: Vec<Record> = raw_items.into_iter().filter_map(Record::from_value).collect();
        let mut page = match limit {
            Some(limit) => Self::new(items, page, limit),
            None => Self::unpaginated(items),
        };
        page.total_count = total;
        page.summary = summary;
        page
    }

    /// Number of records on this page
    pub fn len(&self) -> usize {
        self.items.len()
    }

    /// Whether the page holds no records
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}

fn meta_total(meta: &Value) -> Option<u64> {
    match meta.get("total")? {
        Value::Number(n) => n.as_u64(),
        Value::String(s) => s.trim().parse().ok(),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_record_text_rendering() {
        let record = Record::from_value(json!({
            "full_name": "Asha Patel",
            "id": 7,
            "qualifications": ["A320", "B737"],
            "status": null,
            "active": true
        }))
        .unwrap();

        assert_eq!(record.text("full_name").as_deref(), Some("Asha Patel"));
        assert_eq!(record.text("id").as_deref(), Some("7"));
        assert_eq!(record.text("qualifications").as_deref(), Some("A320, B737"));
        assert_eq!(record.text("status"), None);
        assert_eq!(record.text("active").as_deref(), Some("true"));
        assert_eq!(record.text("missing"), None);
    }

    #[test]
    fn test_record_id_fallback_keys() {
        let keys = ["id", "_id", "crew_code"];
        let with_id = Record::new().with("id", 3).with("crew_code", "C003");
        assert_eq!(with_id.id(&keys).as_deref(), Some("3"));

        let code_only = Record::new().with("crew_code", "C004");
        assert_eq!(code_only.id(&keys).as_deref(), Some("C004"));

        let empty = Record::new().with("id", "");
        assert_eq!(empty.id(&["id"]), None);
    }

    #[test]
    fn test_from_body_wrapped_and_bare_shapes() {
        let wrapped = json!({ "data": [{ "id": 1 }, { "id": 2 }], "meta": { "total": 40 } });
        let bare = json!([{ "id": 1 }, { "id": 2 }]);

        let a = ResourcePage::from_body(wrapped, "data", 1, Some(50));
        let b = ResourcePage::from_body(bare, "data", 1, Some(50));

        assert_eq!(a.items, b.items);
        assert_eq!(a.total_count, Some(40));
        assert_eq!(b.total_count, None);
    }

    #[test]
    fn test_from_body_string_total_and_summary() {
        let body = json!({
            "available_crew": [{ "crew_id": 1 }],
            "based_crew_count": 4,
            "meta": { "total": "12" }
        });
        let page = ResourcePage::from_body(body, "available_crew", 1, None);

        assert_eq!(page.len(), 1);
        assert_eq!(page.total_count, Some(12));
        let summary = page.summary.unwrap();
        assert_eq!(summary.integer("based_crew_count"), Some(4));
    }

    #[test]
    fn test_from_body_unexpected_shape_is_empty() {
        let page = ResourcePage::from_body(json!("oops"), "data", 2, Some(10));
        assert!(page.is_empty());
        assert_eq!(page.page_number, 2);
    }

    #[test]
    fn test_page_never_exceeds_page_size() {
        let items = (0..5).map(|i| Record::new().with("id", i)).collect();
        let page = ResourcePage::new(items, 1, 3);
        assert_eq!(page.len(), 3);
        assert_eq!(page.page_size, 3);
    }

    #[test]
    fn test_merge_overwrites_fields() {
        let mut record = Record::new().with("id", 1).with("status", "pending");
        record.merge(&Record::new().with("status", "approved").with("decided_by", "ops"));
        assert_eq!(record.text("status").as_deref(), Some("approved"));
        assert_eq!(record.text("decided_by").as_deref(), Some("ops"));
    }
}
