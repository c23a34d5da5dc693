//! Crew availability at an airport on a date
//!
//! Lookups go through `GET /airport/{code}/crew/availability/{date}`; the
//! custom payload form posts an arbitrary JSON object instead. Both answer
//! with counts plus an `available_crew` list, which the list view shows as
//! a single unpaginated page with the counts kept as its summary.

use chrono::NaiveDate;
use serde_json::Value;

use crate::error::{DashboardError, Result};
use crate::list::{FilterField, MatchMode, QueryState, ResourceProfile};
use crate::source::ApiRequest;
use crate::types::{Record, ResourcePage};

/// Navigation keys holding the lookup
pub const FILTER_KEYS: &[&str] = &["airport", "date"];

/// Key of the crew list in the response body
pub const ITEMS_KEY: &str = "available_crew";

/// Airport looked up when navigation names none
pub const DEFAULT_AIRPORT: &str = "BLR";

/// Local date in the format the lookup path expects
pub fn today() -> String {
    chrono::Local::now().date_naive().format("%Y-%m-%d").to_string()
}

pub fn profile() -> ResourceProfile {
    ResourceProfile::new("availability")
        .with_alternate_id("crew_id")
        .with_search(&["full_name", "name", "role"])
        .with_filter(FilterField::new("role", "Role", MatchMode::CaseInsensitive))
}

pub fn page_request(query: &QueryState) -> Result<ApiRequest> {
    let airport = query.filter("airport").map(str::trim).unwrap_or_default();
    let date = query.filter("date").map(str::trim).unwrap_or_default();
    if airport.is_empty() || date.is_empty() {
        return Err(DashboardError::Validation(
            "airport and date required".to_string(),
        ));
    }
    Ok(ApiRequest::get(format!(
        "/airport/{}/crew/availability/{}",
        airport.to_uppercase(),
        date
    )))
}

pub fn payload_request(payload: Value) -> ApiRequest {
    ApiRequest::post("/crew/availability", payload)
}

/// Check the lookup form before it is written to navigation
pub fn validate_lookup(airport: &str, date: &str) -> Result<()> {
    let airport = airport.trim();
    if airport.is_empty() || date.trim().is_empty() {
        return Err(DashboardError::Validation(
            "airport and date required".to_string(),
        ));
    }
    if airport.len() != 3 || !airport.chars().all(|c| c.is_ascii_alphabetic()) {
        return Err(DashboardError::Validation(format!(
            "Airport code must be three letters, got {airport:?}"
        )));
    }
    NaiveDate::parse_from_str(date.trim(), "%Y-%m-%d")
        .map_err(|_| DashboardError::Validation("Date must be YYYY-MM-DD".to_string()))?;
    Ok(())
}

/// Parse the custom payload editor
pub fn parse_payload(text: &str) -> Result<Value> {
    let value: Value = serde_json::from_str(text).map_err(|e| {
        DashboardError::Validation(format!("Invalid JSON in custom payload: {}", e))
    })?;
    if !value.is_object() {
        return Err(DashboardError::Validation(
            "Invalid JSON in custom payload: expected an object".to_string(),
        ));
    }
    Ok(value)
}

/// Counts reported alongside the available crew
#[derive(Debug, Clone, Default, PartialEq)]
pub struct AvailabilityReport {
    pub airport: Option<String>,
    pub date: Option<String>,
    pub based_crew_count: Option<i64>,
    pub arriving_crew_count: Option<i64>,
    pub available_crew_count: i64,
}

impl AvailabilityReport {
    pub fn from_page(page: &ResourcePage) -> Self {
        let summary = page.summary.clone().unwrap_or_default();
        Self {
            airport: summary.text("airport"),
            date: summary.text("date"),
            based_crew_count: summary.integer("based_crew_count"),
            arriving_crew_count: summary.integer("arriving_crew_count"),
            available_crew_count: summary
                .integer("available_crew_count")
                .unwrap_or(page.len() as i64),
        }
    }
}

/// Standby type of an available crew member, if on standby
pub fn standby_type(record: &Record) -> Option<String> {
    detail(record, "standby", "standby_type")
}

/// Leave type of an available crew member, if on leave
pub fn leave_type(record: &Record) -> Option<String> {
    detail(record, "on_leave", "leave_type")
}

fn detail(record: &Record, section: &str, key: &str) -> Option<String> {
    record
        .get("availability_details")?
        .get(section)?
        .get(key)?
        .as_str()
        .map(str::to_string)
}
