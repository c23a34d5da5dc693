//! Roster assignments
//!
//! The roster list is unpaginated: the service returns every assignment,
//! newest first, either wrapped in `{data: [...]}` or as a bare array.

use serde::{Deserialize, Serialize};
use serde_json::json;

use crate::error::{DashboardError, Result, ResultExt};
use crate::list::{FilterField, MatchMode, ResourceProfile, StatusRule};
use crate::source::{ApiRequest, RosterApi};
use crate::types::Record;

pub const PATH: &str = "/roster/rosters";

pub fn profile() -> ResourceProfile {
    ResourceProfile::new("rosters")
        .with_search(&["crew_name", "role_on_flight", "flight_id", "roster_name"])
        .with_filter(
            FilterField::new("base_airport", "Base", MatchMode::CaseInsensitive)
                .with_fields(&["base_airport", "base"]),
        )
        .with_filter(FilterField::new("crew_id", "Crew", MatchMode::Exact))
        .with_filter(FilterField::new("status", "Status", MatchMode::Exact))
        .with_status(
            "status",
            StatusRule::new("pending").with_tag("assigned", &["assigned", "active"]),
        )
}

pub fn page_request() -> ApiRequest {
    ApiRequest::get(PATH)
}

/// Body of an assign-roster call
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AssignRequest {
    pub flight_id: String,
    pub crew_id: String,
    pub role_on_flight: String,
}

impl AssignRequest {
    /// Validate the assign form
    pub fn new(flight_id: &str, crew_id: &str, role_on_flight: &str) -> Result<Self> {
        let flight_id = flight_id.trim();
        let crew_id = crew_id.trim();
        if flight_id.is_empty() || crew_id.is_empty() {
            return Err(DashboardError::Validation(
                "Flight and crew member are required".to_string(),
            ));
        }
        let role = role_on_flight.trim();
        Ok(Self {
            flight_id: flight_id.to_string(),
            crew_id: crew_id.to_string(),
            role_on_flight: if role.is_empty() { "Crew" } else { role }.to_string(),
        })
    }
}

/// Assign a crew member to a flight
pub async fn assign(api: &dyn RosterApi, request: &AssignRequest) -> Result<String> {
    let body = serde_json::to_value(request)
        .map_err(|e| DashboardError::Decode(format!("Failed to encode assignment: {}", e)))?;
    let response = api
        .send(ApiRequest::post("/rosters/assign", body))
        .await
        .context("Failed to assign crew")?;
    Ok(response
        .get("message")
        .and_then(|m| m.as_str())
        .map(str::to_string)
        .unwrap_or_else(|| format!("Crew {} assigned to flight {}", request.crew_id, request.flight_id)))
}

/// Result of an automatic roster creation
#[derive(Debug, Clone, PartialEq)]
pub struct CreatedRoster {
    pub roster_name: String,
    pub base_airport: String,
    pub assigned_crew: Vec<Record>,
}

impl CreatedRoster {
    pub fn summary(&self) -> String {
        format!(
            "Roster {} created with {} crew from {}",
            self.roster_name,
            self.assigned_crew.len(),
            self.base_airport
        )
    }
}

/// Ask the service to build a roster for a flight from crew at `base`
pub async fn create_roster(api: &dyn RosterApi, base: &str, flight_id: &str) -> Result<CreatedRoster> {
    let base = base.trim().to_uppercase();
    if base.is_empty() || flight_id.trim().is_empty() {
        return Err(DashboardError::Validation(
            "Base airport and flight are required".to_string(),
        ));
    }
    let flight_id = flight_id.trim();
    let flight: serde_json::Value = flight_id
        .parse::<i64>()
        .map(serde_json::Value::from)
        .unwrap_or_else(|_| json!(flight_id));

    let response = api
        .send(ApiRequest::post(
            format!("/roster/create-roster/{base}"),
            json!({ "flight_id": flight }),
        ))
        .await
        .with_context(|| format!("Failed to create roster at {base}"))?;

    let assigned_crew = response
        .get("assigned_crew")
        .and_then(|v| v.as_array())
        .map(|crew| crew.iter().cloned().filter_map(Record::from_value).collect())
        .unwrap_or_default();
    Ok(CreatedRoster {
        roster_name: response
            .get("roster_name")
            .and_then(|v| v.as_str())
            .unwrap_or_default()
            .to_string(),
        base_airport: response
            .get("base_airport")
            .and_then(|v| v.as_str())
            .unwrap_or(&base)
            .to_string(),
        assigned_crew,
    })
}
