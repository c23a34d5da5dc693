//! Crew members

use crate::error::{Result, ResultExt};
use crate::list::{FilterField, MatchMode, QueryState, ResourceProfile, StatusRule};
use crate::source::{ApiRequest, RosterApi};
use crate::types::Record;

pub const PATH: &str = "/crew-members/";

pub fn profile() -> ResourceProfile {
    ResourceProfile::new("crew")
        .with_alternate_id("crew_code")
        .with_search(&[
            "full_name",
            "name",
            "base_airport",
            "base",
            "role",
            "qualifications",
            "crew_code",
        ])
        .with_filter(FilterField::new("role", "Role", MatchMode::CaseInsensitive))
        .with_filter(FilterField::new("status", "Status", MatchMode::Exact))
        .with_status("status", StatusRule::active_inactive())
}

pub fn page_request(query: &QueryState) -> ApiRequest {
    ApiRequest::get(PATH).with_params(query.api_params())
}

/// Display name, falling back through the aliases the API has used
pub fn display_name(record: &Record) -> String {
    record
        .text_any(&["full_name", "name", "crew_code"])
        .unwrap_or_else(|| "Unnamed".to_string())
}

/// Base airport, falling back to `base`
pub fn base_airport(record: &Record) -> Option<String> {
    record.text_any(&["base_airport", "base"])
}

/// Local optimistic flip of the status field
pub fn toggled(record: &Record) -> Record {
    let next = if profile().status_tag(record) == "active" {
        "inactive"
    } else {
        "active"
    };
    record.clone().with("status", next)
}

/// Flip a crew member's active status on the server
///
/// Returns the updated record when the server sends one back.
pub async fn toggle_status(api: &dyn RosterApi, id: &str) -> Result<Option<Record>> {
    let body = api
        .send(ApiRequest::patch(format!("/crew-members/{id}/toggle-status")))
        .await
        .with_context(|| format!("Failed to toggle crew {id}"))?;
    Ok(Record::from_value(body))
}
