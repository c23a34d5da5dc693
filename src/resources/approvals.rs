//! Pending approvals

use std::fmt;

use serde_json::json;

use crate::error::{Result, ResultExt};
use crate::list::{FilterField, MatchMode, QueryState, ResourceProfile, StatusRule};
use crate::source::{ApiRequest, RosterApi};
use crate::types::Record;

pub const PATH: &str = "/approvals";

pub fn profile() -> ResourceProfile {
    ResourceProfile::new("approvals")
        .with_search(&["requester", "type", "details"])
        .with_filter(FilterField::new("status", "Status", MatchMode::Exact))
        .with_status(
            "status",
            StatusRule::new("pending")
                .with_tag("approved", &["approved"])
                .with_tag("rejected", &["rejected", "denied"])
                .with_tag("pending", &["pending"]),
        )
}

pub fn page_request(query: &QueryState) -> ApiRequest {
    ApiRequest::get(PATH).with_params(query.api_params())
}

/// A decision on an approval request
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Decision {
    Approve,
    Reject,
}

impl Decision {
    /// Status value sent to and shown for this decision
    pub fn status(&self) -> &'static str {
        match self {
            Decision::Approve => "approved",
            Decision::Reject => "rejected",
        }
    }

    /// Whether the decision is available for a record
    ///
    /// Approving an already approved request (or rejecting a rejected one)
    /// is disabled.
    pub fn allowed_for(&self, record: &Record) -> bool {
        profile().status_tag(record) != self.status()
    }

    /// Optimistic local state after the decision
    pub fn apply(&self, record: &Record) -> Record {
        record.clone().with("status", self.status())
    }
}

impl fmt::Display for Decision {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Decision::Approve => write!(f, "Approve"),
            Decision::Reject => write!(f, "Reject"),
        }
    }
}

/// Submit a decision; returns the updated record when the server sends one
pub async fn decide(api: &dyn RosterApi, id: &str, decision: Decision) -> Result<Option<Record>> {
    let body = api
        .send(ApiRequest::post(
            format!("{PATH}/{id}/decision"),
            json!({ "status": decision.status() }),
        ))
        .await
        .with_context(|| format!("Failed to {} request {}", decision.status(), id))?;
    Ok(Record::from_value(body))
}
