//! Fixture-backed roster service
//!
//! [`InMemoryDataSource`] answers the same routes as the real roster API
//! from in-memory tables. It powers the offline demo mode and lets tests
//! inject latency and failures without a server.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Mutex, MutexGuard};
use std::time::Duration;

use async_trait::async_trait;
use chrono::{Duration as ChronoDuration, NaiveDate};
use serde_json::{json, Value};

use super::{ApiRequest, Method, RosterApi};
use crate::error::{DashboardError, Result};
use crate::types::Record;

const DEMO_AIRPORTS: [&str; 5] = ["BLR", "DEL", "BOM", "MAA", "HYD"];
const DEMO_AIRLINES: [&str; 3] = ["Air India", "IndiGo", "Vistara"];
const DEMO_ROLES: [&str; 4] = ["Captain", "First Officer", "Purser", "Cabin Crew"];
const DEMO_NAMES: [&str; 16] = [
    "Asha Patel",
    "Ravi Singh",
    "Meera Nair",
    "John Dsouza",
    "Kavya Rao",
    "Arjun Mehta",
    "Fatima Khan",
    "Vikram Iyer",
    "Neha Gupta",
    "Rahul Verma",
    "Sana Shaikh",
    "Karthik Reddy",
    "Priya Menon",
    "Aditya Joshi",
    "Lakshmi Pillai",
    "Imran Ali",
];

#[derive(Debug, Default)]
struct Tables {
    crew: Vec<Record>,
    flights: Vec<Record>,
    rosters: Vec<Record>,
    approvals: Vec<Record>,
    /// Path prefixes that currently fail with the given status
    failures: Vec<(String, u16)>,
}

/// [`RosterApi`] served from memory
#[derive(Debug, Default)]
pub struct InMemoryDataSource {
    tables: Mutex<Tables>,
    requests: AtomicUsize,
    latency: Option<Duration>,
}

impl InMemoryDataSource {
    /// Create an empty source
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a source populated with deterministic demo data
    pub fn demo() -> Self {
        let source = Self::new();
        {
            let mut tables = source.tables();
            tables.crew = demo_crew();
            tables.flights = demo_flights();
            tables.approvals = demo_approvals();
            tables.rosters = demo_rosters(&tables.flights, &tables.crew);
        }
        source
    }

    pub fn with_crew(self, crew: Vec<Record>) -> Self {
        self.tables().crew = crew;
        self
    }

    pub fn with_flights(self, flights: Vec<Record>) -> Self {
        self.tables().flights = flights;
        self
    }

    pub fn with_rosters(self, rosters: Vec<Record>) -> Self {
        self.tables().rosters = rosters;
        self
    }

    pub fn with_approvals(self, approvals: Vec<Record>) -> Self {
        self.tables().approvals = approvals;
        self
    }

    /// Delay every response
    pub fn with_latency(mut self, latency: Duration) -> Self {
        self.latency = Some(latency);
        self
    }

    /// Make every request whose path starts with `prefix` fail with `status`
    pub fn fail_path(&self, prefix: &str, status: u16) {
        self.tables().failures.push((prefix.to_string(), status));
    }

    /// Stop injecting failures
    pub fn clear_failures(&self) {
        self.tables().failures.clear();
    }

    /// Number of requests served so far
    pub fn request_count(&self) -> usize {
        self.requests.load(Ordering::SeqCst)
    }

    fn tables(&self) -> MutexGuard<'_, Tables> {
        self.tables.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    fn route(&self, request: &ApiRequest) -> Result<Value> {
        let mut tables = self.tables();
        if let Some((_, status)) = tables
            .failures
            .iter()
            .find(|(prefix, _)| request.path.starts_with(prefix.as_str()))
        {
            return Err(DashboardError::Server {
                status: *status,
                message: Some("Injected failure".to_string()),
            });
        }

        let segments: Vec<&str> = request
            .path
            .trim_matches('/')
            .split('/')
            .filter(|s| !s.is_empty())
            .collect();

        match (request.method, segments.as_slice()) {
            (Method::Get, ["crew-members"]) => Ok(paginate(&tables.crew, request, |_| true)),
            (Method::Patch, ["crew-members", id, "toggle-status"]) => {
                let crew = find_mut(&mut tables.crew, id)?;
                let next = match crew.text("status").as_deref() {
                    Some("active") => "inactive",
                    _ => "active",
                };
                crew.set("status", next);
                Ok(crew.clone().into_value())
            }
            (Method::Get, ["flights"]) => {
                let date_from = request.param("date_from").map(str::to_string);
                let date_to = request.param("date_to").map(str::to_string);
                let airline = request.param("airline").map(str::to_lowercase);
                Ok(paginate(&tables.flights, request, |flight| {
                    let date = flight.text("flight_date").unwrap_or_default();
                    date_from.as_deref().is_none_or(|from| date.as_str() >= from)
                        && date_to.as_deref().is_none_or(|to| date.as_str() <= to)
                        && airline.as_deref().is_none_or(|wanted| {
                            flight
                                .text("airline")
                                .is_some_and(|a| a.to_lowercase().contains(wanted))
                        })
                }))
            }
            (Method::Get, ["roster", "rosters"]) => {
                let rosters: Vec<Value> = tables
                    .rosters
                    .iter()
                    .rev()
                    .cloned()
                    .map(Record::into_value)
                    .collect();
                Ok(json!({ "data": rosters }))
            }
            (Method::Post, ["rosters", "assign"]) => assign_roster(&mut tables, request),
            (Method::Post, ["roster", "create-roster", base]) => {
                create_roster(&mut tables, base, request)
            }
            (Method::Get, ["approvals"]) => Ok(paginate(&tables.approvals, request, |_| true)),
            (Method::Post, ["approvals", id, "decision"]) => {
                let status = body_text(request, "status")?;
                let approval = find_mut(&mut tables.approvals, id)?;
                approval.set("status", status);
                Ok(approval.clone().into_value())
            }
            (Method::Get, ["airport", airport, "crew", "availability", date]) => {
                availability(&tables, airport, date)
            }
            (Method::Post, ["crew", "availability"]) => {
                let airport = body_text(request, "airport")?;
                let date = body_text(request, "date")?;
                availability(&tables, &airport, &date)
            }
            _ => Err(DashboardError::Server {
                status: 404,
                message: Some("Not Found".to_string()),
            }),
        }
    }
}

#[async_trait]
impl RosterApi for InMemoryDataSource {
    async fn send(&self, request: ApiRequest) -> Result<Value> {
        self.requests.fetch_add(1, Ordering::SeqCst);
        if let Some(latency) = self.latency {
            tokio::time::sleep(latency).await;
        }
        tracing::trace!("In-memory {}", request);
        self.route(&request)
    }

    fn describe(&self) -> String {
        "offline demo".to_string()
    }
}

fn paginate<F>(table: &[Record], request: &ApiRequest, keep: F) -> Value
where
    F: Fn(&Record) -> bool,
{
    let page = request
        .param("page")
        .and_then(|p| p.parse::<usize>().ok())
        .unwrap_or(1)
        .max(1);
    let limit = request
        .param("limit")
        .and_then(|l| l.parse::<usize>().ok())
        .unwrap_or(50)
        .max(1);

    let matching: Vec<&Record> = table.iter().filter(|r| keep(r)).collect();
    let data: Vec<Value> = matching
        .iter()
        .skip((page - 1) * limit)
        .take(limit)
        .map(|r| (*r).clone().into_value())
        .collect();

    json!({
        "data": data,
        "meta": { "page": page, "limit": limit, "total": matching.len() }
    })
}

fn find_mut<'a>(table: &'a mut [Record], id: &str) -> Result<&'a mut Record> {
    table
        .iter_mut()
        .find(|r| r.text("id").as_deref() == Some(id))
        .ok_or_else(|| DashboardError::Server {
            status: 404,
            message: Some(format!("{} not found", id)),
        })
}

fn body_text(request: &ApiRequest, field: &str) -> Result<String> {
    request
        .body
        .as_ref()
        .and_then(|body| body.get(field))
        .and_then(|v| match v {
            Value::String(s) => Some(s.clone()),
            Value::Number(n) => Some(n.to_string()),
            _ => None,
        })
        .ok_or_else(|| DashboardError::Server {
            status: 422,
            message: Some(format!("field required: {}", field)),
        })
}

fn bad_request(message: String) -> DashboardError {
    DashboardError::Server {
        status: 400,
        message: Some(message),
    }
}

fn assign_roster(tables: &mut Tables, request: &ApiRequest) -> Result<Value> {
    let flight_id = body_text(request, "flight_id")?;
    let crew_id = body_text(request, "crew_id")?;
    let role = body_text(request, "role_on_flight").unwrap_or_else(|_| "Crew".to_string());

    if !tables.flights.iter().any(|f| f.text("id").as_deref() == Some(flight_id.as_str())) {
        return Err(bad_request(format!("flight_id {} does not exist", flight_id)));
    }
    let crew_name = tables
        .crew
        .iter()
        .find(|c| c.text("id").as_deref() == Some(crew_id.as_str()))
        .and_then(|c| c.text("full_name"))
        .ok_or_else(|| bad_request(format!("crew_id {} does not exist", crew_id)))?;

    let roster = Record::new()
        .with("id", tables.rosters.len() + 1)
        .with("flight_id", flight_id.as_str())
        .with("crew_id", crew_id.as_str())
        .with("crew_name", crew_name)
        .with("role_on_flight", role)
        .with("status", "assigned")
        .with("assigned_by", "dashboard");
    tables.rosters.push(roster.clone());
    Ok(json!({ "message": "Crew assigned", "roster": roster.into_value() }))
}

fn create_roster(tables: &mut Tables, base: &str, request: &ApiRequest) -> Result<Value> {
    let base = base.trim().to_uppercase();
    let flight_id = body_text(request, "flight_id")?;
    let flight = tables
        .flights
        .iter()
        .find(|f| f.text("id").as_deref() == Some(flight_id.as_str()))
        .cloned()
        .ok_or_else(|| bad_request(format!("flight_id {} does not exist", flight_id)))?;

    let assigned: Vec<Record> = tables
        .crew
        .iter()
        .filter(|c| {
            c.text("base_airport").as_deref() == Some(base.as_str())
                && c.text("status").as_deref() == Some("active")
        })
        .take(4)
        .cloned()
        .collect();
    if assigned.is_empty() {
        return Err(bad_request(format!("No active crew based at {}", base)));
    }

    let roster_name = format!(
        "{}-{}-{}",
        base,
        flight.text("flight_no").unwrap_or_default(),
        tables.rosters.len() + 1
    );
    for crew in &assigned {
        let roster = Record::new()
            .with("id", tables.rosters.len() + 1)
            .with("roster_name", roster_name.as_str())
            .with("flight_id", flight_id.as_str())
            .with("crew_id", crew.text("id").unwrap_or_default())
            .with("crew_name", crew.text("full_name").unwrap_or_default())
            .with("role_on_flight", crew.text("role").unwrap_or_default())
            .with("base_airport", base.as_str())
            .with("status", "assigned")
            .with("assigned_by", "system");
        tables.rosters.push(roster);
    }
    for crew in tables.crew.iter_mut() {
        if assigned.iter().any(|a| a.text("id") == crew.text("id")) {
            crew.set("status", "inactive");
        }
    }

    let assigned: Vec<Value> = assigned.into_iter().map(Record::into_value).collect();
    Ok(json!({
        "message": "Roster created successfully",
        "roster_name": roster_name,
        "flight_id": flight_id,
        "base_airport": base,
        "assigned_crew": assigned
    }))
}

fn availability(tables: &Tables, airport: &str, date: &str) -> Result<Value> {
    let airport = airport.trim().to_uppercase();
    NaiveDate::parse_from_str(date, "%Y-%m-%d")
        .map_err(|_| bad_request(format!("Invalid date: {}", date)))?;

    let based: Vec<&Record> = tables
        .crew
        .iter()
        .filter(|c| c.text("base_airport").as_deref() == Some(airport.as_str()))
        .collect();
    let arriving = tables
        .flights
        .iter()
        .filter(|f| {
            f.text("arr_airport").as_deref() == Some(airport.as_str())
                && f.text("flight_date").as_deref() == Some(date)
        })
        .count();

    let available: Vec<Value> = based
        .iter()
        .enumerate()
        .filter(|(_, c)| c.text("status").as_deref() == Some("active"))
        .map(|(i, crew)| {
            let mut details = serde_json::Map::new();
            if i % 3 == 0 {
                details.insert("standby".to_string(), json!({ "standby_type": "airport" }));
            }
            if i % 4 == 1 {
                details.insert("on_leave".to_string(), json!({ "leave_type": "requested" }));
            }
            let mut entry = (*crew).clone();
            entry.set("crew_id", crew.get("id").cloned().unwrap_or(Value::Null));
            entry.set("availability_details", Value::Object(details));
            entry.into_value()
        })
        .collect();

    Ok(json!({
        "airport": airport,
        "date": date,
        "based_crew_count": based.len(),
        "arriving_crew_count": arriving,
        "available_crew_count": available.len(),
        "available_crew": available
    }))
}

fn demo_crew() -> Vec<Record> {
    DEMO_NAMES
        .iter()
        .enumerate()
        .map(|(i, name)| {
            let status = match i % 4 {
                0 | 1 => "active",
                2 => "Available",
                _ => "inactive",
            };
            Record::new()
                .with("id", i + 1)
                .with("crew_code", format!("C{:03}", i + 1))
                .with("full_name", *name)
                .with("role", DEMO_ROLES[i % DEMO_ROLES.len()])
                .with("base_airport", DEMO_AIRPORTS[i % DEMO_AIRPORTS.len()])
                .with("status", status)
                .with(
                    "qualifications",
                    json!(if i % 2 == 0 { vec!["A320"] } else { vec!["A320", "B737"] }),
                )
        })
        .collect()
}

fn demo_flights() -> Vec<Record> {
    let start = NaiveDate::from_ymd_opt(2025, 1, 1).unwrap_or_default();
    (0..237)
        .map(|i: usize| {
            let dep = DEMO_AIRPORTS[i % DEMO_AIRPORTS.len()];
            let arr = DEMO_AIRPORTS[(i + 2) % DEMO_AIRPORTS.len()];
            let date = start + ChronoDuration::days((i / 10) as i64);
            Record::new()
                .with("id", i + 1)
                .with("flight_no", format!("AI{}", 100 + i))
                .with("airline", DEMO_AIRLINES[i % DEMO_AIRLINES.len()])
                .with("dep_airport", dep)
                .with("arr_airport", arr)
                .with("flight_date", date.format("%Y-%m-%d").to_string())
                .with("dep_time", format!("{:02}:{:02}", 6 + i % 16, (i * 7) % 60))
        })
        .collect()
}

fn demo_approvals() -> Vec<Record> {
    let kinds = ["Leave", "Swap", "Standby", "Overtime"];
    (0..24)
        .map(|i: usize| {
            let status = match i % 5 {
                0 => "approved",
                1 => "rejected",
                _ => "pending",
            };
            Record::new()
                .with("id", i + 1)
                .with("requester", DEMO_NAMES[i % DEMO_NAMES.len()])
                .with("type", kinds[i % kinds.len()])
                .with("details", format!("Request #{} for duty period {}", i + 1, i % 7 + 1))
                .with("status", status)
        })
        .collect()
}

fn demo_rosters(flights: &[Record], crew: &[Record]) -> Vec<Record> {
    flights
        .iter()
        .take(8)
        .zip(crew.iter().cycle())
        .enumerate()
        .map(|(i, (flight, member))| {
            Record::new()
                .with("id", i + 1)
                .with("flight_id", flight.get("id").cloned().unwrap_or(Value::Null))
                .with("crew_id", member.get("id").cloned().unwrap_or(Value::Null))
                .with("crew_name", member.text("full_name").unwrap_or_default())
                .with("role_on_flight", member.text("role").unwrap_or_default())
                .with("base_airport", member.text("base_airport").unwrap_or_default())
                .with("status", if i % 3 == 0 { "pending" } else { "assigned" })
                .with("assigned_by", "system")
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn block_on<F: std::future::Future>(future: F) -> F::Output {
        tokio::runtime::Builder::new_current_thread()
            .enable_time()
            .build()
            .unwrap()
            .block_on(future)
    }

    fn get(path: &str, params: &[(&str, &str)]) -> ApiRequest {
        ApiRequest::get(path).with_params(
            params
                .iter()
                .map(|(k, v)| (k.to_string(), v.to_string()))
                .collect(),
        )
    }

    #[test]
    fn test_paginated_crew() {
        let source = InMemoryDataSource::demo();
        let body = block_on(source.send(get("/crew-members/", &[("page", "2"), ("limit", "5")])))
            .unwrap();
        assert_eq!(body["data"].as_array().unwrap().len(), 5);
        assert_eq!(body["meta"]["total"], 16);
        assert_eq!(body["data"][0]["id"], 6);
    }

    #[test]
    fn test_flight_filters() {
        let source = InMemoryDataSource::demo();
        let body = block_on(source.send(get(
            "/flights",
            &[("limit", "100"), ("date_from", "2025-01-02"), ("date_to", "2025-01-02")],
        )))
        .unwrap();
        assert_eq!(body["meta"]["total"], 10);
    }

    #[test]
    fn test_rosters_are_unwrapped_newest_first() {
        let source = InMemoryDataSource::demo();
        let body = block_on(source.send(ApiRequest::get("/roster/rosters"))).unwrap();
        let data = body["data"].as_array().unwrap();
        assert_eq!(data.len(), 8);
        assert_eq!(data[0]["id"], 8);
    }

    #[test]
    fn test_assign_validates_ids() {
        let source = InMemoryDataSource::demo();
        let err = block_on(source.send(ApiRequest::post(
            "/rosters/assign",
            json!({ "flight_id": 9999, "crew_id": 1, "role_on_flight": "Captain" }),
        )))
        .unwrap_err();
        assert_eq!(err.user_message(), "Server responded 400: flight_id 9999 does not exist");
    }

    #[test]
    fn test_decision_updates_status() {
        let source = InMemoryDataSource::demo();
        let body = block_on(source.send(ApiRequest::post(
            "/approvals/3/decision",
            json!({ "status": "approved" }),
        )))
        .unwrap();
        assert_eq!(body["status"], "approved");
    }

    #[test]
    fn test_availability_shape() {
        let source = InMemoryDataSource::demo();
        let body = block_on(source.send(ApiRequest::get(
            "/airport/blr/crew/availability/2025-01-01",
        )))
        .unwrap();
        assert_eq!(body["airport"], "BLR");
        let available = body["available_crew"].as_array().unwrap();
        assert_eq!(body["available_crew_count"], available.len());
    }

    #[test]
    fn test_injected_failure_and_counter() {
        let source = InMemoryDataSource::demo();
        source.fail_path("/approvals", 503);
        let err = block_on(source.send(ApiRequest::get("/approvals"))).unwrap_err();
        assert!(matches!(err, DashboardError::Server { status: 503, .. }));

        source.clear_failures();
        assert!(block_on(source.send(ApiRequest::get("/approvals"))).is_ok());
        assert_eq!(source.request_count(), 2);
    }

    #[test]
    fn test_unknown_route_is_404() {
        let source = InMemoryDataSource::new();
        let err = block_on(source.send(ApiRequest::get("/nope"))).unwrap_err();
        assert!(matches!(err, DashboardError::Server { status: 404, .. }));
    }
}
