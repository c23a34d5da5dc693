//! Resource definitions
//!
//! Each dashboard resource supplies a [`ResourceProfile`] (identity, search,
//! filters, status vocabulary), the request that fetches one page, and any
//! mutation calls its page offers. [`ResourceSource`] adapts a [`RosterApi`]
//! into the [`DataSource`] a [`ListView`] consumes.

pub mod approvals;
pub mod availability;
pub mod crew;
pub mod flights;
pub mod rosters;

use std::fmt;
use std::sync::Arc;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tokio::runtime::Handle;

use crate::config::AppConfig;
use crate::error::{DashboardError, Result, ResultExt};
use crate::list::{ListController, ListView, QueryDefaults, QueryState, ResourceProfile};
use crate::navigation::NavigationStore;
use crate::source::{ApiRequest, DataSource, RosterApi};
use crate::types::ResourcePage;

/// The resources shown by the dashboard
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Resource {
    Crew,
    Flights,
    Rosters,
    Approvals,
    Availability,
}

impl Resource {
    pub const ALL: [Resource; 5] = [
        Resource::Crew,
        Resource::Flights,
        Resource::Rosters,
        Resource::Approvals,
        Resource::Availability,
    ];

    /// Stable key used in persisted state
    pub fn key(&self) -> &'static str {
        match self {
            Resource::Crew => "crew",
            Resource::Flights => "flights",
            Resource::Rosters => "rosters",
            Resource::Approvals => "approvals",
            Resource::Availability => "availability",
        }
    }

    pub fn from_key(key: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|r| r.key() == key)
    }

    pub fn label(&self) -> &'static str {
        match self {
            Resource::Crew => "Crew",
            Resource::Flights => "Flights",
            Resource::Rosters => "Rosters",
            Resource::Approvals => "Approvals",
            Resource::Availability => "Availability",
        }
    }

    pub fn profile(&self) -> ResourceProfile {
        match self {
            Resource::Crew => crew::profile(),
            Resource::Flights => flights::profile(),
            Resource::Rosters => rosters::profile(),
            Resource::Approvals => approvals::profile(),
            Resource::Availability => availability::profile(),
        }
    }

    /// Navigation defaults for this resource's list view
    pub fn defaults(&self, config: &AppConfig) -> QueryDefaults {
        let limit = config.lists.default_limit;
        match self {
            Resource::Flights => QueryDefaults::new(limit).with_filter_keys(flights::FILTER_KEYS),
            Resource::Availability => QueryDefaults::new(limit)
                .with_filter_keys(availability::FILTER_KEYS)
                .with_filter_default("airport", availability::DEFAULT_AIRPORT)
                .with_filter_default("date", availability::today()),
            _ => QueryDefaults::new(limit),
        }
    }

    /// Request fetching one page of this resource
    pub fn page_request(&self, query: &QueryState) -> Result<ApiRequest> {
        match self {
            Resource::Crew => Ok(crew::page_request(query)),
            Resource::Flights => Ok(flights::page_request(query)),
            Resource::Rosters => Ok(rosters::page_request()),
            Resource::Approvals => Ok(approvals::page_request(query)),
            Resource::Availability => availability::page_request(query),
        }
    }

    /// Interpret a response body for `query`
    pub fn page_from_body(&self, body: Value, query: &QueryState) -> ResourcePage {
        match self {
            Resource::Rosters => ResourcePage::from_body(body, "data", 1, None),
            Resource::Availability => {
                ResourcePage::from_body(body, availability::ITEMS_KEY, 1, None)
            }
            _ => ResourcePage::from_body(body, "data", query.page, Some(query.limit)),
        }
    }

    /// Whether the server paginates this resource
    pub fn is_paginated(&self) -> bool {
        matches!(self, Resource::Crew | Resource::Flights | Resource::Approvals)
    }
}

impl fmt::Display for Resource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.label())
    }
}

/// [`DataSource`] for one resource on top of a [`RosterApi`]
pub struct ResourceSource {
    api: Arc<dyn RosterApi>,
    resource: Resource,
}

impl ResourceSource {
    pub fn new(api: Arc<dyn RosterApi>, resource: Resource) -> Self {
        Self { api, resource }
    }
}

#[async_trait]
impl DataSource for ResourceSource {
    async fn fetch_page(&self, query: &QueryState) -> Result<ResourcePage> {
        let request = self.resource.page_request(query)?;
        let body = self
            .api
            .send(request)
            .await
            .with_context(|| format!("Failed to fetch {}", self.resource.key()))?;
        Ok(self.resource.page_from_body(body, query))
    }

    async fn submit_payload(&self, payload: &Value) -> Result<ResourcePage> {
        match self.resource {
            Resource::Availability => {
                let body = self
                    .api
                    .send(availability::payload_request(payload.clone()))
                    .await
                    .context("Failed to query availability")?;
                Ok(ResourcePage::from_body(body, availability::ITEMS_KEY, 1, None))
            }
            other => Err(DashboardError::Validation(format!(
                "{} does not accept custom payloads",
                other.label()
            ))),
        }
    }
}

/// Build the list view of a resource
pub fn build_list_view(
    resource: Resource,
    api: Arc<dyn RosterApi>,
    config: &AppConfig,
    navigation: Box<dyn NavigationStore>,
    runtime: Handle,
) -> ListView {
    let controller = ListController::new(
        resource.profile(),
        resource.defaults(config),
        config.list_options(),
        navigation,
    );
    ListView::new(
        controller,
        Arc::new(ResourceSource::new(api, resource)),
        runtime,
        config.api.timeout(),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::source::MockRosterApi;
    use serde_json::json;

    fn block_on<F: std::future::Future>(future: F) -> F::Output {
        tokio::runtime::Builder::new_current_thread()
            .build()
            .unwrap()
            .block_on(future)
    }

    #[test]
    fn test_resource_keys_round_trip() {
        for resource in Resource::ALL {
            assert_eq!(Resource::from_key(resource.key()), Some(resource));
        }
        assert_eq!(Resource::from_key("dashboard"), None);
    }

    #[test]
    fn test_crew_source_sends_pagination() {
        let mut api = MockRosterApi::new();
        api.expect_send()
            .withf(|r| r.path == "/crew-members/" && r.param("page") == Some("2"))
            .times(1)
            .returning(|_| Ok(json!({ "data": [{ "id": 1 }], "meta": { "total": 51 } })));

        let source = ResourceSource::new(Arc::new(api), Resource::Crew);
        let page = block_on(source.fetch_page(&QueryState::new(2, 50))).unwrap();
        assert_eq!(page.total_count, Some(51));
        assert_eq!(page.page_number, 2);
    }

    #[test]
    fn test_rosters_accept_bare_array() {
        let mut api = MockRosterApi::new();
        api.expect_send()
            .returning(|_| Ok(json!([{ "id": 1 }, { "id": 2 }, { "id": 3 }])));

        let source = ResourceSource::new(Arc::new(api), Resource::Rosters);
        let page = block_on(source.fetch_page(&QueryState::new(1, 2))).unwrap();
        // Unpaginated: everything the server sent is kept
        assert_eq!(page.len(), 3);
    }

    #[test]
    fn test_fetch_error_carries_context() {
        let mut api = MockRosterApi::new();
        api.expect_send().returning(|_| {
            Err(DashboardError::Server {
                status: 500,
                message: Some("Failed to fetch rosters: db down".to_string()),
            })
        });

        let source = ResourceSource::new(Arc::new(api), Resource::Rosters);
        let err = block_on(source.fetch_page(&QueryState::new(1, 50))).unwrap_err();
        assert!(err.to_string().starts_with("Failed to fetch rosters"));
        assert_eq!(
            err.user_message(),
            "Server responded 500: Failed to fetch rosters: db down"
        );
    }

    #[test]
    fn test_availability_defaults_to_a_lookup() {
        let defaults = Resource::Availability.defaults(&AppConfig::default());
        let query = defaults.initial();
        assert_eq!(query.filter("airport"), Some(availability::DEFAULT_AIRPORT));
        assert!(Resource::Availability.page_request(&query).is_ok());
    }

    #[test]
    fn test_payload_rejected_outside_availability() {
        let api = MockRosterApi::new();
        let source = ResourceSource::new(Arc::new(api), Resource::Crew);
        let err = block_on(source.submit_payload(&json!({}))).unwrap_err();
        assert!(matches!(err, DashboardError::Validation(_)));
    }
}
