//! Common test utilities and helpers

#![allow(dead_code)] // Test utilities may not all be used in every test file

pub mod builders;
pub mod gated_source;

use std::sync::Arc;
use std::time::Duration;

use crewdeck::list::{ApplyOutcome, ListView};
use crewdeck::navigation::HistoryNavigationStore;
use crewdeck::resources::{build_list_view, Resource};
use crewdeck::{AppConfig, InMemoryDataSource, RosterApi};

/// How long to wait for a single completion
pub fn test_timeout() -> Duration {
    Duration::from_secs(5)
}

/// Multi-threaded runtime so spawned fetches run while the test thread blocks
pub fn runtime() -> tokio::runtime::Runtime {
    tokio::runtime::Builder::new_multi_thread()
        .worker_threads(2)
        .enable_time()
        .build()
        .unwrap()
}

/// List view of `resource` over a shared in-memory service
pub fn demo_view(
    rt: &tokio::runtime::Runtime,
    api: &Arc<InMemoryDataSource>,
    resource: Resource,
    query: &str,
    config: &AppConfig,
) -> ListView {
    let api: Arc<dyn RosterApi> = api.clone();
    build_list_view(
        resource,
        api,
        config,
        Box::new(HistoryNavigationStore::from_query_string(query)),
        rt.handle().clone(),
    )
}

/// Wait for one completion and assert it was applied
pub fn expect_applied(view: &mut ListView) {
    assert_eq!(view.wait(test_timeout()), Some(ApplyOutcome::Applied));
}

/// Ids of the loaded items
pub fn ids(view: &ListView) -> Vec<String> {
    let controller = view.controller();
    controller
        .items()
        .iter()
        .filter_map(|r| controller.profile().record_id(r))
        .collect()
}
