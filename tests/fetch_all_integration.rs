//! Integration tests for fetch-all mode and response-shape tolerance

mod common;

use std::collections::BTreeMap;
use std::sync::Arc;

use common::{demo_view, expect_applied, runtime};
use crewdeck::list::{fetch_all_pages, FetchAllPolicy};
use crewdeck::resources::{Resource, ResourceSource};
use crewdeck::{AppConfig, DashboardError, InMemoryDataSource, ResourcePage};
use serde_json::json;

#[test]
fn test_fetch_all_walks_every_flight_page() {
    let rt = runtime();
    let api = Arc::new(InMemoryDataSource::demo());
    let source = ResourceSource::new(api.clone(), Resource::Flights);

    let result = rt
        .block_on(fetch_all_pages(
            &source,
            &BTreeMap::new(),
            FetchAllPolicy::default(),
        ))
        .unwrap();

    assert_eq!(result.items.len(), 237);
    assert_eq!(result.requests, 3);
    assert_eq!(api.request_count(), 3);
    assert_eq!(result.total_count, Some(237));
}

#[test]
fn test_fetch_all_cap_is_an_error() {
    let rt = runtime();
    let api = Arc::new(InMemoryDataSource::demo());
    let source = ResourceSource::new(api, Resource::Flights);
    let policy = FetchAllPolicy {
        page_size: 50,
        max_pages: 2,
    };

    let err = rt
        .block_on(fetch_all_pages(&source, &BTreeMap::new(), policy))
        .unwrap_err();
    assert!(matches!(err, DashboardError::FetchAllCapExceeded { pages: 2 }));
}

#[test]
fn test_fetch_all_through_the_view() {
    let rt = runtime();
    let api = Arc::new(InMemoryDataSource::demo());
    let mut view = demo_view(&rt, &api, Resource::Flights, "page=4", &AppConfig::default());
    view.mount();
    expect_applied(&mut view);

    let filters = BTreeMap::from([("airline".to_string(), "Vistara".to_string())]);
    assert!(view.update(|c| c.fetch_all(filters)));
    expect_applied(&mut view);

    let controller = view.controller();
    assert!(controller.state().fetched_all);
    assert_eq!(controller.query().page, 1);
    assert_eq!(controller.query().filter("airline"), Some("Vistara"));
    let total = controller.summary().total;
    assert_eq!(controller.items().len() as u64, total);
    assert_eq!(
        controller.summary().label(),
        format!("Page 1 of 1 · {} total", total)
    );
}

#[test]
fn test_wrapped_and_bare_bodies_give_the_same_items() {
    let rows = json!([{ "id": 1 }, { "id": 2 }]);
    let wrapped = ResourcePage::from_body(json!({ "data": rows.clone() }), "data", 1, Some(50));
    let bare = ResourcePage::from_body(rows, "data", 1, Some(50));
    assert_eq!(wrapped.items, bare.items);
    assert_eq!(bare.total_count, None);

    let odd = ResourcePage::from_body(json!({ "unexpected": true }), "data", 1, Some(50));
    assert!(odd.is_empty());
}

#[test]
fn test_string_totals_are_accepted() {
    let body = json!({ "data": [{ "id": 1 }], "meta": { "total": "41" } });
    let page = ResourcePage::from_body(body, "data", 1, Some(50));
    assert_eq!(page.total_count, Some(41));
}
