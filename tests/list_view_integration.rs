//! Integration tests for list views: request ordering, navigation sync and
//! error handling against the in-memory roster service.

mod common;

use std::sync::Arc;
use std::time::Duration;

use common::gated_source::GatedSource;
use common::{demo_view, expect_applied, ids, runtime, test_timeout};
use crewdeck::list::{ApplyOutcome, ListController, ListOptions, ListView, QueryDefaults};
use crewdeck::navigation::HistoryNavigationStore;
use crewdeck::resources::availability::{self, AvailabilityReport};
use crewdeck::resources::{crew, Resource};
use crewdeck::{AppConfig, InMemoryDataSource};

#[test]
fn test_latest_request_wins_regardless_of_arrival_order() {
    let rt = runtime();
    let (source, mut gates) = GatedSource::new(&[1, 2, 3]);
    let controller = ListController::new(
        crew::profile(),
        QueryDefaults::new(3),
        ListOptions::default(),
        Box::new(HistoryNavigationStore::new()),
    );
    let mut view = ListView::new(
        controller,
        Arc::new(source),
        rt.handle().clone(),
        Duration::from_secs(5),
    );

    view.mount();
    assert!(view.update(|c| c.set_page(2)));
    assert!(view.update(|c| c.set_page(3)));

    // Newest first, then the stale ones
    gates.release(3);
    assert_eq!(view.wait(test_timeout()), Some(ApplyOutcome::Applied));
    gates.release(1);
    assert_eq!(view.wait(test_timeout()), Some(ApplyOutcome::Discarded));
    gates.release(2);
    assert_eq!(view.wait(test_timeout()), Some(ApplyOutcome::Discarded));

    assert_eq!(ids(&view), vec!["p3-0", "p3-1", "p3-2"]);
    assert!(!view.controller().is_loading());
    assert_eq!(view.controller().query().page, 3);
}

#[test]
fn test_back_and_forward_refetch_the_recorded_page() {
    let rt = runtime();
    let api = Arc::new(InMemoryDataSource::demo());
    let mut view = demo_view(&rt, &api, Resource::Crew, "limit=5", &AppConfig::default());

    view.mount();
    expect_applied(&mut view);
    let first_page = ids(&view);

    assert!(view.update(ListController::go_to_next_page));
    expect_applied(&mut view);
    assert_eq!(view.controller().query().page, 2);
    assert_ne!(ids(&view), first_page);

    assert!(view.update(ListController::back));
    expect_applied(&mut view);
    assert_eq!(view.controller().query().page, 1);
    assert_eq!(ids(&view), first_page);

    assert!(view.update(ListController::forward));
    expect_applied(&mut view);
    assert_eq!(view.controller().query().page, 2);
    assert_eq!(view.controller().summary().label(), "Page 2 of 4 · 16 total");
}

#[test]
fn test_filter_change_returns_to_first_page() {
    let rt = runtime();
    let api = Arc::new(InMemoryDataSource::demo());
    let mut view = demo_view(
        &rt,
        &api,
        Resource::Flights,
        "page=3&limit=25",
        &AppConfig::default(),
    );
    view.mount();
    expect_applied(&mut view);

    assert!(view.update(|c| c.set_filter("airline", "IndiGo")));
    expect_applied(&mut view);
    let query = view.controller().query();
    assert_eq!(query.page, 1);
    assert_eq!(query.filter("airline"), Some("IndiGo"));
    assert!(view
        .controller()
        .items()
        .iter()
        .all(|f| f.text("airline").as_deref() == Some("IndiGo")));
}

#[test]
fn test_past_the_end_page_is_reported() {
    let rt = runtime();
    let api = Arc::new(InMemoryDataSource::demo());
    let mut view = demo_view(&rt, &api, Resource::Crew, "page=9&limit=10", &AppConfig::default());
    view.mount();
    expect_applied(&mut view);

    assert!(view.controller().items().is_empty());
    assert!(view.controller().is_past_end());
    assert!(view.controller().error().is_none());
}

#[test]
fn test_failed_fetch_clears_or_keeps_items() {
    let rt = runtime();
    let api = Arc::new(InMemoryDataSource::demo());

    let mut view = demo_view(&rt, &api, Resource::Approvals, "", &AppConfig::default());
    view.mount();
    expect_applied(&mut view);
    assert!(!view.controller().items().is_empty());

    api.fail_path("/approvals", 503);
    assert!(view.refresh());
    expect_applied(&mut view);
    assert!(view.controller().items().is_empty());
    assert_eq!(
        view.controller().error(),
        Some("Server responded 503: Injected failure")
    );

    // With stale data kept, the previous items survive the failure
    api.clear_failures();
    let mut config = AppConfig::default();
    config.lists.keep_stale_on_error = true;
    let mut view = demo_view(&rt, &api, Resource::Approvals, "", &config);
    view.mount();
    expect_applied(&mut view);
    let before = ids(&view);

    api.fail_path("/approvals", 503);
    view.refresh();
    expect_applied(&mut view);
    assert_eq!(ids(&view), before);
    assert!(view.controller().error().is_some());
}

#[test]
fn test_unmounted_view_ignores_late_responses() {
    let rt = runtime();
    let api = Arc::new(InMemoryDataSource::demo().with_latency(Duration::from_millis(50)));
    let mut view = demo_view(&rt, &api, Resource::Crew, "", &AppConfig::default());

    view.mount();
    view.unmount();
    assert_eq!(view.wait(test_timeout()), Some(ApplyOutcome::Discarded));
    assert!(view.controller().items().is_empty());
}

#[test]
fn test_rosters_accept_unpaginated_bodies() {
    let rt = runtime();
    let api = Arc::new(InMemoryDataSource::demo());
    let mut view = demo_view(&rt, &api, Resource::Rosters, "limit=2", &AppConfig::default());
    view.mount();
    expect_applied(&mut view);

    // Every roster the server returned is shown, not just `limit`
    assert_eq!(view.controller().items().len(), 8);
    assert_eq!(view.controller().summary().total, 8);
}

#[test]
fn test_availability_opens_on_the_default_lookup() {
    let rt = runtime();
    let api = Arc::new(InMemoryDataSource::demo());
    let mut view = demo_view(&rt, &api, Resource::Availability, "", &AppConfig::default());
    view.mount();
    expect_applied(&mut view);

    let controller = view.controller();
    assert!(controller.error().is_none());
    assert!(!controller.is_loading());
    assert_eq!(
        controller.query().filter("airport"),
        Some(availability::DEFAULT_AIRPORT)
    );
    let report = AvailabilityReport::from_page(&controller.state().page);
    assert_eq!(report.airport.as_deref(), Some(availability::DEFAULT_AIRPORT));
    // Nothing but the defaults is written to the address
    assert!(controller.navigation().params().is_empty());
}

#[test]
fn test_unknown_filter_key_is_refused() {
    let rt = runtime();
    let api = Arc::new(InMemoryDataSource::demo());
    let mut view = demo_view(&rt, &api, Resource::Crew, "page=3&limit=5", &AppConfig::default());
    view.mount();
    expect_applied(&mut view);
    let before = api.request_count();

    assert!(!view.update(|c| c.set_filter("role", "Captain")));
    assert!(!view.update(|c| c.set_filter("role", "Captain")));

    let controller = view.controller();
    assert_eq!(controller.query().page, 3);
    assert_eq!(controller.navigation().get("role"), None);
    assert_eq!(api.request_count(), before);
}
