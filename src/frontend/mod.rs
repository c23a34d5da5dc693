//! Frontend module for egui UI
//!
//! This module provides the dashboard UI using eframe/egui. Every resource
//! page is backed by a [`ListView`] whose fetches run on a tokio runtime and
//! report back over crossbeam channels; the app drains them once per frame.
//!
//! # Architecture
//!
//! A side panel switches between resource pages. Pages render read-only
//! views of their list controller and return [`AppAction`]s, which
//! [`CrewDeckApp::handle_action`] turns into controller operations or
//! background API calls.
//!
//! # Submodules
//!
//! - `pages` - One page per resource
//! - `state` - Shared state and action types
//! - `status_bar` - Bottom bar
//! - `widgets` - Table, pagination and status widgets

pub mod pages;
pub mod state;
pub mod status_bar;
pub mod widgets;

pub use state::{AppAction, ListAction, SharedState};
pub use widgets::*;

use std::collections::HashMap;
use std::sync::Arc;

use tokio::runtime::Handle;

use crate::config::{AppConfig, AppState};
use crate::list::ListView;
use crate::navigation::{to_query_string, HistoryNavigationStore};
use crate::resources::{approvals, build_list_view, crew, rosters, Resource};
use crate::source::RosterApi;

use pages::{
    ApprovalsPage, ApprovalsPageState, AvailabilityPage, AvailabilityPageState, CrewPage,
    CrewPageState, FlightsPage, FlightsPageState, Page, RostersPage, RostersPageState,
};
use status_bar::{render_status_bar, StatusBarContext};

/// Per-page UI state
#[derive(Default)]
struct PageStates {
    crew: CrewPageState,
    flights: FlightsPageState,
    rosters: RostersPageState,
    approvals: ApprovalsPageState,
    availability: AvailabilityPageState,
}

/// Main application state for the dashboard
pub struct CrewDeckApp {
    // === Communication ===
    api: Arc<dyn RosterApi>,
    views: HashMap<Resource, ListView>,

    // === Shared State ===
    config: AppConfig,
    app_state: AppState,
    current: Resource,
    last_error: Option<String>,

    // === Pages ===
    pages: PageStates,
}

impl CrewDeckApp {
    /// Create the app and mount the page that was open last
    pub fn new(
        cc: &eframe::CreationContext<'_>,
        api: Arc<dyn RosterApi>,
        runtime: Handle,
        config: AppConfig,
        app_state: AppState,
    ) -> Self {
        let mut app = Self::headless(api, runtime, config, app_state);
        let ctx = cc.egui_ctx.clone();
        for view in app.views.values_mut() {
            let ctx = ctx.clone();
            view.set_waker(Arc::new(move || ctx.request_repaint()));
        }
        app
    }

    /// Build the app without a window
    pub fn headless(
        api: Arc<dyn RosterApi>,
        runtime: Handle,
        config: AppConfig,
        app_state: AppState,
    ) -> Self {
        let views = Resource::ALL
            .into_iter()
            .map(|resource| {
                let query = app_state.view_query(resource.key());
                let navigation = Box::new(HistoryNavigationStore::from_query_string(query));
                let view = build_list_view(
                    resource,
                    Arc::clone(&api),
                    &config,
                    navigation,
                    runtime.clone(),
                );
                (resource, view)
            })
            .collect();

        let current = app_state
            .last_page
            .as_deref()
            .and_then(Resource::from_key)
            .unwrap_or(Resource::Crew);

        let pages = PageStates {
            availability: AvailabilityPageState::default()
                .with_airport(app_state.last_airport.as_deref()),
            ..Default::default()
        };

        let mut app = Self {
            api,
            views,
            config,
            app_state,
            current,
            last_error: None,
            pages,
        };
        app.mount(current);
        app
    }

    pub fn current(&self) -> Resource {
        self.current
    }

    pub fn view(&self, resource: Resource) -> Option<&ListView> {
        self.views.get(&resource)
    }

    /// App-level error shown in the status bar
    pub fn last_error(&self) -> Option<&str> {
        self.last_error.as_deref()
    }

    fn record_refused(&mut self, resource: Resource, id: &str, started: bool) {
        if started {
            self.last_error = None;
        } else {
            tracing::warn!("{} {} is not loaded", resource.label(), id);
            self.last_error = Some(format!(
                "{} {} is no longer on this page; refresh and try again",
                resource.label(),
                id
            ));
        }
    }

    fn mount(&mut self, resource: Resource) {
        if let Some(view) = self.views.get_mut(&resource) {
            view.mount();
        }
    }

    /// Handle an action emitted by a page or the side panel
    pub fn handle_action(&mut self, action: AppAction) {
        tracing::debug!("Handling {:?}", action);
        match action {
            AppAction::ShowResource(resource) => {
                if resource == self.current {
                    return;
                }
                if let Some(view) = self.views.get_mut(&self.current) {
                    view.unmount();
                }
                self.current = resource;
                self.mount(resource);
            }
            AppAction::List(resource, action) => {
                if let Some(view) = self.views.get_mut(&resource) {
                    view.update(|controller| action.apply(controller));
                }
            }
            AppAction::ToggleCrewStatus(id) => {
                let api = Arc::clone(&self.api);
                let Some(view) = self.views.get_mut(&Resource::Crew) else {
                    return;
                };
                let target = id.clone();
                let started = view.mutate(
                    &id,
                    crew::toggled,
                    async move { crew::toggle_status(api.as_ref(), &target).await },
                    false,
                );
                self.record_refused(Resource::Crew, &id, started);
            }
            AppAction::Decide { id, decision } => {
                let api = Arc::clone(&self.api);
                let remove = self.config.lists.remove_on_decision;
                let Some(view) = self.views.get_mut(&Resource::Approvals) else {
                    return;
                };
                let target = id.clone();
                let started = view.mutate(
                    &id,
                    |record| decision.apply(record),
                    async move { approvals::decide(api.as_ref(), &target, decision).await },
                    remove,
                );
                self.record_refused(Resource::Approvals, &id, started);
            }
            AppAction::AssignRoster(request) => {
                let api = Arc::clone(&self.api);
                if let Some(view) = self.views.get_mut(&Resource::Rosters) {
                    view.perform(async move { rosters::assign(api.as_ref(), &request).await });
                }
            }
            AppAction::CreateRoster { base, flight_id } => {
                let api = Arc::clone(&self.api);
                if let Some(view) = self.views.get_mut(&Resource::Rosters) {
                    view.perform(async move {
                        rosters::create_roster(api.as_ref(), &base, &flight_id)
                            .await
                            .map(|created| created.summary())
                    });
                }
            }
            AppAction::ToggleDarkMode => {
                self.config.ui.dark_mode = !self.config.ui.dark_mode;
            }
        }
    }

    /// Apply every queued completion; returns whether anything changed
    pub fn process_completions(&mut self) -> bool {
        let mut changed = false;
        for view in self.views.values_mut() {
            changed |= view.poll();
        }
        changed
    }

    /// Copy navigation state of every view into the persisted app state
    pub fn snapshot_state(&mut self) -> &AppState {
        for (resource, view) in &self.views {
            let query = to_query_string(&view.controller().navigation().params());
            self.app_state.set_view_query(resource.key(), &query);
        }
        self.app_state.last_page = Some(self.current.key().to_string());
        self.app_state.last_airport = self.pages.availability.airport().map(str::to_string);
        &self.app_state
    }

    fn render_page(&mut self, ui: &mut egui::Ui) -> Vec<AppAction> {
        let Some(view) = self.views.get(&self.current) else {
            return Vec::new();
        };
        let shared = SharedState {
            view,
            config: &self.config,
        };
        match self.current {
            Resource::Crew => CrewPage::render(&mut self.pages.crew, &shared, ui),
            Resource::Flights => FlightsPage::render(&mut self.pages.flights, &shared, ui),
            Resource::Rosters => RostersPage::render(&mut self.pages.rosters, &shared, ui),
            Resource::Approvals => ApprovalsPage::render(&mut self.pages.approvals, &shared, ui),
            Resource::Availability => {
                AvailabilityPage::render(&mut self.pages.availability, &shared, ui)
            }
        }
    }
}

impl eframe::App for CrewDeckApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        if self.process_completions() {
            ctx.request_repaint();
        }

        let visuals = if self.config.ui.dark_mode {
            egui::Visuals::dark()
        } else {
            egui::Visuals::light()
        };
        ctx.set_visuals(visuals);

        let mut actions = Vec::new();

        egui::SidePanel::left("navigation")
            .resizable(false)
            .exact_width(150.0)
            .show(ctx, |ui| {
                ui.add_space(8.0);
                ui.heading("Crew Deck");
                ui.separator();
                for resource in Resource::ALL {
                    if ui
                        .selectable_label(self.current == resource, resource.label())
                        .clicked()
                    {
                        actions.push(AppAction::ShowResource(resource));
                    }
                }
                ui.with_layout(egui::Layout::bottom_up(egui::Align::Min), |ui| {
                    let label = if self.config.ui.dark_mode { "☀ Light" } else { "🌙 Dark" };
                    if ui.button(label).clicked() {
                        actions.push(AppAction::ToggleDarkMode);
                    }
                });
            });

        egui::TopBottomPanel::bottom("status_bar").show(ctx, |ui| {
            if let Some(view) = self.views.get(&self.current) {
                let endpoint = self.api.describe();
                render_status_bar(
                    ui,
                    &StatusBarContext {
                        endpoint: &endpoint,
                        offline_demo: self.config.ui.offline_demo,
                        controller: view.controller(),
                        last_error: self.last_error.as_deref(),
                    },
                );
            }
        });

        egui::CentralPanel::default().show(ctx, |ui| {
            actions.extend(self.render_page(ui));
        });

        for action in actions {
            self.handle_action(action);
        }
    }

    fn on_exit(&mut self, _gl: Option<&eframe::glow::Context>) {
        for view in self.views.values_mut() {
            view.unmount();
        }
        self.snapshot_state();
        if let Err(e) = self.app_state.save() {
            tracing::warn!("Failed to save app state: {}", e);
        }
        if let Err(e) = self.config.save() {
            tracing::warn!("Failed to save config: {}", e);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::source::InMemoryDataSource;
    use std::time::Duration;

    fn app(rt: &tokio::runtime::Runtime, app_state: AppState) -> CrewDeckApp {
        CrewDeckApp::headless(
            Arc::new(InMemoryDataSource::demo()),
            rt.handle().clone(),
            AppConfig::default(),
            app_state,
        )
    }

    fn runtime() -> tokio::runtime::Runtime {
        tokio::runtime::Builder::new_multi_thread()
            .worker_threads(1)
            .enable_time()
            .build()
            .unwrap()
    }

    fn settle(app: &mut CrewDeckApp) {
        for _ in 0..200 {
            app.process_completions();
            let loading = app
                .view(app.current())
                .is_some_and(|v| v.controller().is_loading());
            if !loading {
                return;
            }
            std::thread::sleep(Duration::from_millis(5));
        }
    }

    #[test]
    fn test_restores_last_page_and_query() {
        let rt = runtime();
        let mut state = AppState::default();
        state.last_page = Some("flights".to_string());
        state.set_view_query("flights", "page=2&limit=25");

        let mut app = app(&rt, state);
        assert_eq!(app.current(), Resource::Flights);
        settle(&mut app);

        let flights = app.view(Resource::Flights).unwrap().controller();
        assert_eq!(flights.summary().label(), "Page 2 of 10 · 237 total");
        assert_eq!(flights.items().len(), 25);
    }

    #[test]
    fn test_switching_pages_persists_navigation() {
        let rt = runtime();
        let mut app = app(&rt, AppState::default());
        settle(&mut app);
        app.handle_action(AppAction::List(Resource::Crew, ListAction::SetPageSize(10)));
        settle(&mut app);
        app.handle_action(AppAction::ShowResource(Resource::Approvals));
        settle(&mut app);

        let state = app.snapshot_state();
        assert_eq!(state.last_page.as_deref(), Some("approvals"));
        assert_eq!(state.view_query("crew"), "limit=10");
    }

    #[test]
    fn test_refused_toggle_reaches_the_status_bar() {
        let rt = runtime();
        let mut app = app(&rt, AppState::default());
        settle(&mut app);

        app.handle_action(AppAction::ToggleCrewStatus("does-not-exist".to_string()));
        assert!(app
            .last_error()
            .is_some_and(|e| e.contains("does-not-exist")));

        app.handle_action(AppAction::ToggleCrewStatus("1".to_string()));
        assert!(app.last_error().is_none());
        settle(&mut app);
    }
}
