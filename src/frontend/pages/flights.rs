//! Flights page
//!
//! Date range and airline are server-side filters kept in navigation
//! state. "Load all" pulls every page for the current filters.

use std::collections::BTreeMap;

use egui::{Color32, Ui};

use super::Page;
use crate::frontend::state::{AppAction, ListAction, SharedState};
use crate::frontend::widgets::{
    client_filter_row, list_header, messages, pagination_bar, record_table, Column,
};
use crate::resources::{flights, Resource};
use crate::types::Record;

const RESOURCE: Resource = Resource::Flights;

const COLUMNS: &[Column] = &[
    ("Flight", |r| r.text_any(&["flight_no", "id"]).unwrap_or_default()),
    ("Route", flights::route_label),
    ("Date", |r| r.text("flight_date").unwrap_or_default()),
    ("Departs", |r| r.text("dep_time").unwrap_or_default()),
    ("Airline", |r| r.text("airline").unwrap_or_default()),
];

#[derive(Default)]
pub struct FlightsPageState {
    search: String,
    date_from: String,
    date_to: String,
    airline: String,
    /// Filters the form was last loaded from
    synced: Option<BTreeMap<String, String>>,
    form_error: Option<String>,
}

impl FlightsPageState {
    /// Reload the form when navigation changed underneath it
    fn sync(&mut self, filters: &BTreeMap<String, String>) {
        if self.synced.as_ref() == Some(filters) {
            return;
        }
        let get = |key: &str| filters.get(key).cloned().unwrap_or_default();
        self.date_from = get("date_from");
        self.date_to = get("date_to");
        self.airline = get("airline");
        self.synced = Some(filters.clone());
    }

    /// Validated form contents
    fn filters(&mut self) -> Option<BTreeMap<String, String>> {
        if let Err(e) = flights::validate_range(&self.date_from, &self.date_to) {
            self.form_error = Some(e.user_message());
            return None;
        }
        self.form_error = None;
        let filters = [
            ("date_from", &self.date_from),
            ("date_to", &self.date_to),
            ("airline", &self.airline),
        ]
        .into_iter()
        .filter(|(_, v)| !v.trim().is_empty())
        .map(|(k, v)| (k.to_string(), v.trim().to_string()))
        .collect();
        Some(filters)
    }
}

pub struct FlightsPage;

impl Page for FlightsPage {
    type State = FlightsPageState;

    fn render(state: &mut Self::State, shared: &SharedState<'_>, ui: &mut Ui) -> Vec<AppAction> {
        let controller = shared.view.controller();
        state.sync(&controller.query().filters);

        let mut actions = list_header(ui, RESOURCE, controller);
        actions.extend(messages(ui, RESOURCE, controller));

        ui.horizontal(|ui| {
            ui.label("From");
            ui.add(egui::TextEdit::singleline(&mut state.date_from).hint_text("YYYY-MM-DD").desired_width(90.0));
            ui.label("To");
            ui.add(egui::TextEdit::singleline(&mut state.date_to).hint_text("YYYY-MM-DD").desired_width(90.0));
            ui.label("Airline");
            ui.add(egui::TextEdit::singleline(&mut state.airline).desired_width(120.0));

            if ui.button("Apply").clicked() {
                if let Some(filters) = state.filters() {
                    actions.push(AppAction::List(RESOURCE, ListAction::SetFilters(filters)));
                }
            }
            if ui
                .button("Load all")
                .on_hover_text("Fetch every page for these filters")
                .clicked()
            {
                if let Some(filters) = state.filters() {
                    actions.push(AppAction::List(RESOURCE, ListAction::FetchAll(filters)));
                }
            }
        });
        if let Some(error) = &state.form_error {
            ui.colored_label(Color32::LIGHT_RED, error);
        }

        actions.extend(client_filter_row(ui, RESOURCE, controller, &mut state.search));
        ui.separator();

        let items = controller.visible_items();
        ui.push_id("flights_table", |ui| {
            ui.set_max_height(ui.available_height() - 32.0);
            record_table(ui, "flights_grid", COLUMNS, &items, |ui, _record: &Record| {
                ui.label("");
            });
        });

        ui.separator();
        actions.extend(pagination_bar(ui, RESOURCE, controller, shared.config));
        actions
    }
}
