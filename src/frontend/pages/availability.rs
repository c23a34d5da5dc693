//! Crew availability page
//!
//! Looks up available crew for an airport and date. The lookup lives in
//! navigation state like any other filter; the custom payload mode posts
//! a hand-written JSON body instead.

use std::collections::BTreeMap;

use egui::{Color32, RichText, Ui};

use super::Page;
use crate::frontend::state::{AppAction, ListAction, SharedState};
use crate::frontend::widgets::{client_filter_row, list_header, messages, record_table, Column};
use crate::resources::availability::{self, AvailabilityReport};
use crate::resources::{crew, Resource};

const RESOURCE: Resource = Resource::Availability;

const COLUMNS: &[Column] = &[
    ("Name", crew::display_name),
    ("Role", |r| r.text("role").unwrap_or_default()),
    ("Standby", |r| availability::standby_type(r).unwrap_or_default()),
    ("Leave", |r| availability::leave_type(r).unwrap_or_default()),
];

const PAYLOAD_TEMPLATE: &str = "{\n  \"airport\": \"BLR\",\n  \"date\": \"2025-01-01\"\n}";

pub struct AvailabilityPageState {
    search: String,
    airport: String,
    date: String,
    custom_payload: bool,
    payload: String,
    synced: Option<BTreeMap<String, String>>,
    form_error: Option<String>,
}

impl Default for AvailabilityPageState {
    fn default() -> Self {
        Self {
            search: String::new(),
            airport: String::new(),
            date: availability::today(),
            custom_payload: false,
            payload: PAYLOAD_TEMPLATE.to_string(),
            synced: None,
            form_error: None,
        }
    }
}

impl AvailabilityPageState {
    /// Prefill the airport remembered from the last session
    pub fn with_airport(mut self, airport: Option<&str>) -> Self {
        if let Some(airport) = airport {
            self.airport = airport.to_string();
        }
        self
    }

    /// Airport of the lookup form, for persistence
    pub fn airport(&self) -> Option<&str> {
        let airport = self.airport.trim();
        (!airport.is_empty()).then_some(airport)
    }

    fn sync(&mut self, filters: &BTreeMap<String, String>) {
        if self.synced.as_ref() == Some(filters) {
            return;
        }
        if let Some(airport) = filters.get("airport") {
            self.airport = airport.clone();
        }
        if let Some(date) = filters.get("date") {
            self.date = date.clone();
        }
        self.synced = Some(filters.clone());
    }

    fn lookup_action(&mut self) -> Option<AppAction> {
        if let Err(e) = availability::validate_lookup(&self.airport, &self.date) {
            self.form_error = Some(e.user_message());
            return None;
        }
        self.form_error = None;
        let filters = BTreeMap::from([
            ("airport".to_string(), self.airport.trim().to_uppercase()),
            ("date".to_string(), self.date.trim().to_string()),
        ]);
        Some(AppAction::List(RESOURCE, ListAction::SetFilters(filters)))
    }

    fn payload_action(&mut self) -> Option<AppAction> {
        match availability::parse_payload(&self.payload) {
            Ok(payload) => {
                self.form_error = None;
                Some(AppAction::List(RESOURCE, ListAction::SubmitPayload(payload)))
            }
            Err(e) => {
                self.form_error = Some(e.user_message());
                None
            }
        }
    }
}

pub struct AvailabilityPage;

impl Page for AvailabilityPage {
    type State = AvailabilityPageState;

    fn render(state: &mut Self::State, shared: &SharedState<'_>, ui: &mut Ui) -> Vec<AppAction> {
        let controller = shared.view.controller();
        state.sync(&controller.query().filters);

        let mut actions = list_header(ui, RESOURCE, controller);
        actions.extend(messages(ui, RESOURCE, controller));

        ui.horizontal(|ui| {
            ui.radio_value(&mut state.custom_payload, false, "Airport lookup");
            ui.radio_value(&mut state.custom_payload, true, "Custom payload");
        });

        if state.custom_payload {
            ui.add(
                egui::TextEdit::multiline(&mut state.payload)
                    .code_editor()
                    .desired_rows(5)
                    .desired_width(f32::INFINITY),
            );
            if ui.button("Submit").clicked() {
                actions.extend(state.payload_action());
            }
        } else {
            ui.horizontal(|ui| {
                ui.label("Airport");
                ui.add(
                    egui::TextEdit::singleline(&mut state.airport)
                        .hint_text("BLR")
                        .desired_width(50.0),
                );
                ui.label("Date");
                ui.add(
                    egui::TextEdit::singleline(&mut state.date)
                        .hint_text("YYYY-MM-DD")
                        .desired_width(90.0),
                );
                if ui.button("Check").clicked() {
                    actions.extend(state.lookup_action());
                }
            });
        }
        if let Some(error) = &state.form_error {
            ui.colored_label(Color32::LIGHT_RED, error);
        }

        let page = &controller.state().page;
        if page.summary.is_some() {
            let report = AvailabilityReport::from_page(page);
            ui.horizontal(|ui| {
                if let (Some(airport), Some(date)) = (&report.airport, &report.date) {
                    ui.strong(format!("{} on {}", airport, date));
                    ui.separator();
                }
                if let Some(based) = report.based_crew_count {
                    ui.label(format!("Based: {}", based));
                }
                if let Some(arriving) = report.arriving_crew_count {
                    ui.label(format!("Arriving: {}", arriving));
                }
                ui.label(
                    RichText::new(format!("Available: {}", report.available_crew_count)).strong(),
                );
            });
        }

        actions.extend(client_filter_row(ui, RESOURCE, controller, &mut state.search));
        ui.separator();

        let items = controller.visible_items();
        record_table(ui, "availability_grid", COLUMNS, &items, |ui, _record| {
            ui.label("");
        });
        actions
    }
}
