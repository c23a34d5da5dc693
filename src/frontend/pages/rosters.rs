//! Rosters page
//!
//! Unpaginated assignment list plus the manual assign form and automatic
//! roster creation. Both forms reload the list once the server accepts.

use egui::{Color32, Ui};

use super::Page;
use crate::frontend::state::{AppAction, SharedState};
use crate::frontend::widgets::{
    client_filter_row, list_header, messages, pagination_bar, record_table, Column, StatusBadge,
};
use crate::resources::rosters::AssignRequest;
use crate::resources::Resource;
use crate::types::Record;

const RESOURCE: Resource = Resource::Rosters;

const COLUMNS: &[Column] = &[
    ("Flight", |r| r.text("flight_id").unwrap_or_default()),
    ("Crew", |r| {
        r.text_any(&["crew_name", "crew_id"]).unwrap_or_default()
    }),
    ("Role", |r| r.text("role_on_flight").unwrap_or_default()),
    ("Base", |r| {
        r.text_any(&["base_airport", "base"]).unwrap_or_default()
    }),
    ("Roster", |r| r.text("roster_name").unwrap_or_default()),
];

#[derive(Default)]
pub struct RostersPageState {
    search: String,
    flight_id: String,
    crew_id: String,
    role: String,
    create_base: String,
    create_flight: String,
    form_error: Option<String>,
}

impl RostersPageState {
    fn assign_action(&mut self) -> Option<AppAction> {
        match AssignRequest::new(&self.flight_id, &self.crew_id, &self.role) {
            Ok(request) => {
                self.form_error = None;
                Some(AppAction::AssignRoster(request))
            }
            Err(e) => {
                self.form_error = Some(e.user_message());
                None
            }
        }
    }

    fn create_action(&mut self) -> Option<AppAction> {
        if self.create_base.trim().is_empty() || self.create_flight.trim().is_empty() {
            self.form_error = Some("Base airport and flight are required".to_string());
            return None;
        }
        self.form_error = None;
        Some(AppAction::CreateRoster {
            base: self.create_base.trim().to_uppercase(),
            flight_id: self.create_flight.trim().to_string(),
        })
    }
}

pub struct RostersPage;

impl Page for RostersPage {
    type State = RostersPageState;

    fn render(state: &mut Self::State, shared: &SharedState<'_>, ui: &mut Ui) -> Vec<AppAction> {
        let controller = shared.view.controller();
        let profile = controller.profile();
        let mut actions = list_header(ui, RESOURCE, controller);
        actions.extend(messages(ui, RESOURCE, controller));

        ui.collapsing("Assign crew", |ui| {
            ui.horizontal(|ui| {
                ui.label("Flight ID");
                ui.add(egui::TextEdit::singleline(&mut state.flight_id).desired_width(70.0));
                ui.label("Crew ID");
                ui.add(egui::TextEdit::singleline(&mut state.crew_id).desired_width(70.0));
                ui.label("Role");
                ui.add(
                    egui::TextEdit::singleline(&mut state.role)
                        .hint_text("Crew")
                        .desired_width(110.0),
                );
                if ui.button("Assign").clicked() {
                    actions.extend(state.assign_action());
                }
            });
        });
        ui.collapsing("Create roster automatically", |ui| {
            ui.horizontal(|ui| {
                ui.label("Base");
                ui.add(
                    egui::TextEdit::singleline(&mut state.create_base)
                        .hint_text("BLR")
                        .desired_width(50.0),
                );
                ui.label("Flight ID");
                ui.add(egui::TextEdit::singleline(&mut state.create_flight).desired_width(70.0));
                if ui.button("Create").clicked() {
                    actions.extend(state.create_action());
                }
            });
        });
        if let Some(error) = &state.form_error {
            ui.colored_label(Color32::LIGHT_RED, error);
        }

        actions.extend(client_filter_row(ui, RESOURCE, controller, &mut state.search));
        ui.separator();

        let items = controller.visible_items();
        ui.push_id("rosters_table", |ui| {
            ui.set_max_height(ui.available_height() - 32.0);
            record_table(ui, "rosters_grid", COLUMNS, &items, |ui, record: &Record| {
                ui.add(StatusBadge::new(profile.status_tag(record)));
            });
        });

        ui.separator();
        actions.extend(pagination_bar(ui, RESOURCE, controller, shared.config));
        actions
    }
}
