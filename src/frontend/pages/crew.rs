//! Crew members page
//!
//! Paginated crew list with search, role/status dropdowns and an
//! optimistic activate/deactivate toggle per row.

use egui::Ui;

use super::Page;
use crate::frontend::state::{AppAction, SharedState};
use crate::frontend::widgets::{
    client_filter_row, list_header, messages, pagination_bar, record_table, Avatar, Column,
    StatusBadge,
};
use crate::resources::{crew, Resource};
use crate::types::Record;

const RESOURCE: Resource = Resource::Crew;

fn text_or_dash(record: &Record, field: &str) -> String {
    record.text(field).unwrap_or_else(|| "-".to_string())
}

const COLUMNS: &[Column] = &[
    ("Name", crew::display_name),
    ("Code", |r| text_or_dash(r, "crew_code")),
    ("Role", |r| text_or_dash(r, "role")),
    ("Base", |r| crew::base_airport(r).unwrap_or_else(|| "-".to_string())),
    ("Qualifications", |r| text_or_dash(r, "qualifications")),
];

#[derive(Default)]
pub struct CrewPageState {
    search: String,
}

pub struct CrewPage;

impl Page for CrewPage {
    type State = CrewPageState;

    fn render(state: &mut Self::State, shared: &SharedState<'_>, ui: &mut Ui) -> Vec<AppAction> {
        let controller = shared.view.controller();
        let profile = controller.profile();
        let mut actions = list_header(ui, RESOURCE, controller);
        actions.extend(messages(ui, RESOURCE, controller));
        actions.extend(client_filter_row(ui, RESOURCE, controller, &mut state.search));
        ui.separator();

        let items = controller.visible_items();
        ui.push_id("crew_table", |ui| {
            ui.set_max_height(ui.available_height() - 32.0);
            record_table(ui, "crew_grid", COLUMNS, &items, |ui, record| {
                ui.horizontal(|ui| {
                    ui.add(Avatar::new(&crew::display_name(record)));
                    let tag = profile.status_tag(record);
                    let id = profile.record_id(record);
                    let pending = id
                        .as_deref()
                        .is_some_and(|id| controller.pending_mutation(id).is_some());
                    ui.add(StatusBadge::new(tag).pending(pending));

                    let label = if tag == "active" { "Deactivate" } else { "Activate" };
                    if let Some(id) = id {
                        if ui.add_enabled(!pending, egui::Button::new(label)).clicked() {
                            actions.push(AppAction::ToggleCrewStatus(id));
                        }
                    }
                });
            });
        });

        ui.separator();
        actions.extend(pagination_bar(ui, RESOURCE, controller, shared.config));
        actions
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_columns_tolerate_missing_fields() {
        let record = Record::new().with("name", "Ravi Menon");
        let cells: Vec<String> = COLUMNS.iter().map(|(_, cell)| cell(&record)).collect();
        assert_eq!(cells, vec!["Ravi Menon", "-", "-", "-", "-"]);
    }
}
