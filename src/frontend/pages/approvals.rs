//! Approvals page

use egui::Ui;

use super::Page;
use crate::frontend::state::{AppAction, SharedState};
use crate::frontend::widgets::{
    client_filter_row, list_header, messages, pagination_bar, record_table, Column, StatusBadge,
};
use crate::resources::approvals::Decision;
use crate::resources::Resource;

const RESOURCE: Resource = Resource::Approvals;

const COLUMNS: &[Column] = &[
    ("Requester", |r| r.text("requester").unwrap_or_default()),
    ("Type", |r| r.text("type").unwrap_or_default()),
    ("Details", |r| r.text("details").unwrap_or_default()),
];

#[derive(Default)]
pub struct ApprovalsPageState {
    search: String,
}

pub struct ApprovalsPage;

impl Page for ApprovalsPage {
    type State = ApprovalsPageState;

    fn render(state: &mut Self::State, shared: &SharedState<'_>, ui: &mut Ui) -> Vec<AppAction> {
        let controller = shared.view.controller();
        let profile = controller.profile();
        let mut actions = list_header(ui, RESOURCE, controller);
        actions.extend(messages(ui, RESOURCE, controller));
        actions.extend(client_filter_row(ui, RESOURCE, controller, &mut state.search));
        ui.separator();

        let items = controller.visible_items();
        ui.push_id("approvals_table", |ui| {
            ui.set_max_height(ui.available_height() - 32.0);
            record_table(ui, "approvals_grid", COLUMNS, &items, |ui, record| {
                let Some(id) = profile.record_id(record) else {
                    ui.label("");
                    return;
                };
                let pending = controller.pending_mutation(&id).is_some();
                ui.horizontal(|ui| {
                    ui.add(StatusBadge::new(profile.status_tag(record)).pending(pending));
                    for decision in [Decision::Approve, Decision::Reject] {
                        let enabled = !pending && decision.allowed_for(record);
                        if ui
                            .add_enabled(enabled, egui::Button::new(decision.to_string()))
                            .clicked()
                        {
                            actions.push(AppAction::Decide {
                                id: id.clone(),
                                decision,
                            });
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
