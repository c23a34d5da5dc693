//! Custom widgets for the Crew Deck UI
//!
//! Reusable pieces every list page is built from.
//!
//! # Widgets
//!
//! - [`StatusBadge`] - Colored pill for a normalized status tag
//! - [`Avatar`] - Initials in a colored circle
//! - [`list_header`] - Title row with loading spinner, refresh and history buttons
//! - [`messages`] - Fetch error, mutation error and notice banners
//! - [`client_filter_row`] - Search box plus one dropdown per profile filter
//! - [`record_table`] - Striped grid of records with a trailing action cell
//! - [`pagination_bar`] - Previous/next, page size and the "Page x of y" label

use egui::{Color32, Response, RichText, Ui, Widget};

use crate::config::AppConfig;
use crate::list::{initials_from, ListController};
use crate::resources::Resource;
use crate::types::Record;

use super::state::{AppAction, ListAction};

/// Table column: header plus a cell formatter
pub type Column = (&'static str, fn(&Record) -> String);

/// Badge color of a normalized status tag
pub fn status_color(tag: &str) -> Color32 {
    match tag {
        "active" | "approved" | "assigned" => Color32::from_rgb(60, 170, 90),
        "rejected" => Color32::from_rgb(210, 70, 70),
        "pending" => Color32::from_rgb(220, 170, 40),
        _ => Color32::GRAY,
    }
}

/// A colored status pill
pub struct StatusBadge {
    tag: &'static str,
    pending: bool,
}

impl StatusBadge {
    pub fn new(tag: &'static str) -> Self {
        Self {
            tag,
            pending: false,
        }
    }

    /// Mark the status as an unconfirmed optimistic change
    pub fn pending(mut self, pending: bool) -> Self {
        self.pending = pending;
        self
    }
}

impl Widget for StatusBadge {
    fn ui(self, ui: &mut Ui) -> Response {
        let text = if self.pending {
            format!("{} …", self.tag)
        } else {
            self.tag.to_string()
        };
        let response = egui::Frame::new()
            .fill(status_color(self.tag).gamma_multiply(0.25))
            .corner_radius(8.0)
            .inner_margin(egui::Margin::symmetric(6, 1))
            .show(ui, |ui| {
                ui.colored_label(status_color(self.tag), RichText::new(text).small());
            })
            .response;
        if self.pending {
            response.on_hover_text("Waiting for the server to confirm")
        } else {
            response
        }
    }
}

/// Initials in a small circle
pub struct Avatar {
    initials: String,
}

impl Avatar {
    pub fn new(name: &str) -> Self {
        Self {
            initials: initials_from(name),
        }
    }
}

impl Widget for Avatar {
    fn ui(self, ui: &mut Ui) -> Response {
        let size = egui::vec2(22.0, 22.0);
        let (rect, response) = ui.allocate_exact_size(size, egui::Sense::hover());
        let painter = ui.painter();
        painter.circle_filled(rect.center(), 11.0, Color32::from_rgb(70, 110, 170));
        painter.text(
            rect.center(),
            egui::Align2::CENTER_CENTER,
            &self.initials,
            egui::FontId::proportional(10.0),
            Color32::WHITE,
        );
        response
    }
}

/// Title row of a list page
pub fn list_header(ui: &mut Ui, resource: Resource, controller: &ListController) -> Vec<AppAction> {
    let mut actions = Vec::new();
    ui.horizontal(|ui| {
        ui.heading(resource.label());
        if controller.is_loading() {
            ui.spinner();
        }
        ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
            if ui.button("⟳ Refresh").clicked() {
                actions.push(AppAction::List(resource, ListAction::Refresh));
            }
            let navigation = controller.navigation();
            if ui
                .add_enabled(navigation.can_go_forward(), egui::Button::new("▶"))
                .on_hover_text("Forward")
                .clicked()
            {
                actions.push(AppAction::List(resource, ListAction::Forward));
            }
            if ui
                .add_enabled(navigation.can_go_back(), egui::Button::new("◀"))
                .on_hover_text("Back")
                .clicked()
            {
                actions.push(AppAction::List(resource, ListAction::Back));
            }
        });
    });
    actions
}

/// Error and notice banners of a list view
pub fn messages(ui: &mut Ui, resource: Resource, controller: &ListController) -> Vec<AppAction> {
    let mut actions = Vec::new();
    let state = controller.state();

    if let Some(error) = &state.error {
        ui.colored_label(Color32::LIGHT_RED, format!("⚠ {}", error));
    }

    let banner = state
        .mutation_error
        .as_ref()
        .map(|e| (Color32::LIGHT_RED, e))
        .or_else(|| state.notice.as_ref().map(|n| (Color32::LIGHT_GREEN, n)));
    if let Some((color, text)) = banner {
        ui.horizontal(|ui| {
            ui.colored_label(color, text);
            if ui.small_button("✕").clicked() {
                actions.push(AppAction::List(resource, ListAction::DismissMessages));
            }
        });
    }
    actions
}

/// Search box and dropdowns filtering the loaded page
pub fn client_filter_row(
    ui: &mut Ui,
    resource: Resource,
    controller: &ListController,
    search: &mut String,
) -> Vec<AppAction> {
    let mut actions = Vec::new();
    let filter = controller.client_filter();

    ui.horizontal(|ui| {
        let response = ui.add(
            egui::TextEdit::singleline(search)
                .hint_text("Search…")
                .desired_width(200.0),
        );
        if response.changed() {
            actions.push(AppAction::List(resource, ListAction::SetSearch(search.clone())));
        }

        for field in &controller.profile().filters {
            let selected = filter.selection(field.key).to_string();
            ui.label(field.label);
            egui::ComboBox::from_id_salt((resource.key(), field.key))
                .selected_text(&selected)
                .show_ui(ui, |ui| {
                    for option in controller.filter_options(field.key) {
                        if ui.selectable_label(option == selected, &option).clicked() {
                            actions.push(AppAction::List(
                                resource,
                                ListAction::SelectOption {
                                    key: field.key.to_string(),
                                    value: option.clone(),
                                },
                            ));
                        }
                    }
                });
        }

        if filter.is_active() && ui.button("Clear").clicked() {
            search.clear();
            actions.push(AppAction::List(resource, ListAction::ClearClientFilters));
        }
    });
    actions
}

/// Striped grid of records
///
/// `row_action` renders the last cell of each row.
pub fn record_table<F>(
    ui: &mut Ui,
    id_salt: &str,
    columns: &[Column],
    items: &[&Record],
    mut row_action: F,
) where
    F: FnMut(&mut Ui, &Record),
{
    if items.is_empty() {
        ui.vertical_centered(|ui| {
            ui.add_space(30.0);
            ui.colored_label(Color32::GRAY, "Nothing to show");
        });
        return;
    }

    egui::ScrollArea::both()
        .auto_shrink([false, false])
        .show(ui, |ui| {
            egui::Grid::new(id_salt)
                .striped(true)
                .num_columns(columns.len() + 1)
                .spacing([16.0, 6.0])
                .show(ui, |ui| {
                    for (title, _) in columns {
                        ui.strong(*title);
                    }
                    ui.label("");
                    ui.end_row();

                    for record in items {
                        for (_, cell) in columns {
                            ui.label(cell(record));
                        }
                        row_action(ui, record);
                        ui.end_row();
                    }
                });
        });
}

/// Paging controls and the summary label
pub fn pagination_bar(
    ui: &mut Ui,
    resource: Resource,
    controller: &ListController,
    config: &AppConfig,
) -> Vec<AppAction> {
    let mut actions = Vec::new();
    let summary = controller.summary();
    let fetched_all = controller.state().fetched_all;

    // Without a server total, a full page suggests there may be more
    let has_more = match controller.state().page.total_count {
        Some(_) => u64::from(summary.page) < summary.page_count,
        None => controller.items().len() >= summary.limit as usize,
    };

    ui.horizontal(|ui| {
        let paging = resource.is_paginated() && !fetched_all;
        if ui
            .add_enabled(paging && summary.page > 1, egui::Button::new("← Previous"))
            .clicked()
        {
            actions.push(AppAction::List(resource, ListAction::PreviousPage));
        }
        if ui
            .add_enabled(
                paging && !controller.is_past_end() && has_more,
                egui::Button::new("Next →"),
            )
            .clicked()
        {
            actions.push(AppAction::List(resource, ListAction::NextPage));
        }

        if paging {
            ui.label("Per page");
            egui::ComboBox::from_id_salt((resource.key(), "page_size"))
                .selected_text(summary.limit.to_string())
                .show_ui(ui, |ui| {
                    for &choice in &config.lists.page_size_choices {
                        if ui
                            .selectable_label(choice == summary.limit, choice.to_string())
                            .clicked()
                        {
                            actions.push(AppAction::List(resource, ListAction::SetPageSize(choice)));
                        }
                    }
                });
        }

        ui.separator();
        ui.label(summary.label());
        if controller.client_filter().is_active() {
            ui.label(RichText::new(format!("({} shown)", summary.shown)).weak());
        }
        if controller.is_past_end() {
            ui.colored_label(Color32::YELLOW, "Past the last page");
            if ui.small_button("Go to page 1").clicked() {
                actions.push(AppAction::List(resource, ListAction::SetPage(1)));
            }
        }
    });
    actions
}
