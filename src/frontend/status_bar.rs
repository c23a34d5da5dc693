//! Status bar panel: bottom bar showing the API endpoint, the active view's
//! request state and the last app-level error.

use egui::{Color32, RichText, Ui};

use crate::list::ListController;

/// Context needed to render the status bar.
pub struct StatusBarContext<'a> {
    /// Endpoint description of the roster API
    pub endpoint: &'a str,
    pub offline_demo: bool,
    pub controller: &'a ListController,
    pub last_error: Option<&'a str>,
}

/// Render the status bar.
pub fn render_status_bar(ui: &mut Ui, ctx: &StatusBarContext<'_>) {
    ui.horizontal(|ui| {
        ui.spacing_mut().item_spacing.x = 8.0;

        let (color, mode) = if ctx.offline_demo {
            (Color32::YELLOW, "Offline demo")
        } else {
            (Color32::GREEN, "API")
        };
        ui.colored_label(color, "●");
        ui.label(RichText::new(format!("{}: {}", mode, ctx.endpoint)).small());

        ui.separator();

        let controller = ctx.controller;
        let (state_color, state_text) = if controller.is_loading() {
            (Color32::YELLOW, "Loading")
        } else if controller.error().is_some() {
            let label = controller
                .state()
                .error_category
                .map_or("Failed", |category| category.label());
            (Color32::LIGHT_RED, label)
        } else {
            (Color32::GRAY, "Idle")
        };
        ui.colored_label(state_color, RichText::new(state_text).small());

        ui.separator();

        let summary = controller.summary();
        ui.label(RichText::new(format!("Loaded: {}", controller.items().len())).small());
        ui.label(RichText::new(format!("Total: {}", summary.total)).small());

        if let Some(error) = ctx.last_error {
            ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                ui.colored_label(Color32::RED, RichText::new(error).small());
            });
        }
    });
}
