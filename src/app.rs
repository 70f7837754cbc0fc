use eframe::egui;

use crate::state::AppState;
use crate::ui::{panels, plot};
use crate::views::{self, ComparisonView};

// ---------------------------------------------------------------------------
// eframe App implementation
// ---------------------------------------------------------------------------

pub struct CarscopeApp {
    pub state: AppState,
}

impl Default for CarscopeApp {
    fn default() -> Self {
        let mut state = AppState::default();
        state.load_default();
        Self { state }
    }
}

impl eframe::App for CarscopeApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        // A failed load halts the dashboard: one message, no partial UI.
        if let Some(message) = &self.state.load_error {
            egui::CentralPanel::default().show(ctx, |ui| {
                ui.centered_and_justified(|ui| {
                    ui.colored_label(egui::Color32::RED, format!("Error: {message}"));
                });
            });
            return;
        }

        // ---- Top panel: menu bar ----
        egui::TopBottomPanel::top("top_bar").show(ctx, |ui| {
            panels::top_bar(ui, &mut self.state);
        });

        // ---- Left side panel: filters and toggles ----
        egui::SidePanel::left("filter_panel")
            .default_width(240.0)
            .resizable(true)
            .show(ctx, |ui| {
                panels::side_panel(ui, &mut self.state);
            });

        // ---- Central panel: comparison section + composed views ----
        egui::CentralPanel::default().show(ctx, |ui| {
            let state = &mut self.state;
            let Some(dataset) = state.dataset.clone() else {
                ui.centered_and_justified(|ui| {
                    ui.heading("No dataset loaded  (File → Open…)");
                });
                return;
            };

            egui::ScrollArea::vertical()
                .auto_shrink([false, false])
                .show(ui, |ui| {
                    ui.heading("Price distribution by manufacturer");
                    panels::comparison_selectors(ui, state);

                    match views::comparison_view(&dataset, &state.visible_indices, &state.selection)
                    {
                        ComparisonView::Hidden => {}
                        ComparisonView::ChooseSecond => {
                            ui.label("Select two manufacturers to compare.");
                        }
                        ComparisonView::Chart(request) => {
                            plot::render_view(ui, state, &request);
                        }
                    }

                    ui.separator();
                    ui.heading("General market analysis");

                    for request in views::compose_views(&state.visible_indices, state.toggles) {
                        plot::render_view(ui, state, &request);
                    }
                });
        });
    }
}
