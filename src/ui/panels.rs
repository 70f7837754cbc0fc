use eframe::egui::{self, RichText, Slider, Ui};

use crate::state::AppState;

// ---------------------------------------------------------------------------
// Left side panel – global filters and view toggles
// ---------------------------------------------------------------------------

/// Render the left filter panel.
pub fn side_panel(ui: &mut Ui, state: &mut AppState) {
    ui.heading("Filters");
    ui.separator();

    if state.dataset.is_none() {
        ui.label("No dataset loaded.");
        return;
    }

    // ---- Model-year range ----
    ui.strong("Model year");
    let (min_year, max_year) = state.slider_bounds;
    let mut low = state.year_range.low;
    let mut high = state.year_range.high;
    let mut changed = false;
    changed |= ui
        .add(Slider::new(&mut low, min_year..=max_year).text("from"))
        .changed();
    changed |= ui
        .add(Slider::new(&mut high, min_year..=max_year).text("to"))
        .changed();
    if changed {
        state.set_year_range(low, high);
    }

    ui.separator();

    // ---- View toggles ----
    ui.strong("Views");
    ui.checkbox(&mut state.toggles.histogram, "Odometer histogram");
    ui.checkbox(&mut state.toggles.scatter, "Price vs odometer scatter");
    ui.checkbox(&mut state.toggles.table, "Data viewer");

    ui.separator();

    if let Some(status) = state.status_line() {
        ui.label(RichText::new(status).italics());
    }
}

// ---------------------------------------------------------------------------
// Manufacturer comparison selectors
// ---------------------------------------------------------------------------

/// Sentinel label for the "none selected" option.
const NONE_LABEL: &str = "(none)";

/// Render the two manufacturer combo boxes over the filtered options.
pub fn comparison_selectors(ui: &mut Ui, state: &mut AppState) {
    let options = state.manufacturer_options.clone();
    manufacturer_combo(
        ui,
        "manufacturer_1",
        "Manufacturer 1:",
        &options,
        &mut state.selection.first,
    );
    manufacturer_combo(
        ui,
        "manufacturer_2",
        "Manufacturer 2:",
        &options,
        &mut state.selection.second,
    );
}

fn manufacturer_combo(
    ui: &mut Ui,
    id: &str,
    label: &str,
    options: &[String],
    pick: &mut Option<String>,
) {
    ui.horizontal(|ui| {
        ui.label(label);
        egui::ComboBox::from_id_salt(id)
            .selected_text(pick.as_deref().unwrap_or(NONE_LABEL).to_string())
            .show_ui(ui, |ui| {
                // Sentinel first, then the sorted filtered options.
                if ui.selectable_label(pick.is_none(), NONE_LABEL).clicked() {
                    *pick = None;
                }
                for option in options {
                    let selected = pick.as_deref() == Some(option.as_str());
                    if ui.selectable_label(selected, option).clicked() {
                        *pick = Some(option.clone());
                    }
                }
            });
    });
}

// ---------------------------------------------------------------------------
// Top bar
// ---------------------------------------------------------------------------

/// Render the top menu / toolbar.
pub fn top_bar(ui: &mut Ui, state: &mut AppState) {
    egui::menu::bar(ui, |ui| {
        ui.menu_button("File", |ui| {
            if ui.button("Open…").clicked() {
                open_file_dialog(state);
                ui.close_menu();
            }
        });

        ui.separator();

        if let Some(dataset) = &state.dataset {
            ui.label(format!(
                "{} listings loaded, {} in the current year range",
                dataset.len(),
                state.visible_indices.len()
            ));
        }
    });
}

// ---------------------------------------------------------------------------
// File dialog
// ---------------------------------------------------------------------------

pub fn open_file_dialog(state: &mut AppState) {
    let file = rfd::FileDialog::new()
        .set_title("Open vehicle listings")
        .add_filter("Supported files", &["csv", "json", "parquet", "pq"])
        .add_filter("CSV", &["csv"])
        .add_filter("JSON", &["json"])
        .add_filter("Parquet", &["parquet", "pq"])
        .pick_file();

    if let Some(path) = file {
        state.load_from(&path);
    }
}
