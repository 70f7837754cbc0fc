use eframe::egui::{self, Ui};
use egui_extras::{Column, TableBuilder};

use crate::state::AppState;

// ---------------------------------------------------------------------------
// Listing table (data viewer)
// ---------------------------------------------------------------------------

/// Render the filtered listings as a tabular grid.
pub fn listing_table(ui: &mut Ui, state: &AppState, rows: &[usize]) {
    let Some(dataset) = &state.dataset else {
        return;
    };

    ui.push_id("listing_table", |ui| {
        TableBuilder::new(ui)
            .striped(true)
            .resizable(true)
            .cell_layout(egui::Layout::left_to_right(egui::Align::Center))
            .column(Column::auto().at_least(180.0)) // model
            .column(Column::auto().at_least(60.0)) // year
            .column(Column::auto().at_least(80.0)) // price
            .column(Column::auto().at_least(90.0)) // odometer
            .column(Column::auto().at_least(90.0)) // condition
            .column(Column::remainder()) // manufacturer
            .max_scroll_height(360.0)
            .header(20.0, |mut header| {
                header.col(|ui| {
                    ui.strong("Model");
                });
                header.col(|ui| {
                    ui.strong("Year");
                });
                header.col(|ui| {
                    ui.strong("Price");
                });
                header.col(|ui| {
                    ui.strong("Odometer");
                });
                header.col(|ui| {
                    ui.strong("Condition");
                });
                header.col(|ui| {
                    ui.strong("Manufacturer");
                });
            })
            .body(|body| {
                body.rows(18.0, rows.len(), |mut row| {
                    let listing = &dataset.listings[rows[row.index()]];
                    row.col(|ui| {
                        ui.label(&listing.model);
                    });
                    row.col(|ui| {
                        let year = if listing.model_year == 0 {
                            "n/a".to_string()
                        } else {
                            listing.model_year.to_string()
                        };
                        ui.label(year);
                    });
                    row.col(|ui| {
                        ui.label(format!("{:.0}", listing.price));
                    });
                    row.col(|ui| {
                        ui.label(format!("{:.0}", listing.odometer));
                    });
                    row.col(|ui| {
                        ui.label(&listing.condition);
                    });
                    row.col(|ui| {
                        ui.label(listing.manufacturer.to_string());
                    });
                });
            });
    });
}
