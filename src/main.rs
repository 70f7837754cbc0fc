mod app;
mod color;
mod data;
mod state;
mod ui;
mod views;

use app::CarscopeApp;
use eframe::egui;

fn main() -> eframe::Result {
    env_logger::init();

    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size([1280.0, 860.0])
            .with_min_inner_size([700.0, 480.0]),
        ..Default::default()
    };

    eframe::run_native(
        "Carscope – Vehicle Market Explorer",
        options,
        Box::new(|_cc| Ok(Box::new(CarscopeApp::default()))),
    )
}
