//! Bike Sharing Dashboard - Interactive exploration of daily and hourly rental data
//!
//! Loads the daily and hourly datasets once, then renders one of seven
//! statistical views for the selected date range.

mod charts;
mod config;
mod dashboard;
mod data;
mod gui;
mod stats;
mod views;

use config::{DashboardConfig, CONFIG_FILE};
use eframe::egui;
use gui::DashboardApp;
use std::path::Path;

fn main() -> eframe::Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let config = DashboardConfig::load(Path::new(CONFIG_FILE)).unwrap_or_else(|e| {
        log::warn!("{}; falling back to defaults", e);
        DashboardConfig::default()
    });

    // Configure native options
    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size([1400.0, 850.0])
            .with_min_inner_size([1000.0, 650.0])
            .with_title("Bike Sharing Dashboard"),
        ..Default::default()
    };

    // Run the application
    eframe::run_native(
        "Bike Sharing Dashboard",
        options,
        Box::new(|cc| Ok(Box::new(DashboardApp::new(cc, config)))),
    )
}
