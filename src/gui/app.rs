//! Bike Dashboard Main Application
//! Main window with control panel and chart viewer.

use crate::charts::StaticChartRenderer;
use crate::config::DashboardConfig;
use crate::dashboard::Dashboard;
use crate::data::DataLoader;
use crate::gui::{ChartViewer, ControlPanel, ControlPanelAction};
use anyhow::Context;
use egui::{Color32, RichText, SidePanel};
use std::path::PathBuf;

const EXPORT_WIDTH: u32 = 1500;
const EXPORT_HEIGHT: u32 = 900;

/// Main application window.
pub struct DashboardApp {
    loader: DataLoader,
    dashboard: Option<Dashboard>,
    control_panel: ControlPanel,
    /// Startup failure; the window shows only this.
    fatal: Option<String>,
}

impl DashboardApp {
    pub fn new(_cc: &eframe::CreationContext<'_>, config: DashboardConfig) -> Self {
        let categories = config.category_columns.clone();
        let loader = DataLoader::new(config);

        let (dashboard, fatal) = match loader.load() {
            Ok(data) => (Some(Dashboard::new(data, categories)), None),
            Err(e) => {
                log::error!("Failed to load datasets: {}", e);
                (None, Some(e.to_string()))
            }
        };

        Self {
            loader,
            dashboard,
            control_panel: ControlPanel::new(),
            fatal,
        }
    }

    /// Ask for a destination and render the current chart to PNG.
    ///
    /// `Ok(None)` when the user cancelled the dialog.
    fn export_png(dashboard: &Dashboard) -> anyhow::Result<Option<PathBuf>> {
        let view = dashboard.view();
        let file_name = format!("{}.png", view.label().to_lowercase().replace(' ', "_"));

        let Some(path) = rfd::FileDialog::new()
            .add_filter("PNG Image", &["png"])
            .set_file_name(&file_name)
            .save_file()
        else {
            return Ok(None);
        };

        StaticChartRenderer::render_to_file(
            dashboard.output(),
            view.title(),
            &path,
            EXPORT_WIDTH,
            EXPORT_HEIGHT,
        )
        .with_context(|| format!("exporting {}", path.display()))?;

        log::info!("Exported {:?} to {}", view, path.display());
        Ok(Some(path))
    }

    fn show_fatal(ctx: &egui::Context, error: &str) {
        egui::CentralPanel::default().show(ctx, |ui| {
            ui.vertical_centered(|ui| {
                ui.add_space(60.0);
                ui.label(
                    RichText::new("⚠ Unable to start the dashboard")
                        .size(22.0)
                        .color(Color32::from_rgb(220, 53, 69)),
                );
                ui.add_space(10.0);
                ui.label(RichText::new(error).size(14.0));
                ui.add_space(10.0);
                ui.label(
                    RichText::new("Check the dataset paths in dashboard.json and restart.")
                        .size(12.0)
                        .color(Color32::GRAY),
                );
            });
        });
    }
}

impl eframe::App for DashboardApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        if let Some(error) = &self.fatal {
            Self::show_fatal(ctx, error);
            return;
        }

        let (Some(data), Some(dashboard)) = (self.loader.cached(), self.dashboard.as_mut()) else {
            return;
        };

        // Left panel - Control Panel
        let mut action = ControlPanelAction::None;
        SidePanel::left("control_panel")
            .min_width(260.0)
            .max_width(320.0)
            .show(ctx, |ui| {
                egui::ScrollArea::vertical().show(ui, |ui| {
                    action = self.control_panel.show(ui, dashboard);
                });
            });

        match action {
            ControlPanelAction::Dashboard(event) => {
                dashboard.handle(data, event);
            }
            ControlPanelAction::ExportPng => match Self::export_png(dashboard) {
                Ok(Some(path)) => {
                    self.control_panel
                        .set_status(&format!("Exported {}", path.display()));
                    if let Err(e) = open::that(&path) {
                        log::warn!("Could not open {}: {}", path.display(), e);
                    }
                }
                Ok(None) => {}
                Err(e) => {
                    log::error!("{:#}", e);
                    self.control_panel.set_status(&format!("Error: {:#}", e));
                }
            },
            ControlPanelAction::None => {}
        }

        // Central panel - Chart Viewer
        egui::CentralPanel::default().show(ctx, |ui| {
            ChartViewer::show(ui, dashboard);
        });
    }
}
