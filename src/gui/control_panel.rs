//! Control Panel Widget
//! Left side panel with view navigation, date range pickers and export.

use crate::dashboard::{Dashboard, DashboardEvent};
use crate::views::View;
use egui::{Color32, RichText};
use egui_extras::DatePickerButton;

/// Actions triggered by control panel
#[derive(Debug, Clone, PartialEq)]
pub enum ControlPanelAction {
    None,
    Dashboard(DashboardEvent),
    ExportPng,
}

/// Left side control panel.
pub struct ControlPanel {
    pub status: String,
}

impl Default for ControlPanel {
    fn default() -> Self {
        Self {
            status: "Ready".to_string(),
        }
    }
}

impl ControlPanel {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set status line
    pub fn set_status(&mut self, status: &str) {
        self.status = status.to_string();
    }

    /// Draw the control panel
    pub fn show(&mut self, ui: &mut egui::Ui, dashboard: &Dashboard) -> ControlPanelAction {
        let mut action = ControlPanelAction::None;

        // Title
        ui.vertical_centered(|ui| {
            ui.add_space(5.0);
            ui.label(
                RichText::new("🚲 Bike Sharing")
                    .size(22.0)
                    .color(Color32::from_rgb(100, 149, 237)),
            );
            ui.label(
                RichText::new("Analysis Navigation")
                    .size(11.0)
                    .color(Color32::GRAY),
            );
        });
        ui.add_space(10.0);
        ui.separator();
        ui.add_space(5.0);

        // ===== View Section =====
        ui.label(RichText::new("📊 Choose an analysis").size(14.0).strong());
        ui.add_space(5.0);

        let current = dashboard.view();
        for view in View::ALL {
            if ui.radio(current == view, view.label()).clicked() && view != current {
                action = ControlPanelAction::Dashboard(DashboardEvent::ViewSelected(view));
            }
        }

        ui.add_space(15.0);
        ui.separator();
        ui.add_space(10.0);

        // ===== Date Range Section =====
        ui.label(RichText::new("📅 Date Range").size(14.0).strong());
        ui.add_space(5.0);

        let range = dashboard.range();
        let label_width = 80.0;

        let mut start = range.start;
        ui.horizontal(|ui| {
            ui.add_sized([label_width, 20.0], egui::Label::new("Start date:"));
            ui.push_id("start_date", |ui| ui.add(DatePickerButton::new(&mut start)));
        });
        if start != range.start {
            action = ControlPanelAction::Dashboard(DashboardEvent::StartDateChanged(start));
        }

        let mut end = range.end;
        ui.horizontal(|ui| {
            ui.add_sized([label_width, 20.0], egui::Label::new("End date:"));
            ui.push_id("end_date", |ui| ui.add(DatePickerButton::new(&mut end)));
        });
        if end != range.end {
            action = ControlPanelAction::Dashboard(DashboardEvent::EndDateChanged(end));
        }

        ui.add_space(5.0);
        ui.add_enabled_ui(range != dashboard.default_range(), |ui| {
            if ui.small_button("Reset range").clicked() {
                action = ControlPanelAction::Dashboard(DashboardEvent::ResetRange);
            }
        });

        if dashboard.range_is_inverted() {
            ui.add_space(5.0);
            ui.label(
                RichText::new("⚠ Start date is after end date: no rows selected")
                    .size(11.0)
                    .color(Color32::from_rgb(243, 156, 18)),
            );
        }

        ui.add_space(5.0);
        ui.label(
            RichText::new(format!(
                "{} daily rows, {} hourly rows",
                dashboard.filtered_daily().height(),
                dashboard.filtered_hourly().height()
            ))
            .size(11.0)
            .color(Color32::GRAY),
        );

        ui.add_space(15.0);
        ui.separator();
        ui.add_space(10.0);

        // ===== Export =====
        ui.vertical_centered(|ui| {
            ui.add_enabled_ui(current.is_chart(), |ui| {
                let button = egui::Button::new(RichText::new("🖼 Export PNG").size(14.0))
                    .min_size(egui::vec2(150.0, 30.0));
                if ui.add(button).clicked() {
                    action = ControlPanelAction::ExportPng;
                }
            });
        });

        ui.add_space(10.0);

        let status_color = if self.status.contains("Error") {
            Color32::from_rgb(220, 53, 69)
        } else if self.status.contains("Exported") {
            Color32::from_rgb(40, 167, 69)
        } else {
            Color32::GRAY
        };
        ui.label(RichText::new(&self.status).size(11.0).color(status_color));

        ui.add_space(10.0);
        ui.separator();
        ui.label(
            RichText::new("Use the sidebar to pick an analysis or visualization.")
                .size(11.0)
                .italics()
                .color(Color32::GRAY),
        );

        action
    }
}
