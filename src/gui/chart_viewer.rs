//! Chart Viewer Widget
//! Central panel showing the output of the selected view.

use crate::charts::ChartPlotter;
use crate::dashboard::Dashboard;
use crate::stats::ColumnStats;
use crate::views::{category_label, CategoryCounts, ViewOutput};
use egui::{Color32, RichText, ScrollArea};

/// Central display area; stateless, draws whatever the dashboard last rendered.
pub struct ChartViewer;

impl ChartViewer {
    pub fn show(ui: &mut egui::Ui, dashboard: &Dashboard) {
        ui.heading(RichText::new(dashboard.view().title()).size(22.0).strong());
        ui.add_space(4.0);

        let range = dashboard.range();
        ChartPlotter::draw_caption(
            ui,
            &format!(
                "{} to {} · {} daily rows · {} hourly rows",
                range.start,
                range.end,
                dashboard.filtered_daily().height(),
                dashboard.filtered_hourly().height()
            ),
        );

        if let Some(error) = dashboard.error() {
            ui.label(RichText::new(format!("Error: {}", error)).color(Color32::from_rgb(220, 53, 69)));
        }
        ui.add_space(10.0);

        ScrollArea::both()
            .auto_shrink([false, false])
            .show(ui, |ui| match dashboard.output() {
                ViewOutput::Describe(stats) => Self::draw_describe_table(ui, stats),
                ViewOutput::Categories(categories) => Self::draw_categories(ui, categories),
                ViewOutput::Correlation(matrix) => ChartPlotter::draw_heatmap(ui, matrix),
                ViewOutput::UsageDistribution(series) => {
                    ChartPlotter::draw_usage_distribution(ui, series)
                }
                ViewOutput::WeekdayAverage(points) => ChartPlotter::draw_weekday_average(ui, points),
                ViewOutput::HourlyAverage(points) => ChartPlotter::draw_hourly_average(ui, points),
                ViewOutput::Trend(trend) => {
                    ChartPlotter::draw_caption(ui, "Full hourly dataset, not date filtered");
                    ChartPlotter::draw_trend(ui, trend);
                }
                ViewOutput::Unavailable(reason) => {
                    ui.centered_and_justified(|ui| {
                        ui.label(RichText::new(reason).size(16.0).color(Color32::GRAY));
                    });
                }
            });
    }

    fn format_value(v: f64) -> String {
        if v.is_nan() {
            "NaN".to_string()
        } else {
            format!("{:.6}", v)
        }
    }

    /// Statistics as rows, columns as columns.
    fn draw_describe_table(ui: &mut egui::Ui, stats: &[ColumnStats]) {
        if stats.is_empty() {
            ui.label("No numeric columns");
            return;
        }

        type Getter = fn(&ColumnStats) -> f64;
        let rows: [(&str, Getter); 7] = [
            ("mean", |s: &ColumnStats| s.mean),
            ("std", |s: &ColumnStats| s.std),
            ("min", |s: &ColumnStats| s.min),
            ("25%", |s: &ColumnStats| s.q25),
            ("50%", |s: &ColumnStats| s.median),
            ("75%", |s: &ColumnStats| s.q75),
            ("max", |s: &ColumnStats| s.max),
        ];

        egui::Frame::none()
            .fill(ui.visuals().widgets.noninteractive.bg_fill)
            .rounding(5.0)
            .inner_margin(8.0)
            .show(ui, |ui| {
                egui::Grid::new("describe_table")
                    .striped(true)
                    .min_col_width(70.0)
                    .spacing([12.0, 4.0])
                    .show(ui, |ui| {
                        ui.label("");
                        for s in stats {
                            ui.label(RichText::new(&s.column).strong().size(12.0));
                        }
                        ui.end_row();

                        ui.label(RichText::new("count").strong().size(12.0));
                        for s in stats {
                            ui.label(RichText::new(format!("{:.1}", s.count as f64)).size(12.0));
                        }
                        ui.end_row();

                        for (name, get) in rows {
                            ui.label(RichText::new(name).strong().size(12.0));
                            for s in stats {
                                ui.label(RichText::new(Self::format_value(get(s))).size(12.0));
                            }
                            ui.end_row();
                        }
                    });
            });
    }

    fn draw_categories(ui: &mut egui::Ui, categories: &[CategoryCounts]) {
        if categories.is_empty() {
            ui.label("None of the categorical columns are present");
            return;
        }

        for category in categories {
            ui.label(
                RichText::new(format!("Distribution of column: {}", category.column))
                    .size(16.0)
                    .strong(),
            );
            ui.add_space(4.0);

            egui::Grid::new(ui.make_persistent_id(format!("counts_{}", category.column)))
                .striped(true)
                .min_col_width(80.0)
                .spacing([12.0, 4.0])
                .show(ui, |ui| {
                    ui.label(RichText::new(&category.column).strong());
                    ui.label(RichText::new("meaning").strong());
                    ui.label(RichText::new("count").strong());
                    ui.end_row();

                    for (value, count) in &category.counts {
                        ui.label(value);
                        ui.label(category_label(&category.column, value).unwrap_or("-"));
                        ui.label(count.to_string());
                        ui.end_row();
                    }
                });
            ui.add_space(15.0);
        }
    }
}
