//! Chart Plotter Module
//! Creates interactive visualizations of view outputs using egui_plot.

use crate::stats::CorrelationMatrix;
use crate::views::{weekday_label, AveragePoint, DistributionSeries, TrendSeries};
use egui::{Align2, Color32, FontId, RichText, Sense, Stroke};
use egui_plot::{Bar, BarChart, GridMark, Legend, Line, Plot, PlotPoints, Points};

pub const CASUAL_COLOR: Color32 = Color32::from_rgb(52, 152, 219); // Blue
pub const REGISTERED_COLOR: Color32 = Color32::from_rgb(243, 156, 18); // Orange
pub const LINE_COLOR: Color32 = Color32::from_rgb(231, 76, 60); // Red
pub const AREA_COLOR: Color32 = Color32::from_rgb(255, 165, 0); // Orange
pub const TREND_CASUAL_COLOR: Color32 = Color32::from_rgb(135, 206, 235); // Sky blue

const CHART_HEIGHT: f32 = 420.0;
const HEATMAP_LABEL_WIDTH: f32 = 90.0;
const HEATMAP_MAX_CELL: f32 = 60.0;

/// Diverging blue-white-red scale for a value in [-1, 1]. NaN maps to grey.
pub fn coolwarm(value: f64) -> (u8, u8, u8) {
    if value.is_nan() {
        return (200, 200, 200);
    }

    const COLD: (f64, f64, f64) = (59.0, 76.0, 192.0);
    const MID: (f64, f64, f64) = (221.0, 221.0, 221.0);
    const WARM: (f64, f64, f64) = (180.0, 4.0, 38.0);

    let v = value.clamp(-1.0, 1.0);
    let (from, to, t) = if v < 0.0 {
        (COLD, MID, v + 1.0)
    } else {
        (MID, WARM, v)
    };
    let lerp = |a: f64, b: f64| (a + (b - a) * t).round() as u8;
    (lerp(from.0, to.0), lerp(from.1, to.1), lerp(from.2, to.2))
}

/// Creates dashboard charts using egui_plot.
pub struct ChartPlotter;

impl ChartPlotter {
    /// One grid mark per integer in `lo..=hi`.
    fn integer_marks(lo: i64, hi: i64) -> Vec<GridMark> {
        (lo..=hi)
            .map(|v| GridMark {
                value: v as f64,
                step_size: 1.0,
            })
            .collect()
    }

    /// Annotated correlation heatmap painted cell by cell.
    pub fn draw_heatmap(ui: &mut egui::Ui, matrix: &CorrelationMatrix) {
        let n = matrix.columns.len();
        if n == 0 {
            ui.label("No numeric columns");
            return;
        }

        let cell = ((ui.available_width() - HEATMAP_LABEL_WIDTH) / n as f32)
            .clamp(20.0, HEATMAP_MAX_CELL);
        let header_h = 18.0;
        let size = egui::vec2(
            HEATMAP_LABEL_WIDTH + cell * n as f32,
            header_h + cell * n as f32,
        );
        let (rect, response) = ui.allocate_exact_size(size, Sense::hover());
        let painter = ui.painter_at(rect);
        let text_color = ui.visuals().text_color();
        let label_font = FontId::proportional(10.0);
        let value_font = FontId::proportional((cell * 0.25).clamp(8.0, 12.0));

        let origin = rect.min + egui::vec2(HEATMAP_LABEL_WIDTH, header_h);

        for (j, name) in matrix.columns.iter().enumerate() {
            let pos = egui::pos2(origin.x + cell * (j as f32 + 0.5), rect.min.y + header_h / 2.0);
            painter.text(pos, Align2::CENTER_CENTER, name, label_font.clone(), text_color);
        }

        for (i, row) in matrix.values.iter().enumerate() {
            let label_pos = egui::pos2(rect.min.x + HEATMAP_LABEL_WIDTH - 4.0, origin.y + cell * (i as f32 + 0.5));
            painter.text(
                label_pos,
                Align2::RIGHT_CENTER,
                &matrix.columns[i],
                label_font.clone(),
                text_color,
            );

            for (j, &value) in row.iter().enumerate() {
                let min = origin + egui::vec2(cell * j as f32, cell * i as f32);
                let cell_rect = egui::Rect::from_min_size(min, egui::vec2(cell, cell));
                let (r, g, b) = coolwarm(value);
                painter.rect_filled(cell_rect, 0.0, Color32::from_rgb(r, g, b));
                painter.rect_stroke(cell_rect, 0.0, Stroke::new(0.5, Color32::WHITE));

                let annotation = if value.is_nan() {
                    "nan".to_string()
                } else {
                    format!("{:.2}", value)
                };
                let value_color = if value.abs() > 0.6 {
                    Color32::WHITE
                } else {
                    Color32::BLACK
                };
                painter.text(
                    cell_rect.center(),
                    Align2::CENTER_CENTER,
                    annotation,
                    value_font.clone(),
                    value_color,
                );
            }
        }

        if let Some(pos) = response.hover_pos() {
            let offset = pos - origin;
            if offset.x >= 0.0 && offset.y >= 0.0 {
                let (i, j) = ((offset.y / cell) as usize, (offset.x / cell) as usize);
                if i < n && j < n {
                    response.on_hover_text(format!(
                        "{} × {}: {:.4}",
                        matrix.columns[i], matrix.columns[j], matrix.values[i][j]
                    ));
                }
            }
        }
    }

    /// Overlaid histograms with their KDE curves.
    pub fn draw_usage_distribution(ui: &mut egui::Ui, series: &[DistributionSeries]) {
        Plot::new("usage_distribution")
            .height(CHART_HEIGHT)
            .legend(Legend::default())
            .x_axis_label("Number of rentals")
            .y_axis_label("Frequency")
            .allow_scroll(false)
            .include_y(0.0)
            .show(ui, |plot_ui| {
                for (idx, s) in series.iter().enumerate() {
                    let color = if idx == 0 {
                        CASUAL_COLOR
                    } else {
                        REGISTERED_COLOR
                    };
                    let width = s.histogram.bin_width();
                    let bars: Vec<Bar> = s
                        .histogram
                        .centers()
                        .into_iter()
                        .zip(&s.histogram.counts)
                        .map(|(x, &count)| Bar::new(x, count as f64).width(width))
                        .collect();

                    plot_ui.bar_chart(
                        BarChart::new(bars)
                            .color(color.gamma_multiply(0.5))
                            .name(&s.name),
                    );
                    plot_ui.line(
                        Line::new(PlotPoints::from(s.kde.clone()))
                            .color(color)
                            .width(2.0)
                            .name(&s.name),
                    );
                }
            });
    }

    /// Mean rentals per weekday as a line with markers.
    pub fn draw_weekday_average(ui: &mut egui::Ui, points: &[AveragePoint]) {
        let xy: Vec<[f64; 2]> = points.iter().map(|p| [p.key as f64, p.mean]).collect();

        Plot::new("weekday_average")
            .height(CHART_HEIGHT)
            .x_axis_label("Day of the week")
            .y_axis_label("Average rentals")
            .allow_scroll(false)
            .include_x(-0.5)
            .include_x(6.5)
            .include_y(0.0)
            .x_grid_spacer(|_input| Self::integer_marks(0, 6))
            .x_axis_formatter(|mark, _range| {
                let v = mark.value;
                if (0.0..=6.0).contains(&v) && v.fract() == 0.0 {
                    weekday_label(v as i64)
                } else {
                    String::new()
                }
            })
            .show(ui, |plot_ui| {
                plot_ui.line(
                    Line::new(PlotPoints::from(xy.clone()))
                        .color(CASUAL_COLOR)
                        .width(2.0)
                        .name("Average"),
                );
                plot_ui.points(
                    Points::new(PlotPoints::from(xy))
                        .radius(5.0)
                        .color(CASUAL_COLOR),
                );
            });
    }

    /// Mean rentals per hour as a filled area under a line with markers.
    pub fn draw_hourly_average(ui: &mut egui::Ui, points: &[AveragePoint]) {
        let xy: Vec<[f64; 2]> = points.iter().map(|p| [p.key as f64, p.mean]).collect();

        Plot::new("hourly_average")
            .height(CHART_HEIGHT)
            .x_axis_label("Hour of the day")
            .y_axis_label("Average rentals")
            .allow_scroll(false)
            .include_x(0.0)
            .include_x(23.0)
            .include_y(0.0)
            .x_grid_spacer(|_input| Self::integer_marks(0, 23))
            .show(ui, |plot_ui| {
                plot_ui.line(
                    Line::new(PlotPoints::from(xy.clone()))
                        .color(AREA_COLOR.gamma_multiply(0.7))
                        .fill(0.0)
                        .name("Area"),
                );
                plot_ui.line(
                    Line::new(PlotPoints::from(xy.clone()))
                        .color(LINE_COLOR)
                        .width(2.0)
                        .name("Average"),
                );
                plot_ui.points(Points::new(PlotPoints::from(xy)).radius(4.0).color(LINE_COLOR));
            });
    }

    /// Stacked areas: casual at the bottom, registered on top of it.
    pub fn draw_trend(ui: &mut egui::Ui, trend: &TrendSeries) {
        let total: Vec<[f64; 2]> = trend
            .time
            .iter()
            .zip(&trend.total)
            .map(|(&t, &v)| [t, v])
            .collect();
        let casual: Vec<[f64; 2]> = trend
            .time
            .iter()
            .zip(&trend.casual)
            .map(|(&t, &v)| [t, v])
            .collect();

        Plot::new("casual_registered_trend")
            .height(CHART_HEIGHT)
            .legend(Legend::default())
            .x_axis_label("Date")
            .y_axis_label("Rentals")
            .allow_scroll(false)
            .include_y(0.0)
            .x_axis_formatter(|mark, _range| {
                TrendSeries::date_at(mark.value)
                    .map(|d| d.format("%Y-%m-%d").to_string())
                    .unwrap_or_default()
            })
            .show(ui, |plot_ui| {
                // Total first so the casual band paints over its lower part
                plot_ui.line(
                    Line::new(PlotPoints::from(total))
                        .color(REGISTERED_COLOR.gamma_multiply(0.6))
                        .fill(0.0)
                        .name("Registered"),
                );
                plot_ui.line(
                    Line::new(PlotPoints::from(casual))
                        .color(TREND_CASUAL_COLOR)
                        .fill(0.0)
                        .name("Casual"),
                );
            });
    }

    /// Small caption under a chart.
    pub fn draw_caption(ui: &mut egui::Ui, text: &str) {
        ui.label(RichText::new(text).size(11.0).color(Color32::GRAY));
    }
}
