//! Static Chart Renderer
//! Draws chart view outputs into PNG files with plotters.
//!
//! Layout per chart: caption on top, axes with descriptions, legend in the
//! upper right corner when the chart has more than one series.

use crate::charts::coolwarm;
use crate::stats::CorrelationMatrix;
use crate::views::{weekday_label, AveragePoint, DistributionSeries, TrendSeries, ViewOutput};
use plotters::prelude::*;
use plotters::style::text_anchor::{HPos, Pos, VPos};
use std::path::Path;
use thiserror::Error;

const CASUAL: RGBColor = RGBColor(52, 152, 219);
const REGISTERED: RGBColor = RGBColor(243, 156, 18);
const LINE: RGBColor = RGBColor(231, 76, 60);
const AREA: RGBColor = RGBColor(255, 165, 0);
const SKY_BLUE: RGBColor = RGBColor(135, 206, 235);

const FONT: &str = "sans-serif";

#[derive(Error, Debug)]
pub enum RenderError {
    #[error("This view is a table and cannot be exported as an image")]
    NotAChart,
    #[error("Nothing to draw: {0}")]
    Empty(String),
    #[error("Drawing failed: {0}")]
    Drawing(String),
}

type DrawResult = Result<(), Box<dyn std::error::Error>>;

pub struct StaticChartRenderer;

impl StaticChartRenderer {
    /// Render a chart output to a PNG at `path`.
    pub fn render_to_file(
        output: &ViewOutput,
        title: &str,
        path: &Path,
        width: u32,
        height: u32,
    ) -> Result<(), RenderError> {
        // The bitmap backend writes its file when dropped, so reject before creating it
        match output {
            ViewOutput::Describe(_) | ViewOutput::Categories(_) => {
                return Err(RenderError::NotAChart)
            }
            ViewOutput::Unavailable(reason) => return Err(RenderError::Empty(reason.clone())),
            ViewOutput::Correlation(matrix) if matrix.columns.is_empty() => {
                return Err(RenderError::Empty("no numeric columns".into()))
            }
            ViewOutput::UsageDistribution(series) if series.is_empty() => {
                return Err(RenderError::Empty("no series".into()))
            }
            ViewOutput::Trend(trend) if trend.is_empty() => {
                return Err(RenderError::Empty("no dated rows".into()))
            }
            _ => {}
        }

        let root = BitMapBackend::new(path, (width, height)).into_drawing_area();

        let drawn = match output {
            ViewOutput::Describe(_) | ViewOutput::Categories(_) | ViewOutput::Unavailable(_) => {
                Err(Box::new(RenderError::NotAChart) as Box<dyn std::error::Error>)
            }
            ViewOutput::Correlation(matrix) => Self::draw_heatmap(&root, title, matrix),
            ViewOutput::UsageDistribution(series) => {
                Self::draw_usage_distribution(&root, title, series)
            }
            ViewOutput::WeekdayAverage(points) => Self::draw_weekday_average(&root, title, points),
            ViewOutput::HourlyAverage(points) => Self::draw_hourly_average(&root, title, points),
            ViewOutput::Trend(trend) => Self::draw_trend(&root, title, trend),
        };

        drawn
            .and_then(|()| root.present().map_err(Into::into))
            .map_err(|e| RenderError::Drawing(e.to_string()))
    }

    fn y_max(values: impl Iterator<Item = f64>) -> f64 {
        let max = values.filter(|v| v.is_finite()).fold(0.0, f64::max);
        if max > 0.0 {
            max * 1.1
        } else {
            1.0
        }
    }

    fn draw_heatmap<DB: DrawingBackend>(
        root: &DrawingArea<DB, plotters::coord::Shift>,
        title: &str,
        matrix: &CorrelationMatrix,
    ) -> DrawResult
    where
        DB::ErrorType: 'static,
    {
        let n = matrix.columns.len();
        if n == 0 {
            return Err(Box::new(RenderError::Empty("no numeric columns".into())));
        }
        root.fill(&WHITE)?;

        let size = n as f64;
        let mut chart = ChartBuilder::on(root)
            .caption(title, (FONT, 26))
            .margin(20)
            .x_label_area_size(40)
            .y_label_area_size(110)
            .build_cartesian_2d(0f64..size, 0f64..size)?;

        let cell_font = (FONT, 13).into_font().color(&BLACK);
        let centered = Pos::new(HPos::Center, VPos::Center);

        for (i, row) in matrix.values.iter().enumerate() {
            // Row 0 at the top
            let y = size - 1.0 - i as f64;
            for (j, &value) in row.iter().enumerate() {
                let x = j as f64;
                let (r, g, b) = coolwarm(value);
                chart.draw_series(std::iter::once(Rectangle::new(
                    [(x, y), (x + 1.0, y + 1.0)],
                    RGBColor(r, g, b).filled(),
                )))?;

                let annotation = if value.is_nan() {
                    "nan".to_string()
                } else {
                    format!("{:.2}", value)
                };
                let color = if value.abs() > 0.6 { &WHITE } else { &BLACK };
                chart.draw_series(std::iter::once(Text::new(
                    annotation,
                    (x + 0.5, y + 0.5),
                    cell_font.clone().color(color).pos(centered),
                )))?;
            }
        }

        // Axis labels drawn on the root so they sit outside the plotting area
        let label_font = (FONT, 13).into_font().color(&BLACK);
        for (k, name) in matrix.columns.iter().enumerate() {
            let (px, py) = chart.backend_coord(&(k as f64 + 0.5, 0.0));
            root.draw(&Text::new(
                name.clone(),
                (px, py + 14),
                label_font.clone().pos(Pos::new(HPos::Center, VPos::Top)),
            ))?;

            let (px, py) = chart.backend_coord(&(0.0, size - 0.5 - k as f64));
            root.draw(&Text::new(
                name.clone(),
                (px - 8, py),
                label_font.clone().pos(Pos::new(HPos::Right, VPos::Center)),
            ))?;
        }
        Ok(())
    }

    fn draw_usage_distribution<DB: DrawingBackend>(
        root: &DrawingArea<DB, plotters::coord::Shift>,
        title: &str,
        series: &[DistributionSeries],
    ) -> DrawResult
    where
        DB::ErrorType: 'static,
    {
        let Some(first) = series.first() else {
            return Err(Box::new(RenderError::Empty("no series".into())));
        };
        root.fill(&WHITE)?;

        let x_lo = first.histogram.edges.first().copied().unwrap_or(0.0);
        let x_hi = first.histogram.edges.last().copied().unwrap_or(1.0);
        let y_hi = Self::y_max(series.iter().flat_map(|s| {
            s.histogram
                .counts
                .iter()
                .map(|&c| c as f64)
                .chain(s.kde.iter().map(|p| p[1]))
        }));

        let mut chart = ChartBuilder::on(root)
            .caption(title, (FONT, 26))
            .margin(20)
            .x_label_area_size(45)
            .y_label_area_size(70)
            .build_cartesian_2d(x_lo..x_hi, 0f64..y_hi)?;

        chart
            .configure_mesh()
            .x_desc("Number of rentals")
            .y_desc("Frequency")
            .draw()?;

        for (idx, s) in series.iter().enumerate() {
            let color = if idx == 0 { CASUAL } else { REGISTERED };
            let edges = &s.histogram.edges;

            chart
                .draw_series(s.histogram.counts.iter().enumerate().map(|(k, &count)| {
                    Rectangle::new(
                        [(edges[k], 0.0), (edges[k + 1], count as f64)],
                        color.mix(0.45).filled(),
                    )
                }))?
                .label(s.name.as_str())
                .legend(move |(x, y)| {
                    Rectangle::new([(x, y - 5), (x + 15, y + 5)], color.filled())
                });

            chart.draw_series(LineSeries::new(
                s.kde.iter().map(|p| (p[0], p[1])),
                color.stroke_width(2),
            ))?;
        }

        chart
            .configure_series_labels()
            .background_style(WHITE.mix(0.8))
            .border_style(BLACK)
            .position(SeriesLabelPosition::UpperRight)
            .draw()?;
        Ok(())
    }

    fn draw_weekday_average<DB: DrawingBackend>(
        root: &DrawingArea<DB, plotters::coord::Shift>,
        title: &str,
        points: &[AveragePoint],
    ) -> DrawResult
    where
        DB::ErrorType: 'static,
    {
        root.fill(&WHITE)?;
        let y_hi = Self::y_max(points.iter().map(|p| p.mean));

        let mut chart = ChartBuilder::on(root)
            .caption(title, (FONT, 26))
            .margin(20)
            .x_label_area_size(45)
            .y_label_area_size(70)
            .build_cartesian_2d(-0.5f64..6.5f64, 0f64..y_hi)?;

        chart
            .configure_mesh()
            .x_labels(15)
            .x_label_formatter(&|x| {
                if x.fract() == 0.0 && (0.0..=6.0).contains(x) {
                    weekday_label(*x as i64)
                } else {
                    String::new()
                }
            })
            .x_desc("Day of the week")
            .y_desc("Average rentals")
            .draw()?;

        let xy: Vec<(f64, f64)> = points.iter().map(|p| (p.key as f64, p.mean)).collect();
        chart.draw_series(LineSeries::new(xy.iter().copied(), CASUAL.stroke_width(2)))?;
        chart.draw_series(
            xy.iter()
                .map(|&(x, y)| Circle::new((x, y), 5, CASUAL.filled())),
        )?;
        Ok(())
    }

    fn draw_hourly_average<DB: DrawingBackend>(
        root: &DrawingArea<DB, plotters::coord::Shift>,
        title: &str,
        points: &[AveragePoint],
    ) -> DrawResult
    where
        DB::ErrorType: 'static,
    {
        root.fill(&WHITE)?;
        let y_hi = Self::y_max(points.iter().map(|p| p.mean));

        let mut chart = ChartBuilder::on(root)
            .caption(title, (FONT, 26))
            .margin(20)
            .x_label_area_size(45)
            .y_label_area_size(70)
            .build_cartesian_2d(0f64..23f64, 0f64..y_hi)?;

        chart
            .configure_mesh()
            .x_labels(24)
            .x_label_formatter(&|x| format!("{:.0}", x))
            .x_desc("Hour of the day")
            .y_desc("Average rentals")
            .draw()?;

        let xy: Vec<(f64, f64)> = points.iter().map(|p| (p.key as f64, p.mean)).collect();
        chart.draw_series(AreaSeries::new(xy.iter().copied(), 0.0, AREA.mix(0.7)))?;
        chart.draw_series(LineSeries::new(xy.iter().copied(), LINE.stroke_width(2)))?;
        chart.draw_series(
            xy.iter()
                .map(|&(x, y)| Circle::new((x, y), 4, LINE.filled())),
        )?;
        Ok(())
    }

    fn draw_trend<DB: DrawingBackend>(
        root: &DrawingArea<DB, plotters::coord::Shift>,
        title: &str,
        trend: &TrendSeries,
    ) -> DrawResult
    where
        DB::ErrorType: 'static,
    {
        if trend.is_empty() {
            return Err(Box::new(RenderError::Empty("no dated rows".into())));
        }
        root.fill(&WHITE)?;

        let t_lo = trend.time[0];
        let t_hi = trend.time[trend.len() - 1].max(t_lo + 1.0);
        let y_hi = Self::y_max(trend.total.iter().copied());

        let mut chart = ChartBuilder::on(root)
            .caption(title, (FONT, 26))
            .margin(20)
            .x_label_area_size(45)
            .y_label_area_size(70)
            .build_cartesian_2d(t_lo..t_hi, 0f64..y_hi)?;

        chart
            .configure_mesh()
            .x_labels(8)
            .x_label_formatter(&|t| {
                TrendSeries::date_at(*t)
                    .map(|d| d.format("%Y-%m-%d").to_string())
                    .unwrap_or_default()
            })
            .x_desc("Date")
            .y_desc("Rentals")
            .draw()?;

        chart
            .draw_series(AreaSeries::new(
                trend.time.iter().copied().zip(trend.total.iter().copied()),
                0.0,
                REGISTERED.mix(0.6),
            ))?
            .label("Registered")
            .legend(|(x, y)| Rectangle::new([(x, y - 5), (x + 15, y + 5)], REGISTERED.filled()));

        chart
            .draw_series(AreaSeries::new(
                trend.time.iter().copied().zip(trend.casual.iter().copied()),
                0.0,
                SKY_BLUE.mix(0.8),
            ))?
            .label("Casual")
            .legend(|(x, y)| Rectangle::new([(x, y - 5), (x + 15, y + 5)], SKY_BLUE.filled()));

        chart
            .configure_series_labels()
            .background_style(WHITE.mix(0.8))
            .border_style(BLACK)
            .position(SeriesLabelPosition::UpperLeft)
            .draw()?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::stats::ColumnStats;
    use tempfile::TempDir;

    #[test]
    fn tables_are_not_exportable() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("table.png");
        let output = ViewOutput::Describe(vec![ColumnStats::default()]);

        let result = StaticChartRenderer::render_to_file(&output, "t", &path, 200, 100);
        assert!(matches!(result, Err(RenderError::NotAChart)));
        assert!(!path.exists());
    }

    #[test]
    fn unavailable_output_is_empty_error() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("none.png");
        let output = ViewOutput::Unavailable("Requires columns: hr".into());

        let result = StaticChartRenderer::render_to_file(&output, "t", &path, 200, 100);
        assert!(matches!(result, Err(RenderError::Empty(_))));
    }

    #[test]
    fn empty_charts_leave_no_file_behind() {
        let dir = TempDir::new().unwrap();
        let outputs = [
            ViewOutput::Correlation(CorrelationMatrix {
                columns: Vec::new(),
                values: Vec::new(),
            }),
            ViewOutput::UsageDistribution(Vec::new()),
            ViewOutput::Trend(TrendSeries::default()),
        ];

        for (i, output) in outputs.iter().enumerate() {
            let path = dir.path().join(format!("empty_{}.png", i));
            let result = StaticChartRenderer::render_to_file(output, "t", &path, 200, 100);
            assert!(matches!(result, Err(RenderError::Empty(_))), "{:?}", result);
            assert!(!path.exists());
        }
    }

    #[test]
    fn y_max_pads_and_handles_empty() {
        assert!((StaticChartRenderer::y_max([10.0, 5.0].into_iter()) - 11.0).abs() < 1e-9);
        assert_eq!(StaticChartRenderer::y_max(std::iter::empty()), 1.0);
        assert_eq!(StaticChartRenderer::y_max([f64::NAN].into_iter()), 1.0);
    }
}
