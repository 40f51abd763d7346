//! View Renderers
//! One pure function per view, turning filtered datasets into a display artifact.

use crate::data::Dataset;
use crate::stats::{ColumnStats, CorrelationMatrix, Histogram, StatsCalculator, KDE_POINTS};
use crate::views::View;
use chrono::{Datelike, NaiveDate};

/// Datasets a renderer may read.
pub struct RenderInput<'a> {
    pub daily: &'a Dataset,
    pub hourly: &'a Dataset,
    /// Hourly dataset before date filtering.
    pub full_hourly: &'a Dataset,
    pub category_columns: &'a [String],
}

/// Value frequencies of one categorical column.
#[derive(Debug, Clone, PartialEq)]
pub struct CategoryCounts {
    pub column: String,
    pub counts: Vec<(String, usize)>,
}

/// Histogram plus a KDE curve scaled to counts.
#[derive(Debug, Clone)]
pub struct DistributionSeries {
    pub name: String,
    pub histogram: Histogram,
    pub kde: Vec<[f64; 2]>,
}

/// Mean of the total count per group key.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AveragePoint {
    pub key: i64,
    pub mean: f64,
}

/// Stacked usage over time; `total` is casual + registered.
#[derive(Debug, Clone, Default)]
pub struct TrendSeries {
    /// Days from the common era (day 1 = 0001-01-01) plus hour fraction.
    pub time: Vec<f64>,
    pub casual: Vec<f64>,
    pub total: Vec<f64>,
}

impl TrendSeries {
    pub fn len(&self) -> usize {
        self.time.len()
    }

    pub fn is_empty(&self) -> bool {
        self.time.is_empty()
    }

    /// Calendar date of a time-axis value.
    pub fn date_at(time: f64) -> Option<NaiveDate> {
        NaiveDate::from_num_days_from_ce_opt(time.floor() as i32)
    }
}

/// What a view displays.
#[derive(Debug, Clone)]
pub enum ViewOutput {
    Describe(Vec<ColumnStats>),
    Categories(Vec<CategoryCounts>),
    Correlation(CorrelationMatrix),
    UsageDistribution(Vec<DistributionSeries>),
    WeekdayAverage(Vec<AveragePoint>),
    HourlyAverage(Vec<AveragePoint>),
    Trend(TrendSeries),
    /// Required columns are missing.
    Unavailable(String),
}

/// Run the renderer matching `view`.
pub fn render(view: View, input: &RenderInput<'_>) -> ViewOutput {
    match view {
        View::NumericStats => render_numeric_stats(input.daily),
        View::CategoryDistribution => {
            render_category_distribution(input.daily, input.category_columns)
        }
        View::Correlation => render_correlation(input.daily),
        View::UsageDistribution => render_usage_distribution(input.hourly),
        View::WeekdayAverage => render_weekday_average(input.daily),
        View::HourlyAverage => render_hourly_average(input.hourly),
        View::CasualRegisteredTrend => render_trend(input.full_hourly),
    }
}

pub fn render_numeric_stats(daily: &Dataset) -> ViewOutput {
    ViewOutput::Describe(StatsCalculator::describe(daily))
}

/// Value counts of each configured column present in the dataset.
pub fn render_category_distribution(daily: &Dataset, columns: &[String]) -> ViewOutput {
    let categories = columns
        .iter()
        .filter_map(|column| {
            let Some(values) = daily.text_values(column) else {
                log::debug!("Category column '{}' not in dataset, skipped", column);
                return None;
            };
            Some(CategoryCounts {
                column: column.clone(),
                counts: StatsCalculator::value_counts(&values),
            })
        })
        .collect();
    ViewOutput::Categories(categories)
}

pub fn render_correlation(daily: &Dataset) -> ViewOutput {
    ViewOutput::Correlation(StatsCalculator::correlation_matrix(daily))
}

/// Histograms of casual and registered counts on shared bins.
pub fn render_usage_distribution(hourly: &Dataset) -> ViewOutput {
    let (Some(casual), Some(registered)) = (
        present_values(hourly, "casual"),
        present_values(hourly, "registered"),
    ) else {
        return missing_columns(&["casual", "registered"]);
    };

    let combined: Vec<f64> = casual.iter().chain(&registered).copied().collect();
    let bins = StatsCalculator::auto_bin_count(&combined);
    let edges = StatsCalculator::bin_edges(&combined, bins);
    let (lo, hi) = (edges[0], edges[edges.len() - 1]);

    let series = [("Casual", casual), ("Registered", registered)]
        .into_iter()
        .map(|(name, values)| {
            let histogram = StatsCalculator::histogram(&values, &edges);
            // Density to counts: n * bin width
            let scale = values.len() as f64 * histogram.bin_width();
            let grid = StatsCalculator::linspace(lo, hi, KDE_POINTS);
            let density = StatsCalculator::gaussian_kde(&values, &grid);
            let kde = grid
                .into_iter()
                .zip(density)
                .map(|(x, d)| [x, d * scale])
                .collect();

            DistributionSeries {
                name: name.to_string(),
                histogram,
                kde,
            }
        })
        .collect();

    ViewOutput::UsageDistribution(series)
}

/// Mean `cnt` per weekday (0 = Sunday).
pub fn render_weekday_average(daily: &Dataset) -> ViewOutput {
    match grouped_average(daily, "weekday") {
        Some(points) => ViewOutput::WeekdayAverage(points),
        None => missing_columns(&["weekday", "cnt"]),
    }
}

/// Mean `cnt` per hour of day.
pub fn render_hourly_average(hourly: &Dataset) -> ViewOutput {
    match grouped_average(hourly, "hr") {
        Some(points) => ViewOutput::HourlyAverage(points),
        None => missing_columns(&["hr", "cnt"]),
    }
}

/// Casual and casual + registered over time, ordered by time.
pub fn render_trend(hourly: &Dataset) -> ViewOutput {
    let (Some(casual), Some(registered)) = (
        hourly.numeric_values("casual"),
        hourly.numeric_values("registered"),
    ) else {
        return missing_columns(&["casual", "registered"]);
    };
    let hours = hourly.numeric_values("hr");

    let mut rows: Vec<(f64, f64, f64)> = hourly
        .dates()
        .iter()
        .enumerate()
        .filter_map(|(i, date)| {
            let date = (*date)?;
            let c = casual[i]?;
            let r = registered[i]?;
            let hour = hours.as_ref().and_then(|h| h[i]).unwrap_or(0.0);
            let t = date.num_days_from_ce() as f64 + hour / 24.0;
            Some((t, c, c + r))
        })
        .collect();
    rows.sort_by(|a, b| a.0.partial_cmp(&b.0).unwrap_or(std::cmp::Ordering::Equal));

    let mut trend = TrendSeries::default();
    for (t, c, total) in rows {
        trend.time.push(t);
        trend.casual.push(c);
        trend.total.push(total);
    }
    ViewOutput::Trend(trend)
}

fn grouped_average(dataset: &Dataset, key_column: &str) -> Option<Vec<AveragePoint>> {
    let keys = dataset.numeric_values(key_column)?;
    let counts = dataset.numeric_values("cnt")?;
    Some(
        StatsCalculator::grouped_mean(&keys, &counts)
            .into_iter()
            .map(|(key, mean)| AveragePoint { key, mean })
            .collect(),
    )
}

fn present_values(dataset: &Dataset, column: &str) -> Option<Vec<f64>> {
    Some(
        dataset
            .numeric_values(column)?
            .into_iter()
            .flatten()
            .filter(|v| !v.is_nan())
            .collect(),
    )
}

fn missing_columns(columns: &[&str]) -> ViewOutput {
    ViewOutput::Unavailable(format!("Requires columns: {}", columns.join(", ")))
}

#[cfg(test)]
mod tests {
    use super::*;
    use polars::prelude::*;

    fn date(day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2011, 1, day).unwrap()
    }

    fn daily() -> Dataset {
        // Two weeks, total count constant per weekday
        let weekday: Vec<i64> = (0..14).map(|i| i % 7).collect();
        let cnt: Vec<i64> = weekday.iter().map(|w| 1000 + 100 * w).collect();
        let season: Vec<i64> = (0..14).map(|i| if i < 10 { 1 } else { 2 }).collect();
        let frame = DataFrame::new(vec![
            Column::new("season".into(), season),
            Column::new("weekday".into(), weekday),
            Column::new("cnt".into(), cnt),
        ])
        .unwrap();
        Dataset::new(frame, (1..=14).map(|d| Some(date(d))).collect())
    }

    fn hourly() -> Dataset {
        let hr: Vec<i64> = vec![1, 0, 1, 0];
        let casual: Vec<i64> = vec![2, 1, 4, 3];
        let registered: Vec<i64> = vec![20, 10, 40, 30];
        let cnt: Vec<i64> = vec![22, 11, 44, 33];
        let frame = DataFrame::new(vec![
            Column::new("hr".into(), hr),
            Column::new("casual".into(), casual),
            Column::new("registered".into(), registered),
            Column::new("cnt".into(), cnt),
        ])
        .unwrap();
        let dates = vec![Some(date(1)), Some(date(1)), Some(date(2)), None];
        Dataset::new(frame, dates)
    }

    fn input<'a>(daily: &'a Dataset, hourly: &'a Dataset, columns: &'a [String]) -> RenderInput<'a> {
        RenderInput {
            daily,
            hourly,
            full_hourly: hourly,
            category_columns: columns,
        }
    }

    #[test]
    fn weekday_average_equals_constant_per_weekday() {
        let ViewOutput::WeekdayAverage(points) = render_weekday_average(&daily()) else {
            panic!("expected weekday average");
        };
        assert_eq!(points.len(), 7);
        for p in points {
            assert!((p.mean - (1000.0 + 100.0 * p.key as f64)).abs() < 1e-9);
        }
    }

    #[test]
    fn hourly_average_groups_by_hour() {
        let ViewOutput::HourlyAverage(points) = render_hourly_average(&hourly()) else {
            panic!("expected hourly average");
        };
        assert_eq!(
            points,
            vec![
                AveragePoint { key: 0, mean: 22.0 },
                AveragePoint { key: 1, mean: 33.0 },
            ]
        );
    }

    #[test]
    fn category_distribution_skips_absent_columns() {
        let columns = vec!["season".to_string(), "weathersit".to_string()];
        let ViewOutput::Categories(categories) = render_category_distribution(&daily(), &columns)
        else {
            panic!("expected categories");
        };
        assert_eq!(
            categories,
            vec![CategoryCounts {
                column: "season".to_string(),
                counts: vec![("1".to_string(), 10), ("2".to_string(), 4)],
            }]
        );
    }

    #[test]
    fn trend_skips_null_dates_and_sorts_by_time() {
        let ViewOutput::Trend(trend) = render_trend(&hourly()) else {
            panic!("expected trend");
        };
        assert_eq!(trend.len(), 3);
        assert_eq!(trend.casual, vec![1.0, 2.0, 4.0]);
        assert_eq!(trend.total, vec![11.0, 22.0, 44.0]);
        assert!(trend.time.windows(2).all(|w| w[0] <= w[1]));
        assert_eq!(TrendSeries::date_at(trend.time[2]), Some(date(2)));
    }

    #[test]
    fn usage_distribution_shares_bins() {
        let ViewOutput::UsageDistribution(series) = render_usage_distribution(&hourly()) else {
            panic!("expected distribution");
        };
        assert_eq!(series.len(), 2);
        assert_eq!(series[0].histogram.edges, series[1].histogram.edges);
        assert_eq!(series[0].histogram.counts.iter().sum::<usize>(), 4);
        assert_eq!(series[1].histogram.counts.iter().sum::<usize>(), 4);
        assert_eq!(series[0].kde.len(), KDE_POINTS);
    }

    #[test]
    fn missing_columns_are_reported_not_fatal() {
        let d = daily();
        let output = render_usage_distribution(&d);
        assert!(matches!(output, ViewOutput::Unavailable(_)));
        assert!(matches!(render_hourly_average(&d), ViewOutput::Unavailable(_)));
    }

    #[test]
    fn dispatch_covers_every_view() {
        let (d, h) = (daily(), hourly());
        let columns = vec!["season".to_string()];
        let input = input(&d, &h, &columns);
        for view in View::ALL {
            let output = render(view, &input);
            let matches_view = match (view, &output) {
                (View::NumericStats, ViewOutput::Describe(_)) => true,
                (View::CategoryDistribution, ViewOutput::Categories(_)) => true,
                (View::Correlation, ViewOutput::Correlation(_)) => true,
                (View::UsageDistribution, ViewOutput::UsageDistribution(_)) => true,
                (View::WeekdayAverage, ViewOutput::WeekdayAverage(_)) => true,
                (View::HourlyAverage, ViewOutput::HourlyAverage(_)) => true,
                (View::CasualRegisteredTrend, ViewOutput::Trend(_)) => true,
                _ => false,
            };
            assert!(matches_view, "{:?} rendered {:?}", view, output);
        }
    }
}
