//! Statistics Calculator Module
//! Descriptive statistics, value counts, correlation, grouped means and densities.

use crate::data::Dataset;
use rayon::prelude::*;
use statrs::distribution::{Continuous, Normal};
use statrs::statistics::Statistics;
use std::collections::{BTreeMap, HashMap};

/// Points on which a kernel density curve is evaluated.
pub const KDE_POINTS: usize = 200;

/// Descriptive statistics for a single numeric column.
#[derive(Debug, Clone)]
pub struct ColumnStats {
    pub column: String,
    pub count: usize,
    pub mean: f64,
    pub std: f64,
    pub min: f64,
    pub q25: f64,
    pub median: f64,
    pub q75: f64,
    pub max: f64,
}

impl Default for ColumnStats {
    fn default() -> Self {
        Self {
            column: String::new(),
            count: 0,
            mean: f64::NAN,
            std: f64::NAN,
            min: f64::NAN,
            q25: f64::NAN,
            median: f64::NAN,
            q75: f64::NAN,
            max: f64::NAN,
        }
    }
}

/// Pairwise Pearson correlations between numeric columns.
#[derive(Debug, Clone, PartialEq)]
pub struct CorrelationMatrix {
    pub columns: Vec<String>,
    /// Row-major, `values[i][j]` is the correlation of `columns[i]` and `columns[j]`.
    pub values: Vec<Vec<f64>>,
}

impl CorrelationMatrix {
    #[allow(dead_code)]
    pub fn get(&self, a: &str, b: &str) -> Option<f64> {
        let i = self.columns.iter().position(|c| c == a)?;
        let j = self.columns.iter().position(|c| c == b)?;
        Some(self.values[i][j])
    }
}

/// Equal-width histogram bins.
#[derive(Debug, Clone, PartialEq)]
pub struct Histogram {
    /// `edges.len() == counts.len() + 1`
    pub edges: Vec<f64>,
    pub counts: Vec<usize>,
}

impl Histogram {
    pub fn bin_width(&self) -> f64 {
        match (self.edges.first(), self.edges.last()) {
            (Some(first), Some(last)) if !self.counts.is_empty() => {
                (last - first) / self.counts.len() as f64
            }
            _ => 0.0,
        }
    }

    /// Bin centers, one per count.
    pub fn centers(&self) -> Vec<f64> {
        self.edges.windows(2).map(|w| (w[0] + w[1]) / 2.0).collect()
    }
}

/// Handles statistical calculations over datasets.
pub struct StatsCalculator;

impl StatsCalculator {
    /// Compute descriptive statistics for an array of values.
    pub fn compute_descriptive_stats(values: &[f64]) -> ColumnStats {
        let n = values.len();
        if n == 0 {
            return ColumnStats::default();
        }

        let mut sorted = values.to_vec();
        sorted.sort_by(|a, b| a.partial_cmp(b).unwrap_or(std::cmp::Ordering::Equal));

        ColumnStats {
            column: String::new(),
            count: n,
            mean: values.iter().mean(),
            // Sample standard deviation, NaN below two values
            std: values.iter().std_dev(),
            min: sorted[0],
            q25: Self::percentile(&sorted, 25.0),
            median: Self::percentile(&sorted, 50.0),
            q75: Self::percentile(&sorted, 75.0),
            max: sorted[n - 1],
        }
    }

    /// Calculate percentile using linear interpolation (NumPy compatible).
    pub fn percentile(sorted_values: &[f64], p: f64) -> f64 {
        let n = sorted_values.len();
        if n == 0 {
            return f64::NAN;
        }
        if n == 1 {
            return sorted_values[0];
        }

        let rank = (p / 100.0) * (n - 1) as f64;
        let lower = rank.floor() as usize;
        let upper = (rank.ceil() as usize).min(n - 1);
        let frac = rank - lower as f64;

        if lower == upper {
            sorted_values[lower]
        } else {
            sorted_values[lower] * (1.0 - frac) + sorted_values[upper] * frac
        }
    }

    /// Descriptive statistics for every numeric column, nulls skipped.
    pub fn describe(dataset: &Dataset) -> Vec<ColumnStats> {
        dataset
            .get_numeric_columns()
            .into_iter()
            .map(|column| {
                let values: Vec<f64> = dataset
                    .numeric_values(&column)
                    .unwrap_or_default()
                    .into_iter()
                    .flatten()
                    .filter(|v| !v.is_nan())
                    .collect();
                let mut stats = Self::compute_descriptive_stats(&values);
                stats.column = column;
                stats
            })
            .collect()
    }

    /// Frequency of each non-null value, most frequent first, ties by value.
    pub fn value_counts(values: &[Option<String>]) -> Vec<(String, usize)> {
        let mut counts: HashMap<&str, usize> = HashMap::new();
        for value in values.iter().flatten() {
            *counts.entry(value.as_str()).or_default() += 1;
        }

        let mut counts: Vec<(String, usize)> = counts
            .into_iter()
            .map(|(value, n)| (value.to_string(), n))
            .collect();
        counts.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(&b.0)));
        counts
    }

    /// Pearson correlation over the rows where both values are present.
    ///
    /// NaN when fewer than two complete pairs remain or either side is constant.
    pub fn pearson(x: &[Option<f64>], y: &[Option<f64>]) -> f64 {
        let (xs, ys): (Vec<f64>, Vec<f64>) = x
            .iter()
            .zip(y)
            .filter_map(|(a, b)| match (a, b) {
                (Some(a), Some(b)) if !a.is_nan() && !b.is_nan() => Some((*a, *b)),
                _ => None,
            })
            .unzip();

        if xs.len() < 2 {
            return f64::NAN;
        }

        let sx = xs.iter().std_dev();
        let sy = ys.iter().std_dev();
        if sx == 0.0 || sy == 0.0 {
            return f64::NAN;
        }

        let r = xs.iter().covariance(ys.iter()) / (sx * sy);
        r.clamp(-1.0, 1.0)
    }

    /// Correlation matrix over every numeric column, rows computed in parallel.
    pub fn correlation_matrix(dataset: &Dataset) -> CorrelationMatrix {
        let columns = dataset.get_numeric_columns();
        let data: Vec<Vec<Option<f64>>> = columns
            .iter()
            .map(|c| dataset.numeric_values(c).unwrap_or_default())
            .collect();

        let values: Vec<Vec<f64>> = data
            .par_iter()
            .map(|x| data.iter().map(|y| Self::pearson(x, y)).collect())
            .collect();

        CorrelationMatrix { columns, values }
    }

    /// Mean of `values` grouped by the integer part of `keys`.
    pub fn grouped_mean(keys: &[Option<f64>], values: &[Option<f64>]) -> BTreeMap<i64, f64> {
        let mut acc: BTreeMap<i64, (f64, usize)> = BTreeMap::new();
        for (key, value) in keys.iter().zip(values) {
            if let (Some(k), Some(v)) = (key, value) {
                if k.is_nan() || v.is_nan() {
                    continue;
                }
                let entry = acc.entry(k.round() as i64).or_insert((0.0, 0));
                entry.0 += v;
                entry.1 += 1;
            }
        }

        acc.into_iter()
            .map(|(k, (sum, n))| (k, sum / n as f64))
            .collect()
    }

    /// Number of bins following NumPy's "auto" rule (max of Sturges and Freedman-Diaconis).
    pub fn auto_bin_count(values: &[f64]) -> usize {
        let n = values.len();
        if n == 0 {
            return 1;
        }

        let mut sorted = values.to_vec();
        sorted.sort_by(|a, b| a.partial_cmp(b).unwrap_or(std::cmp::Ordering::Equal));
        let range = sorted[n - 1] - sorted[0];
        if range <= 0.0 {
            return 1;
        }

        let sturges_width = range / ((n as f64).log2() + 1.0);
        let iqr = Self::percentile(&sorted, 75.0) - Self::percentile(&sorted, 25.0);
        let fd_width = 2.0 * iqr * (n as f64).powf(-1.0 / 3.0);

        let width = if fd_width > 0.0 {
            fd_width.min(sturges_width)
        } else {
            sturges_width
        };
        ((range / width).ceil() as usize).max(1)
    }

    /// Equal-width bin edges covering `values`.
    pub fn bin_edges(values: &[f64], bins: usize) -> Vec<f64> {
        let bins = bins.max(1);
        let (lo, hi) = values
            .iter()
            .fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), &v| {
                (lo.min(v), hi.max(v))
            });
        if lo.is_infinite() {
            return vec![0.0, 1.0];
        }
        let (lo, hi) = if hi > lo { (lo, hi) } else { (lo - 0.5, hi + 0.5) };

        let step = (hi - lo) / bins as f64;
        (0..=bins).map(|i| lo + step * i as f64).collect()
    }

    /// Count `values` into the bins described by `edges`. The last bin is closed.
    pub fn histogram(values: &[f64], edges: &[f64]) -> Histogram {
        let bins = edges.len().saturating_sub(1);
        let mut counts = vec![0usize; bins];
        if bins == 0 {
            return Histogram {
                edges: edges.to_vec(),
                counts,
            };
        }

        let lo = edges[0];
        let hi = edges[bins];
        let step = (hi - lo) / bins as f64;

        for &v in values {
            if v.is_nan() || v < lo || v > hi {
                continue;
            }
            let idx = (((v - lo) / step).floor() as usize).min(bins - 1);
            counts[idx] += 1;
        }

        Histogram {
            edges: edges.to_vec(),
            counts,
        }
    }

    /// Gaussian kernel density estimate with Scott's bandwidth, evaluated on `grid`.
    ///
    /// Returns zeros when the bandwidth degenerates (fewer than two distinct values).
    pub fn gaussian_kde(values: &[f64], grid: &[f64]) -> Vec<f64> {
        let n = values.len();
        let zeros = vec![0.0; grid.len()];
        if n < 2 {
            return zeros;
        }

        let bandwidth = values.iter().std_dev() * (n as f64).powf(-0.2);
        let Ok(kernel) = Normal::new(0.0, bandwidth) else {
            return zeros;
        };

        grid.iter()
            .map(|&x| values.iter().map(|&v| kernel.pdf(x - v)).sum::<f64>() / n as f64)
            .collect()
    }

    /// Evenly spaced points from `lo` to `hi` inclusive.
    pub fn linspace(lo: f64, hi: f64, points: usize) -> Vec<f64> {
        match points {
            0 => Vec::new(),
            1 => vec![lo],
            _ => {
                let step = (hi - lo) / (points - 1) as f64;
                (0..points).map(|i| lo + step * i as f64).collect()
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use polars::prelude::*;

    fn approx(a: f64, b: f64) -> bool {
        (a - b).abs() < 1e-9
    }

    fn dataset(columns: Vec<Column>) -> Dataset {
        let height = columns.first().map(|c| c.len()).unwrap_or(0);
        let frame = DataFrame::new(columns).unwrap();
        let date = NaiveDate::from_ymd_opt(2011, 1, 1).unwrap();
        Dataset::new(frame, vec![Some(date); height])
    }

    #[test]
    fn single_row_describe_collapses_to_the_value() {
        let ds = dataset(vec![
            Column::new("temp".into(), vec![0.34f64]),
            Column::new("cnt".into(), vec![985i64]),
        ]);

        let stats = StatsCalculator::describe(&ds);
        assert_eq!(stats.len(), 2);
        for (s, expected) in stats.iter().zip([0.34, 985.0]) {
            assert_eq!(s.count, 1);
            assert!(approx(s.min, expected));
            assert!(approx(s.max, expected));
            assert!(approx(s.mean, expected));
            assert!(approx(s.median, expected));
            assert!(s.std.is_nan());
        }
    }

    #[test]
    fn describe_matches_known_quartiles() {
        let stats = StatsCalculator::compute_descriptive_stats(&[1.0, 2.0, 3.0, 4.0]);
        assert_eq!(stats.count, 4);
        assert!(approx(stats.mean, 2.5));
        assert!(approx(stats.q25, 1.75));
        assert!(approx(stats.median, 2.5));
        assert!(approx(stats.q75, 3.25));
        assert!(approx(stats.std, (5.0f64 / 3.0).sqrt()));
    }

    #[test]
    fn describe_skips_nulls() {
        let ds = dataset(vec![Column::new(
            "hum".into(),
            vec![Some(1.0f64), None, Some(3.0)],
        )]);
        let stats = StatsCalculator::describe(&ds);
        assert_eq!(stats[0].count, 2);
        assert!(approx(stats[0].mean, 2.0));
    }

    #[test]
    fn empty_column_gives_nan() {
        let stats = StatsCalculator::compute_descriptive_stats(&[]);
        assert_eq!(stats.count, 0);
        assert!(stats.mean.is_nan());
        assert!(stats.max.is_nan());
    }

    #[test]
    fn value_counts_orders_by_frequency() {
        let values: Vec<Option<String>> = ["A", "A", "B"]
            .iter()
            .map(|s| Some(s.to_string()))
            .collect();
        assert_eq!(
            StatsCalculator::value_counts(&values),
            vec![("A".to_string(), 2), ("B".to_string(), 1)]
        );
    }

    #[test]
    fn value_counts_ignores_nulls_and_breaks_ties_by_value() {
        let values = vec![
            Some("2".to_string()),
            None,
            Some("1".to_string()),
            Some("3".to_string()),
            Some("3".to_string()),
        ];
        assert_eq!(
            StatsCalculator::value_counts(&values),
            vec![
                ("3".to_string(), 2),
                ("1".to_string(), 1),
                ("2".to_string(), 1)
            ]
        );
    }

    #[test]
    fn perfectly_linear_columns_correlate_to_one() {
        let ds = dataset(vec![
            Column::new("casual".into(), vec![1.0f64, 2.0, 3.0, 4.0, 5.0]),
            Column::new("cnt".into(), vec![12.0f64, 14.0, 16.0, 18.0, 20.0]),
            Column::new("hum".into(), vec![5.0f64, 4.0, 3.0, 2.0, 1.0]),
        ]);

        let matrix = StatsCalculator::correlation_matrix(&ds);
        assert_eq!(matrix.columns, vec!["casual", "cnt", "hum"]);
        assert!((matrix.get("casual", "cnt").unwrap() - 1.0).abs() < 1e-12);
        assert!((matrix.get("casual", "hum").unwrap() + 1.0).abs() < 1e-12);
        assert!((matrix.get("hum", "hum").unwrap() - 1.0).abs() < 1e-12);
    }

    #[test]
    fn constant_column_correlation_is_nan() {
        let x = vec![Some(1.0), Some(2.0), Some(3.0)];
        let y = vec![Some(7.0), Some(7.0), Some(7.0)];
        assert!(StatsCalculator::pearson(&x, &y).is_nan());
    }

    #[test]
    fn pearson_uses_complete_pairs_only() {
        let x = vec![Some(1.0), None, Some(2.0), Some(3.0)];
        let y = vec![Some(2.0), Some(100.0), Some(4.0), None];
        // Only (1,2) and (2,4) remain
        assert!((StatsCalculator::pearson(&x, &y) - 1.0).abs() < 1e-12);
    }

    #[test]
    fn grouped_mean_of_constant_groups_is_the_constant() {
        let keys: Vec<Option<f64>> = (0..14).map(|i| Some((i % 7) as f64)).collect();
        let values: Vec<Option<f64>> = (0..14).map(|i| Some(100.0 * (i % 7) as f64)).collect();

        let means = StatsCalculator::grouped_mean(&keys, &values);
        assert_eq!(means.len(), 7);
        for (day, mean) in means {
            assert!(approx(mean, 100.0 * day as f64));
        }
    }

    #[test]
    fn histogram_counts_every_value_once() {
        let values: Vec<f64> = (0..100).map(|v| v as f64).collect();
        let bins = StatsCalculator::auto_bin_count(&values);
        let edges = StatsCalculator::bin_edges(&values, bins);
        let hist = StatsCalculator::histogram(&values, &edges);

        assert_eq!(hist.counts.len(), bins);
        assert_eq!(hist.counts.iter().sum::<usize>(), 100);
        assert!(approx(hist.edges[0], 0.0));
        assert!(approx(*hist.edges.last().unwrap(), 99.0));
    }

    #[test]
    fn constant_values_use_one_bin() {
        let values = [4.0, 4.0, 4.0];
        assert_eq!(StatsCalculator::auto_bin_count(&values), 1);
        let hist = StatsCalculator::histogram(&values, &StatsCalculator::bin_edges(&values, 1));
        assert_eq!(hist.counts, vec![3]);
        assert!(approx(hist.bin_width(), 1.0));
    }

    #[test]
    fn kde_integrates_to_about_one() {
        let values: Vec<f64> = (0..50).map(|v| (v % 10) as f64).collect();
        let grid = StatsCalculator::linspace(-10.0, 20.0, 601);
        let density = StatsCalculator::gaussian_kde(&values, &grid);
        let step = grid[1] - grid[0];
        let area: f64 = density.iter().sum::<f64>() * step;
        assert!((area - 1.0).abs() < 0.01);
    }

    #[test]
    fn kde_of_degenerate_input_is_flat() {
        let grid = StatsCalculator::linspace(0.0, 1.0, 5);
        assert_eq!(StatsCalculator::gaussian_kde(&[1.0], &grid), vec![0.0; 5]);
        assert_eq!(StatsCalculator::gaussian_kde(&[2.0, 2.0], &grid), vec![0.0; 5]);
    }
}
