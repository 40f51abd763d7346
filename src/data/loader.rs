//! CSV Data Loader Module
//! Reads the daily and hourly datasets once and caches them for the process lifetime.

use crate::config::DashboardConfig;
use crate::data::{Dataset, DateRange};
use chrono::Local;
use once_cell::unsync::OnceCell;
use polars::prelude::*;
use std::cell::Cell;
use std::path::{Path, PathBuf};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum LoaderError {
    #[error("File not found: {0}")]
    NotFound(PathBuf),
    #[error("Failed to load CSV {path}: {source}")]
    Csv {
        path: PathBuf,
        source: PolarsError,
    },
}

/// Both datasets, immutable once loaded.
#[derive(Debug, Clone)]
pub struct DataContext {
    pub daily: Dataset,
    pub hourly: Dataset,
}

impl DataContext {
    /// Min and max date of the daily dataset; today when it has no dates.
    pub fn default_range(&self) -> DateRange {
        match self.daily.date_bounds() {
            Some((start, end)) => DateRange::new(start, end),
            None => {
                let today = Local::now().date_naive();
                DateRange::new(today, today)
            }
        }
    }
}

/// Reads the configured CSV files with Polars and keeps the result.
pub struct DataLoader {
    config: DashboardConfig,
    cache: OnceCell<DataContext>,
    reads: Cell<usize>,
}

impl DataLoader {
    pub fn new(config: DashboardConfig) -> Self {
        Self {
            config,
            cache: OnceCell::new(),
            reads: Cell::new(0),
        }
    }

    /// Return the cached datasets, reading the files on first use.
    ///
    /// A failed read is not cached, so a later call reads again.
    pub fn load(&self) -> Result<&DataContext, LoaderError> {
        self.cache.get_or_try_init(|| self.read_all())
    }

    /// Datasets if already loaded.
    pub fn cached(&self) -> Option<&DataContext> {
        self.cache.get()
    }

    /// Drop the cache so the next `load` reads the files again.
    #[allow(dead_code)]
    pub fn invalidate(&mut self) {
        self.cache.take();
    }

    /// How many times the files have actually been read.
    pub fn read_count(&self) -> usize {
        self.reads.get()
    }

    fn read_all(&self) -> Result<DataContext, LoaderError> {
        self.reads.set(self.reads.get() + 1);

        let daily = read_csv(&self.config.day_path, &self.config.date_column)?;
        let hourly = read_csv(&self.config.hour_path, &self.config.date_column)?;

        Ok(DataContext { daily, hourly })
    }
}

/// Load one CSV file and coerce its date column.
pub fn read_csv(path: &Path, date_column: &str) -> Result<Dataset, LoaderError> {
    if !path.is_file() {
        return Err(LoaderError::NotFound(path.to_path_buf()));
    }

    let csv_err = |source| LoaderError::Csv {
        path: path.to_path_buf(),
        source,
    };

    let path_str = path.to_string_lossy().to_string();
    let df = LazyCsvReader::new(&path_str)
        .with_infer_schema_length(Some(10000))
        .finish()
        .and_then(|lazy| lazy.collect())
        .map_err(csv_err)?;

    let (height, width) = (df.height(), df.width());
    let (dataset, unparsable) = Dataset::from_frame(df, date_column).map_err(csv_err)?;

    if unparsable > 0 {
        log::warn!(
            "{}: {} value(s) in '{}' could not be parsed as dates",
            path.display(),
            unparsable,
            date_column
        );
    }
    log::info!(
        "Loaded {} rows, {} columns from {}",
        height,
        width,
        path.display()
    );

    Ok(dataset)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use tempfile::TempDir;

    const DAY_CSV: &str = "\
instant,dteday,season,weekday,workingday,weathersit,casual,registered,cnt
1,2011-01-01,1,6,0,2,331,654,985
2,2011-01-02,1,0,0,2,131,670,801
3,bad-date,1,1,1,1,120,1229,1349
";

    const HOUR_CSV: &str = "\
instant,dteday,season,hr,weekday,workingday,weathersit,casual,registered,cnt
1,2011-01-01,1,0,6,0,1,3,13,16
2,2011-01-01,1,1,6,0,1,8,32,40
";

    fn write_fixture(dir: &TempDir) -> DashboardConfig {
        let day_path = dir.path().join("day.csv");
        let hour_path = dir.path().join("hour.csv");
        std::fs::write(&day_path, DAY_CSV).unwrap();
        std::fs::write(&hour_path, HOUR_CSV).unwrap();
        DashboardConfig {
            day_path,
            hour_path,
            ..DashboardConfig::default()
        }
    }

    #[test]
    fn loads_both_datasets() {
        let dir = TempDir::new().unwrap();
        let loader = DataLoader::new(write_fixture(&dir));

        let data = loader.load().unwrap();
        assert_eq!(data.daily.height(), 3);
        assert_eq!(data.hourly.height(), 2);
        assert!(data.daily.dates()[2].is_none());
        assert!(data.hourly.has_column("hr"));
        assert!(!data.daily.has_column("dteday"));
    }

    #[test]
    fn second_load_is_served_from_cache() {
        let dir = TempDir::new().unwrap();
        let config = write_fixture(&dir);
        let loader = DataLoader::new(config.clone());

        let first = loader.load().unwrap().daily.height();
        // Files disappear: a cache hit must not notice.
        std::fs::remove_file(&config.day_path).unwrap();
        let second = loader.load().unwrap().daily.height();

        assert_eq!(first, second);
        assert_eq!(loader.read_count(), 1);
        assert!(loader.cached().is_some());
    }

    #[test]
    fn invalidate_forces_reread() {
        let dir = TempDir::new().unwrap();
        let mut loader = DataLoader::new(write_fixture(&dir));

        loader.load().unwrap();
        loader.invalidate();
        assert!(loader.cached().is_none());
        loader.load().unwrap();
        assert_eq!(loader.read_count(), 2);
    }

    #[test]
    fn missing_file_is_not_found() {
        let dir = TempDir::new().unwrap();
        let mut config = write_fixture(&dir);
        config.hour_path = dir.path().join("nope.csv");
        let loader = DataLoader::new(config);

        match loader.load() {
            Err(LoaderError::NotFound(path)) => assert!(path.ends_with("nope.csv")),
            other => panic!("expected NotFound, got {:?}", other.map(|_| ())),
        }
        assert!(loader.cached().is_none());
    }

    #[test]
    fn malformed_file_is_csv_error() {
        let dir = TempDir::new().unwrap();
        let config = write_fixture(&dir);
        std::fs::write(&config.day_path, [0u8, 159, 146, 150, 255, 10, 1, 2, 3]).unwrap();
        let loader = DataLoader::new(config);

        match loader.load() {
            Err(LoaderError::Csv { path, .. }) => assert!(path.ends_with("day.csv")),
            other => panic!("expected Csv error, got {:?}", other.map(|_| ())),
        }
        assert!(loader.cached().is_none());
    }

    #[test]
    fn default_range_spans_daily_dates() {
        let dir = TempDir::new().unwrap();
        let loader = DataLoader::new(write_fixture(&dir));

        let range = loader.load().unwrap().default_range();
        assert_eq!(range.start, NaiveDate::from_ymd_opt(2011, 1, 1).unwrap());
        assert_eq!(range.end, NaiveDate::from_ymd_opt(2011, 1, 2).unwrap());
    }
}
