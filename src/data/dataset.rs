//! Dataset Module
//! A CSV table split into a parsed date column and the remaining Polars frame.

use chrono::{NaiveDate, NaiveDateTime};
use polars::prelude::*;

/// Date layouts accepted for the date column, tried in order.
const DATE_FORMATS: [&str; 4] = ["%Y-%m-%d", "%Y/%m/%d", "%d/%m/%Y", "%m/%d/%Y"];

/// Datetime layouts whose date part is kept.
const DATETIME_FORMATS: [&str; 2] = ["%Y-%m-%d %H:%M:%S", "%Y-%m-%dT%H:%M:%S"];

/// Parse a single date cell. Unparsable text yields `None`.
pub fn parse_date(raw: &str) -> Option<NaiveDate> {
    let raw = raw.trim().trim_matches('"');
    if raw.is_empty() {
        return None;
    }

    DATE_FORMATS
        .iter()
        .find_map(|fmt| NaiveDate::parse_from_str(raw, fmt).ok())
        .or_else(|| {
            DATETIME_FORMATS
                .iter()
                .find_map(|fmt| NaiveDateTime::parse_from_str(raw, fmt).ok())
                .map(|dt| dt.date())
        })
}

/// Whether a Polars dtype counts as numeric for statistics.
pub fn is_numeric(dtype: &DataType) -> bool {
    matches!(
        dtype,
        DataType::Float32
            | DataType::Float64
            | DataType::Int8
            | DataType::Int16
            | DataType::Int32
            | DataType::Int64
            | DataType::UInt8
            | DataType::UInt16
            | DataType::UInt32
            | DataType::UInt64
    )
}

/// A loaded table: one optional date per row plus every other column.
#[derive(Debug, Clone)]
pub struct Dataset {
    dates: Vec<Option<NaiveDate>>,
    frame: DataFrame,
}

impl Dataset {
    /// Build from a frame whose date column has already been split off.
    pub fn new(frame: DataFrame, dates: Vec<Option<NaiveDate>>) -> Self {
        debug_assert!(frame.width() == 0 || frame.height() == dates.len());
        Self { dates, frame }
    }

    /// Split `date_column` out of `frame` and coerce it to dates.
    ///
    /// Returns the dataset and the number of non-empty cells that failed to parse.
    /// A frame without the column gets `None` for every row.
    pub fn from_frame(frame: DataFrame, date_column: &str) -> PolarsResult<(Self, usize)> {
        if !frame.get_column_names().iter().any(|name| name.as_str() == date_column) {
            let dates = vec![None; frame.height()];
            return Ok((Self::new(frame, dates), 0));
        }

        let as_text = frame.column(date_column)?.cast(&DataType::String)?;
        let mut unparsable = 0;
        let dates: Vec<Option<NaiveDate>> = as_text
            .as_materialized_series()
            .str()?
            .into_iter()
            .map(|cell| {
                let cell = cell?;
                let parsed = parse_date(cell);
                if parsed.is_none() && !cell.trim().is_empty() {
                    unparsable += 1;
                }
                parsed
            })
            .collect();

        let frame = frame.drop(date_column)?;
        Ok((Self::new(frame, dates), unparsable))
    }

    /// Number of rows.
    pub fn height(&self) -> usize {
        self.dates.len()
    }

    pub fn is_empty(&self) -> bool {
        self.dates.is_empty()
    }

    pub fn dates(&self) -> &[Option<NaiveDate>] {
        &self.dates
    }

    #[allow(dead_code)]
    pub fn frame(&self) -> &DataFrame {
        &self.frame
    }

    /// Names of the non-date columns, in file order.
    #[allow(dead_code)]
    pub fn get_columns(&self) -> Vec<String> {
        self.frame
            .get_column_names()
            .iter()
            .map(|s| s.to_string())
            .collect()
    }

    pub fn has_column(&self, column: &str) -> bool {
        self.frame.column(column).is_ok()
    }

    /// Names of integer and float columns, in file order.
    pub fn get_numeric_columns(&self) -> Vec<String> {
        self.frame
            .get_columns()
            .iter()
            .filter(|col| is_numeric(col.dtype()))
            .map(|col| col.name().to_string())
            .collect()
    }

    /// Values of a numeric column as `f64`, nulls kept as `None`.
    pub fn numeric_values(&self, column: &str) -> Option<Vec<Option<f64>>> {
        let col = self.frame.column(column).ok()?;
        if !is_numeric(col.dtype()) {
            return None;
        }
        let as_f64 = col.cast(&DataType::Float64).ok()?;
        let ca = as_f64.f64().ok()?;
        Some(ca.into_iter().collect())
    }

    /// Values of any column rendered as text, nulls kept as `None`.
    pub fn text_values(&self, column: &str) -> Option<Vec<Option<String>>> {
        let col = self.frame.column(column).ok()?;
        let as_text = col.cast(&DataType::String).ok()?;
        let ca = as_text.as_materialized_series().str().ok()?;
        Some(
            ca.into_iter()
                .map(|v| v.map(|s| s.trim_matches('"').to_string()))
                .collect(),
        )
    }

    /// Earliest and latest non-null date.
    pub fn date_bounds(&self) -> Option<(NaiveDate, NaiveDate)> {
        let mut dates = self.dates.iter().flatten();
        let first = *dates.next()?;
        Some(dates.fold((first, first), |(lo, hi), &d| (lo.min(d), hi.max(d))))
    }

    /// Keep the rows whose mask entry is `true`.
    pub fn select_rows(&self, mask: &[bool]) -> PolarsResult<Self> {
        let dates = self
            .dates
            .iter()
            .zip(mask)
            .filter(|(_, &keep)| keep)
            .map(|(d, _)| *d)
            .collect();

        let frame = if self.frame.width() == 0 {
            self.frame.clone()
        } else {
            let mask = BooleanChunked::from_slice("mask".into(), mask);
            self.frame.filter(&mask)?
        };

        Ok(Self::new(frame, dates))
    }
}
