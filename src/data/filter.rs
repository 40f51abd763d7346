//! Date Filter Module
//! Restricts a dataset to the rows whose date falls inside an inclusive range.

use crate::data::Dataset;
use chrono::NaiveDate;
use polars::prelude::PolarsResult;

/// Inclusive calendar-date range. `start > end` is allowed and matches nothing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DateRange {
    pub start: NaiveDate,
    pub end: NaiveDate,
}

impl DateRange {
    pub fn new(start: NaiveDate, end: NaiveDate) -> Self {
        Self { start, end }
    }

    pub fn contains(&self, date: NaiveDate) -> bool {
        self.start <= date && date <= self.end
    }

    pub fn is_inverted(&self) -> bool {
        self.start > self.end
    }
}

/// Rows of `dataset` with a date in `range`. Null dates never match.
pub fn filter_by_date(dataset: &Dataset, range: &DateRange) -> PolarsResult<Dataset> {
    let mask: Vec<bool> = dataset
        .dates()
        .iter()
        .map(|d| d.is_some_and(|d| range.contains(d)))
        .collect();
    dataset.select_rows(&mask)
}

#[cfg(test)]
mod tests {
    use super::*;
    use polars::prelude::*;

    fn day(d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2011, 1, d).unwrap()
    }

    /// Ten consecutive days plus one row with a null date.
    fn dataset() -> Dataset {
        let mut dates: Vec<Option<NaiveDate>> = (1..=10).map(|d| Some(day(d))).collect();
        dates.push(None);
        let counts: Vec<i64> = (1..=11).collect();
        let frame = DataFrame::new(vec![Column::new("cnt".into(), counts)]).unwrap();
        Dataset::new(frame, dates)
    }

    #[test]
    fn every_row_is_inside_the_range_and_none_is_missed() {
        let ds = dataset();
        for (start, end) in [(1, 10), (3, 7), (5, 5), (9, 10)] {
            let range = DateRange::new(day(start), day(end));
            let filtered = filter_by_date(&ds, &range).unwrap();

            assert!(filtered
                .dates()
                .iter()
                .all(|d| d.is_some_and(|d| range.contains(d))));

            let expected = ds
                .dates()
                .iter()
                .filter(|d| d.is_some_and(|d| range.contains(d)))
                .count();
            assert_eq!(filtered.height(), expected);
            assert_eq!(filtered.frame().height(), expected);
        }
    }

    #[test]
    fn bounds_are_inclusive() {
        let filtered = filter_by_date(&dataset(), &DateRange::new(day(2), day(4))).unwrap();
        assert_eq!(
            filtered.numeric_values("cnt"),
            Some(vec![Some(2.0), Some(3.0), Some(4.0)])
        );
    }

    #[test]
    fn inverted_range_is_empty() {
        let range = DateRange::new(day(8), day(2));
        assert!(range.is_inverted());
        let filtered = filter_by_date(&dataset(), &range).unwrap();
        assert!(filtered.is_empty());
        assert_eq!(filtered.get_columns(), vec!["cnt"]);
    }

    #[test]
    fn range_outside_data_is_empty() {
        let range = DateRange::new(
            NaiveDate::from_ymd_opt(2020, 1, 1).unwrap(),
            NaiveDate::from_ymd_opt(2020, 12, 31).unwrap(),
        );
        assert!(filter_by_date(&dataset(), &range).unwrap().is_empty());
    }
}
