//! Dashboard State
//! Selected view and date range; re-filters and re-renders on each interaction.

use crate::data::{filter_by_date, DataContext, Dataset, DateRange};
use crate::views::{render, RenderInput, View, ViewOutput};
use chrono::NaiveDate;

/// User interactions that change what is displayed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DashboardEvent {
    ViewSelected(View),
    StartDateChanged(NaiveDate),
    EndDateChanged(NaiveDate),
    /// Back to the full date span of the daily dataset.
    ResetRange,
}

/// Current selection plus the filtered datasets and rendered output it produces.
pub struct Dashboard {
    view: View,
    range: DateRange,
    default_range: DateRange,
    category_columns: Vec<String>,
    filtered_daily: Dataset,
    filtered_hourly: Dataset,
    output: ViewOutput,
    error: Option<String>,
}

impl Dashboard {
    /// Start on the first view with the full date range.
    pub fn new(data: &DataContext, category_columns: Vec<String>) -> Self {
        let default_range = data.default_range();
        let mut dashboard = Self {
            view: View::default(),
            range: default_range,
            default_range,
            category_columns,
            filtered_daily: data.daily.clone(),
            filtered_hourly: data.hourly.clone(),
            output: ViewOutput::Unavailable(String::new()),
            error: None,
        };
        dashboard.refresh(data);
        dashboard
    }

    /// Apply an event. Returns `false` when it changed nothing.
    pub fn handle(&mut self, data: &DataContext, event: DashboardEvent) -> bool {
        let before = (self.view, self.range);
        match event {
            DashboardEvent::ViewSelected(view) => self.view = view,
            DashboardEvent::StartDateChanged(start) => self.range.start = start,
            DashboardEvent::EndDateChanged(end) => self.range.end = end,
            DashboardEvent::ResetRange => self.range = self.default_range,
        }

        if before == (self.view, self.range) {
            return false;
        }

        log::debug!("{:?} -> view {:?}, range {:?}", event, self.view, self.range);
        self.refresh(data);
        true
    }

    fn refresh(&mut self, data: &DataContext) {
        let filtered = filter_by_date(&data.daily, &self.range)
            .and_then(|daily| Ok((daily, filter_by_date(&data.hourly, &self.range)?)));

        match filtered {
            Ok((daily, hourly)) => {
                self.filtered_daily = daily;
                self.filtered_hourly = hourly;
                self.error = None;
            }
            Err(e) => {
                log::error!("Date filter failed: {}", e);
                self.error = Some(format!("Date filter failed: {}", e));
                self.output = ViewOutput::Unavailable(e.to_string());
                return;
            }
        }

        let input = RenderInput {
            daily: &self.filtered_daily,
            hourly: &self.filtered_hourly,
            full_hourly: &data.hourly,
            category_columns: &self.category_columns,
        };
        self.output = render(self.view, &input);
        log::debug!(
            "Rendered {:?} from {} daily / {} hourly rows",
            self.view,
            self.filtered_daily.height(),
            self.filtered_hourly.height()
        );
    }

    pub fn view(&self) -> View {
        self.view
    }

    pub fn range(&self) -> DateRange {
        self.range
    }

    pub fn default_range(&self) -> DateRange {
        self.default_range
    }

    /// Start after end: the filtered views are empty.
    pub fn range_is_inverted(&self) -> bool {
        self.range.is_inverted()
    }

    pub fn filtered_daily(&self) -> &Dataset {
        &self.filtered_daily
    }

    pub fn filtered_hourly(&self) -> &Dataset {
        &self.filtered_hourly
    }

    pub fn output(&self) -> &ViewOutput {
        &self.output
    }

    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }
}
