//! View Selector
//! The closed set of dashboard views and their display labels.

/// Weekday labels indexed by the dataset's weekday code (0 = Sunday).
pub const WEEKDAY_LABELS: [&str; 7] = [
    "Sunday",
    "Monday",
    "Tuesday",
    "Wednesday",
    "Thursday",
    "Friday",
    "Saturday",
];

/// One of the seven dashboard views.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum View {
    #[default]
    NumericStats,
    CategoryDistribution,
    Correlation,
    UsageDistribution,
    WeekdayAverage,
    HourlyAverage,
    CasualRegisteredTrend,
}

impl View {
    /// Menu order.
    pub const ALL: [View; 7] = [
        View::NumericStats,
        View::CategoryDistribution,
        View::Correlation,
        View::UsageDistribution,
        View::WeekdayAverage,
        View::HourlyAverage,
        View::CasualRegisteredTrend,
    ];

    /// Short label for the navigation menu.
    pub fn label(self) -> &'static str {
        match self {
            View::NumericStats => "Numeric Statistics",
            View::CategoryDistribution => "Category Distribution",
            View::Correlation => "Numeric Correlation",
            View::UsageDistribution => "Usage Distribution",
            View::WeekdayAverage => "Average Rentals by Weekday",
            View::HourlyAverage => "Average Rentals by Hour",
            View::CasualRegisteredTrend => "Casual vs Registered Trend",
        }
    }

    /// Heading shown above the view.
    pub fn title(self) -> &'static str {
        match self {
            View::NumericStats => "Descriptive Statistics of Numeric Columns",
            View::CategoryDistribution => "Distribution of Categorical Columns",
            View::Correlation => "Correlation Between Numeric Columns",
            View::UsageDistribution => "Bike Usage Distribution (Casual vs Registered)",
            View::WeekdayAverage => "Average Bike Rentals by Day of the Week",
            View::HourlyAverage => "Average Bike Rentals by Hour of the Day",
            View::CasualRegisteredTrend => "Casual vs Registered Usage Trend",
        }
    }

    /// Whether the view produces a chart (and can be exported as an image).
    pub fn is_chart(self) -> bool {
        !matches!(self, View::NumericStats | View::CategoryDistribution)
    }
}

/// Readable name for a known categorical code.
pub fn category_label(column: &str, value: &str) -> Option<&'static str> {
    let code = value.trim().parse::<f64>().ok()?.round() as i64;
    match (column, code) {
        ("season", 1) => Some("Spring"),
        ("season", 2) => Some("Summer"),
        ("season", 3) => Some("Fall"),
        ("season", 4) => Some("Winter"),
        ("workingday", 0) => Some("Weekend / holiday"),
        ("workingday", 1) => Some("Working day"),
        ("weathersit", 1) => Some("Clear, partly cloudy"),
        ("weathersit", 2) => Some("Mist, cloudy"),
        ("weathersit", 3) => Some("Light snow or rain"),
        ("weathersit", 4) => Some("Heavy rain, snow, fog"),
        _ => None,
    }
}

/// Label for a weekday code, or the code itself when out of range.
pub fn weekday_label(code: i64) -> String {
    usize::try_from(code)
        .ok()
        .and_then(|i| WEEKDAY_LABELS.get(i))
        .map(|s| s.to_string())
        .unwrap_or_else(|| code.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn all_views_are_distinct_and_labelled() {
        let labels: HashSet<&str> = View::ALL.iter().map(|v| v.label()).collect();
        assert_eq!(labels.len(), 7);
        assert_eq!(View::default(), View::ALL[0]);
    }

    #[test]
    fn only_table_views_are_not_charts() {
        let tables: Vec<View> = View::ALL.into_iter().filter(|v| !v.is_chart()).collect();
        assert_eq!(tables, vec![View::NumericStats, View::CategoryDistribution]);
    }

    #[test]
    fn labels_known_codes() {
        assert_eq!(category_label("season", "3"), Some("Fall"));
        assert_eq!(category_label("weathersit", "1.0"), Some("Clear, partly cloudy"));
        assert_eq!(category_label("season", "9"), None);
        assert_eq!(category_label("holiday", "1"), None);
        assert_eq!(weekday_label(0), "Sunday");
        assert_eq!(weekday_label(6), "Saturday");
        assert_eq!(weekday_label(7), "7");
    }
}
