//! Data module - CSV loading, date coercion and date-range filtering

mod dataset;
mod filter;
mod loader;

pub use dataset::Dataset;
pub use filter::{filter_by_date, DateRange};
pub use loader::{DataContext, DataLoader};
