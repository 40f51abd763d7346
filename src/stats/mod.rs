//! Stats module - Statistical computations

mod calculator;

pub use calculator::{ColumnStats, CorrelationMatrix, Histogram, StatsCalculator, KDE_POINTS};
