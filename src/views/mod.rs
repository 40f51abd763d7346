//! Views module - View selection and the renderer behind each view

mod renderers;
mod view;

pub use renderers::{
    render, AveragePoint, CategoryCounts, DistributionSeries, RenderInput, TrendSeries, ViewOutput,
};
pub use view::{category_label, weekday_label, View};
