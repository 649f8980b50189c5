//! ping-report — turn poll logs into uptime timelines.
//!
//! For each log file: parse the records, reduce them to an up/down (or raw
//! status code) series against time of day, optionally smooth with a
//! symmetric any-down-in-window filter, and render an HTML page with an
//! inline SVG chart.

pub mod render;
pub mod timeline;
pub mod views;

pub use render::{RenderError, RenderOptions, Rendered, render_html, render_log};
pub use timeline::{LogSummary, PlotMode, Timeline, any_down_filter};
pub use views::ChartView;
