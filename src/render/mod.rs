//! Dashboard Rendering
//!
//! Pure functions from state to HTML:
//!
//! - [`charts`]: chart section (ECharts options built with charming)
//! - [`report`]: insight cards and markdown report body
//! - [`page`]: the full document around them

pub mod charts;
pub mod page;
pub mod report;

pub use charts::{build_charts, charts_view, ChartKind, DashboardChart};
pub use page::{render_page, PageOptions};
pub use report::{render_markdown, report_view, ElementKind};

/// Dashboard stylesheet (light and dark palettes)
pub const STYLESHEET: &str = include_str!("dashboard.css");
