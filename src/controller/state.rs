//! View State
//!
//! Everything the page renderer needs, as a plain value.

use super::toast::Toast;
use crate::backend::{ChartsData, ReportData};
use crate::theme::Theme;

/// Snapshot of the dashboard's UI state
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ViewState {
    /// A report-generation sequence is in flight
    pub loading: bool,
    pub report_data: Option<ReportData>,
    pub charts_data: Option<ChartsData>,
    /// User-visible message of the last failed action
    pub error: Option<String>,
    /// A PDF export is in flight
    pub pdf_generating: bool,
    pub theme: Theme,
    /// Transient confirmation message
    pub toast: Option<Toast>,
}

/// The four mutually exclusive bodies of the dashboard page
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ViewBranch {
    /// Error banner (plus any charts fetched before the failure)
    Error,
    /// Spinner while the report is generated
    Loading,
    /// "No report yet" prompt
    Empty,
    /// Charts and report
    Populated,
}

impl ViewState {
    pub fn branch(&self) -> ViewBranch {
        if self.loading {
            ViewBranch::Loading
        } else if self.report_data.is_some() {
            ViewBranch::Populated
        } else if self.error.is_some() {
            ViewBranch::Error
        } else {
            ViewBranch::Empty
        }
    }

    pub fn has_report(&self) -> bool {
        self.report_data.is_some()
    }

    /// The generate control accepts clicks
    pub fn can_generate(&self) -> bool {
        !self.loading
    }

    /// The PDF control accepts clicks. Exports wait for a running report.
    pub fn can_export(&self) -> bool {
        self.has_report() && !self.loading && !self.pdf_generating
    }

    /// Something is in flight and the page should poll for the settled state
    pub fn is_busy(&self) -> bool {
        self.loading || self.pdf_generating
    }
}
