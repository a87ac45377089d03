//! Dashboard Controller
//!
//! Owns the view state and drives the two request lifecycles:
//!
//! - **Report**: Idle → Loading → (Populated | Error). Charts are fetched
//!   first, then the report. A report failure after a successful chart fetch
//!   keeps the fresh charts and surfaces the error next to them.
//! - **PDF export**: Populated → Generating → (download + toast | error).
//!   A failed export never clears the report or charts.
//!
//! Each lifecycle has a `begin_*` step that performs the synchronous state
//! transition and a `complete_*` step that does the I/O, so a host can answer
//! the user before the backend settles.

mod navigator;
mod state;
mod toast;

pub use navigator::{NavigationQueue, Navigator};
pub use state::{ViewBranch, ViewState};
pub use toast::{Toast, ToastSlot, TOAST_DURATION};

use std::fmt;
use std::sync::Arc;
use std::time::Duration;

use parking_lot::Mutex;
use thiserror::Error;
use tokio::sync::RwLock;

use crate::backend::{AnalyticsBackend, BackendError};
use crate::theme::{Theme, ThemeError, ThemePreference, ThemeStore};

pub const REPORT_FAILED_MESSAGE: &str = "Failed to generate report. Please try again.";
pub const PDF_FAILED_MESSAGE: &str = "Failed to generate PDF. Please try again.";
pub const PDF_SUCCESS_MESSAGE: &str = "PDF downloaded successfully!";

/// User actions that can be in flight
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    Report,
    Pdf,
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Action::Report => f.write_str("report generation"),
            Action::Pdf => f.write_str("PDF export"),
        }
    }
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum DashboardError {
    #[error("A {0} is already in progress")]
    Busy(Action),

    #[error("No report to export; generate a report first")]
    NothingToExport,
}

/// Proof that `begin_report` succeeded; consumed by `complete_report`
#[must_use = "a started report must be completed"]
#[derive(Debug)]
pub struct ReportTicket {
    _private: (),
}

/// Proof that `begin_pdf` succeeded; consumed by `complete_pdf`
#[must_use = "a started export must be completed"]
#[derive(Debug)]
pub struct PdfTicket {
    _private: (),
}

/// How a report-generation sequence settled
#[derive(Debug, Clone, PartialEq)]
pub enum ReportOutcome {
    /// Charts and report stored
    Populated,
    /// Charts stored, report request failed
    ChartsOnly { message: String },
    /// Chart request failed; the report was not requested
    Failed { message: String },
}

/// How a PDF export settled
#[derive(Debug, Clone, PartialEq)]
pub enum PdfOutcome {
    Downloaded { filename: String, url: String },
    Failed { message: String },
}

/// The dashboard's single source of UI state
pub struct DashboardController {
    backend: Arc<dyn AnalyticsBackend>,
    navigator: Arc<dyn Navigator>,
    state: RwLock<ViewState>,
    theme: Mutex<ThemePreference>,
    toast: ToastSlot,
}

impl DashboardController {
    /// Create a controller; the stored theme is read here, once
    pub fn new(
        backend: Arc<dyn AnalyticsBackend>,
        navigator: Arc<dyn Navigator>,
        theme_store: Arc<dyn ThemeStore>,
    ) -> Self {
        let theme = ThemePreference::load(theme_store);
        let state = ViewState {
            theme: theme.current(),
            ..Default::default()
        };

        Self {
            backend,
            navigator,
            state: RwLock::new(state),
            theme: Mutex::new(theme),
            toast: ToastSlot::default(),
        }
    }

    /// Override how long confirmation toasts stay visible
    pub fn with_toast_duration(mut self, duration: Duration) -> Self {
        self.toast = ToastSlot::new(duration);
        self
    }

    /// Current state for rendering
    pub async fn snapshot(&self) -> ViewState {
        let mut view = self.state.read().await.clone();
        view.theme = self.theme.lock().current();
        view.toast = self.toast.current();
        view
    }

    pub fn theme(&self) -> Theme {
        self.theme.lock().current()
    }

    /// Flip the theme and persist it immediately
    pub fn toggle_theme(&self) -> Result<Theme, ThemeError> {
        let result = self.theme.lock().toggle();
        match &result {
            Ok(theme) => tracing::debug!(theme = %theme, "Theme toggled"),
            Err(e) => tracing::warn!("Failed to persist theme: {}", e),
        }
        result
    }

    // ============ Report ============

    /// Idle → Loading. Clears the previous error.
    pub async fn begin_report(&self) -> Result<ReportTicket, DashboardError> {
        let mut state = self.state.write().await;
        if state.loading {
            return Err(DashboardError::Busy(Action::Report));
        }

        state.loading = true;
        state.error = None;
        tracing::debug!("Report generation started");

        Ok(ReportTicket { _private: () })
    }

    /// Fetch charts then the report, and settle the state
    pub async fn complete_report(&self, _ticket: ReportTicket) -> ReportOutcome {
        let charts = match self.backend.charts_data().await {
            Ok(charts) => charts,
            Err(e) => {
                let message = failure_message(&e, REPORT_FAILED_MESSAGE);
                tracing::warn!(status = ?e.status(), "Charts request failed: {}", e);

                let mut state = self.state.write().await;
                state.loading = false;
                state.charts_data = None;
                state.report_data = None;
                state.error = Some(message.clone());

                return ReportOutcome::Failed { message };
            }
        };

        self.state.write().await.charts_data = Some(charts);

        let outcome = match self.backend.generate_report().await {
            Ok(report) => {
                let mut state = self.state.write().await;
                state.report_data = Some(report);
                ReportOutcome::Populated
            }
            Err(e) => {
                let message = failure_message(&e, REPORT_FAILED_MESSAGE);
                tracing::warn!(status = ?e.status(), "Report request failed: {}", e);

                let mut state = self.state.write().await;
                state.report_data = None;
                state.error = Some(message.clone());
                ReportOutcome::ChartsOnly { message }
            }
        };

        self.state.write().await.loading = false;
        tracing::info!(outcome = ?outcome, "Report generation settled");
        outcome
    }

    /// `begin_report` followed by `complete_report`
    pub async fn generate_report(&self) -> Result<ReportOutcome, DashboardError> {
        let ticket = self.begin_report().await?;
        Ok(self.complete_report(ticket).await)
    }

    // ============ PDF ============

    /// Populated → Generating. Refused while a report is still running.
    pub async fn begin_pdf(&self) -> Result<PdfTicket, DashboardError> {
        let mut state = self.state.write().await;
        if state.pdf_generating {
            return Err(DashboardError::Busy(Action::Pdf));
        }
        if state.loading {
            return Err(DashboardError::Busy(Action::Report));
        }
        if state.report_data.is_none() {
            return Err(DashboardError::NothingToExport);
        }

        state.pdf_generating = true;
        state.error = None;
        tracing::debug!("PDF export started");

        Ok(PdfTicket { _private: () })
    }

    /// Ask the backend for a PDF; on success open its download and confirm
    pub async fn complete_pdf(&self, _ticket: PdfTicket) -> PdfOutcome {
        let outcome = match self.backend.generate_pdf().await {
            Ok(response) if response.is_success() => {
                let url = self.backend.download_url(&response.filename);
                self.backend
                    .download_pdf(&response.filename, self.navigator.as_ref());
                self.toast.show(PDF_SUCCESS_MESSAGE);
                PdfOutcome::Downloaded {
                    filename: response.filename,
                    url,
                }
            }
            Ok(response) => {
                tracing::warn!(status = %response.status, "PDF generation reported failure");
                let message = response
                    .message
                    .filter(|m| !m.trim().is_empty())
                    .unwrap_or_else(|| PDF_FAILED_MESSAGE.to_string());
                PdfOutcome::Failed { message }
            }
            Err(e) => {
                tracing::warn!(status = ?e.status(), "PDF request failed: {}", e);
                PdfOutcome::Failed {
                    message: failure_message(&e, PDF_FAILED_MESSAGE),
                }
            }
        };

        let mut state = self.state.write().await;
        state.pdf_generating = false;
        if let PdfOutcome::Failed { message } = &outcome {
            state.error = Some(message.clone());
        }

        outcome
    }

    /// `begin_pdf` followed by `complete_pdf`
    pub async fn export_pdf(&self) -> Result<PdfOutcome, DashboardError> {
        let ticket = self.begin_pdf().await?;
        Ok(self.complete_pdf(ticket).await)
    }
}

/// Backend `detail` if present, else the action's generic message
fn failure_message(error: &BackendError, generic: &str) -> String {
    error
        .detail()
        .map(str::to_owned)
        .unwrap_or_else(|| generic.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::backend::{ChartsData, HealthPayload, NamedValue, PdfResponse, ReportData};
    use crate::theme::MemoryThemeStore;
    use async_trait::async_trait;
    use std::sync::atomic::{AtomicUsize, Ordering};

    /// Canned backend reply; failures are rebuilt on every call
    #[derive(Clone)]
    enum Reply<T> {
        Ok(T),
        Fail(u16, &'static str),
    }

    impl<T: Clone> Reply<T> {
        fn get(&self) -> Result<T, BackendError> {
            match self {
                Reply::Ok(value) => Ok(value.clone()),
                Reply::Fail(status, body) => Err(BackendError::from_status(*status, body.to_string())),
            }
        }
    }

    struct FakeBackend {
        charts: Mutex<Reply<ChartsData>>,
        report: Mutex<Reply<ReportData>>,
        pdf: Mutex<Reply<PdfResponse>>,
        report_calls: AtomicUsize,
        pdf_calls: AtomicUsize,
        download_calls: AtomicUsize,
    }

    impl FakeBackend {
        fn healthy() -> Self {
            Self {
                charts: Mutex::new(Reply::Ok(sample_charts())),
                report: Mutex::new(Reply::Ok(sample_report())),
                pdf: Mutex::new(Reply::Ok(PdfResponse {
                    status: "success".into(),
                    filename: "r.pdf".into(),
                    message: None,
                })),
                report_calls: AtomicUsize::new(0),
                pdf_calls: AtomicUsize::new(0),
                download_calls: AtomicUsize::new(0),
            }
        }
    }

    #[async_trait]
    impl AnalyticsBackend for FakeBackend {
        async fn charts_data(&self) -> Result<ChartsData, BackendError> {
            self.charts.lock().get()
        }

        async fn generate_report(&self) -> Result<ReportData, BackendError> {
            self.report_calls.fetch_add(1, Ordering::SeqCst);
            self.report.lock().get()
        }

        async fn generate_pdf(&self) -> Result<PdfResponse, BackendError> {
            self.pdf_calls.fetch_add(1, Ordering::SeqCst);
            self.pdf.lock().get()
        }

        async fn health(&self) -> Result<HealthPayload, BackendError> {
            Err(BackendError::from_status(503, String::new()))
        }

        fn download_url(&self, filename: &str) -> String {
            format!("http://backend/api/download-pdf/{}", filename)
        }

        fn download_pdf(&self, filename: &str, navigator: &dyn Navigator) {
            self.download_calls.fetch_add(1, Ordering::SeqCst);
            navigator.open(&self.download_url(filename));
        }
    }

    fn sample_charts() -> ChartsData {
        ChartsData {
            sentiment_distribution: vec![
                NamedValue { name: "Good".into(), value: 10.0 },
                NamedValue { name: "Bad".into(), value: 2.0 },
            ],
            ..Default::default()
        }
    }

    fn sample_report() -> ReportData {
        ReportData::new("# Summary\n\nAll good.", vec!["Shipping is slow".into()])
    }

    struct Harness {
        backend: Arc<FakeBackend>,
        navigator: Arc<NavigationQueue>,
        store: Arc<MemoryThemeStore>,
        controller: DashboardController,
    }

    fn harness(backend: FakeBackend) -> Harness {
        let backend = Arc::new(backend);
        let navigator = Arc::new(NavigationQueue::new());
        let store = Arc::new(MemoryThemeStore::new());
        let controller = DashboardController::new(backend.clone(), navigator.clone(), store.clone());
        Harness {
            backend,
            navigator,
            store,
            controller,
        }
    }

    #[tokio::test]
    async fn test_generate_report_populates() {
        let h = harness(FakeBackend::healthy());

        let outcome = h.controller.generate_report().await.unwrap();
        assert_eq!(outcome, ReportOutcome::Populated);

        let view = h.controller.snapshot().await;
        assert_eq!(view.branch(), ViewBranch::Populated);
        assert!(!view.loading);
        assert_eq!(view.error, None);
        assert_eq!(view.report_data, Some(sample_report()));
        assert_eq!(view.charts_data, Some(sample_charts()));
    }

    #[tokio::test]
    async fn test_begin_report_sets_loading_and_blocks_second_request() {
        let h = harness(FakeBackend::healthy());

        let ticket = h.controller.begin_report().await.unwrap();
        let view = h.controller.snapshot().await;
        assert!(view.loading);
        assert!(!view.can_generate());
        assert_eq!(view.branch(), ViewBranch::Loading);

        assert_eq!(
            h.controller.begin_report().await.unwrap_err(),
            DashboardError::Busy(Action::Report)
        );
        assert!(h.controller.generate_report().await.is_err());
        assert_eq!(h.backend.report_calls.load(Ordering::SeqCst), 0);

        h.controller.complete_report(ticket).await;
        assert!(h.controller.snapshot().await.can_generate());
        assert_eq!(h.backend.report_calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_begin_report_clears_previous_error() {
        let h = harness(FakeBackend::healthy());
        *h.backend.charts.lock() = Reply::Fail(500, r#"{"detail": "db down"}"#);
        h.controller.generate_report().await.unwrap();
        assert!(h.controller.snapshot().await.error.is_some());

        let ticket = h.controller.begin_report().await.unwrap();
        assert_eq!(h.controller.snapshot().await.error, None);
        h.controller.complete_report(ticket).await;
    }

    #[tokio::test]
    async fn test_charts_failure_uses_detail_and_skips_report() {
        let h = harness(FakeBackend::healthy());
        *h.backend.charts.lock() =
            Reply::Fail(500, r#"{"detail": "Error getting charts data: no csv"}"#);

        let outcome = h.controller.generate_report().await.unwrap();
        assert_eq!(
            outcome,
            ReportOutcome::Failed {
                message: "Error getting charts data: no csv".into()
            }
        );
        assert_eq!(h.backend.report_calls.load(Ordering::SeqCst), 0);

        let view = h.controller.snapshot().await;
        assert!(!view.loading);
        assert_eq!(view.branch(), ViewBranch::Error);
        assert_eq!(view.charts_data, None);
    }

    #[tokio::test]
    async fn test_report_failure_keeps_fresh_charts() {
        let h = harness(FakeBackend::healthy());
        *h.backend.report.lock() = Reply::Fail(503, "Service Unavailable");

        let outcome = h.controller.generate_report().await.unwrap();
        assert_eq!(
            outcome,
            ReportOutcome::ChartsOnly {
                message: REPORT_FAILED_MESSAGE.into()
            }
        );

        let view = h.controller.snapshot().await;
        assert!(!view.loading);
        assert_eq!(view.branch(), ViewBranch::Error);
        assert_eq!(view.charts_data, Some(sample_charts()));
        assert_eq!(view.error.as_deref(), Some(REPORT_FAILED_MESSAGE));
    }

    #[tokio::test]
    async fn test_failed_rerun_clears_stale_report() {
        let h = harness(FakeBackend::healthy());
        h.controller.generate_report().await.unwrap();

        *h.backend.report.lock() = Reply::Fail(500, "{}");
        h.controller.generate_report().await.unwrap();

        // Never both a report and an error after a settled report request
        let view = h.controller.snapshot().await;
        assert!(view.error.is_some());
        assert_eq!(view.report_data, None);
    }

    #[tokio::test]
    async fn test_export_requires_report() {
        let h = harness(FakeBackend::healthy());
        assert_eq!(
            h.controller.export_pdf().await.unwrap_err(),
            DashboardError::NothingToExport
        );
        assert_eq!(h.backend.pdf_calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test(start_paused = true)]
    async fn test_export_success_downloads_once_and_toasts() {
        let h = harness(FakeBackend::healthy());
        h.controller.generate_report().await.unwrap();

        let outcome = h.controller.export_pdf().await.unwrap();
        assert_eq!(
            outcome,
            PdfOutcome::Downloaded {
                filename: "r.pdf".into(),
                url: "http://backend/api/download-pdf/r.pdf".into(),
            }
        );
        assert_eq!(
            h.navigator.drain(),
            vec!["http://backend/api/download-pdf/r.pdf".to_string()]
        );
        assert_eq!(h.backend.download_calls.load(Ordering::SeqCst), 1);

        let view = h.controller.snapshot().await;
        assert!(!view.pdf_generating);
        assert_eq!(
            view.toast.map(|toast| toast.message).as_deref(),
            Some(PDF_SUCCESS_MESSAGE)
        );

        tokio::time::sleep(Duration::from_millis(3001)).await;
        tokio::task::yield_now().await;
        tokio::task::yield_now().await;
        assert_eq!(h.controller.snapshot().await.toast, None);
    }

    #[tokio::test]
    async fn test_export_failure_keeps_data_and_skips_download() {
        let h = harness(FakeBackend::healthy());
        h.controller.generate_report().await.unwrap();
        *h.backend.pdf.lock() = Reply::Fail(500, r#"{"detail": "Error generating PDF: font"}"#);

        let outcome = h.controller.export_pdf().await.unwrap();
        assert_eq!(
            outcome,
            PdfOutcome::Failed {
                message: "Error generating PDF: font".into()
            }
        );
        assert!(h.navigator.is_empty());
        assert_eq!(h.backend.download_calls.load(Ordering::SeqCst), 0);

        let view = h.controller.snapshot().await;
        assert_eq!(view.report_data, Some(sample_report()));
        assert_eq!(view.charts_data, Some(sample_charts()));
        assert_eq!(view.branch(), ViewBranch::Populated);
        assert_eq!(view.toast, None);
        assert!(!view.pdf_generating);
    }

    #[tokio::test]
    async fn test_export_non_success_status_is_failure() {
        let h = harness(FakeBackend::healthy());
        h.controller.generate_report().await.unwrap();
        *h.backend.pdf.lock() = Reply::Ok(PdfResponse {
            status: "error".into(),
            filename: String::new(),
            message: None,
        });

        let outcome = h.controller.export_pdf().await.unwrap();
        assert_eq!(
            outcome,
            PdfOutcome::Failed {
                message: PDF_FAILED_MESSAGE.into()
            }
        );
        assert!(h.navigator.is_empty());
    }

    #[tokio::test]
    async fn test_pdf_serialized_by_busy_flag() {
        let h = harness(FakeBackend::healthy());
        h.controller.generate_report().await.unwrap();

        let ticket = h.controller.begin_pdf().await.unwrap();
        assert!(h.controller.snapshot().await.pdf_generating);
        assert_eq!(
            h.controller.begin_pdf().await.unwrap_err(),
            DashboardError::Busy(Action::Pdf)
        );

        h.controller.complete_pdf(ticket).await;
        assert_eq!(h.backend.pdf_calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_export_refused_while_report_running() {
        let h = harness(FakeBackend::healthy());
        h.controller.generate_report().await.unwrap();

        let ticket = h.controller.begin_report().await.unwrap();
        assert_eq!(
            h.controller.begin_pdf().await.unwrap_err(),
            DashboardError::Busy(Action::Report)
        );
        assert!(!h.controller.snapshot().await.pdf_generating);

        h.controller.complete_report(ticket).await;
        assert!(h.controller.export_pdf().await.is_ok());
        assert_eq!(h.backend.pdf_calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_export_error_survives_overlapping_report() {
        let h = harness(FakeBackend::healthy());
        h.controller.generate_report().await.unwrap();
        *h.backend.pdf.lock() = Reply::Fail(500, r#"{"detail": "Error generating PDF: font"}"#);

        // Export started first, report started while it was in flight
        let pdf = h.controller.begin_pdf().await.unwrap();
        let report = h.controller.begin_report().await.unwrap();

        h.controller.complete_pdf(pdf).await;
        assert_eq!(
            h.controller.complete_report(report).await,
            ReportOutcome::Populated
        );

        let view = h.controller.snapshot().await;
        assert_eq!(view.error.as_deref(), Some("Error generating PDF: font"));
        assert_eq!(view.report_data, Some(sample_report()));
        assert_eq!(view.branch(), ViewBranch::Populated);
    }

    #[tokio::test]
    async fn test_theme_toggle_independent_of_report_state() {
        let h = harness(FakeBackend::healthy());
        let ticket = h.controller.begin_report().await.unwrap();

        assert_eq!(h.controller.toggle_theme().unwrap(), Theme::Dark);
        assert_eq!(h.store.load().as_deref(), Some("dark"));

        let view = h.controller.snapshot().await;
        assert_eq!(view.theme, Theme::Dark);
        assert!(view.loading);

        h.controller.complete_report(ticket).await;
        assert_eq!(h.controller.toggle_theme().unwrap(), Theme::Light);
        assert_eq!(h.store.load().as_deref(), Some("light"));
    }

    #[tokio::test]
    async fn test_stored_theme_read_at_construction() {
        let store = Arc::new(MemoryThemeStore::with_value("dark"));
        let controller = DashboardController::new(
            Arc::new(FakeBackend::healthy()),
            Arc::new(NavigationQueue::new()),
            store,
        );
        assert_eq!(controller.theme(), Theme::Dark);
        assert_eq!(controller.snapshot().await.theme, Theme::Dark);
    }
}
