//! # CRM Dashboard
//!
//! Analytics dashboard for customer feedback - a Rust application that
//! fetches chart data and an AI-written report from the analytics backend,
//! renders them, and exports the report as PDF.
//!
//! ## Features
//!
//! - **Charts**: sentiment, category, rating and timeline views (ECharts)
//! - **Report display**: quick-insight cards and a styled markdown body
//! - **PDF export**: backend-rendered PDF, opened for download
//! - **Theme**: light/dark, persisted across sessions
//!
//! ## Modules
//!
//! - [`backend`]: REST client for the analytics backend
//! - [`controller`]: view state and the report/PDF lifecycles
//! - [`render`]: HTML for charts, report and page
//! - [`theme`]: theme value and persistence
//! - [`server`]: dashboard host with Axum
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use crm_dashboard::backend::{BackendClient, BackendConfig};
//! use crm_dashboard::controller::{DashboardController, NavigationQueue};
//! use crm_dashboard::theme::MemoryThemeStore;
//! use std::sync::Arc;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let backend = Arc::new(BackendClient::new(BackendConfig::default())?);
//!     let downloads = Arc::new(NavigationQueue::new());
//!     let controller =
//!         DashboardController::new(backend, downloads, Arc::new(MemoryThemeStore::new()));
//!
//!     let outcome = controller.generate_report().await?;
//!     println!("Report: {:?}", outcome);
//!
//!     Ok(())
//! }
//! ```

pub mod backend;
pub mod config;
pub mod controller;
pub mod logging;
pub mod palette;
pub mod render;
pub mod server;
pub mod theme;

// Re-export top-level types for convenience
pub use backend::{
    AnalyticsBackend, BackendClient, BackendConfig, BackendError, ChartsData, PdfResponse,
    ReportData,
};

pub use controller::{
    DashboardController, DashboardError, NavigationQueue, Navigator, PdfOutcome, ReportOutcome,
    ViewBranch, ViewState,
};

pub use render::{render_page, PageOptions};

pub use server::{build_router, serve, AppState, ServerError};

pub use theme::{FileThemeStore, Theme, ThemeError, ThemeStore};

pub use config::{Config, ConfigError, LoggingConfig};
