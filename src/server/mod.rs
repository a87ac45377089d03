//! Dashboard Host
//!
//! Serves the dashboard as server-rendered HTML, built with Axum.
//!
//! # Endpoints
//!
//! - `GET /` - the dashboard page
//! - `POST /actions/generate-report` - generate a report
//! - `POST /actions/export-pdf` - export the report as PDF
//! - `POST /actions/toggle-theme` - toggle light/dark theme
//! - `GET /assets/dashboard.css` - stylesheet
//! - `GET /status` - dashboard and backend status
//!
//! # Example
//!
//! ```rust,ignore
//! use crm_dashboard::backend::{BackendClient, BackendConfig};
//! use crm_dashboard::controller::{DashboardController, NavigationQueue};
//! use crm_dashboard::render::PageOptions;
//! use crm_dashboard::server::{serve, AppState};
//! use crm_dashboard::theme::FileThemeStore;
//! use std::sync::Arc;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let backend = Arc::new(BackendClient::new(BackendConfig::default())?);
//!     let downloads = Arc::new(NavigationQueue::new());
//!     let store = Arc::new(FileThemeStore::new("preferences.json"));
//!     let controller = Arc::new(DashboardController::new(backend.clone(), downloads.clone(), store));
//!
//!     let state = AppState::new(controller, downloads, backend, PageOptions::default());
//!     serve(state, "127.0.0.1:8084").await?;
//!     Ok(())
//! }
//! ```

pub mod error;
pub mod routes;
pub mod state;

pub use error::{ServerError, ServerResult};
pub use state::AppState;

use axum::{
    routing::{get, post},
    Router,
};
use std::sync::Arc;
use tower_http::trace::TraceLayer;

/// Build the dashboard router with all routes and middleware
pub fn build_router(state: AppState) -> Router {
    let actions = Router::new()
        .route("/generate-report", post(routes::generate_report))
        .route("/export-pdf", post(routes::export_pdf))
        .route("/toggle-theme", post(routes::toggle_theme));

    Router::new()
        .route("/", get(routes::dashboard))
        .route("/assets/dashboard.css", get(routes::stylesheet))
        .route("/status", get(routes::status))
        .nest("/actions", actions)
        .layer(TraceLayer::new_for_http())
        .with_state(Arc::new(state))
}

/// Start the dashboard host
pub async fn serve(state: AppState, addr: &str) -> Result<(), ServerError> {
    let router = build_router(state);
    let listener = tokio::net::TcpListener::bind(addr).await?;

    tracing::info!("CRM dashboard listening on http://{}", addr);

    axum::serve(listener, router)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .map_err(|e| ServerError::Internal(format!("Server error: {}", e)))?;

    tracing::info!("CRM dashboard shut down gracefully");
    Ok(())
}

/// Wait for shutdown signal
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!("Failed to install Ctrl+C handler: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                tracing::error!("Failed to install signal handler: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }

    tracing::info!("Shutdown signal received, starting graceful shutdown");
}
