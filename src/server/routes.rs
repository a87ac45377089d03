//! Dashboard Routes
//!
//! - GET  / - render the dashboard for the current state
//! - POST /actions/generate-report - start a report sequence
//! - POST /actions/export-pdf - start a PDF export
//! - POST /actions/toggle-theme - flip and persist the theme
//! - GET  /assets/dashboard.css - stylesheet
//! - GET  /status - dashboard and backend status
//!
//! Actions answer with a redirect to `/` as soon as the state transition is
//! made; the backend call runs on a spawned task and the page polls until
//! it settles.

use axum::{
    extract::State,
    http::header,
    response::{Html, IntoResponse, Redirect},
    Json,
};
use serde::Serialize;
use std::sync::Arc;

use super::error::ServerResult;
use super::state::AppState;
use crate::controller::DashboardError;
use crate::render::{render_page, STYLESHEET};

/// GET /
pub async fn dashboard(State(state): State<Arc<AppState>>) -> Html<String> {
    let view = state.controller.snapshot().await;
    let downloads = state.downloads.drain();
    Html(render_page(&view, &downloads, &state.page).into_string())
}

/// POST /actions/generate-report
///
/// A click while a report is loading is ignored.
pub async fn generate_report(State(state): State<Arc<AppState>>) -> Redirect {
    match state.controller.begin_report().await {
        Ok(ticket) => {
            let controller = Arc::clone(&state.controller);
            tokio::spawn(async move {
                controller.complete_report(ticket).await;
            });
        }
        Err(e) => tracing::debug!("Ignoring generate request: {}", e),
    }

    Redirect::to("/")
}

/// POST /actions/export-pdf
pub async fn export_pdf(State(state): State<Arc<AppState>>) -> ServerResult<Redirect> {
    match state.controller.begin_pdf().await {
        Ok(ticket) => {
            let controller = Arc::clone(&state.controller);
            tokio::spawn(async move {
                controller.complete_pdf(ticket).await;
            });
        }
        Err(e @ DashboardError::Busy(_)) => tracing::debug!("Ignoring export request: {}", e),
        Err(e) => return Err(e.into()),
    }

    Ok(Redirect::to("/"))
}

/// POST /actions/toggle-theme
pub async fn toggle_theme(State(state): State<Arc<AppState>>) -> ServerResult<Redirect> {
    state.controller.toggle_theme()?;
    Ok(Redirect::to("/"))
}

/// GET /assets/dashboard.css
pub async fn stylesheet() -> impl IntoResponse {
    ([(header::CONTENT_TYPE, "text/css; charset=utf-8")], STYLESHEET)
}

#[derive(Debug, Serialize)]
pub struct StatusResponse {
    pub dashboard: DashboardStatus,
    pub backend: BackendStatus,
}

#[derive(Debug, Serialize)]
pub struct DashboardStatus {
    pub version: String,
    pub uptime_seconds: u64,
    pub theme: String,
    pub loading: bool,
    pub pdf_generating: bool,
    pub has_report: bool,
}

#[derive(Debug, Serialize)]
pub struct BackendStatus {
    pub reachable: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data_source: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

/// GET /status
///
/// Always 200; an unreachable backend is reported in the body.
pub async fn status(State(state): State<Arc<AppState>>) -> Json<StatusResponse> {
    let view = state.controller.snapshot().await;

    let backend = match state.backend.health().await {
        Ok(health) => BackendStatus {
            reachable: true,
            status: Some(health.status),
            data_source: health.data_source,
            error: None,
        },
        Err(e) => {
            tracing::warn!("Backend health check failed: {}", e);
            BackendStatus {
                reachable: false,
                status: None,
                data_source: None,
                error: Some(e.to_string()),
            }
        }
    };

    Json(StatusResponse {
        dashboard: DashboardStatus {
            version: env!("CARGO_PKG_VERSION").to_string(),
            uptime_seconds: state.uptime_seconds(),
            theme: view.theme.to_string(),
            loading: view.loading,
            pdf_generating: view.pdf_generating,
            has_report: view.has_report(),
        },
        backend,
    })
}
