//! CRM Dashboard Server
//!
//! Run with: cargo run --bin crm-dashboard
//!
//! # Configuration
//!
//! Read from `~/.config/crm-dashboard/config.toml` or `./config.toml`, then
//! overridden by environment variables:
//! - `CRM_DASHBOARD_BACKEND_URL`: analytics backend API root
//! - `CRM_DASHBOARD_HOST` / `CRM_DASHBOARD_PORT`: bind address
//! - `CRM_DASHBOARD_PREFERENCES`: theme preference file
//! - `CRM_DASHBOARD_LOG_LEVEL` / `CRM_DASHBOARD_LOG_FORMAT`: logging
//! - `RUST_LOG`: full filter override

use crm_dashboard::backend::{AnalyticsBackend, BackendClient};
use crm_dashboard::config::Config;
use crm_dashboard::controller::{DashboardController, NavigationQueue};
use crm_dashboard::server::{serve, AppState};
use crm_dashboard::theme::FileThemeStore;
use std::sync::Arc;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let config = Config::load_default();
    crm_dashboard::logging::init(&config.logging);

    tracing::info!("Starting CRM dashboard v{}", env!("CARGO_PKG_VERSION"));
    tracing::info!("Analytics backend: {}", config.backend.base_url);
    tracing::info!("Preferences file: {}", config.preferences.path);

    let client = Arc::new(BackendClient::new(config.backend.client_config())?);

    match client.health_check().await {
        Ok(health) if health.is_healthy() => tracing::info!(
            data_source = ?health.data_source,
            "Backend connection verified"
        ),
        Ok(health) => tracing::warn!("Backend reports status {}", health.status),
        Err(e) => tracing::warn!("Backend not available: {} (reports will fail until it is)", e),
    }

    let backend: Arc<dyn AnalyticsBackend> = client;
    let downloads = Arc::new(NavigationQueue::new());
    let theme_store = Arc::new(FileThemeStore::new(&config.preferences.path));

    let controller = Arc::new(
        DashboardController::new(Arc::clone(&backend), downloads.clone(), theme_store)
            .with_toast_duration(config.dashboard.toast_duration()),
    );
    tracing::info!("Theme: {}", controller.theme());

    let state = AppState::new(
        controller,
        downloads,
        backend,
        config.dashboard.page_options(),
    );

    serve(state, &config.dashboard.addr()).await?;

    tracing::info!("CRM dashboard stopped");
    Ok(())
}
