//! Application State
//!
//! Shared state accessible by all dashboard handlers.

use std::sync::Arc;
use std::time::Instant;

use crate::backend::AnalyticsBackend;
use crate::controller::{DashboardController, NavigationQueue};
use crate::render::PageOptions;

/// Shared application state for all handlers
#[derive(Clone)]
pub struct AppState {
    /// Owner of the view state and both request lifecycles
    pub controller: Arc<DashboardController>,
    /// Downloads opened by the controller, drained on the next page render
    pub downloads: Arc<NavigationQueue>,
    /// Backend used for the status probe
    pub backend: Arc<dyn AnalyticsBackend>,
    pub page: PageOptions,
    /// Server start time for uptime tracking
    pub start_time: Instant,
}

impl AppState {
    pub fn new(
        controller: Arc<DashboardController>,
        downloads: Arc<NavigationQueue>,
        backend: Arc<dyn AnalyticsBackend>,
        page: PageOptions,
    ) -> Self {
        Self {
            controller,
            downloads,
            backend,
            page,
            start_time: Instant::now(),
        }
    }

    /// Get server uptime in seconds
    pub fn uptime_seconds(&self) -> u64 {
        self.start_time.elapsed().as_secs()
    }
}
