//! Analytics Backend Integration
//!
//! HTTP client for the CRM analytics backend.
//!
//! ## Operations
//!
//! - `POST /analyze-data` - run the analysis, return the raw analytics
//! - `GET /charts-data` - pre-aggregated chart dataset
//! - `POST /generate-report` - markdown report plus quick insights
//! - `POST /generate-pdf` - render the report to a PDF on the backend
//! - `GET /download-pdf/{filename}` - download a generated PDF
//! - `GET /health` - backend health

mod client;
mod dto;
mod error;

pub use client::{AnalyticsBackend, BackendClient, BackendConfig};
pub use dto::{
    AnalyticsPayload, CategoryRating, ChartsData, ConfidenceStats, DatabaseStatus, DatedCount,
    HealthPayload, NamedValue, PdfResponse, ReportData,
};
pub use error::BackendError;
