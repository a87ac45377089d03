//! Backend Payloads
//!
//! Request/response shapes exchanged with the analytics backend. These are
//! pass-through payloads: the dashboard renders them as received and never
//! re-aggregates them.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

// ============ Charts ============

/// Pre-aggregated chart dataset produced by the backend
#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
pub struct ChartsData {
    #[serde(default)]
    pub sentiment_distribution: Vec<NamedValue>,
    #[serde(default)]
    pub category_distribution: Vec<NamedValue>,
    #[serde(default)]
    pub rating_by_category: Vec<CategoryRating>,
    #[serde(default)]
    pub time_series: Vec<DatedCount>,
    /// Total number of feedback rows analyzed
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub total_complaints: Option<u64>,
    /// Number of low-rated (priority) issues
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub priority_count: Option<u64>,
    /// Classifier confidence summary
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub confidence_stats: Option<ConfidenceStats>,
}

impl ChartsData {
    /// Whether the backend sent any of the summary totals
    pub fn has_summary(&self) -> bool {
        self.total_complaints.is_some()
            || self.priority_count.is_some()
            || self.confidence_stats.is_some()
    }
}

/// A labelled magnitude (sentiment or category bucket)
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct NamedValue {
    pub name: String,
    pub value: f64,
}

/// Average rating of one category, expected in [0, 5]
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct CategoryRating {
    pub category: String,
    pub rating: f64,
}

/// Number of feedback entries on one date
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct DatedCount {
    pub date: String,
    pub count: f64,
}

/// Each figure is absent when the backend could not compute it
#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
pub struct ConfidenceStats {
    #[serde(default)]
    pub mean: Option<f64>,
    #[serde(default)]
    pub median: Option<f64>,
    #[serde(default)]
    pub min: Option<f64>,
    #[serde(default)]
    pub max: Option<f64>,
}

/// `GET /charts-data` wraps the dataset in a status envelope
#[derive(Debug, Deserialize)]
pub(crate) struct ChartsEnvelope {
    pub data: ChartsData,
}

// ============ Report ============

/// Generated report: markdown body plus short insight bullets
#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
pub struct ReportData {
    pub report: String,
    #[serde(default)]
    pub insights: Vec<String>,
}

impl ReportData {
    pub fn new(report: impl Into<String>, insights: Vec<String>) -> Self {
        Self {
            report: report.into(),
            insights,
        }
    }
}

// ============ PDF ============

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct PdfResponse {
    pub status: String,
    #[serde(default)]
    pub filename: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

impl PdfResponse {
    pub fn is_success(&self) -> bool {
        self.status == "success"
    }
}

// ============ Analytics / Health ============

/// `POST /analyze-data` result; the analytics object is opaque to the dashboard
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct AnalyticsPayload {
    pub status: String,
    #[serde(default)]
    pub data: serde_json::Map<String, serde_json::Value>,
}

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct HealthPayload {
    pub status: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timestamp: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data_source: Option<String>,
    #[serde(flatten)]
    pub extra: HashMap<String, serde_json::Value>,
}

impl HealthPayload {
    pub fn is_healthy(&self) -> bool {
        self.status == "healthy"
    }
}

/// `GET /database/test` result
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct DatabaseStatus {
    pub status: String,
    #[serde(default)]
    pub connected: bool,
    #[serde(default)]
    pub message: String,
}
