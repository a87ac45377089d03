//! Analytics Backend REST Client
//!
//! Thin HTTP wrapper over the backend's `/api` surface. One call per
//! operation, no retries, no response validation beyond deserialization.

use async_trait::async_trait;
use reqwest::{Client, Response};
use serde::de::DeserializeOwned;
use std::time::Duration;

use super::dto::{
    AnalyticsPayload, ChartsData, ChartsEnvelope, DatabaseStatus, HealthPayload, PdfResponse,
    ReportData,
};
use super::error::BackendError;
use crate::controller::Navigator;

/// Backend operations the dashboard controller depends on
#[async_trait]
pub trait AnalyticsBackend: Send + Sync {
    /// Fetch the pre-aggregated chart dataset
    async fn charts_data(&self) -> Result<ChartsData, BackendError>;

    /// Ask the backend to generate the markdown report and insights
    async fn generate_report(&self) -> Result<ReportData, BackendError>;

    /// Ask the backend to render the report to a PDF file
    async fn generate_pdf(&self) -> Result<PdfResponse, BackendError>;

    /// Backend liveness
    async fn health(&self) -> Result<HealthPayload, BackendError>;

    /// URL at which a generated PDF can be downloaded
    fn download_url(&self, filename: &str) -> String;

    /// Hand the download URL of a generated PDF to the navigator.
    ///
    /// Fire-and-forget: nothing is returned and nothing is awaited.
    fn download_pdf(&self, filename: &str, navigator: &dyn Navigator) {
        navigator.open(&self.download_url(filename));
    }
}

/// Backend client configuration
#[derive(Debug, Clone)]
pub struct BackendConfig {
    /// Base URL including the `/api` prefix (e.g., "http://localhost:8000/api")
    pub base_url: String,
    /// TCP connect timeout in seconds
    pub connect_timeout_secs: u64,
}

impl Default for BackendConfig {
    fn default() -> Self {
        Self {
            base_url: "http://localhost:8000/api".to_string(),
            connect_timeout_secs: 10,
        }
    }
}

impl BackendConfig {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            ..Default::default()
        }
    }
}

/// REST client for the analytics backend
#[derive(Clone)]
pub struct BackendClient {
    client: Client,
    base_url: String,
}

impl BackendClient {
    pub fn new(config: BackendConfig) -> Result<Self, BackendError> {
        let client = Client::builder()
            .connect_timeout(Duration::from_secs(config.connect_timeout_secs))
            .build()?;

        Ok(Self {
            client,
            base_url: config.base_url.trim_end_matches('/').to_string(),
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    /// POST /analyze-data
    pub async fn get_analytics(&self) -> Result<AnalyticsPayload, BackendError> {
        let response = self.client.post(self.url("/analyze-data")).send().await?;
        decode(response).await
    }

    /// GET /charts-data
    pub async fn get_charts_data(&self) -> Result<ChartsData, BackendError> {
        let response = self.client.get(self.url("/charts-data")).send().await?;
        let envelope: ChartsEnvelope = decode(response).await?;
        Ok(envelope.data)
    }

    /// POST /generate-report
    pub async fn generate_report(&self) -> Result<ReportData, BackendError> {
        let response = self.client.post(self.url("/generate-report")).send().await?;
        decode(response).await
    }

    /// POST /generate-pdf
    ///
    /// The caller decides what a non-"success" status means.
    pub async fn generate_pdf(&self) -> Result<PdfResponse, BackendError> {
        let response = self.client.post(self.url("/generate-pdf")).send().await?;
        decode(response).await
    }

    /// GET /download-pdf/{filename}, returning the raw PDF bytes
    pub async fn fetch_pdf(&self, filename: &str) -> Result<Vec<u8>, BackendError> {
        let response = self.client.get(self.download_url(filename)).send().await?;
        let response = check_status(response).await?;
        Ok(response.bytes().await?.to_vec())
    }

    /// GET /health
    pub async fn health_check(&self) -> Result<HealthPayload, BackendError> {
        let response = self.client.get(self.url("/health")).send().await?;
        decode(response).await
    }

    /// GET /database/test
    pub async fn test_database(&self) -> Result<DatabaseStatus, BackendError> {
        let response = self.client.get(self.url("/database/test")).send().await?;
        decode(response).await
    }

    /// Templated download URL with the filename percent-encoded
    pub fn download_url(&self, filename: &str) -> String {
        format!(
            "{}/download-pdf/{}",
            self.base_url,
            urlencoding::encode(filename)
        )
    }
}

#[async_trait]
impl AnalyticsBackend for BackendClient {
    async fn charts_data(&self) -> Result<ChartsData, BackendError> {
        self.get_charts_data().await
    }

    async fn generate_report(&self) -> Result<ReportData, BackendError> {
        BackendClient::generate_report(self).await
    }

    async fn generate_pdf(&self) -> Result<PdfResponse, BackendError> {
        BackendClient::generate_pdf(self).await
    }

    async fn health(&self) -> Result<HealthPayload, BackendError> {
        self.health_check().await
    }

    fn download_url(&self, filename: &str) -> String {
        BackendClient::download_url(self, filename)
    }
}

/// Turn a non-success response into `BackendError::Status`
async fn check_status(response: Response) -> Result<Response, BackendError> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }

    let body = match response.text().await {
        Ok(body) => body,
        Err(e) => {
            tracing::debug!(status = status.as_u16(), "Failed to read error body: {}", e);
            String::new()
        }
    };
    Err(BackendError::from_status(status.as_u16(), body))
}

async fn decode<T: DeserializeOwned>(response: Response) -> Result<T, BackendError> {
    let response = check_status(response).await?;
    let bytes = response.bytes().await?;
    serde_json::from_slice(&bytes).map_err(|e| BackendError::Decode(e.to_string()))
}
