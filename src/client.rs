//! Backend health API client
//!
//! Fetches the full vitals list and the health overview from the telemed
//! backend. Responses are normalized into [`VitalsReading`]s at this boundary.

use async_trait::async_trait;
use serde_json::Value;
use thiserror::Error;

use crate::models::{HealthOverview, VitalsReading};

pub const DEFAULT_API_URL: &str = "http://127.0.0.1:8000/api";

#[derive(Debug, Error)]
pub enum ClientError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("{path} returned {status}: {body}")]
    Status {
        status: u16,
        path: String,
        body: String,
    },

    #[error("Unexpected response from {path}: {reason}")]
    Shape { path: String, reason: String },
}

/// Source of remote vitals data
#[async_trait]
pub trait VitalsFetcher: Send + Sync {
    /// Full vitals list
    async fn fetch_vitals(&self) -> Result<Vec<VitalsReading>, ClientError>;

    /// Overview for a patient (the backend's own default when `None`)
    async fn fetch_overview(&self, patient_id: Option<&str>) -> Result<HealthOverview, ClientError>;
}

/// [`VitalsFetcher`] over HTTP
#[derive(Debug, Clone)]
pub struct ApiClient {
    client: reqwest::Client,
    base_url: String,
    token: Option<String>,
}

impl ApiClient {
    pub fn new(base_url: impl Into<String>, token: Option<String>) -> Self {
        Self {
            client: reqwest::Client::new(),
            base_url: base_url.into().trim_end_matches('/').to_string(),
            token,
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    async fn get_json(&self, path: &str, query: &[(&str, &str)]) -> Result<Value, ClientError> {
        let mut request = self
            .client
            .get(format!("{}{}", self.base_url, path))
            .query(query);
        if let Some(token) = &self.token {
            request = request.bearer_auth(token);
        }

        let response = request.send().await?;
        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(ClientError::Status {
                status: status.as_u16(),
                path: path.to_string(),
                body,
            });
        }

        Ok(response.json().await?)
    }
}

#[async_trait]
impl VitalsFetcher for ApiClient {
    async fn fetch_vitals(&self) -> Result<Vec<VitalsReading>, ClientError> {
        let path = "/health/vitals/";
        let body = self.get_json(path, &[]).await?;
        let readings = parse_vitals_list(&body).ok_or_else(|| ClientError::Shape {
            path: path.to_string(),
            reason: "expected an array or an object with `results`".to_string(),
        })?;
        tracing::debug!(count = readings.len(), "Fetched vitals list");
        Ok(readings)
    }

    async fn fetch_overview(&self, patient_id: Option<&str>) -> Result<HealthOverview, ClientError> {
        let path = "/health/overview/";
        let query: Vec<(&str, &str)> = patient_id.map(|id| ("patient_id", id)).into_iter().collect();
        let body = self.get_json(path, &query).await?;
        if !body.is_object() {
            return Err(ClientError::Shape {
                path: path.to_string(),
                reason: "expected an object".to_string(),
            });
        }
        Ok(HealthOverview::from_json(&body))
    }
}

/// Vitals list as either a bare array or a paginated `{results: [...]}`
pub fn parse_vitals_list(body: &Value) -> Option<Vec<VitalsReading>> {
    let list = match body {
        Value::Array(items) => items,
        Value::Object(map) => map.get("results")?.as_array()?,
        _ => return None,
    };
    Some(VitalsReading::from_json_list(list))
}
