// src/service/http.rs

use log::{info, warn};
use reqwest::Client;
use reqwest::header::CONTENT_TYPE;
use std::time::Instant;

use crate::errors::Result;
use crate::models::{ApplicantInput, PredictionResult};
use crate::service::PredictionService;

/// Posts applicants to a remote prediction endpoint over HTTP.
#[derive(Clone)]
pub struct HttpPredictionService {
    client: Client,
    endpoint: String,
}

impl HttpPredictionService {
    /// Creates a new `HttpPredictionService`. The client carries no timeout;
    /// a call resolves only when the server answers or the transport fails.
    pub fn new(client: Client, endpoint: impl Into<String>) -> Self {
        Self {
            client,
            endpoint: endpoint.into(),
        }
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }
}

impl PredictionService for HttpPredictionService {
    /// Sends the applicant as JSON and decodes the full response body.
    ///
    /// The status code does not gate decoding: a non-2xx answer with a JSON
    /// body is decoded like any other. An unreadable or non-JSON body is an
    /// error.
    async fn predict(&self, input: &ApplicantInput) -> Result<PredictionResult> {
        info!("📡 Calling prediction endpoint: {}", self.endpoint);

        let start = Instant::now();

        let resp = self
            .client
            .post(&self.endpoint)
            .header(CONTENT_TYPE, "application/json")
            .json(input)
            .send()
            .await?;

        let status = resp.status();
        let body = resp.bytes().await?;
        let latency_ms = start.elapsed().as_millis() as u64;

        info!("📥 Prediction response status: {} ({}ms)", status, latency_ms);

        let value: serde_json::Value = serde_json::from_slice(&body)?;

        if !status.is_success() {
            warn!("⚠️  Prediction endpoint answered {} with a JSON body, decoding it anyway", status);
        }

        let result = PredictionResult::from_value(value);
        if result.is_malformed() {
            warn!(
                "⚠️  Prediction response matched neither verdict nor error shape: {}",
                String::from_utf8_lossy(&body)
            );
        }

        Ok(result)
    }
}
