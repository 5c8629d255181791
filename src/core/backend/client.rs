//! HTTP client for the document Q&A backend.

use std::time::Duration;

use reqwest::Client;

use super::types::{AskRequest, AskResponse, BackendError, Result};

/// Client for the backend `/chat` endpoint.
///
/// Cheap to clone: the inner `reqwest::Client` is an Arc'd pool handle,
/// so every spawned dispatch task can carry its own copy.
#[derive(Debug, Clone)]
pub struct BackendClient {
    base_url: String,
    client: Client,
}

impl BackendClient {
    pub fn new(base_url: impl Into<String>) -> Self {
        let client = Client::builder()
            .timeout(Duration::from_secs(300))
            .build()
            .expect("Failed to create HTTP client");

        let base_url = base_url.into().trim_end_matches('/').to_string();

        Self { base_url, client }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Dispatch one question and await the full answer.
    ///
    /// No retry, no cancellation: each call is a single linear sequence.
    /// Concurrent calls are independent and complete in whatever order
    /// the network delivers them.
    pub async fn ask(&self, question: &str) -> Result<String> {
        let request = AskRequest::new(question);

        let resp = self
            .client
            .post(format!("{}/chat", self.base_url))
            .header("Content-Type", "application/json")
            .json(&request)
            .send()
            .await?;

        let status = resp.status();
        if !status.is_success() {
            let message = resp.text().await.unwrap_or_default();
            return Err(BackendError::ApiError {
                status: status.as_u16(),
                message,
            });
        }

        let body: AskResponse = resp.json().await?;

        body.answer.ok_or_else(|| {
            BackendError::InvalidResponse("missing answer field".to_string())
        })
    }
}
