//! HTTP client for the forecast downloader endpoints.

use std::time::Duration;

use anyhow::{Context, Result};
use serde_json::Value;

/// Status code and JSON body of one response.
#[derive(Debug, Clone)]
pub struct ApiResponse {
    pub status: u16,
    pub body: Value,
}

impl ApiResponse {
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

/// Thin client over the downloader's HTTP API.
pub struct DownloaderClient {
    client: reqwest::Client,
    base_url: String,
}

impl DownloaderClient {
    pub fn new(base_url: &str) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(30))
            .build()
            .context("Failed to create HTTP client")?;

        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }

    pub fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    /// POST /forecast
    pub async fn submit(&self, job: &Value) -> Result<ApiResponse> {
        let response = self
            .client
            .post(self.url("/forecast"))
            .json(job)
            .send()
            .await
            .context("POST /forecast failed")?;
        Self::read(response).await
    }

    /// GET /health
    pub async fn health(&self) -> Result<ApiResponse> {
        self.get("/health").await
    }

    /// GET /status
    pub async fn status(&self) -> Result<ApiResponse> {
        self.get("/status").await
    }

    async fn get(&self, path: &str) -> Result<ApiResponse> {
        let response = self
            .client
            .get(self.url(path))
            .send()
            .await
            .with_context(|| format!("GET {} failed", path))?;
        Self::read(response).await
    }

    async fn read(response: reqwest::Response) -> Result<ApiResponse> {
        let status = response.status().as_u16();
        let text = response.text().await.context("Error reading response body")?;
        let body = serde_json::from_str(&text).unwrap_or(Value::String(text));
        Ok(ApiResponse { status, body })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_url_joins_without_double_slash() {
        let client = DownloaderClient::new("http://localhost:8000/").unwrap();
        assert_eq!(client.url("/status"), "http://localhost:8000/status");
    }

    #[test]
    fn test_success_range() {
        let ok = ApiResponse { status: 200, body: Value::Null };
        let bad = ApiResponse { status: 400, body: Value::Null };
        assert!(ok.is_success());
        assert!(!bad.is_success());
    }
}
