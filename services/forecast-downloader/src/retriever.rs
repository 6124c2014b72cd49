//! HTTP retrieval of gridded forecasts from the forecast provider.
//!
//! Each forecast hour is one GET against
//! `{base}/gridded/historical/{variable}`; the provider answers with the
//! NetCDF file or a redirect to it. The body is streamed to a per-attempt
//! `<output>.<pid>-<n>.partial` file and renamed into place once complete,
//! so an interrupted transfer never leaves a file at the final path and
//! concurrent attempts for one target never share a temporary file.

use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;

use anyhow::{Context, Result};
use async_trait::async_trait;
use futures::StreamExt;
use reqwest::{Client, Response};
use thiserror::Error;
use tokio::fs::{self, OpenOptions};
use tokio::io::AsyncWriteExt;
use tracing::{debug, info, instrument};

use crate::config::{Credentials, API_KEY_ENV, CLIENT_ID_ENV};
use crate::fetcher::{ForecastRetriever, RetrievalRequest};

/// Longest provider error body carried into a failure reason.
const MAX_ERROR_BODY: usize = 512;

#[derive(Debug, Error)]
pub enum RetrievalError {
    #[error("Provider credentials are not configured (set {} and {})", CLIENT_ID_ENV, API_KEY_ENV)]
    MissingCredentials,

    #[error("Provider returned HTTP {status}: {body}")]
    Status { status: u16, body: String },
}

/// Retrieves forecasts over HTTP with basic authentication.
pub struct HttpRetriever {
    client: Client,
    base_url: String,
    credentials: Option<Credentials>,
}

impl HttpRetriever {
    pub fn new(base_url: &str, credentials: Option<Credentials>, timeout: Duration) -> Result<Self> {
        let client = Client::builder()
            .timeout(timeout)
            .connect_timeout(Duration::from_secs(30))
            .pool_max_idle_per_host(4)
            .tcp_nodelay(true)
            .build()
            .context("Failed to create HTTP client")?;

        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
            credentials,
        })
    }

    /// Endpoint for a variable.
    pub fn endpoint(&self, variable: &str) -> String {
        format!("{}/gridded/historical/{}", self.base_url, variable)
    }

    /// Query string pairs for a request.
    pub fn query(request: &RetrievalRequest) -> Vec<(&'static str, String)> {
        let mut query = vec![
            (
                "initialization_time",
                request.initialization_time.format("%Y-%m-%dT%H:%M:%SZ").to_string(),
            ),
            ("forecast_hour", request.forecast_hour.to_string()),
        ];
        if let Some(member) = &request.params.ensemble_member {
            query.push(("ens_member", member.clone()));
        }
        if let Some(intracycle) = request.params.intracycle {
            query.push(("intracycle", intracycle.to_string()));
        }
        query
    }

    /// Stream response body to file.
    async fn stream_to_file(response: Response, path: &Path) -> Result<u64> {
        let mut file = OpenOptions::new()
            .create_new(true)
            .write(true)
            .open(path)
            .await
            .context("Failed to open output file")?;

        let mut stream = response.bytes_stream();
        let mut written = 0u64;

        while let Some(chunk) = stream.next().await {
            let chunk = chunk.context("Error reading response chunk")?;
            file.write_all(&chunk)
                .await
                .context("Error writing to file")?;
            written += chunk.len() as u64;
        }

        // Flush and sync
        file.flush().await?;
        file.sync_all().await?;

        Ok(written)
    }
}

#[async_trait]
impl ForecastRetriever for HttpRetriever {
    #[instrument(skip(self, request, output), fields(variable = %request.variable, forecast_hour = request.forecast_hour))]
    async fn retrieve(&self, request: &RetrievalRequest, output: &Path) -> Result<()> {
        let credentials = self
            .credentials
            .as_ref()
            .ok_or(RetrievalError::MissingCredentials)?;

        let url = self.endpoint(&request.variable);
        debug!(url = %url, params = ?request.params, "Requesting gridded forecast");

        let response = self
            .client
            .get(&url)
            .basic_auth(&credentials.client_id, Some(&credentials.api_key))
            .query(&Self::query(request))
            .send()
            .await
            .context("HTTP request failed")?;

        let status = response.status();
        if !status.is_success() {
            let mut body = response.text().await.unwrap_or_default();
            body.truncate(floor_char_boundary(&body, MAX_ERROR_BODY));
            return Err(RetrievalError::Status {
                status: status.as_u16(),
                body,
            }
            .into());
        }

        let partial = partial_path(output);
        match Self::stream_to_file(response, &partial).await {
            Ok(bytes) => {
                fs::rename(&partial, output)
                    .await
                    .with_context(|| format!("Failed to move download into {}", output.display()))?;
                info!(path = %output.display(), bytes = bytes, "Forecast file written");
                Ok(())
            }
            Err(e) => {
                fs::remove_file(&partial).await.ok();
                Err(e)
            }
        }
    }
}

static PARTIAL_SEQ: AtomicU64 = AtomicU64::new(0);

/// Temporary path a download is written to before it is complete.
///
/// Unique per call within the process; last completed rename wins.
pub fn partial_path(output: &Path) -> PathBuf {
    let seq = PARTIAL_SEQ.fetch_add(1, Ordering::Relaxed);
    let mut name = output.as_os_str().to_owned();
    name.push(format!(".{}-{}.partial", std::process::id(), seq));
    PathBuf::from(name)
}

fn floor_char_boundary(s: &str, max: usize) -> usize {
    if s.len() <= max {
        return s.len();
    }
    (0..=max).rev().find(|&i| s.is_char_boundary(i)).unwrap_or(0)
}
