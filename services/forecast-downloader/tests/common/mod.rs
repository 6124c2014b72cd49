//! Common test utilities for forecast-downloader tests
//!
//! Provides helpers for:
//! - A recording retriever standing in for the forecast provider
//! - Building a processor or router over a temporary storage root

#![allow(dead_code)]

use std::collections::HashSet;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;

use forecast_downloader::config::ServiceConfig;
use forecast_downloader::fetcher::{ForecastFetcher, ForecastRetriever, RetrievalRequest};
use forecast_downloader::paths::StorageLayout;
use forecast_downloader::processor::JobProcessor;
use forecast_downloader::server::ServerState;
use forecast_downloader::{build_dispatcher, metrics};

/// Retriever that writes a small file per request and remembers every call.
#[derive(Default)]
pub struct FakeRetriever {
    calls: Mutex<Vec<(RetrievalRequest, PathBuf)>>,
    failing_hours: HashSet<u32>,
}

impl FakeRetriever {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    /// A retriever that fails for the given forecast hours.
    pub fn failing_on(hours: &[u32]) -> Arc<Self> {
        Arc::new(Self {
            calls: Mutex::new(Vec::new()),
            failing_hours: hours.iter().copied().collect(),
        })
    }

    pub fn calls(&self) -> Vec<(RetrievalRequest, PathBuf)> {
        self.calls.lock().unwrap().clone()
    }

    pub fn requests(&self) -> Vec<RetrievalRequest> {
        self.calls().into_iter().map(|(r, _)| r).collect()
    }

    pub fn call_count(&self) -> usize {
        self.calls.lock().unwrap().len()
    }
}

#[async_trait]
impl ForecastRetriever for FakeRetriever {
    async fn retrieve(&self, request: &RetrievalRequest, output: &Path) -> anyhow::Result<()> {
        self.calls
            .lock()
            .unwrap()
            .push((request.clone(), output.to_path_buf()));

        if self.failing_hours.contains(&request.forecast_hour) {
            anyhow::bail!("provider has no data for hour {}", request.forecast_hour);
        }

        tokio::fs::write(output, format!("grid f{:03}", request.forecast_hour)).await?;
        Ok(())
    }
}

pub fn config_for(root: &Path) -> ServiceConfig {
    ServiceConfig {
        data_dir: root.to_path_buf(),
        ..ServiceConfig::default()
    }
}

pub fn processor(root: &Path, retriever: Arc<FakeRetriever>) -> JobProcessor {
    let config = config_for(root);
    JobProcessor::new(
        StorageLayout::new(root),
        ForecastFetcher::new(retriever, config.variable),
        config.max_concurrent_hours,
    )
}

pub fn server_state(root: &Path, retriever: Arc<FakeRetriever>) -> Arc<ServerState> {
    let dispatcher = build_dispatcher(&config_for(root), retriever);
    Arc::new(ServerState::new(dispatcher, metrics::detached_handle()))
}
