//! Forecast downloader service library.
//!
//! Accepts forecast download jobs over HTTP and fetches each requested
//! forecast hour in the background, one file per hour under the storage
//! root. This module exposes the internal modules for testing purposes.

pub mod config;
pub mod dispatch;
pub mod fetcher;
pub mod metrics;
pub mod paths;
pub mod processor;
pub mod retriever;
pub mod server;
pub mod status;

use std::sync::Arc;

use config::ServiceConfig;
use dispatch::JobDispatcher;
use fetcher::{ForecastFetcher, ForecastRetriever};
use paths::StorageLayout;
use processor::JobProcessor;

/// Wire the processing pipeline for a configuration and retriever.
pub fn build_dispatcher(config: &ServiceConfig, retriever: Arc<dyn ForecastRetriever>) -> JobDispatcher {
    let fetcher = ForecastFetcher::new(retriever, config.variable.clone());
    let layout = StorageLayout::new(config.data_dir.clone());
    let processor = JobProcessor::new(layout, fetcher, config.max_concurrent_hours);
    JobDispatcher::new(Arc::new(processor))
}
