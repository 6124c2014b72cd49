//! Forecast fetcher adapter.
//!
//! Turns one (model, initialization time, forecast hour) into a request for
//! the configured variable, adds the model variant's extra parameters, and
//! hands the actual transfer to a [`ForecastRetriever`]. Every failure,
//! panics included, comes back as [`FetchOutcome::Failed`].

use std::panic::AssertUnwindSafe;
use std::path::Path;
use std::sync::Arc;
use std::time::Instant;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use forecast_common::{ModelId, ModelVariant};
use futures::FutureExt;
use tracing::{debug, instrument};

use crate::metrics;

/// Model-specific parameters passed to the provider.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ModelParams {
    /// Ensemble member selector, e.g. `mean`
    pub ensemble_member: Option<String>,
    /// Request the intracycle run
    pub intracycle: Option<bool>,
}

impl ModelParams {
    pub fn for_model(model: &ModelId) -> Self {
        match model.variant() {
            ModelVariant::Ensemble(member) => Self {
                ensemble_member: Some(member.clone()),
                ..Self::default()
            },
            ModelVariant::Intracycle => Self {
                intracycle: Some(true),
                ..Self::default()
            },
            ModelVariant::Deterministic => Self::default(),
            ModelVariant::Unrecognized(qualifier) => {
                debug!(model = %model, qualifier = %qualifier, "Unrecognized model qualifier, no extra parameters");
                Self::default()
            }
        }
    }

    pub fn is_empty(&self) -> bool {
        self.ensemble_member.is_none() && self.intracycle.is_none()
    }
}

/// Everything the retriever needs to fetch one forecast hour.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RetrievalRequest {
    pub variable: String,
    pub initialization_time: DateTime<Utc>,
    pub forecast_hour: u32,
    pub params: ModelParams,
}

/// External collaborator that fetches one gridded forecast into a file.
#[async_trait]
pub trait ForecastRetriever: Send + Sync {
    /// Fetch the forecast described by `request` and write it to `output`.
    async fn retrieve(&self, request: &RetrievalRequest, output: &Path) -> anyhow::Result<()>;
}

/// Result of fetching one forecast hour.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FetchOutcome {
    Success,
    Failed(String),
}

/// Wraps a retriever with the service's variable and model parameter rules.
#[derive(Clone)]
pub struct ForecastFetcher {
    retriever: Arc<dyn ForecastRetriever>,
    variable: String,
}

impl ForecastFetcher {
    pub fn new(retriever: Arc<dyn ForecastRetriever>, variable: impl Into<String>) -> Self {
        Self {
            retriever,
            variable: variable.into(),
        }
    }

    pub fn variable(&self) -> &str {
        &self.variable
    }

    /// Build the retrieval request for one forecast hour.
    pub fn request_for(
        &self,
        model: &ModelId,
        initialization_time: DateTime<Utc>,
        forecast_hour: u32,
    ) -> RetrievalRequest {
        RetrievalRequest {
            variable: self.variable.clone(),
            initialization_time,
            forecast_hour,
            params: ModelParams::for_model(model),
        }
    }

    /// Fetch one forecast hour into `path`.
    #[instrument(skip(self, model, initialization_time, path), fields(model = %model))]
    pub async fn fetch(
        &self,
        model: &ModelId,
        initialization_time: DateTime<Utc>,
        forecast_hour: u32,
        path: &Path,
    ) -> FetchOutcome {
        let request = self.request_for(model, initialization_time, forecast_hour);
        let started = Instant::now();

        let result = AssertUnwindSafe(self.retriever.retrieve(&request, path))
            .catch_unwind()
            .await;

        metrics::record_fetch_duration(started.elapsed());

        match result {
            Ok(Ok(())) => FetchOutcome::Success,
            Ok(Err(e)) => FetchOutcome::Failed(format!("{:#}", e)),
            Err(panic) => FetchOutcome::Failed(panic_message(panic.as_ref())),
        }
    }
}

fn panic_message(panic: &(dyn std::any::Any + Send)) -> String {
    if let Some(s) = panic.downcast_ref::<&str>() {
        format!("retriever panicked: {}", s)
    } else if let Some(s) = panic.downcast_ref::<String>() {
        format!("retriever panicked: {}", s)
    } else {
        "retriever panicked".to_string()
    }
}
