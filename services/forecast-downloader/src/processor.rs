//! Job processor: runs one forecast job to completion.
//!
//! For every requested forecast hour the processor derives the target path,
//! creates the model directory, and either skips the hour (file already
//! present) or fetches it. A failed hour is logged and recorded; it never
//! stops the remaining hours. Nothing is reported back to the caller that
//! dispatched the job: the outcome lives in the logs and on disk.

use std::collections::HashSet;
use std::path::PathBuf;

use chrono::{DateTime, Utc};
use forecast_common::ModelId;
use futures::stream::{self, StreamExt};
use serde::Serialize;
use tracing::{error, info, instrument, warn};

use crate::fetcher::{FetchOutcome, ForecastFetcher};
use crate::metrics;
use crate::paths::{self, StorageLayout};

/// Free-form request metadata, carried for traceability only.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct JobMetadata {
    pub name: Option<String>,
    pub urgency: Option<String>,
    pub job_type: Option<String>,
}

/// A validated forecast download job.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ForecastJob {
    pub model: ModelId,
    pub initialization_time: DateTime<Utc>,
    pub forecast_hours: Vec<u32>,
    pub metadata: JobMetadata,
}

/// What happened to a single forecast hour.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HourStatus {
    Downloaded,
    Skipped,
    Failed(String),
}

impl HourStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            HourStatus::Downloaded => "downloaded",
            HourStatus::Skipped => "skipped",
            HourStatus::Failed(_) => "failed",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HourOutcome {
    pub forecast_hour: u32,
    pub path: PathBuf,
    pub status: HourStatus,
}

/// Per-job tallies, logged when the job finishes.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct JobSummary {
    pub requested: usize,
    pub downloaded: usize,
    pub skipped: usize,
    pub failed: usize,
}

impl JobSummary {
    fn record(&mut self, status: &HourStatus) {
        match status {
            HourStatus::Downloaded => self.downloaded += 1,
            HourStatus::Skipped => self.skipped += 1,
            HourStatus::Failed(_) => self.failed += 1,
        }
    }

    /// `completed` when no hour failed, `partial_success` otherwise.
    pub fn status(&self) -> &'static str {
        if self.failed == 0 {
            "completed"
        } else {
            "partial_success"
        }
    }
}

#[derive(Debug, Clone)]
pub struct JobReport {
    pub summary: JobSummary,
    pub outcomes: Vec<HourOutcome>,
}

/// Executes forecast jobs against a storage layout.
pub struct JobProcessor {
    layout: StorageLayout,
    fetcher: ForecastFetcher,
    max_concurrent: usize,
}

impl JobProcessor {
    pub fn new(layout: StorageLayout, fetcher: ForecastFetcher, max_concurrent: usize) -> Self {
        Self {
            layout,
            fetcher,
            max_concurrent: max_concurrent.max(1),
        }
    }

    pub fn layout(&self) -> &StorageLayout {
        &self.layout
    }

    /// Process every forecast hour of a job.
    #[instrument(
        skip(self, job),
        fields(
            model = %job.model,
            initialization_time = %job.initialization_time.to_rfc3339(),
            hours = job.forecast_hours.len(),
            job_name = ?job.metadata.name,
            urgency = ?job.metadata.urgency,
            job_type = ?job.metadata.job_type,
        )
    )]
    pub async fn run(&self, job: &ForecastJob) -> JobReport {
        info!("Background download started");

        let hours = unique_hours(&job.forecast_hours);

        // `buffered` keeps results in request order for readable logs.
        let outcomes: Vec<HourOutcome> = stream::iter(hours)
            .map(|hour| self.process_hour(job, hour))
            .buffered(self.max_concurrent)
            .collect()
            .await;

        let mut summary = JobSummary {
            requested: job.forecast_hours.len(),
            ..JobSummary::default()
        };
        for outcome in &outcomes {
            summary.record(&outcome.status);
        }

        if summary.failed > 0 {
            warn!(
                status = summary.status(),
                requested = summary.requested,
                downloaded = summary.downloaded,
                skipped = summary.skipped,
                failed = summary.failed,
                "Background download completed with errors"
            );
        } else {
            info!(
                status = summary.status(),
                requested = summary.requested,
                downloaded = summary.downloaded,
                skipped = summary.skipped,
                failed = summary.failed,
                "Background download completed successfully"
            );
        }

        JobReport { summary, outcomes }
    }

    async fn process_hour(&self, job: &ForecastJob, forecast_hour: u32) -> HourOutcome {
        let path = self
            .layout
            .target(&job.model, job.initialization_time, forecast_hour);

        let status = self.fetch_unless_present(job, forecast_hour, &path).await;
        metrics::record_hour(status.as_str());

        HourOutcome {
            forecast_hour,
            path,
            status,
        }
    }

    async fn fetch_unless_present(
        &self,
        job: &ForecastJob,
        forecast_hour: u32,
        path: &std::path::Path,
    ) -> HourStatus {
        if let Err(e) = paths::ensure_parent_dir(path).await {
            let reason = format!("Failed to create directory for {}: {}", path.display(), e);
            error!(forecast_hour = forecast_hour, error = %reason, "Failed to download forecast hour");
            return HourStatus::Failed(reason);
        }

        if paths::exists(path).await {
            info!(
                forecast_hour = forecast_hour,
                path = %path.display(),
                "File already exists, skipping download"
            );
            return HourStatus::Skipped;
        }

        info!(forecast_hour = forecast_hour, "Downloading forecast hour");
        match self
            .fetcher
            .fetch(&job.model, job.initialization_time, forecast_hour, path)
            .await
        {
            FetchOutcome::Success => {
                info!(forecast_hour = forecast_hour, path = %path.display(), "Forecast hour downloaded");
                HourStatus::Downloaded
            }
            FetchOutcome::Failed(reason) => {
                error!(forecast_hour = forecast_hour, error = %reason, "Failed to download forecast hour");
                HourStatus::Failed(reason)
            }
        }
    }
}

/// Forecast hours in request order with repeats removed.
pub fn unique_hours(hours: &[u32]) -> Vec<u32> {
    let mut seen = HashSet::new();
    hours.iter().copied().filter(|h| seen.insert(*h)).collect()
}
