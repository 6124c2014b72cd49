//! Prometheus metrics for job dispatch and forecast hour processing.

use std::time::Duration;

use anyhow::{Context, Result};
use metrics::{counter, histogram};
use metrics_exporter_prometheus::{PrometheusBuilder, PrometheusHandle};

pub const JOBS_ACCEPTED: &str = "forecast_jobs_accepted_total";
pub const JOBS_REJECTED: &str = "forecast_jobs_rejected_total";
pub const HOURS_PROCESSED: &str = "forecast_hours_total";
pub const FETCH_DURATION: &str = "forecast_fetch_duration_seconds";

/// Install the global Prometheus recorder.
pub fn install_recorder() -> Result<PrometheusHandle> {
    PrometheusBuilder::new()
        .install_recorder()
        .context("Failed to install Prometheus recorder")
}

/// A handle backed by a recorder that is not installed globally.
///
/// Renders an empty exposition; used where metrics are not wired up.
pub fn detached_handle() -> PrometheusHandle {
    PrometheusBuilder::new().build_recorder().handle()
}

pub fn record_job_accepted() {
    counter!(JOBS_ACCEPTED).increment(1);
}

pub fn record_job_rejected(field: &str) {
    counter!(JOBS_REJECTED, "field" => field.to_string()).increment(1);
}

pub fn record_hour(outcome: &'static str) {
    counter!(HOURS_PROCESSED, "outcome" => outcome).increment(1);
}

pub fn record_fetch_duration(elapsed: Duration) {
    histogram!(FETCH_DURATION).record(elapsed.as_secs_f64());
}
