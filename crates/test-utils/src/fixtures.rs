//! Common job request fixtures.
//!
//! These mirror the jobs the service is exercised with by hand: the
//! deterministic model, the intracycle run and the ensemble mean.

use serde_json::{json, Value};

/// Initialization time used throughout the fixtures.
pub const INIT_TIME: &str = "2025-05-18T00:00:00.000Z";

/// Filename stem matching [`INIT_TIME`].
pub const INIT_STEM: &str = "2025051800";

/// Deterministic model job with full metadata.
pub fn deterministic_job(hours: &[u32]) -> Value {
    json!({
        "name": "New forecast",
        "urgency": "low",
        "type": "new_forecast",
        "model": "WeatherMesh",
        "initialization_time": INIT_TIME,
        "forecast_hours": hours,
    })
}

/// Intracycle job.
pub fn intracycle_job(hours: &[u32]) -> Value {
    json!({
        "name": "Intracycle Test",
        "model": "WeatherMesh:intracycle",
        "initialization_time": INIT_TIME,
        "forecast_hours": hours,
    })
}

/// Ensemble mean job.
pub fn ensemble_mean_job(hours: &[u32]) -> Value {
    json!({
        "name": "Ensemble Mean Test",
        "model": "WeatherMesh:ens:mean",
        "initialization_time": INIT_TIME,
        "forecast_hours": hours,
    })
}

/// Job for an arbitrary model identifier.
pub fn job_for_model(model: &str, hours: &[u32]) -> Value {
    json!({
        "model": model,
        "initialization_time": INIT_TIME,
        "forecast_hours": hours,
    })
}

/// A valid job with one field removed.
pub fn job_without(field: &str) -> Value {
    let mut job = deterministic_job(&[1, 2]);
    if let Some(object) = job.as_object_mut() {
        object.remove(field);
    }
    job
}

/// Relative path of a file produced for [`INIT_TIME`].
pub fn expected_file(model_dir: &str, hour: u32) -> String {
    format!("{}/{}_f{:03}.nc", model_dir, INIT_STEM, hour)
}
