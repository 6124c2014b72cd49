//! Sample jobs exercising every model variant.

use serde_json::{json, Value};

pub const SAMPLE_INIT_TIME: &str = "2025-05-18T00:00:00.000Z";

/// A named job body to submit.
#[derive(Debug, Clone)]
pub struct SampleJob {
    pub label: &'static str,
    pub body: Value,
}

/// The default, intracycle and ensemble mean jobs.
pub fn sample_jobs() -> Vec<SampleJob> {
    vec![
        SampleJob {
            label: "Default WeatherMesh Model",
            body: json!({
                "name": "New forecast",
                "urgency": "low",
                "type": "new_forecast",
                "model": "WeatherMesh",
                "initialization_time": SAMPLE_INIT_TIME,
                "forecast_hours": [1, 2, 3, 6, 12, 24, 48, 72],
            }),
        },
        SampleJob {
            label: "WeatherMesh Intracycle Model",
            body: json!({
                "name": "Intracycle Test",
                "model": "WeatherMesh:intracycle",
                "initialization_time": SAMPLE_INIT_TIME,
                "forecast_hours": [3],
            }),
        },
        SampleJob {
            label: "WeatherMesh Ensemble Mean Model",
            body: json!({
                "name": "Ensemble Mean Test",
                "model": "WeatherMesh:ens:mean",
                "initialization_time": SAMPLE_INIT_TIME,
                "forecast_hours": [1, 2],
            }),
        },
    ]
}

/// A job body built from command-line arguments.
pub fn custom_job(model: &str, initialization_time: &str, hours: &[u32], name: Option<&str>) -> Value {
    let mut body = json!({
        "model": model,
        "initialization_time": initialization_time,
        "forecast_hours": hours,
    });
    if let (Some(name), Some(object)) = (name, body.as_object_mut()) {
        object.insert("name".to_string(), Value::from(name));
    }
    body
}
