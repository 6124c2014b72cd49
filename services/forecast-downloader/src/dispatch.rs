//! Job dispatcher: validates a request and starts it in the background.

use std::sync::Arc;

use forecast_common::{parse_initialization_time, ForecastError, ForecastResult, ModelId};
use serde::Deserialize;
use tokio::runtime::Handle;
use tracing::{info, warn};

use crate::metrics;
use crate::paths::MAX_FORECAST_HOUR;
use crate::processor::{ForecastJob, JobMetadata, JobProcessor};

/// Inbound job request as sent by clients.
///
/// Required fields are optional here so that a missing field is reported
/// by name rather than as a body parse error.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ForecastJobRequest {
    pub model: Option<String>,
    pub initialization_time: Option<String>,
    pub forecast_hours: Option<Vec<u32>>,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub urgency: Option<String>,
    #[serde(default, rename = "type")]
    pub job_type: Option<String>,
}

impl ForecastJobRequest {
    /// Check required fields and parse them into a job.
    ///
    /// Presence of all required fields is checked first, in order, so the
    /// error names the first missing one.
    pub fn validate(self) -> ForecastResult<ForecastJob> {
        let model = self
            .model
            .filter(|m| !m.is_empty())
            .ok_or_else(|| ForecastError::MissingField("model".to_string()))?;
        let initialization_time = self
            .initialization_time
            .filter(|t| !t.trim().is_empty())
            .ok_or_else(|| ForecastError::MissingField("initialization_time".to_string()))?;
        let forecast_hours = self
            .forecast_hours
            .filter(|h| !h.is_empty())
            .ok_or_else(|| ForecastError::MissingField("forecast_hours".to_string()))?;

        let model = ModelId::parse(&model).map_err(|e| ForecastError::invalid_field("model", e))?;
        let initialization_time = parse_initialization_time(&initialization_time)
            .map_err(|e| ForecastError::invalid_field("initialization_time", e))?;

        if let Some(hour) = forecast_hours.iter().find(|&&h| h > MAX_FORECAST_HOUR) {
            return Err(ForecastError::invalid_field(
                "forecast_hours",
                format!("{} exceeds the maximum forecast hour {}", hour, MAX_FORECAST_HOUR),
            ));
        }

        Ok(ForecastJob {
            model,
            initialization_time,
            forecast_hours,
            metadata: JobMetadata {
                name: self.name,
                urgency: self.urgency,
                job_type: self.job_type,
            },
        })
    }
}

/// Starts validated jobs as detached background tasks.
#[derive(Clone)]
pub struct JobDispatcher {
    processor: Arc<JobProcessor>,
}

impl JobDispatcher {
    pub fn new(processor: Arc<JobProcessor>) -> Self {
        Self { processor }
    }

    pub fn processor(&self) -> &Arc<JobProcessor> {
        &self.processor
    }

    /// Validate `request` and start processing it in the background.
    ///
    /// Returns as soon as the job has been handed to the runtime. The task
    /// handle is dropped: a dispatched job cannot be awaited or cancelled.
    pub fn dispatch(&self, request: ForecastJobRequest) -> ForecastResult<()> {
        let job = match request.validate() {
            Ok(job) => job,
            Err(e) => {
                warn!(error = %e, "Rejected forecast request");
                metrics::record_job_rejected(e.field().unwrap_or("unknown"));
                return Err(e);
            }
        };

        let runtime = Handle::try_current()
            .map_err(|e| ForecastError::Internal(format!("no async runtime available: {}", e)))?;

        info!(
            model = %job.model,
            initialization_time = %job.initialization_time.to_rfc3339(),
            hours = job.forecast_hours.len(),
            job_name = ?job.metadata.name,
            "Received forecast request, queueing for background processing"
        );

        let processor = Arc::clone(&self.processor);
        runtime.spawn(async move {
            processor.run(&job).await;
        });

        metrics::record_job_accepted();
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};

    fn request() -> ForecastJobRequest {
        ForecastJobRequest {
            model: Some("WeatherMesh".to_string()),
            initialization_time: Some("2025-05-18T00:00:00.000Z".to_string()),
            forecast_hours: Some(vec![1, 2]),
            ..ForecastJobRequest::default()
        }
    }

    fn missing_field(request: ForecastJobRequest) -> String {
        match request.validate() {
            Err(ForecastError::MissingField(field)) => field,
            other => panic!("expected missing field, got {:?}", other),
        }
    }

    #[test]
    fn test_validate_complete_request() {
        let job = ForecastJobRequest {
            name: Some("New forecast".to_string()),
            job_type: Some("new_forecast".to_string()),
            ..request()
        }
        .validate()
        .unwrap();

        assert_eq!(job.model.as_str(), "WeatherMesh");
        assert_eq!(
            job.initialization_time,
            Utc.with_ymd_and_hms(2025, 5, 18, 0, 0, 0).unwrap()
        );
        assert_eq!(job.forecast_hours, vec![1, 2]);
        assert_eq!(job.metadata.name.as_deref(), Some("New forecast"));
        assert_eq!(job.metadata.job_type.as_deref(), Some("new_forecast"));
    }

    #[test]
    fn test_missing_fields_are_named() {
        assert_eq!(missing_field(ForecastJobRequest { model: None, ..request() }), "model");
        assert_eq!(
            missing_field(ForecastJobRequest { initialization_time: None, ..request() }),
            "initialization_time"
        );
        assert_eq!(
            missing_field(ForecastJobRequest { forecast_hours: None, ..request() }),
            "forecast_hours"
        );
    }

    #[test]
    fn test_empty_values_count_as_missing() {
        assert_eq!(
            missing_field(ForecastJobRequest { model: Some(String::new()), ..request() }),
            "model"
        );
        assert_eq!(
            missing_field(ForecastJobRequest { forecast_hours: Some(vec![]), ..request() }),
            "forecast_hours"
        );
    }

    #[test]
    fn test_first_missing_field_wins() {
        assert_eq!(missing_field(ForecastJobRequest::default()), "model");
        assert_eq!(
            missing_field(ForecastJobRequest {
                initialization_time: None,
                forecast_hours: None,
                ..request()
            }),
            "initialization_time"
        );
    }

    #[test]
    fn test_missing_field_reported_before_malformed_field() {
        let err = ForecastJobRequest {
            model: Some("a/b".to_string()),
            forecast_hours: None,
            ..request()
        }
        .validate()
        .unwrap_err();
        assert!(matches!(err, ForecastError::MissingField(ref f) if f == "forecast_hours"));
    }

    #[test]
    fn test_malformed_fields_are_invalid() {
        let err = ForecastJobRequest {
            initialization_time: Some("not a time".to_string()),
            ..request()
        }
        .validate()
        .unwrap_err();
        assert_eq!(err.field(), Some("initialization_time"));
        assert_eq!(err.http_status_code(), 400);

        let err = ForecastJobRequest {
            model: Some("../escape".to_string()),
            ..request()
        }
        .validate()
        .unwrap_err();
        assert_eq!(err.field(), Some("model"));

        let err = ForecastJobRequest {
            model: Some("WeatherMesh_intracycle".to_string()),
            ..request()
        }
        .validate()
        .unwrap_err();
        assert_eq!(err.field(), Some("model"));

        let err = ForecastJobRequest {
            forecast_hours: Some(vec![6, 1000]),
            ..request()
        }
        .validate()
        .unwrap_err();
        assert_eq!(err.field(), Some("forecast_hours"));
    }

    #[test]
    fn test_duplicate_hours_are_accepted() {
        let job = ForecastJobRequest {
            forecast_hours: Some(vec![3, 3, 3]),
            ..request()
        }
        .validate()
        .unwrap();
        assert_eq!(job.forecast_hours, vec![3, 3, 3]);
    }

    #[test]
    fn test_deserialize_type_field() {
        let request: ForecastJobRequest = serde_json::from_str(
            r#"{"model": "WeatherMesh", "type": "new_forecast", "urgency": "low"}"#,
        )
        .unwrap();
        assert_eq!(request.job_type.as_deref(), Some("new_forecast"));
        assert_eq!(request.urgency.as_deref(), Some("low"));
        assert!(request.forecast_hours.is_none());
    }
}
