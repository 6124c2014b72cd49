//! Initialization time handling.

use chrono::{DateTime, NaiveDate, NaiveDateTime, TimeZone, Utc};

use crate::error::{ForecastError, ForecastResult};

/// Parse an ISO 8601 initialization time, normalized to UTC.
///
/// Accepts RFC 3339 (`2025-05-18T00:00:00.000Z`, `2025-05-18T02:00:00+02:00`),
/// timestamps without an offset (taken as UTC) and bare dates.
pub fn parse_initialization_time(s: &str) -> ForecastResult<DateTime<Utc>> {
    let s = s.trim();

    // Try full datetime with timezone
    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Ok(dt.with_timezone(&Utc));
    }

    // Try without timezone (assume UTC)
    for format in ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M:%S%.f", "%Y-%m-%dT%H:%M"] {
        if let Ok(ndt) = NaiveDateTime::parse_from_str(s, format) {
            return Ok(Utc.from_utc_datetime(&ndt));
        }
    }

    // Try date only
    if let Ok(date) = NaiveDate::parse_from_str(s, "%Y-%m-%d") {
        if let Some(ndt) = date.and_hms_opt(0, 0, 0) {
            return Ok(Utc.from_utc_datetime(&ndt));
        }
    }

    Err(ForecastError::InvalidTime(format!(
        "'{}' is not an ISO 8601 timestamp",
        s
    )))
}

/// Filename stem for an initialization time, e.g. `2025051800`.
pub fn time_stem(time: DateTime<Utc>) -> String {
    time.format("%Y%m%d%H").to_string()
}
