//! Response reporting and formatting.

use comfy_table::{modifiers::UTF8_ROUND_CORNERS, presets::UTF8_FULL, Table};
use serde_json::Value;

use crate::client::ApiResponse;

/// Formats API responses for output.
pub struct Report;

impl Report {
    /// Format a job submission response as a console table.
    pub fn format_submission(label: &str, response: &ApiResponse) -> String {
        let mut table = Self::table(label);
        table.add_row(vec!["Status Code:", &response.status.to_string()]);

        if let Some(error) = response.body.get("error").and_then(Value::as_str) {
            table.add_row(vec!["Error:", error]);
        } else if let Some(message) = response.body.get("message").and_then(Value::as_str) {
            table.add_row(vec!["Message:", message]);
        } else {
            table.add_row(vec!["Body:", &response.body.to_string()]);
        }

        table.to_string()
    }

    /// Format a health response as a console table.
    pub fn format_health(response: &ApiResponse) -> String {
        let mut table = Self::table("Health Check");
        table.add_row(vec!["Status Code:", &response.status.to_string()]);
        for key in ["status", "timestamp", "data_directory"] {
            table.add_row(vec![key, &field(&response.body, key)]);
        }
        table.to_string()
    }

    /// Format a status response as a console table, one row per file.
    pub fn format_status(response: &ApiResponse) -> String {
        let mut table = Self::table("Downloaded Files");
        table.add_row(vec!["Data Directory:", &field(&response.body, "data_directory")]);
        table.add_row(vec!["Total Files:", &field(&response.body, "total_files")]);

        if let Some(files) = response.body.get("files").and_then(Value::as_array) {
            table.add_row(vec!["", ""]);
            for file in files {
                table.add_row(vec!["", file.as_str().unwrap_or_default()]);
            }
        }
        if let Some(error) = response.body.get("error").and_then(Value::as_str) {
            table.add_row(vec!["Error:", error]);
        }

        table.to_string()
    }

    fn table(title: &str) -> Table {
        let mut table = Table::new();
        table
            .load_preset(UTF8_FULL)
            .apply_modifier(UTF8_ROUND_CORNERS)
            .set_header(vec![title.to_string()]);
        table
    }
}

fn field(body: &Value, key: &str) -> String {
    match body.get(key) {
        Some(Value::String(s)) => s.clone(),
        Some(other) => other.to_string(),
        None => "-".to_string(),
    }
}
