//! Shared test utilities for the forecast downloader workspace.
//!
//! This crate provides common testing infrastructure including:
//! - Temporary storage roots with file listing helpers
//! - Canned job request bodies
//! - Polling helpers for work that completes in the background
//!
//! # Usage
//!
//! Add to your crate's `Cargo.toml`:
//!
//! ```toml
//! [dev-dependencies]
//! test-utils = { path = "../../crates/test-utils" }
//! ```
//!
//! Then import in your tests:
//!
//! ```ignore
//! use test_utils::{fixtures, TempStore};
//! ```

pub mod fixtures;
pub mod store;

// Re-export commonly used items at the crate root
pub use fixtures::*;
pub use store::*;

#[doc(hidden)]
pub use serde_json as __serde_json;

/// Macro asserting that a JSON value carries the expected `error` message.
///
/// # Usage
///
/// ```ignore
/// use test_utils::assert_json_error;
///
/// assert_json_error!(body, "Missing required field: model");
/// ```
#[macro_export]
macro_rules! assert_json_error {
    ($body:expr, $expected:expr) => {{
        let body: &$crate::__serde_json::Value = &$body;
        match body.get("error").and_then(|e| e.as_str()) {
            Some(message) => assert_eq!(message, $expected, "unexpected error in {}", body),
            None => panic!("expected an `error` field in {}", body),
        }
    }};
}
