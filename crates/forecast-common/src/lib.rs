//! Common types and utilities shared across the forecast download services.

pub mod error;
pub mod model;
pub mod time;

pub use error::{ForecastError, ForecastResult};
pub use model::{ModelId, ModelVariant};
pub use time::{parse_initialization_time, time_stem};
