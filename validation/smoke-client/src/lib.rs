//! Smoke testing client for the forecast downloader service.
//!
//! This crate provides tools to:
//! - Submit the canonical sample jobs (deterministic, intracycle, ensemble mean)
//! - Query the health and status endpoints
//! - Print the responses as console tables

pub mod client;
pub mod report;
pub mod samples;

pub use client::{ApiResponse, DownloaderClient};
pub use report::Report;
pub use samples::{sample_jobs, SampleJob};
