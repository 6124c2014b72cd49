//! Forecast downloader service.
//!
//! Accepts forecast download jobs over HTTP with:
//! - Synchronous request validation
//! - Background download of every requested forecast hour
//! - Skipping of hours already on disk
//! - Status and health endpoints for monitoring

use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::Parser;
use tracing::{info, warn, Level};
use tracing_subscriber::FmtSubscriber;

use forecast_downloader::config::{Credentials, ServiceConfig, API_KEY_ENV, CLIENT_ID_ENV};
use forecast_downloader::retriever::HttpRetriever;
use forecast_downloader::server::{self, ServerState};
use forecast_downloader::{build_dispatcher, metrics};

#[derive(Parser, Debug)]
#[command(name = "forecast-downloader")]
#[command(about = "Downloads gridded forecast hours on request")]
struct Args {
    /// YAML configuration file
    #[arg(short, long, env = "FORECAST_CONFIG")]
    config: Option<PathBuf>,

    /// Listen address
    #[arg(short, long, env = "LISTEN_ADDR")]
    listen: Option<String>,

    /// Directory downloaded forecasts are written to
    #[arg(long, env = "DATA_DIR")]
    data_dir: Option<PathBuf>,

    /// Forecast variable to request
    #[arg(long, env = "FORECAST_VARIABLE")]
    variable: Option<String>,

    /// Forecast provider API base URL
    #[arg(long, env = "WB_API_BASE_URL")]
    api_base_url: Option<String>,

    /// Forecast hours fetched at once within a job
    #[arg(long, env = "MAX_CONCURRENT_HOURS")]
    max_concurrent_hours: Option<usize>,

    /// Timeout in seconds for a single forecast hour
    #[arg(long, env = "REQUEST_TIMEOUT_SECS")]
    request_timeout_secs: Option<u64>,

    /// Log level
    #[arg(long, env = "LOG_LEVEL")]
    log_level: Option<String>,
}

impl Args {
    /// Resolve the effective configuration: flags and env over file over defaults.
    fn into_config(self) -> Result<ServiceConfig> {
        let mut config = match &self.config {
            Some(path) => ServiceConfig::load(path)?,
            None => ServiceConfig::default(),
        };

        if let Some(listen) = self.listen {
            config.listen = listen;
        }
        if let Some(data_dir) = self.data_dir {
            config.data_dir = data_dir;
        }
        if let Some(variable) = self.variable {
            config.variable = variable;
        }
        if let Some(url) = self.api_base_url {
            config.api_base_url = url;
        }
        if let Some(n) = self.max_concurrent_hours {
            config.max_concurrent_hours = n;
        }
        if let Some(secs) = self.request_timeout_secs {
            config.request_timeout_secs = secs;
        }
        if let Some(level) = self.log_level {
            config.log_level = level;
        }

        Ok(config)
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    // Load environment from .env file if present
    dotenvy::dotenv().ok();

    let config = Args::parse().into_config()?;

    // Initialize tracing
    let level = match config.log_level.to_lowercase().as_str() {
        "trace" => Level::TRACE,
        "debug" => Level::DEBUG,
        "info" => Level::INFO,
        "warn" => Level::WARN,
        "error" => Level::ERROR,
        _ => Level::INFO,
    };

    let subscriber = FmtSubscriber::builder()
        .with_max_level(level)
        .with_target(true)
        .with_thread_ids(true)
        .json()
        .finish();

    tracing::subscriber::set_global_default(subscriber)?;

    let prometheus_handle = metrics::install_recorder()?;

    info!(
        data_dir = %config.data_dir.display(),
        variable = %config.variable,
        max_concurrent_hours = config.max_concurrent_hours,
        "Starting forecast downloader"
    );

    tokio::fs::create_dir_all(&config.data_dir)
        .await
        .with_context(|| format!("Failed to create data directory {}", config.data_dir.display()))?;

    let credentials = Credentials::from_env();
    if credentials.is_none() {
        warn!(
            client_id_env = CLIENT_ID_ENV,
            api_key_env = API_KEY_ENV,
            "Provider credentials not set, every download will fail"
        );
    }

    let retriever = HttpRetriever::new(&config.api_base_url, credentials, config.request_timeout())?;
    let dispatcher = build_dispatcher(&config, Arc::new(retriever));
    let state = Arc::new(ServerState::new(dispatcher, prometheus_handle));

    let addr: SocketAddr = config
        .listen
        .parse()
        .with_context(|| format!("Invalid listen address: {}", config.listen))?;

    server::run_server(state, addr, async {
        tokio::signal::ctrl_c().await.ok();
        info!("Received shutdown signal");
    })
    .await?;

    info!("Forecast downloader stopped");
    Ok(())
}
