//! Smoke test CLI for the forecast downloader service.

use clap::{Parser, Subcommand};
use smoke_client::{samples, sample_jobs, DownloaderClient, Report};

#[derive(Parser)]
#[command(name = "smoke-client")]
#[command(about = "Smoke testing tool for the forecast downloader service", long_about = None)]
struct Cli {
    /// Base URL
    #[arg(short, long, global = true, default_value = "http://localhost:8000")]
    url: String,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Submit the sample jobs, then query health and status
    Demo,

    /// Submit a single job
    Submit {
        /// Model identifier (e.g., WeatherMesh:ens:mean)
        #[arg(short, long, default_value = "WeatherMesh")]
        model: String,

        /// Initialization time (ISO 8601)
        #[arg(short, long, default_value = samples::SAMPLE_INIT_TIME)]
        init: String,

        /// Forecast hours, comma separated
        #[arg(long, value_delimiter = ',', default_value = "1,2")]
        hours: Vec<u32>,

        /// Optional job name
        #[arg(short, long)]
        name: Option<String>,
    },

    /// Query the health endpoint
    Health,

    /// List downloaded files
    Status,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let client = DownloaderClient::new(&cli.url)?;

    match cli.command {
        Commands::Demo => {
            println!("Running smoke test against {}", cli.url);
            println!();

            for job in sample_jobs() {
                match client.submit(&job.body).await {
                    Ok(response) => println!("{}", Report::format_submission(job.label, &response)),
                    Err(e) => eprintln!("{}: {:#}", job.label, e),
                }
            }

            println!("{}", Report::format_health(&client.health().await?));
            println!("{}", Report::format_status(&client.status().await?));
            Ok(())
        }
        Commands::Submit {
            model,
            init,
            hours,
            name,
        } => {
            let body = samples::custom_job(&model, &init, &hours, name.as_deref());
            let response = client.submit(&body).await?;
            println!("{}", Report::format_submission(&model, &response));
            Ok(())
        }
        Commands::Health => {
            println!("{}", Report::format_health(&client.health().await?));
            Ok(())
        }
        Commands::Status => {
            println!("{}", Report::format_status(&client.status().await?));
            Ok(())
        }
    }
}
