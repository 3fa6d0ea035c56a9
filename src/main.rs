use anyhow::Result;
use clap::{Parser, Subcommand};
use tracing::{error, info, Level};
use tracing_subscriber::FmtSubscriber;

use baseball_etl::api::StatsApiClient;
use baseball_etl::importer::SeasonImporter;
use baseball_etl::models::{Config, SeasonRange};
use baseball_etl::notify::{Notification, SlackNotifier};
use baseball_etl::sink::{DatabaseManager, ParquetSeasonSink, SeasonSink};
use baseball_etl::transform;

#[derive(Parser)]
#[command(name = "baseball-etl", about = "Yearly MLB batting stats importer")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Fetch seasons and upsert them into the database
    Import {
        /// First season to fetch (overrides START_SEASON)
        #[arg(long)]
        start: Option<i32>,
        /// Last season to fetch (overrides END_SEASON)
        #[arg(long)]
        end: Option<i32>,
    },
    /// Fetch seasons and export them as Parquet partitions to S3
    Export {
        #[arg(long)]
        start: Option<i32>,
        #[arg(long)]
        end: Option<i32>,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let subscriber = FmtSubscriber::builder()
        .with_max_level(Level::INFO)
        .with_env_filter(
            std::env::var("RUST_LOG").unwrap_or_else(|_| "baseball_etl=info".to_string()),
        )
        .finish();

    tracing::subscriber::set_global_default(subscriber)
        .expect("setting default subscriber failed");

    let cli = Cli::parse();

    let config = match Config::from_env() {
        Ok(config) => config,
        Err(e) => {
            error!("Failed to load configuration: {}", e);
            eprintln!("Configuration error: {}", e);
            std::process::exit(1);
        }
    };

    info!("🚀 Starting baseball-etl");

    // A broken column mapping is a deploy problem; stop before the loop.
    transform::validate_field_map()?;

    let success = match cli.command {
        Command::Import { start, end } => {
            let range = override_range(&config, start, end);
            let database = DatabaseManager::new(&config.database_url).await?;
            run(&config, range, database).await?
        }
        Command::Export { start, end } => {
            let bucket = config
                .s3_bucket
                .clone()
                .ok_or_else(|| anyhow::anyhow!("S3_BUCKET environment variable required for export"))?;
            let range = override_range(&config, start, end);
            let sink = ParquetSeasonSink::from_env(&bucket, &config.s3_prefix).await;
            run(&config, range, sink).await?
        }
    };

    if !success {
        std::process::exit(1);
    }
    Ok(())
}

fn override_range(config: &Config, start: Option<i32>, end: Option<i32>) -> SeasonRange {
    let mut range = config.season_range();
    if let Some(start) = start {
        range.start = start;
    }
    if let Some(end) = end {
        range.end = end;
    }
    range
}

async fn run<S: SeasonSink>(config: &Config, range: SeasonRange, sink: S) -> Result<bool> {
    let provider = StatsApiClient::new(config)?;
    let importer = SeasonImporter::new(provider, sink, config.rate_limit_per_minute);

    let result = importer.run(&range).await;

    let notifier = SlackNotifier::new(config.slack_webhook_url.clone());
    notifier
        .send(&Notification::from_result(&result, &range.label()))
        .await;

    info!(
        "status={:?} total_records={} failed_seasons={:?} sink={} duration={:.2}s",
        result.status,
        result.total_records,
        result.failed_seasons,
        result.sink_location,
        result.duration_seconds
    );

    Ok(result.is_success())
}
