use std::sync::Arc;
use std::time::Duration;

use clap::Parser;
use sqlx::postgres::PgPoolOptions;
use storage::repository::try_on::TryOnRepository;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};
use tryon::{
    FileStorageClient, GenerationClient, PgFileStore, PgRequestStore, TryOnPipeline,
};

#[derive(Parser)]
#[command(name = "tryon-worker")]
#[command(about = "Drains pending virtual try-on requests", long_about = None)]
#[command(version)]
struct Cli {
    #[arg(long, env = "DATABASE_URL")]
    database_url: String,

    #[arg(long, env = "TRYON_API_URL")]
    tryon_api_url: String,

    #[arg(long, env = "TRYON_API_KEY")]
    tryon_api_key: Option<String>,

    #[arg(long, env = "FILE_STORAGE_URL")]
    file_storage_url: String,

    /// Seconds to sleep between polls when the queue is empty
    #[arg(long, default_value = "5")]
    poll_interval: u64,

    /// Maximum requests processed per poll
    #[arg(long, default_value = "4")]
    batch_size: i64,

    /// Process the current backlog once and exit
    #[arg(long)]
    once: bool,

    #[arg(short, long)]
    verbose: bool,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    dotenvy::dotenv().ok();

    let cli = Cli::parse();

    let log_level = if cli.verbose { "debug" } else { "info" };
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| format!("worker={},tryon={}", log_level, log_level).into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    tracing::info!("Connecting to database...");
    let pool = PgPoolOptions::new()
        .max_connections(5)
        .connect(&cli.database_url)
        .await?;

    let generation = GenerationClient::new(cli.tryon_api_url.clone(), cli.tryon_api_key.clone())?;
    if !generation.health_check().await.unwrap_or(false) {
        tracing::warn!("Generation endpoint {} is not responding", cli.tryon_api_url);
    }

    let files = FileStorageClient::new(cli.file_storage_url.clone())?;

    let pipeline = TryOnPipeline::new(
        Arc::new(PgRequestStore::new(pool.clone())),
        Arc::new(PgFileStore::new(pool.clone(), files)),
        Arc::new(generation),
    );

    tracing::info!(
        "Worker started (batch size {}, poll interval {}s)",
        cli.batch_size,
        cli.poll_interval
    );

    loop {
        let pending = TryOnRepository::new(&pool).list_pending(cli.batch_size).await?;

        if pending.is_empty() {
            if cli.once {
                tracing::info!("Backlog drained, exiting");
                return Ok(());
            }
            tokio::time::sleep(Duration::from_secs(cli.poll_interval)).await;
            continue;
        }

        tracing::info!("Processing {} pending request(s)", pending.len());

        for request_id in pending {
            match pipeline.run(request_id).await {
                Ok(status) => {
                    tracing::info!("Request {} finished as {}", request_id, status);
                }
                Err(e) => {
                    // Precondition failures mean another worker got there
                    // first; anything else is worth a louder log.
                    if e.is_precondition() {
                        tracing::debug!("Skipping request {}: {}", request_id, e);
                    } else {
                        tracing::error!("Request {} could not be processed: {}", request_id, e);
                    }
                }
            }
        }
    }
}
