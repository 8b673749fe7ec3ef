use anyhow::Result;
use clap::Parser;
use domain::tally::TallySnapshotRepository;
use infrastructure::{InMemoryTallySnapshotRepository, PostgresTallySnapshotRepository, Settings};
use sqlx::postgres::PgPoolOptions;
use std::sync::Arc;
use tracing::{info, warn};
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

use tally_api::api;

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Directory holding default.yaml, the tag profile and the RHEL product list
    #[arg(long, default_value = "config")]
    config_dir: String,

    /// API Port (overrides api.port)
    #[arg(long)]
    port: Option<u16>,
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenv::dotenv().ok();

    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| {
                EnvFilter::new("info,tally_api=debug,application=debug,domain=debug")
            }),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let args = Args::parse();
    info!("📊 Tally API Starting...");

    let settings = Settings::load(&args.config_dir)?;
    info!(config_dir = %args.config_dir, "Configuration loaded");

    let repository: Arc<dyn TallySnapshotRepository> = match &settings.database.url {
        Some(url) => {
            info!("Connecting to database...");
            let pool = PgPoolOptions::new()
                .max_connections(settings.database.max_connections)
                .connect(url)
                .await?;

            info!("Running database migrations...");
            sqlx::migrate!("../../migrations").run(&pool).await?;
            info!("✅ Migrations applied successfully");
            Arc::new(PostgresTallySnapshotRepository::new(pool))
        }
        None => {
            warn!("No database configured, snapshots are kept in memory");
            Arc::new(InMemoryTallySnapshotRepository::new())
        }
    };

    let state = tally_api::setup_app_state(&settings, repository)?;
    let app = api::create_router(state);

    let port = args.port.unwrap_or(settings.api.port);
    let addr = format!("{}:{}", settings.api.host, port);
    info!("🚀 API Listening on http://{}", addr);
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
