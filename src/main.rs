use anyhow::Context;
use clap::Parser;
use std::sync::Arc;
use tracing_subscriber::EnvFilter;

use todo_api::config::{AppConfig, StoreBackend};
use todo_api::database::{DatabaseManager, MemoryRepository, PgRepository, Repository};
use todo_api::{app, AppState};

#[derive(Parser)]
#[command(name = "todo-api")]
#[command(about = "Multi-user to-do list API server")]
#[command(version)]
struct Cli {
    /// Port to listen on (overrides PORT)
    #[arg(long)]
    port: Option<u16>,

    /// Address to bind
    #[arg(long, env = "BIND_ADDR", default_value = "0.0.0.0")]
    bind: String,

    /// Skip creating the users/items tables at startup
    #[arg(long)]
    no_schema: bool,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load .env if present so cargo run picks up DATABASE_URL, JWT_KEY, etc.
    let _ = dotenvy::dotenv();

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("todo_api=info,tower_http=info")),
        )
        .init();

    let cli = Cli::parse();

    let mut config = AppConfig::from_env().context("invalid configuration")?;
    if let Some(port) = cli.port {
        config.server.port = port;
    }
    tracing::info!("Starting Todo API in {:?} mode", config.environment);

    let repository: Arc<dyn Repository> = match config.database.backend {
        StoreBackend::Postgres => {
            let pool = DatabaseManager::connect(&config.database)
                .await
                .context("database connection failed")?;
            if !cli.no_schema {
                DatabaseManager::ensure_schema(&pool).await.context("schema setup failed")?;
            }
            Arc::new(PgRepository::new(pool))
        }
        StoreBackend::Memory => {
            tracing::warn!("Using in-memory store; data is lost on exit");
            Arc::new(MemoryRepository::new())
        }
    };

    let bind_addr = format!("{}:{}", cli.bind, config.server.port);
    let state = AppState::new(config, repository);

    let listener = tokio::net::TcpListener::bind(&bind_addr)
        .await
        .with_context(|| format!("failed to bind {}", bind_addr))?;

    tracing::info!("Todo API listening on http://{}", bind_addr);

    axum::serve(listener, app(state)).await.context("server error")?;
    Ok(())
}
