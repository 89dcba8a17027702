use std::path::PathBuf;

use clap::Parser;
use tracing_subscriber::EnvFilter;

use folio_api::app::{router, AppState};
use folio_api::config;

#[derive(Parser)]
#[command(name = "folio-api")]
#[command(about = "Git-backed portfolio data API")]
#[command(version)]
struct Args {
    /// Port to listen on
    #[arg(short, long)]
    port: Option<u16>,

    /// Root of the portfolio data repository
    #[arg(long)]
    data_dir: Option<PathBuf>,

    /// Directory holding local-only data such as credentials
    #[arg(long)]
    private_dir: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load .env if present so cargo run picks up DATA_REPO_PATH, PORT, etc.
    let _ = dotenvy::dotenv();
    let args = Args::parse();

    // Initialize configuration (this loads the config singleton)
    let mut config = config::config().clone();
    if let Some(port) = args.port {
        config.server.port = port;
    }
    if let Some(dir) = args.data_dir {
        config.storage.data_dir = dir;
    }
    if let Some(dir) = args.private_dir {
        config.storage.private_dir = dir;
    }

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new(config.default_log_filter())),
        )
        .init();

    tracing::info!("Starting folio-api in {:?} mode", config.environment);
    tracing::info!(
        "Data root {:?}, private data {:?}",
        config.storage.data_dir,
        config.storage.private_dir
    );

    let bind_addr = format!("0.0.0.0:{}", config.server.port);
    let app = router(AppState::new(config));

    let listener = tokio::net::TcpListener::bind(&bind_addr).await?;
    tracing::info!("Listening on http://{}", bind_addr);

    axum::serve(listener, app).await?;
    Ok(())
}
