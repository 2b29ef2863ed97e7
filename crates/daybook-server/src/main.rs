use std::path::PathBuf;

use clap::Parser;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use daybook_core::storage::data_dir;
use daybook_core::Store;
use daybook_server::{app, AppState, Config};

/// Fallback signing secret for local development. Anyone can forge tokens
/// against it, so production must configure a real one.
const DEV_TOKEN_SECRET: &str = "daybook-dev-secret";

#[derive(Parser)]
#[command(name = "daybook-server", version, about = "Daybook REST backend")]
struct Cli {
    /// Bind host (overrides config)
    #[arg(long)]
    host: Option<String>,
    /// Bind port (overrides config)
    #[arg(long)]
    port: Option<u16>,
    /// SQLite database path (overrides config)
    #[arg(long)]
    db: Option<PathBuf>,
    /// Token signing secret (overrides config and DAYBOOK_TOKEN_SECRET)
    #[arg(long)]
    secret: Option<String>,
}

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    if let Err(e) = run(Cli::parse()).await {
        eprintln!("error: {e}");
        std::process::exit(1);
    }
}

async fn run(cli: Cli) -> Result<(), Box<dyn std::error::Error>> {
    let config = Config::load_or_default();

    let secret = cli
        .secret
        .or_else(|| std::env::var("DAYBOOK_TOKEN_SECRET").ok())
        .or_else(|| config.auth.token_secret.clone());
    let secret = match secret {
        Some(secret) => secret,
        None => {
            warn!("no token secret configured, using the built-in development secret");
            DEV_TOKEN_SECRET.to_string()
        }
    };

    let db_path = match cli.db.or_else(|| config.storage.db_path.clone()) {
        Some(path) => path,
        None => data_dir()?.join("daybook.db"),
    };

    let host = cli.host.unwrap_or_else(|| config.server.host.clone());
    let port = cli.port.unwrap_or(config.server.port);
    let token_ttl = chrono::Duration::hours(i64::from(config.auth.token_ttl_hours));

    info!("Opening database at {}", db_path.display());
    let store = Store::open(&db_path)?;
    let state = AppState::new(store, &secret, token_ttl);

    let addr = format!("{host}:{port}");
    daybook_server::serve(app(state), &addr).await
}
