//! walletsvc - wallet HTTP service
//!
//! ```text
//! ┌──────────┐    ┌──────────┐    ┌─────────────┐    ┌────────────┐
//! │  Config  │───▶│ Gateway  │───▶│   Wallet    │───▶│ PostgreSQL │
//! │  (YAML)  │    │  (axum)  │    │(Coordinator)│    │(SERIALIZ.) │
//! └──────────┘    └──────────┘    └─────────────┘    └────────────┘
//! ```

use std::sync::Arc;

use clap::Parser;

use wallet_service::config::AppConfig;
use wallet_service::db::Database;
use wallet_service::gateway::{self, state::AppState};
use wallet_service::logging::init_logging;
use wallet_service::wallet;

#[derive(Debug, Parser)]
#[command(name = "walletsvc", about = "Wallet transfer service", version)]
struct Cli {
    /// Configuration profile, loaded from config/<env>.yaml
    #[arg(long, short, default_value = "dev", env = "WALLET_ENV")]
    env: String,

    /// Override gateway.port from the config file
    #[arg(long)]
    port: Option<u16>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let mut config = AppConfig::load(&cli.env)?;
    if let Some(port) = cli.port {
        config.gateway.port = port;
    }

    let _log_guard = init_logging(&config);

    tracing::info!(
        env = %cli.env,
        commit = env!("GIT_HASH"),
        branch = env!("GIT_BRANCH"),
        "Starting walletsvc"
    );

    let db = Arc::new(Database::connect(&config.database).await?);
    if config.database.run_migrations {
        db.migrate().await?;
    }

    tracing::info!(
        max_attempts = config.transfer_retry.max_attempts,
        base_delay_ms = config.transfer_retry.base_delay_ms,
        max_delay_ms = config.transfer_retry.max_delay_ms,
        "Transfer retry policy"
    );
    let wallet = Arc::new(wallet::postgres_wallet(db.clone(), config.transfer_retry));

    let state = Arc::new(AppState::new(wallet, Some(db)));
    gateway::run_server(&config.gateway, state).await
}
