//! Wallet Ledger - HTTP service entry point
//!
//! ```text
//! config/<env>.yaml ─▶ Store (Postgres | memory) ─▶ TransferEngine ─┐
//!                                                  QueryService  ───┴▶ Gateway (axum)
//! ```
//!
//! Flags:
//! - `--env <name>` / `-e <name>`: config file to load (default `dev`)
//! - `--port <n>`: override `gateway.port`
//! - `--memory`: in-memory store seeded from config, no database

use std::sync::Arc;

use anyhow::Context;

use wallet_ledger::config::AppConfig;
use wallet_ledger::db::Database;
use wallet_ledger::gateway::{self, state::AppState};
use wallet_ledger::store::{MemoryStore, PgStore, TransferStore};

fn get_env() -> String {
    let args: Vec<String> = std::env::args().collect();
    for i in 0..args.len() {
        if (args[i] == "--env" || args[i] == "-e") && i + 1 < args.len() {
            return args[i + 1].clone();
        }
    }
    "dev".to_string()
}

/// Get port override from command line (--port argument)
fn get_port_override() -> Option<u16> {
    let args: Vec<String> = std::env::args().collect();
    for i in 0..args.len() {
        if args[i] == "--port" && i + 1 < args.len() {
            return args[i + 1].parse().ok();
        }
    }
    None
}

fn use_memory_store() -> bool {
    std::env::args().any(|a| a == "--memory")
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let env = get_env();
    let mut app_config =
        AppConfig::load(&env).with_context(|| format!("loading config for env '{}'", env))?;
    if let Some(port) = get_port_override() {
        app_config.gateway.port = port;
    }
    let _log_guard = wallet_ledger::logging::init_logging(&app_config);

    tracing::info!(
        env = %env,
        revision = env!("BUILD_REVISION"),
        "Starting wallet ledger"
    );

    let seeds = app_config.seed_wallets();
    let (store, db): (Arc<dyn TransferStore>, Option<Arc<Database>>) = if use_memory_store() {
        tracing::warn!("Running with in-memory store, nothing is persisted");
        (Arc::new(MemoryStore::with_wallets(seeds)), None)
    } else {
        let db = Arc::new(
            Database::connect(&app_config.postgres)
                .await
                .context("connecting to PostgreSQL")?,
        );
        db.init_schema().await.context("initializing schema")?;
        db.seed_wallets(&seeds).await.context("seeding wallets")?;
        (Arc::new(PgStore::new(db.clone())), Some(db))
    };

    tracing::info!(
        store = store.name(),
        deadline_ms = app_config.transfer.deadline_ms,
        "Transfer engine ready"
    );

    let state = AppState::new(store, &app_config.transfer, &app_config.gateway);
    let served = gateway::run_server(&app_config.gateway, state, gateway::shutdown_signal()).await;

    if let Some(db) = db {
        db.close().await;
    }
    served.context("gateway server")?;

    tracing::info!("Wallet ledger stopped");
    Ok(())
}
