//! Coffee Inventory - Backend Server

use std::path::Path;

use anyhow::Context;
use coffee_inventory_backend::{config::Config, create_app, AppState, InventoryStore};
use shared::InventorySnapshot;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "cis_server=debug,coffee_inventory_backend=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    // Load configuration
    dotenvy::dotenv().ok();
    let config = Config::load()?;

    tracing::info!("Starting Coffee Inventory Server");
    tracing::info!("Environment: {}", config.environment);

    let store = match config.store.seed_path.as_deref() {
        Some(path) => load_seed(Path::new(path), &config)?,
        None => {
            tracing::info!("No seed configured, starting with an empty store");
            InventoryStore::in_memory(config.audit.clone())
        }
    };

    let addr = config.bind_address();
    let app = create_app(AppState::new(store, config));

    tracing::info!("Listening on {}", addr);
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}

/// Read a JSON snapshot from disk into a fresh store
fn load_seed(path: &Path, config: &Config) -> anyhow::Result<InventoryStore> {
    let json = std::fs::read_to_string(path)
        .with_context(|| format!("reading seed snapshot {}", path.display()))?;
    let load = InventorySnapshot::from_json_str(&json)?;
    if load.skipped > 0 {
        tracing::warn!(skipped = load.skipped, "Skipped malformed records in seed snapshot");
    }
    tracing::info!(
        items = load.snapshot.items.len(),
        locations = load.snapshot.locations.len(),
        transactions = load.snapshot.transactions.len(),
        "Seed snapshot loaded"
    );
    Ok(InventoryStore::from_snapshot(load.snapshot, config.audit.clone()))
}
