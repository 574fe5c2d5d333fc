//! Creates the schema and the fixed categories. Safe to run repeatedly.

use anyhow::Context;
use configs::Settings;
use storage_adapters::SqliteStore;
use tracing::info;

const CATEGORIES: &[&str] = &["Farandula", "Politica"];

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info".into()),
        )
        .init();

    let settings = Settings::load().context("loading settings")?;
    let store = SqliteStore::connect(&settings.database_url, settings.database_max_connections)
        .await
        .context("opening database")?;

    let inserted = store
        .ensure_categories(CATEGORIES)
        .await
        .context("seeding categories")?;
    info!(inserted, database = %settings.database_url, "categories seeded");

    store.close().await;
    Ok(())
}
