//! Standalone schema setup.
//!
//! Ensures the coordinates collection exists, indexes `lat` and `lng`, and
//! installs the document validator. Safe to run any number of times.

use coordinates_api::core::config::DatabaseConfig;
use coordinates_api::core::database;
use coordinates_api::features::coordinates::schema;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let _ = dotenvy::dotenv();

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = DatabaseConfig::from_env().map_err(|e| anyhow::anyhow!(e))?;
    tracing::info!(
        "Setting up database '{}' at {}",
        config.name,
        config.redacted_uri()
    );

    let client = database::create_client(&config).await?;
    let db = database::database(&client, &config);

    schema::ensure_schema(&db, &config.collection)
        .await
        .map_err(|e| anyhow::anyhow!("Schema setup failed: {}", e))?;

    tracing::info!("Database and collection setup completed successfully");
    Ok(())
}
