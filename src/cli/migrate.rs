//! Migrate command - applies the access schema

use tracing::info;

use crate::config::AppConfig;
use crate::infrastructure::storage::PostgresMigrator;

pub async fn run(config: &AppConfig) -> anyhow::Result<()> {
    let url = config
        .database
        .url
        .as_deref()
        .ok_or_else(|| anyhow::anyhow!("database.url must be set to run migrations"))?;

    let pool = crate::connect_database(config, url).await?;
    let applied = PostgresMigrator::new(pool).run().await?;

    info!(applied, "Migrations complete");
    println!("Applied {} migration(s)", applied);
    Ok(())
}
