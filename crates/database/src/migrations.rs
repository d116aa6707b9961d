//! Database migrations

use anyhow::Context;
use sqlx::SqlitePool;
use tracing::info;

pub static MIGRATOR: sqlx::migrate::Migrator = sqlx::migrate!("./migrations");

/// Run all pending database migrations.
pub async fn run_migrations(pool: &SqlitePool) -> anyhow::Result<()> {
    MIGRATOR
        .run(pool)
        .await
        .context("database migrations failed")?;
    info!("database migrations applied");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::connection::prepare_database;
    use mentorlink_config::DatabaseConfig;
    use tempfile::TempDir;

    #[tokio::test]
    async fn migrations_apply_cleanly_twice() {
        let temp_dir = TempDir::new().unwrap();
        let db_path = temp_dir.path().join("migrations.db");
        let config = DatabaseConfig {
            url: format!("sqlite://{}", db_path.display()),
            max_connections: 1,
        };

        let pool = prepare_database(&config).await.unwrap();
        run_migrations(&pool).await.unwrap();
        // Re-running must be a no-op.
        run_migrations(&pool).await.unwrap();
    }
}
