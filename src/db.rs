use anyhow::Context;
use sqlx::{postgres::PgPoolOptions, PgPool};
use tracing::info;

use crate::config::DatabaseConfig;

pub async fn connect(config: &DatabaseConfig) -> anyhow::Result<PgPool> {
    let db = PgPoolOptions::new()
        .max_connections(config.max_connections)
        .connect_with(config.connect_options()?)
        .await
        .context("connect to database")?;
    info!(max_connections = config.max_connections, "database connected");
    Ok(db)
}

/// Creates the users, profile and career tables if they are absent.
pub async fn migrate(db: &PgPool) -> anyhow::Result<()> {
    sqlx::migrate!("./migrations")
        .run(db)
        .await
        .context("run migrations")?;
    Ok(())
}

fn database_error(err: &anyhow::Error) -> Option<&(dyn sqlx::error::DatabaseError + 'static)> {
    match err.downcast_ref::<sqlx::Error>() {
        Some(sqlx::Error::Database(db_err)) => Some(db_err.as_ref()),
        _ => None,
    }
}

pub fn is_unique_violation(err: &anyhow::Error) -> bool {
    database_error(err).is_some_and(|e| e.is_unique_violation())
}

pub fn is_foreign_key_violation(err: &anyhow::Error) -> bool {
    database_error(err).is_some_and(|e| e.is_foreign_key_violation())
}
