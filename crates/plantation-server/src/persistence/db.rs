//! SQLite pool setup and schema migration.

use anyhow::{Context, Result};
use sqlx::sqlite::{SqliteConnectOptions, SqlitePoolOptions};
use sqlx::SqlitePool;
use std::path::Path;
use std::str::FromStr;
use std::time::Duration;
use tracing::{info, warn};

const INIT_SCHEMA: &str = include_str!("../../migrations/001_init.sql");

/// Handle on the estate database.
#[derive(Clone)]
pub struct Database {
    pool: SqlitePool,
}

impl Database {
    pub fn pool(&self) -> &SqlitePool {
        &self.pool
    }
}

/// Open (creating if needed) the database at `db_path` and bring its schema up to date.
///
/// `":memory:"` opens a private in-memory database; keep `max_connections`
/// at 1 for it, since every connection would see its own copy.
pub async fn init_database(db_path: &str, max_connections: u32) -> Result<Database> {
    if let Some(parent) = Path::new(db_path).parent() {
        if !parent.as_os_str().is_empty() {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("creating database directory {}", parent.display()))?;
        }
    }

    let options = SqliteConnectOptions::from_str(&format!("sqlite:{}", db_path))?
        .create_if_missing(true)
        .foreign_keys(true)
        .busy_timeout(Duration::from_secs(5));

    info!("Opening estate database at {}", db_path);
    let pool = SqlitePoolOptions::new()
        .max_connections(max_connections)
        .connect_with(options)
        .await
        .with_context(|| format!("connecting to {}", db_path))?;

    run_migrations(&pool).await?;
    Ok(Database { pool })
}

async fn run_migrations(pool: &SqlitePool) -> Result<()> {
    let statements = schema_statements(INIT_SCHEMA);
    info!("Applying {} schema statements", statements.len());

    for statement in statements {
        match sqlx::query(&statement).execute(pool).await {
            Ok(_) => {}
            Err(e) if e.to_string().contains("already exists") => {}
            Err(e) if statement.to_uppercase().starts_with("CREATE") => {
                return Err(e).with_context(|| format!("schema statement failed: {}", statement));
            }
            Err(e) => warn!("Schema statement failed: {}", e),
        }
    }

    Ok(())
}

/// Split a schema script into statements, dropping `--` comment lines.
fn schema_statements(script: &str) -> Vec<String> {
    script
        .split(';')
        .map(|chunk| {
            chunk
                .lines()
                .filter(|line| !line.trim_start().starts_with("--"))
                .collect::<Vec<_>>()
                .join("\n")
                .trim()
                .to_string()
        })
        .filter(|statement| !statement.is_empty())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn schema_script_splits_into_statements() {
        let statements = schema_statements(
            "-- estates\nCREATE TABLE a (id TEXT);\n\n-- trees\nCREATE TABLE b (id TEXT);\n",
        );
        assert_eq!(
            statements,
            vec!["CREATE TABLE a (id TEXT)", "CREATE TABLE b (id TEXT)"]
        );
    }

    #[tokio::test]
    async fn init_creates_estate_tables() {
        let db = init_database(":memory:", 1).await.unwrap();

        let result: (i32,) = sqlx::query_as(
            "SELECT COUNT(*) FROM sqlite_master WHERE type='table' AND name IN ('estates', 'estate_trees')",
        )
        .fetch_one(db.pool())
        .await
        .unwrap();

        assert_eq!(result.0, 2);
    }

    #[tokio::test]
    async fn migrations_are_rerunnable() {
        let db = init_database(":memory:", 1).await.unwrap();
        run_migrations(db.pool()).await.unwrap();

        let result: (i32,) = sqlx::query_as(
            "SELECT COUNT(*) FROM sqlite_master WHERE type='index' AND name='idx_estate_trees_plot'",
        )
        .fetch_one(db.pool())
        .await
        .unwrap();

        assert_eq!(result.0, 1);
    }
}
