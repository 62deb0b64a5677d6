//! Estate persistence operations.

use anyhow::Result;
use chrono::{DateTime, Utc};
use plantation_core::{Estate, Median};
use sqlx::{Sqlite, SqlitePool};

/// Insert a new estate with its seeded aggregates.
pub async fn insert_estate(pool: &SqlitePool, estate: &Estate) -> Result<()> {
    let now = estate.created_at.to_rfc3339();
    let median = estate.median;

    sqlx::query(
        r#"
        INSERT INTO estates (id, width, length, count, max, min, median, median_known, drone_distance, created_at, updated_at)
        VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?10)
        "#,
    )
    .bind(&estate.id)
    .bind(estate.width)
    .bind(estate.length)
    .bind(estate.count)
    .bind(estate.max)
    .bind(estate.min)
    .bind(median.value().unwrap_or(0.0))
    .bind(median.is_known())
    .bind(estate.drone_distance)
    .bind(&now)
    .execute(pool)
    .await?;

    Ok(())
}

/// Load one estate by ID.
pub async fn get_estate(pool: &SqlitePool, id: &str) -> Result<Option<Estate>> {
    let row = sqlx::query_as::<_, EstateRow>(
        "SELECT id, width, length, count, max, min, median, median_known, drone_distance, created_at FROM estates WHERE id = ?1",
    )
    .bind(id)
    .fetch_optional(pool)
    .await?;

    Ok(row.map(Into::into))
}

/// Fold one planted tree into the estate aggregates within an existing transaction.
///
/// Returns false when the estate row does not exist.
pub async fn apply_planting_tx(
    tx: &mut sqlx::Transaction<'_, Sqlite>,
    estate_id: &str,
    height: i64,
    distance_factor: i64,
) -> Result<bool> {
    let result = sqlx::query(
        r#"
        UPDATE estates
        SET count = count + 1,
            max = CASE WHEN max < ?1 THEN ?1 ELSE max END,
            min = CASE WHEN (min = 0 OR min > ?1) THEN ?1 ELSE min END,
            drone_distance = drone_distance + ?2,
            median = 0,
            median_known = 0,
            updated_at = ?3
        WHERE id = ?4
        "#,
    )
    .bind(height)
    .bind(distance_factor)
    .bind(Utc::now().to_rfc3339())
    .bind(estate_id)
    .execute(&mut **tx)
    .await?;

    Ok(result.rows_affected() > 0)
}

/// Cache a computed median on the estate.
///
/// Only applies while the estate still holds `tree_count` trees.
pub async fn store_median(
    pool: &SqlitePool,
    estate_id: &str,
    median: f64,
    tree_count: i64,
) -> Result<bool> {
    let result = sqlx::query(
        "UPDATE estates SET median = ?1, median_known = 1, updated_at = ?2 WHERE id = ?3 AND count = ?4",
    )
    .bind(median)
    .bind(Utc::now().to_rfc3339())
    .bind(estate_id)
    .bind(tree_count)
    .execute(pool)
    .await?;

    Ok(result.rows_affected() > 0)
}

// Internal row type for SQLx
#[derive(sqlx::FromRow)]
struct EstateRow {
    id: String,
    width: i64,
    length: i64,
    count: i64,
    max: i64,
    min: i64,
    median: f64,
    median_known: bool,
    drone_distance: i64,
    created_at: String,
}

impl From<EstateRow> for Estate {
    fn from(row: EstateRow) -> Self {
        let created_at = DateTime::parse_from_rfc3339(&row.created_at)
            .map(|dt| dt.with_timezone(&Utc))
            .unwrap_or_else(|_| Utc::now());

        Estate {
            id: row.id,
            width: row.width,
            length: row.length,
            count: row.count,
            max: row.max,
            min: row.min,
            median: Median::from_parts(row.median, row.median_known),
            drone_distance: row.drone_distance,
            created_at,
        }
    }
}
