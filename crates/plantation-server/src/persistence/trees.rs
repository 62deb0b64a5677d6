//! Tree persistence operations.

use anyhow::Result;
use chrono::{DateTime, Utc};
use plantation_core::{GridCoord, Tree};
use sqlx::{Sqlite, SqlitePool};

/// Number of trees recorded at one plot of an estate.
pub async fn count_trees_at(pool: &SqlitePool, estate_id: &str, coord: GridCoord) -> Result<i64> {
    let (count,): (i64,) = sqlx::query_as(
        "SELECT COUNT(id) FROM estate_trees WHERE estate_id = ?1 AND x = ?2 AND y = ?3",
    )
    .bind(estate_id)
    .bind(coord.x)
    .bind(coord.y)
    .fetch_one(pool)
    .await?;

    Ok(count)
}

/// Heights at two plots, 0 where no tree stands.
pub async fn heights_at(
    pool: &SqlitePool,
    estate_id: &str,
    first: GridCoord,
    second: GridCoord,
) -> Result<(i64, i64)> {
    let rows: Vec<(i64, i64, i64)> = sqlx::query_as(
        r#"
        SELECT x, y, height FROM estate_trees
        WHERE estate_id = ?1 AND ((x = ?2 AND y = ?3) OR (x = ?4 AND y = ?5))
        LIMIT 2
        "#,
    )
    .bind(estate_id)
    .bind(first.x)
    .bind(first.y)
    .bind(second.x)
    .bind(second.y)
    .fetch_all(pool)
    .await?;

    let mut heights = (0, 0);
    for (x, y, height) in rows {
        let coord = GridCoord::new(x, y);
        if coord == first {
            heights.0 = height;
        }
        if coord == second {
            heights.1 = height;
        }
    }

    Ok(heights)
}

/// Insert a tree row within an existing transaction.
///
/// Returns false when the plot is already taken.
pub async fn insert_tree_tx(tx: &mut sqlx::Transaction<'_, Sqlite>, tree: &Tree) -> Result<bool> {
    let now = tree.created_at.to_rfc3339();
    let result = sqlx::query(
        r#"
        INSERT INTO estate_trees (id, estate_id, x, y, height, created_at, updated_at)
        VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?6)
        "#,
    )
    .bind(&tree.id)
    .bind(&tree.estate_id)
    .bind(tree.x)
    .bind(tree.y)
    .bind(tree.height)
    .bind(&now)
    .execute(&mut **tx)
    .await;

    match result {
        Ok(_) => Ok(true),
        Err(sqlx::Error::Database(err)) if err.is_unique_violation() => Ok(false),
        Err(err) => Err(err.into()),
    }
}

/// Every recorded height of an estate.
pub async fn load_heights(pool: &SqlitePool, estate_id: &str) -> Result<Vec<i64>> {
    let rows: Vec<(i64,)> = sqlx::query_as("SELECT height FROM estate_trees WHERE estate_id = ?1")
        .bind(estate_id)
        .fetch_all(pool)
        .await?;

    Ok(rows.into_iter().map(|(height,)| height).collect())
}

/// Load all trees of an estate.
pub async fn load_trees(pool: &SqlitePool, estate_id: &str) -> Result<Vec<Tree>> {
    let rows = sqlx::query_as::<_, TreeRow>(
        "SELECT id, estate_id, x, y, height, created_at FROM estate_trees WHERE estate_id = ?1",
    )
    .bind(estate_id)
    .fetch_all(pool)
    .await?;

    Ok(rows.into_iter().map(|r| r.into()).collect())
}

// Internal row type for SQLx
#[derive(sqlx::FromRow)]
struct TreeRow {
    id: String,
    estate_id: String,
    x: i64,
    y: i64,
    height: i64,
    created_at: String,
}

impl From<TreeRow> for Tree {
    fn from(row: TreeRow) -> Self {
        let created_at = DateTime::parse_from_rfc3339(&row.created_at)
            .map(|dt| dt.with_timezone(&Utc))
            .unwrap_or_else(|_| Utc::now());

        Tree {
            id: row.id,
            estate_id: row.estate_id,
            x: row.x,
            y: row.y,
            height: row.height,
            created_at,
        }
    }
}
