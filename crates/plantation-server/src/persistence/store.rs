//! SQLite implementation of the estate store contract.

use anyhow::Result;
use async_trait::async_trait;
use plantation_core::{Estate, GridCoord, Neighbors, Tree};

use super::db::Database;
use super::{estates, trees};
use crate::state::store::{EstateStore, NeighborHeights, PlantOutcome};

#[async_trait]
impl EstateStore for Database {
    async fn create_estate(&self, estate: &Estate) -> Result<()> {
        estates::insert_estate(self.pool(), estate).await
    }

    async fn get_estate(&self, id: &str) -> Result<Option<Estate>> {
        estates::get_estate(self.pool(), id).await
    }

    async fn count_trees_at(&self, estate_id: &str, coord: GridCoord) -> Result<i64> {
        trees::count_trees_at(self.pool(), estate_id, coord).await
    }

    async fn neighbor_heights(
        &self,
        estate_id: &str,
        neighbors: Neighbors,
    ) -> Result<NeighborHeights> {
        let (prev, next) =
            trees::heights_at(self.pool(), estate_id, neighbors.prev, neighbors.next).await?;
        Ok(NeighborHeights { prev, next })
    }

    async fn create_tree(&self, tree: &Tree, distance_factor: i64) -> Result<PlantOutcome> {
        // Dropping the transaction without commit rolls it back.
        let mut tx = self.pool().begin().await?;

        if !estates::apply_planting_tx(&mut tx, &tree.estate_id, tree.height, distance_factor)
            .await?
        {
            return Ok(PlantOutcome::EstateMissing);
        }
        if !trees::insert_tree_tx(&mut tx, tree).await? {
            return Ok(PlantOutcome::PlotTaken);
        }

        tx.commit().await?;
        Ok(PlantOutcome::Planted)
    }

    async fn all_heights(&self, estate_id: &str) -> Result<Vec<i64>> {
        trees::load_heights(self.pool(), estate_id).await
    }

    async fn store_median(&self, estate_id: &str, median: f64, tree_count: i64) -> Result<bool> {
        estates::store_median(self.pool(), estate_id, median, tree_count).await
    }

    async fn list_trees(&self, estate_id: &str) -> Result<Vec<Tree>> {
        trees::load_trees(self.pool(), estate_id).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::persistence::init_database;
    use chrono::Utc;
    use plantation_core::Median;

    async fn store_with_estate(id: &str) -> Database {
        let db = init_database(":memory:", 1).await.unwrap();
        let estate = Estate {
            id: id.to_string(),
            width: 5,
            length: 6,
            count: 0,
            max: 0,
            min: 0,
            median: Median::Unknown,
            drone_distance: 292,
            created_at: Utc::now(),
        };
        db.create_estate(&estate).await.unwrap();
        db
    }

    fn tree(id: &str, estate_id: &str, x: i64, y: i64, height: i64) -> Tree {
        Tree {
            id: id.to_string(),
            estate_id: estate_id.to_string(),
            x,
            y,
            height,
            created_at: Utc::now(),
        }
    }

    #[tokio::test]
    async fn estate_round_trips() {
        let db = store_with_estate("e1").await;
        let estate = db.get_estate("e1").await.unwrap().unwrap();
        assert_eq!(estate.width, 5);
        assert_eq!(estate.length, 6);
        assert_eq!(estate.count, 0);
        assert_eq!(estate.drone_distance, 292);
        assert_eq!(estate.median, Median::Unknown);

        assert!(db.get_estate("missing").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn create_tree_applies_aggregates_in_one_transaction() {
        let db = store_with_estate("e1").await;

        let outcome = db.create_tree(&tree("t1", "e1", 2, 1, 11), 22).await.unwrap();
        assert_eq!(outcome, PlantOutcome::Planted);
        let outcome = db.create_tree(&tree("t2", "e1", 3, 1, 4), -8).await.unwrap();
        assert_eq!(outcome, PlantOutcome::Planted);

        let estate = db.get_estate("e1").await.unwrap().unwrap();
        assert_eq!(estate.count, 2);
        assert_eq!(estate.max, 11);
        assert_eq!(estate.min, 4);
        assert_eq!(estate.drone_distance, 306);
    }

    #[tokio::test]
    async fn duplicate_plot_rolls_back() {
        let db = store_with_estate("e1").await;
        db.create_tree(&tree("t1", "e1", 2, 1, 11), 22).await.unwrap();

        let outcome = db.create_tree(&tree("t2", "e1", 2, 1, 5), 10).await.unwrap();
        assert_eq!(outcome, PlantOutcome::PlotTaken);

        let estate = db.get_estate("e1").await.unwrap().unwrap();
        assert_eq!(estate.count, 1);
        assert_eq!(estate.drone_distance, 314);
        assert_eq!(db.all_heights("e1").await.unwrap(), vec![11]);
    }

    #[tokio::test]
    async fn tree_for_missing_estate_is_rolled_back() {
        let db = store_with_estate("e1").await;
        let outcome = db.create_tree(&tree("t1", "ghost", 1, 1, 3), 6).await.unwrap();
        assert_eq!(outcome, PlantOutcome::EstateMissing);
        assert!(db.list_trees("ghost").await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn neighbor_heights_default_to_ground() {
        let db = store_with_estate("e1").await;
        db.create_tree(&tree("t1", "e1", 1, 1, 7), 14).await.unwrap();

        let heights = db
            .neighbor_heights(
                "e1",
                Neighbors {
                    prev: GridCoord::new(1, 1),
                    next: GridCoord::new(3, 1),
                },
            )
            .await
            .unwrap();
        assert_eq!(heights, NeighborHeights { prev: 7, next: 0 });

        assert_eq!(db.count_trees_at("e1", GridCoord::new(1, 1)).await.unwrap(), 1);
        assert_eq!(db.count_trees_at("e1", GridCoord::new(2, 1)).await.unwrap(), 0);
    }

    #[tokio::test]
    async fn median_cache_is_invalidated_by_planting() {
        let db = store_with_estate("e1").await;
        db.create_tree(&tree("t1", "e1", 1, 1, 6), 12).await.unwrap();

        assert!(db.store_median("e1", 6.0, 1).await.unwrap());
        assert_eq!(
            db.get_estate("e1").await.unwrap().unwrap().median,
            Median::Known(6.0)
        );

        db.create_tree(&tree("t2", "e1", 2, 1, 8), 4).await.unwrap();
        assert_eq!(db.get_estate("e1").await.unwrap().unwrap().median, Median::Unknown);

        // computed from a stale height set
        assert!(!db.store_median("e1", 6.0, 1).await.unwrap());
    }

    #[tokio::test]
    async fn known_zero_median_is_distinct_from_unknown() {
        let db = store_with_estate("e1").await;
        assert!(db.store_median("e1", 0.0, 0).await.unwrap());
        assert_eq!(
            db.get_estate("e1").await.unwrap().unwrap().median,
            Median::Known(0.0)
        );
    }
}
