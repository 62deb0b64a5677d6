//! Estate/tree store contract and the in-memory backend.

use std::collections::HashMap;

use anyhow::Result;
use async_trait::async_trait;
use dashmap::mapref::entry::Entry;
use dashmap::DashMap;
use plantation_core::{Estate, GridCoord, Median, Neighbors, Tree};

/// Heights of the serpentine neighbors of a plot, 0 where no tree stands.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct NeighborHeights {
    pub prev: i64,
    pub next: i64,
}

/// Result of a tree insert.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlantOutcome {
    Planted,
    /// Another tree took the plot between the occupancy check and the insert.
    PlotTaken,
    EstateMissing,
}

/// Durable record of estates and trees.
///
/// `create_tree` is the only multi-row write and must be all-or-nothing:
/// either the tree row exists and the estate aggregates include it, or
/// neither changed.
#[async_trait]
pub trait EstateStore: Send + Sync {
    /// Persist a new estate exactly as given (baseline distance already seeded).
    async fn create_estate(&self, estate: &Estate) -> Result<()>;

    async fn get_estate(&self, id: &str) -> Result<Option<Estate>>;

    async fn count_trees_at(&self, estate_id: &str, coord: GridCoord) -> Result<i64>;

    async fn neighbor_heights(&self, estate_id: &str, neighbors: Neighbors)
        -> Result<NeighborHeights>;

    /// Insert the tree and fold it into the estate aggregates: `count + 1`,
    /// max/min adjusted, `drone_distance += distance_factor`, median unknown.
    async fn create_tree(&self, tree: &Tree, distance_factor: i64) -> Result<PlantOutcome>;

    async fn all_heights(&self, estate_id: &str) -> Result<Vec<i64>>;

    /// Cache a median computed from `tree_count` heights.
    ///
    /// Skipped (returns false) when the estate no longer holds exactly
    /// `tree_count` trees, so a median raced by a planting is never cached.
    async fn store_median(&self, estate_id: &str, median: f64, tree_count: i64) -> Result<bool>;

    async fn list_trees(&self, estate_id: &str) -> Result<Vec<Tree>>;
}

struct EstateEntry {
    estate: Estate,
    trees: HashMap<GridCoord, Tree>,
}

/// Process-local store backed by `DashMap`.
///
/// Each estate lives in one map entry, so holding the entry's write guard
/// makes the occupancy re-check, the insert and the aggregate update atomic.
#[derive(Default)]
pub struct MemoryStore {
    estates: DashMap<String, EstateEntry>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn estate_count(&self) -> usize {
        self.estates.len()
    }
}

#[async_trait]
impl EstateStore for MemoryStore {
    async fn create_estate(&self, estate: &Estate) -> Result<()> {
        match self.estates.entry(estate.id.clone()) {
            Entry::Occupied(_) => anyhow::bail!("estate {} already exists", estate.id),
            Entry::Vacant(slot) => {
                slot.insert(EstateEntry {
                    estate: estate.clone(),
                    trees: HashMap::new(),
                });
                Ok(())
            }
        }
    }

    async fn get_estate(&self, id: &str) -> Result<Option<Estate>> {
        Ok(self.estates.get(id).map(|entry| entry.estate.clone()))
    }

    async fn count_trees_at(&self, estate_id: &str, coord: GridCoord) -> Result<i64> {
        Ok(self
            .estates
            .get(estate_id)
            .map(|entry| i64::from(entry.trees.contains_key(&coord)))
            .unwrap_or(0))
    }

    async fn neighbor_heights(
        &self,
        estate_id: &str,
        neighbors: Neighbors,
    ) -> Result<NeighborHeights> {
        let Some(entry) = self.estates.get(estate_id) else {
            return Ok(NeighborHeights::default());
        };
        let height_at = |coord: GridCoord| entry.trees.get(&coord).map(|t| t.height).unwrap_or(0);

        Ok(NeighborHeights {
            prev: height_at(neighbors.prev),
            next: height_at(neighbors.next),
        })
    }

    async fn create_tree(&self, tree: &Tree, distance_factor: i64) -> Result<PlantOutcome> {
        let Some(mut entry) = self.estates.get_mut(&tree.estate_id) else {
            return Ok(PlantOutcome::EstateMissing);
        };
        let coord = tree.coord();
        if entry.trees.contains_key(&coord) {
            return Ok(PlantOutcome::PlotTaken);
        }

        entry.trees.insert(coord, tree.clone());
        entry.estate.apply_planting(tree.height, distance_factor);
        Ok(PlantOutcome::Planted)
    }

    async fn all_heights(&self, estate_id: &str) -> Result<Vec<i64>> {
        Ok(self
            .estates
            .get(estate_id)
            .map(|entry| entry.trees.values().map(|t| t.height).collect())
            .unwrap_or_default())
    }

    async fn store_median(&self, estate_id: &str, median: f64, tree_count: i64) -> Result<bool> {
        let Some(mut entry) = self.estates.get_mut(estate_id) else {
            return Ok(false);
        };
        if entry.estate.count != tree_count {
            return Ok(false);
        }
        entry.estate.median = Median::Known(median);
        Ok(true)
    }

    async fn list_trees(&self, estate_id: &str) -> Result<Vec<Tree>> {
        Ok(self
            .estates
            .get(estate_id)
            .map(|entry| entry.trees.values().cloned().collect())
            .unwrap_or_default())
    }
}
