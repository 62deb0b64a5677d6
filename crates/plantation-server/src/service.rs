//! Estate placement and statistics use cases.
//!
//! Each operation runs one request against the store: validate, read what it
//! needs, compute with the pure core, write. Every store call is bounded by the
//! caller's `Deadline`; nothing is retried.

use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use anyhow::anyhow;
use chrono::Utc;
use thiserror::Error;
use tokio::time::Instant;
use uuid::Uuid;

use plantation_core::{
    baseline_drone_distance, compute_median, distance_factor, neighbors, validate_bounds,
    validate_request, validate_vacancy, visit_index, DronePlan, Estate, EstateDimensions,
    EstateStats, Median, PlantingRules, Tree, ValidationError,
};

use crate::state::store::{EstateStore, PlantOutcome};

#[derive(Debug, Error)]
pub enum ServiceError {
    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error("estate not found")]
    EstateNotFound(String),

    /// Any storage failure, including an elapsed deadline.
    #[error(transparent)]
    Store(#[from] anyhow::Error),
}

/// Instant after which a request's store calls are abandoned.
#[derive(Debug, Clone, Copy, Default)]
pub struct Deadline {
    at: Option<Instant>,
}

impl Deadline {
    pub fn none() -> Self {
        Self { at: None }
    }

    pub fn after(timeout: Duration) -> Self {
        Self {
            at: Some(Instant::now() + timeout),
        }
    }

    /// Await one store call, failing it if the deadline passes first.
    pub async fn run<T, F>(&self, operation: &'static str, call: F) -> Result<T, ServiceError>
    where
        F: Future<Output = anyhow::Result<T>>,
    {
        let result = match self.at {
            Some(at) => tokio::time::timeout_at(at, call)
                .await
                .map_err(|_| anyhow!("{} exceeded the request deadline", operation))?,
            None => call.await,
        };
        result.map_err(|err| ServiceError::Store(err.context(operation)))
    }
}

pub struct PlantationService {
    store: Arc<dyn EstateStore>,
    rules: PlantingRules,
}

impl PlantationService {
    pub fn new(store: Arc<dyn EstateStore>) -> Self {
        Self::with_rules(store, PlantingRules::default())
    }

    pub fn with_rules(store: Arc<dyn EstateStore>, rules: PlantingRules) -> Self {
        Self { store, rules }
    }

    /// Create an empty estate seeded with its baseline drone distance.
    pub async fn create_estate(
        &self,
        width: i64,
        length: i64,
        deadline: Deadline,
    ) -> Result<Estate, ServiceError> {
        let dims = EstateDimensions::new(width, length)?;
        let baseline = baseline_drone_distance(dims, &self.rules)
            .ok_or(ValidationError::DimensionTooLarge { width, length })?;
        let estate = Estate {
            id: Uuid::new_v4().to_string(),
            width: dims.width,
            length: dims.length,
            count: 0,
            max: 0,
            min: 0,
            median: Median::Unknown,
            drone_distance: baseline,
            created_at: Utc::now(),
        };

        deadline
            .run("create estate", self.store.create_estate(&estate))
            .await?;

        tracing::info!(
            "Created estate {} ({}x{}, baseline distance {})",
            estate.id,
            estate.length,
            estate.width,
            estate.drone_distance
        );
        Ok(estate)
    }

    /// Validate and plant one tree, folding its distance factor into the estate.
    pub async fn plant_tree(
        &self,
        estate_id: &str,
        x: i64,
        y: i64,
        height: i64,
        deadline: Deadline,
    ) -> Result<Tree, ServiceError> {
        let coord = validate_request(x, y, height, &self.rules)?;
        let estate = self.load_estate(estate_id, deadline).await?;
        validate_bounds(coord, estate.dimensions())?;

        let occupied = deadline
            .run("count trees at plot", self.store.count_trees_at(estate_id, coord))
            .await?;
        validate_vacancy(coord, occupied)?;

        let around = neighbors(coord.x, coord.y, estate.length);
        let heights = deadline
            .run(
                "load neighbor heights",
                self.store.neighbor_heights(estate_id, around),
            )
            .await?;
        let factor = distance_factor(height, heights.prev, heights.next);

        let tree = Tree {
            id: Uuid::new_v4().to_string(),
            estate_id: estate_id.to_string(),
            x: coord.x,
            y: coord.y,
            height,
            created_at: Utc::now(),
        };

        match deadline
            .run("create tree", self.store.create_tree(&tree, factor))
            .await?
        {
            PlantOutcome::Planted => {
                tracing::info!(
                    "Planted tree {} at ({}, {}) height {} in estate {} (distance factor {})",
                    tree.id,
                    tree.x,
                    tree.y,
                    tree.height,
                    estate_id,
                    factor
                );
                Ok(tree)
            }
            PlantOutcome::PlotTaken => Err(ValidationError::AlreadyOccupied {
                x: coord.x,
                y: coord.y,
            }
            .into()),
            PlantOutcome::EstateMissing => Err(ServiceError::EstateNotFound(estate_id.to_string())),
        }
    }

    /// Count/max/min from the estate aggregates plus the (possibly recomputed) median.
    pub async fn estate_stats(
        &self,
        estate_id: &str,
        deadline: Deadline,
    ) -> Result<EstateStats, ServiceError> {
        let estate = self.load_estate(estate_id, deadline).await?;

        let median = match estate.median {
            Median::Known(value) => value,
            Median::Unknown => {
                let heights = deadline
                    .run("load tree heights", self.store.all_heights(estate_id))
                    .await?;
                match compute_median(&heights) {
                    Some(value) => {
                        self.spawn_median_writeback(estate_id, value, heights.len() as i64);
                        value
                    }
                    None => 0.0,
                }
            }
        };

        Ok(EstateStats {
            count: estate.count,
            max: estate.max,
            min: estate.min,
            median,
        })
    }

    pub async fn drone_plan(
        &self,
        estate_id: &str,
        deadline: Deadline,
    ) -> Result<DronePlan, ServiceError> {
        let estate = self.load_estate(estate_id, deadline).await?;
        Ok(DronePlan {
            distance: estate.drone_distance,
        })
    }

    /// Every tree of the estate in the order the drone visits them.
    pub async fn list_trees(
        &self,
        estate_id: &str,
        deadline: Deadline,
    ) -> Result<Vec<Tree>, ServiceError> {
        let estate = self.load_estate(estate_id, deadline).await?;
        let mut trees = deadline
            .run("list trees", self.store.list_trees(estate_id))
            .await?;
        trees.sort_by_key(|tree| visit_index(tree.x, tree.y, estate.length));
        Ok(trees)
    }

    async fn load_estate(&self, estate_id: &str, deadline: Deadline) -> Result<Estate, ServiceError> {
        deadline
            .run("load estate", self.store.get_estate(estate_id))
            .await?
            .ok_or_else(|| ServiceError::EstateNotFound(estate_id.to_string()))
    }

    /// Cache the median in the background; failures are logged only.
    fn spawn_median_writeback(&self, estate_id: &str, median: f64, tree_count: i64) {
        let store = Arc::clone(&self.store);
        let estate_id = estate_id.to_string();
        tokio::spawn(async move {
            match store.store_median(&estate_id, median, tree_count).await {
                Ok(true) => tracing::debug!("Cached median {} for estate {}", median, estate_id),
                Ok(false) => {
                    tracing::debug!("Skipped stale median {} for estate {}", median, estate_id)
                }
                Err(err) => {
                    tracing::warn!("Failed to cache median for estate {}: {:#}", estate_id, err)
                }
            }
        });
    }
}
