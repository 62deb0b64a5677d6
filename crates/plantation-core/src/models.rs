//! Core data models for estates and trees.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::ValidationError;
use crate::stats::Median;

/// A cell on the estate grid. Both axes start at 1.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct GridCoord {
    pub x: i64,
    pub y: i64,
}

impl GridCoord {
    pub const fn new(x: i64, y: i64) -> Self {
        Self { x, y }
    }
}

/// Grid extent of an estate.
///
/// `length` bounds the x axis and `width` bounds the y axis, so an estate has
/// `width` rows of `length` cells each.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct EstateDimensions {
    pub width: i64,
    pub length: i64,
}

impl EstateDimensions {
    /// Build dimensions, rejecting a non-positive side.
    pub fn new(width: i64, length: i64) -> Result<Self, ValidationError> {
        if length <= 0 {
            return Err(ValidationError::InvalidDimension {
                field: "length",
                value: length,
            });
        }
        if width <= 0 {
            return Err(ValidationError::InvalidDimension {
                field: "width",
                value: width,
            });
        }
        Ok(Self { width, length })
    }

    pub fn contains(&self, coord: GridCoord) -> bool {
        coord.x >= 1 && coord.y >= 1 && coord.x <= self.length && coord.y <= self.width
    }
}

/// Snapshot of an estate row and its running aggregates.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Estate {
    pub id: String,
    pub width: i64,
    pub length: i64,
    /// Number of planted trees
    pub count: i64,
    /// Tallest planted tree, 0 while empty
    pub max: i64,
    /// Shortest planted tree, 0 while empty
    pub min: i64,
    pub median: Median,
    /// Running drone travel total, seeded from the estate baseline
    pub drone_distance: i64,
    pub created_at: DateTime<Utc>,
}

impl Estate {
    pub fn dimensions(&self) -> EstateDimensions {
        EstateDimensions {
            width: self.width,
            length: self.length,
        }
    }

    /// Fold one planted tree into the aggregates.
    ///
    /// Store backends that keep estates in memory use this to mirror the
    /// SQL update applied by the durable backend.
    pub fn apply_planting(&mut self, height: i64, distance_factor: i64) {
        self.count += 1;
        if self.max < height {
            self.max = height;
        }
        if self.min == 0 || self.min > height {
            self.min = height;
        }
        self.drone_distance += distance_factor;
        self.median = Median::Unknown;
    }
}

/// A planted tree.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Tree {
    pub id: String,
    pub estate_id: String,
    pub x: i64,
    pub y: i64,
    pub height: i64,
    pub created_at: DateTime<Utc>,
}

impl Tree {
    pub fn coord(&self) -> GridCoord {
        GridCoord::new(self.x, self.y)
    }
}

/// Request body for creating an estate.
///
/// Fields are optional so a missing one can be reported by name.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CreateEstateRequest {
    pub width: Option<i64>,
    pub length: Option<i64>,
}

/// Request body for planting a tree.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PlantTreeRequest {
    pub x: Option<i64>,
    pub y: Option<i64>,
    pub height: Option<i64>,
}

/// Height distribution summary for an estate.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct EstateStats {
    pub count: i64,
    pub max: i64,
    pub min: i64,
    /// Median height, 0 for an empty estate
    pub median: f64,
}

/// Accumulated drone travel distance for an estate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DronePlan {
    pub distance: i64,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn empty_estate() -> Estate {
        Estate {
            id: "estate-1".to_string(),
            width: 5,
            length: 6,
            count: 0,
            max: 0,
            min: 0,
            median: Median::Known(4.0),
            drone_distance: 292,
            created_at: Utc::now(),
        }
    }

    #[test]
    fn dimensions_reject_non_positive_sides() {
        assert_eq!(
            EstateDimensions::new(5, 0),
            Err(ValidationError::InvalidDimension {
                field: "length",
                value: 0
            })
        );
        assert_eq!(
            EstateDimensions::new(-1, 6),
            Err(ValidationError::InvalidDimension {
                field: "width",
                value: -1
            })
        );
        assert!(EstateDimensions::new(1, 1).is_ok());
    }

    #[test]
    fn dimensions_contain_corner_cells_only_inside() {
        let dims = EstateDimensions::new(5, 6).unwrap();
        assert!(dims.contains(GridCoord::new(1, 1)));
        assert!(dims.contains(GridCoord::new(6, 5)));
        assert!(!dims.contains(GridCoord::new(7, 5)));
        assert!(!dims.contains(GridCoord::new(6, 6)));
        assert!(!dims.contains(GridCoord::new(0, 1)));
    }

    #[test]
    fn apply_planting_updates_aggregates() {
        let mut estate = empty_estate();

        estate.apply_planting(11, 22);
        assert_eq!(estate.count, 1);
        assert_eq!(estate.max, 11);
        assert_eq!(estate.min, 11);
        assert_eq!(estate.drone_distance, 314);
        assert_eq!(estate.median, Median::Unknown);

        estate.apply_planting(4, -3);
        assert_eq!(estate.count, 2);
        assert_eq!(estate.max, 11);
        assert_eq!(estate.min, 4);
        assert_eq!(estate.drone_distance, 311);

        estate.apply_planting(20, 0);
        assert_eq!(estate.max, 20);
        assert_eq!(estate.min, 4);
    }
}
