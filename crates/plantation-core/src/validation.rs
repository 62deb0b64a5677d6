//! Placement checks run before a tree is written.
//!
//! The checks are ordered: coordinate sign, height range, estate bounds,
//! occupancy. The first failure wins. The first two need nothing but the
//! request, which lets callers reject malformed input before loading the
//! estate.

use crate::error::ValidationError;
use crate::models::{EstateDimensions, GridCoord};
use crate::rules::PlantingRules;

/// Checks that need only the request: positive coordinates and height range.
pub fn validate_request(
    x: i64,
    y: i64,
    height: i64,
    rules: &PlantingRules,
) -> Result<GridCoord, ValidationError> {
    if x <= 0 {
        return Err(ValidationError::InvalidCoordinate { axis: "x", value: x });
    }
    if y <= 0 {
        return Err(ValidationError::InvalidCoordinate { axis: "y", value: y });
    }
    if !rules.height_in_range(height) {
        return Err(ValidationError::InvalidHeight {
            height,
            min: rules.min_height,
            max: rules.max_height,
        });
    }
    Ok(GridCoord::new(x, y))
}

pub fn validate_bounds(coord: GridCoord, dims: EstateDimensions) -> Result<(), ValidationError> {
    if coord.x > dims.length || coord.y > dims.width {
        return Err(ValidationError::OutOfBounds {
            x: coord.x,
            y: coord.y,
        });
    }
    Ok(())
}

/// `occupied` is the number of trees already recorded at `coord`.
pub fn validate_vacancy(coord: GridCoord, occupied: i64) -> Result<(), ValidationError> {
    if occupied > 0 {
        return Err(ValidationError::AlreadyOccupied {
            x: coord.x,
            y: coord.y,
        });
    }
    Ok(())
}

/// Run all four placement checks in order.
pub fn validate_placement(
    x: i64,
    y: i64,
    height: i64,
    dims: EstateDimensions,
    occupied: i64,
    rules: &PlantingRules,
) -> Result<GridCoord, ValidationError> {
    let coord = validate_request(x, y, height, rules)?;
    validate_bounds(coord, dims)?;
    validate_vacancy(coord, occupied)?;
    Ok(coord)
}
