//! Rejection reasons for estate and tree requests.

use thiserror::Error;

/// A request that failed a local check before any storage mutation.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    /// `x` or `y` is zero or negative.
    #[error("{axis} is negative or zero")]
    InvalidCoordinate { axis: &'static str, value: i64 },

    #[error("height must be {min} to {max}")]
    InvalidHeight { height: i64, min: i64, max: i64 },

    #[error("coordinate out of bound")]
    OutOfBounds { x: i64, y: i64 },

    #[error("plot already has tree")]
    AlreadyOccupied { x: i64, y: i64 },

    /// Estate `width` or `length` is zero or negative.
    #[error("{field} is negative or zero")]
    InvalidDimension { field: &'static str, value: i64 },

    /// The estate's drone distance would not fit in an `i64`.
    #[error("estate is too large")]
    DimensionTooLarge { width: i64, length: i64 },
}
