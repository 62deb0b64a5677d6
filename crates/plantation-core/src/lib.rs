pub mod distance;
pub mod error;
pub mod models;
pub mod rules;
pub mod serpentine;
pub mod stats;
pub mod validation;

pub use distance::{baseline_drone_distance, distance_factor};
pub use error::ValidationError;
pub use models::{
    CreateEstateRequest, DronePlan, Estate, EstateDimensions, EstateStats, GridCoord,
    PlantTreeRequest, Tree,
};
pub use rules::PlantingRules;
pub use serpentine::{neighbors, visit_index, Neighbors};
pub use stats::{compute_median, Median};
pub use validation::{validate_bounds, validate_placement, validate_request, validate_vacancy};
