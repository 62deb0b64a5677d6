//! Planting limits and drone cost constants.

use serde::{Deserialize, Serialize};

/// Configuration for planting rules and the drone distance model.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PlantingRules {
    /// Lowest plantable tree height
    pub min_height: i64,
    /// Highest plantable tree height
    pub max_height: i64,
    /// Horizontal cost of moving one grid cell
    pub step_cost: i64,
    /// Fixed survey/landing overhead charged once per estate
    pub survey_overhead: i64,
}

impl Default for PlantingRules {
    fn default() -> Self {
        Self {
            min_height: 1,
            max_height: 30,
            step_cost: 10,
            survey_overhead: 2,
        }
    }
}

impl PlantingRules {
    pub fn height_in_range(&self, height: i64) -> bool {
        (self.min_height..=self.max_height).contains(&height)
    }
}
