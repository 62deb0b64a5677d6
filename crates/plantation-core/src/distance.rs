//! Incremental drone distance accounting.
//!
//! An estate starts with the cost of flying its empty serpentine path at
//! ground level. Every planted tree then adds a marginal factor derived from
//! its own height and the heights of its serpentine neighbors at the moment
//! it is planted. The running total is never recomputed from the tree set.

use crate::models::EstateDimensions;
use crate::rules::PlantingRules;

/// Drone distance of an estate with no trees.
///
/// `(length - 1) * step * width` for the rows, `(width - 1) * step` for the
/// row changes, plus the survey overhead. `None` when the total does not fit
/// in an `i64`.
pub fn baseline_drone_distance(dims: EstateDimensions, rules: &PlantingRules) -> Option<i64> {
    let rows = (dims.length - 1)
        .checked_mul(rules.step_cost)?
        .checked_mul(dims.width)?;
    let row_changes = (dims.width - 1).checked_mul(rules.step_cost)?;
    rows.checked_add(row_changes)?.checked_add(rules.survey_overhead)
}

/// Marginal distance added when a tree of `height` is planted between
/// neighbors of `prev_height` and `next_height` (0 where no tree stands).
///
/// The subtracted neighbor heights offset ground-level segments already
/// charged by the baseline, so the result can be negative.
pub fn distance_factor(height: i64, prev_height: i64, next_height: i64) -> i64 {
    (height - prev_height).abs() + (height - next_height).abs() - prev_height - next_height
}

#[cfg(test)]
mod tests {
    use super::*;

    fn dims(width: i64, length: i64) -> EstateDimensions {
        EstateDimensions::new(width, length).unwrap()
    }

    #[test]
    fn baseline_for_known_estates() {
        let rules = PlantingRules::default();
        assert_eq!(baseline_drone_distance(dims(5, 6), &rules), Some(292));
        assert_eq!(baseline_drone_distance(dims(6, 6), &rules), Some(352));
        assert_eq!(baseline_drone_distance(dims(1, 1), &rules), Some(2));
        assert_eq!(baseline_drone_distance(dims(1, 10), &rules), Some(92));
        assert_eq!(baseline_drone_distance(dims(10, 1), &rules), Some(92));
    }

    #[test]
    fn baseline_matches_closed_form_over_a_range() {
        let rules = PlantingRules::default();
        for width in 1..=12 {
            for length in 1..=12 {
                let expected = (length - 1) * 10 * width + (width - 1) * 10 + 2;
                assert_eq!(
                    baseline_drone_distance(dims(width, length), &rules),
                    Some(expected)
                );
            }
        }
    }

    #[test]
    fn baseline_overflow_is_reported() {
        let rules = PlantingRules::default();
        assert_eq!(
            baseline_drone_distance(dims(1_000_000_000, 1_000_000_000), &rules),
            None
        );
        assert_eq!(baseline_drone_distance(dims(i64::MAX, 1), &rules), None);
        assert!(baseline_drone_distance(dims(1_000_000, 1_000_000), &rules).is_some());
    }

    #[test]
    fn factor_with_no_neighbors_is_round_trip_climb() {
        assert_eq!(distance_factor(11, 0, 0), 22);
        assert_eq!(distance_factor(1, 0, 0), 2);
    }

    #[test]
    fn factor_between_neighbors() {
        // |10 - 5| + |10 - 15| - 5 - 15
        assert_eq!(distance_factor(10, 5, 15), -10);
        assert_eq!(distance_factor(10, 10, 0), 0);
        assert_eq!(distance_factor(30, 30, 30), -60);
    }
}
