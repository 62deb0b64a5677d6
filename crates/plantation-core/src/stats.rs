//! Median height computation and cache state.

use serde::{Deserialize, Serialize};

/// Cached median of an estate's tree heights.
///
/// `Unknown` is distinct from `Known(0.0)`; planting always resets the
/// cache to `Unknown`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(tag = "state", content = "value", rename_all = "lowercase")]
pub enum Median {
    #[default]
    Unknown,
    Known(f64),
}

impl Median {
    /// Rebuild the cache state from its stored value and flag columns.
    pub fn from_parts(value: f64, known: bool) -> Self {
        if known {
            Self::Known(value)
        } else {
            Self::Unknown
        }
    }

    pub fn value(&self) -> Option<f64> {
        match self {
            Self::Known(value) => Some(*value),
            Self::Unknown => None,
        }
    }

    pub fn is_known(&self) -> bool {
        matches!(self, Self::Known(_))
    }
}

/// Median of `heights`, or `None` when there are none.
///
/// After sorting ascending, an odd count takes index `n / 2`. An even count
/// averages indices `n / 2` and `n / 2 + 1`, the upper index clamped to the
/// last element.
pub fn compute_median(heights: &[i64]) -> Option<f64> {
    if heights.is_empty() {
        return None;
    }

    let mut sorted = heights.to_vec();
    sorted.sort_unstable();

    let n = sorted.len();
    let mid = n / 2;
    if n % 2 != 0 {
        return Some(sorted[mid] as f64);
    }

    let upper = (mid + 1).min(n - 1);
    Some((sorted[mid] + sorted[upper]) as f64 / 2.0)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn odd_count_takes_middle() {
        assert_eq!(compute_median(&[3, 2, 1, 11, 2]), Some(2.0));
        assert_eq!(compute_median(&[7]), Some(7.0));
    }

    #[test]
    fn even_count_averages_upper_pair() {
        // sorted [1, 2, 2, 3, 4, 7, 9, 11] -> (4 + 7) / 2
        assert_eq!(compute_median(&[3, 2, 1, 11, 2, 4, 7, 9]), Some(5.5));
        // sorted [1, 2, 3, 4] -> (3 + 4) / 2
        assert_eq!(compute_median(&[4, 3, 2, 1]), Some(3.5));
    }

    #[test]
    fn two_heights_clamp_to_top() {
        assert_eq!(compute_median(&[5, 9]), Some(9.0));
    }

    #[test]
    fn empty_has_no_median() {
        assert_eq!(compute_median(&[]), None);
    }

    #[test]
    fn input_order_does_not_matter() {
        let a = compute_median(&[9, 1, 30, 4, 4, 12, 2]);
        let b = compute_median(&[1, 2, 4, 4, 9, 12, 30]);
        assert_eq!(a, b);
        assert_eq!(a, Some(4.0));
    }

    #[test]
    fn median_cache_state_round_trips_through_parts() {
        assert_eq!(Median::from_parts(0.0, false), Median::Unknown);
        assert_eq!(Median::from_parts(0.0, true), Median::Known(0.0));
        assert_eq!(Median::Known(2.5).value(), Some(2.5));
        assert!(!Median::Unknown.is_known());
    }

    #[test]
    fn median_serializes_with_explicit_state() {
        assert_eq!(
            serde_json::to_value(Median::Known(2.5)).unwrap(),
            serde_json::json!({"state": "known", "value": 2.5})
        );
        assert_eq!(
            serde_json::to_value(Median::Unknown).unwrap(),
            serde_json::json!({"state": "unknown"})
        );
    }
}
