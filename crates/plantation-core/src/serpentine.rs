//! Serpentine (boustrophedon) visiting order over the estate grid.
//!
//! Rows are flown in increasing `y`. Odd rows run from `x = 1` up to
//! `x = length`, even rows run back down to `x = 1`, and each row hands over
//! to the next one at the same `x`. The order is never materialized; callers
//! only need a cell's position and its two neighbors.

use serde::{Deserialize, Serialize};

use crate::models::GridCoord;

/// The cells visited immediately before and after a given cell.
///
/// Either neighbor may fall outside the estate (row 0 before the first cell,
/// row `width + 1` after the last). Such cells simply never hold a tree.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Neighbors {
    pub prev: GridCoord,
    pub next: GridCoord,
}

/// Derive the serpentine predecessor and successor of `(x, y)`.
///
/// Total for `1 <= x <= length` and `y >= 1`.
pub fn neighbors(x: i64, y: i64, length: i64) -> Neighbors {
    if y % 2 != 0 {
        let prev = if x == 1 {
            GridCoord::new(x, y - 1)
        } else {
            GridCoord::new(x - 1, y)
        };
        let next = if x == length {
            GridCoord::new(x, y + 1)
        } else {
            GridCoord::new(x + 1, y)
        };
        Neighbors { prev, next }
    } else {
        let prev = if x == length {
            GridCoord::new(x, y - 1)
        } else {
            GridCoord::new(x + 1, y)
        };
        let next = if x == 1 {
            GridCoord::new(x, y + 1)
        } else {
            GridCoord::new(x - 1, y)
        };
        Neighbors { prev, next }
    }
}

/// Zero-based position of `(x, y)` in the serpentine order.
pub fn visit_index(x: i64, y: i64, length: i64) -> i64 {
    let offset = if y % 2 != 0 { x - 1 } else { length - x };
    (y - 1) * length + offset
}
