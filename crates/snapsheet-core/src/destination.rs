//! Destination selection on gesture release

use crate::snap_points::SnapPointTable;

/// Momentum weight used when no friction is configured explicitly
pub const DEFAULT_DRAG_TOSS: f64 = 0.05;

/// Snap point chosen as the next resting position
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Destination {
    pub index: usize,
    pub offset: f64,
}

/// Where the gesture would end if released with its current momentum
#[inline]
pub fn project_end_offset(rest_offset: f64, translation: f64, velocity: f64, drag_toss: f64) -> f64 {
    rest_offset + translation + drag_toss * velocity
}

/// Pick the snap point closest to `end_offset_y`
///
/// Every entry is shifted by `extra_offset` before measuring. Ties go to the
/// entry seen first, i.e. the most open one.
pub fn select_destination(table: &SnapPointTable, end_offset_y: f64, extra_offset: f64) -> Destination {
    let mut best = Destination {
        index: 0,
        offset: table.top(),
    };
    let mut best_distance = f64::INFINITY;

    for (index, &point) in table.points().iter().enumerate() {
        let distance = (point + extra_offset - end_offset_y).abs();
        if distance < best_distance {
            best_distance = distance;
            best = Destination { index, offset: point };
        }
    }

    best
}
