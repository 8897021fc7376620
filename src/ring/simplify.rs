//! Ring simplification using the Ramer-Douglas-Peucker algorithm.
//!
//! Deviation is measured against the infinite line through a run's
//! endpoints, not the segment, so this is not `geo::Simplify`. Runs are
//! processed from an explicit stack, which keeps very long boundaries from
//! exhausting the call stack.

use tracing::debug;

use crate::error::{Result, ZoneError};
use crate::models::PlanarPoint;

/// Simplify a boundary ring and close it.
///
/// A closed input has its closing point(s) set aside before simplification,
/// so simplifying an already simplified ring returns it unchanged. The
/// result always ends where it starts.
///
/// Fails with [`ZoneError::InvalidEpsilon`] unless `epsilon` is a finite
/// positive number.
pub fn simplify(points: &[PlanarPoint], epsilon: f64) -> Result<Vec<PlanarPoint>> {
    if !(epsilon.is_finite() && epsilon > 0.0) {
        return Err(ZoneError::InvalidEpsilon(epsilon));
    }

    let Some(first) = points.first() else {
        return Ok(Vec::new());
    };

    let mut open = points;
    while open.len() >= 2 && open.last() == Some(first) {
        open = &open[..open.len() - 1];
    }

    let mut simplified = ramer_douglas_peucker(open, epsilon);
    if simplified.first() != simplified.last() {
        simplified.push(*first);
    }

    debug!(
        "Simplified ring from {} to {} points (epsilon {})",
        points.len(),
        simplified.len(),
        epsilon
    );
    Ok(simplified)
}

/// Keep only the points that deviate more than `epsilon` from the chord of
/// the run they split. Both endpoints are always kept.
pub fn ramer_douglas_peucker(points: &[PlanarPoint], epsilon: f64) -> Vec<PlanarPoint> {
    let n = points.len();
    if n < 3 {
        return points.to_vec();
    }

    let mut kept = vec![false; n];
    kept[0] = true;
    kept[n - 1] = true;

    let mut runs = vec![(0, n - 1)];
    while let Some((first, last)) = runs.pop() {
        if last <= first + 1 {
            continue;
        }

        let mut max_distance = 0.0;
        let mut split = first;
        for i in (first + 1)..last {
            let distance = perpendicular_distance(points[i], points[first], points[last]);
            if distance > max_distance {
                max_distance = distance;
                split = i;
            }
        }

        if max_distance > epsilon {
            kept[split] = true;
            runs.push((split, last));
            runs.push((first, split));
        }
    }

    points
        .iter()
        .zip(&kept)
        .filter(|&(_, keep)| *keep)
        .map(|(&point, _)| point)
        .collect()
}

/// Distance from `point` to the infinite line through `start` and `end`.
///
/// When the two coincide the line is undefined and the distance to `start`
/// is used instead.
fn perpendicular_distance(point: PlanarPoint, start: PlanarPoint, end: PlanarPoint) -> f64 {
    let dx = end.x - start.x;
    let dy = end.y - start.y;
    let length = dx.hypot(dy);

    if length == 0.0 {
        return (point.x - start.x).hypot(point.y - start.y);
    }

    (dy * point.x - dx * point.y + end.x * start.y - end.y * start.x).abs() / length
}
