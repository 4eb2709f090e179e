//! Validation of caller-supplied point sets.

use crate::error::{ClosestPairError, Result};
use crate::types::{ClosestPair, Point};
use rustc_hash::{FxHashMap, FxHashSet};

/// Validates a single point has finite coordinates.
///
/// # Examples
///
/// ```
/// use gridpair::Point;
/// use gridpair::compute::validation::validate_point;
///
/// assert!(validate_point(&Point::new("ok", 1.0, 2.0)).is_ok());
/// assert!(validate_point(&Point::new("bad", f64::NAN, 2.0)).is_err());
/// ```
pub fn validate_point(point: &Point) -> Result<()> {
    if !point.x().is_finite() {
        return Err(ClosestPairError::InvalidInput(format!(
            "x must be finite, got: {}",
            point.x()
        )));
    }

    if !point.y().is_finite() {
        return Err(ClosestPairError::InvalidInput(format!(
            "y must be finite, got: {}",
            point.y()
        )));
    }

    Ok(())
}

/// Validates a whole input set: at least two points, all coordinates
/// finite and no id used twice.
///
/// # Examples
///
/// ```
/// use gridpair::Point;
/// use gridpair::compute::validation::validate_points;
///
/// let points = vec![Point::new("a", 0.0, 0.0), Point::new("a", 1.0, 1.0)];
/// assert!(validate_points(&points).is_err());
/// ```
pub fn validate_points(points: &[Point]) -> Result<()> {
    if points.len() < 2 {
        return Err(ClosestPairError::InvalidInput(format!(
            "at least 2 points are required, got: {}",
            points.len()
        )));
    }

    let mut seen = FxHashSet::with_capacity_and_hasher(points.len(), Default::default());
    for (idx, point) in points.iter().enumerate() {
        validate_point(point).map_err(|e| {
            ClosestPairError::InvalidInput(format!("Point {:?} at index {}: {}", point.id(), idx, e))
        })?;
        if !seen.insert(point.id()) {
            return Err(ClosestPairError::InvalidInput(format!(
                "duplicate point id {:?} at index {}",
                point.id(),
                idx
            )));
        }
    }

    Ok(())
}

/// Bit pattern of a coordinate with `-0.0` folded onto `0.0`.
#[inline]
fn coordinate_key(point: &Point) -> (u64, u64) {
    let norm = |v: f64| if v == 0.0 { 0.0f64.to_bits() } else { v.to_bits() };
    (norm(point.x()), norm(point.y()))
}

/// First pair of points sharing identical coordinates, if any.
///
/// Runs in expected linear time. When such a pair exists the closest-pair
/// distance is zero and no grid needs to be built.
pub fn find_coincident(points: &[Point]) -> Option<ClosestPair> {
    let mut first_at: FxHashMap<(u64, u64), usize> =
        FxHashMap::with_capacity_and_hasher(points.len(), Default::default());
    for (idx, point) in points.iter().enumerate() {
        if let Some(&prev) = first_at.get(&coordinate_key(point)) {
            return Some(ClosestPair::new(prev, idx, 0.0));
        }
        first_at.insert(coordinate_key(point), idx);
    }
    None
}
