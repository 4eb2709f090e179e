//! Euclidean distance and the quadratic reference search.

use crate::types::{ClosestPair, Point};
use geo::{Distance, Euclidean};

/// Straight-line distance between two points.
///
/// Symmetric, and zero only when the coordinates are equal. Callers are
/// expected to have rejected non-finite coordinates already.
///
/// # Examples
///
/// ```
/// use gridpair::Point;
/// use gridpair::compute::metric::distance_between;
///
/// let a = Point::new("a", 0.0, 0.0);
/// let b = Point::new("b", 3.0, 4.0);
/// assert_eq!(distance_between(&a, &b), 5.0);
/// ```
#[inline]
pub fn distance_between(p1: &Point, p2: &Point) -> f64 {
    Euclidean.distance(*p1.inner(), *p2.inner())
}

/// Closest pair among the points at `indices`, comparing every pair.
///
/// Returns `None` when fewer than two indices are given. `evaluations` is
/// incremented once per distance computed.
pub fn closest_among(
    points: &[Point],
    indices: &[usize],
    evaluations: &mut u64,
) -> Option<ClosestPair> {
    let mut best: Option<ClosestPair> = None;
    for (pos, &a) in indices.iter().enumerate() {
        for &b in &indices[pos + 1..] {
            if a == b {
                continue;
            }
            *evaluations += 1;
            let candidate = ClosestPair::new(a, b, distance_between(&points[a], &points[b]));
            best = Some(match best {
                Some(current) => current.closer(candidate),
                None => candidate,
            });
        }
    }
    best
}

/// O(n²) closest pair over the whole slice.
///
/// Used directly for inputs too small to sample, and as the reference the
/// grid engine is tested against.
pub fn brute_force_closest_pair(points: &[Point]) -> Option<ClosestPair> {
    let indices: Vec<usize> = (0..points.len()).collect();
    let mut evaluations = 0;
    closest_among(points, &indices, &mut evaluations)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_distance_is_symmetric() {
        let a = Point::new("a", -1.5, 2.0);
        let b = Point::new("b", 4.0, -3.25);
        assert_eq!(distance_between(&a, &b), distance_between(&b, &a));
    }

    #[test]
    fn test_distance_zero_for_equal_coordinates() {
        let a = Point::new("a", 7.0, 7.0);
        let b = Point::new("b", 7.0, 7.0);
        assert_eq!(distance_between(&a, &b), 0.0);
        assert!(distance_between(&a, &Point::new("c", 7.0, 7.000001)) > 0.0);
    }

    #[test]
    fn test_brute_force_two_points() {
        let points = vec![Point::new("a", 0.0, 0.0), Point::new("b", 0.0, 2.0)];
        let pair = brute_force_closest_pair(&points).unwrap();
        assert_eq!((pair.first, pair.second), (0, 1));
        assert_eq!(pair.distance, 2.0);
    }

    #[test]
    fn test_brute_force_three_points() {
        let points = vec![
            Point::new("a", 0.0, 0.0),
            Point::new("b", 10.0, 0.0),
            Point::new("c", 10.0, 1.0),
        ];
        let pair = brute_force_closest_pair(&points).unwrap();
        assert_eq!((pair.first, pair.second), (1, 2));
        assert_eq!(pair.distance, 1.0);
    }

    #[test]
    fn test_brute_force_too_few() {
        assert!(brute_force_closest_pair(&[]).is_none());
        assert!(brute_force_closest_pair(&[Point::new("a", 0.0, 0.0)]).is_none());
    }

    #[test]
    fn test_closest_among_counts_and_skips_repeats() {
        let points = vec![
            Point::new("a", 0.0, 0.0),
            Point::new("b", 5.0, 0.0),
            Point::new("c", 0.0, 1.0),
        ];
        let mut evaluations = 0;
        // The same index twice never pairs with itself.
        let pair = closest_among(&points, &[0, 0, 1, 2], &mut evaluations).unwrap();
        assert_eq!((pair.first, pair.second), (0, 2));
        assert_eq!(evaluations, 5);
    }
}
