//! Shrinking the cell side until no cell is overcrowded.
//!
//! Starting from the sampled estimate, the working side is halved and the
//! grid rebuilt until the fullest cell holds at most `floor(sqrt(n))`
//! points. That cell is then searched exhaustively, and the best real pair
//! seen so far, inflated by a small epsilon, becomes the side of the grid
//! used for the exact neighbor scan.
//!
//! Halving stops early when `max_halvings` is reached or the next side would
//! be too small to grid the extent. The witness is a real pair either way, so
//! the final scan stays exact; only its cost grows.

use crate::compute::grid::{GridIndex, min_cell_side};
use crate::compute::metric::closest_among;
use crate::config::Config;
use crate::error::{ClosestPairError, Result};
use crate::types::{ClosestPair, Point};

/// Result of the refinement phase.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RefinedBound {
    /// Closest real pair observed so far; never closer than the true answer.
    pub witness: ClosestPair,
    /// Side for the final grid: `witness.distance + upper_bound_epsilon`.
    pub cell_side: f64,
    /// Working side of the last grid built by the loop.
    pub working_side: f64,
    /// Whether the fullest cell ended within `floor(sqrt(n))` points.
    pub density_met: bool,
    pub halvings: u32,
    pub grid_builds: u32,
    pub evaluations: u64,
}

/// Run the halving loop starting from the sampled `estimate`.
///
/// Only fails when no grid at all can be built over `points`.
pub fn refine(points: &[Point], estimate: ClosestPair, config: &Config) -> Result<RefinedBound> {
    let bound = points.len().isqrt();
    let min_side = min_cell_side(points, config.boundary_epsilon).ok_or_else(|| {
        ClosestPairError::InvalidInput("cannot refine an empty point set".to_string())
    })?;
    let mut working = estimate.distance.max(min_side);
    let mut halvings = 0u32;
    let mut grid_builds = 1u32;

    let mut grid = GridIndex::build(
        points,
        working,
        config.boundary_epsilon,
        config.dense_cell_limit,
    )?;

    let density_met = loop {
        let fullest = grid.max_occupancy().map_or(0, |(_, members)| members.len());
        if fullest <= bound {
            break true;
        }
        if halvings >= config.max_halvings {
            log::warn!(
                "a cell still holds {} points (limit {}) after {} halvings; scanning from the best pair found",
                fullest,
                bound,
                halvings
            );
            break false;
        }
        if working / 2.0 < min_side {
            log::warn!(
                "cell side {} cannot be halved over this extent; a cell still holds {} points (limit {})",
                working,
                fullest,
                bound
            );
            break false;
        }

        working /= 2.0;
        halvings += 1;
        log::debug!(
            "cell holds {} points (limit {}), halving side to {}",
            fullest,
            bound,
            working
        );
        grid = GridIndex::build(
            points,
            working,
            config.boundary_epsilon,
            config.dense_cell_limit,
        )?;
        grid_builds += 1;
    };

    let mut evaluations = 0;
    let mut witness = estimate;
    if let Some((_, members)) = grid.max_occupancy()
        && let Some(local) = closest_among(points, members, &mut evaluations)
    {
        witness = witness.closer(local);
    }

    let cell_side = (witness.distance + config.upper_bound_epsilon).max(min_side);
    log::debug!(
        "refinement stopped after {} halvings (density bound met: {}); final cell side {}",
        halvings,
        density_met,
        cell_side
    );

    Ok(RefinedBound {
        witness,
        cell_side,
        working_side: working,
        density_met,
        halvings,
        grid_builds,
        evaluations,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::compute::metric::{brute_force_closest_pair, distance_between};

    fn points(coords: &[(f64, f64)]) -> Vec<Point> {
        coords
            .iter()
            .enumerate()
            .map(|(i, &(x, y))| Point::new(format!("p{}", i), x, y))
            .collect()
    }

    #[test]
    fn test_no_halving_when_sparse_enough() {
        let pts = points(&[(0.0, 0.0), (10.0, 0.0), (0.0, 10.0), (10.0, 10.0)]);
        let estimate = ClosestPair::new(0, 1, 10.0);
        let refined = refine(&pts, estimate, &Config::default()).unwrap();
        assert_eq!(refined.halvings, 0);
        assert_eq!(refined.grid_builds, 1);
        assert!(refined.density_met);
        assert_eq!(refined.witness.distance, 10.0);
        assert_eq!(refined.cell_side, 10.0 + 1e-5);
    }

    #[test]
    fn test_cluster_forces_halving() {
        // Nine points packed near the origin plus far outliers.
        let mut coords: Vec<(f64, f64)> = (0..9)
            .map(|i| ((i % 3) as f64 * 0.01, (i / 3) as f64 * 0.01))
            .collect();
        coords.extend([(100.0, 100.0), (100.0, 0.0), (0.0, 100.0), (50.0, 50.0)]);
        let pts = points(&coords);
        let estimate = ClosestPair::new(9, 12, distance_between(&pts[9], &pts[12]));

        let refined = refine(&pts, estimate, &Config::default()).unwrap();
        assert!(refined.halvings > 0);
        assert_eq!(refined.grid_builds, refined.halvings + 1);

        let truth = brute_force_closest_pair(&pts).unwrap().distance;
        assert!(refined.witness.distance >= truth);
        assert!(refined.cell_side > truth);
        assert!(refined.working_side < estimate.distance);
    }

    #[test]
    fn test_witness_never_below_truth() {
        let pts = points(&[
            (0.0, 0.0),
            (0.0, 1.0),
            (0.0, 2.0),
            (0.0, 3.0),
            (0.0, 4.0),
            (0.0, 4.5),
            (0.0, 6.0),
            (0.0, 7.0),
            (0.0, 8.0),
        ]);
        let truth = brute_force_closest_pair(&pts).unwrap();
        let refined = refine(&pts, ClosestPair::new(0, 8, 8.0), &Config::default()).unwrap();
        assert!(refined.witness.distance >= truth.distance);
        assert!(refined.cell_side >= truth.distance);
    }

    #[test]
    fn test_halving_cap() {
        // Four points 1e-9 apart need the side cut far below its start.
        let pts = points(&[
            (0.0, 0.0),
            (1e-9, 0.0),
            (2e-9, 0.0),
            (3e-9, 0.0),
            (1.0, 1.0),
        ]);
        let truth = brute_force_closest_pair(&pts).unwrap();
        let config = Config::default().with_max_halvings(3);
        let capped = refine(&pts, ClosestPair::new(0, 4, 2f64.sqrt()), &config).unwrap();
        assert_eq!(capped.halvings, 3);
        assert!(!capped.density_met);
        // The cluster still shares one cell, so its brute force finds the pair.
        assert_eq!(capped.witness.distance, truth.distance);
        assert!(capped.cell_side > truth.distance);

        let refined =
            refine(&pts, ClosestPair::new(0, 4, 2f64.sqrt()), &Config::default()).unwrap();
        assert!(refined.halvings > 3);
        assert!(refined.density_met);
    }

    #[test]
    fn test_side_never_drops_below_grid_limit() {
        // Pairs one ulp apart over a wide extent: the sampled estimate is far
        // smaller than any side the extent can be gridded with.
        let mut coords = Vec::new();
        for k in 1..=8 {
            let x = k as f64 * 1.0e6;
            coords.push((x, 0.0));
            coords.push((f64::next_up(x), 0.0));
        }
        let pts = points(&coords);
        let estimate = ClosestPair::new(0, 1, distance_between(&pts[0], &pts[1]));
        let min_side = min_cell_side(&pts, 1e-5).unwrap();
        assert!(estimate.distance < min_side);

        let refined = refine(&pts, estimate, &Config::default()).unwrap();
        assert!(refined.working_side >= min_side);
        assert!(refined.cell_side >= refined.witness.distance + 1e-5);
        assert!(GridIndex::build(&pts, refined.cell_side, 1e-5, 1 << 20).is_ok());
    }
}
