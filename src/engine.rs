//! Closest-pair engine: sampling, density refinement, then the exact scan.

use crate::compute::grid::GridIndex;
use crate::compute::metric::brute_force_closest_pair;
use crate::compute::refine::refine;
use crate::compute::sampler::sample_estimate;
use crate::compute::scan::{ScanOutcome, scan_neighbors};
use crate::compute::validation::{find_coincident, validate_points};
use crate::config::{CoincidentPolicy, Config};
use crate::error::{ClosestPairError, Result};
use crate::types::{ClosestPair, Point, RunStats, Solution};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

/// Computes the closest pair of a point set in expected linear time.
///
/// The engine holds only its configuration; every call builds its grids
/// from scratch and drops them before returning.
///
/// ```rust
/// use gridpair::{ClosestPairEngine, Config, Point};
///
/// let engine = ClosestPairEngine::new(Config::default().with_seed(7))?;
/// let points = vec![
///     Point::new("A", 0.0, 0.0),
///     Point::new("B", 0.0, 3.0),
///     Point::new("C", 4.0, 0.0),
///     Point::new("D", 0.0, 0.001),
/// ];
/// let pair = engine.closest_pair(&points)?;
/// assert_eq!(pair.ids(&points), Some(("A", "D")));
/// # Ok::<(), gridpair::ClosestPairError>(())
/// ```
#[derive(Debug, Clone, Default)]
pub struct ClosestPairEngine {
    config: Config,
}

impl ClosestPairEngine {
    pub fn new(config: Config) -> Result<Self> {
        config.validate()?;
        Ok(Self { config })
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Generator used by the methods that do not take one: seeded from
    /// `Config::seed` when set, from OS entropy otherwise.
    fn owned_rng(&self) -> StdRng {
        match self.config.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        }
    }

    /// Closest pair plus run statistics, drawing samples from `rng`.
    pub fn solve_with<R: Rng + ?Sized>(&self, points: &[Point], rng: &mut R) -> Result<Solution> {
        validate_points(points)?;

        let mut stats = RunStats {
            point_count: points.len(),
            ..RunStats::default()
        };

        if let Some(pair) = find_coincident(points) {
            return match self.config.coincident_policy {
                CoincidentPolicy::ReturnZero => {
                    log::warn!(
                        "points at index {} and {} share coordinates; distance is zero",
                        pair.first,
                        pair.second
                    );
                    stats.short_circuited = true;
                    Ok(Solution { pair, stats })
                }
                CoincidentPolicy::Reject => Err(ClosestPairError::DegenerateInput(format!(
                    "points at index {} and {} share coordinates",
                    pair.first, pair.second
                ))),
            };
        }

        let Some(estimate) = sample_estimate(points, rng) else {
            return self.brute_force(points, stats);
        };
        stats.sample_size = estimate.sample_size;
        stats.distance_evaluations += estimate.evaluations;

        let refined = refine(points, estimate.pair, &self.config)?;
        stats.halvings = refined.halvings;
        stats.grid_builds = refined.grid_builds;
        stats.distance_evaluations += refined.evaluations;

        let grid = GridIndex::build(
            points,
            refined.cell_side,
            self.config.boundary_epsilon,
            self.config.dense_cell_limit,
        )?;
        stats.grid_builds += 1;
        stats.final_cell_side = grid.cell_side();
        stats.final_shape = grid.shape();

        let outcome = self.scan(points, &grid);
        stats.occupied_cells = outcome.occupied_cells;
        stats.max_occupancy = outcome.max_occupancy;
        stats.distance_evaluations += outcome.evaluations;

        let pair = outcome.pair.unwrap_or(refined.witness);
        log::debug!(
            "closest pair ({}, {}) at distance {} over {} points",
            pair.first,
            pair.second,
            pair.distance,
            points.len()
        );

        Ok(Solution { pair, stats })
    }

    fn brute_force(&self, points: &[Point], mut stats: RunStats) -> Result<Solution> {
        let pair = brute_force_closest_pair(points).ok_or_else(|| {
            ClosestPairError::InvalidInput("at least 2 points are required".to_string())
        })?;
        let n = points.len() as u64;
        stats.distance_evaluations = n * (n - 1) / 2;
        stats.short_circuited = true;
        Ok(Solution { pair, stats })
    }

    #[cfg(feature = "parallel")]
    fn scan(&self, points: &[Point], grid: &GridIndex) -> ScanOutcome {
        if self.config.parallel_scan {
            crate::compute::scan::par_scan_neighbors(points, grid)
        } else {
            scan_neighbors(points, grid)
        }
    }

    #[cfg(not(feature = "parallel"))]
    fn scan(&self, points: &[Point], grid: &GridIndex) -> ScanOutcome {
        scan_neighbors(points, grid)
    }

    /// Closest pair plus run statistics, using the engine's own generator.
    pub fn solve(&self, points: &[Point]) -> Result<Solution> {
        self.solve_with(points, &mut self.owned_rng())
    }

    pub fn closest_pair(&self, points: &[Point]) -> Result<ClosestPair> {
        Ok(self.solve(points)?.pair)
    }

    pub fn closest_pair_with<R: Rng + ?Sized>(
        &self,
        points: &[Point],
        rng: &mut R,
    ) -> Result<ClosestPair> {
        Ok(self.solve_with(points, rng)?.pair)
    }

    /// Minimum pairwise Euclidean distance of `points`.
    ///
    /// Fails with `InvalidInput` for fewer than two points, non-finite
    /// coordinates or duplicate ids.
    pub fn closest_pair_distance(&self, points: &[Point]) -> Result<f64> {
        Ok(self.solve(points)?.pair.distance)
    }

    pub fn closest_pair_distance_with<R: Rng + ?Sized>(
        &self,
        points: &[Point],
        rng: &mut R,
    ) -> Result<f64> {
        Ok(self.solve_with(points, rng)?.pair.distance)
    }
}

/// Minimum pairwise distance with the default configuration.
///
/// ```rust
/// use gridpair::{Point, closest_pair_distance};
///
/// let points = vec![
///     Point::new("a", 0.0, 0.0),
///     Point::new("b", 3.0, 4.0),
///     Point::new("c", 10.0, 10.0),
/// ];
/// assert_eq!(closest_pair_distance(&points)?, 5.0);
/// # Ok::<(), gridpair::ClosestPairError>(())
/// ```
pub fn closest_pair_distance(points: &[Point]) -> Result<f64> {
    ClosestPairEngine::default().closest_pair_distance(points)
}

/// Minimum pairwise distance with the default configuration and a
/// caller-supplied random source.
pub fn closest_pair_distance_with<R: Rng + ?Sized>(points: &[Point], rng: &mut R) -> Result<f64> {
    ClosestPairEngine::default().closest_pair_distance_with(points, rng)
}
