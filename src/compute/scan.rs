//! Exact search over a grid whose cell side bounds the answer from above.
//!
//! Two points closer than the cell side always sit in the same cell or in
//! cells touching each other (edge or corner), so comparing each cell with
//! its 3x3 neighborhood finds the closest pair.

use crate::compute::grid::{CellCoord, GridIndex};
use crate::compute::metric::distance_between;
use crate::types::{ClosestPair, Point};

/// Result of a neighbor scan.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct ScanOutcome {
    pub pair: Option<ClosestPair>,
    pub evaluations: u64,
    pub occupied_cells: usize,
    pub max_occupancy: usize,
}

impl ScanOutcome {
    fn merge(self, other: ScanOutcome) -> ScanOutcome {
        let pair = match (self.pair, other.pair) {
            (Some(a), Some(b)) => Some(a.closer(b)),
            (a, b) => a.or(b),
        };
        ScanOutcome {
            pair,
            evaluations: self.evaluations + other.evaluations,
            occupied_cells: self.occupied_cells + other.occupied_cells,
            max_occupancy: self.max_occupancy.max(other.max_occupancy),
        }
    }
}

/// Compare every point of one cell with every point in its neighborhood.
///
/// Each unordered pair is evaluated from the side of its lower index only,
/// and a point duplicated across boundary cells never pairs with itself.
fn scan_cell(
    points: &[Point],
    grid: &GridIndex,
    coord: CellCoord,
    members: &[usize],
) -> ScanOutcome {
    let mut outcome = ScanOutcome {
        occupied_cells: 1,
        max_occupancy: members.len(),
        ..ScanOutcome::default()
    };

    for neighbor in grid.neighborhood(coord) {
        let others = grid.cell(neighbor);
        for &a in members {
            for &b in others {
                if a >= b {
                    continue;
                }
                outcome.evaluations += 1;
                let candidate = ClosestPair::new(a, b, distance_between(&points[a], &points[b]));
                outcome.pair = Some(match outcome.pair {
                    Some(current) => current.closer(candidate),
                    None => candidate,
                });
            }
        }
    }

    outcome
}

/// Closest pair over the whole grid, one cell at a time.
pub fn scan_neighbors(points: &[Point], grid: &GridIndex) -> ScanOutcome {
    grid.occupied()
        .map(|(coord, members)| scan_cell(points, grid, coord, members))
        .fold(ScanOutcome::default(), ScanOutcome::merge)
}

/// Same as [`scan_neighbors`], with cells spread over the rayon pool.
///
/// The grid is only read; per-cell results are combined with a parallel
/// reduction.
#[cfg(feature = "parallel")]
pub fn par_scan_neighbors(points: &[Point], grid: &GridIndex) -> ScanOutcome {
    use rayon::prelude::*;

    let cells: Vec<(CellCoord, &[usize])> = grid.occupied().collect();
    cells
        .into_par_iter()
        .map(|(coord, members)| scan_cell(points, grid, coord, members))
        .reduce(ScanOutcome::default, ScanOutcome::merge)
}
