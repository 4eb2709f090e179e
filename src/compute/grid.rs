//! Uniform square-cell partition of a point set.
//!
//! A [`GridIndex`] covers the bounding box of the input, grown by a small
//! margin on every side, with `num_x × num_y` square cells of side `theta`.
//! Cell membership uses closed intervals, so a point lying exactly on a
//! shared edge or corner is stored in every cell that touches it. Points are
//! never dropped.
//!
//! Cells are held in a flat vector indexed by `i * num_y + j` while the
//! grid is small enough; larger grids keep only occupied cells in a hash map.

use crate::error::{ClosestPairError, Result};
use crate::types::Point;
use geo::{BoundingRect, MultiPoint, Rect};
use rustc_hash::FxHashMap;
use smallvec::SmallVec;

/// Largest per-axis cell count for which `floor` of an f64 quotient is still exact.
const MAX_CELLS_PER_AXIS: f64 = (1u64 << 53) as f64;

/// Per-axis cell count targeted by [`min_cell_side`], one bit below the
/// exact limit so rounding in `extent / side` cannot cross it.
const SAFE_CELLS_PER_AXIS: f64 = (1u64 << 52) as f64;

/// Dense storage is used only while the grid has at most this many cells per
/// input point (or [`MIN_DENSE_CELLS`], whichever is larger).
const DENSE_CELLS_PER_POINT: usize = 4;
const MIN_DENSE_CELLS: usize = 4096;

/// Integer cell coordinate `(i, j)`, `i` along x and `j` along y.
pub type CellCoord = (u64, u64);

/// Up to nine cells: a cell and its in-bounds neighbors.
pub type Neighborhood = SmallVec<[CellCoord; 9]>;

#[derive(Debug, Clone)]
enum CellStorage {
    Dense(Vec<Vec<usize>>),
    Sparse(FxHashMap<CellCoord, Vec<usize>>),
}

/// Points bucketed into square cells, stored as indices into the input slice.
#[derive(Debug, Clone)]
pub struct GridIndex {
    min_x: f64,
    min_y: f64,
    theta: f64,
    num_x: u64,
    num_y: u64,
    cells: CellStorage,
}

impl GridIndex {
    /// Partition `points` into cells of side `theta`.
    ///
    /// The bounding box is grown by `margin` on all sides before the shape is
    /// derived. Grids with more cells than `dense_cell_limit`, or than a small
    /// multiple of `points.len()`, are stored sparsely.
    pub fn build(
        points: &[Point],
        theta: f64,
        margin: f64,
        dense_cell_limit: usize,
    ) -> Result<Self> {
        if !theta.is_finite() || theta <= 0.0 {
            return Err(ClosestPairError::DegenerateInput(format!(
                "cell side must be finite and positive, got: {}",
                theta
            )));
        }

        let bounds = bounding_rect(points).ok_or_else(|| {
            ClosestPairError::InvalidInput("cannot grid an empty point set".to_string())
        })?;

        let min_x = bounds.min().x - margin;
        let min_y = bounds.min().y - margin;
        let width = bounds.width() + 2.0 * margin;
        let height = bounds.height() + 2.0 * margin;

        let num_x = axis_cells(width, theta)?;
        let num_y = axis_cells(height, theta)?;

        let dense_limit = points
            .len()
            .saturating_mul(DENSE_CELLS_PER_POINT)
            .max(MIN_DENSE_CELLS)
            .min(dense_cell_limit);
        let dense = num_x
            .checked_mul(num_y)
            .and_then(|total| usize::try_from(total).ok())
            .filter(|&total| total <= dense_limit);

        let cells = match dense {
            Some(total) => CellStorage::Dense(vec![Vec::new(); total]),
            None => {
                if num_x.saturating_mul(num_y) > (dense_cell_limit as u64).saturating_mul(1024) {
                    log::warn!(
                        "grid of {}x{} cells (side {}) is very sparse; storing occupied cells only",
                        num_x,
                        num_y,
                        theta
                    );
                }
                CellStorage::Sparse(FxHashMap::default())
            }
        };

        let mut grid = GridIndex {
            min_x,
            min_y,
            theta,
            num_x,
            num_y,
            cells,
        };

        for (idx, point) in points.iter().enumerate() {
            let xs = grid.axis_slots(point.x() - grid.min_x, grid.num_x);
            let ys = grid.axis_slots(point.y() - grid.min_y, grid.num_y);
            for &i in &xs {
                for &j in &ys {
                    grid.push((i, j), idx);
                }
            }
        }

        log::trace!(
            "built {}x{} grid with side {} ({} occupied cells)",
            grid.num_x,
            grid.num_y,
            grid.theta,
            grid.occupied_cells()
        );

        Ok(grid)
    }

    /// Cell indices along one axis whose closed interval contains `offset`.
    ///
    /// Usually one slot; two when `offset` lies exactly on an interior edge.
    fn axis_slots(&self, offset: f64, count: u64) -> SmallVec<[u64; 2]> {
        let scaled = (offset / self.theta).max(0.0);
        let floor = scaled.floor();
        let mut slots = SmallVec::new();
        // A point on the far edge of the last cell belongs to that cell only.
        let slot = (floor as u64).min(count - 1);
        slots.push(slot);
        if scaled == floor && slot == floor as u64 && slot > 0 {
            slots.push(slot - 1);
        }
        slots
    }

    fn push(&mut self, cell: CellCoord, idx: usize) {
        let num_y = self.num_y;
        match &mut self.cells {
            CellStorage::Dense(cells) => cells[(cell.0 * num_y + cell.1) as usize].push(idx),
            CellStorage::Sparse(cells) => cells.entry(cell).or_default().push(idx),
        }
    }

    /// Indices of the points in cell `(i, j)`. Empty for out-of-range cells.
    pub fn cell(&self, (i, j): CellCoord) -> &[usize] {
        if i >= self.num_x || j >= self.num_y {
            return &[];
        }
        match &self.cells {
            CellStorage::Dense(cells) => &cells[(i * self.num_y + j) as usize],
            CellStorage::Sparse(cells) => cells.get(&(i, j)).map(Vec::as_slice).unwrap_or(&[]),
        }
    }

    /// Iterate over every non-empty cell with its contents.
    pub fn occupied(&self) -> Box<dyn Iterator<Item = (CellCoord, &[usize])> + Send + '_> {
        let num_y = self.num_y;
        match &self.cells {
            CellStorage::Dense(cells) => Box::new(
                cells
                    .iter()
                    .enumerate()
                    .filter(|(_, members)| !members.is_empty())
                    .map(move |(linear, members)| {
                        let linear = linear as u64;
                        ((linear / num_y, linear % num_y), members.as_slice())
                    }),
            ),
            CellStorage::Sparse(cells) => Box::new(
                cells
                    .iter()
                    .filter(|(_, members)| !members.is_empty())
                    .map(|(&coord, members)| (coord, members.as_slice())),
            ),
        }
    }

    pub fn occupied_cells(&self) -> usize {
        self.occupied().count()
    }

    /// The most populated cell. Ties resolve to whichever is visited first.
    pub fn max_occupancy(&self) -> Option<(CellCoord, &[usize])> {
        let mut best: Option<(CellCoord, &[usize])> = None;
        for (coord, members) in self.occupied() {
            if best.is_none_or(|(_, current)| members.len() > current.len()) {
                best = Some((coord, members));
            }
        }
        best
    }

    /// Cell `(i, j)` followed by each of its eight neighbors that lies inside
    /// the grid. Every offset is checked on its own.
    pub fn neighborhood(&self, (i, j): CellCoord) -> Neighborhood {
        let mut cells = Neighborhood::new();
        cells.push((i, j));
        for di in -1i64..=1 {
            for dj in -1i64..=1 {
                if di == 0 && dj == 0 {
                    continue;
                }
                let (Some(ni), Some(nj)) = (i.checked_add_signed(di), j.checked_add_signed(dj))
                else {
                    continue;
                };
                if ni < self.num_x && nj < self.num_y {
                    cells.push((ni, nj));
                }
            }
        }
        cells
    }

    /// Grid shape as `(num_x, num_y)`.
    pub fn shape(&self) -> (u64, u64) {
        (self.num_x, self.num_y)
    }

    pub fn cell_side(&self) -> f64 {
        self.theta
    }

    /// Lower-left corner of the whole grid.
    pub fn origin(&self) -> (f64, f64) {
        (self.min_x, self.min_y)
    }

    /// Lower-left corner of cell `(i, j)`.
    pub fn cell_origin(&self, (i, j): CellCoord) -> (f64, f64) {
        (
            self.min_x + i as f64 * self.theta,
            self.min_y + j as f64 * self.theta,
        )
    }

    pub fn is_sparse(&self) -> bool {
        matches!(self.cells, CellStorage::Sparse(_))
    }
}

fn bounding_rect(points: &[Point]) -> Option<Rect> {
    let multi_point: MultiPoint = points.iter().map(|p| *p.inner()).collect();
    multi_point.bounding_rect()
}

/// Smallest cell side [`GridIndex::build`] accepts for `points` grown by
/// `margin`. `None` for an empty slice.
pub fn min_cell_side(points: &[Point], margin: f64) -> Option<f64> {
    let bounds = bounding_rect(points)?;
    let extent = bounds.width().max(bounds.height()) + 2.0 * margin;
    Some(extent / SAFE_CELLS_PER_AXIS)
}

fn axis_cells(extent: f64, theta: f64) -> Result<u64> {
    let cells = (extent / theta).ceil().max(1.0);
    if !cells.is_finite() || cells > MAX_CELLS_PER_AXIS {
        return Err(ClosestPairError::DegenerateInput(format!(
            "cell side {} is too small to grid an extent of {}",
            theta, extent
        )));
    }
    Ok(cells as u64)
}
