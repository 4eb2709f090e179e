//! Point records and closest-pair results.

use serde::{Deserialize, Serialize};
use std::fmt;

/// A labeled 2D point.
///
/// Wraps a `geo::Point` together with its caller-supplied identifier. Points
/// are immutable once created; the engine only ever borrows them.
///
/// # Examples
///
/// ```
/// use gridpair::Point;
///
/// let station = Point::new("S1", 13.4050, 52.5200);
/// assert_eq!(station.id(), "S1");
/// assert_eq!(station.x(), 13.4050);
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(from = "PointRecord", into = "PointRecord")]
pub struct Point {
    id: String,
    inner: geo::Point<f64>,
}

/// Flat `{id, x, y}` form used for serialization.
#[derive(Serialize, Deserialize)]
struct PointRecord {
    id: String,
    x: f64,
    y: f64,
}

impl From<PointRecord> for Point {
    fn from(record: PointRecord) -> Self {
        Point::new(record.id, record.x, record.y)
    }
}

impl From<Point> for PointRecord {
    fn from(point: Point) -> Self {
        PointRecord {
            x: point.x(),
            y: point.y(),
            id: point.id,
        }
    }
}

impl Point {
    #[inline]
    pub fn new(id: impl Into<String>, x: f64, y: f64) -> Self {
        Self {
            id: id.into(),
            inner: geo::Point::new(x, y),
        }
    }

    #[inline]
    pub fn id(&self) -> &str {
        &self.id
    }

    #[inline]
    pub fn x(&self) -> f64 {
        self.inner.x()
    }

    #[inline]
    pub fn y(&self) -> f64 {
        self.inner.y()
    }

    /// Access the inner `geo::Point`.
    #[inline]
    pub fn inner(&self) -> &geo::Point<f64> {
        &self.inner
    }

    /// Both coordinates are finite.
    #[inline]
    pub fn is_finite(&self) -> bool {
        self.x().is_finite() && self.y().is_finite()
    }
}

impl fmt::Display for Point {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {} {}", self.id, self.x(), self.y())
    }
}

/// The closest pair found, identified by positions in the input slice.
///
/// `first < second` always holds.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ClosestPair {
    pub first: usize,
    pub second: usize,
    pub distance: f64,
}

impl ClosestPair {
    /// Build a pair with its indices in ascending order.
    pub fn new(a: usize, b: usize, distance: f64) -> Self {
        let (first, second) = if a <= b { (a, b) } else { (b, a) };
        Self {
            first,
            second,
            distance,
        }
    }

    /// Resolve the ids of both points against the slice the pair was computed from.
    pub fn ids<'a>(&self, points: &'a [Point]) -> Option<(&'a str, &'a str)> {
        let a = points.get(self.first)?;
        let b = points.get(self.second)?;
        Some((a.id(), b.id()))
    }

    /// Keep whichever of the two pairs is closer. Ties prefer `self`.
    #[inline]
    pub fn closer(self, other: ClosestPair) -> ClosestPair {
        if other.distance < self.distance {
            other
        } else {
            self
        }
    }
}

/// Counters collected during one engine run.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RunStats {
    pub point_count: usize,
    pub sample_size: usize,
    /// Times the refinement loop halved the working side length.
    pub halvings: u32,
    /// Grids built, including the final one.
    pub grid_builds: u32,
    pub final_cell_side: f64,
    pub final_shape: (u64, u64),
    pub occupied_cells: usize,
    /// Largest cell population seen in the final grid.
    pub max_occupancy: usize,
    /// Pairwise distance evaluations across all phases.
    pub distance_evaluations: u64,
    /// True when the answer came from the coincident-point check or brute force.
    pub short_circuited: bool,
}

/// A closest pair together with the statistics of the run that produced it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Solution {
    pub pair: ClosestPair,
    pub stats: RunStats,
}
