//! Closest pair of 2D points in expected linear time.
//!
//! A random sample of `floor(sqrt(n))` points gives a first estimate of the
//! closest-pair distance. The estimate is halved until a uniform grid with
//! that cell side holds no more than `floor(sqrt(n))` points in any cell,
//! and a final grid whose side bounds the answer from above is scanned cell
//! by cell against each cell's eight neighbors.
//!
//! ```rust
//! use gridpair::{EngineBuilder, Point};
//!
//! let engine = EngineBuilder::new().seed(42).build()?;
//! let points = vec![
//!     Point::new("A", 0.0, 0.0),
//!     Point::new("B", 0.0, 3.0),
//!     Point::new("C", 4.0, 0.0),
//!     Point::new("D", 0.0, 0.001),
//! ];
//! let solution = engine.solve(&points)?;
//! assert_eq!(solution.pair.ids(&points), Some(("A", "D")));
//! assert!((solution.pair.distance - 0.001).abs() < 1e-12);
//! # Ok::<(), gridpair::ClosestPairError>(())
//! ```

pub mod builder;
pub mod compute;
pub mod config;
pub mod engine;
pub mod error;
pub mod types;

pub use builder::EngineBuilder;
pub use config::{CoincidentPolicy, Config};
pub use engine::{ClosestPairEngine, closest_pair_distance, closest_pair_distance_with};
pub use error::{ClosestPairError, Result};
pub use types::{ClosestPair, Point, RunStats, Solution};

pub use compute::metric::{brute_force_closest_pair, distance_between};

pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Common imports
pub mod prelude {

    pub use crate::{ClosestPairEngine, ClosestPairError, EngineBuilder, Result};

    pub use crate::{ClosestPair, Point, Solution};

    pub use crate::{CoincidentPolicy, Config};

    pub use crate::{brute_force_closest_pair, closest_pair_distance};
}
