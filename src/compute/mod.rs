//! Compute layer for the closest-pair search.
//!
//! Each phase lives in its own module:
//! - [`sampler`]: random-sample estimate of the answer
//! - [`refine`]: halving the cell side until no cell is overcrowded
//! - [`grid`]: the uniform partition both later phases build on
//! - [`scan`]: exact 3x3 neighborhood search
//!
//! [`metric`] and [`validation`] are shared by all of them.

pub mod grid;
pub mod metric;
pub mod refine;
pub mod sampler;
pub mod scan;
pub mod validation;

pub use grid::{CellCoord, GridIndex};
pub use metric::{brute_force_closest_pair, distance_between};
