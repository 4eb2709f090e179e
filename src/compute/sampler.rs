//! Random-sample estimate of the closest-pair distance.

use crate::compute::metric::closest_among;
use crate::types::{ClosestPair, Point};
use rand::Rng;

/// Size of the random sample drawn from `n` points: `floor(sqrt(n))`.
#[inline]
pub fn sample_size(n: usize) -> usize {
    n.isqrt()
}

/// Outcome of sampling.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SampleEstimate {
    /// Closest pair within the sample. Its distance is an upper bound on the
    /// true answer.
    pub pair: ClosestPair,
    pub sample_size: usize,
    pub evaluations: u64,
}

/// Draw `floor(sqrt(n))` distinct points uniformly at random and return the
/// closest pair among them.
///
/// Returns `None` when the sample would hold fewer than two points
/// (`n < 4`); such inputs are solved by brute force instead.
pub fn sample_estimate<R: Rng + ?Sized>(points: &[Point], rng: &mut R) -> Option<SampleEstimate> {
    let k = sample_size(points.len());
    if k < 2 {
        return None;
    }

    let indices = rand::seq::index::sample(rng, points.len(), k).into_vec();
    let mut evaluations = 0;
    let pair = closest_among(points, &indices, &mut evaluations)?;

    log::debug!(
        "sampled {} of {} points, estimate {}",
        k,
        points.len(),
        pair.distance
    );

    Some(SampleEstimate {
        pair,
        sample_size: k,
        evaluations,
    })
}
