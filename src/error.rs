//! Error types for closest-pair computation.

use thiserror::Error;

pub type Result<T> = std::result::Result<T, ClosestPairError>;

#[derive(Debug, Error)]
pub enum ClosestPairError {
    /// Input rejected before any work was done: too few points, non-finite
    /// coordinates or duplicate ids.
    #[error("invalid input: {0}")]
    InvalidInput(String),

    /// Coincident points under `CoincidentPolicy::Reject`, or an extent no
    /// grid can cover (e.g. one that overflows to infinity).
    #[error("degenerate input: {0}")]
    DegenerateInput(String),

    #[error("invalid configuration: {0}")]
    Config(String),

    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),

    #[cfg(feature = "toml")]
    #[error("toml error: {0}")]
    Toml(#[from] toml::de::Error),

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}
