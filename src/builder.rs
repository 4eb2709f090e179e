//! Engine builder
//!
//! Collects configuration piecewise, then validates it once in `build`.

use crate::config::{CoincidentPolicy, Config};
use crate::engine::ClosestPairEngine;
use crate::error::Result;
use std::path::Path;

/// Builder for [`ClosestPairEngine`].
#[derive(Debug, Clone, Default)]
pub struct EngineBuilder {
    config: Config,
}

impl EngineBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace the whole configuration.
    pub fn config(mut self, config: Config) -> Self {
        self.config = config;
        self
    }

    /// Load the configuration from a JSON (or, with the `toml` feature, TOML) file.
    pub fn config_file<P: AsRef<Path>>(mut self, path: P) -> Result<Self> {
        self.config = Config::from_file(path)?;
        Ok(self)
    }

    /// Fix the seed so repeated runs draw the same samples.
    pub fn seed(mut self, seed: u64) -> Self {
        self.config = self.config.with_seed(seed);
        self
    }

    pub fn max_halvings(mut self, max_halvings: u32) -> Self {
        self.config = self.config.with_max_halvings(max_halvings);
        self
    }

    pub fn dense_cell_limit(mut self, limit: usize) -> Self {
        self.config = self.config.with_dense_cell_limit(limit);
        self
    }

    pub fn coincident_policy(mut self, policy: CoincidentPolicy) -> Self {
        self.config = self.config.with_coincident_policy(policy);
        self
    }

    pub fn parallel_scan(mut self, enabled: bool) -> Self {
        self.config = self.config.with_parallel_scan(enabled);
        self
    }

    pub fn build(self) -> Result<ClosestPairEngine> {
        ClosestPairEngine::new(self.config)
    }
}
