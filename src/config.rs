//! Engine configuration.
//!
//! Every field has a serde default so partial JSON/TOML documents are accepted;
//! unknown fields are rejected.
use crate::error::{ClosestPairError, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// What to do when two input points share identical coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum CoincidentPolicy {
    /// Answer zero immediately with the first coincident pair found.
    #[default]
    ReturnZero,
    /// Fail with `DegenerateInput`.
    Reject,
}

/// Closest-pair engine configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Config {
    /// Amount the bounding box is grown on every side before gridding.
    #[serde(default = "Config::default_boundary_epsilon")]
    pub boundary_epsilon: f64,

    /// Added to the best observed pair distance before the final grid is built.
    #[serde(default = "Config::default_upper_bound_epsilon")]
    pub upper_bound_epsilon: f64,

    /// Maximum number of times the refinement loop may halve the cell side.
    /// Reaching it ends refinement early; the answer stays exact.
    #[serde(default = "Config::default_max_halvings")]
    pub max_halvings: u32,

    /// Grids with more cells than this are stored sparsely.
    #[serde(default = "Config::default_dense_cell_limit")]
    pub dense_cell_limit: usize,

    #[serde(default)]
    pub coincident_policy: CoincidentPolicy,

    /// Run the neighbor scan on the rayon pool. Ignored without the
    /// `parallel` feature.
    #[serde(default)]
    pub parallel_scan: bool,

    /// Seed for the generator the engine creates for itself.
    #[serde(default)]
    pub seed: Option<u64>,
}

impl Config {
    const fn default_boundary_epsilon() -> f64 {
        1e-5
    }

    const fn default_upper_bound_epsilon() -> f64 {
        1e-5
    }

    const fn default_max_halvings() -> u32 {
        64
    }

    const fn default_dense_cell_limit() -> usize {
        1 << 20
    }

    pub fn with_boundary_epsilon(mut self, epsilon: f64) -> Self {
        self.boundary_epsilon = epsilon;
        self
    }

    pub fn with_upper_bound_epsilon(mut self, epsilon: f64) -> Self {
        self.upper_bound_epsilon = epsilon;
        self
    }

    pub fn with_max_halvings(mut self, max_halvings: u32) -> Self {
        self.max_halvings = max_halvings;
        self
    }

    pub fn with_dense_cell_limit(mut self, limit: usize) -> Self {
        self.dense_cell_limit = limit;
        self
    }

    pub fn with_coincident_policy(mut self, policy: CoincidentPolicy) -> Self {
        self.coincident_policy = policy;
        self
    }

    pub fn with_parallel_scan(mut self, enabled: bool) -> Self {
        if enabled && !cfg!(feature = "parallel") {
            log::warn!("parallel_scan requested but the `parallel` feature is disabled");
        }
        self.parallel_scan = enabled;
        self
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    pub fn validate(&self) -> Result<()> {
        for (name, value) in [
            ("boundary_epsilon", self.boundary_epsilon),
            ("upper_bound_epsilon", self.upper_bound_epsilon),
        ] {
            if !value.is_finite() || value <= 0.0 {
                return Err(ClosestPairError::Config(format!(
                    "{} must be finite and positive, got: {}",
                    name, value
                )));
            }
        }

        // Halving a positive f64 more than 1074 times always reaches zero.
        if self.max_halvings == 0 || self.max_halvings > 1074 {
            return Err(ClosestPairError::Config(format!(
                "max_halvings must be in 1..=1074, got: {}",
                self.max_halvings
            )));
        }

        if self.dense_cell_limit == 0 {
            return Err(ClosestPairError::Config(
                "dense_cell_limit must be greater than zero".to_string(),
            ));
        }

        Ok(())
    }

    pub fn from_json(json: &str) -> Result<Self> {
        let config: Config = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    #[cfg(feature = "toml")]
    pub fn from_toml(toml_str: &str) -> Result<Self> {
        let config: Config = toml::from_str(toml_str)?;
        config.validate()?;
        Ok(config)
    }

    /// Load from a `.json` or (with the `toml` feature) `.toml` file.
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let contents = std::fs::read_to_string(path)?;
        match path.extension().and_then(|ext| ext.to_str()) {
            Some("json") => Self::from_json(&contents),
            #[cfg(feature = "toml")]
            Some("toml") => Self::from_toml(&contents),
            other => Err(ClosestPairError::Config(format!(
                "unsupported config file extension: {:?}",
                other
            ))),
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            boundary_epsilon: Self::default_boundary_epsilon(),
            upper_bound_epsilon: Self::default_upper_bound_epsilon(),
            max_halvings: Self::default_max_halvings(),
            dense_cell_limit: Self::default_dense_cell_limit(),
            coincident_policy: CoincidentPolicy::default(),
            parallel_scan: false,
            seed: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_default_config_is_valid() {
        let config = Config::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.boundary_epsilon, 1e-5);
        assert_eq!(config.upper_bound_epsilon, 1e-5);
        assert_eq!(config.max_halvings, 64);
        assert_eq!(config.coincident_policy, CoincidentPolicy::ReturnZero);
        assert!(config.seed.is_none());
    }

    #[test]
    fn test_rejects_bad_values() {
        assert!(
            Config::default()
                .with_boundary_epsilon(0.0)
                .validate()
                .is_err()
        );
        assert!(
            Config::default()
                .with_upper_bound_epsilon(f64::NAN)
                .validate()
                .is_err()
        );
        assert!(Config::default().with_max_halvings(0).validate().is_err());
        assert!(Config::default().with_max_halvings(2000).validate().is_err());
        assert!(Config::default().with_dense_cell_limit(0).validate().is_err());
    }

    #[test]
    fn test_json_partial_document_uses_defaults() {
        let config = Config::from_json(r#"{"max_halvings": 10, "seed": 7}"#).unwrap();
        assert_eq!(config.max_halvings, 10);
        assert_eq!(config.seed, Some(7));
        assert_eq!(config.boundary_epsilon, 1e-5);
    }

    #[test]
    fn test_json_rejects_unknown_fields() {
        assert!(Config::from_json(r#"{"grid_size": 3}"#).is_err());
    }

    #[test]
    fn test_json_validation_applies() {
        let err = Config::from_json(r#"{"max_halvings": 0}"#).unwrap_err();
        assert!(matches!(err, ClosestPairError::Config(_)));
    }

    #[test]
    fn test_json_round_trip_preserves_policy() {
        let config = Config::default()
            .with_coincident_policy(CoincidentPolicy::Reject)
            .with_seed(42);
        let json = config.to_json().unwrap();
        assert!(json.contains("\"reject\""));
        assert_eq!(Config::from_json(&json).unwrap(), config);
    }

    #[test]
    fn test_from_file_json() {
        let mut file = tempfile::Builder::new().suffix(".json").tempfile().unwrap();
        write!(file, r#"{{"dense_cell_limit": 1024}}"#).unwrap();
        let config = Config::from_file(file.path()).unwrap();
        assert_eq!(config.dense_cell_limit, 1024);
    }

    #[test]
    fn test_from_file_unknown_extension() {
        let file = tempfile::Builder::new().suffix(".ini").tempfile().unwrap();
        assert!(matches!(
            Config::from_file(file.path()),
            Err(ClosestPairError::Config(_))
        ));
    }

    #[cfg(feature = "toml")]
    #[test]
    fn test_toml_config() {
        let config = Config::from_toml("max_halvings = 32\ncoincident_policy = \"reject\"\n").unwrap();
        assert_eq!(config.max_halvings, 32);
        assert_eq!(config.coincident_policy, CoincidentPolicy::Reject);
    }
}
