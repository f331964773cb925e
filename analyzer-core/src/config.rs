//! Analyzer Configuration
//!
//! Single source of truth for the model hyperparameters. Defaults reproduce
//! the reference dashboard (k=3, contamination=0.05, seed=42); operators can
//! override them, uploading users cannot.

use serde::{Deserialize, Serialize};

use crate::error::{AnalyzerError, Result};

/// Default number of KMeans clusters
pub const DEFAULT_CLUSTERS: usize = 3;

/// Default expected outlier fraction
pub const DEFAULT_CONTAMINATION: f64 = 0.05;

/// Default random seed (KMeans init + isolation trees)
pub const DEFAULT_SEED: u64 = 42;

/// Default number of isolation trees
pub const DEFAULT_TREES: usize = 100;

/// Default sub-sample size per isolation tree
pub const DEFAULT_MAX_SAMPLES: usize = 256;

/// Default rows shown in table previews
pub const DEFAULT_PREVIEW_ROWS: usize = 5;

/// Analyzer Configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AnalyzerConfig {
    /// Number of KMeans clusters (k)
    pub clusters: usize,

    /// Expected fraction of anomalous rows, in (0.0, 0.5]
    pub contamination: f64,

    /// Seed shared by KMeans initialisation and the isolation forest
    pub seed: u64,

    /// Number of isolation trees in the forest
    pub trees: usize,

    /// Upper bound on rows drawn per isolation tree
    pub max_samples: usize,

    /// KMeans iteration cap per run
    pub max_iterations: u64,

    /// KMeans restarts; the run with the lowest inertia wins
    pub restarts: usize,

    /// KMeans convergence tolerance
    pub tolerance: f64,

    /// Rows shown in the raw and processed previews
    pub preview_rows: usize,

    /// Feed the cluster label into the anomaly model
    pub anomaly_uses_cluster: bool,
}

impl Default for AnalyzerConfig {
    fn default() -> Self {
        Self {
            clusters: DEFAULT_CLUSTERS,
            contamination: DEFAULT_CONTAMINATION,
            seed: DEFAULT_SEED,
            trees: DEFAULT_TREES,
            max_samples: DEFAULT_MAX_SAMPLES,
            max_iterations: 300,
            restarts: 10,
            tolerance: 1e-4,
            preview_rows: DEFAULT_PREVIEW_ROWS,
            anomaly_uses_cluster: true,
        }
    }
}

impl AnalyzerConfig {
    /// Reject values the models cannot work with
    pub fn validate(&self) -> Result<()> {
        if self.clusters == 0 {
            return Err(AnalyzerError::InvalidConfig("clusters must be >= 1".into()));
        }
        if !(self.contamination > 0.0 && self.contamination <= 0.5) {
            return Err(AnalyzerError::InvalidConfig(format!(
                "contamination must be in (0, 0.5], got {}",
                self.contamination
            )));
        }
        if self.trees == 0 {
            return Err(AnalyzerError::InvalidConfig("trees must be >= 1".into()));
        }
        if self.max_samples < 2 {
            return Err(AnalyzerError::InvalidConfig("max_samples must be >= 2".into()));
        }
        if self.max_iterations == 0 || self.restarts == 0 {
            return Err(AnalyzerError::InvalidConfig(
                "max_iterations and restarts must be >= 1".into(),
            ));
        }
        if !(self.tolerance > 0.0) {
            return Err(AnalyzerError::InvalidConfig("tolerance must be > 0".into()));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_match_reference_dashboard() {
        let config = AnalyzerConfig::default();
        assert_eq!(config.clusters, 3);
        assert_eq!(config.contamination, 0.05);
        assert_eq!(config.seed, 42);
        assert!(config.anomaly_uses_cluster);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_reject_bad_contamination() {
        for bad in [0.0, -0.1, 0.51, f64::NAN] {
            let config = AnalyzerConfig { contamination: bad, ..Default::default() };
            assert!(
                matches!(config.validate(), Err(AnalyzerError::InvalidConfig(_))),
                "contamination {} should be rejected",
                bad
            );
        }
    }

    #[test]
    fn test_reject_zero_clusters() {
        let config = AnalyzerConfig { clusters: 0, ..Default::default() };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_partial_json_uses_defaults() {
        let config: AnalyzerConfig = serde_json::from_str(r#"{"clusters": 4}"#).unwrap();
        assert_eq!(config.clusters, 4);
        assert_eq!(config.seed, DEFAULT_SEED);
        assert_eq!(config.trees, DEFAULT_TREES);
    }
}
