//! Cluster Analyzer - KMeans over the feature table
//!
//! Uses `linfa-clustering` (KMeans++ init, Lloyd iterations, best of
//! `restarts` runs). The RNG is seeded from the config so identical input
//! gives an identical partition.

use std::collections::HashSet;
use std::time::Instant;

use linfa::prelude::*;
use linfa_clustering::KMeans;
use ndarray::Array2;
use rand::SeedableRng;
use rand_xoshiro::Xoshiro256Plus;
use serde::Serialize;

use crate::config::AnalyzerConfig;
use crate::error::{AnalyzerError, Result};

/// Output of one KMeans fit
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ClusterAssignment {
    /// Label per row, in `[0, k)`
    pub labels: Vec<usize>,
    /// Centroid per cluster (feature space)
    pub centroids: Vec<Vec<f64>>,
    /// Number of rows per cluster
    pub sizes: Vec<usize>,
}

impl ClusterAssignment {
    pub fn k(&self) -> usize {
        self.centroids.len()
    }
}

#[derive(Debug, Clone)]
pub struct ClusterAnalyzer {
    clusters: usize,
    seed: u64,
    max_iterations: u64,
    restarts: usize,
    tolerance: f64,
}

impl ClusterAnalyzer {
    pub fn from_config(config: &AnalyzerConfig) -> Self {
        Self {
            clusters: config.clusters,
            seed: config.seed,
            max_iterations: config.max_iterations,
            restarts: config.restarts,
            tolerance: config.tolerance,
        }
    }

    /// Fit KMeans and label every row
    pub fn fit_predict(&self, features: &Array2<f64>) -> Result<ClusterAssignment> {
        let rows = features.nrows();
        if rows < self.clusters {
            return Err(AnalyzerError::InsufficientRows {
                required: self.clusters,
                actual: rows,
            });
        }

        let distinct = count_distinct_rows(features);
        if distinct < self.clusters {
            return Err(AnalyzerError::DegenerateData {
                distinct,
                clusters: self.clusters,
            });
        }

        let start = Instant::now();
        let dataset = DatasetBase::from(features.clone());
        let rng = Xoshiro256Plus::seed_from_u64(self.seed);

        let model = KMeans::params_with_rng(self.clusters, rng)
            .n_runs(self.restarts)
            .max_n_iterations(self.max_iterations)
            .tolerance(self.tolerance)
            .fit(&dataset)
            .map_err(|e| AnalyzerError::ModelFit(format!("KMeans: {}", e)))?;

        let labels: Vec<usize> = model.predict(features).to_vec();

        let mut sizes = vec![0usize; self.clusters];
        for &label in &labels {
            sizes[label] += 1;
        }

        let centroids = model
            .centroids()
            .outer_iter()
            .map(|row| row.to_vec())
            .collect();

        log::info!(
            "KMeans fitted (k={}, {} rows) in {:?}, cluster sizes {:?}",
            self.clusters,
            rows,
            start.elapsed(),
            sizes
        );

        Ok(ClusterAssignment {
            labels,
            centroids,
            sizes,
        })
    }
}

/// Distinct rows by exact bit pattern (-0.0 folded into 0.0)
fn count_distinct_rows(features: &Array2<f64>) -> usize {
    features
        .outer_iter()
        .map(|row| {
            row.iter()
                .map(|v| if *v == 0.0 { 0u64 } else { v.to_bits() })
                .collect::<Vec<u64>>()
        })
        .collect::<HashSet<_>>()
        .len()
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::array;

    fn three_blobs() -> Array2<f64> {
        array![
            [0.0, 0.0],
            [0.1, 0.2],
            [0.2, 0.1],
            [10.0, 10.0],
            [10.1, 10.2],
            [10.2, 9.9],
            [-10.0, 20.0],
            [-10.1, 20.1],
            [-9.9, 19.8],
        ]
    }

    fn same_partition(a: &[usize], b: &[usize]) -> bool {
        (0..a.len()).all(|i| (0..a.len()).all(|j| (a[i] == a[j]) == (b[i] == b[j])))
    }

    #[test]
    fn test_separates_obvious_blobs() {
        let analyzer = ClusterAnalyzer::from_config(&AnalyzerConfig::default());
        let result = analyzer.fit_predict(&three_blobs()).unwrap();

        assert_eq!(result.labels.len(), 9);
        assert!(result.labels.iter().all(|&l| l < 3));
        assert_eq!(result.labels[0], result.labels[1]);
        assert_eq!(result.labels[0], result.labels[2]);
        assert_eq!(result.labels[3], result.labels[5]);
        assert_eq!(result.labels[6], result.labels[8]);
        assert_ne!(result.labels[0], result.labels[3]);
        assert_ne!(result.labels[3], result.labels[6]);
        assert_eq!(result.sizes, vec![3, 3, 3]);
    }

    #[test]
    fn test_deterministic_for_fixed_seed() {
        let analyzer = ClusterAnalyzer::from_config(&AnalyzerConfig::default());
        let first = analyzer.fit_predict(&three_blobs()).unwrap();
        let second = analyzer.fit_predict(&three_blobs()).unwrap();
        assert!(same_partition(&first.labels, &second.labels));
    }

    #[test]
    fn test_too_few_rows() {
        let analyzer = ClusterAnalyzer::from_config(&AnalyzerConfig::default());
        let result = analyzer.fit_predict(&array![[1.0, 2.0], [3.0, 4.0]]);
        assert!(matches!(
            result,
            Err(AnalyzerError::InsufficientRows { required: 3, actual: 2 })
        ));
    }

    #[test]
    fn test_identical_rows_are_degenerate() {
        let analyzer = ClusterAnalyzer::from_config(&AnalyzerConfig::default());
        let result = analyzer.fit_predict(&array![[1.0, 1.0], [1.0, 1.0], [1.0, 1.0], [1.0, 1.0]]);
        assert!(matches!(
            result,
            Err(AnalyzerError::DegenerateData { distinct: 1, clusters: 3 })
        ));
    }
}
