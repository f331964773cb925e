//! Anomaly Analyzer - Isolation Forest
//!
//! Anomalies are isolated by fewer random splits than normal rows, so their
//! average path length across the forest is shorter.
//!
//! # Scoring
//!
//! `s(x) = 2^(-E[h(x)] / c(ψ))` where `h` is the path length (plus `c(n)` for
//! unresolved leaves) and `ψ` the per-tree sub-sample size. The threshold is
//! the `(1 - contamination)` quantile of the training scores (linear
//! interpolation); rows scoring strictly above it are anomalies.
//!
//! # References
//!
//! Liu, F. T., Ting, K. M., & Zhou, Z. H. (2008). Isolation forest.

use std::time::Instant;

use ndarray::{Array2, ArrayView1};
use rand::rngs::StdRng;
use rand::seq::index;
use rand::{Rng, SeedableRng};
use serde::{Deserialize, Serialize};

use crate::config::AnalyzerConfig;
use crate::error::{AnalyzerError, Result};

const EULER_GAMMA: f64 = 0.577_215_664_901_532_9;

// ============================================================================
// FLAG
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AnomalyFlag {
    Normal,
    Anomaly,
}

impl AnomalyFlag {
    pub fn as_str(&self) -> &'static str {
        match self {
            AnomalyFlag::Normal => "normal",
            AnomalyFlag::Anomaly => "anomaly",
        }
    }

    pub fn is_anomaly(&self) -> bool {
        *self == AnomalyFlag::Anomaly
    }
}

impl std::fmt::Display for AnomalyFlag {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

// ============================================================================
// ISOLATION TREE
// ============================================================================

#[derive(Debug, Clone)]
enum IsolationNode {
    Internal {
        feature: usize,
        threshold: f64,
        left: Box<IsolationNode>,
        right: Box<IsolationNode>,
    },
    Leaf {
        size: usize,
    },
}

impl IsolationNode {
    fn path_length(&self, sample: ArrayView1<f64>, depth: usize) -> f64 {
        match self {
            IsolationNode::Internal { feature, threshold, left, right } => {
                if sample[*feature] <= *threshold {
                    left.path_length(sample, depth + 1)
                } else {
                    right.path_length(sample, depth + 1)
                }
            }
            IsolationNode::Leaf { size } => depth as f64 + average_path_length(*size),
        }
    }
}

/// Expected path length of an unsuccessful BST search over `n` points
fn average_path_length(n: usize) -> f64 {
    match n {
        0 | 1 => 0.0,
        2 => 1.0,
        _ => {
            let n = n as f64;
            2.0 * ((n - 1.0).ln() + EULER_GAMMA) - 2.0 * (n - 1.0) / n
        }
    }
}

#[derive(Debug, Clone)]
struct IsolationTree {
    root: IsolationNode,
}

/// Uniform point in `[min, max)` without forming `max - min`, which can
/// overflow for finite extremes
fn split_threshold(min: f64, max: f64, rng: &mut StdRng) -> f64 {
    let t: f64 = rng.gen();
    let threshold = min * (1.0 - t) + max * t;
    if threshold.is_finite() && threshold >= min && threshold < max {
        threshold
    } else {
        min
    }
}

impl IsolationTree {
    fn build(data: &Array2<f64>, indices: &mut [usize], max_depth: usize, rng: &mut StdRng) -> Self {
        Self {
            root: Self::build_node(data, indices, 0, max_depth, rng),
        }
    }

    fn build_node(
        data: &Array2<f64>,
        indices: &mut [usize],
        depth: usize,
        max_depth: usize,
        rng: &mut StdRng,
    ) -> IsolationNode {
        if depth >= max_depth || indices.len() <= 1 {
            return IsolationNode::Leaf { size: indices.len() };
        }

        // Only features that still vary inside this node can split it
        let splittable: Vec<(usize, f64, f64)> = (0..data.ncols())
            .filter_map(|feature| {
                let (min, max) = indices.iter().fold((f64::MAX, f64::MIN), |(lo, hi), &i| {
                    let v = data[[i, feature]];
                    (lo.min(v), hi.max(v))
                });
                (max > min).then_some((feature, min, max))
            })
            .collect();

        if splittable.is_empty() {
            return IsolationNode::Leaf { size: indices.len() };
        }

        let (feature, min, max) = splittable[rng.gen_range(0..splittable.len())];
        let threshold = split_threshold(min, max, rng);

        // Partition in place: [..split] go left (<= threshold)
        let mut split = 0;
        for i in 0..indices.len() {
            if data[[indices[i], feature]] <= threshold {
                indices.swap(i, split);
                split += 1;
            }
        }

        let (left, right) = indices.split_at_mut(split);
        IsolationNode::Internal {
            feature,
            threshold,
            left: Box::new(Self::build_node(data, left, depth + 1, max_depth, rng)),
            right: Box::new(Self::build_node(data, right, depth + 1, max_depth, rng)),
        }
    }

    fn path_length(&self, sample: ArrayView1<f64>) -> f64 {
        self.root.path_length(sample, 0)
    }
}

// ============================================================================
// FOREST
// ============================================================================

/// Ensemble of isolation trees fitted on one feature matrix
#[derive(Debug, Clone)]
pub struct IsolationForest {
    trees: Vec<IsolationTree>,
    sample_size: usize,
}

impl IsolationForest {
    /// Grow `trees` trees, each on `min(max_samples, n)` rows drawn without
    /// replacement, depth-limited to `ceil(log2(sample_size))`
    pub fn fit(data: &Array2<f64>, trees: usize, max_samples: usize, seed: u64) -> Result<Self> {
        let rows = data.nrows();
        if rows < 2 {
            return Err(AnalyzerError::InsufficientRows { required: 2, actual: rows });
        }

        let sample_size = max_samples.min(rows).max(2);
        let max_depth = (sample_size as f64).log2().ceil() as usize;
        let mut rng = StdRng::seed_from_u64(seed);

        let trees = (0..trees)
            .map(|_| {
                let mut indices = index::sample(&mut rng, rows, sample_size).into_vec();
                IsolationTree::build(data, &mut indices, max_depth, &mut rng)
            })
            .collect();

        Ok(Self { trees, sample_size })
    }

    /// Anomaly score in (0, 1]; higher means easier to isolate
    pub fn score(&self, sample: ArrayView1<f64>) -> f64 {
        let mean_path = self
            .trees
            .iter()
            .map(|tree| tree.path_length(sample))
            .sum::<f64>()
            / self.trees.len() as f64;

        2f64.powf(-mean_path / average_path_length(self.sample_size))
    }

    /// Score every row of a matrix
    pub fn score_all(&self, data: &Array2<f64>) -> Vec<f64> {
        data.outer_iter().map(|row| self.score(row)).collect()
    }

    pub fn n_trees(&self) -> usize {
        self.trees.len()
    }
}

/// Linear-interpolated quantile of unsorted values, `q` in [0, 1]
pub fn quantile(values: &[f64], q: f64) -> f64 {
    if values.is_empty() {
        return f64::NAN;
    }

    let mut sorted = values.to_vec();
    sorted.sort_by(|a, b| a.total_cmp(b));

    let position = q.clamp(0.0, 1.0) * (sorted.len() - 1) as f64;
    let lower = position.floor() as usize;
    let upper = position.ceil() as usize;
    let fraction = position - lower as f64;

    sorted[lower] + (sorted[upper] - sorted[lower]) * fraction
}

// ============================================================================
// ANALYZER
// ============================================================================

/// Output of one anomaly pass
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AnomalyAssignment {
    pub flags: Vec<AnomalyFlag>,
    pub scores: Vec<f64>,
    pub threshold: f64,
}

impl AnomalyAssignment {
    /// Row indices flagged as anomalies
    pub fn anomalous_rows(&self) -> Vec<usize> {
        self.flags
            .iter()
            .enumerate()
            .filter(|(_, f)| f.is_anomaly())
            .map(|(i, _)| i)
            .collect()
    }

    pub fn anomaly_count(&self) -> usize {
        self.flags.iter().filter(|f| f.is_anomaly()).count()
    }
}

#[derive(Debug, Clone)]
pub struct AnomalyAnalyzer {
    trees: usize,
    max_samples: usize,
    contamination: f64,
    seed: u64,
}

impl AnomalyAnalyzer {
    pub fn from_config(config: &AnalyzerConfig) -> Self {
        Self {
            trees: config.trees,
            max_samples: config.max_samples,
            contamination: config.contamination,
            seed: config.seed,
        }
    }

    /// Fit a forest on `data` and flag its most isolated rows
    pub fn fit_predict(&self, data: &Array2<f64>) -> Result<AnomalyAssignment> {
        let start = Instant::now();

        let forest = IsolationForest::fit(data, self.trees, self.max_samples, self.seed)?;
        let scores = forest.score_all(data);
        let threshold = quantile(&scores, 1.0 - self.contamination);

        let flags: Vec<AnomalyFlag> = scores
            .iter()
            .map(|&s| if s > threshold { AnomalyFlag::Anomaly } else { AnomalyFlag::Normal })
            .collect();

        let assignment = AnomalyAssignment { flags, scores, threshold };

        log::info!(
            "Isolation forest fitted ({} trees, {} rows) in {:?}: {} anomalies (threshold {:.4})",
            forest.n_trees(),
            data.nrows(),
            start.elapsed(),
            assignment.anomaly_count(),
            threshold
        );

        Ok(assignment)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::{array, Array2};

    /// Tight grid around the origin plus one far point
    fn grid_with_outlier() -> Array2<f64> {
        let mut rows: Vec<f64> = Vec::new();
        for i in 0..19 {
            rows.push((i % 5) as f64 * 0.1);
            rows.push((i / 5) as f64 * 0.1);
        }
        rows.extend([25.0, -30.0]);
        Array2::from_shape_vec((20, 2), rows).unwrap()
    }

    #[test]
    fn test_average_path_length() {
        assert_eq!(average_path_length(1), 0.0);
        assert_eq!(average_path_length(2), 1.0);
        let c256 = average_path_length(256);
        assert!(c256 > 10.0 && c256 < 11.0, "c(256) = {}", c256);
    }

    #[test]
    fn test_split_threshold_with_extreme_range() {
        let mut rng = StdRng::seed_from_u64(7);
        for _ in 0..1000 {
            let t = split_threshold(-1e308, 1e308, &mut rng);
            assert!(t.is_finite() && (-1e308..1e308).contains(&t));

            let t = split_threshold(f64::MAX / 2.0, f64::MAX, &mut rng);
            assert!(t.is_finite() && t >= f64::MAX / 2.0 && t < f64::MAX);
        }
    }

    #[test]
    fn test_fit_on_extreme_values() {
        let column = [1e308, -1e308, 0.0, 1.0, 2.0, 3.0];
        let data = Array2::from_shape_fn((6, 2), |(i, j)| if j == 0 { column[i] } else { i as f64 });

        let forest = IsolationForest::fit(&data, 50, 256, 42).unwrap();
        let scores = forest.score_all(&data);

        assert_eq!(scores.len(), 6);
        assert!(scores.iter().all(|s| s.is_finite() && *s > 0.0 && *s <= 1.0));
    }

    #[test]
    fn test_outlier_scores_highest() {
        let data = grid_with_outlier();
        let forest = IsolationForest::fit(&data, 100, 256, 42).unwrap();
        let scores = forest.score_all(&data);

        let (argmax, _) = scores
            .iter()
            .enumerate()
            .max_by(|a, b| a.1.total_cmp(b.1))
            .unwrap();
        assert_eq!(argmax, 19);
        assert!(scores[19] > 0.6, "outlier score {}", scores[19]);
    }

    #[test]
    fn test_flags_the_outlier() {
        let analyzer = AnomalyAnalyzer::from_config(&AnalyzerConfig::default());
        let result = analyzer.fit_predict(&grid_with_outlier()).unwrap();

        assert_eq!(result.flags.len(), 20);
        assert_eq!(result.anomalous_rows(), vec![19]);
    }

    #[test]
    fn test_count_follows_contamination() {
        // 100 distinct points on a spiral: 5% contamination → ~5 anomalies
        let data = Array2::from_shape_fn((100, 2), |(i, j)| {
            let t = i as f64 * 0.37;
            if j == 0 { t.cos() * t } else { t.sin() * t }
        });
        let analyzer = AnomalyAnalyzer::from_config(&AnalyzerConfig::default());
        let result = analyzer.fit_predict(&data).unwrap();

        let count = result.anomaly_count();
        assert!((4..=5).contains(&count), "got {} anomalies", count);
    }

    #[test]
    fn test_deterministic_for_fixed_seed() {
        let data = grid_with_outlier();
        let analyzer = AnomalyAnalyzer::from_config(&AnalyzerConfig::default());
        let a = analyzer.fit_predict(&data).unwrap();
        let b = analyzer.fit_predict(&data).unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn test_identical_rows_flag_nothing() {
        let data = array![[1.0, 1.0], [1.0, 1.0], [1.0, 1.0], [1.0, 1.0]];
        let analyzer = AnomalyAnalyzer::from_config(&AnalyzerConfig::default());
        let result = analyzer.fit_predict(&data).unwrap();
        assert_eq!(result.anomaly_count(), 0);
    }

    #[test]
    fn test_single_row_rejected() {
        let data = array![[1.0, 2.0]];
        let result = IsolationForest::fit(&data, 10, 256, 42);
        assert!(matches!(result, Err(AnalyzerError::InsufficientRows { .. })));
    }

    #[test]
    fn test_quantile_interpolates() {
        let values = [4.0, 1.0, 3.0, 2.0, 5.0];
        assert_eq!(quantile(&values, 0.0), 1.0);
        assert_eq!(quantile(&values, 1.0), 5.0);
        assert_eq!(quantile(&values, 0.5), 3.0);
        assert!((quantile(&values, 0.95) - 4.8).abs() < 1e-12);
    }

    #[test]
    fn test_flag_labels() {
        assert!(AnomalyFlag::Anomaly.is_anomaly());
        assert!(!AnomalyFlag::Normal.is_anomaly());
        assert_eq!(AnomalyFlag::Anomaly.to_string(), "anomaly");
    }
}
