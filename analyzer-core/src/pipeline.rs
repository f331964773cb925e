//! Analysis Pipeline - one upload, one full run
//!
//! ingest → validate schema → transform → KMeans → Isolation Forest.
//! No branching back, no caching between runs.

use std::time::Instant;

use chrono::{DateTime, Utc};
use serde::Serialize;
use uuid::Uuid;

use crate::config::AnalyzerConfig;
use crate::error::{AnalyzerError, Result};
use crate::features::{self, FeatureColumn, FeatureTable};
use crate::ingest::{self, RawTable};
use crate::model::{AnomalyAnalyzer, AnomalyAssignment, ClusterAnalyzer, ClusterAssignment};

/// Column holding the KMeans label
pub const CLUSTER_COLUMN: &str = "cluster";

/// Column holding the anomaly flag
pub const ANOMALY_COLUMN: &str = "anomaly";

/// Everything one run produced
#[derive(Debug, Clone, Serialize)]
pub struct Analysis {
    pub run_id: Uuid,
    pub analyzed_at: DateTime<Utc>,
    pub config: AnalyzerConfig,
    /// Upload as parsed
    pub raw: RawTable,
    /// Encoded features, before any model output is appended
    pub features: FeatureTable,
    pub clusters: ClusterAssignment,
    pub anomalies: AnomalyAssignment,
}

impl Analysis {
    pub fn n_rows(&self) -> usize {
        self.features.n_rows()
    }

    /// Feature table plus the `cluster` column (the anomaly model's input
    /// when `anomaly_uses_cluster` is set)
    pub fn clustered_features(&self) -> FeatureTable {
        with_cluster_column(&self.features, &self.clusters)
    }
}

/// Run the full pipeline over one uploaded CSV
pub fn analyze(bytes: &[u8], config: &AnalyzerConfig) -> Result<Analysis> {
    config.validate()?;

    if bytes.iter().all(|b| b.is_ascii_whitespace()) {
        return Err(AnalyzerError::UploadMissing);
    }

    let run_id = Uuid::new_v4();
    let start = Instant::now();
    log::info!("Analysis {} started ({} bytes)", run_id, bytes.len());

    let raw = ingest::load(bytes)?;
    let features = features::transform(&raw)?;

    let clusters = ClusterAnalyzer::from_config(config).fit_predict(&features.to_matrix())?;

    let anomaly_input = if config.anomaly_uses_cluster {
        with_cluster_column(&features, &clusters)
    } else {
        features.clone()
    };
    let anomalies = AnomalyAnalyzer::from_config(config).fit_predict(&anomaly_input.to_matrix())?;

    log::info!(
        "Analysis {} finished in {:?}: {} rows, {} features, {} anomalies",
        run_id,
        start.elapsed(),
        features.n_rows(),
        features.n_columns(),
        anomalies.anomaly_count()
    );

    Ok(Analysis {
        run_id,
        analyzed_at: Utc::now(),
        config: config.clone(),
        raw,
        features,
        clusters,
        anomalies,
    })
}

fn with_cluster_column(features: &FeatureTable, clusters: &ClusterAssignment) -> FeatureTable {
    features.with_column(FeatureColumn::integer(
        CLUSTER_COLUMN,
        clusters.labels.iter().map(|&l| l as f64).collect(),
    ))
}
