//! HTTP handlers

pub mod health;
pub mod analyze;
pub mod dashboard;

use axum::body::Bytes;
use honeypot_analyzer_core::{analyze, Dashboard};

use crate::{AppState, AppError, AppResult};

/// Run the pipeline for one upload on a blocking worker
///
/// Every call is independent: the only shared input is the read-only config.
pub async fn run_analysis(state: &AppState, bytes: Bytes) -> AppResult<Dashboard> {
    if bytes.iter().all(|b| b.is_ascii_whitespace()) {
        return Err(AppError::UploadMissing);
    }

    let config = state.config.analyzer.clone();
    let size = bytes.len();

    let analysis = tokio::task::spawn_blocking(move || analyze(&bytes, &config)).await?;

    match analysis {
        Ok(analysis) => {
            tracing::info!(
                run_id = %analysis.run_id,
                rows = analysis.n_rows(),
                anomalies = analysis.anomalies.anomaly_count(),
                "Analysis completed ({} bytes)",
                size
            );
            Ok(Dashboard::from_analysis(&analysis))
        }
        Err(e) => {
            tracing::warn!("Analysis rejected: {}", e);
            Err(e.into())
        }
    }
}
