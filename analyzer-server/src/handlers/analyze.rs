//! JSON analysis API

use axum::{body::Bytes, extract::State, Json};
use honeypot_analyzer_core::Dashboard;

use crate::{AppState, AppResult};

/// Analyze a raw CSV request body
///
/// `POST /api/v1/analyze` with `Content-Type: text/csv`.
pub async fn analyze_csv(
    State(state): State<AppState>,
    body: Bytes,
) -> AppResult<Json<Dashboard>> {
    let dashboard = super::run_analysis(&state, body).await?;
    Ok(Json(dashboard))
}
