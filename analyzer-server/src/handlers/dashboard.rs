//! HTML dashboard handlers

use axum::{
    extract::{Multipart, State},
    http::StatusCode,
    response::Html,
};
use axum::body::Bytes;

use crate::views::{self, Notice};
use crate::{AppState, AppError};

/// Multipart field carrying the CSV
const UPLOAD_FIELD: &str = "file";

/// Upload form with the "no file yet" prompt
pub async fn index() -> Html<String> {
    Html(views::page(None, Some(Notice::info(honeypot_analyzer_core::report::UPLOAD_PROMPT))))
}

/// Analyze an uploaded file and render the full dashboard
pub async fn upload(
    State(state): State<AppState>,
    multipart: Multipart,
) -> (StatusCode, Html<String>) {
    let result = match read_upload(multipart).await {
        Ok(bytes) => super::run_analysis(&state, bytes).await,
        Err(e) => Err(e),
    };

    match result {
        Ok(dashboard) => (StatusCode::OK, Html(views::page(Some(&dashboard), None))),
        Err(AppError::UploadMissing) => (
            StatusCode::BAD_REQUEST,
            Html(views::page(None, Some(Notice::info(AppError::UploadMissing.message())))),
        ),
        Err(e) => {
            let status = e.status();
            if let AppError::InternalError(msg) = &e {
                tracing::error!("Internal error: {}", msg);
            }
            (status, Html(views::page(None, Some(Notice::error(e.message())))))
        }
    }
}

/// Bytes of the `file` field (empty when the form had no file)
async fn read_upload(mut multipart: Multipart) -> Result<Bytes, AppError> {
    while let Some(field) = multipart.next_field().await? {
        if field.name() == Some(UPLOAD_FIELD) {
            return Ok(field.bytes().await?);
        }
    }
    Ok(Bytes::new())
}
