//! Error handling

use axum::{
    response::{IntoResponse, Response},
    http::StatusCode,
    Json,
};
use honeypot_analyzer_core::AnalyzerError;
use serde_json::json;

pub type AppResult<T> = Result<T, AppError>;

#[derive(Debug)]
pub enum AppError {
    // Upload errors
    UploadMissing,
    BadRequest(String),

    // Data errors (file parsed but cannot be analyzed)
    Unprocessable(String),

    // Generic errors
    InternalError(String),
}

impl AppError {
    pub fn status(&self) -> StatusCode {
        match self {
            AppError::UploadMissing | AppError::BadRequest(_) => StatusCode::BAD_REQUEST,
            AppError::Unprocessable(_) => StatusCode::UNPROCESSABLE_ENTITY,
            AppError::InternalError(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Message safe to show to the uploading user
    pub fn message(&self) -> &str {
        match self {
            AppError::UploadMissing => honeypot_analyzer_core::report::UPLOAD_PROMPT,
            AppError::BadRequest(msg) | AppError::Unprocessable(msg) => msg,
            AppError::InternalError(_) => "Internal server error",
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        if let AppError::InternalError(msg) = &self {
            tracing::error!("Internal error: {}", msg);
        }

        let status = self.status();
        let body = Json(json!({
            "error": self.message(),
            "status": status.as_u16()
        }));

        (status, body).into_response()
    }
}

impl From<AnalyzerError> for AppError {
    fn from(err: AnalyzerError) -> Self {
        if !err.is_input_error() {
            return AppError::InternalError(err.to_string());
        }
        match err {
            AnalyzerError::UploadMissing => AppError::UploadMissing,
            AnalyzerError::Parse(_) => AppError::BadRequest(err.to_string()),
            _ => AppError::Unprocessable(err.to_string()),
        }
    }
}

impl From<axum::extract::multipart::MultipartError> for AppError {
    fn from(err: axum::extract::multipart::MultipartError) -> Self {
        AppError::BadRequest(format!("Invalid upload: {}", err.body_text()))
    }
}

impl From<tokio::task::JoinError> for AppError {
    fn from(err: tokio::task::JoinError) -> Self {
        AppError::InternalError(format!("Analysis task failed: {}", err))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_analyzer_error_mapping() {
        let missing = AppError::from(AnalyzerError::MissingColumns(vec!["country".into()]));
        assert_eq!(missing.status(), StatusCode::UNPROCESSABLE_ENTITY);
        assert!(missing.message().contains("country"));

        let parse = AppError::from(AnalyzerError::Parse("bad".into()));
        assert_eq!(parse.status(), StatusCode::BAD_REQUEST);

        let upload = AppError::from(AnalyzerError::UploadMissing);
        assert_eq!(upload.status(), StatusCode::BAD_REQUEST);

        let range = AppError::from(AnalyzerError::ValueOutOfRange {
            column: "bytes".into(),
            row: 1,
            value: "1e308".into(),
        });
        assert_eq!(range.status(), StatusCode::UNPROCESSABLE_ENTITY);

        let config = AppError::from(AnalyzerError::InvalidConfig("k".into()));
        assert_eq!(config.status(), StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(config.message(), "Internal server error");
    }
}
