use crate::utils::validation::ValidationError;
use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde_json::json;
use thiserror::Error;

/// The request-level operation a server failure happened in
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operation {
    Upload,
    Conversion,
    Save,
    Render,
}

impl Operation {
    /// Generic message shown to clients when the operation fails server-side
    pub fn failure_message(self) -> &'static str {
        match self {
            Operation::Upload => "An unexpected error occurred during upload",
            Operation::Conversion => "An unexpected error occurred during conversion",
            Operation::Save => "An unexpected error occurred while saving",
            Operation::Render => "An unexpected error occurred while rendering the page",
        }
    }
}

impl std::fmt::Display for Operation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            Operation::Upload => "upload",
            Operation::Conversion => "conversion",
            Operation::Save => "save",
            Operation::Render => "render",
        };
        f.write_str(name)
    }
}

#[derive(Error, Debug)]
pub enum AppError {
    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),

    #[error("Bad Request: {0}")]
    BadRequest(String),

    #[error("Payload Too Large (max {0}MB)")]
    PayloadTooLarge(usize),

    #[error("Internal error during {op}: {source}")]
    Internal {
        op: Operation,
        #[source]
        source: anyhow::Error,
    },
}

impl AppError {
    pub fn internal(op: Operation) -> impl FnOnce(anyhow::Error) -> Self {
        move |source| AppError::Internal { op, source }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, message) = match self {
            AppError::Validation(e) => (StatusCode::BAD_REQUEST, e.message),
            AppError::BadRequest(msg) => (StatusCode::BAD_REQUEST, msg),
            AppError::PayloadTooLarge(max_mb) => (
                StatusCode::PAYLOAD_TOO_LARGE,
                format!("File too large (max {}MB)", max_mb),
            ),
            AppError::Internal { op, source } => {
                tracing::error!("Error during {}: {:?}", op, source);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    op.failure_message().to_string(),
                )
            }
        };

        let body = Json(json!({
            "error": message
        }));

        (status, body).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use http_body_util::BodyExt;
    use serde_json::Value;

    async fn body_json(response: Response) -> Value {
        let bytes = response.into_body().collect().await.unwrap().to_bytes();
        serde_json::from_slice(&bytes).unwrap()
    }

    #[tokio::test]
    async fn test_validation_maps_to_bad_request() {
        let response = AppError::from(ValidationError::no_file_selected()).into_response();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        assert_eq!(body_json(response).await["error"], "No file selected");
    }

    #[tokio::test]
    async fn test_payload_too_large() {
        let response = AppError::PayloadTooLarge(16).into_response();
        assert_eq!(response.status(), StatusCode::PAYLOAD_TOO_LARGE);
        assert_eq!(body_json(response).await["error"], "File too large (max 16MB)");
    }

    #[tokio::test]
    async fn test_internal_errors_hide_details() {
        let err = AppError::internal(Operation::Conversion)(anyhow::anyhow!(
            "secret path /srv/uploads/x.pdf"
        ));
        let response = err.into_response();
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
        let json = body_json(response).await;
        assert_eq!(json["error"], "An unexpected error occurred during conversion");
        assert!(!json.to_string().contains("/srv/uploads"));
    }

    #[tokio::test]
    async fn test_io_failure_uses_operation_message() {
        let err = AppError::internal(Operation::Upload)(anyhow::Error::new(
            std::io::Error::other("disk full"),
        ));
        let response = err.into_response();
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(
            body_json(response).await["error"],
            "An unexpected error occurred during upload"
        );
    }
}
