use crate::AppState;
use crate::api::error::AppError;
use axum::{
    extract::{Request, State},
    http::{StatusCode, header},
    middleware::Next,
    response::{IntoResponse, Response},
};

/// Gives every 413, including the ones produced by the body limit layer
/// before any handler runs, the JSON error body clients expect.
pub async fn payload_too_large_middleware(
    State(state): State<AppState>,
    req: Request,
    next: Next,
) -> Response {
    let response = next.run(req).await;

    if response.status() != StatusCode::PAYLOAD_TOO_LARGE || is_json(&response) {
        return response;
    }

    tracing::warn!(
        "Rejected request body over {}MB",
        state.config.max_content_length_mb()
    );
    AppError::PayloadTooLarge(state.config.max_content_length_mb()).into_response()
}

fn is_json(response: &Response) -> bool {
    response
        .headers()
        .get(header::CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .is_some_and(|v| v.starts_with("application/json"))
}
