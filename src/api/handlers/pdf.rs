use crate::AppState;
use crate::api::error::{AppError, Operation};
use crate::api::session::Session;
use crate::utils::validation::{ValidationError, allowed_file, sanitize_filename};
use axum::{
    Json,
    body::Bytes,
    extract::{
        Multipart, State,
        multipart::{MultipartError, MultipartRejection},
    },
    http::{StatusCode, header},
    response::{IntoResponse, Response},
};
use futures::TryStreamExt;
use http_body_util::LengthLimitError;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::error::Error;
use tokio_util::io::StreamReader;
use utoipa::ToSchema;

/// Multipart field carrying the uploaded PDF
pub const FILE_FIELD: &str = "pdf_file";

#[derive(Serialize, Deserialize, ToSchema)]
pub struct UploadResponse {
    pub success: bool,
    pub message: String,
    pub filename: String,
    pub redirect_url: String,
}

#[derive(Serialize, Deserialize, ToSchema)]
pub struct ConvertResponse {
    pub success: bool,
    pub html_content: String,
}

/// Any JSON object with an `html_content` key; its value is not inspected
#[derive(Deserialize, ToSchema)]
pub struct SaveRequest {
    #[schema(value_type = String)]
    pub html_content: Value,
}

#[derive(Serialize, Deserialize, ToSchema)]
pub struct SaveResponse {
    pub success: bool,
    pub message: String,
    pub download_url: String,
}

#[derive(Serialize, Deserialize, ToSchema)]
pub struct DownloadResponse {
    pub message: String,
}

#[derive(Serialize, Deserialize, ToSchema)]
pub struct ErrorResponse {
    pub error: String,
}

#[utoipa::path(
    post,
    path = "/upload-pdf",
    request_body(content = Multipart, description = "PDF upload in the `pdf_file` field"),
    responses(
        (status = 200, description = "PDF stored and recorded in the session", body = UploadResponse),
        (status = 400, description = "Missing, empty or non-PDF file", body = ErrorResponse),
        (status = 413, description = "Request body over the size limit", body = ErrorResponse),
        (status = 500, description = "File could not be stored", body = ErrorResponse)
    ),
    tag = "pdf"
)]
pub async fn upload_pdf(
    State(state): State<AppState>,
    mut session: Session,
    multipart: Result<Multipart, MultipartRejection>,
) -> Result<Response, AppError> {
    let max_mb = state.config.max_content_length_mb();

    let mut multipart = multipart.map_err(|rejection| {
        tracing::error!("No file part in the request: {}", rejection.body_text());
        AppError::from(ValidationError::missing_file_part())
    })?;

    // Parts without a filename are plain form fields, not files
    let field = loop {
        let next = multipart
            .next_field()
            .await
            .map_err(|e| multipart_error(e, max_mb))?;

        match next {
            Some(field) if field.name() == Some(FILE_FIELD) && field.file_name().is_some() => {
                break field;
            }
            Some(_) => continue,
            None => {
                tracing::error!("No file part in the request");
                return Err(ValidationError::missing_file_part().into());
            }
        }
    };

    let original_filename = field.file_name().unwrap_or_default().to_string();

    if original_filename.is_empty() {
        tracing::error!("No file selected");
        return Err(ValidationError::no_file_selected().into());
    }

    if !allowed_file(&original_filename) {
        tracing::error!("File type not allowed: {}", original_filename);
        return Err(ValidationError::disallowed_type().into());
    }

    let filename = sanitize_filename(&original_filename)?;

    let body_with_io_error = field.map_err(std::io::Error::other);
    let reader = StreamReader::new(body_with_io_error);

    let reference = state
        .uploads
        .save(&filename, Box::new(reader))
        .await
        .map_err(|e| {
            if e.chain().any(is_body_limit) {
                AppError::PayloadTooLarge(max_mb)
            } else if e.chain().any(is_multipart_failure) {
                tracing::error!("Upload stream ended early: {:?}", e);
                AppError::from(ValidationError::missing_file_part())
            } else {
                AppError::internal(Operation::Upload)(e)
            }
        })?;

    session.set_upload(reference);
    let cookie = session
        .to_cookie(&state.config)
        .map_err(AppError::internal(Operation::Upload))?;

    tracing::info!("File successfully uploaded: {}", filename);

    Ok((
        [(header::SET_COOKIE, cookie)],
        Json(UploadResponse {
            success: true,
            message: "PDF uploaded successfully".to_string(),
            filename,
            redirect_url: "/editor".to_string(),
        }),
    )
        .into_response())
}

#[utoipa::path(
    post,
    path = "/convert-pdf",
    responses(
        (status = 200, description = "HTML rendition of the uploaded PDF", body = ConvertResponse),
        (status = 400, description = "No PDF uploaded in this session", body = ErrorResponse),
        (status = 500, description = "Conversion failed", body = ErrorResponse)
    ),
    tag = "pdf"
)]
pub async fn convert_pdf(
    State(state): State<AppState>,
    mut session: Session,
) -> Result<Response, AppError> {
    let Some(reference) = session.upload().cloned() else {
        return Err(ValidationError::no_pdf_uploaded().into());
    };

    if !state.uploads.exists(&reference).await {
        tracing::warn!(
            "Uploaded file {} no longer exists, dropping it from the session",
            reference.filename
        );
        session.clear_upload();
        let cookie = session
            .to_cookie(&state.config)
            .map_err(AppError::internal(Operation::Conversion))?;
        return Ok((
            [(header::SET_COOKIE, cookie)],
            AppError::from(ValidationError::no_pdf_uploaded()),
        )
            .into_response());
    }

    let html_content = state
        .converter
        .pdf_to_html(&reference.path)
        .await
        .map_err(AppError::internal(Operation::Conversion))?;

    Ok(Json(ConvertResponse {
        success: true,
        html_content,
    })
    .into_response())
}

#[utoipa::path(
    post,
    path = "/save-pdf",
    request_body = SaveRequest,
    responses(
        (status = 200, description = "Edited document accepted", body = SaveResponse),
        (status = 400, description = "Body has no html_content", body = ErrorResponse),
        (status = 500, description = "Saving failed", body = ErrorResponse)
    ),
    tag = "pdf"
)]
pub async fn save_pdf(
    State(state): State<AppState>,
    body: Bytes,
) -> Result<Json<SaveResponse>, AppError> {
    let request: SaveRequest = serde_json::from_slice(&body)
        .map_err(|_| AppError::from(ValidationError::no_html_content()))?;

    let html = match request.html_content {
        Value::String(html) => html,
        other => other.to_string(),
    };

    state
        .converter
        .html_to_pdf(&html)
        .await
        .map_err(AppError::internal(Operation::Save))?;

    Ok(Json(SaveResponse {
        success: true,
        message: "PDF saved successfully".to_string(),
        download_url: "/download-pdf".to_string(),
    }))
}

#[utoipa::path(
    get,
    path = "/download-pdf",
    responses(
        (status = 200, description = "Placeholder message", body = DownloadResponse)
    ),
    tag = "pdf"
)]
pub async fn download_pdf() -> Json<DownloadResponse> {
    Json(DownloadResponse {
        message: "This endpoint would serve the regenerated PDF".to_string(),
    })
}

fn multipart_error(err: MultipartError, max_mb: usize) -> AppError {
    let mut causes = std::iter::successors(Some(&err as &(dyn Error + 'static)), |&e| e.source());
    if causes.any(is_body_limit) {
        AppError::PayloadTooLarge(max_mb)
    } else {
        tracing::error!("No file part in the request: {}", err.body_text());
        AppError::from(ValidationError::missing_file_part())
    }
}

// Streamed bodies report the limit as a `LengthLimitError` buried under
// several layers of boxed body errors
fn is_body_limit(cause: &(dyn Error + 'static)) -> bool {
    cause.is::<LengthLimitError>()
        || cause
            .downcast_ref::<MultipartError>()
            .is_some_and(|e| e.status() == StatusCode::PAYLOAD_TOO_LARGE)
}

// The stream reader hides the multipart error inside an io::Error
fn is_multipart_failure(cause: &(dyn Error + 'static)) -> bool {
    cause
        .downcast_ref::<std::io::Error>()
        .and_then(|io| io.get_ref())
        .is_some_and(|inner| inner.is::<MultipartError>())
}
