pub mod api;
pub mod config;
pub mod infrastructure;
pub mod models;
pub mod services;
pub mod utils;

use crate::config::AppConfig;
use crate::services::conversion::DocumentConverter;
use crate::services::pages::PageRenderer;
use crate::services::upload_store::UploadStore;
use axum::{
    Router,
    extract::DefaultBodyLimit,
    middleware::{from_fn, from_fn_with_state},
    routing::{get, post},
};
use std::sync::Arc;
use tower_http::limit::RequestBodyLimitLayer;
use tower_http::services::ServeDir;
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

#[derive(OpenApi)]
#[openapi(
    paths(
        api::handlers::pdf::upload_pdf,
        api::handlers::pdf::convert_pdf,
        api::handlers::pdf::save_pdf,
        api::handlers::pdf::download_pdf,
        api::handlers::health::health_check,
    ),
    components(
        schemas(
            api::handlers::pdf::UploadResponse,
            api::handlers::pdf::ConvertResponse,
            api::handlers::pdf::SaveRequest,
            api::handlers::pdf::SaveResponse,
            api::handlers::pdf::DownloadResponse,
            api::handlers::pdf::ErrorResponse,
            api::handlers::health::HealthResponse,
        )
    ),
    tags(
        (name = "pdf", description = "PDF upload and editor endpoints"),
        (name = "system", description = "Service status")
    )
)]
pub struct ApiDoc;

#[derive(Clone)]
pub struct AppState {
    pub config: Arc<AppConfig>,
    pub uploads: Arc<dyn UploadStore>,
    pub converter: Arc<dyn DocumentConverter>,
    pub pages: Arc<PageRenderer>,
}

impl AppState {
    pub fn new(config: AppConfig, uploads: Arc<dyn UploadStore>) -> Self {
        let pages = Arc::new(PageRenderer::new(&config.template_dir));
        Self {
            config: Arc::new(config),
            uploads,
            converter: services::conversion::create_converter().into(),
            pages,
        }
    }
}

pub fn create_app(state: AppState) -> Router {
    let body_limit = state.config.max_content_length;

    Router::new()
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", ApiDoc::openapi()))
        .route("/", get(api::handlers::pages::home))
        .route("/editor", get(api::handlers::pages::editor))
        .route("/privacy", get(api::handlers::pages::privacy))
        .route("/terms", get(api::handlers::pages::terms))
        .route("/about", get(api::handlers::pages::about))
        .route("/contact", get(api::handlers::pages::contact))
        .route("/upload-pdf", post(api::handlers::pdf::upload_pdf))
        .route("/convert-pdf", post(api::handlers::pdf::convert_pdf))
        .route("/save-pdf", post(api::handlers::pdf::save_pdf))
        .route("/download-pdf", get(api::handlers::pdf::download_pdf))
        .route("/health", get(api::handlers::health::health_check))
        .nest_service("/static", ServeDir::new(&state.config.static_dir))
        .layer(DefaultBodyLimit::max(body_limit))
        .layer(RequestBodyLimitLayer::new(body_limit))
        .layer(from_fn_with_state(
            state.clone(),
            api::middleware::payload_limit::payload_too_large_middleware,
        ))
        .layer(from_fn(api::middleware::metrics::metrics_middleware))
        .layer(from_fn(api::middleware::request_id::request_id_middleware))
        .with_state(state)
}
