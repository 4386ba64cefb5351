use crate::AppState;
use crate::api::error::{AppError, Operation};
use crate::services::pages::Page;
use axum::{extract::State, response::Html};

async fn render(state: &AppState, page: Page) -> Result<Html<String>, AppError> {
    state
        .pages
        .render(page)
        .await
        .map(Html)
        .map_err(AppError::internal(Operation::Render))
}

pub async fn home(State(state): State<AppState>) -> Result<Html<String>, AppError> {
    render(&state, Page::Home).await
}

/// The PDF editor
pub async fn editor(State(state): State<AppState>) -> Result<Html<String>, AppError> {
    render(&state, Page::Editor).await
}

pub async fn privacy(State(state): State<AppState>) -> Result<Html<String>, AppError> {
    render(&state, Page::Privacy).await
}

pub async fn terms(State(state): State<AppState>) -> Result<Html<String>, AppError> {
    render(&state, Page::Terms).await
}

pub async fn about(State(state): State<AppState>) -> Result<Html<String>, AppError> {
    render(&state, Page::About).await
}

pub async fn contact(State(state): State<AppState>) -> Result<Html<String>, AppError> {
    render(&state, Page::Contact).await
}
