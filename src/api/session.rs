use crate::AppState;
use crate::config::AppConfig;
use crate::models::{SessionData, UploadReference};
use crate::utils::session::{decode_session, encode_session};
use async_trait::async_trait;
use axum::{
    extract::FromRequestParts,
    http::{HeaderValue, header, request::Parts},
};
use std::convert::Infallible;

pub const SESSION_COOKIE: &str = "session";

/// Per-browser session state carried in a signed cookie.
///
/// A missing, tampered or expired cookie yields an empty session. Handlers
/// that change the session must send [`Session::to_cookie`] back.
#[derive(Debug, Clone, Default)]
pub struct Session {
    data: SessionData,
}

impl Session {
    pub fn upload(&self) -> Option<&UploadReference> {
        self.data.pdf_file.as_ref()
    }

    pub fn set_upload(&mut self, reference: UploadReference) {
        self.data.pdf_file = Some(reference);
    }

    pub fn clear_upload(&mut self) {
        self.data.pdf_file = None;
    }

    /// Builds the `Set-Cookie` value for the current session state
    pub fn to_cookie(&self, config: &AppConfig) -> anyhow::Result<HeaderValue> {
        let token = encode_session(&self.data, &config.secret_key, config.session_ttl_hours)?;
        let cookie = format!(
            "{}={}; Path=/; Max-Age={}; HttpOnly; SameSite=Lax",
            SESSION_COOKIE,
            token,
            config.session_ttl_hours * 3600
        );
        Ok(HeaderValue::from_str(&cookie)?)
    }
}

#[async_trait]
impl FromRequestParts<AppState> for Session {
    type Rejection = Infallible;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let data = find_cookie(parts, SESSION_COOKIE)
            .and_then(
                |token| match decode_session(&token, &state.config.secret_key) {
                    Ok(data) => Some(data),
                    Err(e) => {
                        tracing::debug!("Discarding invalid session cookie: {}", e);
                        None
                    }
                },
            )
            .unwrap_or_default();

        Ok(Session { data })
    }
}

fn find_cookie(parts: &Parts, name: &str) -> Option<String> {
    parts
        .headers
        .get_all(header::COOKIE)
        .iter()
        .filter_map(|value| value.to_str().ok())
        .flat_map(|value| value.split(';'))
        .filter_map(|pair| pair.trim().split_once('='))
        .find(|(key, _)| *key == name)
        .map(|(_, value)| value.to_string())
}
