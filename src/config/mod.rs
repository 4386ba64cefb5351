use anyhow::{Result, bail};
use std::env;
use std::path::{Path, PathBuf};

/// Hard cap on request bodies (16 MB)
pub const MAX_CONTENT_LENGTH: usize = 16 * 1024 * 1024;

const DEV_SECRET_KEY: &str = "dev_key_for_testing";

/// Application configuration, built once at startup
#[derive(Debug, Clone)]
pub struct AppConfig {
    /// Key used to sign session cookies
    pub secret_key: String,

    /// Directory uploaded PDFs are written to (default: `<executable dir>/uploads`)
    pub upload_dir: PathBuf,

    /// Directory holding the page templates
    pub template_dir: PathBuf,

    /// Directory served under `/static`
    pub static_dir: PathBuf,

    /// Maximum request body size in bytes (fixed at 16 MB)
    pub max_content_length: usize,

    /// Lifetime of a session cookie in hours (default: 24)
    pub session_ttl_hours: i64,

    /// Seconds between upload cleanup runs (default: 3600)
    pub cleanup_interval_secs: u64,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            secret_key: DEV_SECRET_KEY.to_string(),
            upload_dir: default_upload_dir(),
            template_dir: crate_dir().join("templates"),
            static_dir: crate_dir().join("static"),
            max_content_length: MAX_CONTENT_LENGTH,
            session_ttl_hours: 24,
            cleanup_interval_secs: 3600,
        }
    }
}

impl AppConfig {
    /// Load configuration from environment variables.
    ///
    /// Debug builds fall back to a development signing key when `SECRET_KEY`
    /// is unset; release builds refuse to start without one.
    pub fn from_env() -> Result<Self> {
        let default = Self::default();

        Ok(Self {
            secret_key: secret_key_from_env(cfg!(debug_assertions))?,

            upload_dir: env::var("UPLOAD_FOLDER")
                .map(PathBuf::from)
                .unwrap_or(default.upload_dir),

            template_dir: env::var("TEMPLATE_DIR")
                .map(PathBuf::from)
                .unwrap_or(default.template_dir),

            static_dir: env::var("STATIC_DIR")
                .map(PathBuf::from)
                .unwrap_or(default.static_dir),

            max_content_length: MAX_CONTENT_LENGTH,

            session_ttl_hours: env::var("SESSION_TTL_HOURS")
                .ok()
                .and_then(|v| v.parse().ok())
                .filter(|hours: &i64| *hours > 0)
                .unwrap_or(default.session_ttl_hours),

            cleanup_interval_secs: env::var("CLEANUP_INTERVAL_SECS")
                .ok()
                .and_then(|v| v.parse().ok())
                .filter(|secs: &u64| *secs > 0)
                .unwrap_or(default.cleanup_interval_secs),
        })
    }

    /// Create config for development and tests, rooted at the given upload directory
    pub fn development(upload_dir: impl Into<PathBuf>) -> Self {
        Self {
            upload_dir: upload_dir.into(),
            ..Self::default()
        }
    }

    /// Body limit in whole megabytes, as shown to clients
    pub fn max_content_length_mb(&self) -> usize {
        self.max_content_length / 1024 / 1024
    }
}

fn secret_key_from_env(allow_dev_fallback: bool) -> Result<String> {
    match env::var("SECRET_KEY") {
        Ok(key) if !key.trim().is_empty() => Ok(key),
        _ if allow_dev_fallback => {
            tracing::warn!("⚠️  SECRET_KEY not set, using insecure development key");
            Ok(DEV_SECRET_KEY.to_string())
        }
        _ => bail!("SECRET_KEY must be set"),
    }
}

fn crate_dir() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
}

fn default_upload_dir() -> PathBuf {
    env::current_exe()
        .ok()
        .and_then(|exe| exe.parent().map(Path::to_path_buf))
        .unwrap_or_else(|| PathBuf::from("."))
        .join("uploads")
}
