//! Error types shared across gpacap crates.

use std::path::PathBuf;

/// Top-level error type for gpacap operations.
#[derive(Debug, thiserror::Error)]
pub enum GpacapError {
    #[error("Platform error: {message}")]
    Platform { message: String },

    #[error("Failed to load module {}: {message}", path.display())]
    ModuleLoad { path: PathBuf, message: String },

    #[error("No valid capture library install location found")]
    InstallNotFound,

    #[error("Capture engine unavailable: {message}")]
    EngineUnavailable { message: String },

    #[error("Failed to launch {}: {message}", path.display())]
    Launch { path: PathBuf, message: String },

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Json(#[from] serde_json::Error),
}

/// Result type alias using GpacapError.
pub type GpacapResult<T> = Result<T, GpacapError>;

impl GpacapError {
    pub fn platform(msg: impl Into<String>) -> Self {
        Self::Platform {
            message: msg.into(),
        }
    }

    pub fn module_load(path: impl Into<PathBuf>, msg: impl Into<String>) -> Self {
        Self::ModuleLoad {
            path: path.into(),
            message: msg.into(),
        }
    }

    pub fn engine_unavailable(msg: impl Into<String>) -> Self {
        Self::EngineUnavailable {
            message: msg.into(),
        }
    }

    pub fn launch(path: impl Into<PathBuf>, msg: impl Into<String>) -> Self {
        Self::Launch {
            path: path.into(),
            message: msg.into(),
        }
    }
}
