use std::path::PathBuf;

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};

use crate::{clip::ValidationError, tools::ToolError};

const DOWNLOAD_FAILED: &str = "Video download failed.";
const PROCESSING_FAILED: &str = "Failed to process video. Please try again.";

#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error("download failed: {0}")]
    Download(#[source] ToolError),

    #[error("downloader exited cleanly but {} is missing", .0.display())]
    MissingDownload(PathBuf),

    #[error("trim failed: {0}")]
    Trim(#[source] ToolError),

    #[error(transparent)]
    Unknown(#[from] anyhow::Error),
}

impl AppError {
    pub fn status(&self) -> StatusCode {
        match self {
            Self::Validation(_) => StatusCode::BAD_REQUEST,
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// What the caller gets to see. Server-side causes never leave the process.
    pub fn public_message(&self) -> String {
        match self {
            Self::Validation(err) => err.to_string(),
            Self::MissingDownload(_) => DOWNLOAD_FAILED.to_string(),
            Self::Download(_) | Self::Trim(_) | Self::Unknown(_) => PROCESSING_FAILED.to_string(),
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status();
        if status.is_server_error() {
            tracing::error!(status = %status, error = %self, "clip request failed");
        } else {
            tracing::debug!(error = %self, "rejected clip request");
        }
        let body = serde_json::json!({ "success": false, "error": self.public_message() });
        (status, Json(body)).into_response()
    }
}

pub type AppResult<T> = Result<T, AppError>;
