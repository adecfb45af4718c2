use crate::error::{PipelineError, RenderError};
use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
};
use genreport_source::SourceError;
use log::{error, warn};
use thiserror::Error;

/// Errors returned by the HTTP handlers. Bodies are plain text.
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("Missing or empty identity header")]
    Unauthorized,

    #[error(transparent)]
    Pipeline(#[from] PipelineError),
}

impl ApiError {
    pub fn status(&self) -> StatusCode {
        match self {
            Self::Unauthorized => StatusCode::UNAUTHORIZED,
            Self::Pipeline(PipelineError::UnknownSubject(_)) => StatusCode::NOT_FOUND,
            Self::Pipeline(PipelineError::Store(SourceError::InvalidSubject(_))) => {
                StatusCode::BAD_REQUEST
            }
            Self::Pipeline(PipelineError::Renderer(RenderError::Timeout(_))) => {
                StatusCode::GATEWAY_TIMEOUT
            }
            Self::Pipeline(PipelineError::Renderer(_)) => StatusCode::BAD_GATEWAY,
            Self::Pipeline(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        if status.is_server_error() {
            error!("[SERVER] {}: {}", status, self);
        } else {
            warn!("[SERVER] {}: {}", status, self);
        }
        (status, self.to_string()).into_response()
    }
}
