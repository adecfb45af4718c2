use super::auth::AuthenticatedUser;
use super::error::ApiError;
use super::state::AppState;
use crate::renderer::SectionRenderer;
use axum::{
    extract::State,
    http::{StatusCode, header},
    response::IntoResponse,
    Extension,
};
use log::info;

/// Compiles the caller's report and returns it as a PDF attachment.
pub async fn download_report<R: SectionRenderer + 'static>(
    State(state): State<AppState<R>>,
    Extension(user): Extension<AuthenticatedUser>,
) -> Result<impl IntoResponse, ApiError> {
    info!("[SERVER] Report requested by '{}'", user.0);
    let report = state
        .compiler
        .compile_for_user(state.store.clone(), &user.0)
        .await?;

    let disposition = format!("attachment; filename=\"{}\"", report.filename());
    Ok((
        StatusCode::OK,
        [
            (header::CONTENT_TYPE, "application/pdf".to_string()),
            (header::CONTENT_DISPOSITION, disposition),
        ],
        report.bytes,
    ))
}

pub async fn health_check() -> &'static str {
    "ok"
}
