use super::error::ApiError;
use super::state::AppState;
use crate::renderer::SectionRenderer;
use axum::{
    extract::{Request, State},
    middleware::Next,
    response::Response,
};

/// The caller's user id, taken from the identity header.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthenticatedUser(pub String);

/// Identity middleware. Authentication happens upstream; this only requires
/// the forwarded user id to be present.
pub async fn identity_middleware<R: SectionRenderer + 'static>(
    State(state): State<AppState<R>>,
    mut request: Request,
    next: Next,
) -> Result<Response, ApiError> {
    let user = request
        .headers()
        .get(&state.identity_header)
        .and_then(|v| v.to_str().ok())
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .ok_or(ApiError::Unauthorized)?
        .to_string();

    request.extensions_mut().insert(AuthenticatedUser(user));
    Ok(next.run(request).await)
}
