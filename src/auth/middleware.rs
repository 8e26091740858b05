use axum::{
    extract::{Request, State},
    http::header::AUTHORIZATION,
    middleware::Next,
    response::Response,
};
use tracing::warn;

use super::{
    claims::Principal,
    jwt::{strip_scheme, JwtKeys},
};
use crate::error::AppError;

/// Verifies the `Authorization` header and stores the resulting [`Principal`]
/// in the request extensions. Layered onto protected routes only.
pub async fn authenticate(
    State(keys): State<JwtKeys>,
    mut request: Request,
    next: Next,
) -> Result<Response, AppError> {
    let header = request
        .headers()
        .get(AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .filter(|v| !v.is_empty())
        .ok_or_else(|| {
            warn!(uri = %request.uri(), "missing Authorization header");
            AppError::Unauthorized("Token is missing".into())
        })?;

    let claims = keys.verify(strip_scheme(header)).map_err(|e| {
        warn!(uri = %request.uri(), error = %e, "token rejected");
        AppError::Unauthorized(e.to_string())
    })?;

    request.extensions_mut().insert(Principal::from(claims));
    Ok(next.run(request).await)
}
