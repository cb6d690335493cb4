//! Bearer token authentication
//!
//! Every `/api/sync` request must carry `Authorization: Bearer <token>`
//! matching the configured shared secret. A missing header is
//! [`AppError::Unauthenticated`]; any other mismatch is [`AppError::Forbidden`].

use axum::{
    extract::{Request, State},
    http::{header, HeaderValue},
    middleware::Next,
    response::Response,
};
use subtle::ConstantTimeEq;

use crate::error::{AppError, Result};
use crate::state::AppState;

/// Check an `Authorization` header value against the expected token.
///
/// The `Bearer ` prefix is optional and surrounding whitespace is ignored.
pub fn verify_token(authorization: Option<&HeaderValue>, expected: &str) -> Result<()> {
    let raw = match authorization {
        Some(value) if !value.is_empty() => value,
        _ => return Err(AppError::Unauthenticated),
    };

    let raw = raw.to_str().map_err(|_| AppError::Forbidden)?;
    let token = raw.strip_prefix("Bearer ").unwrap_or(raw).trim();

    if constant_time_eq_str(token, expected) {
        Ok(())
    } else {
        Err(AppError::Forbidden)
    }
}

fn constant_time_eq_str(a: &str, b: &str) -> bool {
    a.as_bytes().ct_eq(b.as_bytes()).into()
}

/// Middleware rejecting requests without a valid bearer token
pub async fn require_token(
    State(state): State<AppState>,
    request: Request,
    next: Next,
) -> Result<Response> {
    if let Err(e) = verify_token(
        request.headers().get(header::AUTHORIZATION),
        &state.config().auth.token,
    ) {
        tracing::warn!(path = %request.uri().path(), "Rejected sync request: {}", e);
        return Err(e);
    }

    Ok(next.run(request).await)
}
