use crate::{
    config::Config,
    presentation::http::{errors::AppError, state::AppState},
};
use axum::{
    extract::{Request, State},
    http::{HeaderMap, header},
    middleware::Next,
    response::Response,
};
use base64::{Engine, engine::general_purpose::STANDARD};
use tracing::warn;

/// Gates the admin pages and mutations behind HTTP Basic credentials.
pub async fn require_admin(
    State(state): State<AppState>,
    req: Request,
    next: Next,
) -> Result<Response, AppError> {
    if is_admin(req.headers(), &state.config).await {
        return Ok(next.run(req).await);
    }

    warn!("Rejected admin request to {}", req.uri().path());
    Err(AppError::Unauthorized {
        challenge: wants_challenge(req.headers()),
    })
}

/// True when the request carries the configured admin credentials.
pub async fn is_admin(headers: &HeaderMap, config: &Config) -> bool {
    let Some((user, password)) = basic_credentials(headers) else {
        return false;
    };
    if user != config.admin_user {
        return false;
    }

    // Hash verification runs on the blocking pool.
    let hash = config.admin_password_hash.clone();
    tokio::task::spawn_blocking(move || bcrypt::verify(password, &hash).unwrap_or(false))
        .await
        .unwrap_or(false)
}

/// Decodes `Authorization: Basic base64(user:password)`.
pub fn basic_credentials(headers: &HeaderMap) -> Option<(String, String)> {
    let value = headers.get(header::AUTHORIZATION)?.to_str().ok()?;
    let (scheme, encoded) = value.trim().split_once(' ')?;
    if !scheme.eq_ignore_ascii_case("basic") {
        return None;
    }

    let decoded = STANDARD.decode(encoded.trim()).ok()?;
    let decoded = String::from_utf8(decoded).ok()?;
    let (user, password) = decoded.split_once(':')?;
    Some((user.to_string(), password.to_string()))
}

/// Browsers navigating to a page get a credentials prompt; scripts get JSON.
pub fn wants_challenge(headers: &HeaderMap) -> bool {
    let accepts_html = headers
        .get(header::ACCEPT)
        .and_then(|v| v.to_str().ok())
        .is_some_and(|accept| accept.contains("text/html"));
    let navigating = headers
        .get("sec-fetch-mode")
        .and_then(|v| v.to_str().ok())
        .is_some_and(|mode| mode.eq_ignore_ascii_case("navigate"));
    accepts_html || navigating
}
