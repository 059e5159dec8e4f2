use crate::{
    application::like_post::dto::{LikeResponse, LikedResponse},
    presentation::http::{
        device::resolve_device, errors::AppError, handlers::posts::parse_post_id,
        state::AppState,
    },
};
use axum::{
    Json,
    extract::{Path, State},
};
use axum_extra::extract::cookie::CookieJar;

pub async fn like_post(
    State(state): State<AppState>,
    jar: CookieJar,
    Path(id): Path<String>,
) -> Result<(CookieJar, Json<LikeResponse>), AppError> {
    let post_id = parse_post_id(&id)?;
    let (jar, device) = resolve_device(jar, state.config.device_cookie_secure);
    let response = state.like_post().like(post_id, &device).await?;
    Ok((jar, Json(response)))
}

pub async fn liked_status(
    State(state): State<AppState>,
    jar: CookieJar,
    Path(id): Path<String>,
) -> Result<(CookieJar, Json<LikedResponse>), AppError> {
    let post_id = parse_post_id(&id)?;
    let (jar, device) = resolve_device(jar, state.config.device_cookie_secure);
    let response = state.like_post().liked(post_id, &device).await?;
    Ok((jar, Json(response)))
}
