use crate::{
    application::get_feed::dto::FeedQuery,
    presentation::{
        html,
        http::{errors::AppError, state::AppState},
    },
};
use axum::{
    Json,
    extract::{Path, State},
    http::{HeaderMap, StatusCode, header},
    response::{Html, IntoResponse, Response},
};

const JS: &str = "text/javascript; charset=utf-8";

pub async fn feed_page(State(state): State<AppState>) -> Result<Html<String>, AppError> {
    let page = state.feed().execute(FeedQuery::default()).await?;
    Ok(Html(html::feed_page(&state.config.site_name, &page)))
}

pub async fn post_page(
    State(state): State<AppState>,
    headers: HeaderMap,
    Path(id_or_slug): Path<String>,
) -> Result<Response, AppError> {
    let site = &state.config.site_name;
    match state.feed().find_post(&id_or_slug).await? {
        Some(item) => {
            Ok(Html(html::post_page(site, &request_origin(&headers), &item)).into_response())
        }
        None => Ok((StatusCode::NOT_FOUND, Html(html::not_found_page(site))).into_response()),
    }
}

pub async fn admin_page(State(state): State<AppState>) -> Result<Html<String>, AppError> {
    let page = state
        .feed()
        .execute(FeedQuery {
            cursor: None,
            include_unpublished: true,
        })
        .await?;
    Ok(Html(html::admin_page(&state.config.site_name, &page)))
}

pub async fn manifest(State(state): State<AppState>) -> impl IntoResponse {
    (
        [(header::CONTENT_TYPE, "application/manifest+json")],
        Json(html::manifest(&state.config.site_name)),
    )
}

pub async fn asset(Path(name): Path<String>) -> Response {
    let (content_type, body) = match name.as_str() {
        "feed.js" => (JS, html::FEED_JS),
        "admin.js" => (JS, html::ADMIN_JS),
        "app.css" => ("text/css; charset=utf-8", html::APP_CSS),
        "icon.svg" => ("image/svg+xml", html::ICON_SVG),
        _ => return StatusCode::NOT_FOUND.into_response(),
    };
    (
        [
            (header::CONTENT_TYPE, content_type),
            (header::CACHE_CONTROL, "public, max-age=3600"),
        ],
        body,
    )
        .into_response()
}

/// Public origin of the request, honouring reverse-proxy headers.
pub fn request_origin(headers: &HeaderMap) -> String {
    let header_str = |name: &str| {
        headers
            .get(name)
            .and_then(|v| v.to_str().ok())
            .map(|v| v.split(',').next().unwrap_or_default().trim().to_string())
            .filter(|v| !v.is_empty())
    };

    let Some(host) = header_str("x-forwarded-host").or_else(|| header_str("host")) else {
        return String::new();
    };
    let proto = header_str("x-forwarded-proto").unwrap_or_else(|| {
        if host.starts_with("localhost") || host.starts_with("127.0.0.1") {
            "http".to_string()
        } else {
            "https".to_string()
        }
    });
    format!("{}://{}", proto, host)
}
