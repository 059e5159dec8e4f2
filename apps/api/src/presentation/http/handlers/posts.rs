use crate::{
    application::{
        create_post::dto::{CreatePostFromUrlRequest, CreatePostResponse},
        delete_post::dto::SuccessResponse,
        get_feed::dto::{FeedItem, FeedPage, FeedQuery},
    },
    presentation::http::{errors::AppError, middleware::admin::is_admin, state::AppState},
};
use axum::{
    Json,
    extract::{Path, Query, State, rejection::JsonRejection},
    http::HeaderMap,
};
use serde::Deserialize;
use uuid::Uuid;

/// Ids that are not UUIDs cannot name a post.
pub fn parse_post_id(raw: &str) -> Result<Uuid, AppError> {
    Uuid::parse_str(raw.trim()).map_err(|_| AppError::NotFound(format!("Post {}", raw)))
}

#[derive(Debug, Deserialize)]
pub struct FeedParams {
    pub cursor: Option<String>,
    pub all: Option<String>,
}

fn is_truthy(flag: Option<&str>) -> bool {
    matches!(flag, Some("1") | Some("true"))
}

pub async fn list_posts(
    State(state): State<AppState>,
    headers: HeaderMap,
    Query(params): Query<FeedParams>,
) -> Result<Json<FeedPage>, AppError> {
    let include_unpublished = is_truthy(params.all.as_deref());
    if include_unpublished && !is_admin(&headers, &state.config).await {
        return Err(AppError::Unauthorized { challenge: false });
    }

    let page = state
        .feed()
        .execute(FeedQuery {
            cursor: params.cursor,
            include_unpublished,
        })
        .await?;
    Ok(Json(page))
}

pub async fn get_post(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<FeedItem>, AppError> {
    let id = parse_post_id(&id)?;
    Ok(Json(state.feed().get_post(id).await?))
}

pub async fn create_post(
    State(state): State<AppState>,
    payload: Result<Json<CreatePostFromUrlRequest>, JsonRejection>,
) -> Result<Json<CreatePostResponse>, AppError> {
    let Json(request) = payload.map_err(|_| AppError::BadRequest("Missing fields".into()))?;
    let post = state.create_post().from_url(request).await?;

    Ok(Json(CreatePostResponse {
        success: true,
        post: FeedItem::from_post(post, &state.config.default_author),
    }))
}

pub async fn delete_post(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<SuccessResponse>, AppError> {
    let id = parse_post_id(&id)?;
    state.delete_post().execute(id).await?;
    Ok(Json(SuccessResponse::ok()))
}

#[derive(Debug, Deserialize)]
pub struct DeleteParams {
    pub id: Option<String>,
}

/// `DELETE /api/posts?id=...`, kept for older admin clients.
pub async fn delete_post_by_query(
    State(state): State<AppState>,
    Query(params): Query<DeleteParams>,
) -> Result<Json<SuccessResponse>, AppError> {
    let Some(raw) = params.id.filter(|id| !id.trim().is_empty()) else {
        return Err(AppError::BadRequest("Missing id".into()));
    };
    let id = parse_post_id(&raw)?;
    state.delete_post().execute(id).await?;
    Ok(Json(SuccessResponse::ok()))
}
