use crate::{
    application::{
        create_post::dto::{CreatePostResponse, UploadPostRequest},
        get_feed::dto::FeedItem,
    },
    presentation::http::{errors::AppError, state::AppState},
};
use axum::{
    Json,
    extract::{Multipart, State},
};
use bytes::Bytes;
use tracing::debug;

struct UploadedFile {
    name: String,
    content_type: String,
    data: Bytes,
}

/// `multipart/form-data` with a `file` part and an optional `caption`.
pub async fn upload_post(
    State(state): State<AppState>,
    mut multipart: Multipart,
) -> Result<Json<CreatePostResponse>, AppError> {
    let mut file = None;
    let mut caption = String::new();

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| AppError::BadRequest(format!("Invalid upload: {}", e)))?
    {
        match field.name().unwrap_or("") {
            "file" => {
                let name = field.file_name().unwrap_or("upload").to_string();
                let content_type = field.content_type().unwrap_or("").to_string();
                let data = field
                    .bytes()
                    .await
                    .map_err(|e| AppError::BadRequest(format!("Invalid upload: {}", e)))?;
                file = Some(UploadedFile {
                    name,
                    content_type,
                    data,
                });
            }
            "caption" => {
                caption = field
                    .text()
                    .await
                    .map_err(|e| AppError::BadRequest(format!("Invalid caption: {}", e)))?;
            }
            other => debug!("Ignoring multipart field {:?}", other),
        }
    }

    let Some(file) = file.filter(|f| !f.data.is_empty()) else {
        return Err(AppError::BadRequest("No file uploaded".into()));
    };

    let post = state
        .create_post()
        .upload(UploadPostRequest {
            file_name: file.name,
            content_type: file.content_type,
            data: file.data,
            caption,
        })
        .await?;

    Ok(Json(CreatePostResponse {
        success: true,
        post: FeedItem::from_post(post, &state.config.default_author),
    }))
}
