use crate::application::get_feed::dto::FeedItem;
use bytes::Bytes;
use serde::{Deserialize, Serialize};
use ts_rs::TS;

/// A photo received through the admin upload form.
#[derive(Debug, Clone)]
pub struct UploadPostRequest {
    pub file_name: String,
    pub content_type: String,
    pub data: Bytes,
    pub caption: String,
}

/// Creates a post for an image that is already hosted somewhere.
#[derive(Debug, Clone, Default, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct CreatePostFromUrlRequest {
    #[serde(default)]
    pub caption: Option<String>,
    #[serde(default)]
    pub image_url: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct CreatePostResponse {
    pub success: bool,
    pub post: FeedItem,
}
