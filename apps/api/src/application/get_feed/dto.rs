use crate::domain::{post::entity::Post, shared::pagination::CursorPage};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use ts_rs::TS;
use uuid::Uuid;

/// A post as the feed and post pages show it, with display defaults applied.
#[derive(Debug, Clone, Serialize, Deserialize, TS, PartialEq)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct FeedItem {
    pub id: Uuid,
    pub image_url: String,
    pub caption: String,
    pub created_at: DateTime<Utc>,
    pub likes: i32,
    pub author: String,
    pub verified: bool,
    pub published: bool,
    pub slug: Option<String>,
}

impl FeedItem {
    pub fn from_post(post: Post, default_author: &str) -> Self {
        let author = post.author_or(default_author).to_string();
        let verified = post.is_verified();
        Self {
            id: post.id,
            image_url: post.image_url,
            caption: post.caption,
            created_at: post.created_at,
            likes: post.likes,
            author,
            verified,
            published: post.published,
            slug: post.slug,
        }
    }

    /// Path of the shareable post page, preferring the slug.
    pub fn permalink(&self) -> String {
        match &self.slug {
            Some(slug) => format!("/p/{}", slug),
            None => format!("/p/{}", self.id),
        }
    }
}

pub type FeedPage = CursorPage<FeedItem>;

#[derive(Debug, Clone, Default, PartialEq)]
pub struct FeedQuery {
    pub cursor: Option<String>,
    pub include_unpublished: bool,
}
