use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use ts_rs::TS;
use uuid::Uuid;

/// A captioned photo shown in the feed.
///
/// # Lifecycle
/// 1. **Created** by an admin upload (or from an already-hosted image URL)
/// 2. **Liked** by anonymous devices, which only ever moves `likes` up or
///    reconciles it with the like rows
/// 3. **Deleted** by an admin; likes cascade with it
///
/// # Invariants
/// - `id` is a UUID v7, so ids sort in creation order
/// - `likes` equals the number of like rows referencing the post once any
///   already-liked request has reconciled it
/// - `slug`, when present, is unique across posts
#[derive(Debug, Clone, Serialize, Deserialize, TS, sqlx::FromRow, PartialEq)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct Post {
    pub id: Uuid,

    /// Public URL of the stored image
    pub image_url: String,

    pub caption: String,

    pub created_at: DateTime<Utc>,

    /// Unpublished posts are only visible to the admin listing
    pub published: bool,

    pub likes: i32,

    /// Display name of the poster; `None` renders as the configured default
    pub author: Option<String>,

    /// Verified badge; `None` renders as verified
    pub verified: Option<bool>,

    pub slug: Option<String>,
}

/// Fields needed to insert a post. Everything else is assigned at creation.
#[derive(Debug, Clone, PartialEq)]
pub struct NewPost {
    pub image_url: String,
    pub caption: String,
    pub published: bool,
    pub author: Option<String>,
}

impl Post {
    /// Builds the row for a freshly created post.
    pub fn create(new: NewPost, slug: Option<String>) -> Self {
        Self {
            id: Uuid::now_v7(),
            image_url: new.image_url,
            caption: new.caption,
            created_at: Utc::now(),
            published: new.published,
            likes: 0,
            author: new.author,
            verified: None,
            slug,
        }
    }

    pub fn author_or<'a>(&'a self, default_author: &'a str) -> &'a str {
        self.author
            .as_deref()
            .filter(|a| !a.trim().is_empty())
            .unwrap_or(default_author)
    }

    pub fn is_verified(&self) -> bool {
        self.verified.unwrap_or(true)
    }

    /// Caption trimmed to `max_chars` characters, used for previews and alt text.
    pub fn caption_excerpt(&self, max_chars: usize) -> String {
        self.caption.chars().take(max_chars).collect()
    }
}
