use super::dto::{FeedItem, FeedPage, FeedQuery};
use crate::{
    domain::{
        errors::DomainError,
        post::{entity::Post, repository::PostRepository},
        shared::pagination::{CursorPage, FEED_PAGE_SIZE, FeedCursor, PageRequest},
    },
    infrastructure::cache::traits::FeedCache,
};
use std::sync::Arc;
use tracing::{debug, instrument, warn};
use uuid::Uuid;

/// Reads the newest-first feed and single posts.
///
/// Published pages go through the feed cache; the admin listing
/// (`include_unpublished`) always reads the database. Cache failures are
/// logged and fall back to the database.
pub struct GetFeedUseCase {
    posts: Arc<dyn PostRepository>,
    cache: Arc<dyn FeedCache>,
    default_author: String,
    cache_ttl_seconds: u64,
}

impl GetFeedUseCase {
    pub fn new(
        posts: Arc<dyn PostRepository>,
        cache: Arc<dyn FeedCache>,
        default_author: String,
        cache_ttl_seconds: u64,
    ) -> Self {
        Self {
            posts,
            cache,
            default_author,
            cache_ttl_seconds,
        }
    }

    #[instrument(skip(self), fields(all = query.include_unpublished))]
    pub async fn execute(&self, query: FeedQuery) -> Result<FeedPage, DomainError> {
        let cursor = query
            .cursor
            .as_deref()
            .filter(|raw| !raw.trim().is_empty())
            .map(FeedCursor::parse)
            .transpose()?;

        let request = PageRequest {
            cursor,
            include_unpublished: query.include_unpublished,
            limit: FEED_PAGE_SIZE,
        };

        if request.include_unpublished {
            return self.load(&request).await;
        }

        let key = match self.cache.generation().await {
            Ok(generation) => Some(cache_key(generation, request.cursor.as_ref())),
            Err(e) => {
                warn!("Feed cache unavailable, reading database: {}", e);
                None
            }
        };

        if let Some(key) = &key {
            if let Some(page) = self.cached(key).await {
                return Ok(page);
            }
        }

        let page = self.load(&request).await?;

        if let Some(key) = &key {
            self.store(key, &page).await;
        }
        Ok(page)
    }

    pub async fn get_post(&self, id: Uuid) -> Result<FeedItem, DomainError> {
        self.posts
            .find_by_id(id)
            .await?
            .map(|post| self.item(post))
            .ok_or_else(|| DomainError::NotFound(format!("Post {}", id)))
    }

    /// Looks a post up by id, falling back to its slug.
    pub async fn find_post(&self, id_or_slug: &str) -> Result<Option<FeedItem>, DomainError> {
        let post = match Uuid::parse_str(id_or_slug) {
            Ok(id) => self.posts.find_by_id(id).await?,
            Err(_) => self.posts.find_by_slug(id_or_slug).await?,
        };
        Ok(post.map(|post| self.item(post)))
    }

    async fn load(&self, request: &PageRequest) -> Result<FeedPage, DomainError> {
        let posts = self.posts.find_page(request).await?;
        debug!("Loaded {} posts from database", posts.len());

        Ok(
            CursorPage::from_items(posts, request.limit, |post| {
                FeedCursor::after(post.created_at, post.id)
            })
            .map(|post| self.item(post)),
        )
    }

    async fn cached(&self, key: &str) -> Option<FeedPage> {
        match self.cache.get_page(key).await {
            Ok(Some(json)) => match serde_json::from_str(&json) {
                Ok(page) => {
                    debug!("Feed cache hit for {}", key);
                    Some(page)
                }
                Err(e) => {
                    warn!("Discarding unreadable cached feed page {}: {}", key, e);
                    None
                }
            },
            Ok(None) => None,
            Err(e) => {
                warn!("Feed cache read failed for {}: {}", key, e);
                None
            }
        }
    }

    async fn store(&self, key: &str, page: &FeedPage) {
        let json = match serde_json::to_string(page) {
            Ok(json) => json,
            Err(e) => {
                warn!("Could not serialize feed page for caching: {}", e);
                return;
            }
        };
        if let Err(e) = self
            .cache
            .put_page(key, json, self.cache_ttl_seconds)
            .await
        {
            warn!("Feed cache write failed for {}: {}", key, e);
        }
    }

    fn item(&self, post: Post) -> FeedItem {
        FeedItem::from_post(post, &self.default_author)
    }
}

/// Generation-stamped key of one cached feed page.
pub fn cache_key(generation: u64, cursor: Option<&FeedCursor>) -> String {
    match cursor {
        Some(cursor) => format!("feed:v{}:{}", generation, cursor),
        None => format!("feed:v{}:first", generation),
    }
}

/// Orphans every cached feed page. Failures only cost freshness until the TTL runs out.
pub async fn invalidate_feed(cache: &dyn FeedCache) {
    match cache.bump_generation().await {
        Ok(generation) => debug!("Feed cache invalidated (generation {})", generation),
        Err(e) => warn!("Feed cache invalidation failed: {}", e),
    }
}
