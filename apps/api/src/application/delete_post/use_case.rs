use crate::{
    application::get_feed::use_case::invalidate_feed,
    domain::{errors::DomainError, post::repository::PostRepository},
    infrastructure::{cache::traits::FeedCache, storage::traits::StorageService},
};
use std::sync::Arc;
use tracing::{info, instrument, warn};
use uuid::Uuid;

pub struct DeletePostUseCase {
    posts: Arc<dyn PostRepository>,
    storage: Arc<dyn StorageService>,
    cache: Arc<dyn FeedCache>,
}

impl DeletePostUseCase {
    pub fn new(
        posts: Arc<dyn PostRepository>,
        storage: Arc<dyn StorageService>,
        cache: Arc<dyn FeedCache>,
    ) -> Self {
        Self {
            posts,
            storage,
            cache,
        }
    }

    /// Deletes the post (likes cascade), then its stored photo on a best-effort basis.
    #[instrument(skip(self), fields(post_id = %id))]
    pub async fn execute(&self, id: Uuid) -> Result<(), DomainError> {
        let post = self
            .posts
            .delete(id)
            .await?
            .ok_or_else(|| DomainError::NotFound(format!("Post {}", id)))?;

        match self.storage.key_for_url(&post.image_url) {
            Some(key) => {
                if let Err(e) = self.storage.delete(&key).await {
                    warn!("Post {} deleted but its object {} was not: {}", id, key, e);
                }
            }
            None => info!("Post {} image is hosted elsewhere, nothing to remove", id),
        }

        invalidate_feed(self.cache.as_ref()).await;
        Ok(())
    }
}
