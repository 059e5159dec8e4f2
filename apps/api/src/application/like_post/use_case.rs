use super::dto::{LikeResponse, LikedResponse};
use crate::domain::{
    errors::DomainError,
    like::{
        entity::DeviceId,
        repository::{LikeInsert, LikeRepository},
    },
    post::repository::PostRepository,
};
use std::sync::Arc;
use tracing::{debug, instrument};
use uuid::Uuid;

/// One like per device per post; liking again only reconciles the counter.
pub struct LikePostUseCase {
    posts: Arc<dyn PostRepository>,
    likes: Arc<dyn LikeRepository>,
}

impl LikePostUseCase {
    pub fn new(posts: Arc<dyn PostRepository>, likes: Arc<dyn LikeRepository>) -> Self {
        Self { posts, likes }
    }

    #[instrument(skip(self, device), fields(post_id = %post_id))]
    pub async fn like(
        &self,
        post_id: Uuid,
        device: &DeviceId,
    ) -> Result<LikeResponse, DomainError> {
        if self.posts.find_by_id(post_id).await?.is_none() {
            return Err(DomainError::NotFound(format!("Post {}", post_id)));
        }

        let likes = if self.likes.has_liked(post_id, device).await? {
            self.likes.recount(post_id).await?
        } else {
            match self.likes.insert_like(post_id, device).await? {
                LikeInsert::Inserted { likes } => likes,
                // Another request from this device got there first.
                LikeInsert::AlreadyLiked => {
                    debug!("Lost like race for post {}, recounting", post_id);
                    self.likes.recount(post_id).await?
                }
            }
        };

        Ok(LikeResponse {
            id: post_id,
            liked: true,
            likes,
        })
    }

    pub async fn liked(
        &self,
        post_id: Uuid,
        device: &DeviceId,
    ) -> Result<LikedResponse, DomainError> {
        let liked = self.likes.has_liked(post_id, device).await?;
        Ok(LikedResponse { liked })
    }
}
