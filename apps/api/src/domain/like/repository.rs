use super::entity::DeviceId;
use crate::domain::errors::DomainError;
use async_trait::async_trait;
use uuid::Uuid;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LikeInsert {
    /// A new like row was written; `likes` is the post's counter afterwards.
    Inserted { likes: i32 },
    /// The unique `(post, device)` key already existed; nothing changed.
    AlreadyLiked,
}

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait LikeRepository: Send + Sync {
    async fn has_liked(&self, post_id: Uuid, device: &DeviceId) -> Result<bool, DomainError>;
    /// Inserts the like row and increments the post counter atomically.
    async fn insert_like(&self, post_id: Uuid, device: &DeviceId)
    -> Result<LikeInsert, DomainError>;
    /// Recounts like rows for the post, stores the result on the post and returns it.
    async fn recount(&self, post_id: Uuid) -> Result<i32, DomainError>;
}
