use super::entity::Post;
use crate::domain::{errors::DomainError, shared::pagination::PageRequest};
use async_trait::async_trait;
use uuid::Uuid;

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait PostRepository: Send + Sync {
    async fn create(&self, post: &Post) -> Result<Post, DomainError>;
    async fn find_by_id(&self, id: Uuid) -> Result<Option<Post>, DomainError>;
    async fn find_by_slug(&self, slug: &str) -> Result<Option<Post>, DomainError>;
    /// Posts strictly older than the request cursor, newest first.
    async fn find_page(&self, request: &PageRequest) -> Result<Vec<Post>, DomainError>;
    /// Removes the post and returns it, or `None` when it did not exist.
    async fn delete(&self, id: Uuid) -> Result<Option<Post>, DomainError>;
    /// Round trip to the backing store, used by the health check.
    async fn ping(&self) -> Result<(), DomainError>;
}
