use crate::{
    application::{
        create_post::use_case::CreatePostUseCase, delete_post::use_case::DeletePostUseCase,
        get_feed::use_case::GetFeedUseCase, like_post::use_case::LikePostUseCase,
    },
    config::Config,
    domain::{like::repository::LikeRepository, post::repository::PostRepository},
    infrastructure::{
        cache::traits::FeedCache, imaging::optimizer::ImageOptimizer,
        storage::traits::StorageService,
    },
};
use std::sync::Arc;

#[derive(Clone)]
pub struct AppState {
    pub config: Config,
    pub posts: Arc<dyn PostRepository>,
    pub likes: Arc<dyn LikeRepository>,
    pub storage: Arc<dyn StorageService>,
    pub cache: Arc<dyn FeedCache>,
    pub optimizer: ImageOptimizer,
}

impl AppState {
    pub fn feed(&self) -> GetFeedUseCase {
        GetFeedUseCase::new(
            self.posts.clone(),
            self.cache.clone(),
            self.config.default_author.clone(),
            self.config.feed_cache_ttl_seconds,
        )
    }

    pub fn create_post(&self) -> CreatePostUseCase {
        CreatePostUseCase::new(
            self.posts.clone(),
            self.storage.clone(),
            self.cache.clone(),
            self.optimizer.clone(),
        )
    }

    pub fn delete_post(&self) -> DeletePostUseCase {
        DeletePostUseCase::new(self.posts.clone(), self.storage.clone(), self.cache.clone())
    }

    pub fn like_post(&self) -> LikePostUseCase {
        LikePostUseCase::new(self.posts.clone(), self.likes.clone())
    }
}
