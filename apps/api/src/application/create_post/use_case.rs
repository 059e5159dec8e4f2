use super::dto::{CreatePostFromUrlRequest, UploadPostRequest};
use crate::{
    application::get_feed::use_case::invalidate_feed,
    domain::{
        errors::DomainError,
        post::{
            entity::{NewPost, Post},
            repository::PostRepository,
            value_objects::{Caption, MAX_CAPTION_CHARS, SafeFileName, slug_for},
        },
    },
    infrastructure::{
        cache::traits::FeedCache,
        imaging::optimizer::{ImageOptimizer, content_type_or_default},
        storage::traits::StorageService,
    },
};
use chrono::Utc;
use std::sync::Arc;
use tracing::{error, info, instrument};
use uuid::Uuid;

/// Folder inside the bucket that holds every photo.
const OBJECT_PREFIX: &str = "bud";

/// Creates posts, either from an uploaded photo or from an already-hosted URL.
///
/// Uploads are optimized, stored, then inserted. There is no rollback: when
/// the insert fails after the store succeeded, the object stays orphaned.
pub struct CreatePostUseCase {
    posts: Arc<dyn PostRepository>,
    storage: Arc<dyn StorageService>,
    cache: Arc<dyn FeedCache>,
    optimizer: ImageOptimizer,
}

impl CreatePostUseCase {
    pub fn new(
        posts: Arc<dyn PostRepository>,
        storage: Arc<dyn StorageService>,
        cache: Arc<dyn FeedCache>,
        optimizer: ImageOptimizer,
    ) -> Self {
        Self {
            posts,
            storage,
            cache,
            optimizer,
        }
    }

    #[instrument(skip(self, request), fields(
        file_name = %request.file_name,
        content_type = %request.content_type,
        bytes = request.data.len()
    ))]
    pub async fn upload(&self, request: UploadPostRequest) -> Result<Post, DomainError> {
        if request.data.is_empty() {
            return Err(DomainError::ValidationError("No file uploaded".into()));
        }
        // Some browsers send HEIC photos without a type.
        let content_type = content_type_or_default(&request.content_type).to_string();
        if !content_type.to_ascii_lowercase().starts_with("image/") {
            return Err(DomainError::ValidationError(
                "Only image uploads are accepted".into(),
            ));
        }
        let caption = validate_caption(&request.caption)?;

        let optimized = self
            .optimizer
            .optimize(request.data, &content_type)
            .await;

        let mut file_name = SafeFileName::new(&request.file_name);
        if let Some(ext) = optimized.extension() {
            file_name = file_name.with_extension(ext);
        }
        let key = object_key(Utc::now().timestamp_millis(), Uuid::new_v4(), &file_name);

        let image_url = self
            .storage
            .put(&key, optimized.bytes.to_vec(), &optimized.content_type)
            .await
            .map_err(|e| {
                error!("Storing {} failed: {}", key, e);
                DomainError::StorageError(e.to_string())
            })?;

        self.insert(image_url, caption).await
    }

    #[instrument(skip(self, request))]
    pub async fn from_url(&self, request: CreatePostFromUrlRequest) -> Result<Post, DomainError> {
        let (Some(caption), Some(image_url)) = (
            non_blank(request.caption.as_deref()),
            non_blank(request.image_url.as_deref()),
        ) else {
            return Err(DomainError::ValidationError("Missing fields".into()));
        };

        let image_url = validate_image_url(image_url)?;
        let caption = validate_caption(caption)?;
        self.insert(image_url, caption).await
    }

    async fn insert(&self, image_url: String, caption: Caption) -> Result<Post, DomainError> {
        let mut post = Post::create(
            NewPost {
                image_url,
                caption: caption.value,
                published: true,
                author: None,
            },
            None,
        );
        post.slug = Some(slug_for(&post.caption, post.id));

        let created = self.posts.create(&post).await?;
        invalidate_feed(self.cache.as_ref()).await;

        info!("Post {} published", created.id);
        Ok(created)
    }
}

/// `bud/{unix_millis}-{uuid}-{safe_name}`
pub fn object_key(unix_millis: i64, nonce: Uuid, file_name: &SafeFileName) -> String {
    format!(
        "{}/{}-{}-{}",
        OBJECT_PREFIX,
        unix_millis,
        nonce,
        file_name.as_str()
    )
}

fn non_blank(value: Option<&str>) -> Option<&str> {
    value.filter(|v| !v.trim().is_empty())
}

fn validate_caption(raw: &str) -> Result<Caption, DomainError> {
    Caption::new(raw).map_err(|_| {
        DomainError::ValidationError(format!(
            "Caption must be at most {} characters",
            MAX_CAPTION_CHARS
        ))
    })
}

fn validate_image_url(raw: &str) -> Result<String, DomainError> {
    let invalid =
        || DomainError::ValidationError("imageUrl must be an absolute http(s) URL".into());
    let parsed = url::Url::parse(raw.trim()).map_err(|_| invalid())?;
    match parsed.scheme() {
        "http" | "https" if parsed.host_str().is_some() => Ok(parsed.to_string()),
        _ => Err(invalid()),
    }
}
