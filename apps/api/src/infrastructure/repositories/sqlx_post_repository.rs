use crate::domain::{
    errors::DomainError,
    post::{entity::Post, repository::PostRepository},
    shared::pagination::{FeedCursor, PageRequest},
};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::PgPool;
use tracing::{debug, error, info, instrument};
use uuid::Uuid;

const POST_COLUMNS: &str =
    "id, image_url, caption, created_at, published, likes, author, verified, slug";

pub struct SqlxPostRepository {
    pub pool: PgPool,
}

impl SqlxPostRepository {
    pub fn new(pool: PgPool) -> Self {
        info!("Initializing SqlxPostRepository with connection pool");
        Self { pool }
    }
}

fn db_error(e: sqlx::Error) -> DomainError {
    DomainError::InfrastructureError(e.to_string())
}

/// Splits a cursor into the `(created_at, id)` bind pair. A timestamp-only
/// cursor leaves the id unbound, which turns the tie-break clause off.
fn cursor_binds(cursor: Option<&FeedCursor>) -> (Option<DateTime<Utc>>, Option<Uuid>) {
    match cursor {
        None => (None, None),
        Some(FeedCursor::Timestamp(ts)) => (Some(*ts), None),
        Some(FeedCursor::Keyset { created_at, id }) => (Some(*created_at), Some(*id)),
    }
}

#[async_trait]
impl PostRepository for SqlxPostRepository {
    #[instrument(skip(self, post), fields(post_id = %post.id))]
    async fn create(&self, post: &Post) -> Result<Post, DomainError> {
        let sql = format!(
            r#"INSERT INTO posts ({POST_COLUMNS})
               VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9)
               RETURNING {POST_COLUMNS}"#
        );
        let created = sqlx::query_as::<_, Post>(&sql)
            .bind(post.id)
            .bind(&post.image_url)
            .bind(&post.caption)
            .bind(post.created_at)
            .bind(post.published)
            .bind(post.likes)
            .bind(&post.author)
            .bind(post.verified)
            .bind(&post.slug)
            .fetch_one(&self.pool)
            .await
            .map_err(|e| {
                error!("Failed to create post {}: {}", post.id, e);
                db_error(e)
            })?;

        info!("Created post {}", created.id);
        Ok(created)
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<Post>, DomainError> {
        let sql = format!("SELECT {POST_COLUMNS} FROM posts WHERE id = $1");
        sqlx::query_as::<_, Post>(&sql)
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(db_error)
    }

    async fn find_by_slug(&self, slug: &str) -> Result<Option<Post>, DomainError> {
        let sql = format!("SELECT {POST_COLUMNS} FROM posts WHERE slug = $1");
        sqlx::query_as::<_, Post>(&sql)
            .bind(slug)
            .fetch_optional(&self.pool)
            .await
            .map_err(db_error)
    }

    #[instrument(skip(self), fields(limit = request.limit, all = request.include_unpublished))]
    async fn find_page(&self, request: &PageRequest) -> Result<Vec<Post>, DomainError> {
        let (before_ts, before_id) = cursor_binds(request.cursor.as_ref());
        debug!("Fetching feed page before {:?} / {:?}", before_ts, before_id);

        let sql = format!(
            r#"SELECT {POST_COLUMNS}
               FROM posts
               WHERE ($1 OR published)
                 AND (
                     $2::timestamptz IS NULL
                     OR created_at < $2
                     OR ($3::uuid IS NOT NULL AND created_at = $2 AND id < $3)
                 )
               ORDER BY created_at DESC, id DESC
               LIMIT $4"#
        );
        sqlx::query_as::<_, Post>(&sql)
            .bind(request.include_unpublished)
            .bind(before_ts)
            .bind(before_id)
            .bind(request.limit)
            .fetch_all(&self.pool)
            .await
            .map_err(|e| {
                error!("Failed to fetch feed page: {}", e);
                db_error(e)
            })
    }

    #[instrument(skip(self), fields(post_id = %id))]
    async fn delete(&self, id: Uuid) -> Result<Option<Post>, DomainError> {
        let sql = format!("DELETE FROM posts WHERE id = $1 RETURNING {POST_COLUMNS}");
        let deleted = sqlx::query_as::<_, Post>(&sql)
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| {
                error!("Failed to delete post {}: {}", id, e);
                db_error(e)
            })?;

        if deleted.is_some() {
            info!("Deleted post {}", id);
        }
        Ok(deleted)
    }

    async fn ping(&self) -> Result<(), DomainError> {
        sqlx::query("SELECT 1")
            .execute(&self.pool)
            .await
            .map(|_| ())
            .map_err(db_error)
    }
}
