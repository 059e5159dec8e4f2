use crate::domain::{
    errors::DomainError,
    like::{
        entity::DeviceId,
        repository::{LikeInsert, LikeRepository},
    },
};
use async_trait::async_trait;
use sqlx::PgPool;
use tracing::{debug, error, instrument};
use uuid::Uuid;

pub struct SqlxLikeRepository {
    pub pool: PgPool,
}

impl SqlxLikeRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

fn db_error(e: sqlx::Error) -> DomainError {
    DomainError::InfrastructureError(e.to_string())
}

/// A like for a post that vanished mid-request surfaces as not-found.
fn like_insert_error(post_id: Uuid, e: sqlx::Error) -> DomainError {
    let post_missing =
        matches!(&e, sqlx::Error::Database(db) if db.is_foreign_key_violation());
    if post_missing {
        return DomainError::NotFound(format!("Post {}", post_id));
    }
    error!("Failed to insert like for post {}: {}", post_id, e);
    db_error(e)
}

#[async_trait]
impl LikeRepository for SqlxLikeRepository {
    async fn has_liked(&self, post_id: Uuid, device: &DeviceId) -> Result<bool, DomainError> {
        sqlx::query_scalar::<_, bool>(
            "SELECT EXISTS(SELECT 1 FROM likes WHERE post_id = $1 AND device_id = $2)",
        )
        .bind(post_id)
        .bind(device.as_str())
        .fetch_one(&self.pool)
        .await
        .map_err(db_error)
    }

    #[instrument(skip(self, device), fields(post_id = %post_id))]
    async fn insert_like(
        &self,
        post_id: Uuid,
        device: &DeviceId,
    ) -> Result<LikeInsert, DomainError> {
        let mut tx = self.pool.begin().await.map_err(db_error)?;

        // The unique key decides races between concurrent first likes.
        let inserted = sqlx::query_scalar::<_, Uuid>(
            "INSERT INTO likes (id, post_id, device_id) VALUES ($1, $2, $3)
             ON CONFLICT (post_id, device_id) DO NOTHING
             RETURNING id",
        )
        .bind(Uuid::now_v7())
        .bind(post_id)
        .bind(device.as_str())
        .fetch_optional(&mut *tx)
        .await
        .map_err(|e| like_insert_error(post_id, e))?;

        if inserted.is_none() {
            tx.rollback().await.map_err(db_error)?;
            debug!("Device already liked post {}", post_id);
            return Ok(LikeInsert::AlreadyLiked);
        }

        let likes = sqlx::query_scalar::<_, i32>(
            "UPDATE posts SET likes = likes + 1 WHERE id = $1 RETURNING likes",
        )
        .bind(post_id)
        .fetch_one(&mut *tx)
        .await
        .map_err(db_error)?;

        tx.commit().await.map_err(db_error)?;
        Ok(LikeInsert::Inserted { likes })
    }

    #[instrument(skip(self), fields(post_id = %post_id))]
    async fn recount(&self, post_id: Uuid) -> Result<i32, DomainError> {
        let likes = sqlx::query_scalar::<_, i32>(
            "UPDATE posts
             SET likes = (SELECT COUNT(*) FROM likes WHERE likes.post_id = posts.id)
             WHERE id = $1
             RETURNING likes",
        )
        .bind(post_id)
        .fetch_optional(&self.pool)
        .await
        .map_err(db_error)?;

        likes.ok_or_else(|| DomainError::NotFound(format!("Post {}", post_id)))
    }
}
