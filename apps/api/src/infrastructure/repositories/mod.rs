pub mod sqlx_like_repository;
pub mod sqlx_post_repository;
