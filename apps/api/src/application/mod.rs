pub mod create_post;
pub mod delete_post;
pub mod get_feed;
pub mod like_post;
