pub mod health;
pub mod likes;
pub mod pages;
pub mod posts;
pub mod upload;
