pub mod redis_cache;
pub mod traits;
