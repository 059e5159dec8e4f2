use super::traits::FeedCache;
use anyhow::Result;
use async_trait::async_trait;
use redis::{AsyncCommands, Client};
use serde::de::DeserializeOwned;
use tracing::debug;

const GENERATION_KEY: &str = "feed:generation";

pub struct RedisCache {
    client: Client,
}

impl RedisCache {
    pub fn new(client: Client) -> Self {
        Self { client }
    }

    pub async fn get<T: DeserializeOwned>(&self, key: &str) -> Result<Option<T>> {
        let mut conn = self.client.get_multiplexed_async_connection().await?;
        let value: Option<String> = conn.get(key).await?;
        match value {
            Some(v) => Ok(Some(serde_json::from_str(&v)?)),
            None => Ok(None),
        }
    }

    pub async fn ping(&self) -> Result<()> {
        let mut conn = self.client.get_multiplexed_async_connection().await?;
        let _: String = redis::cmd("PING").query_async(&mut conn).await?;
        Ok(())
    }
}

#[async_trait]
impl FeedCache for RedisCache {
    async fn get_page(&self, key: &str) -> Result<Option<String>> {
        let mut conn = self.client.get_multiplexed_async_connection().await?;
        let page: Option<String> = conn.get(key).await?;
        debug!(hit = page.is_some(), "Feed cache lookup for key={}", key);
        Ok(page)
    }

    async fn put_page(&self, key: &str, page: String, ttl_seconds: u64) -> Result<()> {
        let mut conn = self.client.get_multiplexed_async_connection().await?;
        let _: () = conn.set_ex(key, page, ttl_seconds).await?;
        Ok(())
    }

    async fn generation(&self) -> Result<u64> {
        Ok(self.get::<u64>(GENERATION_KEY).await?.unwrap_or(0))
    }

    async fn bump_generation(&self) -> Result<u64> {
        let mut conn = self.client.get_multiplexed_async_connection().await?;
        let next: u64 = conn.incr(GENERATION_KEY, 1).await?;
        debug!("Feed cache generation bumped to {}", next);
        Ok(next)
    }
}
