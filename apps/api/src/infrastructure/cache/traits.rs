use async_trait::async_trait;

/// Short-lived store for rendered feed pages.
///
/// Pages are stored under keys that embed the current generation, so bumping
/// the generation orphans every cached page at once.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait FeedCache: Send + Sync {
    async fn get_page(&self, key: &str) -> anyhow::Result<Option<String>>;
    async fn put_page(&self, key: &str, page: String, ttl_seconds: u64) -> anyhow::Result<()>;
    /// Current generation, `0` before the first bump.
    async fn generation(&self) -> anyhow::Result<u64>;
    async fn bump_generation(&self) -> anyhow::Result<u64>;
}
