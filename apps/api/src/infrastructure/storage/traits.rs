use async_trait::async_trait;

/// Object store holding the photo files. Keys are paths inside the bucket;
/// URLs are what browsers load.
#[async_trait]
pub trait StorageService: Send + Sync {
    /// Stores the object and returns its public URL.
    async fn put(&self, key: &str, data: Vec<u8>, content_type: &str) -> anyhow::Result<String>;

    async fn delete(&self, key: &str) -> anyhow::Result<()>;

    fn public_url(&self, key: &str) -> String;

    /// Recovers the object key from a URL this store handed out, or `None`
    /// for images hosted elsewhere.
    fn key_for_url(&self, url: &str) -> Option<String> {
        let base = self.public_url("");
        url.strip_prefix(&base)
            .map(|key| key.split(['?', '#']).next().unwrap_or_default())
            .filter(|key| !key.is_empty())
            .map(str::to_string)
    }
}
