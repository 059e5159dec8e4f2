use super::traits::StorageService;
use async_trait::async_trait;
use aws_sdk_s3::{
    Client, config::BehaviorVersion, config::Credentials, config::Region, primitives::ByteStream,
};
use tracing::{debug, instrument};

/// Uploaded photos never change under the same key.
const IMMUTABLE_CACHE_CONTROL: &str = "public, max-age=31536000, immutable";

/// Cloudflare R2 (or any S3-compatible store) behind a public URL prefix.
pub struct R2StorageService {
    client: Client,
    bucket: String,
    public_url: String,
}

#[derive(Debug, Clone)]
pub struct R2Settings {
    pub access_key_id: String,
    pub secret_access_key: String,
    pub endpoint: String,
    pub region: String,
    pub force_path_style: bool,
    pub bucket: String,
    pub public_url: String,
}

impl R2StorageService {
    pub fn new(settings: R2Settings) -> Self {
        let creds = Credentials::new(
            settings.access_key_id,
            settings.secret_access_key,
            None,
            None,
            "r2",
        );
        let config = aws_sdk_s3::config::Builder::new()
            .behavior_version(BehaviorVersion::latest())
            .credentials_provider(creds)
            .endpoint_url(settings.endpoint)
            .region(Region::new(settings.region))
            .force_path_style(settings.force_path_style)
            .build();

        Self {
            client: Client::from_conf(config),
            bucket: settings.bucket,
            public_url: settings.public_url.trim_end_matches('/').to_string(),
        }
    }
}

#[async_trait]
impl StorageService for R2StorageService {
    #[instrument(skip(self, data), fields(bytes = data.len()))]
    async fn put(&self, key: &str, data: Vec<u8>, content_type: &str) -> anyhow::Result<String> {
        self.client
            .put_object()
            .bucket(&self.bucket)
            .key(key)
            .body(ByteStream::from(data))
            .content_type(content_type)
            .cache_control(IMMUTABLE_CACHE_CONTROL)
            .send()
            .await?;
        debug!("Stored object {}", key);
        Ok(self.public_url(key))
    }

    #[instrument(skip(self))]
    async fn delete(&self, key: &str) -> anyhow::Result<()> {
        self.client
            .delete_object()
            .bucket(&self.bucket)
            .key(key)
            .send()
            .await?;
        debug!("Deleted object {}", key);
        Ok(())
    }

    fn public_url(&self, key: &str) -> String {
        format!("{}/{}", self.public_url, key)
    }
}
