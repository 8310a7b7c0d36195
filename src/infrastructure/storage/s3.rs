use aws_sdk_s3::config::Builder;
use aws_sdk_s3::primitives::ByteStream;
use aws_sdk_s3::{Client, config::BehaviorVersion, config::Credentials, config::Region};
use bytes::Bytes;
use tracing::info;

use crate::config::settings::MediaConfig;

/// S3-compatible bucket holding catalog images.
#[derive(Clone)]
pub struct StorageService {
    client: Client,
    bucket: String,
    public_url: String,
}

impl StorageService {
    pub fn new(media: &MediaConfig) -> Self {
        let credentials = Credentials::new(&media.access_key, &media.secret_key, None, None, "static");

        let config = Builder::new()
            .behavior_version(BehaviorVersion::latest())
            .region(Region::new("us-east-1"))
            .endpoint_url(&media.endpoint)
            .credentials_provider(credentials)
            .force_path_style(true) // MinIO
            .build();

        info!(bucket = %media.bucket, "✅ Media storage configured");

        Self {
            client: Client::from_conf(config),
            bucket: media.bucket.clone(),
            public_url: media.public_url.trim_end_matches('/').to_string(),
        }
    }

    pub fn public_url(&self, key: &str) -> String {
        format!("{}/{}", self.public_url, key)
    }

    pub async fn put_object(&self, key: &str, content_type: &str, body: Bytes) -> Result<(), aws_sdk_s3::Error> {
        self.client
            .put_object()
            .bucket(&self.bucket)
            .key(key)
            .content_type(content_type)
            .body(ByteStream::from(body))
            .send()
            .await?;
        Ok(())
    }

    pub async fn delete_object(&self, key: &str) -> Result<(), aws_sdk_s3::Error> {
        self.client
            .delete_object()
            .bucket(&self.bucket)
            .key(key)
            .send()
            .await?;
        Ok(())
    }
}
