//! Amazon S3 error sink.
//!
//! Error logs are stored as plain-text objects:
//! ```text
//! s3://{bucket}/{errors_prefix}error_{timestamp}.txt
//! ```

use async_trait::async_trait;
use aws_sdk_s3::primitives::ByteStream;
use aws_sdk_s3::Client;
use tracing::debug;

use super::{ErrorSink, ErrorSinkError, Result};

const CONTENT_TYPE: &str = "text/plain; charset=utf-8";

/// Writes error logs as objects in an S3 bucket.
pub struct S3ErrorSink {
    client: Client,
    bucket: String,
}

impl S3ErrorSink {
    /// Create a new S3 error sink.
    ///
    /// Uses default credentials from the environment (AWS_ACCESS_KEY_ID,
    /// AWS_SECRET_ACCESS_KEY, or IAM role).
    pub async fn new(bucket: impl Into<String>, region: Option<&str>) -> Self {
        let mut config_loader = aws_config::defaults(aws_config::BehaviorVersion::latest());
        if let Some(region) = region {
            config_loader = config_loader.region(aws_config::Region::new(region.to_string()));
        }
        let config = config_loader.load().await;

        Self::with_client(Client::new(&config), bucket)
    }

    /// Create with custom endpoint (for S3-compatible services like MinIO).
    pub async fn with_endpoint(
        bucket: impl Into<String>,
        endpoint: &str,
        region: Option<&str>,
    ) -> Self {
        let mut config_loader = aws_config::defaults(aws_config::BehaviorVersion::latest());
        if let Some(region) = region {
            config_loader = config_loader.region(aws_config::Region::new(region.to_string()));
        }
        let config = config_loader.load().await;

        let s3_config = aws_sdk_s3::config::Builder::from(&config)
            .endpoint_url(endpoint)
            .force_path_style(true)
            .build();

        Self::with_client(Client::from_conf(s3_config), bucket)
    }

    /// Create with explicit client (for testing).
    pub fn with_client(client: Client, bucket: impl Into<String>) -> Self {
        Self {
            client,
            bucket: bucket.into(),
        }
    }

    pub fn bucket(&self) -> &str {
        &self.bucket
    }
}

#[async_trait]
impl ErrorSink for S3ErrorSink {
    async fn put(&self, key: &str, body: &[u8]) -> Result<()> {
        self.client
            .put_object()
            .bucket(&self.bucket)
            .key(key)
            .content_type(CONTENT_TYPE)
            .body(ByteStream::from(body.to_vec()))
            .send()
            .await
            .map_err(|e| ErrorSinkError::WriteFailed(format!("S3 upload failed: {}", e)))?;

        debug!(
            bucket = %self.bucket,
            key = %key,
            size = body.len(),
            "Stored error log in S3"
        );
        Ok(())
    }

    fn location(&self, key: &str) -> String {
        format!("s3://{}/{}", self.bucket, key)
    }
}
