use crate::traits::{Storage, StorageError, StorageResult};
use crate::StorageBackend;
use async_trait::async_trait;
use bytes::Bytes;
use http::header::{HeaderMap, HeaderName, HeaderValue};
use object_store::aws::{AmazonS3, AmazonS3Builder};
use object_store::path::Path;
use object_store::{
    Attribute, Attributes, ClientOptions, ObjectStore, ObjectStoreExt, PutOptions, PutPayload,
    Result as ObjectResult,
};
use std::pin::Pin;
use tokio::io::{AsyncRead, AsyncReadExt};

/// Canned ACL applied to every object written by this service.
const PUBLIC_READ_ACL: &str = "public-read";

/// Connection settings for an S3-compatible bucket.
#[derive(Clone, Default)]
pub struct S3Settings {
    pub bucket: String,
    pub region: String,
    /// Custom endpoint for S3-compatible providers
    /// (e.g., "https://nyc3.digitaloceanspaces.com", "http://localhost:9000")
    pub endpoint_url: Option<String>,
    pub access_key_id: Option<String>,
    pub secret_access_key: Option<String>,
}

/// S3 storage implementation
#[derive(Clone)]
pub struct S3Storage {
    store: AmazonS3,
    bucket: String,
    region: String,
    endpoint_url: Option<String>,
}

impl S3Storage {
    /// Create a new S3Storage instance
    ///
    /// Credentials not given explicitly are picked up from the standard AWS
    /// environment variables.
    pub async fn new(settings: S3Settings) -> StorageResult<Self> {
        let S3Settings {
            bucket,
            region,
            endpoint_url,
            access_key_id,
            secret_access_key,
        } = settings;

        let mut acl_headers = HeaderMap::new();
        acl_headers.insert(
            HeaderName::from_static("x-amz-acl"),
            HeaderValue::from_static(PUBLIC_READ_ACL),
        );

        let mut builder = AmazonS3Builder::from_env()
            .with_region(region.clone())
            .with_bucket_name(bucket.clone())
            .with_client_options(ClientOptions::new().with_default_headers(acl_headers));

        if let Some(ref endpoint) = endpoint_url {
            let allow_http = endpoint.starts_with("http://");
            builder = builder
                .with_endpoint(endpoint.clone())
                .with_allow_http(allow_http);
        }
        if let Some(key_id) = access_key_id {
            builder = builder.with_access_key_id(key_id);
        }
        if let Some(secret) = secret_access_key {
            builder = builder.with_secret_access_key(secret);
        }

        let store = builder
            .build()
            .map_err(|e| StorageError::ConfigError(e.to_string()))?;

        tracing::debug!(
            bucket = %bucket,
            region = %region,
            endpoint = ?endpoint_url,
            "S3 storage configured"
        );

        Ok(S3Storage {
            store,
            bucket,
            region,
            endpoint_url,
        })
    }
}

/// Public URL of an object.
///
/// Path-style `{endpoint}/{bucket}/{key}` for S3-compatible providers,
/// virtual-hosted AWS style otherwise.
pub fn object_url(endpoint: Option<&str>, bucket: &str, region: &str, key: &str) -> String {
    match endpoint {
        Some(endpoint) => format!("{}/{}/{}", endpoint.trim_end_matches('/'), bucket, key),
        None => format!("https://{}.s3.{}.amazonaws.com/{}", bucket, region, key),
    }
}

#[async_trait]
impl Storage for S3Storage {
    async fn upload_stream(
        &self,
        key: &str,
        content_type: &str,
        content_length: Option<u64>,
        mut reader: Pin<Box<dyn AsyncRead + Send + Unpin>>,
    ) -> StorageResult<String> {
        crate::keys::validate_key(key)?;
        let start = std::time::Instant::now();

        // Documents are capped well below the multipart threshold; a single put is enough.
        let mut buffer = Vec::with_capacity(content_length.unwrap_or(0) as usize);
        reader.read_to_end(&mut buffer).await.map_err(|e| {
            StorageError::UploadFailed(format!("Failed to read from stream: {}", e))
        })?;

        let size = buffer.len() as u64;
        let location = Path::from(key);

        let mut attributes = Attributes::new();
        attributes.insert(Attribute::ContentType, content_type.to_string().into());
        let opts = PutOptions {
            attributes,
            ..Default::default()
        };

        let result: ObjectResult<_> = self
            .store
            .put_opts(&location, PutPayload::from(Bytes::from(buffer)), opts)
            .await;

        result.map_err(|e| {
            tracing::error!(
                error = %e,
                bucket = %self.bucket,
                key = %key,
                size_bytes = size,
                duration_ms = start.elapsed().as_secs_f64() * 1000.0,
                "S3 upload failed"
            );
            StorageError::UploadFailed(e.to_string())
        })?;

        let url = self.public_url(key);

        tracing::info!(
            bucket = %self.bucket,
            key = %key,
            size_bytes = size,
            duration_ms = start.elapsed().as_secs_f64() * 1000.0,
            "S3 upload successful"
        );

        Ok(url)
    }

    fn public_url(&self, key: &str) -> String {
        object_url(self.endpoint_url.as_deref(), &self.bucket, &self.region, key)
    }

    fn backend_type(&self) -> StorageBackend {
        StorageBackend::S3
    }
}
