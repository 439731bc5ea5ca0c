use crate::enrich::enrich_on_blocking_thread;
use crate::keys::{generate_key, sanitize_suffix, validate_key};
use crate::traits::{FileHandler, FileOperationError, FileResult};
use async_trait::async_trait;
use chrono::Utc;
use object_store::aws::AmazonS3Builder;
use object_store::path::Path;
use object_store::Error as ObjectStoreError;
use object_store::{ObjectStore, ObjectStoreExt, PutPayload};
use std::sync::Arc;
use std::time::Instant;
use stowage_core::config::ObjectStorageConfig;
use stowage_core::{AttachmentType, UploadFile, UploadResult};
use stowage_processing::{handle_image_metadata, ThumbnailSupplier};

/// File handler for S3 and S3-compatible providers (MinIO)
#[derive(Clone)]
pub struct S3FileHandler {
    store: Arc<dyn ObjectStore>,
    attachment_type: AttachmentType,
    bucket: String,
    region: String,
    endpoint_url: Option<String>,
    thumbnail_style: Option<String>,
}

impl S3FileHandler {
    /// Create a handler backed by `AmazonS3`.
    ///
    /// Credentials come from the config when both keys are set, otherwise
    /// from the standard AWS environment variables.
    pub fn new(config: &ObjectStorageConfig, attachment_type: AttachmentType) -> FileResult<Self> {
        let mut builder = AmazonS3Builder::from_env()
            .with_region(config.region.clone())
            .with_bucket_name(config.bucket.clone());

        if let Some(ref endpoint) = config.endpoint {
            let allow_http = endpoint.starts_with("http://");
            builder = builder
                .with_endpoint(endpoint.clone())
                .with_allow_http(allow_http);
        }

        if let (Some(access_key_id), Some(secret)) =
            (&config.access_key_id, &config.secret_access_key)
        {
            builder = builder
                .with_access_key_id(access_key_id.clone())
                .with_secret_access_key(secret.clone());
        }

        let store = builder
            .build()
            .map_err(|e| FileOperationError::Config(e.to_string()))?;

        Ok(Self::with_store(Arc::new(store), config, attachment_type))
    }

    /// Create a handler over an existing object store
    pub fn with_store(
        store: Arc<dyn ObjectStore>,
        config: &ObjectStorageConfig,
        attachment_type: AttachmentType,
    ) -> Self {
        S3FileHandler {
            store,
            attachment_type,
            bucket: config.bucket.clone(),
            region: config.region.clone(),
            endpoint_url: config.endpoint.clone(),
            thumbnail_style: config
                .thumbnail_style
                .clone()
                .filter(|s| !s.trim().is_empty()),
        }
    }

    /// Public URL for an object
    ///
    /// AWS uses virtual-hosted style: https://{bucket}.s3.{region}.amazonaws.com/{key}
    /// Custom endpoints use path style: {endpoint}/{bucket}/{key}
    fn generate_url(&self, key: &str) -> String {
        if let Some(ref endpoint) = self.endpoint_url {
            format!("{}/{}/{}", endpoint.trim_end_matches('/'), self.bucket, key)
        } else {
            format!(
                "https://{}.s3.{}.amazonaws.com/{}",
                self.bucket, self.region, key
            )
        }
    }
}

#[async_trait]
impl FileHandler for S3FileHandler {
    async fn upload(&self, file: &UploadFile) -> FileResult<UploadResult> {
        let suffix = sanitize_suffix(&file.suffix());
        let key = generate_key(&file.stem(), &suffix, Utc::now())?;
        let data = file.read_bytes().await.map_err(|e| {
            FileOperationError::UploadFailed(format!("Failed to read payload: {}", e))
        })?;
        let size = data.len() as u64;
        let location = Path::from(key.as_str());

        let start = Instant::now();

        self.store
            .put(&location, PutPayload::from(data))
            .await
            .map_err(|e| {
                tracing::error!(
                    error = %e,
                    bucket = %self.bucket,
                    key = %key,
                    size_bytes = size,
                    duration_ms = start.elapsed().as_secs_f64() * 1000.0,
                    "S3 upload failed"
                );
                FileOperationError::UploadFailed(e.to_string())
            })?;

        let file_path = self.generate_url(&key);

        tracing::info!(
            bucket = %self.bucket,
            key = %key,
            size_bytes = size,
            attachment_type = %self.attachment_type,
            duration_ms = start.elapsed().as_secs_f64() * 1000.0,
            "S3 upload successful"
        );

        let result = UploadResult::new(key, file_path, suffix).with_source(
            file.filename.clone(),
            file.content_type.clone(),
            size,
        );

        let style = self.thumbnail_style.clone();
        Ok(enrich_on_blocking_thread(file, result, move |file, result| {
            let thumbnail = style.map(|style| {
                let url = result.file_path.clone();
                Box::new(move || format!("{}{}", url, style)) as ThumbnailSupplier<'static>
            });
            handle_image_metadata(file, result, thumbnail);
        })
        .await)
    }

    async fn delete(&self, key: &str) -> FileResult<()> {
        validate_key(key)?;
        let location = Path::from(key);
        let start = Instant::now();

        match self.store.delete(&location).await {
            Ok(()) => {
                tracing::info!(
                    bucket = %self.bucket,
                    key = %key,
                    duration_ms = start.elapsed().as_secs_f64() * 1000.0,
                    "S3 delete successful"
                );
                Ok(())
            }
            Err(ObjectStoreError::NotFound { .. }) => {
                tracing::debug!(bucket = %self.bucket, key = %key, "S3 object already absent");
                Ok(())
            }
            Err(e) => {
                tracing::error!(
                    error = %e,
                    bucket = %self.bucket,
                    key = %key,
                    duration_ms = start.elapsed().as_secs_f64() * 1000.0,
                    "S3 delete failed"
                );
                Err(FileOperationError::DeleteFailed(e.to_string()))
            }
        }
    }

    fn attachment_type(&self) -> AttachmentType {
        self.attachment_type
    }
}
