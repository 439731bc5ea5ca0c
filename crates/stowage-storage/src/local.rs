use crate::enrich::enrich_on_blocking_thread;
use crate::keys::{generate_key, sanitize_suffix, thumbnail_key, validate_key};
use crate::path::normalize_directory;
use crate::traits::{FileHandler, FileOperationError, FileResult};
use async_trait::async_trait;
use chrono::Utc;
use std::path::{Path, PathBuf};
use std::time::Instant;
use stowage_core::{AttachmentType, FileBody, UploadFile, UploadResult};
use stowage_processing::{handle_image_metadata, render_thumbnail, ThumbnailSupplier};
use tokio::fs;
use tokio::io::AsyncWriteExt;

const DEFAULT_THUMBNAIL_SIZE: u32 = 256;

/// Local filesystem file handler
#[derive(Clone)]
pub struct LocalFileHandler {
    base_path: PathBuf,
    base_url: String,
    thumbnail_max_width: u32,
    thumbnail_max_height: u32,
}

impl LocalFileHandler {
    /// Create a new LocalFileHandler, creating the work directory if needed
    ///
    /// # Arguments
    /// * `work_dir` - Root directory for stored files (e.g., "/var/lib/stowage")
    /// * `base_url` - Base URL the files are served under (e.g., "http://localhost:3000/files")
    pub async fn new(work_dir: &str, base_url: impl Into<String>) -> FileResult<Self> {
        let work_dir =
            normalize_directory(work_dir).map_err(|e| FileOperationError::Config(e.to_string()))?;
        let base_path = PathBuf::from(work_dir);

        fs::create_dir_all(&base_path).await.map_err(|e| {
            FileOperationError::Config(format!(
                "Failed to create storage directory {}: {}",
                base_path.display(),
                e
            ))
        })?;

        Ok(LocalFileHandler {
            base_path,
            base_url: base_url.into(),
            thumbnail_max_width: DEFAULT_THUMBNAIL_SIZE,
            thumbnail_max_height: DEFAULT_THUMBNAIL_SIZE,
        })
    }

    /// Bounding box for rendered thumbnails
    pub fn with_thumbnail_size(mut self, max_width: u32, max_height: u32) -> Self {
        self.thumbnail_max_width = max_width;
        self.thumbnail_max_height = max_height;
        self
    }

    pub fn base_path(&self) -> &Path {
        &self.base_path
    }

    /// Convert a storage key to a filesystem path inside the work directory
    fn key_to_path(&self, key: &str) -> FileResult<PathBuf> {
        validate_key(key)?;

        let path = self.base_path.join(key);

        let base_canonical = self.base_path.canonicalize().map_err(|e| {
            FileOperationError::Config(format!("Failed to canonicalize base path: {}", e))
        })?;

        // Symlinks inside the work directory could still point elsewhere
        let existing = path
            .ancestors()
            .find(|p| p.exists())
            .unwrap_or(self.base_path.as_path());
        let resolved = existing.canonicalize()?;
        if !resolved.starts_with(&base_canonical) {
            return Err(FileOperationError::InvalidKey(
                "Storage key resolves outside storage directory".to_string(),
            ));
        }

        Ok(path)
    }

    /// Public URL for a key
    fn generate_url(&self, key: &str) -> String {
        format!("{}/{}", self.base_url.trim_end_matches('/'), key)
    }

    async fn ensure_parent_dir(&self, path: &Path) -> FileResult<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).await?;
        }
        Ok(())
    }

    /// Write the payload to `path`, returning the number of bytes written
    async fn write_payload(&self, file: &UploadFile, path: &Path) -> FileResult<u64> {
        match &file.body {
            FileBody::Memory(data) => {
                let mut out = fs::File::create(path).await.map_err(|e| {
                    FileOperationError::UploadFailed(format!(
                        "Failed to create file {}: {}",
                        path.display(),
                        e
                    ))
                })?;
                out.write_all(data).await.map_err(|e| {
                    FileOperationError::UploadFailed(format!(
                        "Failed to write file {}: {}",
                        path.display(),
                        e
                    ))
                })?;
                out.sync_all().await.map_err(|e| {
                    FileOperationError::UploadFailed(format!(
                        "Failed to sync file {}: {}",
                        path.display(),
                        e
                    ))
                })?;
                Ok(data.len() as u64)
            }
            FileBody::Disk(source) => fs::copy(source, path).await.map_err(|e| {
                FileOperationError::UploadFailed(format!(
                    "Failed to copy {} to {}: {}",
                    source.display(),
                    path.display(),
                    e
                ))
            }),
        }
    }

    /// Render the thumbnail for a stored image and return its URL.
    ///
    /// Returns an empty string when rendering fails.
    fn thumbnail_for(&self, source: &Path, key: &str) -> String {
        let thumb_key = thumbnail_key(key);
        let target = match self.key_to_path(&thumb_key) {
            Ok(target) => target,
            Err(e) => {
                tracing::warn!(error = %e, key = %thumb_key, "Invalid thumbnail key");
                return String::new();
            }
        };

        let start = Instant::now();
        match render_thumbnail(
            source,
            &target,
            self.thumbnail_max_width,
            self.thumbnail_max_height,
        ) {
            Ok((width, height)) => {
                tracing::debug!(
                    key = %thumb_key,
                    width,
                    height,
                    duration_ms = start.elapsed().as_secs_f64() * 1000.0,
                    "Thumbnail rendered"
                );
                self.generate_url(&thumb_key)
            }
            Err(e) => {
                tracing::warn!(error = %e, key = %thumb_key, "Thumbnail rendering failed");
                String::new()
            }
        }
    }

    async fn remove_if_exists(&self, path: &Path) -> FileResult<bool> {
        if !fs::try_exists(path).await.unwrap_or(false) {
            return Ok(false);
        }
        fs::remove_file(path).await.map_err(|e| {
            FileOperationError::DeleteFailed(format!(
                "Failed to delete file {}: {}",
                path.display(),
                e
            ))
        })?;
        Ok(true)
    }
}

#[async_trait]
impl FileHandler for LocalFileHandler {
    async fn upload(&self, file: &UploadFile) -> FileResult<UploadResult> {
        let suffix = sanitize_suffix(&file.suffix());
        let key = generate_key(&file.stem(), &suffix, Utc::now())?;
        let path = self.key_to_path(&key)?;

        self.ensure_parent_dir(&path).await?;

        let start = Instant::now();
        let size = self.write_payload(file, &path).await?;
        let file_path = self.generate_url(&key);

        tracing::info!(
            path = %path.display(),
            key = %key,
            size_bytes = size,
            duration_ms = start.elapsed().as_secs_f64() * 1000.0,
            "Local upload successful"
        );

        let result = UploadResult::new(key.clone(), file_path, suffix).with_source(
            file.filename.clone(),
            file.content_type.clone(),
            size,
        );

        let handler = self.clone();
        Ok(enrich_on_blocking_thread(file, result, move |file, result| {
            let thumbnail: ThumbnailSupplier<'_> = Box::new(|| handler.thumbnail_for(&path, &key));
            handle_image_metadata(file, result, Some(thumbnail));
        })
        .await)
    }

    async fn delete(&self, key: &str) -> FileResult<()> {
        let path = self.key_to_path(key)?;
        let thumb_path = self.key_to_path(&thumbnail_key(key))?;
        let start = Instant::now();

        let removed = self.remove_if_exists(&path).await?;
        let thumb_removed = self.remove_if_exists(&thumb_path).await?;

        if removed {
            tracing::info!(
                path = %path.display(),
                key = %key,
                thumbnail = thumb_removed,
                duration_ms = start.elapsed().as_secs_f64() * 1000.0,
                "Local delete successful"
            );
        } else {
            tracing::debug!(key = %key, "Local file already absent, nothing to delete");
        }

        Ok(())
    }

    fn attachment_type(&self) -> AttachmentType {
        AttachmentType::Local
    }
}
