use crate::local::LocalFileHandler;
use crate::registry::FileHandlers;
use crate::s3::S3FileHandler;
use crate::traits::{FileOperationError, FileResult};
use std::sync::Arc;
use stowage_core::{AttachmentType, Config};

/// Build the handler registry from configuration.
///
/// One handler is created per configured backend. The default attachment
/// type must be among them.
pub async fn create_handlers(config: &Config) -> FileResult<FileHandlers> {
    let mut handlers = FileHandlers::new(config.default_attachment_type);

    if let Some(local) = &config.local {
        let handler = LocalFileHandler::new(&local.path, local.base_url.clone())
            .await?
            .with_thumbnail_size(config.thumbnail_max_width, config.thumbnail_max_height);
        handlers.register(Arc::new(handler));
    }

    if let Some(s3) = &config.s3 {
        handlers.register(Arc::new(S3FileHandler::new(s3, AttachmentType::S3)?));
    }

    if let Some(minio) = &config.minio {
        handlers.register(Arc::new(S3FileHandler::new(minio, AttachmentType::Minio)?));
    }

    if handlers.get(config.default_attachment_type).is_err() {
        return Err(FileOperationError::Config(format!(
            "No handler configured for default attachment type {}",
            config.default_attachment_type
        )));
    }

    tracing::info!(
        default = %config.default_attachment_type,
        enabled = ?handlers.attachment_types(),
        "File handlers initialized"
    );

    Ok(handlers)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn config_from(pairs: &[(&str, &str)]) -> Config {
        let vars: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        Config::from_lookup(|key| vars.get(key).cloned()).unwrap()
    }

    #[tokio::test]
    async fn test_local_only() {
        let dir = tempfile::tempdir().unwrap();
        let config = config_from(&[("LOCAL_STORAGE_PATH", dir.path().to_str().unwrap())]);

        let handlers = create_handlers(&config).await.unwrap();

        assert_eq!(handlers.default_type(), AttachmentType::Local);
        assert_eq!(handlers.attachment_types(), vec![AttachmentType::Local]);
    }

    #[tokio::test]
    async fn test_minio_handler() {
        let dir = tempfile::tempdir().unwrap();
        let config = config_from(&[
            ("LOCAL_STORAGE_PATH", dir.path().to_str().unwrap()),
            ("MINIO_ENDPOINT", "http://localhost:9000"),
            ("MINIO_BUCKET", "uploads"),
            ("MINIO_ACCESS_KEY", "minioadmin"),
            ("MINIO_SECRET_KEY", "minioadmin"),
        ]);

        let handlers = create_handlers(&config).await.unwrap();

        assert_eq!(
            handlers.attachment_types(),
            vec![AttachmentType::Local, AttachmentType::Minio]
        );
        assert_eq!(
            handlers.get(AttachmentType::Minio).unwrap().attachment_type(),
            AttachmentType::Minio
        );
    }

    #[tokio::test]
    async fn test_missing_default_handler() {
        let config = config_from(&[("STORAGE_BACKEND", "s3")]);
        let err = create_handlers(&config).await.err().unwrap();
        assert!(matches!(err, FileOperationError::Config(_)));
    }
}
