//! Upload dispatcher
//!
//! Routes uploads and deletes to the handler registered for an attachment
//! type. Payloads are validated before any handler sees them.

use crate::traits::{FileHandler, FileOperationError, FileResult};
use std::collections::HashMap;
use std::sync::Arc;
use stowage_core::validation::validate;
use stowage_core::{AttachmentType, UploadFile, UploadResult};

/// Registry of file handlers keyed by attachment type
#[derive(Clone)]
pub struct FileHandlers {
    handlers: HashMap<AttachmentType, Arc<dyn FileHandler>>,
    default_type: AttachmentType,
}

impl FileHandlers {
    pub fn new(default_type: AttachmentType) -> Self {
        FileHandlers {
            handlers: HashMap::new(),
            default_type,
        }
    }

    /// Register a handler under its own attachment type, replacing any previous one
    pub fn register(&mut self, handler: Arc<dyn FileHandler>) -> Option<Arc<dyn FileHandler>> {
        self.handlers.insert(handler.attachment_type(), handler)
    }

    pub fn with_handler(mut self, handler: Arc<dyn FileHandler>) -> Self {
        self.register(handler);
        self
    }

    pub fn default_type(&self) -> AttachmentType {
        self.default_type
    }

    /// Registered attachment types, in declaration order
    pub fn attachment_types(&self) -> Vec<AttachmentType> {
        AttachmentType::ALL
            .into_iter()
            .filter(|ty| self.handlers.contains_key(ty))
            .collect()
    }

    pub fn get(&self, attachment_type: AttachmentType) -> FileResult<&Arc<dyn FileHandler>> {
        self.handlers
            .get(&attachment_type)
            .ok_or(FileOperationError::UnsupportedAttachmentType(attachment_type))
    }

    /// Upload with the default attachment type
    pub async fn upload(&self, file: &UploadFile) -> FileResult<UploadResult> {
        self.upload_to(file, self.default_type).await
    }

    pub async fn upload_to(
        &self,
        file: &UploadFile,
        attachment_type: AttachmentType,
    ) -> FileResult<UploadResult> {
        validate(file)?;
        let handler = self.get(attachment_type)?;

        tracing::debug!(
            filename = %file.filename,
            content_type = file.content_type().unwrap_or_default(),
            attachment_type = %attachment_type,
            "Dispatching upload"
        );

        handler.upload(file).await
    }

    /// Delete `key` through the handler that owns `attachment_type`
    pub async fn delete(&self, key: &str, attachment_type: AttachmentType) -> FileResult<()> {
        self.get(attachment_type)?.delete(key).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use std::sync::Mutex;

    struct RecordingHandler {
        attachment_type: AttachmentType,
        calls: Mutex<Vec<String>>,
    }

    impl RecordingHandler {
        fn new(attachment_type: AttachmentType) -> Arc<Self> {
            Arc::new(RecordingHandler {
                attachment_type,
                calls: Mutex::new(Vec::new()),
            })
        }

        fn calls(&self) -> Vec<String> {
            self.calls.lock().unwrap().clone()
        }
    }

    #[async_trait]
    impl FileHandler for RecordingHandler {
        async fn upload(&self, file: &UploadFile) -> FileResult<UploadResult> {
            self.calls
                .lock()
                .unwrap()
                .push(format!("upload {}", file.filename));
            let key = format!("k/{}", file.filename);
            Ok(UploadResult::new(key.clone(), format!("/files/{}", key), file.suffix()))
        }

        async fn delete(&self, key: &str) -> FileResult<()> {
            self.calls.lock().unwrap().push(format!("delete {}", key));
            Ok(())
        }

        fn attachment_type(&self) -> AttachmentType {
            self.attachment_type
        }
    }

    fn text(name: &str) -> UploadFile {
        UploadFile::from_bytes(name, Some("text/plain".to_string()), "x")
    }

    #[tokio::test]
    async fn test_upload_uses_default_type() {
        let local = RecordingHandler::new(AttachmentType::Local);
        let s3 = RecordingHandler::new(AttachmentType::S3);
        let handlers = FileHandlers::new(AttachmentType::S3)
            .with_handler(local.clone())
            .with_handler(s3.clone());

        let result = handlers.upload(&text("a.txt")).await.unwrap();

        assert_eq!(result.key, "k/a.txt");
        assert_eq!(s3.calls(), vec!["upload a.txt"]);
        assert!(local.calls().is_empty());
    }

    #[tokio::test]
    async fn test_delete_routes_by_type() {
        let local = RecordingHandler::new(AttachmentType::Local);
        let minio = RecordingHandler::new(AttachmentType::Minio);
        let handlers = FileHandlers::new(AttachmentType::Local)
            .with_handler(local.clone())
            .with_handler(minio.clone());

        handlers.delete("k/a.txt", AttachmentType::Minio).await.unwrap();

        assert_eq!(minio.calls(), vec!["delete k/a.txt"]);
        assert!(local.calls().is_empty());
    }

    #[tokio::test]
    async fn test_unregistered_type() {
        let handlers =
            FileHandlers::new(AttachmentType::Local).with_handler(RecordingHandler::new(AttachmentType::Local));

        let err = handlers
            .upload_to(&text("a.txt"), AttachmentType::S3)
            .await
            .unwrap_err();
        assert!(matches!(
            err,
            FileOperationError::UnsupportedAttachmentType(AttachmentType::S3)
        ));

        let err = handlers.delete("k", AttachmentType::Minio).await.unwrap_err();
        assert!(matches!(
            err,
            FileOperationError::UnsupportedAttachmentType(AttachmentType::Minio)
        ));
    }

    #[tokio::test]
    async fn test_invalid_payload_never_reaches_handler() {
        let local = RecordingHandler::new(AttachmentType::Local);
        let handlers = FileHandlers::new(AttachmentType::Local).with_handler(local.clone());

        let err = handlers.upload(&text("")).await.unwrap_err();

        match err {
            FileOperationError::InvalidPayload(violations) => {
                assert_eq!(violations.violations()[0].path, "filename");
            }
            other => panic!("unexpected error: {other}"),
        }
        assert!(local.calls().is_empty());
    }

    #[test]
    fn test_register_replaces() {
        let mut handlers = FileHandlers::new(AttachmentType::Local);
        assert!(handlers
            .register(RecordingHandler::new(AttachmentType::Local))
            .is_none());
        assert!(handlers
            .register(RecordingHandler::new(AttachmentType::Local))
            .is_some());
        handlers.register(RecordingHandler::new(AttachmentType::Minio));

        assert_eq!(
            handlers.attachment_types(),
            vec![AttachmentType::Local, AttachmentType::Minio]
        );
    }
}
