//! End-to-end upload pipeline: configuration, dispatch, storage, metadata.

use image::{ImageFormat, Rgba, RgbaImage};
use object_store::memory::InMemory;
use std::collections::HashMap;
use std::io::Cursor;
use std::sync::Arc;
use stowage_core::config::ObjectStorageConfig;
use stowage_core::{AttachmentDto, AttachmentType, Config, OutputConverter, UploadFile};
use stowage_storage::keys::thumbnail_key;
use stowage_storage::{create_handlers, FileHandlers, FileOperationError, S3FileHandler};

fn png(width: u32, height: u32) -> Vec<u8> {
    let img = RgbaImage::from_pixel(width, height, Rgba([90, 90, 90, 255]));
    let mut buffer = Vec::new();
    img.write_to(&mut Cursor::new(&mut buffer), ImageFormat::Png)
        .unwrap();
    buffer
}

fn local_config(dir: &std::path::Path) -> Config {
    let vars: HashMap<&str, String> = HashMap::from([
        ("LOCAL_STORAGE_PATH", dir.to_str().unwrap().to_string()),
        ("LOCAL_STORAGE_BASE_URL", "https://cdn.example.com/files".to_string()),
        ("THUMBNAIL_MAX_WIDTH", "64".to_string()),
        ("THUMBNAIL_MAX_HEIGHT", "64".to_string()),
    ]);
    Config::from_lookup(|key| vars.get(key).cloned()).unwrap()
}

async fn handlers_with_memory_s3(dir: &std::path::Path) -> FileHandlers {
    let mut handlers = create_handlers(&local_config(dir)).await.unwrap();
    let s3_config = ObjectStorageConfig {
        bucket: "media".to_string(),
        region: "us-east-1".to_string(),
        endpoint: None,
        access_key_id: None,
        secret_access_key: None,
        thumbnail_style: Some("?style=thumb".to_string()),
    };
    handlers.register(Arc::new(S3FileHandler::with_store(
        Arc::new(InMemory::new()),
        &s3_config,
        AttachmentType::S3,
    )));
    handlers
}

#[tokio::test]
async fn test_local_image_upload_and_delete() {
    let dir = tempfile::tempdir().unwrap();
    let handlers = create_handlers(&local_config(dir.path())).await.unwrap();

    let file = UploadFile::from_bytes("Team Photo.png", Some("image/png".to_string()), png(640, 480));
    let result = handlers.upload(&file).await.unwrap();

    assert_eq!(result.width, Some(640));
    assert_eq!(result.height, Some(480));
    assert!(result.file_path.starts_with("https://cdn.example.com/files/upload/"));

    let thumb_key = thumbnail_key(&result.key);
    let thumb = image::open(dir.path().join(&thumb_key)).unwrap();
    assert_eq!((thumb.width(), thumb.height()), (64, 48));

    let dto = AttachmentDto::convert_from(&(result.clone(), AttachmentType::Local));
    assert_eq!(dto.name, "Team Photo.png");
    assert_eq!(dto.thumb_path, format!("https://cdn.example.com/files/{}", thumb_key));

    handlers.delete(&result.key, AttachmentType::Local).await.unwrap();
    assert!(!dir.path().join(&result.key).exists());
    assert!(!dir.path().join(&thumb_key).exists());

    // Second delete of the same key is a no-op
    handlers.delete(&result.key, AttachmentType::Local).await.unwrap();
}

#[tokio::test]
async fn test_routes_between_backends() {
    let dir = tempfile::tempdir().unwrap();
    let handlers = handlers_with_memory_s3(dir.path()).await;

    let pdf = UploadFile::from_bytes("manual.pdf", Some("application/pdf".to_string()), "%PDF-1.7");
    let local = handlers.upload(&pdf).await.unwrap();
    let remote = handlers
        .upload_to(&pdf, AttachmentType::S3)
        .await
        .unwrap();

    assert!(dir.path().join(&local.key).exists());
    assert!(remote
        .file_path
        .starts_with("https://media.s3.us-east-1.amazonaws.com/upload/"));
    assert_eq!(remote.thumb_path.as_deref(), Some(remote.file_path.as_str()));

    let image = UploadFile::from_bytes("logo.png", Some("image/png".to_string()), png(10, 10));
    let remote_image = handlers.upload_to(&image, AttachmentType::S3).await.unwrap();
    assert_eq!(
        remote_image.thumb_path,
        Some(format!("{}?style=thumb", remote_image.file_path))
    );

    let dtos = AttachmentDto::convert_all(&[
        (local.clone(), AttachmentType::Local),
        (remote.clone(), AttachmentType::S3),
    ]);
    let json = serde_json::to_value(&dtos).unwrap();
    assert_eq!(json[0]["type"], "local");
    assert_eq!(json[1]["type"], "s3");

    handlers.delete(&remote.key, AttachmentType::S3).await.unwrap();
    handlers.delete(&local.key, AttachmentType::Local).await.unwrap();
    assert!(!dir.path().join(&local.key).exists());
}

#[tokio::test]
async fn test_minio_not_configured() {
    let dir = tempfile::tempdir().unwrap();
    let handlers = handlers_with_memory_s3(dir.path()).await;

    let file = UploadFile::from_bytes("a.txt", Some("text/plain".to_string()), "a");
    let err = handlers
        .upload_to(&file, AttachmentType::Minio)
        .await
        .unwrap_err();
    assert!(matches!(
        err,
        FileOperationError::UnsupportedAttachmentType(AttachmentType::Minio)
    ));
    assert_eq!(
        err.to_string(),
        "No file handler registered for attachment type minio"
    );
}
