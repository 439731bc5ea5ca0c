//! Upload results and their outward-facing representation.

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::storage_types::AttachmentType;

/// Normalized record produced by a file handler after a successful store.
///
/// Width and height are only present when the payload was an image whose
/// header could be decoded. Once image metadata has been handled the
/// thumbnail path is never blank: it falls back to `file_path`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct UploadResult {
    /// Backend-specific key used to delete the file later
    pub key: String,
    /// Public path or URL of the stored file
    pub file_path: String,
    /// Lowercased file extension
    pub suffix: String,
    /// Original filename
    pub filename: String,
    /// Declared MIME type
    #[serde(skip_serializing_if = "Option::is_none")]
    pub media_type: Option<String>,
    /// Size in bytes
    pub size: u64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub width: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub height: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub thumb_path: Option<String>,
}

impl UploadResult {
    pub fn new(
        key: impl Into<String>,
        file_path: impl Into<String>,
        suffix: impl Into<String>,
    ) -> Self {
        Self {
            key: key.into(),
            file_path: file_path.into(),
            suffix: suffix.into(),
            filename: String::new(),
            media_type: None,
            size: 0,
            width: None,
            height: None,
            thumb_path: None,
        }
    }

    pub fn with_source(
        mut self,
        filename: impl Into<String>,
        media_type: Option<String>,
        size: u64,
    ) -> Self {
        self.filename = filename.into();
        self.media_type = media_type;
        self.size = size;
        self
    }

    /// Whether the thumbnail path is unset or only whitespace
    pub fn thumb_path_is_blank(&self) -> bool {
        self.thumb_path
            .as_deref()
            .map(|p| p.trim().is_empty())
            .unwrap_or(true)
    }
}

/// Attachment as returned to API clients.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct AttachmentDto {
    pub key: String,
    pub name: String,
    pub path: String,
    pub thumb_path: String,
    pub suffix: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub media_type: Option<String>,
    pub size: u64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub width: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub height: Option<u32>,
    #[serde(rename = "type")]
    pub attachment_type: AttachmentType,
}

impl From<&(UploadResult, AttachmentType)> for AttachmentDto {
    fn from((result, attachment_type): &(UploadResult, AttachmentType)) -> Self {
        Self {
            key: result.key.clone(),
            name: result.filename.clone(),
            path: result.file_path.clone(),
            thumb_path: result
                .thumb_path
                .clone()
                .unwrap_or_else(|| result.file_path.clone()),
            suffix: result.suffix.clone(),
            media_type: result.media_type.clone(),
            size: result.size,
            width: result.width,
            height: result.height,
            attachment_type: *attachment_type,
        }
    }
}
