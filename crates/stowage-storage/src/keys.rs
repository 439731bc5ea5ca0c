//! Shared key generation for file handlers.
//!
//! Key format: `upload/{yyyy}/{MM}/{stem}-{id}.{suffix}` where `stem` is the
//! sanitized original file stem and `id` is 8 random hex digits. Thumbnails
//! live next to their source as `{stem}-{id}-thumbnail.{suffix}`.

use chrono::{DateTime, Utc};
use regex::Regex;
use std::sync::LazyLock;
use uuid::Uuid;

use crate::traits::{FileOperationError, FileResult};

pub const UPLOAD_PREFIX: &str = "upload";
const THUMBNAIL_MARKER: &str = "-thumbnail";
const MAX_STEM_LEN: usize = 64;
const FALLBACK_STEM: &str = "file";
const MAX_SUFFIX_LEN: usize = 16;

static UNSAFE_STEM_CHARS: LazyLock<Result<Regex, regex::Error>> =
    LazyLock::new(|| Regex::new(r"[^A-Za-z0-9_-]+"));

/// Storage-safe form of a filename suffix.
///
/// Keeps the leading ASCII alphanumeric run, lowercased. Anything after it
/// (`#`, `?`, whitespace, path separators) is dropped, and an empty result
/// means the key has no extension.
pub fn sanitize_suffix(suffix: &str) -> String {
    suffix
        .trim()
        .chars()
        .take_while(char::is_ascii_alphanumeric)
        .take(MAX_SUFFIX_LEN)
        .map(|c| c.to_ascii_lowercase())
        .collect()
}

/// Generate a storage key for an upload received at `now`.
///
/// `suffix` is passed through [`sanitize_suffix`].
pub fn generate_key(stem: &str, suffix: &str, now: DateTime<Utc>) -> FileResult<String> {
    let stem = sanitize_stem(stem)?;
    let suffix = sanitize_suffix(suffix);
    let id = Uuid::new_v4().simple().to_string();

    let mut key = format!(
        "{}/{}/{}-{}",
        UPLOAD_PREFIX,
        now.format("%Y/%m"),
        stem,
        &id[..8]
    );
    if !suffix.is_empty() {
        key.push('.');
        key.push_str(&suffix);
    }
    Ok(key)
}

/// Key of the thumbnail stored next to `key`
pub fn thumbnail_key(key: &str) -> String {
    let name_start = key.rfind('/').map(|i| i + 1).unwrap_or(0);
    match key[name_start..].rfind('.') {
        Some(dot) if dot > 0 => {
            let dot = name_start + dot;
            format!("{}{}{}", &key[..dot], THUMBNAIL_MARKER, &key[dot..])
        }
        _ => format!("{}{}", key, THUMBNAIL_MARKER),
    }
}

/// Reject keys that are empty, absolute or contain parent references
pub fn validate_key(key: &str) -> FileResult<()> {
    if key.trim().is_empty() {
        return Err(FileOperationError::InvalidKey(
            "Storage key must not be empty".to_string(),
        ));
    }
    if key.contains("..") || key.starts_with('/') || key.starts_with('\\') {
        return Err(FileOperationError::InvalidKey(
            "Storage key contains invalid characters".to_string(),
        ));
    }
    Ok(())
}

fn sanitize_stem(stem: &str) -> FileResult<String> {
    let pattern = UNSAFE_STEM_CHARS
        .as_ref()
        .map_err(|e| FileOperationError::Config(format!("Invalid key pattern: {}", e)))?;

    let cleaned = pattern.replace_all(stem.trim(), "-");
    let cleaned: String = cleaned.trim_matches('-').chars().take(MAX_STEM_LEN).collect();

    if cleaned.is_empty() {
        Ok(FALLBACK_STEM.to_string())
    } else {
        Ok(cleaned)
    }
}
