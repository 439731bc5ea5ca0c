//! Configuration module
//!
//! Environment-driven settings for the file handlers and the thumbnail/logging
//! behaviour around them. A `.env` file is honoured when present.

use std::env;

use crate::storage_types::AttachmentType;

const THUMBNAIL_MAX_WIDTH: u32 = 256;
const THUMBNAIL_MAX_HEIGHT: u32 = 256;
const DEFAULT_MINIO_REGION: &str = "us-east-1";

/// Local filesystem handler settings
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct LocalStorageConfig {
    pub path: String,
    pub base_url: String,
}

/// S3-compatible handler settings (AWS S3 or MinIO)
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ObjectStorageConfig {
    pub bucket: String,
    pub region: String,
    /// Custom endpoint for S3-compatible providers
    pub endpoint: Option<String>,
    pub access_key_id: Option<String>,
    pub secret_access_key: Option<String>,
    /// URL suffix the provider's image service turns into a thumbnail
    pub thumbnail_style: Option<String>,
}

/// Application configuration
#[derive(Clone, Debug)]
pub struct Config {
    pub environment: String,
    /// Handler used when the caller does not pick one
    pub default_attachment_type: AttachmentType,
    pub local: Option<LocalStorageConfig>,
    pub s3: Option<ObjectStorageConfig>,
    pub minio: Option<ObjectStorageConfig>,
    pub thumbnail_max_width: u32,
    pub thumbnail_max_height: u32,
    pub log_json: bool,
}

impl Config {
    /// Load from the process environment (and `.env`), then validate
    pub fn from_env() -> Result<Self, anyhow::Error> {
        let _ = dotenvy::dotenv();
        let config = Self::from_lookup(|key| env::var(key).ok())?;
        config.validate()?;
        Ok(config)
    }

    /// Build from an arbitrary key lookup; empty values count as unset
    pub fn from_lookup<F>(lookup: F) -> Result<Self, anyhow::Error>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        let default_attachment_type = match get("STORAGE_BACKEND") {
            Some(value) => value.parse()?,
            None => AttachmentType::Local,
        };

        let local = get("LOCAL_STORAGE_PATH").map(|path| LocalStorageConfig {
            path,
            base_url: get("LOCAL_STORAGE_BASE_URL").unwrap_or_else(|| "/".to_string()),
        });

        let s3 = match get("S3_BUCKET") {
            Some(bucket) => Some(ObjectStorageConfig {
                bucket,
                region: get("S3_REGION").or_else(|| get("AWS_REGION")).ok_or_else(|| {
                    anyhow::anyhow!("S3_REGION or AWS_REGION must be set when S3_BUCKET is set")
                })?,
                endpoint: get("S3_ENDPOINT"),
                access_key_id: None,
                secret_access_key: None,
                thumbnail_style: get("S3_THUMBNAIL_STYLE"),
            }),
            None => None,
        };

        let minio = match get("MINIO_ENDPOINT") {
            Some(endpoint) => Some(ObjectStorageConfig {
                bucket: get("MINIO_BUCKET").ok_or_else(|| {
                    anyhow::anyhow!("MINIO_BUCKET must be set when MINIO_ENDPOINT is set")
                })?,
                region: get("MINIO_REGION").unwrap_or_else(|| DEFAULT_MINIO_REGION.to_string()),
                endpoint: Some(endpoint),
                access_key_id: get("MINIO_ACCESS_KEY"),
                secret_access_key: get("MINIO_SECRET_KEY"),
                thumbnail_style: None,
            }),
            None => None,
        };

        Ok(Config {
            environment: get("ENVIRONMENT")
                .or_else(|| get("APP_ENV"))
                .unwrap_or_else(|| "development".to_string()),
            default_attachment_type,
            local,
            s3,
            minio,
            thumbnail_max_width: get("THUMBNAIL_MAX_WIDTH")
                .and_then(|s| s.parse().ok())
                .filter(|&w| w > 0)
                .unwrap_or(THUMBNAIL_MAX_WIDTH),
            thumbnail_max_height: get("THUMBNAIL_MAX_HEIGHT")
                .and_then(|s| s.parse().ok())
                .filter(|&h| h > 0)
                .unwrap_or(THUMBNAIL_MAX_HEIGHT),
            log_json: get("LOG_FORMAT")
                .map(|f| f.eq_ignore_ascii_case("json"))
                .unwrap_or(false),
        })
    }

    /// Check if the application is running in production mode
    pub fn is_production(&self) -> bool {
        let env = self.environment.to_lowercase();
        env == "production" || env == "prod"
    }

    /// Attachment types with a configured handler
    pub fn enabled_attachment_types(&self) -> Vec<AttachmentType> {
        AttachmentType::ALL
            .into_iter()
            .filter(|ty| self.is_enabled(*ty))
            .collect()
    }

    pub fn is_enabled(&self, attachment_type: AttachmentType) -> bool {
        match attachment_type {
            AttachmentType::Local => self.local.is_some(),
            AttachmentType::S3 => self.s3.is_some(),
            AttachmentType::Minio => self.minio.is_some(),
        }
    }

    pub fn validate(&self) -> Result<(), anyhow::Error> {
        if !self.is_enabled(self.default_attachment_type) {
            let hint = match self.default_attachment_type {
                AttachmentType::Local => "LOCAL_STORAGE_PATH",
                AttachmentType::S3 => "S3_BUCKET and S3_REGION",
                AttachmentType::Minio => "MINIO_ENDPOINT and MINIO_BUCKET",
            };
            return Err(anyhow::anyhow!(
                "STORAGE_BACKEND={} requires {} to be set",
                self.default_attachment_type,
                hint
            ));
        }

        if let Some(minio) = &self.minio {
            if minio.access_key_id.is_some() != minio.secret_access_key.is_some() {
                return Err(anyhow::anyhow!(
                    "MINIO_ACCESS_KEY and MINIO_SECRET_KEY must be set together"
                ));
            }
        }

        Ok(())
    }
}
