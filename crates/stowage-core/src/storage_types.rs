use std::fmt::{Display, Formatter, Result as FmtResult};
use std::str::FromStr;

/// Attachment (storage backend) types
///
/// Identifies which file handler produced, and therefore owns, an uploaded file.
/// It's defined in core because it's used in configuration, DTOs and routing.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize, utoipa::ToSchema,
)]
#[serde(rename_all = "lowercase")]
pub enum AttachmentType {
    /// Local filesystem under a work directory
    Local,
    /// AWS S3 object storage
    S3,
    /// Self-hosted S3-compatible storage (MinIO)
    Minio,
}

impl AttachmentType {
    pub const ALL: [AttachmentType; 3] = [
        AttachmentType::Local,
        AttachmentType::S3,
        AttachmentType::Minio,
    ];
}

impl FromStr for AttachmentType {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "local" => Ok(AttachmentType::Local),
            "s3" => Ok(AttachmentType::S3),
            "minio" => Ok(AttachmentType::Minio),
            _ => Err(anyhow::anyhow!("Invalid attachment type: {}", s)),
        }
    }
}

impl Display for AttachmentType {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        match self {
            AttachmentType::Local => write!(f, "local"),
            AttachmentType::S3 => write!(f, "s3"),
            AttachmentType::Minio => write!(f, "minio"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_case_insensitive() {
        assert_eq!("LOCAL".parse::<AttachmentType>().unwrap(), AttachmentType::Local);
        assert_eq!(" s3 ".parse::<AttachmentType>().unwrap(), AttachmentType::S3);
        assert_eq!("MinIO".parse::<AttachmentType>().unwrap(), AttachmentType::Minio);
        assert!("nfs".parse::<AttachmentType>().is_err());
    }

    #[test]
    fn test_display_matches_serde() {
        for ty in AttachmentType::ALL {
            let json = serde_json::to_string(&ty).unwrap();
            assert_eq!(json, format!("\"{}\"", ty));
            assert_eq!(ty.to_string().parse::<AttachmentType>().unwrap(), ty);
        }
    }
}
