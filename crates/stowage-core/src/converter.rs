//! Output DTO conversion.
//!
//! DTOs declare how they are built from a domain value by implementing
//! `From<&Domain>`; [`OutputConverter`] is then available for free.

/// Converter for output DTOs built from a domain value.
pub trait OutputConverter<D>: Sized {
    /// Convert from domain (shallow copy of the mapped fields)
    fn convert_from(domain: &D) -> Self;

    /// Convert every domain value of an iterator
    fn convert_all<'a, I>(domains: I) -> Vec<Self>
    where
        I: IntoIterator<Item = &'a D>,
        D: 'a,
    {
        domains.into_iter().map(Self::convert_from).collect()
    }
}

impl<D, T> OutputConverter<D> for T
where
    T: for<'a> From<&'a D>,
{
    fn convert_from(domain: &D) -> Self {
        T::from(domain)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{AttachmentDto, AttachmentType, UploadResult};

    #[test]
    fn test_convert_upload_result() {
        let mut result = UploadResult::new("upload/a.png", "http://cdn/upload/a.png", "png")
            .with_source("a.png", Some("image/png".to_string()), 42);
        result.width = Some(100);
        result.height = Some(200);

        let dto = AttachmentDto::convert_from(&(result, AttachmentType::Local));
        assert_eq!(dto.key, "upload/a.png");
        assert_eq!(dto.name, "a.png");
        assert_eq!(dto.width, Some(100));
        assert_eq!(dto.height, Some(200));
        assert_eq!(dto.thumb_path, "http://cdn/upload/a.png");
        assert_eq!(dto.attachment_type, AttachmentType::Local);

        let json = serde_json::to_value(&dto).unwrap();
        assert_eq!(json["thumbPath"], "http://cdn/upload/a.png");
        assert_eq!(json["type"], "local");
    }

    #[test]
    fn test_convert_all() {
        let items = vec![
            (UploadResult::new("a", "/a", "txt"), AttachmentType::S3),
            (UploadResult::new("b", "/b", "txt"), AttachmentType::Minio),
        ];
        let dtos = AttachmentDto::convert_all(&items);
        assert_eq!(dtos.len(), 2);
        assert_eq!(dtos[1].attachment_type, AttachmentType::Minio);
    }
}
