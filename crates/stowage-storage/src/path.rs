//! Directory path normalization

use stowage_core::AppError;

/// Platform path separator
pub const FILE_SEPARATOR: char = std::path::MAIN_SEPARATOR;

/// Make sure a directory path ends with the platform separator.
///
/// Blank input (empty or whitespace only) is rejected.
pub fn normalize_directory(dir: &str) -> Result<String, AppError> {
    if dir.trim().is_empty() {
        return Err(AppError::InvalidInput(
            "Directory full name must not be blank".to_string(),
        ));
    }

    if dir.ends_with(FILE_SEPARATOR) {
        Ok(dir.to_string())
    } else {
        Ok(format!("{}{}", dir, FILE_SEPARATOR))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_appends_separator() {
        let dir = format!("{0}var{0}uploads", FILE_SEPARATOR);
        assert_eq!(
            normalize_directory(&dir).unwrap(),
            format!("{}{}", dir, FILE_SEPARATOR)
        );
    }

    #[test]
    fn test_keeps_existing_separator() {
        let dir = format!("{0}var{0}uploads{0}", FILE_SEPARATOR);
        assert_eq!(normalize_directory(&dir).unwrap(), dir);
    }

    #[test]
    fn test_idempotent() {
        let once = normalize_directory("data").unwrap();
        assert_eq!(normalize_directory(&once).unwrap(), once);
    }

    #[test]
    fn test_blank_rejected() {
        for dir in ["", "   ", "\t\n"] {
            let err = normalize_directory(dir).unwrap_err();
            assert!(matches!(err, AppError::InvalidInput(_)));
            assert_eq!(
                err.to_string(),
                "Invalid input: Directory full name must not be blank"
            );
        }
    }
}
