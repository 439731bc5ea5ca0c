//! Object validation helpers
//!
//! Thin layer over the `validator` crate: runs `Validate` impls and reshapes
//! `ValidationErrors` into flat `path -> message` pairs for API responses.

use std::collections::HashMap;
use std::fmt;

use validator::{Validate, ValidationErrors, ValidationErrorsKind};

/// A single failed constraint
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConstraintViolation {
    /// Property path, e.g. `filename`, `owner.email`, `items[2].name`
    pub path: String,
    pub message: String,
}

/// All constraint violations found while validating one or more objects
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConstraintViolations(pub Vec<ConstraintViolation>);

impl ConstraintViolations {
    pub fn violations(&self) -> &[ConstraintViolation] {
        &self.0
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Flatten into a `path -> message` map
    pub fn to_map(&self) -> HashMap<String, String> {
        map_with_violations(&self.0)
    }
}

impl fmt::Display for ConstraintViolations {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let parts: Vec<String> = self
            .0
            .iter()
            .map(|v| format!("{}: {}", v.path, v.message))
            .collect();
        write!(f, "{}", parts.join(", "))
    }
}

impl std::error::Error for ConstraintViolations {}

impl From<ValidationErrors> for ConstraintViolations {
    fn from(errors: ValidationErrors) -> Self {
        ConstraintViolations(violations_from(&errors))
    }
}

/// Validate a single object
pub fn validate<T: Validate + ?Sized>(obj: &T) -> Result<(), ConstraintViolations> {
    obj.validate().map_err(ConstraintViolations::from)
}

/// Validate every object of an iterator and report all violations at once.
///
/// Violation paths are not prefixed with the element index, so the same field
/// failing on two elements yields two violations with the same path.
pub fn validate_all<'a, T, I>(objs: I) -> Result<(), ConstraintViolations>
where
    T: Validate + 'a,
    I: IntoIterator<Item = &'a T>,
{
    let mut all = Vec::new();
    for obj in objs {
        if let Err(errors) = obj.validate() {
            all.extend(violations_from(&errors));
        }
    }
    if all.is_empty() {
        Ok(())
    } else {
        Err(ConstraintViolations(all))
    }
}

/// Flatten nested validation errors into violations with full property paths
pub fn violations_from(errors: &ValidationErrors) -> Vec<ConstraintViolation> {
    let mut out = Vec::new();
    collect_violations(errors, "", &mut out);
    out.sort_by(|a, b| a.path.cmp(&b.path));
    out
}

fn collect_violations(errors: &ValidationErrors, prefix: &str, out: &mut Vec<ConstraintViolation>) {
    for (field, kind) in errors.errors() {
        let path = if prefix.is_empty() {
            field.to_string()
        } else {
            format!("{}.{}", prefix, field)
        };
        match kind {
            ValidationErrorsKind::Field(field_errors) => {
                for error in field_errors {
                    let message = error
                        .message
                        .as_ref()
                        .map(|m| m.to_string())
                        .unwrap_or_else(|| error.code.to_string());
                    out.push(ConstraintViolation {
                        path: path.clone(),
                        message,
                    });
                }
            }
            ValidationErrorsKind::Struct(nested) => collect_violations(nested, &path, out),
            ValidationErrorsKind::List(items) => {
                for (index, nested) in items {
                    collect_violations(nested, &format!("{}[{}]", path, index), out);
                }
            }
        }
    }
}

/// Convert violations to a `path -> message` map; later violations win on duplicate paths
pub fn map_with_violations(violations: &[ConstraintViolation]) -> HashMap<String, String> {
    if violations.is_empty() {
        return HashMap::new();
    }

    let mut err_map = HashMap::with_capacity(violations.len());
    for violation in violations {
        err_map.insert(violation.path.clone(), violation.message.clone());
    }
    err_map
}

/// Convert `validator` errors straight to a `path -> message` map
pub fn map_with_validation_errors(errors: &ValidationErrors) -> HashMap<String, String> {
    map_with_violations(&violations_from(errors))
}

#[cfg(test)]
mod tests {
    use super::*;
    use validator::Validate;

    #[derive(Debug, Validate)]
    struct Owner {
        #[validate(email(message = "Invalid email"))]
        email: String,
    }

    #[derive(Debug, Validate)]
    struct Tag {
        #[validate(length(min = 1))]
        name: String,
    }

    #[derive(Debug, Validate)]
    struct Album {
        #[validate(length(min = 3, message = "Title too short"))]
        title: String,
        #[validate(nested)]
        owner: Owner,
        #[validate(nested)]
        tags: Vec<Tag>,
    }

    fn album(title: &str, email: &str, tags: &[&str]) -> Album {
        Album {
            title: title.to_string(),
            owner: Owner {
                email: email.to_string(),
            },
            tags: tags
                .iter()
                .map(|t| Tag {
                    name: t.to_string(),
                })
                .collect(),
        }
    }

    #[test]
    fn test_validate_ok() {
        assert!(validate(&album("Summer", "a@b.io", &["beach"])).is_ok());
    }

    #[test]
    fn test_nested_paths_are_flattened() {
        let err = validate(&album("ab", "not-an-email", &["ok", ""])).unwrap_err();
        let map = err.to_map();
        assert_eq!(map.get("title").map(String::as_str), Some("Title too short"));
        assert_eq!(map.get("owner.email").map(String::as_str), Some("Invalid email"));
        // no explicit message: falls back to the constraint code
        assert_eq!(map.get("tags[1].name").map(String::as_str), Some("length"));
    }

    #[test]
    fn test_validate_all_aggregates() {
        let albums = vec![
            album("ab", "a@b.io", &[]),
            album("Winter", "a@b.io", &[]),
            album("xy", "a@b.io", &[]),
        ];
        let err = validate_all(&albums).unwrap_err();
        assert_eq!(err.violations().len(), 2);
        assert!(err.violations().iter().all(|v| v.path == "title"));
        // duplicate paths collapse in the map view
        assert_eq!(err.to_map().len(), 1);
    }

    #[test]
    fn test_validate_all_empty() {
        let albums: Vec<Album> = Vec::new();
        assert!(validate_all(&albums).is_ok());
    }

    #[test]
    fn test_map_with_validation_errors() {
        let errors = album("ab", "not-an-email", &["ok", ""]).validate().unwrap_err();
        let map = map_with_validation_errors(&errors);

        assert_eq!(map.len(), 3);
        assert_eq!(map["title"], "Title too short");
        assert_eq!(map["owner.email"], "Invalid email");
        assert_eq!(map["tags[1].name"], "length");
        assert!(!map.contains_key("tags[0].name"));
    }

    #[test]
    fn test_map_with_violations_empty() {
        assert!(map_with_violations(&[]).is_empty());
    }

    #[test]
    fn test_display() {
        let violations = ConstraintViolations(vec![ConstraintViolation {
            path: "filename".to_string(),
            message: "must not be blank".to_string(),
        }]);
        assert_eq!(violations.to_string(), "filename: must not be blank");
    }
}
