//! Validation error formatting
//!
//! `validator` reports nested structs as a tree of errors. Startup logs want a
//! flat list with one dotted field path per line, e.g. `s3_config.region`.

use validator::{ValidationErrors, ValidationErrorsKind};

/// Format validation errors for display
///
/// Walks nested struct and list errors, producing one line per failing field
/// in the form `path.to.field: message`. Lines are sorted so output is stable.
///
/// # Example
///
/// ```rust
/// use validator::ValidationErrors;
/// use pipeline_upload::config::format_validation_errors;
///
/// let errors = ValidationErrors::new();
/// assert!(format_validation_errors(&errors).is_empty());
/// ```
#[must_use]
pub fn format_validation_errors(errors: &ValidationErrors) -> String {
    let mut messages = Vec::new();
    collect(errors, "", &mut messages);
    messages.sort();
    messages.join("\n")
}

/// Dotted paths of every failing field, sorted
#[must_use]
pub fn failing_fields(errors: &ValidationErrors) -> Vec<String> {
    let mut messages = Vec::new();
    collect(errors, "", &mut messages);
    let mut fields: Vec<String> = messages
        .into_iter()
        .filter_map(|line| line.split_once(':').map(|(field, _)| field.to_string()))
        .collect();
    fields.sort();
    fields.dedup();
    fields
}

fn collect(errors: &ValidationErrors, prefix: &str, out: &mut Vec<String>) {
    for (field, kind) in errors.errors() {
        let path = if prefix.is_empty() {
            field.to_string()
        } else {
            format!("{prefix}.{field}")
        };

        match kind {
            ValidationErrorsKind::Field(field_errors) => {
                for error in field_errors {
                    let message = error
                        .message
                        .as_ref()
                        .map_or_else(|| error.code.to_string(), ToString::to_string);
                    out.push(format!("{path}: {message}"));
                }
            }
            ValidationErrorsKind::Struct(nested) => collect(nested, &path, out),
            ValidationErrorsKind::List(items) => {
                for (index, nested) in items {
                    collect(nested, &format!("{path}[{index}]"), out);
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use validator::Validate;

    #[derive(Validate)]
    struct Inner {
        #[validate(length(min = 1, message = "is required"))]
        name: String,
        #[validate(length(min = 1))]
        code: String,
    }

    #[derive(Validate)]
    struct Outer {
        #[validate(nested)]
        inner: Inner,
    }

    #[test]
    fn test_nested_errors_are_flattened_with_paths() {
        let outer = Outer {
            inner: Inner {
                name: String::new(),
                code: String::new(),
            },
        };

        let errors = outer.validate().unwrap_err();
        let formatted = format_validation_errors(&errors);

        assert_eq!(formatted, "inner.code: length\ninner.name: is required");
    }

    #[test]
    fn test_failing_fields_lists_dotted_paths() {
        let outer = Outer {
            inner: Inner {
                name: "ok".to_string(),
                code: String::new(),
            },
        };

        let errors = outer.validate().unwrap_err();
        assert_eq!(failing_fields(&errors), vec!["inner.code".to_string()]);
    }
}
