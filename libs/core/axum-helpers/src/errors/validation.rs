//! Flattening of `validator` errors into a sorted `{field, message}` list.

use convert_case::{Case, Casing};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use validator::{ValidationErrors, ValidationErrorsKind};

/// One violated rule, addressed by its JSON path (`prizeMoney.second`).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct FieldError {
    #[schema(example = "title")]
    pub field: String,
    #[schema(example = "Title is required")]
    pub message: String,
}

impl FieldError {
    pub fn new(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            message: message.into(),
        }
    }
}

/// Collect every violation in `errors`, nested structs joined with dots.
///
/// Keys are emitted in camelCase and the result is sorted by field; the
/// relative order of messages on the same field is kept.
pub fn flatten_validation_errors(errors: &ValidationErrors) -> Vec<FieldError> {
    let mut out = Vec::new();
    collect(errors, None, &mut out);
    out.sort_by(|a, b| a.field.cmp(&b.field));
    out
}

fn collect(errors: &ValidationErrors, prefix: Option<&str>, out: &mut Vec<FieldError>) {
    for (key, kind) in errors.errors() {
        let path = join(prefix, key);
        match kind {
            ValidationErrorsKind::Field(field_errors) => {
                for error in field_errors {
                    let message = error
                        .message
                        .as_ref()
                        .map(|m| m.to_string())
                        .unwrap_or_else(|| format!("{path} is invalid ({})", error.code));
                    out.push(FieldError::new(path.clone(), message));
                }
            }
            ValidationErrorsKind::Struct(nested) => collect(nested, Some(&path), out),
            ValidationErrorsKind::List(items) => {
                for (index, nested) in items {
                    collect(nested, Some(&format!("{path}[{index}]")), out);
                }
            }
        }
    }
}

fn join(prefix: Option<&str>, key: &str) -> String {
    // Struct-level rules are reported under `__all__`; attach them to the parent.
    if key == "__all__" {
        return prefix.unwrap_or_default().to_string();
    }
    let key = key.to_case(Case::Camel);
    match prefix {
        Some(prefix) if !prefix.is_empty() => format!("{prefix}.{key}"),
        _ => key,
    }
}
