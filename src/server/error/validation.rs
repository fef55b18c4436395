//! Field-level request validation errors.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use thiserror::Error;

use crate::model::api::{ErrorDto, FieldErrorDto};

/// A single rejected field with a human readable reason.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldError {
    pub field: &'static str,
    pub message: String,
}

/// Collects every invalid field of a request before rejecting it.
///
/// ```rust,ignore
/// let mut errors = ValidationError::new();
/// errors.check_length("title", &params.title, 1, 200);
/// errors.finish()?;
/// ```
#[derive(Error, Debug, Default)]
#[error("Validation failed for {} field(s)", .fields.len())]
pub struct ValidationError {
    pub fields: Vec<FieldError>,
}

impl ValidationError {
    pub fn new() -> Self {
        Self::default()
    }

    /// Shorthand for a validation error on a single field.
    pub fn single(field: &'static str, message: impl Into<String>) -> Self {
        let mut errors = Self::new();
        errors.add(field, message);
        errors
    }

    pub fn add(&mut self, field: &'static str, message: impl Into<String>) {
        self.fields.push(FieldError {
            field,
            message: message.into(),
        });
    }

    /// Requires the trimmed value to have between `min` and `max` characters.
    pub fn check_length(&mut self, field: &'static str, value: &str, min: usize, max: usize) {
        let len = value.trim().chars().count();
        if len < min {
            if min == 1 {
                self.add(field, "must not be empty");
            } else {
                self.add(field, format!("must be at least {} characters", min));
            }
        } else if len > max {
            self.add(field, format!("must be at most {} characters", max));
        }
    }

    /// Same as `check_length` with no lower bound, skipped when the value is absent.
    pub fn check_max_length(&mut self, field: &'static str, value: Option<&str>, max: usize) {
        if let Some(value) = value {
            if value.chars().count() > max {
                self.add(field, format!("must be at most {} characters", max));
            }
        }
    }

    /// Adds an error when `valid` is false.
    pub fn check(&mut self, field: &'static str, valid: bool, message: &str) {
        if !valid {
            self.add(field, message);
        }
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    /// Returns `Err(self)` when any field was rejected.
    pub fn finish(self) -> Result<(), ValidationError> {
        if self.is_empty() {
            Ok(())
        } else {
            Err(self)
        }
    }
}

impl IntoResponse for ValidationError {
    fn into_response(self) -> Response {
        let fields = self
            .fields
            .into_iter()
            .map(|f| FieldErrorDto {
                field: f.field.to_string(),
                message: f.message,
            })
            .collect();

        (
            StatusCode::BAD_REQUEST,
            Json(ErrorDto {
                error: "Invalid request".to_string(),
                fields: Some(fields),
            }),
        )
            .into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn collects_every_failing_field() {
        let mut errors = ValidationError::new();
        errors.check_length("title", "   ", 1, 10);
        errors.check_length("code", "this is far too long", 1, 5);
        errors.check_max_length("bio", Some("ok"), 10);
        errors.check("email", false, "must be a valid email address");

        let fields: Vec<_> = errors.fields.iter().map(|f| f.field).collect();
        assert_eq!(fields, vec!["title", "code", "email"]);
        assert!(errors.finish().is_err());
    }

    #[test]
    fn empty_collection_passes() {
        let mut errors = ValidationError::new();
        errors.check_length("name", "Ada", 1, 100);
        assert!(errors.finish().is_ok());
    }

    #[test]
    fn counts_characters_not_bytes() {
        let mut errors = ValidationError::new();
        errors.check_length("name", "ééé", 1, 3);
        assert!(errors.is_empty());
    }
}
