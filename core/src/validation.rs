//! Request validation for todo payloads and path identifiers.
//!
//! # Design
//! Validators take raw `serde_json::Value` bodies instead of typed DTOs so a
//! wrong-typed field produces a field-level message rather than an opaque
//! deserialization failure. Every violation in a payload is collected before
//! returning. Fields the payload does not know about are ignored.

use std::fmt;

use serde::Serialize;
use serde_json::{Map, Value};
use uuid::Uuid;

use crate::types::{CreateTodo, UpdateTodo};

/// Minimum title length, counted in characters.
pub const TITLE_MIN_LEN: usize = 6;

/// A single rejected field.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FieldError {
    pub field: String,
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

/// All field errors found in one payload. Never empty when returned as `Err`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct ValidationErrors(Vec<FieldError>);

impl ValidationErrors {
    pub fn single(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self(vec![FieldError::new(field, message)])
    }

    pub fn push(&mut self, error: FieldError) {
        self.0.push(error);
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn fields(&self) -> &[FieldError] {
        &self.0
    }

    fn into_result<T>(self, value: T) -> Result<T, ValidationErrors> {
        if self.is_empty() {
            Ok(value)
        } else {
            Err(self)
        }
    }
}

impl fmt::Display for ValidationErrors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let messages: Vec<&str> = self.0.iter().map(|e| e.message.as_str()).collect();
        write!(f, "{}", messages.join("; "))
    }
}

impl std::error::Error for ValidationErrors {}

fn as_object(body: &Value) -> Result<&Map<String, Value>, ValidationErrors> {
    body.as_object()
        .ok_or_else(|| ValidationErrors::single("body", "request body must be a JSON object"))
}

fn check_title(value: &Value, errors: &mut ValidationErrors) -> Option<String> {
    match value.as_str() {
        Some(title) if title.chars().count() >= TITLE_MIN_LEN => Some(title.to_string()),
        Some(_) => {
            errors.push(FieldError::new(
                "title",
                format!("title must be longer than or equal to {TITLE_MIN_LEN} characters"),
            ));
            None
        }
        None => {
            errors.push(FieldError::new("title", "title must be a string"));
            None
        }
    }
}

/// Validate a create body: `title` is required.
pub fn validate_create(body: &Value) -> Result<CreateTodo, ValidationErrors> {
    let object = as_object(body)?;
    let mut errors = ValidationErrors::default();

    let title = match object.get("title") {
        Some(value) => check_title(value, &mut errors),
        None => {
            errors.push(FieldError::new("title", "title should not be empty"));
            None
        }
    };

    match title {
        Some(title) => errors.into_result(CreateTodo { title }),
        None => Err(errors),
    }
}

/// Validate a partial update body. Absent fields stay `None`; an explicit
/// `null` is treated as a wrong type.
pub fn validate_update(body: &Value) -> Result<UpdateTodo, ValidationErrors> {
    let object = as_object(body)?;
    let mut errors = ValidationErrors::default();
    let mut update = UpdateTodo::default();

    if let Some(value) = object.get("title") {
        update.title = check_title(value, &mut errors);
    }

    if let Some(value) = object.get("completed") {
        match value.as_bool() {
            Some(completed) => update.completed = Some(completed),
            None => errors.push(FieldError::new(
                "completed",
                "completed must be a boolean value",
            )),
        }
    }

    errors.into_result(update)
}

/// Parse a path-supplied identifier.
pub fn parse_todo_id(raw: &str) -> Result<Uuid, ValidationErrors> {
    if raw.trim().is_empty() {
        return Err(ValidationErrors::single("id", "id should not be empty"));
    }
    Uuid::parse_str(raw).map_err(|_| ValidationErrors::single("id", "id must be a UUID"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn create_accepts_six_character_title() {
        let input = validate_create(&json!({"title": "Errand"})).unwrap();
        assert_eq!(input.title, "Errand");
    }

    #[test]
    fn create_rejects_short_title() {
        let errors = validate_create(&json!({"title": "short"})).unwrap_err();
        assert_eq!(errors.fields().len(), 1);
        assert_eq!(errors.fields()[0].field, "title");
        assert!(errors.fields()[0].message.contains("6 characters"));
    }

    #[test]
    fn create_counts_characters_not_bytes() {
        // five characters, ten bytes
        assert!(validate_create(&json!({"title": "ééééé"})).is_err());
        assert!(validate_create(&json!({"title": "éééééé"})).is_ok());
    }

    #[test]
    fn create_rejects_missing_and_mistyped_title() {
        let missing = validate_create(&json!({"completed": true})).unwrap_err();
        assert_eq!(missing.fields()[0].message, "title should not be empty");

        let mistyped = validate_create(&json!({"title": 123456})).unwrap_err();
        assert_eq!(mistyped.fields()[0].message, "title must be a string");
    }

    #[test]
    fn create_rejects_non_object_body() {
        let errors = validate_create(&json!(["Buy milk"])).unwrap_err();
        assert_eq!(errors.fields()[0].field, "body");
    }

    #[test]
    fn create_ignores_unknown_fields() {
        let input = validate_create(&json!({"title": "Buy milk", "priority": 3})).unwrap();
        assert_eq!(input, CreateTodo { title: "Buy milk".into() });
    }

    #[test]
    fn update_all_fields_optional() {
        let update = validate_update(&json!({})).unwrap();
        assert!(update.is_empty());
    }

    #[test]
    fn update_partial_fields() {
        let update = validate_update(&json!({"completed": true})).unwrap();
        assert_eq!(update.title, None);
        assert_eq!(update.completed, Some(true));
    }

    #[test]
    fn update_collects_every_violation() {
        let errors = validate_update(&json!({"title": "tiny", "completed": "yes"})).unwrap_err();
        let fields: Vec<&str> = errors.fields().iter().map(|e| e.field.as_str()).collect();
        assert_eq!(fields, vec!["title", "completed"]);
    }

    #[test]
    fn update_rejects_null_completed() {
        let errors = validate_update(&json!({"completed": null})).unwrap_err();
        assert_eq!(errors.fields()[0].message, "completed must be a boolean value");
    }

    #[test]
    fn id_must_be_uuid() {
        assert!(parse_todo_id("00000000-0000-0000-0000-000000000000").is_ok());
        assert_eq!(parse_todo_id("not-a-uuid").unwrap_err().fields()[0].field, "id");
        assert_eq!(
            parse_todo_id("  ").unwrap_err().fields()[0].message,
            "id should not be empty"
        );
    }

    #[test]
    fn display_joins_messages() {
        let mut errors = ValidationErrors::single("title", "first");
        errors.push(FieldError::new("completed", "second"));
        assert_eq!(errors.to_string(), "first; second");
    }
}
