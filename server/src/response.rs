//! HTTP rendering of todo errors.
//!
//! Every failure becomes a JSON body with a status code, a machine-readable
//! `error` code and a message. Validation failures also list the offending
//! fields. Unknown store failures are reported as 400 and never carry detail.

use axum::extract::rejection::JsonRejection;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Serialize;

use todo_core::{TodoError, ValidationErrors};

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ErrorBody {
    pub status_code: u16,
    pub error: &'static str,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<ValidationErrors>,
}

impl ErrorBody {
    pub fn new(status: StatusCode, error: &'static str, message: impl Into<String>) -> Self {
        Self {
            status_code: status.as_u16(),
            error,
            message: message.into(),
            details: None,
        }
    }
}

/// Handler error: a `TodoError` on its way out as a response.
#[derive(Debug)]
pub struct ApiError(pub TodoError);

impl ApiError {
    fn status_and_code(&self) -> (StatusCode, &'static str) {
        match &self.0 {
            TodoError::Validation(_) => (StatusCode::BAD_REQUEST, "VALIDATION_ERROR"),
            TodoError::DuplicateTitle => (StatusCode::BAD_REQUEST, "DUPLICATE_TITLE"),
            TodoError::NotFound => (StatusCode::NOT_FOUND, "NOT_FOUND"),
            TodoError::Unknown => (StatusCode::BAD_REQUEST, "UNKNOWN"),
        }
    }
}

impl From<TodoError> for ApiError {
    fn from(err: TodoError) -> Self {
        ApiError(err)
    }
}

impl From<ValidationErrors> for ApiError {
    fn from(errors: ValidationErrors) -> Self {
        ApiError(TodoError::Validation(errors))
    }
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        ApiError(TodoError::Validation(ValidationErrors::single(
            "body",
            rejection.body_text(),
        )))
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, code) = self.status_and_code();
        let mut body = ErrorBody::new(status, code, self.0.to_string());
        if let TodoError::Validation(errors) = self.0 {
            body.message = "Validation failed".to_string();
            body.details = Some(errors);
        }
        (status, Json(body)).into_response()
    }
}
