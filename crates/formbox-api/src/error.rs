//! API error type and [`axum::response::IntoResponse`] implementation.
//!
//! Every failure is rendered with the same envelope as a success:
//! `{"success": false, "message": ..., "errors"?: {field: [messages]}}`.

use axum::{
  Json,
  http::StatusCode,
  response::{IntoResponse, Response},
};
use formbox_core::validate::FieldErrors;
use serde_json::json;
use thiserror::Error;

const VALIDATION_FAILED: &str = "Form validation failed";
const INTERNAL_ERROR: &str = "An error occurred while processing your request";

/// An error returned by an API handler.
#[derive(Debug, Error)]
pub enum ApiError {
  #[error("invalid submission")]
  Invalid(FieldErrors),

  /// The body could not be read as a JSON object.
  #[error("bad request: {0}")]
  BadRequest(String),

  #[error("store error: {0}")]
  Store(#[source] Box<dyn std::error::Error + Send + Sync>),
}

impl From<formbox_core::Error> for ApiError {
  fn from(e: formbox_core::Error) -> Self {
    match e {
      formbox_core::Error::Invalid(errors) => ApiError::Invalid(errors),
      formbox_core::Error::Store(e) => ApiError::Store(e),
    }
  }
}

impl IntoResponse for ApiError {
  fn into_response(self) -> Response {
    let (status, body) = match self {
      ApiError::Invalid(errors) => (
        StatusCode::BAD_REQUEST,
        json!({ "success": false, "message": VALIDATION_FAILED, "errors": errors }),
      ),
      ApiError::BadRequest(m) => (
        StatusCode::BAD_REQUEST,
        json!({
          "success": false,
          "message": VALIDATION_FAILED,
          "errors":  { "non_field_errors": [m] },
        }),
      ),
      ApiError::Store(e) => {
        tracing::error!(error = %e, "submission request failed");
        (
          StatusCode::INTERNAL_SERVER_ERROR,
          json!({ "success": false, "message": INTERNAL_ERROR }),
        )
      }
    };
    (status, Json(body)).into_response()
  }
}
