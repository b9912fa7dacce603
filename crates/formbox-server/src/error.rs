//! Error types and axum `IntoResponse` implementation for the admin surface.

use axum::{
  Json,
  http::{HeaderValue, StatusCode, header},
  response::{IntoResponse, Response},
};
use serde_json::json;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
  #[error("unauthorized")]
  Unauthorized,
  #[error("not found")]
  NotFound,
  #[error("export error: {0}")]
  Export(#[from] formbox_export::Error),
  #[error("store error: {0}")]
  Store(#[source] Box<dyn std::error::Error + Send + Sync>),
}

impl IntoResponse for Error {
  fn into_response(self) -> Response {
    match self {
      Error::Unauthorized => {
        let mut res =
          (StatusCode::UNAUTHORIZED, "Unauthorized").into_response();
        res.headers_mut().insert(
          header::WWW_AUTHENTICATE,
          HeaderValue::from_static("Basic realm=\"formbox\""),
        );
        res
      }
      Error::NotFound => {
        (StatusCode::NOT_FOUND, Json(json!({ "error": "not found" }))).into_response()
      }
      Error::Export(e) => internal(&e),
      Error::Store(e) => internal(e.as_ref()),
    }
  }
}

fn internal(e: &dyn std::error::Error) -> Response {
  tracing::error!(error = %e, "admin request failed");
  (
    StatusCode::INTERNAL_SERVER_ERROR,
    Json(json!({ "error": "internal server error" })),
  )
    .into_response()
}
