//! Handlers for the public submission endpoints.
//!
//! | Method | Path | Notes |
//! |--------|------|-------|
//! | `POST` | `/submit/` | Body: the six form fields; 201 / 400 / 500 |
//! | `GET`  | `/submissions/` | All submissions, newest first, with `count` |

use std::sync::Arc;

use axum::{
  Json,
  extract::{State, rejection::JsonRejection},
  http::StatusCode,
  response::IntoResponse,
};
use chrono::{DateTime, Utc};
use formbox_core::{
  intake,
  store::SubmissionStore,
  submission::{Submission, SubmissionFilter},
  validate::SubmissionInput,
};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::ApiError;

/// A submission as exposed by the public API.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SubmissionView {
  pub id:              i64,
  pub full_name:       String,
  pub email:           String,
  pub mobile_number:   String,
  pub category:        String,
  pub sub_category:    String,
  pub agreed_to_terms: bool,
  pub created_at:      DateTime<Utc>,
}

impl From<Submission> for SubmissionView {
  fn from(s: Submission) -> Self {
    SubmissionView {
      id:              s.id,
      full_name:       s.full_name,
      email:           s.email,
      mobile_number:   s.mobile_number,
      category:        s.category,
      sub_category:    s.sub_category,
      agreed_to_terms: s.agreed_to_terms,
      created_at:      s.created_at,
    }
  }
}

// ─── Submit ───────────────────────────────────────────────────────────────────

/// Summary of a freshly created submission.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Created {
  pub id:         i64,
  pub full_name:  String,
  pub email:      String,
  pub created_at: DateTime<Utc>,
}

#[derive(Debug, Serialize)]
pub struct SubmitResponse {
  pub success: bool,
  pub message: &'static str,
  pub data:    Created,
}

/// `POST /submit/`
pub async fn submit<S>(
  State(store): State<Arc<S>>,
  payload: Result<Json<Value>, JsonRejection>,
) -> Result<impl IntoResponse, ApiError>
where
  S: SubmissionStore,
{
  let Json(body) = payload.map_err(|e| ApiError::BadRequest(e.body_text()))?;
  let input = SubmissionInput::from_json(body).map_err(ApiError::BadRequest)?;

  let submission = intake::submit(store.as_ref(), &input).await?;
  tracing::info!(id = submission.id, "contact submission created");

  Ok((
    StatusCode::CREATED,
    Json(SubmitResponse {
      success: true,
      message: "Contact form submitted successfully!",
      data:    Created {
        id:         submission.id,
        full_name:  submission.full_name,
        email:      submission.email,
        created_at: submission.created_at,
      },
    }),
  ))
}

// ─── List ─────────────────────────────────────────────────────────────────────

#[derive(Debug, Serialize)]
pub struct ListResponse {
  pub success: bool,
  pub data:    Vec<SubmissionView>,
  pub count:   usize,
}

/// `GET /submissions/`
pub async fn list<S>(State(store): State<Arc<S>>) -> Result<Json<ListResponse>, ApiError>
where
  S: SubmissionStore,
{
  let data: Vec<SubmissionView> = store
    .list(&SubmissionFilter::default())
    .await
    .map_err(|e| ApiError::Store(Box::new(e)))?
    .into_iter()
    .map(SubmissionView::from)
    .collect();

  Ok(Json(ListResponse {
    success: true,
    count: data.len(),
    data,
  }))
}
