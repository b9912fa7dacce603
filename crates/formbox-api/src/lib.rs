//! JSON REST API for formbox contact-form submissions.
//!
//! Exposes an axum [`Router`] backed by any
//! [`formbox_core::store::SubmissionStore`]. Auth, TLS, and transport concerns
//! are the caller's responsibility.
//!
//! # Mounting
//!
//! ```rust,ignore
//! .nest("/api/contact", formbox_api::api_router(store.clone()))
//! ```

pub mod error;
pub mod submissions;

use std::sync::Arc;

use axum::{
  Router,
  routing::{get, post},
};
use formbox_core::store::SubmissionStore;

pub use error::ApiError;

/// Build a fully-materialised API router for `store`.
///
/// The returned `Router<()>` can be nested into any parent router regardless
/// of its own state type.
pub fn api_router<S>(store: Arc<S>) -> Router<()>
where
  S: SubmissionStore + Clone + Send + Sync + 'static,
{
  Router::new()
    .route("/submit/", post(submissions::submit::<S>))
    .route("/submissions/", get(submissions::list::<S>))
    .with_state(store)
}

#[cfg(test)]
mod tests {
  use super::*;

  use axum::{
    body::Body,
    http::{Request, StatusCode, header},
    response::Response,
  };
  use formbox_core::{
    store::SubmissionStore,
    submission::{Inserted, NewSubmission, Submission, SubmissionFilter},
  };
  use formbox_store_sqlite::SqliteStore;
  use serde_json::{Value, json};
  use tower::ServiceExt as _;

  async fn make_router() -> Router {
    let store = SqliteStore::open_in_memory().await.unwrap();
    api_router(Arc::new(store))
  }

  async fn send(router: Router, method: &str, uri: &str, body: &str) -> Response {
    let req = Request::builder()
      .method(method)
      .uri(uri)
      .header(header::CONTENT_TYPE, "application/json")
      .body(Body::from(body.to_string()))
      .unwrap();
    router.oneshot(req).await.unwrap()
  }

  async fn json_body(resp: Response) -> Value {
    let bytes = axum::body::to_bytes(resp.into_body(), usize::MAX).await.unwrap();
    serde_json::from_slice(&bytes).unwrap()
  }

  fn jane() -> Value {
    json!({
      "full_name":       "Jane Doe",
      "email":           "jane@x.com",
      "mobile_number":   "+12025551234",
      "category":        "Billing",
      "sub_category":    "Refund",
      "agreed_to_terms": true,
    })
  }

  async fn submit(router: &Router, body: &Value) -> Response {
    send(router.clone(), "POST", "/submit/", &body.to_string()).await
  }

  // ── Submit ──────────────────────────────────────────────────────────────────

  #[tokio::test]
  async fn valid_submission_returns_201() {
    let router = make_router().await;
    let resp = submit(&router, &jane()).await;
    assert_eq!(resp.status(), StatusCode::CREATED);

    let body = json_body(resp).await;
    assert_eq!(body["success"], true);
    assert_eq!(body["message"], "Contact form submitted successfully!");
    assert!(body["data"]["id"].as_i64().is_some(), "{body}");
    assert_eq!(body["data"]["full_name"], "Jane Doe");
    assert_eq!(body["data"]["email"], "jane@x.com");
    assert!(body["data"]["created_at"].is_string(), "{body}");
  }

  #[tokio::test]
  async fn ids_are_new_for_each_submission() {
    let router = make_router().await;
    let first = json_body(submit(&router, &jane()).await).await;
    let mut other = jane();
    other["email"] = json!("john@x.com");
    let second = json_body(submit(&router, &other).await).await;

    assert!(second["data"]["id"].as_i64() > first["data"]["id"].as_i64());
  }

  #[tokio::test]
  async fn disagreeing_to_terms_returns_400() {
    let router = make_router().await;
    let mut body = jane();
    body["agreed_to_terms"] = json!(false);

    let resp = submit(&router, &body).await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    let body = json_body(resp).await;
    assert_eq!(body["success"], false);
    assert_eq!(body["message"], "Form validation failed");
    assert_eq!(
      body["errors"]["agreed_to_terms"],
      json!(["You must agree to the terms and conditions."])
    );
  }

  #[tokio::test]
  async fn duplicate_email_returns_400_on_second_submit() {
    let router = make_router().await;
    assert_eq!(submit(&router, &jane()).await.status(), StatusCode::CREATED);

    let resp = submit(&router, &jane()).await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    let body = json_body(resp).await;
    assert_eq!(
      body["errors"]["email"],
      json!(["A submission with this email already exists."])
    );
  }

  #[tokio::test]
  async fn mobile_number_pattern_is_enforced() {
    let router = make_router().await;

    let mut ok = jane();
    ok["mobile_number"] = json!("+14155551234");
    assert_eq!(submit(&router, &ok).await.status(), StatusCode::CREATED);

    let mut bad = jane();
    bad["email"] = json!("other@x.com");
    bad["mobile_number"] = json!("abc123");
    let resp = submit(&router, &bad).await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    let body = json_body(resp).await;
    assert!(body["errors"]["mobile_number"].is_array(), "{body}");
    assert!(body["errors"].get("email").is_none(), "{body}");
  }

  #[tokio::test]
  async fn missing_fields_are_reported_per_field() {
    let router = make_router().await;
    let resp = submit(&router, &json!({ "email": "not-an-email" })).await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);

    let errors = json_body(resp).await["errors"].clone();
    assert_eq!(errors["full_name"], json!(["This field is required."]));
    assert_eq!(errors["email"], json!(["Enter a valid email address."]));
    assert_eq!(errors["category"], json!(["This field is required."]));
  }

  #[tokio::test]
  async fn malformed_body_returns_400_envelope() {
    let router = make_router().await;
    let resp = send(router, "POST", "/submit/", "{not json").await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);

    let body = json_body(resp).await;
    assert_eq!(body["success"], false);
    assert!(body["errors"]["non_field_errors"][0].is_string(), "{body}");
  }

  #[tokio::test]
  async fn non_object_bodies_are_rejected_without_storing() {
    let router = make_router().await;
    let row = json!(["Jane Doe", "jane@x.com", "+12025551234", "Billing", "Refund", true]);

    for body in [row, json!("jane@x.com"), json!(42), Value::Null] {
      let resp = submit(&router, &body).await;
      assert_eq!(resp.status(), StatusCode::BAD_REQUEST, "{body}");
      let envelope = json_body(resp).await;
      assert_eq!(envelope["success"], false);
      let message = envelope["errors"]["non_field_errors"][0].as_str().unwrap();
      assert!(message.starts_with("Invalid data. Expected a dictionary"), "{message}");
    }

    let listed = json_body(send(router, "GET", "/submissions/", "").await).await;
    assert_eq!(listed["count"], 0);
  }

  // ── List ────────────────────────────────────────────────────────────────────

  #[tokio::test]
  async fn list_is_newest_first_with_count() {
    let router = make_router().await;
    for email in ["a@x.com", "b@x.com", "c@x.com"] {
      let mut body = jane();
      body["email"] = json!(email);
      assert_eq!(submit(&router, &body).await.status(), StatusCode::CREATED);
    }

    let resp = send(router, "GET", "/submissions/", "").await;
    assert_eq!(resp.status(), StatusCode::OK);
    let body = json_body(resp).await;
    assert_eq!(body["success"], true);
    assert_eq!(body["count"], 3);
    let emails: Vec<&str> = body["data"]
      .as_array()
      .unwrap()
      .iter()
      .map(|r| r["email"].as_str().unwrap())
      .collect();
    assert_eq!(emails, ["c@x.com", "b@x.com", "a@x.com"]);
  }

  #[tokio::test]
  async fn submitted_record_is_listed_verbatim() {
    let router = make_router().await;
    let created = json_body(submit(&router, &jane()).await).await;

    let body = json_body(send(router, "GET", "/submissions/", "").await).await;
    assert_eq!(body["count"], 1);
    let record = &body["data"][0];
    assert_eq!(record["id"], created["data"]["id"]);
    assert_eq!(record["created_at"], created["data"]["created_at"]);
    for field in ["full_name", "email", "mobile_number", "category", "sub_category", "agreed_to_terms"] {
      assert_eq!(record[field], jane()[field], "{field}");
    }
    assert!(record.get("updated_at").is_none());
  }

  #[tokio::test]
  async fn empty_store_lists_nothing() {
    let router = make_router().await;
    let body = json_body(send(router, "GET", "/submissions/", "").await).await;
    assert_eq!(body["count"], 0);
    assert_eq!(body["data"], json!([]));
  }

  // ── Store failures ──────────────────────────────────────────────────────────

  /// A store whose every operation fails.
  #[derive(Clone)]
  struct BrokenStore;

  fn broken() -> std::io::Error { std::io::Error::other("disk on fire") }

  impl SubmissionStore for BrokenStore {
    type Error = std::io::Error;
    async fn email_exists(&self, _: &str) -> Result<bool, Self::Error> { Err(broken()) }
    async fn insert(&self, _: NewSubmission) -> Result<Inserted, Self::Error> { Err(broken()) }
    async fn get(&self, _: i64) -> Result<Option<Submission>, Self::Error> { Err(broken()) }
    async fn list(&self, _: &SubmissionFilter) -> Result<Vec<Submission>, Self::Error> { Err(broken()) }
    async fn get_many(&self, _: &[i64]) -> Result<Vec<Submission>, Self::Error> { Err(broken()) }
  }

  #[tokio::test]
  async fn store_failure_returns_generic_500() {
    let router = api_router(Arc::new(BrokenStore));
    let resp = submit(&router, &jane()).await;
    assert_eq!(resp.status(), StatusCode::INTERNAL_SERVER_ERROR);

    let body = json_body(resp).await;
    assert_eq!(body["success"], false);
    assert_eq!(body["message"], "An error occurred while processing your request");
    assert!(!body.to_string().contains("disk on fire"));
  }
}
