//! The `SubmissionStore` trait.
//!
//! The trait is implemented by storage backends (e.g. `formbox-store-sqlite`).
//! Higher layers (`formbox-api`, `formbox-server`) depend on this abstraction,
//! not on any concrete backend.

use std::future::Future;

use crate::submission::{Inserted, NewSubmission, Submission, SubmissionFilter};

/// Abstraction over a submission store backend.
///
/// Submissions are insert-only. Every listing is ordered newest first
/// (`created_at` descending, then `id` descending).
///
/// All methods return `Send` futures so the trait can be used in multi-threaded
/// async runtimes (e.g. tokio with `axum`).
pub trait SubmissionStore: Send + Sync {
  type Error: std::error::Error + Send + Sync + 'static;

  /// Whether any submission already uses exactly this email.
  fn email_exists<'a>(
    &'a self,
    email: &'a str,
  ) -> impl Future<Output = Result<bool, Self::Error>> + Send + 'a;

  /// Persist a validated submission. Timestamps and the id are assigned by
  /// the store.
  ///
  /// A uniqueness violation on `email` is reported as
  /// [`Inserted::DuplicateEmail`], not as an error.
  fn insert(
    &self,
    new: NewSubmission,
  ) -> impl Future<Output = Result<Inserted, Self::Error>> + Send + '_;

  /// Retrieve a submission by id. Returns `None` if not found.
  fn get(
    &self,
    id: i64,
  ) -> impl Future<Output = Result<Option<Submission>, Self::Error>> + Send + '_;

  /// All submissions matching `filter`, newest first.
  fn list<'a>(
    &'a self,
    filter: &'a SubmissionFilter,
  ) -> impl Future<Output = Result<Vec<Submission>, Self::Error>> + Send + 'a;

  /// The submissions with the given ids, newest first. Unknown ids are
  /// skipped.
  fn get_many<'a>(
    &'a self,
    ids: &'a [i64],
  ) -> impl Future<Output = Result<Vec<Submission>, Self::Error>> + Send + 'a;
}
