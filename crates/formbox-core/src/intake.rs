//! Intake — validate a raw submission and persist it.

use crate::{
  Error, Result,
  store::SubmissionStore,
  submission::{Inserted, Submission},
  validate::{self, EMAIL, EMAIL_TAKEN, FieldErrors, SubmissionInput},
};

/// Validate `input` and insert it into `store`.
///
/// The email existence check and the insert are not atomic. If a concurrent
/// request claims the same email in between, the store's uniqueness
/// constraint rejects the insert and it is reported exactly like a failed
/// existence check.
pub async fn submit<S>(store: &S, input: &SubmissionInput) -> Result<Submission>
where
  S: SubmissionStore,
{
  let new = validate::validate(store, input).await?;

  match store.insert(new).await.map_err(Error::store)? {
    Inserted::Created(submission) => Ok(submission),
    Inserted::DuplicateEmail => {
      let mut errors = FieldErrors::default();
      errors.add(EMAIL, EMAIL_TAKEN);
      Err(Error::Invalid(errors))
    }
  }
}
