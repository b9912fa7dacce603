//! Submission — the single entity persisted by formbox.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A persisted contact-form submission.
///
/// `id`, `created_at` and `updated_at` are assigned by the store. No exposed
/// operation mutates a submission, so `updated_at == created_at` in practice.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Submission {
  pub id:              i64,
  pub full_name:       String,
  pub email:           String,
  pub mobile_number:   String,
  pub category:        String,
  pub sub_category:    String,
  pub agreed_to_terms: bool,
  pub created_at:      DateTime<Utc>,
  pub updated_at:      DateTime<Utc>,
}

impl std::fmt::Display for Submission {
  fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
    write!(f, "{} - {}", self.full_name, self.email)
  }
}

/// A validated, normalised submission ready for insertion.
///
/// Only [`crate::validate::validate`] should construct these outside tests.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewSubmission {
  pub full_name:       String,
  pub email:           String,
  pub mobile_number:   String,
  pub category:        String,
  pub sub_category:    String,
  pub agreed_to_terms: bool,
}

/// Result of [`crate::store::SubmissionStore::insert`].
#[derive(Debug, Clone)]
pub enum Inserted {
  Created(Submission),
  /// The write was rejected by the store's email uniqueness constraint.
  DuplicateEmail,
}

/// Narrowing applied by the admin changelist. The default matches everything.
#[derive(Debug, Clone, Default)]
pub struct SubmissionFilter {
  pub category:        Option<String>,
  pub sub_category:    Option<String>,
  pub agreed_to_terms: Option<bool>,
  /// Inclusive lower bound on `created_at`.
  pub created_after:   Option<DateTime<Utc>>,
  /// Exclusive upper bound on `created_at`.
  pub created_before:  Option<DateTime<Utc>>,
  /// Case-insensitive substring over full name, email and mobile number.
  pub search:          Option<String>,
}
