//! A `Vec`-backed store for unit tests.

use std::{convert::Infallible, sync::Mutex};

use chrono::Utc;

use crate::{
  store::SubmissionStore,
  submission::{Inserted, NewSubmission, Submission, SubmissionFilter},
};

#[derive(Default)]
pub struct MemoryStore {
  rows:       Mutex<Vec<Submission>>,
  /// Pretend another request wins every insert race.
  lose_races: bool,
}

impl MemoryStore {
  pub fn losing_races() -> Self {
    Self { lose_races: true, ..Self::default() }
  }

  /// Insert a minimal row using `email`, bypassing validation.
  pub fn seed(&self, email: &str) {
    let mut rows = self.rows.lock().unwrap();
    let now = Utc::now();
    let id = rows.len() as i64 + 1;
    rows.push(Submission {
      id,
      full_name: "Seed".into(),
      email: email.into(),
      mobile_number: "+12025550000".into(),
      category: "General".into(),
      sub_category: "Other".into(),
      agreed_to_terms: true,
      created_at: now,
      updated_at: now,
    });
  }

  pub fn len(&self) -> usize { self.rows.lock().unwrap().len() }
}

impl SubmissionStore for MemoryStore {
  type Error = Infallible;

  async fn email_exists(&self, email: &str) -> Result<bool, Infallible> {
    Ok(self.rows.lock().unwrap().iter().any(|s| s.email == email))
  }

  async fn insert(&self, new: NewSubmission) -> Result<Inserted, Infallible> {
    let mut rows = self.rows.lock().unwrap();
    if self.lose_races || rows.iter().any(|s| s.email == new.email) {
      return Ok(Inserted::DuplicateEmail);
    }
    let now = Utc::now();
    let submission = Submission {
      id: rows.len() as i64 + 1,
      full_name: new.full_name,
      email: new.email,
      mobile_number: new.mobile_number,
      category: new.category,
      sub_category: new.sub_category,
      agreed_to_terms: new.agreed_to_terms,
      created_at: now,
      updated_at: now,
    };
    rows.push(submission.clone());
    Ok(Inserted::Created(submission))
  }

  async fn get(&self, id: i64) -> Result<Option<Submission>, Infallible> {
    Ok(self.rows.lock().unwrap().iter().find(|s| s.id == id).cloned())
  }

  async fn list(&self, _filter: &SubmissionFilter) -> Result<Vec<Submission>, Infallible> {
    Ok(self.rows.lock().unwrap().iter().rev().cloned().collect())
  }

  async fn get_many(&self, ids: &[i64]) -> Result<Vec<Submission>, Infallible> {
    Ok(
      self
        .rows
        .lock()
        .unwrap()
        .iter()
        .rev()
        .filter(|s| ids.contains(&s.id))
        .cloned()
        .collect(),
    )
  }
}
