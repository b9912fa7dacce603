//! Encoding and decoding helpers between domain types and the plain-text
//! representations stored in SQLite columns.
//!
//! Timestamps are stored as fixed-width RFC 3339 strings (microsecond
//! precision, `Z` suffix) so that lexical order equals chronological order.

use chrono::{DateTime, SecondsFormat, Utc};
use formbox_core::submission::Submission;

use crate::{Error, Result};

/// Columns selected for every submission read, in [`RawSubmission`] order.
pub const COLUMNS: &str = "id, full_name, email, mobile_number, category, \
                           sub_category, agreed_to_terms, created_at, updated_at";

pub fn encode_dt(dt: DateTime<Utc>) -> String {
  dt.to_rfc3339_opts(SecondsFormat::Micros, true)
}

pub fn decode_dt(s: &str) -> Result<DateTime<Utc>> {
  DateTime::parse_from_rfc3339(s)
    .map(|dt| dt.with_timezone(&Utc))
    .map_err(|e| Error::DateParse(e.to_string()))
}

/// Escape `%`, `_` and the escape character itself for a `LIKE ... ESCAPE '\'`
/// pattern, and wrap the result for substring matching.
pub fn like_pattern(needle: &str) -> String {
  let mut escaped = String::with_capacity(needle.len() + 2);
  escaped.push('%');
  for c in needle.chars() {
    if matches!(c, '%' | '_' | '\\') {
      escaped.push('\\');
    }
    escaped.push(c);
  }
  escaped.push('%');
  escaped
}

/// Raw values read directly from a `contact_submissions` row.
pub struct RawSubmission {
  pub id:              i64,
  pub full_name:       String,
  pub email:           String,
  pub mobile_number:   String,
  pub category:        String,
  pub sub_category:    String,
  pub agreed_to_terms: bool,
  pub created_at:      String,
  pub updated_at:      String,
}

impl RawSubmission {
  pub fn from_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<Self> {
    Ok(RawSubmission {
      id:              row.get(0)?,
      full_name:       row.get(1)?,
      email:           row.get(2)?,
      mobile_number:   row.get(3)?,
      category:        row.get(4)?,
      sub_category:    row.get(5)?,
      agreed_to_terms: row.get(6)?,
      created_at:      row.get(7)?,
      updated_at:      row.get(8)?,
    })
  }

  pub fn into_submission(self) -> Result<Submission> {
    Ok(Submission {
      id:              self.id,
      full_name:       self.full_name,
      email:           self.email,
      mobile_number:   self.mobile_number,
      category:        self.category,
      sub_category:    self.sub_category,
      agreed_to_terms: self.agreed_to_terms,
      created_at:      decode_dt(&self.created_at)?,
      updated_at:      decode_dt(&self.updated_at)?,
    })
  }
}
