//! Row layout and column sizing for the submissions sheet.

use chrono::NaiveDateTime;
use formbox_core::submission::Submission;

/// Header row, one entry per column.
pub const HEADERS: [&str; 8] = [
  "ID",
  "Full Name",
  "Email",
  "Mobile Number",
  "Category",
  "Sub Category",
  "Agreed to Terms",
  "Created At",
];

/// Number format applied to the "Created At" column; also used to measure it.
pub const TIMESTAMP_FORMAT: &str = "yyyy-mm-dd hh:mm:ss";
const TIMESTAMP_DISPLAY: &str = "%Y-%m-%d %H:%M:%S";

/// Padding added to the longest value in a column.
const WIDTH_PADDING: usize = 2;
/// Upper bound for any column width, in characters.
pub const MAX_WIDTH: usize = 50;

/// One exported submission, already rendered into cell values.
#[derive(Debug, Clone, PartialEq)]
pub struct Row<'a> {
  pub id:              i64,
  pub full_name:       &'a str,
  pub email:           &'a str,
  pub mobile_number:   &'a str,
  pub category:        &'a str,
  pub sub_category:    &'a str,
  pub agreed_to_terms: &'static str,
  /// UTC wall-clock time with the offset dropped.
  pub created_at:      NaiveDateTime,
}

impl<'a> From<&'a Submission> for Row<'a> {
  fn from(s: &'a Submission) -> Self {
    Row {
      id:              s.id,
      full_name:       &s.full_name,
      email:           &s.email,
      mobile_number:   &s.mobile_number,
      category:        &s.category,
      sub_category:    &s.sub_category,
      agreed_to_terms: if s.agreed_to_terms { "Yes" } else { "No" },
      created_at:      s.created_at.naive_utc(),
    }
  }
}

impl Row<'_> {
  /// The text each cell displays, in [`HEADERS`] order.
  pub fn display(&self) -> [String; 8] {
    [
      self.id.to_string(),
      self.full_name.to_owned(),
      self.email.to_owned(),
      self.mobile_number.to_owned(),
      self.category.to_owned(),
      self.sub_category.to_owned(),
      self.agreed_to_terms.to_owned(),
      self.created_at.format(TIMESTAMP_DISPLAY).to_string(),
    ]
  }
}

/// Width of each column: the longest displayed value (header included) plus
/// padding, capped at [`MAX_WIDTH`].
pub fn column_widths(rows: &[Row<'_>]) -> [f64; 8] {
  let mut longest = HEADERS.map(|h| h.chars().count());
  for row in rows {
    for (col, text) in row.display().iter().enumerate() {
      longest[col] = longest[col].max(text.chars().count());
    }
  }
  longest.map(|len| (len + WIDTH_PADDING).min(MAX_WIDTH) as f64)
}
