//! Spreadsheet export for formbox submissions.
//!
//! [`render`] is the single transform behind every export entry point: the
//! admin "export selected" and "export all" actions and the direct download
//! URL differ only in which submissions they pass and the sheet title.

pub mod error;
pub mod sheet;

use chrono::NaiveDateTime;
use formbox_core::submission::Submission;
use rust_xlsxwriter::{Format, Workbook};

pub use error::{Error, Result};
use sheet::{HEADERS, Row, TIMESTAMP_FORMAT, column_widths};

/// MIME type of the files produced by [`render`].
pub const CONTENT_TYPE: &str =
  "application/vnd.openxmlformats-officedocument.spreadsheetml.sheet";

/// Render `submissions`, in order, into a single-sheet `.xlsx` workbook.
///
/// Returns `Ok(None)` when there is nothing to export; callers report that as
/// a warning rather than serving an empty file.
pub fn render(submissions: &[Submission], sheet_title: &str) -> Result<Option<Vec<u8>>> {
  if submissions.is_empty() {
    return Ok(None);
  }

  let rows: Vec<Row<'_>> = submissions.iter().map(Row::from).collect();
  let header = Format::new().set_bold();
  let timestamp = Format::new().set_num_format(TIMESTAMP_FORMAT);

  let mut workbook = Workbook::new();
  let worksheet = workbook.add_worksheet();
  worksheet.set_name(sheet_title)?;

  for (col, title) in HEADERS.iter().enumerate() {
    worksheet.write_string_with_format(0, col as u16, *title, &header)?;
  }

  for (i, row) in rows.iter().enumerate() {
    let r = i as u32 + 1;
    worksheet.write_number(r, 0, row.id as f64)?;
    worksheet.write_string(r, 1, row.full_name)?;
    worksheet.write_string(r, 2, row.email)?;
    worksheet.write_string(r, 3, row.mobile_number)?;
    worksheet.write_string(r, 4, row.category)?;
    worksheet.write_string(r, 5, row.sub_category)?;
    worksheet.write_string(r, 6, row.agreed_to_terms)?;
    worksheet.write_datetime_with_format(r, 7, &row.created_at, &timestamp)?;
  }

  for (col, width) in column_widths(&rows).into_iter().enumerate() {
    worksheet.set_column_width(col as u16, width)?;
  }

  Ok(Some(workbook.save_to_buffer()?))
}

/// Download filename, e.g. `all_contact_submissions_20240309_140507.xlsx`.
pub fn filename(context: &str, at: NaiveDateTime) -> String {
  format!("{context}_contact_submissions_{}.xlsx", at.format("%Y%m%d_%H%M%S"))
}

#[cfg(test)]
mod tests {
  use std::io::Cursor;

  use calamine::{Data, Reader, Xlsx, open_workbook_from_rs};
  use chrono::{NaiveDate, TimeZone, Utc};

  use super::*;

  fn submission(id: i64, full_name: &str, email: &str, agreed: bool) -> Submission {
    let at = Utc.with_ymd_and_hms(2024, 3, 9, 14, 5, 7).unwrap();
    Submission {
      id,
      full_name: full_name.into(),
      email: email.into(),
      mobile_number: "+12025551234".into(),
      category: "Billing".into(),
      sub_category: "Refund".into(),
      agreed_to_terms: agreed,
      created_at: at,
      updated_at: at,
    }
  }

  fn read(bytes: Vec<u8>, sheet: &str) -> calamine::Range<Data> {
    let mut workbook: Xlsx<_> = open_workbook_from_rs(Cursor::new(bytes)).unwrap();
    assert_eq!(workbook.sheet_names(), [sheet.to_owned()]);
    workbook.worksheet_range(sheet).unwrap()
  }

  fn text(range: &calamine::Range<Data>, row: usize, col: usize) -> String {
    match range.get_value((row as u32, col as u32)) {
      Some(Data::String(s)) => s.clone(),
      other => panic!("expected string at ({row}, {col}), got {other:?}"),
    }
  }

  #[test]
  fn empty_input_produces_no_file() {
    assert!(render(&[], "All Contact Submissions").unwrap().is_none());
  }

  #[test]
  fn workbook_has_header_plus_one_row_per_submission() {
    let submissions = vec![
      submission(3, "Jane Doe", "jane@x.com", true),
      submission(2, "John Roe", "john@x.com", false),
      submission(1, "Ann Poe", "ann@x.com", true),
    ];
    let bytes = render(&submissions, "Contact Submissions").unwrap().unwrap();
    let range = read(bytes, "Contact Submissions");

    assert_eq!(range.height(), 4);
    assert_eq!(range.width(), 8);

    let headers: Vec<String> = (0..8).map(|c| text(&range, 0, c)).collect();
    assert_eq!(headers, HEADERS);

    // Input order is preserved.
    let names: Vec<String> = (1..4).map(|r| text(&range, r, 1)).collect();
    assert_eq!(names, ["Jane Doe", "John Roe", "Ann Poe"]);

    let agreed: Vec<String> = (1..4).map(|r| text(&range, r, 6)).collect();
    assert_eq!(agreed, ["Yes", "No", "Yes"]);
  }

  #[test]
  fn cells_carry_submission_values() {
    let bytes = render(&[submission(1, "Jane Doe", "jane@x.com", true)], "All Contact Submissions")
      .unwrap()
      .unwrap();
    let range = read(bytes, "All Contact Submissions");

    assert_eq!(range.get_value((1, 0)), Some(&Data::Float(1.0)));
    assert_eq!(text(&range, 1, 2), "jane@x.com");
    assert_eq!(text(&range, 1, 3), "+12025551234");
    assert_eq!(text(&range, 1, 4), "Billing");
    assert_eq!(text(&range, 1, 5), "Refund");
    assert!(
      matches!(range.get_value((1, 7)), Some(Data::DateTime(_))),
      "created at: {:?}",
      range.get_value((1, 7))
    );
  }

  #[test]
  fn invalid_sheet_title_is_an_error() {
    let result = render(&[submission(1, "Jane Doe", "jane@x.com", true)], "bad/title");
    assert!(matches!(result, Err(Error::Xlsx(_))));
  }

  #[test]
  fn filename_embeds_context_and_timestamp() {
    let at = NaiveDate::from_ymd_opt(2024, 3, 9)
      .unwrap()
      .and_hms_opt(14, 5, 7)
      .unwrap();
    assert_eq!(filename("all", at), "all_contact_submissions_20240309_140507.xlsx");
    assert_eq!(
      filename("selected", at),
      "selected_contact_submissions_20240309_140507.xlsx"
    );
  }
}
