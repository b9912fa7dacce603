//! [`SqliteStore`] — the SQLite implementation of [`SubmissionStore`].

use std::path::Path;

use chrono::Utc;
use rusqlite::{OptionalExtension as _, types::Value};

use formbox_core::{
  store::SubmissionStore,
  submission::{Inserted, NewSubmission, Submission, SubmissionFilter},
};

use crate::{
  Result,
  encode::{COLUMNS, RawSubmission, decode_dt, encode_dt, like_pattern},
  schema::SCHEMA,
};

const ORDER: &str = "ORDER BY created_at DESC, id DESC";

// ─── Store ───────────────────────────────────────────────────────────────────

/// A formbox submission store backed by a single SQLite file.
///
/// Cloning is cheap — the inner connection is reference-counted.
#[derive(Clone)]
pub struct SqliteStore {
  conn: tokio_rusqlite::Connection,
}

impl SqliteStore {
  /// Open (or create) a store at `path` and run schema initialisation.
  pub async fn open(path: impl AsRef<Path>) -> Result<Self> {
    let conn = tokio_rusqlite::Connection::open(path).await?;
    let store = Self { conn };
    store.init_schema().await?;
    Ok(store)
  }

  /// Open an in-memory store — useful for testing.
  pub async fn open_in_memory() -> Result<Self> {
    let conn = tokio_rusqlite::Connection::open_in_memory().await?;
    let store = Self { conn };
    store.init_schema().await?;
    Ok(store)
  }

  async fn init_schema(&self) -> Result<()> {
    self
      .conn
      .call(|conn| {
        conn.execute_batch(SCHEMA)?;
        Ok(())
      })
      .await?;
    Ok(())
  }

  /// Run a `SELECT {COLUMNS} ...` query and decode every row.
  async fn select(&self, tail: String, params: Vec<Value>) -> Result<Vec<Submission>> {
    let raws: Vec<RawSubmission> = self
      .conn
      .call(move |conn| {
        let mut stmt =
          conn.prepare(&format!("SELECT {COLUMNS} FROM contact_submissions {tail}"))?;
        let rows = stmt
          .query_map(rusqlite::params_from_iter(params), RawSubmission::from_row)?
          .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(rows)
      })
      .await?;

    raws.into_iter().map(RawSubmission::into_submission).collect()
  }
}

// ─── SubmissionStore impl ────────────────────────────────────────────────────

impl SubmissionStore for SqliteStore {
  type Error = crate::Error;

  async fn email_exists(&self, email: &str) -> Result<bool> {
    let email = email.to_owned();

    let found = self
      .conn
      .call(move |conn| {
        Ok(
          conn
            .query_row(
              "SELECT 1 FROM contact_submissions WHERE email = ?1",
              rusqlite::params![email],
              |_| Ok(true),
            )
            .optional()?
            .unwrap_or(false),
        )
      })
      .await?;

    Ok(found)
  }

  async fn insert(&self, new: NewSubmission) -> Result<Inserted> {
    // Round-trip through the column encoding so the returned timestamps are
    // exactly what later reads will produce.
    let at_str = encode_dt(Utc::now());
    let at = decode_dt(&at_str)?;
    let row = new.clone();

    let id: Option<i64> = self
      .conn
      .call(move |conn| {
        let result = conn.execute(
          "INSERT INTO contact_submissions (
             full_name, email, mobile_number, category, sub_category,
             agreed_to_terms, created_at, updated_at
           ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?7)",
          rusqlite::params![
            row.full_name,
            row.email,
            row.mobile_number,
            row.category,
            row.sub_category,
            row.agreed_to_terms,
            at_str,
          ],
        );
        match result {
          Ok(_) => Ok(Some(conn.last_insert_rowid())),
          Err(rusqlite::Error::SqliteFailure(e, _))
            if e.extended_code == rusqlite::ffi::SQLITE_CONSTRAINT_UNIQUE =>
          {
            Ok(None)
          }
          Err(e) => Err(e.into()),
        }
      })
      .await?;

    let Some(id) = id else {
      return Ok(Inserted::DuplicateEmail);
    };

    Ok(Inserted::Created(Submission {
      id,
      full_name: new.full_name,
      email: new.email,
      mobile_number: new.mobile_number,
      category: new.category,
      sub_category: new.sub_category,
      agreed_to_terms: new.agreed_to_terms,
      created_at: at,
      updated_at: at,
    }))
  }

  async fn get(&self, id: i64) -> Result<Option<Submission>> {
    let rows = self
      .select("WHERE id = ?1".to_owned(), vec![Value::Integer(id)])
      .await?;
    Ok(rows.into_iter().next())
  }

  async fn list(&self, filter: &SubmissionFilter) -> Result<Vec<Submission>> {
    let mut clauses: Vec<String> = Vec::new();
    let mut params: Vec<Value> = Vec::new();

    let mut bind = |clause: &dyn Fn(usize) -> String, value: Value| {
      params.push(value);
      clauses.push(clause(params.len()));
    };

    if let Some(category) = &filter.category {
      bind(&|n| format!("category = ?{n}"), Value::Text(category.clone()));
    }
    if let Some(sub_category) = &filter.sub_category {
      bind(&|n| format!("sub_category = ?{n}"), Value::Text(sub_category.clone()));
    }
    if let Some(agreed) = filter.agreed_to_terms {
      bind(&|n| format!("agreed_to_terms = ?{n}"), Value::Integer(agreed.into()));
    }
    if let Some(after) = filter.created_after {
      bind(&|n| format!("created_at >= ?{n}"), Value::Text(encode_dt(after)));
    }
    if let Some(before) = filter.created_before {
      bind(&|n| format!("created_at < ?{n}"), Value::Text(encode_dt(before)));
    }
    if let Some(search) = filter.search.as_deref().map(str::trim).filter(|s| !s.is_empty()) {
      bind(
        &|n| {
          format!(
            "(full_name LIKE ?{n} ESCAPE '\\' \
              OR email LIKE ?{n} ESCAPE '\\' \
              OR mobile_number LIKE ?{n} ESCAPE '\\')"
          )
        },
        Value::Text(like_pattern(search)),
      );
    }

    let tail = if clauses.is_empty() {
      ORDER.to_owned()
    } else {
      format!("WHERE {} {ORDER}", clauses.join(" AND "))
    };

    self.select(tail, params).await
  }

  async fn get_many(&self, ids: &[i64]) -> Result<Vec<Submission>> {
    if ids.is_empty() {
      return Ok(Vec::new());
    }

    let placeholders = (1..=ids.len())
      .map(|n| format!("?{n}"))
      .collect::<Vec<_>>()
      .join(", ");
    let params = ids.iter().copied().map(Value::Integer).collect();

    self
      .select(format!("WHERE id IN ({placeholders}) {ORDER}"), params)
      .await
  }
}
