//! Admin surface: changelist, detail, and the spreadsheet exports.
//!
//! | Method | Path | Notes |
//! |--------|------|-------|
//! | `GET`  | `/admin/contact-submissions/` | Filtered listing + flash messages |
//! | `POST` | `/admin/contact-submissions/` | Bulk action `{action, selected}` |
//! | `GET`  | `/admin/contact-submissions/{id}/` | Full record |
//! | `GET`  | `/admin/contact-submissions/export-all-excel/` | Direct download |
//!
//! Exports never fail with an error status: an empty result or a failure
//! redirects back to the changelist with a message in the query string.

use axum::{
  Json,
  extract::{Path, Query, State, rejection::JsonRejection},
  http::header,
  response::{IntoResponse, Redirect, Response},
};
use chrono::{DateTime, Local, Utc};
use formbox_core::{
  store::SubmissionStore,
  submission::{Submission, SubmissionFilter},
};
use serde::{Deserialize, Serialize};

use crate::{AppState, auth::Authenticated, error::Error};

pub const CHANGELIST: &str = "/admin/contact-submissions/";
pub const EXPORT_ALL_URL: &str = "/admin/contact-submissions/export-all-excel/";

// ─── Flash messages ───────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Level {
  Success,
  Warning,
  Error,
}

impl Level {
  fn as_str(self) -> &'static str {
    match self {
      Level::Success => "success",
      Level::Warning => "warning",
      Level::Error => "error",
    }
  }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AdminMessage {
  pub level:   Level,
  pub message: String,
}

/// `303 See Other` back to the changelist, carrying `message`.
fn redirect(level: Level, message: &str) -> Response {
  let to = format!(
    "{CHANGELIST}?level={}&message={}",
    level.as_str(),
    urlencoding::encode(message),
  );
  Redirect::to(&to).into_response()
}

// ─── Changelist ───────────────────────────────────────────────────────────────

#[derive(Debug, Default, Deserialize)]
pub struct ChangelistParams {
  pub category:        Option<String>,
  pub sub_category:    Option<String>,
  pub agreed_to_terms: Option<bool>,
  pub created_after:   Option<DateTime<Utc>>,
  pub created_before:  Option<DateTime<Utc>>,
  pub q:               Option<String>,
  pub level:           Option<Level>,
  pub message:         Option<String>,
}

impl ChangelistParams {
  fn filter(&self) -> SubmissionFilter {
    SubmissionFilter {
      category:        self.category.clone(),
      sub_category:    self.sub_category.clone(),
      agreed_to_terms: self.agreed_to_terms,
      created_after:   self.created_after,
      created_before:  self.created_before,
      search:          self.q.clone().filter(|q| !q.trim().is_empty()),
    }
  }

  fn messages(&self) -> Vec<AdminMessage> {
    match (self.level, &self.message) {
      (Some(level), Some(message)) => vec![AdminMessage { level, message: message.clone() }],
      _ => Vec::new(),
    }
  }
}

#[derive(Debug, Serialize)]
pub struct Changelist {
  pub results:    Vec<Submission>,
  pub count:      usize,
  pub export_url: &'static str,
  pub messages:   Vec<AdminMessage>,
}

/// `GET /admin/contact-submissions/`
pub async fn changelist<S>(
  _: Authenticated,
  State(state): State<AppState<S>>,
  Query(params): Query<ChangelistParams>,
) -> Result<Json<Changelist>, Error>
where
  S: SubmissionStore + Clone + Send + Sync + 'static,
{
  let results = state
    .store
    .list(&params.filter())
    .await
    .map_err(|e| Error::Store(Box::new(e)))?;

  Ok(Json(Changelist {
    count: results.len(),
    results,
    export_url: EXPORT_ALL_URL,
    messages: params.messages(),
  }))
}

/// `GET /admin/contact-submissions/{id}/`
pub async fn detail<S>(
  _: Authenticated,
  State(state): State<AppState<S>>,
  Path(id): Path<i64>,
) -> Result<Json<Submission>, Error>
where
  S: SubmissionStore + Clone + Send + Sync + 'static,
{
  state
    .store
    .get(id)
    .await
    .map_err(|e| Error::Store(Box::new(e)))?
    .map(Json)
    .ok_or(Error::NotFound)
}

// ─── Exports ──────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Action {
  ExportSelectedToExcel,
  ExportAllToExcel,
}

/// Flash shown when the posted action is missing or unknown.
const NO_ACTION: &str = "No action selected.";

#[derive(Debug, Deserialize)]
pub struct ActionRequest {
  pub action:   Action,
  #[serde(default)]
  pub selected: Vec<i64>,
}

/// Which submissions an export covers.
#[derive(Debug, Clone, Copy)]
enum Scope<'a> {
  Selected(&'a [i64]),
  All,
}

impl Scope<'_> {
  /// Filename prefix.
  fn context(self) -> &'static str {
    match self {
      Scope::Selected(_) => "selected",
      Scope::All => "all",
    }
  }

  fn sheet_title(self) -> &'static str {
    match self {
      Scope::Selected(_) => "Contact Submissions",
      Scope::All => "All Contact Submissions",
    }
  }

  fn empty_message(self) -> &'static str {
    match self {
      Scope::Selected(_) => "No data selected to export",
      Scope::All => "No data available to export",
    }
  }
}

/// `POST /admin/contact-submissions/`
pub async fn run_action<S>(
  _: Authenticated,
  State(state): State<AppState<S>>,
  payload: Result<Json<ActionRequest>, JsonRejection>,
) -> Response
where
  S: SubmissionStore + Clone + Send + Sync + 'static,
{
  let Json(request) = match payload {
    Ok(request) => request,
    Err(e) => {
      tracing::warn!(error = %e.body_text(), "rejected admin action");
      return redirect(Level::Error, NO_ACTION);
    }
  };
  let scope = match request.action {
    Action::ExportSelectedToExcel => Scope::Selected(&request.selected),
    Action::ExportAllToExcel => Scope::All,
  };
  export(state.store.as_ref(), scope).await
}

/// `GET /admin/contact-submissions/export-all-excel/`
pub async fn export_all_excel<S>(_: Authenticated, State(state): State<AppState<S>>) -> Response
where
  S: SubmissionStore + Clone + Send + Sync + 'static,
{
  export(state.store.as_ref(), Scope::All).await
}

async fn export<S: SubmissionStore>(store: &S, scope: Scope<'_>) -> Response {
  match render(store, scope).await {
    Ok(Some((count, bytes))) => {
      match scope {
        Scope::Selected(_) => tracing::info!("Successfully exported {count} submissions to Excel"),
        Scope::All => tracing::info!("Successfully exported all {count} submissions to Excel"),
      }
      let filename = formbox_export::filename(scope.context(), Local::now().naive_local());
      attachment(bytes, &filename)
    }
    Ok(None) => redirect(Level::Warning, scope.empty_message()),
    Err(e) => {
      tracing::error!(error = %e, "export failed");
      redirect(Level::Error, &format!("Export failed: {e}"))
    }
  }
}

/// Fetch the submissions in `scope` and render them. `None` when there are none.
async fn render<S: SubmissionStore>(
  store: &S,
  scope: Scope<'_>,
) -> Result<Option<(usize, Vec<u8>)>, Error> {
  let submissions = match scope {
    Scope::Selected(ids) => store.get_many(ids).await,
    Scope::All => store.list(&SubmissionFilter::default()).await,
  }
  .map_err(|e| Error::Store(Box::new(e)))?;

  let bytes = formbox_export::render(&submissions, scope.sheet_title())?;
  Ok(bytes.map(|b| (submissions.len(), b)))
}

fn attachment(bytes: Vec<u8>, filename: &str) -> Response {
  (
    [
      (header::CONTENT_TYPE, formbox_export::CONTENT_TYPE.to_owned()),
      (header::CONTENT_DISPOSITION, format!("attachment; filename=\"{filename}\"")),
    ],
    bytes,
  )
    .into_response()
}
