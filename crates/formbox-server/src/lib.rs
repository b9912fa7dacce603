//! HTTP server for formbox.
//!
//! Combines the public JSON API from `formbox-api` (under `/api/contact`) with
//! the Basic-auth protected admin surface (under `/admin/contact-submissions`)
//! into one axum [`Router`] backed by any [`SubmissionStore`].

pub mod admin;
pub mod auth;
pub mod error;

pub use error::Error;

use std::{path::PathBuf, sync::Arc};

use axum::{Router, routing::get};
use formbox_core::store::SubmissionStore;
use serde::Deserialize;
use tower_http::trace::TraceLayer;

use auth::AuthConfig;

// ─── Configuration ────────────────────────────────────────────────────────────

/// Runtime server configuration, deserialised from `config.toml` and
/// `FORMBOX_*` environment variables.
#[derive(Deserialize, Clone)]
pub struct ServerConfig {
  #[serde(default = "default_host")]
  pub host:                String,
  #[serde(default = "default_port")]
  pub port:                u16,
  #[serde(default = "default_store_path")]
  pub store_path:          PathBuf,
  pub admin_username:      String,
  pub admin_password_hash: String,
}

fn default_host() -> String { "127.0.0.1".to_string() }
fn default_port() -> u16 { 8000 }
fn default_store_path() -> PathBuf { PathBuf::from("formbox.sqlite3") }

// ─── Application state ────────────────────────────────────────────────────────

/// Shared state threaded through the admin handlers.
#[derive(Clone)]
pub struct AppState<S: SubmissionStore> {
  pub store: Arc<S>,
  pub auth:  Arc<AuthConfig>,
}

// ─── Router ───────────────────────────────────────────────────────────────────

/// Build the complete formbox [`Router`].
pub fn router<S>(state: AppState<S>) -> Router
where
  S: SubmissionStore + Clone + Send + Sync + 'static,
{
  let admin = Router::new()
    .route(admin::CHANGELIST,                   get(admin::changelist::<S>).post(admin::run_action::<S>))
    .route(admin::EXPORT_ALL_URL,               get(admin::export_all_excel::<S>))
    .route("/admin/contact-submissions/{id}/",  get(admin::detail::<S>))
    .with_state(state.clone());

  Router::new()
    .nest("/api/contact", formbox_api::api_router(state.store))
    .merge(admin)
    .layer(TraceLayer::new_for_http())
}

// ─── Integration tests ────────────────────────────────────────────────────────
