//! SQL schema for the formbox SQLite store.
//!
//! Executed once at connection startup. `PRAGMA user_version` records the
//! layout so later migrations can be gated on it.

/// Full schema DDL; idempotent thanks to `CREATE TABLE IF NOT EXISTS`.
pub const SCHEMA: &str = "
PRAGMA journal_mode = WAL;

-- Rows are insert-only; no exposed operation issues UPDATE or DELETE.
CREATE TABLE IF NOT EXISTS contact_submissions (
    id              INTEGER PRIMARY KEY AUTOINCREMENT,
    full_name       TEXT    NOT NULL,
    email           TEXT    NOT NULL UNIQUE,
    mobile_number   TEXT    NOT NULL,
    category        TEXT    NOT NULL,
    sub_category    TEXT    NOT NULL,
    agreed_to_terms INTEGER NOT NULL DEFAULT 0,
    created_at      TEXT    NOT NULL,   -- RFC 3339 UTC, microseconds
    updated_at      TEXT    NOT NULL
);

CREATE INDEX IF NOT EXISTS contact_submissions_created_idx
    ON contact_submissions(created_at);

PRAGMA user_version = 1;
";
