//! Core types and trait definitions for the formbox contact-form backend.
//!
//! This crate is deliberately free of HTTP and database dependencies. The
//! validator and the intake pipeline live here so every surface (JSON API,
//! admin routes, tests) shares one set of rules.

pub mod error;
pub mod intake;
pub mod store;
pub mod submission;
pub mod validate;

pub use error::{Error, Result};

#[cfg(test)]
pub(crate) mod testing;
