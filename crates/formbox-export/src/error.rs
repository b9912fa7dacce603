//! Error type for `formbox-export`.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
  #[error("xlsx error: {0}")]
  Xlsx(#[from] rust_xlsxwriter::XlsxError),
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
