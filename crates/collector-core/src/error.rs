//! Error types for `collector-core`.

use thiserror::Error;

use crate::validate::ViolationSet;

#[derive(Debug, Error)]
pub enum Error {
  #[error("invalid record: {0}")]
  Validation(#[from] ViolationSet),

  #[error("unknown collector status: {0:?}")]
  UnknownStatus(String),

  #[error("csv error: {0}")]
  Csv(#[from] csv::Error),

  #[error("io error: {0}")]
  Io(#[from] std::io::Error),
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
