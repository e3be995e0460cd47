//! Error type for `collector-store-sqlite`.

use collector_core::{
  store::{Rejection, StoreError, UniqueField},
  validate::ViolationSet,
};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
  #[error("core error: {0}")]
  Core(#[from] collector_core::Error),

  #[error("invalid record: {0}")]
  Validation(#[from] ViolationSet),

  /// A `UNIQUE` constraint rejected the write.
  #[error("a collector with this {0} already exists")]
  Conflict(UniqueField),

  #[error("collector not found: {0}")]
  NotFound(uuid::Uuid),

  #[error("database error: {0}")]
  Database(#[source] tokio_rusqlite::Error),

  #[error("uuid parse error: {0}")]
  Uuid(#[from] uuid::Error),

  #[error("decode error: {0}")]
  Decode(String),
}

pub type Result<T, E = Error> = std::result::Result<T, E>;

impl From<tokio_rusqlite::Error> for Error {
  fn from(err: tokio_rusqlite::Error) -> Self {
    if let tokio_rusqlite::Error::Rusqlite(rusqlite::Error::SqliteFailure(
      code,
      Some(message),
    )) = &err
      && code.extended_code == rusqlite::ffi::SQLITE_CONSTRAINT_UNIQUE
      && let Some(field) = unique_field(message)
    {
      return Self::Conflict(field);
    }
    Self::Database(err)
  }
}

/// Map `UNIQUE constraint failed: collectors.<column>` to its field.
fn unique_field(message: &str) -> Option<UniqueField> {
  let column = message
    .strip_prefix("UNIQUE constraint failed: ")?
    .rsplit('.')
    .next()?;
  match column {
    "personal_number" => Some(UniqueField::PersonalNumber),
    "email" => Some(UniqueField::Email),
    _ => None,
  }
}

impl StoreError for Error {
  fn rejection(&self) -> Option<Rejection<'_>> {
    match self {
      Self::Validation(violations)
      | Self::Core(collector_core::Error::Validation(violations)) => {
        Some(Rejection::Invalid(violations))
      }
      Self::Conflict(field) => Some(Rejection::Conflict(*field)),
      Self::NotFound(id) => Some(Rejection::NotFound(*id)),
      _ => None,
    }
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn unique_messages_map_to_fields() {
    assert_eq!(
      unique_field("UNIQUE constraint failed: collectors.personal_number"),
      Some(UniqueField::PersonalNumber)
    );
    assert_eq!(
      unique_field("UNIQUE constraint failed: collectors.email"),
      Some(UniqueField::Email)
    );
    assert_eq!(
      unique_field("UNIQUE constraint failed: collectors.collector_id"),
      None
    );
    assert_eq!(unique_field("NOT NULL constraint failed: collectors.email"), None);
  }
}
