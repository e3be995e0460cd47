//! The `CollectorStore` trait and supporting query types.
//!
//! The trait is implemented by storage backends (e.g.
//! `collector-store-sqlite`). Higher layers (`collector-api`,
//! `collector-server`) depend on this abstraction, not on any concrete
//! backend.

use std::{fmt, future::Future};

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{
  collector::{Collector, NewCollector},
  report::ExpiringWindow,
  status::CollectorStatus,
  validate::ViolationSet,
};

// ─── Query type ──────────────────────────────────────────────────────────────

/// Parameters for [`CollectorStore::list`].
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CollectorQuery {
  /// Case-insensitive substring match on first or last name.
  pub text:            Option<String>,
  pub status:          Option<CollectorStatus>,
  /// Inclusive lower bound on `expiration_date`.
  pub expiration_from: Option<NaiveDate>,
  /// Inclusive upper bound on `expiration_date`.
  pub expiration_to:   Option<NaiveDate>,
  pub limit:           Option<usize>,
  pub offset:          Option<usize>,
}

impl From<ExpiringWindow> for CollectorQuery {
  fn from(window: ExpiringWindow) -> Self {
    Self {
      expiration_from: Some(window.from),
      expiration_to: Some(window.to),
      ..Self::default()
    }
  }
}

// ─── Error classification ────────────────────────────────────────────────────

/// A column the store keeps unique.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum UniqueField {
  PersonalNumber,
  Email,
}

impl UniqueField {
  pub fn column(self) -> &'static str {
    match self {
      Self::PersonalNumber => "personal_number",
      Self::Email => "email",
    }
  }
}

impl fmt::Display for UniqueField {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.write_str(self.column())
  }
}

/// Why a store refused an operation, as far as the caller is concerned.
#[derive(Debug, Clone, Copy)]
pub enum Rejection<'a> {
  Invalid(&'a ViolationSet),
  Conflict(UniqueField),
  NotFound(Uuid),
}

/// Errors from a [`CollectorStore`] backend.
///
/// [`rejection`](Self::rejection) separates failures the caller caused from
/// infrastructure faults, which return `None`.
pub trait StoreError: std::error::Error + Send + Sync + 'static {
  fn rejection(&self) -> Option<Rejection<'_>>;
}

// ─── Trait ───────────────────────────────────────────────────────────────────

/// Abstraction over a collector store backend.
///
/// Every create and update resolves omitted defaults against the store's
/// clock and runs [`crate::validate::validate`] before touching storage.
/// Uniqueness of `personal_number` and `email` is enforced by the backend
/// atomically with the write.
pub trait CollectorStore: Send + Sync {
  type Error: StoreError;

  /// Validate and persist a new collector.
  fn create(
    &self,
    input: NewCollector,
  ) -> impl Future<Output = Result<Collector, Self::Error>> + Send + '_;

  /// Replace every caller-owned field of an existing collector.
  ///
  /// `created_at` is preserved; `last_modified_at` is bumped.
  fn update(
    &self,
    id: Uuid,
    input: NewCollector,
  ) -> impl Future<Output = Result<Collector, Self::Error>> + Send + '_;

  /// Retrieve a collector by UUID. Returns `None` if not found.
  fn get(
    &self,
    id: Uuid,
  ) -> impl Future<Output = Result<Option<Collector>, Self::Error>> + Send + '_;

  /// Delete a collector. Returns `false` if it did not exist.
  fn delete(
    &self,
    id: Uuid,
  ) -> impl Future<Output = Result<bool, Self::Error>> + Send + '_;

  /// List collectors matching `query`, ordered by last name then first name.
  fn list<'a>(
    &'a self,
    query: &'a CollectorQuery,
  ) -> impl Future<Output = Result<Vec<Collector>, Self::Error>> + Send + 'a;

  /// Collectors whose expiration falls between today and
  /// `today + window_days`, inclusive, ordered by expiration date.
  fn expiring_soon(
    &self,
    window_days: i64,
  ) -> impl Future<Output = Result<Vec<Collector>, Self::Error>> + Send + '_;

  /// Increment the reminder counter of a collector.
  fn record_reminder(
    &self,
    id: Uuid,
  ) -> impl Future<Output = Result<Collector, Self::Error>> + Send + '_;
}
