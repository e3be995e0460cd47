//! SQLite backend for the collector records store.
//!
//! Wraps [`tokio_rusqlite`] so all database access runs on a dedicated thread
//! without blocking the async runtime. Uniqueness of personal numbers and
//! email addresses is enforced by `UNIQUE` column constraints, so concurrent
//! writers cannot both succeed.

mod encode;
mod schema;
mod store;

pub mod error;

pub use error::{Error, Result};
pub use store::SqliteStore;
