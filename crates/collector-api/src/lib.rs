//! JSON REST API for the collector records store.
//!
//! Exposes an axum [`Router`] backed by any
//! [`collector_core::store::CollectorStore`]. Auth, TLS, and transport
//! concerns are the caller's responsibility.
//!
//! # Mounting
//!
//! ```rust,ignore
//! .nest("/api", collector_api::api_router(store.clone(), ApiSettings::default()))
//! ```

pub mod collectors;
pub mod error;
pub mod report;

use std::sync::Arc;

use axum::{
  Router,
  routing::{get, post},
};
use collector_core::{report::DEFAULT_EXPIRING_WINDOW_DAYS, store::CollectorStore};

pub use error::ApiError;

/// Tunables for the API surface.
#[derive(Debug, Clone, Copy)]
pub struct ApiSettings {
  /// Look-ahead of `GET /collectors/expiring-soon` when `days` is omitted.
  pub expiring_window_days: i64,
}

impl Default for ApiSettings {
  fn default() -> Self {
    Self { expiring_window_days: DEFAULT_EXPIRING_WINDOW_DAYS }
  }
}

/// Shared state threaded through all handlers.
pub struct AppState<S> {
  pub store:    Arc<S>,
  pub settings: ApiSettings,
}

impl<S> Clone for AppState<S> {
  fn clone(&self) -> Self {
    Self { store: Arc::clone(&self.store), settings: self.settings }
  }
}

/// Build a fully-materialised API router for `store`.
///
/// The returned `Router<()>` can be nested into any parent router regardless
/// of its own state type.
pub fn api_router<S>(store: Arc<S>, settings: ApiSettings) -> Router<()>
where
  S: CollectorStore + 'static,
{
  Router::new()
    .route(
      "/collectors",
      get(collectors::list::<S>).post(collectors::create::<S>),
    )
    // Reports (static segments win over `{id}`)
    .route("/collectors/expiring-soon", get(report::expiring_soon::<S>))
    .route("/collectors/export.csv", get(report::export_csv::<S>))
    .route(
      "/collectors/{id}",
      get(collectors::get_one::<S>)
        .put(collectors::replace::<S>)
        .delete(collectors::delete_one::<S>),
    )
    .route(
      "/collectors/{id}/reminders",
      post(collectors::record_reminder::<S>),
    )
    .with_state(AppState { store, settings })
}
