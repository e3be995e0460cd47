//! API error type and [`axum::response::IntoResponse`] implementation.

use axum::{
  Json,
  http::StatusCode,
  response::{IntoResponse, Response},
};
use collector_core::{
  store::{Rejection, StoreError},
  validate::ViolationSet,
};
use serde_json::json;
use thiserror::Error;

/// An error returned by an API handler.
#[derive(Debug, Error)]
pub enum ApiError {
  #[error("not found: {0}")]
  NotFound(String),

  #[error("bad request: {0}")]
  BadRequest(String),

  #[error("invalid record: {0}")]
  Invalid(ViolationSet),

  #[error("conflict: {0}")]
  Conflict(String),

  #[error("export error: {0}")]
  Export(#[from] collector_core::Error),

  #[error("store error: {0}")]
  Store(#[source] Box<dyn std::error::Error + Send + Sync>),
}

impl ApiError {
  /// Classify a backend error by what the caller did wrong, if anything.
  pub fn from_store<E: StoreError>(err: E) -> Self {
    let rejected = match err.rejection() {
      Some(Rejection::Invalid(violations)) => {
        Some(Self::Invalid(violations.clone()))
      }
      Some(Rejection::Conflict(field)) => Some(Self::Conflict(format!(
        "a collector with this {field} already exists"
      ))),
      Some(Rejection::NotFound(id)) => {
        Some(Self::NotFound(format!("collector {id} not found")))
      }
      None => None,
    };
    rejected.unwrap_or_else(|| Self::Store(Box::new(err)))
  }
}

impl IntoResponse for ApiError {
  fn into_response(self) -> Response {
    let (status, message) = match &self {
      ApiError::NotFound(m) => (StatusCode::NOT_FOUND, m.clone()),
      ApiError::BadRequest(m) => (StatusCode::BAD_REQUEST, m.clone()),
      ApiError::Conflict(m) => (StatusCode::CONFLICT, m.clone()),
      ApiError::Invalid(violations) => {
        let body = json!({
          "error": "invalid record",
          "violations": violations,
        });
        return (StatusCode::UNPROCESSABLE_ENTITY, Json(body)).into_response();
      }
      ApiError::Export(e) => (StatusCode::INTERNAL_SERVER_ERROR, e.to_string()),
      ApiError::Store(e) => (StatusCode::INTERNAL_SERVER_ERROR, e.to_string()),
    };
    if status.is_server_error() {
      tracing::error!(error = %self, "request failed");
    }
    (status, Json(json!({ "error": message }))).into_response()
  }
}
