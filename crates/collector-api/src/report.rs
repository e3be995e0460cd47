//! Read-only report endpoints: the expiring-soon view and CSV export.

use axum::{
  Json,
  extract::{Query, State},
  http::header,
  response::IntoResponse,
};
use chrono::Local;
use collector_core::{
  collector::Collector,
  export::{export_filename, to_csv_bytes},
  store::{CollectorQuery, CollectorStore},
};
use serde::Deserialize;

use crate::{AppState, error::ApiError};

#[derive(Debug, Deserialize, Default)]
pub struct ExpiringParams {
  /// Look-ahead in days; defaults to the configured window.
  pub days: Option<i64>,
}

/// `GET /collectors/expiring-soon[?days=N]`
pub async fn expiring_soon<S>(
  State(state): State<AppState<S>>,
  Query(params): Query<ExpiringParams>,
) -> Result<Json<Vec<Collector>>, ApiError>
where
  S: CollectorStore,
{
  let days = params.days.unwrap_or(state.settings.expiring_window_days);
  if days < 0 {
    return Err(ApiError::BadRequest("days must not be negative".into()));
  }

  let collectors = state
    .store
    .expiring_soon(days)
    .await
    .map_err(ApiError::from_store)?;
  Ok(Json(collectors))
}

/// `GET /collectors/export.csv` — same query params as `GET /collectors`.
pub async fn export_csv<S>(
  State(state): State<AppState<S>>,
  Query(query): Query<CollectorQuery>,
) -> Result<impl IntoResponse, ApiError>
where
  S: CollectorStore,
{
  let collectors = state
    .store
    .list(&query)
    .await
    .map_err(ApiError::from_store)?;
  let body = to_csv_bytes(&collectors)?;
  let filename = export_filename(Local::now().naive_local());
  tracing::info!(rows = collectors.len(), %filename, "exported collectors");

  Ok((
    [
      (header::CONTENT_TYPE, "text/csv; charset=utf-8".to_owned()),
      (
        header::CONTENT_DISPOSITION,
        format!("attachment; filename={filename}"),
      ),
    ],
    body,
  ))
}
