//! Handlers for `/collectors` endpoints.
//!
//! | Method   | Path | Notes |
//! |----------|------|-------|
//! | `GET`    | `/collectors` | Query params map to [`CollectorQuery`] |
//! | `POST`   | `/collectors` | Body: [`NewCollector`]; 201, 422, or 409 |
//! | `GET`    | `/collectors/:id` | 404 if not found |
//! | `PUT`    | `/collectors/:id` | Full replacement; 422, 409, or 404 |
//! | `DELETE` | `/collectors/:id` | 204, or 404 if not found |
//! | `POST`   | `/collectors/:id/reminders` | Increments the reminder count |

use axum::{
  Json,
  extract::{Path, Query, State},
  http::StatusCode,
  response::IntoResponse,
};
use collector_core::{
  collector::{Collector, NewCollector},
  store::{CollectorQuery, CollectorStore},
};
use uuid::Uuid;

use crate::{AppState, error::ApiError};

// ─── List ─────────────────────────────────────────────────────────────────────

/// `GET /collectors[?text=...][&status=...][&expiration_from=...][&expiration_to=...][&limit=...][&offset=...]`
pub async fn list<S>(
  State(state): State<AppState<S>>,
  Query(query): Query<CollectorQuery>,
) -> Result<Json<Vec<Collector>>, ApiError>
where
  S: CollectorStore,
{
  let collectors = state
    .store
    .list(&query)
    .await
    .map_err(ApiError::from_store)?;
  Ok(Json(collectors))
}

// ─── Create ───────────────────────────────────────────────────────────────────

/// `POST /collectors` — body: [`NewCollector`]
pub async fn create<S>(
  State(state): State<AppState<S>>,
  Json(body): Json<NewCollector>,
) -> Result<impl IntoResponse, ApiError>
where
  S: CollectorStore,
{
  let collector = state
    .store
    .create(body)
    .await
    .map_err(ApiError::from_store)?;
  tracing::info!(collector_id = %collector.collector_id, "created collector {collector}");
  Ok((StatusCode::CREATED, Json(collector)))
}

// ─── Get one ──────────────────────────────────────────────────────────────────

/// `GET /collectors/:id`
pub async fn get_one<S>(
  State(state): State<AppState<S>>,
  Path(id): Path<Uuid>,
) -> Result<Json<Collector>, ApiError>
where
  S: CollectorStore,
{
  let collector = state
    .store
    .get(id)
    .await
    .map_err(ApiError::from_store)?
    .ok_or_else(|| ApiError::NotFound(format!("collector {id} not found")))?;
  Ok(Json(collector))
}

// ─── Replace ──────────────────────────────────────────────────────────────────

/// `PUT /collectors/:id` — body: [`NewCollector`]
pub async fn replace<S>(
  State(state): State<AppState<S>>,
  Path(id): Path<Uuid>,
  Json(body): Json<NewCollector>,
) -> Result<Json<Collector>, ApiError>
where
  S: CollectorStore,
{
  let collector = state
    .store
    .update(id, body)
    .await
    .map_err(ApiError::from_store)?;
  tracing::info!(collector_id = %id, "updated collector {collector}");
  Ok(Json(collector))
}

// ─── Delete ───────────────────────────────────────────────────────────────────

/// `DELETE /collectors/:id`
pub async fn delete_one<S>(
  State(state): State<AppState<S>>,
  Path(id): Path<Uuid>,
) -> Result<StatusCode, ApiError>
where
  S: CollectorStore,
{
  let deleted = state
    .store
    .delete(id)
    .await
    .map_err(ApiError::from_store)?;
  if !deleted {
    return Err(ApiError::NotFound(format!("collector {id} not found")));
  }
  tracing::info!(collector_id = %id, "deleted collector");
  Ok(StatusCode::NO_CONTENT)
}

// ─── Reminders ────────────────────────────────────────────────────────────────

/// `POST /collectors/:id/reminders`
pub async fn record_reminder<S>(
  State(state): State<AppState<S>>,
  Path(id): Path<Uuid>,
) -> Result<Json<Collector>, ApiError>
where
  S: CollectorStore,
{
  let collector = state
    .store
    .record_reminder(id)
    .await
    .map_err(ApiError::from_store)?;
  Ok(Json(collector))
}
