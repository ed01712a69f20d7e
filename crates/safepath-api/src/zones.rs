//! Handlers for `/zones` endpoints.
//!
//! | Method   | Path | Notes |
//! |----------|------|-------|
//! | `GET`    | `/zones` | Active zones. Optional `?type=safe\|restricted`; `ETag` / `If-None-Match` |
//! | `POST`   | `/zones` | Authority. Body: `{"name", "type", "coordinates": [[lng, lat], ...]}` |
//! | `GET`    | `/zones/{id}` | Includes inactive zones; 404 if unknown |
//! | `DELETE` | `/zones/{id}` | Authority. Creator or super-authority only |
//!
//! Coordinates on the wire are `[lng, lat]` pairs and rings are returned
//! explicitly closed. This module is the only place that pair order exists.

use axum::{
  Json,
  extract::{
    Path, Query, State,
    rejection::{JsonRejection, QueryRejection},
  },
  http::{HeaderMap, StatusCode, header},
  response::{IntoResponse, Response},
};
use chrono::{DateTime, Utc};
use safepath_core::{
  geometry::Point,
  repository::Repository,
  zone::{AuthorityId, NewZone, Zone, ZoneId, ZoneKind},
};
use serde::{Deserialize, Serialize};

use crate::{
  ApiState,
  authority::Authority,
  error::ApiError,
  etag::{if_none_match, zone_set_etag},
  extract::{extract_json, extract_query},
};

// ─── Wire type ───────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ZoneView {
  pub id:          ZoneId,
  pub name:        String,
  #[serde(skip_serializing_if = "Option::is_none")]
  pub description: Option<String>,
  #[serde(rename = "type")]
  pub kind:        ZoneKind,
  /// Closed ring of `[lng, lat]` pairs.
  pub coordinates: Vec<[f64; 2]>,
  pub created_by:  AuthorityId,
  pub created_at:  DateTime<Utc>,
  pub active:      bool,
}

impl From<&Zone> for ZoneView {
  fn from(zone: &Zone) -> Self {
    Self {
      id:          zone.id,
      name:        zone.name.clone(),
      description: zone.description.clone(),
      kind:        zone.kind,
      coordinates: zone
        .closed_boundary()
        .into_iter()
        .map(Point::to_lng_lat)
        .collect(),
      created_by:  zone.created_by.clone(),
      created_at:  zone.created_at,
      active:      zone.active,
    }
  }
}

// ─── List ────────────────────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
pub struct ListParams {
  #[serde(rename = "type")]
  pub kind: Option<ZoneKind>,
}

/// `GET /zones[?type=<kind>]`
pub async fn list<R>(
  State(state): State<ApiState<R>>,
  headers: HeaderMap,
  params: Result<Query<ListParams>, QueryRejection>,
) -> Result<Response, ApiError>
where
  R: Repository + 'static,
{
  let params = extract_query(params)?;
  let zones = state.store().list_active(params.kind);
  let etag = zone_set_etag(&zones);

  if if_none_match(&headers, &etag) {
    return Ok((StatusCode::NOT_MODIFIED, [(header::ETAG, etag)]).into_response());
  }

  let views: Vec<ZoneView> = zones.iter().map(|z| ZoneView::from(z.as_ref())).collect();
  Ok(([(header::ETAG, etag)], Json(views)).into_response())
}

// ─── Create ──────────────────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
pub struct CreateBody {
  pub name:        String,
  #[serde(default)]
  pub description: Option<String>,
  #[serde(rename = "type")]
  pub kind:        ZoneKind,
  /// `[lng, lat]` pairs; the ring may be open or closed.
  pub coordinates: Vec<[f64; 2]>,
}

/// `POST /zones`
///
/// The zone is admitted in memory first and then persisted. If persistence
/// fails the zone is deactivated again and the request fails with 500.
pub async fn create<R>(
  State(state): State<ApiState<R>>,
  Authority(authority): Authority,
  body: Result<Json<CreateBody>, JsonRejection>,
) -> Result<impl IntoResponse, ApiError>
where
  R: Repository + 'static,
{
  let body = extract_json(body)?;
  let boundary = body.coordinates.into_iter().map(Point::from_lng_lat).collect();
  let mut input = NewZone::new(body.name, body.kind, boundary, authority);
  input.description = body.description;

  let zone = state.manager.create_zone(input)?;

  if let Err(e) = state.repo.save_zone(&zone).await {
    tracing::error!(zone_id = %zone.id, "failed to persist zone; withdrawing it: {e}");
    if let Err(withdraw) = state.store().deactivate(zone.id) {
      tracing::error!(zone_id = %zone.id, "failed to withdraw zone: {withdraw}");
    }
    return Err(ApiError::store(e));
  }

  Ok((StatusCode::CREATED, Json(ZoneView::from(zone.as_ref()))))
}

// ─── Get one ─────────────────────────────────────────────────────────────────

/// `GET /zones/{id}`
pub async fn get_one<R>(
  State(state): State<ApiState<R>>,
  Path(id): Path<ZoneId>,
) -> Result<Json<ZoneView>, ApiError>
where
  R: Repository + 'static,
{
  let zone = state.store().get(id)?;
  Ok(Json(ZoneView::from(zone.as_ref())))
}

// ─── Delete ──────────────────────────────────────────────────────────────────

/// `DELETE /zones/{id}`; soft delete, returns the deactivated zone.
///
/// The authority check runs first and the row is persisted before the zone
/// leaves the in-memory store, so a failed write changes nothing.
pub async fn delete_one<R>(
  State(state): State<ApiState<R>>,
  Authority(authority): Authority,
  Path(id): Path<ZoneId>,
) -> Result<Json<ZoneView>, ApiError>
where
  R: Repository + 'static,
{
  state.manager.authorize_delete(id, &authority)?;

  let persisted = state
    .repo
    .deactivate_zone(id, Utc::now())
    .await
    .map_err(ApiError::store)?;
  if !persisted {
    tracing::warn!(zone_id = %id, "deactivated zone had no persisted row");
  }

  let zone = state.manager.delete_zone(id, &authority)?;
  Ok(Json(ZoneView::from(zone.as_ref())))
}
