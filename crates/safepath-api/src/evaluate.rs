//! `GET /evaluate?lat=..&lng=..`: classify a point without touching any
//! subject's state.

use axum::{
  Json,
  extract::{Query, State, rejection::QueryRejection},
};
use safepath_core::{
  evaluator::{Assessment, assess},
  geometry::Point,
  repository::Repository,
};
use serde::Deserialize;

use crate::{ApiState, error::ApiError, extract::extract_query};

#[derive(Debug, Deserialize)]
pub struct PointParams {
  pub lat: f64,
  pub lng: f64,
}

/// `GET /evaluate`
pub async fn handler<R>(
  State(state): State<ApiState<R>>,
  params: Result<Query<PointParams>, QueryRejection>,
) -> Result<Json<Assessment>, ApiError>
where
  R: Repository + 'static,
{
  let params = extract_query(params)?;
  let snapshot = state.store().snapshot();
  let assessment = assess(Point::new(params.lat, params.lng), snapshot.zones())?;
  Ok(Json(assessment))
}
