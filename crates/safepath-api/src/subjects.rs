//! `GET /subjects/{id}/zones`: the zones a subject was inside at its last
//! applied sample. 404 for subjects never seen.

use axum::{
  Json,
  extract::{Path, State},
};
use safepath_core::{notifier::SubjectPresence, repository::Repository, sample::SubjectId};

use crate::{ApiState, error::ApiError};

/// `GET /subjects/{id}/zones`
pub async fn zones<R>(
  State(state): State<ApiState<R>>,
  Path(id): Path<String>,
) -> Result<Json<SubjectPresence>, ApiError>
where
  R: Repository + 'static,
{
  Ok(Json(state.notifier.subject_zones(&SubjectId::new(id))?))
}
