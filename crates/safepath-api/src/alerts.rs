//! `GET /alerts[?limit=N]`: persisted alert records, newest first.
//! Authority only.

use axum::{
  Json,
  extract::{Query, State, rejection::QueryRejection},
};
use safepath_core::repository::{AlertRecord, Repository};
use serde::Deserialize;

use crate::{ApiState, authority::Authority, error::ApiError, extract::extract_query};

/// Upper bound on `limit`, whatever the caller asks for.
pub const MAX_ALERT_LIMIT: usize = 500;

#[derive(Debug, Deserialize)]
pub struct ListParams {
  pub limit: Option<usize>,
}

/// `GET /alerts`
pub async fn list<R>(
  State(state): State<ApiState<R>>,
  Authority(authority): Authority,
  params: Result<Query<ListParams>, QueryRejection>,
) -> Result<Json<Vec<AlertRecord>>, ApiError>
where
  R: Repository + 'static,
{
  let params = extract_query(params)?;
  let limit = params
    .limit
    .unwrap_or(state.alert_history_limit)
    .min(MAX_ALERT_LIMIT);
  tracing::debug!(%authority, limit, "listing alerts");

  let alerts = state.repo.list_alerts(limit).await.map_err(ApiError::store)?;
  Ok(Json(alerts))
}
