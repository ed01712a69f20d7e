//! `POST /samples`: feed one location sample to the breach notifier.
//!
//! Body: `{"subjectId": "T1", "lat": 5.0, "lng": 5.0, "observedAt": "..."}`.
//! `observedAt` defaults to the time the request is handled.
//!
//! Transition events are handed to the repository on a spawned task, so a
//! slow alert store never delays the response.

use std::sync::Arc;

use axum::{
  Json,
  extract::{State, rejection::JsonRejection},
};
use chrono::{DateTime, Utc};
use safepath_core::{
  geometry::Point,
  notifier::SampleOutcome,
  repository::Repository,
  sample::{LocationSample, SubjectId},
};
use serde::Deserialize;

use crate::{ApiState, error::ApiError, extract::extract_json};

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SampleBody {
  /// Missing ids are rejected by sample validation, not by the JSON parser,
  /// so the caller gets a reason code.
  #[serde(default)]
  pub subject_id:  String,
  pub lat:         f64,
  pub lng:         f64,
  #[serde(default)]
  pub observed_at: Option<DateTime<Utc>>,
}

/// `POST /samples`
pub async fn submit<R>(
  State(state): State<ApiState<R>>,
  body: Result<Json<SampleBody>, JsonRejection>,
) -> Result<Json<SampleOutcome>, ApiError>
where
  R: Repository + 'static,
{
  let body = extract_json(body)?;
  let sample = LocationSample::new(
    SubjectId::new(body.subject_id),
    Point::new(body.lat, body.lng),
    body.observed_at.unwrap_or_else(Utc::now),
  );
  let outcome = state.notifier.on_sample(&sample)?;

  if !outcome.events.is_empty() {
    let repo = Arc::clone(&state.repo);
    let events = outcome.events.clone();
    tokio::spawn(async move {
      match repo.record_alerts(events).await {
        Ok(records) => tracing::debug!(count = records.len(), "alerts recorded"),
        Err(e) => tracing::error!("failed to record alerts: {e}"),
      }
    });
  }

  Ok(Json(outcome))
}
