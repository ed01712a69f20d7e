//! JSON REST API for Safepath.
//!
//! Exposes an axum [`Router`] over the core engines, persisting through any
//! [`safepath_core::repository::Repository`]. TLS and authentication of the
//! `X-Authority-Id` header are the caller's responsibility.
//!
//! # Mounting
//!
//! ```rust,ignore
//! .nest("/api", safepath_api::api_router(state.clone()))
//! ```

pub mod alerts;
pub mod authority;
pub mod error;
pub mod etag;
pub mod evaluate;
pub mod extract;
pub mod samples;
pub mod subjects;
pub mod zones;

use std::sync::Arc;

use axum::{
  Router,
  routing::{get, post},
};
use safepath_core::{
  manager::ZoneManager,
  notifier::BreachNotifier,
  repository::Repository,
  store::ZoneStore,
};

pub use error::ApiError;

/// Alerts returned by `GET /alerts` when no `limit` is given.
pub const DEFAULT_ALERT_LIMIT: usize = 50;

// ─── Application state ───────────────────────────────────────────────────────

/// Shared state threaded through all handlers.
pub struct ApiState<R> {
  pub repo:                Arc<R>,
  pub manager:             Arc<ZoneManager>,
  pub notifier:            Arc<BreachNotifier>,
  pub alert_history_limit: usize,
}

impl<R> Clone for ApiState<R> {
  fn clone(&self) -> Self {
    Self {
      repo:                Arc::clone(&self.repo),
      manager:             Arc::clone(&self.manager),
      notifier:            Arc::clone(&self.notifier),
      alert_history_limit: self.alert_history_limit,
    }
  }
}

impl<R: Repository> ApiState<R> {
  /// Wire a notifier to the manager's zone store.
  pub fn new(repo: Arc<R>, manager: ZoneManager) -> Self {
    let notifier = BreachNotifier::new(Arc::clone(manager.store()));
    Self {
      repo,
      manager: Arc::new(manager),
      notifier: Arc::new(notifier),
      alert_history_limit: DEFAULT_ALERT_LIMIT,
    }
  }

  pub fn with_alert_history_limit(mut self, limit: usize) -> Self {
    self.alert_history_limit = limit;
    self
  }

  pub fn store(&self) -> &Arc<ZoneStore> { self.manager.store() }
}

// ─── Router ──────────────────────────────────────────────────────────────────

/// Build the API router for `state`.
///
/// The returned `Router<()>` can be nested into any parent router regardless
/// of its own state type.
pub fn api_router<R>(state: ApiState<R>) -> Router<()>
where
  R: Repository + 'static,
{
  Router::new()
    // Zones
    .route("/zones", get(zones::list::<R>).post(zones::create::<R>))
    .route("/zones/{id}", get(zones::get_one::<R>).delete(zones::delete_one::<R>))
    // Samples and evaluation
    .route("/samples", post(samples::submit::<R>))
    .route("/evaluate", get(evaluate::handler::<R>))
    .route("/subjects/{id}/zones", get(subjects::zones::<R>))
    // Alerts
    .route("/alerts", get(alerts::list::<R>))
    .with_state(state)
}

#[cfg(test)]
mod tests {
  use std::time::Duration;

  use axum::{
    body::Body,
    http::{HeaderMap, Method, Request, StatusCode, header},
  };
  use chrono::{DateTime, Utc};
  use safepath_core::{
    geometry::Point,
    repository::AlertRecord,
    sample::TransitionEvent,
    zone::{AuthorityId, NewZone, Zone, ZoneId, ZoneKind},
  };
  use safepath_store_sqlite::SqliteStore;
  use serde_json::{Value, json};
  use tower::ServiceExt as _;
  use uuid::Uuid;

  use super::*;
  use crate::authority::AUTHORITY_HEADER;

  const ADMIN: &str = "ADMIN_001";

  /// A repository whose every write and read fails.
  struct FailingRepo;

  fn disk_full() -> std::io::Error { std::io::Error::other("disk full") }

  impl Repository for FailingRepo {
    type Error = std::io::Error;

    async fn save_zone(&self, _zone: &Zone) -> Result<(), Self::Error> { Err(disk_full()) }

    async fn deactivate_zone(&self, _id: ZoneId, _at: DateTime<Utc>) -> Result<bool, Self::Error> {
      Err(disk_full())
    }

    async fn load_zones(&self) -> Result<Vec<Zone>, Self::Error> { Err(disk_full()) }

    async fn record_alerts(
      &self,
      _events: Vec<TransitionEvent>,
    ) -> Result<Vec<AlertRecord>, Self::Error> {
      Err(disk_full())
    }

    async fn list_alerts(&self, _limit: usize) -> Result<Vec<AlertRecord>, Self::Error> {
      Err(disk_full())
    }
  }

  fn failing_state() -> ApiState<FailingRepo> {
    ApiState::new(Arc::new(FailingRepo), ZoneManager::new(Arc::new(ZoneStore::new())))
  }

  async fn make_state() -> ApiState<SqliteStore> {
    let repo = SqliteStore::open_in_memory().await.unwrap();
    let manager = ZoneManager::new(Arc::new(ZoneStore::new()))
      .with_super_authorities([AuthorityId::new("CHIEF")]);
    ApiState::new(Arc::new(repo), manager)
  }

  async fn send<R: Repository + 'static>(
    state: &ApiState<R>,
    method: Method,
    uri: &str,
    headers: &[(&str, &str)],
    body: Option<Value>,
  ) -> (StatusCode, HeaderMap, Value) {
    let mut builder = Request::builder().method(method).uri(uri);
    for (k, v) in headers {
      builder = builder.header(*k, *v);
    }
    let req = match body {
      Some(json) => builder
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(json.to_string()))
        .unwrap(),
      None => builder.body(Body::empty()).unwrap(),
    };

    let resp = api_router(state.clone()).oneshot(req).await.unwrap();
    let status = resp.status();
    let headers = resp.headers().clone();
    let bytes = axum::body::to_bytes(resp.into_body(), usize::MAX).await.unwrap();
    let json = if bytes.is_empty() {
      Value::Null
    } else {
      serde_json::from_slice(&bytes).unwrap()
    };
    (status, headers, json)
  }

  async fn create_zone(
    state: &ApiState<SqliteStore>,
    name: &str,
    kind: &str,
    coordinates: Value,
  ) -> (StatusCode, Value) {
    let (status, _, body) = send(
      state,
      Method::POST,
      "/zones",
      &[(AUTHORITY_HEADER, ADMIN)],
      Some(json!({ "name": name, "type": kind, "coordinates": coordinates })),
    )
    .await;
    (status, body)
  }

  async fn post_sample(
    state: &ApiState<SqliteStore>,
    subject: &str,
    lat: f64,
    lng: f64,
    observed_at: &str,
  ) -> (StatusCode, Value) {
    let (status, _, body) = send(
      state,
      Method::POST,
      "/samples",
      &[],
      Some(json!({ "subjectId": subject, "lat": lat, "lng": lng, "observedAt": observed_at })),
    )
    .await;
    (status, body)
  }

  async fn seed_old_town_and_dig_site(state: &ApiState<SqliteStore>) -> (Value, Value) {
    let (status, old_town) = create_zone(
      state,
      "Old Town",
      "safe",
      json!([[0, 0], [0, 10], [10, 10], [10, 0]]),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    let (status, dig_site) = create_zone(
      state,
      "Dig Site",
      "restricted",
      json!([[4, 4], [4, 6], [6, 6], [6, 4]]),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    (old_town, dig_site)
  }

  fn event_summary(body: &Value) -> Vec<(String, String)> {
    body["events"]
      .as_array()
      .unwrap()
      .iter()
      .map(|e| {
        (
          e["direction"].as_str().unwrap().to_owned(),
          e["zoneName"].as_str().unwrap().to_owned(),
        )
      })
      .collect()
  }

  fn pairs(items: &[(&str, &str)]) -> Vec<(String, String)> {
    items.iter().map(|(a, b)| (a.to_string(), b.to_string())).collect()
  }

  // ── End to end ──────────────────────────────────────────────────────────────

  #[tokio::test]
  async fn enter_stay_leave_walkthrough() {
    let state = make_state().await;
    seed_old_town_and_dig_site(&state).await;

    let (status, first) = post_sample(&state, "T1", 5.0, 5.0, "2026-03-01T09:00:00Z").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(first["classification"], "restricted");
    assert_eq!(
      event_summary(&first),
      pairs(&[("entered", "Dig Site"), ("entered", "Old Town")])
    );
    assert_eq!(first["events"][0]["kind"], "restricted");
    assert_eq!(first["events"][0]["subjectId"], "T1");

    let (_, second) = post_sample(&state, "T1", 5.0, 5.0, "2026-03-01T09:00:05Z").await;
    assert_eq!(second["classification"], "restricted");
    assert_eq!(second["events"], json!([]));

    let (_, third) = post_sample(&state, "T1", 20.0, 20.0, "2026-03-01T09:00:10Z").await;
    assert_eq!(third["classification"], "caution");
    assert_eq!(
      event_summary(&third),
      pairs(&[("exited", "Dig Site"), ("exited", "Old Town")])
    );
  }

  // ── Zones ───────────────────────────────────────────────────────────────────

  #[tokio::test]
  async fn create_returns_closed_lng_lat_ring() {
    let state = make_state().await;
    let (status, zone) = create_zone(
      &state,
      "Ghat",
      "safe",
      json!([[83.00, 25.30], [83.01, 25.30], [83.01, 25.31]]),
    )
    .await;

    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(zone["type"], "safe");
    assert_eq!(zone["createdBy"], ADMIN);
    assert_eq!(zone["active"], true);
    let coords = zone["coordinates"].as_array().unwrap();
    assert_eq!(coords.len(), 4);
    assert_eq!(coords[0], json!([83.00, 25.30]));
    assert_eq!(coords[0], coords[3]);

    let (_, _, listed) = send(&state, Method::GET, "/zones", &[], None).await;
    assert_eq!(listed[0]["coordinates"], zone["coordinates"]);
  }

  #[tokio::test]
  async fn stored_axis_order_matches_evaluation() {
    let state = make_state().await;
    create_zone(
      &state,
      "Ghat",
      "safe",
      json!([[83.00, 25.30], [83.01, 25.30], [83.01, 25.31]]),
    )
    .await;

    let (_, _, inside) =
      send(&state, Method::GET, "/evaluate?lat=25.303&lng=83.007", &[], None).await;
    assert_eq!(inside["classification"], "safe");
    assert_eq!(inside["results"][0]["contained"], true);

    let (_, _, swapped) =
      send(&state, Method::GET, "/evaluate?lat=83.007&lng=25.303", &[], None).await;
    assert_eq!(swapped["classification"], "caution");
  }

  #[tokio::test]
  async fn validation_errors_carry_reason_codes() {
    let state = make_state().await;

    let (status, body) = create_zone(&state, "Line", "safe", json!([[0, 0], [1, 1]])).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["reason"], "too_few_vertices");

    let (_, body) = create_zone(
      &state,
      "Bowtie",
      "restricted",
      json!([[0, 0], [10, 10], [0, 10], [10, 0]]),
    )
    .await;
    assert_eq!(body["reason"], "self_intersecting");

    let (_, body) = create_zone(&state, " ", "safe", json!([[0, 0], [0, 10], [10, 10]])).await;
    assert_eq!(body["reason"], "empty_name");

    let (_, body) = create_zone(&state, "Far", "safe", json!([[0, 0], [0, 95], [10, 10]])).await;
    assert_eq!(body["reason"], "coordinate_out_of_range");

    let (_, _, listed) = send(&state, Method::GET, "/zones", &[], None).await;
    assert_eq!(listed, json!([]));
  }

  #[tokio::test]
  async fn create_requires_authority() {
    let state = make_state().await;
    let (status, _, body) = send(
      &state,
      Method::POST,
      "/zones",
      &[],
      Some(json!({ "name": "Market", "type": "safe", "coordinates": [[0, 0], [0, 1], [1, 1]] })),
    )
    .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert!(body["error"].as_str().unwrap().contains("X-Authority-Id"));
  }

  #[tokio::test]
  async fn list_filters_by_type() {
    let state = make_state().await;
    seed_old_town_and_dig_site(&state).await;

    let (_, _, restricted) = send(&state, Method::GET, "/zones?type=restricted", &[], None).await;
    let names: Vec<_> = restricted
      .as_array()
      .unwrap()
      .iter()
      .map(|z| z["name"].as_str().unwrap())
      .collect();
    assert_eq!(names, ["Dig Site"]);

    let (_, _, all) = send(&state, Method::GET, "/zones", &[], None).await;
    assert_eq!(all.as_array().unwrap().len(), 2);
  }

  #[tokio::test]
  async fn listing_supports_conditional_get() {
    let state = make_state().await;
    seed_old_town_and_dig_site(&state).await;

    let (status, headers, _) = send(&state, Method::GET, "/zones", &[], None).await;
    assert_eq!(status, StatusCode::OK);
    let etag = headers
      .get(header::ETAG)
      .unwrap()
      .to_str()
      .unwrap()
      .to_owned();

    let (status, _, body) = send(
      &state,
      Method::GET,
      "/zones",
      &[("if-none-match", etag.as_str())],
      None,
    )
    .await;
    assert_eq!(status, StatusCode::NOT_MODIFIED);
    assert_eq!(body, Value::Null);

    create_zone(&state, "Market", "safe", json!([[20, 20], [20, 21], [21, 21]])).await;
    let (status, headers, _) = send(
      &state,
      Method::GET,
      "/zones",
      &[("if-none-match", etag.as_str())],
      None,
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_ne!(headers.get(header::ETAG).unwrap().to_str().unwrap(), etag);
  }

  #[tokio::test]
  async fn delete_enforces_ownership() {
    let state = make_state().await;
    let (_, dig_site) = seed_old_town_and_dig_site(&state).await;
    let uri = format!("/zones/{}", dig_site["id"].as_str().unwrap());

    let (status, _, _) = send(&state, Method::DELETE, &uri, &[(AUTHORITY_HEADER, "OFFICER_7")], None).await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    let (status, _, _) = send(&state, Method::DELETE, &uri, &[], None).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);

    let (status, _, body) = send(&state, Method::DELETE, &uri, &[(AUTHORITY_HEADER, ADMIN)], None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["active"], false);

    let (_, _, listed) = send(&state, Method::GET, "/zones", &[], None).await;
    assert_eq!(listed.as_array().unwrap().len(), 1);

    // Still visible for audit.
    let (status, _, fetched) = send(&state, Method::GET, &uri, &[], None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(fetched["active"], false);

    let persisted = state.repo.load_zones().await.unwrap();
    assert_eq!(persisted.iter().filter(|z| z.active).count(), 1);
  }

  #[tokio::test]
  async fn failed_create_withdraws_the_zone() {
    let state = failing_state();

    let (status, _, body) = send(
      &state,
      Method::POST,
      "/zones",
      &[(AUTHORITY_HEADER, ADMIN)],
      Some(json!({
        "name": "Old Town",
        "type": "safe",
        "coordinates": [[0.0, 0.0], [10.0, 0.0], [10.0, 10.0], [0.0, 10.0]],
      })),
    )
    .await;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert!(body["error"].as_str().unwrap().contains("disk full"));

    let (_, _, listed) = send(&state, Method::GET, "/zones", &[], None).await;
    assert_eq!(listed, json!([]));
    let snapshot = state.store().snapshot();
    assert_eq!(snapshot.zones().len(), 1);
    assert!(!snapshot.zones()[0].active);
  }

  #[tokio::test]
  async fn failed_delete_keeps_the_zone_active() {
    let state = failing_state();
    let zone = state
      .manager
      .create_zone(NewZone::new(
        "Old Town",
        ZoneKind::Safe,
        vec![
          Point::new(0.0, 0.0),
          Point::new(0.0, 10.0),
          Point::new(10.0, 10.0),
          Point::new(10.0, 0.0),
        ],
        AuthorityId::new(ADMIN),
      ))
      .unwrap();
    let uri = format!("/zones/{}", zone.id);

    let (status, _, _) = send(&state, Method::DELETE, &uri, &[(AUTHORITY_HEADER, ADMIN)], None).await;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);

    assert!(state.store().get(zone.id).unwrap().active);
    let (_, _, listed) = send(&state, Method::GET, "/zones", &[], None).await;
    assert_eq!(listed.as_array().unwrap().len(), 1);
    let (_, _, body) = send(&state, Method::GET, "/evaluate?lat=5&lng=5", &[], None).await;
    assert_eq!(body["classification"], "safe");

    // Authority is still checked before any write.
    let (status, _, _) = send(&state, Method::DELETE, &uri, &[(AUTHORITY_HEADER, "OFFICER_7")], None).await;
    assert_eq!(status, StatusCode::FORBIDDEN);
  }

  #[tokio::test]
  async fn super_authority_can_delete() {
    let state = make_state().await;
    let (old_town, _) = seed_old_town_and_dig_site(&state).await;
    let uri = format!("/zones/{}", old_town["id"].as_str().unwrap());

    let (status, _, _) = send(&state, Method::DELETE, &uri, &[(AUTHORITY_HEADER, "CHIEF")], None).await;
    assert_eq!(status, StatusCode::OK);
  }

  #[tokio::test]
  async fn unknown_zone_is_404() {
    let state = make_state().await;
    let uri = format!("/zones/{}", Uuid::new_v4());

    let (status, _, _) = send(&state, Method::GET, &uri, &[], None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (status, _, _) = send(&state, Method::DELETE, &uri, &[(AUTHORITY_HEADER, ADMIN)], None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
  }

  // ── Samples ─────────────────────────────────────────────────────────────────

  #[tokio::test]
  async fn invalid_samples_are_rejected() {
    let state = make_state().await;

    let (status, body) = post_sample(&state, "", 5.0, 5.0, "2026-03-01T09:00:00Z").await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["reason"], "missing_subject_id");

    let (status, body) = post_sample(&state, "T1", 91.0, 5.0, "2026-03-01T09:00:00Z").await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["reason"], "invalid_sample_point");

    let (status, _, _) = send(&state, Method::GET, "/subjects/T1/zones", &[], None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
  }

  #[tokio::test]
  async fn stale_sample_is_a_conflict() {
    let state = make_state().await;
    seed_old_town_and_dig_site(&state).await;

    post_sample(&state, "T1", 5.0, 5.0, "2026-03-01T09:00:10Z").await;
    let (status, _) = post_sample(&state, "T1", 20.0, 20.0, "2026-03-01T09:00:00Z").await;
    assert_eq!(status, StatusCode::CONFLICT);

    let (_, _, presence) = send(&state, Method::GET, "/subjects/T1/zones", &[], None).await;
    assert_eq!(presence["zones"].as_array().unwrap().len(), 2);
  }

  #[tokio::test]
  async fn observed_at_defaults_to_now() {
    let state = make_state().await;
    seed_old_town_and_dig_site(&state).await;

    let (status, _, body) = send(
      &state,
      Method::POST,
      "/samples",
      &[],
      Some(json!({ "subjectId": "T9", "lat": 1.0, "lng": 1.0 })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["classification"], "safe");
    assert!(body["events"][0]["observedAt"].as_str().is_some());
  }

  #[tokio::test]
  async fn subject_zones_reports_last_containment() {
    let state = make_state().await;
    let (old_town, _) = seed_old_town_and_dig_site(&state).await;

    post_sample(&state, "T1", 1.0, 1.0, "2026-03-01T09:00:00Z").await;
    let (status, _, presence) = send(&state, Method::GET, "/subjects/T1/zones", &[], None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(presence["subjectId"], "T1");
    assert_eq!(presence["zones"][0]["zoneId"], old_town["id"]);
  }

  // ── Evaluate ────────────────────────────────────────────────────────────────

  #[tokio::test]
  async fn evaluate_does_not_touch_subject_state() {
    let state = make_state().await;
    seed_old_town_and_dig_site(&state).await;

    let (status, _, body) = send(&state, Method::GET, "/evaluate?lat=5&lng=5", &[], None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["classification"], "restricted");
    assert_eq!(body["results"].as_array().unwrap().len(), 2);
    assert_eq!(state.notifier.tracked_subjects(), 0);

    let (status, _, body) = send(&state, Method::GET, "/evaluate?lat=-95&lng=5", &[], None).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["reason"], "invalid_sample_point");
  }

  #[tokio::test]
  async fn malformed_requests_are_structured_bad_requests() {
    let state = make_state().await;
    let authority = [(AUTHORITY_HEADER, ADMIN)];

    // (method, uri, send authority header, body)
    let cases = [
      (Method::POST, "/samples", false, Some(json!({ "subjectId": "T1", "lat": 5.0 }))),
      (
        Method::POST,
        "/samples",
        false,
        Some(json!({ "subjectId": "T1", "lat": "north", "lng": 5.0 })),
      ),
      (
        Method::POST,
        "/zones",
        true,
        Some(json!({ "type": "safe", "coordinates": [[0, 0], [0, 1], [1, 1]] })),
      ),
      (
        Method::POST,
        "/zones",
        true,
        Some(json!({ "name": "Quarry", "type": "volcano", "coordinates": [[0, 0], [0, 1], [1, 1]] })),
      ),
      (Method::GET, "/evaluate?lat=abc&lng=1", false, None),
      (Method::GET, "/evaluate?lat=1", false, None),
      (Method::GET, "/zones?type=volcano", false, None),
      (Method::GET, "/alerts?limit=-1", true, None),
    ];

    for (method, uri, with_authority, body) in cases {
      let headers: &[(&str, &str)] = if with_authority { &authority } else { &[] };
      let (status, resp_headers, json) = send(&state, method.clone(), uri, headers, body).await;
      assert_eq!(status, StatusCode::BAD_REQUEST, "{method} {uri}");
      assert_eq!(
        resp_headers.get(header::CONTENT_TYPE).unwrap(),
        "application/json",
        "{method} {uri}"
      );
      assert_eq!(json["reason"], "malformed_body", "{method} {uri}");
      assert!(json["error"].is_string());
    }

    assert_eq!(state.notifier.tracked_subjects(), 0);
    assert!(state.store().snapshot().zones().is_empty());
  }

  // ── Alerts ──────────────────────────────────────────────────────────────────

  #[tokio::test]
  async fn transitions_are_recorded_as_alerts() {
    let state = make_state().await;
    seed_old_town_and_dig_site(&state).await;
    post_sample(&state, "T1", 5.0, 5.0, "2026-03-01T09:00:00Z").await;

    let (status, _, _) = send(&state, Method::GET, "/alerts", &[], None).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);

    // Alerts are written on a spawned task.
    let mut alerts = Value::Null;
    for _ in 0..50 {
      let (_, _, body) = send(&state, Method::GET, "/alerts", &[(AUTHORITY_HEADER, ADMIN)], None).await;
      if body.as_array().is_some_and(|a| a.len() == 2) {
        alerts = body;
        break;
      }
      tokio::time::sleep(Duration::from_millis(20)).await;
    }

    let alerts = alerts.as_array().expect("two alerts recorded");
    assert!(alerts.iter().all(|a| a["alertType"] == "geofence_breach"));
    assert!(alerts.iter().all(|a| a["status"] == "pending"));
    assert!(alerts.iter().all(|a| a["direction"] == "entered"));

    let (_, _, limited) = send(
      &state,
      Method::GET,
      "/alerts?limit=1",
      &[(AUTHORITY_HEADER, ADMIN)],
      None,
    )
    .await;
    assert_eq!(limited.as_array().unwrap().len(), 1);
  }
}
