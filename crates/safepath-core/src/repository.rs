//! The `Repository` trait: the durable persistence collaborator.
//!
//! The in-memory [`ZoneStore`](crate::store::ZoneStore) is authoritative for
//! evaluation. A repository keeps zones across restarts and records the alert
//! trail produced from transition events. Implemented by storage backends
//! (e.g. `safepath-store-sqlite`).

use std::{fmt, future::Future, str::FromStr};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{
  sample::TransitionEvent,
  zone::{Zone, ZoneId},
};

/// Alert type recorded for every geofence transition.
pub const GEOFENCE_BREACH: &str = "geofence_breach";

// ─── Alert records ───────────────────────────────────────────────────────────

/// Lifecycle of an alert once recorded. New alerts are always `Pending`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AlertStatus {
  Pending,
  Acknowledged,
  Resolved,
}

impl AlertStatus {
  pub fn as_str(self) -> &'static str {
    match self {
      Self::Pending => "pending",
      Self::Acknowledged => "acknowledged",
      Self::Resolved => "resolved",
    }
  }
}

impl fmt::Display for AlertStatus {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result { f.write_str(self.as_str()) }
}

impl FromStr for AlertStatus {
  type Err = String;

  fn from_str(s: &str) -> Result<Self, Self::Err> {
    match s {
      "pending" => Ok(Self::Pending),
      "acknowledged" => Ok(Self::Acknowledged),
      "resolved" => Ok(Self::Resolved),
      other => Err(format!("unknown alert status: {other}")),
    }
  }
}

/// A persisted transition event.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AlertRecord {
  pub alert_id:    Uuid,
  pub alert_type:  String,
  #[serde(flatten)]
  pub event:       TransitionEvent,
  pub status:      AlertStatus,
  pub recorded_at: DateTime<Utc>,
}

impl AlertRecord {
  /// A fresh pending record for `event`.
  pub fn pending(event: TransitionEvent, recorded_at: DateTime<Utc>) -> Self {
    Self {
      alert_id: Uuid::new_v4(),
      alert_type: GEOFENCE_BREACH.to_owned(),
      event,
      status: AlertStatus::Pending,
      recorded_at,
    }
  }
}

// ─── Trait ───────────────────────────────────────────────────────────────────

/// Abstraction over a durable zone and alert store.
///
/// All methods return `Send` futures so the trait can be used from axum
/// handlers and spawned tokio tasks.
pub trait Repository: Send + Sync {
  type Error: std::error::Error + Send + Sync + 'static;

  // ── Zones ─────────────────────────────────────────────────────────────

  /// Persist a newly admitted zone.
  fn save_zone<'a>(
    &'a self,
    zone: &'a Zone,
  ) -> impl Future<Output = Result<(), Self::Error>> + Send + 'a;

  /// Mark a persisted zone inactive. Returns `false` if no such zone exists.
  /// Marking an already inactive zone keeps its original deactivation time.
  fn deactivate_zone(
    &self,
    id: ZoneId,
    at: DateTime<Utc>,
  ) -> impl Future<Output = Result<bool, Self::Error>> + Send + '_;

  /// Every persisted zone, active and inactive, oldest first.
  fn load_zones(&self) -> impl Future<Output = Result<Vec<Zone>, Self::Error>> + Send + '_;

  // ── Alerts ────────────────────────────────────────────────────────────

  /// Record one pending alert per event and return the stored records.
  fn record_alerts(
    &self,
    events: Vec<TransitionEvent>,
  ) -> impl Future<Output = Result<Vec<AlertRecord>, Self::Error>> + Send + '_;

  /// The most recent `limit` alerts, newest first.
  fn list_alerts(
    &self,
    limit: usize,
  ) -> impl Future<Output = Result<Vec<AlertRecord>, Self::Error>> + Send + '_;
}
