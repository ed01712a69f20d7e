//! Zone types: named polygonal regions tagged safe or restricted.

use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::geometry::{Point, close_ring};

// ─── Identifiers ─────────────────────────────────────────────────────────────

/// Opaque zone identifier. Assigned once by the zone store, never reused.
#[derive(
  Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(transparent)]
pub struct ZoneId(pub Uuid);

impl ZoneId {
  pub fn new() -> Self { Self(Uuid::new_v4()) }
}

impl Default for ZoneId {
  fn default() -> Self { Self::new() }
}

impl fmt::Display for ZoneId {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result { self.0.fmt(f) }
}

/// Identifier of the authority (officer, agency) that authored a zone.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AuthorityId(pub String);

impl AuthorityId {
  pub fn new(id: impl Into<String>) -> Self { Self(id.into()) }

  pub fn as_str(&self) -> &str { &self.0 }
}

impl fmt::Display for AuthorityId {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result { f.write_str(&self.0) }
}

// ─── Kind ────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ZoneKind {
  Safe,
  Restricted,
}

impl ZoneKind {
  /// Higher is more severe. Used to order transition events for display.
  pub fn severity(self) -> u8 {
    match self {
      Self::Safe => 0,
      Self::Restricted => 1,
    }
  }

  pub fn as_str(self) -> &'static str {
    match self {
      Self::Safe => "safe",
      Self::Restricted => "restricted",
    }
  }
}

impl fmt::Display for ZoneKind {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result { f.write_str(self.as_str()) }
}

// ─── Zone ────────────────────────────────────────────────────────────────────

/// A stored zone. Immutable once admitted, except for the `active` flag, which
/// the store flips by swapping in a new value.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Zone {
  pub id:          ZoneId,
  pub name:        String,
  pub description: Option<String>,
  pub kind:        ZoneKind,
  /// Open ring: at least three vertices, no duplicated closing vertex.
  pub boundary:    Vec<Point>,
  pub created_by:  AuthorityId,
  pub created_at:  DateTime<Utc>,
  /// Inactive zones are kept for audit but never evaluated.
  pub active:      bool,
}

impl Zone {
  /// The boundary with its first vertex repeated at the end.
  pub fn closed_boundary(&self) -> Vec<Point> { close_ring(&self.boundary) }
}

// ─── NewZone ─────────────────────────────────────────────────────────────────

/// Input to [`crate::manager::ZoneManager::create_zone`]. The boundary is raw
/// authority input and may be open or closed.
#[derive(Debug, Clone)]
pub struct NewZone {
  pub name:        String,
  pub description: Option<String>,
  pub kind:        ZoneKind,
  pub boundary:    Vec<Point>,
  pub created_by:  AuthorityId,
}

impl NewZone {
  pub fn new(
    name: impl Into<String>,
    kind: ZoneKind,
    boundary: Vec<Point>,
    created_by: AuthorityId,
  ) -> Self {
    Self { name: name.into(), description: None, kind, boundary, created_by }
  }
}

/// Zone content that has passed every authoring rule. Only the zone manager
/// can build one, so the store never admits unchecked geometry.
#[derive(Debug, Clone)]
pub struct ValidatedZone {
  pub(crate) name:        String,
  pub(crate) description: Option<String>,
  pub(crate) kind:        ZoneKind,
  pub(crate) boundary:    Vec<Point>,
  pub(crate) created_by:  AuthorityId,
}
