//! Location samples and the transition events derived from them.

use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::{
  ValidationError,
  geometry::Point,
  zone::{ZoneId, ZoneKind},
};

/// Identifier of a tracked entity (tourist).
#[derive(
  Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(transparent)]
pub struct SubjectId(pub String);

impl SubjectId {
  pub fn new(id: impl Into<String>) -> Self { Self(id.into()) }

  pub fn as_str(&self) -> &str { &self.0 }
}

impl fmt::Display for SubjectId {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result { f.write_str(&self.0) }
}

/// One reported position of a subject. Ephemeral; never persisted by the core.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LocationSample {
  pub subject_id:  SubjectId,
  pub point:       Point,
  pub observed_at: DateTime<Utc>,
}

impl LocationSample {
  pub fn new(
    subject_id: SubjectId,
    point: Point,
    observed_at: DateTime<Utc>,
  ) -> Self {
    Self { subject_id, point, observed_at }
  }

  /// Reject blank subject ids and non-finite or out-of-range points.
  pub fn validate(&self) -> Result<(), ValidationError> {
    if self.subject_id.0.trim().is_empty() {
      return Err(ValidationError::MissingSubjectId);
    }
    if !self.point.is_in_range() {
      return Err(ValidationError::InvalidSamplePoint {
        lat: self.point.lat,
        lng: self.point.lng,
      });
    }
    Ok(())
  }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Direction {
  Entered,
  Exited,
}

impl Direction {
  pub fn as_str(self) -> &'static str {
    match self {
      Self::Entered => "entered",
      Self::Exited => "exited",
    }
  }
}

/// A change in a subject's containment for one zone between two consecutive
/// samples. Handed to the alerting collaborator, which decides severity from
/// `kind`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TransitionEvent {
  pub subject_id:  SubjectId,
  pub zone_id:     ZoneId,
  pub zone_name:   String,
  pub kind:        ZoneKind,
  pub direction:   Direction,
  pub observed_at: DateTime<Utc>,
}
