//! Error types for `safepath-core`.

use chrono::{DateTime, Utc};
use thiserror::Error;

use crate::{sample::SubjectId, zone::{AuthorityId, ZoneId}};

/// A rejected input. Always recoverable by the caller; never retried.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ValidationError {
  #[error("zone name must not be empty")]
  EmptyName,

  #[error("boundary needs at least 3 distinct vertices, found {found}")]
  TooFewVertices { found: usize },

  #[error("vertex {index} has a non-finite coordinate")]
  NonFiniteCoordinate { index: usize },

  #[error("vertex {index} is outside the valid latitude/longitude range")]
  CoordinateOutOfRange { index: usize },

  #[error("vertex {index} repeats the previous vertex")]
  RepeatedVertex { index: usize },

  #[error("boundary edges {first} and {second} intersect")]
  SelfIntersecting { first: usize, second: usize },

  #[error("sample is missing a subject id")]
  MissingSubjectId,

  #[error("sample point ({lat}, {lng}) is not a finite in-range coordinate")]
  InvalidSamplePoint { lat: f64, lng: f64 },
}

impl ValidationError {
  /// Stable machine-readable code, surfaced to wire clients.
  pub fn reason(&self) -> &'static str {
    match self {
      Self::EmptyName => "empty_name",
      Self::TooFewVertices { .. } => "too_few_vertices",
      Self::NonFiniteCoordinate { .. } => "non_finite_coordinate",
      Self::CoordinateOutOfRange { .. } => "coordinate_out_of_range",
      Self::RepeatedVertex { .. } => "repeated_vertex",
      Self::SelfIntersecting { .. } => "self_intersecting",
      Self::MissingSubjectId => "missing_subject_id",
      Self::InvalidSamplePoint { .. } => "invalid_sample_point",
    }
  }
}

#[derive(Debug, Error)]
pub enum Error {
  #[error("validation failed: {0}")]
  Validation(#[from] ValidationError),

  #[error("zone not found: {0}")]
  ZoneNotFound(ZoneId),

  #[error("subject not found: {0}")]
  SubjectNotFound(SubjectId),

  #[error("authority {authority} may not modify zone {zone_id}")]
  Forbidden { zone_id: ZoneId, authority: AuthorityId },

  #[error(
    "sample for {subject_id} observed at {observed_at} is older than the last \
     applied sample ({last_applied})"
  )]
  OutOfOrderSample {
    subject_id:   SubjectId,
    observed_at:  DateTime<Utc>,
    last_applied: DateTime<Utc>,
  },

  /// A stored zone failed a geometry check it must already have passed.
  #[error("zone {zone_id} holds corrupt geometry: {source}")]
  CorruptZone {
    zone_id: ZoneId,
    #[source]
    source:  ValidationError,
  },
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
