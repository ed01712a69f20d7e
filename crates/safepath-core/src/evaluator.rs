//! Geofence evaluator: per-zone containment and the aggregate status.

use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::{
  Error, Result, ValidationError,
  geometry::{Point, point_in_polygon},
  zone::{Zone, ZoneId, ZoneKind},
};

/// Aggregate status of a point across all active zones.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Classification {
  /// Inside at least one safe zone and no restricted zone.
  Safe,
  /// Inside no zone at all. Unknown territory is not assumed safe.
  Caution,
  /// Inside at least one restricted zone, whatever else contains it.
  Restricted,
}

/// Whether one zone contains the evaluated point. Derived, never persisted.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ContainmentResult {
  pub zone_id:   ZoneId,
  pub zone_name: String,
  pub kind:      ZoneKind,
  pub contained: bool,
}

/// Results for every active zone plus their classification.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Assessment {
  pub classification: Classification,
  pub results:        Vec<ContainmentResult>,
}

impl Assessment {
  pub fn containing(&self) -> impl Iterator<Item = &ContainmentResult> {
    self.results.iter().filter(|r| r.contained)
  }
}

/// Test `point` against every active zone in `zones`.
///
/// Returns one result per active zone, including non-matches, so callers can
/// audit that nothing was skipped. Inactive zones are ignored.
///
/// A stored zone whose geometry fails validation indicates that something
/// bypassed the zone manager; it is logged and surfaced as
/// [`Error::CorruptZone`] rather than silently treated as non-containing.
pub fn evaluate(point: Point, zones: &[Arc<Zone>]) -> Result<Vec<ContainmentResult>> {
  if !point.is_in_range() {
    return Err(
      ValidationError::InvalidSamplePoint { lat: point.lat, lng: point.lng }.into(),
    );
  }

  zones
    .iter()
    .filter(|z| z.active)
    .map(|zone| -> Result<ContainmentResult> {
      let contained = point_in_polygon(point, &zone.boundary).map_err(|source| {
        tracing::error!(zone_id = %zone.id, %source, "stored zone has corrupt geometry");
        Error::CorruptZone { zone_id: zone.id, source }
      })?;
      Ok(ContainmentResult {
        zone_id: zone.id,
        zone_name: zone.name.clone(),
        kind: zone.kind,
        contained,
      })
    })
    .collect()
}

/// Restricted dominates safe; containment in nothing is caution.
pub fn classify(results: &[ContainmentResult]) -> Classification {
  let mut inside_safe = false;
  for r in results.iter().filter(|r| r.contained) {
    match r.kind {
      ZoneKind::Restricted => return Classification::Restricted,
      ZoneKind::Safe => inside_safe = true,
    }
  }
  if inside_safe {
    Classification::Safe
  } else {
    Classification::Caution
  }
}

/// [`evaluate`] followed by [`classify`].
pub fn assess(point: Point, zones: &[Arc<Zone>]) -> Result<Assessment> {
  let results = evaluate(point, zones)?;
  Ok(Assessment { classification: classify(&results), results })
}
