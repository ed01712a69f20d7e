//! Encoding and decoding helpers between Safepath domain types and the plain
//! text stored in SQLite columns.
//!
//! Timestamps are fixed-width RFC 3339 strings (microseconds, `Z` suffix) so
//! they sort lexically in time order. UUIDs are hyphenated lowercase strings, and
//! zone boundaries are compact JSON arrays of `{lat, lng}` objects. Storing named
//! keys rather than pairs keeps axis order out of the database entirely.

use chrono::{DateTime, SecondsFormat, Utc};
use safepath_core::{
  geometry::Point,
  repository::{AlertRecord, AlertStatus},
  sample::{Direction, SubjectId, TransitionEvent},
  zone::{AuthorityId, Zone, ZoneId, ZoneKind},
};
use uuid::Uuid;

use crate::{Error, Result};

// ─── Uuid ────────────────────────────────────────────────────────────────────

pub fn encode_uuid(id: Uuid) -> String { id.hyphenated().to_string() }

pub fn decode_uuid(s: &str) -> Result<Uuid> { Ok(Uuid::parse_str(s)?) }

// ─── DateTime<Utc> ───────────────────────────────────────────────────────────

pub fn encode_dt(dt: DateTime<Utc>) -> String {
  dt.to_rfc3339_opts(SecondsFormat::Micros, true)
}

pub fn decode_dt(s: &str) -> Result<DateTime<Utc>> {
  DateTime::parse_from_rfc3339(s)
    .map(|dt| dt.with_timezone(&Utc))
    .map_err(|e| Error::DateParse(e.to_string()))
}

// ─── Enumerations ────────────────────────────────────────────────────────────

pub fn decode_kind(s: &str) -> Result<ZoneKind> {
  match s {
    "safe" => Ok(ZoneKind::Safe),
    "restricted" => Ok(ZoneKind::Restricted),
    other => Err(Error::UnknownValue { column: "kind", value: other.to_owned() }),
  }
}

pub fn decode_direction(s: &str) -> Result<Direction> {
  match s {
    "entered" => Ok(Direction::Entered),
    "exited" => Ok(Direction::Exited),
    other => Err(Error::UnknownValue { column: "direction", value: other.to_owned() }),
  }
}

pub fn decode_status(s: &str) -> Result<AlertStatus> {
  s.parse()
    .map_err(|_| Error::UnknownValue { column: "status", value: s.to_owned() })
}

// ─── Boundary ────────────────────────────────────────────────────────────────

pub fn encode_boundary(boundary: &[Point]) -> Result<String> {
  Ok(serde_json::to_string(boundary)?)
}

pub fn decode_boundary(s: &str) -> Result<Vec<Point>> { Ok(serde_json::from_str(s)?) }

// ─── Row types ───────────────────────────────────────────────────────────────

/// Raw strings read directly from a `zones` row.
pub struct RawZone {
  pub zone_id:       String,
  pub name:          String,
  pub description:   Option<String>,
  pub kind:          String,
  pub boundary_json: String,
  pub created_by:    String,
  pub created_at:    String,
  pub active:        bool,
}

impl RawZone {
  pub fn into_zone(self) -> Result<Zone> {
    Ok(Zone {
      id:          ZoneId(decode_uuid(&self.zone_id)?),
      name:        self.name,
      description: self.description,
      kind:        decode_kind(&self.kind)?,
      boundary:    decode_boundary(&self.boundary_json)?,
      created_by:  AuthorityId(self.created_by),
      created_at:  decode_dt(&self.created_at)?,
      active:      self.active,
    })
  }
}

/// Raw strings read directly from an `alerts` row.
pub struct RawAlert {
  pub alert_id:    String,
  pub alert_type:  String,
  pub subject_id:  String,
  pub zone_id:     String,
  pub zone_name:   String,
  pub zone_kind:   String,
  pub direction:   String,
  pub observed_at: String,
  pub status:      String,
  pub recorded_at: String,
}

impl RawAlert {
  pub fn into_record(self) -> Result<AlertRecord> {
    Ok(AlertRecord {
      alert_id:    decode_uuid(&self.alert_id)?,
      alert_type:  self.alert_type,
      event:       TransitionEvent {
        subject_id:  SubjectId(self.subject_id),
        zone_id:     ZoneId(decode_uuid(&self.zone_id)?),
        zone_name:   self.zone_name,
        kind:        decode_kind(&self.zone_kind)?,
        direction:   decode_direction(&self.direction)?,
        observed_at: decode_dt(&self.observed_at)?,
      },
      status:      decode_status(&self.status)?,
      recorded_at: decode_dt(&self.recorded_at)?,
    })
  }
}
