//! [`SqliteStore`], the SQLite implementation of [`Repository`].

use std::path::Path;

use chrono::{DateTime, Utc};
use safepath_core::{
  repository::{AlertRecord, Repository},
  sample::TransitionEvent,
  zone::{Zone, ZoneId},
};

use crate::{
  Result,
  encode::{RawAlert, RawZone, encode_boundary, encode_dt, encode_uuid},
  schema::SCHEMA,
};

// ─── Store ───────────────────────────────────────────────────────────────────

/// Zone and alert persistence backed by a single SQLite file.
///
/// Cloning is cheap; the inner connection is reference-counted.
#[derive(Clone)]
pub struct SqliteStore {
  pub(crate) conn: tokio_rusqlite::Connection,
}

impl SqliteStore {
  /// Open (or create) a store at `path` and run schema initialisation.
  pub async fn open(path: impl AsRef<Path>) -> Result<Self> {
    let conn = tokio_rusqlite::Connection::open(path).await?;
    let store = Self { conn };
    store.init_schema().await?;
    Ok(store)
  }

  /// Open an in-memory store for tests.
  pub async fn open_in_memory() -> Result<Self> {
    let conn = tokio_rusqlite::Connection::open_in_memory().await?;
    let store = Self { conn };
    store.init_schema().await?;
    Ok(store)
  }

  async fn init_schema(&self) -> Result<()> {
    self
      .conn
      .call(|conn| {
        conn.execute_batch(SCHEMA)?;
        Ok(())
      })
      .await?;
    Ok(())
  }
}

const ALERT_COLUMNS: &str = "alert_id, alert_type, subject_id, zone_id, zone_name, \
                             zone_kind, direction, observed_at, status, recorded_at";

// ─── Repository impl ─────────────────────────────────────────────────────────

impl Repository for SqliteStore {
  type Error = crate::Error;

  // ── Zones ─────────────────────────────────────────────────────────────────

  async fn save_zone(&self, zone: &Zone) -> Result<()> {
    let zone_id_str    = encode_uuid(zone.id.0);
    let name           = zone.name.clone();
    let description    = zone.description.clone();
    let kind_str       = zone.kind.as_str();
    let boundary_json  = encode_boundary(&zone.boundary)?;
    let created_by     = zone.created_by.0.clone();
    let created_at_str = encode_dt(zone.created_at);
    let active         = zone.active;

    self
      .conn
      .call(move |conn| {
        conn.execute(
          "INSERT INTO zones (
             zone_id, name, description, kind, boundary_json,
             created_by, created_at, active
           ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)",
          rusqlite::params![
            zone_id_str,
            name,
            description,
            kind_str,
            boundary_json,
            created_by,
            created_at_str,
            active,
          ],
        )?;
        Ok(())
      })
      .await?;
    Ok(())
  }

  async fn deactivate_zone(&self, id: ZoneId, at: DateTime<Utc>) -> Result<bool> {
    let id_str = encode_uuid(id.0);
    let at_str = encode_dt(at);

    let updated = self
      .conn
      .call(move |conn| {
        Ok(conn.execute(
          "UPDATE zones
              SET active = 0,
                  deactivated_at = COALESCE(deactivated_at, ?2)
            WHERE zone_id = ?1",
          rusqlite::params![id_str, at_str],
        )?)
      })
      .await?;
    Ok(updated > 0)
  }

  async fn load_zones(&self) -> Result<Vec<Zone>> {
    let raws: Vec<RawZone> = self
      .conn
      .call(|conn| {
        let mut stmt = conn.prepare(
          "SELECT zone_id, name, description, kind, boundary_json,
                  created_by, created_at, active
             FROM zones
            ORDER BY created_at, rowid",
        )?;
        let rows = stmt
          .query_map([], |row| {
            Ok(RawZone {
              zone_id:       row.get(0)?,
              name:          row.get(1)?,
              description:   row.get(2)?,
              kind:          row.get(3)?,
              boundary_json: row.get(4)?,
              created_by:    row.get(5)?,
              created_at:    row.get(6)?,
              active:        row.get(7)?,
            })
          })?
          .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(rows)
      })
      .await?;

    // One undecodable row must not keep every other zone from loading.
    Ok(
      raws
        .into_iter()
        .filter_map(|raw| {
          let zone_id = raw.zone_id.clone();
          raw
            .into_zone()
            .inspect_err(|e| tracing::error!(%zone_id, "skipping undecodable zone row: {e}"))
            .ok()
        })
        .collect(),
    )
  }

  // ── Alerts ────────────────────────────────────────────────────────────────

  async fn record_alerts(&self, events: Vec<TransitionEvent>) -> Result<Vec<AlertRecord>> {
    let recorded_at = Utc::now();
    let records: Vec<AlertRecord> = events
      .into_iter()
      .map(|event| AlertRecord::pending(event, recorded_at))
      .collect();

    let rows: Vec<[String; 10]> = records
      .iter()
      .map(|r| {
        [
          encode_uuid(r.alert_id),
          r.alert_type.clone(),
          r.event.subject_id.0.clone(),
          encode_uuid(r.event.zone_id.0),
          r.event.zone_name.clone(),
          r.event.kind.as_str().to_owned(),
          r.event.direction.as_str().to_owned(),
          encode_dt(r.event.observed_at),
          r.status.as_str().to_owned(),
          encode_dt(r.recorded_at),
        ]
      })
      .collect();

    self
      .conn
      .call(move |conn| {
        let tx = conn.transaction()?;
        {
          let mut stmt = tx.prepare(&format!(
            "INSERT INTO alerts ({ALERT_COLUMNS})
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10)"
          ))?;
          for row in &rows {
            stmt.execute(rusqlite::params_from_iter(row))?;
          }
        }
        tx.commit()?;
        Ok(())
      })
      .await?;

    Ok(records)
  }

  async fn list_alerts(&self, limit: usize) -> Result<Vec<AlertRecord>> {
    let limit_val = i64::try_from(limit).unwrap_or(i64::MAX);

    let raws: Vec<RawAlert> = self
      .conn
      .call(move |conn| {
        let mut stmt = conn.prepare(&format!(
          "SELECT {ALERT_COLUMNS}
             FROM alerts
            ORDER BY recorded_at DESC, rowid DESC
            LIMIT ?1"
        ))?;
        let rows = stmt
          .query_map(rusqlite::params![limit_val], |row| {
            Ok(RawAlert {
              alert_id:    row.get(0)?,
              alert_type:  row.get(1)?,
              subject_id:  row.get(2)?,
              zone_id:     row.get(3)?,
              zone_name:   row.get(4)?,
              zone_kind:   row.get(5)?,
              direction:   row.get(6)?,
              observed_at: row.get(7)?,
              status:      row.get(8)?,
              recorded_at: row.get(9)?,
            })
          })?
          .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(rows)
      })
      .await?;

    raws.into_iter().map(RawAlert::into_record).collect()
  }
}
