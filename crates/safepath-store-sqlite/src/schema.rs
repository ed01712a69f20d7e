//! SQL schema for the Safepath SQLite store.
//!
//! Executed once at connection startup. Future migrations will be gated on
//! `PRAGMA user_version`.

/// Full schema DDL; idempotent thanks to `CREATE TABLE IF NOT EXISTS`.
pub const SCHEMA: &str = "
PRAGMA journal_mode = WAL;

-- Zones are never deleted. Deactivation flips `active` and stamps
-- `deactivated_at` once.
CREATE TABLE IF NOT EXISTS zones (
    zone_id        TEXT PRIMARY KEY,
    name           TEXT NOT NULL,
    description    TEXT,
    kind           TEXT NOT NULL,    -- 'safe' | 'restricted'
    boundary_json  TEXT NOT NULL,    -- JSON array of {lat, lng}; open ring
    created_by     TEXT NOT NULL,
    created_at     TEXT NOT NULL,    -- RFC 3339 UTC
    active         INTEGER NOT NULL DEFAULT 1,
    deactivated_at TEXT
);

-- One row per transition event.
CREATE TABLE IF NOT EXISTS alerts (
    alert_id     TEXT PRIMARY KEY,
    alert_type   TEXT NOT NULL,      -- always 'geofence_breach' for now
    subject_id   TEXT NOT NULL,
    zone_id      TEXT NOT NULL,
    zone_name    TEXT NOT NULL,
    zone_kind    TEXT NOT NULL,
    direction    TEXT NOT NULL,      -- 'entered' | 'exited'
    observed_at  TEXT NOT NULL,
    status       TEXT NOT NULL DEFAULT 'pending',
    recorded_at  TEXT NOT NULL
);

CREATE INDEX IF NOT EXISTS zones_created_idx    ON zones(created_at);
CREATE INDEX IF NOT EXISTS alerts_recorded_idx  ON alerts(recorded_at);
CREATE INDEX IF NOT EXISTS alerts_subject_idx   ON alerts(subject_id);

PRAGMA user_version = 1;
";
