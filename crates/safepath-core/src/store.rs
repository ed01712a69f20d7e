//! [`ZoneStore`] holds the in-memory set of zones evaluated against samples.
//!
//! Writers (add, deactivate, restore) are serialised by a writer lock. Each
//! write builds a fresh immutable [`ZoneSnapshot`] and swaps it in; readers
//! clone the current snapshot's `Arc` and work on it without holding any lock,
//! so a reader never observes a zone mid-construction.
//!
//! Locks are `parking_lot` and are never held across `.await` points.

use std::{collections::HashMap, sync::Arc};

use chrono::Utc;
use parking_lot::{Mutex, RwLock};

use crate::{
  Error, Result,
  zone::{ValidatedZone, Zone, ZoneId, ZoneKind},
};

// ─── Snapshot ────────────────────────────────────────────────────────────────

/// An immutable view of every zone (active and inactive) at one version.
#[derive(Debug, Default)]
pub struct ZoneSnapshot {
  version: u64,
  zones:   Vec<Arc<Zone>>,
  index:   HashMap<ZoneId, usize>,
}

impl ZoneSnapshot {
  fn new(version: u64, zones: Vec<Arc<Zone>>) -> Self {
    let index = zones.iter().enumerate().map(|(i, z)| (z.id, i)).collect();
    Self { version, zones, index }
  }

  /// Incremented on every write that changes the snapshot.
  pub fn version(&self) -> u64 { self.version }

  /// All zones, in admission order.
  pub fn zones(&self) -> &[Arc<Zone>] { &self.zones }

  pub fn active(&self) -> impl Iterator<Item = &Arc<Zone>> {
    self.zones.iter().filter(|z| z.active)
  }

  pub fn get(&self, id: ZoneId) -> Option<&Arc<Zone>> {
    self.index.get(&id).map(|&i| &self.zones[i])
  }
}

// ─── Store ───────────────────────────────────────────────────────────────────

#[derive(Debug, Default)]
pub struct ZoneStore {
  current: RwLock<Arc<ZoneSnapshot>>,
  writer:  Mutex<()>,
}

impl ZoneStore {
  pub fn new() -> Self { Self::default() }

  /// The current snapshot. Cheap: one `Arc` clone under a read lock.
  pub fn snapshot(&self) -> Arc<ZoneSnapshot> { Arc::clone(&self.current.read()) }

  /// Admit a validated zone, assigning it a fresh id and marking it active.
  pub fn add(&self, zone: ValidatedZone) -> ZoneId {
    self.write(|zones, index| {
      let mut id = ZoneId::new();
      while index.contains_key(&id) {
        id = ZoneId::new();
      }
      zones.push(Arc::new(Zone {
        id,
        name: zone.name,
        description: zone.description,
        kind: zone.kind,
        boundary: zone.boundary,
        created_by: zone.created_by,
        created_at: Utc::now(),
        active: true,
      }));
      (id, true)
    })
  }

  /// Look up a zone by id, including inactive ones.
  pub fn get(&self, id: ZoneId) -> Result<Arc<Zone>> {
    self
      .snapshot()
      .get(id)
      .cloned()
      .ok_or(Error::ZoneNotFound(id))
  }

  /// Active zones, optionally restricted to one kind. Ordering is stable within
  /// a snapshot and carries no other meaning.
  pub fn list_active(&self, kind: Option<ZoneKind>) -> Vec<Arc<Zone>> {
    self
      .snapshot()
      .active()
      .filter(|z| kind.is_none_or(|k| z.kind == k))
      .cloned()
      .collect()
  }

  /// Soft-delete a zone. Deactivating an inactive zone is a no-op.
  pub fn deactivate(&self, id: ZoneId) -> Result<Arc<Zone>> {
    self.write(|zones, index| {
      let Some(&i) = index.get(&id) else {
        return (Err(Error::ZoneNotFound(id)), false);
      };
      if !zones[i].active {
        return (Ok(Arc::clone(&zones[i])), false);
      }
      let retired = Arc::new(Zone { active: false, ..(*zones[i]).clone() });
      zones[i] = Arc::clone(&retired);
      (Ok(retired), true)
    })
  }

  /// Re-admit a previously persisted zone under its original id. Returns
  /// `false` (and changes nothing) if the id is already present.
  pub(crate) fn restore(&self, zone: Zone) -> bool {
    self.write(|zones, index| {
      if index.contains_key(&zone.id) {
        return (false, false);
      }
      zones.push(Arc::new(zone));
      (true, true)
    })
  }

  /// Run `f` against a copy of the current zone list under the writer lock.
  /// `f` returns its result and whether it changed anything; only changes
  /// publish a new snapshot.
  fn write<R>(
    &self,
    f: impl FnOnce(&mut Vec<Arc<Zone>>, &HashMap<ZoneId, usize>) -> (R, bool),
  ) -> R {
    let _writer = self.writer.lock();
    let current = self.snapshot();
    let mut zones = current.zones.clone();
    let (result, changed) = f(&mut zones, &current.index);
    if changed {
      let next = Arc::new(ZoneSnapshot::new(current.version + 1, zones));
      *self.current.write() = next;
    }
    result
  }
}
