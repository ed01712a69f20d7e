//! Zone manager: the authority-facing entry point for authoring zones.
//!
//! Every zone reaches the [`ZoneStore`] through here, so the store can rely on
//! its geometry invariants: at least three distinct vertices, no repeated
//! consecutive vertex, no self-intersection, stored as an open ring.

use std::{collections::HashSet, sync::Arc};

use crate::{
  Error, Result, ValidationError,
  geometry::{Point, check_ring, close_ring, find_self_intersection, open_ring},
  store::ZoneStore,
  zone::{AuthorityId, NewZone, ValidatedZone, Zone, ZoneId},
};

/// Normalise and validate a raw authority-drawn boundary.
///
/// The ring is closed and then its closing vertex stripped, so open and closed
/// input produce the same stored boundary. Nothing else is "fixed": any rule
/// violation is returned as the matching [`ValidationError`].
pub fn validate_boundary(raw: &[Point]) -> Result<Vec<Point>, ValidationError> {
  let closed = close_ring(raw);
  let boundary = open_ring(&closed).to_vec();

  check_ring(&boundary)?;

  let n = boundary.len();
  for index in 0..n {
    let previous = boundary[(index + n - 1) % n];
    if boundary[index] == previous {
      return Err(ValidationError::RepeatedVertex { index });
    }
  }

  if let Some((first, second)) = find_self_intersection(&boundary) {
    return Err(ValidationError::SelfIntersecting { first, second });
  }

  Ok(boundary)
}

/// Apply every authoring rule to `input`, in order: name, ring closing,
/// vertex count, simplicity.
pub fn validate_zone(input: NewZone) -> Result<ValidatedZone, ValidationError> {
  let name = input.name.trim();
  if name.is_empty() {
    return Err(ValidationError::EmptyName);
  }
  let boundary = validate_boundary(&input.boundary)?;
  Ok(ValidatedZone {
    name: name.to_owned(),
    description: input
      .description
      .map(|d| d.trim().to_owned())
      .filter(|d| !d.is_empty()),
    kind: input.kind,
    boundary,
    created_by: input.created_by,
  })
}

#[derive(Debug, Clone)]
pub struct ZoneManager {
  store:             Arc<ZoneStore>,
  super_authorities: HashSet<AuthorityId>,
}

impl ZoneManager {
  pub fn new(store: Arc<ZoneStore>) -> Self {
    Self { store, super_authorities: HashSet::new() }
  }

  /// Authorities allowed to deactivate zones they did not create.
  pub fn with_super_authorities(
    mut self,
    ids: impl IntoIterator<Item = AuthorityId>,
  ) -> Self {
    self.super_authorities.extend(ids);
    self
  }

  pub fn store(&self) -> &Arc<ZoneStore> { &self.store }

  /// Validate `input` and admit it into the store.
  pub fn create_zone(&self, input: NewZone) -> Result<Arc<Zone>> {
    let authority = input.created_by.clone();
    let validated = validate_zone(input).inspect_err(|e| {
      tracing::warn!(%authority, reason = e.reason(), "zone rejected: {e}");
    })?;
    let id = self.store.add(validated);
    let zone = self.store.get(id)?;
    tracing::info!(
      zone_id = %zone.id,
      kind = %zone.kind,
      vertices = zone.boundary.len(),
      %authority,
      "zone created: {}",
      zone.name
    );
    Ok(zone)
  }

  /// Check that `authority` may deactivate zone `id` without changing
  /// anything. Only its creator or a super-authority may.
  pub fn authorize_delete(&self, id: ZoneId, authority: &AuthorityId) -> Result<Arc<Zone>> {
    let zone = self.store.get(id)?;
    if &zone.created_by != authority && !self.super_authorities.contains(authority) {
      tracing::warn!(zone_id = %id, %authority, owner = %zone.created_by, "zone delete forbidden");
      return Err(Error::Forbidden { zone_id: id, authority: authority.clone() });
    }
    Ok(zone)
  }

  /// Deactivate a zone after [`authorize_delete`](Self::authorize_delete).
  pub fn delete_zone(&self, id: ZoneId, authority: &AuthorityId) -> Result<Arc<Zone>> {
    self.authorize_delete(id, authority)?;
    let retired = self.store.deactivate(id)?;
    tracing::info!(zone_id = %id, %authority, "zone deactivated");
    Ok(retired)
  }

  /// Re-admit persisted zones (active and inactive) under their original ids.
  ///
  /// Each zone's geometry is validated again; zones that fail, or whose id is
  /// already present, are logged and skipped. Returns how many were restored.
  pub fn restore(&self, zones: impl IntoIterator<Item = Zone>) -> usize {
    let mut restored = 0;
    for zone in zones {
      match validate_boundary(&zone.boundary) {
        Ok(boundary) if boundary == zone.boundary && !zone.name.trim().is_empty() => {}
        Ok(_) => {
          tracing::error!(zone_id = %zone.id, "persisted zone is not in canonical form; skipped");
          continue;
        }
        Err(e) => {
          tracing::error!(zone_id = %zone.id, reason = e.reason(), "persisted zone is invalid; skipped: {e}");
          continue;
        }
      }
      let id = zone.id;
      if self.store.restore(zone) {
        restored += 1;
      } else {
        tracing::warn!(zone_id = %id, "duplicate persisted zone id; skipped");
      }
    }
    restored
  }
}
