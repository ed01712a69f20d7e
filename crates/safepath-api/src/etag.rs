//! ETag computation for zone listings.
//!
//! ETags are SHA-256 hashes over the sorted ids of the listed zones. Zones
//! are immutable apart from deactivation, which removes them from listings, so
//! the id set identifies the content.

use std::sync::Arc;

use axum::http::{HeaderMap, header};
use safepath_core::zone::{Zone, ZoneId};
use sha2::{Digest, Sha256};

/// Compute a strong ETag for a zone listing. Stable under reordering.
pub fn zone_set_etag(zones: &[Arc<Zone>]) -> String {
  let mut ids: Vec<ZoneId> = zones.iter().map(|z| z.id).collect();
  compute_etag_from_ids(&mut ids)
}

/// The slice is sorted in-place for determinism.
pub fn compute_etag_from_ids(ids: &mut [ZoneId]) -> String {
  ids.sort();

  let mut hasher = Sha256::new();
  for id in ids.iter() {
    hasher.update(id.0.as_bytes());
  }
  format!("\"{}\"", hex::encode(hasher.finalize()))
}

/// Whether the request's `If-None-Match` header matches `etag`.
pub fn if_none_match(headers: &HeaderMap, etag: &str) -> bool {
  headers
    .get_all(header::IF_NONE_MATCH)
    .iter()
    .filter_map(|v| v.to_str().ok())
    .flat_map(|v| v.split(','))
    .map(|tag| tag.trim())
    .any(|tag| tag == "*" || tag.strip_prefix("W/").unwrap_or(tag) == etag)
}
