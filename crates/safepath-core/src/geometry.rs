//! Geometry engine: point containment, polygon simplicity, ring closing.
//!
//! Coordinates are treated as planar `(lat, lng)` pairs with no geodesic
//! correction. That is accurate enough at city scale, which is the scale zones
//! are drawn at; it is not suitable for zones spanning the antimeridian or the
//! poles.
//!
//! Rings may be passed open (`[a, b, c]`) or explicitly closed
//! (`[a, b, c, a]`); every function here treats both forms the same.

use std::f64::consts::SQRT_2;

use serde::{Deserialize, Serialize};

use crate::ValidationError;

/// Distance (in degrees) within which a point counts as lying on an edge.
/// Roughly 0.1 mm at the equator.
pub const BOUNDARY_TOLERANCE: f64 = 1e-9;

// ─── Point ───────────────────────────────────────────────────────────────────

/// A geographic position. The only coordinate type used inside the core.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Point {
  pub lat: f64,
  pub lng: f64,
}

impl Point {
  pub const fn new(lat: f64, lng: f64) -> Self { Self { lat, lng } }

  /// Build a point from a wire-format `[lng, lat]` pair.
  pub fn from_lng_lat([lng, lat]: [f64; 2]) -> Self { Self { lat, lng } }

  /// Render as a wire-format `[lng, lat]` pair.
  pub fn to_lng_lat(self) -> [f64; 2] { [self.lng, self.lat] }

  pub fn is_finite(self) -> bool { self.lat.is_finite() && self.lng.is_finite() }

  /// Finite, latitude within ±90 and longitude within ±180.
  pub fn is_in_range(self) -> bool {
    self.is_finite()
      && (-90.0..=90.0).contains(&self.lat)
      && (-180.0..=180.0).contains(&self.lng)
  }
}

// ─── Bounding box ────────────────────────────────────────────────────────────

/// Axis-aligned bounds of a ring, used to reject distant points cheaply.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BoundingBox {
  pub min_lat: f64,
  pub max_lat: f64,
  pub min_lng: f64,
  pub max_lng: f64,
}

impl BoundingBox {
  /// Bounds of `ring`, or `None` if it is empty.
  pub fn of(ring: &[Point]) -> Option<Self> {
    let first = ring.first()?;
    let init = Self {
      min_lat: first.lat,
      max_lat: first.lat,
      min_lng: first.lng,
      max_lng: first.lng,
    };
    Some(ring.iter().fold(init, |b, p| Self {
      min_lat: b.min_lat.min(p.lat),
      max_lat: b.max_lat.max(p.lat),
      min_lng: b.min_lng.min(p.lng),
      max_lng: b.max_lng.max(p.lng),
    }))
  }

  /// Inclusive containment, widened so it never rejects a point the on-edge
  /// test accepts. That test allows [`BOUNDARY_TOLERANCE`] both across and
  /// past the end of an edge, which reaches `√2 ×` the tolerance along one
  /// axis when the edge is diagonal.
  pub fn contains(&self, p: Point) -> bool {
    let margin = BOUNDARY_TOLERANCE * SQRT_2;
    p.lat >= self.min_lat - margin
      && p.lat <= self.max_lat + margin
      && p.lng >= self.min_lng - margin
      && p.lng <= self.max_lng + margin
  }
}

// ─── Rings ───────────────────────────────────────────────────────────────────

/// Append the first vertex to the end unless the ring is already closed.
/// Idempotent.
pub fn close_ring(ring: &[Point]) -> Vec<Point> {
  let mut closed = ring.to_vec();
  if let (Some(first), Some(last)) = (ring.first(), ring.last())
    && first != last
  {
    closed.push(*first);
  }
  closed
}

/// View `ring` without its duplicated closing vertex, if it has one.
pub fn open_ring(ring: &[Point]) -> &[Point] {
  match ring {
    [first, .., last] if first == last => &ring[..ring.len() - 1],
    _ => ring,
  }
}

/// Number of distinct vertices in `ring`.
pub fn distinct_vertices(ring: &[Point]) -> usize {
  let mut sorted = ring.to_vec();
  sorted.sort_by(|a, b| a.lat.total_cmp(&b.lat).then(a.lng.total_cmp(&b.lng)));
  sorted.dedup();
  sorted.len()
}

/// Reject non-finite or out-of-range vertices and rings with fewer than three
/// distinct vertices.
pub fn check_ring(ring: &[Point]) -> Result<(), ValidationError> {
  for (index, p) in ring.iter().enumerate() {
    if !p.is_finite() {
      return Err(ValidationError::NonFiniteCoordinate { index });
    }
    if !p.is_in_range() {
      return Err(ValidationError::CoordinateOutOfRange { index });
    }
  }
  let found = distinct_vertices(open_ring(ring));
  if found < 3 {
    return Err(ValidationError::TooFewVertices { found });
  }
  Ok(())
}

// ─── Containment ─────────────────────────────────────────────────────────────

/// Ray-casting (even-odd) containment test.
///
/// The ray runs from `point` towards increasing longitude. Points on a vertex
/// or an edge (within [`BOUNDARY_TOLERANCE`]) are contained. Edges whose
/// endpoints share a latitude are skipped; they can never change the crossing
/// parity.
pub fn point_in_polygon(
  point: Point,
  ring: &[Point],
) -> Result<bool, ValidationError> {
  if !point.is_finite() {
    return Err(ValidationError::InvalidSamplePoint {
      lat: point.lat,
      lng: point.lng,
    });
  }
  let ring = open_ring(ring);
  check_ring(ring)?;

  match BoundingBox::of(ring) {
    Some(bounds) if bounds.contains(point) => {}
    _ => return Ok(false),
  }

  let mut inside = false;
  for (a, b) in edges(ring) {
    if on_segment(point, a, b) {
      return Ok(true);
    }
    if a.lat == b.lat {
      continue;
    }
    if (a.lat > point.lat) != (b.lat > point.lat) {
      let crossing =
        a.lng + (point.lat - a.lat) * (b.lng - a.lng) / (b.lat - a.lat);
      if point.lng < crossing {
        inside = !inside;
      }
    }
  }
  Ok(inside)
}

// ─── Simplicity ──────────────────────────────────────────────────────────────

/// `true` when the ring has at least three distinct finite vertices and no two
/// of its edges intersect other than adjacent edges at their shared vertex.
pub fn is_simple_polygon(ring: &[Point]) -> bool {
  let ring = open_ring(ring);
  if ring.iter().any(|p| !p.is_finite()) || distinct_vertices(ring) < 3 {
    return false;
  }
  find_self_intersection(ring).is_none()
}

/// Return the indices of the first pair of edges that intersect, where edge
/// `i` runs from vertex `i` to vertex `i + 1` (wrapping).
///
/// Adjacent edges are only reported when they fold back over each other.
/// Plain O(n²) pair check; zones are hand-drawn and small.
pub fn find_self_intersection(ring: &[Point]) -> Option<(usize, usize)> {
  let ring = open_ring(ring);
  let n = ring.len();
  if n < 3 {
    return None;
  }
  let edge = |i: usize| (ring[i], ring[(i + 1) % n]);

  for i in 0..n {
    for j in (i + 1)..n {
      let (a, b) = edge(i);
      let (c, d) = edge(j);
      let intersects = if j == i + 1 {
        folds_back(a, b, d)
      } else if i == 0 && j == n - 1 {
        folds_back(c, a, b)
      } else {
        segments_intersect(a, b, c, d)
      };
      if intersects {
        return Some((i, j));
      }
    }
  }
  None
}

// ─── Primitives ──────────────────────────────────────────────────────────────

fn edges(ring: &[Point]) -> impl Iterator<Item = (Point, Point)> + '_ {
  let n = ring.len();
  (0..n).map(move |i| (ring[i], ring[(i + 1) % n]))
}

/// Twice the signed area of triangle `abc`, with `lng` as x and `lat` as y.
fn cross(a: Point, b: Point, c: Point) -> f64 {
  (b.lng - a.lng) * (c.lat - a.lat) - (b.lat - a.lat) * (c.lng - a.lng)
}

fn on_segment(p: Point, a: Point, b: Point) -> bool {
  let (dx, dy) = (b.lng - a.lng, b.lat - a.lat);
  let len = dx.hypot(dy);
  if len == 0.0 {
    return (p.lng - a.lng).hypot(p.lat - a.lat) <= BOUNDARY_TOLERANCE;
  }
  if (cross(a, b, p) / len).abs() > BOUNDARY_TOLERANCE {
    return false;
  }
  let along = ((p.lng - a.lng) * dx + (p.lat - a.lat) * dy) / len;
  (-BOUNDARY_TOLERANCE..=len + BOUNDARY_TOLERANCE).contains(&along)
}

/// Consecutive edges `a→b` and `b→c` overlap when they are collinear and
/// point in opposite directions.
fn folds_back(a: Point, b: Point, c: Point) -> bool {
  let dot = (b.lng - a.lng) * (c.lng - b.lng) + (b.lat - a.lat) * (c.lat - b.lat);
  cross(a, b, c) == 0.0 && dot < 0.0
}

/// Closed-segment intersection; touching and collinear overlap both count.
fn segments_intersect(a: Point, b: Point, c: Point, d: Point) -> bool {
  let d1 = cross(c, d, a);
  let d2 = cross(c, d, b);
  let d3 = cross(a, b, c);
  let d4 = cross(a, b, d);

  if ((d1 > 0.0 && d2 < 0.0) || (d1 < 0.0 && d2 > 0.0))
    && ((d3 > 0.0 && d4 < 0.0) || (d3 < 0.0 && d4 > 0.0))
  {
    return true;
  }

  (d1 == 0.0 && within_bounds(a, c, d))
    || (d2 == 0.0 && within_bounds(b, c, d))
    || (d3 == 0.0 && within_bounds(c, a, b))
    || (d4 == 0.0 && within_bounds(d, a, b))
}

/// `p` lies inside the bounding box of segment `a→b` (used once `p` is known
/// to be collinear with it).
fn within_bounds(p: Point, a: Point, b: Point) -> bool {
  p.lng >= a.lng.min(b.lng)
    && p.lng <= a.lng.max(b.lng)
    && p.lat >= a.lat.min(b.lat)
    && p.lat <= a.lat.max(b.lat)
}
