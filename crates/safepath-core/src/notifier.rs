//! Breach notifier. Turns a stream of location samples into entered/exited
//! transition events instead of repeating steady-state results.
//!
//! Per-subject state lives behind its own mutex. Samples for different
//! subjects only contend on the brief map lookup; samples for the same subject
//! are applied one at a time, and a sample older than the last one applied is
//! rejected with [`Error::OutOfOrderSample`].

use std::{
  cmp::Reverse,
  collections::{BTreeMap, HashMap},
  sync::Arc,
};

use chrono::{DateTime, Utc};
use parking_lot::Mutex;
use serde::{Deserialize, Serialize};

use crate::{
  Error, Result,
  evaluator::{Classification, ContainmentResult, assess},
  sample::{Direction, LocationSample, SubjectId, TransitionEvent},
  store::ZoneStore,
  zone::{ZoneId, ZoneKind},
};

// ─── State ───────────────────────────────────────────────────────────────────

/// What the notifier remembers about a zone a subject is inside. Kept so an
/// exit can still be reported after the zone has been deactivated.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ZoneRef {
  pub name: String,
  pub kind: ZoneKind,
}

#[derive(Debug, Default)]
struct SubjectZoneState {
  inside:           BTreeMap<ZoneId, ZoneRef>,
  last_observed_at: Option<DateTime<Utc>>,
}

/// A subject's last known containment, as reported by
/// [`BreachNotifier::subject_zones`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SubjectPresence {
  pub subject_id:       SubjectId,
  pub zones:            Vec<PresentZone>,
  pub last_observed_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PresentZone {
  pub zone_id:   ZoneId,
  pub zone_name: String,
  pub kind:      ZoneKind,
}

/// Result of applying one sample.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SampleOutcome {
  pub classification: Classification,
  pub results:        Vec<ContainmentResult>,
  /// Empty in steady state.
  pub events:         Vec<TransitionEvent>,
}

// ─── Notifier ────────────────────────────────────────────────────────────────

#[derive(Debug)]
pub struct BreachNotifier {
  store:    Arc<ZoneStore>,
  subjects: Mutex<HashMap<SubjectId, Arc<Mutex<SubjectZoneState>>>>,
}

impl BreachNotifier {
  pub fn new(store: Arc<ZoneStore>) -> Self {
    Self { store, subjects: Mutex::new(HashMap::new()) }
  }

  fn subject(&self, id: &SubjectId) -> Arc<Mutex<SubjectZoneState>> {
    let mut subjects = self.subjects.lock();
    Arc::clone(subjects.entry(id.clone()).or_default())
  }

  /// Remove `entry` if it is still the map's entry for `id` and nobody but
  /// the map and the caller holds it. Called with the entry's lock held.
  fn forget_unused(&self, id: &SubjectId, entry: &Arc<Mutex<SubjectZoneState>>) {
    let mut subjects = self.subjects.lock();
    if Arc::strong_count(entry) == 2 && subjects.get(id).is_some_and(|e| Arc::ptr_eq(e, entry)) {
      subjects.remove(id);
    }
  }

  /// Evaluate `sample` and diff the result against the subject's previous
  /// containment.
  ///
  /// Events are ordered most severe kind first, then by zone name, then by
  /// zone id. An invalid, stale, or failed sample leaves the subject's state
  /// untouched.
  pub fn on_sample(&self, sample: &LocationSample) -> Result<SampleOutcome> {
    sample.validate()?;

    let entry = self.subject(&sample.subject_id);
    let mut state = entry.lock();

    if let Some(last_applied) = state.last_observed_at
      && sample.observed_at < last_applied
    {
      tracing::warn!(
        subject_id = %sample.subject_id,
        observed_at = %sample.observed_at,
        %last_applied,
        "stale sample rejected"
      );
      return Err(Error::OutOfOrderSample {
        subject_id: sample.subject_id.clone(),
        observed_at: sample.observed_at,
        last_applied,
      });
    }

    let snapshot = self.store.snapshot();
    let assessment = match assess(sample.point, snapshot.zones()) {
      Ok(assessment) => assessment,
      Err(e) => {
        if state.last_observed_at.is_none() {
          self.forget_unused(&sample.subject_id, &entry);
        }
        return Err(e);
      }
    };
    tracing::debug!(
      subject_id = %sample.subject_id,
      version = snapshot.version(),
      classification = ?assessment.classification,
      "sample evaluated"
    );

    let now: BTreeMap<ZoneId, ZoneRef> = assessment
      .containing()
      .map(|r| (r.zone_id, ZoneRef { name: r.zone_name.clone(), kind: r.kind }))
      .collect();

    let event = |zone_id: ZoneId, zone: &ZoneRef, direction: Direction| TransitionEvent {
      subject_id: sample.subject_id.clone(),
      zone_id,
      zone_name: zone.name.clone(),
      kind: zone.kind,
      direction,
      observed_at: sample.observed_at,
    };

    let mut events: Vec<TransitionEvent> = now
      .iter()
      .filter(|(id, _)| !state.inside.contains_key(*id))
      .map(|(&id, zone)| event(id, zone, Direction::Entered))
      .chain(
        state
          .inside
          .iter()
          .filter(|(id, _)| !now.contains_key(*id))
          .map(|(&id, zone)| event(id, zone, Direction::Exited)),
      )
      .collect();
    events.sort_by(|a, b| {
      (Reverse(a.kind.severity()), &a.zone_name, a.zone_id).cmp(&(
        Reverse(b.kind.severity()),
        &b.zone_name,
        b.zone_id,
      ))
    });

    state.inside = now;
    state.last_observed_at = Some(sample.observed_at);
    drop(state);

    for e in &events {
      tracing::info!(
        subject_id = %e.subject_id,
        zone_id = %e.zone_id,
        kind = %e.kind,
        direction = e.direction.as_str(),
        "zone transition: {}",
        e.zone_name
      );
    }

    Ok(SampleOutcome {
      classification: assessment.classification,
      results: assessment.results,
      events,
    })
  }

  /// The zones `subject` was inside at its last applied sample.
  pub fn subject_zones(&self, subject: &SubjectId) -> Result<SubjectPresence> {
    let state = self
      .subjects
      .lock()
      .get(subject)
      .cloned()
      .ok_or_else(|| Error::SubjectNotFound(subject.clone()))?;
    let state = state.lock();
    let last_observed_at = state
      .last_observed_at
      .ok_or_else(|| Error::SubjectNotFound(subject.clone()))?;

    Ok(SubjectPresence {
      subject_id: subject.clone(),
      zones: state
        .inside
        .iter()
        .map(|(&zone_id, zone)| PresentZone {
          zone_id,
          zone_name: zone.name.clone(),
          kind: zone.kind,
        })
        .collect(),
      last_observed_at,
    })
  }

  /// Number of subjects with at least one applied sample.
  pub fn tracked_subjects(&self) -> usize {
    let subjects: Vec<_> = self.subjects.lock().values().cloned().collect();
    subjects
      .iter()
      .filter(|s| s.lock().last_observed_at.is_some())
      .count()
  }
}
