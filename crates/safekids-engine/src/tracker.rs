// Zone Transition Tracking Module
//
// Edge-triggered containment state per (child, geofence) pair. A polling
// location source re-confirms containment many times per real crossing;
// only a change of state may produce an event.

use std::collections::hash_map::Entry;
use std::collections::HashMap;
use std::sync::Arc;

use chrono::{DateTime, Utc};
use safekids_common::types::{ContainmentState, GeoPoint, Geofence, TransitionEvent};
use tokio::sync::{Mutex, RwLock};
use tracing::{debug, info};
use uuid::Uuid;

use crate::geo;

type PairKey = (Uuid, Uuid);

/// Owns the last-known containment state for every evaluated
/// (child, geofence) pair. A pair with no entry has never been evaluated
/// and is in the Unknown state: its first evaluation records a state but
/// emits no event, since there is no prior state to compare against.
///
/// Each pair's state sits behind its own lock; the outer map lock is
/// held only to look up or insert an entry, so evaluations for different
/// pairs proceed concurrently while evaluations for one pair serialize
/// in submission order.
#[derive(Default)]
pub struct TransitionTracker {
    states: RwLock<HashMap<PairKey, Arc<Mutex<ContainmentState>>>>,
}

impl TransitionTracker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Evaluate one location sample against one geofence and update the
    /// pair's state. Returns an event only on an Inside/Outside edge.
    pub async fn on_evaluation(
        &self,
        child_id: Uuid,
        point: GeoPoint,
        geofence: &Geofence,
        now: DateTime<Utc>,
    ) -> Option<TransitionEvent> {
        let is_inside = geo::contains(geofence, point);
        let key = (child_id, geofence.id);
        let next = ContainmentState { is_inside, last_evaluated_at: now };

        // Common case first: the pair already has an entry, so only its
        // own lock is taken for the swap.
        let previous = {
            let states = self.states.read().await;
            match states.get(&key) {
                Some(entry) => {
                    let mut state = entry.lock().await;
                    let prior = state.is_inside;
                    *state = next;
                    Some(prior)
                }
                None => None,
            }
        };

        let previous = match previous {
            Some(prior) => Some(prior),
            None => {
                // First sight of this pair; insert under the outer write
                // lock. A racing evaluator may have inserted between the
                // read above and here, in which case this is an ordinary
                // swap after all.
                let mut states = self.states.write().await;
                match states.entry(key) {
                    Entry::Occupied(entry) => {
                        let mut state = entry.get().lock().await;
                        let prior = state.is_inside;
                        *state = next;
                        Some(prior)
                    }
                    Entry::Vacant(slot) => {
                        slot.insert(Arc::new(Mutex::new(next)));
                        None
                    }
                }
            }
        };

        match previous {
            None => {
                debug!(
                    "First evaluation for child {} against geofence {}: inside={}",
                    child_id, geofence.id, is_inside
                );
                None
            }
            Some(was_inside) if was_inside == is_inside => None,
            Some(_) if is_inside => {
                info!("Child {} entered {} zone '{}'", child_id, geofence.zone_type, geofence.name);
                Some(TransitionEvent::Entered {
                    child_id,
                    geofence_id: geofence.id,
                    zone_type: geofence.zone_type,
                    timestamp: now,
                })
            }
            Some(_) => {
                info!("Child {} exited {} zone '{}'", child_id, geofence.zone_type, geofence.name);
                Some(TransitionEvent::Exited {
                    child_id,
                    geofence_id: geofence.id,
                    zone_type: geofence.zone_type,
                    timestamp: now,
                })
            }
        }
    }

    /// Last recorded state for a pair, if it was ever evaluated.
    pub async fn state(&self, child_id: Uuid, geofence_id: Uuid) -> Option<ContainmentState> {
        let entry = self.states.read().await.get(&(child_id, geofence_id)).cloned()?;
        let state = *entry.lock().await;
        Some(state)
    }

    /// Drop the state for one pair, e.g. after the child is unlinked from
    /// the geofence. Idempotent if the pair was never evaluated.
    pub async fn remove_state(&self, child_id: Uuid, geofence_id: Uuid) {
        if self.states.write().await.remove(&(child_id, geofence_id)).is_some() {
            debug!("Removed containment state for child {} / geofence {}", child_id, geofence_id);
        }
    }

    /// Drop the state of every pair involving a deleted geofence.
    pub async fn remove_geofence(&self, geofence_id: Uuid) {
        let mut states = self.states.write().await;
        let before = states.len();
        states.retain(|(_, gid), _| *gid != geofence_id);
        let removed = before - states.len();
        if removed > 0 {
            debug!("Removed {} containment state entries for geofence {}", removed, geofence_id);
        }
    }
}
