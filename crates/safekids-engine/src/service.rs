use std::sync::Arc;

use chrono::{DateTime, Utc};
use safekids_common::error::{Result, ValidationError};
use safekids_common::types::{
    Geofence, GeofencePatch, GeoPoint, TransitionEvent, ZoneInput,
};
use tracing::{debug, info};
use uuid::Uuid;

use crate::store::GeofenceStore;
use crate::tracker::TransitionTracker;
use crate::validator;

/// Facade over the geofence store and transition tracker, exposing the
/// operations the transport layer calls into.
///
/// Owns the cascade rules between the two: deleting a geofence or
/// unlinking a child also drops the dependent containment state, so a
/// later re-link starts from the Unknown state.
pub struct GeofenceService {
    store: Arc<GeofenceStore>,
    tracker: Arc<TransitionTracker>,
}

impl Default for GeofenceService {
    fn default() -> Self {
        Self::new()
    }
}

impl GeofenceService {
    pub fn new() -> Self {
        info!("Initializing geofence service");
        Self {
            store: Arc::new(GeofenceStore::new()),
            tracker: Arc::new(TransitionTracker::new()),
        }
    }

    pub async fn create_geofence(
        &self,
        input: ZoneInput,
    ) -> std::result::Result<Geofence, ValidationError> {
        let validated = validator::validate(&input)?;
        Ok(self.store.create(validated).await)
    }

    pub async fn update_geofence(
        &self,
        id: Uuid,
        version: u64,
        patch: GeofencePatch,
    ) -> Result<Geofence> {
        self.store.update(id, version, patch).await
    }

    pub async fn delete_geofence(&self, id: Uuid) -> Result<()> {
        let removed = self.store.delete(id).await?;
        self.tracker.remove_geofence(removed.id).await;
        Ok(())
    }

    pub async fn get_geofence(&self, id: Uuid) -> Option<Geofence> {
        self.store.get(id).await
    }

    pub async fn list_for_child(&self, child_id: Uuid) -> Vec<Geofence> {
        self.store.list_by_child(child_id).await
    }

    pub async fn link_child(&self, id: Uuid, child_id: Uuid) -> Result<Geofence> {
        self.store.link_child(id, child_id).await
    }

    pub async fn unlink_child(&self, id: Uuid, child_id: Uuid) -> Result<Geofence> {
        let geofence = self.store.unlink_child(id, child_id).await?;
        self.tracker.remove_state(child_id, id).await;
        Ok(geofence)
    }

    /// Evaluate a location sample against every geofence linked to the
    /// child, in creation order. Returns the transitions this sample
    /// caused; a child with no linked geofences yields an empty vec.
    pub async fn evaluate_location(
        &self,
        child_id: Uuid,
        point: GeoPoint,
        timestamp: DateTime<Utc>,
    ) -> Vec<TransitionEvent> {
        let linked = self.store.list_by_child(child_id).await;
        debug!("Evaluating location for child {} against {} geofences", child_id, linked.len());

        let mut events = Vec::new();
        for geofence in &linked {
            if let Some(event) = self.evaluate_one(child_id, geofence, point, timestamp).await {
                events.push(event);
            }
        }
        events
    }

    /// Evaluate one sample against one geofence snapshot.
    ///
    /// The snapshot may be stale: a delete can land between the
    /// `list_by_child` read and the tracker update, in which case the
    /// tracker just recorded state for a geofence that no longer exists
    /// and whose cleanup cascade already ran. Re-checking existence after
    /// the record catches every interleaving — either the cascade runs
    /// after our insert and sweeps it, or it ran before and this sweep
    /// removes the orphan.
    async fn evaluate_one(
        &self,
        child_id: Uuid,
        geofence: &Geofence,
        point: GeoPoint,
        timestamp: DateTime<Utc>,
    ) -> Option<TransitionEvent> {
        let event = self.tracker.on_evaluation(child_id, point, geofence, timestamp).await;

        if self.store.get(geofence.id).await.is_none() {
            self.tracker.remove_state(child_id, geofence.id).await;
            return None;
        }
        event
    }

    pub fn store(&self) -> &Arc<GeofenceStore> {
        &self.store
    }

    pub fn tracker(&self) -> &Arc<TransitionTracker> {
        &self.tracker
    }
}
