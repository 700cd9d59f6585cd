use std::collections::HashMap;
use std::sync::Arc;

use chrono::Utc;
use safekids_common::error::{Result, StoreError};
use safekids_common::types::{Geofence, GeofencePatch, ValidatedZone};
use tokio::sync::RwLock;
use tracing::{debug, info};
use uuid::Uuid;

use crate::validator;

/// Canonical owner of all geofence records.
///
/// The outer map only tracks which records exist; every record sits
/// behind its own lock. Mutating a record holds the outer lock in read
/// mode plus that one record's write lock, so a write to one geofence
/// never blocks reads or writes of any other id. Only `create` and
/// `delete` take the outer lock in write mode, and only to insert or
/// remove the entry. Updates are additionally guarded by the per-record
/// `version` counter: an update carrying a stale version is rejected
/// with [`StoreError::VersionConflict`] instead of silently overwriting
/// a concurrent edit.
#[derive(Default)]
pub struct GeofenceStore {
    zones: RwLock<HashMap<Uuid, Arc<RwLock<Geofence>>>>,
}

impl GeofenceStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Persist a validated zone as a new record. Never fails: validation
    /// already ran, and id assignment cannot collide in practice.
    pub async fn create(&self, zone: ValidatedZone) -> Geofence {
        let now = Utc::now();
        let geofence = Geofence {
            id: Uuid::new_v4(),
            name: zone.name,
            zone_type: zone.zone_type,
            center: zone.center,
            radius_meters: zone.radius_meters,
            linked_children: zone.linked_children,
            created_at: now,
            updated_at: now,
            version: 1,
        };

        info!("Created geofence '{}' ({})", geofence.name, geofence.id);
        self.zones
            .write()
            .await
            .insert(geofence.id, Arc::new(RwLock::new(geofence.clone())));
        geofence
    }

    /// Apply a partial update under optimistic concurrency.
    ///
    /// Mutated fields are re-validated before anything is written, so a
    /// rejected patch leaves the record untouched. A patch with no fields
    /// set still bumps `version` and `updated_at`.
    pub async fn update(
        &self,
        id: Uuid,
        version: u64,
        patch: GeofencePatch,
    ) -> Result<Geofence> {
        // The outer read guard stays held across the record write: it
        // parks a concurrent delete of this id without blocking access
        // to any other record.
        let zones = self.zones.read().await;
        let record = zones.get(&id).cloned().ok_or(StoreError::NotFound(id))?;
        let mut geofence = record.write().await;

        if geofence.version != version {
            debug!(
                "Rejecting stale update on geofence {}: submitted v{}, current v{}",
                id, version, geofence.version
            );
            return Err(StoreError::VersionConflict {
                id,
                submitted: version,
                current: geofence.version,
            });
        }

        let name = match patch.name {
            Some(raw) => Some(validator::validate_name(&raw)?),
            None => None,
        };
        let radius_meters = match patch.radius_meters {
            Some(r) => Some(validator::validate_radius(r)?),
            None => None,
        };
        let center = match patch.center {
            Some(c) => Some(validator::validate_center(c)?),
            None => None,
        };

        if let Some(name) = name {
            geofence.name = name;
        }
        if let Some(zone_type) = patch.zone_type {
            geofence.zone_type = zone_type;
        }
        if let Some(center) = center {
            geofence.center = center;
        }
        if let Some(radius_meters) = radius_meters {
            geofence.radius_meters = radius_meters;
        }

        geofence.version += 1;
        geofence.updated_at = Utc::now();

        info!("Updated geofence '{}' ({}) to v{}", geofence.name, id, geofence.version);
        Ok(geofence.clone())
    }

    /// Remove a record, returning it so the caller can cascade cleanup of
    /// dependent containment state.
    pub async fn delete(&self, id: Uuid) -> Result<Geofence> {
        let record = self.zones.write().await.remove(&id).ok_or(StoreError::NotFound(id))?;
        let removed = record.read().await.clone();
        info!("Deleted geofence '{}' ({})", removed.name, id);
        Ok(removed)
    }

    pub async fn get(&self, id: Uuid) -> Option<Geofence> {
        let record = self.zones.read().await.get(&id).cloned()?;
        let geofence = record.read().await.clone();
        Some(geofence)
    }

    /// All geofences the given child is linked to, oldest first.
    pub async fn list_by_child(&self, child_id: Uuid) -> Vec<Geofence> {
        let records: Vec<Arc<RwLock<Geofence>>> =
            self.zones.read().await.values().cloned().collect();

        let mut linked = Vec::new();
        for record in records {
            let geofence = record.read().await;
            if geofence.is_linked(child_id) {
                linked.push(geofence.clone());
            }
        }
        linked.sort_by_key(|g| g.created_at);
        linked
    }

    /// Link a child to a geofence. Idempotent: linking an already-linked
    /// child changes nothing and does not bump the version.
    pub async fn link_child(&self, id: Uuid, child_id: Uuid) -> Result<Geofence> {
        let zones = self.zones.read().await;
        let record = zones.get(&id).cloned().ok_or(StoreError::NotFound(id))?;
        let mut geofence = record.write().await;

        if geofence.linked_children.insert(child_id) {
            geofence.version += 1;
            geofence.updated_at = Utc::now();
            info!("Linked child {} to geofence '{}' ({})", child_id, geofence.name, id);
        }
        Ok(geofence.clone())
    }

    /// Unlink a child from a geofence. Idempotent; the caller cascades
    /// containment-state cleanup for the pair.
    pub async fn unlink_child(&self, id: Uuid, child_id: Uuid) -> Result<Geofence> {
        let zones = self.zones.read().await;
        let record = zones.get(&id).cloned().ok_or(StoreError::NotFound(id))?;
        let mut geofence = record.write().await;

        if geofence.linked_children.remove(&child_id) {
            geofence.version += 1;
            geofence.updated_at = Utc::now();
            info!("Unlinked child {} from geofence '{}' ({})", child_id, geofence.name, id);
        }
        Ok(geofence.clone())
    }
}
