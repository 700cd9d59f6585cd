use std::collections::BTreeSet;
use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Safety classification of a geofence.
///
/// Safe zones alert when a child leaves them, danger zones alert when a
/// child enters them; the engine emits the raw transition either way and
/// leaves the alerting policy to the notification consumer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ZoneType {
    Safe,
    Danger,
}

impl fmt::Display for ZoneType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ZoneType::Safe => write!(f, "safe"),
            ZoneType::Danger => write!(f, "danger"),
        }
    }
}

/// A point on the Earth's surface in decimal degrees.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GeoPoint {
    pub latitude: f64,
    pub longitude: f64,
}

impl GeoPoint {
    pub fn new(latitude: f64, longitude: f64) -> Self {
        Self { latitude, longitude }
    }
}

/// A circular monitored region linked to zero or more children.
///
/// This is the canonical record owned by the geofence store. `version`
/// increments on every mutation and backs optimistic concurrency: an
/// update carrying a stale version is rejected.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Geofence {
    /// Unique identifier, assigned at creation, immutable.
    pub id: Uuid,
    /// Display name chosen by the parent.
    pub name: String,
    pub zone_type: ZoneType,
    pub center: GeoPoint,
    /// Radius in meters, always within [50, 1000] for a stored record.
    pub radius_meters: u32,
    /// Children monitored against this zone. May be empty; an unlinked
    /// zone is valid but produces no transition events.
    pub linked_children: BTreeSet<Uuid>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub version: u64,
}

impl Geofence {
    pub fn is_linked(&self, child_id: Uuid) -> bool {
        self.linked_children.contains(&child_id)
    }
}

/// Raw geofence-creation request as it arrives from a client.
///
/// `zone_type` is the untyped wire string; validation turns it into a
/// [`ZoneType`] or rejects the request.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ZoneInput {
    pub name: String,
    pub zone_type: String,
    pub latitude: f64,
    pub longitude: f64,
    pub radius_meters: u32,
    #[serde(default)]
    pub linked_children: Vec<Uuid>,
}

/// A creation request that passed validation. Only the validator
/// constructs these, so the store can accept them without re-checking.
#[derive(Debug, Clone, PartialEq)]
pub struct ValidatedZone {
    pub name: String,
    pub zone_type: ZoneType,
    pub center: GeoPoint,
    pub radius_meters: u32,
    pub linked_children: BTreeSet<Uuid>,
}

/// Partial update for an existing geofence. `None` fields are left
/// untouched; present fields are re-validated before being applied.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct GeofencePatch {
    pub name: Option<String>,
    pub zone_type: Option<ZoneType>,
    pub center: Option<GeoPoint>,
    pub radius_meters: Option<u32>,
}

/// Last observed containment result for one (child, geofence) pair.
///
/// Absence of a record means the pair has never been evaluated; the
/// tracker treats that as the Unknown state and emits no event on the
/// first observation.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ContainmentState {
    pub is_inside: bool,
    pub last_evaluated_at: DateTime<Utc>,
}

/// Zone crossing emitted by the transition tracker.
///
/// Exactly one event is emitted per physical crossing; re-confirming an
/// unchanged state on a polling tick never produces one.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum TransitionEvent {
    Entered {
        child_id: Uuid,
        geofence_id: Uuid,
        zone_type: ZoneType,
        timestamp: DateTime<Utc>,
    },
    Exited {
        child_id: Uuid,
        geofence_id: Uuid,
        zone_type: ZoneType,
        timestamp: DateTime<Utc>,
    },
}

impl TransitionEvent {
    pub fn child_id(&self) -> Uuid {
        match self {
            TransitionEvent::Entered { child_id, .. } => *child_id,
            TransitionEvent::Exited { child_id, .. } => *child_id,
        }
    }

    pub fn geofence_id(&self) -> Uuid {
        match self {
            TransitionEvent::Entered { geofence_id, .. } => *geofence_id,
            TransitionEvent::Exited { geofence_id, .. } => *geofence_id,
        }
    }

    pub fn timestamp(&self) -> DateTime<Utc> {
        match self {
            TransitionEvent::Entered { timestamp, .. } => *timestamp,
            TransitionEvent::Exited { timestamp, .. } => *timestamp,
        }
    }
}

/// Location sample from the device-side location source.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LocationUpdate {
    pub child_id: Uuid,
    pub point: GeoPoint,
    pub timestamp: DateTime<Utc>,
}

/// Foreground time reported for a single application within one query
/// window.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UsageSample {
    pub package_name: String,
    pub foreground_time_ms: i64,
}

impl UsageSample {
    pub fn new(package_name: impl Into<String>, foreground_time_ms: i64) -> Self {
        Self { package_name: package_name.into(), foreground_time_ms }
    }
}

/// Summarized device usage for one query window. Derived, never persisted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct UsageReport {
    /// Whole minutes of foreground time across all included samples,
    /// truncating division of the millisecond total.
    pub total_minutes: i64,
    /// Included samples in the order they were supplied. Zero-time
    /// samples are excluded; duplicate package names are not merged.
    pub per_app: Vec<UsageSample>,
}
