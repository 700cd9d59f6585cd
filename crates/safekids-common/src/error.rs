use thiserror::Error;
use uuid::Uuid;

pub type Result<T> = std::result::Result<T, StoreError>;

/// Rejections produced by zone validation. All are caller-correctable and
/// surfaced verbatim; none are retried internally.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ValidationError {
    #[error("Zone name must not be empty")]
    EmptyName,

    #[error("Unknown zone type '{0}', expected 'safe' or 'danger'")]
    InvalidType(String),

    #[error("Radius {0}m is outside the allowed range of {1}m to {2}m")]
    RadiusOutOfRange(u32, u32, u32),

    #[error("Coordinate ({latitude}, {longitude}) is outside valid Earth ranges")]
    InvalidCoordinate { latitude: f64, longitude: f64 },
}

/// Failures from geofence store operations.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum StoreError {
    #[error("Geofence {0} not found")]
    NotFound(Uuid),

    /// The caller holds a stale copy. Retryable: re-fetch the record and
    /// resubmit with the current version.
    #[error("Version conflict on geofence {id}: submitted {submitted}, current {current}")]
    VersionConflict { id: Uuid, submitted: u64, current: u64 },

    #[error("Invalid zone data: {0}")]
    Validation(#[from] ValidationError),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validation_error_display() {
        let err = ValidationError::RadiusOutOfRange(49, 50, 1000);
        assert_eq!(err.to_string(), "Radius 49m is outside the allowed range of 50m to 1000m");

        let err = ValidationError::InvalidType("warning".to_string());
        assert!(err.to_string().contains("'warning'"));
    }

    #[test]
    fn test_store_error_from_validation() {
        let err: StoreError = ValidationError::EmptyName.into();
        assert!(matches!(err, StoreError::Validation(ValidationError::EmptyName)));
    }

    #[test]
    fn test_version_conflict_display() {
        let id = Uuid::nil();
        let err = StoreError::VersionConflict { id, submitted: 2, current: 5 };
        assert!(err.to_string().contains("submitted 2"));
        assert!(err.to_string().contains("current 5"));
    }
}
