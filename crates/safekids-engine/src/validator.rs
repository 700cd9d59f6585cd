// Zone Validation Module
//
// Pure validation of geofence creation and update input. The store only
// accepts values that passed through here, so bounds checked once at the
// edge hold for every persisted record.

use safekids_common::error::ValidationError;
use safekids_common::types::{GeoPoint, ValidatedZone, ZoneInput, ZoneType};

/// Smallest radius a parent can configure, in meters.
pub const MIN_RADIUS_METERS: u32 = 50;
/// Largest radius a parent can configure, in meters.
pub const MAX_RADIUS_METERS: u32 = 1000;

/// Validate a raw creation request into a [`ValidatedZone`].
///
/// Pure function of its input; checks run in field order and the first
/// failure is returned.
pub fn validate(input: &ZoneInput) -> Result<ValidatedZone, ValidationError> {
    let name = validate_name(&input.name)?;
    let zone_type = parse_zone_type(&input.zone_type)?;
    let radius_meters = validate_radius(input.radius_meters)?;
    let center = validate_center(GeoPoint::new(input.latitude, input.longitude))?;

    Ok(ValidatedZone {
        name,
        zone_type,
        center,
        radius_meters,
        linked_children: input.linked_children.iter().copied().collect(),
    })
}

/// A zone name must contain at least one non-whitespace character.
/// Returns the trimmed form actually stored.
pub fn validate_name(name: &str) -> Result<String, ValidationError> {
    let trimmed = name.trim();
    if trimmed.is_empty() {
        return Err(ValidationError::EmptyName);
    }
    Ok(trimmed.to_string())
}

/// Accepts exactly `safe` or `danger`, case-insensitively.
pub fn parse_zone_type(raw: &str) -> Result<ZoneType, ValidationError> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "safe" => Ok(ZoneType::Safe),
        "danger" => Ok(ZoneType::Danger),
        _ => Err(ValidationError::InvalidType(raw.to_string())),
    }
}

pub fn validate_radius(radius_meters: u32) -> Result<u32, ValidationError> {
    if !(MIN_RADIUS_METERS..=MAX_RADIUS_METERS).contains(&radius_meters) {
        return Err(ValidationError::RadiusOutOfRange(
            radius_meters,
            MIN_RADIUS_METERS,
            MAX_RADIUS_METERS,
        ));
    }
    Ok(radius_meters)
}

/// Latitude must lie in [-90, 90] and longitude in [-180, 180]; the
/// boundary values themselves are valid. NaN fails both comparisons.
pub fn validate_center(center: GeoPoint) -> Result<GeoPoint, ValidationError> {
    let lat_ok = (-90.0..=90.0).contains(&center.latitude);
    let lon_ok = (-180.0..=180.0).contains(&center.longitude);
    if !lat_ok || !lon_ok {
        return Err(ValidationError::InvalidCoordinate {
            latitude: center.latitude,
            longitude: center.longitude,
        });
    }
    Ok(center)
}
