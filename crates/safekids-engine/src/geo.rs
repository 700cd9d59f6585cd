// Containment Evaluation Module
//
// Great-circle distance between a reported location and a geofence center.
// The haversine form stays numerically stable near the poles and across
// the antimeridian; longitude wraparound is absorbed by the trigonometric
// terms rather than naive degree subtraction.

use safekids_common::types::{GeoPoint, Geofence};

/// Mean Earth radius in meters.
const EARTH_RADIUS_METERS: f64 = 6_371_000.0;

/// Great-circle distance between two points in meters, haversine formula.
pub fn distance_meters(a: GeoPoint, b: GeoPoint) -> f64 {
    let lat_a = a.latitude.to_radians();
    let lat_b = b.latitude.to_radians();
    let d_lat = (b.latitude - a.latitude).to_radians();
    let d_lon = (b.longitude - a.longitude).to_radians();

    let h = (d_lat / 2.0).sin().powi(2)
        + lat_a.cos() * lat_b.cos() * (d_lon / 2.0).sin().powi(2);
    let c = 2.0 * h.sqrt().asin();

    EARTH_RADIUS_METERS * c
}

/// Whether `point` lies within the geofence. A point exactly on the
/// radius counts as inside.
pub fn contains(geofence: &Geofence, point: GeoPoint) -> bool {
    distance_meters(geofence.center, point) <= f64::from(geofence.radius_meters)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use safekids_common::types::ZoneType;
    use std::collections::BTreeSet;
    use uuid::Uuid;

    // One degree of latitude spans ~111,195 m on a 6,371 km sphere.
    const METERS_PER_DEGREE_LAT: f64 = EARTH_RADIUS_METERS * std::f64::consts::PI / 180.0;

    fn fence_at(center: GeoPoint, radius_meters: u32) -> Geofence {
        Geofence {
            id: Uuid::new_v4(),
            name: "Test".to_string(),
            zone_type: ZoneType::Safe,
            center,
            radius_meters,
            linked_children: BTreeSet::new(),
            created_at: Utc::now(),
            updated_at: Utc::now(),
            version: 1,
        }
    }

    /// Point offset north of `origin` by the given distance in meters.
    fn north_of(origin: GeoPoint, meters: f64) -> GeoPoint {
        GeoPoint::new(origin.latitude + meters / METERS_PER_DEGREE_LAT, origin.longitude)
    }

    #[test]
    fn test_zero_distance() {
        let p = GeoPoint::new(10.776, 106.7);
        assert_eq!(distance_meters(p, p), 0.0);
    }

    #[test]
    fn test_known_distance_along_meridian() {
        // 0.1 degree of latitude is ~11,119.5 m on the mean sphere.
        let a = GeoPoint::new(0.0, 0.0);
        let b = GeoPoint::new(0.1, 0.0);
        let d = distance_meters(a, b);
        assert!((d - 11_119.5).abs() < 1.0, "got {}", d);
    }

    #[test]
    fn test_distance_is_symmetric() {
        let a = GeoPoint::new(10.776, 106.7);
        let b = GeoPoint::new(10.8, 106.65);
        assert!((distance_meters(a, b) - distance_meters(b, a)).abs() < 1e-9);
    }

    #[test]
    fn test_antimeridian_wraparound() {
        // 0.2 degrees of longitude apart across the 180 meridian, not
        // nearly-all-the-way around the globe.
        let a = GeoPoint::new(0.0, 179.9);
        let b = GeoPoint::new(0.0, -179.9);
        let d = distance_meters(a, b);
        assert!((d - 0.2 * METERS_PER_DEGREE_LAT).abs() < 1.0, "got {}", d);
    }

    #[test]
    fn test_near_pole_stability() {
        let a = GeoPoint::new(89.99, 0.0);
        let b = GeoPoint::new(89.99, 180.0);
        let d = distance_meters(a, b);
        // Two points 0.01 degrees off the pole on opposite meridians are
        // ~0.02 degrees apart through the pole.
        assert!(d.is_finite());
        assert!((d - 0.02 * METERS_PER_DEGREE_LAT).abs() < 5.0, "got {}", d);
    }

    #[test]
    fn test_point_on_radius_is_inside() {
        let center = GeoPoint::new(10.0, 106.0);
        let fence = fence_at(center, 500);
        // Within the spec's 1 m float tolerance of the boundary.
        assert!(contains(&fence, north_of(center, 499.5)));
        assert!(!contains(&fence, north_of(center, 501.5)));
    }

    #[test]
    fn test_center_is_inside() {
        let center = GeoPoint::new(-33.86, 151.2);
        let fence = fence_at(center, 50);
        assert!(contains(&fence, center));
    }

    #[test]
    fn test_far_point_is_outside() {
        let fence = fence_at(GeoPoint::new(10.776, 106.7), 1000);
        assert!(!contains(&fence, GeoPoint::new(21.03, 105.85)));
    }
}
