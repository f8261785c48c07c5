//! Great-circle distances and local ground-plane offsets
//!
//! Distances use the haversine formula on a sphere of radius
//! [`EARTH_RADIUS_M`]. Local offsets are built from two orthogonal
//! distances, one along each axis, with the sign taken from which
//! coordinate is larger.

use crate::core::{GeoCoordinate, LocalOffset, EARTH_RADIUS_M, HIDDEN_PLACE_DISTANCE};

/// Great-circle distance between two coordinates (meters, never negative)
pub fn haversine_distance_m(src: &GeoCoordinate, dest: &GeoCoordinate) -> f64 {
    let d_lon = (dest.longitude - src.longitude).to_radians();
    let d_lat = (dest.latitude - src.latitude).to_radians();

    let a = (d_lat / 2.0).sin().powi(2)
        + src.latitude.to_radians().cos()
            * dest.latitude.to_radians().cos()
            * (d_lon / 2.0).sin().powi(2);
    let angle = 2.0 * a.sqrt().atan2((1.0 - a).sqrt());

    angle * EARTH_RADIUS_M
}

/// Distance to a placed entity.
///
/// With `min_distance > 0`, anything nearer than `min_distance` is reported
/// at [`HIDDEN_PLACE_DISTANCE`] so the renderer drops it.
pub fn place_distance_m(src: &GeoCoordinate, dest: &GeoCoordinate, min_distance: f64) -> f64 {
    let distance = haversine_distance_m(src, dest);

    if min_distance > 0.0 && distance < min_distance {
        return HIDDEN_PLACE_DISTANCE;
    }

    distance
}

/// Offset of `current` relative to `origin` on the ground plane
pub fn local_offset(origin: &GeoCoordinate, current: &GeoCoordinate) -> LocalOffset {
    signed_offset(origin, current, haversine_distance_m)
}

/// Offset of a place relative to the camera, honouring the hiding cutoff
pub fn place_offset(camera: &GeoCoordinate, place: &GeoCoordinate, min_distance: f64) -> LocalOffset {
    signed_offset(camera, place, |a, b| place_distance_m(a, b, min_distance))
}

fn signed_offset<F>(from: &GeoCoordinate, to: &GeoCoordinate, distance: F) -> LocalOffset
where
    F: Fn(&GeoCoordinate, &GeoCoordinate) -> f64,
{
    // East-west: hold latitude, move longitude
    let mut x = distance(from, &from.at_longitude(to.longitude));
    if to.longitude <= from.longitude {
        x = -x;
    }

    // North-south: hold longitude, move latitude; north is -z
    let mut z = distance(from, &from.at_latitude(to.latitude));
    if to.latitude > from.latitude {
        z = -z;
    }

    LocalOffset::new(x, z)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn within_percent(value: f64, expected: f64, percent: f64) -> bool {
        (value - expected).abs() <= expected.abs() * percent / 100.0
    }

    #[test]
    fn test_distance_to_self_is_zero() {
        let points = [
            GeoCoordinate::new(0.0, 0.0),
            GeoCoordinate::new(51.5007, -0.1246),
            GeoCoordinate::new(-33.8568, 151.2153),
            GeoCoordinate::new(89.9, 179.9),
        ];

        for p in &points {
            assert_eq!(haversine_distance_m(p, p), 0.0);
        }
    }

    #[test]
    fn test_distance_is_symmetric() {
        let a = GeoCoordinate::new(45.4642, 9.1900);
        let b = GeoCoordinate::new(45.4700, 9.2000);

        let ab = haversine_distance_m(&a, &b);
        let ba = haversine_distance_m(&b, &a);

        assert!(ab > 0.0);
        assert!((ab - ba).abs() < 1e-9);
    }

    #[test]
    fn test_one_millidegree_at_equator() {
        let a = GeoCoordinate::new(0.0, 0.0);
        let b = GeoCoordinate::new(0.0, 0.001);

        // 6378160 * 0.001 * pi / 180
        assert!(within_percent(haversine_distance_m(&a, &b), 111.3, 1.0));
    }

    #[test]
    fn test_place_distance_without_cutoff_matches_haversine() {
        let a = GeoCoordinate::new(10.0, 10.0);
        let b = GeoCoordinate::new(10.0005, 10.0003);

        assert_eq!(place_distance_m(&a, &b, 0.0), haversine_distance_m(&a, &b));
    }

    #[test]
    fn test_place_distance_hides_near_places() {
        let a = GeoCoordinate::new(10.0, 10.0);
        let near = GeoCoordinate::new(10.0001, 10.0);
        let far = GeoCoordinate::new(10.01, 10.0);

        assert_eq!(place_distance_m(&a, &near, 50.0), HIDDEN_PLACE_DISTANCE);
        assert_eq!(place_distance_m(&a, &far, 50.0), haversine_distance_m(&a, &far));
    }

    #[test]
    fn test_offset_east_is_positive_x() {
        let origin = GeoCoordinate::new(0.0, 0.0);
        let current = GeoCoordinate::new(0.0, 0.001);

        let offset = local_offset(&origin, &current);

        assert!(offset.x > 0.0);
        assert!(within_percent(offset.x, 111.3, 1.0));
        assert!(offset.z.abs() < 1e-9);
    }

    #[test]
    fn test_offset_south_is_positive_z() {
        let origin = GeoCoordinate::new(10.0, 10.0);
        let current = GeoCoordinate::new(9.999, 10.0);

        let offset = local_offset(&origin, &current);

        assert!(offset.z > 0.0);
        assert!(within_percent(offset.z, 111.3, 1.0));
        assert!(offset.x.abs() < 1e-9);
    }

    #[test]
    fn test_offset_north_west_signs() {
        let origin = GeoCoordinate::new(10.0, 10.0);
        let current = GeoCoordinate::new(10.001, 9.999);

        let offset = local_offset(&origin, &current);

        assert!(offset.x < 0.0);
        assert!(offset.z < 0.0);
    }

    #[test]
    fn test_place_offset_near_place_is_pushed_away() {
        let camera = GeoCoordinate::new(10.0, 10.0);
        let place = GeoCoordinate::new(9.9999, 10.0001);

        let offset = place_offset(&camera, &place, 100.0);

        assert_eq!(offset.x, HIDDEN_PLACE_DISTANCE);
        assert_eq!(offset.z, HIDDEN_PLACE_DISTANCE);
    }
}
