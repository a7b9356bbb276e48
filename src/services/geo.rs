//! Geographic calculations

use crate::types::{Coordinates, Distance};

/// Earth radius in kilometers
const EARTH_RADIUS_KM: f64 = 6371.0;

/// Calculate Haversine distance between two points in kilometers
pub fn haversine_distance(from: &Coordinates, to: &Coordinates) -> f64 {
    let d_lat = (to.lat - from.lat).to_radians();
    let d_lon = (to.lng - from.lng).to_radians();

    let lat1 = from.lat.to_radians();
    let lat2 = to.lat.to_radians();

    let a = (d_lat / 2.0).sin().powi(2)
        + lat1.cos() * lat2.cos() * (d_lon / 2.0).sin().powi(2);

    let c = 2.0 * a.sqrt().asin();

    EARTH_RADIUS_KM * c
}

/// Straight-line distance between two points
pub fn distance_between(from: &Coordinates, to: &Coordinates) -> Distance {
    Distance::from_kilometers(haversine_distance(from, to))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_haversine_charlotte_raleigh() {
        let charlotte = Coordinates { lat: 35.2271, lng: -80.8431 };
        let raleigh = Coordinates { lat: 35.7796, lng: -78.6382 };

        let distance = haversine_distance(&charlotte, &raleigh);

        // Charlotte to Raleigh is approximately 209 km
        assert!((distance - 209.0).abs() < 5.0);
    }

    #[test]
    fn test_haversine_same_point() {
        let point = Coordinates { lat: 35.0, lng: -80.0 };
        let distance = haversine_distance(&point, &point);
        assert!((distance - 0.0).abs() < 0.001);
    }

    #[test]
    fn test_distance_between_in_miles() {
        let charlotte = Coordinates { lat: 35.2271, lng: -80.8431 };
        let raleigh = Coordinates { lat: 35.7796, lng: -78.6382 };

        let distance = distance_between(&charlotte, &raleigh);

        assert!((distance.miles() - 130.0).abs() < 4.0);
    }
}
