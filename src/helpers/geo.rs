const EARTH_RADIUS_METERS: f64 = 6_371_000.0;

/// Average walking pace used for travel time estimates.
pub const WALKING_METERS_PER_MINUTE: u32 = 80;

/// Great-circle distance between two points using the haversine formula,
/// rounded to the nearest meter. Inputs are not range checked.
pub fn distance_meters(lat1: f64, lon1: f64, lat2: f64, lon2: f64) -> u32 {
    let phi1 = lat1.to_radians();
    let phi2 = lat2.to_radians();
    let delta_phi = (lat2 - lat1).to_radians();
    let delta_lambda = (lon2 - lon1).to_radians();

    let a = (delta_phi / 2.0).sin().powi(2)
        + phi1.cos() * phi2.cos() * (delta_lambda / 2.0).sin().powi(2);
    let c = 2.0 * a.sqrt().atan2((1.0 - a).sqrt());

    (EARTH_RADIUS_METERS * c).round() as u32
}

pub fn travel_minutes(distance_meters: u32) -> u32 {
    distance_meters.div_ceil(WALKING_METERS_PER_MINUTE)
}

#[cfg(test)]
mod tests {
    use super::*;

    const TOKYO_STATION: (f64, f64) = (35.681236, 139.767125);
    const YURAKUCHO: (f64, f64) = (35.675069, 139.763328);

    #[test]
    fn test_distance_to_self_is_zero() {
        let (lat, lng) = TOKYO_STATION;
        assert_eq!(distance_meters(lat, lng, lat, lng), 0);
        assert_eq!(distance_meters(-33.86, 151.2, -33.86, 151.2), 0);
    }

    #[test]
    fn test_distance_is_symmetric() {
        let pairs = [
            (TOKYO_STATION, YURAKUCHO),
            ((1.3521, 103.8198), (1.2903, 103.8520)),
            ((51.5007, -0.1246), (48.8584, 2.2945)),
            ((0.0, 179.9), (0.0, -179.9)),
        ];
        for ((lat1, lng1), (lat2, lng2)) in pairs {
            assert_eq!(
                distance_meters(lat1, lng1, lat2, lng2),
                distance_meters(lat2, lng2, lat1, lng1),
            );
        }
    }

    #[test]
    fn test_distance_known_values() {
        let (lat1, lng1) = TOKYO_STATION;
        let (lat2, lng2) = YURAKUCHO;
        let d = distance_meters(lat1, lng1, lat2, lng2);
        assert!((740..=780).contains(&d), "unexpected distance {}", d);

        // One degree of latitude is roughly 111.2 km
        let degree = distance_meters(0.0, 0.0, 1.0, 0.0);
        assert!((111_100..=111_300).contains(&degree), "unexpected distance {}", degree);
    }

    #[test]
    fn test_travel_minutes_rounds_up() {
        assert_eq!(travel_minutes(0), 0);
        assert_eq!(travel_minutes(1), 1);
        assert_eq!(travel_minutes(80), 1);
        assert_eq!(travel_minutes(81), 2);
        assert_eq!(travel_minutes(800), 10);
    }
}
