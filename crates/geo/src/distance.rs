//! Great-circle distance

/// Calculate distance between two coordinates using Haversine formula
pub fn haversine_distance(lat1: f64, lon1: f64, lat2: f64, lon2: f64) -> f64 {
    const EARTH_RADIUS_KM: f64 = 6371.0;

    let lat1_rad = lat1.to_radians();
    let lat2_rad = lat2.to_radians();
    let delta_lat = (lat2 - lat1).to_radians();
    let delta_lon = (lon2 - lon1).to_radians();

    let a = (delta_lat / 2.0).sin().powi(2)
        + lat1_rad.cos() * lat2_rad.cos() * (delta_lon / 2.0).sin().powi(2);
    let c = 2.0 * a.sqrt().asin();

    EARTH_RADIUS_KM * c
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_zero_distance() {
        assert!(haversine_distance(48.8566, 2.3522, 48.8566, 2.3522) < 1e-9);
    }

    #[test]
    fn test_paris_to_lyon() {
        // Roughly 392 km as the crow flies
        let d = haversine_distance(48.8566, 2.3522, 45.7579, 4.8340);
        assert!((d - 392.0).abs() < 5.0, "got {d}");
    }

    #[test]
    fn test_symmetry() {
        let ab = haversine_distance(48.85, 2.35, 48.90, 2.40);
        let ba = haversine_distance(48.90, 2.40, 48.85, 2.35);
        assert!((ab - ba).abs() < 1e-9);
    }
}
