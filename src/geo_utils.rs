const EARTH_RADIUS: f64 = 6_378_100.0; // unit: meter

/// Great-circle surface distance between two points in decimal degrees,
/// in meters. Spherical law of cosines over a sphere of `EARTH_RADIUS`;
/// no ellipsoid correction.
pub fn great_circle_distance(lat1: f64, lon1: f64, lat2: f64, lon2: f64) -> f64 {
    let phi1 = (90.0 - lat1).to_radians();
    let phi2 = (90.0 - lat2).to_radians();

    let theta1 = lon1.to_radians();
    let theta2 = lon2.to_radians();

    let cos = phi1.sin() * phi2.sin() * (theta1 - theta2).cos() + phi1.cos() * phi2.cos();
    // identical points can produce a cosine a hair above 1.0, which would
    // take acos out of its domain
    cos.clamp(-1.0, 1.0).acos() * EARTH_RADIUS
}
