//! Geodesy utilities.
//!
//! Great-circle distance and coarse bounding-box math. The bounding box is
//! an approximation (degrees-per-km at the given latitude) and is only
//! suitable for pre-filtering, not exact zone geometry.

/// Earth's mean radius in metres.
const EARTH_RADIUS_M: f64 = 6_371_000.0;

/// Earth's mean radius in kilometres.
const EARTH_RADIUS_KM: f64 = 6_371.0;

/// Great-circle (haversine) distance between two points, in metres,
/// truncated to an integer.
///
/// # Examples
///
/// ```
/// use area_scout::geo::distance_meters;
///
/// // King's Cross to St Pancras is a couple of hundred metres.
/// let d = distance_meters(51.5308, -0.1238, 51.5310, -0.1263);
/// assert!(d > 100 && d < 300);
/// ```
pub fn distance_meters(lat1: f64, lng1: f64, lat2: f64, lng2: f64) -> u32 {
    (haversine(lat1, lng1, lat2, lng2) * EARTH_RADIUS_M) as u32
}

/// Great-circle distance in kilometres.
pub fn distance_km(lat1: f64, lng1: f64, lat2: f64, lng2: f64) -> f64 {
    haversine(lat1, lng1, lat2, lng2) * EARTH_RADIUS_KM
}

/// Great-circle distance in kilometres, rounded to one decimal place.
///
/// Used for station ranking, where sub-100m precision is noise.
pub fn distance_km_rounded(lat1: f64, lng1: f64, lat2: f64, lng2: f64) -> f64 {
    (distance_km(lat1, lng1, lat2, lng2) * 10.0).round() / 10.0
}

/// Central angle between two points, in radians.
fn haversine(lat1: f64, lng1: f64, lat2: f64, lng2: f64) -> f64 {
    let (lat1, lng1) = (lat1.to_radians(), lng1.to_radians());
    let (lat2, lng2) = (lat2.to_radians(), lng2.to_radians());

    let dlat = lat2 - lat1;
    let dlng = lng2 - lng1;

    let a = (dlat / 2.0).sin().powi(2) + lat1.cos() * lat2.cos() * (dlng / 2.0).sin().powi(2);
    2.0 * a.sqrt().atan2((1.0 - a).sqrt())
}

/// A latitude/longitude bounding box.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BoundingBox {
    pub north: f64,
    pub south: f64,
    pub east: f64,
    pub west: f64,
}

/// Bounding box around a point with the given radius in kilometres.
///
/// Uses the flat-earth approximation of one degree of latitude per 111 km,
/// scaling longitude by `cos(lat)`. Good enough for coarse search queries.
pub fn bounding_box(lat: f64, lng: f64, radius_km: f64) -> BoundingBox {
    let lat_delta = radius_km / 111.0;
    let lng_delta = radius_km / (111.0 * lat.to_radians().cos().abs());

    BoundingBox {
        north: lat + lat_delta,
        south: lat - lat_delta,
        east: lng + lng_delta,
        west: lng - lng_delta,
    }
}
