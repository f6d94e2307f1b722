//! Geographic helpers: geohash encoding for the upstream proximity query and
//! great-circle distance for the distance sort.

/// A latitude/longitude pair in degrees.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct GeoPoint {
    pub latitude: f64,
    pub longitude: f64,
}

const BASE32: &[u8] = b"0123456789bcdefghjkmnpqrstuvwxyz";

/// Geohash character count sent as the `geoPoint` query parameter.
pub const GEOHASH_PRECISION: usize = 9;

/// Encodes a coordinate as a geohash of `precision` characters.
#[must_use]
pub fn geohash(point: GeoPoint, precision: usize) -> String {
    let (mut lat_lo, mut lat_hi) = (-90.0_f64, 90.0_f64);
    let (mut lon_lo, mut lon_hi) = (-180.0_f64, 180.0_f64);
    let mut even_bit = true;
    let mut bits = 0;
    let mut index = 0_usize;
    let mut hash = String::with_capacity(precision);

    while hash.len() < precision {
        let (value, lo, hi) = if even_bit {
            (point.longitude, &mut lon_lo, &mut lon_hi)
        } else {
            (point.latitude, &mut lat_lo, &mut lat_hi)
        };
        let mid = (*lo + *hi) / 2.0;
        if value >= mid {
            index = (index << 1) | 1;
            *lo = mid;
        } else {
            index <<= 1;
            *hi = mid;
        }
        even_bit = !even_bit;
        bits += 1;
        if bits == 5 {
            hash.push(BASE32[index] as char);
            bits = 0;
            index = 0;
        }
    }
    hash
}

/// Great-circle distance between two points in meters, by the haversine
/// formula.
#[must_use]
pub fn haversine(a: GeoPoint, b: GeoPoint) -> f64 {
    const EARTH_RADIUS_M: f64 = 6_371_000.0;

    let phi_a = a.latitude.to_radians();
    let phi_b = b.latitude.to_radians();
    let d_phi = (b.latitude - a.latitude).to_radians();
    let d_lambda = (b.longitude - a.longitude).to_radians();

    let h = (d_phi / 2.0).sin().powi(2) + phi_a.cos() * phi_b.cos() * (d_lambda / 2.0).sin().powi(2);
    2.0 * EARTH_RADIUS_M * h.sqrt().asin()
}
