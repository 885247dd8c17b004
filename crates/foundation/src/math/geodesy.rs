//! WGS84 ellipsoid and conversions between geodetic and Earth-centered
//! coordinates.

use super::Ecef;

/// WGS84 semi-major axis (meters).
pub const WGS84_A: f64 = 6_378_137.0;
/// WGS84 flattening.
pub const WGS84_F: f64 = 1.0 / 298.257_223_563;
/// WGS84 semi-minor axis (meters).
pub const WGS84_B: f64 = WGS84_A * (1.0 - WGS84_F);
/// WGS84 first eccentricity squared.
pub const WGS84_E2: f64 = WGS84_F * (2.0 - WGS84_F);

/// Longitude/latitude in degrees, height above the ellipsoid in meters.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct Geodetic {
    pub lon_deg: f64,
    pub lat_deg: f64,
    pub height_m: f64,
}

impl Geodetic {
    pub fn new(lon_deg: f64, lat_deg: f64, height_m: f64) -> Self {
        Self {
            lon_deg,
            lat_deg,
            height_m,
        }
    }
}

/// Prime vertical radius of curvature at `sin(lat)`.
fn prime_vertical_radius(sin_lat: f64) -> f64 {
    WGS84_A / (1.0 - WGS84_E2 * sin_lat * sin_lat).sqrt()
}

/// Same result as Cesium's `Cartesian3.fromDegrees` on the WGS84 ellipsoid.
pub fn geodetic_to_ecef(geo: Geodetic) -> Ecef {
    let (sin_lat, cos_lat) = geo.lat_deg.to_radians().sin_cos();
    let (sin_lon, cos_lon) = geo.lon_deg.to_radians().sin_cos();

    let n = prime_vertical_radius(sin_lat);
    let horizontal = (n + geo.height_m) * cos_lat;
    Ecef::new(
        horizontal * cos_lon,
        horizontal * sin_lon,
        (n * (1.0 - WGS84_E2) + geo.height_m) * sin_lat,
    )
}

#[cfg(test)]
mod tests {
    use super::{
        Ecef, Geodetic, WGS84_A, WGS84_B, WGS84_E2, geodetic_to_ecef, prime_vertical_radius,
    };

    fn assert_close(a: f64, b: f64, eps: f64) {
        let diff = (a - b).abs();
        assert!(diff <= eps, "expected {a} ~= {b} (diff {diff})");
    }

    /// Iterative inverse, used to check the forward formula.
    fn ecef_to_geodetic(ecef: Ecef) -> Geodetic {
        let lon = ecef.y.atan2(ecef.x);
        let p = ecef.x.hypot(ecef.y);

        if p < 1e-9 {
            let lat = if ecef.z >= 0.0 { 90.0 } else { -90.0 };
            return Geodetic::new(lon.to_degrees(), lat, ecef.z.abs() - WGS84_B);
        }

        let mut lat = ecef.z.atan2(p * (1.0 - WGS84_E2));
        for _ in 0..16 {
            let n = prime_vertical_radius(lat.sin());
            let next = (ecef.z + WGS84_E2 * n * lat.sin()).atan2(p);
            let settled = (next - lat).abs() < 1e-15;
            lat = next;
            if settled {
                break;
            }
        }

        let (sin_lat, cos_lat) = lat.sin_cos();
        let n = prime_vertical_radius(sin_lat);
        // Height from the better-conditioned component.
        let height = if cos_lat.abs() > sin_lat.abs() {
            p / cos_lat - n
        } else {
            ecef.z / sin_lat - n * (1.0 - WGS84_E2)
        };

        Geodetic::new(lon.to_degrees(), lat.to_degrees(), height)
    }

    #[test]
    fn equator_on_prime_meridian() {
        let ecef = geodetic_to_ecef(Geodetic::new(0.0, 0.0, 0.0));
        assert_close(ecef.x, WGS84_A, 1e-6);
        assert_close(ecef.y, 0.0, 1e-6);
        assert_close(ecef.z, 0.0, 1e-6);
    }

    #[test]
    fn equator_at_90_east() {
        let ecef = geodetic_to_ecef(Geodetic::new(90.0, 0.0, 0.0));
        assert_close(ecef.x, 0.0, 1e-6);
        assert_close(ecef.y, WGS84_A, 1e-6);
    }

    #[test]
    fn south_pole_sits_on_minor_axis() {
        let ecef = geodetic_to_ecef(Geodetic::new(0.0, -90.0, 0.0));
        assert_close(ecef.x, 0.0, 1e-6);
        assert_close(ecef.z, -WGS84_B, 1e-6);

        let back = ecef_to_geodetic(ecef);
        assert_eq!(back.lat_deg, -90.0);
        assert_close(back.height_m, 0.0, 1e-6);
    }

    #[test]
    fn height_adds_along_the_normal_at_equator() {
        let ecef = geodetic_to_ecef(Geodetic::new(0.0, 0.0, 115.0));
        assert_close(ecef.x, WGS84_A + 115.0, 1e-6);
    }

    #[test]
    fn round_trips_through_ecef() {
        for geo in [
            Geodetic::new(-80.999_955, -3.618_832, 115.0),
            Geodetic::new(-60.0, 30.0, 120.0),
            Geodetic::new(179.5, 85.0, 2_000.0),
            Geodetic::new(10.0, -45.0, -50.0),
        ] {
            let back = ecef_to_geodetic(geodetic_to_ecef(geo));
            assert_close(back.lon_deg, geo.lon_deg, 1e-10);
            assert_close(back.lat_deg, geo.lat_deg, 1e-10);
            assert_close(back.height_m, geo.height_m, 1e-6);
        }
    }
}
