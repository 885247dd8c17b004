//! Transverse Mercator and UTM.
//!
//! Uses the Krüger series to sixth order in the third flattening (Karney 2011,
//! "Transverse Mercator with an accuracy of a few nanometers"). Within a UTM
//! zone the forward and inverse mappings agree to well below a millimeter.
//!
//! Geographic coordinates follow proj4 axis order: `x = longitude`,
//! `y = latitude`, both in degrees.

use thiserror::Error;

use super::{Vec2, WGS84_A, WGS84_F};

/// UTM central scale factor.
pub const UTM_SCALE_FACTOR: f64 = 0.9996;
/// UTM false easting (meters).
pub const UTM_FALSE_EASTING: f64 = 500_000.0;
/// UTM false northing for southern-hemisphere zones (meters).
pub const UTM_FALSE_NORTHING_SOUTH: f64 = 10_000_000.0;

const NEWTON_MAX_ITERATIONS: usize = 10;
const NEWTON_TOLERANCE: f64 = 1e-14;

#[derive(Debug, Copy, Clone, PartialEq, Error)]
pub enum ProjectionError {
    #[error("coordinate is not finite")]
    NonFinite,
    #[error("latitude {0} is outside [-90, 90] degrees")]
    LatitudeOutOfRange(f64),
    #[error("utm zone {0} is outside 1..=60")]
    InvalidZone(u8),
}

#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub enum Hemisphere {
    North,
    South,
}

#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub struct UtmZone {
    zone: u8,
    hemisphere: Hemisphere,
}

impl UtmZone {
    pub fn new(zone: u8, hemisphere: Hemisphere) -> Result<Self, ProjectionError> {
        if !(1..=60).contains(&zone) {
            return Err(ProjectionError::InvalidZone(zone));
        }
        Ok(Self { zone, hemisphere })
    }

    pub fn zone(&self) -> u8 {
        self.zone
    }

    pub fn hemisphere(&self) -> Hemisphere {
        self.hemisphere
    }

    pub fn central_meridian_deg(&self) -> f64 {
        f64::from(self.zone) * 6.0 - 183.0
    }

    pub fn projection(&self) -> TransverseMercator {
        let false_northing = match self.hemisphere {
            Hemisphere::North => 0.0,
            Hemisphere::South => UTM_FALSE_NORTHING_SOUTH,
        };
        TransverseMercator::wgs84(
            self.central_meridian_deg(),
            UTM_SCALE_FACTOR,
            UTM_FALSE_EASTING,
            false_northing,
        )
    }
}

/// Ellipsoidal Transverse Mercator projection.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct TransverseMercator {
    central_meridian_deg: f64,
    false_easting: f64,
    false_northing: f64,
    /// First eccentricity.
    e: f64,
    /// `k0 * A`, the scaled rectifying radius.
    k0_a: f64,
    alpha: [f64; 6],
    beta: [f64; 6],
}

impl TransverseMercator {
    pub fn wgs84(
        central_meridian_deg: f64,
        scale_factor: f64,
        false_easting: f64,
        false_northing: f64,
    ) -> Self {
        Self::new(
            WGS84_A,
            WGS84_F,
            central_meridian_deg,
            scale_factor,
            false_easting,
            false_northing,
        )
    }

    pub fn new(
        semi_major_axis: f64,
        flattening: f64,
        central_meridian_deg: f64,
        scale_factor: f64,
        false_easting: f64,
        false_northing: f64,
    ) -> Self {
        let n = flattening / (2.0 - flattening);
        let n2 = n * n;
        let n3 = n2 * n;
        let n4 = n3 * n;
        let n5 = n4 * n;
        let n6 = n5 * n;

        let rectifying_radius =
            semi_major_axis / (1.0 + n) * (1.0 + n2 / 4.0 + n4 / 64.0 + n6 / 256.0);

        #[rustfmt::skip]
        let alpha = [
            n / 2.0 - 2.0 * n2 / 3.0 + 5.0 * n3 / 16.0 + 41.0 * n4 / 180.0
                - 127.0 * n5 / 288.0 + 7891.0 * n6 / 37800.0,
            13.0 * n2 / 48.0 - 3.0 * n3 / 5.0 + 557.0 * n4 / 1440.0
                + 281.0 * n5 / 630.0 - 1983433.0 * n6 / 1935360.0,
            61.0 * n3 / 240.0 - 103.0 * n4 / 140.0 + 15061.0 * n5 / 26880.0
                + 167603.0 * n6 / 181440.0,
            49561.0 * n4 / 161280.0 - 179.0 * n5 / 168.0 + 6601661.0 * n6 / 7257600.0,
            34729.0 * n5 / 80640.0 - 3418889.0 * n6 / 1995840.0,
            212378941.0 * n6 / 319334400.0,
        ];

        #[rustfmt::skip]
        let beta = [
            n / 2.0 - 2.0 * n2 / 3.0 + 37.0 * n3 / 96.0 - n4 / 360.0
                - 81.0 * n5 / 512.0 + 96199.0 * n6 / 604800.0,
            n2 / 48.0 + n3 / 15.0 - 437.0 * n4 / 1440.0 + 46.0 * n5 / 105.0
                - 1118711.0 * n6 / 3870720.0,
            17.0 * n3 / 480.0 - 37.0 * n4 / 840.0 - 209.0 * n5 / 4480.0
                + 5569.0 * n6 / 90720.0,
            4397.0 * n4 / 161280.0 - 11.0 * n5 / 504.0 - 830251.0 * n6 / 7257600.0,
            4583.0 * n5 / 161280.0 - 108847.0 * n6 / 3991680.0,
            20648693.0 * n6 / 638668800.0,
        ];

        Self {
            central_meridian_deg,
            false_easting,
            false_northing,
            e: (flattening * (2.0 - flattening)).sqrt(),
            k0_a: scale_factor * rectifying_radius,
            alpha,
            beta,
        }
    }

    pub fn central_meridian_deg(&self) -> f64 {
        self.central_meridian_deg
    }

    /// Geographic `(lon, lat)` degrees to projected `(easting, northing)` meters.
    pub fn forward(&self, geographic: Vec2) -> Result<Vec2, ProjectionError> {
        if !geographic.is_finite() {
            return Err(ProjectionError::NonFinite);
        }
        if geographic.y.abs() > 90.0 {
            return Err(ProjectionError::LatitudeOutOfRange(geographic.y));
        }

        let phi = geographic.y.to_radians();
        let lambda = wrap_lon_deg(geographic.x - self.central_meridian_deg).to_radians();

        let sin_phi = phi.sin();
        let t = (sin_phi.atanh() - self.e * (self.e * sin_phi).atanh()).sinh();
        let xi_p = t.atan2(lambda.cos());
        let eta_p = (lambda.sin() / (1.0 + t * t).sqrt()).atanh();

        let mut xi = xi_p;
        let mut eta = eta_p;
        for (j, a) in self.alpha.iter().enumerate() {
            let k = 2.0 * (j + 1) as f64;
            xi += a * (k * xi_p).sin() * (k * eta_p).cosh();
            eta += a * (k * xi_p).cos() * (k * eta_p).sinh();
        }

        Ok(Vec2::new(
            self.false_easting + self.k0_a * eta,
            self.false_northing + self.k0_a * xi,
        ))
    }

    /// Projected `(easting, northing)` meters to geographic `(lon, lat)` degrees.
    pub fn inverse(&self, projected: Vec2) -> Result<Vec2, ProjectionError> {
        if !projected.is_finite() {
            return Err(ProjectionError::NonFinite);
        }

        let xi = (projected.y - self.false_northing) / self.k0_a;
        let eta = (projected.x - self.false_easting) / self.k0_a;

        let mut xi_p = xi;
        let mut eta_p = eta;
        for (j, b) in self.beta.iter().enumerate() {
            let k = 2.0 * (j + 1) as f64;
            xi_p -= b * (k * xi).sin() * (k * eta).cosh();
            eta_p -= b * (k * xi).cos() * (k * eta).sinh();
        }

        let sinh_eta_p = eta_p.sinh();
        let cos_xi_p = xi_p.cos();
        let tau_p = xi_p.sin() / (sinh_eta_p * sinh_eta_p + cos_xi_p * cos_xi_p).sqrt();
        let lambda = sinh_eta_p.atan2(cos_xi_p);

        let tau = self.conformal_to_geodetic_tan(tau_p);
        let lat = tau.atan().to_degrees();
        let lon = wrap_lon_deg(self.central_meridian_deg + lambda.to_degrees());

        Ok(Vec2::new(lon, lat))
    }

    /// Solves `tau' = f(tau)` for the tangent of geodetic latitude by Newton's method.
    fn conformal_to_geodetic_tan(&self, tau_p: f64) -> f64 {
        let e2 = self.e * self.e;
        let mut tau = tau_p;
        for _ in 0..NEWTON_MAX_ITERATIONS {
            let sqrt_1_tau2 = (1.0 + tau * tau).sqrt();
            let sigma = (self.e * (self.e * tau / sqrt_1_tau2).atanh()).sinh();
            let tau_i = tau * (1.0 + sigma * sigma).sqrt() - sigma * sqrt_1_tau2;
            let d_tau = (tau_p - tau_i) / (1.0 + tau_i * tau_i).sqrt() * (1.0 + (1.0 - e2) * tau * tau)
                / ((1.0 - e2) * sqrt_1_tau2);
            tau += d_tau;
            if d_tau.abs() <= NEWTON_TOLERANCE * tau.abs().max(1.0) {
                break;
            }
        }
        tau
    }
}

/// Wraps a longitude into `[-180, 180)` degrees.
pub fn wrap_lon_deg(lon: f64) -> f64 {
    (lon + 180.0).rem_euclid(360.0) - 180.0
}
