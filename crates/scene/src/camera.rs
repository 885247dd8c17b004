use foundation::math::{Ecef, Geodetic, geodetic_to_ecef};
use serde::Serialize;

/// Default camera heading (degrees, clockwise from north).
pub const DEFAULT_HEADING_DEG: f64 = 0.0;
/// Default camera pitch (degrees, negative looks down).
pub const DEFAULT_PITCH_DEG: f64 = -20.0;

/// Where the camera should end up, in WGS84 degrees and meters.
#[derive(Debug, Copy, Clone, PartialEq, Serialize)]
pub struct GeographicTarget {
    pub longitude_deg: f64,
    pub latitude_deg: f64,
    pub height_m: f64,
}

impl GeographicTarget {
    pub fn new(longitude_deg: f64, latitude_deg: f64, height_m: f64) -> Self {
        Self {
            longitude_deg,
            latitude_deg,
            height_m,
        }
    }

    pub fn to_ecef(&self) -> Ecef {
        geodetic_to_ecef(Geodetic::new(
            self.longitude_deg,
            self.latitude_deg,
            self.height_m,
        ))
    }
}

#[derive(Debug, Copy, Clone, PartialEq, Serialize)]
pub struct CameraOrientation {
    pub heading_rad: f64,
    pub pitch_rad: f64,
    pub roll_rad: f64,
}

impl CameraOrientation {
    pub fn from_degrees(heading_deg: f64, pitch_deg: f64) -> Self {
        Self {
            heading_rad: heading_deg.to_radians(),
            pitch_rad: pitch_deg.to_radians(),
            roll_rad: 0.0,
        }
    }
}

impl Default for CameraOrientation {
    fn default() -> Self {
        Self::from_degrees(DEFAULT_HEADING_DEG, DEFAULT_PITCH_DEG)
    }
}

/// Camera framing command handed to the 3D engine.
#[derive(Debug, Copy, Clone, PartialEq, Serialize)]
pub struct FlyTo {
    pub target: GeographicTarget,
    /// `target` as an Earth-centered Cartesian position.
    pub destination: Ecef,
    pub orientation: CameraOrientation,
}

impl FlyTo {
    pub fn new(target: GeographicTarget, orientation: CameraOrientation) -> Self {
        Self {
            target,
            destination: target.to_ecef(),
            orientation,
        }
    }
}

/// The engine camera, owned by the application root.
///
/// Commands are fire-and-forget; a newer command overrides any animation in
/// progress.
pub trait CameraSink {
    fn fly_to(&mut self, command: &FlyTo);
}

#[cfg(test)]
impl CameraSink for Vec<FlyTo> {
    fn fly_to(&mut self, command: &FlyTo) {
        self.push(*command);
    }
}

#[cfg(test)]
mod tests {
    use super::{CameraOrientation, FlyTo, GeographicTarget};
    use foundation::math::{WGS84_A, WGS84_B};

    fn assert_close(a: f64, b: f64, eps: f64) {
        let diff = (a - b).abs();
        assert!(diff <= eps, "expected {a} ~= {b} (diff {diff})");
    }

    #[test]
    fn default_orientation_looks_down_twenty_degrees() {
        let o = CameraOrientation::default();
        assert_eq!(o.heading_rad, 0.0);
        assert_close(o.pitch_rad, -std::f64::consts::PI / 9.0, 1e-15);
        assert_eq!(o.roll_rad, 0.0);
    }

    #[test]
    fn destination_is_target_in_ecef() {
        let target = GeographicTarget::new(0.0, 0.0, 115.0);
        let cmd = FlyTo::new(target, CameraOrientation::default());
        assert_close(cmd.destination.x, WGS84_A + 115.0, 1e-6);
        assert_close(cmd.destination.y, 0.0, 1e-6);
        assert_close(cmd.destination.z, 0.0, 1e-6);
    }

    #[test]
    fn destination_keeps_longitude_and_hemisphere() {
        let target = GeographicTarget::new(-80.999_955, -3.618_832, 115.0);
        let d = FlyTo::new(target, CameraOrientation::default()).destination;
        assert_close(d.y.atan2(d.x).to_degrees(), -80.999_955, 1e-12);
        assert!(d.z < 0.0);
        let radius = (d.x * d.x + d.y * d.y + d.z * d.z).sqrt();
        assert!(radius > WGS84_B && radius < WGS84_A + 115.0, "{radius}");
    }
}
