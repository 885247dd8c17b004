//! proj4-style coordinate reference system definitions.
//!
//! Only the two systems this viewer needs are recognised: WGS84 geographic
//! coordinates and WGS84 UTM zones. Anything else is rejected up front rather
//! than silently approximated.

use std::fmt;
use std::str::FromStr;

use thiserror::Error;

use super::{Hemisphere, ProjectionError, TransverseMercator, UtmZone, Vec2};

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CrsError {
    #[error("empty projection definition")]
    Empty,
    #[error("malformed parameter `{0}`")]
    Malformed(String),
    #[error("unsupported projection `{0}`")]
    UnsupportedProjection(String),
    #[error("unsupported datum or ellipsoid `{0}`")]
    UnsupportedDatum(String),
    #[error("unsupported units `{0}`")]
    UnsupportedUnits(String),
    #[error("unsupported parameter `{0}`")]
    UnsupportedParameter(String),
    #[error("utm definition has no +zone")]
    MissingZone,
    #[error("invalid utm zone `{0}`")]
    InvalidZone(String),
}

#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub enum Crs {
    /// WGS84 longitude/latitude in degrees.
    Geographic,
    /// WGS84 UTM zone, meters.
    Utm(UtmZone),
}

impl Crs {
    pub fn utm(zone: u8, hemisphere: Hemisphere) -> Result<Self, ProjectionError> {
        UtmZone::new(zone, hemisphere).map(Crs::Utm)
    }

    pub fn is_geographic(&self) -> bool {
        matches!(self, Crs::Geographic)
    }

    fn projection(&self) -> Option<TransverseMercator> {
        match self {
            Crs::Geographic => None,
            Crs::Utm(zone) => Some(zone.projection()),
        }
    }
}

impl FromStr for Crs {
    type Err = CrsError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        if s.is_empty() {
            return Err(CrsError::Empty);
        }
        if let Some(code) = s
            .strip_prefix("EPSG:")
            .or_else(|| s.strip_prefix("epsg:"))
        {
            return from_epsg(code);
        }

        let mut proj = None;
        let mut zone = None;
        let mut hemisphere = Hemisphere::North;

        for token in s.split_whitespace() {
            let Some(param) = token.strip_prefix('+') else {
                return Err(CrsError::Malformed(token.to_string()));
            };
            let (key, value) = match param.split_once('=') {
                Some((k, v)) => (k, Some(v)),
                None => (param, None),
            };
            match (key, value) {
                ("proj", Some(v)) => proj = Some(v),
                ("zone", Some(v)) => zone = Some(v),
                ("south", None) => hemisphere = Hemisphere::South,
                ("north", None) => hemisphere = Hemisphere::North,
                ("datum" | "ellps", Some(v)) => {
                    if !v.eq_ignore_ascii_case("WGS84") {
                        return Err(CrsError::UnsupportedDatum(v.to_string()));
                    }
                }
                ("units", Some(v)) => {
                    if v != "m" {
                        return Err(CrsError::UnsupportedUnits(v.to_string()));
                    }
                }
                ("towgs84", Some(v)) => {
                    let identity = v
                        .split(',')
                        .all(|c| c.trim().parse::<f64>().is_ok_and(|c| c == 0.0));
                    if !identity {
                        return Err(CrsError::UnsupportedDatum(format!("towgs84={v}")));
                    }
                }
                ("no_defs" | "wktext", None) | ("type", Some("crs")) => {}
                _ => return Err(CrsError::UnsupportedParameter(token.to_string())),
            }
        }

        match proj {
            Some("longlat" | "latlong" | "lonlat" | "latlon") => Ok(Crs::Geographic),
            Some("utm") => {
                let zone = zone.ok_or(CrsError::MissingZone)?;
                let number: u8 = zone
                    .parse()
                    .map_err(|_| CrsError::InvalidZone(zone.to_string()))?;
                UtmZone::new(number, hemisphere)
                    .map(Crs::Utm)
                    .map_err(|_| CrsError::InvalidZone(zone.to_string()))
            }
            Some(other) => Err(CrsError::UnsupportedProjection(other.to_string())),
            None => Err(CrsError::Malformed(s.to_string())),
        }
    }
}

fn from_epsg(code: &str) -> Result<Crs, CrsError> {
    let unsupported = || CrsError::UnsupportedProjection(format!("EPSG:{code}"));
    let n: u32 = code.parse().map_err(|_| unsupported())?;
    let (zone, hemisphere) = match n {
        4326 => return Ok(Crs::Geographic),
        32601..=32660 => (n - 32600, Hemisphere::North),
        32701..=32760 => (n - 32700, Hemisphere::South),
        _ => return Err(unsupported()),
    };
    let zone = u8::try_from(zone).map_err(|_| unsupported())?;
    UtmZone::new(zone, hemisphere)
        .map(Crs::Utm)
        .map_err(|_| unsupported())
}

impl fmt::Display for Crs {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Crs::Geographic => write!(f, "+proj=longlat +datum=WGS84 +no_defs"),
            Crs::Utm(zone) => {
                let south = match zone.hemisphere() {
                    Hemisphere::North => "",
                    Hemisphere::South => " +south",
                };
                write!(
                    f,
                    "+proj=utm +zone={}{south} +datum=WGS84 +units=m +no_defs",
                    zone.zone()
                )
            }
        }
    }
}

/// A stateless conversion between two [`Crs`] definitions.
///
/// Projection coefficients are computed once at construction.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct CoordinateTransform {
    source: Crs,
    target: Crs,
    source_projection: Option<TransverseMercator>,
    target_projection: Option<TransverseMercator>,
}

impl CoordinateTransform {
    pub fn new(source: Crs, target: Crs) -> Self {
        Self {
            source,
            target,
            source_projection: source.projection(),
            target_projection: target.projection(),
        }
    }

    pub fn source(&self) -> Crs {
        self.source
    }

    pub fn target(&self) -> Crs {
        self.target
    }

    pub fn transform(&self, point: Vec2) -> Result<Vec2, ProjectionError> {
        if !point.is_finite() {
            return Err(ProjectionError::NonFinite);
        }
        if self.source == self.target {
            return Ok(point);
        }
        let geographic = match &self.source_projection {
            Some(tm) => tm.inverse(point)?,
            None => point,
        };
        match &self.target_projection {
            Some(tm) => tm.forward(geographic),
            None => Ok(geographic),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::{CoordinateTransform, Crs, CrsError};
    use crate::math::{Hemisphere, ProjectionError, Vec2};

    fn assert_close(a: f64, b: f64, eps: f64) {
        let diff = (a - b).abs();
        assert!(diff <= eps, "expected {a} ~= {b} (diff {diff})");
    }

    #[test]
    fn parses_utm_south() {
        let crs: Crs = "+proj=utm +zone=17 +south +datum=WGS84 +units=m +no_defs"
            .parse()
            .unwrap();
        assert_eq!(crs, Crs::utm(17, Hemisphere::South).unwrap());
    }

    #[test]
    fn parses_longlat() {
        let crs: Crs = "+proj=longlat +datum=WGS84 +no_defs".parse().unwrap();
        assert!(crs.is_geographic());
        assert_eq!("EPSG:4326".parse::<Crs>().unwrap(), Crs::Geographic);
    }

    #[test]
    fn parses_epsg_utm_codes() {
        assert_eq!(
            "EPSG:32717".parse::<Crs>().unwrap(),
            Crs::utm(17, Hemisphere::South).unwrap()
        );
        assert_eq!(
            "EPSG:32630".parse::<Crs>().unwrap(),
            Crs::utm(30, Hemisphere::North).unwrap()
        );
        assert!(matches!(
            "EPSG:3857".parse::<Crs>(),
            Err(CrsError::UnsupportedProjection(_))
        ));
    }

    #[test]
    fn display_round_trips() {
        for crs in [Crs::Geographic, Crs::utm(17, Hemisphere::South).unwrap()] {
            assert_eq!(crs.to_string().parse::<Crs>().unwrap(), crs);
        }
    }

    #[test]
    fn rejects_unsupported_definitions() {
        assert_eq!("".parse::<Crs>(), Err(CrsError::Empty));
        assert_eq!(
            "+proj=utm +south".parse::<Crs>(),
            Err(CrsError::MissingZone)
        );
        assert_eq!(
            "+proj=utm +zone=99".parse::<Crs>(),
            Err(CrsError::InvalidZone("99".to_string()))
        );
        assert_eq!(
            "+proj=utm +zone=17 +ellps=intl".parse::<Crs>(),
            Err(CrsError::UnsupportedDatum("intl".to_string()))
        );
        assert_eq!(
            "+proj=utm +zone=17 +units=ft".parse::<Crs>(),
            Err(CrsError::UnsupportedUnits("ft".to_string()))
        );
        assert_eq!(
            "+proj=merc +datum=WGS84".parse::<Crs>(),
            Err(CrsError::UnsupportedProjection("merc".to_string()))
        );
        assert_eq!(
            "proj=utm".parse::<Crs>(),
            Err(CrsError::Malformed("proj=utm".to_string()))
        );
    }

    #[test]
    fn accepts_identity_towgs84() {
        let crs: Crs = "+proj=utm +zone=18 +south +ellps=WGS84 +towgs84=0,0,0,0,0,0,0"
            .parse()
            .unwrap();
        assert_eq!(crs, Crs::utm(18, Hemisphere::South).unwrap());
    }

    #[test]
    fn transform_utm_to_geographic() {
        let t = CoordinateTransform::new(Crs::utm(17, Hemisphere::South).unwrap(), Crs::Geographic);
        let geo = t.transform(Vec2::new(500_005.0, 9_600_005.0)).unwrap();
        assert_close(geo.x, -80.999_955, 5e-7);
        assert_close(geo.y, -3.618_832, 5e-7);
    }

    #[test]
    fn transform_round_trip() {
        let utm = Crs::utm(17, Hemisphere::South).unwrap();
        let to_geo = CoordinateTransform::new(utm, Crs::Geographic);
        let to_utm = CoordinateTransform::new(Crs::Geographic, utm);

        let original = Vec2::new(-80.2, -3.5);
        let back = to_geo
            .transform(to_utm.transform(original).unwrap())
            .unwrap();
        assert_close(back.x, original.x, 1e-9);
        assert_close(back.y, original.y, 1e-9);
    }

    #[test]
    fn identity_transform_passes_through() {
        let t = CoordinateTransform::new(Crs::Geographic, Crs::Geographic);
        assert_eq!(t.transform(Vec2::new(1.0, 2.0)), Ok(Vec2::new(1.0, 2.0)));
    }

    #[test]
    fn non_finite_is_rejected_before_transforming() {
        let t = CoordinateTransform::new(Crs::utm(17, Hemisphere::South).unwrap(), Crs::Geographic);
        assert_eq!(
            t.transform(Vec2::new(500_000.0, f64::NAN)),
            Err(ProjectionError::NonFinite)
        );
    }
}
