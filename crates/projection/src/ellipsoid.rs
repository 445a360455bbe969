//! Reference ellipsoids.

use serde::{Deserialize, Serialize};

/// Tolerance used when comparing the squared eccentricity of two ellipsoids.
pub const ECCENTRICITY2_TOLERANCE: f64 = 1e-7;

/// An oblate ellipsoid described by its equatorial radius and squared eccentricity.
///
/// A sphere is an ellipsoid with `eccentricity2 == 0`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Ellipsoid {
    /// Short name as used in PROJ strings (`WGS84`, `sphere`, ...)
    pub name: String,
    /// Equatorial radius (meters)
    pub equator_radius: f64,
    /// Squared eccentricity e²
    pub eccentricity2: f64,
}

impl Ellipsoid {
    /// Build from an equatorial radius and squared eccentricity.
    pub fn new(name: impl Into<String>, equator_radius: f64, eccentricity2: f64) -> Self {
        Self {
            name: name.into(),
            equator_radius,
            eccentricity2,
        }
    }

    /// Build from equatorial and polar radii.
    pub fn from_radii(name: impl Into<String>, equator_radius: f64, pole_radius: f64) -> Self {
        let ratio = pole_radius / equator_radius;
        Self::new(name, equator_radius, 1.0 - ratio * ratio)
    }

    /// Build from equatorial radius and inverse flattening (0 means sphere).
    pub fn from_inverse_flattening(
        name: impl Into<String>,
        equator_radius: f64,
        inverse_flattening: f64,
    ) -> Self {
        if inverse_flattening == 0.0 {
            return Self::new(name, equator_radius, 0.0);
        }
        let f = 1.0 / inverse_flattening;
        Self::new(name, equator_radius, f * (2.0 - f))
    }

    /// Authalic sphere used when no ellipsoid is given.
    pub fn sphere() -> Self {
        Self::new("sphere", 6_371_008.771_415, 0.0)
    }

    /// Sphere of radius 1, convenient for testing the raw formulas.
    pub fn unit_sphere() -> Self {
        Self::new("unit", 1.0, 0.0)
    }

    pub fn wgs84() -> Self {
        Self::from_inverse_flattening("WGS84", 6_378_137.0, 298.257_223_563)
    }

    pub fn grs80() -> Self {
        Self::from_inverse_flattening("GRS80", 6_378_137.0, 298.257_222_101)
    }

    pub fn clarke1866() -> Self {
        Self::from_radii("clrk66", 6_378_206.4, 6_356_583.8)
    }

    pub fn international() -> Self {
        Self::from_inverse_flattening("intl", 6_378_388.0, 297.0)
    }

    /// Look up a named ellipsoid as written in PROJ strings.
    pub fn by_name(name: &str) -> Option<Self> {
        match name.to_ascii_lowercase().as_str() {
            "wgs84" => Some(Self::wgs84()),
            "grs80" => Some(Self::grs80()),
            "clrk66" | "clarke1866" => Some(Self::clarke1866()),
            "intl" | "international" => Some(Self::international()),
            "sphere" => Some(Self::sphere()),
            _ => None,
        }
    }

    /// First eccentricity e.
    pub fn eccentricity(&self) -> f64 {
        self.eccentricity2.sqrt()
    }

    /// Polar radius b.
    pub fn pole_radius(&self) -> f64 {
        self.equator_radius * (1.0 - self.eccentricity2).sqrt()
    }

    pub fn is_sphere(&self) -> bool {
        self.eccentricity2 == 0.0
    }

    /// Same equatorial radius and e² within `e2_tolerance`.
    pub fn is_equal(&self, other: &Ellipsoid, e2_tolerance: f64) -> bool {
        self.equator_radius == other.equator_radius
            && (self.eccentricity2 - other.eccentricity2).abs() <= e2_tolerance
    }
}

impl Default for Ellipsoid {
    fn default() -> Self {
        Self::wgs84()
    }
}

impl PartialEq for Ellipsoid {
    fn eq(&self, other: &Self) -> bool {
        self.is_equal(other, ECCENTRICITY2_TOLERANCE)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_wgs84_constants() {
        let e = Ellipsoid::wgs84();
        assert!((e.eccentricity2 - 0.006_694_379_990_14).abs() < 1e-12);
        assert!((e.pole_radius() - 6_356_752.314_245).abs() < 1e-3);
    }

    #[test]
    fn test_equality_tolerance() {
        let a = Ellipsoid::wgs84();
        let mut b = Ellipsoid::grs80();
        // WGS84 and GRS80 differ only in the 11th digit of e²
        assert_eq!(a, b);
        b.equator_radius += 1.0;
        assert_ne!(a, b);
    }

    #[test]
    fn test_by_name() {
        assert!(Ellipsoid::by_name("WGS84").is_some());
        assert!(Ellipsoid::by_name("sphere").unwrap().is_sphere());
        assert!(Ellipsoid::by_name("nope").is_none());
    }
}
