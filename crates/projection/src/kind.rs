//! The closed set of supported projections and their common capability trait.

use crate::albers::AlbersEqualArea;
use crate::azimuthal::{LambertAzimuthalEqualArea, Orthographic};
use crate::cylindrical::{CentralCylindrical, CylindricalEqualArea, Miller};
use crate::error::{ProjectionError, Result};
use crate::geographic::{Equirectangular, LongLat};
use crate::geostationary::Geostationary;
use crate::lambert::LambertConformal;
use crate::mercator::Mercator;
use crate::params::{DerivedConstants, ProjectionParams};
use crate::polar::Stereographic;
use crate::pseudo::{Mollweide, Sinusoidal};
use crate::transverse_mercator::TransverseMercator;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Core forward/inverse formulas in radians on the unit ellipsoid.
///
/// Implementations never see degrees, false origins or the earth radius;
/// [`crate::Projection`] applies those uniformly.
pub trait ProjectionCore {
    /// (λ, φ) relative to the central meridian → unscaled (x, y).
    fn forward(&self, lam: f64, phi: f64) -> Result<(f64, f64)>;

    /// Unscaled (x, y) → (λ, φ) relative to the central meridian.
    fn inverse(&self, x: f64, y: f64) -> Result<(f64, f64)>;

    fn has_inverse(&self) -> bool {
        true
    }

    fn is_equal_area(&self) -> bool {
        false
    }

    fn is_conformal(&self) -> bool {
        false
    }

    /// Geographic "projections" pass angles through untouched.
    fn is_geographic(&self) -> bool {
        false
    }
}

/// Projection family identifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ProjectionKind {
    LongLat,
    Equirectangular,
    CentralCylindrical,
    Mercator,
    Miller,
    CylindricalEqualArea,
    TransverseMercator,
    LambertConformalConic,
    AlbersEqualArea,
    Stereographic,
    Orthographic,
    LambertAzimuthalEqualArea,
    Sinusoidal,
    Mollweide,
    Geostationary,
}

impl ProjectionKind {
    pub const ALL: [ProjectionKind; 15] = [
        ProjectionKind::LongLat,
        ProjectionKind::Equirectangular,
        ProjectionKind::CentralCylindrical,
        ProjectionKind::Mercator,
        ProjectionKind::Miller,
        ProjectionKind::CylindricalEqualArea,
        ProjectionKind::TransverseMercator,
        ProjectionKind::LambertConformalConic,
        ProjectionKind::AlbersEqualArea,
        ProjectionKind::Stereographic,
        ProjectionKind::Orthographic,
        ProjectionKind::LambertAzimuthalEqualArea,
        ProjectionKind::Sinusoidal,
        ProjectionKind::Mollweide,
        ProjectionKind::Geostationary,
    ];

    /// PROJ short name (`+proj=` value).
    pub fn proj_name(&self) -> &'static str {
        match self {
            ProjectionKind::LongLat => "longlat",
            ProjectionKind::Equirectangular => "eqc",
            ProjectionKind::CentralCylindrical => "cc",
            ProjectionKind::Mercator => "merc",
            ProjectionKind::Miller => "mill",
            ProjectionKind::CylindricalEqualArea => "cea",
            ProjectionKind::TransverseMercator => "tmerc",
            ProjectionKind::LambertConformalConic => "lcc",
            ProjectionKind::AlbersEqualArea => "aea",
            ProjectionKind::Stereographic => "stere",
            ProjectionKind::Orthographic => "ortho",
            ProjectionKind::LambertAzimuthalEqualArea => "laea",
            ProjectionKind::Sinusoidal => "sinu",
            ProjectionKind::Mollweide => "moll",
            ProjectionKind::Geostationary => "geos",
        }
    }

    /// Parse a PROJ short name. `latlong`/`lonlat` alias `longlat`.
    pub fn from_proj_name(name: &str) -> Option<Self> {
        let name = name.to_ascii_lowercase();
        match name.as_str() {
            "latlong" | "lonlat" | "latlon" => Some(ProjectionKind::LongLat),
            "utm" => Some(ProjectionKind::TransverseMercator),
            _ => Self::ALL.iter().copied().find(|k| k.proj_name() == name),
        }
    }
}

impl fmt::Display for ProjectionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.proj_name())
    }
}

/// Tagged union over the concrete projection structs.
#[derive(Debug, Clone)]
pub(crate) enum Variant {
    LongLat(LongLat),
    Equirectangular(Equirectangular),
    CentralCylindrical(CentralCylindrical),
    Mercator(Mercator),
    Miller(Miller),
    CylindricalEqualArea(CylindricalEqualArea),
    TransverseMercator(TransverseMercator),
    LambertConformal(LambertConformal),
    AlbersEqualArea(AlbersEqualArea),
    Stereographic(Stereographic),
    Orthographic(Orthographic),
    LambertAzimuthalEqualArea(LambertAzimuthalEqualArea),
    Sinusoidal(Sinusoidal),
    Mollweide(Mollweide),
    Geostationary(Geostationary),
}

impl Variant {
    /// Compute the variant-specific constants.
    pub(crate) fn new(
        kind: ProjectionKind,
        params: &ProjectionParams,
        derived: &DerivedConstants,
    ) -> Result<Self> {
        if !(derived.a > 0.0) || !derived.a.is_finite() {
            return Err(ProjectionError::invalid_parameter(
                "a",
                "equatorial radius must be positive",
            ));
        }
        if !(0.0..1.0).contains(&derived.es) {
            return Err(ProjectionError::invalid_parameter(
                "es",
                "squared eccentricity must be in [0, 1)",
            ));
        }
        if !(params.scale_factor > 0.0) {
            return Err(ProjectionError::invalid_parameter(
                "k_0",
                "scale factor must be positive",
            ));
        }

        Ok(match kind {
            ProjectionKind::LongLat => Variant::LongLat(LongLat),
            ProjectionKind::Equirectangular => {
                Variant::Equirectangular(Equirectangular::new(params, derived)?)
            }
            ProjectionKind::CentralCylindrical => Variant::CentralCylindrical(CentralCylindrical),
            ProjectionKind::Mercator => Variant::Mercator(Mercator::new(params, derived)?),
            ProjectionKind::Miller => Variant::Miller(Miller),
            ProjectionKind::CylindricalEqualArea => {
                Variant::CylindricalEqualArea(CylindricalEqualArea::new(params, derived)?)
            }
            ProjectionKind::TransverseMercator => {
                Variant::TransverseMercator(TransverseMercator::new(params, derived))
            }
            ProjectionKind::LambertConformalConic => {
                Variant::LambertConformal(LambertConformal::new(params, derived)?)
            }
            ProjectionKind::AlbersEqualArea => {
                Variant::AlbersEqualArea(AlbersEqualArea::new(params, derived)?)
            }
            ProjectionKind::Stereographic => {
                Variant::Stereographic(Stereographic::new(params, derived))
            }
            ProjectionKind::Orthographic => Variant::Orthographic(Orthographic::new(derived)),
            ProjectionKind::LambertAzimuthalEqualArea => {
                Variant::LambertAzimuthalEqualArea(LambertAzimuthalEqualArea::new(derived))
            }
            ProjectionKind::Sinusoidal => Variant::Sinusoidal(Sinusoidal),
            ProjectionKind::Mollweide => Variant::Mollweide(Mollweide),
            ProjectionKind::Geostationary => {
                Variant::Geostationary(Geostationary::new(params, derived)?)
            }
        })
    }

    pub(crate) fn core(&self) -> &dyn ProjectionCore {
        match self {
            Variant::LongLat(p) => p,
            Variant::Equirectangular(p) => p,
            Variant::CentralCylindrical(p) => p,
            Variant::Mercator(p) => p,
            Variant::Miller(p) => p,
            Variant::CylindricalEqualArea(p) => p,
            Variant::TransverseMercator(p) => p,
            Variant::LambertConformal(p) => p,
            Variant::AlbersEqualArea(p) => p,
            Variant::Stereographic(p) => p,
            Variant::Orthographic(p) => p,
            Variant::LambertAzimuthalEqualArea(p) => p,
            Variant::Sinusoidal(p) => p,
            Variant::Mollweide(p) => p,
            Variant::Geostationary(p) => p,
        }
    }
}
