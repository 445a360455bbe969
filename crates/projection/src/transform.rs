//! The public projection type.
//!
//! [`Projection`] owns the parameter set, the derived constants and the
//! variant-specific constants. It is the only place where degrees are
//! converted to radians, longitudes are recentred on the central meridian,
//! and the earth radius, unit conversion and false origin are applied.

use crate::error::{ProjectionError, Result};
use crate::kind::{ProjectionKind, Variant};
use crate::math::{normalize_longitude, normalize_longitude_degrees, HALF_PI};
use crate::params::{initialize, DerivedConstants, ProjectionParams};
use geo_common::{BoundingBox, PointD};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Slack allowed on the latitude range check for values that are a rounding
/// error past a pole.
const LATITUDE_SLACK: f64 = 1e-12;

/// An initialized map projection. Immutable once constructed; use
/// [`Projection::with_params`] to derive a differently parameterized copy.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(try_from = "ProjectionDef", into = "ProjectionDef")]
pub struct Projection {
    kind: ProjectionKind,
    params: ProjectionParams,
    derived: DerivedConstants,
    variant: Variant,
}

/// Serialized form: the projection kind plus its parameters.
#[derive(Debug, Clone, Serialize, Deserialize)]
struct ProjectionDef {
    kind: ProjectionKind,
    #[serde(default)]
    params: ProjectionParams,
}

impl TryFrom<ProjectionDef> for Projection {
    type Error = ProjectionError;

    fn try_from(def: ProjectionDef) -> Result<Self> {
        Projection::new(def.kind, def.params)
    }
}

impl From<Projection> for ProjectionDef {
    fn from(p: Projection) -> Self {
        ProjectionDef {
            kind: p.kind,
            params: p.params,
        }
    }
}

impl Projection {
    /// Build and initialize a projection.
    pub fn new(kind: ProjectionKind, params: ProjectionParams) -> Result<Self> {
        let derived = initialize(&params);
        let variant = Variant::new(kind, &params, &derived)?;
        tracing::trace!(
            projection = kind.proj_name(),
            ellipsoid = %params.ellipsoid.name,
            spherical = derived.spherical,
            "Initialized projection"
        );
        Ok(Self {
            kind,
            params,
            derived,
            variant,
        })
    }

    /// Re-initialize with a new parameter set, keeping the projection kind.
    pub fn with_params(&self, params: ProjectionParams) -> Result<Self> {
        Self::new(self.kind, params)
    }

    pub fn kind(&self) -> ProjectionKind {
        self.kind
    }

    /// PROJ short name of the projection.
    pub fn name(&self) -> &'static str {
        self.kind.proj_name()
    }

    pub fn params(&self) -> &ProjectionParams {
        &self.params
    }

    pub fn derived(&self) -> &DerivedConstants {
        &self.derived
    }

    pub fn has_inverse(&self) -> bool {
        self.variant.core().has_inverse()
    }

    pub fn is_equal_area(&self) -> bool {
        self.variant.core().is_equal_area()
    }

    pub fn is_conformal(&self) -> bool {
        self.variant.core().is_conformal()
    }

    /// True for the lon/lat pass-through, whose output stays in degrees.
    pub fn is_geographic(&self) -> bool {
        self.variant.core().is_geographic()
    }

    /// Project a geographic coordinate in degrees to map coordinates.
    ///
    /// Geostationary points that the satellite cannot see come back as NaN.
    pub fn project(&self, lon: f64, lat: f64) -> Result<(f64, f64)> {
        if !lon.is_finite() || !lat.is_finite() {
            return Err(ProjectionError::invalid_value(format!(
                "non-finite coordinate ({}, {})",
                lon, lat
            )));
        }

        let phi = lat.to_radians();
        if phi.abs() > HALF_PI + LATITUDE_SLACK {
            return Err(ProjectionError::domain(
                self.name(),
                format!("latitude {} outside [-90, 90]", lat),
            ));
        }
        if self.is_geographic() {
            return Ok((normalize_longitude_degrees(lon)?, lat.clamp(-90.0, 90.0)));
        }
        let phi = phi.clamp(-HALF_PI, HALF_PI);

        let lam = normalize_longitude(lon.to_radians() - self.derived.lam0)?;
        let (x, y) = self.variant.core().forward(lam, phi)?;
        let d = &self.derived;
        Ok((
            x * d.total_scale + d.total_false_easting,
            y * d.total_scale + d.total_false_northing,
        ))
    }

    /// Inverse-project map coordinates back to (lon, lat) in degrees.
    ///
    /// Callers should check [`Projection::has_inverse`] first; projections
    /// without an inverse return [`ProjectionError::NoInverse`].
    pub fn project_inverse(&self, x: f64, y: f64) -> Result<(f64, f64)> {
        if !self.has_inverse() {
            return Err(ProjectionError::NoInverse(self.name()));
        }
        if !x.is_finite() || !y.is_finite() {
            return Err(ProjectionError::invalid_value(format!(
                "non-finite coordinate ({}, {})",
                x, y
            )));
        }

        if self.is_geographic() {
            return Ok((normalize_longitude_degrees(x)?, y));
        }

        let d = &self.derived;
        let (lam, phi) = self.variant.core().inverse(
            (x - d.total_false_easting) / d.total_scale,
            (y - d.total_false_northing) / d.total_scale,
        )?;
        if lam.is_nan() || phi.is_nan() {
            return Ok((f64::NAN, f64::NAN));
        }
        let lon = normalize_longitude(lam + d.lam0)?;
        Ok((lon.to_degrees(), phi.to_degrees()))
    }

    /// Project a slice of (lon, lat) points.
    pub fn project_points(&self, points: &[PointD]) -> Result<Vec<PointD>> {
        points
            .iter()
            .map(|p| self.project(p.x, p.y).map(PointD::from))
            .collect()
    }

    /// Projected extent of a geographic bounding box.
    ///
    /// Samples `samples + 1` points along each edge since projected edges
    /// are generally curved. Points that fail to project or are not visible
    /// are skipped; returns `None` when nothing along the edges projects.
    pub fn project_extent(&self, extent: &BoundingBox, samples: usize) -> Option<BoundingBox> {
        let samples = samples.max(1);
        let mut projected = Vec::with_capacity(4 * (samples + 1));
        let mut skipped = 0usize;

        for t in 0..=samples {
            let frac = t as f64 / samples as f64;
            let lon = extent.min_x + frac * extent.width();
            let lat = extent.min_y + frac * extent.height();

            let edges = [
                (lon, extent.max_y), // Top
                (lon, extent.min_y), // Bottom
                (extent.min_x, lat), // Left
                (extent.max_x, lat), // Right
            ];

            for (lon, lat) in edges {
                match self.project(lon, lat) {
                    Ok((x, y)) if x.is_finite() && y.is_finite() => {
                        projected.push(PointD::new(x, y))
                    }
                    _ => skipped += 1,
                }
            }
        }

        if skipped > 0 {
            tracing::debug!(
                projection = self.name(),
                skipped,
                "Extent samples outside projection domain"
            );
        }
        BoundingBox::from_points(&projected)
    }
}

impl PartialEq for Projection {
    /// Same kind, same ellipsoid (e² within tolerance) and identical values
    /// for every parameter that changes the output. Used to detect that no
    /// reprojection is needed.
    fn eq(&self, other: &Self) -> bool {
        self.kind == other.kind
            && self.params.ellipsoid == other.params.ellipsoid
            && self.params.scalars() == other.params.scalars()
            && self.params.true_scale_lat == other.params.true_scale_lat
            && self.params.sweep_x == other.params.sweep_x
    }
}

impl fmt::Display for Projection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_proj_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ellipsoid::Ellipsoid;

    #[test]
    fn test_central_cylindrical_unit_sphere() {
        let proj = Projection::new(
            ProjectionKind::CentralCylindrical,
            ProjectionParams::new(Ellipsoid::unit_sphere()),
        )
        .unwrap();
        let (x, y) = proj.project(0.0, 45.0).unwrap();
        assert!(x.abs() < 1e-15);
        assert!((y - 1.0).abs() < 1e-12);
    }

    #[test]
    fn test_false_origin_and_units() {
        let params = ProjectionParams::new(Ellipsoid::sphere())
            .with_false_origin(1000.0, 2000.0)
            .with_unit_conversion(0.001);
        let proj = Projection::new(ProjectionKind::Mercator, params).unwrap();
        let (x, y) = proj.project(0.0, 0.0).unwrap();
        assert!((x - 1.0).abs() < 1e-9);
        assert!((y - 2.0).abs() < 1e-9);
        let (lon, lat) = proj.project_inverse(x, y).unwrap();
        assert!(lon.abs() < 1e-9 && lat.abs() < 1e-9);
    }

    #[test]
    fn test_longitude_recentred_and_wrapped() {
        let params = ProjectionParams::new(Ellipsoid::unit_sphere()).with_center(170.0, 0.0);
        let proj = Projection::new(ProjectionKind::Equirectangular, params).unwrap();
        let (x, _) = proj.project(-170.0, 0.0).unwrap();
        assert!((x - 20f64.to_radians()).abs() < 1e-12);
    }

    #[test]
    fn test_latitude_out_of_range() {
        let proj = Projection::new(ProjectionKind::Miller, ProjectionParams::default()).unwrap();
        assert!(matches!(
            proj.project(0.0, 91.0),
            Err(ProjectionError::Domain { .. })
        ));
        assert!(matches!(
            proj.project(f64::NAN, 0.0),
            Err(ProjectionError::InvalidValue(_))
        ));
    }

    #[test]
    fn test_geographic_passthrough() {
        let proj = Projection::new(ProjectionKind::LongLat, ProjectionParams::default()).unwrap();
        assert!(proj.is_geographic());
        assert_eq!(proj.project(190.0, 10.0).unwrap(), (-170.0, 10.0));
    }

    #[test]
    fn test_serde_roundtrip() {
        let proj = Projection::new(ProjectionKind::LambertConformalConic, ProjectionParams::hrrr())
            .unwrap();
        let json = serde_json::to_string(&proj).unwrap();
        let back: Projection = serde_json::from_str(&json).unwrap();
        assert_eq!(proj, back);
    }
}
