//! Geostationary satellite projection.
//!
//! This projection is used for GOES-R series satellite imagery.
//! The satellite views Earth from a fixed position above the equator,
//! and projected coordinates are scan angles from nadir multiplied by
//! the satellite height above the surface.
//!
//! Points that the satellite cannot see (beyond the limb, or scan angles
//! pointing into space) come back as NaN rather than an error, so that
//! whole full-disk rasters can be transformed without special casing.
//!
//! Reference: GOES-R Product Definition and Users' Guide (PUG) Volume 4

use crate::error::{ProjectionError, Result};
use crate::kind::ProjectionCore;
use crate::params::{DerivedConstants, ProjectionParams};

/// Geostationary projection constants, normalized to the equatorial radius.
#[derive(Debug, Clone, Copy)]
pub struct Geostationary {
    /// Perspective point height above the surface / a
    radius_g_1: f64,
    /// Distance from Earth center to the satellite / a
    radius_g: f64,
    /// radius_g² - 1
    c: f64,
    /// Polar radius / a
    radius_p: f64,
    radius_p2: f64,
    radius_p_inv2: f64,
    /// Sweep angle axis is x (GOES-R); y for Meteosat/Himawari
    flip_axis: bool,
    spherical: bool,
}

impl Geostationary {
    pub fn new(params: &ProjectionParams, derived: &DerivedConstants) -> Result<Self> {
        let h = params.height_of_orbit;
        if !(h.is_finite() && h > 0.0) {
            return Err(ProjectionError::invalid_parameter(
                "h",
                format!("satellite height must be positive, got {}", h),
            ));
        }
        let radius_g_1 = h / derived.a;
        let radius_g = 1.0 + radius_g_1;
        let (radius_p, radius_p2, radius_p_inv2) = if derived.spherical {
            (1.0, 1.0, 1.0)
        } else {
            (derived.one_es.sqrt(), derived.one_es, derived.rone_es)
        };
        Ok(Self {
            radius_g_1,
            radius_g,
            c: radius_g * radius_g - 1.0,
            radius_p,
            radius_p2,
            radius_p_inv2,
            flip_axis: params.sweep_x,
            spherical: derived.spherical,
        })
    }

    /// Convert a view vector from the satellite into scan angles.
    fn scan_angles(&self, vx: f64, vy: f64, vz: f64) -> (f64, f64) {
        let tmp = self.radius_g - vx;
        if self.flip_axis {
            (
                self.radius_g_1 * (vy / vz.hypot(tmp)).atan(),
                self.radius_g_1 * (vz / tmp).atan(),
            )
        } else {
            (
                self.radius_g_1 * (vy / tmp).atan(),
                self.radius_g_1 * (vz / vy.hypot(tmp)).atan(),
            )
        }
    }

    /// View vector pointing from the satellite towards scan angles (x, y).
    fn view_vector(&self, x: f64, y: f64) -> (f64, f64, f64) {
        if self.flip_axis {
            let vz = (y / self.radius_g_1).tan();
            let vy = (x / self.radius_g_1).tan() * (1.0 + vz * vz).sqrt();
            (-1.0, vy, vz)
        } else {
            let vy = (x / self.radius_g_1).tan();
            let vz = (y / self.radius_g_1).tan() * (1.0 + vy * vy).sqrt();
            (-1.0, vy, vz)
        }
    }
}

impl ProjectionCore for Geostationary {
    fn forward(&self, lam: f64, phi: f64) -> Result<(f64, f64)> {
        let (vx, vy, vz, inv2) = if self.spherical {
            let cosphi = phi.cos();
            (lam.cos() * cosphi, lam.sin() * cosphi, phi.sin(), 1.0)
        } else {
            // Geocentric latitude and radius of the surface point
            let phi = (self.radius_p2 * phi.tan()).atan();
            let (sinphi, cosphi) = phi.sin_cos();
            let r = self.radius_p / (self.radius_p * cosphi).hypot(sinphi);
            (
                r * lam.cos() * cosphi,
                r * lam.sin() * cosphi,
                r * sinphi,
                self.radius_p_inv2,
            )
        };

        // Behind the limb
        if (self.radius_g - vx) * vx - vy * vy - vz * vz * inv2 < 0.0 {
            return Ok((f64::NAN, f64::NAN));
        }
        Ok(self.scan_angles(vx, vy, vz))
    }

    fn inverse(&self, x: f64, y: f64) -> Result<(f64, f64)> {
        let (vx, vy, vz) = self.view_vector(x, y);
        let a = if self.spherical {
            vy * vy + vz * vz + vx * vx
        } else {
            let t = vz / self.radius_p;
            vy * vy + t * t + vx * vx
        };
        let b = 2.0 * self.radius_g * vx;
        let det = b * b - 4.0 * a * self.c;
        if det < 0.0 {
            // Scan angle points to space
            return Ok((f64::NAN, f64::NAN));
        }

        let k = (-b - det.sqrt()) / (2.0 * a);
        let vx = self.radius_g + k * vx;
        let vy = vy * k;
        let vz = vz * k;

        let lam = vy.atan2(vx);
        let phi = (vz * lam.cos() / vx).atan();
        let phi = if self.spherical {
            phi
        } else {
            (self.radius_p_inv2 * phi.tan()).atan()
        };
        Ok((lam, phi))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ellipsoid::Ellipsoid;
    use crate::params::initialize;

    fn goes_east() -> Geostationary {
        let params = ProjectionParams::goes_east();
        Geostationary::new(&params, &initialize(&params)).unwrap()
    }

    #[test]
    fn test_nadir_is_origin() {
        let proj = goes_east();
        let (x, y) = proj.forward(0.0, 0.0).unwrap();
        assert!(x.abs() < 1e-15 && y.abs() < 1e-15);
        let (lam, phi) = proj.inverse(0.0, 0.0).unwrap();
        assert!(lam.abs() < 1e-12 && phi.abs() < 1e-12);
    }

    #[test]
    fn test_far_side_is_nan() {
        let proj = goes_east();
        let (x, y) = proj.forward(std::f64::consts::PI * 0.75, 0.2).unwrap();
        assert!(x.is_nan() && y.is_nan());
    }

    #[test]
    fn test_space_scan_is_nan() {
        let proj = goes_east();
        // 0.2 rad of scan angle is well beyond the ~0.151 rad limb
        let (lam, phi) = proj.inverse(0.2 * proj.radius_g_1, 0.0).unwrap();
        assert!(lam.is_nan() && phi.is_nan());
    }

    #[test]
    fn test_visible_roundtrip_both_sweeps() {
        for sweep_x in [true, false] {
            for ellipsoid in [Ellipsoid::grs80(), Ellipsoid::sphere()] {
                let params = ProjectionParams::goes_east()
                    .with_ellipsoid(ellipsoid.clone())
                    .with_sweep_x(sweep_x);
                let proj = Geostationary::new(&params, &initialize(&params)).unwrap();
                let (x, y) = proj.forward(-0.35, 0.68).unwrap();
                let (lam, phi) = proj.inverse(x, y).unwrap();
                assert!((lam + 0.35).abs() < 1e-10, "lam {}", lam);
                assert!((phi - 0.68).abs() < 1e-10, "phi {}", phi);
            }
        }
    }

    #[test]
    fn test_non_positive_height_rejected() {
        let params = ProjectionParams::goes_east().with_height_of_orbit(0.0);
        assert!(Geostationary::new(&params, &initialize(&params)).is_err());
    }
}
