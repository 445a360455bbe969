//! Simple cylindrical projections: central cylindrical, Miller, equal-area.

use crate::error::{ProjectionError, Result};
use crate::kind::ProjectionCore;
use crate::math::{authlat, authset, qsfn, EPS10, HALF_PI, QUARTER_PI};
use crate::params::{DerivedConstants, ProjectionParams};

/// Central (gnomonic) cylindrical. Singular at both poles.
#[derive(Debug, Clone, Copy)]
pub struct CentralCylindrical;

impl ProjectionCore for CentralCylindrical {
    fn forward(&self, lam: f64, phi: f64) -> Result<(f64, f64)> {
        if (phi.abs() - HALF_PI).abs() <= EPS10 {
            return Err(ProjectionError::domain(
                "cc",
                format!("tangent is infinite at latitude {}", phi.to_degrees()),
            ));
        }
        Ok((lam, phi.tan()))
    }

    fn inverse(&self, x: f64, y: f64) -> Result<(f64, f64)> {
        Ok((x, y.atan()))
    }
}

/// Miller cylindrical.
#[derive(Debug, Clone, Copy)]
pub struct Miller;

impl ProjectionCore for Miller {
    fn forward(&self, lam: f64, phi: f64) -> Result<(f64, f64)> {
        Ok((lam, (QUARTER_PI + phi * 0.4).tan().ln() * 1.25))
    }

    fn inverse(&self, x: f64, y: f64) -> Result<(f64, f64)> {
        Ok((x, 2.5 * ((0.8 * y).exp().atan() - QUARTER_PI)))
    }
}

/// Lambert cylindrical equal-area, optionally true to scale at `lat_ts`.
#[derive(Debug, Clone)]
pub struct CylindricalEqualArea {
    k0: f64,
    e: f64,
    one_es: f64,
    /// q at the pole, ellipsoid only
    qp: f64,
    apa: [f64; 3],
    spherical: bool,
}

impl CylindricalEqualArea {
    pub fn new(params: &ProjectionParams, derived: &DerivedConstants) -> Result<Self> {
        let mut k0 = params.scale_factor;
        if let Some(lat_ts) = params.true_scale_lat {
            let t = lat_ts.to_radians();
            k0 = t.cos();
            if k0 < 0.0 || !(t.abs() < HALF_PI) {
                return Err(ProjectionError::invalid_parameter(
                    "lat_ts",
                    "true scale latitude must be inside (-90, 90)",
                ));
            }
            if !derived.spherical {
                let s = t.sin();
                k0 /= (1.0 - derived.es * s * s).sqrt();
            }
        }
        let (qp, apa) = if derived.spherical {
            (2.0, [0.0; 3])
        } else {
            (qsfn(1.0, derived.e, derived.one_es), authset(derived.es))
        };
        Ok(Self {
            k0,
            e: derived.e,
            one_es: derived.one_es,
            qp,
            apa,
            spherical: derived.spherical,
        })
    }
}

impl ProjectionCore for CylindricalEqualArea {
    fn forward(&self, lam: f64, phi: f64) -> Result<(f64, f64)> {
        let y = if self.spherical {
            phi.sin() / self.k0
        } else {
            0.5 * qsfn(phi.sin(), self.e, self.one_es) / self.k0
        };
        Ok((self.k0 * lam, y))
    }

    fn inverse(&self, x: f64, y: f64) -> Result<(f64, f64)> {
        let lam = x / self.k0;
        if self.spherical {
            let t = (y * self.k0).abs();
            if t - EPS10 > 1.0 {
                return Err(ProjectionError::domain("cea", "y outside the map"));
            }
            let phi = if t >= 1.0 {
                HALF_PI.copysign(y)
            } else {
                (y * self.k0).asin()
            };
            return Ok((lam, phi));
        }
        let sin_beta = 2.0 * y * self.k0 / self.qp;
        if sin_beta.abs() - EPS10 > 1.0 {
            return Err(ProjectionError::domain("cea", "y outside the map"));
        }
        Ok((lam, authlat(sin_beta.clamp(-1.0, 1.0).asin(), &self.apa)))
    }

    fn is_equal_area(&self) -> bool {
        true
    }
}
