//! Lambert Conformal Conic projection.
//!
//! This projection is commonly used for weather data including HRRR and NAM.
//! It maps a cone tangent or secant to the Earth's surface onto a flat plane.
//!
//! The projection parameters include:
//! - Latitude of origin (lat_0)
//! - Central meridian (lon_0, LoV in GRIB2)
//! - Standard parallel(s): lat_1 and lat_2 (equal for a tangent cone)

use crate::error::{ProjectionError, Result};
use crate::kind::ProjectionCore;
use crate::math::{msfn, phi2, tsfn, EPS10, HALF_PI, QUARTER_PI};
use crate::params::{DerivedConstants, ProjectionParams};

/// Lambert Conformal Conic constants.
#[derive(Debug, Clone, Copy)]
pub struct LambertConformal {
    /// Cone constant
    n: f64,
    /// Scaled F constant
    c: f64,
    /// Rho at the latitude of origin
    rho0: f64,
    k0: f64,
    e: f64,
    spherical: bool,
}

impl LambertConformal {
    pub fn new(params: &ProjectionParams, derived: &DerivedConstants) -> Result<Self> {
        let phi1 = params.standard_parallel1.to_radians();
        let phi2 = params.standard_parallel2.to_radians();
        let phi0 = derived.phi0;

        if (phi1 + phi2).abs() < EPS10 {
            return Err(ProjectionError::invalid_parameter(
                "lat_1",
                "standard parallels must not be symmetric about the equator",
            ));
        }

        let sinphi = phi1.sin();
        let cosphi = phi1.cos();
        let secant = (phi1 - phi2).abs() >= EPS10;
        let mut n = sinphi;

        let (c, rho0) = if derived.spherical {
            if secant {
                // Secant cone (two standard parallels)
                n = (cosphi / phi2.cos()).ln()
                    / ((QUARTER_PI + 0.5 * phi2).tan() / (QUARTER_PI + 0.5 * phi1).tan()).ln();
            }
            let c = cosphi * (QUARTER_PI + 0.5 * phi1).tan().powf(n) / n;
            let rho0 = if ((phi0.abs()) - HALF_PI).abs() < EPS10 {
                0.0
            } else {
                c * (QUARTER_PI + 0.5 * phi0).tan().powf(-n)
            };
            (c, rho0)
        } else {
            let e = derived.e;
            let m1 = msfn(sinphi, cosphi, derived.es);
            let ml1 = tsfn(phi1, sinphi, e);
            if secant {
                let sinphi2 = phi2.sin();
                n = (m1 / msfn(sinphi2, phi2.cos(), derived.es)).ln();
                n /= (ml1 / tsfn(phi2, sinphi2, e)).ln();
            }
            let c = m1 * ml1.powf(-n) / n;
            let rho0 = if ((phi0.abs()) - HALF_PI).abs() < EPS10 {
                0.0
            } else {
                c * tsfn(phi0, phi0.sin(), e).powf(n)
            };
            (c, rho0)
        };

        if !n.is_finite() || n == 0.0 {
            return Err(ProjectionError::invalid_parameter(
                "lat_1",
                "standard parallels give a degenerate cone",
            ));
        }

        Ok(Self {
            n,
            c,
            rho0,
            k0: params.scale_factor,
            e: derived.e,
            spherical: derived.spherical,
        })
    }

    /// Cone constant n.
    pub fn cone_constant(&self) -> f64 {
        self.n
    }
}

impl ProjectionCore for LambertConformal {
    fn forward(&self, lam: f64, phi: f64) -> Result<(f64, f64)> {
        let rho = if (phi.abs() - HALF_PI).abs() < EPS10 {
            if phi * self.n <= 0.0 {
                return Err(ProjectionError::domain("lcc", "opposite pole is at infinity"));
            }
            0.0
        } else if self.spherical {
            self.c * (QUARTER_PI + 0.5 * phi).tan().powf(-self.n)
        } else {
            self.c * tsfn(phi, phi.sin(), self.e).powf(self.n)
        };
        let theta = lam * self.n;
        Ok((
            self.k0 * rho * theta.sin(),
            self.k0 * (self.rho0 - rho * theta.cos()),
        ))
    }

    fn inverse(&self, x: f64, y: f64) -> Result<(f64, f64)> {
        let mut x = x / self.k0;
        let mut y = self.rho0 - y / self.k0;
        let mut rho = x.hypot(y);
        if rho == 0.0 {
            return Ok((0.0, HALF_PI.copysign(self.n)));
        }
        if self.n < 0.0 {
            rho = -rho;
            x = -x;
            y = -y;
        }
        let phi = if self.spherical {
            2.0 * (self.c / rho).powf(1.0 / self.n).atan() - HALF_PI
        } else {
            phi2((rho / self.c).powf(1.0 / self.n), self.e, "lcc")?
        };
        Ok((x.atan2(y) / self.n, phi))
    }

    fn is_conformal(&self) -> bool {
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ellipsoid::Ellipsoid;
    use crate::params::initialize;

    #[test]
    fn test_tangent_cone_constant() {
        let params = ProjectionParams::hrrr();
        let lcc = LambertConformal::new(&params, &initialize(&params)).unwrap();
        assert!((lcc.cone_constant() - 38.5f64.to_radians().sin()).abs() < 1e-12);
    }

    #[test]
    fn test_symmetric_parallels_rejected() {
        let params = ProjectionParams::new(Ellipsoid::sphere()).with_standard_parallels(30.0, -30.0);
        assert!(LambertConformal::new(&params, &initialize(&params)).is_err());
    }

    #[test]
    fn test_origin_maps_to_zero() {
        let params = ProjectionParams::new(Ellipsoid::wgs84())
            .with_center(-96.0, 23.0)
            .with_standard_parallels(29.5, 45.5);
        let d = initialize(&params);
        let lcc = LambertConformal::new(&params, &d).unwrap();
        let (x, y) = lcc.forward(0.0, d.phi0).unwrap();
        assert!(x.abs() < 1e-12);
        assert!(y.abs() < 1e-12);
    }
}
