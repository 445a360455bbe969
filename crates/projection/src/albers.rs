//! Albers Equal-Area Conic projection.

use crate::error::{ProjectionError, Result};
use crate::kind::ProjectionCore;
use crate::math::{msfn, phi1_albers, qsfn, EPS10, HALF_PI};
use crate::params::{DerivedConstants, ProjectionParams};

const TOL7: f64 = 1e-7;

#[derive(Debug, Clone, Copy)]
pub struct AlbersEqualArea {
    n: f64,
    /// 2n, used on the sphere only
    n2: f64,
    c: f64,
    dd: f64,
    rho0: f64,
    /// q at the pole, used on the ellipsoid only
    ec: f64,
    e: f64,
    one_es: f64,
    spherical: bool,
}

impl AlbersEqualArea {
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
        let (e, one_es) = (derived.e, derived.one_es);

        let aea = if derived.spherical {
            if secant {
                n = 0.5 * (n + phi2.sin());
            }
            let n2 = n + n;
            let c = cosphi * cosphi + n2 * sinphi;
            let dd = 1.0 / n;
            Self {
                n,
                n2,
                c,
                dd,
                rho0: dd * (c - n2 * phi0.sin()).sqrt(),
                ec: 0.0,
                e,
                one_es,
                spherical: true,
            }
        } else {
            let m1 = msfn(sinphi, cosphi, derived.es);
            let ml1 = qsfn(sinphi, e, one_es);
            if secant {
                let sinphi2 = phi2.sin();
                let m2 = msfn(sinphi2, phi2.cos(), derived.es);
                let ml2 = qsfn(sinphi2, e, one_es);
                if ml2 == ml1 {
                    return Err(ProjectionError::invalid_parameter(
                        "lat_2",
                        "standard parallels give a degenerate cone",
                    ));
                }
                n = (m1 * m1 - m2 * m2) / (ml2 - ml1);
            }
            let ec = 1.0 - 0.5 * one_es * ((1.0 - e) / (1.0 + e)).ln() / e;
            let c = m1 * m1 + n * ml1;
            let dd = 1.0 / n;
            Self {
                n,
                n2: n + n,
                c,
                dd,
                rho0: dd * (c - n * qsfn(phi0.sin(), e, one_es)).sqrt(),
                ec,
                e,
                one_es,
                spherical: false,
            }
        };

        if aea.n.abs() < EPS10 || !aea.rho0.is_finite() {
            return Err(ProjectionError::invalid_parameter(
                "lat_1",
                "standard parallels give a degenerate cone",
            ));
        }
        Ok(aea)
    }
}

impl ProjectionCore for AlbersEqualArea {
    fn forward(&self, lam: f64, phi: f64) -> Result<(f64, f64)> {
        let rho = self.c
            - if self.spherical {
                self.n2 * phi.sin()
            } else {
                self.n * qsfn(phi.sin(), self.e, self.one_es)
            };
        if rho < 0.0 {
            return Err(ProjectionError::domain("aea", "point is outside the cone"));
        }
        let rho = self.dd * rho.sqrt();
        let theta = lam * self.n;
        Ok((rho * theta.sin(), self.rho0 - rho * theta.cos()))
    }

    fn inverse(&self, x: f64, y: f64) -> Result<(f64, f64)> {
        let mut x = x;
        let mut y = self.rho0 - y;
        let mut rho = x.hypot(y);
        if rho == 0.0 {
            return Ok((0.0, HALF_PI.copysign(self.n)));
        }
        if self.n < 0.0 {
            rho = -rho;
            x = -x;
            y = -y;
        }
        let r = rho / self.dd;
        let phi = if self.spherical {
            let s = (self.c - r * r) / self.n2;
            if s.abs() <= 1.0 {
                s.asin()
            } else {
                HALF_PI.copysign(s)
            }
        } else {
            let q = (self.c - r * r) / self.n;
            if (self.ec - q.abs()).abs() > TOL7 {
                phi1_albers(q, self.e, self.one_es)?
            } else {
                HALF_PI.copysign(q)
            }
        };
        Ok((x.atan2(y) / self.n, phi))
    }

    fn is_equal_area(&self) -> bool {
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ellipsoid::Ellipsoid;
    use crate::params::initialize;

    fn conus() -> ProjectionParams {
        ProjectionParams::new(Ellipsoid::grs80())
            .with_center(-96.0, 23.0)
            .with_standard_parallels(29.5, 45.5)
    }

    #[test]
    fn test_origin_maps_to_zero() {
        let params = conus();
        let d = initialize(&params);
        let aea = AlbersEqualArea::new(&params, &d).unwrap();
        let (x, y) = aea.forward(0.0, d.phi0).unwrap();
        assert!(x.abs() < 1e-12);
        assert!(y.abs() < 1e-12);
    }

    #[test]
    fn test_sphere_roundtrip() {
        let params = conus().with_ellipsoid(Ellipsoid::sphere());
        let aea = AlbersEqualArea::new(&params, &initialize(&params)).unwrap();
        let (lam, phi) = (0.3, 0.7);
        let (x, y) = aea.forward(lam, phi).unwrap();
        let (l2, p2) = aea.inverse(x, y).unwrap();
        assert!((l2 - lam).abs() < 1e-10);
        assert!((p2 - phi).abs() < 1e-10);
    }
}
