//! Azimuthal projections: Orthographic and Lambert Azimuthal Equal-Area.

use crate::error::{ProjectionError, Result};
use crate::kind::ProjectionCore;
use crate::math::{authlat, authset, qsfn, EPS10, HALF_PI, QUARTER_PI};
use crate::params::DerivedConstants;

/// Aspect of an azimuthal projection, fixed by the latitude of origin.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Aspect {
    NorthPole,
    SouthPole,
    Equatorial,
    Oblique,
}

impl Aspect {
    pub(crate) fn from_origin(phi0: f64) -> Self {
        let t = phi0.abs();
        if (t - HALF_PI).abs() < EPS10 {
            if phi0 < 0.0 {
                Aspect::SouthPole
            } else {
                Aspect::NorthPole
            }
        } else if t > EPS10 {
            Aspect::Oblique
        } else {
            Aspect::Equatorial
        }
    }

    fn is_polar(self) -> bool {
        matches!(self, Aspect::NorthPole | Aspect::SouthPole)
    }
}

// ============================================================================
// Orthographic
// ============================================================================

/// Orthographic projection (sphere). Points on the far hemisphere are not visible.
#[derive(Debug, Clone, Copy)]
pub struct Orthographic {
    aspect: Aspect,
    phi0: f64,
    sinph0: f64,
    cosph0: f64,
}

impl Orthographic {
    pub fn new(derived: &DerivedConstants) -> Self {
        let phi0 = derived.phi0;
        Self {
            aspect: Aspect::from_origin(phi0),
            phi0,
            sinph0: phi0.sin(),
            cosph0: phi0.cos(),
        }
    }
}

impl ProjectionCore for Orthographic {
    fn forward(&self, lam: f64, phi: f64) -> Result<(f64, f64)> {
        let cosphi = phi.cos();
        let mut coslam = lam.cos();
        let hidden = || ProjectionError::domain("ortho", "point is on the far hemisphere");
        let y = match self.aspect {
            Aspect::Equatorial => {
                if cosphi * coslam < -EPS10 {
                    return Err(hidden());
                }
                phi.sin()
            }
            Aspect::Oblique => {
                let sinphi = phi.sin();
                if self.sinph0 * sinphi + self.cosph0 * cosphi * coslam < -EPS10 {
                    return Err(hidden());
                }
                self.cosph0 * sinphi - self.sinph0 * cosphi * coslam
            }
            Aspect::NorthPole | Aspect::SouthPole => {
                if self.aspect == Aspect::NorthPole {
                    coslam = -coslam;
                }
                if (phi - self.phi0).abs() - EPS10 > HALF_PI {
                    return Err(hidden());
                }
                cosphi * coslam
            }
        };
        Ok((cosphi * lam.sin(), y))
    }

    fn inverse(&self, x: f64, y: f64) -> Result<(f64, f64)> {
        let rh = x.hypot(y);
        let mut sinc = rh;
        if sinc > 1.0 {
            if sinc - 1.0 > EPS10 {
                return Err(ProjectionError::domain("ortho", "point is off the disk"));
            }
            sinc = 1.0;
        }
        let cosc = (1.0 - sinc * sinc).sqrt();
        if rh.abs() <= EPS10 {
            return Ok((0.0, self.phi0));
        }

        let (mut x, mut y) = (x, y);
        let phi = match self.aspect {
            Aspect::NorthPole => {
                y = -y;
                sinc.acos()
            }
            Aspect::SouthPole => -sinc.acos(),
            Aspect::Equatorial | Aspect::Oblique => {
                let s = if self.aspect == Aspect::Equatorial {
                    let s = y * sinc / rh;
                    x *= sinc;
                    y = cosc * rh;
                    s
                } else {
                    let s = cosc * self.sinph0 + y * sinc * self.cosph0 / rh;
                    y = (cosc - self.sinph0 * s) * rh;
                    x *= sinc * self.cosph0;
                    s
                };
                if s.abs() >= 1.0 {
                    HALF_PI.copysign(s)
                } else {
                    s.asin()
                }
            }
        };

        let lam = if y == 0.0 && !self.aspect.is_polar() {
            if x == 0.0 {
                0.0
            } else {
                HALF_PI.copysign(x)
            }
        } else {
            x.atan2(y)
        };
        Ok((lam, phi))
    }
}

// ============================================================================
// Lambert Azimuthal Equal-Area
// ============================================================================

#[derive(Debug, Clone, Copy)]
pub struct LambertAzimuthalEqualArea {
    aspect: Aspect,
    phi0: f64,
    sinb1: f64,
    cosb1: f64,
    /// Ellipsoid constants
    e: f64,
    one_es: f64,
    qp: f64,
    rq: f64,
    dd: f64,
    xmf: f64,
    ymf: f64,
    apa: [f64; 3],
    spherical: bool,
}

impl LambertAzimuthalEqualArea {
    pub fn new(derived: &DerivedConstants) -> Self {
        let phi0 = derived.phi0;
        let aspect = Aspect::from_origin(phi0);
        let mut laea = Self {
            aspect,
            phi0,
            sinb1: 0.0,
            cosb1: 1.0,
            e: derived.e,
            one_es: derived.one_es,
            qp: 0.0,
            rq: 1.0,
            dd: 1.0,
            xmf: 1.0,
            ymf: 1.0,
            apa: [0.0; 3],
            spherical: derived.spherical,
        };

        if derived.spherical {
            if aspect == Aspect::Oblique {
                laea.sinb1 = phi0.sin();
                laea.cosb1 = phi0.cos();
            }
            return laea;
        }

        laea.qp = qsfn(1.0, derived.e, derived.one_es);
        laea.apa = authset(derived.es);
        match aspect {
            Aspect::NorthPole | Aspect::SouthPole => laea.dd = 1.0,
            Aspect::Equatorial => {
                laea.rq = (0.5 * laea.qp).sqrt();
                laea.dd = 1.0 / laea.rq;
                laea.xmf = 1.0;
                laea.ymf = 0.5 * laea.qp;
            }
            Aspect::Oblique => {
                laea.rq = (0.5 * laea.qp).sqrt();
                let sinphi = phi0.sin();
                laea.sinb1 = qsfn(sinphi, derived.e, derived.one_es) / laea.qp;
                laea.cosb1 = (1.0 - laea.sinb1 * laea.sinb1).sqrt();
                laea.dd = phi0.cos()
                    / ((1.0 - derived.es * sinphi * sinphi).sqrt() * laea.rq * laea.cosb1);
                laea.xmf = laea.rq * laea.dd;
                laea.ymf = laea.rq / laea.dd;
            }
        }
        laea
    }

    fn forward_sphere(&self, lam: f64, phi: f64) -> Result<(f64, f64)> {
        let (sinphi, cosphi) = phi.sin_cos();
        let (sinlam, mut coslam) = lam.sin_cos();
        match self.aspect {
            Aspect::Equatorial | Aspect::Oblique => {
                let denom = if self.aspect == Aspect::Equatorial {
                    1.0 + cosphi * coslam
                } else {
                    1.0 + self.sinb1 * sinphi + self.cosb1 * cosphi * coslam
                };
                if denom <= EPS10 {
                    return Err(ProjectionError::domain("laea", "antipode of the origin"));
                }
                let k = (2.0 / denom).sqrt();
                let y = if self.aspect == Aspect::Equatorial {
                    k * sinphi
                } else {
                    k * (self.cosb1 * sinphi - self.sinb1 * cosphi * coslam)
                };
                Ok((k * cosphi * sinlam, y))
            }
            Aspect::NorthPole | Aspect::SouthPole => {
                if self.aspect == Aspect::NorthPole {
                    coslam = -coslam;
                }
                if (phi + self.phi0).abs() < EPS10 {
                    return Err(ProjectionError::domain("laea", "antipode of the origin"));
                }
                let t = QUARTER_PI - 0.5 * phi;
                let r = 2.0 * if self.aspect == Aspect::SouthPole { t.cos() } else { t.sin() };
                Ok((r * sinlam, r * coslam))
            }
        }
    }

    fn forward_ellipsoid(&self, lam: f64, phi: f64) -> Result<(f64, f64)> {
        let (sinlam, coslam) = lam.sin_cos();
        let mut q = qsfn(phi.sin(), self.e, self.one_es);
        let sinb = q / self.qp;
        let cosb2 = 1.0 - sinb * sinb;
        let cosb = if cosb2 > 0.0 { cosb2.sqrt() } else { 0.0 };

        let b = match self.aspect {
            Aspect::Oblique => 1.0 + self.sinb1 * sinb + self.cosb1 * cosb * coslam,
            Aspect::Equatorial => 1.0 + cosb * coslam,
            Aspect::NorthPole => {
                q = self.qp - q;
                HALF_PI + phi
            }
            Aspect::SouthPole => {
                q = self.qp + q;
                phi - HALF_PI
            }
        };
        if b.abs() < EPS10 {
            return Err(ProjectionError::domain("laea", "antipode of the origin"));
        }

        Ok(match self.aspect {
            Aspect::Oblique => {
                let b = (2.0 / b).sqrt();
                (
                    self.xmf * b * cosb * sinlam,
                    self.ymf * b * (self.cosb1 * sinb - self.sinb1 * cosb * coslam),
                )
            }
            Aspect::Equatorial => {
                let b = (2.0 / b).sqrt();
                (self.xmf * b * cosb * sinlam, self.ymf * b * sinb)
            }
            Aspect::NorthPole | Aspect::SouthPole => {
                if q >= 1e-15 {
                    let b = q.sqrt();
                    let y = if self.aspect == Aspect::SouthPole { b } else { -b };
                    (b * sinlam, coslam * y)
                } else {
                    (0.0, 0.0)
                }
            }
        })
    }

    fn inverse_sphere(&self, x: f64, y: f64) -> Result<(f64, f64)> {
        let rh = x.hypot(y);
        let half = 0.5 * rh;
        if half > 1.0 {
            return Err(ProjectionError::domain("laea", "point is off the disk"));
        }
        let z = 2.0 * half.asin();
        let (mut x, mut y) = (x, y);
        let phi = match self.aspect {
            Aspect::Equatorial | Aspect::Oblique => {
                let (sinz, cosz) = z.sin_cos();
                if self.aspect == Aspect::Equatorial {
                    let phi = if rh.abs() <= EPS10 { 0.0 } else { (y * sinz / rh).asin() };
                    x *= sinz;
                    y = cosz * rh;
                    phi
                } else {
                    let phi = if rh.abs() <= EPS10 {
                        self.phi0
                    } else {
                        (cosz * self.sinb1 + y * sinz * self.cosb1 / rh).asin()
                    };
                    x *= sinz * self.cosb1;
                    y = (cosz - phi.sin() * self.sinb1) * rh;
                    phi
                }
            }
            Aspect::NorthPole => {
                y = -y;
                HALF_PI - z
            }
            Aspect::SouthPole => z - HALF_PI,
        };
        let lam = if y == 0.0 && !self.aspect.is_polar() {
            0.0
        } else {
            x.atan2(y)
        };
        Ok((lam, phi))
    }

    fn inverse_ellipsoid(&self, x: f64, y: f64) -> Result<(f64, f64)> {
        let (mut x, mut y) = (x, y);
        let ab = match self.aspect {
            Aspect::Equatorial | Aspect::Oblique => {
                x /= self.dd;
                y *= self.dd;
                let rho = x.hypot(y);
                if rho < EPS10 {
                    return Ok((0.0, self.phi0));
                }
                let s = 2.0 * (0.5 * rho / self.rq).clamp(-1.0, 1.0).asin();
                let (s_ce, c_ce) = s.sin_cos();
                x *= s_ce;
                if self.aspect == Aspect::Oblique {
                    let ab = c_ce * self.sinb1 + y * s_ce * self.cosb1 / rho;
                    y = rho * self.cosb1 * c_ce - y * self.sinb1 * s_ce;
                    ab
                } else {
                    let ab = y * s_ce / rho;
                    y = rho * c_ce;
                    ab
                }
            }
            Aspect::NorthPole | Aspect::SouthPole => {
                if self.aspect == Aspect::NorthPole {
                    y = -y;
                }
                let q = x * x + y * y;
                if q == 0.0 {
                    return Ok((0.0, self.phi0));
                }
                let ab = 1.0 - q / self.qp;
                if self.aspect == Aspect::SouthPole {
                    -ab
                } else {
                    ab
                }
            }
        };
        Ok((x.atan2(y), authlat(ab.clamp(-1.0, 1.0).asin(), &self.apa)))
    }
}

impl ProjectionCore for LambertAzimuthalEqualArea {
    fn forward(&self, lam: f64, phi: f64) -> Result<(f64, f64)> {
        if self.spherical {
            self.forward_sphere(lam, phi)
        } else {
            self.forward_ellipsoid(lam, phi)
        }
    }

    fn inverse(&self, x: f64, y: f64) -> Result<(f64, f64)> {
        if self.spherical {
            self.inverse_sphere(x, y)
        } else {
            self.inverse_ellipsoid(x, y)
        }
    }

    fn is_equal_area(&self) -> bool {
        true
    }
}
