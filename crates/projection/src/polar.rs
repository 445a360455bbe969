//! Stereographic projection in polar, equatorial and oblique aspects.
//!
//! The polar aspect is what GRIB2 template 3.20 describes (NCEP polar
//! stereographic grids). `lat_ts` sets the latitude of true scale for the
//! polar aspect; otherwise `k_0` scales the projection.

use crate::azimuthal::Aspect;
use crate::error::{ProjectionError, Result};
use crate::kind::ProjectionCore;
use crate::math::{ssfn, tsfn, EPS10, HALF_PI, QUARTER_PI};
use crate::params::{DerivedConstants, ProjectionParams};

const TOL: f64 = 1e-8;
const NITER: usize = 8;
const CONV: f64 = 1e-10;

#[derive(Debug, Clone, Copy)]
pub struct Stereographic {
    aspect: Aspect,
    akm1: f64,
    phi0: f64,
    sinph0: f64,
    cosph0: f64,
    /// Conformal latitude of the origin (ellipsoid only)
    sin_x1: f64,
    cos_x1: f64,
    e: f64,
    spherical: bool,
}

impl Stereographic {
    pub fn new(params: &ProjectionParams, derived: &DerivedConstants) -> Self {
        let phi0 = derived.phi0;
        let k0 = params.scale_factor;
        let e = derived.e;

        let aspect = Aspect::from_origin(phi0);
        let phits = params
            .true_scale_lat
            .map(f64::to_radians)
            .unwrap_or(HALF_PI)
            .abs();

        let mut sin_x1 = 0.0;
        let mut cos_x1 = 1.0;
        let akm1 = match (aspect, derived.spherical) {
            (Aspect::NorthPole | Aspect::SouthPole, false) => {
                if (phits - HALF_PI).abs() < EPS10 {
                    2.0 * k0 / ((1.0 + e).powf(1.0 + e) * (1.0 - e).powf(1.0 - e)).sqrt()
                } else {
                    let s = phits.sin();
                    let es = e * s;
                    phits.cos() / tsfn(phits, s, e) / (1.0 - es * es).sqrt()
                }
            }
            (Aspect::NorthPole | Aspect::SouthPole, true) => {
                if (phits - HALF_PI).abs() >= EPS10 {
                    phits.cos() / (QUARTER_PI - 0.5 * phits).tan()
                } else {
                    2.0 * k0
                }
            }
            (_, false) => {
                let s = phi0.sin();
                let x = 2.0 * ssfn(phi0, s, e).atan() - HALF_PI;
                sin_x1 = x.sin();
                cos_x1 = x.cos();
                let es = e * s;
                2.0 * k0 * phi0.cos() / (1.0 - es * es).sqrt()
            }
            (_, true) => 2.0 * k0,
        };

        Self {
            aspect,
            akm1,
            phi0,
            sinph0: phi0.sin(),
            cosph0: phi0.cos(),
            sin_x1,
            cos_x1,
            e,
            spherical: derived.spherical,
        }
    }

    fn forward_sphere(&self, lam: f64, phi: f64) -> Result<(f64, f64)> {
        let (sinphi, cosphi) = phi.sin_cos();
        let (sinlam, mut coslam) = lam.sin_cos();
        match self.aspect {
            Aspect::Equatorial | Aspect::Oblique => {
                let denom = if self.aspect == Aspect::Equatorial {
                    1.0 + cosphi * coslam
                } else {
                    1.0 + self.sinph0 * sinphi + self.cosph0 * cosphi * coslam
                };
                if denom <= EPS10 {
                    return Err(ProjectionError::domain("stere", "antipode of the origin"));
                }
                let a = self.akm1 / denom;
                let x = a * cosphi * sinlam;
                let y = if self.aspect == Aspect::Equatorial {
                    a * sinphi
                } else {
                    a * (self.cosph0 * sinphi - self.sinph0 * cosphi * coslam)
                };
                Ok((x, y))
            }
            Aspect::NorthPole | Aspect::SouthPole => {
                let mut phi = phi;
                if self.aspect == Aspect::NorthPole {
                    coslam = -coslam;
                    phi = -phi;
                }
                if (phi - HALF_PI).abs() < TOL {
                    return Err(ProjectionError::domain("stere", "opposite pole"));
                }
                let r = self.akm1 * (QUARTER_PI + 0.5 * phi).tan();
                Ok((sinlam * r, coslam * r))
            }
        }
    }

    fn forward_ellipsoid(&self, lam: f64, phi: f64) -> Result<(f64, f64)> {
        let (sinlam, mut coslam) = lam.sin_cos();
        let mut sinphi = phi.sin();
        let (x, y) = match self.aspect {
            Aspect::Equatorial | Aspect::Oblique => {
                let chi = 2.0 * ssfn(phi, sinphi, self.e).atan() - HALF_PI;
                let (sin_x, cos_x) = chi.sin_cos();
                if self.aspect == Aspect::Oblique {
                    let denom =
                        self.cos_x1 * (1.0 + self.sin_x1 * sin_x + self.cos_x1 * cos_x * coslam);
                    if denom == 0.0 {
                        return Err(ProjectionError::domain("stere", "antipode of the origin"));
                    }
                    let a = self.akm1 / denom;
                    (
                        a * cos_x,
                        a * (self.cos_x1 * sin_x - self.sin_x1 * cos_x * coslam),
                    )
                } else {
                    let denom = 1.0 + cos_x * coslam;
                    if denom == 0.0 {
                        return Err(ProjectionError::domain("stere", "antipode of the origin"));
                    }
                    let a = self.akm1 / denom;
                    (a * cos_x, a * sin_x)
                }
            }
            Aspect::NorthPole | Aspect::SouthPole => {
                let mut phi = phi;
                if self.aspect == Aspect::SouthPole {
                    phi = -phi;
                    coslam = -coslam;
                    sinphi = -sinphi;
                }
                let x = if (phi - HALF_PI).abs() < 1e-15 {
                    0.0
                } else {
                    self.akm1 * tsfn(phi, sinphi, self.e)
                };
                (x, -x * coslam)
            }
        };
        Ok((x * sinlam, y))
    }

    fn inverse_sphere(&self, x: f64, y: f64) -> Result<(f64, f64)> {
        let rh = x.hypot(y);
        let c = 2.0 * (rh / self.akm1).atan();
        let (sinc, cosc) = c.sin_cos();
        match self.aspect {
            Aspect::Equatorial => {
                let phi = if rh.abs() <= EPS10 { 0.0 } else { (y * sinc / rh).asin() };
                let lam = if cosc != 0.0 || x != 0.0 {
                    (x * sinc).atan2(cosc * rh)
                } else {
                    0.0
                };
                Ok((lam, phi))
            }
            Aspect::Oblique => {
                let phi = if rh.abs() <= EPS10 {
                    self.phi0
                } else {
                    (cosc * self.sinph0 + y * sinc * self.cosph0 / rh).asin()
                };
                let c = cosc - self.sinph0 * phi.sin();
                let lam = if c != 0.0 || x != 0.0 {
                    (x * sinc * self.cosph0).atan2(c * rh)
                } else {
                    0.0
                };
                Ok((lam, phi))
            }
            Aspect::NorthPole | Aspect::SouthPole => {
                let y = if self.aspect == Aspect::NorthPole { -y } else { y };
                let phi = if rh.abs() <= EPS10 {
                    self.phi0
                } else if self.aspect == Aspect::SouthPole {
                    (-cosc).asin()
                } else {
                    cosc.asin()
                };
                let lam = if x == 0.0 && y == 0.0 { 0.0 } else { x.atan2(y) };
                Ok((lam, phi))
            }
        }
    }

    fn inverse_ellipsoid(&self, x: f64, y: f64) -> Result<(f64, f64)> {
        let rho = x.hypot(y);
        let (mut x, mut y) = (x, y);
        let (tp, mut phi_l, halfpi, halfe) = match self.aspect {
            Aspect::Equatorial | Aspect::Oblique => {
                let tp = 2.0 * (rho * self.cos_x1).atan2(self.akm1);
                let (sinphi, cosphi) = tp.sin_cos();
                let phi_l = if rho == 0.0 {
                    (cosphi * self.sin_x1).asin()
                } else {
                    (cosphi * self.sin_x1 + y * sinphi * self.cos_x1 / rho).asin()
                };
                x *= sinphi;
                y = rho * self.cos_x1 * cosphi - y * self.sin_x1 * sinphi;
                (
                    (0.5 * (HALF_PI + phi_l)).tan(),
                    phi_l,
                    HALF_PI,
                    0.5 * self.e,
                )
            }
            Aspect::NorthPole | Aspect::SouthPole => {
                if self.aspect == Aspect::NorthPole {
                    y = -y;
                }
                let tp = -rho / self.akm1;
                (tp, HALF_PI - 2.0 * tp.atan(), -HALF_PI, -0.5 * self.e)
            }
        };

        for _ in 0..NITER {
            let sinphi = self.e * phi_l.sin();
            let phi = 2.0 * (tp * ((1.0 + sinphi) / (1.0 - sinphi)).powf(halfe)).atan() - halfpi;
            if (phi_l - phi).abs() < CONV {
                let phi = if self.aspect == Aspect::SouthPole { -phi } else { phi };
                let lam = if x == 0.0 && y == 0.0 { 0.0 } else { x.atan2(y) };
                return Ok((lam, phi));
            }
            phi_l = phi;
        }
        Err(ProjectionError::non_convergent("stere", "conformal latitude"))
    }
}

impl ProjectionCore for Stereographic {
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

    fn is_conformal(&self) -> bool {
        true
    }
}
