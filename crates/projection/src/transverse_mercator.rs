//! Transverse Mercator (Gauss-Krüger) and UTM zone helpers.

use crate::error::{ProjectionError, Result};
use crate::kind::ProjectionCore;
use crate::math::{enfn, inv_mlfn, mlfn, EPS10, HALF_PI};
use crate::params::{DerivedConstants, ProjectionParams};

const FC1: f64 = 1.0;
const FC2: f64 = 0.5;
const FC3: f64 = 0.166_666_666_666_666_666_66;
const FC4: f64 = 0.083_333_333_333_333_333_33;
const FC5: f64 = 0.05;
const FC6: f64 = 0.033_333_333_333_333_333_33;
const FC7: f64 = 0.023_809_523_809_523_809_52;
const FC8: f64 = 0.017_857_142_857_142_857_14;

/// Transverse Mercator. Series expansion on the ellipsoid, closed form on the sphere.
#[derive(Debug, Clone)]
pub struct TransverseMercator {
    k0: f64,
    es: f64,
    /// e'² on the ellipsoid, k0 on the sphere
    esp: f64,
    /// Meridional distance at lat_0 (ellipsoid), k0/2 (sphere)
    ml0: f64,
    phi0: f64,
    en: [f64; 5],
    spherical: bool,
}

impl TransverseMercator {
    pub fn new(params: &ProjectionParams, derived: &DerivedConstants) -> Self {
        let k0 = params.scale_factor;
        let phi0 = derived.phi0;
        if derived.spherical {
            Self {
                k0,
                es: 0.0,
                esp: k0,
                ml0: 0.5 * k0,
                phi0,
                en: [0.0; 5],
                spherical: true,
            }
        } else {
            let en = enfn(derived.es);
            Self {
                k0,
                es: derived.es,
                esp: derived.es / (1.0 - derived.es),
                ml0: mlfn(phi0, phi0.sin(), phi0.cos(), &en),
                phi0,
                en,
                spherical: false,
            }
        }
    }

    fn forward_sphere(&self, lam: f64, phi: f64) -> Result<(f64, f64)> {
        let cosphi = phi.cos();
        let b = cosphi * lam.sin();
        if (b.abs() - 1.0).abs() <= EPS10 {
            return Err(ProjectionError::domain("tmerc", "point is 90° from the central meridian"));
        }
        let x = self.ml0 * ((1.0 + b) / (1.0 - b)).ln();
        let mut y = cosphi * lam.cos() / (1.0 - b * b).sqrt();
        let ay = y.abs();
        if ay >= 1.0 {
            if ay - 1.0 > EPS10 {
                return Err(ProjectionError::domain("tmerc", "acos argument out of range"));
            }
            y = 0.0;
        } else {
            y = y.acos();
        }
        if phi < 0.0 {
            y = -y;
        }
        Ok((x, self.esp * (y - self.phi0)))
    }

    fn forward_ellipsoid(&self, lam: f64, phi: f64) -> Result<(f64, f64)> {
        if !(-HALF_PI..=HALF_PI).contains(&lam) {
            return Err(ProjectionError::domain(
                "tmerc",
                "longitude more than 90° from the central meridian",
            ));
        }
        let sinphi = phi.sin();
        let cosphi = phi.cos();
        let mut t = if cosphi.abs() > 1e-10 { sinphi / cosphi } else { 0.0 };
        t *= t;
        let mut al = cosphi * lam;
        let als = al * al;
        al /= (1.0 - self.es * sinphi * sinphi).sqrt();
        let n = self.esp * cosphi * cosphi;

        let x = self.k0
            * al
            * (FC1
                + FC3
                    * als
                    * (1.0 - t
                        + n
                        + FC5
                            * als
                            * (5.0 + t * (t - 18.0) + n * (14.0 - 58.0 * t)
                                + FC7 * als * (61.0 + t * (t * (179.0 - t) - 479.0)))));
        let y = self.k0
            * (mlfn(phi, sinphi, cosphi, &self.en) - self.ml0
                + sinphi
                    * al
                    * lam
                    * FC2
                    * (1.0
                        + FC4
                            * als
                            * (5.0 - t
                                + n * (9.0 + 4.0 * n)
                                + FC6
                                    * als
                                    * (61.0 + t * (t - 58.0) + n * (270.0 - 330.0 * t)
                                        + FC8
                                            * als
                                            * (1385.0 + t * (t * (543.0 - t) - 3111.0))))));
        Ok((x, y))
    }

    fn inverse_sphere(&self, x: f64, y: f64) -> (f64, f64) {
        let h = (x / self.esp).exp();
        let g = 0.5 * (h - 1.0 / h);
        let d = self.phi0 + y / self.esp;
        let h = d.cos();
        let mut phi = ((1.0 - h * h) / (1.0 + g * g)).sqrt().min(1.0).asin();
        if d < 0.0 {
            phi = -phi;
        }
        let lam = if g != 0.0 || h != 0.0 { g.atan2(h) } else { 0.0 };
        (lam, phi)
    }

    fn inverse_ellipsoid(&self, x: f64, y: f64) -> Result<(f64, f64)> {
        let phi = inv_mlfn(self.ml0 + y / self.k0, self.es, &self.en, "tmerc")?;
        if phi.abs() >= HALF_PI {
            return Ok((0.0, HALF_PI.copysign(y)));
        }
        let sinphi = phi.sin();
        let cosphi = phi.cos();
        let mut t = if cosphi.abs() > 1e-10 { sinphi / cosphi } else { 0.0 };
        let n = self.esp * cosphi * cosphi;
        let mut con = 1.0 - self.es * sinphi * sinphi;
        let d = x * con.sqrt() / self.k0;
        con *= t;
        t *= t;
        let ds = d * d;

        let phi = phi
            - (con * ds / (1.0 - self.es))
                * FC2
                * (1.0
                    - ds
                        * FC4
                        * (5.0 + t * (3.0 - 9.0 * n) + n * (1.0 - 4.0 * n)
                            - ds
                                * FC6
                                * (61.0 + t * (90.0 - 252.0 * n + 45.0 * t) + 46.0 * n
                                    - ds
                                        * FC8
                                        * (1385.0
                                            + t * (3633.0 + t * (4095.0 + 1574.0 * t))))));
        let lam = d
            * (FC1
                - ds
                    * FC3
                    * (1.0 + 2.0 * t + n
                        - ds
                            * FC5
                            * (5.0 + t * (28.0 + 24.0 * t + 8.0 * n) + 6.0 * n
                                - ds * FC7 * (61.0 + t * (662.0 + t * (1320.0 + 720.0 * t))))))
            / cosphi;
        Ok((lam, phi))
    }
}

impl ProjectionCore for TransverseMercator {
    fn forward(&self, lam: f64, phi: f64) -> Result<(f64, f64)> {
        if self.spherical {
            self.forward_sphere(lam, phi)
        } else {
            self.forward_ellipsoid(lam, phi)
        }
    }

    fn inverse(&self, x: f64, y: f64) -> Result<(f64, f64)> {
        if self.spherical {
            Ok(self.inverse_sphere(x, y))
        } else {
            self.inverse_ellipsoid(x, y)
        }
    }

    fn is_conformal(&self) -> bool {
        true
    }
}

/// Parameters for a UTM zone (1-60). Southern zones use a 10 000 km false northing.
pub fn utm_params(zone: u8, south: bool, base: ProjectionParams) -> Result<ProjectionParams> {
    if !(1..=60).contains(&zone) {
        return Err(ProjectionError::invalid_parameter(
            "zone",
            format!("UTM zone {} outside 1-60", zone),
        ));
    }
    let center_lon = (zone as f64 - 1.0) * 6.0 - 180.0 + 3.0;
    let false_northing = if south { 10_000_000.0 } else { 0.0 };
    Ok(base
        .with_center(center_lon, 0.0)
        .with_scale_factor(0.9996)
        .with_false_origin(500_000.0, false_northing))
}

/// UTM zone containing a longitude in degrees.
pub fn utm_zone(lon: f64) -> u8 {
    let zone = ((lon + 180.0) / 6.0).floor() as i64 % 60 + 1;
    zone.clamp(1, 60) as u8
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_utm_zone() {
        assert_eq!(utm_zone(-180.0), 1);
        assert_eq!(utm_zone(-75.5), 18);
        assert_eq!(utm_zone(3.0), 31);
        assert_eq!(utm_zone(179.9), 60);
    }

    #[test]
    fn test_utm_params() {
        let p = utm_params(33, true, ProjectionParams::default()).unwrap();
        assert_eq!(p.center_lon, 15.0);
        assert_eq!(p.scale_factor, 0.9996);
        assert_eq!(p.false_northing, 10_000_000.0);
        assert!(utm_params(0, false, ProjectionParams::default()).is_err());
    }
}
