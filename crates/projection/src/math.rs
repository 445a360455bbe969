//! Numerical primitives shared by several projections.
//!
//! Series and iterations follow the classic PROJ formulations: authalic
//! latitude, conformal latitude (`tsfn`/`phi2`) and meridional distance
//! (`mlfn`/`inv_mlfn`).

use crate::error::{ProjectionError, Result};
use std::f64::consts::{FRAC_PI_2, FRAC_PI_4, PI, TAU};

pub const HALF_PI: f64 = FRAC_PI_2;
pub const QUARTER_PI: f64 = FRAC_PI_4;
pub const EPS10: f64 = 1e-10;

/// Longitudes beyond this many turns are reduced with one remainder before
/// the ±2π loop. Below it the loop alone is used.
pub const MAX_LOOP_TURNS: f64 = 1e6;

/// Wrap a longitude in radians into (-π, π].
///
/// Uses repeated ±2π corrections, so results for ordinary inputs match
/// historical output bit for bit. Inputs past [`MAX_LOOP_TURNS`] turns are
/// first reduced with `%`: subtracting 2π no longer changes values that
/// large, and the loop would never end.
pub fn normalize_longitude(angle: f64) -> Result<f64> {
    if !angle.is_finite() {
        return Err(ProjectionError::invalid_value(format!(
            "non-finite longitude {}",
            angle
        )));
    }
    let mut angle = if angle.abs() > MAX_LOOP_TURNS * TAU {
        angle % TAU
    } else {
        angle
    };
    while angle > PI {
        angle -= TAU;
    }
    while angle <= -PI {
        angle += TAU;
    }
    Ok(angle)
}

/// Wrap a longitude in degrees into (-180, 180], with the same
/// [`MAX_LOOP_TURNS`] cutoff as [`normalize_longitude`].
pub fn normalize_longitude_degrees(angle: f64) -> Result<f64> {
    if !angle.is_finite() {
        return Err(ProjectionError::invalid_value(format!(
            "non-finite longitude {}",
            angle
        )));
    }
    let mut angle = if angle.abs() > MAX_LOOP_TURNS * 360.0 {
        angle % 360.0
    } else {
        angle
    };
    while angle > 180.0 {
        angle -= 360.0;
    }
    while angle <= -180.0 {
        angle += 360.0;
    }
    Ok(angle)
}

/// asin clamped to ±π/2 for arguments marginally outside [-1, 1].
pub fn asin_clamped(v: f64) -> f64 {
    if v.abs() >= 1.0 {
        HALF_PI.copysign(v)
    } else {
        v.asin()
    }
}

/// acos clamped to [0, π].
pub fn acos_clamped(v: f64) -> f64 {
    if v.abs() >= 1.0 {
        if v < 0.0 {
            PI
        } else {
            0.0
        }
    } else {
        v.acos()
    }
}

/// Authalic q function.
pub fn qsfn(sinphi: f64, e: f64, one_es: f64) -> f64 {
    if e >= 1e-7 {
        let con = e * sinphi;
        one_es * (sinphi / (1.0 - con * con) - (0.5 / e) * ((1.0 - con) / (1.0 + con)).ln())
    } else {
        sinphi + sinphi
    }
}

const P00: f64 = 0.333_333_333_333_333_333_33;
const P01: f64 = 0.172_222_222_222_222_222_22;
const P02: f64 = 0.102_579_365_079_365_079_36;
const P10: f64 = 0.063_888_888_888_888_888_88;
const P11: f64 = 0.066_402_116_402_116_402_11;
const P20: f64 = 0.016_415_012_942_191_544_43;

/// Coefficients of the authalic latitude series.
pub fn authset(es: f64) -> [f64; 3] {
    let mut apa = [0.0; 3];
    apa[0] = es * P00;
    let mut t = es * es;
    apa[0] += t * P01;
    apa[1] = t * P10;
    t *= es;
    apa[0] += t * P02;
    apa[1] += t * P11;
    apa[2] = t * P20;
    apa
}

/// Geodetic latitude from authalic latitude `beta`.
pub fn authlat(beta: f64, apa: &[f64; 3]) -> f64 {
    let t = beta + beta;
    beta + apa[0] * t.sin() + apa[1] * (t + t).sin() + apa[2] * (t + t + t).sin()
}

/// Radius of the parallel divided by the equatorial radius.
pub fn msfn(sinphi: f64, cosphi: f64, es: f64) -> f64 {
    cosphi / (1.0 - es * sinphi * sinphi).sqrt()
}

/// Isometric latitude helper t(φ).
pub fn tsfn(phi: f64, sinphi: f64, e: f64) -> f64 {
    let con = e * sinphi;
    (0.5 * (HALF_PI - phi)).tan() / ((1.0 - con) / (1.0 + con)).powf(0.5 * e)
}

/// Conformal colatitude helper used by the oblique stereographic.
pub fn ssfn(phit: f64, sinphi: f64, e: f64) -> f64 {
    let con = e * sinphi;
    (0.5 * (HALF_PI + phit)).tan() * ((1.0 - con) / (1.0 + con)).powf(0.5 * e)
}

/// Inverse of [`tsfn`]: latitude from t by fixed-point iteration.
pub fn phi2(ts: f64, e: f64, projection: &'static str) -> Result<f64> {
    const TOL: f64 = 1e-10;
    const N_ITER: usize = 15;

    let half_e = 0.5 * e;
    let mut phi = HALF_PI - 2.0 * ts.atan();
    for _ in 0..N_ITER {
        let con = e * phi.sin();
        let dphi = HALF_PI - 2.0 * (ts * ((1.0 - con) / (1.0 + con)).powf(half_e)).atan() - phi;
        phi += dphi;
        if dphi.abs() <= TOL {
            return Ok(phi);
        }
    }
    Err(ProjectionError::non_convergent(projection, "phi2"))
}

const C00: f64 = 1.0;
const C02: f64 = 0.25;
const C04: f64 = 0.046_875;
const C06: f64 = 0.019_531_25;
const C08: f64 = 0.010_681_152_343_75;
const C22: f64 = 0.75;
const C44: f64 = 0.468_75;
const C46: f64 = 0.013_020_833_333_333_333_33;
const C48: f64 = 0.007_128_906_25;
const C66: f64 = 0.364_583_333_333_333_333_33;
const C68: f64 = 0.005_696_614_583_333_333_33;
const C88: f64 = 0.307_617_187_5;

/// Coefficients of the meridional distance series.
pub fn enfn(es: f64) -> [f64; 5] {
    let mut en = [0.0; 5];
    en[0] = C00 - es * (C02 + es * (C04 + es * (C06 + es * C08)));
    en[1] = es * (C22 - es * (C04 + es * (C06 + es * C08)));
    let mut t = es * es;
    en[2] = t * (C44 - es * (C46 + es * C48));
    t *= es;
    en[3] = t * (C66 - es * C68);
    en[4] = t * es * C88;
    en
}

/// Meridional distance from the equator to `phi` on the unit ellipsoid.
pub fn mlfn(phi: f64, sphi: f64, cphi: f64, en: &[f64; 5]) -> f64 {
    let cphi = cphi * sphi;
    let sphi = sphi * sphi;
    en[0] * phi - cphi * (en[1] + sphi * (en[2] + sphi * (en[3] + sphi * en[4])))
}

/// Latitude whose meridional distance is `arg` (Newton iteration).
pub fn inv_mlfn(arg: f64, es: f64, en: &[f64; 5], projection: &'static str) -> Result<f64> {
    const EPS: f64 = 1e-11;
    const MAX_ITER: usize = 10;

    let k = 1.0 / (1.0 - es);
    let mut phi = arg;
    for _ in 0..MAX_ITER {
        let s = phi.sin();
        let t = 1.0 - es * s * s;
        let t = (mlfn(phi, s, phi.cos(), en) - arg) * (t * t.sqrt()) * k;
        phi -= t;
        if t.abs() < EPS {
            return Ok(phi);
        }
    }
    Err(ProjectionError::non_convergent(projection, "inv_mlfn"))
}

/// Latitude from the Albers q value (iterative inverse of [`qsfn`]).
pub fn phi1_albers(qs: f64, e: f64, one_es: f64) -> Result<f64> {
    const TOL: f64 = 1e-10;
    const N_ITER: usize = 15;

    let mut phi = asin_clamped(0.5 * qs);
    if e < 1e-7 {
        return Ok(phi);
    }
    for _ in 0..N_ITER {
        let sinpi = phi.sin();
        let cospi = phi.cos();
        let con = e * sinpi;
        let com = 1.0 - con * con;
        let dphi = 0.5 * com * com / cospi
            * (qs / one_es - sinpi / com + 0.5 / e * ((1.0 - con) / (1.0 + con)).ln());
        phi += dphi;
        if dphi.abs() <= TOL {
            return Ok(phi);
        }
    }
    Err(ProjectionError::non_convergent("aea", "phi1"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_longitude_range() {
        assert_eq!(normalize_longitude(0.0).unwrap(), 0.0);
        assert!((normalize_longitude(5.0).unwrap() - (5.0 - TAU)).abs() < 1e-12);
        assert_eq!(normalize_longitude(-PI).unwrap(), PI);
        assert!((normalize_longitude(-7.0).unwrap() - (-7.0 + TAU)).abs() < 1e-12);
    }

    #[test]
    fn test_normalize_longitude_rejects_non_finite() {
        assert!(matches!(
            normalize_longitude(f64::NAN),
            Err(ProjectionError::InvalidValue(_))
        ));
        assert!(normalize_longitude_degrees(f64::INFINITY).is_err());
    }

    #[test]
    fn test_normalize_longitude_degrees() {
        assert_eq!(normalize_longitude_degrees(190.0).unwrap(), -170.0);
        assert_eq!(normalize_longitude_degrees(-180.0).unwrap(), 180.0);
        assert_eq!(normalize_longitude_degrees(720.0).unwrap(), 0.0);
    }

    #[test]
    fn test_normalize_longitude_loop_and_cutoff() {
        // Just under the cutoff the loop alone runs and lands on the same angle
        let turns = MAX_LOOP_TURNS - 1.0;
        let wrapped = normalize_longitude(turns * TAU + 1.0).unwrap();
        assert!((wrapped - 1.0).abs() < 1e-4);
        assert_eq!(normalize_longitude_degrees(turns * 360.0 + 10.0).unwrap(), 10.0);

        // Far past it the remainder keeps the result in range
        for angle in [1e12, -1e12, 1e300, -1e300] {
            let wrapped = normalize_longitude(angle).unwrap();
            assert!(wrapped > -PI && wrapped <= PI, "{} -> {}", angle, wrapped);
            let wrapped = normalize_longitude_degrees(angle).unwrap();
            assert!(wrapped > -180.0 && wrapped <= 180.0, "{} -> {}", angle, wrapped);
        }
    }

    #[test]
    fn test_qsfn_sphere_limit() {
        assert!((qsfn(0.5, 0.0, 1.0) - 1.0).abs() < 1e-15);
    }

    #[test]
    fn test_authalic_roundtrip() {
        let es: f64 = 0.006_694_379_990_14;
        let e = es.sqrt();
        let one_es = 1.0 - es;
        let apa = authset(es);
        let qp = qsfn(1.0, e, one_es);
        for deg in [-80.0f64, -45.0, -10.0, 0.0, 10.0, 45.0, 80.0] {
            let phi = deg.to_radians();
            let beta = (qsfn(phi.sin(), e, one_es) / qp).asin();
            let back = authlat(beta, &apa);
            assert!((back - phi).abs() < 1e-8, "{} -> {}", phi, back);
        }
    }

    #[test]
    fn test_phi2_inverts_tsfn() {
        let e = 0.081_819_190_842_6;
        for deg in [-60.0f64, -20.0, 0.0, 33.0, 70.0] {
            let phi = deg.to_radians();
            let ts = tsfn(phi, phi.sin(), e);
            let back = phi2(ts, e, "test").unwrap();
            assert!((back - phi).abs() < 1e-10);
        }
    }

    #[test]
    fn test_inv_mlfn_inverts_mlfn() {
        let es: f64 = 0.006_694_379_990_14;
        let en = enfn(es);
        for deg in [-75.0f64, -30.0, 0.0, 15.0, 60.0] {
            let phi = deg.to_radians();
            let ml = mlfn(phi, phi.sin(), phi.cos(), &en);
            let back = inv_mlfn(ml, es, &en, "test").unwrap();
            assert!((back - phi).abs() < 1e-11);
        }
    }

    #[test]
    fn test_phi1_albers_inverts_qsfn() {
        let es: f64 = 0.006_694_379_990_14;
        let e = es.sqrt();
        let one_es = 1.0 - es;
        let phi = 0.7f64;
        let q = qsfn(phi.sin(), e, one_es);
        assert!((phi1_albers(q, e, one_es).unwrap() - phi).abs() < 1e-10);
    }
}
