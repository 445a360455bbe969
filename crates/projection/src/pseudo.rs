//! Pseudo-cylindrical equal-area projections on the sphere.

use crate::error::{ProjectionError, Result};
use crate::kind::ProjectionCore;
use crate::math::{asin_clamped, EPS10, HALF_PI};
use std::f64::consts::{PI, SQRT_2};

/// Sinusoidal (Sanson-Flamsteed).
#[derive(Debug, Clone, Copy, Default)]
pub struct Sinusoidal;

impl ProjectionCore for Sinusoidal {
    fn forward(&self, lam: f64, phi: f64) -> Result<(f64, f64)> {
        Ok((lam * phi.cos(), phi))
    }

    fn inverse(&self, x: f64, y: f64) -> Result<(f64, f64)> {
        if y.abs() - HALF_PI > EPS10 {
            return Err(ProjectionError::domain("sinu", "northing beyond the pole"));
        }
        let phi = y.clamp(-HALF_PI, HALF_PI);
        let cosphi = phi.cos();
        if cosphi < EPS10 {
            return Ok((0.0, phi));
        }
        let lam = x / cosphi;
        if lam.abs() - PI > EPS10 {
            return Err(ProjectionError::domain("sinu", "point is outside the map"));
        }
        Ok((lam, phi))
    }

    fn is_equal_area(&self) -> bool {
        true
    }
}

const C_X: f64 = 2.0 * SQRT_2 / PI;
const C_Y: f64 = SQRT_2;
const C_P: f64 = PI;
const MAX_ITER: usize = 10;
const LOOP_TOL: f64 = 1e-7;

/// Mollweide (homalographic).
#[derive(Debug, Clone, Copy, Default)]
pub struct Mollweide;

impl Mollweide {
    /// Solve 2θ + sin 2θ = π sin φ for the auxiliary angle θ.
    fn auxiliary_angle(phi: f64) -> f64 {
        let k = C_P * phi.sin();
        let mut theta = phi;
        for _ in 0..MAX_ITER {
            let v = (theta + theta.sin() - k) / (1.0 + theta.cos());
            theta -= v;
            if v.abs() < LOOP_TOL {
                return 0.5 * theta;
            }
        }
        // Newton stalls next to the poles where the derivative vanishes.
        HALF_PI.copysign(phi)
    }
}

impl ProjectionCore for Mollweide {
    fn forward(&self, lam: f64, phi: f64) -> Result<(f64, f64)> {
        let theta = Self::auxiliary_angle(phi);
        Ok((C_X * lam * theta.cos(), C_Y * theta.sin()))
    }

    fn inverse(&self, x: f64, y: f64) -> Result<(f64, f64)> {
        let s = y / C_Y;
        if s.abs() - 1.0 > EPS10 {
            return Err(ProjectionError::domain("moll", "northing beyond the pole"));
        }
        let theta = asin_clamped(s);
        let cos_theta = theta.cos();
        let lam = if cos_theta < EPS10 { 0.0 } else { x / (C_X * cos_theta) };
        if lam.abs() - PI > EPS10 {
            return Err(ProjectionError::domain("moll", "point is outside the ellipse"));
        }
        let two_theta = theta + theta;
        Ok((lam, asin_clamped((two_theta + two_theta.sin()) / C_P)))
    }

    fn is_equal_area(&self) -> bool {
        true
    }
}
