//! Geographic pass-through and the equidistant cylindrical (Plate Carrée).

use crate::error::{ProjectionError, Result};
use crate::kind::ProjectionCore;
use crate::params::{DerivedConstants, ProjectionParams};

/// Longitude/latitude "projection": coordinates stay angular.
#[derive(Debug, Clone, Copy)]
pub struct LongLat;

impl ProjectionCore for LongLat {
    fn forward(&self, lam: f64, phi: f64) -> Result<(f64, f64)> {
        Ok((lam, phi))
    }

    fn inverse(&self, x: f64, y: f64) -> Result<(f64, f64)> {
        Ok((x, y))
    }

    fn is_geographic(&self) -> bool {
        true
    }
}

/// Equidistant cylindrical, true to scale along `lat_ts`.
#[derive(Debug, Clone, Copy)]
pub struct Equirectangular {
    /// cos(lat_ts)
    rc: f64,
    phi0: f64,
}

impl Equirectangular {
    pub fn new(params: &ProjectionParams, derived: &DerivedConstants) -> Result<Self> {
        let rc = params.true_scale_lat.unwrap_or(0.0).to_radians().cos();
        if rc <= 0.0 {
            return Err(ProjectionError::invalid_parameter(
                "lat_ts",
                "true scale latitude must be inside (-90, 90)",
            ));
        }
        Ok(Self {
            rc,
            phi0: derived.phi0,
        })
    }
}

impl ProjectionCore for Equirectangular {
    fn forward(&self, lam: f64, phi: f64) -> Result<(f64, f64)> {
        Ok((self.rc * lam, phi - self.phi0))
    }

    fn inverse(&self, x: f64, y: f64) -> Result<(f64, f64)> {
        Ok((x / self.rc, y + self.phi0))
    }
}
