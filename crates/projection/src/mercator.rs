//! Mercator projection on the sphere and ellipsoid.

use crate::error::{ProjectionError, Result};
use crate::kind::ProjectionCore;
use crate::math::{msfn, phi2, tsfn, EPS10, HALF_PI, QUARTER_PI};
use crate::params::{DerivedConstants, ProjectionParams};

/// Normal-aspect Mercator. Scale is either `k_0` or taken from `lat_ts`.
#[derive(Debug, Clone, Copy)]
pub struct Mercator {
    k0: f64,
    e: f64,
    spherical: bool,
}

impl Mercator {
    pub fn new(params: &ProjectionParams, derived: &DerivedConstants) -> Result<Self> {
        let k0 = match params.true_scale_lat {
            Some(lat_ts) => {
                let phits = lat_ts.to_radians();
                if phits.abs() >= HALF_PI {
                    return Err(ProjectionError::invalid_parameter(
                        "lat_ts",
                        "true scale latitude must be inside (-90, 90)",
                    ));
                }
                if derived.spherical {
                    phits.cos()
                } else {
                    msfn(phits.sin(), phits.cos(), derived.es)
                }
            }
            None => params.scale_factor,
        };
        Ok(Self {
            k0,
            e: derived.e,
            spherical: derived.spherical,
        })
    }
}

impl ProjectionCore for Mercator {
    fn forward(&self, lam: f64, phi: f64) -> Result<(f64, f64)> {
        if (phi.abs() - HALF_PI).abs() <= EPS10 {
            return Err(ProjectionError::domain("merc", "pole maps to infinity"));
        }
        let y = if self.spherical {
            self.k0 * (QUARTER_PI + 0.5 * phi).tan().ln()
        } else {
            -self.k0 * tsfn(phi, phi.sin(), self.e).ln()
        };
        Ok((self.k0 * lam, y))
    }

    fn inverse(&self, x: f64, y: f64) -> Result<(f64, f64)> {
        let phi = if self.spherical {
            HALF_PI - 2.0 * (-y / self.k0).exp().atan()
        } else {
            phi2((-y / self.k0).exp(), self.e, "merc")?
        };
        Ok((x / self.k0, phi))
    }

    fn is_conformal(&self) -> bool {
        true
    }
}
