//! Map projections on the sphere and ellipsoid.
//!
//! Implements the PROJ formulas for the projections used with gridded
//! weather and climate data (Lambert conformal, polar stereographic,
//! geostationary, Mercator, ...) from scratch without external dependencies.
//!
//! ```ignore
//! use projection::{Projection, ProjectionKind, ProjectionParams};
//!
//! let lcc = Projection::new(ProjectionKind::LambertConformalConic, ProjectionParams::hrrr())?;
//! let (x, y) = lcc.project(-97.5, 38.5)?;
//! let (lon, lat) = lcc.project_inverse(x, y)?;
//! ```

pub mod albers;
pub mod azimuthal;
pub mod cylindrical;
pub mod ellipsoid;
pub mod error;
pub mod geographic;
pub mod geostationary;
pub mod kind;
pub mod lambert;
pub mod math;
pub mod mercator;
pub mod params;
pub mod polar;
pub mod proj_string;
pub mod pseudo;
pub mod transform;
pub mod transverse_mercator;

pub use ellipsoid::Ellipsoid;
pub use error::{ProjectionError, Result};
pub use kind::{ProjectionCore, ProjectionKind};
pub use math::{normalize_longitude, normalize_longitude_degrees};
pub use params::{initialize, DerivedConstants, ProjectionParams};
pub use transform::Projection;
pub use transverse_mercator::{utm_params, utm_zone};
