//! Projection parameters and the constants derived from them.
//!
//! Parameters are plain values fixed at construction. [`initialize`] turns them
//! into [`DerivedConstants`]; changing a parameter means building a new
//! projection, never mutating one in place.

use crate::ellipsoid::Ellipsoid;
use serde::{Deserialize, Serialize};

/// User-facing projection parameters. Angles are in degrees.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProjectionParams {
    pub ellipsoid: Ellipsoid,
    /// Central meridian (lon_0)
    pub center_lon: f64,
    /// Latitude of origin (lat_0)
    pub center_lat: f64,
    /// First standard parallel (lat_1)
    pub standard_parallel1: f64,
    /// Second standard parallel (lat_2)
    pub standard_parallel2: f64,
    /// Latitude of true scale (lat_ts), if given
    pub true_scale_lat: Option<f64>,
    /// Scale factor at the origin (k_0)
    pub scale_factor: f64,
    /// False easting (meters)
    pub false_easting: f64,
    /// False northing (meters)
    pub false_northing: f64,
    /// Satellite height above the ellipsoid surface (meters), geostationary only
    pub height_of_orbit: f64,
    /// Geostationary sweep axis: true for "x" (GOES), false for "y" (Meteosat)
    pub sweep_x: bool,
    /// Output units per meter
    pub unit_conversion: f64,
}

impl Default for ProjectionParams {
    fn default() -> Self {
        Self {
            ellipsoid: Ellipsoid::wgs84(),
            center_lon: 0.0,
            center_lat: 0.0,
            standard_parallel1: 0.0,
            standard_parallel2: 0.0,
            true_scale_lat: None,
            scale_factor: 1.0,
            false_easting: 0.0,
            false_northing: 0.0,
            height_of_orbit: 35_785_831.0,
            sweep_x: false,
            unit_conversion: 1.0,
        }
    }
}

impl ProjectionParams {
    pub fn new(ellipsoid: Ellipsoid) -> Self {
        Self {
            ellipsoid,
            ..Self::default()
        }
    }

    pub fn with_ellipsoid(mut self, ellipsoid: Ellipsoid) -> Self {
        self.ellipsoid = ellipsoid;
        self
    }

    pub fn with_center(mut self, lon: f64, lat: f64) -> Self {
        self.center_lon = lon;
        self.center_lat = lat;
        self
    }

    pub fn with_standard_parallels(mut self, lat1: f64, lat2: f64) -> Self {
        self.standard_parallel1 = lat1;
        self.standard_parallel2 = lat2;
        self
    }

    pub fn with_true_scale_lat(mut self, lat: f64) -> Self {
        self.true_scale_lat = Some(lat);
        self
    }

    pub fn with_scale_factor(mut self, k0: f64) -> Self {
        self.scale_factor = k0;
        self
    }

    pub fn with_false_origin(mut self, easting: f64, northing: f64) -> Self {
        self.false_easting = easting;
        self.false_northing = northing;
        self
    }

    pub fn with_height_of_orbit(mut self, h: f64) -> Self {
        self.height_of_orbit = h;
        self
    }

    pub fn with_sweep_x(mut self, sweep_x: bool) -> Self {
        self.sweep_x = sweep_x;
        self
    }

    pub fn with_unit_conversion(mut self, units_per_meter: f64) -> Self {
        self.unit_conversion = units_per_meter;
        self
    }

    /// GOES-East (GOES-16/19) full-disk geometry at 75°W.
    pub fn goes_east() -> Self {
        Self::new(Ellipsoid::grs80())
            .with_center(-75.0, 0.0)
            .with_height_of_orbit(35_786_023.0)
            .with_sweep_x(true)
    }

    /// GOES-West (GOES-18) full-disk geometry at 137.2°W.
    pub fn goes_west() -> Self {
        Self::goes_east().with_center(-137.2, 0.0)
    }

    /// HRRR Lambert Conformal grid definition (tangent cone at 38.5°N, LoV 97.5°W).
    pub fn hrrr() -> Self {
        Self::new(Ellipsoid::new("hrrr", 6_371_229.0, 0.0))
            .with_center(-97.5, 38.5)
            .with_standard_parallels(38.5, 38.5)
    }

    /// Scalar parameters compared for exact equality.
    pub(crate) fn scalars(&self) -> [f64; 9] {
        [
            self.false_easting,
            self.false_northing,
            self.scale_factor,
            self.center_lon,
            self.center_lat,
            self.standard_parallel1,
            self.standard_parallel2,
            self.height_of_orbit,
            self.unit_conversion,
        ]
    }
}

/// Constants derived from [`ProjectionParams`] by [`initialize`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DerivedConstants {
    /// Equatorial radius (meters)
    pub a: f64,
    /// Squared eccentricity
    pub es: f64,
    /// Eccentricity
    pub e: f64,
    /// 1 - e²
    pub one_es: f64,
    /// 1 / (1 - e²)
    pub rone_es: f64,
    /// Zero eccentricity
    pub spherical: bool,
    /// Equatorial radius times unit conversion
    pub total_scale: f64,
    pub total_false_easting: f64,
    pub total_false_northing: f64,
    /// Central meridian (radians)
    pub lam0: f64,
    /// Latitude of origin (radians)
    pub phi0: f64,
}

/// Compute the derived constants for a parameter set.
pub fn initialize(params: &ProjectionParams) -> DerivedConstants {
    let es = params.ellipsoid.eccentricity2;
    let one_es = 1.0 - es;
    DerivedConstants {
        a: params.ellipsoid.equator_radius,
        es,
        e: es.sqrt(),
        one_es,
        rone_es: 1.0 / one_es,
        spherical: es == 0.0,
        total_scale: params.ellipsoid.equator_radius * params.unit_conversion,
        total_false_easting: params.false_easting * params.unit_conversion,
        total_false_northing: params.false_northing * params.unit_conversion,
        lam0: params.center_lon.to_radians(),
        phi0: params.center_lat.to_radians(),
    }
}
