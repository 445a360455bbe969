//! Parsing and writing PROJ-style definition strings
//! (`+proj=lcc +lat_1=33 +lat_2=45 +lon_0=-97 +ellps=GRS80`).

use crate::ellipsoid::Ellipsoid;
use crate::error::{ProjectionError, Result};
use crate::kind::ProjectionKind;
use crate::params::ProjectionParams;
use crate::transform::Projection;
use crate::transverse_mercator::utm_params;
use std::fmt::Write;

fn parse_number(key: &str, value: Option<&str>) -> Result<f64> {
    let value = value.ok_or_else(|| ProjectionError::invalid_parameter(key, "missing value"))?;
    value
        .parse::<f64>()
        .ok()
        .filter(|v| v.is_finite())
        .ok_or_else(|| ProjectionError::invalid_parameter(key, format!("not a number: {}", value)))
}

/// Output units per metre for a PROJ `+units=` name.
fn units_per_meter(units: &str) -> Option<f64> {
    match units {
        "m" => Some(1.0),
        "km" => Some(0.001),
        "ft" => Some(1.0 / 0.3048),
        "us-ft" => Some(3937.0 / 1200.0),
        _ => None,
    }
}

impl Projection {
    /// Parse a PROJ definition string.
    ///
    /// Unknown keys are logged and ignored. `+proj=utm` is expanded to a
    /// transverse Mercator with the zone's central meridian and offsets.
    pub fn from_proj_string(definition: &str) -> Result<Self> {
        let mut kind = None;
        let mut utm = false;
        let mut params = ProjectionParams::default();
        let mut lat_1 = None;
        let mut lat_2 = None;
        let mut ellps: Option<Ellipsoid> = None;
        let mut radius_r = None;
        let mut a = None;
        let mut b = None;
        let mut rf = None;
        let mut zone = None;
        let mut south = false;

        for token in definition.split_whitespace() {
            let token = token.trim_start_matches('+');
            if token.is_empty() {
                continue;
            }
            let (key, value) = match token.split_once('=') {
                Some((k, v)) => (k, Some(v)),
                None => (token, None),
            };

            match key {
                "proj" => {
                    let name = value.unwrap_or_default();
                    utm = name.eq_ignore_ascii_case("utm");
                    kind = Some(ProjectionKind::from_proj_name(name).ok_or_else(|| {
                        ProjectionError::Unsupported(format!("projection '{}'", name))
                    })?);
                }
                "lon_0" => params.center_lon = parse_number(key, value)?,
                "lat_0" => params.center_lat = parse_number(key, value)?,
                "lat_1" => lat_1 = Some(parse_number(key, value)?),
                "lat_2" => lat_2 = Some(parse_number(key, value)?),
                "lat_ts" => params.true_scale_lat = Some(parse_number(key, value)?),
                "k_0" | "k" => params.scale_factor = parse_number(key, value)?,
                "x_0" => params.false_easting = parse_number(key, value)?,
                "y_0" => params.false_northing = parse_number(key, value)?,
                "h" => params.height_of_orbit = parse_number(key, value)?,
                "sweep" => {
                    params.sweep_x = match value {
                        Some("x") => true,
                        Some("y") => false,
                        other => {
                            return Err(ProjectionError::invalid_parameter(
                                "sweep",
                                format!("expected x or y, got {:?}", other),
                            ))
                        }
                    }
                }
                "ellps" | "datum" => {
                    let name = value.unwrap_or_default();
                    ellps = Some(Ellipsoid::by_name(name).ok_or_else(|| {
                        ProjectionError::Unsupported(format!("ellipsoid '{}'", name))
                    })?);
                }
                "R" => radius_r = Some(parse_number(key, value)?),
                "a" => a = Some(parse_number(key, value)?),
                "b" => b = Some(parse_number(key, value)?),
                "rf" => rf = Some(parse_number(key, value)?),
                "zone" => {
                    let z = parse_number(key, value)?;
                    if z.fract() != 0.0 || !(1.0..=60.0).contains(&z) {
                        return Err(ProjectionError::invalid_parameter(
                            "zone",
                            format!("UTM zone {} outside 1-60", z),
                        ));
                    }
                    zone = Some(z as u8);
                }
                "south" => south = true,
                "units" => {
                    let units = value.unwrap_or_default();
                    params.unit_conversion = units_per_meter(units).ok_or_else(|| {
                        ProjectionError::Unsupported(format!("units '{}'", units))
                    })?;
                }
                "to_meter" => {
                    let to_meter = parse_number(key, value)?;
                    if to_meter <= 0.0 {
                        return Err(ProjectionError::invalid_parameter(
                            "to_meter",
                            "must be positive",
                        ));
                    }
                    params.unit_conversion = 1.0 / to_meter;
                }
                "no_defs" | "type" | "wktext" => {}
                _ => {
                    tracing::warn!(
                        key,
                        value = value.unwrap_or_default(),
                        "Ignoring unsupported PROJ parameter"
                    );
                }
            }
        }

        let kind = kind.ok_or_else(|| {
            ProjectionError::invalid_parameter("proj", "definition has no +proj")
        })?;

        params.ellipsoid = match (radius_r, a) {
            (Some(r), _) => Ellipsoid::new("sphere", r, 0.0),
            (None, Some(a)) => match (b, rf) {
                (Some(b), _) => Ellipsoid::from_radii("custom", a, b),
                (None, Some(rf)) => Ellipsoid::from_inverse_flattening("custom", a, rf),
                (None, None) => Ellipsoid::new("sphere", a, 0.0),
            },
            (None, None) => ellps.unwrap_or_default(),
        };

        // A single +lat_1 describes a tangent cone
        if let Some(lat_1) = lat_1 {
            params.standard_parallel1 = lat_1;
            params.standard_parallel2 = lat_2.unwrap_or(lat_1);
        } else if let Some(lat_2) = lat_2 {
            params.standard_parallel2 = lat_2;
        }

        if utm {
            let zone = zone.ok_or_else(|| {
                ProjectionError::invalid_parameter("zone", "+proj=utm requires +zone")
            })?;
            params = utm_params(zone, south, params)?;
        }

        Projection::new(kind, params)
    }

    /// Write the projection as a PROJ definition string.
    pub fn to_proj_string(&self) -> String {
        let p = self.params();
        let mut out = format!("+proj={}", self.name());

        // Infallible for String
        let mut push = |key: &str, value: f64| {
            let _ = write!(out, " +{}={}", key, value);
        };

        if !self.is_geographic() {
            push("lat_0", p.center_lat);
            push("lon_0", p.center_lon);
            if matches!(
                self.kind(),
                ProjectionKind::LambertConformalConic | ProjectionKind::AlbersEqualArea
            ) {
                push("lat_1", p.standard_parallel1);
                push("lat_2", p.standard_parallel2);
            }
            if let Some(lat_ts) = p.true_scale_lat {
                push("lat_ts", lat_ts);
            }
            if p.scale_factor != 1.0 {
                push("k_0", p.scale_factor);
            }
            if p.false_easting != 0.0 {
                push("x_0", p.false_easting);
            }
            if p.false_northing != 0.0 {
                push("y_0", p.false_northing);
            }
            if self.kind() == ProjectionKind::Geostationary {
                push("h", p.height_of_orbit);
            }
            if p.unit_conversion != 1.0 {
                push("to_meter", 1.0 / p.unit_conversion);
            }
        }

        let ellipsoid = &p.ellipsoid;
        match Ellipsoid::by_name(&ellipsoid.name) {
            Some(named) if named == *ellipsoid && named.name != "sphere" => {
                let _ = write!(out, " +ellps={}", named.name);
            }
            _ if ellipsoid.is_sphere() => {
                let _ = write!(out, " +R={}", ellipsoid.equator_radius);
            }
            _ => {
                let _ = write!(
                    out,
                    " +a={} +b={}",
                    ellipsoid.equator_radius,
                    ellipsoid.pole_radius()
                );
            }
        }

        if self.kind() == ProjectionKind::Geostationary {
            out.push_str(if p.sweep_x { " +sweep=x" } else { " +sweep=y" });
        }
        out.push_str(" +no_defs");
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_lcc() {
        let proj = Projection::from_proj_string(
            "+proj=lcc +lat_0=38.5 +lon_0=-97.5 +lat_1=38.5 +lat_2=38.5 +R=6371229 +no_defs",
        )
        .unwrap();
        assert_eq!(proj.kind(), ProjectionKind::LambertConformalConic);
        assert_eq!(proj.params().center_lon, -97.5);
        assert!(proj.params().ellipsoid.is_sphere());
        assert_eq!(proj.params().ellipsoid.equator_radius, 6_371_229.0);
    }

    #[test]
    fn test_single_parallel_is_tangent() {
        let proj = Projection::from_proj_string("+proj=lcc +lat_1=25 +lon_0=-95").unwrap();
        assert_eq!(proj.params().standard_parallel2, 25.0);
    }

    #[test]
    fn test_parse_utm() {
        let proj = Projection::from_proj_string("+proj=utm +zone=18 +ellps=WGS84").unwrap();
        assert_eq!(proj.kind(), ProjectionKind::TransverseMercator);
        assert_eq!(proj.params().center_lon, -75.0);
        assert_eq!(proj.params().false_easting, 500_000.0);
        assert!(Projection::from_proj_string("+proj=utm").is_err());
    }

    #[test]
    fn test_unknown_projection_is_unsupported() {
        assert!(matches!(
            Projection::from_proj_string("+proj=robin"),
            Err(ProjectionError::Unsupported(_))
        ));
        assert!(Projection::from_proj_string("+lon_0=10").is_err());
        assert!(Projection::from_proj_string("+proj=merc +lon_0=abc").is_err());
    }

    #[test]
    fn test_units() {
        let proj = Projection::from_proj_string("+proj=merc +units=km +R=6371000").unwrap();
        assert_eq!(proj.params().unit_conversion, 0.001);
    }

    #[test]
    fn test_proj_string_roundtrip() {
        let definitions = [
            "+proj=geos +lon_0=-75 +h=35786023 +ellps=GRS80 +sweep=x",
            "+proj=aea +lat_0=23 +lon_0=-96 +lat_1=29.5 +lat_2=45.5 +ellps=clrk66",
            "+proj=stere +lat_0=90 +lon_0=-105 +lat_ts=60 +a=6371229 +b=6371229",
            "+proj=tmerc +lon_0=9 +k_0=0.9996 +x_0=500000 +a=6378137 +rf=298.257223563",
            "+proj=longlat +ellps=WGS84",
        ];
        for definition in definitions {
            let proj = Projection::from_proj_string(definition).unwrap();
            let written = proj.to_proj_string();
            let back = Projection::from_proj_string(&written).unwrap();
            assert_eq!(proj, back, "{} -> {}", definition, written);
        }
    }
}
