//! Configuration for contour generation.

use crate::error::{ContourError, Result};
use crate::grid::Grid;
use crate::levels::{generate_contour_levels, nice_contour_levels, normalize_levels};
use crate::mapper::normalize_axes;
use serde::{Deserialize, Serialize};

/// Upper bound on smoothing subdivisions per segment.
const MAX_SMOOTHING: usize = 32;

/// Settings for a contouring run.
///
/// Level selection precedence: explicit `levels`, then `interval`, then
/// `level_count` "nice" levels spread over the data range.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ContourConfig {
    /// Explicit contour levels. Sorted and deduplicated before use.
    pub levels: Vec<f64>,

    /// Spacing for automatically generated levels.
    pub interval: Option<f64>,

    /// Approximate number of automatic levels when no interval is set.
    pub level_count: usize,

    /// Catmull-Rom points inserted per line segment (0 disables smoothing).
    pub smoothing: usize,

    /// Sentinel marking missing samples, in addition to NaN.
    pub missing_value: Option<f64>,

    /// Trace levels in parallel.
    pub parallel: bool,
}

impl Default for ContourConfig {
    fn default() -> Self {
        Self {
            levels: Vec::new(),
            interval: None,
            level_count: 10,
            smoothing: 0,
            missing_value: None,
            parallel: true,
        }
    }
}

impl ContourConfig {
    /// Config with an explicit level set.
    pub fn with_levels(levels: impl Into<Vec<f64>>) -> Self {
        Self {
            levels: levels.into(),
            ..Self::default()
        }
    }

    /// Config with levels every `interval` units.
    pub fn with_interval(interval: f64) -> Self {
        Self {
            interval: Some(interval),
            ..Self::default()
        }
    }

    /// Load configuration from environment variables.
    pub fn from_env() -> Self {
        let mut config = Self::default();

        if let Ok(val) = std::env::var("CONTOUR_LEVELS") {
            let levels: Vec<f64> = val
                .split(',')
                .filter_map(|s| s.trim().parse().ok())
                .collect();
            if !levels.is_empty() {
                config.levels = levels;
            }
        }

        if let Ok(val) = std::env::var("CONTOUR_INTERVAL") {
            if let Ok(interval) = val.parse() {
                config.interval = Some(interval);
            }
        }

        if let Ok(val) = std::env::var("CONTOUR_LEVEL_COUNT") {
            if let Ok(count) = val.parse() {
                config.level_count = count;
            }
        }

        if let Ok(val) = std::env::var("CONTOUR_SMOOTHING") {
            if let Ok(subdivisions) = val.parse() {
                config.smoothing = subdivisions;
            }
        }

        if let Ok(val) = std::env::var("CONTOUR_MISSING_VALUE") {
            if let Ok(missing) = val.parse() {
                config.missing_value = Some(missing);
            }
        }

        if let Ok(val) = std::env::var("CONTOUR_PARALLEL") {
            config.parallel = val.to_lowercase() == "true" || val == "1";
        }

        config
    }

    /// Validate the configuration.
    pub fn validate(&self) -> Result<()> {
        if let Some(bad) = self.levels.iter().find(|l| !l.is_finite()) {
            return Err(ContourError::invalid_config(format!(
                "contour level {} is not finite",
                bad
            )));
        }

        if let Some(interval) = self.interval {
            if !interval.is_finite() || interval <= 0.0 {
                return Err(ContourError::invalid_config(format!(
                    "interval must be positive, got {}",
                    interval
                )));
            }
        }

        if self.levels.is_empty() && self.interval.is_none() && self.level_count == 0 {
            return Err(ContourError::invalid_config(
                "no levels, interval or level count given",
            ));
        }

        if self.smoothing > MAX_SMOOTHING {
            return Err(ContourError::invalid_config(format!(
                "smoothing must be at most {}, got {}",
                MAX_SMOOTHING, self.smoothing
            )));
        }

        if matches!(self.missing_value, Some(m) if m.is_infinite()) {
            return Err(ContourError::invalid_config(
                "missing value sentinel must be finite or NaN",
            ));
        }

        Ok(())
    }

    /// Ascending, unique levels for data spanning `[min, max]`.
    pub fn resolve_levels(&self, min: f64, max: f64) -> Vec<f64> {
        if !self.levels.is_empty() {
            normalize_levels(&self.levels)
        } else if let Some(interval) = self.interval {
            generate_contour_levels(min, max, interval)
        } else {
            nice_contour_levels(min, max, self.level_count)
        }
    }

    /// Build a grid from raw axes, flipping descending axes and applying
    /// the configured missing-value sentinel.
    pub fn grid(&self, x: Vec<f64>, y: Vec<f64>, data: Vec<f64>) -> Result<Grid> {
        normalize_axes(x, y, data)?.into_grid(self.missing_value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_is_valid() {
        let config = ContourConfig::default();
        assert!(config.validate().is_ok());
        assert!(config.parallel);
        assert_eq!(config.smoothing, 0);
    }

    #[test]
    fn test_validate_rejects_bad_interval() {
        let config = ContourConfig::with_interval(0.0);
        assert!(matches!(
            config.validate(),
            Err(ContourError::InvalidConfig(_))
        ));

        let config = ContourConfig::with_interval(f64::NAN);
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_validate_rejects_non_finite_level() {
        let config = ContourConfig::with_levels(vec![1.0, f64::INFINITY]);
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_validate_rejects_excessive_smoothing() {
        let config = ContourConfig {
            smoothing: 1000,
            ..ContourConfig::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_resolve_levels_precedence() {
        let explicit = ContourConfig {
            levels: vec![30.0, 10.0, 10.0],
            interval: Some(5.0),
            ..ContourConfig::default()
        };
        assert_eq!(explicit.resolve_levels(0.0, 100.0), vec![10.0, 30.0]);

        let by_interval = ContourConfig::with_interval(25.0);
        assert_eq!(
            by_interval.resolve_levels(0.0, 100.0),
            vec![0.0, 25.0, 50.0, 75.0, 100.0]
        );

        let nice = ContourConfig::default();
        assert_eq!(
            nice.resolve_levels(0.0, 100.0),
            vec![0.0, 10.0, 20.0, 30.0, 40.0, 50.0, 60.0, 70.0, 80.0, 90.0, 100.0]
        );
    }

    #[test]
    fn test_serde_defaults_missing_fields() {
        let config: ContourConfig = serde_json::from_str(r#"{"interval": 2.5}"#).unwrap();
        assert_eq!(config.interval, Some(2.5));
        assert_eq!(config.level_count, 10);
        assert!(config.levels.is_empty());
    }

    #[test]
    fn test_grid_applies_missing_value() {
        let config = ContourConfig {
            missing_value: Some(-9999.0),
            ..ContourConfig::default()
        };
        let grid = config
            .grid(
                vec![0.0, 1.0],
                vec![1.0, 0.0],
                vec![1.0, 2.0, -9999.0, 4.0],
            )
            .unwrap();
        // Rows flipped: the sentinel row now comes first.
        assert!(grid.is_missing(grid.value(0, 0)));
        assert_eq!(grid.value(1, 1), 2.0);
        assert_eq!(grid.y(), &[0.0, 1.0]);
    }
}
