//! Contour lines and filled contour polygons for gridded scalar fields.
//!
//! The pipeline is: a [`Grid`] of samples, a level set resolved from a
//! [`ContourConfig`], lines traced per level ([`trace_contour_lines`]),
//! optional Catmull-Rom smoothing, and polygons for each band between
//! consecutive levels ([`build_polygons`]). Coordinate helpers in [`mapper`]
//! flip descending axes, embed slices of 3-D volumes and project results
//! through a [`projection::Projection`].
//!
//! ```ignore
//! use contour::{contour_polygons, ContourConfig, Grid};
//!
//! let grid = Grid::new(x, y, data, Some(-9999.0))?;
//! let polygons = contour_polygons(&grid, &ContourConfig::with_interval(5.0))?;
//! ```

pub mod border;
pub mod config;
pub mod error;
pub mod grid;
pub mod levels;
pub mod mapper;
pub mod polygon;
pub mod smooth;
pub mod trace;

pub use border::{border_rings, BorderDirection, BorderRecord, BorderRing, BorderSegment, CellSide};
pub use config::ContourConfig;
pub use error::{ContourError, Result};
pub use grid::Grid;
pub use levels::{generate_contour_levels, nice_contour_levels, normalize_levels};
pub use mapper::{
    embed_line, embed_polygon, index_to_world, normalize_axes, project_line, project_polygon,
    world_to_index, AxisOrder, EmbeddedPolygon, NormalizedAxes, SlicePlane,
};
pub use polygon::{bracket_band, build_polygons, point_in_ring, signed_area, ContourPolygon};
pub use smooth::{smooth_line, smooth_lines};
pub use trace::{trace_contour_lines, trace_contour_lines_with, ContourLines, PolyLine, SaddleCell};

use std::borrow::Cow;
use tracing::debug;

/// Resolve levels, trace and optionally smooth contour lines.
pub fn contour_lines(grid: &Grid, config: &ContourConfig) -> Result<ContourLines> {
    config.validate()?;
    let grid = with_config_sentinel(grid, config)?;
    let Some(levels) = resolve(&grid, config) else {
        return Ok(ContourLines::default());
    };

    let traced = trace_contour_lines_with(&grid, &levels, config.parallel);
    if config.smoothing > 0 {
        Ok(traced.smoothed(&grid, config.smoothing))
    } else {
        Ok(traced)
    }
}

/// Resolve levels, trace and build filled polygons for every band.
pub fn contour_polygons(grid: &Grid, config: &ContourConfig) -> Result<Vec<ContourPolygon>> {
    config.validate()?;
    let grid = with_config_sentinel(grid, config)?;
    let Some(levels) = resolve(&grid, config) else {
        return Ok(Vec::new());
    };

    let mut traced = trace_contour_lines_with(&grid, &levels, config.parallel);
    if config.smoothing > 0 {
        traced = traced.smoothed(&grid, config.smoothing);
    }
    Ok(build_polygons(&grid, &traced, &levels))
}

/// The grid with the configured sentinel applied when it has none of its own.
fn with_config_sentinel<'a>(grid: &'a Grid, config: &ContourConfig) -> Result<Cow<'a, Grid>> {
    match (grid.missing(), config.missing_value) {
        (None, Some(sentinel)) => Ok(Cow::Owned(grid.with_missing(Some(sentinel)))),
        (Some(own), Some(sentinel)) if own != sentinel => Err(ContourError::invalid_config(format!(
            "grid missing value {} differs from configured {}",
            own, sentinel
        ))),
        _ => Ok(Cow::Borrowed(grid)),
    }
}

/// Levels for this grid, or `None` when there is nothing to contour.
fn resolve(grid: &Grid, config: &ContourConfig) -> Option<Vec<f64>> {
    let (data_min, data_max) = grid.value_range()?;
    let levels = config.resolve_levels(data_min, data_max);

    debug!(
        nx = grid.nx(),
        ny = grid.ny(),
        data_min,
        data_max,
        num_levels = levels.len(),
        first_level = ?levels.first(),
        last_level = ?levels.last(),
        "Contour input"
    );

    (!levels.is_empty()).then_some(levels)
}
