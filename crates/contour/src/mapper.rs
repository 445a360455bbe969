//! Mapping between grid indices, world coordinates, 3-D slices and map projections.

use crate::error::{ContourError, Result};
use crate::grid::Grid;
use crate::polygon::{signed_area, ContourPolygon};
use crate::trace::PolyLine;
use geo_common::{BoundingBox, PointD};
use nalgebra::Point3;
use projection::{Projection, ProjectionError};
use serde::{Deserialize, Serialize};

/// Which axes were flipped to make them ascending.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AxisOrder {
    pub x_reversed: bool,
    pub y_reversed: bool,
}

/// Axes and data rearranged so both axes ascend.
#[derive(Debug, Clone, PartialEq)]
pub struct NormalizedAxes {
    pub x: Vec<f64>,
    pub y: Vec<f64>,
    pub data: Vec<f64>,
    pub order: AxisOrder,
}

impl NormalizedAxes {
    pub fn into_grid(self, missing: Option<f64>) -> Result<Grid> {
        Grid::new(self.x, self.y, self.data, missing)
    }
}

/// Reverse descending axes, moving the row-major data with them.
pub fn normalize_axes(
    mut x: Vec<f64>,
    mut y: Vec<f64>,
    mut data: Vec<f64>,
) -> Result<NormalizedAxes> {
    let (nx, ny) = (x.len(), y.len());
    if data.len() != nx * ny {
        return Err(ContourError::shape_mismatch(format!(
            "expected {} x {} = {} samples, got {}",
            nx,
            ny,
            nx * ny,
            data.len()
        )));
    }

    if nx == 0 || ny == 0 {
        return Ok(NormalizedAxes {
            x,
            y,
            data,
            order: AxisOrder::default(),
        });
    }

    let order = AxisOrder {
        x_reversed: is_descending("x", &x)?,
        y_reversed: is_descending("y", &y)?,
    };

    if order.x_reversed {
        x.reverse();
        for row in data.chunks_mut(nx) {
            row.reverse();
        }
    }
    if order.y_reversed {
        y.reverse();
        let rows: Vec<&[f64]> = data.chunks(nx).rev().collect();
        data = rows.concat();
    }

    Ok(NormalizedAxes { x, y, data, order })
}

fn is_descending(name: &'static str, axis: &[f64]) -> Result<bool> {
    if axis.len() < 2 {
        return Ok(false);
    }
    let descending = axis[1] < axis[0];
    let bad = axis.windows(2).position(|w| {
        let ordered = if descending { w[1] < w[0] } else { w[1] > w[0] };
        !ordered
    });
    match bad {
        Some(index) => Err(ContourError::NotMonotonic {
            axis: name,
            index: index + 1,
        }),
        None => Ok(descending),
    }
}

/// World coordinate of a fractional (row, column) grid index.
///
/// Indices outside the grid extrapolate from the nearest edge interval.
pub fn index_to_world(grid: &Grid, row: f64, col: f64) -> PointD {
    PointD::new(interpolate_axis(grid.x(), col), interpolate_axis(grid.y(), row))
}

/// Fractional (row, column) index of a world coordinate inside the grid.
pub fn world_to_index(grid: &Grid, p: PointD) -> Option<(f64, f64)> {
    Some((locate_on_axis(grid.y(), p.y)?, locate_on_axis(grid.x(), p.x)?))
}

fn interpolate_axis(axis: &[f64], f: f64) -> f64 {
    match axis.len() {
        0 => f64::NAN,
        1 => axis[0],
        n => {
            let k = (f.floor().max(0.0) as usize).min(n - 2);
            let t = f - k as f64;
            axis[k] + t * (axis[k + 1] - axis[k])
        }
    }
}

fn locate_on_axis(axis: &[f64], v: f64) -> Option<f64> {
    let (first, last) = (*axis.first()?, *axis.last()?);
    if !(v >= first && v <= last) {
        return None;
    }
    if axis.len() == 1 {
        return Some(0.0);
    }
    let k = axis.partition_point(|&a| a <= v).clamp(1, axis.len() - 1) - 1;
    Some(k as f64 + (v - axis[k]) / (axis[k + 1] - axis[k]))
}

/// Plane of a 2-D slice through a 3-D volume, with the fixed coordinate.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum SlicePlane {
    Xy { z: f64 },
    Xz { y: f64 },
    Yz { x: f64 },
}

impl SlicePlane {
    /// Place a slice point `(a, b)` in 3-D space.
    pub fn embed(&self, p: PointD) -> Point3<f64> {
        match *self {
            SlicePlane::Xy { z } => Point3::new(p.x, p.y, z),
            SlicePlane::Xz { y } => Point3::new(p.x, y, p.y),
            SlicePlane::Yz { x } => Point3::new(x, p.x, p.y),
        }
    }
}

/// A contour polygon placed in 3-D space.
#[derive(Debug, Clone, PartialEq)]
pub struct EmbeddedPolygon {
    pub outer: Vec<Point3<f64>>,
    pub holes: Vec<Vec<Point3<f64>>>,
    pub low_value: f64,
    pub high_value: f64,
}

pub fn embed_line(line: &PolyLine, plane: SlicePlane) -> Vec<Point3<f64>> {
    line.points.iter().map(|&p| plane.embed(p)).collect()
}

pub fn embed_polygon(polygon: &ContourPolygon, plane: SlicePlane) -> EmbeddedPolygon {
    let embed = |ring: &[PointD]| ring.iter().map(|&p| plane.embed(p)).collect::<Vec<_>>();
    EmbeddedPolygon {
        outer: embed(&polygon.outer),
        holes: polygon.holes.iter().map(|h| embed(h)).collect(),
        low_value: polygon.low_value,
        high_value: polygon.high_value,
    }
}

/// Project a (lon, lat) point, `None` when it has no image on the map.
fn project_point(projection: &Projection, p: PointD) -> Result<Option<PointD>> {
    match projection.project(p.x, p.y) {
        Ok((x, y)) if x.is_finite() && y.is_finite() => Ok(Some(PointD::new(x, y))),
        Ok(_) | Err(ProjectionError::Domain { .. }) => Ok(None),
        Err(e) => Err(e.into()),
    }
}

/// Project a line traced on a longitude/latitude grid.
///
/// Points without an image (off the visible disk, at a singular pole) are
/// dropped and split the line; pieces shorter than two points are discarded.
/// A closed line cut by gaps rejoins across its seam, so the piece through
/// its first point is not split there.
pub fn project_line(line: &PolyLine, projection: &Projection) -> Result<Vec<PolyLine>> {
    let mut runs: Vec<Vec<PointD>> = Vec::new();
    let mut current = Vec::new();
    let mut gaps = false;

    for &p in &line.points {
        match project_point(projection, p)? {
            Some(q) => current.push(q),
            None => {
                gaps = true;
                runs.push(std::mem::take(&mut current));
            }
        }
    }
    runs.push(current);

    let seam = |run: Option<&Vec<PointD>>| run.map_or(false, |r| !r.is_empty());
    if line.closed && gaps && runs.len() >= 2 && seam(runs.first()) && seam(runs.last()) {
        let first = runs.remove(0);
        if let Some(last) = runs.last_mut() {
            // The last point repeats the first
            last.extend(first.into_iter().skip(1));
        }
    }

    let closed = line.closed && !gaps;
    Ok(runs
        .into_iter()
        .filter(|points| points.len() >= 2)
        .map(|points| PolyLine::new(line.value, points, closed))
        .collect())
}

/// Project a polygon traced on a longitude/latitude grid.
///
/// Unprojectable points are dropped. Returns `None` when the outer ring
/// collapses. Winding is restored if the projection mirrors the plane.
pub fn project_polygon(
    polygon: &ContourPolygon,
    projection: &Projection,
) -> Result<Option<ContourPolygon>> {
    let Some(mut outer) = project_ring(&polygon.outer, projection)? else {
        return Ok(None);
    };
    let mut holes = Vec::with_capacity(polygon.holes.len());
    for hole in &polygon.holes {
        if let Some(ring) = project_ring(hole, projection)? {
            holes.push(ring);
        }
    }

    if signed_area(&outer) < 0.0 {
        outer.reverse();
        for hole in &mut holes {
            hole.reverse();
        }
    }

    let Some(extent) = BoundingBox::from_points(&outer) else {
        return Ok(None);
    };
    let hole_area: f64 = holes.iter().map(|h| signed_area(h).abs()).sum();
    Ok(Some(ContourPolygon {
        area: signed_area(&outer) - hole_area,
        extent,
        outer,
        holes,
        low_value: polygon.low_value,
        high_value: polygon.high_value,
        is_high_center: polygon.is_high_center,
        is_border: polygon.is_border,
    }))
}

fn project_ring(ring: &[PointD], projection: &Projection) -> Result<Option<Vec<PointD>>> {
    let mut points = Vec::with_capacity(ring.len());
    for &p in ring {
        if let Some(q) = project_point(projection, p)? {
            points.push(q);
        }
    }
    if let (Some(&first), Some(&last)) = (points.first(), points.last()) {
        if first != last {
            points.push(first);
        }
    }
    Ok((points.len() >= 4).then_some(points))
}
