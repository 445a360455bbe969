//! Catmull-Rom smoothing of contour lines.

use crate::grid::Grid;
use crate::mapper::world_to_index;
use crate::trace::PolyLine;
use geo_common::PointD;
use std::collections::HashMap;
use tracing::debug;

/// Smooth a line with a uniform Catmull-Rom spline through every original point.
///
/// `subdivisions` points are inserted between each pair of consecutive
/// points. Endpoints are kept exactly, and closed lines stay closed. The
/// spline may overshoot its knots; use [`smooth_lines`] for lines traced on
/// a grid.
pub fn smooth_line(line: &PolyLine, subdivisions: usize) -> PolyLine {
    let n = line.points.len();
    if subdivisions == 0 || n < 2 {
        return line.clone();
    }

    let closed = line.closed && n >= 3 && line.points[0] == line.points[n - 1];
    let knots = if closed {
        &line.points[..n - 1]
    } else {
        &line.points[..]
    };
    let m = knots.len();
    let segments = if closed { m } else { m - 1 };

    let mut points = Vec::with_capacity(n + (n - 1) * subdivisions);
    for k in 0..segments {
        let (p0, p1, p2, p3) = if closed {
            (
                knots[(k + m - 1) % m],
                knots[k],
                knots[(k + 1) % m],
                knots[(k + 2) % m],
            )
        } else {
            (
                knots[k.saturating_sub(1)],
                knots[k],
                knots[k + 1],
                knots[(k + 2).min(m - 1)],
            )
        };

        points.push(p1);
        for s in 1..=subdivisions {
            let t = s as f64 / (subdivisions + 1) as f64;
            points.push(catmull_rom(p0, p1, p2, p3, t));
        }
    }
    points.push(if closed { knots[0] } else { knots[m - 1] });

    PolyLine::new(line.value, points, line.closed)
}

/// Smooth lines traced on `grid` without introducing crossings.
///
/// The segment between two consecutive knots of a traced line lies in a
/// single grid cell. Spline points inserted on a segment must fall strictly
/// inside that cell, and the smoothed pieces sharing a cell must not cross
/// one another. A segment failing the first check, or every segment of a
/// cell failing the second, stays straight: its inserted points are spaced
/// evenly along the chord. Point counts are the same as [`smooth_line`].
pub fn smooth_lines(grid: &Grid, lines: &[PolyLine], subdivisions: usize) -> Vec<PolyLine> {
    if subdivisions == 0 {
        return lines.to_vec();
    }
    let step = subdivisions + 1;
    let mut smoothed: Vec<PolyLine> = lines
        .iter()
        .map(|l| smooth_line(l, subdivisions))
        .collect();

    // (line, segment, spline stays inside the cell) per cell
    let mut cells: HashMap<(usize, usize), Vec<(usize, usize, bool)>> = HashMap::new();
    let mut straight = Vec::new();
    for (li, line) in lines.iter().enumerate() {
        for (k, w) in line.points.windows(2).enumerate() {
            match segment_cell(grid, w[0], w[1]) {
                Some(cell) => {
                    let inserted = &smoothed[li].points[k * step + 1..(k + 1) * step];
                    let inside = inserted.iter().all(|&p| inside_cell(grid, cell, p));
                    cells.entry(cell).or_default().push((li, k, inside));
                }
                None => straight.push((li, k)),
            }
        }
    }

    let mut flattened_cells = 0usize;
    for pieces in cells.values() {
        let paths: Vec<Vec<PointD>> = pieces
            .iter()
            .map(|&(li, k, inside)| {
                if inside {
                    smoothed[li].points[k * step..=(k + 1) * step].to_vec()
                } else {
                    vec![lines[li].points[k], lines[li].points[k + 1]]
                }
            })
            .collect();
        if paths_cross(&paths) {
            flattened_cells += 1;
            straight.extend(pieces.iter().map(|&(li, k, _)| (li, k)));
        } else {
            straight.extend(
                pieces
                    .iter()
                    .filter(|&&(_, _, inside)| !inside)
                    .map(|&(li, k, _)| (li, k)),
            );
        }
    }

    for &(li, k) in &straight {
        let (a, b) = (lines[li].points[k], lines[li].points[k + 1]);
        for s in 1..step {
            let t = s as f64 / step as f64;
            smoothed[li].points[k * step + s] =
                PointD::new(a.x + t * (b.x - a.x), a.y + t * (b.y - a.y));
        }
    }

    debug!(
        lines = lines.len(),
        subdivisions,
        straight_segments = straight.len(),
        flattened_cells,
        "Smoothed contour lines"
    );

    smoothed
        .into_iter()
        .map(|l| PolyLine::new(l.value, l.points, l.closed))
        .collect()
}

/// Grid cell whose interior holds the midpoint of segment `a`-`b`.
///
/// `None` when the segment runs along a cell side.
fn segment_cell(grid: &Grid, a: PointD, b: PointD) -> Option<(usize, usize)> {
    let mid = PointD::new((a.x + b.x) / 2.0, (a.y + b.y) / 2.0);
    let (row, col) = world_to_index(grid, mid)?;
    let i = (row.floor() as usize).min(grid.ny().checked_sub(2)?);
    let j = (col.floor() as usize).min(grid.nx().checked_sub(2)?);
    inside_cell(grid, (i, j), mid).then_some((i, j))
}

fn inside_cell(grid: &Grid, (i, j): (usize, usize), p: PointD) -> bool {
    let (x, y) = (grid.x(), grid.y());
    x[j] < p.x && p.x < x[j + 1] && y[i] < p.y && p.y < y[i + 1]
}

/// True when two pieces, or two non-adjacent parts of one piece, cross.
fn paths_cross(paths: &[Vec<PointD>]) -> bool {
    let segments: Vec<(usize, usize, PointD, PointD)> = paths
        .iter()
        .enumerate()
        .flat_map(|(p, path)| {
            path.windows(2)
                .enumerate()
                .map(move |(s, w)| (p, s, w[0], w[1]))
        })
        .collect();

    segments.iter().enumerate().any(|(n, a)| {
        segments[n + 1..].iter().any(|b| {
            let adjacent = a.0 == b.0 && b.1 == a.1 + 1;
            !adjacent && segments_cross(a.2, a.3, b.2, b.3)
        })
    })
}

/// Proper crossing of segments `p1`-`p2` and `q1`-`q2`.
fn segments_cross(p1: PointD, p2: PointD, q1: PointD, q2: PointD) -> bool {
    let orient = |a: PointD, b: PointD, c: PointD| (b.x - a.x) * (c.y - a.y) - (b.y - a.y) * (c.x - a.x);
    let opposite = |u: f64, v: f64| (u > 0.0 && v < 0.0) || (u < 0.0 && v > 0.0);
    opposite(orient(q1, q2, p1), orient(q1, q2, p2))
        && opposite(orient(p1, p2, q1), orient(p1, p2, q2))
}

fn catmull_rom(p0: PointD, p1: PointD, p2: PointD, p3: PointD, t: f64) -> PointD {
    let t2 = t * t;
    let t3 = t2 * t;
    let blend = |a: f64, b: f64, c: f64, d: f64| {
        0.5 * (2.0 * b
            + (c - a) * t
            + (2.0 * a - 5.0 * b + 4.0 * c - d) * t2
            + (3.0 * b - a - 3.0 * c + d) * t3)
    };
    PointD::new(
        blend(p0.x, p1.x, p2.x, p3.x),
        blend(p0.y, p1.y, p2.y, p3.y),
    )
}
