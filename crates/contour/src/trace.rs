//! Contour line tracing, one level at a time.
//!
//! Each level is classified against the grid, then lines are walked from cell
//! to cell across crossed edges. Lines that start on the border of the valid
//! region are traced first so that every open line runs from one border
//! crossing to another; the remaining crossings form closed interior loops.
//!
//! Every line is oriented with higher values on its right-hand side.

use crate::border::{trace_rings, BorderDirection, BorderRecord, BorderRing, CellSide, RingIndex};
use crate::grid::{Grid, ValidMask};
use crate::levels::normalize_levels;
use crate::smooth::smooth_lines;
use geo_common::{BoundingBox, PointD};
use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use tracing::{debug, trace};

const BL: u8 = 1;
const BR: u8 = 2;
const TR: u8 = 4;
const TL: u8 = 8;
const INVALID: u8 = u8::MAX;

/// A traced contour line.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PolyLine {
    /// Level the line was traced at.
    pub value: f64,
    pub points: Vec<PointD>,
    pub extent: BoundingBox,
    /// Closed lines repeat their first point at the end.
    pub closed: bool,
}

impl PolyLine {
    pub fn new(value: f64, points: Vec<PointD>, closed: bool) -> Self {
        let extent = BoundingBox::from_points(&points)
            .unwrap_or_else(|| BoundingBox::new(0.0, 0.0, 0.0, 0.0));
        Self {
            value,
            points,
            extent,
            closed,
        }
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }
}

/// A saddle cell and how it was resolved at one level.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SaddleCell {
    pub row: usize,
    pub col: usize,
    pub level: f64,
    /// The mean of the corners is at or above the level.
    pub high_center: bool,
}

/// Output of a trace over all levels.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ContourLines {
    /// Lines in ascending level order.
    pub lines: Vec<PolyLine>,
    /// Border crossings of the open lines, two per open line.
    pub borders: Vec<BorderRecord>,
    /// Boundaries of the valid region.
    pub rings: Vec<BorderRing>,
    pub saddles: Vec<SaddleCell>,
}

impl ContourLines {
    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    /// Lines traced at `level`.
    pub fn lines_at(&self, level: f64) -> impl Iterator<Item = &PolyLine> {
        self.lines.iter().filter(move |l| l.value == level)
    }

    /// Copy with every line smoothed on `grid`, the grid the lines were
    /// traced on. Endpoints are kept, so the border records stay valid, and
    /// no line is made to cross another line or the border.
    pub fn smoothed(&self, grid: &Grid, subdivisions: usize) -> Self {
        Self {
            lines: smooth_lines(grid, &self.lines, subdivisions),
            borders: self.borders.clone(),
            rings: self.rings.clone(),
            saddles: self.saddles.clone(),
        }
    }
}

/// Trace contour lines for every level, serially.
pub fn trace_contour_lines(grid: &Grid, levels: &[f64]) -> ContourLines {
    trace_contour_lines_with(grid, levels, false)
}

/// Trace contour lines for every level, optionally in parallel.
///
/// Output is identical either way: levels are merged in ascending order.
pub fn trace_contour_lines_with(grid: &Grid, levels: &[f64], parallel: bool) -> ContourLines {
    let levels = normalize_levels(levels);
    if !grid.has_cells() || levels.is_empty() {
        return ContourLines::default();
    }

    let mask = ValidMask::new(grid);
    if mask.valid_cell_count() == 0 {
        return ContourLines::default();
    }
    let (rings, index) = trace_rings(grid, &mask);

    let per_level: Vec<LevelLines> = if parallel {
        levels
            .par_iter()
            .map(|&level| LevelTracer::new(grid, &mask, &index, level).run())
            .collect()
    } else {
        levels
            .iter()
            .map(|&level| LevelTracer::new(grid, &mask, &index, level).run())
            .collect()
    };

    let mut result = ContourLines {
        rings,
        ..ContourLines::default()
    };
    for level_lines in per_level {
        let offset = result.lines.len();
        result.lines.extend(level_lines.lines);
        result
            .borders
            .extend(level_lines.borders.into_iter().map(|mut b| {
                b.line += offset;
                b
            }));
        result.saddles.extend(level_lines.saddles);
    }

    debug!(
        levels = levels.len(),
        lines = result.lines.len(),
        borders = result.borders.len(),
        rings = result.rings.len(),
        saddles = result.saddles.len(),
        "Traced contour lines"
    );

    result
}

/// Lines of a single level, with line indices local to the level.
#[derive(Default)]
struct LevelLines {
    lines: Vec<PolyLine>,
    borders: Vec<BorderRecord>,
    saddles: Vec<SaddleCell>,
}

/// A grid edge: `H` joins (row, col) to (row, col + 1), `V` joins
/// (row, col) to (row + 1, col).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Edge {
    H(usize, usize),
    V(usize, usize),
}

fn side_edge((row, col): (usize, usize), side: CellSide) -> Edge {
    match side {
        CellSide::Bottom => Edge::H(row, col),
        CellSide::Top => Edge::H(row + 1, col),
        CellSide::Left => Edge::V(row, col),
        CellSide::Right => Edge::V(row, col + 1),
    }
}

/// Where a walk crossed the border of the valid region.
struct BorderHit {
    cell: (usize, usize),
    side: CellSide,
    t: f64,
}

struct Walk {
    points: Vec<PointD>,
    closed: bool,
    start: Option<BorderHit>,
    end: Option<BorderHit>,
}

struct LevelTracer<'a> {
    grid: &'a Grid,
    mask: &'a ValidMask,
    index: &'a RingIndex,
    level: f64,
    nx: usize,
    above: Vec<bool>,
    cases: Vec<u8>,
    h_used: Vec<bool>,
    v_used: Vec<bool>,
    saddles: Vec<SaddleCell>,
}

impl<'a> LevelTracer<'a> {
    fn new(grid: &'a Grid, mask: &'a ValidMask, index: &'a RingIndex, level: f64) -> Self {
        let (nx, ny) = (grid.nx(), grid.ny());
        let above: Vec<bool> = grid
            .data()
            .iter()
            .enumerate()
            .map(|(k, &v)| mask.point(k / nx, k % nx) && v >= level)
            .collect();

        let (rows, cols) = (mask.cell_rows(), mask.cell_cols());
        let mut cases = vec![INVALID; rows * cols];
        let mut saddles = Vec::new();
        for i in 0..rows {
            for j in 0..cols {
                if !mask.cell(i, j) {
                    continue;
                }
                let mut case = 0;
                if above[i * nx + j] {
                    case |= BL;
                }
                if above[i * nx + j + 1] {
                    case |= BR;
                }
                if above[(i + 1) * nx + j + 1] {
                    case |= TR;
                }
                if above[(i + 1) * nx + j] {
                    case |= TL;
                }
                cases[i * cols + j] = case;
                if case == BL | TR || case == BR | TL {
                    saddles.push(SaddleCell {
                        row: i,
                        col: j,
                        level,
                        high_center: cell_mean(grid, i, j) >= level,
                    });
                }
            }
        }

        Self {
            grid,
            mask,
            index,
            level,
            nx,
            above,
            cases,
            h_used: vec![false; ny * cols],
            v_used: vec![false; rows * nx],
            saddles,
        }
    }

    fn run(mut self) -> LevelLines {
        let mut out = LevelLines::default();
        let edges = self.all_edges();

        // Lines entering from the border of the valid region
        for &edge in &edges {
            if self.is_used(edge) || !self.is_crossed(edge) {
                continue;
            }
            let (forward, backward) = self.edge_cells(edge);
            if self.cell_ok(forward) && !self.cell_ok(backward) {
                let walk = self.walk(edge);
                self.emit(walk, &mut out);
            }
        }

        // Closed loops in the interior
        for &edge in &edges {
            if self.is_used(edge) || !self.is_crossed(edge) {
                continue;
            }
            let (forward, backward) = self.edge_cells(edge);
            if self.cell_ok(forward) && self.cell_ok(backward) {
                let walk = self.walk(edge);
                self.emit(walk, &mut out);
            }
        }

        trace!(
            level = self.level,
            lines = out.lines.len(),
            saddles = self.saddles.len(),
            "Traced level"
        );
        out.saddles = self.saddles;
        out
    }

    fn all_edges(&self) -> Vec<Edge> {
        let (rows, cols) = (self.mask.cell_rows(), self.mask.cell_cols());
        let horizontal = (0..=rows).flat_map(|i| (0..cols).map(move |j| Edge::H(i, j)));
        let vertical = (0..rows).flat_map(|i| (0..=cols).map(move |j| Edge::V(i, j)));
        horizontal.chain(vertical).collect()
    }

    fn endpoints(edge: Edge) -> ((usize, usize), (usize, usize)) {
        match edge {
            Edge::H(i, j) => ((i, j), (i, j + 1)),
            Edge::V(i, j) => ((i, j), (i + 1, j)),
        }
    }

    fn is_above(&self, (i, j): (usize, usize)) -> bool {
        self.above[i * self.nx + j]
    }

    fn cell_ok(&self, cell: Option<(usize, usize)>) -> bool {
        cell.map_or(false, |(i, j)| self.mask.cell(i, j))
    }

    /// Cells on either side of an edge as (forward, backward), where forward
    /// is the direction of travel that keeps higher values on the right.
    fn edge_cells(&self, edge: Edge) -> (Option<(usize, usize)>, Option<(usize, usize)>) {
        let (rows, cols) = (self.mask.cell_rows(), self.mask.cell_cols());
        match edge {
            Edge::H(i, j) => {
                let below = i.checked_sub(1).map(|r| (r, j));
                let upper = (i < rows).then_some((i, j));
                if self.is_above((i, j)) {
                    (below, upper)
                } else {
                    (upper, below)
                }
            }
            Edge::V(i, j) => {
                let left = j.checked_sub(1).map(|c| (i, c));
                let right = (j < cols).then_some((i, j));
                if self.is_above((i, j)) {
                    (right, left)
                } else {
                    (left, right)
                }
            }
        }
    }

    fn is_crossed(&self, edge: Edge) -> bool {
        let (a, b) = Self::endpoints(edge);
        if !self.mask.point(a.0, a.1) || !self.mask.point(b.0, b.1) {
            return false;
        }
        if self.is_above(a) == self.is_above(b) {
            return false;
        }
        let (forward, backward) = self.edge_cells(edge);
        self.cell_ok(forward) || self.cell_ok(backward)
    }

    fn is_used(&self, edge: Edge) -> bool {
        match edge {
            Edge::H(i, j) => self.h_used[i * self.mask.cell_cols() + j],
            Edge::V(i, j) => self.v_used[i * self.nx + j],
        }
    }

    fn mark_used(&mut self, edge: Edge) {
        match edge {
            Edge::H(i, j) => self.h_used[i * self.mask.cell_cols() + j] = true,
            Edge::V(i, j) => self.v_used[i * self.nx + j] = true,
        }
    }

    /// Interpolated crossing along the edge's canonical direction.
    fn crossing(&self, edge: Edge) -> (f64, PointD) {
        let ((i1, j1), (i2, j2)) = Self::endpoints(edge);
        let v1 = self.grid.value(i1, j1);
        let v2 = self.grid.value(i2, j2);
        let t = (self.level - v1) / (v2 - v1);
        let (x, y) = (self.grid.x(), self.grid.y());

        let start = PointD::new(x[j1], y[i1]);
        let end = PointD::new(x[j2], y[i2]);
        if t <= 0.0 {
            (0.0, start)
        } else if t >= 1.0 {
            (1.0, end)
        } else {
            let point = match edge {
                Edge::H(..) => PointD::new(x[j1] + t * (x[j2] - x[j1]), y[i1]),
                Edge::V(..) => PointD::new(x[j1], y[i1] + t * (y[i2] - y[i1])),
            };
            (t, point)
        }
    }

    /// Side through which a line entering at `entry` leaves the cell.
    fn exit_side(&self, (i, j): (usize, usize), entry: CellSide) -> Option<CellSide> {
        let case = self.cases[i * self.mask.cell_cols() + j];
        if case == INVALID {
            return None;
        }

        if case == BL | TR || case == BR | TL {
            let high_center = cell_mean(self.grid, i, j) >= self.level;
            let bottom_right = (case == BL | TR) == high_center;
            return Some(match (entry, bottom_right) {
                (CellSide::Bottom, true) => CellSide::Right,
                (CellSide::Right, true) => CellSide::Bottom,
                (CellSide::Top, true) => CellSide::Left,
                (CellSide::Left, true) => CellSide::Top,
                (CellSide::Bottom, false) => CellSide::Left,
                (CellSide::Left, false) => CellSide::Bottom,
                (CellSide::Top, false) => CellSide::Right,
                (CellSide::Right, false) => CellSide::Top,
            });
        }

        let differs = |a: u8, b: u8| (case & a == 0) != (case & b == 0);
        CellSide::ALL.into_iter().find(|&side| {
            side != entry
                && match side {
                    CellSide::Bottom => differs(BL, BR),
                    CellSide::Right => differs(BR, TR),
                    CellSide::Top => differs(TL, TR),
                    CellSide::Left => differs(BL, TL),
                }
        })
    }

    fn side_in(edge: Edge, (i, j): (usize, usize)) -> CellSide {
        match edge {
            Edge::H(row, _) if row == i => CellSide::Bottom,
            Edge::H(..) => CellSide::Top,
            Edge::V(_, col) if col == j => CellSide::Left,
            Edge::V(..) => CellSide::Right,
        }
    }

    fn walk(&mut self, start: Edge) -> Walk {
        let (forward, backward) = self.edge_cells(start);
        let (t0, p0) = self.crossing(start);
        let mut walk = Walk {
            points: vec![p0],
            closed: false,
            start: None,
            end: None,
        };
        self.mark_used(start);

        let Some(mut cell) = forward else {
            return walk;
        };
        let mut entry = Self::side_in(start, cell);
        if !self.cell_ok(backward) {
            walk.start = Some(BorderHit {
                cell,
                side: entry,
                t: t0,
            });
        }

        let (rows, cols) = (self.mask.cell_rows(), self.mask.cell_cols());
        while let Some(exit) = self.exit_side(cell, entry) {
            let edge = side_edge(cell, exit);
            if edge == start {
                walk.points.push(p0);
                walk.closed = true;
                break;
            }
            if self.is_used(edge) {
                break;
            }
            self.mark_used(edge);
            let (t, point) = self.crossing(edge);
            walk.points.push(point);

            match exit
                .neighbor(cell, rows, cols)
                .filter(|&(r, c)| self.mask.cell(r, c))
            {
                Some(next) => {
                    cell = next;
                    entry = exit.opposite();
                }
                None => {
                    walk.end = Some(BorderHit {
                        cell,
                        side: exit,
                        t,
                    });
                    break;
                }
            }
        }

        walk
    }

    fn emit(&self, walk: Walk, out: &mut LevelLines) {
        let Walk {
            mut points,
            closed,
            start,
            end,
        } = walk;
        points.dedup();

        let distinct = if closed {
            points.len().saturating_sub(1)
        } else {
            points.len()
        };
        if distinct < 2 {
            return;
        }

        let line = out.lines.len();
        if let (Some(start), Some(end)) = (start, end) {
            let first = points[0];
            let last = points[points.len() - 1];
            for (hit, point, direction) in [
                (start, first, BorderDirection::Entry),
                (end, last, BorderDirection::Exit),
            ] {
                let Some((ring, segment)) = self.index.get(hit.cell, hit.side) else {
                    continue;
                };
                let fraction = if hit.side.reversed() { 1.0 - hit.t } else { hit.t };
                out.borders.push(BorderRecord {
                    line,
                    ring,
                    segment,
                    fraction,
                    point,
                    direction,
                });
            }
        }

        out.lines.push(PolyLine::new(self.level, points, closed));
    }
}

fn cell_mean(grid: &Grid, i: usize, j: usize) -> f64 {
    (grid.value(i, j) + grid.value(i, j + 1) + grid.value(i + 1, j) + grid.value(i + 1, j + 1))
        / 4.0
}
