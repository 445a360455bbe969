//! Boundary of the valid cell region and the places where contour lines meet it.
//!
//! Every side of a valid cell that faces a missing cell (or the outside of the
//! grid) is a directed border segment running with the cell on its right. The
//! segments chain into closed rings: the outer boundary runs clockwise and the
//! boundary around each interior block of missing data runs counter-clockwise.

use crate::grid::{Grid, ValidMask};
use crate::polygon::signed_area;
use geo_common::PointD;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use tracing::debug;

/// Grid vertex as (row, column).
pub(crate) type Vertex = (usize, usize);

/// One side of a grid cell.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum CellSide {
    Bottom,
    Right,
    Top,
    Left,
}

impl CellSide {
    pub const ALL: [CellSide; 4] = [
        CellSide::Bottom,
        CellSide::Right,
        CellSide::Top,
        CellSide::Left,
    ];

    pub fn opposite(self) -> Self {
        match self {
            CellSide::Bottom => CellSide::Top,
            CellSide::Top => CellSide::Bottom,
            CellSide::Left => CellSide::Right,
            CellSide::Right => CellSide::Left,
        }
    }

    /// Cell across this side, if it lies inside the grid.
    pub(crate) fn neighbor(
        self,
        (row, col): (usize, usize),
        cell_rows: usize,
        cell_cols: usize,
    ) -> Option<(usize, usize)> {
        match self {
            CellSide::Bottom => row.checked_sub(1).map(|r| (r, col)),
            CellSide::Top => (row + 1 < cell_rows).then_some((row + 1, col)),
            CellSide::Left => col.checked_sub(1).map(|c| (row, c)),
            CellSide::Right => (col + 1 < cell_cols).then_some((row, col + 1)),
        }
    }

    /// This side as a directed segment with the cell on its right.
    fn directed(self, (row, col): (usize, usize)) -> (Vertex, Vertex) {
        match self {
            CellSide::Left => ((row, col), (row + 1, col)),
            CellSide::Top => ((row + 1, col), (row + 1, col + 1)),
            CellSide::Right => ((row + 1, col + 1), (row, col + 1)),
            CellSide::Bottom => ((row, col + 1), (row, col)),
        }
    }

    /// Whether the directed border segment runs against the edge's
    /// canonical direction (left to right, bottom to top).
    pub(crate) fn reversed(self) -> bool {
        matches!(self, CellSide::Right | CellSide::Bottom)
    }
}

/// The cell side a border segment lies on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct BorderSegment {
    pub row: usize,
    pub col: usize,
    pub side: CellSide,
}

/// A closed boundary of the valid region.
///
/// Segment `k` runs from `points[k]` to `points[(k + 1) % len]`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BorderRing {
    pub vertices: Vec<(usize, usize)>,
    pub points: Vec<PointD>,
    pub segments: Vec<BorderSegment>,
}

impl BorderRing {
    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// Outer boundaries run clockwise, boundaries around missing data do not.
    pub fn is_outer(&self) -> bool {
        signed_area(&self.points) > 0.0
    }
}

/// Whether a line starts or ends at a border crossing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum BorderDirection {
    Entry,
    Exit,
}

/// Where an open contour line meets the border of the valid region.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BorderRecord {
    /// Index into `ContourLines::lines`.
    pub line: usize,
    pub ring: usize,
    pub segment: usize,
    /// Position along the directed segment, 0 at its start.
    pub fraction: f64,
    pub point: PointD,
    pub direction: BorderDirection,
}

/// Lookup from a border cell side to its (ring, segment) position.
#[derive(Debug, Default)]
pub(crate) struct RingIndex {
    positions: HashMap<(usize, usize, CellSide), (usize, usize)>,
}

impl RingIndex {
    pub(crate) fn get(&self, cell: (usize, usize), side: CellSide) -> Option<(usize, usize)> {
        self.positions.get(&(cell.0, cell.1, side)).copied()
    }
}

/// Border rings of the valid region of `grid`.
pub fn border_rings(grid: &Grid) -> Vec<BorderRing> {
    trace_rings(grid, &ValidMask::new(grid)).0
}

struct DirectedSegment {
    from: Vertex,
    to: Vertex,
    cell: (usize, usize),
    side: CellSide,
}

impl DirectedSegment {
    fn direction(&self) -> (i64, i64) {
        (
            self.to.1 as i64 - self.from.1 as i64,
            self.to.0 as i64 - self.from.0 as i64,
        )
    }
}

pub(crate) fn trace_rings(grid: &Grid, mask: &ValidMask) -> (Vec<BorderRing>, RingIndex) {
    let (cell_rows, cell_cols) = (mask.cell_rows(), mask.cell_cols());

    let mut segments = Vec::new();
    for row in 0..cell_rows {
        for col in 0..cell_cols {
            if !mask.cell(row, col) {
                continue;
            }
            for side in CellSide::ALL {
                let open = side
                    .neighbor((row, col), cell_rows, cell_cols)
                    .map_or(true, |(r, c)| !mask.cell(r, c));
                if open {
                    let (from, to) = side.directed((row, col));
                    segments.push(DirectedSegment {
                        from,
                        to,
                        cell: (row, col),
                        side,
                    });
                }
            }
        }
    }

    let mut outgoing: HashMap<Vertex, Vec<usize>> = HashMap::new();
    for (idx, seg) in segments.iter().enumerate() {
        outgoing.entry(seg.from).or_default().push(idx);
    }

    let mut used = vec![false; segments.len()];
    let mut rings = Vec::new();
    let mut index = RingIndex::default();

    for first in 0..segments.len() {
        if used[first] {
            continue;
        }

        let mut chain = Vec::new();
        let mut current = first;
        loop {
            used[current] = true;
            chain.push(current);
            match next_segment(&segments, &outgoing, current) {
                Some(next) if next == first => break,
                Some(next) if !used[next] => current = next,
                _ => {
                    debug!(start = ?segments[first].from, "Border ring did not close");
                    break;
                }
            }
        }

        let ring_idx = rings.len();
        let mut ring = BorderRing {
            vertices: Vec::with_capacity(chain.len()),
            points: Vec::with_capacity(chain.len()),
            segments: Vec::with_capacity(chain.len()),
        };
        for (k, &s) in chain.iter().enumerate() {
            let seg = &segments[s];
            let (row, col) = seg.from;
            ring.vertices.push(seg.from);
            ring.points.push(PointD::new(grid.x()[col], grid.y()[row]));
            ring.segments.push(BorderSegment {
                row: seg.cell.0,
                col: seg.cell.1,
                side: seg.side,
            });
            index
                .positions
                .insert((seg.cell.0, seg.cell.1, seg.side), (ring_idx, k));
        }
        rings.push(ring);
    }

    (rings, index)
}

/// Continue a ring preferring a right turn, then straight on, then a left turn.
fn next_segment(
    segments: &[DirectedSegment],
    outgoing: &HashMap<Vertex, Vec<usize>>,
    current: usize,
) -> Option<usize> {
    let candidates = outgoing.get(&segments[current].to)?;
    let (dx, dy) = segments[current].direction();
    [(dy, -dx), (dx, dy), (-dy, dx)]
        .into_iter()
        .find_map(|turn| {
            candidates
                .iter()
                .copied()
                .find(|&c| segments[c].direction() == turn)
        })
}
