//! Filled contour polygons.
//!
//! The traced lines of all levels cut the valid region into faces. Each face
//! is bounded by cycles built from three kinds of pieces: stretches of a
//! border ring between two border crossings, open lines followed from one
//! crossing to the other, and closed loops. Every cycle keeps its face on the
//! right, so a face's outer cycle runs clockwise (positive signed area) and
//! its holes run counter-clockwise.
//!
//! A line followed forward has the face on its high side, followed in
//! reverse on its low side. That is enough to bracket every face between two
//! levels.

use crate::border::{BorderDirection, BorderRing};
use crate::grid::Grid;
use crate::levels::normalize_levels;
use crate::trace::{ContourLines, PolyLine};
use geo_common::{BoundingBox, PointD};
use serde::{Deserialize, Serialize};
use tracing::{debug, trace};

/// Hole probes sit this fraction of a segment length to the segment's right.
const PROBE_OFFSET: f64 = 1e-6;

/// A filled region between two contour levels.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ContourPolygon {
    /// Closed clockwise ring (first point repeated at the end).
    pub outer: Vec<PointD>,
    /// Closed counter-clockwise rings.
    pub holes: Vec<Vec<PointD>>,
    /// Values in the polygon lie in `[low_value, high_value)`.
    pub low_value: f64,
    pub high_value: f64,
    pub is_high_center: bool,
    /// The outer ring follows part of the border of the valid region.
    pub is_border: bool,
    pub extent: BoundingBox,
    /// Outer area minus hole areas.
    pub area: f64,
}

impl ContourPolygon {
    /// True when `p` is inside the outer ring and outside every hole.
    pub fn contains(&self, p: PointD) -> bool {
        self.extent.contains_point(p.x, p.y)
            && point_in_ring(p, &self.outer)
            && !self.holes.iter().any(|h| point_in_ring(p, h))
    }

    /// True when `value` falls in this polygon's band.
    pub fn band_contains(&self, value: f64) -> bool {
        value >= self.low_value && value < self.high_value
    }
}

/// Signed area of a ring, positive when it runs clockwise.
///
/// The ring may or may not repeat its first point.
pub fn signed_area(ring: &[PointD]) -> f64 {
    let n = ring.len();
    if n < 3 {
        return 0.0;
    }
    let mut sum = 0.0;
    for i in 0..n {
        let a = ring[i];
        let b = ring[(i + 1) % n];
        sum += a.x * b.y - b.x * a.y;
    }
    -0.5 * sum
}

/// Even-odd point in ring test.
pub fn point_in_ring(p: PointD, ring: &[PointD]) -> bool {
    let n = ring.len();
    if n < 3 {
        return false;
    }
    let mut inside = false;
    let mut j = n - 1;
    for i in 0..n {
        let (a, b) = (ring[i], ring[j]);
        if (a.y > p.y) != (b.y > p.y) && p.x < (b.x - a.x) * (p.y - a.y) / (b.y - a.y) + a.x {
            inside = !inside;
        }
        j = i;
    }
    inside
}

/// Resolve a band whose bracketing values coincide.
///
/// A high-centre region above level `l` spans up to the next level (or the
/// data maximum), a low-centre region below `l` spans down to the previous
/// level (or the data minimum). Distinct values are returned unchanged.
pub fn bracket_band(
    low: f64,
    high: f64,
    is_high_center: bool,
    levels: &[f64],
    data_min: f64,
    data_max: f64,
) -> (f64, f64) {
    if low != high {
        return (low, high);
    }
    let level = low;
    match levels.binary_search_by(|l| l.total_cmp(&level)) {
        Ok(k) if is_high_center => (level, levels.get(k + 1).copied().unwrap_or(data_max)),
        Ok(k) => (
            k.checked_sub(1).map_or(data_min, |below| levels[below]),
            level,
        ),
        Err(k) => (
            k.checked_sub(1).map_or(data_min, |below| levels[below]),
            levels.get(k).copied().unwrap_or(data_max),
        ),
    }
}

/// A closed boundary of one face, with the face on its right.
struct Cycle {
    points: Vec<PointD>,
    /// (line index, followed forward)
    traversals: Vec<(usize, bool)>,
    border: bool,
    /// A grid value inside the face, for faces no line touches.
    sample: Option<f64>,
    area: f64,
    extent: BoundingBox,
}

impl Cycle {
    fn new(
        mut points: Vec<PointD>,
        traversals: Vec<(usize, bool)>,
        border: bool,
        sample: Option<f64>,
    ) -> Option<Self> {
        points.dedup();
        let first = *points.first()?;
        if points.last() != Some(&first) {
            points.push(first);
        }
        let area = signed_area(&points);
        let extent = BoundingBox::from_points(&points)?;
        Some(Self {
            points,
            traversals,
            border,
            sample,
            area,
            extent,
        })
    }

    /// A point just inside the face, beside the longest segment.
    fn probe(&self) -> Option<PointD> {
        let (a, b) = self
            .points
            .windows(2)
            .map(|w| (w[0], w[1]))
            .max_by(|(a1, b1), (a2, b2)| a1.distance(b1).total_cmp(&a2.distance(b2)))?;
        let mid = PointD::new((a.x + b.x) / 2.0, (a.y + b.y) / 2.0);
        let (dx, dy) = (b.x - a.x, b.y - a.y);
        Some(PointD::new(
            mid.x + dy * PROBE_OFFSET,
            mid.y - dx * PROBE_OFFSET,
        ))
    }
}

struct Face {
    outer: Cycle,
    holes: Vec<Cycle>,
}

/// Assemble filled polygons for every band between consecutive levels.
///
/// `traced` must come from tracing `grid` at `levels`. An empty level set
/// gives no polygons.
pub fn build_polygons(grid: &Grid, traced: &ContourLines, levels: &[f64]) -> Vec<ContourPolygon> {
    let levels = normalize_levels(levels);
    let Some((data_min, data_max)) = grid.value_range() else {
        return Vec::new();
    };
    if levels.is_empty() || traced.rings.is_empty() {
        return Vec::new();
    }

    let mut cycles = Vec::new();
    for (idx, line) in traced.lines.iter().enumerate().filter(|(_, l)| l.closed) {
        let reversed: Vec<PointD> = line.points.iter().rev().copied().collect();
        cycles.extend(Cycle::new(line.points.clone(), vec![(idx, true)], false, None));
        cycles.extend(Cycle::new(reversed, vec![(idx, false)], false, None));
    }
    RingWalker::new(grid, traced).collect_cycles(&mut cycles);

    let (outers, holes): (Vec<Cycle>, Vec<Cycle>) = cycles
        .into_iter()
        .filter(|c| c.area != 0.0)
        .partition(|c| c.area > 0.0);

    let mut faces: Vec<Face> = outers
        .into_iter()
        .map(|outer| Face {
            outer,
            holes: Vec::new(),
        })
        .collect();

    let mut dropped = 0usize;
    for hole in holes {
        let Some(probe) = hole.probe() else {
            dropped += 1;
            continue;
        };
        let owner = faces
            .iter()
            .enumerate()
            .filter(|(_, f)| f.outer.extent.contains_point(probe.x, probe.y))
            .filter(|(_, f)| point_in_ring(probe, &f.outer.points))
            .min_by(|(_, a), (_, b)| a.outer.area.total_cmp(&b.outer.area))
            .map(|(idx, _)| idx);
        match owner {
            Some(idx) => faces[idx].holes.push(hole),
            None => {
                trace!(area = hole.area, "Hole without an enclosing face dropped");
                dropped += 1;
            }
        }
    }

    let mut polygons: Vec<ContourPolygon> = faces
        .into_iter()
        .map(|face| face_polygon(face, &traced.lines, &levels, data_min, data_max))
        .collect();
    polygons.sort_by(|a, b| {
        a.low_value
            .total_cmp(&b.low_value)
            .then(b.area.total_cmp(&a.area))
    });

    debug!(
        polygons = polygons.len(),
        holes = polygons.iter().map(|p| p.holes.len()).sum::<usize>(),
        dropped_holes = dropped,
        "Built contour polygons"
    );

    polygons
}

fn face_polygon(
    face: Face,
    lines: &[PolyLine],
    levels: &[f64],
    data_min: f64,
    data_max: f64,
) -> ContourPolygon {
    let traversals: Vec<(usize, bool)> = face
        .outer
        .traversals
        .iter()
        .chain(face.holes.iter().flat_map(|h| h.traversals.iter()))
        .copied()
        .collect();

    let mut low: Option<f64> = None;
    let mut high: Option<f64> = None;
    for &(line, forward) in &traversals {
        let value = lines[line].value;
        if forward {
            low = Some(low.map_or(value, |l| l.max(value)));
        } else {
            high = Some(high.map_or(value, |h| h.min(value)));
        }
    }
    let is_high_center = traversals.first().map_or(false, |&(_, forward)| forward);

    let (low_value, high_value) = match (low, high) {
        (Some(l), Some(h)) => bracket_band(l, h, is_high_center, levels, data_min, data_max),
        (Some(v), None) | (None, Some(v)) => {
            bracket_band(v, v, is_high_center, levels, data_min, data_max)
        }
        (None, None) => {
            let sample = face.outer.sample.unwrap_or(data_min);
            let k = levels.partition_point(|&l| l <= sample);
            (
                k.checked_sub(1).map_or(data_min, |below| levels[below]),
                levels.get(k).copied().unwrap_or(data_max),
            )
        }
    };

    let hole_area: f64 = face.holes.iter().map(|h| h.area.abs()).sum();
    ContourPolygon {
        low_value,
        high_value,
        is_high_center,
        is_border: face.outer.border,
        extent: face.outer.extent,
        area: face.outer.area - hole_area,
        outer: face.outer.points,
        holes: face.holes.into_iter().map(|h| h.points).collect(),
    }
}

/// Walks border rings, switching onto open lines at each border crossing.
struct RingWalker<'a> {
    grid: &'a Grid,
    traced: &'a ContourLines,
    /// Border record indices per ring, in order along the ring.
    stops: Vec<Vec<usize>>,
    /// (ring, stop index) of each border record.
    positions: Vec<Option<(usize, usize)>>,
    starts: Vec<Option<usize>>,
    ends: Vec<Option<usize>>,
    visited: Vec<Vec<bool>>,
}

impl<'a> RingWalker<'a> {
    fn new(grid: &'a Grid, traced: &'a ContourLines) -> Self {
        let borders = &traced.borders;
        let mut starts = vec![None; traced.lines.len()];
        let mut ends = vec![None; traced.lines.len()];
        for (k, record) in borders.iter().enumerate() {
            match record.direction {
                BorderDirection::Entry => starts[record.line] = Some(k),
                BorderDirection::Exit => ends[record.line] = Some(k),
            }
        }

        let mut stops: Vec<Vec<usize>> = vec![Vec::new(); traced.rings.len()];
        for (k, record) in borders.iter().enumerate() {
            let paired = starts[record.line].is_some() && ends[record.line].is_some();
            if paired && record.ring < stops.len() {
                stops[record.ring].push(k);
            }
        }

        let mut positions = vec![None; borders.len()];
        for (ring, ring_stops) in stops.iter_mut().enumerate() {
            ring_stops.sort_by(|&a, &b| {
                borders[a]
                    .segment
                    .cmp(&borders[b].segment)
                    .then(borders[a].fraction.total_cmp(&borders[b].fraction))
            });
            for (idx, &record) in ring_stops.iter().enumerate() {
                positions[record] = Some((ring, idx));
            }
        }

        let visited = stops.iter().map(|s| vec![false; s.len()]).collect();
        Self {
            grid,
            traced,
            stops,
            positions,
            starts,
            ends,
            visited,
        }
    }

    fn collect_cycles(mut self, cycles: &mut Vec<Cycle>) {
        for (r, ring) in self.traced.rings.iter().enumerate() {
            if self.stops[r].is_empty() {
                let sample = ring
                    .vertices
                    .first()
                    .map(|&(row, col)| self.grid.value(row, col));
                cycles.extend(Cycle::new(ring.points.clone(), Vec::new(), true, sample));
                continue;
            }
            for k in 0..self.stops[r].len() {
                if !self.visited[r][k] {
                    match self.walk(r, k) {
                        Some(cycle) => cycles.push(cycle),
                        None => debug!(ring = r, stop = k, "Border cycle did not close"),
                    }
                }
            }
        }
    }

    fn walk(&mut self, ring0: usize, stop0: usize) -> Option<Cycle> {
        let traced = self.traced;
        let (borders, lines) = (&traced.borders, &traced.lines);

        let mut points = vec![borders[self.stops[ring0][stop0]].point];
        let mut traversals = Vec::new();
        let (mut r, mut k) = (ring0, stop0);

        for _ in 0..=borders.len() {
            self.visited[r][k] = true;
            let ring = &traced.rings[r];
            let count = self.stops[r].len();
            let next = (k + 1) % count;
            let from = &borders[self.stops[r][k]];
            let to = &borders[self.stops[r][next]];
            append_stretch(&mut points, ring, from.segment, to.segment, next > k);

            let line = &lines[to.line];
            let forward = to.direction == BorderDirection::Entry;
            if forward {
                points.extend(line.points.iter().copied());
            } else {
                points.extend(line.points.iter().rev().copied());
            }
            traversals.push((to.line, forward));

            let other = if forward {
                self.ends[to.line]
            } else {
                self.starts[to.line]
            };
            let (r2, k2) = self.positions[other?]?;
            if (r2, k2) == (ring0, stop0) {
                return Cycle::new(points, traversals, true, None);
            }
            if self.visited[r2][k2] {
                return None;
            }
            (r, k) = (r2, k2);
        }
        None
    }
}

/// Ring vertices strictly after segment `from` up to and including the
/// start of segment `to`. A wrap (`forward == false`) goes all the way round.
fn append_stretch(points: &mut Vec<PointD>, ring: &BorderRing, from: usize, to: usize, forward: bool) {
    let n = ring.len();
    if n == 0 {
        return;
    }
    let count = if forward { to - from } else { n - from + to };
    points.extend((1..=count).map(|step| ring.points[(from + step) % n]));
}

#[cfg(test)]
mod tests {
    use super::*;

    fn square(clockwise: bool) -> Vec<PointD> {
        let mut ring = vec![
            PointD::new(0.0, 0.0),
            PointD::new(0.0, 2.0),
            PointD::new(2.0, 2.0),
            PointD::new(2.0, 0.0),
            PointD::new(0.0, 0.0),
        ];
        if !clockwise {
            ring.reverse();
        }
        ring
    }

    #[test]
    fn test_signed_area_orientation() {
        assert_eq!(signed_area(&square(true)), 4.0);
        assert_eq!(signed_area(&square(false)), -4.0);
        // Open and closed rings agree
        assert_eq!(signed_area(&square(true)[..4]), 4.0);
        assert_eq!(signed_area(&square(true)[..2]), 0.0);
    }

    #[test]
    fn test_point_in_ring() {
        let ring = square(true);
        assert!(point_in_ring(PointD::new(1.0, 1.0), &ring));
        assert!(!point_in_ring(PointD::new(3.0, 1.0), &ring));
        assert!(!point_in_ring(PointD::new(1.0, -0.5), &ring));
    }

    #[test]
    fn test_bracket_band() {
        let levels = [10.0, 20.0, 30.0];
        assert_eq!(bracket_band(10.0, 20.0, true, &levels, 0.0, 40.0), (10.0, 20.0));
        assert_eq!(bracket_band(20.0, 20.0, true, &levels, 0.0, 40.0), (20.0, 30.0));
        assert_eq!(bracket_band(30.0, 30.0, true, &levels, 0.0, 40.0), (30.0, 40.0));
        assert_eq!(bracket_band(20.0, 20.0, false, &levels, 0.0, 40.0), (10.0, 20.0));
        assert_eq!(bracket_band(10.0, 10.0, false, &levels, 0.0, 40.0), (0.0, 10.0));
        // Not one of the levels: bracket by its neighbours
        assert_eq!(bracket_band(25.0, 25.0, false, &levels, 0.0, 40.0), (20.0, 30.0));
    }

    #[test]
    fn test_probe_lies_right_of_cycle() {
        let cycle = Cycle::new(square(false), Vec::new(), false, None).unwrap();
        assert!(cycle.area < 0.0);
        let probe = cycle.probe().unwrap();
        // Counter-clockwise ring: right-hand side is outside
        assert!(!point_in_ring(probe, &cycle.points));

        let cycle = Cycle::new(square(true), Vec::new(), false, None).unwrap();
        let probe = cycle.probe().unwrap();
        assert!(point_in_ring(probe, &cycle.points));
    }

    #[test]
    fn test_contains_respects_holes() {
        let outer = vec![
            PointD::new(0.0, 0.0),
            PointD::new(0.0, 4.0),
            PointD::new(4.0, 4.0),
            PointD::new(4.0, 0.0),
            PointD::new(0.0, 0.0),
        ];
        let hole: Vec<PointD> = square(false)
            .into_iter()
            .map(|p| PointD::new(p.x + 1.0, p.y + 1.0))
            .collect();
        let polygon = ContourPolygon {
            extent: BoundingBox::from_points(&outer).unwrap(),
            area: 16.0 - 4.0,
            outer,
            holes: vec![hole],
            low_value: 0.0,
            high_value: 1.0,
            is_high_center: false,
            is_border: true,
        };
        assert!(polygon.contains(PointD::new(0.5, 0.5)));
        assert!(!polygon.contains(PointD::new(2.0, 2.0)));
        assert!(!polygon.contains(PointD::new(5.0, 2.0)));
        assert!(polygon.band_contains(0.0));
        assert!(!polygon.band_contains(1.0));
    }
}
