//! Integration tests for coordinate mapping, slice embedding and projection
//! of contour output.

use contour::{
    build_polygons, embed_line, embed_polygon, index_to_world, normalize_axes, project_line,
    project_polygon, signed_area, trace_contour_lines, world_to_index, ContourConfig,
    ContourError, ContourPolygon, Grid, PolyLine, SlicePlane,
};
use geo_common::{BoundingBox, PointD};
use nalgebra::Point3;
use projection::{Projection, ProjectionKind, ProjectionParams};
use test_utils::fixtures::proj;
use test_utils::{axis, create_field, init_tracing};

fn mercator() -> Projection {
    Projection::new(ProjectionKind::Mercator, ProjectionParams::default()).unwrap()
}

fn line(points: &[(f64, f64)], closed: bool) -> PolyLine {
    PolyLine::new(10.0, points.iter().map(|&p| PointD::from(p)).collect(), closed)
}

fn square_polygon(x0: f64, y0: f64, size: f64) -> ContourPolygon {
    let outer = vec![
        PointD::new(x0, y0),
        PointD::new(x0, y0 + size),
        PointD::new(x0 + size, y0 + size),
        PointD::new(x0 + size, y0),
        PointD::new(x0, y0),
    ];
    ContourPolygon {
        extent: BoundingBox::from_points(&outer).unwrap(),
        area: size * size,
        outer,
        holes: Vec::new(),
        low_value: 0.0,
        high_value: 1.0,
        is_high_center: true,
        is_border: false,
    }
}

/// Gaussian bump on a lon/lat grid centred at (lon0, lat0).
fn lonlat_peak(lon0: f64, lat0: f64) -> Grid {
    let field = create_field(
        axis(21, lon0 - 10.0, 1.0),
        axis(21, lat0 - 10.0, 1.0),
        |lon, lat| {
            let d2 = (lon - lon0).powi(2) + (lat - lat0).powi(2);
            100.0 * (-d2 / 50.0).exp()
        },
    );
    Grid::new(field.x, field.y, field.data, None).unwrap()
}

// ============================================================================
// Axis normalization
// ============================================================================

#[test]
fn test_normalize_descending_y() {
    // North-to-south rows, as most gridded products store them
    let normalized = normalize_axes(
        vec![0.0, 1.0, 2.0],
        vec![50.0, 40.0],
        vec![1.0, 2.0, 3.0, 4.0, 5.0, 6.0],
    )
    .unwrap();

    assert_eq!(normalized.y, vec![40.0, 50.0]);
    assert_eq!(normalized.data, vec![4.0, 5.0, 6.0, 1.0, 2.0, 3.0]);
    assert!(normalized.order.y_reversed);
    assert!(!normalized.order.x_reversed);
}

#[test]
fn test_normalize_descending_both() {
    let normalized = normalize_axes(
        vec![2.0, 1.0],
        vec![1.0, 0.0],
        vec![1.0, 2.0, 3.0, 4.0],
    )
    .unwrap();

    assert_eq!(normalized.x, vec![1.0, 2.0]);
    assert_eq!(normalized.y, vec![0.0, 1.0]);
    assert_eq!(normalized.data, vec![4.0, 3.0, 2.0, 1.0]);
}

#[test]
fn test_normalize_rejects_non_monotonic_axis() {
    let result = normalize_axes(vec![0.0, 2.0, 1.0], vec![0.0, 1.0], vec![0.0; 6]);
    assert!(matches!(
        result,
        Err(ContourError::NotMonotonic { axis: "x", index: 2 })
    ));

    let result = normalize_axes(vec![0.0, 1.0], vec![3.0, 3.0], vec![0.0; 4]);
    assert!(matches!(
        result,
        Err(ContourError::NotMonotonic { axis: "y", .. })
    ));
}

#[test]
fn test_normalize_rejects_shape_mismatch() {
    let result = normalize_axes(vec![0.0, 1.0], vec![0.0, 1.0], vec![0.0; 3]);
    assert!(matches!(result, Err(ContourError::ShapeMismatch(_))));
}

#[test]
fn test_flipped_grid_traces_like_ascending_grid() {
    init_tracing();
    let ascending = lonlat_peak(0.0, 0.0);

    let mut rows: Vec<&[f64]> = ascending.data().chunks(ascending.nx()).collect();
    rows.reverse();
    let mut y = ascending.y().to_vec();
    y.reverse();

    let config = ContourConfig::with_levels(vec![25.0, 75.0]);
    let flipped = config
        .grid(ascending.x().to_vec(), y, rows.concat())
        .unwrap();
    assert_eq!(flipped, ascending);

    let a = trace_contour_lines(&ascending, &config.levels);
    let b = trace_contour_lines(&flipped, &config.levels);
    assert_eq!(a.lines, b.lines);
}

// ============================================================================
// Index and world coordinates
// ============================================================================

#[test]
fn test_index_world_round_trip_on_uneven_axes() {
    let grid = Grid::new(
        vec![0.0, 1.0, 3.0, 7.0],
        vec![-10.0, 0.0, 5.0],
        vec![0.0; 12],
        None,
    )
    .unwrap();

    assert_eq!(index_to_world(&grid, 0.0, 0.0), PointD::new(0.0, -10.0));
    assert_eq!(index_to_world(&grid, 1.5, 2.5), PointD::new(5.0, 2.5));
    assert_eq!(index_to_world(&grid, 2.0, 3.0), PointD::new(7.0, 5.0));

    let (row, col) = world_to_index(&grid, PointD::new(5.0, 2.5)).unwrap();
    assert!((row - 1.5).abs() < 1e-12);
    assert!((col - 2.5).abs() < 1e-12);

    assert!(world_to_index(&grid, PointD::new(8.0, 0.0)).is_none());
    assert!(world_to_index(&grid, PointD::new(1.0, -11.0)).is_none());
}

// ============================================================================
// Slice embedding
// ============================================================================

#[test]
fn test_embed_line_in_xz_plane() {
    let traced = line(&[(0.0, 0.0), (1.0, 2.0)], false);
    let embedded = embed_line(&traced, SlicePlane::Xz { y: 7.0 });
    assert_eq!(
        embedded,
        vec![Point3::new(0.0, 7.0, 0.0), Point3::new(1.0, 7.0, 2.0)]
    );
}

#[test]
fn test_embed_polygon_keeps_band() {
    let polygon = square_polygon(1.0, 2.0, 1.0);
    let embedded = embed_polygon(&polygon, SlicePlane::Yz { x: -3.0 });
    assert_eq!(embedded.outer.len(), polygon.outer.len());
    assert!(embedded.outer.iter().all(|p| p.x == -3.0));
    assert_eq!(embedded.outer[0], Point3::new(-3.0, 1.0, 2.0));
    assert_eq!((embedded.low_value, embedded.high_value), (0.0, 1.0));
    assert!(embedded.holes.is_empty());
}

// ============================================================================
// Projection
// ============================================================================

#[test]
fn test_project_line_mercator_equator() {
    let projected = project_line(&line(&[(-10.0, 0.0), (0.0, 0.0), (10.0, 0.0)], false), &mercator())
        .unwrap();
    assert_eq!(projected.len(), 1);
    let points = &projected[0].points;
    assert_eq!(points.len(), 3);
    assert!(points[1].x.abs() < 1e-6);
    assert!((points[2].x - 6_378_137.0 * 10f64.to_radians()).abs() < 1e-3);
    assert!(points.iter().all(|p| p.y.abs() < 1e-6));
    assert_eq!(projected[0].value, 10.0);
}

#[test]
fn test_project_line_splits_at_pole() {
    let through_pole = line(
        &[(0.0, 70.0), (0.0, 80.0), (0.0, 90.0), (10.0, 80.0), (20.0, 70.0)],
        false,
    );
    let projected = project_line(&through_pole, &mercator()).unwrap();
    assert_eq!(projected.len(), 2);
    assert!(projected.iter().all(|p| p.points.len() == 2 && !p.closed));
}

#[test]
fn test_project_line_drops_far_side_of_disk() {
    let goes = Projection::from_proj_string(proj::GOES_EAST).unwrap();
    let equator = line(
        &[
            (-80.0, 0.0),
            (-75.0, 0.0),
            (-70.0, 0.0),
            (105.0, 0.0),
            (100.0, 0.0),
            (95.0, 0.0),
        ],
        false,
    );
    let projected = project_line(&equator, &goes).unwrap();
    assert_eq!(projected.len(), 1);
    assert_eq!(projected[0].points.len(), 3);
    // The sub-satellite point projects to the origin
    assert!(projected[0].points[1].x.abs() < 1e-6);
}

#[test]
fn test_project_closed_line_stays_closed() {
    let ring = line(
        &[(0.0, 0.0), (0.0, 1.0), (1.0, 1.0), (1.0, 0.0), (0.0, 0.0)],
        true,
    );
    let projected = project_line(&ring, &mercator()).unwrap();
    assert_eq!(projected.len(), 1);
    assert!(projected[0].closed);
}

#[test]
fn test_project_closed_line_rejoins_across_seam() {
    // The pole is the only gap, so the ring opens there and nowhere else
    let ring = line(
        &[
            (0.0, 80.0),
            (10.0, 85.0),
            (20.0, 90.0),
            (30.0, 85.0),
            (20.0, 80.0),
            (0.0, 80.0),
        ],
        true,
    );
    let merc = mercator();
    let projected = project_line(&ring, &merc).unwrap();
    assert_eq!(projected.len(), 1);

    let piece = &projected[0];
    assert!(!piece.closed);
    let expected: Vec<PointD> = [(30.0, 85.0), (20.0, 80.0), (0.0, 80.0), (10.0, 85.0)]
        .iter()
        .map(|&(lon, lat)| PointD::from(merc.project(lon, lat).unwrap()))
        .collect();
    assert_eq!(piece.points, expected);
}

#[test]
fn test_project_polygons_from_lonlat_grid() {
    let grid = lonlat_peak(-75.0, 30.0);
    let levels = [20.5, 50.5, 80.5];
    let traced = trace_contour_lines(&grid, &levels);
    let polygons = build_polygons(&grid, &traced, &levels);
    assert_eq!(polygons.len(), 4);

    let merc = mercator();
    for polygon in &polygons {
        let projected = project_polygon(polygon, &merc).unwrap().unwrap();
        assert!(signed_area(&projected.outer) > 0.0);
        assert!(projected.area > 0.0);
        assert_eq!(projected.holes.len(), polygon.holes.len());
        assert!(projected.holes.iter().all(|h| signed_area(h) < 0.0));
        assert_eq!(
            (projected.low_value, projected.high_value),
            (polygon.low_value, polygon.high_value)
        );
        // Metres, not degrees
        assert!(projected.extent.max_x.abs() > 1e6);
    }
}

#[test]
fn test_project_polygon_outside_disk_is_none() {
    let goes = Projection::from_proj_string(proj::GOES_EAST).unwrap();
    let hidden = square_polygon(100.0, -5.0, 10.0);
    assert!(project_polygon(&hidden, &goes).unwrap().is_none());

    let visible = square_polygon(-80.0, -5.0, 10.0);
    let projected = project_polygon(&visible, &goes).unwrap().unwrap();
    assert_eq!(projected.outer.len(), 5);
    assert!(signed_area(&projected.outer) > 0.0);
}
