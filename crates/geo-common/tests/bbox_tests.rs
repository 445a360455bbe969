//! Tests for BoundingBox and PointD operations.

use geo_common::{BoundingBox, PointD};

// ============================================================================
// Constructor tests
// ============================================================================

#[test]
fn test_bbox_new() {
    let bbox = BoundingBox::new(-180.0, -90.0, 180.0, 90.0);
    assert_eq!(bbox.min_x, -180.0);
    assert_eq!(bbox.min_y, -90.0);
    assert_eq!(bbox.max_x, 180.0);
    assert_eq!(bbox.max_y, 90.0);
    assert_eq!(bbox.width(), 360.0);
    assert_eq!(bbox.height(), 180.0);
}

#[test]
fn test_bbox_from_single_point() {
    let bbox = BoundingBox::from_points(&[PointD::new(2.0, 3.0)]).unwrap();
    assert_eq!(bbox.width(), 0.0);
    assert_eq!(bbox.height(), 0.0);
    assert!(bbox.contains_point(2.0, 3.0));
}

// ============================================================================
// Growth and containment
// ============================================================================

#[test]
fn test_expand_to_include() {
    let mut bbox = BoundingBox::new(0.0, 0.0, 1.0, 1.0);
    bbox.expand_to_include(-2.0, 0.5);
    bbox.expand_to_include(0.5, 4.0);
    assert_eq!(bbox, BoundingBox::new(-2.0, 0.0, 1.0, 4.0));
}

#[test]
fn test_contains_point_edges_inclusive() {
    let bbox = BoundingBox::new(0.0, 0.0, 2.0, 1.0);
    assert!(bbox.contains_point(0.0, 0.0));
    assert!(bbox.contains_point(2.0, 1.0));
    assert!(!bbox.contains_point(2.0 + 1e-12, 0.5));
    assert!(!bbox.contains_point(1.0, f64::NAN));
}

#[test]
fn test_from_points_ignores_non_finite() {
    let bbox = BoundingBox::from_points(&[
        PointD::new(f64::INFINITY, 0.0),
        PointD::new(1.0, 1.0),
        PointD::new(-1.0, 3.0),
    ])
    .unwrap();
    assert_eq!(bbox, BoundingBox::new(-1.0, 1.0, 1.0, 3.0));
}

// ============================================================================
// Serialization
// ============================================================================

#[test]
fn test_bbox_serde_roundtrip() {
    let bbox = BoundingBox::new(-125.5, 24.75, -66.25, 50.125);
    let json = serde_json::to_string(&bbox).unwrap();
    let back: BoundingBox = serde_json::from_str(&json).unwrap();
    assert_eq!(bbox, back);
}
