//! Common value types shared by the projection and contour crates.

pub mod bbox;
pub mod point;

pub use bbox::BoundingBox;
pub use point::PointD;
