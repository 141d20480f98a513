//! Mappings between grid-local coordinates and geographic coordinates.
//!
//! Contours are extracted in fractional `(row, col)` space and projected to
//! longitude/latitude just before they are handed to a renderer.

pub mod linear;

pub use linear::LinearProjector;

use contour_common::{GeoPoint, GridPoint};

/// A reversible mapping from grid-local space to geographic space.
pub trait GridProjection {
    /// Map a fractional grid position to longitude/latitude.
    fn grid_to_geo(&self, point: GridPoint) -> GeoPoint;

    /// Map longitude/latitude back to a fractional grid position.
    fn geo_to_grid(&self, point: GeoPoint) -> GridPoint;

    /// Project a whole polyline.
    fn project_all(&self, points: &[GridPoint]) -> Vec<GeoPoint> {
        points.iter().map(|&p| self.grid_to_geo(p)).collect()
    }
}
