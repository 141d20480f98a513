//! Linear (equirectangular) grid projection.
//!
//! The grid is laid over its bounds with uniform spacing:
//!
//! ```text
//! lon = west  + (col / cols) * (east - west)
//! lat = south + (row / rows) * (north - south)
//! ```
//!
//! Marching squares never produces points outside `[0, rows-1] x [0, cols-1]`,
//! but projecting anything else is still well-defined and simply lands
//! outside the nominal bounds.

use contour_common::{GeoBounds, GeoPoint, GridDomain, GridPoint};

use crate::GridProjection;

/// Affine mapping between fractional sample indices and degrees.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LinearProjector {
    west: f64,
    south: f64,
    lon_step: f64,
    lat_step: f64,
}

impl LinearProjector {
    pub fn new(domain: &GridDomain) -> Self {
        Self {
            west: domain.bounds.west,
            south: domain.bounds.south,
            lon_step: domain.lon_spacing(),
            lat_step: domain.lat_spacing(),
        }
    }

    /// Degrees per grid step as `(lon, lat)`.
    pub fn spacing(&self) -> (f64, f64) {
        (self.lon_step, self.lat_step)
    }

    /// Bounds covered by `rows x cols` samples under this projector.
    pub fn bounds_for(&self, rows: usize, cols: usize) -> GeoBounds {
        GeoBounds::new(
            self.west,
            self.south,
            self.west + cols as f64 * self.lon_step,
            self.south + rows as f64 * self.lat_step,
        )
    }
}

impl From<&GridDomain> for LinearProjector {
    fn from(domain: &GridDomain) -> Self {
        Self::new(domain)
    }
}

impl GridProjection for LinearProjector {
    fn grid_to_geo(&self, point: GridPoint) -> GeoPoint {
        GeoPoint::new(
            self.west + point.col * self.lon_step,
            self.south + point.row * self.lat_step,
        )
    }

    fn geo_to_grid(&self, point: GeoPoint) -> GridPoint {
        GridPoint::new(
            (point.lat - self.south) / self.lat_step,
            (point.lon - self.west) / self.lon_step,
        )
    }
}
