//! Geographic bounds and the grid domain they describe.

use serde::{Deserialize, Serialize};

use crate::{ContourError, ContourResult};

/// A longitude/latitude pair in degrees.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GeoPoint {
    pub lon: f64,
    pub lat: f64,
}

impl GeoPoint {
    pub fn new(lon: f64, lat: f64) -> Self {
        Self { lon, lat }
    }

    /// Planar distance in degrees. Good enough for label spacing on the
    /// small domains this pipeline draws.
    pub fn distance(&self, other: &GeoPoint) -> f64 {
        let dx = self.lon - other.lon;
        let dy = self.lat - other.lat;
        (dx * dx + dy * dy).sqrt()
    }
}

/// A geographic bounding box in degrees.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GeoBounds {
    pub west: f64,
    pub south: f64,
    pub east: f64,
    pub north: f64,
}

impl GeoBounds {
    pub fn new(west: f64, south: f64, east: f64, north: f64) -> Self {
        Self {
            west,
            south,
            east,
            north,
        }
    }

    /// Parse a "west,south,east,north" string.
    pub fn parse(s: &str) -> Result<Self, BoundsParseError> {
        let parts: Vec<&str> = s.split(',').map(str::trim).collect();
        if parts.len() != 4 {
            return Err(BoundsParseError::InvalidFormat(s.to_string()));
        }

        let mut values = [0.0f64; 4];
        for (slot, part) in values.iter_mut().zip(&parts) {
            *slot = part
                .parse()
                .map_err(|_| BoundsParseError::InvalidNumber(part.to_string()))?;
        }

        Ok(Self::new(values[0], values[1], values[2], values[3]))
    }

    pub fn width(&self) -> f64 {
        self.east - self.west
    }

    pub fn height(&self) -> f64 {
        self.north - self.south
    }

    pub fn center(&self) -> GeoPoint {
        GeoPoint::new(
            (self.west + self.east) / 2.0,
            (self.south + self.north) / 2.0,
        )
    }

    pub fn contains(&self, point: &GeoPoint) -> bool {
        point.lon >= self.west
            && point.lon <= self.east
            && point.lat >= self.south
            && point.lat <= self.north
    }
}

#[derive(Debug, thiserror::Error)]
pub enum BoundsParseError {
    #[error("Invalid bounds format: {0}. Expected 'west,south,east,north'")]
    InvalidFormat(String),

    #[error("Invalid number in bounds: {0}")]
    InvalidNumber(String),
}

/// The geographic footprint of a `rows x cols` sample grid.
///
/// Sample `(row, col)` sits at `west + col * lon_spacing`,
/// `south + row * lat_spacing`, with spacing `extent / samples`. Row 0 is the
/// southern edge.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GridDomain {
    pub rows: usize,
    pub cols: usize,
    pub bounds: GeoBounds,
}

impl GridDomain {
    /// Domain from explicit bounds.
    pub fn from_bounds(rows: usize, cols: usize, bounds: GeoBounds) -> ContourResult<Self> {
        if rows == 0 || cols == 0 {
            return Err(ContourError::InvalidGrid(format!(
                "domain needs a non-empty grid, got {}x{}",
                rows, cols
            )));
        }
        if !(bounds.width() > 0.0 && bounds.height() > 0.0) {
            return Err(ContourError::InvalidGrid(format!(
                "bounds must have positive extent: {:?}",
                bounds
            )));
        }
        Ok(Self { rows, cols, bounds })
    }

    /// Domain centred on `center` with a uniform `spacing` in degrees.
    ///
    /// Equivalent to `center - samples * spacing / 2 + index * spacing`.
    pub fn from_center(
        rows: usize,
        cols: usize,
        center: GeoPoint,
        spacing: f64,
    ) -> ContourResult<Self> {
        let half_w = cols as f64 * spacing / 2.0;
        let half_h = rows as f64 * spacing / 2.0;
        let bounds = GeoBounds::new(
            center.lon - half_w,
            center.lat - half_h,
            center.lon + half_w,
            center.lat + half_h,
        );
        Self::from_bounds(rows, cols, bounds)
    }

    pub fn lon_spacing(&self) -> f64 {
        self.bounds.width() / self.cols as f64
    }

    pub fn lat_spacing(&self) -> f64 {
        self.bounds.height() / self.rows as f64
    }

    /// Geographic position of a sample.
    pub fn sample_position(&self, row: usize, col: usize) -> GeoPoint {
        GeoPoint::new(
            self.bounds.west + col as f64 * self.lon_spacing(),
            self.bounds.south + row as f64 * self.lat_spacing(),
        )
    }
}
