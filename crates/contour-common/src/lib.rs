//! Common types shared across the geo-contour workspace.

pub mod bbox;
pub mod error;
pub mod grid;
pub mod sampler;

pub use bbox::{GeoBounds, GeoPoint, GridDomain};
pub use error::{ContourError, ContourResult};
pub use grid::{points_equal, GridPoint, ScalarField, POINT_EPSILON};
pub use sampler::{GaussianSampler, GridSampler, WavyRampSampler};
