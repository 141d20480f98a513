//! Contour extraction and rendering.
//!
//! - [`contour`]: cell classification and segment generation (marching squares)
//! - [`stitch`]: joining segments into polylines
//! - [`smooth`]: Laplacian and Catmull-Rom smoothing
//! - [`labels`], [`style`]: label placement and per-level colors
//! - [`session`]: the renderer trait and the session owning drawn entities
//! - [`canvas`], [`geojson`]: bundled renderers
//! - [`pipeline`]: orchestration of all of the above

pub mod canvas;
pub mod contour;
pub mod geojson;
pub mod labels;
pub mod pipeline;
pub mod session;
pub mod smooth;
pub mod stitch;
pub mod style;

pub use canvas::{CanvasRenderer, CanvasStyle};
pub use contour::{march_squares, normalize_levels, uniform_levels, CellCase, Contour, CrossingMode, Segment};
pub use geojson::GeoJsonRenderer;
pub use pipeline::{ContourPipeline, DrawReport, PipelineConfig, ProjectedContour};
pub use session::{ContourRenderer, EntityHandle, Primitive, RenderSession};
pub use smooth::{smooth_points, SmoothingMethod};
pub use stitch::{stitch_segments, StitchStrategy};
pub use style::{Color, LevelPalette};
