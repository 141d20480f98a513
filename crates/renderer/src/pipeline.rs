//! End-to-end contour drawing: field in, rendered entities out.
//!
//! For every requested level the pipeline marches the field, stitches the
//! segments, closes and smooths each contour in grid space, projects it and
//! hands fill, outline and labels to the session. A failure on one contour
//! or level is logged and counted; it never aborts the draw call.

use std::time::Instant;

use contour_common::{ContourError, ContourResult, GeoPoint, ScalarField, POINT_EPSILON};
use projection::GridProjection;
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use crate::contour::{march_squares, normalize_levels, Contour, CrossingMode};
use crate::labels::{format_label, place_labels, LabelMode};
use crate::session::{ContourRenderer, Primitive, RenderSession};
use crate::smooth::{smooth_points, SmoothingMethod};
use crate::stitch::{stitch_segments, StitchStrategy};
use crate::style::{Color, LevelPalette};

/// Contours with fewer points than this are dropped before drawing.
pub const MIN_CONTOUR_POINTS: usize = 3;

fn default_levels() -> Vec<f64> {
    vec![0.2, 0.4, 0.6, 0.8]
}

fn default_height() -> f64 {
    1000.0
}

fn default_true() -> bool {
    true
}

fn default_fill_alpha() -> f64 {
    0.3
}

fn default_outline_offset() -> f64 {
    1.0
}

fn default_label_offset() -> f64 {
    2.0
}

/// Drawing options for [`ContourPipeline`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PipelineConfig {
    /// Normalised levels in `[0, 1]`, mapped onto the field's value range.
    #[serde(default = "default_levels")]
    pub levels: Vec<f64>,

    /// Base height in metres for fills.
    #[serde(default = "default_height")]
    pub height: f64,

    #[serde(default)]
    pub smoothing: SmoothingMethod,

    #[serde(default)]
    pub crossing: CrossingMode,

    #[serde(default)]
    pub stitch: StitchStrategy,

    #[serde(default = "default_true")]
    pub labels: bool,

    #[serde(default)]
    pub label_mode: LabelMode,

    #[serde(default = "default_true")]
    pub fill: bool,

    /// Opacity of fill polygons in `[0, 1]`.
    #[serde(default = "default_fill_alpha")]
    pub fill_alpha: f64,

    #[serde(default)]
    pub palette: LevelPalette,

    /// Outlines sit this far above the fill.
    #[serde(default = "default_outline_offset")]
    pub outline_offset: f64,

    /// Labels sit this far above the fill.
    #[serde(default = "default_label_offset")]
    pub label_offset: f64,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            levels: default_levels(),
            height: default_height(),
            smoothing: SmoothingMethod::default(),
            crossing: CrossingMode::default(),
            stitch: StitchStrategy::default(),
            labels: true,
            label_mode: LabelMode::default(),
            fill: true,
            fill_alpha: default_fill_alpha(),
            palette: LevelPalette::default(),
            outline_offset: default_outline_offset(),
            label_offset: default_label_offset(),
        }
    }
}

/// What one [`ContourPipeline::draw`] call produced.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct DrawReport {
    pub levels_requested: usize,
    /// Levels that produced at least one drawn contour.
    pub levels_drawn: usize,
    pub contours_drawn: usize,
    /// Contours dropped for having too few points or no extent.
    pub contours_skipped: usize,
    pub labels_drawn: usize,
    /// Rejected levels plus renderer errors.
    pub failures: usize,
}

/// A contour ready for rendering.
#[derive(Debug, Clone, PartialEq)]
pub struct ProjectedContour {
    pub threshold: f64,
    pub closed: bool,
    pub points: Vec<GeoPoint>,
}

/// Turns scalar fields into rendered contours.
#[derive(Debug, Clone, Default)]
pub struct ContourPipeline {
    config: PipelineConfig,
}

impl ContourPipeline {
    pub fn new(config: PipelineConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &PipelineConfig {
        &self.config
    }

    /// Thresholds in draw order (highest first) for this field.
    ///
    /// Returns `None` when the field holds no finite value.
    pub fn thresholds(&self, field: &ScalarField) -> Option<Vec<f64>> {
        let (min, max) = field.value_range()?;
        Some(normalize_levels(&self.config.levels, min, max))
    }

    /// Closed, smoothed grid-space contours at one threshold.
    ///
    /// The second value counts contours dropped for having fewer than
    /// [`MIN_CONTOUR_POINTS`] points or zero length. A threshold that lands
    /// exactly on an isolated sample stitches into a ring of coincident
    /// points, which falls in the second group.
    pub fn extract(&self, field: &ScalarField, threshold: f64) -> (Vec<Contour>, usize) {
        let segments = march_squares(field, threshold, self.config.crossing);
        let stitched = stitch_segments(segments, self.config.stitch);

        let mut skipped = 0;
        let mut contours = Vec::with_capacity(stitched.len());

        for mut contour in stitched {
            let length = contour.length();
            if contour.len() < MIN_CONTOUR_POINTS || length <= POINT_EPSILON {
                debug!(
                    threshold,
                    points = contour.len(),
                    length,
                    "Skipping degenerate contour"
                );
                skipped += 1;
                continue;
            }

            contour.close();
            let mut smoothed = Contour::new(smooth_points(&contour.points, self.config.smoothing));
            if !smoothed.is_closed() {
                // Smoothing may pull the duplicated endpoint off the start.
                smoothed.points.pop();
                smoothed.close();
            }
            contours.push(smoothed);
        }

        (contours, skipped)
    }

    /// Extract and project every contour of every level.
    pub fn project<P: GridProjection>(
        &self,
        field: &ScalarField,
        projector: &P,
    ) -> Vec<ProjectedContour> {
        let Some(thresholds) = self.thresholds(field) else {
            return vec![];
        };

        thresholds
            .into_iter()
            .flat_map(|threshold| {
                let (contours, _) = self.extract(field, threshold);
                contours.into_iter().map(move |c| ProjectedContour {
                    threshold,
                    closed: c.is_closed(),
                    points: projector.project_all(&c.points),
                })
            })
            .collect()
    }

    /// Draw every configured level of `field` into `session`.
    pub fn draw<P, R>(
        &self,
        field: &ScalarField,
        projector: &P,
        session: &mut RenderSession<R>,
    ) -> DrawReport
    where
        P: GridProjection,
        R: ContourRenderer,
    {
        let start = Instant::now();
        let mut report = DrawReport {
            levels_requested: self.config.levels.len(),
            ..DrawReport::default()
        };

        for &level in &self.config.levels {
            if !(0.0..=1.0).contains(&level) {
                let err = ContourError::InvalidLevel {
                    level,
                    message: "normalised levels must lie in [0, 1]".to_string(),
                };
                warn!(error = %err, "Skipping level");
                report.failures += 1;
            }
        }

        let Some(thresholds) = self.thresholds(field) else {
            warn!(
                rows = field.rows(),
                cols = field.cols(),
                "Field has no finite values, nothing to draw"
            );
            return report;
        };

        for (index, &threshold) in thresholds.iter().enumerate() {
            let color = self.config.palette.color(index);
            let (contours, skipped) = self.extract(field, threshold);
            report.contours_skipped += skipped;

            let mut drawn = 0;
            for contour in &contours {
                let points = projector.project_all(&contour.points);
                match self.draw_contour(session, &points, threshold, color, &mut report) {
                    Ok(()) => drawn += 1,
                    Err(e) => {
                        warn!(
                            threshold,
                            error = %e,
                            input_error = e.is_input_error(),
                            "Failed to draw contour"
                        );
                        report.failures += 1;
                    }
                }
            }

            if drawn > 0 {
                report.levels_drawn += 1;
            }
            report.contours_drawn += drawn;

            debug!(
                level = index,
                threshold,
                contours = contours.len(),
                drawn,
                skipped,
                color = %color.to_hex(),
                "Drew level"
            );
        }

        info!(
            levels = report.levels_drawn,
            contours = report.contours_drawn,
            labels = report.labels_drawn,
            failures = report.failures,
            elapsed_ms = start.elapsed().as_millis() as u64,
            "Contour draw complete"
        );

        report
    }

    /// Fill, outline and labels for one projected contour.
    ///
    /// The outline is what counts as drawn: a failed fill or label is
    /// logged and counted, a failed outline fails the contour.
    fn draw_contour<R: ContourRenderer>(
        &self,
        session: &mut RenderSession<R>,
        points: &[GeoPoint],
        threshold: f64,
        color: Color,
        report: &mut DrawReport,
    ) -> ContourResult<()> {
        let cfg = &self.config;

        if cfg.fill {
            let fill_color = color.with_alpha(cfg.fill_alpha);
            if let Err(e) = session.render(points, fill_color, cfg.height, Primitive::Fill) {
                warn!(threshold, error = %e, "Failed to draw fill");
                report.failures += 1;
            }
        }

        session.render(points, color, cfg.height + cfg.outline_offset, Primitive::Line)?;

        if cfg.labels {
            let text = format_label(threshold);
            for anchor in place_labels(points, true, cfg.label_mode) {
                match session.render_label(anchor, &text, color, cfg.height + cfg.label_offset) {
                    Ok(Some(_)) => report.labels_drawn += 1,
                    Ok(None) => {}
                    Err(e) => {
                        warn!(threshold, error = %e, "Failed to draw label");
                        report.failures += 1;
                    }
                }
            }
        }

        Ok(())
    }
}
