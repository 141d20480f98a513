//! The renderer seam and the session that owns everything drawn through it.
//!
//! A [`ContourRenderer`] is whatever actually displays geometry: a globe
//! viewer, a raster canvas, a GeoJSON collector. The pipeline never talks to
//! one directly; it goes through a [`RenderSession`], which remembers every
//! entity it created so a redraw can start by clearing the previous one.
//! Labels are remembered apart from the geometry so they can be hidden and
//! shown again without redrawing the contours.

use std::fmt;

use contour_common::{ContourError, ContourResult, GeoPoint};
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::style::Color;

/// Opaque identifier for something a renderer has drawn.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct EntityHandle(pub u64);

impl fmt::Display for EntityHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "entity-{}", self.0)
    }
}

/// How a contour polyline is drawn.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Primitive {
    /// Filled polygon. The polyline is expected to be closed.
    Fill,
    /// Outline.
    Line,
}

/// A display backend for projected contours.
pub trait ContourRenderer {
    /// Draw a polyline or polygon at `height` metres above the surface.
    fn render(
        &mut self,
        contour: &[GeoPoint],
        color: Color,
        height: f64,
        primitive: Primitive,
    ) -> ContourResult<EntityHandle>;

    /// Draw a text label centred on `anchor`.
    fn render_label(
        &mut self,
        anchor: GeoPoint,
        text: &str,
        color: Color,
        height: f64,
    ) -> ContourResult<EntityHandle>;

    /// Remove a previously drawn entity.
    fn remove(&mut self, handle: EntityHandle) -> ContourResult<()>;
}

impl<R: ContourRenderer + ?Sized> ContourRenderer for &mut R {
    fn render(
        &mut self,
        contour: &[GeoPoint],
        color: Color,
        height: f64,
        primitive: Primitive,
    ) -> ContourResult<EntityHandle> {
        (**self).render(contour, color, height, primitive)
    }

    fn render_label(
        &mut self,
        anchor: GeoPoint,
        text: &str,
        color: Color,
        height: f64,
    ) -> ContourResult<EntityHandle> {
        (**self).render_label(anchor, text, color, height)
    }

    fn remove(&mut self, handle: EntityHandle) -> ContourResult<()> {
        (**self).remove(handle)
    }
}

/// A label as requested, plus its entity while shown.
#[derive(Debug, Clone)]
struct LabelEntry {
    anchor: GeoPoint,
    text: String,
    color: Color,
    height: f64,
    handle: Option<EntityHandle>,
}

/// A renderer plus the handles of everything drawn through it.
pub struct RenderSession<R: ContourRenderer> {
    renderer: R,
    handles: Vec<EntityHandle>,
    labels: Vec<LabelEntry>,
    labels_visible: bool,
}

impl<R: ContourRenderer> RenderSession<R> {
    pub fn new(renderer: R) -> Self {
        Self {
            renderer,
            handles: Vec::new(),
            labels: Vec::new(),
            labels_visible: true,
        }
    }

    pub fn render(
        &mut self,
        contour: &[GeoPoint],
        color: Color,
        height: f64,
        primitive: Primitive,
    ) -> ContourResult<EntityHandle> {
        let handle = self.renderer.render(contour, color, height, primitive)?;
        self.handles.push(handle);
        Ok(handle)
    }

    /// Draw a label, or only record it while labels are hidden.
    ///
    /// Returns the entity handle when the label was actually drawn.
    pub fn render_label(
        &mut self,
        anchor: GeoPoint,
        text: &str,
        color: Color,
        height: f64,
    ) -> ContourResult<Option<EntityHandle>> {
        let handle = if self.labels_visible {
            let handle = self.renderer.render_label(anchor, text, color, height)?;
            self.handles.push(handle);
            Some(handle)
        } else {
            None
        };

        self.labels.push(LabelEntry {
            anchor,
            text: text.to_string(),
            color,
            height,
            handle,
        });
        Ok(handle)
    }

    pub fn labels_visible(&self) -> bool {
        self.labels_visible
    }

    /// Show or hide every label recorded since the last [`clear`](Self::clear).
    ///
    /// Hiding removes the label entities; showing draws them again. Labels
    /// drawn while hidden are recorded and appear on the next show. Failures
    /// are logged per label. Returns how many labels changed state.
    pub fn set_labels_visible(&mut self, visible: bool) -> usize {
        self.labels_visible = visible;
        let mut changed = 0;

        for entry in &mut self.labels {
            match (visible, entry.handle) {
                (false, Some(handle)) => {
                    entry.handle = None;
                    self.handles.retain(|h| *h != handle);
                    match self.renderer.remove(handle) {
                        Ok(()) => changed += 1,
                        Err(e) => warn!(%handle, error = %e, "Failed to hide label"),
                    }
                }
                (true, None) => {
                    match self.renderer.render_label(
                        entry.anchor,
                        &entry.text,
                        entry.color,
                        entry.height,
                    ) {
                        Ok(handle) => {
                            entry.handle = Some(handle);
                            self.handles.push(handle);
                            changed += 1;
                        }
                        Err(e) => warn!(text = %entry.text, error = %e, "Failed to show label"),
                    }
                }
                _ => {}
            }
        }

        debug!(visible, changed, total = self.labels.len(), "Toggled labels");
        changed
    }

    /// Remove every entity this session created and forget recorded labels.
    ///
    /// Removal failures are logged and do not stop the sweep; the handle
    /// list is empty afterwards either way. Returns how many removals
    /// succeeded. Label visibility is kept for the next draw.
    pub fn clear(&mut self) -> usize {
        self.labels.clear();

        let total = self.handles.len();
        let mut removed = 0;

        for handle in self.handles.drain(..) {
            match self.renderer.remove(handle) {
                Ok(()) => removed += 1,
                Err(e) => warn!(%handle, error = %e, "Failed to remove entity"),
            }
        }

        debug!(removed, total, "Cleared render session");
        removed
    }

    /// Handles created since the last [`clear`](Self::clear), in draw order.
    pub fn handles(&self) -> &[EntityHandle] {
        &self.handles
    }

    pub fn renderer(&self) -> &R {
        &self.renderer
    }

    pub fn renderer_mut(&mut self) -> &mut R {
        &mut self.renderer
    }

    pub fn into_inner(self) -> R {
        self.renderer
    }
}

/// Convenience for renderers that hand out sequential ids.
#[derive(Debug, Default)]
pub(crate) struct HandleAllocator {
    next: u64,
}

impl HandleAllocator {
    pub(crate) fn allocate(&mut self) -> EntityHandle {
        self.next += 1;
        EntityHandle(self.next)
    }
}

/// Reject geometry a renderer cannot draw as `primitive`.
pub(crate) fn validate_geometry(contour: &[GeoPoint], primitive: Primitive) -> ContourResult<()> {
    let required = match primitive {
        Primitive::Fill => 3,
        Primitive::Line => 2,
    };
    if contour.len() < required {
        return Err(ContourError::DegenerateContour {
            points: contour.len(),
            required,
        });
    }
    if contour.iter().any(|p| !p.lon.is_finite() || !p.lat.is_finite()) {
        return Err(ContourError::Render("non-finite coordinate".to_string()));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[derive(Default)]
    struct Recorder {
        ids: HandleAllocator,
        live: HashSet<EntityHandle>,
    }

    impl ContourRenderer for Recorder {
        fn render(
            &mut self,
            contour: &[GeoPoint],
            _color: Color,
            _height: f64,
            primitive: Primitive,
        ) -> ContourResult<EntityHandle> {
            validate_geometry(contour, primitive)?;
            let handle = self.ids.allocate();
            self.live.insert(handle);
            Ok(handle)
        }

        fn render_label(
            &mut self,
            _anchor: GeoPoint,
            _text: &str,
            _color: Color,
            _height: f64,
        ) -> ContourResult<EntityHandle> {
            let handle = self.ids.allocate();
            self.live.insert(handle);
            Ok(handle)
        }

        fn remove(&mut self, handle: EntityHandle) -> ContourResult<()> {
            if self.live.remove(&handle) {
                Ok(())
            } else {
                Err(ContourError::EntityNotFound(handle.0))
            }
        }
    }

    fn line() -> Vec<GeoPoint> {
        vec![GeoPoint::new(0.0, 0.0), GeoPoint::new(1.0, 1.0)]
    }

    #[test]
    fn test_session_tracks_handles() {
        let mut session = RenderSession::new(Recorder::default());
        let a = session.render(&line(), Color::WHITE, 0.0, Primitive::Line).unwrap();
        let b = session
            .render_label(GeoPoint::new(0.5, 0.5), "0.50", Color::WHITE, 0.0)
            .unwrap()
            .unwrap();
        assert_eq!(session.handles(), &[a, b]);
        assert_eq!(session.renderer().live.len(), 2);
    }

    #[test]
    fn test_failed_render_is_not_tracked() {
        let mut session = RenderSession::new(Recorder::default());
        let err = session
            .render(&line(), Color::WHITE, 0.0, Primitive::Fill)
            .unwrap_err();
        assert!(matches!(err, ContourError::DegenerateContour { points: 2, required: 3 }));
        assert!(session.handles().is_empty());
    }

    #[test]
    fn test_clear_removes_everything() {
        let mut session = RenderSession::new(Recorder::default());
        for _ in 0..3 {
            session.render(&line(), Color::BLACK, 0.0, Primitive::Line).unwrap();
        }
        assert_eq!(session.clear(), 3);
        assert!(session.handles().is_empty());
        assert!(session.renderer().live.is_empty());
        // Clearing twice is harmless
        assert_eq!(session.clear(), 0);
    }

    #[test]
    fn test_clear_survives_missing_entities() {
        let mut session = RenderSession::new(Recorder::default());
        let a = session.render(&line(), Color::BLACK, 0.0, Primitive::Line).unwrap();
        session.render(&line(), Color::BLACK, 0.0, Primitive::Line).unwrap();
        // Removed behind the session's back
        session.renderer_mut().remove(a).unwrap();

        assert_eq!(session.clear(), 1);
        assert!(session.handles().is_empty());
    }

    #[test]
    fn test_hide_and_show_labels() {
        let mut session = RenderSession::new(Recorder::default());
        let outline = session.render(&line(), Color::WHITE, 0.0, Primitive::Line).unwrap();
        for text in ["0.25", "0.75"] {
            session
                .render_label(GeoPoint::new(0.5, 0.5), text, Color::WHITE, 2.0)
                .unwrap();
        }
        assert_eq!(session.renderer().live.len(), 3);

        assert_eq!(session.set_labels_visible(false), 2);
        assert!(!session.labels_visible());
        assert_eq!(session.handles(), &[outline]);
        assert_eq!(session.renderer().live.len(), 1);
        // Hiding twice changes nothing
        assert_eq!(session.set_labels_visible(false), 0);

        // Recorded while hidden, drawn on the next show
        let hidden = session
            .render_label(GeoPoint::new(1.0, 1.0), "0.50", Color::WHITE, 2.0)
            .unwrap();
        assert!(hidden.is_none());
        assert_eq!(session.renderer().live.len(), 1);

        assert_eq!(session.set_labels_visible(true), 3);
        assert_eq!(session.handles().len(), 4);
        assert_eq!(session.renderer().live.len(), 4);

        assert_eq!(session.clear(), 4);
        assert_eq!(session.set_labels_visible(false), 0);
    }

    #[test]
    fn test_validate_rejects_nan() {
        let bad = vec![GeoPoint::new(0.0, 0.0), GeoPoint::new(f64::NAN, 1.0)];
        assert!(validate_geometry(&bad, Primitive::Line).is_err());
    }
}
