//! Raster preview renderer built on tiny-skia.
//!
//! Entities are kept in a display list so they can be removed again; the
//! pixmap is only produced on demand by [`CanvasRenderer::to_pixmap`].
//! Heights are not projected, they only order the drawing: lower entities
//! are painted first.

use std::collections::BTreeMap;

use contour_common::{ContourError, ContourResult, GeoBounds, GeoPoint};
use tiny_skia::{FillRule, LineCap, LineJoin, Paint, PathBuilder, Pixmap, Stroke, Transform};
use tracing::debug;

use crate::session::{validate_geometry, ContourRenderer, EntityHandle, HandleAllocator, Primitive};
use crate::style::Color;

/// Stroke and label sizes in pixels.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CanvasStyle {
    pub line_width: f32,
    pub label_size: f32,
    pub background: Color,
}

impl Default for CanvasStyle {
    fn default() -> Self {
        Self {
            line_width: 2.0,
            label_size: 10.0,
            background: Color::transparent(),
        }
    }
}

#[derive(Debug, Clone)]
enum Entity {
    Shape {
        points: Vec<GeoPoint>,
        color: Color,
        primitive: Primitive,
    },
    Label {
        anchor: GeoPoint,
        text: String,
        color: Color,
    },
}

#[derive(Debug, Clone)]
struct Placed {
    height: f64,
    entity: Entity,
}

/// Draws contours over a fixed geographic window into an RGBA pixmap.
pub struct CanvasRenderer {
    width: u32,
    height: u32,
    bounds: GeoBounds,
    style: CanvasStyle,
    ids: HandleAllocator,
    entities: BTreeMap<EntityHandle, Placed>,
}

impl CanvasRenderer {
    pub fn new(width: u32, height: u32, bounds: GeoBounds) -> ContourResult<Self> {
        Self::with_style(width, height, bounds, CanvasStyle::default())
    }

    pub fn with_style(
        width: u32,
        height: u32,
        bounds: GeoBounds,
        style: CanvasStyle,
    ) -> ContourResult<Self> {
        if width == 0 || height == 0 {
            return Err(ContourError::Config(format!(
                "canvas size must be positive, got {}x{}",
                width, height
            )));
        }
        if !(bounds.width() > 0.0 && bounds.height() > 0.0) {
            return Err(ContourError::Config(format!(
                "canvas bounds must have positive extent: {:?}",
                bounds
            )));
        }

        Ok(Self {
            width,
            height,
            bounds,
            style,
            ids: HandleAllocator::default(),
            entities: BTreeMap::new(),
        })
    }

    /// Number of entities currently on the display list.
    pub fn len(&self) -> usize {
        self.entities.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entities.is_empty()
    }

    /// Pixel position of a geographic point. North is up.
    pub fn to_pixel(&self, point: GeoPoint) -> (f32, f32) {
        let x = (point.lon - self.bounds.west) / self.bounds.width() * self.width as f64;
        let y = (self.bounds.north - point.lat) / self.bounds.height() * self.height as f64;
        (x as f32, y as f32)
    }

    /// Rasterise the display list.
    pub fn to_pixmap(&self) -> ContourResult<Pixmap> {
        let mut pixmap = Pixmap::new(self.width, self.height).ok_or_else(|| {
            ContourError::Render(format!(
                "failed to allocate {}x{} pixmap",
                self.width, self.height
            ))
        })?;
        let bg = self.style.background;
        pixmap.fill(tiny_skia::Color::from_rgba8(bg.r, bg.g, bg.b, bg.a));

        let mut order: Vec<(&EntityHandle, &Placed)> = self.entities.iter().collect();
        order.sort_by(|a, b| a.1.height.total_cmp(&b.1.height).then(a.0.cmp(b.0)));

        for (_, placed) in order {
            match &placed.entity {
                Entity::Shape {
                    points,
                    color,
                    primitive,
                } => self.draw_shape(&mut pixmap, points, *color, *primitive),
                Entity::Label {
                    anchor,
                    text,
                    color,
                } => self.draw_label(&mut pixmap, *anchor, text, *color),
            }
        }

        debug!(
            entities = self.entities.len(),
            width = self.width,
            height = self.height,
            "Rasterised canvas"
        );

        Ok(pixmap)
    }

    /// Rasterise and encode as PNG.
    pub fn encode_png(&self) -> ContourResult<Vec<u8>> {
        self.to_pixmap()?
            .encode_png()
            .map_err(|e| ContourError::Render(format!("PNG encoding failed: {}", e)))
    }

    fn draw_shape(&self, pixmap: &mut Pixmap, points: &[GeoPoint], color: Color, primitive: Primitive) {
        let mut pb = PathBuilder::new();
        let mut pixels = points.iter().map(|&p| self.to_pixel(p));
        if let Some((x, y)) = pixels.next() {
            pb.move_to(x, y);
        }
        for (x, y) in pixels {
            pb.line_to(x, y);
        }
        if primitive == Primitive::Fill {
            pb.close();
        }
        let Some(path) = pb.finish() else {
            return;
        };

        let paint = paint_for(color);
        match primitive {
            Primitive::Fill => {
                pixmap.fill_path(&path, &paint, FillRule::EvenOdd, Transform::identity(), None);
            }
            Primitive::Line => {
                let stroke = Stroke {
                    width: self.style.line_width,
                    line_cap: LineCap::Round,
                    line_join: LineJoin::Round,
                    ..Stroke::default()
                };
                pixmap.stroke_path(&path, &paint, &stroke, Transform::identity(), None);
            }
        }
    }

    /// Seven-segment stroke text centred on the anchor, with a dark halo.
    fn draw_label(&self, pixmap: &mut Pixmap, anchor: GeoPoint, text: &str, color: Color) {
        let size = self.style.label_size;
        let glyph_w = size * 0.55;
        let advance = size * 0.8;
        let (cx, cy) = self.to_pixel(anchor);

        let count = text.chars().count() as f32;
        let mut left = cx - (count * advance - (advance - glyph_w)) / 2.0;
        let top = cy - size / 2.0;

        let mut pb = PathBuilder::new();
        for ch in text.chars() {
            add_glyph(&mut pb, ch, left, top, glyph_w, size);
            left += advance;
        }
        let Some(path) = pb.finish() else {
            return;
        };

        let stroke_w = (size * 0.14).max(1.0);
        let halo = Stroke {
            width: stroke_w * 2.5,
            line_cap: LineCap::Round,
            line_join: LineJoin::Round,
            ..Stroke::default()
        };
        let ink = Stroke {
            width: stroke_w,
            ..halo.clone()
        };

        pixmap.stroke_path(
            &path,
            &paint_for(Color::new(0, 0, 0, 160)),
            &halo,
            Transform::identity(),
            None,
        );
        pixmap.stroke_path(&path, &paint_for(color), &ink, Transform::identity(), None);
    }
}

fn paint_for(color: Color) -> Paint<'static> {
    let mut paint = Paint::default();
    paint.set_color_rgba8(color.r, color.g, color.b, color.a);
    paint.anti_alias = true;
    paint
}

/// Lit segments per character: bit 0 top, 1 upper right, 2 lower right,
/// 3 bottom, 4 lower left, 5 upper left, 6 middle.
fn seven_segment_mask(ch: char) -> u8 {
    match ch {
        '0' => 0x3f,
        '1' => 0x06,
        '2' => 0x5b,
        '3' => 0x4f,
        '4' => 0x66,
        '5' => 0x6d,
        '6' => 0x7d,
        '7' => 0x07,
        '8' => 0x7f,
        '9' => 0x6f,
        '-' => 0x40,
        _ => 0,
    }
}

fn add_glyph(pb: &mut PathBuilder, ch: char, x: f32, y: f32, w: f32, h: f32) {
    if ch == '.' {
        let cx = x + w / 2.0;
        pb.move_to(cx, y + h * 0.95);
        pb.line_to(cx, y + h);
        return;
    }

    let (x0, x1) = (x, x + w);
    let (y0, ym, y1) = (y, y + h / 2.0, y + h);
    let strokes = [
        ((x0, y0), (x1, y0)),
        ((x1, y0), (x1, ym)),
        ((x1, ym), (x1, y1)),
        ((x0, y1), (x1, y1)),
        ((x0, ym), (x0, y1)),
        ((x0, y0), (x0, ym)),
        ((x0, ym), (x1, ym)),
    ];

    let mask = seven_segment_mask(ch);
    for (bit, ((ax, ay), (bx, by))) in strokes.into_iter().enumerate() {
        if mask & (1 << bit) != 0 {
            pb.move_to(ax, ay);
            pb.line_to(bx, by);
        }
    }
}

impl ContourRenderer for CanvasRenderer {
    fn render(
        &mut self,
        contour: &[GeoPoint],
        color: Color,
        height: f64,
        primitive: Primitive,
    ) -> ContourResult<EntityHandle> {
        validate_geometry(contour, primitive)?;
        let handle = self.ids.allocate();
        self.entities.insert(
            handle,
            Placed {
                height,
                entity: Entity::Shape {
                    points: contour.to_vec(),
                    color,
                    primitive,
                },
            },
        );
        Ok(handle)
    }

    fn render_label(
        &mut self,
        anchor: GeoPoint,
        text: &str,
        color: Color,
        height: f64,
    ) -> ContourResult<EntityHandle> {
        if !anchor.lon.is_finite() || !anchor.lat.is_finite() {
            return Err(ContourError::Render("non-finite label anchor".to_string()));
        }
        let handle = self.ids.allocate();
        self.entities.insert(
            handle,
            Placed {
                height,
                entity: Entity::Label {
                    anchor,
                    text: text.to_string(),
                    color,
                },
            },
        );
        Ok(handle)
    }

    fn remove(&mut self, handle: EntityHandle) -> ContourResult<()> {
        self.entities
            .remove(&handle)
            .map(|_| ())
            .ok_or(ContourError::EntityNotFound(handle.0))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn canvas() -> CanvasRenderer {
        CanvasRenderer::new(100, 100, GeoBounds::new(0.0, 0.0, 10.0, 10.0)).unwrap()
    }

    fn square(w: f64, s: f64, e: f64, n: f64) -> Vec<GeoPoint> {
        vec![
            GeoPoint::new(w, s),
            GeoPoint::new(e, s),
            GeoPoint::new(e, n),
            GeoPoint::new(w, n),
            GeoPoint::new(w, s),
        ]
    }

    #[test]
    fn test_rejects_bad_setup() {
        let bounds = GeoBounds::new(0.0, 0.0, 10.0, 10.0);
        assert!(CanvasRenderer::new(0, 10, bounds).is_err());
        assert!(CanvasRenderer::new(10, 10, GeoBounds::new(5.0, 0.0, 5.0, 1.0)).is_err());
    }

    #[test]
    fn test_pixel_mapping_north_up() {
        let c = canvas();
        assert_eq!(c.to_pixel(GeoPoint::new(0.0, 10.0)), (0.0, 0.0));
        assert_eq!(c.to_pixel(GeoPoint::new(10.0, 0.0)), (100.0, 100.0));
        assert_eq!(c.to_pixel(GeoPoint::new(5.0, 2.5)), (50.0, 75.0));
    }

    #[test]
    fn test_fill_paints_interior() {
        let mut c = canvas();
        c.render(&square(2.0, 2.0, 8.0, 8.0), Color::new(255, 0, 0, 255), 0.0, Primitive::Fill)
            .unwrap();
        let pixmap = c.to_pixmap().unwrap();

        let inside = pixmap.pixel(50, 50).unwrap();
        assert_eq!((inside.red(), inside.alpha()), (255, 255));
        let outside = pixmap.pixel(5, 5).unwrap();
        assert_eq!(outside.alpha(), 0);
    }

    #[test]
    fn test_remove_erases_entity() {
        let mut c = canvas();
        let h = c
            .render(&square(2.0, 2.0, 8.0, 8.0), Color::WHITE, 0.0, Primitive::Fill)
            .unwrap();
        c.remove(h).unwrap();
        assert!(c.is_empty());
        assert_eq!(c.to_pixmap().unwrap().pixel(50, 50).unwrap().alpha(), 0);
        assert!(matches!(c.remove(h), Err(ContourError::EntityNotFound(_))));
    }

    #[test]
    fn test_higher_entities_paint_last() {
        let mut c = canvas();
        let blue = Color::new(0, 0, 255, 255);
        let red = Color::new(255, 0, 0, 255);
        // Drawn first but sits higher
        c.render(&square(2.0, 2.0, 8.0, 8.0), blue, 10.0, Primitive::Fill).unwrap();
        c.render(&square(0.0, 0.0, 10.0, 10.0), red, 0.0, Primitive::Fill).unwrap();

        let p = c.to_pixmap().unwrap().pixel(50, 50).unwrap();
        assert_eq!((p.red(), p.blue()), (0, 255));
    }

    #[test]
    fn test_label_draws_ink() {
        let mut c = canvas();
        c.render_label(GeoPoint::new(5.0, 5.0), "0.88", Color::WHITE, 0.0).unwrap();
        let pixmap = c.to_pixmap().unwrap();
        assert!(pixmap.pixels().iter().any(|p| p.alpha() > 0));
    }

    #[test]
    fn test_encode_png_signature() {
        let mut c = canvas();
        c.render(&square(1.0, 1.0, 9.0, 9.0), Color::WHITE, 0.0, Primitive::Line).unwrap();
        let png = c.encode_png().unwrap();
        assert_eq!(&png[..8], &[0x89, b'P', b'N', b'G', 0x0d, 0x0a, 0x1a, 0x0a]);
    }

    #[test]
    fn test_glyph_masks() {
        assert_eq!(seven_segment_mask('8').count_ones(), 7);
        assert_eq!(seven_segment_mask('1').count_ones(), 2);
        assert_eq!(seven_segment_mask('x'), 0);
    }
}
