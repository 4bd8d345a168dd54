//! Drawing surface contract for control widgets.
//!
//! Widgets paint through `Canvas` in their own local pixel space (origin at
//! the control's top-left). Two backends ship:
//!
//! - `VelloCanvas` encodes into a `vello::Scene` for GPU presentation.
//! - `DisplayList` records operations so rendering can be inspected in tests
//!   or replayed onto another backend.

use crate::texture::Texture;
use kurbo::{Affine, BezPath, Point, Rect, Size, Stroke as KurboStroke};
use peniko::{Blob, Color, Fill, Image, ImageFormat, Mix};
use smallvec::SmallVec;
use std::sync::Arc;
use vc_core::Rgba;
use vello::Scene;

/// Fill source.
#[derive(Debug, Clone, PartialEq)]
pub enum Brush {
    Solid(Rgba),
    /// Stops are (offset in [0, 1], color), innermost first.
    Radial {
        center: Point,
        radius: f64,
        stops: SmallVec<[(f32, Rgba); 3]>,
    },
}

impl Brush {
    /// Color used where the backend draws gradients flat.
    pub fn dominant_color(&self) -> Rgba {
        match self {
            Brush::Solid(c) => *c,
            Brush::Radial { stops, .. } => stops.first().map(|(_, c)| *c).unwrap_or(Rgba::TRANSPARENT),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TextStyle {
    /// Pixels.
    pub size: f64,
    pub color: Rgba,
    pub bold: bool,
}

impl TextStyle {
    pub fn new(size: f64, color: Rgba) -> Self {
        Self {
            size,
            color,
            bold: false,
        }
    }

    pub fn bold(mut self) -> Self {
        self.bold = true;
        self
    }
}

/// Estimated advance of one character as a fraction of the font size.
const GLYPH_ADVANCE: f64 = 0.6;

pub trait Canvas {
    /// Push the current transform and clip.
    fn save(&mut self);
    /// Pop back to the matching `save`. Unbalanced calls are ignored.
    fn restore(&mut self);
    /// Offset subsequent drawing.
    fn translate(&mut self, dx: f64, dy: f64);
    /// Rotate subsequent drawing by `degrees` clockwise about `center`.
    fn rotate(&mut self, degrees: f64, center: Point);
    /// Intersect the clip with `path` until the next `restore`.
    fn clip(&mut self, path: &BezPath);
    fn fill(&mut self, path: &BezPath, brush: &Brush);
    fn stroke(&mut self, path: &BezPath, width: f64, color: Rgba);
    /// Draw `image` scaled into `dest`, multiplied by `opacity`.
    fn draw_image(&mut self, image: &Arc<Texture>, dest: Rect, opacity: f32);
    /// Draw a single line of text centred on `center`.
    fn draw_text(&mut self, text: &str, center: Point, style: &TextStyle);

    /// Size of `text` laid out with `style`. The default is a monospace
    /// estimate; backends with a shaper override it.
    fn measure_text(&self, text: &str, style: &TextStyle) -> Size {
        let chars = text.chars().count() as f64;
        Size::new(chars * style.size * GLYPH_ADVANCE, style.size)
    }
}

// ─── Display list ────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq)]
pub enum DrawOp {
    Save,
    Restore,
    Translate { dx: f64, dy: f64 },
    Rotate { degrees: f64, center: Point },
    Clip(BezPath),
    Fill { path: BezPath, brush: Brush },
    Stroke { path: BezPath, width: f64, color: Rgba },
    Image { dest: Rect, opacity: f32, size: (u32, u32) },
    Text { text: String, center: Point, style: TextStyle },
}

/// Canvas that records every call.
#[derive(Debug, Default)]
pub struct DisplayList {
    pub ops: Vec<DrawOp>,
}

impl DisplayList {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn clear(&mut self) {
        self.ops.clear();
    }

    pub fn fills(&self) -> impl Iterator<Item = &Brush> {
        self.ops.iter().filter_map(|op| match op {
            DrawOp::Fill { brush, .. } => Some(brush),
            _ => None,
        })
    }

    pub fn texts(&self) -> impl Iterator<Item = &str> {
        self.ops.iter().filter_map(|op| match op {
            DrawOp::Text { text, .. } => Some(text.as_str()),
            _ => None,
        })
    }

    pub fn strokes(&self) -> impl Iterator<Item = (f64, Rgba)> + '_ {
        self.ops.iter().filter_map(|op| match op {
            DrawOp::Stroke { width, color, .. } => Some((*width, *color)),
            _ => None,
        })
    }

    pub fn image_count(&self) -> usize {
        self.ops.iter().filter(|op| matches!(op, DrawOp::Image { .. })).count()
    }

    /// `Save` and `Restore` calls pair up.
    pub fn is_balanced(&self) -> bool {
        let mut depth = 0i32;
        for op in &self.ops {
            match op {
                DrawOp::Save => depth += 1,
                DrawOp::Restore => {
                    depth -= 1;
                    if depth < 0 {
                        return false;
                    }
                }
                _ => {}
            }
        }
        depth == 0
    }
}

impl Canvas for DisplayList {
    fn save(&mut self) {
        self.ops.push(DrawOp::Save);
    }

    fn restore(&mut self) {
        self.ops.push(DrawOp::Restore);
    }

    fn translate(&mut self, dx: f64, dy: f64) {
        self.ops.push(DrawOp::Translate { dx, dy });
    }

    fn rotate(&mut self, degrees: f64, center: Point) {
        self.ops.push(DrawOp::Rotate { degrees, center });
    }

    fn clip(&mut self, path: &BezPath) {
        self.ops.push(DrawOp::Clip(path.clone()));
    }

    fn fill(&mut self, path: &BezPath, brush: &Brush) {
        self.ops.push(DrawOp::Fill {
            path: path.clone(),
            brush: brush.clone(),
        });
    }

    fn stroke(&mut self, path: &BezPath, width: f64, color: Rgba) {
        self.ops.push(DrawOp::Stroke {
            path: path.clone(),
            width,
            color,
        });
    }

    fn draw_image(&mut self, image: &Arc<Texture>, dest: Rect, opacity: f32) {
        self.ops.push(DrawOp::Image {
            dest,
            opacity,
            size: image.dimensions(),
        });
    }

    fn draw_text(&mut self, text: &str, center: Point, style: &TextStyle) {
        self.ops.push(DrawOp::Text {
            text: text.to_string(),
            center,
            style: *style,
        });
    }
}

// ─── Vello backend ───────────────────────────────────────────────────────

/// Canvas over a `vello::Scene`, offset to a control's screen position.
pub struct VelloCanvas<'a> {
    scene: &'a mut Scene,
    transform: Affine,
    /// Clip layers pushed since the last `save`.
    layers: usize,
    stack: Vec<(Affine, usize)>,
}

impl<'a> VelloCanvas<'a> {
    /// `origin` is the screen-space transform of the control's local space.
    pub fn new(scene: &'a mut Scene, origin: Affine) -> Self {
        Self {
            scene,
            transform: origin,
            layers: 0,
            stack: Vec::new(),
        }
    }

    /// Pop any clip layers left open by unbalanced drawing code.
    pub fn finish(mut self) {
        while !self.stack.is_empty() {
            self.restore();
        }
        self.pop_layers();
    }

    fn pop_layers(&mut self) {
        for _ in 0..self.layers {
            self.scene.pop_layer();
        }
        self.layers = 0;
    }
}

impl Canvas for VelloCanvas<'_> {
    fn save(&mut self) {
        self.stack.push((self.transform, self.layers));
        self.layers = 0;
    }

    fn restore(&mut self) {
        let Some((transform, layers)) = self.stack.pop() else {
            log::warn!("canvas restore without matching save");
            return;
        };
        self.pop_layers();
        self.transform = transform;
        self.layers = layers;
    }

    fn translate(&mut self, dx: f64, dy: f64) {
        self.transform = self.transform * Affine::translate((dx, dy));
    }

    fn rotate(&mut self, degrees: f64, center: Point) {
        self.transform = self.transform * Affine::rotate_about(degrees.to_radians(), center);
    }

    fn clip(&mut self, path: &BezPath) {
        self.scene.push_layer(Mix::Clip, 1.0, self.transform, path);
        self.layers += 1;
    }

    fn fill(&mut self, path: &BezPath, brush: &Brush) {
        // Gradients are drawn with their first stop until the gradient
        // brush lands in the renderer.
        let color = to_color(brush.dominant_color());
        self.scene.fill(Fill::NonZero, self.transform, color, None, path);
    }

    fn stroke(&mut self, path: &BezPath, width: f64, color: Rgba) {
        let stroke = KurboStroke::new(width);
        self.scene.stroke(&stroke, self.transform, to_color(color), None, path);
    }

    fn draw_image(&mut self, image: &Arc<Texture>, dest: Rect, opacity: f32) {
        let (w, h) = image.dimensions();
        if w == 0 || h == 0 {
            return;
        }
        let data = Blob::from(image.as_raw().clone());
        let img = Image::new(data, ImageFormat::Rgba8, w, h).with_alpha(opacity.clamp(0.0, 1.0));
        let placement = Affine::translate(dest.origin().to_vec2())
            * Affine::scale_non_uniform(dest.width() / w as f64, dest.height() / h as f64);
        self.scene.draw_image(&img, self.transform * placement);
    }

    fn draw_text(&mut self, text: &str, center: Point, style: &TextStyle) {
        // Glyph runs need a font collection; labels are skipped until one
        // is wired into the host.
        log::trace!(
            "text {:?} at ({:.1}, {:.1}) size {:.1}",
            text,
            center.x,
            center.y,
            style.size
        );
    }
}

fn to_color(c: Rgba) -> Color {
    Color::from_rgba8(c.red(), c.green(), c.blue(), c.alpha())
}
