//! Shared painting helpers: outlines, theme-aware strokes, texture
//! placement and label sizing.
//!
//! Widgets own their drawing order; everything here is stateless.

use crate::canvas::{Canvas, TextStyle};
use crate::texture::Texture;
use kurbo::{Affine, BezPath, Circle, Point, Rect, Shape, Size};
use std::sync::Arc;
use vc_core::{ControlCommon, ControlShape, NormPoint, Rgba, ScaleMode, TextureConfig};

/// Flattening tolerance for curved outlines, in pixels.
const TOLERANCE: f64 = 0.1;

/// Alpha applied to the automatic stroke color when the user picked none.
const AUTO_STROKE_ALPHA: f32 = 0.6;

// ─── Outlines ────────────────────────────────────────────────────────────

/// Closed polygon through normalized `points` scaled to `size`.
pub fn polygon_path(points: &[NormPoint], size: Size) -> BezPath {
    let mut path = BezPath::new();
    let mut iter = points.iter();
    if let Some(first) = iter.next() {
        path.move_to((first.x as f64 * size.width, first.y as f64 * size.height));
        for p in iter {
            path.line_to((p.x as f64 * size.width, p.y as f64 * size.height));
        }
        path.close_path();
    }
    path
}

/// Outline of a control shape filling `rect`.
///
/// Circles use the smaller side as diameter. Polygons with fewer than three
/// points fall back to the plain rectangle.
pub fn shape_path(shape: ControlShape, rect: Rect, corner_radius: f64, points: &[NormPoint]) -> BezPath {
    match shape {
        ControlShape::Circle => circle_path(rect.center(), rect.width().min(rect.height()) / 2.0),
        ControlShape::Rectangle => rect.to_rounded_rect(corner_radius.max(0.0)).to_path(TOLERANCE),
        ControlShape::Polygon if points.len() >= 3 => {
            Affine::translate(rect.origin().to_vec2()) * polygon_path(points, rect.size())
        }
        ControlShape::Polygon => rect.to_path(TOLERANCE),
    }
}

pub fn circle_path(center: Point, radius: f64) -> BezPath {
    Circle::new(center, radius.max(0.0)).to_path(TOLERANCE)
}

// ─── Theme ───────────────────────────────────────────────────────────────

/// Resolved outline styling for a control.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct StrokeStyle {
    pub color: Rgba,
    /// Pixels.
    pub width: f64,
    /// False when the user explicitly chose a zero-width stroke.
    pub visible: bool,
}

/// Stroke for `common` at `density` px per dp, brightened by `alpha_boost`
/// while pressed.
///
/// A stroke color with zero alpha means "automatic": white on dark
/// backgrounds, black on light ones, 1dp wide and softened.
pub fn theme_stroke(common: &ControlCommon, density: f32, alpha_boost: f32) -> StrokeStyle {
    let has_user_color = common.stroke_color.alpha() > 0;
    if has_user_color {
        StrokeStyle {
            color: common
                .stroke_color
                .with_alpha(scaled_alpha(common.border_opacity, alpha_boost)),
            width: (common.stroke_width * density) as f64,
            visible: common.stroke_width > 0.0,
        }
    } else {
        let base = if is_dark(common.bg_color) {
            Rgba::WHITE
        } else {
            Rgba::BLACK
        };
        StrokeStyle {
            color: base.with_alpha(scaled_alpha(
                common.border_opacity * AUTO_STROKE_ALPHA,
                alpha_boost,
            )),
            width: density as f64,
            visible: true,
        }
    }
}

pub fn is_dark(color: Rgba) -> bool {
    color.luminance() < 0.5
}

/// Background fill for `common`, its alpha scaled by `alpha_boost`.
pub fn theme_fill(common: &ControlCommon, alpha_boost: f32) -> Rgba {
    common
        .bg_color
        .with_alpha(scaled_alpha(common.opacity, alpha_boost))
}

/// `opacity × 255 × boost`, saturating at 255.
pub fn scaled_alpha(opacity: f32, boost: f32) -> u8 {
    (opacity * 255.0 * boost).clamp(0.0, 255.0) as u8
}

// ─── Textures ────────────────────────────────────────────────────────────

/// Where a `tex_size` image lands inside `bounds` under `mode`, after
/// insetting `bounds` by `padding × min(width, height)`.
pub fn texture_dest(mode: ScaleMode, bounds: Rect, tex_size: Size, padding: f32) -> Rect {
    let inset = bounds.width().min(bounds.height()) * padding as f64;
    let inner = bounds.inset(-inset);
    if tex_size.width <= 0.0 || tex_size.height <= 0.0 {
        return inner;
    }
    let sx = inner.width() / tex_size.width;
    let sy = inner.height() / tex_size.height;
    let size = match mode {
        ScaleMode::Stretch => return inner,
        ScaleMode::Fit => tex_size * sx.min(sy),
        ScaleMode::Fill => tex_size * sx.max(sy),
        ScaleMode::Center => tex_size,
    };
    Rect::from_center_size(inner.center(), size)
}

/// Draw `texture` per `config`, clipped to `clip`.
pub fn draw_texture(
    canvas: &mut dyn Canvas,
    texture: &Arc<Texture>,
    config: &TextureConfig,
    bounds: Rect,
    clip: &BezPath,
) {
    let (w, h) = texture.dimensions();
    let dest = texture_dest(
        config.scale_mode,
        bounds,
        Size::new(w as f64, h as f64),
        config.padding,
    );
    canvas.save();
    canvas.clip(clip);
    canvas.draw_image(texture, dest, config.opacity);
    canvas.restore();
}

// ─── Labels ──────────────────────────────────────────────────────────────

/// Start at `base` px and shrink until the text fits `available` px.
pub fn fit_label_size(canvas: &dyn Canvas, text: &str, base: f64, available: f64) -> f64 {
    let sample = TextStyle::new(base, Rgba::WHITE);
    let width = canvas.measure_text(text, &sample).width;
    if width > available && width > 0.0 {
        base * (available.max(0.0) / width)
    } else {
        base
    }
}

/// Size that fills a `bounds` frame: at most half its height, and no wider
/// than the frame given the text's aspect ratio.
pub fn auto_fit_text_size(canvas: &dyn Canvas, text: &str, bounds: Size) -> f64 {
    let sample = canvas.measure_text(text, &TextStyle::new(20.0, Rgba::WHITE));
    let aspect = sample.width / sample.height.max(1.0);
    (bounds.height / 2.0).min(bounds.width / aspect.max(1.0))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::canvas::DisplayList;
    use pretty_assertions::assert_eq;

    #[test]
    fn auto_stroke_follows_background() {
        let mut common = ControlCommon {
            stroke_color: Rgba::TRANSPARENT,
            border_opacity: 1.0,
            ..Default::default()
        };
        let s = theme_stroke(&common, 2.0, 1.0);
        assert_eq!(s.color, Rgba::WHITE.with_alpha(153));
        assert_eq!(s.width, 2.0);
        assert!(s.visible);

        common.bg_color = Rgba(0xFFEE_EEEE);
        let s = theme_stroke(&common, 1.0, 1.0);
        assert_eq!(s.color.0 & 0x00FF_FFFF, 0);
    }

    #[test]
    fn user_stroke_boost_saturates() {
        let common = ControlCommon {
            stroke_color: Rgba(0xFF00_FF00),
            border_opacity: 0.9,
            stroke_width: 0.0,
            ..Default::default()
        };
        let s = theme_stroke(&common, 1.0, 1.2);
        assert_eq!(s.color, Rgba(0xFF00_FF00));
        assert!(!s.visible);
    }

    #[test]
    fn fill_alpha_scales() {
        let common = ControlCommon {
            opacity: 0.5,
            ..Default::default()
        };
        assert_eq!(theme_fill(&common, 1.0).alpha(), 127);
        assert_eq!(theme_fill(&common, 1.2).alpha(), 153);
    }

    #[test]
    fn texture_placement_modes() {
        let bounds = Rect::new(0.0, 0.0, 100.0, 50.0);
        let tex = Size::new(10.0, 10.0);
        assert_eq!(
            texture_dest(ScaleMode::Fit, bounds, tex, 0.0),
            Rect::new(25.0, 0.0, 75.0, 50.0)
        );
        assert_eq!(
            texture_dest(ScaleMode::Fill, bounds, tex, 0.0),
            Rect::new(0.0, -25.0, 100.0, 75.0)
        );
        assert_eq!(texture_dest(ScaleMode::Stretch, bounds, tex, 0.0), bounds);
        assert_eq!(
            texture_dest(ScaleMode::Center, bounds, tex, 0.0),
            Rect::new(45.0, 20.0, 55.0, 30.0)
        );
        assert_eq!(
            texture_dest(ScaleMode::Stretch, bounds, tex, 0.1),
            Rect::new(5.0, 5.0, 95.0, 45.0)
        );
    }

    #[test]
    fn polygon_outline_offsets_into_rect() {
        let pts = [
            NormPoint::new(0.0, 0.0),
            NormPoint::new(1.0, 0.0),
            NormPoint::new(0.5, 1.0),
        ];
        let path = shape_path(ControlShape::Polygon, Rect::new(10.0, 10.0, 30.0, 30.0), 0.0, &pts);
        assert_eq!(path.bounding_box(), Rect::new(10.0, 10.0, 30.0, 30.0));
    }

    #[test]
    fn labels_shrink_to_fit() {
        let list = DisplayList::new();
        // Estimate: 10 chars × 16 × 0.6 = 96 px.
        let size = fit_label_size(&list, "ABCDEFGHIJ", 16.0, 48.0);
        assert!((size - 8.0).abs() < 1e-9);
        assert_eq!(fit_label_size(&list, "A", 16.0, 48.0), 16.0);

        let auto = auto_fit_text_size(&list, "A", Size::new(100.0, 40.0));
        assert_eq!(auto, 20.0);
    }
}
