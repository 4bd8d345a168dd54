//! Hit testing: local point → inside the control's outline?
//!
//! Coordinates are control-local pixels with the origin at the top-left of
//! the control's frame. A frame with a zero side rejects every point.

use crate::paint::polygon_path;
use crate::texture::Texture;
use kurbo::{Point, Shape, Size};
use vc_core::{ControlShape, NormPoint};

/// Texture pixels with alpha at or below this are transparent to touches.
pub const ALPHA_HIT_THRESHOLD: u8 = 50;

/// Outline to test against.
#[derive(Debug, Clone, Copy)]
pub enum HitShape<'a> {
    /// Circle of diameter `min(width, height)` centred in the frame.
    Circle,
    /// Frame rectangle with corners rounded by `radius` pixels.
    RoundedRect { radius: f32 },
    /// Normalized vertices. Fewer than three falls back to the frame.
    Polygon(&'a [NormPoint]),
}

impl<'a> HitShape<'a> {
    pub fn from_control(shape: ControlShape, corner_radius: f32, points: &'a [NormPoint]) -> Self {
        match shape {
            ControlShape::Circle => HitShape::Circle,
            ControlShape::Rectangle => HitShape::RoundedRect {
                radius: corner_radius,
            },
            ControlShape::Polygon => HitShape::Polygon(points),
        }
    }
}

/// Whether (`x`, `y`) lies inside `shape` drawn in a `width × height` frame.
pub fn point_in_shape(x: f32, y: f32, shape: &HitShape<'_>, width: f32, height: f32) -> bool {
    if width.min(height) <= 0.0 {
        return false;
    }
    match shape {
        HitShape::Circle => {
            let r = width.min(height) / 2.0;
            let dx = x - width / 2.0;
            let dy = y - height / 2.0;
            dx * dx + dy * dy <= r * r
        }
        HitShape::RoundedRect { radius } => point_in_rounded_rect(x, y, *radius, width, height),
        HitShape::Polygon(points) if points.len() >= 3 => {
            let path = polygon_path(points, Size::new(width as f64, height as f64));
            path.winding(Point::new(x as f64, y as f64)) != 0
        }
        HitShape::Polygon(_) => in_frame(x, y, width, height),
    }
}

fn in_frame(x: f32, y: f32, width: f32, height: f32) -> bool {
    (0.0..=width).contains(&x) && (0.0..=height).contains(&y)
}

fn point_in_rounded_rect(x: f32, y: f32, radius: f32, width: f32, height: f32) -> bool {
    if !in_frame(x, y, width, height) {
        return false;
    }
    let r = radius.clamp(0.0, width.min(height) / 2.0);
    if r == 0.0 {
        return true;
    }
    // Only points inside a corner square need the arc check.
    let cx = if x < r {
        r
    } else if x > width - r {
        width - r
    } else {
        return true;
    };
    let cy = if y < r {
        r
    } else if y > height - r {
        height - r
    } else {
        return true;
    };
    let (dx, dy) = (x - cx, y - cy);
    dx * dx + dy * dy <= r * r
}

/// Whether the texture pixel under (`x`, `y`) is opaque enough to take the
/// touch. The texture is mapped onto the full `width × height` frame.
pub fn alpha_allows_hit(texture: &Texture, x: f32, y: f32, width: f32, height: f32) -> bool {
    let (tw, th) = texture.dimensions();
    if tw == 0 || th == 0 || width <= 0.0 || height <= 0.0 {
        return true;
    }
    let px = ((x / width * tw as f32) as i64).clamp(0, tw as i64 - 1) as u32;
    let py = ((y / height * th as f32) as i64).clamp(0, th as i64 - 1) as u32;
    texture.get_pixel(px, py).0[3] > ALPHA_HIT_THRESHOLD
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::Rgba;

    #[test]
    fn circle_boundary_is_inclusive() {
        let c = HitShape::Circle;
        assert!(point_in_shape(50.0, 50.0, &c, 100.0, 100.0));
        assert!(point_in_shape(99.0, 50.0, &c, 100.0, 100.0));
        assert!(point_in_shape(100.0, 50.0, &c, 100.0, 100.0));
        assert!(!point_in_shape(0.0, 0.0, &c, 100.0, 100.0));
    }

    #[test]
    fn circle_uses_smaller_side() {
        let c = HitShape::Circle;
        // 200×100 frame: radius 50 centred at (100, 50).
        assert!(point_in_shape(140.0, 50.0, &c, 200.0, 100.0));
        assert!(!point_in_shape(160.0, 50.0, &c, 200.0, 100.0));
    }

    #[test]
    fn zero_size_rejects_everything() {
        assert!(!point_in_shape(0.0, 0.0, &HitShape::Circle, 0.0, 100.0));
        assert!(!point_in_shape(0.0, 0.0, &HitShape::RoundedRect { radius: 0.0 }, 100.0, 0.0));
    }

    #[test]
    fn rounded_rect_corners_are_cut() {
        let r = HitShape::RoundedRect { radius: 20.0 };
        assert!(point_in_shape(50.0, 0.0, &r, 100.0, 100.0));
        assert!(point_in_shape(0.0, 50.0, &r, 100.0, 100.0));
        assert!(!point_in_shape(1.0, 1.0, &r, 100.0, 100.0));
        assert!(!point_in_shape(99.0, 99.0, &r, 100.0, 100.0));
        assert!(point_in_shape(10.0, 10.0, &r, 100.0, 100.0));
        assert!(!point_in_shape(101.0, 50.0, &r, 100.0, 100.0));

        let square = HitShape::RoundedRect { radius: 0.0 };
        assert!(point_in_shape(0.0, 0.0, &square, 100.0, 100.0));
    }

    #[test]
    fn polygon_triangle() {
        let pts = [
            NormPoint::new(0.5, 0.0),
            NormPoint::new(1.0, 1.0),
            NormPoint::new(0.0, 1.0),
        ];
        let tri = HitShape::Polygon(&pts);
        assert!(point_in_shape(50.0, 60.0, &tri, 100.0, 100.0));
        assert!(!point_in_shape(10.0, 10.0, &tri, 100.0, 100.0));
        assert!(!point_in_shape(90.0, 20.0, &tri, 100.0, 100.0));
    }

    #[test]
    fn degenerate_polygon_uses_frame() {
        let pts = [NormPoint::new(0.0, 0.0), NormPoint::new(1.0, 1.0)];
        let shape = HitShape::Polygon(&pts);
        assert!(point_in_shape(5.0, 95.0, &shape, 100.0, 100.0));
        assert!(!point_in_shape(105.0, 50.0, &shape, 100.0, 100.0));
    }

    #[test]
    fn alpha_threshold() {
        // Left half transparent, right half opaque.
        let tex = Texture::from_fn(10, 10, |x, _| {
            if x < 5 { Rgba([0, 0, 0, 50]) } else { Rgba([0, 0, 0, 51]) }
        });
        assert!(!alpha_allows_hit(&tex, 10.0, 50.0, 100.0, 100.0));
        assert!(alpha_allows_hit(&tex, 90.0, 50.0, 100.0, 100.0));
        // Out-of-frame coordinates clamp to the edge pixels.
        assert!(alpha_allows_hit(&tex, 100.0, 100.0, 100.0, 100.0));
        assert!(!alpha_allows_hit(&tex, -3.0, 0.0, 100.0, 100.0));
    }
}
