//! Placement of controls on the screen.
//!
//! Control data stores positions as screen fractions; widgets work in
//! pixels. `x` scales with the screen width while `y`, `width` and
//! `height` scale with the screen height, so a square control stays square
//! on any aspect ratio.

use crate::model::ControlCommon;

/// Host screen in pixels plus the dp→px density factor.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Viewport {
    pub width: f32,
    pub height: f32,
    pub density: f32,
}

impl Viewport {
    pub const fn new(width: f32, height: f32, density: f32) -> Self {
        Self {
            width,
            height,
            density,
        }
    }

    pub fn dp_to_px(&self, dp: f32) -> f32 {
        dp * self.density
    }
}

impl Default for Viewport {
    fn default() -> Self {
        Self::new(1920.0, 1080.0, 1.0)
    }
}

/// A control's frame in screen pixels.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct ResolvedBounds {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
}

impl ResolvedBounds {
    pub const fn new(x: f32, y: f32, width: f32, height: f32) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    /// Frame of size `width × height` at the origin. Used for local space.
    pub const fn sized(width: f32, height: f32) -> Self {
        Self::new(0.0, 0.0, width, height)
    }

    /// Inclusive on all four edges.
    pub fn contains(&self, px: f32, py: f32) -> bool {
        px >= self.x && px <= self.x + self.width && py >= self.y && py <= self.y + self.height
    }

    pub fn center(&self) -> (f32, f32) {
        (self.x + self.width / 2.0, self.y + self.height / 2.0)
    }

    /// Screen point → frame-local point.
    pub fn to_local(&self, px: f32, py: f32) -> (f32, f32) {
        (px - self.x, py - self.y)
    }

    pub fn is_empty(&self) -> bool {
        self.width <= 0.0 || self.height <= 0.0
    }
}

/// Resolve a control's normalized placement into screen pixels.
pub fn resolve_frame(common: &ControlCommon, viewport: Viewport) -> ResolvedBounds {
    ResolvedBounds {
        x: common.x * viewport.width,
        y: common.y * viewport.height,
        width: common.width * viewport.height,
        height: common.height * viewport.height,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn width_scales_with_screen_height() {
        let common = ControlCommon {
            x: 0.5,
            y: 0.25,
            width: 0.1,
            height: 0.1,
            ..Default::default()
        };
        let b = resolve_frame(&common, Viewport::new(2000.0, 1000.0, 2.0));
        assert_eq!(b, ResolvedBounds::new(1000.0, 250.0, 100.0, 100.0));
        assert_eq!(b.center(), (1050.0, 300.0));
    }

    #[test]
    fn contains_is_inclusive() {
        let b = ResolvedBounds::new(10.0, 10.0, 20.0, 20.0);
        assert!(b.contains(10.0, 30.0));
        assert!(!b.contains(30.5, 30.0));
        assert_eq!(b.to_local(15.0, 12.0), (5.0, 2.0));
    }
}
