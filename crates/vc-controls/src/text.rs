//! Static text label. Shares the shape and paint pipeline with buttons but
//! never takes a touch.

use crate::context::ControlContext;
use crate::input::PointerId;
use crate::touch::{ControlView, reject_bind, with_rotation};
use vc_core::{ControlCommon, ControlData, ControlKind, ControlShape, ResolvedBounds, TextData};
use vc_render::kurbo::{Rect, Size};
use vc_render::paint::{auto_fit_text_size, shape_path, theme_fill, theme_stroke};
use vc_render::{Brush, Canvas, HitShape, TextStyle, point_in_shape};

pub struct TextView {
    common: ControlCommon,
    text: TextData,
    ctx: ControlContext,
    frame: ResolvedBounds,
}

impl TextView {
    pub fn new(common: ControlCommon, text: TextData, ctx: ControlContext) -> Self {
        Self {
            common,
            text,
            ctx,
            frame: ResolvedBounds::default(),
        }
    }

    pub fn display_text(&self) -> &str {
        &self.text.display_text
    }

    fn paint(&self, canvas: &mut dyn Canvas) {
        if self.text.display_text.is_empty() {
            return;
        }
        let (w, h) = (self.frame.width as f64, self.frame.height as f64);
        let rect = Rect::new(0.0, 0.0, w, h);
        let corner = self.ctx.dp(self.common.corner_radius) as f64;
        let outline = shape_path(self.text.shape.into(), rect, corner, &[]);

        canvas.fill(&outline, &Brush::Solid(theme_fill(&self.common, 1.0)));
        let stroke = theme_stroke(&self.common, self.ctx.density, 1.0);
        if stroke.visible {
            canvas.stroke(&outline, stroke.width, stroke.color);
        }

        let size = auto_fit_text_size(canvas, &self.text.display_text, Size::new(w, h));
        let color = self.common.text_color.with_opacity(self.common.text_opacity);
        canvas.draw_text(
            &self.text.display_text,
            rect.center(),
            &TextStyle::new(size, color),
        );
    }
}

impl ControlView for TextView {
    fn common(&self) -> &ControlCommon {
        &self.common
    }

    fn control_data(&self) -> ControlData {
        ControlData::new(self.common.clone(), ControlKind::Text(self.text.clone()))
    }

    fn bind(&mut self, data: ControlData) {
        match data.kind {
            ControlKind::Text(text) => {
                self.common = data.common;
                self.text = text;
            }
            _ => reject_bind("text", &data),
        }
    }

    fn frame(&self) -> ResolvedBounds {
        self.frame
    }

    fn set_frame(&mut self, frame: ResolvedBounds) {
        self.frame = frame;
    }

    /// Geometric hit only; the editor uses it to pick labels.
    fn is_touch_in_bounds(&self, x: f32, y: f32) -> bool {
        let (lx, ly) = self.frame.to_local(x, y);
        let shape = match ControlShape::from(self.text.shape) {
            ControlShape::Circle => HitShape::Circle,
            _ => HitShape::RoundedRect {
                radius: self.ctx.dp(self.common.corner_radius),
            },
        };
        point_in_shape(lx, ly, &shape, self.frame.width, self.frame.height)
    }

    fn try_acquire_touch(&mut self, _pointer: PointerId, _x: f32, _y: f32) -> bool {
        false
    }

    fn handle_touch_move(&mut self, _pointer: PointerId, _x: f32, _y: f32) {}

    fn release_touch(&mut self, _pointer: PointerId) {}

    fn cancel_all_touches(&mut self) {}

    fn active_pointer(&self) -> Option<PointerId> {
        None
    }

    fn render(&self, canvas: &mut dyn Canvas) {
        if self.frame.is_empty() {
            return;
        }
        with_rotation(
            canvas,
            self.common.rotation,
            self.frame.width,
            self.frame.height,
            |canvas| self.paint(canvas),
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::bridge::RecordingBridge;
    use crate::context::ManualScheduler;
    use pretty_assertions::assert_eq;
    use std::rc::Rc;
    use vc_core::TextShape;
    use vc_render::DisplayList;

    fn label(text: &str, shape: TextShape) -> TextView {
        let ctx = ControlContext::new(
            Rc::new(RecordingBridge::new()),
            Rc::new(ManualScheduler::new()),
        );
        let data = TextData {
            display_text: text.to_string(),
            shape,
        };
        let mut view = TextView::new(ControlCommon::default(), data, ctx);
        view.set_frame(ResolvedBounds::new(10.0, 10.0, 100.0, 100.0));
        view
    }

    #[test]
    fn never_acquires_but_reports_hits() {
        let mut t = label("HP", TextShape::Circle);
        assert!(!t.try_acquire_touch(1, 50.0, 50.0));
        assert_eq!(t.active_pointer(), None);
        assert!(t.is_touch_in_bounds(60.0, 60.0));
        // Corner of the frame lies outside the circle.
        assert!(!t.is_touch_in_bounds(11.0, 11.0));
    }

    #[test]
    fn empty_text_draws_nothing() {
        let t = label("", TextShape::Rectangle);
        let mut list = DisplayList::new();
        t.render(&mut list);
        assert!(list.ops.is_empty());

        let t = label("Ammo", TextShape::Rectangle);
        t.render(&mut list);
        assert_eq!(list.texts().collect::<Vec<_>>(), vec!["Ammo"]);
        assert_eq!(list.fills().count(), 1);
    }
}
