//! Touch ownership protocol shared by every widget.
//!
//! A widget owns at most one pointer at a time. The surface offers each new
//! pointer to widgets top-most first through `try_acquire_touch`; the first
//! widget that accepts keeps the pointer until `release_touch` or
//! `cancel_all_touches`. Calls for pointers a widget does not own are
//! ignored.
//!
//! Coordinates passed to `try_acquire_touch` and `handle_touch_move` are
//! local to the widget's frame. `is_touch_in_bounds` takes screen
//! coordinates.

use crate::input::PointerId;
use vc_core::{ControlCommon, ControlData, ResolvedBounds};
use vc_render::Canvas;
use vc_render::kurbo::Point;

pub trait ControlView {
    fn common(&self) -> &ControlCommon;

    /// Snapshot of the control's current data.
    fn control_data(&self) -> ControlData;

    /// Replace the control's data. Cached paint state is rebuilt on the next
    /// render. Data of a different kind is logged and ignored.
    fn bind(&mut self, data: ControlData);

    /// Frame in screen pixels.
    fn frame(&self) -> ResolvedBounds;

    fn set_frame(&mut self, frame: ResolvedBounds);

    /// Whether the screen point (`x`, `y`) hits the control's shape.
    fn is_touch_in_bounds(&self, x: f32, y: f32) -> bool;

    /// Offer `pointer` at local (`x`, `y`). Returns true if the widget takes
    /// ownership.
    fn try_acquire_touch(&mut self, pointer: PointerId, x: f32, y: f32) -> bool;

    fn handle_touch_move(&mut self, pointer: PointerId, x: f32, y: f32);

    fn release_touch(&mut self, pointer: PointerId);

    /// Drop ownership and settle into the released state, sending any
    /// pending key-up. Idempotent.
    fn cancel_all_touches(&mut self);

    fn active_pointer(&self) -> Option<PointerId>;

    /// Paint in local coordinates (origin at the frame's top-left).
    fn render(&self, canvas: &mut dyn Canvas);

    /// Unlatch a toggled button. Other widgets have nothing to reset.
    fn reset_toggle(&mut self) {}
}

/// Run `paint` with the canvas rotated `degrees` about the centre of a
/// `width × height` frame.
pub(crate) fn with_rotation(
    canvas: &mut dyn Canvas,
    degrees: f32,
    width: f32,
    height: f32,
    paint: impl FnOnce(&mut dyn Canvas),
) {
    if degrees == 0.0 {
        paint(&mut *canvas);
        return;
    }
    canvas.save();
    canvas.rotate(
        degrees as f64,
        Point::new(width as f64 / 2.0, height as f64 / 2.0),
    );
    paint(&mut *canvas);
    canvas.restore();
}

/// Log and drop data of the wrong kind passed to `bind`.
pub(crate) fn reject_bind(widget: &str, data: &ControlData) {
    log::warn!(
        "{widget} cannot bind `{}` data for control {}",
        data.kind.name(),
        data.id()
    );
}
