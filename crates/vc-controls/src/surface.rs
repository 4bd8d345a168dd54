//! Multi-touch router for one overlay of controls.
//!
//! Owns the widgets in z-order (later = higher) and a pointer→widget map.
//! New pointers are offered top-most first; every later event for that
//! pointer goes straight to its owner in the owner's local coordinates.
//!
//! ```text
//!   Down ─▶ widgets[n-1] ─refuse─▶ widgets[n-2] ─accept─▶ owners[p] = n-2
//!   Move ─▶ owners[p].handle_touch_move(local)
//!   Up   ─▶ owners.remove(p).release_touch(p)
//! ```

use crate::button::ButtonView;
use crate::context::ControlContext;
use crate::dpad::DPadView;
use crate::input::{PointerId, TouchEvent};
use crate::radial::RadialMenuView;
use crate::text::TextView;
use crate::touch::ControlView;
use smallvec::SmallVec;
use std::collections::HashMap;
use vc_core::{ControlData, ControlId, ControlKind, Viewport, resolve_frame};
use vc_render::Canvas;

/// What the host should do with the event.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TouchOutcome {
    /// A control took the pointer; hide it from the game.
    Consumed,
    /// A pass-through control took the pointer; forward it to the game too.
    PassThrough,
    /// No control cares about the pointer.
    Unhandled,
}

/// Widget for `data`, or `None` for kinds this surface does not host.
fn build_widget(data: ControlData, ctx: &ControlContext) -> Option<Box<dyn ControlView>> {
    let ControlData { common, kind } = data;
    let widget: Box<dyn ControlView> = match kind {
        ControlKind::Button(b) => Box::new(ButtonView::new(common, b, ctx.clone())),
        ControlKind::DPad(d) => Box::new(DPadView::new(common, d, ctx.clone())),
        ControlKind::RadialMenu(r) => Box::new(RadialMenuView::new(common, r, ctx.clone())),
        ControlKind::Text(t) => Box::new(TextView::new(common, t, ctx.clone())),
        other => {
            log::debug!("no widget for {} control {}", other.name(), common.id);
            return None;
        }
    };
    Some(widget)
}

pub struct ControlSurface {
    ctx: ControlContext,
    viewport: Viewport,
    widgets: Vec<Box<dyn ControlView>>,
    /// Pointer → index into `widgets`.
    owners: HashMap<PointerId, usize>,
    visible: bool,
    in_use: bool,
    on_in_use: Option<Box<dyn FnMut(bool)>>,
}

impl ControlSurface {
    pub fn new(ctx: ControlContext, viewport: Viewport) -> Self {
        Self {
            ctx: ctx.with_density(viewport.density),
            viewport,
            widgets: Vec::new(),
            owners: HashMap::new(),
            visible: true,
            in_use: false,
            on_in_use: None,
        }
    }

    /// Called with `true` when the first pointer is taken and `false` when
    /// the last one is let go.
    pub fn set_in_use_listener(&mut self, listener: impl FnMut(bool) + 'static) {
        self.on_in_use = Some(Box::new(listener));
    }

    pub fn viewport(&self) -> Viewport {
        self.viewport
    }

    pub fn len(&self) -> usize {
        self.widgets.len()
    }

    pub fn is_empty(&self) -> bool {
        self.widgets.is_empty()
    }

    pub fn controls(&self) -> impl Iterator<Item = &dyn ControlView> {
        self.widgets.iter().map(|w| w.as_ref())
    }

    pub fn control(&self, id: ControlId) -> Option<&dyn ControlView> {
        self.controls().find(|w| w.common().id == id)
    }

    /// Snapshot of every hosted control in z-order.
    pub fn control_data(&self) -> Vec<ControlData> {
        self.widgets.iter().map(|w| w.control_data()).collect()
    }

    fn index_of(&self, id: ControlId) -> Option<usize> {
        self.widgets.iter().position(|w| w.common().id == id)
    }

    // ─── Editing ─────────────────────────────────────────────────────────

    /// Add `data` on top of the stack. Returns false for kinds without a
    /// widget (joystick, touchpad, mouse wheel).
    pub fn add_control(&mut self, data: ControlData) -> bool {
        let Some(mut widget) = build_widget(data, &self.ctx) else {
            return false;
        };
        let frame = resolve_frame(widget.common(), self.viewport);
        widget.set_frame(frame);
        self.widgets.push(widget);
        true
    }

    /// Replace the data of the control with the same id, keeping its place
    /// in the stack and any pointer it owns.
    pub fn bind_control(&mut self, data: ControlData) -> bool {
        let Some(idx) = self.index_of(data.id()) else {
            return false;
        };
        let frame = resolve_frame(&data.common, self.viewport);
        let widget = &mut self.widgets[idx];
        widget.bind(data);
        widget.set_frame(frame);
        true
    }

    pub fn remove_control(&mut self, id: ControlId) -> Option<ControlData> {
        let idx = self.index_of(id)?;
        let mut widget = self.widgets.remove(idx);
        widget.cancel_all_touches();
        self.owners.retain(|_, owner| *owner != idx);
        for owner in self.owners.values_mut() {
            if *owner > idx {
                *owner -= 1;
            }
        }
        self.notify_in_use();
        Some(widget.control_data())
    }

    /// Cancel everything and drop every widget.
    pub fn clear_controls(&mut self) {
        self.cancel_all();
        self.widgets.clear();
    }

    /// Unlatch every toggled button, sending its release.
    pub fn reset_all_toggles(&mut self) {
        for widget in &mut self.widgets {
            widget.reset_toggle();
        }
    }

    // ─── Layout and visibility ───────────────────────────────────────────

    pub fn set_viewport(&mut self, viewport: Viewport) {
        if viewport == self.viewport {
            return;
        }
        if viewport.density != self.viewport.density {
            // Widgets cache the density in their context; rebuild them.
            // Rebuilt buttons start unlatched, so release latches first.
            self.cancel_all();
            self.reset_all_toggles();
            self.ctx.density = viewport.density;
            let data = self.control_data();
            self.widgets = data
                .into_iter()
                .filter_map(|d| build_widget(d, &self.ctx))
                .collect();
        }
        self.viewport = viewport;
        for widget in &mut self.widgets {
            let frame = resolve_frame(widget.common(), viewport);
            widget.set_frame(frame);
        }
    }

    pub fn is_visible(&self) -> bool {
        self.visible
    }

    /// Hiding the overlay cancels every touch in flight.
    pub fn set_visible(&mut self, visible: bool) {
        if !visible && self.visible {
            self.cancel_all();
        }
        self.visible = visible;
    }

    // ─── Touch routing ───────────────────────────────────────────────────

    pub fn is_in_use(&self) -> bool {
        !self.owners.is_empty()
    }

    /// Pointers owned by controls that hide them from the game.
    pub fn consumed_pointers(&self) -> SmallVec<[PointerId; 4]> {
        let mut ids: SmallVec<[PointerId; 4]> = self
            .owners
            .iter()
            .filter(|(_, idx)| !self.widgets[**idx].common().is_pass_through)
            .map(|(id, _)| *id)
            .collect();
        ids.sort_unstable();
        ids
    }

    fn outcome_for(&self, idx: usize) -> TouchOutcome {
        if self.widgets[idx].common().is_pass_through {
            TouchOutcome::PassThrough
        } else {
            TouchOutcome::Consumed
        }
    }

    pub fn handle_touch(&mut self, event: TouchEvent) -> TouchOutcome {
        let outcome = match event {
            TouchEvent::Down { pointer, x, y } => self.touch_down(pointer, x, y),
            TouchEvent::Move { pointers } => {
                if !self.visible {
                    return TouchOutcome::Unhandled;
                }
                let mut outcome = TouchOutcome::Unhandled;
                for pos in pointers {
                    let Some(&idx) = self.owners.get(&pos.id) else {
                        continue;
                    };
                    let widget = &mut self.widgets[idx];
                    let (lx, ly) = widget.frame().to_local(pos.x, pos.y);
                    widget.handle_touch_move(pos.id, lx, ly);
                    outcome = match (outcome, self.outcome_for(idx)) {
                        (TouchOutcome::Consumed, _) | (_, TouchOutcome::Consumed) => {
                            TouchOutcome::Consumed
                        }
                        (_, o) => o,
                    };
                }
                outcome
            }
            TouchEvent::Up { pointer } => match self.owners.remove(&pointer) {
                Some(idx) => {
                    let outcome = self.outcome_for(idx);
                    self.widgets[idx].release_touch(pointer);
                    outcome
                }
                None => TouchOutcome::Unhandled,
            },
            TouchEvent::Cancel => {
                let had_owners = self.is_in_use();
                self.cancel_all();
                if had_owners {
                    TouchOutcome::Consumed
                } else {
                    TouchOutcome::Unhandled
                }
            }
        };
        self.notify_in_use();
        outcome
    }

    fn touch_down(&mut self, pointer: PointerId, x: f32, y: f32) -> TouchOutcome {
        if !self.visible {
            return TouchOutcome::Unhandled;
        }
        // A repeated down means the host lost the up; settle the old owner.
        if let Some(stale) = self.owners.remove(&pointer) {
            log::warn!("pointer {pointer} went down twice; releasing previous owner");
            self.widgets[stale].release_touch(pointer);
        }
        for idx in (0..self.widgets.len()).rev() {
            let widget = &mut self.widgets[idx];
            let frame = widget.frame();
            if !widget.common().is_visible || !frame.contains(x, y) {
                continue;
            }
            let (lx, ly) = frame.to_local(x, y);
            if widget.try_acquire_touch(pointer, lx, ly) {
                log::debug!("pointer {pointer} taken by {}", widget.common().id);
                self.owners.insert(pointer, idx);
                return self.outcome_for(idx);
            }
        }
        TouchOutcome::Unhandled
    }

    fn cancel_all(&mut self) {
        for idx in self.owners.values() {
            self.widgets[*idx].cancel_all_touches();
        }
        self.owners.clear();
        self.notify_in_use();
    }

    fn notify_in_use(&mut self) {
        let in_use = self.is_in_use();
        if in_use == self.in_use {
            return;
        }
        self.in_use = in_use;
        if let Some(listener) = self.on_in_use.as_mut() {
            listener(in_use);
        }
    }

    // ─── Rendering ───────────────────────────────────────────────────────

    /// Draw every visible control in z-order, each in its own frame.
    pub fn render(&self, canvas: &mut dyn Canvas) {
        if !self.visible {
            return;
        }
        for widget in &self.widgets {
            if !widget.common().is_visible {
                continue;
            }
            let frame = widget.frame();
            canvas.save();
            canvas.translate(frame.x as f64, frame.y as f64);
            widget.render(canvas);
            canvas.restore();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::bridge::{InputRecord, RecordingBridge};
    use crate::context::ManualScheduler;
    use pretty_assertions::assert_eq;
    use std::cell::RefCell;
    use std::rc::Rc;
    use vc_core::{ButtonData, JoystickData, KeyCode};

    fn surface() -> (ControlSurface, Rc<RecordingBridge>) {
        let bridge = Rc::new(RecordingBridge::new());
        let ctx = ControlContext::new(bridge.clone(), Rc::new(ManualScheduler::new()));
        (ControlSurface::new(ctx, Viewport::new(1000.0, 1000.0, 1.0)), bridge)
    }

    fn key(keycode: KeyCode) -> ControlData {
        ControlData::button(ButtonData {
            keycode,
            ..Default::default()
        })
    }

    #[test]
    fn unsupported_kinds_are_skipped() {
        let (mut s, _) = surface();
        let joystick = ControlData::new(Default::default(), ControlKind::Joystick(JoystickData::default()));
        assert!(!s.add_control(joystick));
        assert!(s.add_control(key(KeyCode::KEYBOARD_A)));
        assert_eq!(s.len(), 1);
    }

    #[test]
    fn remove_reindexes_owners() {
        let (mut s, bridge) = surface();
        let low = key(KeyCode::KEYBOARD_A).at(0.0, 0.0, 0.1, 0.1);
        let high = key(KeyCode::KEYBOARD_B).at(0.5, 0.5, 0.1, 0.1);
        let low_id = low.id();
        s.add_control(low);
        s.add_control(high);

        s.handle_touch(TouchEvent::down(7, 550.0, 550.0));
        assert!(s.remove_control(low_id).is_some());
        s.handle_touch(TouchEvent::up(7));
        let edges: Vec<_> = bridge.take().iter().filter_map(|r| r.key_edge()).collect();
        assert_eq!(edges, vec![(KeyCode::KEYBOARD_B, true), (KeyCode::KEYBOARD_B, false)]);
    }

    #[test]
    fn in_use_listener_fires_on_edges() {
        let (mut s, _) = surface();
        s.add_control(key(KeyCode::KEYBOARD_A).at(0.0, 0.0, 0.2, 0.2));
        let seen = Rc::new(RefCell::new(Vec::new()));
        let sink = seen.clone();
        s.set_in_use_listener(move |v| sink.borrow_mut().push(v));

        s.handle_touch(TouchEvent::down(1, 50.0, 50.0));
        s.handle_touch(TouchEvent::move_to(1, 60.0, 60.0));
        s.handle_touch(TouchEvent::up(1));
        assert_eq!(*seen.borrow(), vec![true, false]);
    }

    #[test]
    fn viewport_change_relayouts() {
        let (mut s, _) = surface();
        let data = key(KeyCode::KEYBOARD_A).at(0.5, 0.5, 0.1, 0.1);
        let id = data.id();
        s.add_control(data);
        s.set_viewport(Viewport::new(2000.0, 1000.0, 2.0));
        let frame = s.control(id).map(|w| w.frame());
        assert_eq!(frame, Some(vc_core::ResolvedBounds::new(1000.0, 500.0, 100.0, 100.0)));
        assert_eq!(s.len(), 1);
    }

    #[test]
    fn density_change_releases_latched_toggles() {
        let (mut s, bridge) = surface();
        let shift = ControlData::button(ButtonData {
            keycode: KeyCode::KEYBOARD_LSHIFT,
            is_toggle: true,
            ..Default::default()
        })
        .at(0.0, 0.0, 0.1, 0.1);
        s.add_control(shift);
        s.handle_touch(TouchEvent::down(1, 50.0, 50.0));
        s.handle_touch(TouchEvent::up(1));

        s.set_viewport(Viewport::new(1000.0, 1000.0, 2.0));
        s.reset_all_toggles();
        let edges: Vec<_> = bridge
            .take()
            .iter()
            .filter_map(InputRecord::key_edge)
            .collect();
        assert_eq!(
            edges,
            vec![(KeyCode::KEYBOARD_LSHIFT, true), (KeyCode::KEYBOARD_LSHIFT, false)]
        );
    }
}
