//! Button widget: momentary or latching key.
//!
//! ```text
//!   momentary:  Idle ──acquire──▶ Pressed ──release──▶ Idle
//!                      (down)                (up)
//!   toggle:     Off ──acquire──▶ On ──acquire──▶ Off
//!                     (down)           (up)          release sends nothing
//! ```
//!
//! Two special key codes never reach the game: the show-keyboard key opens
//! the IME and the touchpad key flips the shared secondary-button flag.

use crate::bridge::ControlInputBridge;
use crate::context::ControlContext;
use crate::input::PointerId;
use crate::touch::{ControlView, reject_bind, with_rotation};
use std::sync::Arc;
use vc_core::{
    ButtonData, ButtonMode, ControlCommon, ControlData, ControlKind, ControlShape, KeyClass,
    KeyCode, ResolvedBounds, Rgba, TextureConfig,
};
use vc_render::kurbo::{Rect, Size};
use vc_render::paint::{
    auto_fit_text_size, circle_path, draw_texture, fit_label_size, scaled_alpha, shape_path,
    theme_fill, theme_stroke,
};
use vc_render::{Brush, Canvas, HitShape, TextStyle, Texture, alpha_allows_hit, point_in_shape};

/// Alpha multiplier while pressed or latched.
const ACTIVE_ALPHA_BOOST: f32 = 1.2;
const PRESS_HAPTIC_MS: u32 = 50;

pub struct ButtonView {
    common: ControlCommon,
    button: ButtonData,
    ctx: ControlContext,
    frame: ResolvedBounds,
    active_pointer: Option<PointerId>,
    pressed: bool,
    toggled: bool,
}

impl ButtonView {
    pub fn new(common: ControlCommon, button: ButtonData, ctx: ControlContext) -> Self {
        Self {
            common,
            button,
            ctx,
            frame: ResolvedBounds::default(),
            active_pointer: None,
            pressed: false,
            toggled: false,
        }
    }

    pub fn button(&self) -> &ButtonData {
        &self.button
    }

    pub fn is_pressed(&self) -> bool {
        self.pressed
    }

    pub fn is_toggled(&self) -> bool {
        self.toggled
    }

    // ─── State transitions ───────────────────────────────────────────────

    fn handle_press(&mut self) {
        self.pressed = true;
        match self.button.keycode.class() {
            KeyClass::ShowKeyboard => {
                self.ctx.bridge.start_text_input();
                return;
            }
            KeyClass::ToggleTouchpadSecondary => {
                let on = self.ctx.input_mode.toggle_touchpad_secondary();
                log::debug!("touchpad secondary button {}", if on { "on" } else { "off" });
                return;
            }
            _ => {}
        }
        if self.button.is_toggle {
            self.toggled = !self.toggled;
            self.send_input(self.toggled);
        } else {
            self.send_input(true);
        }
    }

    fn handle_release(&mut self) {
        let was_pressed = std::mem::replace(&mut self.pressed, false);
        if was_pressed && !self.button.is_toggle {
            self.send_input(false);
        }
    }

    /// Let go of whatever the current data holds down, keeping pointer
    /// ownership so the later release lands here silently.
    fn release_held(&mut self) {
        if self.pressed && !self.button.is_toggle {
            self.send_input(false);
        }
        if self.toggled {
            self.send_input(false);
        }
        self.pressed = false;
        self.toggled = false;
    }

    fn send_input(&self, is_down: bool) {
        let key = self.button.keycode;
        let bridge: &dyn ControlInputBridge = self.ctx.bridge.as_ref();
        match key.class() {
            KeyClass::Keyboard => bridge.send_key(key, is_down),
            KeyClass::XboxTrigger => bridge.send_xbox_trigger(key, if is_down { 1.0 } else { -1.0 }),
            KeyClass::XboxButton => bridge.send_xbox_button(key, is_down),
            KeyClass::MouseWheel(dir) => {
                if is_down {
                    bridge.send_mouse_wheel(dir.delta());
                }
            }
            KeyClass::MouseButton => {
                let (cx, cy) = self.frame.center();
                bridge.send_mouse_button(key, is_down, cx, cy);
            }
            KeyClass::ShowKeyboard | KeyClass::ToggleTouchpadSecondary | KeyClass::Unknown => {}
        }
    }

    // ─── Hit testing ─────────────────────────────────────────────────────

    fn load(&self, config: &TextureConfig) -> Option<Arc<Texture>> {
        if !config.is_usable() {
            return None;
        }
        let loader = self.ctx.textures.as_ref()?;
        loader.load_texture(&config.path, self.frame.width as u32, self.frame.height as u32)
    }

    fn hit_local(&self, x: f32, y: f32) -> bool {
        let (w, h) = (self.frame.width, self.frame.height);
        // Transparency is judged on the normal-state skin in every state.
        if self.button.use_texture_alpha_hit_test
            && let Some(tex) = self.load(&self.button.texture.normal)
            && !alpha_allows_hit(&tex, x, y, w, h)
        {
            return false;
        }
        let shape = HitShape::from_control(
            self.button.shape,
            self.ctx.dp(self.common.corner_radius),
            &self.button.polygon_points,
        );
        point_in_shape(x, y, &shape, w, h)
    }

    // ─── Painting ────────────────────────────────────────────────────────

    fn label(&self) -> String {
        if self.button.keycode == KeyCode::SPECIAL_TOUCHPAD_RIGHT_BUTTON {
            let glyph = if self.ctx.input_mode.is_touchpad_secondary() {
                "◑"
            } else {
                "◐"
            };
            return glyph.to_string();
        }
        self.common.name.clone()
    }

    fn paint(&self, canvas: &mut dyn Canvas) {
        let (w, h) = (self.frame.width as f64, self.frame.height as f64);
        let rect = Rect::new(0.0, 0.0, w, h);
        let corner = self.ctx.dp(self.common.corner_radius) as f64;
        let outline = shape_path(self.button.shape, rect, corner, &self.button.polygon_points);
        let active = self.pressed || self.toggled;
        let boost = if active { ACTIVE_ALPHA_BOOST } else { 1.0 };

        let skin = self
            .button
            .texture
            .for_state(self.pressed, self.toggled)
            .and_then(|cfg| self.load(cfg).map(|tex| (tex, cfg)));
        let gamepad_disc = self.button.shape == ControlShape::Circle
            && self.button.mode == ButtonMode::Gamepad
            && skin.is_none();

        // Skinned buttons carry their own artwork: no fill, outline or caption.
        if let Some((tex, cfg)) = &skin {
            draw_texture(canvas, tex, cfg, rect, &outline);
            return;
        }
        if gamepad_disc {
            self.paint_gamepad_disc(canvas, rect, active);
        } else {
            canvas.fill(&outline, &Brush::Solid(theme_fill(&self.common, boost)));
            let stroke = theme_stroke(&self.common, self.ctx.density, boost);
            if stroke.visible {
                canvas.stroke(&outline, stroke.width, stroke.color);
            }
        }
        self.paint_label(canvas, rect);
    }

    fn paint_gamepad_disc(&self, canvas: &mut dyn Canvas, rect: Rect, active: bool) {
        let radius = rect.width().min(rect.height()) / 2.0;
        let center = rect.center();
        let glow = if active {
            self.common.bg_color
        } else {
            Rgba(0x327D_7D7D)
        };
        let core = if active { Rgba::WHITE } else { Rgba(0xFF7D_7D7D) };
        canvas.fill(
            &circle_path(center, radius * 0.88),
            &Brush::Solid(glow.with_alpha(scaled_alpha(self.common.opacity, 0.4))),
        );
        canvas.fill(
            &circle_path(center, radius * 0.7),
            &Brush::Solid(core.with_alpha(scaled_alpha(self.common.opacity, 1.0))),
        );
    }

    fn paint_label(&self, canvas: &mut dyn Canvas, rect: Rect) {
        let text = self.label();
        if text.is_empty() {
            return;
        }
        let center = rect.center();
        canvas.save();
        if self.button.shape == ControlShape::Circle {
            canvas.clip(&circle_path(center, rect.width().min(rect.height()) / 2.0));
        } else {
            let pad = self.ctx.dp(2.0) as f64;
            canvas.clip(&shape_path(ControlShape::Rectangle, rect.inset(-pad), 0.0, &[]));
        }
        let size = if self.button.mode == ButtonMode::Gamepad {
            auto_fit_text_size(canvas, &text, Size::new(rect.width(), rect.height()))
        } else if self.button.keycode == KeyCode::SPECIAL_TOUCHPAD_RIGHT_BUTTON {
            self.ctx.dp(32.0) as f64
        } else {
            let available = rect.width() - self.ctx.dp(4.0) as f64;
            fit_label_size(canvas, &text, self.ctx.dp(16.0) as f64, available)
        };
        let color = self.common.text_color.with_opacity(self.common.text_opacity);
        canvas.draw_text(&text, center, &TextStyle::new(size, color));
        canvas.restore();
    }
}

impl ControlView for ButtonView {
    fn common(&self) -> &ControlCommon {
        &self.common
    }

    fn control_data(&self) -> ControlData {
        ControlData::new(self.common.clone(), ControlKind::Button(self.button.clone()))
    }

    fn bind(&mut self, data: ControlData) {
        match data.kind {
            ControlKind::Button(button) => {
                // A held key must be released under the code that pressed it.
                if button.keycode != self.button.keycode
                    || button.is_toggle != self.button.is_toggle
                {
                    self.release_held();
                }
                self.common = data.common;
                self.button = button;
            }
            _ => reject_bind("button", &data),
        }
    }

    fn frame(&self) -> ResolvedBounds {
        self.frame
    }

    fn set_frame(&mut self, frame: ResolvedBounds) {
        self.frame = frame;
    }

    fn is_touch_in_bounds(&self, x: f32, y: f32) -> bool {
        let (lx, ly) = self.frame.to_local(x, y);
        self.hit_local(lx, ly)
    }

    fn try_acquire_touch(&mut self, pointer: PointerId, x: f32, y: f32) -> bool {
        if self.active_pointer.is_some() || !self.hit_local(x, y) {
            return false;
        }
        self.active_pointer = Some(pointer);
        self.handle_press();
        self.ctx.haptics.vibrate(PRESS_HAPTIC_MS);
        true
    }

    fn handle_touch_move(&mut self, _pointer: PointerId, _x: f32, _y: f32) {}

    fn release_touch(&mut self, pointer: PointerId) {
        if self.active_pointer != Some(pointer) {
            return;
        }
        self.active_pointer = None;
        self.handle_release();
    }

    fn cancel_all_touches(&mut self) {
        self.active_pointer = None;
        if self.pressed {
            self.handle_release();
        }
    }

    fn active_pointer(&self) -> Option<PointerId> {
        self.active_pointer
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

    /// Unlatch and send the matching release.
    fn reset_toggle(&mut self) {
        if self.toggled {
            self.toggled = false;
            self.send_input(false);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::bridge::{InputRecord, RecordingBridge};
    use crate::context::ManualScheduler;
    use pretty_assertions::assert_eq;
    use std::rc::Rc;
    use vc_render::DisplayList;

    fn button(data: ButtonData) -> (ButtonView, Rc<RecordingBridge>) {
        let bridge = Rc::new(RecordingBridge::new());
        let ctx = ControlContext::new(bridge.clone(), Rc::new(ManualScheduler::new()));
        let mut view = ButtonView::new(ControlCommon::default(), data, ctx);
        view.set_frame(ResolvedBounds::new(100.0, 200.0, 100.0, 100.0));
        (view, bridge)
    }

    #[test]
    fn trigger_sends_analog_extremes() {
        let (mut b, bridge) = button(ButtonData {
            keycode: KeyCode::XBOX_TRIGGER_LEFT,
            ..Default::default()
        });
        assert!(b.try_acquire_touch(1, 50.0, 50.0));
        b.release_touch(1);
        assert_eq!(
            bridge.take(),
            vec![
                InputRecord::XboxTrigger {
                    keycode: KeyCode::XBOX_TRIGGER_LEFT,
                    value: 1.0
                },
                InputRecord::XboxTrigger {
                    keycode: KeyCode::XBOX_TRIGGER_LEFT,
                    value: -1.0
                },
            ]
        );
    }

    #[test]
    fn wheel_fires_on_press_only() {
        let (mut b, bridge) = button(ButtonData {
            keycode: KeyCode::MOUSE_WHEEL_DOWN,
            ..Default::default()
        });
        b.try_acquire_touch(1, 50.0, 50.0);
        b.release_touch(1);
        assert_eq!(bridge.take(), vec![InputRecord::MouseWheel { delta_y: -1.0 }]);
    }

    #[test]
    fn mouse_clicks_at_screen_center() {
        let (mut b, bridge) = button(ButtonData {
            keycode: KeyCode::MOUSE_LEFT,
            ..Default::default()
        });
        b.try_acquire_touch(3, 10.0, 10.0);
        assert_eq!(
            bridge.take(),
            vec![InputRecord::MouseButton {
                keycode: KeyCode::MOUSE_LEFT,
                down: true,
                x: 150.0,
                y: 250.0
            }]
        );
    }

    #[test]
    fn special_keys_do_not_dispatch() {
        let (mut b, bridge) = button(ButtonData {
            keycode: KeyCode::SPECIAL_TOUCHPAD_RIGHT_BUTTON,
            ..Default::default()
        });
        b.try_acquire_touch(1, 50.0, 50.0);
        b.release_touch(1);
        assert!(bridge.is_empty());
        assert!(b.ctx.input_mode.is_touchpad_secondary());
        assert_eq!(b.label(), "◑");

        let (mut kb, bridge) = button(ButtonData {
            keycode: KeyCode::SPECIAL_KEYBOARD,
            ..Default::default()
        });
        kb.try_acquire_touch(1, 50.0, 50.0);
        kb.release_touch(1);
        assert_eq!(bridge.take(), vec![InputRecord::TextInput]);
    }

    #[test]
    fn reset_toggle_releases_latch() {
        let (mut b, bridge) = button(ButtonData {
            keycode: KeyCode::KEYBOARD_LSHIFT,
            is_toggle: true,
            ..Default::default()
        });
        b.try_acquire_touch(1, 50.0, 50.0);
        b.release_touch(1);
        assert!(b.is_toggled());
        b.reset_toggle();
        b.reset_toggle();
        assert_eq!(
            bridge.take(),
            vec![
                InputRecord::Key {
                    keycode: KeyCode::KEYBOARD_LSHIFT,
                    down: true
                },
                InputRecord::Key {
                    keycode: KeyCode::KEYBOARD_LSHIFT,
                    down: false
                },
            ]
        );
    }

    #[test]
    fn cancel_is_idempotent() {
        let (mut b, bridge) = button(ButtonData {
            keycode: KeyCode::KEYBOARD_E,
            ..Default::default()
        });
        b.try_acquire_touch(1, 50.0, 50.0);
        b.cancel_all_touches();
        b.cancel_all_touches();
        assert_eq!(bridge.len(), 2);
        assert!(!b.is_pressed());
        assert_eq!(b.active_pointer(), None);
    }

    #[test]
    fn bind_rejects_other_kinds() {
        let (mut b, _) = button(ButtonData {
            keycode: KeyCode::KEYBOARD_E,
            ..Default::default()
        });
        b.bind(ControlData::text(Default::default()));
        assert_eq!(b.button().keycode, KeyCode::KEYBOARD_E);
    }

    #[test]
    fn rebinding_a_held_key_releases_the_old_one() {
        let (mut b, bridge) = button(ButtonData {
            keycode: KeyCode::KEYBOARD_A,
            ..Default::default()
        });
        b.try_acquire_touch(1, 50.0, 50.0);
        let mut data = b.control_data();
        if let ControlKind::Button(button) = &mut data.kind {
            button.keycode = KeyCode::KEYBOARD_B;
        }
        b.bind(data);
        assert!(!b.is_pressed());
        assert_eq!(b.active_pointer(), Some(1));
        b.release_touch(1);
        assert_eq!(
            bridge.take(),
            vec![
                InputRecord::Key {
                    keycode: KeyCode::KEYBOARD_A,
                    down: true
                },
                InputRecord::Key {
                    keycode: KeyCode::KEYBOARD_A,
                    down: false
                },
            ]
        );
    }

    #[test]
    fn switching_to_toggle_mid_press_sends_the_up() {
        let (mut b, bridge) = button(ButtonData {
            keycode: KeyCode::KEYBOARD_LCTRL,
            ..Default::default()
        });
        b.try_acquire_touch(1, 50.0, 50.0);
        let mut data = b.control_data();
        if let ControlKind::Button(button) = &mut data.kind {
            button.is_toggle = true;
        }
        b.bind(data);
        b.release_touch(1);
        let edges: Vec<_> = bridge
            .take()
            .iter()
            .filter_map(InputRecord::key_edge)
            .collect();
        assert_eq!(
            edges,
            vec![(KeyCode::KEYBOARD_LCTRL, true), (KeyCode::KEYBOARD_LCTRL, false)]
        );
    }

    #[test]
    fn rebinding_a_latched_toggle_unlatches_it() {
        let (mut b, bridge) = button(ButtonData {
            keycode: KeyCode::KEYBOARD_LSHIFT,
            is_toggle: true,
            ..Default::default()
        });
        b.try_acquire_touch(1, 50.0, 50.0);
        b.release_touch(1);
        let mut data = b.control_data();
        if let ControlKind::Button(button) = &mut data.kind {
            button.keycode = KeyCode::KEYBOARD_LCTRL;
        }
        b.bind(data);
        assert!(!b.is_toggled());
        b.reset_toggle();
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

    #[test]
    fn renders_fill_stroke_and_caption() {
        let (mut b, _) = button(ButtonData {
            keycode: KeyCode::KEYBOARD_SPACE,
            ..Default::default()
        });
        b.common.name = "Jump".to_string();
        b.common.rotation = 15.0;
        let mut list = DisplayList::new();
        b.render(&mut list);
        assert!(list.is_balanced());
        assert_eq!(list.fills().count(), 1);
        assert_eq!(list.strokes().count(), 1);
        assert_eq!(list.texts().collect::<Vec<_>>(), vec!["Jump"]);
    }

    #[test]
    fn gamepad_circle_draws_rings_without_stroke() {
        let (b, _) = button(ButtonData {
            keycode: KeyCode::XBOX_BUTTON_A,
            mode: ButtonMode::Gamepad,
            shape: ControlShape::Circle,
            ..Default::default()
        });
        let mut list = DisplayList::new();
        b.render(&mut list);
        assert_eq!(list.fills().count(), 2);
        assert_eq!(list.strokes().count(), 0);
    }
}
