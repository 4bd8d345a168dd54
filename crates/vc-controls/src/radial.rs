//! Radial menu: a round button that blooms into a ring of sectors.
//!
//! ```text
//!   Collapsed ──acquire──▶ Expanding ──▶ Expanded ──release──▶ Collapsing ──▶ Collapsed
//!                                           │                      ▲
//!                                           └──────cancel──────────┘
//! ```
//!
//! The finger that opened the menu picks a sector by angle. Lifting it taps
//! the sector's key: the down goes out at once, the up a moment later through
//! the scheduler. Nothing is sent while the finger moves between sectors.

use crate::anim::{Decelerate, Easing, Overshoot, Tween};
use crate::bridge::dispatch_by_type;
use crate::context::ControlContext;
use crate::input::PointerId;
use crate::touch::{ControlView, reject_bind, with_rotation};
use smallvec::smallvec;
use std::rc::Rc;
use vc_core::{
    ControlCommon, ControlData, ControlKind, KeyCode, RadialMenuData, RadialSector,
    ResolvedBounds, Rgba,
};
use vc_render::kurbo::{BezPath, CircleSegment, Point, Rect, Shape, Vec2};
use vc_render::paint::{circle_path, theme_stroke};
use vc_render::{Brush, Canvas, TextStyle};

/// Delay between the synthesized down and up of a sector tap.
pub const TAP_RELEASE_MS: u64 = 60;

const SELECT_HAPTIC_MS: u32 = 15;
const FIRE_HAPTIC_MS: u32 = 30;

/// Editor highlight blue.
const EDITOR_GLOW: Rgba = Rgba::from_argb(50, 66, 165, 245);
const EDITOR_HIGHLIGHT: Rgba = Rgba::from_argb(100, 66, 165, 245);
const EDITOR_BUBBLE: Rgba = Rgba::from_argb(200, 66, 165, 245);
const IDLE_BUBBLE: Rgba = Rgba::from_argb(120, 0, 0, 0);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RadialPhase {
    Collapsed,
    Expanding,
    Expanded,
    Collapsing,
}

// ─── Sector math ─────────────────────────────────────────────────────────

/// Angle of the vector (`dx`, `dy`) in screen space, in degrees clockwise
/// from straight up, in `[0, 360)`.
pub fn touch_angle(dx: f32, dy: f32) -> f32 {
    let angle = dy.atan2(dx).to_degrees() + 90.0;
    if angle < 0.0 { angle + 360.0 } else { angle }
}

/// Sector under `angle` for a ring of `count` sectors with sector 0
/// centred on straight up. A boundary angle belongs to the next sector
/// clockwise.
pub fn sector_for_angle(angle: f32, count: usize) -> Option<usize> {
    if count == 0 {
        return None;
    }
    let span = 360.0 / count as f32;
    let idx = ((angle + span / 2.0).rem_euclid(360.0) / span) as usize;
    Some(idx.min(count - 1))
}

/// Clamp a float alpha in byte units.
fn alpha(v: f32) -> u8 {
    v.clamp(0.0, 255.0) as u8
}

fn polar(center: Point, radius: f64, degrees: f64) -> Point {
    let rad = degrees.to_radians();
    center + Vec2::new(rad.cos(), rad.sin()) * radius
}

// ─── Widget ──────────────────────────────────────────────────────────────

pub struct RadialMenuView {
    common: ControlCommon,
    radial: RadialMenuData,
    ctx: ControlContext,
    frame: ResolvedBounds,
    active_pointer: Option<PointerId>,
    /// Last local touch position of the owning pointer.
    touch: Option<(f32, f32)>,
    selected: Option<usize>,
    /// Target state; the tween may still be running towards it.
    expanded: bool,
    progress: Tween,
}

impl RadialMenuView {
    pub fn new(common: ControlCommon, radial: RadialMenuData, ctx: ControlContext) -> Self {
        let mut view = Self {
            common,
            radial,
            ctx,
            frame: ResolvedBounds::default(),
            active_pointer: None,
            touch: None,
            selected: None,
            expanded: false,
            progress: Tween::settled(0.0),
        };
        if view.radial.editor_preview_expanded {
            view.progress = Tween::settled(1.0);
            view.expanded = true;
        }
        view
    }

    pub fn radial(&self) -> &RadialMenuData {
        &self.radial
    }

    pub fn selected_sector(&self) -> Option<usize> {
        self.selected
    }

    pub fn is_expanded(&self) -> bool {
        self.expanded
    }

    /// Expansion in `[0, 1]`, possibly overshooting while it blooms.
    pub fn progress(&self) -> f32 {
        self.progress.value_at(self.ctx.now_ms())
    }

    pub fn phase(&self) -> RadialPhase {
        let now = self.ctx.now_ms();
        let opening = self.progress.target() >= 1.0;
        match (self.progress.is_finished(now), opening) {
            (false, true) => RadialPhase::Expanding,
            (false, false) => RadialPhase::Collapsing,
            (true, true) => RadialPhase::Expanded,
            (true, false) => RadialPhase::Collapsed,
        }
    }

    fn sector_count(&self) -> usize {
        self.radial.sector_count as usize
    }

    fn base_radius(&self) -> f32 {
        self.frame.width.min(self.frame.height) / 2.0
    }

    fn expanded_radius(&self) -> f32 {
        self.base_radius() * self.radial.expanded_scale
    }

    fn distance_from_center(&self, x: f32, y: f32) -> f32 {
        let dx = x - self.frame.width / 2.0;
        let dy = y - self.frame.height / 2.0;
        (dx * dx + dy * dy).sqrt()
    }

    fn sector_at(&self, x: f32, y: f32) -> Option<usize> {
        let dead_zone = self.expanded_radius() * self.radial.dead_zone_ratio;
        if self.distance_from_center(x, y) < dead_zone {
            return None;
        }
        let angle = touch_angle(x - self.frame.width / 2.0, y - self.frame.height / 2.0);
        sector_for_angle(angle, self.sector_count())
    }

    fn animate(&mut self, expand: bool) {
        let now = self.ctx.now_ms();
        let from = self.progress.value_at(now);
        let easing: Rc<dyn Easing> = if expand {
            Rc::new(Overshoot::default())
        } else {
            Rc::new(Decelerate)
        };
        let to = if expand { 1.0 } else { 0.0 };
        self.progress = Tween::new(from, to, now, self.radial.expand_duration as u64, easing);
        self.expanded = expand;
    }

    /// Tap `keycode`: down now, up after `TAP_RELEASE_MS`.
    fn fire(&self, keycode: KeyCode) {
        let center = self.frame.center();
        dispatch_by_type(self.ctx.bridge.as_ref(), keycode, true, center);
        self.ctx.haptics.vibrate(FIRE_HAPTIC_MS);
        let bridge = Rc::clone(&self.ctx.bridge);
        self.ctx.scheduler.schedule_once(
            TAP_RELEASE_MS,
            Box::new(move || dispatch_by_type(bridge.as_ref(), keycode, false, center)),
        );
    }

    // ─── Painting ────────────────────────────────────────────────────────

    fn caption(&self) -> String {
        if self.common.name.is_empty() {
            "◎".to_string()
        } else {
            self.common.name.clone()
        }
    }

    fn sector_span(&self) -> f64 {
        360.0 / self.sector_count().max(1) as f64
    }

    /// Start angle of sector `i` in kurbo's clockwise-from-east degrees.
    fn sector_start(&self, i: usize) -> f64 {
        let span = self.sector_span();
        -90.0 + i as f64 * span - span / 2.0
    }

    fn paint(&self, canvas: &mut dyn Canvas) {
        let mut p = self.progress();
        if self.radial.editor_preview_expanded && p <= 0.0 {
            p = 1.0;
        }
        if p > 0.0 {
            self.paint_expanded(canvas, p);
        } else {
            self.paint_collapsed(canvas);
        }
    }

    fn paint_collapsed(&self, canvas: &mut dyn Canvas) {
        let c = Point::new(self.frame.width as f64 / 2.0, self.frame.height as f64 / 2.0);
        let r = self.base_radius() as f64;
        let bg = self.common.bg_color;
        let opacity = self.common.opacity;

        canvas.fill(
            &circle_path(c, r),
            &Brush::Radial {
                center: c,
                radius: r,
                stops: smallvec![
                    (0.3, bg.with_alpha(alpha(opacity * 255.0))),
                    (1.0, bg.with_alpha(alpha(opacity * 200.0))),
                ],
            },
        );

        let count = self.sector_count();
        if count > 0 {
            let mut spokes = BezPath::new();
            for i in 0..count {
                let a = self.sector_start(i);
                spokes.move_to(polar(c, r * 0.3, a));
                spokes.line_to(polar(c, r * 0.6, a));
            }
            canvas.stroke(
                &spokes,
                self.ctx.dp(0.5) as f64,
                Rgba::WHITE.with_alpha(alpha(opacity * 80.0)),
            );
        }

        let border = theme_stroke(&self.common, self.ctx.density, 1.0);
        canvas.stroke(
            &circle_path(c, r - self.ctx.dp(1.0) as f64),
            self.ctx.dp(1.5) as f64,
            border.color,
        );

        let style = TextStyle::new(
            self.ctx.dp(14.0) as f64,
            self.common.text_color.with_opacity(self.common.text_opacity),
        )
        .bold();
        canvas.draw_text(&self.caption(), c, &style);
    }

    fn paint_expanded(&self, canvas: &mut dyn Canvas, p: f32) {
        let c = Point::new(self.frame.width as f64 / 2.0, self.frame.height as f64 / 2.0);
        let er = (self.expanded_radius() * p) as f64;
        let dz = er * self.radial.dead_zone_ratio as f64;
        let bg = self.common.bg_color;
        let opacity = self.common.opacity;
        let span = self.sector_span();
        let preview = self.radial.editor_preview_expanded;
        let editor_pick = if preview {
            self.radial.editor_selected_sector
        } else {
            None
        };

        canvas.fill(
            &circle_path(c, er),
            &Brush::Solid(bg.with_alpha(alpha(opacity * 0.7 * 255.0 * p))),
        );

        let count = self.sector_count();
        for i in 0..count {
            let start = self.sector_start(i);
            let wedge = |outer: f64| {
                CircleSegment::new(c, outer, dz, start.to_radians(), span.to_radians()).to_path(0.1)
            };
            if self.selected == Some(i) {
                let color = self.radial.selected_color;
                canvas.fill(&wedge(er), &Brush::Solid(color.with_alpha(60)));
                canvas.fill(&wedge(er * 0.97), &Brush::Solid(color));
            } else if editor_pick == Some(i) {
                canvas.fill(&wedge(er), &Brush::Solid(EDITOR_GLOW));
                canvas.fill(&wedge(er * 0.97), &Brush::Solid(EDITOR_HIGHLIGHT));
            }
        }

        if self.radial.show_dividers && count > 1 {
            let mut dividers = BezPath::new();
            for i in 0..count {
                let a = self.sector_start(i);
                dividers.move_to(polar(c, dz, a));
                dividers.line_to(polar(c, er * 0.95, a));
            }
            canvas.stroke(
                &dividers,
                self.ctx.dp(1.0) as f64,
                self.radial.divider_color.with_alpha(alpha(255.0 * p)),
            );
        }

        for i in 0..count {
            let mid = self.sector_start(i) + span / 2.0;
            let highlighted = self.selected == Some(i) || editor_pick == Some(i);
            if let Some(sector) = self.radial.sectors.get(i) {
                let at = polar(c, (dz + er) / 2.0, mid);
                self.paint_sector_label(canvas, sector, at, p, highlighted);
            }
            if preview {
                let at = polar(c, er * 0.88, mid);
                let fill = if editor_pick == Some(i) {
                    EDITOR_BUBBLE
                } else {
                    IDLE_BUBBLE
                };
                canvas.fill(&circle_path(at, self.ctx.dp(7.0) as f64), &Brush::Solid(fill));
                canvas.draw_text(
                    &(i + 1).to_string(),
                    at,
                    &TextStyle::new(self.ctx.dp(8.0) as f64, Rgba::WHITE),
                );
            }
        }

        if dz > 0.0 {
            canvas.fill(
                &circle_path(c, dz),
                &Brush::Radial {
                    center: c,
                    radius: dz,
                    stops: smallvec![
                        (0.5, bg.with_alpha(alpha(opacity * 255.0))),
                        (1.0, bg.with_alpha(alpha(opacity * 220.0))),
                    ],
                },
            );
        }

        self.paint_center_label(canvas, c, p, editor_pick);

        let border = theme_stroke(&self.common, self.ctx.density, 1.0)
            .color
            .with_alpha(alpha(self.common.border_opacity * 255.0 * p));
        canvas.stroke(
            &circle_path(c, er - self.ctx.dp(1.0) as f64),
            self.ctx.dp(1.5) as f64,
            border,
        );
        if dz > 0.0 {
            canvas.stroke(&circle_path(c, dz), self.ctx.dp(1.0) as f64, border);
        }

        if self.active_pointer.is_some()
            && self.selected.is_some()
            && let Some((tx, ty)) = self.touch
        {
            let at = Point::new(tx as f64, ty as f64);
            let radius = self.ctx.dp(12.0) as f64;
            canvas.fill(
                &circle_path(at, radius),
                &Brush::Radial {
                    center: at,
                    radius,
                    stops: smallvec![
                        (0.0, Rgba::WHITE.with_alpha(180)),
                        (1.0, Rgba::TRANSPARENT),
                    ],
                },
            );
        }
    }

    fn paint_sector_label(
        &self,
        canvas: &mut dyn Canvas,
        sector: &RadialSector,
        at: Point,
        p: f32,
        highlighted: bool,
    ) {
        let color = self.common.text_color;
        let icon_px = self.ctx.dp(20.0);
        let icon = self
            .ctx
            .textures
            .as_ref()
            .filter(|_| !sector.icon_path.is_empty())
            .and_then(|t| t.load_texture(&sector.icon_path, icon_px as u32, icon_px as u32));

        if let Some(icon) = icon {
            let size = (icon_px * p).max(1.0) as f64;
            let icon_center = at - Vec2::new(0.0, self.ctx.dp(4.0) as f64);
            canvas.draw_image(
                &icon,
                Rect::from_center_size(icon_center, (size, size)),
                p.clamp(0.0, 1.0),
            );
            let label_size = (self.ctx.dp(9.0) * p) as f64;
            if !sector.label.is_empty() && label_size >= 1.0 {
                let below = icon_center + Vec2::new(0.0, size / 2.0 + label_size / 2.0);
                canvas.draw_text(
                    &sector.label,
                    below,
                    &TextStyle::new(label_size, color.with_alpha(alpha(255.0 * p))),
                );
            }
            return;
        }

        let (size, a) = if highlighted {
            (self.ctx.dp(13.0) * p, 255.0 * p)
        } else {
            (
                self.ctx.dp(11.0) * p,
                self.common.text_opacity * 220.0 * p,
            )
        };
        if size < 1.0 {
            return;
        }
        let mut style = TextStyle::new(size as f64, color.with_alpha(alpha(a)));
        if highlighted {
            style = style.bold();
        }
        canvas.draw_text(&sector.caption(), at, &style);
    }

    fn paint_center_label(
        &self,
        canvas: &mut dyn Canvas,
        c: Point,
        p: f32,
        editor_pick: Option<usize>,
    ) {
        let color = self.common.text_color;
        let live = self
            .selected
            .and_then(|i| self.radial.sectors.get(i))
            .map(RadialSector::caption);
        let picked = editor_pick.and_then(|i| {
            self.radial
                .sectors
                .get(i)
                .map(|s| format!("#{} {}", i + 1, s.caption()))
        });

        if let Some(text) = live.or(picked) {
            let style = TextStyle::new(
                (self.ctx.dp(11.0) * p) as f64,
                color.with_alpha(alpha(255.0 * p)),
            )
            .bold();
            canvas.draw_text(&text, c, &style);
        } else {
            let style = TextStyle::new(
                (self.ctx.dp(10.0) * p) as f64,
                color.with_alpha(alpha(self.common.text_opacity * 180.0 * p)),
            );
            canvas.draw_text(&self.caption(), c, &style);
        }
    }
}

impl ControlView for RadialMenuView {
    fn common(&self) -> &ControlCommon {
        &self.common
    }

    fn control_data(&self) -> ControlData {
        ControlData::new(
            self.common.clone(),
            ControlKind::RadialMenu(self.radial.clone()),
        )
    }

    fn bind(&mut self, data: ControlData) {
        match data.kind {
            ControlKind::RadialMenu(radial) => {
                self.common = data.common;
                self.radial = radial;
                if self.selected.is_some_and(|i| i >= self.sector_count()) {
                    self.selected = None;
                }
                // Snap for the editor's preview toggle; live menus animate.
                let p = self.progress();
                if self.radial.editor_preview_expanded && p == 0.0 {
                    self.progress = Tween::settled(1.0);
                    self.expanded = true;
                } else if !self.radial.editor_preview_expanded
                    && p == 1.0
                    && self.active_pointer.is_none()
                {
                    self.progress = Tween::settled(0.0);
                    self.expanded = false;
                }
            }
            _ => reject_bind("radial menu", &data),
        }
    }

    fn frame(&self) -> ResolvedBounds {
        self.frame
    }

    fn set_frame(&mut self, frame: ResolvedBounds) {
        self.frame = frame;
    }

    fn is_touch_in_bounds(&self, x: f32, y: f32) -> bool {
        if self.frame.is_empty() {
            return false;
        }
        let (lx, ly) = self.frame.to_local(x, y);
        let radius = if self.expanded {
            self.expanded_radius()
        } else {
            self.base_radius()
        };
        self.distance_from_center(lx, ly) <= radius
    }

    fn try_acquire_touch(&mut self, pointer: PointerId, x: f32, y: f32) -> bool {
        if self.active_pointer.is_some() || self.frame.is_empty() {
            return false;
        }
        let d = self.distance_from_center(x, y);
        if !self.expanded && d <= self.base_radius() {
            self.active_pointer = Some(pointer);
            self.touch = Some((x, y));
            self.animate(true);
            true
        } else if self.expanded && d <= self.expanded_radius() {
            self.active_pointer = Some(pointer);
            self.touch = Some((x, y));
            self.selected = self.sector_at(x, y);
            true
        } else {
            false
        }
    }

    fn handle_touch_move(&mut self, pointer: PointerId, x: f32, y: f32) {
        if self.active_pointer != Some(pointer) {
            return;
        }
        self.touch = Some((x, y));
        let sector = self.sector_at(x, y);
        if sector != self.selected {
            self.selected = sector;
            if sector.is_some() {
                self.ctx.haptics.vibrate(SELECT_HAPTIC_MS);
            }
        }
    }

    fn release_touch(&mut self, pointer: PointerId) {
        if self.active_pointer != Some(pointer) {
            return;
        }
        self.active_pointer = None;
        self.touch = None;
        let chosen = self
            .selected
            .take()
            .and_then(|i| self.radial.sectors.get(i))
            .map(|s| s.keycode)
            .filter(|k| !k.is_unknown());
        if let Some(keycode) = chosen {
            log::debug!("radial menu {} fires {keycode:?}", self.common.id);
            self.fire(keycode);
        }
        self.animate(false);
    }

    fn cancel_all_touches(&mut self) {
        if self.active_pointer.take().is_none() {
            return;
        }
        self.touch = None;
        self.selected = None;
        self.animate(false);
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
}
