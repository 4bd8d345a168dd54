//! Eight-way D-pad on a 3×3 grid.
//!
//! ```text
//!   ┌────┬────┬────┐
//!   │ ↖  │ ↑  │ ↗  │   corner cells press two directions at once
//!   ├────┼────┼────┤
//!   │ ←  │    │ →  │   the centre cell presses nothing
//!   ├────┼────┼────┤
//!   │ ↙  │ ↓  │ ↘  │
//!   └────┴────┴────┘
//! ```
//!
//! While a finger slides the widget diffs the active set against what it
//! holds, so each direction sees exactly one down and one up.

use crate::bridge::dispatch_by_type;
use crate::context::ControlContext;
use crate::input::PointerId;
use crate::touch::{ControlView, reject_bind, with_rotation};
use smallvec::SmallVec;
use vc_core::{ControlCommon, ControlData, ControlKind, DPadData, KeyCode, ResolvedBounds};
use vc_render::kurbo::{BezPath, Rect, RoundedRect, RoundedRectRadii, Shape};
use vc_render::paint::scaled_alpha;
use vc_render::{Brush, Canvas, HitShape, point_in_shape};

const ACQUIRE_HAPTIC_MS: u32 = 50;
const DIRECTION_HAPTIC_MS: u32 = 30;
/// Pressed cells never fade below this alpha.
const MIN_ACTIVE_ALPHA: u8 = 100;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Direction {
    Up = 0,
    Right = 1,
    Down = 2,
    Left = 3,
}

impl Direction {
    pub const ALL: [Direction; 4] = [
        Direction::Up,
        Direction::Right,
        Direction::Down,
        Direction::Left,
    ];

    fn index(self) -> usize {
        self as usize
    }
}

/// Directions pressed by each cell, row-major.
const CELLS: [[&[Direction]; 3]; 3] = [
    [
        &[Direction::Up, Direction::Left],
        &[Direction::Up],
        &[Direction::Up, Direction::Right],
    ],
    [&[Direction::Left], &[], &[Direction::Right]],
    [
        &[Direction::Down, Direction::Left],
        &[Direction::Down],
        &[Direction::Down, Direction::Right],
    ],
];

fn cell_index(v: f32, extent: f32) -> usize {
    ((v / (extent / 3.0)) as i32).clamp(0, 2) as usize
}

/// Directions selected by local point (`x`, `y`) on a `width × height` pad.
/// Points outside the pad clamp to the nearest edge cell.
pub fn directions_at(x: f32, y: f32, width: f32, height: f32) -> SmallVec<[Direction; 2]> {
    if width <= 0.0 || height <= 0.0 {
        return SmallVec::new();
    }
    let row = cell_index(y, height);
    let col = cell_index(x, width);
    CELLS[row][col].iter().copied().collect()
}

pub struct DPadView {
    common: ControlCommon,
    dpad: DPadData,
    ctx: ControlContext,
    frame: ResolvedBounds,
    active_pointer: Option<PointerId>,
    /// Indexed by `Direction as usize`.
    pressed: [bool; 4],
}

impl DPadView {
    pub fn new(common: ControlCommon, dpad: DPadData, ctx: ControlContext) -> Self {
        Self {
            common,
            dpad,
            ctx,
            frame: ResolvedBounds::default(),
            active_pointer: None,
            pressed: [false; 4],
        }
    }

    pub fn is_pressed(&self, dir: Direction) -> bool {
        self.pressed[dir.index()]
    }

    /// Currently held directions in `Direction::ALL` order.
    pub fn pressed_directions(&self) -> SmallVec<[Direction; 2]> {
        Direction::ALL
            .into_iter()
            .filter(|d| self.pressed[d.index()])
            .collect()
    }

    fn keycode(&self, dir: Direction) -> KeyCode {
        match dir {
            Direction::Up => self.dpad.up_keycode,
            Direction::Right => self.dpad.right_keycode,
            Direction::Down => self.dpad.down_keycode,
            Direction::Left => self.dpad.left_keycode,
        }
    }

    fn send(&self, dir: Direction, is_down: bool) {
        let key = self.keycode(dir);
        if key.is_unknown() {
            log::debug!("dpad {} has no key for {dir:?}", self.common.id);
            return;
        }
        dispatch_by_type(self.ctx.bridge.as_ref(), key, is_down, self.frame.center());
    }

    fn update_directions(&mut self, x: f32, y: f32) {
        let active = directions_at(x, y, self.frame.width, self.frame.height);
        // Releases go out before presses so a slide never holds opposites.
        for dir in Direction::ALL {
            if self.pressed[dir.index()] && !active.contains(&dir) {
                self.pressed[dir.index()] = false;
                self.send(dir, false);
            }
        }
        for dir in active {
            if !self.pressed[dir.index()] {
                self.pressed[dir.index()] = true;
                self.send(dir, true);
                self.ctx.haptics.vibrate(DIRECTION_HAPTIC_MS);
            }
        }
    }

    fn release_all(&mut self) {
        for dir in Direction::ALL {
            if self.pressed[dir.index()] {
                self.pressed[dir.index()] = false;
                self.send(dir, false);
            }
        }
    }

    fn hit_local(&self, x: f32, y: f32) -> bool {
        point_in_shape(
            x,
            y,
            &HitShape::RoundedRect { radius: 0.0 },
            self.frame.width,
            self.frame.height,
        )
    }

    // ─── Painting ────────────────────────────────────────────────────────

    fn cell_pressed(&self, dirs: &[Direction]) -> bool {
        !dirs.is_empty() && dirs.iter().all(|d| self.pressed[d.index()])
    }

    fn paint(&self, canvas: &mut dyn Canvas) {
        let (w, h) = (self.frame.width as f64, self.frame.height as f64);
        let (cw, ch) = (w / 3.0, h / 3.0);
        let radius = self.ctx.dp(self.common.corner_radius) as f64;
        let idle = self
            .common
            .bg_color
            .with_alpha(scaled_alpha(self.common.opacity, 1.0));
        let active = self
            .dpad
            .active_color
            .with_alpha(scaled_alpha(self.common.opacity, 1.0).max(MIN_ACTIVE_ALPHA));

        for (row, cells) in CELLS.iter().enumerate() {
            for (col, dirs) in cells.iter().enumerate() {
                let rect = Rect::new(
                    col as f64 * cw,
                    row as f64 * ch,
                    (col + 1) as f64 * cw,
                    (row + 1) as f64 * ch,
                );
                // Only the pad's four outer corners are rounded.
                let r = |r0, c0| {
                    if row == r0 && col == c0 {
                        radius
                    } else {
                        0.0
                    }
                };
                let radii = RoundedRectRadii::new(r(0, 0), r(0, 2), r(2, 2), r(2, 0));
                let path = RoundedRect::from_rect(rect, radii).to_path(0.1);
                let color = if self.cell_pressed(dirs) { active } else { idle };
                canvas.fill(&path, &Brush::Solid(color));
            }
        }

        if self.common.stroke_width <= 0.0 {
            return;
        }
        let width = self.ctx.dp(self.common.stroke_width) as f64;
        let color = self
            .common
            .stroke_color
            .with_alpha(scaled_alpha(self.common.border_opacity, 1.0));

        let mut grid = BezPath::new();
        for i in 1..3 {
            let x = cw * i as f64;
            let y = ch * i as f64;
            grid.move_to((x, 0.0));
            grid.line_to((x, h));
            grid.move_to((0.0, y));
            grid.line_to((w, y));
        }
        canvas.stroke(&grid, width, color);

        let border = Rect::new(0.0, 0.0, w, h)
            .inset(-width / 2.0)
            .to_rounded_rect(radius)
            .to_path(0.1);
        canvas.stroke(&border, width, color);
    }
}

impl ControlView for DPadView {
    fn common(&self) -> &ControlCommon {
        &self.common
    }

    fn control_data(&self) -> ControlData {
        ControlData::new(self.common.clone(), ControlKind::DPad(self.dpad.clone()))
    }

    fn bind(&mut self, data: ControlData) {
        match data.kind {
            ControlKind::DPad(dpad) => {
                // Keys may change under a held finger; let go of the old ones.
                if dpad != self.dpad {
                    self.release_all();
                }
                self.common = data.common;
                self.dpad = dpad;
            }
            _ => reject_bind("dpad", &data),
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
        self.ctx.haptics.vibrate(ACQUIRE_HAPTIC_MS);
        self.update_directions(x, y);
        true
    }

    fn handle_touch_move(&mut self, pointer: PointerId, x: f32, y: f32) {
        if self.active_pointer == Some(pointer) {
            self.update_directions(x, y);
        }
    }

    fn release_touch(&mut self, pointer: PointerId) {
        if self.active_pointer != Some(pointer) {
            return;
        }
        self.active_pointer = None;
        self.release_all();
    }

    fn cancel_all_touches(&mut self) {
        self.active_pointer = None;
        self.release_all();
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

#[cfg(test)]
mod tests {
    use super::*;
    use crate::bridge::{InputRecord, RecordingBridge};
    use crate::context::ManualScheduler;
    use pretty_assertions::assert_eq;
    use std::rc::Rc;
    use vc_render::DisplayList;

    fn pad() -> (DPadView, Rc<RecordingBridge>) {
        let bridge = Rc::new(RecordingBridge::new());
        let ctx = ControlContext::new(bridge.clone(), Rc::new(ManualScheduler::new()));
        let mut view = DPadView::new(ControlCommon::default(), DPadData::default(), ctx);
        view.set_frame(ResolvedBounds::new(0.0, 0.0, 90.0, 90.0));
        (view, bridge)
    }

    fn key(keycode: KeyCode, down: bool) -> InputRecord {
        InputRecord::Key { keycode, down }
    }

    #[test]
    fn grid_mapping() {
        use Direction::*;
        let at = |x, y| directions_at(x, y, 90.0, 90.0).into_vec();
        assert_eq!(at(10.0, 10.0), vec![Up, Left]);
        assert_eq!(at(45.0, 10.0), vec![Up]);
        assert!(at(45.0, 45.0).is_empty());
        assert_eq!(at(80.0, 80.0), vec![Down, Right]);
        // Outside the pad clamps to the edge cells.
        assert_eq!(at(-5.0, 200.0), vec![Down, Left]);
        assert!(directions_at(1.0, 1.0, 0.0, 90.0).is_empty());
    }

    #[test]
    fn slide_releases_before_pressing() {
        let (mut p, bridge) = pad();
        assert!(p.try_acquire_touch(4, 45.0, 10.0));
        p.handle_touch_move(4, 80.0, 45.0);
        p.release_touch(4);
        assert_eq!(
            bridge.take(),
            vec![
                key(KeyCode::KEYBOARD_W, true),
                key(KeyCode::KEYBOARD_W, false),
                key(KeyCode::KEYBOARD_D, true),
                key(KeyCode::KEYBOARD_D, false),
            ]
        );
    }

    #[test]
    fn corner_keeps_shared_direction() {
        let (mut p, bridge) = pad();
        p.try_acquire_touch(1, 45.0, 10.0);
        p.handle_touch_move(1, 80.0, 10.0);
        assert_eq!(p.pressed_directions().into_vec(), vec![Direction::Up, Direction::Right]);
        assert_eq!(bridge.take().len(), 2);
        // Moves from other pointers are ignored.
        p.handle_touch_move(2, 45.0, 45.0);
        assert!(bridge.is_empty());
    }

    #[test]
    fn centre_press_sends_nothing() {
        let (mut p, bridge) = pad();
        assert!(p.try_acquire_touch(1, 45.0, 45.0));
        p.release_touch(1);
        assert!(bridge.is_empty());
    }

    #[test]
    fn cancel_releases_everything_once() {
        let (mut p, bridge) = pad();
        p.try_acquire_touch(1, 85.0, 85.0);
        p.cancel_all_touches();
        p.cancel_all_touches();
        let downs = bridge.records().iter().filter(|r| r.key_edge().is_some_and(|(_, d)| d)).count();
        assert_eq!(downs, 2);
        assert_eq!(bridge.len(), 4);
        assert_eq!(p.active_pointer(), None);
    }

    #[test]
    fn unknown_key_is_skipped() {
        let (mut p, bridge) = pad();
        p.dpad.left_keycode = KeyCode::UNKNOWN;
        p.try_acquire_touch(1, 10.0, 10.0);
        p.release_touch(1);
        assert_eq!(
            bridge.take(),
            vec![key(KeyCode::KEYBOARD_W, true), key(KeyCode::KEYBOARD_W, false)]
        );
    }

    #[test]
    fn pressed_cells_use_active_color() {
        let (mut p, _) = pad();
        p.try_acquire_touch(1, 80.0, 10.0);
        let mut list = DisplayList::new();
        p.render(&mut list);
        let active = list
            .fills()
            .filter(|b| b.dominant_color().0 & 0x00FF_FFFF == 0x00FF_FFFF)
            .count();
        // Up, Right and the Up-Right corner.
        assert_eq!(active, 3);
        assert_eq!(list.fills().count(), 9);
        assert_eq!(list.strokes().count(), 2);
    }
}
