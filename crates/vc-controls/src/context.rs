//! Collaborators injected into every widget.
//!
//! Widgets hold no globals. Haptics, the shared touchpad-mode flag, the
//! clock used for animations and delayed key-ups, and the texture source all
//! arrive through a `ControlContext` at construction time.

use crate::bridge::ControlInputBridge;
use std::cell::{Cell, RefCell};
use std::rc::Rc;
use std::time::Instant;
use vc_render::TextureLoader;

// ─── Haptics ─────────────────────────────────────────────────────────────

pub trait HapticFeedback {
    fn vibrate(&self, duration_ms: u32);
}

/// Haptics disabled.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoHaptics;

impl HapticFeedback for NoHaptics {
    fn vibrate(&self, _duration_ms: u32) {}
}

// ─── Shared input mode ───────────────────────────────────────────────────

/// Mode flags shared by every control on a surface.
#[derive(Debug, Default)]
pub struct InputModeState {
    touchpad_secondary: Cell<bool>,
}

impl InputModeState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Touchpad taps act as the secondary (right) mouse button.
    pub fn is_touchpad_secondary(&self) -> bool {
        self.touchpad_secondary.get()
    }

    pub fn set_touchpad_secondary(&self, on: bool) {
        self.touchpad_secondary.set(on);
    }

    /// Flip the flag and return the new value.
    pub fn toggle_touchpad_secondary(&self) -> bool {
        let on = !self.touchpad_secondary.get();
        self.touchpad_secondary.set(on);
        on
    }
}

// ─── Scheduling ──────────────────────────────────────────────────────────

/// Main-thread clock plus deferred single-shot callbacks.
pub trait Scheduler {
    /// Monotonic milliseconds.
    fn now_ms(&self) -> u64;
    /// Run `task` once, no earlier than `delay_ms` from now, on the same
    /// thread as the widgets.
    fn schedule_once(&self, delay_ms: u64, task: Box<dyn FnOnce()>);
}

struct Pending {
    due: u64,
    seq: u64,
    task: Box<dyn FnOnce()>,
}

/// Pending callbacks ordered by due time, then by scheduling order.
#[derive(Default)]
struct TaskQueue {
    seq: Cell<u64>,
    pending: RefCell<Vec<Pending>>,
}

impl TaskQueue {
    fn push(&self, due: u64, task: Box<dyn FnOnce()>) {
        let seq = self.seq.get();
        self.seq.set(seq + 1);
        self.pending.borrow_mut().push(Pending { due, seq, task });
    }

    /// Remove the earliest task due at or before `until`.
    fn pop_due(&self, until: u64) -> Option<Pending> {
        let mut pending = self.pending.borrow_mut();
        let idx = pending
            .iter()
            .enumerate()
            .filter(|(_, p)| p.due <= until)
            .min_by_key(|(_, p)| (p.due, p.seq))
            .map(|(i, _)| i)?;
        Some(pending.remove(idx))
    }

    fn len(&self) -> usize {
        self.pending.borrow().len()
    }
}

/// Virtual clock for tests and replays. Time only moves on `advance`.
#[derive(Default)]
pub struct ManualScheduler {
    now: Cell<u64>,
    queue: TaskQueue,
}

impl ManualScheduler {
    pub fn new() -> Self {
        Self::default()
    }

    /// Move the clock forward by `ms`, running every callback that falls due
    /// in order. Callbacks scheduled while advancing run too if they fall
    /// inside the window.
    pub fn advance(&self, ms: u64) {
        let target = self.now.get() + ms;
        while let Some(p) = self.queue.pop_due(target) {
            self.now.set(p.due.max(self.now.get()));
            (p.task)();
        }
        self.now.set(target);
    }

    pub fn pending(&self) -> usize {
        self.queue.len()
    }
}

impl Scheduler for ManualScheduler {
    fn now_ms(&self) -> u64 {
        self.now.get()
    }

    fn schedule_once(&self, delay_ms: u64, task: Box<dyn FnOnce()>) {
        self.queue.push(self.now.get() + delay_ms, task);
    }
}

/// Wall-clock scheduler for hosts with a frame loop. Call `run_due` once per
/// frame before rendering.
pub struct FrameScheduler {
    start: Instant,
    queue: TaskQueue,
}

impl Default for FrameScheduler {
    fn default() -> Self {
        Self::new()
    }
}

impl FrameScheduler {
    pub fn new() -> Self {
        Self {
            start: Instant::now(),
            queue: TaskQueue::default(),
        }
    }

    /// Run every callback whose time has come. Returns how many ran.
    pub fn run_due(&self) -> usize {
        let now = self.now_ms();
        let mut ran = 0;
        while let Some(p) = self.queue.pop_due(now) {
            (p.task)();
            ran += 1;
        }
        ran
    }
}

impl Scheduler for FrameScheduler {
    fn now_ms(&self) -> u64 {
        self.start.elapsed().as_millis() as u64
    }

    fn schedule_once(&self, delay_ms: u64, task: Box<dyn FnOnce()>) {
        self.queue.push(self.now_ms() + delay_ms, task);
    }
}

// ─── Context ─────────────────────────────────────────────────────────────

/// Everything a widget needs from its host. Cheap to clone.
#[derive(Clone)]
pub struct ControlContext {
    pub bridge: Rc<dyn ControlInputBridge>,
    pub scheduler: Rc<dyn Scheduler>,
    pub haptics: Rc<dyn HapticFeedback>,
    pub input_mode: Rc<InputModeState>,
    pub textures: Option<Rc<dyn TextureLoader>>,
    /// Pixels per dp.
    pub density: f32,
}

impl ControlContext {
    pub fn new(bridge: Rc<dyn ControlInputBridge>, scheduler: Rc<dyn Scheduler>) -> Self {
        Self {
            bridge,
            scheduler,
            haptics: Rc::new(NoHaptics),
            input_mode: Rc::new(InputModeState::new()),
            textures: None,
            density: 1.0,
        }
    }

    pub fn with_haptics(mut self, haptics: Rc<dyn HapticFeedback>) -> Self {
        self.haptics = haptics;
        self
    }

    pub fn with_input_mode(mut self, input_mode: Rc<InputModeState>) -> Self {
        self.input_mode = input_mode;
        self
    }

    pub fn with_textures(mut self, textures: Rc<dyn TextureLoader>) -> Self {
        self.textures = Some(textures);
        self
    }

    pub fn with_density(mut self, density: f32) -> Self {
        self.density = density;
        self
    }

    pub fn dp(&self, dp: f32) -> f32 {
        dp * self.density
    }

    pub fn now_ms(&self) -> u64 {
        self.scheduler.now_ms()
    }
}
