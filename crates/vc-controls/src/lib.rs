//! Interactive layer of the virtual controller.
//!
//! Widgets implement the [`ControlView`] touch ownership protocol: each one
//! accepts at most one pointer at a time, turns it into key, mouse or
//! gamepad events on the [`ControlInputBridge`], and paints itself through
//! a `vc_render::Canvas`. [`ControlSurface`] routes a multi-touch stream to
//! the widgets in z-order.

pub mod anim;
pub mod bridge;
pub mod button;
pub mod context;
pub mod dpad;
pub mod input;
pub mod radial;
pub mod surface;
pub mod text;
pub mod touch;

pub use anim::{Decelerate, Easing, Linear, Overshoot, Tween};
pub use bridge::{ControlInputBridge, InputRecord, RecordingBridge, dispatch_by_type};
pub use button::ButtonView;
pub use context::{
    ControlContext, FrameScheduler, HapticFeedback, InputModeState, ManualScheduler, NoHaptics,
    Scheduler,
};
pub use dpad::{DPadView, Direction};
pub use input::{PointerId, PointerPos, TouchEvent};
pub use radial::{RadialMenuView, RadialPhase};
pub use surface::{ControlSurface, TouchOutcome};
pub use text::TextView;
pub use touch::ControlView;
