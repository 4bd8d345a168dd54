//! Time-sampled animation values.
//!
//! There is no animation thread: a `Tween` is a pure function of the clock
//! and is sampled whenever a widget needs the current value.

use std::fmt;
use std::rc::Rc;

/// Maps linear progress `t ∈ [0, 1]` to eased progress. Must return exactly
/// 0 at 0 and 1 at 1; values in between may overshoot.
pub trait Easing {
    fn ease(&self, t: f32) -> f32;
}

#[derive(Debug, Clone, Copy, Default)]
pub struct Linear;

impl Easing for Linear {
    fn ease(&self, t: f32) -> f32 {
        t
    }
}

/// Runs past the target and settles back. Larger `tension` overshoots more.
#[derive(Debug, Clone, Copy)]
pub struct Overshoot {
    pub tension: f32,
}

impl Overshoot {
    pub const fn new(tension: f32) -> Self {
        Self { tension }
    }
}

impl Default for Overshoot {
    fn default() -> Self {
        Self::new(0.8)
    }
}

impl Easing for Overshoot {
    fn ease(&self, t: f32) -> f32 {
        let u = t - 1.0;
        u * u * ((self.tension + 1.0) * u + self.tension) + 1.0
    }
}

/// Starts fast, slows into the target.
#[derive(Debug, Clone, Copy, Default)]
pub struct Decelerate;

impl Easing for Decelerate {
    fn ease(&self, t: f32) -> f32 {
        1.0 - (1.0 - t) * (1.0 - t)
    }
}

/// Interpolation from `from` to `to` starting at `start_ms`.
#[derive(Clone)]
pub struct Tween {
    from: f32,
    to: f32,
    start_ms: u64,
    duration_ms: u64,
    easing: Rc<dyn Easing>,
}

impl fmt::Debug for Tween {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Tween")
            .field("from", &self.from)
            .field("to", &self.to)
            .field("start_ms", &self.start_ms)
            .field("duration_ms", &self.duration_ms)
            .finish()
    }
}

impl Tween {
    pub fn new(from: f32, to: f32, start_ms: u64, duration_ms: u64, easing: Rc<dyn Easing>) -> Self {
        Self {
            from,
            to,
            start_ms,
            duration_ms,
            easing,
        }
    }

    /// Already at rest on `value`.
    pub fn settled(value: f32) -> Self {
        Self::new(value, value, 0, 0, Rc::new(Linear))
    }

    pub fn target(&self) -> f32 {
        self.to
    }

    pub fn is_finished(&self, now_ms: u64) -> bool {
        now_ms >= self.start_ms.saturating_add(self.duration_ms)
    }

    /// Value at `now_ms`. Exactly `to` once finished.
    pub fn value_at(&self, now_ms: u64) -> f32 {
        if self.is_finished(now_ms) {
            return self.to;
        }
        if now_ms <= self.start_ms {
            return self.from;
        }
        let elapsed = now_ms.saturating_sub(self.start_ms) as f32;
        let t = (elapsed / self.duration_ms as f32).clamp(0.0, 1.0);
        self.from + (self.to - self.from) * self.easing.ease(t)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn easings_hit_endpoints() {
        let curves: [&dyn Easing; 3] = [&Linear, &Overshoot::default(), &Decelerate];
        for c in curves {
            assert!(c.ease(0.0).abs() < 1e-6);
            assert!((c.ease(1.0) - 1.0).abs() < 1e-6);
        }
    }

    #[test]
    fn overshoot_passes_target() {
        let peak = (1..100)
            .map(|i| Overshoot::default().ease(i as f32 / 100.0))
            .fold(0.0f32, f32::max);
        assert!(peak > 1.0);
    }

    #[test]
    fn tween_ends_exactly() {
        let t = Tween::new(0.0, 1.0, 100, 150, Rc::new(Overshoot::default()));
        assert_eq!(t.value_at(50), 0.0);
        assert_eq!(t.value_at(250), 1.0);
        assert_eq!(t.value_at(10_000), 1.0);
        assert!(!t.is_finished(249));

        let back = Tween::new(0.7, 0.0, 0, 150, Rc::new(Decelerate));
        assert!(back.value_at(75) < 0.7);
        assert_eq!(back.value_at(150), 0.0);
        assert_eq!(Tween::settled(1.0).value_at(0), 1.0);
    }
}
