//! Touch input abstraction.
//!
//! Normalizes the host's multi-touch stream into a `TouchEvent` enum
//! consumed by `ControlSurface`. Coordinates are screen pixels.

use smallvec::SmallVec;

/// Host-assigned identifier of one finger, stable for the gesture.
pub type PointerId = u32;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PointerPos {
    pub id: PointerId,
    pub x: f32,
    pub y: f32,
}

#[derive(Debug, Clone, PartialEq)]
pub enum TouchEvent {
    /// A finger touched down (first or additional pointer).
    Down { pointer: PointerId, x: f32, y: f32 },
    /// One or more fingers moved. Carries every live pointer.
    Move { pointers: SmallVec<[PointerPos; 4]> },
    /// A finger lifted.
    Up { pointer: PointerId },
    /// The host took the gesture away; every pointer is gone.
    Cancel,
}

impl TouchEvent {
    pub fn down(pointer: PointerId, x: f32, y: f32) -> Self {
        Self::Down { pointer, x, y }
    }

    /// Move of a single pointer.
    pub fn move_to(pointer: PointerId, x: f32, y: f32) -> Self {
        let mut pointers = SmallVec::new();
        pointers.push(PointerPos { id: pointer, x, y });
        Self::Move { pointers }
    }

    pub fn up(pointer: PointerId) -> Self {
        Self::Up { pointer }
    }
}
