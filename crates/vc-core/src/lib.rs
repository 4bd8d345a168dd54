pub mod id;
pub mod keycode;
pub mod layout;
pub mod lint;
pub mod model;

pub use id::ControlId;
pub use keycode::{KeyClass, KeyCode, KeyType, WheelDirection};
pub use layout::{ResolvedBounds, Viewport, resolve_frame};
pub use lint::{LintDiagnostic, LintSeverity, lint_controls};
pub use model::*;
