//! Control identifiers.
//!
//! Launcher layouts store each control under a UUID string. The router
//! looks controls up by id on every pointer event, so ids are interned into
//! a process-wide `lasso` rodeo and compared as 4-byte keys.
//!
//! The empty string is reserved as the *unassigned* id. `ControlCommon`
//! defaults to it so that building a default value never grows the
//! interner; `ControlData::new` and deserialization swap it for a real id.

use lasso::{Spur, ThreadedRodeo};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::sync::LazyLock;
use std::sync::atomic::{AtomicU64, Ordering};

static IDS: LazyLock<ThreadedRodeo> = LazyLock::new(ThreadedRodeo::default);

static UNASSIGNED: LazyLock<ControlId> = LazyLock::new(|| ControlId::intern(""));

#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct ControlId(Spur);

impl ControlId {
    pub fn intern(s: &str) -> Self {
        ControlId(IDS.get_or_intern(s))
    }

    /// Placeholder carried by default-built controls.
    pub fn unassigned() -> Self {
        *UNASSIGNED
    }

    pub fn is_unassigned(self) -> bool {
        self == Self::unassigned()
    }

    /// Mint a new id for a control created at runtime, such as
    /// `button_3`. Each call interns one new string.
    pub fn generate(kind: &str) -> Self {
        static NEXT: AtomicU64 = AtomicU64::new(1);
        let n = NEXT.fetch_add(1, Ordering::Relaxed);
        Self::intern(&format!("{kind}_{n}"))
    }

    /// Id for a layout entry that omits `id`.
    pub(crate) fn generate_for_layout() -> Self {
        Self::generate("control")
    }

    pub fn as_str(&self) -> &str {
        IDS.resolve(&self.0)
    }
}

impl Default for ControlId {
    fn default() -> Self {
        Self::unassigned()
    }
}

impl fmt::Debug for ControlId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_unassigned() {
            f.write_str("#<unassigned>")
        } else {
            write!(f, "#{}", self.as_str())
        }
    }
}

impl fmt::Display for ControlId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl Serialize for ControlId {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for ControlId {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        if s.is_empty() {
            return Ok(Self::generate_for_layout());
        }
        Ok(ControlId::intern(&s))
    }
}
