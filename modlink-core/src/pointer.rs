use std::fmt;

use serde::{Deserialize, Serialize};

/// Pointee type of an opaque native pointer handed to scripts.
///
/// Scripts can hold and pass these around but never dereference them; a
/// conversion back to native code checks the kind before the pointer is used.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PointerKind {
    /// Raw texture pixel data.
    U8,
    /// A behavior script.
    Behavior,
}

impl PointerKind {
    pub fn name(&self) -> &'static str {
        match self {
            PointerKind::U8 => "u8*",
            PointerKind::Behavior => "BehaviorScript*",
        }
    }
}

/// An address in one of the engine's arenas, tagged with what it points to.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct NativePtr {
    pub kind: PointerKind,
    pub addr: u64,
}

impl NativePtr {
    pub fn new(kind: PointerKind, addr: u64) -> Self {
        Self { kind, addr }
    }

    pub fn null(kind: PointerKind) -> Self {
        Self { kind, addr: 0 }
    }

    pub fn is_null(&self) -> bool {
        self.addr == 0
    }
}

impl fmt::Display for NativePtr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({})0x{:08X}", self.kind.name(), self.addr)
    }
}
