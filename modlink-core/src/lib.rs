//! modlink-core
//!
//! The native side of the scripting bridge: fixed-layout object memory, the
//! field reflection tables that name offsets inside it, network sync
//! descriptors, textures, HUD draw commands, and level command streams.
//!
//! Nothing in here knows about script values; `modlink-script` marshals into
//! and out of these types.

#![allow(clippy::uninlined_format_args)]

use serde::{Deserialize, Serialize};

pub mod behavior;
pub mod error;
pub mod field;
pub mod hud;
pub mod level;
pub mod network;
pub mod object;
pub mod pointer;
pub mod sync;
pub mod texture;
pub mod warp;

pub use error::{FieldError, LevelScriptError, SyncError};
pub use field::{FieldDescriptor, FieldRegistry, ValueType, WidthClass};
pub use object::{ObjectCategory, ObjectPool, ObjectRef};
pub use pointer::{NativePtr, PointerKind};
pub use texture::{TextureInfo, TextureRegistry};

/// Identity of a loaded mod. Used to scope custom fields and callback invocations.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct ModId(pub u32);
