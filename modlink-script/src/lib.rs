//! modlink-script
//!
//! The script-facing half of the bridge: the closed [`Variant`] value type,
//! conversions between variants and native types, the per-call context entry
//! points work against, and the table that maps exported names to entry points.
//!
//! The scripting runtime itself lives elsewhere and is reached through the
//! [`ScriptRuntime`] trait.

#![allow(clippy::uninlined_format_args)]

pub mod call;
pub mod function;
pub mod marshal;
pub mod runtime;
pub mod variant;

/// In-process runtimes for tests and tools.
pub mod test;

pub use call::{CallContext, CallOutcome};
pub use function::{FnEntry, FunctionTable, NativeFunction};
pub use marshal::{Composite, ConvertError, RecordSource};
pub use runtime::{RegistryRef, RuntimeError, ScriptHost, ScriptRuntime};
pub use variant::{FunctionRef, Table, TableKey, Variant};
