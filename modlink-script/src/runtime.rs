use modlink_core::ModId;
use thiserror::Error;

use crate::call::CallOutcome;
use crate::variant::{FunctionRef, Variant};

/// A strong reference held in the runtime's registry. It keeps the value
/// alive until released.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct RegistryRef(pub i32);

#[derive(Debug, Error, Clone, PartialEq)]
pub enum RuntimeError {
    #[error("value is not callable")]
    NotCallable,
    #[error("invalid registry reference {0}")]
    InvalidReference(i32),
    #[error("call failed: {0}")]
    CallFailed(String),
}

/// What the bridge needs from the embedded scripting runtime.
pub trait ScriptRuntime {
    /// Take a strong reference to a callable so it outlives the current call.
    fn retain(&mut self, function: FunctionRef) -> Result<RegistryRef, RuntimeError>;

    /// Drop a reference taken with [`ScriptRuntime::retain`].
    fn release(&mut self, reference: RegistryRef);

    /// Invoke a retained callable on behalf of `owner`. Bound functions the
    /// callable calls in turn go through `host`.
    fn call(
        &mut self,
        reference: RegistryRef,
        args: Vec<Variant>,
        owner: Option<ModId>,
        host: &mut dyn ScriptHost,
    ) -> Result<Vec<Variant>, RuntimeError>;
}

/// Entry back into the bound functions while a script callback runs.
pub trait ScriptHost {
    /// Call the function bound under `name`. The runtime passes itself so the
    /// entry point can reach it like any other call.
    fn call_bound(
        &mut self,
        name: &str,
        args: Vec<Variant>,
        runtime: &mut dyn ScriptRuntime,
        owner: Option<ModId>,
    ) -> CallOutcome;
}
