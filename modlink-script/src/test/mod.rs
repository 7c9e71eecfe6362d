//! In-process [`ScriptRuntime`] implementations.
//!
//! Kept as a regular module so the engine crate and tools can drive the bridge
//! without embedding a real interpreter.

use std::collections::BTreeMap;

use modlink_core::ModId;

use crate::call::CallOutcome;
use crate::runtime::{RegistryRef, RuntimeError, ScriptHost, ScriptRuntime};
use crate::variant::{FunctionRef, Variant};

/// A runtime that accepts everything and does nothing.
pub struct NullRuntime;

impl ScriptRuntime for NullRuntime {
    fn retain(&mut self, _function: FunctionRef) -> Result<RegistryRef, RuntimeError> {
        Ok(RegistryRef(1))
    }

    fn release(&mut self, _reference: RegistryRef) {}

    fn call(
        &mut self,
        _reference: RegistryRef,
        _args: Vec<Variant>,
        _owner: Option<ModId>,
        _host: &mut dyn ScriptHost,
    ) -> Result<Vec<Variant>, RuntimeError> {
        Ok(Vec::new())
    }
}

/// A host with nothing bound.
pub struct NullHost;

impl ScriptHost for NullHost {
    fn call_bound(
        &mut self,
        name: &str,
        _args: Vec<Variant>,
        _runtime: &mut dyn ScriptRuntime,
        _owner: Option<ModId>,
    ) -> CallOutcome {
        CallOutcome {
            count: 0,
            results: Vec::new(),
            diagnostics: vec![format!("{}: no such function", name)],
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct RecordedCall {
    pub reference: RegistryRef,
    pub function: FunctionRef,
    pub args: Vec<Variant>,
    pub owner: Option<ModId>,
}

/// A bound function a callable calls every time it runs.
#[derive(Debug, Clone)]
struct Reentry {
    function: FunctionRef,
    name: String,
    args: Vec<Variant>,
}

/// A runtime that records every retain, release and call, and can be told to
/// fail or to call bound functions from inside a callable.
#[derive(Debug, Default)]
pub struct RecordingRuntime {
    next_ref: i32,
    retained: BTreeMap<i32, FunctionRef>,
    released: Vec<RegistryRef>,
    calls: Vec<RecordedCall>,
    reentries: Vec<Reentry>,
    host_replies: Vec<CallOutcome>,
    fail_at: Option<usize>,
    fail_retain: bool,
}

impl RecordingRuntime {
    pub fn new() -> Self {
        Self::default()
    }

    /// Fail the call with this 0-based index.
    pub fn failing_at(index: usize) -> Self {
        Self {
            fail_at: Some(index),
            ..Default::default()
        }
    }

    /// Refuse every retain.
    pub fn refusing_retain() -> Self {
        Self {
            fail_retain: true,
            ..Default::default()
        }
    }

    /// Make `function` call the bound function `name` with `args` each time it runs.
    pub fn reenter(mut self, function: FunctionRef, name: &str, args: Vec<Variant>) -> Self {
        self.reentries.push(Reentry {
            function,
            name: name.to_string(),
            args,
        });
        self
    }

    pub fn calls(&self) -> &[RecordedCall] {
        &self.calls
    }

    pub fn released(&self) -> &[RegistryRef] {
        &self.released
    }

    /// Outcomes of the bound functions called from inside callables, in order.
    pub fn host_replies(&self) -> &[CallOutcome] {
        &self.host_replies
    }

    pub fn live_refs(&self) -> usize {
        self.retained.len()
    }

    pub fn is_retained(&self, reference: RegistryRef) -> bool {
        self.retained.contains_key(&reference.0)
    }

    /// Calls that reached `function`.
    pub fn calls_to(&self, function: FunctionRef) -> impl Iterator<Item = &RecordedCall> {
        self.calls.iter().filter(move |c| c.function == function)
    }
}

impl ScriptRuntime for RecordingRuntime {
    fn retain(&mut self, function: FunctionRef) -> Result<RegistryRef, RuntimeError> {
        if self.fail_retain {
            return Err(RuntimeError::NotCallable);
        }
        self.next_ref += 1;
        self.retained.insert(self.next_ref, function);
        Ok(RegistryRef(self.next_ref))
    }

    fn release(&mut self, reference: RegistryRef) {
        if self.retained.remove(&reference.0).is_some() {
            self.released.push(reference);
        }
    }

    fn call(
        &mut self,
        reference: RegistryRef,
        args: Vec<Variant>,
        owner: Option<ModId>,
        host: &mut dyn ScriptHost,
    ) -> Result<Vec<Variant>, RuntimeError> {
        let function = *self
            .retained
            .get(&reference.0)
            .ok_or(RuntimeError::InvalidReference(reference.0))?;
        let index = self.calls.len();
        self.calls.push(RecordedCall {
            reference,
            function,
            args,
            owner,
        });
        if self.fail_at == Some(index) {
            return Err(RuntimeError::CallFailed(format!("call {} failed", index)));
        }

        let reentries: Vec<Reentry> = self
            .reentries
            .iter()
            .filter(|r| r.function == function)
            .cloned()
            .collect();
        for r in reentries {
            let reply = host.call_bound(&r.name, r.args, self, owner);
            self.host_replies.push(reply);
        }
        Ok(Vec::new())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn release_invalidates_reference() {
        let mut rt = RecordingRuntime::new();
        let r = rt.retain(FunctionRef(5)).unwrap();
        assert!(rt.call(r, vec![Variant::Nil], Some(ModId(1)), &mut NullHost).is_ok());
        rt.release(r);
        assert_eq!(
            rt.call(r, vec![], None, &mut NullHost),
            Err(RuntimeError::InvalidReference(r.0))
        );
        assert_eq!(rt.released(), &[r]);
        assert_eq!(rt.calls_to(FunctionRef(5)).count(), 1);
        assert_eq!(rt.calls()[0].owner, Some(ModId(1)));
    }

    #[test]
    fn scheduled_failure() {
        let mut rt = RecordingRuntime::failing_at(1);
        let r = rt.retain(FunctionRef(0)).unwrap();
        assert!(rt.call(r, vec![], None, &mut NullHost).is_ok());
        assert!(rt.call(r, vec![], None, &mut NullHost).is_err());
        assert_eq!(rt.calls().len(), 2);
    }

    #[test]
    fn reentry_goes_through_the_host() {
        let mut rt = RecordingRuntime::new().reenter(FunctionRef(2), "sins", vec![Variant::Int(0)]);
        let quiet = rt.retain(FunctionRef(1)).unwrap();
        let loud = rt.retain(FunctionRef(2)).unwrap();
        rt.call(quiet, vec![], None, &mut NullHost).unwrap();
        rt.call(loud, vec![], None, &mut NullHost).unwrap();
        assert_eq!(rt.host_replies().len(), 1);
        assert_eq!(
            rt.host_replies()[0].diagnostics,
            vec!["sins: no such function".to_string()]
        );
    }
}
