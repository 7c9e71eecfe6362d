use std::fmt;

use modlink_core::ModId;

use crate::marshal::ConvertError;
use crate::runtime::ScriptRuntime;
use crate::variant::Variant;

static NIL: Variant = Variant::Nil;

/// What a single bound call produced.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct CallOutcome {
    /// Result count reported back to the runtime; 0 means the call failed.
    pub count: usize,
    pub results: Vec<Variant>,
    pub diagnostics: Vec<String>,
}

impl CallOutcome {
    pub fn failed(&self) -> bool {
        self.count == 0
    }
}

/// Everything one invocation of an entry point sees: its arguments, the
/// results it pushes, the diagnostics it emits and the runtime it was called from.
pub struct CallContext<'a> {
    name: &'a str,
    args: Vec<Variant>,
    results: Vec<Variant>,
    diagnostics: Vec<String>,
    runtime: &'a mut dyn ScriptRuntime,
    active_mod: Option<ModId>,
}

impl<'a> CallContext<'a> {
    pub fn new(
        name: &'a str,
        args: Vec<Variant>,
        runtime: &'a mut dyn ScriptRuntime,
        active_mod: Option<ModId>,
    ) -> Self {
        Self {
            name,
            args,
            results: Vec::new(),
            diagnostics: Vec::new(),
            runtime,
            active_mod,
        }
    }

    pub fn name(&self) -> &str {
        self.name
    }

    pub fn arg_count(&self) -> usize {
        self.args.len()
    }

    /// Argument `index`, 1-based. Missing arguments read as nil.
    pub fn arg(&self, index: usize) -> &Variant {
        index
            .checked_sub(1)
            .and_then(|i| self.args.get(i))
            .unwrap_or(&NIL)
    }

    pub fn push(&mut self, value: impl Into<Variant>) {
        self.results.push(value.into());
    }

    pub fn results(&self) -> &[Variant] {
        &self.results
    }

    pub fn diagnostics(&self) -> &[String] {
        &self.diagnostics
    }

    pub fn into_outcome(self, count: usize) -> CallOutcome {
        CallOutcome {
            count,
            results: self.results,
            diagnostics: self.diagnostics,
        }
    }

    pub fn into_parts(self) -> (Vec<Variant>, Vec<String>) {
        (self.results, self.diagnostics)
    }

    pub fn runtime(&mut self) -> &mut dyn ScriptRuntime {
        &mut *self.runtime
    }

    pub fn active_mod(&self) -> Option<ModId> {
        self.active_mod
    }

    pub fn valid_param_count(&mut self, expected: usize) -> bool {
        let received = self.args.len();
        if received == expected {
            return true;
        }
        self.error(format_args!(
            "improper param count: expected {}, received {}",
            expected, received
        ));
        false
    }

    pub fn valid_param_range(&mut self, min: usize, max: usize) -> bool {
        let received = self.args.len();
        if (min..=max).contains(&received) {
            return true;
        }
        self.error(format_args!(
            "improper param count: expected ({} - {}), received {}",
            min, max, received
        ));
        false
    }

    /// Report a failure of this call.
    pub fn error(&mut self, msg: impl fmt::Display) {
        let line = format!("{}: {}", self.name, msg);
        log::error!("{}", line);
        self.diagnostics.push(line);
    }

    /// Report something skipped that did not fail the call.
    pub fn warn(&mut self, msg: impl fmt::Display) {
        let line = format!("{}: {}", self.name, msg);
        log::warn!("{}", line);
        self.diagnostics.push(line);
    }

    /// Report a failed argument conversion. Returns the zero result count.
    pub fn conversion_failed(&mut self, index: usize, err: &ConvertError) -> usize {
        self.error(format_args!("failed to convert parameter {}: {}", index, err));
        0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test::NullRuntime;
    use pretty_assertions::assert_eq;

    #[test]
    fn missing_args_read_as_nil() {
        let mut rt = NullRuntime;
        let ctx = CallContext::new("f", vec![Variant::Int(1)], &mut rt, None);
        assert_eq!(ctx.arg(1), &Variant::Int(1));
        assert_eq!(ctx.arg(2), &Variant::Nil);
        assert_eq!(ctx.arg(0), &Variant::Nil);
    }

    #[test]
    fn param_count_diagnostics() {
        let mut rt = NullRuntime;
        let mut ctx = CallContext::new("sins", vec![], &mut rt, None);
        assert!(!ctx.valid_param_count(1));
        assert!(ctx.valid_param_range(0, 2));
        assert!(!ctx.valid_param_range(1, 2));
        assert_eq!(
            ctx.diagnostics(),
            &[
                "sins: improper param count: expected 1, received 0".to_string(),
                "sins: improper param count: expected (1 - 2), received 0".to_string(),
            ]
        );
    }
}
