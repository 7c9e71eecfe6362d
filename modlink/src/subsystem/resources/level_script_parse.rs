//! Feeds a level's command stream to a script callback.
//!
//! Only one subscription exists at a time. Subscribing again releases the
//! reference the previous one held; a walk always ends with the reference
//! released, whether it ran to the end or was aborted.
//!
//! A walk runs in two steps so the caller can drop its borrow of the game
//! state in between: [`LevelScriptParse::begin_walk`] detaches the
//! subscription together with its own copy of the level script, and
//! [`PendingWalk::run`] drives the callback with a [`ScriptHost`] through
//! which it may call bound functions. Subscribing while a walk is running
//! fails.

use modlink_core::level::{LevelEvent, LevelScript, LevelScripts};
use modlink_core::{LevelScriptError, ModId};
use modlink_script::{
    FunctionRef, RegistryRef, RuntimeError, ScriptHost, ScriptRuntime, Table, Variant,
};
use thiserror::Error;

use crate::trace;

#[derive(Debug, Error)]
pub enum ParseError {
    #[error("failed to find script: {0}")]
    LevelNotFound(i32),
    #[error("level {level} tried to parse using undefined function: {source}")]
    Retain { level: i32, source: RuntimeError },
    #[error("no level script subscription")]
    NotSubscribed,
    #[error("a level script walk is already in progress")]
    WalkInProgress,
    #[error("failed to call the callback for opcode 0x{opcode:02X}: {source}")]
    Callback { opcode: u8, source: RuntimeError },
    #[error(transparent)]
    Malformed(#[from] LevelScriptError),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ParseState {
    Idle,
    Subscribed,
    Walking,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScriptParseSubscription {
    pub reference: RegistryRef,
    pub owner: Option<ModId>,
    pub level: i32,
}

#[derive(Debug, Default)]
pub struct LevelScriptParse {
    subscription: Option<ScriptParseSubscription>,
    walking: bool,
}

impl LevelScriptParse {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn state(&self) -> ParseState {
        match (&self.subscription, self.walking) {
            (_, true) => ParseState::Walking,
            (Some(_), false) => ParseState::Subscribed,
            (None, false) => ParseState::Idle,
        }
    }

    pub fn subscription(&self) -> Option<&ScriptParseSubscription> {
        self.subscription.as_ref()
    }

    /// Subscribe `callback` to `level`'s command stream.
    ///
    /// Any previous subscription is released first. On failure the state is
    /// Idle, unless a walk is running, which is left untouched.
    pub fn subscribe(
        &mut self,
        levels: &LevelScripts,
        level: i32,
        callback: FunctionRef,
        owner: Option<ModId>,
        runtime: &mut dyn ScriptRuntime,
    ) -> Result<(), ParseError> {
        if self.walking {
            return Err(ParseError::WalkInProgress);
        }
        self.reset(runtime);

        if !levels.contains(level) {
            return Err(ParseError::LevelNotFound(level));
        }
        let reference = runtime
            .retain(callback)
            .map_err(|source| ParseError::Retain { level, source })?;

        self.subscription = Some(ScriptParseSubscription {
            reference,
            owner,
            level,
        });
        Ok(())
    }

    /// Walk the subscribed level in one go. Returns the number of callbacks made.
    pub fn walk(
        &mut self,
        levels: &LevelScripts,
        runtime: &mut dyn ScriptRuntime,
        host: &mut dyn ScriptHost,
    ) -> Result<usize, ParseError> {
        let pending = self.begin_walk(levels, runtime)?;
        let result = pending.run(runtime, host);
        self.end_walk();
        result
    }

    /// Detach the subscription and enter Walking.
    ///
    /// Every successful call must be paired with [`end_walk`](Self::end_walk).
    pub fn begin_walk(
        &mut self,
        levels: &LevelScripts,
        runtime: &mut dyn ScriptRuntime,
    ) -> Result<PendingWalk, ParseError> {
        if self.walking {
            return Err(ParseError::WalkInProgress);
        }
        let sub = self.subscription.take().ok_or(ParseError::NotSubscribed)?;
        let Some(script) = levels.get(sub.level).cloned() else {
            runtime.release(sub.reference);
            return Err(ParseError::LevelNotFound(sub.level));
        };
        self.walking = true;
        Ok(PendingWalk { sub, script })
    }

    pub fn end_walk(&mut self) {
        self.walking = false;
    }

    /// Drop the current subscription, if any.
    pub fn reset(&mut self, runtime: &mut dyn ScriptRuntime) {
        if let Some(old) = self.subscription.take() {
            log::debug!("level script parse: releasing callback {:?}", old.reference);
            runtime.release(old.reference);
        }
    }
}

/// A detached subscription and the script it walks.
#[derive(Debug)]
pub struct PendingWalk {
    sub: ScriptParseSubscription,
    script: LevelScript,
}

impl PendingWalk {
    pub fn level(&self) -> i32 {
        self.sub.level
    }

    /// Call the callback once per recognized command, then release it.
    /// Returns the number of callbacks made.
    pub fn run(
        self,
        runtime: &mut dyn ScriptRuntime,
        host: &mut dyn ScriptHost,
    ) -> Result<usize, ParseError> {
        let result = self.dispatch_all(runtime, host);
        runtime.release(self.sub.reference);
        result
    }

    fn dispatch_all(
        &self,
        runtime: &mut dyn ScriptRuntime,
        host: &mut dyn ScriptHost,
    ) -> Result<usize, ParseError> {
        let sub = &self.sub;
        let mut dispatched = 0;
        for event in self.script.events() {
            let event = event?;
            let opcode = event.opcode();
            trace::level(format_args!("level {}: {:?}", sub.level, event));
            runtime
                .call(sub.reference, callback_args(event), sub.owner, host)
                .map_err(|source| ParseError::Callback { opcode, source })?;
            dispatched += 1;
        }
        Ok(dispatched)
    }
}

/// The four callback slots: area, object-init record, macro behaviors, macro arguments.
fn callback_args(event: LevelEvent) -> Vec<Variant> {
    match event {
        LevelEvent::Area(area) => vec![area.into(), Variant::Nil, Variant::Nil, Variant::Nil],
        LevelEvent::ObjectInit {
            behavior,
            behavior_arg,
        } => {
            let mut t = Table::new();
            t.insert("behavior", behavior);
            t.insert("behaviorArg", behavior_arg);
            vec![Variant::Nil, t.into(), Variant::Nil, Variant::Nil]
        }
        LevelEvent::MacroObjects {
            behaviors,
            behavior_args,
        } => vec![
            Variant::Nil,
            Variant::Nil,
            behaviors.into_iter().collect::<Table>().into(),
            behavior_args.into_iter().collect::<Table>().into(),
        ],
    }
}
