use modlink_core::ModId;
use modlink_script::{CallContext, CallOutcome, FunctionTable, ScriptHost, ScriptRuntime, Variant};

use crate::config::BridgeConfig;
use crate::diagnostics::DiagnosticRing;
use crate::logger;
use crate::subsystem::components::bindings::bind_functions;
use crate::subsystem::resources::level_script_parse::{ParseError, ParseState};
use crate::subsystem::world::GameData;
use crate::trace;

fn dispatch(
    functions: &FunctionTable<GameData>,
    game_data: &mut GameData,
    name: &str,
    args: Vec<Variant>,
    runtime: &mut dyn ScriptRuntime,
    active_mod: Option<ModId>,
) -> CallOutcome {
    trace::bind(format_args!("{}({} args) from {:?}", name, args.len(), active_mod));

    let mut ctx = CallContext::new(name, args, runtime, active_mod);
    let count = match functions.call(name, game_data, &mut ctx) {
        Some(count) => count,
        None => {
            ctx.error("no such function");
            0
        }
    };
    ctx.into_outcome(count)
}

/// Bound functions as seen from inside a running script callback.
struct Reentry<'b> {
    functions: &'b FunctionTable<GameData>,
    game_data: &'b mut GameData,
    diagnostics: &'b mut DiagnosticRing,
}

impl ScriptHost for Reentry<'_> {
    fn call_bound(
        &mut self,
        name: &str,
        args: Vec<Variant>,
        runtime: &mut dyn ScriptRuntime,
        owner: Option<ModId>,
    ) -> CallOutcome {
        let outcome = dispatch(self.functions, self.game_data, name, args, runtime, owner);
        self.diagnostics.extend(outcome.diagnostics.iter().cloned());
        outcome
    }
}

/// Native side of the scripting boundary: game state, the exported function
/// table and the diagnostics scripts have produced.
pub struct Bridge {
    config: BridgeConfig,
    game_data: GameData,
    functions: FunctionTable<GameData>,
    diagnostics: DiagnosticRing,
}

impl Bridge {
    pub fn bridge() -> Self {
        Self::with_config(BridgeConfig::default())
    }

    /// Build a bridge, installing the logger when the config asks for one.
    pub fn with_config(config: BridgeConfig) -> Self {
        if config.logger_config.is_some() {
            logger::init(config.logger_config.as_ref());
        }
        log::info!("Starting the bridge, with the following configuration \n {:?}", config);
        Self::without_logging(config)
    }

    /// Build a bridge and leave the global logger alone.
    pub fn without_logging(config: BridgeConfig) -> Self {
        let mut functions = FunctionTable::new();
        bind_functions(&mut functions);
        log::debug!("bound {} functions", functions.len());

        Self {
            game_data: GameData::new(&config),
            diagnostics: DiagnosticRing::new(config.diagnostics_capacity),
            functions,
            config,
        }
    }

    /// Dispatch a script call to the function bound under `name`.
    ///
    /// A call that leaves a level script subscription behind walks it before
    /// returning. The callback runs with the game state released, so it may
    /// call bound functions in turn.
    pub fn call(
        &mut self,
        name: &str,
        args: Vec<Variant>,
        runtime: &mut dyn ScriptRuntime,
        active_mod: Option<ModId>,
    ) -> CallOutcome {
        let mut outcome = dispatch(&self.functions, &mut self.game_data, name, args, runtime, active_mod);

        if self.game_data.level_script_parse.state() == ParseState::Subscribed {
            match self.walk_level_script(runtime) {
                Ok(dispatched) => {
                    log::debug!("{}: dispatched {} level commands", name, dispatched)
                }
                Err(e) => {
                    let line = format!("{}: {}", name, e);
                    log::error!("{}", line);
                    outcome.count = 0;
                    outcome.diagnostics.push(line);
                }
            }
        }

        self.diagnostics.extend(outcome.diagnostics.iter().cloned());
        outcome
    }

    fn walk_level_script(&mut self, runtime: &mut dyn ScriptRuntime) -> Result<usize, ParseError> {
        let pending = self
            .game_data
            .level_script_parse
            .begin_walk(&self.game_data.levels, runtime)?;
        let mut host = Reentry {
            functions: &self.functions,
            game_data: &mut self.game_data,
            diagnostics: &mut self.diagnostics,
        };
        let result = pending.run(runtime, &mut host);
        self.game_data.level_script_parse.end_walk();
        result
    }

    /// Drop everything `owner` registered.
    pub fn unload_mod(&mut self, owner: ModId, runtime: &mut dyn ScriptRuntime) {
        log::info!("unloading {:?}", owner);
        self.game_data.unload_mod(owner, runtime);
    }

    pub fn config(&self) -> &BridgeConfig {
        &self.config
    }

    pub fn game_data(&self) -> &GameData {
        &self.game_data
    }

    pub fn game_data_mut(&mut self) -> &mut GameData {
        &mut self.game_data
    }

    pub fn functions(&self) -> &FunctionTable<GameData> {
        &self.functions
    }

    pub fn diagnostics(&self) -> &DiagnosticRing {
        &self.diagnostics
    }
}

impl Default for Bridge {
    fn default() -> Self {
        Self::without_logging(BridgeConfig::default())
    }
}
