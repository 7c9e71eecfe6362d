//! modlink
//!
//! Binds native engine state to a mod scripting runtime. Scripts call the
//! entry points in [`subsystem::components::bindings`] through a [`Bridge`];
//! every failure becomes a diagnostic and a zero result count, never a crash.

#![allow(clippy::uninlined_format_args)]

pub mod bridge;
pub mod config;
pub mod diagnostics;
pub mod error;
pub mod logger;
pub mod subsystem;
pub mod trace;

pub use bridge::Bridge;
pub use config::{BridgeConfig, BridgeConfigBuilder, BridgeConfigReader, LoggerConfig};
pub use diagnostics::DiagnosticRing;
pub use error::BridgeError;
pub use modlink_script::CallOutcome;
pub use subsystem::resources::level_script_parse::{
    LevelScriptParse, ParseError, ParseState, PendingWalk,
};
pub use subsystem::world::GameData;
