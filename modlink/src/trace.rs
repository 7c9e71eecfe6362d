use std::env;
use std::fmt;
use std::sync::OnceLock;

/// Trace categories, enabled via environment variables.
///
/// Supported:
/// - MODLINK_TRACE="bind,sync,level" (comma/space separated; "all" enables all)
/// - MODLINK_TRACE_BIND=1, MODLINK_TRACE_SYNC=1, MODLINK_TRACE_LEVEL=1
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TraceKind {
    /// Every dispatched call with its arguments.
    Bind,
    Sync,
    Level,
}

const M_BIND: u32 = 1 << 0;
const M_SYNC: u32 = 1 << 1;
const M_LEVEL: u32 = 1 << 2;

fn parse_bool_env(name: &str) -> bool {
    match env::var(name) {
        Ok(v) => {
            let s = v.trim().to_ascii_lowercase();
            !(s.is_empty() || s == "0" || s == "false" || s == "no" || s == "off")
        }
        Err(_) => false,
    }
}

fn parse_mask_from_trace_list(s: &str) -> u32 {
    let mut mask = 0u32;
    for raw in s.split(|c: char| c == ',' || c == ';' || c.is_whitespace()) {
        let t = raw.trim().to_ascii_lowercase();
        match t.as_str() {
            "all" => mask |= M_BIND | M_SYNC | M_LEVEL,
            "bind" | "call" => mask |= M_BIND,
            "sync" => mask |= M_SYNC,
            "level" => mask |= M_LEVEL,
            _ => {}
        }
    }
    mask
}

fn build_mask() -> u32 {
    let mut mask = 0u32;
    if let Ok(list) = env::var("MODLINK_TRACE") {
        mask |= parse_mask_from_trace_list(&list);
    }
    if parse_bool_env("MODLINK_TRACE_BIND") {
        mask |= M_BIND;
    }
    if parse_bool_env("MODLINK_TRACE_SYNC") {
        mask |= M_SYNC;
    }
    if parse_bool_env("MODLINK_TRACE_LEVEL") {
        mask |= M_LEVEL;
    }
    mask
}

fn mask() -> u32 {
    static MASK: OnceLock<u32> = OnceLock::new();
    *MASK.get_or_init(build_mask)
}

pub fn enabled(k: TraceKind) -> bool {
    let bit = match k {
        TraceKind::Bind => M_BIND,
        TraceKind::Sync => M_SYNC,
        TraceKind::Level => M_LEVEL,
    };
    mask() & bit != 0
}

pub fn bind(args: fmt::Arguments) {
    if !enabled(TraceKind::Bind) {
        return;
    }
    log::info!("{}", args);
}

pub fn sync(args: fmt::Arguments) {
    if !enabled(TraceKind::Sync) {
        return;
    }
    log::info!("{}", args);
}

pub fn level(args: fmt::Arguments) {
    if !enabled(TraceKind::Level) {
        return;
    }
    log::info!("{}", args);
}
