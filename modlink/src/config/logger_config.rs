use log::LevelFilter;
use serde::{Deserialize, Serialize};

/// Logger configuration used by the bridge.
///
/// `app_level_filter` applies to the modlink crates, `level_filter` to everything else.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct LoggerConfig {
    pub app_level_filter: LevelFilter,
    pub level_filter: LevelFilter,
}

impl Default for LoggerConfig {
    fn default() -> Self {
        Self { app_level_filter: LevelFilter::Info, level_filter: LevelFilter::Warn }
    }
}
