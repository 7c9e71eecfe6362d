use crate::config::LoggerConfig;

/// Install `env_logger` as the global logger.
///
/// `RUST_LOG` still overrides the configured filters. Calling this more than
/// once is harmless; only the first call installs a logger.
pub fn init(config: Option<&LoggerConfig>) {
    let config = config.cloned().unwrap_or_default();
    let mut builder = env_logger::Builder::new();
    builder
        .filter_level(config.level_filter)
        .filter_module("modlink", config.app_level_filter)
        .filter_module("modlink_core", config.app_level_filter)
        .filter_module("modlink_script", config.app_level_filter)
        .parse_default_env();

    if builder.try_init().is_err() {
        log::debug!("logger already initialized");
    }
}
