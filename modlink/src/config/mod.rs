pub mod bridge_config;
pub mod logger_config;

pub use bridge_config::{BridgeConfig, BridgeConfigBuilder, BridgeConfigReader, SyncConfig};
pub use logger_config::LoggerConfig;
