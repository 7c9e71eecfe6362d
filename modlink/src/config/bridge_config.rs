use std::{
    fs::File,
    io::{Read, Write},
    path::Path,
};

use anyhow::{bail, Context, Result};
use modlink_core::field::CUSTOM_FIELD_SLOTS;
use modlink_core::network::MAX_PLAYERS;
use modlink_core::sync::{DEFAULT_MAX_SYNC_FIELDS, DEFAULT_SYNC_CAPACITY};
use serde::{Deserialize, Serialize};

use crate::config::logger_config::LoggerConfig;

/// Distance within which objects registered with standard sync replicate.
pub const STANDARD_SYNC_DISTANCE: f32 = 4000.0;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SyncConfig {
    pub capacity: usize,
    pub max_fields: usize,
    pub standard_distance: f32,
}

impl Default for SyncConfig {
    fn default() -> Self {
        Self {
            capacity: DEFAULT_SYNC_CAPACITY,
            max_fields: DEFAULT_MAX_SYNC_FIELDS,
            standard_distance: STANDARD_SYNC_DISTANCE,
        }
    }
}

/// Configuration of the bridge and the native state it owns.
/// Use [`BridgeConfigBuilder`] to build one from code.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BridgeConfig {
    /// Logger configuration to use. `None` leaves logging to the host.
    pub logger_config: Option<LoggerConfig>,
    pub sync: SyncConfig,
    /// Custom object fields each mod may define.
    pub max_custom_fields: usize,
    /// Diagnostic lines kept for inspection.
    pub diagnostics_capacity: usize,
    pub max_players: usize,
}

impl Default for BridgeConfig {
    fn default() -> Self {
        Self {
            logger_config: Some(Default::default()),
            sync: SyncConfig::default(),
            max_custom_fields: CUSTOM_FIELD_SLOTS,
            diagnostics_capacity: 256,
            max_players: MAX_PLAYERS,
        }
    }
}

impl BridgeConfig {
    pub fn validate(&self) -> Result<()> {
        if self.sync.capacity == 0 {
            bail!("sync.capacity must be at least 1");
        }
        if !(self.sync.standard_distance.is_finite() && self.sync.standard_distance > 0.0) {
            bail!("sync.standard_distance must be a positive number");
        }
        if self.max_custom_fields > CUSTOM_FIELD_SLOTS {
            bail!(
                "max_custom_fields {} exceeds the {} reserved slots",
                self.max_custom_fields,
                CUSTOM_FIELD_SLOTS
            );
        }
        if self.max_players == 0 || self.max_players > u8::MAX as usize {
            bail!("max_players must be between 1 and {}", u8::MAX);
        }
        Ok(())
    }
}

/// `BridgeConfigBuilder` is a convenience builder to create a `BridgeConfig` from code.
#[derive(Default)]
pub struct BridgeConfigBuilder {
    config: BridgeConfig,
}

impl BridgeConfigBuilder {
    pub fn new() -> Self {
        Self { config: Default::default() }
    }

    pub fn with_logger_config(mut self, logger_config: LoggerConfig) -> Self {
        self.config.logger_config = Some(logger_config);
        self
    }

    pub fn without_logger(mut self) -> Self {
        self.config.logger_config = None;
        self
    }

    pub fn with_sync_capacity(mut self, capacity: usize) -> Self {
        self.config.sync.capacity = capacity;
        self
    }

    pub fn with_max_sync_fields(mut self, max_fields: usize) -> Self {
        self.config.sync.max_fields = max_fields;
        self
    }

    pub fn with_standard_sync_distance(mut self, distance: f32) -> Self {
        self.config.sync.standard_distance = distance;
        self
    }

    pub fn with_max_custom_fields(mut self, max: usize) -> Self {
        self.config.max_custom_fields = max;
        self
    }

    pub fn with_diagnostics_capacity(mut self, capacity: usize) -> Self {
        self.config.diagnostics_capacity = capacity;
        self
    }

    pub fn with_max_players(mut self, max_players: usize) -> Self {
        self.config.max_players = max_players;
        self
    }

    /// Retrieves the configuration built
    pub fn get(self) -> BridgeConfig {
        self.config
    }
}

pub struct BridgeConfigReader;

impl BridgeConfigReader {
    /// Read `path`, or write the default configuration there if it does not exist.
    pub fn read_or_default(path: &Path) -> Result<BridgeConfig> {
        if !path.exists() {
            log::info!("Couldn't find {:?}, generating a default configuration", path);
            let config = BridgeConfig::default();
            let mut file = File::create(path).with_context(|| format!("create {:?}", path))?;
            file.write_all(serde_json::to_vec_pretty(&config)?.as_slice())?;
            return Ok(config);
        }
        Self::read_config(path)
    }

    pub fn read_config(path: &Path) -> Result<BridgeConfig> {
        let mut file = File::open(path).with_context(|| format!("open {:?}", path))?;
        let mut bytes = Vec::new();
        file.read_to_end(&mut bytes)?;
        let config: BridgeConfig =
            serde_json::from_slice(&bytes).with_context(|| format!("parse {:?}", path))?;
        config.validate()?;
        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn partial_json_fills_defaults() -> Result<()> {
        let config: BridgeConfig = serde_json::from_str(r#"{ "sync": { "capacity": 8 }, "max_players": 4 }"#)?;
        assert_eq!(config.sync.capacity, 8);
        assert_eq!(config.sync.max_fields, DEFAULT_MAX_SYNC_FIELDS);
        assert_eq!(config.sync.standard_distance, STANDARD_SYNC_DISTANCE);
        assert_eq!(config.max_players, 4);
        assert_eq!(config.diagnostics_capacity, 256);
        config.validate()
    }

    #[test]
    fn invalid_values_are_rejected() {
        let config = BridgeConfigBuilder::new().with_max_custom_fields(99).get();
        assert!(config.validate().is_err());
        let config = BridgeConfigBuilder::new().with_sync_capacity(0).get();
        assert!(config.validate().is_err());
    }

    #[test]
    fn read_or_default_writes_then_reads() -> Result<()> {
        let path = std::env::temp_dir().join(format!("modlink-config-{}.json", std::process::id()));
        let _ = std::fs::remove_file(&path);
        let written = BridgeConfigReader::read_or_default(&path)?;
        let read = BridgeConfigReader::read_config(&path)?;
        std::fs::remove_file(&path)?;
        assert_eq!(written, read);
        Ok(())
    }
}
