use modlink_core::{FieldError, SyncError};
use modlink_script::{ConvertError, RuntimeError};
use thiserror::Error;

use crate::subsystem::resources::level_script_parse::ParseError;

/// Why a bound call had no effect. Every variant ends the call with zero
/// results and a diagnostic; none is fatal.
#[derive(Debug, Error)]
pub enum BridgeError {
    #[error("failed to convert parameter {arg}: {source}")]
    Conversion { arg: usize, source: ConvertError },
    #[error("{0}")]
    Lookup(String),
    #[error(transparent)]
    ResourceExhausted(SyncError),
    #[error("this function can only be used in single-player")]
    Policy,
    #[error(transparent)]
    Runtime(#[from] RuntimeError),
    #[error(transparent)]
    Parse(#[from] ParseError),
    #[error(transparent)]
    Field(#[from] FieldError),
    #[error("payload encoding failed: {0}")]
    Payload(#[from] bincode::Error),
}

impl From<SyncError> for BridgeError {
    fn from(err: SyncError) -> Self {
        match err {
            SyncError::ObjectNotFound | SyncError::UnknownSyncId(_) => {
                BridgeError::Lookup(err.to_string())
            }
            _ => BridgeError::ResourceExhausted(err),
        }
    }
}

impl BridgeError {
    pub fn lookup(msg: impl Into<String>) -> Self {
        BridgeError::Lookup(msg.into())
    }
}
