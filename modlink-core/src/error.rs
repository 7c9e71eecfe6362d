use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum SyncError {
    #[error("sync object allocation exhausted (capacity {capacity})")]
    AllocationExhausted { capacity: usize },
    #[error("object is not alive")]
    ObjectNotFound,
    #[error("unknown sync id {0}")]
    UnknownSyncId(u32),
    #[error("sync object {id} already holds {limit} fields")]
    TooManyFields { id: u32, limit: usize },
    #[error("field at offset 0x{offset:X} does not fit in the object")]
    FieldOutOfBounds { offset: u16 },
}

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum FieldError {
    #[error("invalid custom field name '{0}'")]
    InvalidIdentifier(String),
    #[error("custom field '{0}' would shadow a built-in field")]
    ShadowsBuiltin(String),
    #[error("custom field '{0}' is already defined")]
    Duplicate(String),
    #[error("custom field slots exhausted (limit {limit})")]
    SlotsExhausted { limit: usize },
    #[error("{0} fields cannot be extended")]
    NotExtensible(&'static str),
    #[error("custom field '{0}' needs a numeric type")]
    Unsized(String),
}

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum LevelScriptError {
    #[error("command 0x{opcode:02X} at offset {offset} is truncated")]
    Truncated { offset: usize, opcode: u8 },
    #[error("command 0x{opcode:02X} at offset {offset} has bad length {length}")]
    BadLength { offset: usize, opcode: u8, length: u8 },
    #[error("macro object array {index} does not exist")]
    MissingMacroArray { index: u32 },
    #[error("macro object array {index} has no terminator")]
    UnterminatedMacroArray { index: u32 },
}
