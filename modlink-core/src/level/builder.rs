use std::sync::Arc;

use bytes::{BufMut, BytesMut};

use super::{
    LevelScript, CMD_AREA, CMD_AREA_LEN, CMD_MACRO_OBJECTS, CMD_MACRO_OBJECTS_LEN,
    CMD_OBJECT_WITH_ACTS, CMD_OBJECT_WITH_ACTS_LEN, MACRO_ENTRY_WORDS, MACRO_OBJECT_END,
};

/// Assembles level command buffers.
#[derive(Debug, Default)]
pub struct LevelScriptBuilder {
    commands: BytesMut,
    macro_arrays: Vec<Arc<[i16]>>,
}

impl LevelScriptBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn area(mut self, index: u8) -> Self {
        self.commands.put_u8(CMD_AREA);
        self.commands.put_u8(CMD_AREA_LEN);
        self.commands.put_u8(index);
        self.commands.put_bytes(0, CMD_AREA_LEN as usize - 3);
        self
    }

    pub fn object(mut self, behavior: u32, behavior_arg: u32) -> Self {
        self.commands.put_u8(CMD_OBJECT_WITH_ACTS);
        self.commands.put_u8(CMD_OBJECT_WITH_ACTS_LEN);
        // acts mask, model, position, angle
        self.commands.put_bytes(0, 14);
        self.commands.put_u32_le(behavior_arg);
        self.commands.put_u32_le(behavior);
        self
    }

    /// Add a macro object array built from `entries` (terminated automatically)
    /// and the command that references it.
    pub fn macro_objects(mut self, entries: &[[i16; MACRO_ENTRY_WORDS]]) -> Self {
        let mut words: Vec<i16> = entries.iter().flatten().copied().collect();
        words.push(MACRO_OBJECT_END);
        let index = self.macro_arrays.len() as u32;
        self.macro_arrays.push(Arc::from(words));

        self.commands.put_u8(CMD_MACRO_OBJECTS);
        self.commands.put_u8(CMD_MACRO_OBJECTS_LEN);
        self.commands.put_u16_le(0);
        self.commands.put_u32_le(index);
        self
    }

    /// Any other command, with `payload` following the opcode and length bytes.
    pub fn raw(mut self, opcode: u8, payload: &[u8]) -> Self {
        self.commands.put_u8(opcode);
        self.commands.put_u8((payload.len() + 2) as u8);
        self.commands.put_slice(payload);
        self
    }

    pub fn build(self) -> LevelScript {
        LevelScript::new(self.commands.freeze(), self.macro_arrays)
    }
}
