//! Level command streams.
//!
//! A level script is a flat buffer of variable-length commands. Every command
//! starts with its opcode byte followed by its total length in bytes. Only a
//! few opcodes carry data scripts care about; [`LevelScript::events`] walks
//! the buffer and yields those, skipping everything else.

mod builder;
pub mod macro_presets;

use std::collections::BTreeMap;
use std::sync::Arc;

use byteorder::{ByteOrder, LittleEndian};
use bytes::Bytes;

pub use builder::LevelScriptBuilder;
pub use macro_presets::{MacroPreset, MACRO_OBJECT_END};

use crate::error::LevelScriptError;

pub const CMD_AREA: u8 = 0x1F;
pub const CMD_OBJECT_WITH_ACTS: u8 = 0x24;
pub const CMD_MACRO_OBJECTS: u8 = 0x39;

pub const CMD_AREA_LEN: u8 = 0x08;
pub const CMD_OBJECT_WITH_ACTS_LEN: u8 = 0x18;
pub const CMD_MACRO_OBJECTS_LEN: u8 = 0x08;

/// Words per macro object entry: preset/yaw, x, y, z, params.
pub const MACRO_ENTRY_WORDS: usize = 5;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LevelEvent {
    Area(u8),
    ObjectInit { behavior: u32, behavior_arg: u32 },
    MacroObjects { behaviors: Vec<u32>, behavior_args: Vec<u32> },
}

impl LevelEvent {
    pub fn opcode(&self) -> u8 {
        match self {
            LevelEvent::Area(_) => CMD_AREA,
            LevelEvent::ObjectInit { .. } => CMD_OBJECT_WITH_ACTS,
            LevelEvent::MacroObjects { .. } => CMD_MACRO_OBJECTS,
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct LevelScript {
    commands: Bytes,
    macro_arrays: Vec<Arc<[i16]>>,
}

impl LevelScript {
    pub fn new(commands: Bytes, macro_arrays: Vec<Arc<[i16]>>) -> Self {
        Self { commands, macro_arrays }
    }

    #[inline]
    pub fn raw(&self) -> &[u8] {
        &self.commands
    }

    pub fn macro_array(&self, index: u32) -> Option<&[i16]> {
        self.macro_arrays.get(index as usize).map(|a| &a[..])
    }

    /// Walk the command buffer from the start. Each call gets its own cursor.
    pub fn events(&self) -> LevelEvents<'_> {
        LevelEvents {
            script: self,
            cursor: 0,
            done: false,
        }
    }

    fn read_macro_objects(&self, index: u32) -> Result<LevelEvent, LevelScriptError> {
        let words = self
            .macro_array(index)
            .ok_or(LevelScriptError::MissingMacroArray { index })?;

        let mut behaviors = Vec::new();
        let mut behavior_args = Vec::new();
        let mut entries = words.chunks(MACRO_ENTRY_WORDS);
        loop {
            let entry = entries
                .next()
                .ok_or(LevelScriptError::UnterminatedMacroArray { index })?;
            if entry[0] == MACRO_OBJECT_END {
                break;
            }
            if entry.len() < MACRO_ENTRY_WORDS {
                return Err(LevelScriptError::UnterminatedMacroArray { index });
            }
            let Some(preset) = macro_presets::preset_for_word(entry[0]) else {
                log::warn!(
                    "macro array {}: unknown preset in word 0x{:04X}, skipped",
                    index,
                    entry[0] as u16
                );
                continue;
            };
            behaviors.push(preset.behavior.id());
            behavior_args.push(macro_presets::macro_behavior_arg(entry[4], preset));
        }

        Ok(LevelEvent::MacroObjects {
            behaviors,
            behavior_args,
        })
    }
}

pub struct LevelEvents<'a> {
    script: &'a LevelScript,
    cursor: usize,
    done: bool,
}

impl LevelEvents<'_> {
    /// Byte offset of the next command to be read.
    pub fn offset(&self) -> usize {
        self.cursor
    }

    fn fail(&mut self, err: LevelScriptError) -> Option<Result<LevelEvent, LevelScriptError>> {
        self.done = true;
        Some(Err(err))
    }
}

impl Iterator for LevelEvents<'_> {
    type Item = Result<LevelEvent, LevelScriptError>;

    fn next(&mut self) -> Option<Self::Item> {
        let script = self.script;
        let raw = script.raw();
        while !self.done && self.cursor < raw.len() {
            let offset = self.cursor;
            let opcode = raw[offset];
            let Some(&length) = raw.get(offset + 1) else {
                return self.fail(LevelScriptError::Truncated { offset, opcode });
            };
            if length < 2 {
                return self.fail(LevelScriptError::BadLength {
                    offset,
                    opcode,
                    length,
                });
            }
            let end = offset + length as usize;
            if end > raw.len() {
                return self.fail(LevelScriptError::Truncated { offset, opcode });
            }
            self.cursor = end;
            let cmd = &raw[offset..end];

            let min_len = match opcode {
                CMD_AREA => CMD_AREA_LEN,
                CMD_OBJECT_WITH_ACTS => CMD_OBJECT_WITH_ACTS_LEN,
                CMD_MACRO_OBJECTS => CMD_MACRO_OBJECTS_LEN,
                _ => continue,
            };
            if length < min_len {
                return self.fail(LevelScriptError::BadLength {
                    offset,
                    opcode,
                    length,
                });
            }

            let event = match opcode {
                CMD_AREA => Ok(LevelEvent::Area(cmd[2])),
                CMD_OBJECT_WITH_ACTS => Ok(LevelEvent::ObjectInit {
                    behavior: LittleEndian::read_u32(&cmd[20..24]),
                    behavior_arg: LittleEndian::read_u32(&cmd[16..20]),
                }),
                _ => script.read_macro_objects(LittleEndian::read_u32(&cmd[4..8])),
            };
            if event.is_err() {
                self.done = true;
            }
            return Some(event);
        }
        None
    }
}

/// Level scripts keyed by level number.
#[derive(Debug, Default)]
pub struct LevelScripts {
    scripts: BTreeMap<i32, LevelScript>,
}

impl LevelScripts {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, level: i32, script: LevelScript) -> Option<LevelScript> {
        self.scripts.insert(level, script)
    }

    pub fn get(&self, level: i32) -> Option<&LevelScript> {
        self.scripts.get(&level)
    }

    pub fn contains(&self, level: i32) -> bool {
        self.scripts.contains_key(&level)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::behavior::BehaviorId;
    use pretty_assertions::assert_eq;

    #[test]
    fn walks_known_opcodes_and_skips_others() {
        let script = LevelScriptBuilder::new()
            .raw(0x1B, &[0, 0])
            .area(1)
            .object(BehaviorId::Goomba.id(), 0x0001_0000)
            .raw(0x2E, &[0, 0, 0, 0, 0, 0])
            .area(2)
            .build();

        let events: Vec<_> = script.events().collect::<Result<_, _>>().unwrap();
        assert_eq!(
            events,
            vec![
                LevelEvent::Area(1),
                LevelEvent::ObjectInit {
                    behavior: BehaviorId::Goomba.id(),
                    behavior_arg: 0x0001_0000
                },
                LevelEvent::Area(2),
            ]
        );
    }

    #[test]
    fn each_walk_has_its_own_cursor() {
        let script = LevelScriptBuilder::new().area(3).area(4).build();
        let mut a = script.events();
        assert_eq!(a.next(), Some(Ok(LevelEvent::Area(3))));
        let mut b = script.events();
        assert_eq!(b.next(), Some(Ok(LevelEvent::Area(3))));
        assert_eq!(a.next(), Some(Ok(LevelEvent::Area(4))));
        assert_eq!(a.next(), None);
    }

    #[test]
    fn macro_sentinel_first_gives_empty_sequences() {
        let script = LevelScriptBuilder::new().macro_objects(&[]).build();
        let events: Vec<_> = script.events().collect::<Result<_, _>>().unwrap();
        assert_eq!(
            events,
            vec![LevelEvent::MacroObjects {
                behaviors: vec![],
                behavior_args: vec![]
            }]
        );
    }

    #[test]
    fn macro_entries_and_unknown_presets() {
        let script = LevelScriptBuilder::new()
            .macro_objects(&[
                [0x1F + 6, 10, 20, 30, 0],
                [0x1FF, 0, 0, 0, 0],
                [0x1F + 25, 0, 0, 0, 0x0300],
            ])
            .build();
        let events: Vec<_> = script.events().collect::<Result<_, _>>().unwrap();
        assert_eq!(
            events,
            vec![LevelEvent::MacroObjects {
                behaviors: vec![BehaviorId::RedCoin.id(), BehaviorId::Piranha.id()],
                behavior_args: vec![0, (0x21 << 16) + 0x0300],
            }]
        );
    }

    #[test]
    fn malformed_streams_stop_the_walk() {
        let zero_len = LevelScript::new(Bytes::from_static(&[0x1F, 0x00, 0, 0]), vec![]);
        let mut events = zero_len.events();
        assert_eq!(
            events.next(),
            Some(Err(LevelScriptError::BadLength {
                offset: 0,
                opcode: 0x1F,
                length: 0
            }))
        );
        assert_eq!(events.next(), None);

        let truncated = LevelScript::new(Bytes::from_static(&[0x1F, 0x08, 1, 0]), vec![]);
        assert_eq!(
            truncated.events().next(),
            Some(Err(LevelScriptError::Truncated {
                offset: 0,
                opcode: 0x1F
            }))
        );

        let missing = LevelScript::new(
            Bytes::from_static(&[0x39, 0x08, 0, 0, 7, 0, 0, 0]),
            vec![],
        );
        assert_eq!(
            missing.events().next(),
            Some(Err(LevelScriptError::MissingMacroArray { index: 7 }))
        );

        let unterminated = LevelScript::new(
            Bytes::from_static(&[0x39, 0x08, 0, 0, 0, 0, 0, 0]),
            vec![Arc::from(vec![0x1F_i16, 0, 0, 0, 0])],
        );
        assert_eq!(
            unterminated.events().next(),
            Some(Err(LevelScriptError::UnterminatedMacroArray { index: 0 }))
        );
    }
}
