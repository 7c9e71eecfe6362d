use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::object::{ObjectCategory, ObjectRef};
use crate::pointer::{NativePtr, PointerKind};

/// Base of the virtual address range texture pixel data is placed in.
pub const TEXTURE_ARENA_BASE: u64 = 0x0400_0000;

/// Description of a loaded texture, as handed to scripts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TextureInfo {
    pub texture: NativePtr,
    pub bit_size: u8,
    pub width: u32,
    pub height: u32,
}

#[derive(Debug)]
struct TextureEntry {
    name: String,
    info: TextureInfo,
    pixels: Vec<u8>,
}

/// Named textures known to the engine.
#[derive(Debug, Default)]
pub struct TextureRegistry {
    entries: Vec<TextureEntry>,
    by_name: HashMap<String, usize>,
    next_addr: u64,
}

impl TextureRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register (or replace) a texture. Returns the info describing it.
    pub fn register(
        &mut self,
        name: &str,
        bit_size: u8,
        width: u32,
        height: u32,
        pixels: Vec<u8>,
    ) -> TextureInfo {
        if self.next_addr == 0 {
            self.next_addr = TEXTURE_ARENA_BASE;
        }
        let addr = self.next_addr;
        // keep every texture 8-byte aligned and never hand out the same address twice
        self.next_addr += (pixels.len() as u64).max(1).next_multiple_of(8);

        let info = TextureInfo {
            texture: NativePtr::new(PointerKind::U8, addr),
            bit_size,
            width,
            height,
        };
        let entry = TextureEntry {
            name: name.to_string(),
            info,
            pixels,
        };

        match self.by_name.get(name) {
            Some(&index) => self.entries[index] = entry,
            None => {
                self.by_name.insert(name.to_string(), self.entries.len());
                self.entries.push(entry);
            }
        }
        info
    }

    pub fn get(&self, name: &str) -> Option<TextureInfo> {
        self.by_name.get(name).map(|&i| self.entries[i].info)
    }

    /// An opaque script-side reference to a registered texture.
    pub fn reference(&self, name: &str) -> Option<ObjectRef> {
        let index = *self.by_name.get(name)?;
        Some(ObjectRef::new(ObjectCategory::TextureInfo, index as u32, 0))
    }

    pub fn by_ref(&self, r: ObjectRef) -> Option<TextureInfo> {
        if r.category != ObjectCategory::TextureInfo {
            return None;
        }
        self.entries.get(r.index as usize).map(|e| e.info)
    }

    pub fn name_of(&self, r: ObjectRef) -> Option<&str> {
        if r.category != ObjectCategory::TextureInfo {
            return None;
        }
        self.entries.get(r.index as usize).map(|e| e.name.as_str())
    }

    /// Pixel data behind a texture pointer.
    pub fn pixels(&self, ptr: NativePtr) -> Option<&[u8]> {
        if ptr.kind != PointerKind::U8 {
            return None;
        }
        self.entries
            .iter()
            .find(|e| e.info.texture == ptr)
            .map(|e| e.pixels.as_slice())
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
