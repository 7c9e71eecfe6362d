use std::fmt;

use byteorder::{ByteOrder, LittleEndian};
use serde::{Deserialize, Serialize};

use crate::field::WidthClass;

/// Size in bytes of one object's memory block.
pub const OBJECT_SIZE: usize = 0x260;

/// Base of the virtual address range the pool hands out.
/// Slot `n` occupies `OBJECT_POOL_BASE + n * OBJECT_SIZE`.
pub const OBJECT_POOL_BASE: u64 = 0x8000_0000;

pub const OBJECT_POOL_CAPACITY: usize = 960;

/// The kinds of native records a script may hold a reference to.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ObjectCategory {
    Object,
    TextureInfo,
}

impl ObjectCategory {
    pub fn name(&self) -> &'static str {
        match self {
            ObjectCategory::Object => "Object",
            ObjectCategory::TextureInfo => "TextureInfo",
        }
    }
}

/// A non-owning, generation-checked reference to a native record.
///
/// A reference whose slot has since been freed (or reused) no longer resolves.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ObjectRef {
    pub category: ObjectCategory,
    pub index: u32,
    pub generation: u32,
}

impl ObjectRef {
    pub fn new(category: ObjectCategory, index: u32, generation: u32) -> Self {
        Self { category, index, generation }
    }
}

impl fmt::Display for ObjectRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}#{}:{}", self.category.name(), self.index, self.generation)
    }
}

/// One live object: its behavior and its raw memory block.
#[derive(Debug, Clone)]
pub struct Object {
    behavior: u32,
    memory: Box<[u8]>,
}

impl Object {
    fn new(behavior: u32) -> Self {
        Self {
            behavior,
            memory: vec![0u8; OBJECT_SIZE].into_boxed_slice(),
        }
    }

    pub fn behavior(&self) -> u32 {
        self.behavior
    }

    pub fn memory(&self) -> &[u8] {
        &self.memory
    }

    /// Read `width` bytes at `offset`, zero-extended to 32 bits.
    pub fn read(&self, offset: usize, width: WidthClass) -> Option<u32> {
        let bytes = self.memory.get(offset..offset.checked_add(width.bytes())?)?;
        Some(match width {
            WidthClass::W8 => bytes[0] as u32,
            WidthClass::W16 => LittleEndian::read_u16(bytes) as u32,
            WidthClass::W32 => LittleEndian::read_u32(bytes),
        })
    }

    /// Write the low `width` bytes of `value` at `offset`. Returns false when out of bounds.
    pub fn write(&mut self, offset: usize, width: WidthClass, value: u32) -> bool {
        let Some(end) = offset.checked_add(width.bytes()) else {
            return false;
        };
        let Some(bytes) = self.memory.get_mut(offset..end) else {
            return false;
        };
        match width {
            WidthClass::W8 => bytes[0] = value as u8,
            WidthClass::W16 => LittleEndian::write_u16(bytes, value as u16),
            WidthClass::W32 => LittleEndian::write_u32(bytes, value),
        }
        true
    }

    pub fn read_f32(&self, offset: usize) -> Option<f32> {
        self.read(offset, WidthClass::W32).map(f32::from_bits)
    }

    pub fn write_f32(&mut self, offset: usize, value: f32) -> bool {
        self.write(offset, WidthClass::W32, value.to_bits())
    }
}

#[derive(Debug, Default)]
struct Slot {
    generation: u32,
    object: Option<Object>,
}

/// Fixed-capacity object storage.
#[derive(Debug)]
pub struct ObjectPool {
    slots: Vec<Slot>,
    capacity: usize,
}

impl Default for ObjectPool {
    fn default() -> Self {
        Self::new(OBJECT_POOL_CAPACITY)
    }
}

impl ObjectPool {
    pub fn new(capacity: usize) -> Self {
        Self { slots: Vec::new(), capacity }
    }

    /// Spawn an object with the given behavior. Returns `None` when the pool is full.
    pub fn spawn(&mut self, behavior: u32) -> Option<ObjectRef> {
        let index = match self.slots.iter().position(|s| s.object.is_none()) {
            Some(index) => index,
            None if self.slots.len() < self.capacity => {
                self.slots.push(Slot::default());
                self.slots.len() - 1
            }
            None => {
                log::warn!("object pool exhausted (capacity={})", self.capacity);
                return None;
            }
        };

        let slot = &mut self.slots[index];
        slot.generation = slot.generation.wrapping_add(1);
        slot.object = Some(Object::new(behavior));
        Some(ObjectRef::new(ObjectCategory::Object, index as u32, slot.generation))
    }

    /// Free an object. References to it stop resolving.
    pub fn destroy(&mut self, obj: ObjectRef) -> Option<Object> {
        self.get(obj)?;
        self.slots[obj.index as usize].object.take()
    }

    pub fn get(&self, obj: ObjectRef) -> Option<&Object> {
        if obj.category != ObjectCategory::Object {
            return None;
        }
        let slot = self.slots.get(obj.index as usize)?;
        if slot.generation != obj.generation {
            return None;
        }
        slot.object.as_ref()
    }

    pub fn get_mut(&mut self, obj: ObjectRef) -> Option<&mut Object> {
        if obj.category != ObjectCategory::Object {
            return None;
        }
        let slot = self.slots.get_mut(obj.index as usize)?;
        if slot.generation != obj.generation {
            return None;
        }
        slot.object.as_mut()
    }

    pub fn contains(&self, obj: ObjectRef) -> bool {
        self.get(obj).is_some()
    }

    pub fn len(&self) -> usize {
        self.slots.iter().filter(|s| s.object.is_some()).count()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Absolute address of `offset` inside a live object.
    pub fn address_of(&self, obj: ObjectRef, offset: usize) -> Option<u64> {
        self.get(obj)?;
        if offset >= OBJECT_SIZE {
            return None;
        }
        Some(OBJECT_POOL_BASE + (obj.index as u64) * OBJECT_SIZE as u64 + offset as u64)
    }

    /// Read through an absolute address previously produced by [`ObjectPool::address_of`].
    pub fn read_address(&self, addr: u64, width: WidthClass) -> Option<u32> {
        let rel = addr.checked_sub(OBJECT_POOL_BASE)?;
        let index = (rel / OBJECT_SIZE as u64) as usize;
        let offset = (rel % OBJECT_SIZE as u64) as usize;
        self.slots.get(index)?.object.as_ref()?.read(offset, width)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn stale_reference_does_not_resolve() {
        let mut pool = ObjectPool::new(4);
        let a = pool.spawn(1).unwrap();
        assert!(pool.destroy(a).is_some());
        let b = pool.spawn(2).unwrap();
        assert_eq!(a.index, b.index);
        assert!(pool.get(a).is_none());
        assert_eq!(pool.get(b).unwrap().behavior(), 2);
    }

    #[test]
    fn pool_capacity_is_enforced() {
        let mut pool = ObjectPool::new(2);
        assert!(pool.spawn(0).is_some());
        assert!(pool.spawn(0).is_some());
        assert!(pool.spawn(0).is_none());
    }

    #[test]
    fn memory_reads_back_through_address() {
        let mut pool = ObjectPool::new(4);
        let _ = pool.spawn(0).unwrap();
        let obj = pool.spawn(0).unwrap();
        assert!(pool.get_mut(obj).unwrap().write(0x10, WidthClass::W16, 0xBEEF));
        let addr = pool.address_of(obj, 0x10).unwrap();
        assert_eq!(addr, OBJECT_POOL_BASE + OBJECT_SIZE as u64 + 0x10);
        assert_eq!(pool.read_address(addr, WidthClass::W16), Some(0xBEEF));
        assert_eq!(pool.read_address(addr, WidthClass::W8), Some(0xEF));
    }

    #[test]
    fn out_of_bounds_access_is_rejected() {
        let mut pool = ObjectPool::new(1);
        let obj = pool.spawn(0).unwrap();
        let o = pool.get_mut(obj).unwrap();
        assert!(!o.write(OBJECT_SIZE - 2, WidthClass::W32, 1));
        assert_eq!(o.read(OBJECT_SIZE, WidthClass::W8), None);
    }
}
