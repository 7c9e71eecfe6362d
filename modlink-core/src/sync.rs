//! Network synchronization descriptors.
//!
//! A [`SyncObject`] records which fields of an object are replicated and the
//! absolute address of each one. The table never owns objects: it holds a
//! generation-checked [`ObjectRef`] and stops resolving once the object is gone.

use crate::error::SyncError;
use crate::field::{FieldDescriptor, WidthClass, SYNC_ID_OFFSET};
use crate::object::{ObjectPool, ObjectRef, OBJECT_SIZE};

pub const DEFAULT_SYNC_CAPACITY: usize = 256;
pub const DEFAULT_MAX_SYNC_FIELDS: usize = 64;

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum SyncMode {
    /// Replicate while a player is within this distance.
    Distance(f32),
    /// Replicate only on explicit sends.
    EventsOnly,
}

#[derive(Debug, Clone, PartialEq)]
pub struct SyncField {
    pub descriptor: FieldDescriptor,
    pub width: WidthClass,
    pub address: u64,
}

#[derive(Debug, Clone, PartialEq)]
pub struct SyncObject {
    pub id: u32,
    pub object: ObjectRef,
    pub mode: SyncMode,
    pub fields: Vec<SyncField>,
}

impl SyncObject {
    pub fn has_field(&self, offset: u16) -> bool {
        self.fields.iter().any(|f| f.descriptor.offset == offset)
    }
}

#[derive(Debug)]
pub struct SyncTable {
    slots: Vec<Option<SyncObject>>,
    max_fields: usize,
}

impl Default for SyncTable {
    fn default() -> Self {
        Self::new(DEFAULT_SYNC_CAPACITY, DEFAULT_MAX_SYNC_FIELDS)
    }
}

impl SyncTable {
    pub fn new(capacity: usize, max_fields: usize) -> Self {
        Self {
            slots: (0..capacity).map(|_| None).collect(),
            max_fields,
        }
    }

    pub fn capacity(&self) -> usize {
        self.slots.len()
    }

    pub fn len(&self) -> usize {
        self.slots.iter().flatten().count()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Register `obj` for synchronization and return its id (1-based).
    ///
    /// An object that is already registered keeps its id; its field set is
    /// cleared and its mode replaced.
    pub fn register(
        &mut self,
        pool: &mut ObjectPool,
        obj: ObjectRef,
        mode: SyncMode,
    ) -> Result<u32, SyncError> {
        if !pool.contains(obj) {
            return Err(SyncError::ObjectNotFound);
        }

        let index = match self.index_for_object(obj) {
            Some(index) => index,
            None => self
                .slots
                .iter()
                .position(Option::is_none)
                .ok_or(SyncError::AllocationExhausted {
                    capacity: self.slots.len(),
                })?,
        };

        let id = index as u32 + 1;
        self.slots[index] = Some(SyncObject {
            id,
            object: obj,
            mode,
            fields: Vec::new(),
        });

        if let Some(o) = pool.get_mut(obj) {
            o.write(SYNC_ID_OFFSET as usize, WidthClass::W32, id);
        }
        log::debug!("sync object {} bound to {} ({:?})", id, obj, mode);
        Ok(id)
    }

    /// Attach a field to a registered sync object. Returns `Ok(false)` when
    /// the field at that offset is already attached.
    pub fn attach_field(
        &mut self,
        id: u32,
        pool: &ObjectPool,
        descriptor: &FieldDescriptor,
        width: WidthClass,
    ) -> Result<bool, SyncError> {
        let max_fields = self.max_fields;
        let so = self
            .slot_mut(id)
            .ok_or(SyncError::UnknownSyncId(id))?;

        if so.has_field(descriptor.offset) {
            return Ok(false);
        }
        if so.fields.len() >= max_fields {
            return Err(SyncError::TooManyFields { id, limit: max_fields });
        }
        if descriptor.offset as usize + width.bytes() > OBJECT_SIZE {
            return Err(SyncError::FieldOutOfBounds {
                offset: descriptor.offset,
            });
        }
        let address = pool
            .address_of(so.object, descriptor.offset as usize)
            .ok_or(SyncError::ObjectNotFound)?;

        so.fields.push(SyncField {
            descriptor: descriptor.clone(),
            width,
            address,
        });
        Ok(true)
    }

    pub fn get(&self, id: u32) -> Option<&SyncObject> {
        let index = (id as usize).checked_sub(1)?;
        self.slots.get(index)?.as_ref()
    }

    fn slot_mut(&mut self, id: u32) -> Option<&mut SyncObject> {
        let index = (id as usize).checked_sub(1)?;
        self.slots.get_mut(index)?.as_mut()
    }

    pub fn bound_object(&self, so: &SyncObject) -> ObjectRef {
        so.object
    }

    /// Find the sync object for a live object through its `oSyncID` field.
    /// The entry must still be bound to that exact object.
    pub fn get_for_object(&self, pool: &ObjectPool, obj: ObjectRef) -> Option<&SyncObject> {
        let id = pool.get(obj)?.read(SYNC_ID_OFFSET as usize, WidthClass::W32)?;
        let so = self.get(id)?;
        (so.object == obj).then_some(so)
    }

    fn index_for_object(&self, obj: ObjectRef) -> Option<usize> {
        self.slots
            .iter()
            .position(|s| s.as_ref().is_some_and(|so| so.object == obj))
    }

    /// Drop the sync object bound to `obj`, if any.
    pub fn forget_object(&mut self, obj: ObjectRef) -> Option<SyncObject> {
        let index = self.index_for_object(obj)?;
        let so = self.slots[index].take();
        if let Some(so) = &so {
            log::debug!("sync object {} released", so.id);
        }
        so
    }

    /// Current raw values of every attached field, in attach order.
    pub fn snapshot(&self, id: u32, pool: &ObjectPool) -> Option<Vec<u32>> {
        let so = self.get(id)?;
        pool.get(so.object)?;
        so.fields
            .iter()
            .map(|f| pool.read_address(f.address, f.width))
            .collect()
    }
}
