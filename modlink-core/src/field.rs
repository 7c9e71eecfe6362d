//! Field reflection: string identifiers mapped to typed offsets inside an
//! object's memory block.
//!
//! Built-in descriptors are static tables that never change. Mods may add
//! their own object fields through [`CustomFields`]; those resolve only after
//! the built-ins and can never shadow one.

use std::borrow::Cow;
use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::error::FieldError;
use crate::object::ObjectCategory;
use crate::pointer::PointerKind;
use crate::ModId;

/// Byte offset of the first raw-data slot (`oFlags`).
pub const RAW_DATA_OFFSET: u16 = 0x88;
/// Byte offset of the area reserved for mod-defined object fields.
pub const CUSTOM_FIELD_OFFSET: u16 = 0x1C8;
/// Number of 4-byte slots in the custom field area.
pub const CUSTOM_FIELD_SLOTS: usize = 12;

const fn raw(slot: u16) -> u16 {
    RAW_DATA_OFFSET + slot * 4
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ValueType {
    U8,
    U16,
    U32,
    S8,
    S16,
    S32,
    F32,
    Pointer(PointerKind),
    String,
    Object(ObjectCategory),
}

impl ValueType {
    /// Storage width for types that can be synchronized bit-for-bit.
    pub fn width_class(&self) -> Option<WidthClass> {
        match self {
            ValueType::U8 | ValueType::S8 => Some(WidthClass::W8),
            ValueType::U16 | ValueType::S16 => Some(WidthClass::W16),
            ValueType::U32 | ValueType::S32 | ValueType::F32 => Some(WidthClass::W32),
            _ => None,
        }
    }

    /// Parse the type tags scripts use when declaring custom fields.
    pub fn from_tag(tag: &str) -> Option<Self> {
        Some(match tag {
            "u8" => ValueType::U8,
            "u16" => ValueType::U16,
            "u32" => ValueType::U32,
            "s8" => ValueType::S8,
            "s16" => ValueType::S16,
            "s32" => ValueType::S32,
            "f32" => ValueType::F32,
            _ => return None,
        })
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum WidthClass {
    W8,
    W16,
    W32,
}

impl WidthClass {
    pub fn bits(&self) -> u8 {
        match self {
            WidthClass::W8 => 8,
            WidthClass::W16 => 16,
            WidthClass::W32 => 32,
        }
    }

    pub fn bytes(&self) -> usize {
        self.bits() as usize / 8
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct FieldDescriptor {
    pub identifier: Cow<'static, str>,
    pub value_type: ValueType,
    pub offset: u16,
}

impl FieldDescriptor {
    pub const fn builtin(identifier: &'static str, value_type: ValueType, offset: u16) -> Self {
        Self {
            identifier: Cow::Borrowed(identifier),
            value_type,
            offset,
        }
    }

    pub fn width(&self) -> Option<WidthClass> {
        self.value_type.width_class()
    }
}

macro_rules! fields {
    ($($id:literal => $ty:expr, $off:expr;)*) => {
        &[$(FieldDescriptor::builtin($id, $ty, $off)),*]
    };
}

pub static OBJECT_FIELDS: &[FieldDescriptor] = fields! {
    "parentObj" => ValueType::Object(ObjectCategory::Object), 0x68;
    "activeFlags" => ValueType::S16, 0x74;
    "numCollidedObjs" => ValueType::S16, 0x76;
    "oFlags" => ValueType::U32, raw(0x01);
    "oIntangibleTimer" => ValueType::S32, raw(0x05);
    "oPosX" => ValueType::F32, raw(0x06);
    "oPosY" => ValueType::F32, raw(0x07);
    "oPosZ" => ValueType::F32, raw(0x08);
    "oVelX" => ValueType::F32, raw(0x09);
    "oVelY" => ValueType::F32, raw(0x0A);
    "oVelZ" => ValueType::F32, raw(0x0B);
    "oForwardVel" => ValueType::F32, raw(0x0C);
    "oMoveAnglePitch" => ValueType::S32, raw(0x0F);
    "oMoveAngleYaw" => ValueType::S32, raw(0x10);
    "oMoveAngleRoll" => ValueType::S32, raw(0x11);
    "oFaceAnglePitch" => ValueType::S32, raw(0x12);
    "oFaceAngleYaw" => ValueType::S32, raw(0x13);
    "oFaceAngleRoll" => ValueType::S32, raw(0x14);
    "oGraphYOffset" => ValueType::F32, raw(0x15);
    "oGravity" => ValueType::F32, raw(0x17);
    "oBehParams2ndByte" => ValueType::S32, raw(0x2F);
    "oAction" => ValueType::S32, raw(0x31);
    "oSubAction" => ValueType::S32, raw(0x32);
    "oTimer" => ValueType::S32, raw(0x33);
    "oHealth" => ValueType::S32, raw(0x3E);
    "oBehParams" => ValueType::S32, raw(0x40);
    "oPrevAction" => ValueType::S32, raw(0x41);
    "oAnimState" => ValueType::S32, raw(0x4A);
    "oSyncID" => ValueType::U32, raw(0x4F);
    "hitboxRadius" => ValueType::F32, 0x1F8;
    "hitboxHeight" => ValueType::F32, 0x1FC;
    "behavior" => ValueType::Pointer(PointerKind::Behavior), 0x20C;
    "heldByPlayerIndex" => ValueType::U32, 0x214;
    "setHome" => ValueType::U8, 0x218;
    "ctx" => ValueType::U8, 0x219;
    "globalPlayerIndex" => ValueType::U8, 0x21A;
};

pub static TEXTURE_INFO_FIELDS: &[FieldDescriptor] = fields! {
    "texture" => ValueType::Pointer(PointerKind::U8), 0x0;
    "bitSize" => ValueType::U8, 0x8;
    "width" => ValueType::U32, 0xC;
    "height" => ValueType::U32, 0x10;
};

/// Offset of `oSyncID`, written by the sync registrar.
pub const SYNC_ID_OFFSET: u16 = raw(0x4F);

/// A secondary source of field descriptors consulted after the built-ins.
pub trait CustomFieldResolver {
    fn resolve(&self, category: ObjectCategory, identifier: &str) -> Option<FieldDescriptor>;
}

/// The built-in reflection tables.
#[derive(Debug, Default, Clone, Copy)]
pub struct FieldRegistry;

impl FieldRegistry {
    pub fn new() -> Self {
        Self
    }

    pub fn builtins(&self, category: ObjectCategory) -> &'static [FieldDescriptor] {
        match category {
            ObjectCategory::Object => OBJECT_FIELDS,
            ObjectCategory::TextureInfo => TEXTURE_INFO_FIELDS,
        }
    }

    pub fn builtin(&self, category: ObjectCategory, identifier: &str) -> Option<&'static FieldDescriptor> {
        self.builtins(category)
            .iter()
            .find(|d| d.identifier == identifier)
    }

    pub fn lookup(
        &self,
        category: ObjectCategory,
        identifier: &str,
        custom: Option<&dyn CustomFieldResolver>,
    ) -> Option<FieldDescriptor> {
        if let Some(desc) = self.builtin(category, identifier) {
            return Some(desc.clone());
        }
        custom.and_then(|c| c.resolve(category, identifier))
    }

    /// Like [`FieldRegistry::lookup`], but a descriptor whose width cannot be
    /// derived is reported the same as a missing one.
    pub fn lookup_sized(
        &self,
        category: ObjectCategory,
        identifier: &str,
        custom: Option<&dyn CustomFieldResolver>,
    ) -> Option<(FieldDescriptor, WidthClass)> {
        let desc = self.lookup(category, identifier, custom)?;
        let width = desc.width()?;
        Some((desc, width))
    }
}

/// Mod-defined object fields, allocated from the reserved custom area.
///
/// Every mod draws from the same slots, so no two live fields share an offset.
#[derive(Debug)]
pub struct CustomFields {
    per_mod: BTreeMap<ModId, Vec<FieldDescriptor>>,
    slots: Vec<Option<ModId>>,
}

impl Default for CustomFields {
    fn default() -> Self {
        Self::new(CUSTOM_FIELD_SLOTS)
    }
}

impl CustomFields {
    pub fn new(max_fields: usize) -> Self {
        Self {
            per_mod: BTreeMap::new(),
            slots: vec![None; max_fields.min(CUSTOM_FIELD_SLOTS)],
        }
    }

    /// Slots not held by any mod.
    pub fn free_slots(&self) -> usize {
        self.slots.iter().filter(|s| s.is_none()).count()
    }

    pub fn fields(&self, owner: ModId) -> &[FieldDescriptor] {
        self.per_mod.get(&owner).map(Vec::as_slice).unwrap_or(&[])
    }

    pub fn define(
        &mut self,
        owner: ModId,
        registry: &FieldRegistry,
        category: ObjectCategory,
        identifier: &str,
        value_type: ValueType,
    ) -> Result<FieldDescriptor, FieldError> {
        if category != ObjectCategory::Object {
            return Err(FieldError::NotExtensible(category.name()));
        }
        if !is_valid_identifier(identifier) {
            return Err(FieldError::InvalidIdentifier(identifier.to_string()));
        }
        if registry.builtin(category, identifier).is_some() {
            return Err(FieldError::ShadowsBuiltin(identifier.to_string()));
        }
        let width = value_type
            .width_class()
            .ok_or_else(|| FieldError::Unsized(identifier.to_string()))?;

        if self.fields(owner).iter().any(|d| d.identifier == identifier) {
            return Err(FieldError::Duplicate(identifier.to_string()));
        }
        let slot = self
            .slots
            .iter()
            .position(Option::is_none)
            .ok_or(FieldError::SlotsExhausted {
                limit: self.slots.len(),
            })?;
        self.slots[slot] = Some(owner);

        // one 4-byte slot per field regardless of width; narrower values sit in the low bytes
        let offset = CUSTOM_FIELD_OFFSET + (slot as u16) * 4;
        let desc = FieldDescriptor {
            identifier: Cow::Owned(identifier.to_string()),
            value_type,
            offset,
        };
        log::debug!(
            "custom field {} -> {:?} @0x{:X} ({} bits) for {:?}",
            identifier,
            value_type,
            offset,
            width.bits(),
            owner
        );
        self.per_mod.entry(owner).or_default().push(desc.clone());
        Ok(desc)
    }

    /// Resolver limited to one mod's fields. `None` resolves nothing.
    pub fn scoped(&self, owner: Option<ModId>) -> ScopedCustomFields<'_> {
        ScopedCustomFields { fields: self, owner }
    }

    /// Forget a mod's fields and give their slots back.
    pub fn clear_mod(&mut self, owner: ModId) {
        self.per_mod.remove(&owner);
        for slot in self.slots.iter_mut().filter(|s| **s == Some(owner)) {
            *slot = None;
        }
    }
}

pub struct ScopedCustomFields<'a> {
    fields: &'a CustomFields,
    owner: Option<ModId>,
}

impl CustomFieldResolver for ScopedCustomFields<'_> {
    fn resolve(&self, category: ObjectCategory, identifier: &str) -> Option<FieldDescriptor> {
        if category != ObjectCategory::Object {
            return None;
        }
        let owner = self.owner?;
        self.fields
            .fields(owner)
            .iter()
            .find(|d| d.identifier == identifier)
            .cloned()
    }
}

fn is_valid_identifier(identifier: &str) -> bool {
    identifier.len() > 1
        && identifier.starts_with('o')
        && identifier.chars().all(|c| c.is_ascii_alphanumeric() || c == '_')
}
