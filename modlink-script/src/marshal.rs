//! Conversions between script values and native types.
//!
//! Pulling a value never panics and never aborts the caller: every failure is
//! a [`ConvertError`] the entry point turns into a diagnostic.

use std::any::type_name;

use modlink_core::{
    NativePtr, ObjectCategory, ObjectRef, PointerKind, TextureInfo, TextureRegistry,
};
use thiserror::Error;

use crate::variant::{Table, Variant};

#[derive(Debug, Error, Clone, PartialEq)]
pub enum ConvertError {
    #[error("expected {expected}, received {received}")]
    TypeMismatch {
        expected: &'static str,
        received: &'static str,
    },
    #[error("{value} does not fit in {target}")]
    OutOfRange { value: String, target: &'static str },
    #[error("expected {expected}, received {received}")]
    PointerKind {
        expected: &'static str,
        received: &'static str,
    },
    #[error("expected {expected}, received {received}")]
    Category {
        expected: &'static str,
        received: &'static str,
    },
    #[error("{0} reference is no longer valid")]
    Stale(&'static str),
    #[error("field '{field}': {source}")]
    Field {
        field: &'static str,
        source: Box<ConvertError>,
    },
}

impl ConvertError {
    pub fn mismatch(expected: &'static str, v: &Variant) -> Self {
        ConvertError::TypeMismatch {
            expected,
            received: v.type_name(),
        }
    }

    pub fn in_field(self, field: &'static str) -> Self {
        ConvertError::Field {
            field,
            source: Box::new(self),
        }
    }
}

/// Floating point targets of [`to_number`].
pub trait ScriptNumber: Sized {
    fn from_f64(v: f64) -> Option<Self>;
}

impl ScriptNumber for f64 {
    fn from_f64(v: f64) -> Option<Self> {
        v.is_finite().then_some(v)
    }
}

impl ScriptNumber for f32 {
    fn from_f64(v: f64) -> Option<Self> {
        (v.is_finite() && v.abs() <= f32::MAX as f64).then_some(v as f32)
    }
}

pub fn to_number<T: ScriptNumber>(v: &Variant) -> Result<T, ConvertError> {
    let f = match v {
        Variant::Int(i) => *i as f64,
        Variant::Float(f) => *f,
        _ => return Err(ConvertError::mismatch("number", v)),
    };
    T::from_f64(f).ok_or_else(|| ConvertError::OutOfRange {
        value: f.to_string(),
        target: type_name::<T>(),
    })
}

/// Floats are truncated toward zero. Values the target cannot hold fail
/// instead of wrapping.
pub fn to_integer<T: TryFrom<i64>>(v: &Variant) -> Result<T, ConvertError> {
    let out_of_range = |value: String| ConvertError::OutOfRange {
        value,
        target: type_name::<T>(),
    };
    let i = match v {
        Variant::Int(i) => *i,
        Variant::Float(f) => {
            let t = f.trunc();
            // i64::MAX as f64 rounds up to 2^63, which is already out of range
            if !t.is_finite() || t < i64::MIN as f64 || t >= i64::MAX as f64 {
                return Err(out_of_range(f.to_string()));
            }
            t as i64
        }
        _ => return Err(ConvertError::mismatch("integer", v)),
    };
    T::try_from(i).map_err(|_| out_of_range(i.to_string()))
}

pub fn to_boolean(v: &Variant) -> Result<bool, ConvertError> {
    match v {
        Variant::Bool(b) => Ok(*b),
        _ => Err(ConvertError::mismatch("boolean", v)),
    }
}

pub fn to_string(v: &Variant) -> Result<&str, ConvertError> {
    v.as_str().ok_or_else(|| ConvertError::mismatch("string", v))
}

pub fn to_table(v: &Variant) -> Result<&Table, ConvertError> {
    v.as_table().ok_or_else(|| ConvertError::mismatch("table", v))
}

pub fn to_pointer(v: &Variant, kind: PointerKind) -> Result<NativePtr, ConvertError> {
    match v {
        Variant::Pointer(p) if p.kind == kind => Ok(*p),
        Variant::Pointer(p) => Err(ConvertError::PointerKind {
            expected: kind.name(),
            received: p.kind.name(),
        }),
        _ => Err(ConvertError::mismatch(kind.name(), v)),
    }
}

pub fn to_object(v: &Variant, category: ObjectCategory) -> Result<ObjectRef, ConvertError> {
    match v {
        Variant::Object(o) if o.category == category => Ok(*o),
        Variant::Object(o) => Err(ConvertError::Category {
            expected: category.name(),
            received: o.category.name(),
        }),
        _ => Err(ConvertError::mismatch(category.name(), v)),
    }
}

/// Resolves opaque references of one record type.
pub trait RecordSource<T> {
    fn resolve(&self, r: ObjectRef) -> Option<T>;
}

impl RecordSource<TextureInfo> for TextureRegistry {
    fn resolve(&self, r: ObjectRef) -> Option<TextureInfo> {
        self.by_ref(r)
    }
}

/// A native record that crosses the boundary either as an opaque reference
/// or as a table keyed by its field names.
pub trait Composite: Sized {
    const CATEGORY: ObjectCategory;

    fn to_table(&self) -> Table;

    fn from_table(table: &Table) -> Result<Self, ConvertError>;

    fn to_variant(&self) -> Variant {
        Variant::Table(self.to_table())
    }

    fn from_variant(v: &Variant, source: &dyn RecordSource<Self>) -> Result<Self, ConvertError> {
        match v {
            Variant::Object(_) => {
                let r = to_object(v, Self::CATEGORY)?;
                source
                    .resolve(r)
                    .ok_or(ConvertError::Stale(Self::CATEGORY.name()))
            }
            Variant::Table(t) => Self::from_table(t),
            _ => Err(ConvertError::mismatch(Self::CATEGORY.name(), v)),
        }
    }
}

fn field<'a>(table: &'a Table, name: &str) -> &'a Variant {
    static NIL: Variant = Variant::Nil;
    table.get_str(name).unwrap_or(&NIL)
}

impl Composite for TextureInfo {
    const CATEGORY: ObjectCategory = ObjectCategory::TextureInfo;

    fn to_table(&self) -> Table {
        let mut t = Table::new();
        t.insert("texture", self.texture);
        t.insert("bitSize", self.bit_size);
        t.insert("width", self.width);
        t.insert("height", self.height);
        t
    }

    fn from_table(table: &Table) -> Result<Self, ConvertError> {
        Ok(TextureInfo {
            texture: to_pointer(field(table, "texture"), PointerKind::U8)
                .map_err(|e| e.in_field("texture"))?,
            bit_size: to_integer(field(table, "bitSize")).map_err(|e| e.in_field("bitSize"))?,
            width: to_integer(field(table, "width")).map_err(|e| e.in_field("width"))?,
            height: to_integer(field(table, "height")).map_err(|e| e.in_field("height"))?,
        })
    }
}
