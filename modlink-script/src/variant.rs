use std::collections::BTreeMap;
use std::fmt;

use modlink_core::{NativePtr, ObjectRef, PointerKind};
use serde::{Deserialize, Serialize};

/// Runtime-owned handle to a callable value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct FunctionRef(pub u32);

#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum TableKey {
    Int(i64),
    Str(String),
}

impl From<i64> for TableKey {
    fn from(value: i64) -> Self {
        TableKey::Int(value)
    }
}

impl From<&str> for TableKey {
    fn from(value: &str) -> Self {
        TableKey::Str(value.to_string())
    }
}

impl fmt::Display for TableKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TableKey::Int(i) => write!(f, "[{}]", i),
            TableKey::Str(s) => write!(f, "{}", s),
        }
    }
}

/// Script table. Iteration order is the key order, integers first.
#[derive(Debug, Default, Clone, PartialEq, Serialize, Deserialize)]
pub struct Table {
    entries: BTreeMap<TableKey, Variant>,
    next_index: i64,
}

impl Table {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append at the next integer index, starting at 0.
    pub fn push(&mut self, value: impl Into<Variant>) {
        self.entries.insert(TableKey::Int(self.next_index), value.into());
        self.next_index = self.next_index.saturating_add(1);
    }

    pub fn insert(&mut self, key: impl Into<TableKey>, value: impl Into<Variant>) {
        let key = key.into();
        if let TableKey::Int(i) = key {
            self.next_index = self.next_index.max(i.saturating_add(1));
        }
        self.entries.insert(key, value.into());
    }

    pub fn get(&self, key: &TableKey) -> Option<&Variant> {
        self.entries.get(key)
    }

    pub fn get_str(&self, key: &str) -> Option<&Variant> {
        self.entries.get(&TableKey::Str(key.to_string()))
    }

    pub fn get_int(&self, key: i64) -> Option<&Variant> {
        self.entries.get(&TableKey::Int(key))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&TableKey, &Variant)> {
        self.entries.iter()
    }

    pub fn values(&self) -> impl Iterator<Item = &Variant> {
        self.entries.values()
    }
}

impl<V: Into<Variant>> FromIterator<V> for Table {
    fn from_iter<I: IntoIterator<Item = V>>(iter: I) -> Self {
        let mut table = Table::new();
        for v in iter {
            table.push(v);
        }
        table
    }
}

/// A script value as seen by native code.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub enum Variant {
    #[default]
    Nil,
    Bool(bool),
    Int(i64),
    Float(f64),
    String(String),
    Pointer(NativePtr),
    Object(ObjectRef),
    Table(Table),
    Function(FunctionRef),
}

impl Variant {
    /// Push a native address. Null pointers cross as nil.
    pub fn pointer(kind: PointerKind, addr: u64) -> Self {
        if addr == 0 {
            Variant::Nil
        } else {
            Variant::Pointer(NativePtr::new(kind, addr))
        }
    }

    pub fn is_nil(&self) -> bool {
        matches!(self, Variant::Nil)
    }

    pub fn is_number(&self) -> bool {
        matches!(self, Variant::Int(_) | Variant::Float(_))
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Variant::String(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_table(&self) -> Option<&Table> {
        match self {
            Variant::Table(t) => Some(t),
            _ => None,
        }
    }

    pub fn as_function(&self) -> Option<FunctionRef> {
        match self {
            Variant::Function(f) => Some(*f),
            _ => None,
        }
    }

    pub fn type_name(&self) -> &'static str {
        match self {
            Variant::Nil => "nil",
            Variant::Bool(_) => "boolean",
            Variant::Int(_) => "integer",
            Variant::Float(_) => "number",
            Variant::String(_) => "string",
            Variant::Pointer(_) => "pointer",
            Variant::Object(_) => "object",
            Variant::Table(_) => "table",
            Variant::Function(_) => "function",
        }
    }
}

impl fmt::Display for Variant {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Variant::Nil => write!(f, "nil"),
            Variant::Bool(b) => write!(f, "{}", b),
            Variant::Int(v) => write!(f, "{}", v),
            Variant::Float(v) => write!(f, "{}", v),
            Variant::String(s) => write!(f, "{s:?}"),
            Variant::Pointer(p) => write!(f, "{}", p),
            Variant::Object(o) => write!(f, "{}", o),
            Variant::Table(t) => write!(f, "table(len={})", t.len()),
            Variant::Function(r) => write!(f, "function({})", r.0),
        }
    }
}

macro_rules! variant_from_int {
    ($($t:ty),*) => {
        $(impl From<$t> for Variant {
            fn from(value: $t) -> Self {
                Variant::Int(value as i64)
            }
        })*
    };
}

variant_from_int!(i8, i16, i32, i64, u8, u16, u32);

impl From<bool> for Variant {
    fn from(value: bool) -> Self {
        Variant::Bool(value)
    }
}

impl From<f32> for Variant {
    fn from(value: f32) -> Self {
        Variant::Float(value as f64)
    }
}

impl From<f64> for Variant {
    fn from(value: f64) -> Self {
        Variant::Float(value)
    }
}

impl From<String> for Variant {
    fn from(value: String) -> Self {
        Variant::String(value)
    }
}

impl From<&str> for Variant {
    fn from(value: &str) -> Self {
        Variant::String(value.to_string())
    }
}

impl From<NativePtr> for Variant {
    fn from(value: NativePtr) -> Self {
        Variant::Pointer(value)
    }
}

impl From<ObjectRef> for Variant {
    fn from(value: ObjectRef) -> Self {
        Variant::Object(value)
    }
}

impl From<Table> for Variant {
    fn from(value: Table) -> Self {
        Variant::Table(value)
    }
}

impl From<FunctionRef> for Variant {
    fn from(value: FunctionRef) -> Self {
        Variant::Function(value)
    }
}

impl<T: Into<Variant>> From<Option<T>> for Variant {
    fn from(value: Option<T>) -> Self {
        value.map_or(Variant::Nil, Into::into)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn push_is_zero_indexed() {
        let t: Table = [10u32, 20, 30].into_iter().collect();
        assert_eq!(t.get_int(0), Some(&Variant::Int(10)));
        assert_eq!(t.get_int(2), Some(&Variant::Int(30)));
        assert_eq!(t.get_int(3), None);
    }

    #[test]
    fn insert_moves_next_index_past_explicit_keys() {
        let mut t = Table::new();
        t.insert(4i64, "a");
        t.push("b");
        t.insert("name", true);
        assert_eq!(t.get_int(5), Some(&Variant::from("b")));
        assert_eq!(t.get_str("name"), Some(&Variant::Bool(true)));
        assert_eq!(t.len(), 3);
    }

    #[test]
    fn push_after_the_largest_key_does_not_overflow() {
        let mut t = Table::new();
        t.insert(i64::MAX, "last");
        t.push("a");
        t.push("b");
        assert_eq!(t.get_int(i64::MAX), Some(&Variant::from("b")));
        assert_eq!(t.len(), 1);
    }

    #[test]
    fn type_names() {
        assert_eq!(Variant::Nil.type_name(), "nil");
        assert_eq!(Variant::from(1.5f32).type_name(), "number");
        assert_eq!(Variant::from(None::<i32>), Variant::Nil);
        assert_eq!(Variant::pointer(PointerKind::U8, 0), Variant::Nil);
        assert_eq!(Variant::pointer(PointerKind::U8, 0x40).type_name(), "pointer");
    }
}
