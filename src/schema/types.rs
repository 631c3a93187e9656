//! Type identities and resolved field kinds
//!
//! A `TypeHandle` is the opaque identity the reflection seam hands to the
//! compiler: nothing more than the constructor name of the declared type.
//! Supported primitive names:
//! - String, Number, Date, Buffer, Boolean, ObjectId, Decimal128, Map

use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap};
use std::fmt;

/// Primitive types a field may resolve to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PrimitiveType {
    String,
    Number,
    Date,
    Buffer,
    Boolean,
    ObjectId,
    Decimal128,
    Map,
}

impl PrimitiveType {
    /// All supported primitives, in declaration order
    pub const ALL: [PrimitiveType; 8] = [
        PrimitiveType::String,
        PrimitiveType::Number,
        PrimitiveType::Date,
        PrimitiveType::Buffer,
        PrimitiveType::Boolean,
        PrimitiveType::ObjectId,
        PrimitiveType::Decimal128,
        PrimitiveType::Map,
    ];

    /// Returns the constructor name of this primitive
    pub fn name(&self) -> &'static str {
        match self {
            PrimitiveType::String => "String",
            PrimitiveType::Number => "Number",
            PrimitiveType::Date => "Date",
            PrimitiveType::Buffer => "Buffer",
            PrimitiveType::Boolean => "Boolean",
            PrimitiveType::ObjectId => "ObjectId",
            PrimitiveType::Decimal128 => "Decimal128",
            PrimitiveType::Map => "Map",
        }
    }

    /// Looks up a primitive by constructor name
    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|p| p.name() == name)
    }

    /// Whether string transforms apply
    pub fn is_textual(&self) -> bool {
        matches!(self, PrimitiveType::String)
    }

    /// Whether min/max bounds apply
    pub fn is_numeric_or_temporal(&self) -> bool {
        matches!(self, PrimitiveType::Number | PrimitiveType::Date)
    }
}

impl fmt::Display for PrimitiveType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Opaque type identity supplied by reflection or an explicit override.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TypeHandle {
    name: String,
}

impl TypeHandle {
    /// Constructor name reported for collection types
    pub const ARRAY: &'static str = "Array";

    /// Create a handle from a constructor name
    pub fn named(name: impl Into<String>) -> Self {
        Self { name: name.into() }
    }

    /// Handle for a collection whose element type was erased
    pub fn array() -> Self {
        Self::named(Self::ARRAY)
    }

    /// Handle for a reflectable Rust type
    pub fn of<T: Reflect + ?Sized>() -> Self {
        T::type_handle()
    }

    /// Returns the constructor name
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Whether this handle denotes a collection
    pub fn is_array(&self) -> bool {
        self.name == Self::ARRAY
    }
}

impl From<PrimitiveType> for TypeHandle {
    fn from(primitive: PrimitiveType) -> Self {
        Self::named(primitive.name())
    }
}

impl From<&str> for TypeHandle {
    fn from(name: &str) -> Self {
        Self::named(name)
    }
}

impl From<String> for TypeHandle {
    fn from(name: String) -> Self {
        Self::named(name)
    }
}

impl fmt::Display for TypeHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.name)
    }
}

/// Compile-time reflection: reports the declared type of a Rust value.
///
/// Entities implement this by returning their entity name, which is what
/// lets one entity's field point at another entity.
pub trait Reflect {
    fn type_handle() -> TypeHandle;
}

macro_rules! reflect_as {
    ($primitive:expr => $($ty:ty),+ $(,)?) => {
        $(
            impl Reflect for $ty {
                fn type_handle() -> TypeHandle {
                    TypeHandle::from($primitive)
                }
            }
        )+
    };
}

reflect_as!(PrimitiveType::String => String, str, char);
reflect_as!(PrimitiveType::Number => i8, i16, i32, i64, u8, u16, u32, u64, isize, usize, f32, f64);
reflect_as!(PrimitiveType::Boolean => bool);
reflect_as!(PrimitiveType::Date => chrono::NaiveDate, chrono::NaiveDateTime);

impl<Tz: chrono::TimeZone> Reflect for chrono::DateTime<Tz> {
    fn type_handle() -> TypeHandle {
        TypeHandle::from(PrimitiveType::Date)
    }
}

impl<T> Reflect for Vec<T> {
    fn type_handle() -> TypeHandle {
        TypeHandle::array()
    }
}

impl<T> Reflect for [T] {
    fn type_handle() -> TypeHandle {
        TypeHandle::array()
    }
}

impl<K, V, S> Reflect for HashMap<K, V, S> {
    fn type_handle() -> TypeHandle {
        TypeHandle::from(PrimitiveType::Map)
    }
}

impl<K, V> Reflect for BTreeMap<K, V> {
    fn type_handle() -> TypeHandle {
        TypeHandle::from(PrimitiveType::Map)
    }
}

impl<T: Reflect> Reflect for Option<T> {
    fn type_handle() -> TypeHandle {
        T::type_handle()
    }
}

impl<T: Reflect + ?Sized> Reflect for &T {
    fn type_handle() -> TypeHandle {
        T::type_handle()
    }
}

impl<T: Reflect + ?Sized> Reflect for Box<T> {
    fn type_handle() -> TypeHandle {
        T::type_handle()
    }
}

/// Semantic kind a field resolves to
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum ResolvedFieldKind {
    Primitive(PrimitiveType),
    ArrayOf(Box<ResolvedFieldKind>),
    ReferenceTo(String),
    EmbeddedEntity(String),
}

impl ResolvedFieldKind {
    /// Wraps this kind as the element type of an array
    pub fn into_array(self) -> Self {
        ResolvedFieldKind::ArrayOf(Box::new(self))
    }

    /// Returns the innermost non-array kind
    pub fn element(&self) -> &ResolvedFieldKind {
        match self {
            ResolvedFieldKind::ArrayOf(inner) => inner.element(),
            other => other,
        }
    }

    /// Whether this kind is an array
    pub fn is_array(&self) -> bool {
        matches!(self, ResolvedFieldKind::ArrayOf(_))
    }

    /// Returns the primitive at the element position, if any
    pub fn primitive(&self) -> Option<PrimitiveType> {
        match self.element() {
            ResolvedFieldKind::Primitive(p) => Some(*p),
            _ => None,
        }
    }
}

impl fmt::Display for ResolvedFieldKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ResolvedFieldKind::Primitive(p) => write!(f, "{}", p),
            ResolvedFieldKind::ArrayOf(inner) => write!(f, "[{}]", inner),
            ResolvedFieldKind::ReferenceTo(entity) => write!(f, "ref<{}>", entity),
            ResolvedFieldKind::EmbeddedEntity(entity) => write!(f, "embedded<{}>", entity),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{DateTime, Utc};

    #[test]
    fn test_primitive_names_round_trip() {
        for primitive in PrimitiveType::ALL {
            assert_eq!(PrimitiveType::from_name(primitive.name()), Some(primitive));
        }
        assert_eq!(PrimitiveType::from_name("Array"), None);
        assert_eq!(PrimitiveType::from_name("string"), None);
    }

    #[test]
    fn test_reflected_handles() {
        assert_eq!(TypeHandle::of::<String>().name(), "String");
        assert_eq!(TypeHandle::of::<u32>().name(), "Number");
        assert_eq!(TypeHandle::of::<bool>().name(), "Boolean");
        assert_eq!(TypeHandle::of::<DateTime<Utc>>().name(), "Date");
        assert_eq!(TypeHandle::of::<Option<f64>>().name(), "Number");
        assert!(TypeHandle::of::<Vec<String>>().is_array());
        assert_eq!(TypeHandle::of::<HashMap<String, i32>>().name(), "Map");
    }

    #[test]
    fn test_kind_element_and_display() {
        let kind = ResolvedFieldKind::Primitive(PrimitiveType::String).into_array();
        assert!(kind.is_array());
        assert_eq!(kind.primitive(), Some(PrimitiveType::String));
        assert_eq!(kind.to_string(), "[String]");

        let reference = ResolvedFieldKind::ReferenceTo("Author".into());
        assert_eq!(reference.primitive(), None);
        assert_eq!(reference.to_string(), "ref<Author>");
    }

    #[test]
    fn test_bounds_and_text_predicates() {
        assert!(PrimitiveType::String.is_textual());
        assert!(!PrimitiveType::Number.is_textual());
        assert!(PrimitiveType::Number.is_numeric_or_temporal());
        assert!(PrimitiveType::Date.is_numeric_or_temporal());
        assert!(!PrimitiveType::Decimal128.is_numeric_or_temporal());
        assert!(!PrimitiveType::Boolean.is_numeric_or_temporal());
    }
}
