//! The property tree: nodes, leaf values and composite payloads.
//!
//! Every type here is plain owned data. Composite payloads (`Vec`s of
//! elements, entries or child properties) are exclusively owned by their
//! parent and can be edited in place; nothing caches a size, so an edited
//! tree re-encodes with correct length fields automatically.

use gvasforge_cursor::fstring_size;
use serde::{Deserialize, Serialize};

use crate::{PropertyKind, PropertyList, NONE};

/// Size of the opaque GUID carried by every struct node.
pub const GUID_SIZE: usize = 16;

/// Bytes a node spends on its content length and index fields.
const LENGTH_AND_INDEX: usize = 4 + 4;

/// The reserved byte written in front of every payload.
const RESERVED: usize = 1;

// ---------------------------------------------------------------------------
// Property
// ---------------------------------------------------------------------------

/// One named, typed node of the tree.
///
/// `index` is the array index the engine attaches to a property. It can be
/// sparse and is preserved verbatim; constructed nodes use 0.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Property {
    pub name: String,
    pub index: i32,
    pub value: PropertyValue,
}

impl Property {
    pub fn new(name: impl Into<String>, value: PropertyValue) -> Self {
        Self {
            name: name.into(),
            index: 0,
            value,
        }
    }

    pub fn with_index(mut self, index: i32) -> Self {
        self.index = index;
        self
    }

    pub fn kind(&self) -> PropertyKind {
        self.value.kind()
    }

    /// Total encoded size of this node, framing included.
    pub fn encoded_size(&self) -> usize {
        fstring_size(&self.name)
            + fstring_size(self.kind().tag())
            + LENGTH_AND_INDEX
            + self.value.header_size()
            + self.value.content_size()
    }
}

// ---------------------------------------------------------------------------
// PropertyValue
// ---------------------------------------------------------------------------

/// The payload of a node. The variant decides the wire kind tag.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum PropertyValue {
    Bool(bool),
    /// A byte, either raw (enum type `None`) or a named enum member.
    Byte(EnumValue),
    Enum(EnumValue),
    Int(i32),
    Int64(i64),
    Str(String),
    Name(String),
    Struct(StructValue),
    Map(MapValue),
    Array(ArrayValue),
}

impl PropertyValue {
    pub fn kind(&self) -> PropertyKind {
        match self {
            Self::Bool(_) => PropertyKind::Bool,
            Self::Byte(_) => PropertyKind::Byte,
            Self::Enum(_) => PropertyKind::Enum,
            Self::Int(_) => PropertyKind::Int,
            Self::Int64(_) => PropertyKind::Int64,
            Self::Str(_) => PropertyKind::Str,
            Self::Name(_) => PropertyKind::Name,
            Self::Struct(_) => PropertyKind::Struct,
            Self::Map(_) => PropertyKind::Map,
            Self::Array(_) => PropertyKind::Array,
        }
    }

    /// Size of the kind-specific framing between the index field and the
    /// payload: extra tags, the boolean value, and the reserved byte.
    pub fn header_size(&self) -> usize {
        match self {
            Self::Bool(_) => 1 + RESERVED,
            Self::Byte(e) | Self::Enum(e) => fstring_size(&e.enum_type) + RESERVED,
            Self::Int(_) | Self::Int64(_) | Self::Str(_) | Self::Name(_) => RESERVED,
            Self::Struct(s) => fstring_size(&s.type_name) + GUID_SIZE + RESERVED,
            Self::Map(m) => {
                fstring_size(m.key_kind.tag()) + fstring_size(m.value_kind.tag()) + RESERVED
            }
            Self::Array(a) => fstring_size(a.element_kind().tag()) + RESERVED,
        }
    }

    /// Size of the payload alone. This is the value written into a node's
    /// content length field.
    ///
    /// A boolean's value lives in its framing, so its payload is empty.
    pub fn content_size(&self) -> usize {
        match self {
            Self::Bool(_) => 0,
            Self::Byte(e) | Self::Enum(e) => e.content_size(),
            Self::Int(_) => 4,
            Self::Int64(_) => 8,
            Self::Str(s) | Self::Name(s) => fstring_size(s),
            Self::Struct(s) => s.payload.size(),
            Self::Map(m) => m.content_size(),
            Self::Array(a) => a.content_size(),
        }
    }

    /// Human-readable shape used in lookup errors, e.g.
    /// `ArrayProperty<ByteProperty>` or `StructProperty<DateTime>`.
    pub fn describe(&self) -> String {
        match self {
            Self::Struct(s) => format!("{}<{}>", PropertyKind::Struct, s.type_name),
            Self::Array(a) => format!("{}<{}>", PropertyKind::Array, a.element_kind()),
            Self::Map(m) => format!("{}<{}, {}>", PropertyKind::Map, m.key_kind, m.value_kind),
            other => other.kind().to_string(),
        }
    }
}

// ---------------------------------------------------------------------------
// EnumValue
// ---------------------------------------------------------------------------

/// Payload shared by byte and enum properties.
///
/// When `enum_type` is `"None"` the wire payload is one raw byte, kept here
/// as signed decimal text (`"3"`, `"-1"`) so it round-trips exactly.
/// Otherwise the payload is a string, conventionally `"Type::Member"`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EnumValue {
    pub enum_type: String,
    pub value: String,
}

impl EnumValue {
    /// A raw numeric value with no enum type.
    pub fn raw(value: i8) -> Self {
        Self {
            enum_type: NONE.to_string(),
            value: value.to_string(),
        }
    }

    /// A named member, stored as `"Type::Member"`.
    pub fn named(enum_type: impl Into<String>, member: &str) -> Self {
        let enum_type = enum_type.into();
        let value = format!("{enum_type}::{member}");
        Self { enum_type, value }
    }

    /// Whether the payload is a single raw byte.
    pub fn is_raw(&self) -> bool {
        self.enum_type == NONE
    }

    /// The member name after the first `::`, for named values.
    pub fn member(&self) -> Option<&str> {
        if self.is_raw() {
            return None;
        }
        self.value.split_once("::").map(|(_, member)| member)
    }

    /// Parses the decimal text of a raw value into the byte written on the
    /// wire. Accepts both signed (`-128..=-1`) and unsigned (`0..=255`) text.
    pub fn raw_byte(&self) -> Option<u8> {
        let n: i16 = self.value.parse().ok()?;
        match n {
            -128..=-1 => Some(n as i8 as u8),
            0..=255 => Some(n as u8),
            _ => None,
        }
    }

    pub fn content_size(&self) -> usize {
        if self.is_raw() {
            1
        } else {
            fstring_size(&self.value)
        }
    }
}

// ---------------------------------------------------------------------------
// StructValue
// ---------------------------------------------------------------------------

/// A struct node's type name, GUID and resolved payload.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StructValue {
    pub type_name: String,
    pub guid: [u8; GUID_SIZE],
    pub payload: StructPayload,
}

impl StructValue {
    /// A generic struct holding `properties`, with a zero GUID.
    pub fn generic(type_name: impl Into<String>, properties: PropertyList) -> Self {
        Self {
            type_name: type_name.into(),
            guid: [0; GUID_SIZE],
            payload: StructPayload::Properties(properties),
        }
    }

    /// A fixed-layout struct with a zero GUID.
    pub fn fixed(type_name: impl Into<String>, fixed: FixedStruct) -> Self {
        Self {
            type_name: type_name.into(),
            guid: [0; GUID_SIZE],
            payload: StructPayload::Fixed(fixed),
        }
    }
}

/// How a struct's payload is laid out.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum StructPayload {
    /// A well-known binary layout resolved through the struct registry.
    Fixed(FixedStruct),
    /// Any other struct: a sentinel-terminated property list.
    Properties(PropertyList),
}

impl StructPayload {
    pub fn size(&self) -> usize {
        match self {
            Self::Fixed(fixed) => fixed.size(),
            Self::Properties(list) => list.encoded_size(),
        }
    }
}

/// Payloads of fixed-layout structs.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum FixedStruct {
    /// `DateTime`: one little-endian i64 tick count.
    DateTime(i64),
    /// Any other registered fixed-size layout, kept as opaque bytes.
    Raw(Vec<u8>),
}

impl FixedStruct {
    pub fn size(&self) -> usize {
        match self {
            Self::DateTime(_) => 8,
            Self::Raw(bytes) => bytes.len(),
        }
    }
}

// ---------------------------------------------------------------------------
// MapValue
// ---------------------------------------------------------------------------

/// An ordered list of key/value pairs of one declared key and value kind.
///
/// Entries are a `Vec`, not a hash map: entry order is significant on the
/// wire and duplicate keys, if a file has them, must survive.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MapValue {
    pub key_kind: PropertyKind,
    pub value_kind: PropertyKind,
    pub entries: Vec<(PropertyValue, PropertyValue)>,
}

impl MapValue {
    /// A `StrProperty` → `StrProperty` map, the only shape the format uses.
    pub fn strings<I, K, V>(entries: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        Self {
            key_kind: PropertyKind::Str,
            value_kind: PropertyKind::Str,
            entries: entries
                .into_iter()
                .map(|(k, v)| (PropertyValue::Str(k.into()), PropertyValue::Str(v.into())))
                .collect(),
        }
    }

    /// Looks up the first entry whose key is the string `key`.
    pub fn get_str(&self, key: &str) -> Option<&PropertyValue> {
        self.entries.iter().find_map(|(k, v)| match k {
            PropertyValue::Str(s) if s == key => Some(v),
            _ => None,
        })
    }

    pub fn content_size(&self) -> usize {
        // Reserved int + entry count.
        8 + self
            .entries
            .iter()
            .map(|(k, v)| k.content_size() + v.content_size())
            .sum::<usize>()
    }
}

// ---------------------------------------------------------------------------
// ArrayValue
// ---------------------------------------------------------------------------

/// A homogeneous array.
///
/// Decoding always produces one of the typed variants. `Explicit` exists
/// for building arrays out of individual values; each element is written
/// content-only and must match `element_kind`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum ArrayValue {
    Int(Vec<i32>),
    Byte(Vec<u8>),
    Str(Vec<String>),
    Name(Vec<String>),
    Explicit {
        element_kind: PropertyKind,
        elements: Vec<PropertyValue>,
    },
}

impl ArrayValue {
    pub fn element_kind(&self) -> PropertyKind {
        match self {
            Self::Int(_) => PropertyKind::Int,
            Self::Byte(_) => PropertyKind::Byte,
            Self::Str(_) => PropertyKind::Str,
            Self::Name(_) => PropertyKind::Name,
            Self::Explicit { element_kind, .. } => *element_kind,
        }
    }

    pub fn len(&self) -> usize {
        match self {
            Self::Int(v) => v.len(),
            Self::Byte(v) => v.len(),
            Self::Str(v) | Self::Name(v) => v.len(),
            Self::Explicit { elements, .. } => elements.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn content_size(&self) -> usize {
        4 + match self {
            Self::Int(v) => 4 * v.len(),
            Self::Byte(v) => v.len(),
            Self::Str(v) | Self::Name(v) => v.iter().map(|s| fstring_size(s)).sum(),
            Self::Explicit { elements, .. } => elements.iter().map(PropertyValue::content_size).sum(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_leaf_content_sizes() {
        assert_eq!(PropertyValue::Bool(true).content_size(), 0);
        assert_eq!(PropertyValue::Int(1).content_size(), 4);
        assert_eq!(PropertyValue::Int64(1).content_size(), 8);
        assert_eq!(PropertyValue::Str("abc".into()).content_size(), 8);
        assert_eq!(PropertyValue::Name(String::new()).content_size(), 5);
        assert_eq!(PropertyValue::Byte(EnumValue::raw(3)).content_size(), 1);
        assert_eq!(
            PropertyValue::Enum(EnumValue::named("ESaveType", "Manual")).content_size(),
            fstring_size("ESaveType::Manual")
        );
    }

    #[test]
    fn test_composite_content_sizes() {
        let ints = ArrayValue::Int(vec![1, 2, 3]);
        assert_eq!(ints.content_size(), 4 + 12);

        let names = ArrayValue::Name(vec!["a".into(), "bc".into()]);
        assert_eq!(names.content_size(), 4 + 6 + 7);

        let map = MapValue::strings([("a", "b")]);
        assert_eq!(map.content_size(), 8 + 6 + 6);

        let date = StructPayload::Fixed(FixedStruct::DateTime(0));
        assert_eq!(date.size(), 8);

        // An empty generic struct is just the sentinel.
        let empty = StructPayload::Properties(PropertyList::new());
        assert_eq!(empty.size(), 9);
    }

    #[test]
    fn test_bool_node_encoded_size() {
        let p = Property::new("bIsUsed", PropertyValue::Bool(true));
        // name(12) + tag(17) + length/index(8) + value/reserved(2)
        assert_eq!(p.encoded_size(), 12 + 17 + 8 + 2);
    }

    #[test]
    fn test_raw_byte_parsing() {
        assert_eq!(EnumValue::raw(-1).raw_byte(), Some(0xFF));
        assert_eq!(EnumValue::raw(7).raw_byte(), Some(7));

        let unsigned = EnumValue {
            enum_type: NONE.into(),
            value: "200".into(),
        };
        assert_eq!(unsigned.raw_byte(), Some(200));

        let bad = EnumValue {
            enum_type: NONE.into(),
            value: "300".into(),
        };
        assert_eq!(bad.raw_byte(), None);
    }

    #[test]
    fn test_raw_byte_rejects_padded_text() {
        for text in [" 3", "3 ", "\t-1", "7\n"] {
            let padded = EnumValue {
                enum_type: NONE.into(),
                value: text.into(),
            };
            assert_eq!(padded.raw_byte(), None, "{text:?} parsed as a byte");
        }
    }

    #[test]
    fn test_named_enum_member() {
        let e = EnumValue::named("ESaveType", "Auto");
        assert_eq!(e.value, "ESaveType::Auto");
        assert_eq!(e.member(), Some("Auto"));
        assert!(!e.is_raw());
        assert_eq!(EnumValue::raw(1).member(), None);
    }

    #[test]
    fn test_describe() {
        let bytes = PropertyValue::Array(ArrayValue::Byte(vec![]));
        assert_eq!(bytes.describe(), "ArrayProperty<ByteProperty>");

        let date = PropertyValue::Struct(StructValue::fixed("DateTime", FixedStruct::DateTime(0)));
        assert_eq!(date.describe(), "StructProperty<DateTime>");

        assert_eq!(PropertyValue::Int(0).describe(), "IntProperty");
    }

    #[test]
    fn test_map_lookup_by_string_key() {
        let map = MapValue::strings([("a", "1"), ("b", "2"), ("a", "3")]);
        assert_eq!(map.get_str("a"), Some(&PropertyValue::Str("1".into())));
        assert_eq!(map.get_str("z"), None);
    }
}
