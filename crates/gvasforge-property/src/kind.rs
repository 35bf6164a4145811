//! Property kinds and their wire tags.

use std::fmt;

use serde::{Deserialize, Serialize};

/// The name that ends a node list. Also the "no enum type" marker used by
/// byte and enum properties that carry a raw numeric value.
pub const NONE: &str = "None";

/// Every node kind the codec can decode.
///
/// On the wire a node's kind is a string tag like `"IntProperty"`. A tag
/// with no variant here is an
/// [`UnknownKind`](crate::PropertyError::UnknownKind) error.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PropertyKind {
    Bool,
    Byte,
    Enum,
    Int,
    Int64,
    Str,
    Name,
    Struct,
    Map,
    Array,
}

impl PropertyKind {
    pub const ALL: [Self; 10] = [
        Self::Bool,
        Self::Byte,
        Self::Enum,
        Self::Int,
        Self::Int64,
        Self::Str,
        Self::Name,
        Self::Struct,
        Self::Map,
        Self::Array,
    ];

    /// The wire tag for this kind.
    pub fn tag(self) -> &'static str {
        match self {
            Self::Bool => "BoolProperty",
            Self::Byte => "ByteProperty",
            Self::Enum => "EnumProperty",
            Self::Int => "IntProperty",
            Self::Int64 => "Int64Property",
            Self::Str => "StrProperty",
            Self::Name => "NameProperty",
            Self::Struct => "StructProperty",
            Self::Map => "MapProperty",
            Self::Array => "ArrayProperty",
        }
    }

    /// Looks up a kind by its wire tag. Tags are case-sensitive.
    pub fn from_tag(tag: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|kind| kind.tag() == tag)
    }

    /// Returns `true` for kinds that may appear as elements of an
    /// explicit array (each element written content-only).
    pub fn is_array_element(self) -> bool {
        matches!(self, Self::Int | Self::Byte | Self::Str | Self::Name)
    }

    /// Returns `true` for kinds that may appear as map keys or values.
    pub fn is_map_element(self) -> bool {
        matches!(self, Self::Str)
    }
}

impl fmt::Display for PropertyKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.tag())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_every_kind_round_trips_through_its_tag() {
        for kind in PropertyKind::ALL {
            assert_eq!(PropertyKind::from_tag(kind.tag()), Some(kind));
        }
    }

    #[test]
    fn test_unknown_tags_are_rejected() {
        assert_eq!(PropertyKind::from_tag("FooProperty"), None);
        assert_eq!(PropertyKind::from_tag("intproperty"), None);
        assert_eq!(PropertyKind::from_tag(NONE), None);
    }

    #[test]
    fn test_display_is_wire_tag() {
        assert_eq!(PropertyKind::Int64.to_string(), "Int64Property");
    }

    #[test]
    fn test_element_support() {
        assert!(PropertyKind::Str.is_map_element());
        assert!(!PropertyKind::Int.is_map_element());
        assert!(PropertyKind::Name.is_array_element());
        assert!(!PropertyKind::Struct.is_array_element());
    }
}
