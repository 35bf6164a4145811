//! [`PropertyList`]: the ordered node list used at the top of a save and
//! inside every generic struct.

use gvasforge_cursor::fstring_size;
use serde::{Deserialize, Serialize};

use crate::{
    ArrayValue, EnumValue, FixedStruct, MapValue, Property, PropertyError, PropertyKind,
    PropertyValue, StructPayload, StructValue, DATE_TIME, NONE,
};

/// An ordered list of properties.
///
/// On the wire the list is followed by a sentinel node named `None`; the
/// sentinel is written by the encoder and never stored here. Names are not
/// unique in general: lookups return the first match.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PropertyList {
    properties: Vec<Property>,
}

impl PropertyList {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.properties.len()
    }

    pub fn is_empty(&self) -> bool {
        self.properties.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Property> {
        self.properties.iter()
    }

    pub fn iter_mut(&mut self) -> std::slice::IterMut<'_, Property> {
        self.properties.iter_mut()
    }

    pub fn as_slice(&self) -> &[Property] {
        &self.properties
    }

    /// Encoded size of every node plus the trailing sentinel.
    pub fn encoded_size(&self) -> usize {
        self.properties
            .iter()
            .map(Property::encoded_size)
            .sum::<usize>()
            + fstring_size(NONE)
    }

    // -----------------------------------------------------------------------
    // Lookup
    // -----------------------------------------------------------------------

    /// The first property called `name`.
    pub fn get(&self, name: &str) -> Option<&Property> {
        self.properties.iter().find(|p| p.name == name)
    }

    pub fn get_mut(&mut self, name: &str) -> Option<&mut Property> {
        self.properties.iter_mut().find(|p| p.name == name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.get(name).is_some()
    }

    pub fn int(&self, name: &str) -> Result<i32, PropertyError> {
        self.typed(name, PropertyKind::Int.tag(), |v| match v {
            PropertyValue::Int(n) => Some(*n),
            _ => None,
        })
    }

    pub fn int64(&self, name: &str) -> Result<i64, PropertyError> {
        self.typed(name, PropertyKind::Int64.tag(), |v| match v {
            PropertyValue::Int64(n) => Some(*n),
            _ => None,
        })
    }

    pub fn bool(&self, name: &str) -> Result<bool, PropertyError> {
        self.typed(name, PropertyKind::Bool.tag(), |v| match v {
            PropertyValue::Bool(b) => Some(*b),
            _ => None,
        })
    }

    pub fn str(&self, name: &str) -> Result<&str, PropertyError> {
        self.typed(name, PropertyKind::Str.tag(), |v| match v {
            PropertyValue::Str(s) => Some(s.as_str()),
            _ => None,
        })
    }

    pub fn name(&self, name: &str) -> Result<&str, PropertyError> {
        self.typed(name, PropertyKind::Name.tag(), |v| match v {
            PropertyValue::Name(s) => Some(s.as_str()),
            _ => None,
        })
    }

    pub fn byte(&self, name: &str) -> Result<&EnumValue, PropertyError> {
        self.typed(name, PropertyKind::Byte.tag(), |v| match v {
            PropertyValue::Byte(e) => Some(e),
            _ => None,
        })
    }

    pub fn enum_value(&self, name: &str) -> Result<&EnumValue, PropertyError> {
        self.typed(name, PropertyKind::Enum.tag(), |v| match v {
            PropertyValue::Enum(e) => Some(e),
            _ => None,
        })
    }

    /// The bytes of an `ArrayProperty<ByteProperty>`.
    pub fn byte_array(&self, name: &str) -> Result<&[u8], PropertyError> {
        self.typed(name, BYTE_ARRAY, |v| match v {
            PropertyValue::Array(ArrayValue::Byte(bytes)) => Some(bytes.as_slice()),
            _ => None,
        })
    }

    /// Mutable access to a byte array, for replacing an embedded blob.
    pub fn byte_array_mut(&mut self, name: &str) -> Result<&mut Vec<u8>, PropertyError> {
        self.typed_mut(name, BYTE_ARRAY, |v| match v {
            PropertyValue::Array(ArrayValue::Byte(bytes)) => Some(bytes),
            _ => None,
        })
    }

    pub fn array(&self, name: &str) -> Result<&ArrayValue, PropertyError> {
        self.typed(name, PropertyKind::Array.tag(), |v| match v {
            PropertyValue::Array(a) => Some(a),
            _ => None,
        })
    }

    pub fn map(&self, name: &str) -> Result<&MapValue, PropertyError> {
        self.typed(name, PropertyKind::Map.tag(), |v| match v {
            PropertyValue::Map(m) => Some(m),
            _ => None,
        })
    }

    pub fn struct_value(&self, name: &str) -> Result<&StructValue, PropertyError> {
        self.typed(name, PropertyKind::Struct.tag(), |v| match v {
            PropertyValue::Struct(s) => Some(s),
            _ => None,
        })
    }

    /// The child list of a generic struct.
    pub fn properties(&self, name: &str) -> Result<&PropertyList, PropertyError> {
        self.typed(name, GENERIC_STRUCT, |v| match v {
            PropertyValue::Struct(StructValue {
                payload: StructPayload::Properties(list),
                ..
            }) => Some(list),
            _ => None,
        })
    }

    pub fn properties_mut(&mut self, name: &str) -> Result<&mut PropertyList, PropertyError> {
        self.typed_mut(name, GENERIC_STRUCT, |v| match v {
            PropertyValue::Struct(StructValue {
                payload: StructPayload::Properties(list),
                ..
            }) => Some(list),
            _ => None,
        })
    }

    /// The tick count of a `DateTime` struct.
    pub fn date_time(&self, name: &str) -> Result<i64, PropertyError> {
        self.typed(name, DATE_TIME_STRUCT, |v| match v {
            PropertyValue::Struct(StructValue {
                payload: StructPayload::Fixed(FixedStruct::DateTime(ticks)),
                ..
            }) => Some(*ticks),
            _ => None,
        })
    }

    /// Follows `path` through nested generic structs and returns the
    /// property named by its last segment.
    ///
    /// ```text
    /// ["SaveGameData", "CharacterInfo", "Level"]
    /// ```
    pub fn path(&self, path: &[&str]) -> Result<&Property, PropertyError> {
        let Some((last, parents)) = path.split_last() else {
            return Err(PropertyError::MissingField {
                name: String::new(),
            });
        };
        let mut list = self;
        for segment in parents {
            list = list.properties(segment)?;
        }
        list.get(last).ok_or_else(|| PropertyError::MissingField {
            name: path.join("."),
        })
    }

    fn typed<'a, T>(
        &'a self,
        name: &str,
        expected: &str,
        pick: impl FnOnce(&'a PropertyValue) -> Option<T>,
    ) -> Result<T, PropertyError> {
        let property = self.get(name).ok_or_else(|| missing(name))?;
        pick(&property.value).ok_or_else(|| PropertyError::WrongKind {
            name: name.to_string(),
            expected: expected.to_string(),
            found: property.value.describe(),
        })
    }

    fn typed_mut<'a, T>(
        &'a mut self,
        name: &str,
        expected: &str,
        pick: impl FnOnce(&'a mut PropertyValue) -> Option<T>,
    ) -> Result<T, PropertyError> {
        let property = self.get_mut(name).ok_or_else(|| missing(name))?;
        let found = property.value.describe();
        pick(&mut property.value).ok_or_else(|| PropertyError::WrongKind {
            name: name.to_string(),
            expected: expected.to_string(),
            found,
        })
    }

    // -----------------------------------------------------------------------
    // Traversal
    // -----------------------------------------------------------------------

    /// Visits every property depth-first in declared order, descending into
    /// generic structs. `depth` is 0 for this list's own properties.
    pub fn walk<F>(&self, mut visit: F)
    where
        F: FnMut(usize, &Property),
    {
        self.walk_at(0, &mut visit);
    }

    fn walk_at<F>(&self, depth: usize, visit: &mut F)
    where
        F: FnMut(usize, &Property),
    {
        for property in &self.properties {
            visit(depth, property);
            if let PropertyValue::Struct(StructValue {
                payload: StructPayload::Properties(children),
                ..
            }) = &property.value
            {
                children.walk_at(depth + 1, visit);
            }
        }
    }

    // -----------------------------------------------------------------------
    // Construction and editing
    // -----------------------------------------------------------------------

    pub fn push(&mut self, property: Property) -> &mut Self {
        self.properties.push(property);
        self
    }

    /// Replaces the first property with the same name, or appends.
    pub fn set(&mut self, property: Property) -> &mut Self {
        match self.get_mut(&property.name) {
            Some(existing) => *existing = property,
            None => self.properties.push(property),
        }
        self
    }

    /// Removes and returns the first property called `name`.
    pub fn remove(&mut self, name: &str) -> Option<Property> {
        let position = self.properties.iter().position(|p| p.name == name)?;
        Some(self.properties.remove(position))
    }

    pub fn add_int(&mut self, name: impl Into<String>, value: i32) -> &mut Self {
        self.push(Property::new(name, PropertyValue::Int(value)))
    }

    pub fn add_int64(&mut self, name: impl Into<String>, value: i64) -> &mut Self {
        self.push(Property::new(name, PropertyValue::Int64(value)))
    }

    pub fn add_bool(&mut self, name: impl Into<String>, value: bool) -> &mut Self {
        self.push(Property::new(name, PropertyValue::Bool(value)))
    }

    pub fn add_str(&mut self, name: impl Into<String>, value: impl Into<String>) -> &mut Self {
        self.push(Property::new(name, PropertyValue::Str(value.into())))
    }

    pub fn add_name(&mut self, name: impl Into<String>, value: impl Into<String>) -> &mut Self {
        self.push(Property::new(name, PropertyValue::Name(value.into())))
    }

    /// A raw byte with no enum type.
    pub fn add_byte(&mut self, name: impl Into<String>, value: i8) -> &mut Self {
        self.push(Property::new(name, PropertyValue::Byte(EnumValue::raw(value))))
    }

    pub fn add_enum(
        &mut self,
        name: impl Into<String>,
        enum_type: impl Into<String>,
        member: &str,
    ) -> &mut Self {
        let value = EnumValue::named(enum_type, member);
        self.push(Property::new(name, PropertyValue::Enum(value)))
    }

    pub fn add_byte_array(&mut self, name: impl Into<String>, bytes: Vec<u8>) -> &mut Self {
        self.push(Property::new(name, PropertyValue::Array(ArrayValue::Byte(bytes))))
    }

    pub fn add_str_array<I, S>(&mut self, name: impl Into<String>, values: I) -> &mut Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let values = values.into_iter().map(Into::into).collect();
        self.push(Property::new(name, PropertyValue::Array(ArrayValue::Str(values))))
    }

    pub fn add_name_array<I, S>(&mut self, name: impl Into<String>, values: I) -> &mut Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let values = values.into_iter().map(Into::into).collect();
        self.push(Property::new(name, PropertyValue::Array(ArrayValue::Name(values))))
    }

    /// A generic struct with a zero GUID.
    pub fn add_struct(
        &mut self,
        name: impl Into<String>,
        type_name: impl Into<String>,
        properties: PropertyList,
    ) -> &mut Self {
        let value = StructValue::generic(type_name, properties);
        self.push(Property::new(name, PropertyValue::Struct(value)))
    }

    pub fn add_date_time(&mut self, name: impl Into<String>, ticks: i64) -> &mut Self {
        let value = StructValue::fixed(DATE_TIME, FixedStruct::DateTime(ticks));
        self.push(Property::new(name, PropertyValue::Struct(value)))
    }
}

const BYTE_ARRAY: &str = "ArrayProperty<ByteProperty>";
const GENERIC_STRUCT: &str = "StructProperty<generic>";
const DATE_TIME_STRUCT: &str = "StructProperty<DateTime>";

fn missing(name: &str) -> PropertyError {
    PropertyError::MissingField {
        name: name.to_string(),
    }
}

impl From<Vec<Property>> for PropertyList {
    fn from(properties: Vec<Property>) -> Self {
        Self { properties }
    }
}

impl FromIterator<Property> for PropertyList {
    fn from_iter<I: IntoIterator<Item = Property>>(iter: I) -> Self {
        Self {
            properties: iter.into_iter().collect(),
        }
    }
}

impl IntoIterator for PropertyList {
    type Item = Property;
    type IntoIter = std::vec::IntoIter<Property>;

    fn into_iter(self) -> Self::IntoIter {
        self.properties.into_iter()
    }
}

impl<'a> IntoIterator for &'a PropertyList {
    type Item = &'a Property;
    type IntoIter = std::slice::Iter<'a, Property>;

    fn into_iter(self) -> Self::IntoIter {
        self.properties.iter()
    }
}
