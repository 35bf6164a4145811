//! Encoding nodes and node lists into a [`Writer`].
//!
//! Every content length is computed from the in-memory value before any of
//! the node is written, so an edited tree always encodes consistently.

use gvasforge_cursor::Writer;

use crate::{
    ArrayValue, EnumValue, FixedStruct, MapValue, Property, PropertyError, PropertyKind,
    PropertyList, PropertyValue, StructPayload, StructValue, DATE_TIME, NONE,
};

impl PropertyList {
    /// Writes every node followed by the `None` sentinel.
    ///
    /// # Errors
    /// On error the writer holds a partial list and should be discarded.
    pub fn write(&self, writer: &mut Writer) -> Result<(), PropertyError> {
        for property in self {
            property.write(writer)?;
        }
        writer.write_fstring(NONE)?;
        Ok(())
    }

    /// Encodes this list as a standalone sentinel-terminated byte run.
    pub fn to_bytes(&self) -> Result<Vec<u8>, PropertyError> {
        let mut writer = Writer::with_capacity(self.encoded_size());
        self.write(&mut writer)?;
        Ok(writer.into_bytes())
    }
}

impl Property {
    pub fn write(&self, writer: &mut Writer) -> Result<(), PropertyError> {
        if self.name == NONE {
            return Err(PropertyError::ReservedName {
                name: self.name.clone(),
            });
        }

        let content = self.value.content_size();
        let length = i32::try_from(content).map_err(|_| PropertyError::LengthOverflow {
            name: self.name.clone(),
            size: content,
        })?;

        writer.write_fstring(&self.name)?;
        writer.write_fstring(self.kind().tag())?;
        writer.write_i32(length);
        writer.write_i32(self.index);

        let start = write_header(&self.name, &self.value, writer)?;
        write_payload(&self.name, &self.value, writer)?;

        debug_assert_eq!(
            writer.position() - start,
            content,
            "content length of {:?} disagrees with bytes written",
            self.name
        );
        Ok(())
    }
}

/// Writes the kind framing and returns the offset where the payload begins.
fn write_header(name: &str, value: &PropertyValue, writer: &mut Writer) -> Result<usize, PropertyError> {
    match value {
        PropertyValue::Bool(b) => {
            writer.write_u8(u8::from(*b));
        }
        PropertyValue::Byte(e) | PropertyValue::Enum(e) => {
            writer.write_fstring(&e.enum_type)?;
        }
        PropertyValue::Int(_) | PropertyValue::Int64(_) | PropertyValue::Str(_) | PropertyValue::Name(_) => {}
        PropertyValue::Struct(s) => {
            check_struct_payload(name, s)?;
            writer.write_fstring(&s.type_name)?;
            writer.write_bytes(&s.guid);
        }
        PropertyValue::Map(m) => {
            for kind in [m.key_kind, m.value_kind] {
                if !kind.is_map_element() {
                    return Err(unsupported(name, PropertyKind::Str.tag(), kind.tag()));
                }
                writer.write_fstring(kind.tag())?;
            }
        }
        PropertyValue::Array(a) => {
            let kind = a.element_kind();
            if !kind.is_array_element() {
                return Err(unsupported(name, "an array element kind", kind.tag()));
            }
            writer.write_fstring(kind.tag())?;
        }
    }
    writer.write_u8(0);
    Ok(writer.position())
}

fn write_payload(name: &str, value: &PropertyValue, writer: &mut Writer) -> Result<(), PropertyError> {
    match value {
        PropertyValue::Bool(_) => {}
        PropertyValue::Byte(e) | PropertyValue::Enum(e) => write_enum(name, e, writer)?,
        PropertyValue::Int(n) => writer.write_i32(*n),
        PropertyValue::Int64(n) => writer.write_i64(*n),
        PropertyValue::Str(s) | PropertyValue::Name(s) => writer.write_fstring(s)?,
        PropertyValue::Struct(s) => match &s.payload {
            StructPayload::Fixed(FixedStruct::DateTime(ticks)) => writer.write_i64(*ticks),
            StructPayload::Fixed(FixedStruct::Raw(bytes)) => writer.write_bytes(bytes),
            StructPayload::Properties(list) => list.write(writer)?,
        },
        PropertyValue::Map(m) => write_map(name, m, writer)?,
        PropertyValue::Array(a) => write_array(name, a, writer)?,
    }
    Ok(())
}

/// The decoder picks a struct's payload grammar from its type name alone,
/// so a `DateTime` must hold ticks and ticks must be named `DateTime`.
fn check_struct_payload(name: &str, value: &StructValue) -> Result<(), PropertyError> {
    let found = match &value.payload {
        StructPayload::Properties(_) if value.type_name == DATE_TIME => "a property list",
        StructPayload::Fixed(FixedStruct::DateTime(_)) if value.type_name != DATE_TIME => {
            "DateTime ticks"
        }
        _ => return Ok(()),
    };
    Err(PropertyError::StructPayloadMismatch {
        name: name.to_string(),
        type_name: value.type_name.clone(),
        found: found.to_string(),
    })
}

fn write_enum(name: &str, value: &EnumValue, writer: &mut Writer) -> Result<(), PropertyError> {
    if value.is_raw() {
        let byte = value.raw_byte().ok_or_else(|| PropertyError::InvalidByteText {
            name: name.to_string(),
            text: value.value.clone(),
        })?;
        writer.write_u8(byte);
    } else {
        writer.write_fstring(&value.value)?;
    }
    Ok(())
}

fn write_map(name: &str, map: &MapValue, writer: &mut Writer) -> Result<(), PropertyError> {
    writer.write_i32(0);
    writer.write_len(map.entries.len())?;
    for (key, value) in &map.entries {
        write_element(name, map.key_kind, key, writer)?;
        write_element(name, map.value_kind, value, writer)?;
    }
    Ok(())
}

fn write_array(name: &str, array: &ArrayValue, writer: &mut Writer) -> Result<(), PropertyError> {
    writer.write_len(array.len())?;
    match array {
        ArrayValue::Int(values) => {
            for n in values {
                writer.write_i32(*n);
            }
        }
        ArrayValue::Byte(bytes) => writer.write_bytes(bytes),
        ArrayValue::Str(values) | ArrayValue::Name(values) => {
            for s in values {
                writer.write_fstring(s)?;
            }
        }
        ArrayValue::Explicit {
            element_kind,
            elements,
        } => {
            for element in elements {
                write_element(name, *element_kind, element, writer)?;
            }
        }
    }
    Ok(())
}

/// Writes one content-only element of an array or map.
fn write_element(
    name: &str,
    expected: PropertyKind,
    value: &PropertyValue,
    writer: &mut Writer,
) -> Result<(), PropertyError> {
    match value {
        _ if value.kind() != expected => {
            Err(unsupported(name, expected.tag(), &value.describe()))
        }
        PropertyValue::Int(n) => {
            writer.write_i32(*n);
            Ok(())
        }
        // Byte array elements are a raw run; a named enum cannot be one.
        PropertyValue::Byte(e) if e.is_raw() => write_enum(name, e, writer),
        PropertyValue::Str(s) | PropertyValue::Name(s) => Ok(writer.write_fstring(s)?),
        other => Err(unsupported(name, expected.tag(), &other.describe())),
    }
}

fn unsupported(name: &str, expected: &str, found: &str) -> PropertyError {
    PropertyError::ElementKindMismatch {
        name: name.to_string(),
        expected: expected.to_string(),
        found: found.to_string(),
    }
}
