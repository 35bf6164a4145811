//! Decoding nodes and node lists from a [`Reader`].
//!
//! A node on the wire:
//!
//! ```text
//! ┌──────┬──────────┬────────────────┬───────┬────────────────┬─────────┐
//! │ name │ kind tag │ content length │ index │ kind framing   │ payload │
//! │ str  │ str      │ i32            │ i32   │ tags, reserved │ ...     │
//! └──────┴──────────┴────────────────┴───────┴────────────────┴─────────┘
//! ```
//!
//! A node whose name is `None` has nothing after the name and ends the list.
//! The content length covers the payload only and is checked against what
//! was actually decoded; any disagreement fails the whole list.
//!
//! Generic struct payloads nest a whole list. At most [`MAX_DEPTH`] of them
//! may be open at once; anything deeper fails with
//! [`NestingTooDeep`](PropertyError::NestingTooDeep).

use gvasforge_cursor::Reader;

use crate::{
    ArrayValue, EnumValue, MapValue, Property, PropertyError, PropertyKind, PropertyList,
    PropertyValue, StructPayload, StructRegistry, StructValue, NONE,
};

/// Smallest encoded length-prefixed string (the empty string).
const MIN_FSTRING: usize = 5;

/// Deepest nesting of generic struct payloads the decoder accepts. The top
/// level list is depth 0.
pub const MAX_DEPTH: usize = 64;

impl PropertyList {
    /// Decodes nodes until the `None` sentinel. The sentinel is consumed
    /// but not stored.
    ///
    /// # Errors
    /// Any node failing to decode fails the whole list; nothing decoded so
    /// far is returned.
    pub fn read(reader: &mut Reader<'_>, registry: &StructRegistry) -> Result<Self, PropertyError> {
        read_list(reader, registry, 0)
    }

    /// Decodes a standalone sentinel-terminated list with the default
    /// registry. Bytes after the sentinel are ignored.
    pub fn from_bytes(bytes: &[u8]) -> Result<Self, PropertyError> {
        Self::read(&mut Reader::new(bytes), &StructRegistry::default())
    }
}

impl Property {
    /// Decodes one node, or returns `Ok(None)` after reading the sentinel.
    pub fn read(reader: &mut Reader<'_>, registry: &StructRegistry) -> Result<Option<Self>, PropertyError> {
        read_property(reader, registry, 0)
    }
}

fn read_list(
    reader: &mut Reader<'_>,
    registry: &StructRegistry,
    depth: usize,
) -> Result<PropertyList, PropertyError> {
    let mut list = PropertyList::new();
    while let Some(property) = read_property(reader, registry, depth)? {
        list.push(property);
    }
    Ok(list)
}

/// Decodes one node of a list nested `depth` structs deep.
fn read_property(
    reader: &mut Reader<'_>,
    registry: &StructRegistry,
    depth: usize,
) -> Result<Option<Property>, PropertyError> {
    let offset = reader.position();
    let name = reader.read_fstring()?;
    if name == NONE {
        return Ok(None);
    }

    let tag_offset = reader.position();
    let tag = reader.read_fstring()?;
    let kind = PropertyKind::from_tag(&tag).ok_or_else(|| PropertyError::UnknownKind {
        tag: tag.clone(),
        offset: tag_offset,
    })?;
    let declared = reader.read_i32()?;
    let index = reader.read_i32()?;

    tracing::trace!(%name, %kind, offset, depth, declared, "decoding property");

    let (value, payload_start) = read_value(kind, reader, registry, depth)?;

    // Two independent checks: the bytes the payload actually consumed,
    // and the size the in-memory value will report when re-encoded.
    let consumed = reader.position() - payload_start;
    let computed = value.content_size();
    let matches_declared = |n: usize| usize::try_from(declared).is_ok_and(|d| d == n);
    if !matches_declared(consumed) || !matches_declared(computed) {
        return Err(PropertyError::SizeMismatch {
            name,
            kind: tag,
            declared,
            actual: if matches_declared(consumed) { computed } else { consumed },
            offset,
        });
    }

    Ok(Some(Property { name, index, value }))
}

/// Reads the kind framing and payload. Returns the value and the offset
/// where the payload (the part covered by the content length) started.
fn read_value(
    kind: PropertyKind,
    reader: &mut Reader<'_>,
    registry: &StructRegistry,
    depth: usize,
) -> Result<(PropertyValue, usize), PropertyError> {
    let value = match kind {
        PropertyKind::Bool => {
            let value = reader.read_u8()? != 0;
            skip_reserved(reader)?;
            return Ok((PropertyValue::Bool(value), reader.position()));
        }
        PropertyKind::Byte => PropertyValue::Byte(read_enum(reader)?),
        PropertyKind::Enum => PropertyValue::Enum(read_enum(reader)?),
        PropertyKind::Int => {
            skip_reserved(reader)?;
            PropertyValue::Int(reader.read_i32()?)
        }
        PropertyKind::Int64 => {
            skip_reserved(reader)?;
            PropertyValue::Int64(reader.read_i64()?)
        }
        PropertyKind::Str => {
            skip_reserved(reader)?;
            PropertyValue::Str(reader.read_fstring()?)
        }
        PropertyKind::Name => {
            skip_reserved(reader)?;
            PropertyValue::Name(reader.read_fstring()?)
        }
        PropertyKind::Struct => {
            let type_name = reader.read_fstring()?;
            let guid = reader.read_array()?;
            skip_reserved(reader)?;
            let start = reader.position();
            let payload = match registry.get(&type_name) {
                Some(codec) => StructPayload::Fixed(codec.decode(reader)?),
                None if depth >= MAX_DEPTH => {
                    return Err(PropertyError::NestingTooDeep {
                        depth: depth + 1,
                        offset: start,
                    });
                }
                None => StructPayload::Properties(read_list(reader, registry, depth + 1)?),
            };
            let value = StructValue {
                type_name,
                guid,
                payload,
            };
            return Ok((PropertyValue::Struct(value), start));
        }
        PropertyKind::Map => {
            let key_kind = read_element_kind(reader, PropertyKind::is_map_element)?;
            let value_kind = read_element_kind(reader, PropertyKind::is_map_element)?;
            skip_reserved(reader)?;
            let start = reader.position();
            let map = read_map(reader, key_kind, value_kind)?;
            return Ok((PropertyValue::Map(map), start));
        }
        PropertyKind::Array => {
            let element_kind = read_element_kind(reader, PropertyKind::is_array_element)?;
            skip_reserved(reader)?;
            let start = reader.position();
            let array = read_array(reader, element_kind)?;
            return Ok((PropertyValue::Array(array), start));
        }
    };

    // Every leaf except Bool reads its payload last, so the payload started
    // `content_size` bytes back.
    let start = reader.position() - value.content_size();
    Ok((value, start))
}

/// Byte and enum properties: enum type tag, reserved byte, then either a
/// raw byte (type `None`) or a string.
fn read_enum(reader: &mut Reader<'_>) -> Result<EnumValue, PropertyError> {
    let enum_type = reader.read_fstring()?;
    skip_reserved(reader)?;
    let value = if enum_type == NONE {
        reader.read_i8()?.to_string()
    } else {
        reader.read_fstring()?
    };
    Ok(EnumValue { enum_type, value })
}

fn read_map(
    reader: &mut Reader<'_>,
    key_kind: PropertyKind,
    value_kind: PropertyKind,
) -> Result<MapValue, PropertyError> {
    let reserved_offset = reader.position();
    let reserved = reader.read_i32()?;
    if reserved != 0 {
        tracing::warn!(
            offset = reserved_offset,
            reserved,
            "non-zero map reserved field will be written back as zero"
        );
    }

    let count = reader.read_count(2 * MIN_FSTRING)?;
    let mut entries = Vec::with_capacity(count);
    for _ in 0..count {
        let key = read_element(reader, key_kind)?;
        let value = read_element(reader, value_kind)?;
        entries.push((key, value));
    }

    Ok(MapValue {
        key_kind,
        value_kind,
        entries,
    })
}

/// Reads one content-only map element. Only string elements exist in the
/// format; other kinds were rejected when the map's kind tags were read.
fn read_element(reader: &mut Reader<'_>, kind: PropertyKind) -> Result<PropertyValue, PropertyError> {
    match kind {
        PropertyKind::Str => Ok(PropertyValue::Str(reader.read_fstring()?)),
        other => Err(PropertyError::UnsupportedElementKind {
            kind: other.tag().to_string(),
            offset: reader.position(),
        }),
    }
}

fn read_array(reader: &mut Reader<'_>, element_kind: PropertyKind) -> Result<ArrayValue, PropertyError> {
    let array = match element_kind {
        PropertyKind::Int => {
            let count = reader.read_count(4)?;
            let mut values = Vec::with_capacity(count);
            for _ in 0..count {
                values.push(reader.read_i32()?);
            }
            ArrayValue::Int(values)
        }
        PropertyKind::Byte => {
            let count = reader.read_count(1)?;
            ArrayValue::Byte(reader.read_bytes(count)?.to_vec())
        }
        PropertyKind::Str | PropertyKind::Name => {
            let count = reader.read_count(MIN_FSTRING)?;
            let mut values = Vec::with_capacity(count);
            for _ in 0..count {
                values.push(reader.read_fstring()?);
            }
            if element_kind == PropertyKind::Str {
                ArrayValue::Str(values)
            } else {
                ArrayValue::Name(values)
            }
        }
        other => {
            return Err(PropertyError::UnsupportedElementKind {
                kind: other.tag().to_string(),
                offset: reader.position(),
            });
        }
    };
    Ok(array)
}

/// Reads an element/key/value kind tag and checks it has a sub-grammar.
fn read_element_kind(
    reader: &mut Reader<'_>,
    supported: fn(PropertyKind) -> bool,
) -> Result<PropertyKind, PropertyError> {
    let offset = reader.position();
    let tag = reader.read_fstring()?;
    match PropertyKind::from_tag(&tag) {
        Some(kind) if supported(kind) => Ok(kind),
        _ => Err(PropertyError::UnsupportedElementKind { kind: tag, offset }),
    }
}

fn skip_reserved(reader: &mut Reader<'_>) -> Result<(), PropertyError> {
    let offset = reader.position();
    let reserved = reader.read_u8()?;
    if reserved != 0 {
        tracing::warn!(offset, reserved, "non-zero reserved byte will be written back as zero");
    }
    Ok(())
}
