//! Struct payload resolution.
//!
//! A struct node names its type (`"DateTime"`, `"CharacterSaveGameInfo"`,
//! ...) but not its layout. Most structs are generic: a property list ended
//! by the `None` sentinel. A few well-known types are instead a fixed run of
//! bytes. The [`StructRegistry`] decides which is which.
//!
//! Each fixed layout is a [`StructCodec`] registered under its type name.

use std::collections::BTreeMap;
use std::fmt;
use std::sync::Arc;

use gvasforge_cursor::Reader;

use crate::{FixedStruct, PropertyError};

/// Type name of the engine's timestamp struct.
pub const DATE_TIME: &str = "DateTime";

/// Decodes one fixed-layout struct payload.
pub trait StructCodec: Send + Sync + 'static {
    /// Reads exactly one payload from `reader`.
    ///
    /// # Errors
    /// Returns `PropertyError::Cursor` if the input runs out.
    fn decode(&self, reader: &mut Reader<'_>) -> Result<FixedStruct, PropertyError>;
}

// ---------------------------------------------------------------------------
// Built-in codecs
// ---------------------------------------------------------------------------

/// `DateTime`: one little-endian i64.
#[derive(Debug, Clone, Copy, Default)]
pub struct DateTimeCodec;

impl StructCodec for DateTimeCodec {
    fn decode(&self, reader: &mut Reader<'_>) -> Result<FixedStruct, PropertyError> {
        Ok(FixedStruct::DateTime(reader.read_i64()?))
    }
}

/// A fixed number of opaque bytes, decoded into [`FixedStruct::Raw`].
///
/// Useful for engine structs whose size is known but whose fields the
/// caller does not care about (`Guid` is 16 bytes, `Vector` 12).
#[derive(Debug, Clone, Copy)]
pub struct FixedSizeCodec {
    size: usize,
}

impl FixedSizeCodec {
    pub fn new(size: usize) -> Self {
        Self { size }
    }

    pub fn size(&self) -> usize {
        self.size
    }
}

impl StructCodec for FixedSizeCodec {
    fn decode(&self, reader: &mut Reader<'_>) -> Result<FixedStruct, PropertyError> {
        Ok(FixedStruct::Raw(reader.read_bytes(self.size)?.to_vec()))
    }
}

// ---------------------------------------------------------------------------
// StructRegistry
// ---------------------------------------------------------------------------

/// Maps struct type names to fixed-layout codecs.
///
/// Cloning is cheap (the codecs are behind `Arc`). The default registry
/// knows exactly one type, [`DATE_TIME`]; everything else decodes as a
/// generic property list.
#[derive(Clone)]
pub struct StructRegistry {
    codecs: BTreeMap<String, Arc<dyn StructCodec>>,
}

impl StructRegistry {
    /// A registry with no fixed layouts at all.
    pub fn empty() -> Self {
        Self {
            codecs: BTreeMap::new(),
        }
    }

    /// Registers `codec` for `type_name`, replacing any previous codec.
    pub fn register<C: StructCodec>(&mut self, type_name: impl Into<String>, codec: C) -> &mut Self {
        self.codecs.insert(type_name.into(), Arc::new(codec));
        self
    }

    /// Builder-style [`register`](Self::register).
    pub fn with<C: StructCodec>(mut self, type_name: impl Into<String>, codec: C) -> Self {
        self.register(type_name, codec);
        self
    }

    /// The codec for `type_name`, or `None` for generic structs.
    pub fn get(&self, type_name: &str) -> Option<&dyn StructCodec> {
        self.codecs.get(type_name).map(|codec| codec.as_ref())
    }

    pub fn contains(&self, type_name: &str) -> bool {
        self.codecs.contains_key(type_name)
    }

    /// Registered type names, in sorted order.
    pub fn type_names(&self) -> impl Iterator<Item = &str> {
        self.codecs.keys().map(String::as_str)
    }
}

impl Default for StructRegistry {
    fn default() -> Self {
        Self::empty().with(DATE_TIME, DateTimeCodec)
    }
}

impl fmt::Debug for StructRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_set().entries(self.type_names()).finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_registry_knows_only_date_time() {
        let registry = StructRegistry::default();
        assert!(registry.contains(DATE_TIME));
        assert!(!registry.contains("CharacterSaveGameInfo"));
        assert_eq!(registry.type_names().collect::<Vec<_>>(), vec![DATE_TIME]);
    }

    #[test]
    fn test_date_time_codec_reads_i64() {
        let bytes = 638_000_000_000_000_000i64.to_le_bytes();
        let mut reader = Reader::new(&bytes);
        let decoded = DateTimeCodec.decode(&mut reader).unwrap();
        assert_eq!(decoded, FixedStruct::DateTime(638_000_000_000_000_000));
        assert!(reader.is_at_end());
    }

    #[test]
    fn test_fixed_size_codec_reads_exact_run() {
        let bytes = [1u8, 2, 3, 4, 5];
        let mut reader = Reader::new(&bytes);
        let decoded = FixedSizeCodec::new(4).decode(&mut reader).unwrap();
        assert_eq!(decoded, FixedStruct::Raw(vec![1, 2, 3, 4]));
        assert_eq!(reader.remaining(), 1);
    }

    #[test]
    fn test_fixed_size_codec_truncated() {
        let bytes = [1u8, 2];
        let mut reader = Reader::new(&bytes);
        assert!(matches!(
            FixedSizeCodec::new(16).decode(&mut reader),
            Err(PropertyError::Cursor(_))
        ));
    }

    #[test]
    fn test_register_adds_and_replaces() {
        let mut registry = StructRegistry::empty();
        registry.register("Guid", FixedSizeCodec::new(16));
        assert!(registry.contains("Guid"));

        registry.register("Guid", FixedSizeCodec::new(4));
        let bytes = [0u8; 4];
        let mut reader = Reader::new(&bytes);
        let decoded = registry.get("Guid").unwrap().decode(&mut reader).unwrap();
        assert_eq!(decoded, FixedStruct::Raw(vec![0; 4]));
    }

    #[test]
    fn test_debug_lists_type_names() {
        let registry = StructRegistry::default().with("Vector", FixedSizeCodec::new(12));
        assert_eq!(format!("{registry:?}"), r#"{"DateTime", "Vector"}"#);
    }
}
