//! # gvasforge
//!
//! Byte-exact reading and writing of Unreal Engine GVAS save files.
//!
//! A save decodes into a [`SaveEnvelope`] holding a tree of typed
//! properties. The tree can be inspected and edited in place; encoding it
//! again recomputes every length field, and an unedited tree encodes to
//! exactly the bytes it was read from.
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use gvasforge::prelude::*;
//!
//! # fn main() -> Result<(), GvasError> {
//! let mut save = gvasforge::read_file("Slot1.sav")?;
//! let level = save.game_data.path(&["CharacterInfo", "Level"])?;
//! println!("{}: {:?}", level.name, level.value);
//!
//! let db = blob(&save.game_data, EmbeddedBlob::Database)?.to_vec();
//! set_blob(&mut save.game_data, EmbeddedBlob::Database, db)?;
//! gvasforge::write_file("Slot1.sav", &save)?;
//! # Ok(())
//! # }
//! ```
//!
//! ## Crates
//!
//! - `gvasforge-cursor`: little-endian reader/writer and strings
//! - `gvasforge-property`: the property tree and its codec
//! - `gvasforge-save`: the file envelope
//! - `gvasforge` (this crate): one error type, file helpers, blobs

use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

mod blob;
mod error;

pub use blob::{blob, set_blob, EmbeddedBlob};
pub use error::GvasError;

pub use gvasforge_cursor as cursor;
pub use gvasforge_property as property;
pub use gvasforge_save as save;

pub use gvasforge_save::{EnvelopeConfig, MagicCheck, SaveEnvelope};

/// Decodes a complete save held in memory with the default config.
pub fn decode(bytes: &[u8]) -> Result<SaveEnvelope, GvasError> {
    decode_with(bytes, &EnvelopeConfig::default())
}

pub fn decode_with(bytes: &[u8], config: &EnvelopeConfig) -> Result<SaveEnvelope, GvasError> {
    Ok(SaveEnvelope::from_bytes(bytes, config)?)
}

pub fn encode(save: &SaveEnvelope) -> Result<Vec<u8>, GvasError> {
    Ok(save.to_bytes()?)
}

/// Reads and decodes the save at `path` with the default config.
pub fn read_file(path: impl AsRef<Path>) -> Result<SaveEnvelope, GvasError> {
    let path = path.as_ref();
    let bytes = std::fs::read(path)?;
    tracing::debug!(path = %path.display(), bytes = bytes.len(), "read save file");
    decode(&bytes)
}

/// Encodes `save` and writes it to `path`. The file is only created once
/// encoding has succeeded.
pub fn write_file(path: impl AsRef<Path>, save: &SaveEnvelope) -> Result<(), GvasError> {
    let bytes = encode(save)?;
    let mut file = BufWriter::new(File::create(path)?);
    file.write_all(&bytes)?;
    file.flush()?;
    Ok(())
}

/// Common imports for working with saves.
pub mod prelude {
    pub use crate::{blob, set_blob, EmbeddedBlob, EnvelopeConfig, GvasError, MagicCheck, SaveEnvelope};
    pub use gvasforge_property::{
        ArrayValue, EnumValue, FixedStruct, MapValue, Property, PropertyKind, PropertyList,
        PropertyValue, StructPayload, StructRegistry, StructValue,
    };
}
