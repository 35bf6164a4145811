//! The save envelope: fixed header fields, the property tree, a trailer.
//!
//! ```text
//! "GVAS"                      4 bytes
//! save version                i32
//! reserved                    i32
//! engine version              u16 major, u16 minor, u16 patch
//! reserved                    i32
//! build metadata              str label, i32 reserved, i32 count,
//!                             count × (16-byte id, i32 value)
//! game data path              str
//! game data                   node list ending in "None"
//! trailer                     i32
//! ```
//!
//! Everything the envelope does not interpret is kept verbatim, so an
//! unmodified envelope re-encodes to the exact input bytes.

use std::fmt;
use std::io::{Read, Write};

use gvasforge_cursor::{fstring_size, Reader, Writer};
use gvasforge_property::PropertyList;
use serde::{Deserialize, Serialize};

use crate::{EnvelopeConfig, EnvelopeError, MagicCheck};

/// Size of a build metadata entry id.
pub const BUILD_ID_SIZE: usize = 16;

// ---------------------------------------------------------------------------
// Header parts
// ---------------------------------------------------------------------------

/// Engine version the save was written by.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct EngineVersion {
    pub major: u16,
    pub minor: u16,
    pub patch: u16,
}

impl fmt::Display for EngineVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}.{}", self.major, self.minor, self.patch)
    }
}

/// Build metadata written by the game's build system. Never interpreted.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BuildMetadata {
    pub label: String,
    pub reserved: i32,
    pub entries: Vec<BuildEntry>,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BuildEntry {
    pub id: [u8; BUILD_ID_SIZE],
    pub value: i32,
}

impl BuildMetadata {
    fn read(reader: &mut Reader<'_>) -> Result<Self, EnvelopeError> {
        let label = reader.read_fstring()?;
        let reserved = reader.read_i32()?;
        let count = reader.read_count(BUILD_ID_SIZE + 4)?;
        let mut entries = Vec::with_capacity(count);
        for _ in 0..count {
            let id = reader.read_array()?;
            let value = reader.read_i32()?;
            entries.push(BuildEntry { id, value });
        }
        Ok(Self {
            label,
            reserved,
            entries,
        })
    }

    fn write(&self, writer: &mut Writer) -> Result<(), EnvelopeError> {
        writer.write_fstring(&self.label)?;
        writer.write_i32(self.reserved);
        writer.write_len(self.entries.len())?;
        for entry in &self.entries {
            writer.write_bytes(&entry.id);
            writer.write_i32(entry.value);
        }
        Ok(())
    }

    fn encoded_size(&self) -> usize {
        fstring_size(&self.label) + 4 + 4 + self.entries.len() * (BUILD_ID_SIZE + 4)
    }
}

// ---------------------------------------------------------------------------
// SaveEnvelope
// ---------------------------------------------------------------------------

/// A whole save file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SaveEnvelope {
    pub magic: [u8; 4],
    pub save_version: i32,
    pub reserved_0: i32,
    pub engine_version: EngineVersion,
    pub reserved_1: i32,
    pub build: BuildMetadata,
    pub game_data_path: String,
    pub game_data: PropertyList,
    pub trailer: i32,
}

impl SaveEnvelope {
    pub const MAGIC: [u8; 4] = *b"GVAS";

    /// A fresh envelope around `game_data`. Every header field other than
    /// the magic and the path is zero or empty.
    pub fn new(game_data_path: impl Into<String>, game_data: PropertyList) -> Self {
        Self {
            magic: Self::MAGIC,
            save_version: 0,
            reserved_0: 0,
            engine_version: EngineVersion::default(),
            reserved_1: 0,
            build: BuildMetadata::default(),
            game_data_path: game_data_path.into(),
            game_data,
            trailer: 0,
        }
    }

    /// Total encoded size in bytes.
    pub fn encoded_size(&self) -> usize {
        Self::MAGIC.len()
            + 4
            + 4
            + 6
            + 4
            + self.build.encoded_size()
            + fstring_size(&self.game_data_path)
            + self.game_data.encoded_size()
            + 4
    }

    // -----------------------------------------------------------------------
    // Decode
    // -----------------------------------------------------------------------

    /// Decodes one envelope from the reader's current position. Whatever
    /// follows the trailer is left unread.
    pub fn read(reader: &mut Reader<'_>, config: &EnvelopeConfig) -> Result<Self, EnvelopeError> {
        let magic = reader.read_array()?;
        if magic != Self::MAGIC {
            match config.magic_check {
                MagicCheck::Reject => return Err(EnvelopeError::InvalidMagic { found: magic }),
                MagicCheck::Warn => {
                    tracing::warn!(found = ?magic, "unexpected magic, decoding anyway");
                }
                MagicCheck::Ignore => {}
            }
        }

        let save_version = reader.read_i32()?;
        let reserved_0 = reader.read_i32()?;
        let engine_version = EngineVersion {
            major: reader.read_u16()?,
            minor: reader.read_u16()?,
            patch: reader.read_u16()?,
        };
        let reserved_1 = reader.read_i32()?;
        let build = BuildMetadata::read(reader)?;
        let game_data_path = reader.read_fstring()?;
        let game_data = PropertyList::read(reader, &config.registry)?;
        let trailer = reader.read_i32()?;

        tracing::debug!(
            save_version,
            %engine_version,
            path = %game_data_path,
            nodes = game_data.len(),
            bytes = reader.position(),
            "decoded save envelope"
        );

        Ok(Self {
            magic,
            save_version,
            reserved_0,
            engine_version,
            reserved_1,
            build,
            game_data_path,
            game_data,
            trailer,
        })
    }

    /// Decodes a complete file held in memory.
    ///
    /// # Errors
    /// Besides decode errors, fails with [`EnvelopeError::TrailingBytes`]
    /// if input remains after the trailer and the config does not allow it.
    pub fn from_bytes(bytes: &[u8], config: &EnvelopeConfig) -> Result<Self, EnvelopeError> {
        let mut reader = Reader::new(bytes);
        let envelope = Self::read(&mut reader, config)?;

        if !reader.is_at_end() {
            let offset = reader.position();
            let remaining = reader.remaining();
            if !config.allow_trailing_bytes {
                return Err(EnvelopeError::TrailingBytes { offset, remaining });
            }
            tracing::warn!(offset, remaining, "ignoring bytes after the trailer");
        }

        Ok(envelope)
    }

    /// Reads `source` to the end and decodes it as one file.
    pub fn read_from<R: Read>(mut source: R, config: &EnvelopeConfig) -> Result<Self, EnvelopeError> {
        let mut bytes = Vec::new();
        source.read_to_end(&mut bytes)?;
        Self::from_bytes(&bytes, config)
    }

    // -----------------------------------------------------------------------
    // Encode
    // -----------------------------------------------------------------------

    pub fn write(&self, writer: &mut Writer) -> Result<(), EnvelopeError> {
        writer.write_bytes(&self.magic);
        writer.write_i32(self.save_version);
        writer.write_i32(self.reserved_0);
        writer.write_u16(self.engine_version.major);
        writer.write_u16(self.engine_version.minor);
        writer.write_u16(self.engine_version.patch);
        writer.write_i32(self.reserved_1);
        self.build.write(writer)?;
        writer.write_fstring(&self.game_data_path)?;
        self.game_data.write(writer)?;
        writer.write_i32(self.trailer);
        Ok(())
    }

    pub fn to_bytes(&self) -> Result<Vec<u8>, EnvelopeError> {
        let mut writer = Writer::with_capacity(self.encoded_size());
        self.write(&mut writer)?;

        tracing::debug!(
            save_version = self.save_version,
            nodes = self.game_data.len(),
            bytes = writer.position(),
            "encoded save envelope"
        );

        Ok(writer.into_bytes())
    }

    /// Encodes the whole file, then writes it to `sink` in one call.
    /// Nothing is written if encoding fails.
    pub fn write_to<W: Write>(&self, mut sink: W) -> Result<(), EnvelopeError> {
        let bytes = self.to_bytes()?;
        sink.write_all(&bytes)?;
        sink.flush()?;
        Ok(())
    }
}
