//! Decode configuration.

use gvasforge_property::StructRegistry;
use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// MagicCheck
// ---------------------------------------------------------------------------

/// What to do when a file does not start with `GVAS`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum MagicCheck {
    /// Fail with [`EnvelopeError::InvalidMagic`](crate::EnvelopeError::InvalidMagic).
    #[default]
    Reject,
    /// Log a warning and keep decoding.
    Warn,
    /// Keep decoding silently.
    Ignore,
}

// ---------------------------------------------------------------------------
// EnvelopeConfig
// ---------------------------------------------------------------------------

/// Options for decoding a save envelope.
///
/// Encoding needs no options: it always writes exactly what the envelope
/// holds. The magic read under [`MagicCheck::Warn`] or
/// [`MagicCheck::Ignore`] is kept and written back unchanged.
#[derive(Debug, Clone)]
pub struct EnvelopeConfig {
    /// How strictly the magic is checked.
    pub magic_check: MagicCheck,

    /// Whether bytes after the trailer are tolerated (with a warning)
    /// instead of failing the decode.
    pub allow_trailing_bytes: bool,

    /// Fixed-layout struct types known to the decoder.
    pub registry: StructRegistry,
}

impl EnvelopeConfig {
    pub fn with_registry(mut self, registry: StructRegistry) -> Self {
        self.registry = registry;
        self
    }

    pub fn with_magic_check(mut self, magic_check: MagicCheck) -> Self {
        self.magic_check = magic_check;
        self
    }

    pub fn allow_trailing_bytes(mut self, allow: bool) -> Self {
        self.allow_trailing_bytes = allow;
        self
    }
}

impl Default for EnvelopeConfig {
    fn default() -> Self {
        Self {
            magic_check: MagicCheck::Reject,
            allow_trailing_bytes: false,
            registry: StructRegistry::default(),
        }
    }
}
