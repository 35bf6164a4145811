//! Unified error type for gvasforge.

use gvasforge_cursor::CursorError;
use gvasforge_property::PropertyError;
use gvasforge_save::EnvelopeError;

/// Top-level error that wraps every layer's error.
///
/// `#[from]` on each variant lets `?` lift a layer error into this one.
#[derive(Debug, thiserror::Error)]
pub enum GvasError {
    /// A byte-level read or write failed.
    #[error(transparent)]
    Cursor(#[from] CursorError),

    /// The property tree failed to decode, encode or answer a lookup.
    #[error(transparent)]
    Property(#[from] PropertyError),

    /// The envelope failed (magic, trailing bytes, stream I/O).
    #[error(transparent)]
    Envelope(#[from] EnvelopeError),

    /// Opening or creating a save file failed.
    #[error("i/o error: {0}")]
    Io(#[from] std::io::Error),
}
