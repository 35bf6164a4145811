//! Error types for the envelope layer.

use gvasforge_cursor::CursorError;
use gvasforge_property::PropertyError;

/// Errors that can occur while decoding or encoding a whole save.
#[derive(Debug, thiserror::Error)]
pub enum EnvelopeError {
    /// The property tree failed to decode or encode.
    #[error(transparent)]
    Property(#[from] PropertyError),

    /// A header field was truncated or malformed.
    #[error(transparent)]
    Cursor(#[from] CursorError),

    /// The first four bytes are not `GVAS`.
    #[error("invalid magic {found:02x?}, expected \"GVAS\"")]
    InvalidMagic { found: [u8; 4] },

    /// Input continues past the trailer.
    #[error("{remaining} unexpected bytes after the trailer at offset {offset:#x}")]
    TrailingBytes { offset: usize, remaining: usize },

    /// Reading the input or writing the output failed.
    #[error("i/o error: {0}")]
    Io(#[from] std::io::Error),
}
