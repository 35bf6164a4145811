//! Error types for the cursor layer.

/// Errors that can occur while reading or writing raw bytes.
///
/// Every variant carries the byte offset where the problem was found, so
/// a failed decode can be located in a hex dump without re-running it.
#[derive(Debug, thiserror::Error)]
pub enum CursorError {
    /// The input ran out before a read could complete.
    #[error("unexpected end of stream at offset {offset:#x} (need {need} bytes, have {have})")]
    EndOfStream {
        offset: usize,
        need: usize,
        have: usize,
    },

    /// A string length below 1 or a negative element count.
    ///
    /// A string length always counts the trailing terminator, so even the
    /// empty string is encoded with a length of 1.
    #[error("invalid length {length} at offset {offset:#x}")]
    InvalidLength { offset: usize, length: i32 },

    /// A length-prefixed string's text is not valid UTF-8.
    #[error("string at offset {offset:#x} is not valid UTF-8: {source}")]
    InvalidString {
        offset: usize,
        #[source]
        source: std::string::FromUtf8Error,
    },

    /// A length to be written does not fit in the 4-byte signed field.
    #[error("length {length} does not fit in a 32-bit length field")]
    LengthOverflow { length: usize },
}
