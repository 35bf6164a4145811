//! Error types for the property layer.
//!
//! Decode errors carry the byte offset where the bad field starts; encode
//! errors carry the name of the property that could not be written. In both
//! directions an error aborts the whole operation: a cursor that has lost
//! its place inside a node list cannot be resynchronized.

use gvasforge_cursor::CursorError;

/// Errors that can occur while decoding, encoding or querying a property tree.
#[derive(Debug, thiserror::Error)]
pub enum PropertyError {
    /// A lower-level read or write failed (truncated input, bad string).
    #[error(transparent)]
    Cursor(#[from] CursorError),

    /// A node's kind tag is not one this codec knows.
    #[error("unknown property kind {tag:?} at offset {offset:#x}")]
    UnknownKind { tag: String, offset: usize },

    /// A node's declared content length disagrees with its decoded payload.
    #[error(
        "content length mismatch for {name:?} ({kind}) at offset {offset:#x}: declared {declared}, actual {actual}"
    )]
    SizeMismatch {
        name: String,
        kind: String,
        declared: i32,
        actual: usize,
        offset: usize,
    },

    /// Generic structs nested deeper than [`MAX_DEPTH`](crate::MAX_DEPTH).
    #[error("struct nesting depth {depth} at offset {offset:#x} exceeds the limit")]
    NestingTooDeep { depth: usize, offset: usize },

    /// An array element kind or map key/value kind that has no sub-grammar.
    #[error("unsupported element kind {kind:?} at offset {offset:#x}")]
    UnsupportedElementKind { kind: String, offset: usize },

    /// A name lookup found no property.
    #[error("property {name:?} not found")]
    MissingField { name: String },

    /// A name lookup found a property of a different kind than requested.
    #[error("property {name:?} is {found}, expected {expected}")]
    WrongKind {
        name: String,
        expected: String,
        found: String,
    },

    /// An array or map holds a value its declared element kind cannot encode.
    #[error("{name:?} declares {expected} elements but holds {found}")]
    ElementKindMismatch {
        name: String,
        expected: String,
        found: String,
    },

    /// A struct whose payload cannot be read back under its type name.
    #[error("{name:?} is a {type_name:?} struct but holds {found}")]
    StructPayloadMismatch {
        name: String,
        type_name: String,
        found: String,
    },

    /// A numeric byte/enum value whose text is not a single byte.
    #[error("{name:?} holds {text:?}, which is not a byte value")]
    InvalidByteText { name: String, text: String },

    /// A payload too large for the 4-byte content length field.
    #[error("{name:?} payload of {size} bytes does not fit a 32-bit length field")]
    LengthOverflow { name: String, size: usize },

    /// A property named like the list sentinel would end the list early.
    #[error("property name {name:?} is reserved for the list sentinel")]
    ReservedName { name: String },
}
