//! Byte-level I/O for gvasforge.
//!
//! This crate is the bottom layer of the save codec. It knows how to move
//! little-endian integers, floats, raw byte runs and length-prefixed strings
//! in and out of a buffer, and nothing about what those bytes mean.
//!
//! - [`Reader`]: forward-only, bounds-checked reads from a `&[u8]`
//! - [`Writer`]: the mirror image, appending to a `Vec<u8>`
//! - [`fstring_size`]: encoded size of a length-prefixed string
//! - [`CursorError`]: what can go wrong at this layer
//!
//! # Architecture
//!
//! ```text
//! Cursor (bytes) → Property (nodes) → Save (envelope)
//! ```

mod error;
mod fstring;
mod reader;
mod writer;

pub use error::CursorError;
pub use fstring::fstring_size;
pub use reader::Reader;
pub use writer::Writer;
