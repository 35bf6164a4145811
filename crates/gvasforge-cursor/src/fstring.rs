//! Length-prefixed, null-terminated strings.
//!
//! ```text
//! ┌──────────────┬─────────────────────┬──────┐
//! │ i32 length N │ N - 1 bytes of text │ 0x00 │
//! └──────────────┴─────────────────────┴──────┘
//! ```
//!
//! `N` counts the terminator, so the empty string is `01 00 00 00 00`.
//! Every name, kind tag and string value in a save file uses this layout.

use crate::{CursorError, Reader, Writer};

/// Encoded size of `s` as a length-prefixed string: 4 + text bytes + 1.
///
/// Content-length fields are computed from this, so it must agree with
/// [`Writer::write_fstring`] byte for byte.
pub fn fstring_size(s: &str) -> usize {
    4 + s.len() + 1
}

impl Reader<'_> {
    /// Reads one length-prefixed string.
    ///
    /// The terminator byte is consumed but not checked; text is validated
    /// as UTF-8.
    pub fn read_fstring(&mut self) -> Result<String, CursorError> {
        let offset = self.position();
        let length = self.read_i32()?;
        if length < 1 {
            return Err(CursorError::InvalidLength { offset, length });
        }
        // `length >= 1` was checked above, so the cast cannot wrap.
        let text = self.read_bytes(length as usize - 1)?;
        self.read_u8()?;
        String::from_utf8(text.to_vec()).map_err(|source| CursorError::InvalidString { offset, source })
    }
}

impl Writer {
    /// Writes one length-prefixed string with `N = s.len() + 1`.
    pub fn write_fstring(&mut self, s: &str) -> Result<(), CursorError> {
        self.write_len(s.len() + 1)?;
        self.write_bytes(s.as_bytes());
        self.write_u8(0);
        Ok(())
    }
}
