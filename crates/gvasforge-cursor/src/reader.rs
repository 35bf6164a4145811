//! Forward-only reader over a byte slice.

use crate::CursorError;

/// Read cursor over a byte slice. All multi-byte reads are little-endian.
///
/// The save format never needs to seek: every field is read exactly once,
/// in order. The cursor only moves forward and every read is bounds-checked
/// before it touches the slice, so a truncated file fails fast with
/// [`CursorError::EndOfStream`] instead of panicking.
#[derive(Debug, Clone)]
pub struct Reader<'a> {
    data: &'a [u8],
    pos: usize,
}

impl<'a> Reader<'a> {
    pub fn new(data: &'a [u8]) -> Self {
        Self { data, pos: 0 }
    }

    /// Current byte offset from the start of the input.
    pub fn position(&self) -> usize {
        self.pos
    }

    /// Bytes left between the current position and the end of input.
    pub fn remaining(&self) -> usize {
        self.data.len().saturating_sub(self.pos)
    }

    /// Whether every byte has been consumed.
    pub fn is_at_end(&self) -> bool {
        self.pos >= self.data.len()
    }

    /// Reads `n` bytes without copying.
    pub fn read_bytes(&mut self, n: usize) -> Result<&'a [u8], CursorError> {
        self.ensure(n)?;
        let slice = &self.data[self.pos..self.pos + n];
        self.pos += n;
        Ok(slice)
    }

    /// Reads exactly `N` bytes into a fixed-size array (magic numbers, GUIDs).
    pub fn read_array<const N: usize>(&mut self) -> Result<[u8; N], CursorError> {
        let bytes = self.read_bytes(N)?;
        let mut out = [0u8; N];
        out.copy_from_slice(bytes);
        Ok(out)
    }

    pub fn read_u8(&mut self) -> Result<u8, CursorError> {
        self.ensure(1)?;
        let v = self.data[self.pos];
        self.pos += 1;
        Ok(v)
    }

    pub fn read_i8(&mut self) -> Result<i8, CursorError> {
        Ok(self.read_u8()? as i8)
    }

    pub fn read_u16(&mut self) -> Result<u16, CursorError> {
        Ok(u16::from_le_bytes(self.read_array()?))
    }

    pub fn read_i16(&mut self) -> Result<i16, CursorError> {
        Ok(i16::from_le_bytes(self.read_array()?))
    }

    pub fn read_u32(&mut self) -> Result<u32, CursorError> {
        Ok(u32::from_le_bytes(self.read_array()?))
    }

    pub fn read_i32(&mut self) -> Result<i32, CursorError> {
        Ok(i32::from_le_bytes(self.read_array()?))
    }

    pub fn read_u64(&mut self) -> Result<u64, CursorError> {
        Ok(u64::from_le_bytes(self.read_array()?))
    }

    pub fn read_i64(&mut self) -> Result<i64, CursorError> {
        Ok(i64::from_le_bytes(self.read_array()?))
    }

    pub fn read_f32(&mut self) -> Result<f32, CursorError> {
        Ok(f32::from_le_bytes(self.read_array()?))
    }

    pub fn read_f64(&mut self) -> Result<f64, CursorError> {
        Ok(f64::from_le_bytes(self.read_array()?))
    }

    /// Reads a 4-byte element count and checks it against the bytes left.
    ///
    /// `min_element_size` is the smallest number of bytes a single element
    /// can occupy. A count that could not possibly fit in the remaining
    /// input fails here, before anyone allocates a `Vec` for it.
    pub fn read_count(&mut self, min_element_size: usize) -> Result<usize, CursorError> {
        let offset = self.pos;
        let raw = self.read_i32()?;
        let count = usize::try_from(raw).map_err(|_| CursorError::InvalidLength {
            offset,
            length: raw,
        })?;
        let need = count.saturating_mul(min_element_size);
        if need > self.remaining() {
            return Err(CursorError::EndOfStream {
                offset: self.pos,
                need,
                have: self.remaining(),
            });
        }
        Ok(count)
    }

    fn ensure(&self, n: usize) -> Result<(), CursorError> {
        if n > self.remaining() {
            return Err(CursorError::EndOfStream {
                offset: self.pos,
                need: n,
                have: self.remaining(),
            });
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_reads_are_little_endian() {
        let data = [0x01, 0x02, 0x03, 0x04, 0x05, 0x06];
        let mut r = Reader::new(&data);
        assert_eq!(r.read_u16().unwrap(), 0x0201);
        assert_eq!(r.read_u32().unwrap(), 0x0605_0403);
        assert!(r.is_at_end());
    }

    #[test]
    fn test_signed_reads() {
        let data = [0xFF, 0xFE, 0xFF, 0xFF, 0xFF];
        let mut r = Reader::new(&data);
        assert_eq!(r.read_i8().unwrap(), -1);
        assert_eq!(r.read_i32().unwrap(), -2);
    }

    #[test]
    fn test_i64_and_floats() {
        let mut data = Vec::new();
        data.extend_from_slice(&(-7i64).to_le_bytes());
        data.extend_from_slice(&1.5f32.to_le_bytes());
        data.extend_from_slice(&(-0.25f64).to_le_bytes());

        let mut r = Reader::new(&data);
        assert_eq!(r.read_i64().unwrap(), -7);
        assert_eq!(r.read_f32().unwrap(), 1.5);
        assert_eq!(r.read_f64().unwrap(), -0.25);
    }

    #[test]
    fn test_read_past_end_is_end_of_stream() {
        let data = [0x01, 0x02, 0x03];
        let mut r = Reader::new(&data);
        r.read_u8().unwrap();

        match r.read_u32() {
            Err(CursorError::EndOfStream { offset, need, have }) => {
                assert_eq!(offset, 1);
                assert_eq!(need, 4);
                assert_eq!(have, 2);
            }
            other => panic!("expected EndOfStream, got {other:?}"),
        }
        // A failed read does not move the cursor.
        assert_eq!(r.position(), 1);
    }

    #[test]
    fn test_read_array_and_bytes() {
        let data = *b"GVAS\x01\x02";
        let mut r = Reader::new(&data);
        assert_eq!(&r.read_array::<4>().unwrap(), b"GVAS");
        assert_eq!(r.read_bytes(2).unwrap(), &[1, 2]);
        assert_eq!(r.remaining(), 0);
    }

    #[test]
    fn test_read_count_rejects_impossible_counts() {
        // Claims 1000 four-byte elements with only 4 bytes left.
        let mut data = 1000i32.to_le_bytes().to_vec();
        data.extend_from_slice(&[0; 4]);
        let mut r = Reader::new(&data);
        assert!(matches!(
            r.read_count(4),
            Err(CursorError::EndOfStream { .. })
        ));
    }

    #[test]
    fn test_read_count_rejects_negative_counts() {
        let data = (-1i32).to_le_bytes();
        let mut r = Reader::new(&data);
        assert!(matches!(
            r.read_count(1),
            Err(CursorError::InvalidLength { length: -1, .. })
        ));
    }
}
