//! Reading a realistic field sequence through the public API.

use gvasforge_cursor::{fstring_size, CursorError, Reader, Writer};

/// Magic, a version, an engine version triple and a label.
fn header() -> Vec<u8> {
    let mut w = Writer::new();
    w.write_bytes(b"GVAS");
    w.write_i32(2);
    w.write_u16(4);
    w.write_u16(27);
    w.write_u16(2);
    w.write_fstring("++UE4+Release-4.27").unwrap();
    w.into_bytes()
}

#[test]
fn test_header_sequence() {
    let bytes = header();
    assert_eq!(bytes.len(), 4 + 4 + 6 + fstring_size("++UE4+Release-4.27"));

    let mut r = Reader::new(&bytes);
    assert_eq!(&r.read_array::<4>().unwrap(), b"GVAS");
    assert_eq!(r.read_i32().unwrap(), 2);
    let version = (r.read_u16().unwrap(), r.read_u16().unwrap(), r.read_u16().unwrap());
    assert_eq!(version, (4, 27, 2));
    assert_eq!(r.read_fstring().unwrap(), "++UE4+Release-4.27");
    assert!(r.is_at_end());
}

#[test]
fn test_every_truncation_is_end_of_stream() {
    let bytes = header();
    for end in 0..bytes.len() {
        let mut r = Reader::new(&bytes[..end]);
        let result = (|| -> Result<String, CursorError> {
            r.read_array::<4>()?;
            r.read_i32()?;
            r.read_u16()?;
            r.read_u16()?;
            r.read_u16()?;
            r.read_fstring()
        })();
        assert!(
            matches!(result, Err(CursorError::EndOfStream { .. })),
            "prefix of {end} bytes: {result:?}"
        );
    }
}

#[test]
fn test_errors_render_offsets_in_hex() {
    let data = (-5i32).to_le_bytes();
    let mut padded = vec![0u8; 16];
    padded.extend_from_slice(&data);
    let mut r = Reader::new(&padded);
    r.read_bytes(16).unwrap();
    let err = r.read_fstring().unwrap_err();
    assert_eq!(err.to_string(), "invalid length -5 at offset 0x10");
}
