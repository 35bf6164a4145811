//! Whole-file tests against a save built byte by byte.

use gvasforge_cursor::Writer;
use gvasforge_property::{PropertyError, PropertyValue};
use gvasforge_save::{EnvelopeConfig, EnvelopeError, SaveEnvelope};

// =========================================================================
// Fixture
// =========================================================================

fn fstring(w: &mut Writer, s: &str) {
    w.write_fstring(s).unwrap();
}

/// Writes a node header: name, tag, content length, index.
fn node(w: &mut Writer, name: &str, tag: &str, length: i32) {
    fstring(w, name);
    fstring(w, tag);
    w.write_i32(length);
    w.write_i32(0);
}

/// A small but complete save: every header field set to something
/// recognisable, and a tree with a nested struct, a timestamp, a map and
/// an embedded blob.
fn save_file() -> Vec<u8> {
    let mut w = Writer::new();

    // Header.
    w.write_bytes(b"GVAS");
    w.write_i32(2);
    w.write_i32(517);
    w.write_u16(4);
    w.write_u16(27);
    w.write_u16(2);
    w.write_i32(0x1234);
    fstring(&mut w, "++UE4+Release-4.27");
    w.write_i32(3);
    w.write_i32(2);
    for (id, value) in [(0x01u8, 10), (0x02u8, 20)] {
        w.write_bytes(&[id; 16]);
        w.write_i32(value);
    }
    fstring(&mut w, "/Script/Phoenix.SaveGameData");

    // bIsUsed: bool true.
    node(&mut w, "bIsUsed", "BoolProperty", 0);
    w.write_u8(1);
    w.write_u8(0);

    // CharacterInfo: generic struct { Level: 7, SaveTime: DateTime }.
    let mut inner = Writer::new();
    node(&mut inner, "Level", "IntProperty", 4);
    inner.write_u8(0);
    inner.write_i32(7);
    node(&mut inner, "SaveTime", "StructProperty", 8);
    fstring(&mut inner, "DateTime");
    inner.write_bytes(&[0; 16]);
    inner.write_u8(0);
    inner.write_i64(638_000_000_000_000_000);
    fstring(&mut inner, "None");
    let inner = inner.into_bytes();

    node(&mut w, "CharacterInfo", "StructProperty", inner.len() as i32);
    fstring(&mut w, "CharacterSaveGameInfo");
    w.write_bytes(&[0x5A; 16]);
    w.write_u8(0);
    w.write_bytes(&inner);

    // Flags: map { "a": "b" }.
    node(&mut w, "Flags", "MapProperty", 8 + 6 + 6);
    fstring(&mut w, "StrProperty");
    fstring(&mut w, "StrProperty");
    w.write_u8(0);
    w.write_i32(0);
    w.write_i32(1);
    fstring(&mut w, "a");
    fstring(&mut w, "b");

    // RawDatabaseImage: byte array.
    node(&mut w, "RawDatabaseImage", "ArrayProperty", 4 + 5);
    fstring(&mut w, "ByteProperty");
    w.write_u8(0);
    w.write_i32(5);
    w.write_bytes(b"SQLit");

    fstring(&mut w, "None");
    w.write_i32(0);
    w.into_bytes()
}

fn decode(bytes: &[u8]) -> Result<SaveEnvelope, EnvelopeError> {
    SaveEnvelope::from_bytes(bytes, &EnvelopeConfig::default())
}

// =========================================================================
// Round trip
// =========================================================================

#[test]
fn test_whole_file_round_trip_is_byte_exact() {
    let bytes = save_file();
    let envelope = decode(&bytes).unwrap();
    assert_eq!(envelope.to_bytes().unwrap(), bytes);
    assert_eq!(envelope.encoded_size(), bytes.len());
}

#[test]
fn test_header_fields_are_preserved() {
    let envelope = decode(&save_file()).unwrap();
    assert_eq!(envelope.save_version, 2);
    assert_eq!(envelope.reserved_0, 517);
    assert_eq!(envelope.engine_version.to_string(), "4.27.2");
    assert_eq!(envelope.reserved_1, 0x1234);
    assert_eq!(envelope.build.label, "++UE4+Release-4.27");
    assert_eq!(envelope.build.reserved, 3);
    assert_eq!(envelope.build.entries.len(), 2);
    assert_eq!(envelope.build.entries[1].value, 20);
    assert_eq!(envelope.game_data_path, "/Script/Phoenix.SaveGameData");
}

#[test]
fn test_tree_contents() {
    let envelope = decode(&save_file()).unwrap();
    let data = &envelope.game_data;

    assert!(data.bool("bIsUsed").unwrap());
    let info = data.properties("CharacterInfo").unwrap();
    assert_eq!(info.int("Level").unwrap(), 7);
    assert_eq!(info.date_time("SaveTime").unwrap(), 638_000_000_000_000_000);
    assert_eq!(data.struct_value("CharacterInfo").unwrap().guid, [0x5A; 16]);
    assert_eq!(
        data.map("Flags").unwrap().get_str("a"),
        Some(&PropertyValue::Str("b".into()))
    );
    assert_eq!(data.byte_array("RawDatabaseImage").unwrap(), b"SQLit");
}

// =========================================================================
// Editing
// =========================================================================

#[test]
fn test_edits_update_every_enclosing_length() {
    let mut envelope = decode(&save_file()).unwrap();
    let original_len = envelope.to_bytes().unwrap().len();

    *envelope.game_data.byte_array_mut("RawDatabaseImage").unwrap() = vec![0; 1000];
    envelope
        .game_data
        .properties_mut("CharacterInfo")
        .unwrap()
        .add_str("FirstName", "Ada");

    let bytes = envelope.to_bytes().unwrap();
    assert!(bytes.len() > original_len);

    let decoded = decode(&bytes).unwrap();
    assert_eq!(decoded, envelope);
    assert_eq!(decoded.game_data.byte_array("RawDatabaseImage").unwrap().len(), 1000);
    assert_eq!(
        decoded.game_data.path(&["CharacterInfo", "FirstName"]).unwrap().value,
        PropertyValue::Str("Ada".into())
    );
}

// =========================================================================
// Failures
// =========================================================================

#[test]
fn test_every_truncation_fails() {
    let bytes = save_file();
    for end in 0..bytes.len() {
        assert!(decode(&bytes[..end]).is_err(), "prefix of {end} bytes decoded");
    }
}

#[test]
fn test_corrupt_nested_length_is_reported() {
    let mut bytes = save_file();
    // The struct's content length sits right after "CharacterInfo" and its tag.
    let needle = b"StructProperty\0";
    let at = bytes
        .windows(needle.len())
        .position(|w| w == needle)
        .map(|p| p + needle.len())
        .unwrap();
    let declared = i32::from_le_bytes(bytes[at..at + 4].try_into().unwrap());
    bytes[at..at + 4].copy_from_slice(&(declared + 1).to_le_bytes());

    let err = decode(&bytes).unwrap_err();
    assert!(matches!(
        err,
        EnvelopeError::Property(PropertyError::SizeMismatch { name, .. }) if name == "CharacterInfo"
    ));
}

// =========================================================================
// Projection
// =========================================================================

#[test]
fn test_envelope_is_serde_projectable() {
    let envelope = decode(&save_file()).unwrap();

    let json = serde_json::to_value(&envelope).unwrap();
    assert_eq!(json["magic"], serde_json::json!([0x47, 0x56, 0x41, 0x53]));
    assert_eq!(json["engine_version"]["minor"], 27);
    assert_eq!(json["build"]["label"], "++UE4+Release-4.27");
    assert_eq!(json["game_data"][1]["name"], "CharacterInfo");

    // The projection carries every header field, so it rebuilds the same file.
    let back: SaveEnvelope = serde_json::from_value(json).unwrap();
    assert_eq!(back.to_bytes().unwrap(), save_file());
}
