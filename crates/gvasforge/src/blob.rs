//! The three binary images embedded in a save's top-level list.
//!
//! Each image is an `ArrayProperty<ByteProperty>` with a fixed name. The
//! main one holds a complete SQLite database; this crate only hands the
//! bytes out and takes replacements back.

use std::fmt;

use gvasforge_property::PropertyList;
use serde::{Deserialize, Serialize};

use crate::GvasError;

/// An embedded image, named by the property that holds it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EmbeddedBlob {
    /// `RawDatabaseImage`: the game-state database.
    Database,
    /// `RawExclusiveImage`.
    Exclusive,
    /// `RawMiniMapImage`.
    MiniMap,
}

impl EmbeddedBlob {
    pub const ALL: [Self; 3] = [Self::Database, Self::Exclusive, Self::MiniMap];

    /// Name of the property holding this image.
    pub fn property_name(self) -> &'static str {
        match self {
            Self::Database => "RawDatabaseImage",
            Self::Exclusive => "RawExclusiveImage",
            Self::MiniMap => "RawMiniMapImage",
        }
    }
}

impl fmt::Display for EmbeddedBlob {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.property_name())
    }
}

/// Returns the bytes of one embedded image.
pub fn blob(list: &PropertyList, which: EmbeddedBlob) -> Result<&[u8], GvasError> {
    Ok(list.byte_array(which.property_name())?)
}

/// Replaces the bytes of an existing embedded image. The save must already
/// contain the image; nothing else in the tree is touched.
pub fn set_blob(list: &mut PropertyList, which: EmbeddedBlob, bytes: Vec<u8>) -> Result<(), GvasError> {
    let slot = list.byte_array_mut(which.property_name())?;
    tracing::debug!(blob = %which, old = slot.len(), new = bytes.len(), "replacing embedded image");
    *slot = bytes;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use gvasforge_property::PropertyError;

    fn images() -> PropertyList {
        let mut list = PropertyList::new();
        list.add_int("SaveVersion", 1)
            .add_byte_array("RawDatabaseImage", b"SQLite format 3\0".to_vec())
            .add_byte_array("RawMiniMapImage", vec![0x89, b'P', b'N', b'G']);
        list
    }

    #[test]
    fn test_blob_returns_bytes() {
        let list = images();
        assert!(blob(&list, EmbeddedBlob::Database).unwrap().starts_with(b"SQLite"));
        assert_eq!(blob(&list, EmbeddedBlob::MiniMap).unwrap().len(), 4);
    }

    #[test]
    fn test_missing_blob() {
        let err = blob(&images(), EmbeddedBlob::Exclusive).unwrap_err();
        assert!(matches!(
            err,
            GvasError::Property(PropertyError::MissingField { name }) if name == "RawExclusiveImage"
        ));
    }

    #[test]
    fn test_set_blob_replaces_only_that_leaf() {
        let mut list = images();
        set_blob(&mut list, EmbeddedBlob::Database, vec![1, 2, 3]).unwrap();
        assert_eq!(blob(&list, EmbeddedBlob::Database).unwrap(), &[1, 2, 3]);
        assert_eq!(blob(&list, EmbeddedBlob::MiniMap).unwrap().len(), 4);
        assert_eq!(list.int("SaveVersion").unwrap(), 1);
        assert_eq!(list.len(), 3);
    }

    #[test]
    fn test_set_blob_does_not_create() {
        let mut list = images();
        assert!(set_blob(&mut list, EmbeddedBlob::Exclusive, vec![]).is_err());
        assert!(!list.contains("RawExclusiveImage"));
    }

    #[test]
    fn test_wrong_kind_blob() {
        let mut list = PropertyList::new();
        list.add_str("RawDatabaseImage", "not bytes");
        let err = blob(&list, EmbeddedBlob::Database).unwrap_err();
        assert!(matches!(err, GvasError::Property(PropertyError::WrongKind { .. })));
    }

    #[test]
    fn test_display_is_property_name() {
        let names: Vec<_> = EmbeddedBlob::ALL.iter().map(ToString::to_string).collect();
        assert_eq!(names, ["RawDatabaseImage", "RawExclusiveImage", "RawMiniMapImage"]);
    }
}
