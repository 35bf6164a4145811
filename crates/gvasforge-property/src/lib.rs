//! The typed property tree of a GVAS save.
//!
//! A save's game state is a list of self-describing nodes. Each node has a
//! name, a kind tag (`"IntProperty"`, `"StructProperty"`, ...), a content
//! length and an index, followed by a kind-specific payload. Structs nest a
//! whole new node list, so the tree can be arbitrarily deep.
//!
//! - **Model** ([`Property`], [`PropertyValue`], [`PropertyList`], ...):
//!   plain owned data, serde-projectable.
//! - **Kinds** ([`PropertyKind`]): the closed set of wire tags.
//! - **Struct resolution** ([`StructRegistry`], [`StructCodec`]): which
//!   struct types have a fixed binary layout.
//! - **Codec** (`read` / `write` on [`Property`] and [`PropertyList`]).
//! - **Errors** ([`PropertyError`]).
//!
//! # Architecture
//!
//! ```text
//! Cursor (bytes) → Property (nodes) → Save (envelope)
//! ```
//!
//! Content lengths are never stored in the model. They are recomputed from
//! the values on every encode and checked against the input on every decode.

mod decode;
mod encode;
mod error;
mod kind;
mod list;
mod registry;
mod value;

pub use decode::MAX_DEPTH;
pub use error::PropertyError;
pub use kind::{PropertyKind, NONE};
pub use list::PropertyList;
pub use registry::{DateTimeCodec, FixedSizeCodec, StructCodec, StructRegistry, DATE_TIME};
pub use value::{
    ArrayValue, EnumValue, FixedStruct, MapValue, Property, PropertyValue, StructPayload,
    StructValue, GUID_SIZE,
};
