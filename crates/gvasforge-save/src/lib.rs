//! Whole-file layer of gvasforge.
//!
//! A GVAS save is a small fixed header wrapped around one property list.
//! This crate reads and writes that wrapper and hands the list to
//! `gvasforge-property`.
//!
//! - [`SaveEnvelope`]: the decoded file, with header fields kept verbatim
//! - [`EnvelopeConfig`] / [`MagicCheck`]: how strict decoding is
//! - [`EnvelopeError`]: what can go wrong at this layer

mod config;
mod envelope;
mod error;

pub use config::{EnvelopeConfig, MagicCheck};
pub use envelope::{BuildEntry, BuildMetadata, EngineVersion, SaveEnvelope, BUILD_ID_SIZE};
pub use error::EnvelopeError;
