// gridmark/src/export/mod.rs

//! Flat-file persistence of a grid session.
//!
//! See [`format`] for the layout of the file.

mod decoder;
mod encoder;
mod errors;
pub mod format;
mod matching;

pub use decoder::{decode, Decoded, Decoder};
pub use encoder::{composite_title, encode, Encoder};
pub use errors::{ExportError, LoadError};
pub use matching::MatchTolerance;
