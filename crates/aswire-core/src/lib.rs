#![deny(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::missing_errors_doc)]

//! Value codec and reference-table resolution for the analysis server wire
//! protocol.
//!
//! Every protocol value is a JSON object. This crate defines, once, how
//! fields are read and written (required vs. optional, omission for absence,
//! open string enums, one-of unions), how integer indices into per-message
//! tables are bound, and how code-range trees are rebuilt with their parent
//! links. The type catalog itself lives in `aswire-proto`.
//!
//! Nothing here performs I/O or holds state between calls; independent
//! messages can be decoded concurrently.

pub mod codec;
pub mod config;
pub mod cursor;
pub mod error;
mod macros;
pub mod table;
pub mod tree;
pub mod version;

pub use codec::{
    decode, decode_str, decode_str_with, decode_with, encode, encode_string, FiniteF64, FromJson,
    ObjectReader, ObjectWriter, ProtocolType, ToJson,
};
pub use config::{DecodeConfig, RangePolicy};
pub use cursor::Cursor;
pub use error::{Error, Problem, Result};
pub use table::Interner;
pub use tree::{Node, NodeId, RangeViolation, TextRange, Tree, TreePayload};
pub use version::{PROTOCOL_VERSION, VERSION};

#[doc(hidden)]
pub mod __private {
    pub use serde;
    pub use serde_json::Value;
}
