//! crates/logging/src/codec/mod.rs
//! Conversion between [`Entry`](crate::Entry) values and the text line format.

pub mod color;
mod decode;
mod encode;

pub use decode::EntryDecoder;
pub use encode::{encode_entry, format_header};
