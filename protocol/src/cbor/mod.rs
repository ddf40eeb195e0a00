//! # Binary Encoder: the CBOR subset
//!
//! The legacy transaction format is CBOR, but only a sliver of it. This
//! module encodes exactly that sliver and nothing else:
//!
//! | Shape                    | Major type | Notes                                  |
//! |--------------------------|------------|----------------------------------------|
//! | unsigned integer         | 0          | minimal-length header                  |
//! | byte string              | 2          | minimal-length header                  |
//! | definite array           | 4          | header + elements                      |
//! | indefinite array         | 4 (`0x9f`) | elements + `0xff` break                |
//! | empty map                | 5          | always `0xa0`                          |
//! | tagged nested encoding   | 6, tag 24  | byte string holding pre-encoded CBOR   |
//!
//! No floats, no text strings, no negative integers, no indefinite byte
//! strings. The value type is closed, so encoding is total: there is no
//! input it cannot represent and therefore no error path.
//!
//! ## Why indefinite arrays at all?
//!
//! The network's canonical transaction body lists inputs and outputs in
//! indefinite-length arrays while using definite-length arrays everywhere
//! else. The transaction id is a hash over these bytes, so "equivalent"
//! CBOR is not good enough. It has to be this CBOR.

mod encoder;

pub use encoder::{array_header, encode, Encoder, Value};

/// CBOR tag marking a byte string whose content is itself CBOR.
pub const TAG_ENCODED_CBOR: u64 = 24;

/// Start byte of an indefinite-length array.
pub const INDEFINITE_ARRAY_START: u8 = 0x9f;

/// Break byte terminating an indefinite-length container.
pub const BREAK: u8 = 0xff;

/// Encoding of a map with zero entries.
pub const EMPTY_MAP: u8 = 0xa0;
