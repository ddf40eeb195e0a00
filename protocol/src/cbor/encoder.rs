//! The encoder itself: a byte buffer with one method per supported shape,
//! and a closed [`Value`] tree for callers that prefer to describe a
//! structure first and serialize it in one go.

use super::{BREAK, EMPTY_MAP, INDEFINITE_ARRAY_START, TAG_ENCODED_CBOR};

const MAJOR_UNSIGNED: u8 = 0;
const MAJOR_BYTES: u8 = 2;
const MAJOR_ARRAY: u8 = 4;
const MAJOR_TAG: u8 = 6;

// ---------------------------------------------------------------------------
// Value
// ---------------------------------------------------------------------------

/// A value in the supported CBOR subset.
///
/// `Raw` is the escape hatch the transaction format forces on us: output
/// addresses are spliced into the body as already-complete CBOR, not
/// re-wrapped as byte strings. Whoever builds a `Raw` is responsible for
/// it being well-formed.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Value {
    /// Major type 0.
    Unsigned(u64),
    /// Major type 2.
    Bytes(Vec<u8>),
    /// Major type 4 with a declared length.
    Array(Vec<Value>),
    /// Major type 4, `0x9f ... 0xff`.
    IndefiniteArray(Vec<Value>),
    /// Major type 5 with zero entries.
    EmptyMap,
    /// Tag 24 wrapping a byte string that holds pre-encoded CBOR.
    Nested(Vec<u8>),
    /// Pre-encoded CBOR copied through verbatim.
    Raw(Vec<u8>),
}

impl Value {
    /// Encodes `inner` and wraps the result as a tag-24 nested value.
    pub fn nested(inner: &Value) -> Self {
        Value::Nested(encode(inner))
    }
}

// ---------------------------------------------------------------------------
// Encoder
// ---------------------------------------------------------------------------

/// Append-only CBOR writer.
///
/// Every method writes one item (or one header) and returns `&mut Self`
/// so structures can be spelled out in the order they hit the wire:
///
/// ```
/// use byron_protocol::cbor::Encoder;
///
/// let mut enc = Encoder::new();
/// enc.array(2).unsigned(0).bytes(&[0xde, 0xad]);
/// assert_eq!(enc.into_bytes(), vec![0x82, 0x00, 0x42, 0xde, 0xad]);
/// ```
#[derive(Clone, Debug, Default)]
pub struct Encoder {
    buf: Vec<u8>,
}

impl Encoder {
    /// Creates an empty encoder.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates an empty encoder with room for `capacity` bytes.
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            buf: Vec::with_capacity(capacity),
        }
    }

    /// Writes an unsigned integer using the shortest header that fits.
    pub fn unsigned(&mut self, value: u64) -> &mut Self {
        self.header(MAJOR_UNSIGNED, value);
        self
    }

    /// Writes a definite-length byte string.
    pub fn bytes(&mut self, bytes: &[u8]) -> &mut Self {
        self.header(MAJOR_BYTES, bytes.len() as u64);
        self.buf.extend_from_slice(bytes);
        self
    }

    /// Writes the header of a definite-length array of `len` elements.
    /// The caller writes the elements next.
    pub fn array(&mut self, len: usize) -> &mut Self {
        self.header(MAJOR_ARRAY, len as u64);
        self
    }

    /// Opens an indefinite-length array. Close it with [`Encoder::end`].
    pub fn begin_indefinite_array(&mut self) -> &mut Self {
        self.buf.push(INDEFINITE_ARRAY_START);
        self
    }

    /// Writes the break byte closing an indefinite-length array.
    pub fn end(&mut self) -> &mut Self {
        self.buf.push(BREAK);
        self
    }

    /// Writes a map with no entries.
    pub fn empty_map(&mut self) -> &mut Self {
        self.buf.push(EMPTY_MAP);
        self
    }

    /// Writes tag 24 followed by `encoded` as a byte string.
    ///
    /// `encoded` must already be a complete CBOR item; it is carried as an
    /// opaque blob and never looked at again.
    pub fn nested(&mut self, encoded: &[u8]) -> &mut Self {
        self.header(MAJOR_TAG, TAG_ENCODED_CBOR);
        self.bytes(encoded)
    }

    /// Copies pre-encoded CBOR into the output unchanged.
    pub fn raw(&mut self, encoded: &[u8]) -> &mut Self {
        self.buf.extend_from_slice(encoded);
        self
    }

    /// Writes a whole [`Value`] tree.
    pub fn value(&mut self, value: &Value) -> &mut Self {
        match value {
            Value::Unsigned(n) => self.unsigned(*n),
            Value::Bytes(b) => self.bytes(b),
            Value::Array(items) => {
                self.array(items.len());
                for item in items {
                    self.value(item);
                }
                self
            }
            Value::IndefiniteArray(items) => {
                self.begin_indefinite_array();
                for item in items {
                    self.value(item);
                }
                self.end()
            }
            Value::EmptyMap => self.empty_map(),
            Value::Nested(encoded) => self.nested(encoded),
            Value::Raw(encoded) => self.raw(encoded),
        }
    }

    /// The bytes written so far.
    pub fn as_bytes(&self) -> &[u8] {
        &self.buf
    }

    /// Consumes the encoder and returns its output.
    pub fn into_bytes(self) -> Vec<u8> {
        self.buf
    }

    /// Initial byte plus big-endian argument, shortest form.
    fn header(&mut self, major: u8, arg: u64) {
        let major = major << 5;
        if arg < 24 {
            self.buf.push(major | arg as u8);
        } else if arg <= u8::MAX as u64 {
            self.buf.push(major | 24);
            self.buf.push(arg as u8);
        } else if arg <= u16::MAX as u64 {
            self.buf.push(major | 25);
            self.buf.extend_from_slice(&(arg as u16).to_be_bytes());
        } else if arg <= u32::MAX as u64 {
            self.buf.push(major | 26);
            self.buf.extend_from_slice(&(arg as u32).to_be_bytes());
        } else {
            self.buf.push(major | 27);
            self.buf.extend_from_slice(&arg.to_be_bytes());
        }
    }
}

/// Encodes a single [`Value`] to bytes.
pub fn encode(value: &Value) -> Vec<u8> {
    let mut enc = Encoder::new();
    enc.value(value);
    enc.into_bytes()
}

/// Returns just the header of a definite-length array of `len` elements.
pub fn array_header(len: usize) -> Vec<u8> {
    let mut enc = Encoder::with_capacity(9);
    enc.array(len);
    enc.into_bytes()
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    fn unsigned_hex(n: u64) -> String {
        hex::encode(encode(&Value::Unsigned(n)))
    }

    #[test]
    fn unsigned_uses_shortest_header() {
        // Vectors from RFC 8949, Appendix A.
        assert_eq!(unsigned_hex(0), "00");
        assert_eq!(unsigned_hex(23), "17");
        assert_eq!(unsigned_hex(24), "1818");
        assert_eq!(unsigned_hex(100), "1864");
        assert_eq!(unsigned_hex(1000), "1903e8");
        assert_eq!(unsigned_hex(1_000_000), "1a000f4240");
        assert_eq!(unsigned_hex(1_000_000_000_000), "1b000000e8d4a51000");
        assert_eq!(unsigned_hex(u64::MAX), "1bffffffffffffffff");
    }

    #[test]
    fn header_width_boundaries() {
        assert_eq!(unsigned_hex(255), "18ff");
        assert_eq!(unsigned_hex(256), "190100");
        assert_eq!(unsigned_hex(65_535), "19ffff");
        assert_eq!(unsigned_hex(65_536), "1a00010000");
        assert_eq!(unsigned_hex(u32::MAX as u64), "1affffffff");
        assert_eq!(unsigned_hex(u32::MAX as u64 + 1), "1b0000000100000000");
    }

    #[test]
    fn byte_strings() {
        assert_eq!(encode(&Value::Bytes(vec![])), vec![0x40]);
        assert_eq!(
            hex::encode(encode(&Value::Bytes(vec![1, 2, 3, 4]))),
            "4401020304"
        );

        // A 32-byte hash gets the one-byte length form: 0x58 0x20.
        let hash = encode(&Value::Bytes(vec![0xab; 32]));
        assert_eq!(&hash[..2], &[0x58, 0x20]);
        assert_eq!(hash.len(), 34);
    }

    #[test]
    fn definite_arrays() {
        assert_eq!(encode(&Value::Array(vec![])), vec![0x80]);
        assert_eq!(
            hex::encode(encode(&Value::Array(vec![
                Value::Unsigned(1),
                Value::Unsigned(2),
                Value::Unsigned(3),
            ]))),
            "83010203"
        );
    }

    #[test]
    fn indefinite_array_wraps_elements_in_start_and_break() {
        let value = Value::IndefiniteArray(vec![
            Value::Unsigned(1),
            Value::Array(vec![Value::Unsigned(2), Value::Unsigned(3)]),
        ]);
        assert_eq!(hex::encode(encode(&value)), "9f01820203ff");

        assert_eq!(encode(&Value::IndefiniteArray(vec![])), vec![0x9f, 0xff]);
    }

    #[test]
    fn empty_map_is_single_byte() {
        assert_eq!(encode(&Value::EmptyMap), vec![0xa0]);
    }

    #[test]
    fn nested_is_tag_24_around_a_byte_string() {
        let inner = Value::Array(vec![Value::Unsigned(0)]);
        let value = Value::nested(&inner);
        assert_eq!(value, Value::Nested(vec![0x81, 0x00]));
        assert_eq!(hex::encode(encode(&value)), "d818428100");
    }

    #[test]
    fn raw_is_copied_verbatim() {
        let value = Value::Array(vec![Value::Raw(vec![0x82, 0x00, 0x00]), Value::Unsigned(7)]);
        assert_eq!(hex::encode(encode(&value)), "8282000007");
    }

    #[test]
    fn builder_and_value_tree_agree() {
        let tree = Value::Array(vec![
            Value::Unsigned(0),
            Value::Array(vec![Value::Unsigned(0), Value::Bytes(vec![9; 64])]),
            Value::EmptyMap,
        ]);

        let mut enc = Encoder::new();
        enc.array(3)
            .unsigned(0)
            .array(2)
            .unsigned(0)
            .bytes(&[9; 64])
            .empty_map();

        assert_eq!(enc.as_bytes(), encode(&tree).as_slice());
    }

    #[test]
    fn array_header_matches_full_array_prefix() {
        assert_eq!(array_header(0), vec![0x80]);
        assert_eq!(array_header(1), vec![0x81]);
        assert_eq!(array_header(23), vec![0x97]);
        assert_eq!(array_header(24), vec![0x98, 0x18]);
        assert_eq!(array_header(256), vec![0x99, 0x01, 0x00]);

        for n in [1usize, 3, 10, 24, 300] {
            let full = encode(&Value::Array(vec![Value::Unsigned(0); n]));
            assert_eq!(array_header(n), full[..full.len() - n].to_vec());
        }
    }

    #[test]
    fn encoding_is_deterministic() {
        let value = Value::IndefiniteArray(vec![Value::nested(&Value::Bytes(vec![1; 40]))]);
        assert_eq!(encode(&value), encode(&value));
    }
}
