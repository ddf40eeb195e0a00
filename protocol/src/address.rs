//! # Address Codec
//!
//! Bootstrap-era addresses are CBOR wrapped in CBOR wrapped in base58:
//!
//! ```text
//! spending data  = [0, [0, xpub], {}]                 (addrType 0 = public key)
//! root           = BLAKE2b-224(SHA3-256(cbor(spending data)))
//! payload        = cbor([root, {}, 0])                (root, attributes, addrType)
//! address bytes  = cbor([tag24(payload), CRC32(payload)])
//! address        = base58(address bytes)
//! ```
//!
//! Decoding goes exactly one step back: base58 to raw bytes. Those bytes
//! are already a complete CBOR item and the transaction body embeds them
//! as-is. We do not re-verify the CRC or look inside the payload on
//! decode; the caller supplying the destination is trusted to have given
//! us a real address. Adding validation here would start rejecting
//! addresses (e.g. ones carrying attributes we do not model) that the
//! network itself accepts.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

use crate::cbor::{self, Value};
use crate::crypto::hash::{blake2b_224, crc32, sha3_256};
use crate::crypto::keys::ExtendedPublicKey;

/// Address type for plain public-key addresses. The only type we derive.
pub const ADDR_TYPE_PUBKEY: u64 = 0;

/// Errors that can occur while parsing an address string.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum AddressError {
    #[error("address is empty")]
    Empty,

    #[error("address is not valid base58: {0}")]
    InvalidBase58(String),
}

/// A base58 address together with the raw bytes it decodes to.
///
/// Both forms are kept because both are needed: the text for display and
/// the explorer API, the raw bytes for transaction outputs.
#[derive(Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Address {
    text: String,
    raw: Vec<u8>,
}

impl Address {
    /// Derives the address of an extended public key.
    ///
    /// Pure and deterministic; the same xpub always yields the same string.
    pub fn from_xpub(xpub: &ExtendedPublicKey) -> Self {
        let spending_data = Value::Array(vec![
            Value::Unsigned(ADDR_TYPE_PUBKEY),
            Value::Array(vec![
                Value::Unsigned(ADDR_TYPE_PUBKEY),
                Value::Bytes(xpub.as_bytes().to_vec()),
            ]),
            Value::EmptyMap,
        ]);
        let root = blake2b_224(&sha3_256(&cbor::encode(&spending_data)));

        let payload = cbor::encode(&Value::Array(vec![
            Value::Bytes(root.to_vec()),
            Value::EmptyMap,
            Value::Unsigned(ADDR_TYPE_PUBKEY),
        ]));
        let checksum = crc32(&payload);

        let raw = cbor::encode(&Value::Array(vec![
            Value::Nested(payload),
            Value::Unsigned(checksum as u64),
        ]));
        Self::from_raw_bytes(raw)
    }

    /// Wraps already-encoded address bytes, producing their base58 text.
    pub fn from_raw_bytes(raw: Vec<u8>) -> Self {
        let text = bs58::encode(&raw).into_string();
        Self { text, raw }
    }

    /// The base58 text.
    pub fn as_str(&self) -> &str {
        &self.text
    }

    /// The decoded bytes, a complete CBOR item.
    pub fn raw_bytes(&self) -> &[u8] {
        &self.raw
    }
}

/// Base58-decodes an address string. No checksum or structure validation.
pub fn decode_raw(address: &str) -> Result<Vec<u8>, AddressError> {
    if address.is_empty() {
        return Err(AddressError::Empty);
    }
    bs58::decode(address)
        .into_vec()
        .map_err(|e| AddressError::InvalidBase58(e.to_string()))
}

impl FromStr for Address {
    type Err = AddressError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let raw = decode_raw(s)?;
        Ok(Self {
            text: s.to_string(),
            raw,
        })
    }
}

impl TryFrom<String> for Address {
    type Error = AddressError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        let raw = decode_raw(&value)?;
        Ok(Self { text: value, raw })
    }
}

impl From<Address> for String {
    fn from(address: Address) -> Self {
        address.text
    }
}

impl fmt::Display for Address {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.text)
    }
}

impl fmt::Debug for Address {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Address({})", self.text)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::crypto::SigningIdentity;

    const SEED: &str = "abd792e674732b7ba8eb3d65800fc2741c27b8ca4787f4f2b70cdac468f59aaf";
    const CHAIN_CODE: &str = "a2e99f1b14846d65c55027e8fe51892ce405d51da117088a6931a3690d2117fc";
    const EXPECTED: &str = "Ae2tdPwUPEZE5ee2jWiAm1n1yegos5EbLKBNzenTUgfC9ey2bh9aRUiMoqD";
    const REDEEM_STYLE: &str = "DdzFFzCqrht7rRLbKVHL6k7GaSkmPQjV7QS7j9S9fEXivq1SqziA7bTQdiBPMpBG9iJLzu8zmeaxw4iNspiD6nxdraXPPtNmKcLKxXeo";

    fn identity() -> SigningIdentity {
        SigningIdentity::from_hex(SEED, CHAIN_CODE).unwrap()
    }

    #[test]
    fn derives_the_known_address() {
        let address = Address::from_xpub(&identity().extended_public_key());
        assert_eq!(address.as_str(), EXPECTED);
    }

    #[test]
    fn derived_bytes_have_the_expected_shape() {
        let address = identity().address();
        let raw = address.raw_bytes();

        // [tag24(bytes(33)), crc]
        assert_eq!(&raw[..5], &[0x82, 0xd8, 0x18, 0x58, 0x21]);
        let payload = &raw[5..5 + 33];
        // [bytes(28) root, {}, 0]
        assert_eq!(&payload[..3], &[0x83, 0x58, 0x1c]);
        assert_eq!(&payload[31..], &[0xa0, 0x00]);

        // Checksum is the trailing unsigned integer.
        let mut enc = cbor::Encoder::new();
        enc.unsigned(crc32(payload) as u64);
        assert_eq!(&raw[38..], enc.as_bytes());
    }

    #[test]
    fn derive_then_decode_reproduces_the_address() {
        for identity in [identity(), SigningIdentity::generate()] {
            let address = identity.address();
            let raw = decode_raw(address.as_str()).unwrap();
            assert_eq!(Address::from_raw_bytes(raw), address);
        }
    }

    #[test]
    fn different_chain_codes_give_different_addresses() {
        let a = identity();
        let seed: [u8; 32] = hex::decode(SEED).unwrap().try_into().unwrap();
        let b = SigningIdentity::from_seed(&seed, [0u8; 32]);
        assert_ne!(a.address(), b.address());
    }

    #[test]
    fn parses_addresses_with_attributes() {
        let address: Address = REDEEM_STYLE.parse().unwrap();
        assert_eq!(address.as_str(), REDEEM_STYLE);
        assert_eq!(address.raw_bytes()[0], 0x82);
        assert_eq!(address.to_string(), REDEEM_STYLE);
    }

    #[test]
    fn rejects_non_base58_text() {
        // '0', 'O', 'I' and 'l' are not in the alphabet.
        assert!(matches!(
            "Ae2tdPwUPEZ0".parse::<Address>(),
            Err(AddressError::InvalidBase58(_))
        ));
        assert_eq!("".parse::<Address>(), Err(AddressError::Empty));
    }

    #[test]
    fn serde_uses_the_base58_text() {
        let address: Address = EXPECTED.parse().unwrap();
        let json = serde_json::to_string(&address).unwrap();
        assert_eq!(json, format!("\"{EXPECTED}\""));
        let back: Address = serde_json::from_str(&json).unwrap();
        assert_eq!(back, address);
        assert!(serde_json::from_str::<Address>("\"0OIl\"").is_err());
    }
}
