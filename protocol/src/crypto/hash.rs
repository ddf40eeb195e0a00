//! # Hashing Utilities
//!
//! The four digests the legacy formats are built on. Fixed-size arrays all
//! the way down: every caller knows exactly how many bytes it wants, and
//! the address and transaction code splices these straight into CBOR.

use blake2::digest::consts::{U28, U32};
use blake2::{Blake2b, Digest};
use sha3::Sha3_256;

use crate::config::{ADDRESS_ROOT_LENGTH, TX_ID_LENGTH};

type Blake2b224 = Blake2b<U28>;
type Blake2b256 = Blake2b<U32>;

/// SHA3-256 (the FIPS 202 variant, not Keccak-256).
pub fn sha3_256(data: &[u8]) -> [u8; 32] {
    let digest = Sha3_256::digest(data);
    let mut output = [0u8; 32];
    output.copy_from_slice(&digest);
    output
}

/// BLAKE2b with a 28-byte output. Used for the address root.
///
/// Note that this is *not* a truncated BLAKE2b-256: the output length is
/// a BLAKE2b parameter and changes every byte of the digest.
pub fn blake2b_224(data: &[u8]) -> [u8; ADDRESS_ROOT_LENGTH] {
    let digest = Blake2b224::digest(data);
    let mut output = [0u8; ADDRESS_ROOT_LENGTH];
    output.copy_from_slice(&digest);
    output
}

/// BLAKE2b with a 32-byte output. Used for transaction ids.
pub fn blake2b_256(data: &[u8]) -> [u8; TX_ID_LENGTH] {
    let digest = Blake2b256::digest(data);
    let mut output = [0u8; TX_ID_LENGTH];
    output.copy_from_slice(&digest);
    output
}

/// CRC32 with the IEEE polynomial, as used by the address checksum.
pub fn crc32(data: &[u8]) -> u32 {
    crc32fast::hash(data)
}
