//! # Cryptographic Primitives
//!
//! The bootstrap-era address and transaction formats pin down every
//! primitive we use. None of these were chosen here, they were chosen by
//! the network years ago and we match them bit for bit:
//!
//! - **SHA3-256** then **BLAKE2b-224**: the address root hash.
//! - **CRC32 (IEEE)**: the address checksum.
//! - **BLAKE2b-256**: transaction ids.
//! - **Ed25519**: witness signatures, keyed from a 32-byte seed.
//!
//! Everything here is a thin wrapper around the audited crates
//! (`sha3`, `blake2`, `crc32fast`, `ed25519-dalek`). If you find yourself
//! writing a hash function in this module, stop.

pub mod hash;
pub mod keys;
pub mod signatures;

pub use hash::{blake2b_224, blake2b_256, crc32, sha3_256};
pub use keys::{ExtendedPublicKey, KeyError, SigningIdentity};
pub use signatures::verify;
