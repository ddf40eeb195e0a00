//! # Key Material
//!
//! A [`SigningIdentity`] is the one piece of secret state a sender needs:
//! an Ed25519 signing key (derived from a 32-byte seed) plus the 32-byte
//! chain code that the bootstrap-era address scheme folds into every
//! address. Together the public key and chain code form the 64-byte
//! [`ExtendedPublicKey`] that appears in addresses and witnesses.
//!
//! This is deliberately a value you pass around by reference. There is no
//! process-wide "current key" anywhere in the crate.
//!
//! ## Security considerations
//!
//! - Seeds are used exactly as Ed25519 secret keys (RFC 8032 seed form),
//!   which is what the network's legacy wallets did.
//! - Key bytes are never logged and never appear in `Debug` output.
//! - No HD derivation here. One seed, one chain code, one address.

use ed25519_dalek::{Signer, SigningKey};
use rand::rngs::OsRng;
use std::fmt;
use thiserror::Error;

use crate::address::Address;
use crate::config::{CHAIN_CODE_LENGTH, SEED_LENGTH, SIGNATURE_LENGTH, XPUB_LENGTH};

/// Errors raised while loading key material.
///
/// All of these are caller errors: the bytes handed in are not the shape
/// a seed or chain code has to be.
#[derive(Debug, Error)]
pub enum KeyError {
    #[error("{field} is not valid hex: {reason}")]
    InvalidHex { field: &'static str, reason: String },

    #[error("{field} must be {expected} bytes, got {got}")]
    InvalidLength {
        field: &'static str,
        expected: usize,
        got: usize,
    },
}

// ---------------------------------------------------------------------------
// ExtendedPublicKey
// ---------------------------------------------------------------------------

/// Ed25519 public key followed by its chain code. 64 bytes, no more, no less.
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct ExtendedPublicKey([u8; XPUB_LENGTH]);

impl ExtendedPublicKey {
    /// Joins a public key and a chain code.
    pub fn new(public_key: [u8; 32], chain_code: [u8; CHAIN_CODE_LENGTH]) -> Self {
        let mut bytes = [0u8; XPUB_LENGTH];
        bytes[..32].copy_from_slice(&public_key);
        bytes[32..].copy_from_slice(&chain_code);
        Self(bytes)
    }

    /// Length-checked construction from a slice.
    pub fn try_from_slice(slice: &[u8]) -> Result<Self, KeyError> {
        let bytes: [u8; XPUB_LENGTH] =
            slice.try_into().map_err(|_| KeyError::InvalidLength {
                field: "extended public key",
                expected: XPUB_LENGTH,
                got: slice.len(),
            })?;
        Ok(Self(bytes))
    }

    /// All 64 bytes.
    pub fn as_bytes(&self) -> &[u8; XPUB_LENGTH] {
        &self.0
    }

    /// The Ed25519 public key half.
    pub fn public_key(&self) -> [u8; 32] {
        let mut pk = [0u8; 32];
        pk.copy_from_slice(&self.0[..32]);
        pk
    }

    /// The chain code half.
    pub fn chain_code(&self) -> [u8; CHAIN_CODE_LENGTH] {
        let mut cc = [0u8; CHAIN_CODE_LENGTH];
        cc.copy_from_slice(&self.0[32..]);
        cc
    }

    /// Hex encoding, handy for logs and test vectors.
    pub fn to_hex(&self) -> String {
        hex::encode(self.0)
    }
}

impl fmt::Debug for ExtendedPublicKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "ExtendedPublicKey({})", self.to_hex())
    }
}

// ---------------------------------------------------------------------------
// SigningIdentity
// ---------------------------------------------------------------------------

/// The sender's signing key and chain code.
///
/// # Examples
///
/// ```
/// use byron_protocol::crypto::SigningIdentity;
///
/// let identity = SigningIdentity::from_hex(
///     "abd792e674732b7ba8eb3d65800fc2741c27b8ca4787f4f2b70cdac468f59aaf",
///     "a2e99f1b14846d65c55027e8fe51892ce405d51da117088a6931a3690d2117fc",
/// )
/// .unwrap();
/// assert_eq!(
///     identity.address().as_str(),
///     "Ae2tdPwUPEZE5ee2jWiAm1n1yegos5EbLKBNzenTUgfC9ey2bh9aRUiMoqD"
/// );
/// ```
pub struct SigningIdentity {
    signing_key: SigningKey,
    chain_code: [u8; CHAIN_CODE_LENGTH],
}

impl SigningIdentity {
    /// Builds an identity from a raw seed and chain code.
    pub fn from_seed(seed: &[u8; SEED_LENGTH], chain_code: [u8; CHAIN_CODE_LENGTH]) -> Self {
        Self {
            signing_key: SigningKey::from_bytes(seed),
            chain_code,
        }
    }

    /// Builds an identity from hex-encoded seed and chain code.
    ///
    /// Both must decode to exactly 32 bytes. Anything else is rejected with
    /// a [`KeyError`] rather than padded or truncated.
    pub fn from_hex(seed_hex: &str, chain_code_hex: &str) -> Result<Self, KeyError> {
        let seed = decode_fixed::<SEED_LENGTH>("seed", seed_hex)?;
        let chain_code = decode_fixed::<CHAIN_CODE_LENGTH>("chain code", chain_code_hex)?;
        Ok(Self::from_seed(&seed, chain_code))
    }

    /// Fresh random identity from the OS RNG. Mostly useful for tests.
    pub fn generate() -> Self {
        let signing_key = SigningKey::generate(&mut OsRng);
        let mut chain_code = [0u8; CHAIN_CODE_LENGTH];
        rand::RngCore::fill_bytes(&mut OsRng, &mut chain_code);
        Self {
            signing_key,
            chain_code,
        }
    }

    /// The 32-byte Ed25519 public key.
    pub fn public_key_bytes(&self) -> [u8; 32] {
        self.signing_key.verifying_key().to_bytes()
    }

    /// Public key ‖ chain code.
    pub fn extended_public_key(&self) -> ExtendedPublicKey {
        ExtendedPublicKey::new(self.public_key_bytes(), self.chain_code)
    }

    /// The bootstrap-era address this identity receives coins on.
    pub fn address(&self) -> Address {
        Address::from_xpub(&self.extended_public_key())
    }

    /// Ed25519 signature over `message`. Deterministic.
    pub fn sign(&self, message: &[u8]) -> [u8; SIGNATURE_LENGTH] {
        self.signing_key.sign(message).to_bytes()
    }
}

impl Clone for SigningIdentity {
    fn clone(&self) -> Self {
        Self {
            signing_key: SigningKey::from_bytes(&self.signing_key.to_bytes()),
            chain_code: self.chain_code,
        }
    }
}

impl fmt::Debug for SigningIdentity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "SigningIdentity(xpub={})", self.extended_public_key().to_hex())
    }
}

fn decode_fixed<const N: usize>(field: &'static str, text: &str) -> Result<[u8; N], KeyError> {
    let bytes = hex::decode(text.trim()).map_err(|e| KeyError::InvalidHex {
        field,
        reason: e.to_string(),
    })?;
    bytes.as_slice().try_into().map_err(|_| KeyError::InvalidLength {
        field,
        expected: N,
        got: bytes.len(),
    })
}
