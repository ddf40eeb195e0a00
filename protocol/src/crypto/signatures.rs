//! # Signature Verification
//!
//! Signing goes through [`SigningIdentity::sign`](super::SigningIdentity::sign);
//! this module covers the other direction, checking a witness that arrived
//! as raw bytes. We only ever verify our own witnesses before they leave
//! the process, but a signature that does not verify locally will not
//! verify on the network either, and finding out locally is free.

use ed25519_dalek::{Signature, Verifier, VerifyingKey};

use crate::config::SIGNATURE_LENGTH;

/// Verifies an Ed25519 signature from raw components.
///
/// Returns `false` for a malformed public key as well as for a bad
/// signature. Callers only care whether the witness is good.
pub fn verify(public_key: &[u8; 32], message: &[u8], signature: &[u8; SIGNATURE_LENGTH]) -> bool {
    let Ok(verifying_key) = VerifyingKey::from_bytes(public_key) else {
        return false;
    };
    let signature = Signature::from_bytes(signature);
    verifying_key.verify(message, &signature).is_ok()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::crypto::SigningIdentity;

    #[test]
    fn good_signature_verifies() {
        let identity = SigningIdentity::generate();
        let sig = identity.sign(b"hello");
        assert!(verify(&identity.public_key_bytes(), b"hello", &sig));
    }

    #[test]
    fn wrong_message_fails() {
        let identity = SigningIdentity::generate();
        let sig = identity.sign(b"hello");
        assert!(!verify(&identity.public_key_bytes(), b"hullo", &sig));
    }

    #[test]
    fn wrong_key_fails() {
        let a = SigningIdentity::generate();
        let b = SigningIdentity::generate();
        let sig = a.sign(b"hello");
        assert!(!verify(&b.public_key_bytes(), b"hello", &sig));
    }
}
