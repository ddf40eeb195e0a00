//! Transaction signing.
//!
//! The signed message is the fixed 8-byte prefix `011a2d964a095820`
//! followed by the 32-byte transaction id. Read as CBOR the prefix is the
//! signing tag `01`, the mainnet protocol magic (`1a 2d964a09`) and the
//! header of a 32-byte byte string that the id then fills.
//!
//! Every input gets a witness over that same message, so all witnesses of
//! a transaction are identical. The format would allow per-input
//! signatures but the network accepts this and we do not need more.

use super::body::TxAux;
use super::types::TxId;
use super::witness::{SignedTransaction, TxWitness};
use crate::config::{TX_ID_LENGTH, TX_SIGN_MESSAGE_PREFIX};
use crate::crypto::keys::SigningIdentity;

const PREFIX_LENGTH: usize = TX_SIGN_MESSAGE_PREFIX.len();

/// Length of the signed message: prefix plus transaction id.
pub const SIGNING_MESSAGE_LENGTH: usize = PREFIX_LENGTH + TX_ID_LENGTH;

/// `prefix ‖ tx_id`, the bytes each witness signs.
pub fn signing_message(tx_id: &TxId) -> [u8; SIGNING_MESSAGE_LENGTH] {
    let mut message = [0u8; SIGNING_MESSAGE_LENGTH];
    message[..PREFIX_LENGTH].copy_from_slice(&TX_SIGN_MESSAGE_PREFIX);
    message[PREFIX_LENGTH..].copy_from_slice(tx_id.as_bytes());
    message
}

/// Signs `aux` with `identity`, producing one witness per input.
///
/// # Example
///
/// ```
/// use byron_protocol::crypto::SigningIdentity;
/// use byron_protocol::transaction::{sign_transaction, TxAux, TxId, TxIn, TxOut};
///
/// let identity = SigningIdentity::generate();
/// let aux = TxAux::new(
///     vec![TxIn::new(TxId::from_bytes([1; 32]), 0)],
///     vec![TxOut::new(identity.address(), 1_000_000)],
/// )
/// .unwrap();
///
/// let signed = sign_transaction(aux, &identity);
/// assert_eq!(signed.witnesses().len(), 1);
/// assert!(signed.verify_witnesses());
/// ```
pub fn sign_transaction(aux: TxAux, identity: &SigningIdentity) -> SignedTransaction {
    let message = signing_message(&aux.id());
    let witness = TxWitness::new(identity.extended_public_key(), identity.sign(&message));
    let witnesses = vec![witness; aux.inputs().len()];
    SignedTransaction { aux, witnesses }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use crate::crypto::signatures::verify;
    use crate::transaction::types::{TxIn, TxOut};

    fn body(inputs: usize) -> TxAux {
        let identity = SigningIdentity::generate();
        TxAux::new(
            (0..inputs)
                .map(|i| TxIn::new(TxId::from_bytes([0x11; 32]), i as u32))
                .collect(),
            vec![TxOut::new(identity.address(), 5)],
        )
        .unwrap()
    }

    #[test]
    fn message_is_prefix_then_id() {
        let id = TxId::from_bytes([0xee; 32]);
        let message = signing_message(&id);
        assert_eq!(message.len(), SIGNING_MESSAGE_LENGTH);
        assert_eq!(hex::encode(&message[..8]), "011a2d964a095820");
        assert_eq!(&message[8..], &[0xee; 32]);
    }

    #[test]
    fn one_witness_per_input() {
        let identity = SigningIdentity::generate();
        for n in [1, 3, 10] {
            let signed = sign_transaction(body(n), &identity);
            assert_eq!(signed.witnesses().len(), n);
            assert_eq!(signed.aux().inputs().len(), n);
        }
    }

    #[test]
    fn witnesses_verify_against_the_id() {
        let identity = SigningIdentity::generate();
        let signed = sign_transaction(body(2), &identity);
        assert!(signed.verify_witnesses());

        let message = signing_message(&signed.id());
        for witness in signed.witnesses() {
            assert_eq!(witness.xpub, identity.extended_public_key());
            assert!(verify(&identity.public_key_bytes(), &message, &witness.signature));
        }
    }

    #[test]
    fn all_witnesses_are_identical() {
        let signed = sign_transaction(body(4), &SigningIdentity::generate());
        let first = &signed.witnesses()[0];
        assert!(signed.witnesses().iter().all(|w| w == first));
    }

    #[test]
    fn signing_is_deterministic() {
        let identity = SigningIdentity::generate();
        let aux = body(2);
        let a = sign_transaction(aux.clone(), &identity);
        let b = sign_transaction(aux, &identity);
        assert_eq!(a.to_cbor(), b.to_cbor());
    }

    #[test]
    fn signing_does_not_change_id() {
        let aux = body(1);
        let id_before = aux.id();
        let signed = sign_transaction(aux, &SigningIdentity::generate());
        assert_eq!(signed.id(), id_before);
    }
}
