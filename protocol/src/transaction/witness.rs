//! Witnesses and the signed transaction.

use super::body::TxAux;
use super::error::TransactionError;
use super::signing::signing_message;
use super::types::TxId;
use crate::cbor::{self, Encoder, Value};
use crate::config::SIGNATURE_LENGTH;
use crate::crypto::keys::ExtendedPublicKey;
use crate::crypto::signatures::verify;

// ---------------------------------------------------------------------------
// TxWitness
// ---------------------------------------------------------------------------

/// A public-key witness: the signer's extended public key and an Ed25519
/// signature over the signing message.
#[derive(Clone, PartialEq, Eq)]
pub struct TxWitness {
    pub xpub: ExtendedPublicKey,
    pub signature: [u8; SIGNATURE_LENGTH],
}

impl TxWitness {
    pub fn new(xpub: ExtendedPublicKey, signature: [u8; SIGNATURE_LENGTH]) -> Self {
        Self { xpub, signature }
    }

    /// `[0, tag24(cbor([bytes(xpub), bytes(signature)]))]`
    pub fn to_cbor_value(&self) -> Value {
        Value::Array(vec![
            Value::Unsigned(0),
            Value::nested(&Value::Array(vec![
                Value::Bytes(self.xpub.as_bytes().to_vec()),
                Value::Bytes(self.signature.to_vec()),
            ])),
        ])
    }

    /// Checks the signature against the message for `tx_id`.
    pub fn verify(&self, tx_id: &TxId) -> bool {
        verify(
            &self.xpub.public_key(),
            &signing_message(tx_id),
            &self.signature,
        )
    }
}

impl std::fmt::Debug for TxWitness {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TxWitness")
            .field("xpub", &self.xpub)
            .field("signature", &hex::encode(self.signature))
            .finish()
    }
}

// ---------------------------------------------------------------------------
// SignedTransaction
// ---------------------------------------------------------------------------

/// A body plus one witness per input, in input order.
///
/// Constructed once after signing and never mutated.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SignedTransaction {
    pub(crate) aux: TxAux,
    pub(crate) witnesses: Vec<TxWitness>,
}

impl SignedTransaction {
    /// Pairs a body with its witnesses, checking that the counts agree.
    pub fn new(aux: TxAux, witnesses: Vec<TxWitness>) -> Result<Self, TransactionError> {
        if witnesses.len() != aux.inputs().len() {
            return Err(TransactionError::WitnessCountMismatch {
                inputs: aux.inputs().len(),
                witnesses: witnesses.len(),
            });
        }
        Ok(Self { aux, witnesses })
    }

    pub fn aux(&self) -> &TxAux {
        &self.aux
    }

    pub fn witnesses(&self) -> &[TxWitness] {
        &self.witnesses
    }

    /// The id of the body. Witnesses do not contribute.
    pub fn id(&self) -> TxId {
        self.aux.id()
    }

    /// `82 <body> array(n) <witness>*`
    pub fn to_cbor(&self) -> Vec<u8> {
        let body = self.aux.to_cbor();
        let witnesses = encode_witnesses(&self.witnesses);
        let mut enc = Encoder::with_capacity(1 + body.len() + witnesses.len());
        enc.array(2).raw(&body).raw(&witnesses);
        enc.into_bytes()
    }

    /// Hex of [`SignedTransaction::to_cbor`], the form relays accept.
    pub fn to_hex(&self) -> String {
        hex::encode(self.to_cbor())
    }

    /// True if every witness verifies against this transaction's id.
    pub fn verify_witnesses(&self) -> bool {
        let id = self.id();
        self.witnesses.len() == self.aux.inputs().len()
            && self.witnesses.iter().all(|w| w.verify(&id))
    }
}

/// `array(n) <witness>*`, with the header sized for `n` directly.
pub fn encode_witnesses(witnesses: &[TxWitness]) -> Vec<u8> {
    let mut out = cbor::array_header(witnesses.len());
    for witness in witnesses {
        out.extend_from_slice(&cbor::encode(&witness.to_cbor_value()));
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::address::Address;
    use crate::crypto::SigningIdentity;
    use crate::transaction::signing::sign_transaction;
    use crate::transaction::types::{TxIn, TxOut};

    fn body(inputs: usize) -> TxAux {
        let inputs = (0..inputs)
            .map(|i| TxIn::new(TxId::from_bytes([i as u8; 32]), i as u32))
            .collect();
        let outputs = vec![TxOut::new(
            Address::from_raw_bytes(vec![0x82, 0x00, 0x00]),
            1,
        )];
        TxAux::new(inputs, outputs).unwrap()
    }

    #[test]
    fn witness_layout() {
        let identity = SigningIdentity::generate();
        let witness = TxWitness::new(identity.extended_public_key(), [7u8; 64]);
        let bytes = cbor::encode(&witness.to_cbor_value());

        assert_eq!(&bytes[..6], &[0x82, 0x00, 0xd8, 0x18, 0x58, 0x85]);
        assert_eq!(&bytes[6..9], &[0x82, 0x58, 0x40]);
        assert_eq!(&bytes[9..73], identity.extended_public_key().as_bytes());
        assert_eq!(&bytes[73..75], &[0x58, 0x40]);
        assert_eq!(&bytes[75..], &[7u8; 64]);
    }

    #[test]
    fn signed_layout() {
        let identity = SigningIdentity::generate();
        let signed = sign_transaction(body(3), &identity);
        let bytes = signed.to_cbor();
        let aux = signed.aux().to_cbor();

        assert_eq!(bytes[0], 0x82);
        assert_eq!(&bytes[1..1 + aux.len()], &aux[..]);
        assert_eq!(bytes[1 + aux.len()], 0x83);
        assert_eq!(&bytes[1 + aux.len()..], &encode_witnesses(signed.witnesses())[..]);
    }

    #[test]
    fn witness_array_header_grows_past_23() {
        let identity = SigningIdentity::generate();
        let signed = sign_transaction(body(24), &identity);
        let bytes = signed.to_cbor();
        let aux_len = signed.aux().to_cbor().len();
        assert_eq!(&bytes[1 + aux_len..3 + aux_len], &[0x98, 0x18]);
    }

    #[test]
    fn count_mismatch_is_rejected() {
        let identity = SigningIdentity::generate();
        let witness = TxWitness::new(identity.extended_public_key(), [0u8; 64]);
        let err = SignedTransaction::new(body(2), vec![witness]).unwrap_err();
        assert_eq!(
            err,
            TransactionError::WitnessCountMismatch {
                inputs: 2,
                witnesses: 1
            }
        );
    }

    #[test]
    fn forged_witness_does_not_verify() {
        let identity = SigningIdentity::generate();
        let aux = body(1);
        let forged = TxWitness::new(identity.extended_public_key(), [0u8; 64]);
        let signed = SignedTransaction::new(aux, vec![forged]).unwrap();
        assert!(!signed.verify_witnesses());
    }

    #[test]
    fn id_ignores_witnesses() {
        let aux = body(2);
        let a = sign_transaction(aux.clone(), &SigningIdentity::generate());
        let b = sign_transaction(aux.clone(), &SigningIdentity::generate());
        assert_ne!(a.to_cbor(), b.to_cbor());
        assert_eq!(a.id(), b.id());
        assert_eq!(a.id(), aux.id());
    }
}
