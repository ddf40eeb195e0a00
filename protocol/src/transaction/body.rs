//! The unsigned transaction body and its identifier.

use super::error::TransactionError;
use super::types::{TxId, TxIn, TxOut};
use crate::cbor::{self, Value};
use crate::crypto::hash::blake2b_256;

/// Inputs, outputs and (always empty) attributes.
///
/// Order matters: inputs and outputs are serialized in the order given,
/// and that order is part of what gets signed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TxAux {
    inputs: Vec<TxIn>,
    outputs: Vec<TxOut>,
}

impl TxAux {
    /// Creates a body. Both lists must be non-empty.
    pub fn new(inputs: Vec<TxIn>, outputs: Vec<TxOut>) -> Result<Self, TransactionError> {
        if inputs.is_empty() {
            return Err(TransactionError::NoInputs);
        }
        if outputs.is_empty() {
            return Err(TransactionError::NoOutputs);
        }
        Ok(Self { inputs, outputs })
    }

    pub fn inputs(&self) -> &[TxIn] {
        &self.inputs
    }

    pub fn outputs(&self) -> &[TxOut] {
        &self.outputs
    }

    /// Sum of all output coins.
    pub fn total_output(&self) -> Result<u64, TransactionError> {
        self.outputs
            .iter()
            .try_fold(0u64, |acc, out| acc.checked_add(out.coins))
            .ok_or(TransactionError::AmountOverflow)
    }

    /// `83 9f <input>* ff 9f <output>* ff a0`
    pub fn to_cbor_value(&self) -> Value {
        Value::Array(vec![
            Value::IndefiniteArray(self.inputs.iter().map(TxIn::to_cbor_value).collect()),
            Value::IndefiniteArray(self.outputs.iter().map(TxOut::to_cbor_value).collect()),
            Value::EmptyMap,
        ])
    }

    pub fn to_cbor(&self) -> Vec<u8> {
        cbor::encode(&self.to_cbor_value())
    }

    /// `BLAKE2b-256(to_cbor())`
    pub fn id(&self) -> TxId {
        TxId::from_bytes(blake2b_256(&self.to_cbor()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::address::Address;

    fn input(byte: u8, index: u32) -> TxIn {
        TxIn::new(TxId::from_bytes([byte; 32]), index)
    }

    fn output(coins: u64) -> TxOut {
        TxOut::new(Address::from_raw_bytes(vec![0x82, 0x00, 0x00]), coins)
    }

    fn sample() -> TxAux {
        TxAux::new(vec![input(1, 0), input(2, 1)], vec![output(10), output(20)]).unwrap()
    }

    #[test]
    fn body_layout() {
        let bytes = sample().to_cbor();
        assert_eq!(&bytes[..2], &[0x83, 0x9f]);
        assert_eq!(bytes[bytes.len() - 1], 0xa0);

        // Two 42-byte inputs, then the break.
        assert_eq!(bytes[2 + 84], 0xff);
        assert_eq!(bytes[2 + 84 + 1], 0x9f);
        // Outputs: 82 <3 address bytes> <coins>
        assert_eq!(&bytes[88..93], &[0x82, 0x82, 0x00, 0x00, 0x0a]);
        assert_eq!(&bytes[93..98], &[0x82, 0x82, 0x00, 0x00, 0x14]);
        assert_eq!(bytes[98], 0xff);
        assert_eq!(bytes.len(), 100);
    }

    #[test]
    fn serialization_is_deterministic() {
        assert_eq!(sample().to_cbor(), sample().to_cbor());
        assert_eq!(sample().id(), sample().id());
    }

    #[test]
    fn id_is_blake2b_of_body() {
        let body = sample();
        assert_eq!(body.id().as_bytes(), &blake2b_256(&body.to_cbor()));
    }

    #[test]
    fn reordering_inputs_changes_id() {
        let swapped =
            TxAux::new(vec![input(2, 1), input(1, 0)], vec![output(10), output(20)]).unwrap();
        assert_ne!(sample().id(), swapped.id());
    }

    #[test]
    fn any_field_change_changes_id() {
        let base = sample().id();
        let variants = [
            TxAux::new(vec![input(1, 1), input(2, 1)], vec![output(10), output(20)]),
            TxAux::new(vec![input(3, 0), input(2, 1)], vec![output(10), output(20)]),
            TxAux::new(vec![input(1, 0), input(2, 1)], vec![output(11), output(20)]),
            TxAux::new(
                vec![input(1, 0), input(2, 1)],
                vec![
                    output(10),
                    TxOut::new(Address::from_raw_bytes(vec![0x82, 0x00, 0x01]), 20),
                ],
            ),
        ];
        for variant in variants {
            assert_ne!(variant.unwrap().id(), base);
        }
    }

    #[test]
    fn empty_lists_are_rejected() {
        assert_eq!(
            TxAux::new(vec![], vec![output(1)]),
            Err(TransactionError::NoInputs)
        );
        assert_eq!(
            TxAux::new(vec![input(1, 0)], vec![]),
            Err(TransactionError::NoOutputs)
        );
    }

    #[test]
    fn total_output_sums_coins() {
        assert_eq!(sample().total_output().unwrap(), 30);
        let overflow = TxAux::new(vec![input(1, 0)], vec![output(u64::MAX), output(1)]).unwrap();
        assert_eq!(overflow.total_output(), Err(TransactionError::AmountOverflow));
    }
}
