//! Core value types for transactions.
//!
//! All amounts are `u64` lovelace. ADA text from the command line is
//! converted with [`parse_ada`], which is exact; floating point never
//! touches a coin value.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use super::error::TransactionError;
use crate::address::Address;
use crate::cbor::Value;
use crate::config::{ADA_DECIMALS, LOVELACE_PER_ADA, TX_ID_LENGTH};

// ---------------------------------------------------------------------------
// TxId
// ---------------------------------------------------------------------------

/// A 32-byte transaction identifier, `BLAKE2b-256(cbor(body))`.
///
/// Parses from and displays as lowercase hex.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct TxId([u8; TX_ID_LENGTH]);

impl TxId {
    pub fn from_bytes(bytes: [u8; TX_ID_LENGTH]) -> Self {
        Self(bytes)
    }

    pub fn as_bytes(&self) -> &[u8; TX_ID_LENGTH] {
        &self.0
    }

    pub fn to_hex(&self) -> String {
        hex::encode(self.0)
    }

    /// Length-checked construction from a slice.
    pub fn try_from_slice(slice: &[u8]) -> Result<Self, TransactionError> {
        let bytes: [u8; TX_ID_LENGTH] = slice.try_into().map_err(|_| {
            TransactionError::InvalidTxHash(format!(
                "expected {TX_ID_LENGTH} bytes, got {}",
                slice.len()
            ))
        })?;
        Ok(Self(bytes))
    }
}

impl FromStr for TxId {
    type Err = TransactionError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let bytes =
            hex::decode(s.trim()).map_err(|e| TransactionError::InvalidTxHash(e.to_string()))?;
        Self::try_from_slice(&bytes)
    }
}

impl TryFrom<String> for TxId {
    type Error = TransactionError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<TxId> for String {
    fn from(id: TxId) -> Self {
        id.to_hex()
    }
}

impl fmt::Display for TxId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_hex())
    }
}

impl fmt::Debug for TxId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "TxId({})", self.to_hex())
    }
}

// ---------------------------------------------------------------------------
// UnspentOutput
// ---------------------------------------------------------------------------

/// A spendable output as reported by the explorer.
///
/// Immutable once fetched. `coins` and `address` only matter for coin
/// selection; the body references the output by hash and index alone.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UnspentOutput {
    pub tx_hash: TxId,
    pub output_index: u32,
    pub coins: u64,
    pub address: Address,
}

// ---------------------------------------------------------------------------
// TxIn / TxOut
// ---------------------------------------------------------------------------

/// Reference to the output being spent.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TxIn {
    pub tx_hash: TxId,
    pub output_index: u32,
}

impl TxIn {
    pub fn new(tx_hash: TxId, output_index: u32) -> Self {
        Self {
            tx_hash,
            output_index,
        }
    }

    /// `[0, tag24(cbor([bytes(txHash), index]))]`
    pub fn to_cbor_value(&self) -> Value {
        Value::Array(vec![
            Value::Unsigned(0),
            Value::nested(&Value::Array(vec![
                Value::Bytes(self.tx_hash.as_bytes().to_vec()),
                Value::Unsigned(self.output_index as u64),
            ])),
        ])
    }
}

impl From<&UnspentOutput> for TxIn {
    fn from(utxo: &UnspentOutput) -> Self {
        Self::new(utxo.tx_hash, utxo.output_index)
    }
}

/// A payment of `coins` lovelace to `address`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TxOut {
    pub address: Address,
    pub coins: u64,
}

impl TxOut {
    pub fn new(address: Address, coins: u64) -> Self {
        Self { address, coins }
    }

    /// `82 <raw address bytes> <coins>`
    ///
    /// The address bytes are already a complete CBOR item, so they go in
    /// as [`Value::Raw`] and not as a byte string.
    pub fn to_cbor_value(&self) -> Value {
        Value::Array(vec![
            Value::Raw(self.address.raw_bytes().to_vec()),
            Value::Unsigned(self.coins),
        ])
    }
}

// ---------------------------------------------------------------------------
// Amounts
// ---------------------------------------------------------------------------

/// Parses a decimal ADA amount (`"1"`, `"1.5"`, `"0.000001"`) into lovelace.
///
/// At most six fractional digits. Signs, exponents and separators are
/// rejected.
pub fn parse_ada(text: &str) -> Result<u64, TransactionError> {
    let invalid = |reason| TransactionError::InvalidAmount {
        input: text.to_string(),
        reason,
    };

    let trimmed = text.trim();
    let (whole, fraction) = match trimmed.split_once('.') {
        Some((whole, fraction)) => (whole, fraction),
        None => (trimmed, ""),
    };

    if whole.is_empty() && fraction.is_empty() {
        return Err(invalid("no digits"));
    }
    if !whole.bytes().all(|b| b.is_ascii_digit()) || !fraction.bytes().all(|b| b.is_ascii_digit()) {
        return Err(invalid("not a decimal number"));
    }
    if fraction.len() > ADA_DECIMALS {
        return Err(invalid("more than 6 decimal places"));
    }

    let whole: u64 = if whole.is_empty() {
        0
    } else {
        whole.parse().map_err(|_| TransactionError::AmountOverflow)?
    };
    let fraction: u64 = if fraction.is_empty() {
        0
    } else {
        let scale = 10u64.pow((ADA_DECIMALS - fraction.len()) as u32);
        // Six digits at most, cannot overflow.
        fraction.parse::<u64>().map_err(|_| invalid("not a decimal number"))? * scale
    };

    whole
        .checked_mul(LOVELACE_PER_ADA)
        .and_then(|l| l.checked_add(fraction))
        .ok_or(TransactionError::AmountOverflow)
}

/// Formats lovelace as ADA with all six decimals, e.g. `1.200000`.
pub fn format_ada(lovelace: u64) -> String {
    format!(
        "{}.{:0>width$}",
        lovelace / LOVELACE_PER_ADA,
        lovelace % LOVELACE_PER_ADA,
        width = ADA_DECIMALS
    )
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
