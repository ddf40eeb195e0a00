use thiserror::Error;

use crate::address::AddressError;

/// Errors raised while assembling or signing a transaction.
///
/// All of them are detected before any network I/O happens.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum TransactionError {
    /// The wallet's unspent outputs cannot cover `amount + fee`.
    #[error("insufficient funds: need {required} lovelace, wallet holds {available}")]
    InsufficientFunds { required: u64, available: u64 },

    /// A coin sum does not fit in 64 bits.
    #[error("amount overflows u64")]
    AmountOverflow,

    /// An ADA amount string could not be parsed.
    #[error("invalid amount {input:?}: {reason}")]
    InvalidAmount { input: String, reason: &'static str },

    /// A transaction hash is not 32 bytes of hex.
    #[error("invalid transaction hash: {0}")]
    InvalidTxHash(String),

    /// A body must spend at least one input.
    #[error("transaction has no inputs")]
    NoInputs,

    /// A body must pay at least one output.
    #[error("transaction has no outputs")]
    NoOutputs,

    /// Every input needs exactly one witness.
    #[error("{inputs} inputs but {witnesses} witnesses")]
    WitnessCountMismatch { inputs: usize, witnesses: usize },

    #[error(transparent)]
    Address(#[from] AddressError),
}
