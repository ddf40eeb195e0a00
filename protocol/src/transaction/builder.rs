//! Transaction construction via the builder pattern.
//!
//! The [`TransactionBuilder`] takes the wallet's unspent outputs, a
//! destination, an amount and a fee, and produces an unsigned [`TxAux`]
//! plus a [`CoinSelection`] describing how the inputs were chosen.
//!
//! Selection is greedy and order-preserving: UTXOs are taken in the order
//! the caller supplies them until their sum reaches `amount + fee`. No
//! attempt is made to minimize the number of inputs or the change.
//!
//! The builder does not sign; that happens in [`super::signing`]. This
//! keeps construction testable without key material.

use super::body::TxAux;
use super::error::TransactionError;
use super::types::{TxIn, TxOut, UnspentOutput};
use crate::address::Address;

// ---------------------------------------------------------------------------
// CoinSelection
// ---------------------------------------------------------------------------

/// How the inputs of a built transaction were chosen.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CoinSelection {
    /// The UTXOs spent, in the order they appear as inputs.
    pub selected: Vec<UnspentOutput>,
    /// Sum of the selected UTXOs.
    pub selected_total: u64,
    /// Sum of every UTXO offered to the builder.
    pub wallet_balance: u64,
    /// `amount + fee`.
    pub required: u64,
    /// `selected_total - required`. Paid back only when non-zero.
    pub change: u64,
}

/// The output of [`TransactionBuilder::build`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BuiltTransaction {
    pub aux: TxAux,
    pub selection: CoinSelection,
}

// ---------------------------------------------------------------------------
// TransactionBuilder
// ---------------------------------------------------------------------------

/// Fluent builder for unsigned transactions.
///
/// # Usage
///
/// ```rust,no_run
/// use byron_protocol::crypto::SigningIdentity;
/// use byron_protocol::transaction::{TransactionBuilder, UnspentOutput};
///
/// # fn utxos() -> Vec<UnspentOutput> { vec![] }
/// let identity = SigningIdentity::generate();
/// let destination = SigningIdentity::generate().address();
///
/// let built = TransactionBuilder::new()
///     .utxos(utxos())
///     .pay(destination, 1_000_000)
///     .fee(200_000)
///     .change_to(identity.address())
///     .build()
///     .unwrap();
/// ```
///
/// If no change address is set, change goes back to the address of the
/// first selected UTXO.
#[derive(Debug, Clone, Default)]
pub struct TransactionBuilder {
    utxos: Vec<UnspentOutput>,
    destination: Option<Address>,
    amount: u64,
    fee: u64,
    change_address: Option<Address>,
}

impl TransactionBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the UTXOs available for spending, in selection order.
    pub fn utxos(mut self, utxos: Vec<UnspentOutput>) -> Self {
        self.utxos = utxos;
        self
    }

    /// Sets the destination and the amount (lovelace) it receives.
    pub fn pay(mut self, destination: Address, amount: u64) -> Self {
        self.destination = Some(destination);
        self.amount = amount;
        self
    }

    /// Sets the fee in lovelace.
    pub fn fee(mut self, fee: u64) -> Self {
        self.fee = fee;
        self
    }

    /// Sets where change is paid.
    pub fn change_to(mut self, address: Address) -> Self {
        self.change_address = Some(address);
        self
    }

    /// Selects inputs and assembles the body.
    ///
    /// Fails with [`TransactionError::InsufficientFunds`] when the whole
    /// wallet cannot cover `amount + fee`. The destination output always
    /// comes first; a change output follows only if change is non-zero.
    pub fn build(self) -> Result<BuiltTransaction, TransactionError> {
        let destination = self.destination.ok_or(TransactionError::NoOutputs)?;
        let required = self
            .amount
            .checked_add(self.fee)
            .ok_or(TransactionError::AmountOverflow)?;

        let wallet_balance = self
            .utxos
            .iter()
            .try_fold(0u64, |acc, utxo| acc.checked_add(utxo.coins))
            .ok_or(TransactionError::AmountOverflow)?;

        let mut selected = Vec::new();
        let mut selected_total = 0u64;
        for utxo in &self.utxos {
            if selected_total >= required {
                break;
            }
            // Cannot overflow: bounded by wallet_balance.
            selected_total += utxo.coins;
            selected.push(utxo.clone());
        }

        if selected_total < required {
            return Err(TransactionError::InsufficientFunds {
                required,
                available: wallet_balance,
            });
        }

        let change = selected_total - required;
        let mut outputs = vec![TxOut::new(destination, self.amount)];
        if change > 0 {
            let change_address = match self.change_address {
                Some(address) => address,
                // Non-empty: change > 0 means something was selected.
                None => selected[0].address.clone(),
            };
            outputs.push(TxOut::new(change_address, change));
        }

        let inputs = selected.iter().map(TxIn::from).collect();
        let aux = TxAux::new(inputs, outputs)?;
        debug_assert_eq!(
            aux.total_output()?.checked_add(self.fee),
            Some(selected_total),
            "outputs plus fee must consume exactly the selected inputs"
        );

        Ok(BuiltTransaction {
            aux,
            selection: CoinSelection {
                selected,
                selected_total,
                wallet_balance,
                required,
                change,
            },
        })
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
