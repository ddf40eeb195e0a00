//! # Transaction Module
//!
//! Construction, serialization and signing of bootstrap-era transactions.
//!
//! ## Architecture
//!
//! ```text
//! types.rs   : TxId, UnspentOutput, TxIn, TxOut, ADA amount parsing
//! body.rs    : TxAux, the unsigned body, and its content-addressed id
//! witness.rs : TxWitness and SignedTransaction serialization
//! builder.rs : TransactionBuilder: greedy coin selection and change
//! signing.rs : sign_transaction: one witness per input
//! error.rs   : TransactionError
//! ```
//!
//! ## Transaction Lifecycle
//!
//! 1. **Select**: [`TransactionBuilder`] walks the wallet's UTXOs in order
//!    and picks inputs until `amount + fee` is covered.
//! 2. **Build**: the result is a [`TxAux`] whose id is
//!    `BLAKE2b-256(cbor(body))`.
//! 3. **Sign**: [`sign_transaction`] attaches one witness per input.
//! 4. **Serialize**: [`SignedTransaction::to_cbor`] produces the bytes
//!    handed to [`crate::submission`].
//!
//! ## Wire Layout
//!
//! ```text
//! body    = 83 9f <input>* ff 9f <output>* ff a0
//! input   = [0, tag24(cbor([bytes(txHash), index]))]
//! output  = 82 <raw address bytes> <coins>
//! witness = [0, tag24(cbor([bytes(xpub), bytes(signature)]))]
//! signed  = 82 <body> array(n) <witness>*
//! ```
//!
//! Inputs and outputs use indefinite-length arrays, everything else uses
//! definite lengths. Getting that backwards produces a transaction that
//! serializes fine and is silently dropped by the network.

pub mod body;
pub mod builder;
pub mod error;
pub mod signing;
pub mod types;
pub mod witness;

pub use body::TxAux;
pub use builder::{BuiltTransaction, CoinSelection, TransactionBuilder};
pub use error::TransactionError;
pub use signing::{sign_transaction, signing_message};
pub use types::{format_ada, parse_ada, TxId, TxIn, TxOut, UnspentOutput};
pub use witness::{SignedTransaction, TxWitness};
