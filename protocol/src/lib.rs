// Copyright (c) 2026 ALAS Technology. MIT License.
// See LICENSE for details.

//! # Byron Protocol: Core Library
//!
//! Everything needed to move coins on a bootstrap-era (Byron) network
//! without a full node: build the transaction, sign it, serialize it into
//! the exact bytes the network expects, and push it to a relay node over
//! the legacy multiplexed wire protocol.
//!
//! There is no schema negotiation anywhere in this stack. A single flipped
//! bit in the body encoding, the address checksum, or a transport frame
//! means the node silently drops the transaction (or, worse, the coins go
//! somewhere nobody can spend them). Treat every byte literal in here as
//! load-bearing.
//!
//! ## Architecture
//!
//! - **cbor**: The tiny CBOR subset the transaction format needs. Not a
//!   general CBOR library and never going to be one.
//! - **crypto**: SHA3-256, BLAKE2b-224/256, CRC32 and the ed25519
//!   [`SigningIdentity`](crypto::SigningIdentity).
//! - **address**: Bootstrap-era address derivation and raw decoding.
//! - **transaction**: Inputs, outputs, the unsigned body ("Aux"), witnesses,
//!   coin selection and signing.
//! - **submission**: The one-shot handshake/framing state machine that
//!   delivers a signed transaction to a relay node.
//! - **config**: Protocol constants and network defaults.
//!
//! ## Control Flow
//!
//! ```text
//! UTXOs ─► TransactionBuilder ─► TxAux ─► sign_transaction ─► SignedTransaction
//!                                                              │
//!                                              (TxId, body bytes)
//!                                                              ▼
//!                                                   submission::submit ─► relay node
//! ```

pub mod address;
pub mod cbor;
pub mod config;
pub mod crypto;
pub mod submission;
pub mod transaction;
