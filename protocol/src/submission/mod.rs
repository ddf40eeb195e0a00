//! # Submission Protocol Engine
//!
//! Pushes a signed transaction to a relay node over the legacy multiplexed
//! wire protocol. There is no generic frame parser: the client walks a
//! fixed sequence of phases, and at each one compares what the peer sent
//! against a literal or captures it verbatim.
//!
//! ## Phases
//!
//! ```text
//! connect              send 00000000 00000008 00000000 00000000
//! initial ping         expect 00000000          → send open-400, command table
//! server ack 400       expect open-400
//! exchange tables      (peer's table, unchecked) → send two capability frames
//! frame 401            expect open-401
//! frame 401 code       capture session code     → send open-401, answered code
//! frame 401 answer     expect 00000401 00000001 05
//! frame 401 chunk      (one chunk, unchecked)   → send ack-401
//! submit hash          expect ack-401           → send open-402, rebound code,
//!                                                  announce, tx id frame
//! hash submitted       expect open-402
//! submit transaction   refusal check            → send tx body frame
//! result               verdict = ends in f5     → send ack-402
//! done                 (one trailing chunk)     → Ok or "rejected by network"
//! ```
//!
//! Every phase performs exactly one read, bounded by
//! [`SubmitConfig::phase_timeout`]. Any mismatch, I/O error, timeout or
//! early close ends the attempt, except in `done`: the verdict is known by
//! then, so a failed trailing read is ignored. One connection per attempt,
//! no retries, and the connection is closed whatever the outcome.

pub mod engine;
pub mod error;
pub mod frames;

pub use engine::{Phase, SubmissionEngine, TcpTransport, Transport, REJECTED_BY_NETWORK};
pub use error::SubmitError;

use std::time::Duration;
use tracing::info;

use crate::config::{DEFAULT_DIAL_TIMEOUT, DEFAULT_PHASE_TIMEOUT};
use crate::transaction::{SignedTransaction, TxId};

/// Timeouts for one submission attempt.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SubmitConfig {
    /// Upper bound on establishing the TCP connection.
    pub dial_timeout: Duration,
    /// Upper bound on each inbound read.
    pub phase_timeout: Duration,
}

impl Default for SubmitConfig {
    fn default() -> Self {
        Self {
            dial_timeout: DEFAULT_DIAL_TIMEOUT,
            phase_timeout: DEFAULT_PHASE_TIMEOUT,
        }
    }
}

/// Submits a signed transaction to `node_addr`.
pub async fn submit(
    node_addr: &str,
    tx: &SignedTransaction,
    config: &SubmitConfig,
) -> Result<(), SubmitError> {
    submit_raw(node_addr, &tx.id(), &tx.to_cbor(), config).await
}

/// Submits an already-serialized transaction under the given id.
///
/// The id is not checked against the bytes; the peer does that.
pub async fn submit_raw(
    node_addr: &str,
    tx_id: &TxId,
    signed_tx: &[u8],
    config: &SubmitConfig,
) -> Result<(), SubmitError> {
    if signed_tx.is_empty() {
        return Err(SubmitError::InvalidRequest("Bad request body".to_string()));
    }
    info!(node = node_addr, tx_id = %tx_id, bytes = signed_tx.len(), "submitting transaction");
    let transport = TcpTransport::connect(node_addr, config.dial_timeout).await?;
    submit_over(transport, tx_id, signed_tx, config).await
}

/// Runs the handshake over an already-open transport.
pub async fn submit_over<T: Transport>(
    transport: T,
    tx_id: &TxId,
    signed_tx: &[u8],
    config: &SubmitConfig,
) -> Result<(), SubmitError> {
    SubmissionEngine::new(transport, *tx_id, signed_tx, config)?
        .run()
        .await
}
