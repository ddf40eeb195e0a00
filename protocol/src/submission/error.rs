//! Error types for transaction submission.
//!
//! Every variant is terminal for the attempt it came from. Nothing in the
//! engine retries; a caller that wants another go opens a fresh connection
//! and starts from the first phase.

use thiserror::Error;

use super::engine::Phase;

/// Errors that can occur while pushing a transaction to a relay node.
#[derive(Debug, Error)]
pub enum SubmitError {
    /// The TCP connection could not be established.
    #[error("failed to connect to {addr}: {source}")]
    Dial {
        addr: String,
        #[source]
        source: std::io::Error,
    },

    /// A read or write failed mid-handshake.
    #[error("i/o error during {phase}: {source}")]
    Io {
        phase: Phase,
        #[source]
        source: std::io::Error,
    },

    /// The peer sent nothing within the per-phase timeout.
    #[error("timed out during {phase}")]
    Timeout { phase: Phase },

    /// The peer closed the connection before the handshake finished.
    #[error("connection closed by peer during {phase}")]
    ConnectionClosed { phase: Phase },

    /// An inbound frame did not match the literal this phase requires.
    #[error("server error {phase}: expected {expected}, received {received}")]
    ProtocolMismatch {
        phase: Phase,
        /// Hex of the expected frame.
        expected: String,
        /// Hex of what arrived.
        received: String,
    },

    /// The peer signalled that it will not accept the transaction.
    #[error("{0}")]
    PeerRejected(String),

    /// The transaction does not fit the wire framing.
    #[error("encoding error: {0}")]
    Encoding(String),

    /// The submission request itself is unusable (empty or malformed fields).
    #[error("{0}")]
    InvalidRequest(String),
}

impl SubmitError {
    /// The phase the failure happened in, if it happened inside the handshake.
    pub fn phase(&self) -> Option<Phase> {
        match self {
            Self::Io { phase, .. }
            | Self::Timeout { phase }
            | Self::ConnectionClosed { phase }
            | Self::ProtocolMismatch { phase, .. } => Some(*phase),
            Self::Dial { .. } => Some(Phase::Connect),
            Self::PeerRejected(_) | Self::Encoding(_) | Self::InvalidRequest(_) => None,
        }
    }
}
