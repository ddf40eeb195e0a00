//! The submission state machine.
//!
//! One [`State`] per handshake phase. Each phase consumes exactly one
//! inbound read, checks it, sends whatever that phase sends, and names the
//! next state. The first error ends the run; the transport is closed on
//! every exit path.

use async_trait::async_trait;
use std::fmt;
use std::io;
use std::time::Duration;
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::TcpStream;
use tracing::{debug, info, warn};

use super::error::SubmitError;
use super::frames;
use super::SubmitConfig;
use crate::config::READ_CHUNK_SIZE;
use crate::transaction::TxId;

/// Message returned when the verdict frame is not an acceptance.
pub const REJECTED_BY_NETWORK: &str = "Transaction rejected by network";

// ---------------------------------------------------------------------------
// Transport
// ---------------------------------------------------------------------------

/// A bidirectional byte stream the engine can drive.
///
/// `recv` returns whatever a single read produced. An empty vector means
/// the peer closed its side.
#[async_trait]
pub trait Transport: Send {
    async fn send(&mut self, frame: &[u8]) -> io::Result<()>;
    async fn recv(&mut self) -> io::Result<Vec<u8>>;
    async fn close(&mut self) -> io::Result<()>;
}

/// [`Transport`] over a plain TCP connection.
pub struct TcpTransport {
    stream: TcpStream,
    buf: Vec<u8>,
}

impl TcpTransport {
    /// Dials `addr`, giving up after `timeout`.
    pub async fn connect(addr: &str, timeout: Duration) -> Result<Self, SubmitError> {
        let dial = |source| SubmitError::Dial {
            addr: addr.to_string(),
            source,
        };
        let stream = tokio::time::timeout(timeout, TcpStream::connect(addr))
            .await
            .map_err(|_| dial(io::Error::new(io::ErrorKind::TimedOut, "dial timed out")))?
            .map_err(dial)?;
        // Small frames go out back to back; let the kernel coalesce them.
        stream.set_nodelay(false).map_err(dial)?;
        Ok(Self::new(stream))
    }

    pub fn new(stream: TcpStream) -> Self {
        Self {
            stream,
            buf: vec![0u8; READ_CHUNK_SIZE],
        }
    }
}

#[async_trait]
impl Transport for TcpTransport {
    async fn send(&mut self, frame: &[u8]) -> io::Result<()> {
        self.stream.write_all(frame).await
    }

    async fn recv(&mut self) -> io::Result<Vec<u8>> {
        let n = self.stream.read(&mut self.buf).await?;
        Ok(self.buf[..n].to_vec())
    }

    async fn close(&mut self) -> io::Result<()> {
        self.stream.shutdown().await
    }
}

// ---------------------------------------------------------------------------
// Phase / State
// ---------------------------------------------------------------------------

/// Name of a handshake phase, as reported in errors and logs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Phase {
    Connect,
    InitialPing,
    ServerAck400,
    ExchangeTables,
    Frame401,
    Frame401Code,
    Frame401Answer,
    Frame401Chunk,
    SubmitHash,
    HashSubmitted,
    SubmitTransaction,
    Result,
    Done,
}

impl fmt::Display for Phase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Connect => "connect",
            Self::InitialPing => "initial ping",
            Self::ServerAck400 => "server ack 400",
            Self::ExchangeTables => "exchange of message code tables",
            Self::Frame401 => "frame 401",
            Self::Frame401Code => "frame 401 code",
            Self::Frame401Answer => "frame 401 answer",
            Self::Frame401Chunk => "frame 401 chunk",
            Self::SubmitHash => "submit transaction hash",
            Self::HashSubmitted => "hash submitted",
            Self::SubmitTransaction => "submit transaction",
            Self::Result => "result",
            Self::Done => "done",
        };
        f.write_str(name)
    }
}

/// Where the handshake is. Phases after the session code carry it along.
#[derive(Debug, Clone, PartialEq, Eq)]
enum State {
    InitialPing,
    ServerAck400,
    ExchangeTables,
    Frame401,
    Frame401Code,
    Frame401Answer { code: Vec<u8> },
    Frame401Chunk { code: Vec<u8> },
    SubmitHash { code: Vec<u8> },
    HashSubmitted,
    SubmitTransaction,
    Result,
    Done { accepted: bool },
}

impl State {
    fn phase(&self) -> Phase {
        match self {
            Self::InitialPing => Phase::InitialPing,
            Self::ServerAck400 => Phase::ServerAck400,
            Self::ExchangeTables => Phase::ExchangeTables,
            Self::Frame401 => Phase::Frame401,
            Self::Frame401Code => Phase::Frame401Code,
            Self::Frame401Answer { .. } => Phase::Frame401Answer,
            Self::Frame401Chunk { .. } => Phase::Frame401Chunk,
            Self::SubmitHash { .. } => Phase::SubmitHash,
            Self::HashSubmitted => Phase::HashSubmitted,
            Self::SubmitTransaction => Phase::SubmitTransaction,
            Self::Result => Phase::Result,
            Self::Done { .. } => Phase::Done,
        }
    }
}

// ---------------------------------------------------------------------------
// Engine
// ---------------------------------------------------------------------------

/// Drives one submission over one transport. Single use.
pub struct SubmissionEngine<T: Transport> {
    transport: T,
    tx_id: TxId,
    tx_hash_frame: Vec<u8>,
    tx_body_frame: Vec<u8>,
    phase_timeout: Duration,
}

impl<T: Transport> SubmissionEngine<T> {
    /// Prepares the frames for `tx_id` / `signed_tx`. Fails only if the
    /// transaction is too large to frame.
    pub fn new(
        transport: T,
        tx_id: TxId,
        signed_tx: &[u8],
        config: &SubmitConfig,
    ) -> Result<Self, SubmitError> {
        Ok(Self {
            transport,
            tx_id,
            tx_hash_frame: frames::tx_hash_frame(&tx_id),
            tx_body_frame: frames::tx_body_frame(signed_tx)?,
            phase_timeout: config.phase_timeout,
        })
    }

    /// Runs the handshake to completion and closes the transport.
    pub async fn run(mut self) -> Result<(), SubmitError> {
        let result = self.drive().await;
        if let Err(e) = self.transport.close().await {
            debug!(error = %e, "closing transport failed");
        }
        result
    }

    async fn drive(&mut self) -> Result<(), SubmitError> {
        self.send(Phase::Connect, &frames::INITIAL_FRAME).await?;

        let mut state = State::InitialPing;
        loop {
            let phase = state.phase();
            let inbound = match self.recv(phase).await {
                Ok(bytes) => bytes,
                // The verdict is already in; nothing the peer does now changes it.
                Err(e) if phase == Phase::Done => {
                    debug!(error = %e, "trailing read after verdict failed");
                    Vec::new()
                }
                Err(e) => return Err(e),
            };
            debug!(phase = %phase, bytes = inbound.len(), data = %hex::encode(&inbound), "inbound frame");

            match self.step(state, inbound).await? {
                Some(next) => state = next,
                None => return Ok(()),
            }
        }
    }

    /// Handles one phase. `None` means the handshake finished successfully.
    async fn step(&mut self, state: State, inbound: Vec<u8>) -> Result<Option<State>, SubmitError> {
        let phase = state.phase();
        let next = match state {
            State::InitialPing => {
                expect(phase, &inbound, &frames::INITIAL_PING_REPLY)?;
                self.send(phase, &frames::OPEN_400).await?;
                self.send(phase, &frames::COMMAND_TABLE).await?;
                State::ServerAck400
            }
            State::ServerAck400 => {
                expect(phase, &inbound, &frames::OPEN_400)?;
                State::ExchangeTables
            }
            State::ExchangeTables => {
                // The peer's own table is not checked; only its arrival matters.
                for frame in frames::CAPABILITY_FRAMES {
                    self.send(phase, frame).await?;
                }
                State::Frame401
            }
            State::Frame401 => {
                expect(phase, &inbound, &frames::OPEN_401)?;
                State::Frame401Code
            }
            State::Frame401Code => {
                let code = inbound;
                self.send(phase, &frames::OPEN_401).await?;
                self.send(phase, &frames::answer_session_code(&code)).await?;
                State::Frame401Answer { code }
            }
            State::Frame401Answer { code } => {
                expect(phase, &inbound, &frames::SESSION_ANSWER_REPLY)?;
                State::Frame401Chunk { code }
            }
            State::Frame401Chunk { code } => {
                self.send(phase, &frames::ACK_401).await?;
                State::SubmitHash { code }
            }
            State::SubmitHash { code } => {
                expect(phase, &inbound, &frames::ACK_401)?;
                self.send(phase, &frames::OPEN_402).await?;
                self.send(phase, &frames::rebind_session_code(&code)).await?;
                self.send(phase, &frames::ANNOUNCE_402).await?;
                let tx_hash_frame = std::mem::take(&mut self.tx_hash_frame);
                self.send(phase, &tx_hash_frame).await?;
                State::HashSubmitted
            }
            State::HashSubmitted => {
                expect(phase, &inbound, &frames::OPEN_402)?;
                State::SubmitTransaction
            }
            State::SubmitTransaction => {
                if frames::is_rejection(&inbound, &self.tx_id) {
                    warn!(tx_id = %self.tx_id, "peer refused the transaction id");
                    return Err(SubmitError::PeerRejected(format!(
                        "server error {phase}: peer refused transaction {}",
                        self.tx_id
                    )));
                }
                let tx_body_frame = std::mem::take(&mut self.tx_body_frame);
                self.send(phase, &tx_body_frame).await?;
                State::Result
            }
            State::Result => {
                let accepted = frames::is_acceptance(&inbound);
                self.send(phase, &frames::ACK_402).await?;
                State::Done { accepted }
            }
            State::Done { accepted } => {
                if accepted {
                    info!(tx_id = %self.tx_id, "transaction accepted by peer");
                    return Ok(None);
                }
                warn!(tx_id = %self.tx_id, "transaction rejected by peer");
                return Err(SubmitError::PeerRejected(REJECTED_BY_NETWORK.to_string()));
            }
        };
        Ok(Some(next))
    }

    async fn send(&mut self, phase: Phase, frame: &[u8]) -> Result<(), SubmitError> {
        self.transport
            .send(frame)
            .await
            .map_err(|source| SubmitError::Io { phase, source })
    }

    async fn recv(&mut self, phase: Phase) -> Result<Vec<u8>, SubmitError> {
        let bytes = tokio::time::timeout(self.phase_timeout, self.transport.recv())
            .await
            .map_err(|_| SubmitError::Timeout { phase })?
            .map_err(|source| SubmitError::Io { phase, source })?;
        if bytes.is_empty() {
            return Err(SubmitError::ConnectionClosed { phase });
        }
        Ok(bytes)
    }
}

fn expect(phase: Phase, received: &[u8], expected: &[u8]) -> Result<(), SubmitError> {
    if received == expected {
        return Ok(());
    }
    Err(SubmitError::ProtocolMismatch {
        phase,
        expected: hex::encode(expected),
        received: hex::encode(received),
    })
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
