//! Frame literals and the byte-level transforms applied to them.
//!
//! Every frame on this wire starts with an 8-byte header: a 4-byte
//! lightweight-connection id and a 4-byte big-endian payload length. The
//! handshake runs on connection `0x400`, the session-code exchange on
//! `0x401`, and the transaction itself on `0x402`. Control frames carry
//! zero-length payloads (`00000000 00000400` etc.).
//!
//! Nothing here is parsed. Inbound frames are compared to literals
//! byte-for-byte and outbound frames are either literals or one of the
//! few constructed frames below.

use hex_literal::hex;

use super::error::SubmitError;
use crate::transaction::TxId;

/// Length of a frame header: connection id then payload length.
pub const HEADER_LENGTH: usize = 8;

// ---------------------------------------------------------------------------
// Handshake (connection 0x400)
// ---------------------------------------------------------------------------

/// First bytes on the wire after dialing.
pub const INITIAL_FRAME: [u8; 16] = hex!("00000000000000080000000000000000");

/// The peer's answer to [`INITIAL_FRAME`].
pub const INITIAL_PING_REPLY: [u8; 4] = hex!("00000000");

/// Opens connection `0x400`. Sent by us, then echoed by the peer.
pub const OPEN_400: [u8; 8] = hex!("0000000000000400");

/// The client's message-code table, sent right after [`OPEN_400`].
///
/// Two frames back to back on connection `0x400`: a 275-byte CBOR table of
/// message codes, then a 9-byte session payload.
pub const COMMAND_TABLE: [u8; 300] = hex!(
    "0000040000000113841a2d964a0983000100b3048200d8184105058200d81841"
    "04068200d818410718228200d81842185e18258200d81842185e182b8200d818"
    "42185d18318200d81842185c18378200d818421862183d8200d8184218611843"
    "8200d81842186018498200d81842185f18538200d8184100185c8200d8184218"
    "31185d8200d81842182b185e8200d818421825185f8200d81842184918608200"
    "d81842184318618200d81842183d18628200d818421837ac048200d818410505"
    "8200d8184104068200d81841070d8200d818410018258200d81842185e182b82"
    "00d81842185d18318200d81842185c18378200d818421862183d8200d8184218"
    "6118438200d81842186018498200d81842185f18538200d81841000000040000"
    "00000953bf09d6cf984ce8cd"
);

/// Capability frames sent once the peer has sent its own tables.
pub const CAPABILITY_FRAMES: [&[u8]; 2] = [
    &hex!("00000400000000010d"),
    &hex!("0000040000000002182a"),
];

// ---------------------------------------------------------------------------
// Session code (connection 0x401)
// ---------------------------------------------------------------------------

/// Opens connection `0x401`. Sent by the peer first, then echoed by us.
pub const OPEN_401: [u8; 8] = hex!("0000000000000401");

/// The peer's reply to our answered session code.
pub const SESSION_ANSWER_REPLY: [u8; 9] = hex!("000004010000000105");

/// Acknowledges the chunk that follows the session answer.
pub const ACK_401: [u8; 8] = hex!("0000000100000401");

/// First payload byte of a session code as announced by the peer.
pub const SESSION_ANNOUNCE: u8 = 0x53;

/// First payload byte of the same session code in our answer.
pub const SESSION_ACCEPT: u8 = 0x41;

/// Low nibble of the last length byte of an announced session code.
const SESSION_LENGTH_NIBBLE: u8 = 0x09;

// ---------------------------------------------------------------------------
// Transaction (connection 0x402)
// ---------------------------------------------------------------------------

/// Lightweight connection the transaction travels on.
pub const TX_CONNECTION: [u8; 4] = hex!("00000402");

/// Connection id the session code arrives on.
pub const SESSION_CONNECTION: [u8; 4] = hex!("00000401");

/// Opens connection `0x402`. Sent by us, then echoed by the peer.
pub const OPEN_402: [u8; 8] = hex!("0000000000000402");

/// Announces the inventory map on connection `0x402`.
pub const ANNOUNCE_402: [u8; 10] = hex!("00000402000000021825");

/// Final acknowledgement after the verdict.
pub const ACK_402: [u8; 8] = hex!("0000000100000402");

/// Length (36) then `[0, bytes(32)` header: the envelope around a tx id.
const TX_HASH_ENVELOPE: [u8; 8] = hex!("0000002482005820");

/// `[1, ` prefix of the transaction payload.
const TX_BODY_TAG: [u8; 2] = hex!("8201");

/// Start of the frame a peer sends when it refuses the announced id.
pub const REJECTION_PREFIX: [u8; 8] = hex!("0000402000000094");

/// Bytes between the rejection marker nibble and the echoed id.
const REJECTION_ID_ENVELOPE: [u8; 4] = hex!("52005820");

/// CBOR `true`, the last byte of an accepting verdict.
pub const CBOR_TRUE: u8 = 0xf5;

// ---------------------------------------------------------------------------
// Transforms
// ---------------------------------------------------------------------------

/// Turns the peer's session code into our answer to it.
///
/// The first payload byte flips from [`SESSION_ANNOUNCE`] to
/// [`SESSION_ACCEPT`], but only when the low nibble of the last length
/// byte is `9` (hex `..9 53..` at the header boundary). Anything else is
/// echoed unchanged.
pub fn answer_session_code(code: &[u8]) -> Vec<u8> {
    let mut answer = code.to_vec();
    let announced = code.len() > HEADER_LENGTH
        && code[HEADER_LENGTH - 1] & 0x0f == SESSION_LENGTH_NIBBLE
        && code[HEADER_LENGTH] == SESSION_ANNOUNCE;
    if announced {
        answer[HEADER_LENGTH] = SESSION_ACCEPT;
    }
    answer
}

/// Moves the session code from connection `0x401` to `0x402`.
///
/// Only the connection id in the header changes; the payload is untouched.
pub fn rebind_session_code(code: &[u8]) -> Vec<u8> {
    let mut rebound = code.to_vec();
    if rebound.starts_with(&SESSION_CONNECTION) {
        rebound[..TX_CONNECTION.len()].copy_from_slice(&TX_CONNECTION);
    }
    rebound
}

/// `00000402 00000024 82 00 58 20 <tx id>`, the inventory announcement.
pub fn tx_hash_frame(tx_id: &TxId) -> Vec<u8> {
    let mut frame = Vec::with_capacity(TX_CONNECTION.len() + TX_HASH_ENVELOPE.len() + 32);
    frame.extend_from_slice(&TX_CONNECTION);
    frame.extend_from_slice(&TX_HASH_ENVELOPE);
    frame.extend_from_slice(tx_id.as_bytes());
    frame
}

/// `00000402 <len> 82 01 <signed tx>`, where `len` counts the payload
/// including the `82 01` prefix.
pub fn tx_body_frame(signed_tx: &[u8]) -> Result<Vec<u8>, SubmitError> {
    let payload_len = signed_tx.len() + TX_BODY_TAG.len();
    let len = u32::try_from(payload_len).map_err(|_| {
        SubmitError::Encoding(format!(
            "transaction of {} bytes does not fit a frame",
            signed_tx.len()
        ))
    })?;

    let mut frame = Vec::with_capacity(HEADER_LENGTH + payload_len);
    frame.extend_from_slice(&TX_CONNECTION);
    frame.extend_from_slice(&len.to_be_bytes());
    frame.extend_from_slice(&TX_BODY_TAG);
    frame.extend_from_slice(signed_tx);
    Ok(frame)
}

/// True if `frame` is the peer refusing `tx_id` after the announcement.
///
/// Shape: [`REJECTION_PREFIX`], anything, then a byte whose low nibble is
/// `2`, then `52 00 58 20` and the 32-byte id.
pub fn is_rejection(frame: &[u8], tx_id: &TxId) -> bool {
    let tail_len = REJECTION_ID_ENVELOPE.len() + tx_id.as_bytes().len();
    if !frame.starts_with(&REJECTION_PREFIX) || frame.len() < tail_len + 1 {
        return false;
    }
    let (head, tail) = frame.split_at(frame.len() - tail_len);
    let marker = head[head.len() - 1];
    marker & 0x0f == 0x02
        && tail[..REJECTION_ID_ENVELOPE.len()] == REJECTION_ID_ENVELOPE
        && &tail[REJECTION_ID_ENVELOPE.len()..] == tx_id.as_bytes()
}

/// True if the verdict frame ends in CBOR `true`.
pub fn is_acceptance(frame: &[u8]) -> bool {
    frame.last() == Some(&CBOR_TRUE)
}
