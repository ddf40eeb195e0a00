//! # Protocol Configuration & Constants
//!
//! Every magic number the legacy network cares about lives here, plus the
//! defaults the binaries fall back to. The wire-protocol frame literals are
//! the exception: they sit next to the code that sends them in
//! [`crate::submission::frames`], because they only make sense in the
//! context of the phase that uses them.
//!
//! None of the protocol constants are configuration in the usual sense.
//! Changing one of them does not "tune" anything, it just makes the relay
//! node stop talking to you.

use std::time::Duration;

use hex_literal::hex;

// ---------------------------------------------------------------------------
// Signing
// ---------------------------------------------------------------------------

/// Prefix prepended to the transaction id before signing.
///
/// It is itself a fragment of CBOR: `01` (the transaction-signing tag),
/// `1a 2d964a09` (mainnet protocol magic 764824073) and `58 20` (a 32-byte
/// byte-string header that the id completes).
pub const TX_SIGN_MESSAGE_PREFIX: [u8; 8] = hex!("011a2d964a095820");

/// Mainnet protocol magic, as embedded in [`TX_SIGN_MESSAGE_PREFIX`].
pub const MAINNET_PROTOCOL_MAGIC: u32 = 764_824_073;

// ---------------------------------------------------------------------------
// Key Material
// ---------------------------------------------------------------------------

/// Ed25519 seed length in bytes.
pub const SEED_LENGTH: usize = 32;

/// Chain code length in bytes.
pub const CHAIN_CODE_LENGTH: usize = 32;

/// Extended public key length: 32-byte public key followed by the chain code.
pub const XPUB_LENGTH: usize = 64;

/// Ed25519 signature length.
pub const SIGNATURE_LENGTH: usize = 64;

/// Transaction id length (BLAKE2b-256 digest).
pub const TX_ID_LENGTH: usize = 32;

/// Address root hash length (BLAKE2b-224 digest).
pub const ADDRESS_ROOT_LENGTH: usize = 28;

// ---------------------------------------------------------------------------
// Amounts
// ---------------------------------------------------------------------------

/// Lovelace per ADA. All on-chain amounts are integers in lovelace.
pub const LOVELACE_PER_ADA: u64 = 1_000_000;

/// Maximum number of fractional digits an ADA amount may carry.
pub const ADA_DECIMALS: usize = 6;

// ---------------------------------------------------------------------------
// Network Defaults
// ---------------------------------------------------------------------------

/// Default relay node the transaction is pushed to.
pub const DEFAULT_NODE_ADDR: &str = "relays.cardano-mainnet.iohk.io:3000";

/// Default explorer endpoint answering bulk UTXO queries.
pub const DEFAULT_EXPLORER_UTXO_URL: &str = "https://explorer2.adalite.io/api/bulk/addresses/utxo";

/// Default bind address for the HTTP relay service.
pub const DEFAULT_RELAY_BIND: &str = "0.0.0.0:3000";

/// Path the HTTP relay accepts submissions on.
pub const RELAY_SUBMIT_PATH: &str = "/api/txs/submit";

// ---------------------------------------------------------------------------
// Timing
// ---------------------------------------------------------------------------

/// Upper bound on establishing the TCP connection to the relay node.
pub const DEFAULT_DIAL_TIMEOUT: Duration = Duration::from_secs(10);

/// Upper bound on every single inbound read of the submission handshake.
/// A stalled peer is a failed submission, not a reason to hang forever.
pub const DEFAULT_PHASE_TIMEOUT: Duration = Duration::from_secs(30);

/// Size of the buffer one inbound read fills. Every phase of the handshake
/// consumes exactly one read of at most this many bytes.
pub const READ_CHUNK_SIZE: usize = 1024;
