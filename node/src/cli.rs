//! # CLI Interface
//!
//! Defines the command-line argument structure for `byron-node` using
//! `clap` derive. Supports four subcommands: `send`, `relay`, `address`,
//! and `version`.

use std::time::Duration;

use byron_protocol::config::{
    DEFAULT_DIAL_TIMEOUT, DEFAULT_EXPLORER_UTXO_URL, DEFAULT_NODE_ADDR, DEFAULT_PHASE_TIMEOUT,
    DEFAULT_RELAY_BIND,
};
use byron_protocol::submission::SubmitConfig;
use clap::{Args, Parser, Subcommand};

/// Bootstrap-era wallet sender and transaction relay.
///
/// Builds and signs payments from a single ed25519 key, and pushes signed
/// transactions to a relay node over the legacy wire protocol, either
/// directly or through an HTTP relay service.
#[derive(Parser, Debug)]
#[command(
    name = "byron-node",
    about = "Bootstrap-era wallet sender and transaction relay",
    version,
    propagate_version = true
)]
pub struct ByronNodeCli {
    /// Log output format: `pretty` or `json`.
    #[arg(long, global = true, env = "BYRON_LOG_FORMAT", default_value = "pretty")]
    pub log_format: String,

    /// Subcommand to execute.
    #[command(subcommand)]
    pub command: Commands,
}

/// Top-level subcommands for the `byron-node` binary.
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Build, sign and (unless `--no-relay`) submit a payment.
    Send(SendArgs),
    /// Serve the HTTP submission relay.
    Relay(RelayArgs),
    /// Print the address controlled by the given key.
    Address(KeyArgs),
    /// Print version information and exit.
    Version,
}

/// Signing key material. Neither value has a default.
#[derive(Args, Debug)]
pub struct KeyArgs {
    /// Hex-encoded 32-byte ed25519 seed.
    #[arg(long, env = "BYRON_SEED", hide_env_values = true)]
    pub seed: String,

    /// Hex-encoded 32-byte chain code.
    #[arg(long, env = "BYRON_CHAIN_CODE", hide_env_values = true)]
    pub chain_code: String,
}

/// Per-submission timeouts.
#[derive(Args, Debug)]
pub struct TimeoutArgs {
    /// Seconds allowed for connecting to the relay node.
    #[arg(long, env = "BYRON_DIAL_TIMEOUT_SECS", default_value_t = DEFAULT_DIAL_TIMEOUT.as_secs())]
    pub dial_timeout_secs: u64,

    /// Seconds allowed for each inbound read of the handshake.
    #[arg(long, env = "BYRON_PHASE_TIMEOUT_SECS", default_value_t = DEFAULT_PHASE_TIMEOUT.as_secs())]
    pub phase_timeout_secs: u64,
}

impl TimeoutArgs {
    pub fn submit_config(&self) -> SubmitConfig {
        SubmitConfig {
            dial_timeout: Duration::from_secs(self.dial_timeout_secs),
            phase_timeout: Duration::from_secs(self.phase_timeout_secs),
        }
    }
}

/// Arguments for the `send` subcommand.
#[derive(Parser, Debug)]
pub struct SendArgs {
    #[command(flatten)]
    pub key: KeyArgs,

    /// Destination address (base58).
    #[arg(long)]
    pub address: String,

    /// Amount to send, in ADA (up to 6 decimals).
    #[arg(long, default_value = "1.0")]
    pub coins: String,

    /// Fee, in ADA (up to 6 decimals).
    #[arg(long, default_value = "0.2")]
    pub fee: String,

    /// Build and print the transaction without submitting it.
    #[arg(long)]
    pub no_relay: bool,

    /// Relay node to submit to, as `host:port`.
    #[arg(long, env = "BYRON_NODE", default_value = DEFAULT_NODE_ADDR)]
    pub node: String,

    /// Explorer endpoint answering bulk UTXO queries.
    #[arg(long, env = "BYRON_EXPLORER_URL", default_value = DEFAULT_EXPLORER_UTXO_URL)]
    pub explorer_url: String,

    #[command(flatten)]
    pub timeouts: TimeoutArgs,
}

/// Arguments for the `relay` subcommand.
#[derive(Parser, Debug)]
pub struct RelayArgs {
    /// Address the HTTP relay listens on.
    #[arg(long, env = "BYRON_BIND", default_value = DEFAULT_RELAY_BIND)]
    pub bind: String,

    /// Relay node every submission is forwarded to, as `host:port`.
    #[arg(long, env = "BYRON_NODE", default_value = DEFAULT_NODE_ADDR)]
    pub node: String,

    #[command(flatten)]
    pub timeouts: TimeoutArgs,
}
