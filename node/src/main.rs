// Copyright (c) 2026 ALAS Technology. MIT License.
// See LICENSE for details.

//! # Byron Node
//!
//! Entry point for the `byron-node` binary. Parses CLI arguments, initializes
//! logging, and runs one of:
//!
//! - `send`: build, sign and submit a payment from a single key
//! - `relay`: serve the HTTP submission relay
//! - `address`: print the address controlled by a key
//! - `version`: print build version information
//!
//! Logs go to stderr. The `send` command prints its progress lines to
//! stdout.

mod api;
mod cli;
mod explorer;
mod logging;
mod metrics;

use anyhow::{Context, Result};
use clap::Parser;
use std::sync::Arc;
use tokio::signal;

use byron_protocol::address::Address;
use byron_protocol::config::MAINNET_PROTOCOL_MAGIC;
use byron_protocol::crypto::SigningIdentity;
use byron_protocol::submission;
use byron_protocol::transaction::{format_ada, parse_ada, sign_transaction, TransactionBuilder};

use cli::{ByronNodeCli, Commands, KeyArgs};
use explorer::ExplorerClient;
use logging::LogFormat;
use metrics::RelayMetrics;

#[tokio::main]
async fn main() -> Result<()> {
    let cli = ByronNodeCli::parse();

    if let Commands::Version = cli.command {
        print_version();
        return Ok(());
    }

    logging::init_logging(
        logging::DEFAULT_DIRECTIVES,
        LogFormat::from_str_lossy(&cli.log_format),
    );

    match cli.command {
        Commands::Send(args) => send(args).await,
        Commands::Relay(args) => run_relay(args).await,
        Commands::Address(args) => print_address(&args),
        Commands::Version => Ok(()),
    }
}

fn load_identity(key: &KeyArgs) -> Result<SigningIdentity> {
    SigningIdentity::from_hex(&key.seed, &key.chain_code).context("invalid key material")
}

/// Builds, signs and (unless `--no-relay`) submits one payment.
async fn send(args: cli::SendArgs) -> Result<()> {
    let identity = load_identity(&args.key)?;
    let from = identity.address();
    let to: Address = args
        .address
        .parse()
        .with_context(|| format!("invalid destination address: {}", args.address))?;
    let amount = parse_ada(&args.coins).context("invalid --coins")?;
    let fee = parse_ada(&args.fee).context("invalid --fee")?;

    let explorer = ExplorerClient::new(args.explorer_url.as_str())
        .context("failed to build explorer client")?;
    let utxos = explorer
        .unspent_outputs(std::slice::from_ref(&from))
        .await
        .with_context(|| format!("failed to fetch UTXOs for {from}"))?;
    tracing::info!(address = %from, utxos = utxos.len(), "wallet loaded");

    let built = TransactionBuilder::new()
        .utxos(utxos)
        .pay(to.clone(), amount)
        .fee(fee)
        .change_to(from.clone())
        .build()
        .context("failed to build transaction")?;

    let selection = &built.selection;
    for utxo in &selection.selected {
        println!("cuId: {}", utxo.tx_hash);
        println!("cuOutIndex: {}", utxo.output_index);
        println!("getCoin: {}", utxo.coins);
    }
    println!("fromAddress: {from}");
    println!("toAddress: {to}");
    println!("toAmount: {}", format_ada(amount));
    println!("totalIn: {}", selection.selected_total);
    println!("fee: {}", format_ada(fee));
    println!(
        "address:{} balance: {}",
        from,
        selection.wallet_balance.saturating_sub(selection.required)
    );
    if selection.change > 0 {
        println!("changeValue: {}", selection.change);
    }

    let tx = sign_transaction(built.aux, &identity);
    println!("txHash: {}", tx.id());
    println!("txBody: {}", tx.to_hex());

    if args.no_relay {
        tracing::info!("--no-relay given, not submitting");
        return Ok(());
    }

    submission::submit(&args.node, &tx, &args.timeouts.submit_config())
        .await
        .with_context(|| format!("submission to {} failed", args.node))?;
    println!("success");
    Ok(())
}

/// Serves the HTTP relay until SIGINT/SIGTERM.
async fn run_relay(args: cli::RelayArgs) -> Result<()> {
    let state = api::AppState {
        submitter: Arc::new(api::NodeSubmitter::new(
            args.node.clone(),
            args.timeouts.submit_config(),
        )),
        metrics: Arc::new(RelayMetrics::new()),
    };
    let app = api::create_router(state);

    let listener = tokio::net::TcpListener::bind(&args.bind)
        .await
        .with_context(|| format!("failed to bind relay listener on {}", args.bind))?;
    tracing::info!(bind = %args.bind, node = %args.node, "relay listening");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("relay server error")?;

    tracing::info!("relay stopped");
    Ok(())
}

fn print_address(key: &KeyArgs) -> Result<()> {
    let identity = load_identity(key)?;
    println!("{}", identity.address());
    Ok(())
}

fn print_version() {
    println!("byron-node {}", env!("CARGO_PKG_VERSION"));
    println!("magic      {}", MAINNET_PROTOCOL_MAGIC);
    println!("rustc      {}", rustc_version());
}

/// Returns the Rust compiler version used to build this binary.
fn rustc_version() -> &'static str {
    option_env!("RUSTC_VERSION").unwrap_or("unknown")
}

/// Waits for SIGINT (Ctrl+C) or SIGTERM, whichever comes first.
///
/// On non-Unix platforms, only Ctrl+C is supported.
async fn shutdown_signal() {
    let ctrl_c = async {
        signal::ctrl_c()
            .await
            .expect("failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        signal::unix::signal(signal::unix::SignalKind::terminate())
            .expect("failed to install SIGTERM handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {}
        _ = terminate => {}
    }
    tracing::info!("shutdown signal received, draining connections");
}
