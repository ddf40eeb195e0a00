//! # UTXO Explorer Client
//!
//! Looks up spendable outputs through a third-party explorer's bulk UTXO
//! endpoint. The request is a JSON array of base58 addresses; the answer is
//! an `Either`-style envelope:
//!
//! ```json
//! {"Right": [{"cuAddress": "Ae2...", "cuId": "<hex>", "cuOutIndex": 0,
//!             "cuCoins": {"getCoin": "1500000"}}]}
//! ```
//!
//! or `{"Left": "<message>"}`. Amounts arrive as decimal strings.
//! A malformed entry fails the whole lookup; silently skipping one would
//! make the reported balance wrong.

use std::time::Duration;

use byron_protocol::address::Address;
use byron_protocol::transaction::{TxId, UnspentOutput};
use serde::Deserialize;
use thiserror::Error;
use tracing::debug;

const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

#[derive(Debug, Error)]
pub enum ExplorerError {
    #[error("explorer request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("explorer returned an error: {0}")]
    Rejected(String),

    #[error("malformed explorer response: {0}")]
    Malformed(String),
}

#[derive(Deserialize)]
enum Envelope {
    Left(serde_json::Value),
    Right(Vec<RawUtxo>),
}

#[derive(Deserialize)]
struct RawUtxo {
    #[serde(rename = "cuAddress")]
    address: String,
    #[serde(rename = "cuId")]
    id: String,
    #[serde(rename = "cuOutIndex")]
    out_index: u32,
    #[serde(rename = "cuCoins")]
    coins: RawCoins,
}

#[derive(Deserialize)]
struct RawCoins {
    #[serde(rename = "getCoin")]
    get_coin: String,
}

impl RawUtxo {
    fn into_unspent(self, index: usize) -> Result<UnspentOutput, ExplorerError> {
        let tx_hash: TxId = self
            .id
            .parse()
            .map_err(|e| ExplorerError::Malformed(format!("entry {index}: cuId: {e}")))?;
        let coins: u64 = self.coins.get_coin.parse().map_err(|e| {
            ExplorerError::Malformed(format!(
                "entry {index}: getCoin {:?}: {e}",
                self.coins.get_coin
            ))
        })?;
        let address: Address = self
            .address
            .parse()
            .map_err(|e| ExplorerError::Malformed(format!("entry {index}: cuAddress: {e}")))?;
        Ok(UnspentOutput {
            tx_hash,
            output_index: self.out_index,
            coins,
            address,
        })
    }
}

/// Parses the explorer's bulk UTXO answer, keeping the listed order.
pub fn parse_utxo_response(body: &str) -> Result<Vec<UnspentOutput>, ExplorerError> {
    let envelope: Envelope =
        serde_json::from_str(body).map_err(|e| ExplorerError::Malformed(e.to_string()))?;
    match envelope {
        Envelope::Left(serde_json::Value::String(msg)) => Err(ExplorerError::Rejected(msg)),
        Envelope::Left(other) => Err(ExplorerError::Rejected(other.to_string())),
        Envelope::Right(entries) => entries
            .into_iter()
            .enumerate()
            .map(|(i, raw)| raw.into_unspent(i))
            .collect(),
    }
}

/// HTTP client for the bulk UTXO endpoint.
#[derive(Debug, Clone)]
pub struct ExplorerClient {
    http: reqwest::Client,
    url: String,
}

impl ExplorerClient {
    pub fn new(url: impl Into<String>) -> Result<Self, ExplorerError> {
        let http = reqwest::Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()?;
        Ok(Self {
            http,
            url: url.into(),
        })
    }

    /// Fetches every unspent output held by `addresses`.
    pub async fn unspent_outputs(
        &self,
        addresses: &[Address],
    ) -> Result<Vec<UnspentOutput>, ExplorerError> {
        let query: Vec<&str> = addresses.iter().map(Address::as_str).collect();
        debug!(url = %self.url, addresses = query.len(), "querying explorer");

        let body = self
            .http
            .post(&self.url)
            .json(&query)
            .send()
            .await?
            .error_for_status()?
            .text()
            .await?;

        let utxos = parse_utxo_response(&body)?;
        debug!(utxos = utxos.len(), "explorer answered");
        Ok(utxos)
    }
}
