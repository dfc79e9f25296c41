//! `LedgerRpc` backed by the nonblocking solana `RpcClient`

use async_trait::async_trait;
use base64::{engine::general_purpose::STANDARD as BASE64, Engine as _};
use serde_json::json;
use solana_client::{nonblocking::rpc_client::RpcClient, rpc_request::RpcRequest};
use solana_sdk::{hash::Hash, signature::Signature};
use std::str::FromStr;
use std::time::Duration;
use tracing::{debug, instrument};

use super::{LedgerRpc, RpcError};
use crate::config::{Config, RpcConfig, SendConfig};
use crate::metrics::Timer;

/// Single-endpoint ledger client.
///
/// The request timeout configured here is the only timeout in the pipeline; a
/// request the node never answers surfaces as [`RpcError::Timeout`]. Errors are
/// classified by [`RpcError::from_client_error`].
pub struct SolanaRpc {
    client: RpcClient,
    endpoint: String,
    send: SendConfig,
}

impl std::fmt::Debug for SolanaRpc {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SolanaRpc")
            .field("endpoint", &self.endpoint)
            .field("send", &self.send)
            .finish_non_exhaustive()
    }
}

impl SolanaRpc {
    pub fn new(rpc: &RpcConfig, send: &SendConfig) -> Self {
        let client = RpcClient::new_with_timeout_and_commitment(
            rpc.url.clone(),
            Duration::from_secs(rpc.timeout_secs),
            rpc.commitment.to_commitment_config(),
        );

        Self {
            client,
            endpoint: rpc.url.clone(),
            send: send.clone(),
        }
    }

    pub fn from_config(config: &Config) -> Self {
        Self::new(&config.rpc, &config.send)
    }
}

#[async_trait]
impl LedgerRpc for SolanaRpc {
    #[instrument(skip(self), fields(endpoint = %self.endpoint))]
    async fn get_latest_blockhash(&self) -> Result<Hash, RpcError> {
        let timer = Timer::with_name("rpc_latency_seconds");
        let result = self
            .client
            .get_latest_blockhash()
            .await
            .map_err(|e| RpcError::from_client_error(e, &self.endpoint));
        timer.finish();
        result
    }

    #[instrument(skip(self), fields(endpoint = %self.endpoint))]
    async fn get_minimum_balance_for_rent_exemption(
        &self,
        data_len: usize,
    ) -> Result<u64, RpcError> {
        let timer = Timer::with_name("rpc_latency_seconds");
        let result = self
            .client
            .get_minimum_balance_for_rent_exemption(data_len)
            .await
            .map_err(|e| RpcError::from_client_error(e, &self.endpoint));
        timer.finish();
        result
    }

    #[instrument(skip(self, wire_transaction), fields(endpoint = %self.endpoint, size = wire_transaction.len()))]
    async fn send_transaction(&self, wire_transaction: &[u8]) -> Result<Signature, RpcError> {
        let params = json!([
            BASE64.encode(wire_transaction),
            {
                "encoding": "base64",
                "skipPreflight": self.send.skip_preflight,
                "preflightCommitment": self.send.preflight_commitment.as_str(),
            }
        ]);

        let timer = Timer::with_name("rpc_latency_seconds");
        let result = self
            .client
            .send::<String>(RpcRequest::SendTransaction, params)
            .await;
        timer.finish();

        let raw = result.map_err(|e| RpcError::from_client_error(e, &self.endpoint))?;
        debug!(signature = %raw, "Transaction accepted by node");

        Signature::from_str(&raw).map_err(|e| RpcError::InvalidResponse {
            endpoint: self.endpoint.clone(),
            message: format!("unparseable signature {:?}: {}", raw, e),
        })
    }

    fn endpoint(&self) -> &str {
        &self.endpoint
    }
}
