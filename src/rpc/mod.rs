//! RPC Module
//!
//! The ledger node is an external collaborator; the action pipeline only sees the
//! three request/response operations of [`LedgerRpc`]. Timeouts, connection
//! pooling and transport concerns stay behind this trait.

use async_trait::async_trait;
use solana_sdk::{hash::Hash, signature::Signature};

// Submodules
pub mod rpc_client;
pub mod rpc_errors;

// Re-exports for convenience
pub use rpc_client::SolanaRpc;
pub use rpc_errors::{RpcError, RpcOperation};

/// Read and write operations the action pipeline consumes from a ledger node
#[async_trait]
pub trait LedgerRpc: Send + Sync {
    /// Latest blockhash to anchor a transaction's validity window
    async fn get_latest_blockhash(&self) -> Result<Hash, RpcError>;

    /// Minimum lamports for an account of `data_len` bytes to be rent exempt
    async fn get_minimum_balance_for_rent_exemption(&self, data_len: usize)
        -> Result<u64, RpcError>;

    /// Submit a signed, wire-encoded transaction
    async fn send_transaction(&self, wire_transaction: &[u8]) -> Result<Signature, RpcError>;

    /// Endpoint label used in logs
    fn endpoint(&self) -> &str;
}
