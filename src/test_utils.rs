//! Test Utilities Module
//!
//! Scripted collaborators for deterministic tests of the action pipeline: a
//! ledger RPC with call counters, key providers that fail or return a fixed key,
//! and a signer that refuses to sign.
//!
//! These utilities are only compiled when running tests or when the
//! `test_utils` feature is enabled.

#![cfg(any(test, feature = "test_utils"))]

use async_trait::async_trait;
use solana_sdk::{
    hash::Hash,
    pubkey::Pubkey,
    signature::{Keypair, Signature},
    signer::{Signer, SignerError},
    transaction::Transaction,
};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;
use std::time::Duration;

use crate::keys::{KeyGenerationError, KeypairProvider};
use crate::rpc::{LedgerRpc, RpcError};

/// Mock ledger RPC
///
/// Answers from scripted results, counts every call, and records submitted
/// wire transactions. A successful submission returns the transaction's first
/// signature, as a real node does.
pub struct MockLedgerRpc {
    blockhash: Result<Hash, RpcError>,
    min_balance: Result<u64, RpcError>,
    send_error: Option<RpcError>,
    latency: Option<Duration>,

    blockhash_calls: AtomicUsize,
    balance_calls: AtomicUsize,
    send_calls: AtomicUsize,
    data_lens: Mutex<Vec<usize>>,
    sent: Mutex<Vec<Vec<u8>>>,
}

impl MockLedgerRpc {
    /// Create a MockLedgerRpc that succeeds by default
    pub fn new() -> Self {
        Self {
            blockhash: Ok(Hash::new_from_array([7u8; 32])),
            min_balance: Ok(2_039_280),
            send_error: None,
            latency: None,
            blockhash_calls: AtomicUsize::new(0),
            balance_calls: AtomicUsize::new(0),
            send_calls: AtomicUsize::new(0),
            data_lens: Mutex::new(Vec::new()),
            sent: Mutex::new(Vec::new()),
        }
    }

    pub fn with_blockhash(mut self, hash: Hash) -> Self {
        self.blockhash = Ok(hash);
        self
    }

    pub fn with_blockhash_error(mut self, err: RpcError) -> Self {
        self.blockhash = Err(err);
        self
    }

    pub fn with_min_balance(mut self, lamports: u64) -> Self {
        self.min_balance = Ok(lamports);
        self
    }

    pub fn with_balance_error(mut self, err: RpcError) -> Self {
        self.min_balance = Err(err);
        self
    }

    pub fn with_send_error(mut self, err: RpcError) -> Self {
        self.send_error = Some(err);
        self
    }

    /// Delay every call by `latency`
    pub fn with_latency(mut self, latency: Duration) -> Self {
        self.latency = Some(latency);
        self
    }

    /// Scripted blockhash (default hash when configured to fail)
    pub fn blockhash(&self) -> Hash {
        self.blockhash.clone().unwrap_or_default()
    }

    /// `(blockhash, min_balance, send)` call counts
    pub fn call_counts(&self) -> (usize, usize, usize) {
        (
            self.blockhash_calls.load(Ordering::SeqCst),
            self.balance_calls.load(Ordering::SeqCst),
            self.send_calls.load(Ordering::SeqCst),
        )
    }

    /// Data lengths passed to `get_minimum_balance_for_rent_exemption`
    pub fn requested_data_lens(&self) -> Vec<usize> {
        self.data_lens.lock().unwrap().clone()
    }

    /// Decoded transactions received by `send_transaction`
    pub fn sent_transactions(&self) -> Vec<Transaction> {
        self.sent
            .lock()
            .unwrap()
            .iter()
            .map(|wire| bincode::deserialize(wire).expect("wire transaction decodes"))
            .collect()
    }

    async fn delay(&self) {
        if let Some(latency) = self.latency {
            tokio::time::sleep(latency).await;
        }
    }
}

impl Default for MockLedgerRpc {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl LedgerRpc for MockLedgerRpc {
    async fn get_latest_blockhash(&self) -> Result<Hash, RpcError> {
        self.blockhash_calls.fetch_add(1, Ordering::SeqCst);
        self.delay().await;
        self.blockhash.clone()
    }

    async fn get_minimum_balance_for_rent_exemption(
        &self,
        data_len: usize,
    ) -> Result<u64, RpcError> {
        self.balance_calls.fetch_add(1, Ordering::SeqCst);
        self.data_lens.lock().unwrap().push(data_len);
        self.delay().await;
        self.min_balance.clone()
    }

    async fn send_transaction(&self, wire_transaction: &[u8]) -> Result<Signature, RpcError> {
        self.send_calls.fetch_add(1, Ordering::SeqCst);
        self.delay().await;
        if let Some(err) = &self.send_error {
            return Err(err.clone());
        }

        let tx: Transaction =
            bincode::deserialize(wire_transaction).map_err(|e| RpcError::RpcResponse {
                endpoint: self.endpoint().to_string(),
                message: format!("failed to deserialize transaction: {}", e),
                code: Some(-32602),
            })?;
        self.sent.lock().unwrap().push(wire_transaction.to_vec());
        Ok(tx.signatures.first().copied().unwrap_or_default())
    }

    fn endpoint(&self) -> &str {
        "mock://ledger"
    }
}

/// Key provider simulating entropy exhaustion
#[derive(Debug, Default, Clone, Copy)]
pub struct FailingKeypairProvider;

impl KeypairProvider for FailingKeypairProvider {
    fn generate_keypair(&self) -> Result<Keypair, KeyGenerationError> {
        Err(KeyGenerationError::Entropy("entropy exhausted".to_string()))
    }
}

/// Key provider that always hands out copies of one keypair
pub struct FixedKeypairProvider {
    keypair: Keypair,
}

impl FixedKeypairProvider {
    pub fn new(keypair: Keypair) -> Self {
        Self { keypair }
    }
}

impl KeypairProvider for FixedKeypairProvider {
    fn generate_keypair(&self) -> Result<Keypair, KeyGenerationError> {
        Ok(self.keypair.insecure_clone())
    }
}

/// Signer with a valid address that refuses to sign
#[derive(Debug)]
pub struct FailingSigner {
    pubkey: Pubkey,
}

impl FailingSigner {
    pub fn new() -> Self {
        Self {
            pubkey: Pubkey::new_unique(),
        }
    }
}

impl Default for FailingSigner {
    fn default() -> Self {
        Self::new()
    }
}

impl Signer for FailingSigner {
    fn try_pubkey(&self) -> Result<Pubkey, SignerError> {
        Ok(self.pubkey)
    }

    fn try_sign_message(&self, _message: &[u8]) -> Result<Signature, SignerError> {
        Err(SignerError::Custom("signing device unavailable".to_string()))
    }

    fn is_interactive(&self) -> bool {
        false
    }
}
