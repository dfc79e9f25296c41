//! Token account action pipeline
//!
//! `create_token_account` runs four stages, each gated on the previous one:
//!
//! 1. fetch the latest blockhash
//! 2. fetch the rent-exempt minimum for a token account
//! 3. parse the mint and generate the new-account keypair
//! 4. compose, sign, encode and submit
//!
//! The first failure is returned as is. Nothing is submitted before stage 4, so
//! there is nothing to roll back. Stage 4 is not idempotent: every call creates a
//! different account.

use solana_sdk::{pubkey::Pubkey, signer::Signer};
use std::future::Future;
use std::str::FromStr;
use std::sync::Arc;
use tokio::runtime::Handle;
use tracing::{debug, info, warn, Instrument};

use crate::keys::{KeyGenerationError, KeypairProvider, OsKeypairProvider};
use crate::metrics::{metrics, Timer};
use crate::observability::TraceContext;
use crate::rpc::{LedgerRpc, RpcOperation};
use crate::tx_builder::{
    assemble, compose_create_token_account, sanity_check_ix_order, submit, ActionError,
    TOKEN_ACCOUNT_LEN,
};
use crate::types::CreatedTokenAccount;

/// Entry point for token account actions against one ledger node.
///
/// Cheap to clone; clones share the RPC client and key provider. Holds no
/// per-call state, so concurrent calls are independent.
#[derive(Clone)]
pub struct Action {
    rpc: Arc<dyn LedgerRpc>,
    keys: Arc<dyn KeypairProvider>,
    runtime: Option<Handle>,
}

impl Action {
    /// Create an action runner using OS entropy for new accounts
    pub fn new(rpc: Arc<dyn LedgerRpc>) -> Self {
        Self::with_keypair_provider(rpc, Arc::new(OsKeypairProvider))
    }

    pub fn with_keypair_provider(
        rpc: Arc<dyn LedgerRpc>,
        keys: Arc<dyn KeypairProvider>,
    ) -> Self {
        Self {
            rpc,
            keys,
            runtime: None,
        }
    }

    /// Runtime the callback surface spawns on when called outside a tokio
    /// context
    pub fn with_runtime(mut self, runtime: Handle) -> Self {
        self.runtime = Some(runtime);
        self
    }

    /// Configured runtime, else the ambient one
    pub(crate) fn runtime(&self) -> Option<Handle> {
        self.runtime
            .clone()
            .or_else(|| Handle::try_current().ok())
    }

    /// Lamports a new token account must hold to be rent exempt
    pub async fn get_creating_token_account_fee(&self) -> Result<u64, ActionError> {
        let ctx = TraceContext::new("get_creating_token_account_fee");
        let span = ctx.span();
        observe(self.fetch_fee()).instrument(span).await
    }

    /// Create and initialize a new token account for `mint_address`, funded and
    /// owned by `payer`.
    ///
    /// Returns the submission signature and the new account's address.
    pub async fn create_token_account(
        &self,
        mint_address: &str,
        payer: &(dyn Signer + Send + Sync),
    ) -> Result<CreatedTokenAccount, ActionError> {
        let ctx = TraceContext::new("create_token_account");
        let span = ctx.span();
        observe(self.run_create_token_account(mint_address, payer))
            .instrument(span)
            .await
    }

    async fn fetch_fee(&self) -> Result<u64, ActionError> {
        let lamports = self
            .rpc
            .get_minimum_balance_for_rent_exemption(TOKEN_ACCOUNT_LEN)
            .await
            .map_err(ActionError::upstream(
                RpcOperation::GetMinimumBalanceForRentExemption,
            ))?;
        debug!(lamports, data_len = TOKEN_ACCOUNT_LEN, "Fetched rent-exempt minimum");
        Ok(lamports)
    }

    async fn run_create_token_account(
        &self,
        mint_address: &str,
        payer: &(dyn Signer + Send + Sync),
    ) -> Result<CreatedTokenAccount, ActionError> {
        // Stage 1: blockhash
        let recent_blockhash = self
            .rpc
            .get_latest_blockhash()
            .await
            .map_err(ActionError::upstream(RpcOperation::GetLatestBlockhash))?;
        debug!(blockhash = %recent_blockhash, "Fetched recent blockhash");

        // Stage 2: fee, through the same path as the fee-only entry point
        let lamports = self.fetch_fee().await?;

        // Stage 3: validate and generate
        let mint = Pubkey::from_str(mint_address)
            .map_err(|e| ActionError::invalid_address("mint", mint_address, e))?;
        let fee_payer = payer.try_pubkey()?;
        let new_account = self.keys.generate_keypair()?;
        let new_pubkey = new_account.pubkey();
        if new_pubkey == mint || new_pubkey == fee_payer {
            return Err(KeyGenerationError::Collision(new_pubkey.to_string()).into());
        }
        debug!(mint = %mint, payer = %fee_payer, new_account = %new_pubkey, "Generated new account key");

        // Stage 4: compose, assemble, submit
        let instructions = compose_create_token_account(&mint, &new_pubkey, &fee_payer, lamports)?;
        sanity_check_ix_order(&instructions, &new_pubkey, &mint)?;
        let signed = assemble(&instructions, recent_blockhash, &[payer, &new_account])?;
        drop(new_account);

        let signature = submit(self.rpc.as_ref(), &signed).await?;
        if signed.fee_payer_signature() != Some(&signature) {
            warn!(signature = %signature, "Node returned a signature other than the fee payer's");
        }
        metrics().accounts_created.inc();
        info!(
            mint = %mint,
            new_account = %new_pubkey,
            lamports,
            signature = %signature,
            "Token account creation submitted"
        );

        Ok(CreatedTokenAccount {
            signature,
            new_account: new_pubkey,
        })
    }
}

/// Count, time and log one action call
async fn observe<T, F>(pipeline: F) -> Result<T, ActionError>
where
    F: Future<Output = Result<T, ActionError>>,
{
    let m = metrics();
    m.actions_total.inc();
    let timer = Timer::with_name("action_latency_seconds");

    let result = pipeline.await;

    let elapsed_ms = (timer.elapsed_secs() * 1000.0) as u64;
    timer.finish();
    match &result {
        Ok(_) => {
            m.record_outcome(None);
            info!(elapsed_ms, "Action completed");
        }
        Err(e) => {
            m.record_outcome(Some(e.category()));
            warn!(error = %e, category = e.category(), elapsed_ms, "Action failed");
        }
    }
    result
}
