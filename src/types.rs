//! Core types shared by the action surfaces

use solana_sdk::{pubkey::Pubkey, signature::Signature, signer::Signer};
use std::fmt;
use std::sync::Arc;

/// Caller-supplied fee payer, shareable across tasks
pub type FeePayer = Arc<dyn Signer + Send + Sync>;

/// Result of a successful create-token-account action
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct CreatedTokenAccount {
    /// Submission signature (the fee payer's signature)
    pub signature: Signature,
    /// Address of the newly created token account
    pub new_account: Pubkey,
}

impl fmt::Display for CreatedTokenAccount {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "signature={} new_account={}",
            self.signature, self.new_account
        )
    }
}

/// Success value of any pending action
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ActionOutput {
    /// Lamports needed to create a token account
    Fee(u64),
    TokenAccount(CreatedTokenAccount),
}

impl ActionOutput {
    pub fn fee(&self) -> Option<u64> {
        match self {
            ActionOutput::Fee(lamports) => Some(*lamports),
            ActionOutput::TokenAccount(_) => None,
        }
    }

    pub fn token_account(&self) -> Option<&CreatedTokenAccount> {
        match self {
            ActionOutput::TokenAccount(created) => Some(created),
            ActionOutput::Fee(_) => None,
        }
    }
}
