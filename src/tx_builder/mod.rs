//! Transaction Builder
//!
//! Split into focused modules:
//! - **errors**: the `ActionError` taxonomy every action resolves to
//! - **instructions**: create-account + initialize-account composition and
//!   ordering validation
//! - **assembler**: message compile, signing, wire encoding and submission
//!
//! ## Usage Example
//!
//! ```rust,no_run
//! use solana_sdk::{hash::Hash, pubkey::Pubkey, signature::Keypair, signer::Signer};
//! use spl_token_actions::tx_builder::{assemble, compose_create_token_account, ActionError};
//!
//! # fn example(blockhash: Hash, lamports: u64) -> Result<(), ActionError> {
//! let payer = Keypair::new();
//! let new_account = Keypair::new();
//! let mint = Pubkey::new_unique();
//!
//! let ixs = compose_create_token_account(&mint, &new_account.pubkey(), &payer.pubkey(), lamports)?;
//! let signed = assemble(&ixs, blockhash, &[&payer, &new_account])?;
//! assert!(!signed.wire.is_empty());
//! # Ok(())
//! # }
//! ```

pub mod errors;
pub use errors::ActionError;

mod assembler;
mod instructions;

pub use assembler::{assemble, submit, SignedTransaction};
pub use instructions::{compose_create_token_account, sanity_check_ix_order, TOKEN_ACCOUNT_LEN};
