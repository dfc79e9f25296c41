//! SPL token account actions
//!
//! Prepares, signs and submits the transaction that creates and initializes a
//! new token account for a mint, paid by a caller-supplied signer. Three
//! equivalent surfaces:
//!
//! - async: [`Action::create_token_account`], [`Action::get_creating_token_account_fee`]
//! - callback: `Action::*_with_callback`, returning the spawned task's handle
//! - template: [`templates::CreateTokenAccount`] and friends, run through
//!   [`Action::run`] / [`Action::run_all`]

pub mod action;
pub mod callback;
pub mod config;
pub mod keys;
pub mod metrics;
pub mod observability;
pub mod rpc;
pub mod templates;
pub mod test_utils;
pub mod tx_builder;
pub mod types;
pub mod wallet;

// Re-export commonly used types
pub use action::Action;
pub use rpc::{LedgerRpc, RpcError, RpcOperation, SolanaRpc};
pub use templates::{ActionTemplate, CreateTokenAccount, GetCreatingTokenAccountFee, PendingAction};
pub use tx_builder::ActionError;
pub use types::{ActionOutput, CreatedTokenAccount, FeePayer};
