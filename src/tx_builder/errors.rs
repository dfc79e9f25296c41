//! Error types for token account actions
//!
//! Every entry point resolves to either a complete success payload or exactly one
//! `ActionError`. Upstream failures keep their originating cause reachable through
//! `std::error::Error::source`.

use solana_sdk::signer::SignerError;
use thiserror::Error;

use crate::keys::KeyGenerationError;
use crate::rpc::{RpcError, RpcOperation};

/// Failure of an action pipeline
#[derive(Error, Debug)]
pub enum ActionError {
    /// Malformed caller input, e.g. a mint address that does not parse
    ///
    /// Terminal: retrying with the same input fails the same way.
    #[error("Validation failed: {0}")]
    Validation(String),

    /// The new-account keypair could not be produced
    #[error("Key generation failed: {0}")]
    KeyGeneration(#[from] KeyGenerationError),

    /// Blockhash fetch, balance fetch or submission failed at the ledger node
    #[error("Upstream RPC error during {operation}: {source}")]
    UpstreamRpc {
        operation: RpcOperation,
        #[source]
        source: RpcError,
    },

    /// A signer failed to produce its signature
    #[error("Signing failed: {0}")]
    Signing(#[from] SignerError),

    /// Failed to build an instruction for a specific program
    #[error("Instruction build error (program={program}): {reason}")]
    InstructionBuild {
        /// The program ID that failed to build an instruction
        program: String,
        /// Detailed reason for the failure
        reason: String,
    },

    /// Signed transaction does not fit in a single packet
    #[error("Transaction too large: {size} bytes (max {max})")]
    TransactionTooLarge { size: usize, max: usize },

    #[error("Serialization failed: {0}")]
    Serialization(String),

    /// No tokio runtime to drive a callback-surface call
    #[error("Runtime unavailable: {0}")]
    Runtime(String),
}

impl ActionError {
    /// Check if a caller could reasonably retry the whole action.
    ///
    /// Nothing in this crate acts on it. A retried `create_token_account`
    /// generates a different new account.
    pub fn is_retryable(&self) -> bool {
        match self {
            Self::UpstreamRpc { source, .. } => source.is_retryable(),
            Self::Validation(_) => false,
            Self::KeyGeneration(_) => false,
            Self::Signing(_) => false,
            Self::InstructionBuild { .. } => false,
            Self::TransactionTooLarge { .. } => false,
            Self::Serialization(_) => false,
            Self::Runtime(_) => false,
        }
    }

    /// Get the error category for metrics and observability
    pub fn category(&self) -> &'static str {
        match self {
            Self::Validation(_) => "validation",
            Self::KeyGeneration(_) => "key_generation",
            Self::UpstreamRpc { .. } => "rpc",
            Self::Signing(_) => "signing",
            Self::InstructionBuild { .. } => "instruction",
            Self::TransactionTooLarge { .. } => "size",
            Self::Serialization(_) => "serialization",
            Self::Runtime(_) => "runtime",
        }
    }

    /// RPC operation that failed, for upstream errors
    pub fn rpc_operation(&self) -> Option<RpcOperation> {
        match self {
            Self::UpstreamRpc { operation, .. } => Some(*operation),
            _ => None,
        }
    }
}

// Convenience constructors for common error scenarios
impl ActionError {
    /// `map_err` adapter tagging an RPC failure with its operation
    pub fn upstream(operation: RpcOperation) -> impl FnOnce(RpcError) -> Self {
        move |source| Self::UpstreamRpc { operation, source }
    }

    /// Create an invalid address error
    pub fn invalid_address(field: &str, value: &str, reason: impl std::fmt::Display) -> Self {
        Self::Validation(format!("invalid {} address {:?}: {}", field, value, reason))
    }

    /// Create an instruction build error for a specific program
    pub fn instruction_failed(program: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::InstructionBuild {
            program: program.into(),
            reason: reason.into(),
        }
    }
}
