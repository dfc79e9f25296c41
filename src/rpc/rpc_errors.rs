use solana_client::client_error::{ClientError, ClientErrorKind};
use solana_client::rpc_request::RpcError as ClientRpcError;
use solana_sdk::transaction::TransactionError;
use std::fmt;
use thiserror::Error;

/// Outbound ledger operation an [`RpcError`] originated from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RpcOperation {
    GetLatestBlockhash,
    GetMinimumBalanceForRentExemption,
    SendTransaction,
}

impl RpcOperation {
    pub fn as_str(&self) -> &'static str {
        match self {
            RpcOperation::GetLatestBlockhash => "getLatestBlockhash",
            RpcOperation::GetMinimumBalanceForRentExemption => "getMinimumBalanceForRentExemption",
            RpcOperation::SendTransaction => "sendTransaction",
        }
    }
}

impl fmt::Display for RpcOperation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// JSON-RPC codes a node returns while it is temporarily unable to answer:
/// block not available, node behind, block status pending, min context slot.
const TRANSIENT_JSON_RPC_CODES: [i64; 4] = [-32004, -32005, -32014, -32016];

/// RPC error types surfaced by a [`crate::rpc::LedgerRpc`] implementation.
///
/// Every variant keeps the client's rendering of the original error in
/// `message`.
#[derive(Debug, Clone, Error, PartialEq)]
pub enum RpcError {
    /// Transport-level errors (network, connection)
    #[error("Transport error: {message} (endpoint: {endpoint})")]
    Transport { endpoint: String, message: String },

    /// The request did not complete within the client timeout
    #[error("Timeout (endpoint: {endpoint}): {message}")]
    Timeout { endpoint: String, message: String },

    /// Non-success HTTP status from the endpoint
    #[error("HTTP {status} from {endpoint}: {message}")]
    Http {
        endpoint: String,
        status: u16,
        message: String,
    },

    /// JSON-RPC error object returned by the node
    #[error("RPC response error: {message} (endpoint: {endpoint}, code: {code:?})")]
    RpcResponse {
        endpoint: String,
        message: String,
        code: Option<i64>,
    },

    #[error("Blockhash not found (endpoint: {endpoint}): {message}")]
    BlockhashNotFound { endpoint: String, message: String },

    #[error("Insufficient funds (endpoint: {endpoint}): {message}")]
    InsufficientFunds { endpoint: String, message: String },

    /// The node answered, but the payload could not be interpreted
    #[error("Invalid response from {endpoint}: {message}")]
    InvalidResponse { endpoint: String, message: String },
}

impl RpcError {
    /// Check if a caller could reasonably retry after this error.
    ///
    /// Informational only; nothing in this crate retries.
    pub fn is_retryable(&self) -> bool {
        match self {
            RpcError::Transport { .. } => true,
            RpcError::Timeout { .. } => true,
            RpcError::BlockhashNotFound { .. } => true,
            RpcError::InsufficientFunds { .. } => false,
            RpcError::InvalidResponse { .. } => false,
            RpcError::Http { status, .. } => *status == 429 || *status >= 500,
            RpcError::RpcResponse { code, .. } => {
                matches!(code, Some(c) if TRANSIENT_JSON_RPC_CODES.contains(c))
            }
        }
    }

    /// Get the endpoint associated with this error
    pub fn endpoint(&self) -> &str {
        match self {
            RpcError::Transport { endpoint, .. }
            | RpcError::Timeout { endpoint, .. }
            | RpcError::Http { endpoint, .. }
            | RpcError::RpcResponse { endpoint, .. }
            | RpcError::BlockhashNotFound { endpoint, .. }
            | RpcError::InsufficientFunds { endpoint, .. }
            | RpcError::InvalidResponse { endpoint, .. } => endpoint,
        }
    }

    /// Original error text as rendered by the client
    pub fn message(&self) -> &str {
        match self {
            RpcError::Transport { message, .. }
            | RpcError::Timeout { message, .. }
            | RpcError::Http { message, .. }
            | RpcError::RpcResponse { message, .. }
            | RpcError::BlockhashNotFound { message, .. }
            | RpcError::InsufficientFunds { message, .. }
            | RpcError::InvalidResponse { message, .. } => message,
        }
    }

    /// Classify a solana client error by its kind
    pub fn from_client_error(err: ClientError, endpoint: &str) -> Self {
        let endpoint = endpoint.to_string();
        let message = err.to_string();

        match err.kind() {
            ClientErrorKind::Io(io) if io.kind() == std::io::ErrorKind::TimedOut => {
                RpcError::Timeout { endpoint, message }
            }
            ClientErrorKind::Io(_) => RpcError::Transport { endpoint, message },

            ClientErrorKind::Reqwest(e) if e.is_timeout() => RpcError::Timeout { endpoint, message },
            ClientErrorKind::Reqwest(e) => match e.status() {
                Some(status) => RpcError::Http {
                    endpoint,
                    status: status.as_u16(),
                    message,
                },
                None => RpcError::Transport { endpoint, message },
            },

            ClientErrorKind::RpcError(ClientRpcError::RpcResponseError { code, .. }) => {
                Self::from_response_message(endpoint, message, Some(*code))
            }
            ClientErrorKind::RpcError(ClientRpcError::ParseError(_))
            | ClientErrorKind::SerdeJson(_) => RpcError::InvalidResponse { endpoint, message },

            ClientErrorKind::TransactionError(tx_err) => match tx_err {
                TransactionError::BlockhashNotFound => {
                    RpcError::BlockhashNotFound { endpoint, message }
                }
                TransactionError::InsufficientFundsForFee
                | TransactionError::InsufficientFundsForRent { .. } => {
                    RpcError::InsufficientFunds { endpoint, message }
                }
                _ => RpcError::RpcResponse {
                    endpoint,
                    message,
                    code: None,
                },
            },

            _ => Self::from_response_message(endpoint, message, None),
        }
    }

    /// Pick the specific variant a node's error text names, else a plain
    /// response error carrying `code`
    fn from_response_message(endpoint: String, message: String, code: Option<i64>) -> Self {
        let lowered = message.to_lowercase();
        if lowered.contains("blockhash not found") {
            RpcError::BlockhashNotFound { endpoint, message }
        } else if lowered.contains("insufficient funds")
            || lowered.contains("insufficient lamports")
        {
            RpcError::InsufficientFunds { endpoint, message }
        } else {
            RpcError::RpcResponse {
                endpoint,
                message,
                code,
            }
        }
    }
}
