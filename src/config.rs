//! Configuration module for the token account actions client
//!
//! This module handles configuration loading from TOML files and
//! environment variables, and provides structured configuration types.

use serde::{Deserialize, Serialize};
use solana_sdk::commitment_config::CommitmentConfig;

/// Environment variable overriding `rpc.url`
pub const ENV_RPC_URL: &str = "TOKEN_ACTIONS_RPC_URL";
/// Environment variable overriding `wallet.keypair_path`
pub const ENV_KEYPAIR: &str = "TOKEN_ACTIONS_KEYPAIR";

/// Main application configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// RPC endpoint configuration
    pub rpc: RpcConfig,

    /// Transaction submission options
    #[serde(default)]
    pub send: SendConfig,

    /// Fee payer wallet configuration
    pub wallet: WalletConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RpcConfig {
    /// RPC endpoint URL
    pub url: String,

    /// Request timeout in seconds
    #[serde(default = "default_rpc_timeout")]
    pub timeout_secs: u64,

    /// Commitment used for reads
    #[serde(default)]
    pub commitment: Commitment,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SendConfig {
    /// Skip the node's preflight simulation
    #[serde(default)]
    pub skip_preflight: bool,

    /// Commitment the node simulates against during preflight
    #[serde(default)]
    pub preflight_commitment: Commitment,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WalletConfig {
    /// Path to the fee payer keypair file
    pub keypair_path: String,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Commitment {
    Processed,
    #[default]
    Confirmed,
    Finalized,
}

impl Commitment {
    pub fn as_str(&self) -> &'static str {
        match self {
            Commitment::Processed => "processed",
            Commitment::Confirmed => "confirmed",
            Commitment::Finalized => "finalized",
        }
    }

    pub fn to_commitment_config(self) -> CommitmentConfig {
        match self {
            Commitment::Processed => CommitmentConfig::processed(),
            Commitment::Confirmed => CommitmentConfig::confirmed(),
            Commitment::Finalized => CommitmentConfig::finalized(),
        }
    }
}

/// Configuration validation errors
#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("rpc.url must not be empty")]
    EmptyRpcUrl,

    #[error("rpc.url must start with http:// or https://, got {0}")]
    UnsupportedScheme(String),

    #[error("rpc.timeout_secs must be greater than zero")]
    ZeroTimeout,

    #[error("wallet.keypair_path must not be empty")]
    EmptyKeypairPath,
}

// Default value functions
fn default_rpc_timeout() -> u64 {
    30
}

impl Config {
    /// Load configuration from TOML file
    pub fn from_file(path: &str) -> anyhow::Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let config: Config = toml::from_str(&content)?;
        Ok(config)
    }

    /// Load configuration with environment variable overrides
    pub fn from_file_with_env(path: &str) -> anyhow::Result<Self> {
        dotenvy::dotenv().ok();
        let mut config = Self::from_file(path)?;
        config.apply_env_overrides();
        Ok(config)
    }

    /// Apply `TOKEN_ACTIONS_*` environment overrides in place
    pub fn apply_env_overrides(&mut self) {
        self.apply_overrides(|key| std::env::var(key).ok());
    }

    fn apply_overrides(&mut self, lookup: impl Fn(&str) -> Option<String>) {
        if let Some(url) = lookup(ENV_RPC_URL).filter(|v| !v.is_empty()) {
            self.rpc.url = url;
        }
        if let Some(path) = lookup(ENV_KEYPAIR).filter(|v| !v.is_empty()) {
            self.wallet.keypair_path = path;
        }
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        let url = self.rpc.url.trim();
        if url.is_empty() {
            return Err(ConfigError::EmptyRpcUrl);
        }
        if !(url.starts_with("http://") || url.starts_with("https://")) {
            return Err(ConfigError::UnsupportedScheme(url.to_string()));
        }
        if self.rpc.timeout_secs == 0 {
            return Err(ConfigError::ZeroTimeout);
        }
        if self.wallet.keypair_path.trim().is_empty() {
            return Err(ConfigError::EmptyKeypairPath);
        }
        Ok(())
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            rpc: RpcConfig {
                url: "https://api.devnet.solana.com".to_string(),
                timeout_secs: default_rpc_timeout(),
                commitment: Commitment::default(),
            },
            send: SendConfig::default(),
            wallet: WalletConfig {
                keypair_path: "~/.config/solana/id.json".to_string(),
            },
        }
    }
}
