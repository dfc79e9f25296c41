//! Fee payer wallet loading

use anyhow::{Context, Result};
use solana_sdk::{
    pubkey::Pubkey,
    signature::{Keypair, Signer},
};
use std::path::PathBuf;
use std::sync::Arc;

use crate::types::FeePayer;

/// Read-only holder of the fee payer keypair
#[derive(Clone)]
pub struct WalletManager {
    keypair: Arc<Keypair>,
}

impl WalletManager {
    /// Create a new wallet manager from a keypair file
    ///
    /// Accepts raw 64-byte files and the solana CLI JSON array format. A leading
    /// `~/` expands to `$HOME`.
    pub fn from_file(path: &str) -> Result<Self> {
        let path = expand_home(path);
        let keypair_bytes = std::fs::read(&path)
            .with_context(|| format!("Failed to read keypair file: {}", path.display()))?;

        let bytes = if keypair_bytes.len() == 64 {
            keypair_bytes
        } else {
            let json: Vec<u8> = serde_json::from_slice(&keypair_bytes)
                .context("Failed to parse keypair JSON")?;
            if json.len() != 64 {
                anyhow::bail!(
                    "Invalid keypair length: expected 64 bytes, got {}",
                    json.len()
                );
            }
            json
        };
        if bytes.iter().all(|&b| b == 0) {
            anyhow::bail!("Invalid keypair: all-zero key rejected");
        }
        let keypair = Keypair::try_from(bytes.as_slice()).context("Invalid keypair bytes")?;

        Ok(Self::from_keypair(keypair))
    }

    /// Create a new wallet manager from a keypair
    pub fn from_keypair(keypair: Keypair) -> Self {
        Self {
            keypair: Arc::new(keypair),
        }
    }

    /// Get the public key
    pub fn pubkey(&self) -> Pubkey {
        self.keypair.pubkey()
    }

    /// Shared signer handle for the action surfaces
    pub fn fee_payer(&self) -> FeePayer {
        self.keypair.clone()
    }
}

impl std::fmt::Debug for WalletManager {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("WalletManager")
            .field("pubkey", &self.pubkey())
            .finish()
    }
}

fn expand_home(path: &str) -> PathBuf {
    match (path.strip_prefix("~/"), std::env::var_os("HOME")) {
        (Some(rest), Some(home)) => PathBuf::from(home).join(rest),
        _ => PathBuf::from(path),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_from_json_file() {
        let keypair = Keypair::new();
        let mut file = tempfile::NamedTempFile::new().unwrap();
        let json = serde_json::to_string(&keypair.to_bytes().to_vec()).unwrap();
        file.write_all(json.as_bytes()).unwrap();

        let wallet = WalletManager::from_file(file.path().to_str().unwrap()).unwrap();
        assert_eq!(wallet.pubkey(), keypair.pubkey());
        assert_eq!(wallet.fee_payer().pubkey(), keypair.pubkey());
    }

    #[test]
    fn test_from_raw_file() {
        let keypair = Keypair::new();
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(&keypair.to_bytes()).unwrap();

        let wallet = WalletManager::from_file(file.path().to_str().unwrap()).unwrap();
        assert_eq!(wallet.pubkey(), keypair.pubkey());
    }

    #[test]
    fn test_rejects_zero_key_and_bad_length() {
        let mut zero = tempfile::NamedTempFile::new().unwrap();
        zero.write_all(&[0u8; 64]).unwrap();
        assert!(WalletManager::from_file(zero.path().to_str().unwrap()).is_err());

        let mut short = tempfile::NamedTempFile::new().unwrap();
        short.write_all(b"[1,2,3]").unwrap();
        assert!(WalletManager::from_file(short.path().to_str().unwrap()).is_err());
    }

    #[test]
    fn test_missing_file() {
        let err = WalletManager::from_file("/nonexistent/payer.json").unwrap_err();
        assert!(err.to_string().contains("Failed to read keypair file"));
    }
}
