//! New-account key generation
//!
//! Keys produced here belong to exactly one action call. Nothing in this crate
//! stores them; the keypair is dropped when the call that generated it resolves.

use rand::{rngs::OsRng, RngCore};
use solana_sdk::signature::Keypair;
use solana_sdk::signer::keypair::keypair_from_seed;
use thiserror::Error;
use zeroize::Zeroizing;

#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum KeyGenerationError {
    #[error("Entropy source unavailable: {0}")]
    Entropy(String),

    #[error("Keypair derivation failed: {0}")]
    Derivation(String),

    /// Generated key collides with an address already used by the operation
    #[error("Generated key {0} collides with an existing operation address")]
    Collision(String),
}

/// Source of fresh keypairs for new accounts
pub trait KeypairProvider: Send + Sync {
    fn generate_keypair(&self) -> Result<Keypair, KeyGenerationError>;
}

/// Keypairs seeded from the operating system RNG
#[derive(Debug, Default, Clone, Copy)]
pub struct OsKeypairProvider;

impl KeypairProvider for OsKeypairProvider {
    fn generate_keypair(&self) -> Result<Keypair, KeyGenerationError> {
        let mut seed = Zeroizing::new([0u8; 32]);
        OsRng
            .try_fill_bytes(&mut seed[..])
            .map_err(|e| KeyGenerationError::Entropy(e.to_string()))?;

        keypair_from_seed(&seed[..]).map_err(|e| KeyGenerationError::Derivation(e.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use solana_sdk::signer::Signer;

    #[test]
    fn test_generated_keys_are_distinct() {
        let provider = OsKeypairProvider;
        let a = provider.generate_keypair().unwrap();
        let b = provider.generate_keypair().unwrap();
        assert_ne!(a.pubkey(), b.pubkey());
    }

    #[test]
    fn test_generated_key_signs() {
        let keypair = OsKeypairProvider.generate_keypair().unwrap();
        let signature = keypair.sign_message(b"token account");
        assert!(signature.verify(keypair.pubkey().as_ref(), b"token account"));
    }
}
