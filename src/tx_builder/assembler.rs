//! Transaction assembly and submission
//!
//! Assembly is synchronous: message compile, signing and wire encoding happen
//! before the single outbound `send_transaction` call. Signer references never
//! live across an await point.

use solana_sdk::{
    hash::Hash,
    instruction::Instruction,
    message::Message,
    packet::PACKET_DATA_SIZE,
    pubkey::Pubkey,
    signature::Signature,
    signer::Signer,
    transaction::Transaction,
};
use tracing::debug;

use crate::rpc::{LedgerRpc, RpcOperation};
use crate::tx_builder::errors::ActionError;

/// Fully signed transaction with its wire encoding
#[derive(Debug, Clone)]
pub struct SignedTransaction {
    pub transaction: Transaction,
    pub wire: Vec<u8>,
}

impl SignedTransaction {
    /// Fee payer's signature, the id the node reports back on submission
    pub fn fee_payer_signature(&self) -> Option<&Signature> {
        self.transaction.signatures.first()
    }
}

/// Compile, sign and encode a transaction.
///
/// `signers[0]` pays the fee. Signatures are produced in slice order; the
/// pipeline passes the fee payer first and the new account second.
///
/// # Errors
///
/// - `ActionError::Signing` if any signer fails or a required signer is missing
/// - `ActionError::Serialization` if wire encoding fails
/// - `ActionError::TransactionTooLarge` if the encoding exceeds one packet
pub fn assemble(
    instructions: &[Instruction],
    recent_blockhash: Hash,
    signers: &[&dyn Signer],
) -> Result<SignedTransaction, ActionError> {
    let fee_payer = fee_payer_of(signers)?;

    let message = Message::new_with_blockhash(instructions, Some(&fee_payer), &recent_blockhash);
    let mut transaction = Transaction::new_unsigned(message);
    transaction.try_sign(signers, recent_blockhash)?;

    let wire = bincode::serialize(&transaction)
        .map_err(|e| ActionError::Serialization(e.to_string()))?;
    if wire.len() > PACKET_DATA_SIZE {
        return Err(ActionError::TransactionTooLarge {
            size: wire.len(),
            max: PACKET_DATA_SIZE,
        });
    }

    debug!(
        fee_payer = %fee_payer,
        signatures = transaction.signatures.len(),
        size = wire.len(),
        "Transaction assembled"
    );

    Ok(SignedTransaction { transaction, wire })
}

/// Submit a signed transaction; failures surface unchanged, tagged as
/// `sendTransaction`.
pub async fn submit(
    rpc: &dyn LedgerRpc,
    signed: &SignedTransaction,
) -> Result<Signature, ActionError> {
    rpc.send_transaction(&signed.wire)
        .await
        .map_err(ActionError::upstream(RpcOperation::SendTransaction))
}

fn fee_payer_of(signers: &[&dyn Signer]) -> Result<Pubkey, ActionError> {
    let first = signers.first().ok_or(ActionError::Signing(
        solana_sdk::signer::SignerError::NotEnoughSigners,
    ))?;
    Ok(first.try_pubkey()?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::FailingSigner;
    use crate::tx_builder::instructions::compose_create_token_account;
    use solana_sdk::signature::Keypair;
    use solana_sdk::signer::SignerError;

    fn pair(payer: &Keypair, new_account: &Keypair) -> [Instruction; 2] {
        compose_create_token_account(
            &Pubkey::new_unique(),
            &new_account.pubkey(),
            &payer.pubkey(),
            2_039_280,
        )
        .unwrap()
    }

    #[test]
    fn test_assemble_signs_in_order() {
        let payer = Keypair::new();
        let new_account = Keypair::new();
        let blockhash = Hash::new_unique();

        let signed = assemble(&pair(&payer, &new_account), blockhash, &[&payer, &new_account])
            .expect("Should assemble");

        let tx = &signed.transaction;
        assert_eq!(tx.message.recent_blockhash, blockhash);
        assert_eq!(tx.message.header.num_required_signatures, 2);
        assert_eq!(tx.message.account_keys[0], payer.pubkey());
        assert_eq!(tx.message.account_keys[1], new_account.pubkey());
        assert!(tx.verify().is_ok());
        assert_eq!(
            signed.fee_payer_signature(),
            Some(&payer.sign_message(&tx.message_data()))
        );
        assert!(signed.wire.len() <= PACKET_DATA_SIZE);
    }

    #[test]
    fn test_assemble_missing_signer() {
        let payer = Keypair::new();
        let new_account = Keypair::new();

        let result = assemble(&pair(&payer, &new_account), Hash::new_unique(), &[&payer]);
        assert!(matches!(result, Err(ActionError::Signing(_))));
    }

    #[test]
    fn test_assemble_no_signers() {
        let payer = Keypair::new();
        let new_account = Keypair::new();

        let result = assemble(&pair(&payer, &new_account), Hash::new_unique(), &[]);
        assert!(matches!(
            result,
            Err(ActionError::Signing(SignerError::NotEnoughSigners))
        ));
    }

    #[test]
    fn test_assemble_failing_signer() {
        let payer = FailingSigner::new();
        let new_account = Keypair::new();
        let ixs = compose_create_token_account(
            &Pubkey::new_unique(),
            &new_account.pubkey(),
            &payer.pubkey(),
            1,
        )
        .unwrap();

        let result = assemble(&ixs, Hash::new_unique(), &[&payer, &new_account]);
        assert!(matches!(result, Err(ActionError::Signing(_))));
    }

    #[test]
    fn test_assemble_rejects_oversized() {
        let payer = Keypair::new();
        let new_account = Keypair::new();
        let memo_program = Pubkey::new_unique();
        let mut ixs = pair(&payer, &new_account).to_vec();
        ixs.push(Instruction::new_with_bytes(memo_program, &[7u8; 1300], vec![]));

        let result = assemble(&ixs, Hash::new_unique(), &[&payer, &new_account]);
        match result {
            Err(ActionError::TransactionTooLarge { size, max }) => {
                assert!(size > max);
                assert_eq!(max, PACKET_DATA_SIZE);
            }
            other => panic!("Expected TransactionTooLarge, got {:?}", other),
        }
    }
}
