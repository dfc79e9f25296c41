//! Instruction composition and ordering validation
//!
//! A token account is created with exactly two instructions, in this order:
//! 1. system `create_account`: the fee payer funds the new account with the
//!    rent-exempt balance, sized for token account state and owned by the token
//!    program
//! 2. token `initialize_account`: binds the new account to the mint, with the fee
//!    payer as token owner
//!
//! Initialization must reference an account that already exists, so the order
//! is fixed.

use crate::tx_builder::errors::ActionError;
use solana_sdk::{
    instruction::Instruction,
    pubkey::Pubkey,
    system_instruction::{self, SystemInstruction},
    system_program,
};
use spl_token::{instruction::TokenInstruction, solana_program::program_pack::Pack};

/// Size in bytes of an SPL token account record
pub const TOKEN_ACCOUNT_LEN: usize = spl_token::state::Account::LEN;

/// Compose the create-account and initialize-account pair.
///
/// Pure data construction. The mint is already parsed by the caller.
///
/// # Errors
///
/// Returns `ActionError::InstructionBuild` if the token program rejects the
/// parameters while encoding `initialize_account`.
pub fn compose_create_token_account(
    mint: &Pubkey,
    new_account: &Pubkey,
    fee_payer: &Pubkey,
    lamports: u64,
) -> Result<[Instruction; 2], ActionError> {
    let create_account = system_instruction::create_account(
        fee_payer,
        new_account,
        lamports,
        TOKEN_ACCOUNT_LEN as u64,
        &spl_token::id(),
    );

    let initialize_account =
        spl_token::instruction::initialize_account(&spl_token::id(), new_account, mint, fee_payer)
            .map_err(|e| ActionError::instruction_failed("spl_token", e.to_string()))?;

    Ok([create_account, initialize_account])
}

/// Validate a composed create-token-account instruction pair
///
/// Checks that:
/// - there are exactly two instructions
/// - the first is a system `create_account` for `new_account`, sized for token
///   account state and assigned to the token program
/// - the second is a token `initialize_account` for the same account and `mint`
///
/// # Errors
///
/// Returns `ActionError::InstructionBuild` describing the first violation found.
pub fn sanity_check_ix_order(
    instructions: &[Instruction],
    new_account: &Pubkey,
    mint: &Pubkey,
) -> Result<(), ActionError> {
    let [create, initialize] = instructions else {
        return Err(ActionError::instruction_failed(
            "order",
            format!("expected 2 instructions, got {}", instructions.len()),
        ));
    };

    if create.program_id != system_program::id() {
        return Err(ActionError::instruction_failed(
            "order",
            format!(
                "instruction 0 must target the system program, got {}",
                create.program_id
            ),
        ));
    }
    match bincode::deserialize::<SystemInstruction>(&create.data) {
        Ok(SystemInstruction::CreateAccount { space, owner, .. })
            if space == TOKEN_ACCOUNT_LEN as u64 && owner == spl_token::id() => {}
        Ok(other) => {
            return Err(ActionError::instruction_failed(
                "system_program",
                format!("instruction 0 is not a token-sized create_account: {:?}", other),
            ))
        }
        Err(e) => {
            return Err(ActionError::instruction_failed(
                "system_program",
                format!("instruction 0 data does not decode: {}", e),
            ))
        }
    }
    if create.accounts.get(1).map(|m| m.pubkey) != Some(*new_account) {
        return Err(ActionError::instruction_failed(
            "system_program",
            "create_account does not fund the new account",
        ));
    }

    if initialize.program_id != spl_token::id() {
        return Err(ActionError::instruction_failed(
            "order",
            format!(
                "instruction 1 must target the token program, got {}",
                initialize.program_id
            ),
        ));
    }
    if !matches!(
        TokenInstruction::unpack(&initialize.data),
        Ok(TokenInstruction::InitializeAccount)
    ) {
        return Err(ActionError::instruction_failed(
            "spl_token",
            "instruction 1 is not initialize_account",
        ));
    }
    let targets: Vec<Pubkey> = initialize.accounts.iter().take(2).map(|m| m.pubkey).collect();
    if targets != [*new_account, *mint] {
        return Err(ActionError::instruction_failed(
            "spl_token",
            "initialize_account does not reference the new account and mint",
        ));
    }

    Ok(())
}
