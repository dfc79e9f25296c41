//! Declarative action templates
//!
//! A template is an immutable value describing what to run. Typed templates
//! implement [`ActionTemplate`] with their own success type; [`PendingAction`]
//! tags them so heterogeneous lists can go through one executor.

use async_trait::async_trait;
use futures::future::join_all;
use solana_sdk::signer::Signer;
use std::fmt;

use crate::action::Action;
use crate::tx_builder::ActionError;
use crate::types::{ActionOutput, CreatedTokenAccount, FeePayer};

/// Something an [`Action`] can perform
#[async_trait]
pub trait ActionTemplate: Send + Sync {
    type Success: Send;

    async fn perform(&self, action: &Action) -> Result<Self::Success, ActionError>;
}

/// Fee for creating a token account
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct GetCreatingTokenAccountFee;

#[async_trait]
impl ActionTemplate for GetCreatingTokenAccountFee {
    type Success = u64;

    async fn perform(&self, action: &Action) -> Result<u64, ActionError> {
        action.get_creating_token_account_fee().await
    }
}

/// Create a token account for `mint_address` paid by `payer`
#[derive(Clone)]
pub struct CreateTokenAccount {
    pub mint_address: String,
    pub payer: FeePayer,
}

impl CreateTokenAccount {
    pub fn new(mint_address: impl Into<String>, payer: FeePayer) -> Self {
        Self {
            mint_address: mint_address.into(),
            payer,
        }
    }
}

impl fmt::Debug for CreateTokenAccount {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CreateTokenAccount")
            .field("mint_address", &self.mint_address)
            .field("payer", &self.payer.pubkey())
            .finish()
    }
}

#[async_trait]
impl ActionTemplate for CreateTokenAccount {
    type Success = CreatedTokenAccount;

    async fn perform(&self, action: &Action) -> Result<CreatedTokenAccount, ActionError> {
        action
            .create_token_account(&self.mint_address, self.payer.as_ref())
            .await
    }
}

/// Any known template, for uniform handling
#[derive(Debug, Clone)]
pub enum PendingAction {
    GetCreatingTokenAccountFee(GetCreatingTokenAccountFee),
    CreateTokenAccount(CreateTokenAccount),
}

impl From<GetCreatingTokenAccountFee> for PendingAction {
    fn from(template: GetCreatingTokenAccountFee) -> Self {
        PendingAction::GetCreatingTokenAccountFee(template)
    }
}

impl From<CreateTokenAccount> for PendingAction {
    fn from(template: CreateTokenAccount) -> Self {
        PendingAction::CreateTokenAccount(template)
    }
}

#[async_trait]
impl ActionTemplate for PendingAction {
    type Success = ActionOutput;

    async fn perform(&self, action: &Action) -> Result<ActionOutput, ActionError> {
        match self {
            PendingAction::GetCreatingTokenAccountFee(t) => {
                t.perform(action).await.map(ActionOutput::Fee)
            }
            PendingAction::CreateTokenAccount(t) => {
                t.perform(action).await.map(ActionOutput::TokenAccount)
            }
        }
    }
}

impl Action {
    /// Perform one template
    pub async fn run<T: ActionTemplate>(&self, template: &T) -> Result<T::Success, ActionError> {
        template.perform(self).await
    }

    /// Perform every pending action concurrently.
    ///
    /// Actions are independent; one failing does not stop the others. Outcomes
    /// are returned in input order.
    pub async fn run_all(&self, actions: &[PendingAction]) -> Vec<Result<ActionOutput, ActionError>> {
        join_all(actions.iter().map(|pending| pending.perform(self))).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::MockLedgerRpc;
    use solana_sdk::{pubkey::Pubkey, signature::Keypair, signer::Signer};
    use std::sync::Arc;

    #[tokio::test]
    async fn test_typed_templates() {
        let rpc = Arc::new(MockLedgerRpc::new().with_min_balance(2_039_280));
        let action = Action::new(rpc.clone());

        let fee: u64 = action.run(&GetCreatingTokenAccountFee).await.unwrap();
        assert_eq!(fee, 2_039_280);

        let template = CreateTokenAccount::new(
            Pubkey::new_unique().to_string(),
            Arc::new(Keypair::new()),
        );
        let created: CreatedTokenAccount = action.run(&template).await.unwrap();
        assert_eq!(rpc.sent_transactions()[0].signatures[0], created.signature);
    }

    #[test]
    fn test_debug_hides_signer() {
        let payer = Keypair::new();
        let pubkey = payer.pubkey();
        let template = CreateTokenAccount::new("mint", Arc::new(payer));

        let rendered = format!("{:?}", PendingAction::from(template));
        assert!(rendered.contains(&pubkey.to_string()));
        assert!(rendered.contains("mint"));
    }
}
