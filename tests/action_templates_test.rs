//! Template and callback surfaces against a scripted node

use solana_sdk::{pubkey::Pubkey, signature::Keypair};
use spl_token_actions::test_utils::MockLedgerRpc;
use spl_token_actions::{
    Action, ActionError, ActionOutput, CreateTokenAccount, FeePayer, GetCreatingTokenAccountFee,
    PendingAction, RpcError,
};
use std::sync::Arc;
use tokio::sync::oneshot;

fn payer() -> FeePayer {
    Arc::new(Keypair::new())
}

#[tokio::test]
async fn test_run_all_preserves_order_and_isolates_failures() {
    let rpc = Arc::new(MockLedgerRpc::new().with_min_balance(2_039_280));
    let action = Action::new(rpc.clone());

    let pending: Vec<PendingAction> = vec![
        GetCreatingTokenAccountFee.into(),
        CreateTokenAccount::new(Pubkey::new_unique().to_string(), payer()).into(),
        CreateTokenAccount::new("definitely not base58!", payer()).into(),
        GetCreatingTokenAccountFee.into(),
    ];

    let outcomes = action.run_all(&pending).await;

    assert_eq!(outcomes.len(), 4);
    assert!(matches!(outcomes[0], Ok(ActionOutput::Fee(2_039_280))));
    assert!(matches!(outcomes[1], Ok(ActionOutput::TokenAccount(_))));
    assert!(matches!(outcomes[2], Err(ActionError::Validation(_))));
    assert_eq!(outcomes[3].as_ref().ok().and_then(|o| o.fee()), Some(2_039_280));

    // Two fee-only calls plus two pipelines; only the valid one submits
    assert_eq!(rpc.call_counts(), (2, 4, 1));
}

#[tokio::test]
async fn test_template_matches_async_surface() {
    let rpc = Arc::new(MockLedgerRpc::new().with_min_balance(1_000));
    let action = Action::new(rpc.clone());

    let via_template = action.run(&GetCreatingTokenAccountFee).await.unwrap();
    let direct = action.get_creating_token_account_fee().await.unwrap();
    assert_eq!(via_template, direct);

    let template = CreateTokenAccount::new(Pubkey::new_unique().to_string(), payer());
    let created = action.run(&template).await.unwrap();
    let output = ActionOutput::TokenAccount(created);
    assert_eq!(output.token_account().map(|c| c.new_account), Some(created.new_account));
    assert_eq!(output.fee(), None);
}

#[tokio::test]
async fn test_template_is_reusable() {
    let rpc = Arc::new(MockLedgerRpc::new());
    let action = Action::new(rpc.clone());
    let template = CreateTokenAccount::new(Pubkey::new_unique().to_string(), payer());

    let first = action.run(&template).await.unwrap();
    let second = action.run(&template).await.unwrap();

    assert_ne!(first.new_account, second.new_account);
    assert_eq!(rpc.call_counts(), (2, 2, 2));
}

#[tokio::test]
async fn test_callback_receives_failure() {
    let rejected = RpcError::BlockhashNotFound {
        endpoint: "mock://ledger".to_string(),
        message: "Transaction simulation failed: Blockhash not found".to_string(),
    };
    let rpc = Arc::new(MockLedgerRpc::new().with_send_error(rejected.clone()));
    let action = Action::new(rpc.clone());
    let (tx, rx) = oneshot::channel();

    action
        .create_token_account_with_callback(
            Pubkey::new_unique().to_string(),
            payer(),
            move |result| {
                let _ = tx.send(result);
            },
        )
        .expect("ambient runtime")
        .await
        .unwrap();

    match rx.await.unwrap() {
        Err(ActionError::UpstreamRpc { source, .. }) => assert_eq!(source, rejected),
        other => panic!("Expected UpstreamRpc, got {:?}", other),
    }
}
