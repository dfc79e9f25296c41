//! Completion-callback surface
//!
//! Each method spawns the matching async entry point and hands its result to
//! `on_complete`. The whole pipeline resolves before the callback runs.
//!
//! The task runs on the runtime given to [`Action::with_runtime`], else on the
//! caller's ambient tokio runtime. With neither, `on_complete` receives
//! `ActionError::Runtime` on the calling thread and no task is spawned.
//!
//! Aborting the returned `JoinHandle` drops the pipeline at its current await
//! point; `on_complete` is then never called. It can never be called twice, since
//! it is `FnOnce`. An in-flight RPC request is dropped with the future, with
//! whatever guarantees the RPC client gives for that.

use std::future::Future;
use tokio::task::JoinHandle;
use tracing::warn;

use crate::action::Action;
use crate::tx_builder::ActionError;
use crate::types::{CreatedTokenAccount, FeePayer};

impl Action {
    /// Returns `None` when no runtime was available; `on_complete` has then
    /// already received the error.
    pub fn get_creating_token_account_fee_with_callback<F>(
        &self,
        on_complete: F,
    ) -> Option<JoinHandle<()>>
    where
        F: FnOnce(Result<u64, ActionError>) + Send + 'static,
    {
        let action = self.clone();
        self.spawn_with_callback(
            async move { action.get_creating_token_account_fee().await },
            on_complete,
        )
    }

    /// Returns `None` when no runtime was available; `on_complete` has then
    /// already received the error.
    pub fn create_token_account_with_callback<F>(
        &self,
        mint_address: impl Into<String>,
        payer: FeePayer,
        on_complete: F,
    ) -> Option<JoinHandle<()>>
    where
        F: FnOnce(Result<CreatedTokenAccount, ActionError>) + Send + 'static,
    {
        let action = self.clone();
        let mint_address = mint_address.into();
        self.spawn_with_callback(
            async move {
                action
                    .create_token_account(&mint_address, payer.as_ref())
                    .await
            },
            on_complete,
        )
    }

    fn spawn_with_callback<T, P, F>(&self, pipeline: P, on_complete: F) -> Option<JoinHandle<()>>
    where
        T: Send + 'static,
        P: Future<Output = Result<T, ActionError>> + Send + 'static,
        F: FnOnce(Result<T, ActionError>) + Send + 'static,
    {
        let Some(runtime) = self.runtime() else {
            warn!("Callback surface called without a tokio runtime");
            on_complete(Err(ActionError::Runtime(
                "no tokio runtime on this thread and none configured".to_string(),
            )));
            return None;
        };

        Some(runtime.spawn(async move {
            on_complete(pipeline.await);
        }))
    }
}
