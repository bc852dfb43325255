use async_trait::async_trait;
use tokio::sync::mpsc;

use crate::core::contract::SignableCall;
use crate::error::Result;
use crate::types::{Account, TransactionStatus};

/// Abstraction over the user-controlled component holding private keys.
/// This allows the SDK to work with:
/// 1. Local keystores (backend/CLI)
/// 2. External signing agents such as a browser extension bridge
#[async_trait]
pub trait SigningAgent: Send + Sync {
    /// Request wallet access on behalf of `app_name`.
    ///
    /// Resolves once the agent grants access; fails with
    /// `AuthorizationDenied` otherwise. There is no automatic re-prompt.
    async fn authorize(&self, app_name: &str) -> Result<()>;

    /// Ordered list of identities the agent exposes.
    async fn list_accounts(&self) -> Result<Vec<Account>>;

    /// Sign `call` with `account`'s key, transmit it, and stream the
    /// confirmation lifecycle.
    ///
    /// The stream yields stages in non-decreasing confirmation order and
    /// closes after a terminal stage. Dropping the receiver stops the
    /// underlying tracking.
    async fn sign_and_submit(
        &self,
        call: SignableCall,
        account: &Account,
    ) -> Result<mpsc::Receiver<TransactionStatus>>;
}
