use std::sync::{Arc, Mutex, MutexGuard};

use tracing::info;

use crate::core::signer::SigningAgent;
use crate::error::{CritterSdkError, Result};
use crate::session::{Session, SessionAction};
use crate::types::Account;

/// Tracks the most recent account listing from the signing agent and
/// drives account selection.
///
/// Selection always draws from the latest listing, so the session can
/// never hold a dangling reference to an account from a previous listing.
pub struct AccountRegistry {
    agent: Arc<dyn SigningAgent>,
    session: Session,
    listing: Mutex<Vec<Account>>,
}

impl AccountRegistry {
    pub fn new(agent: Arc<dyn SigningAgent>, session: Session) -> Self {
        Self {
            agent,
            session,
            listing: Mutex::new(Vec::new()),
        }
    }

    /// Fetch the agent's listing and select the first account as the
    /// session default.
    pub async fn load_default(&self) -> Result<Account> {
        let accounts = self.agent.list_accounts().await?;
        let first = accounts.first().cloned().ok_or_else(|| {
            CritterSdkError::AuthorizationDenied("signing agent exposes no accounts".to_string())
        })?;

        *self.lock_listing() = accounts;
        info!(address = %first.address, "default account selected");
        self.session
            .dispatch(SessionAction::SetAccount(first.clone()));
        Ok(first)
    }

    /// The most recent listing.
    pub fn accounts(&self) -> Vec<Account> {
        self.lock_listing().clone()
    }

    /// Explicit user selection by index into the most recent listing.
    /// Returns the selected account, or `None` for an out-of-range index.
    pub fn select(&self, index: usize) -> Option<Account> {
        let account = self.lock_listing().get(index).cloned()?;
        self.session
            .dispatch(SessionAction::SetAccount(account.clone()));
        Some(account)
    }

    fn lock_listing(&self) -> MutexGuard<'_, Vec<Account>> {
        self.listing
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}
