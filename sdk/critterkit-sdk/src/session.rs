//! Single source of truth for one application session.
//!
//! All mutation funnels through [`Session::dispatch`], which applies the
//! pure [`reduce`] function under the watch channel's lock: dispatches are
//! serialized, and readers only ever observe fully-applied snapshots.

use std::sync::Arc;

use tokio::sync::watch;
use tracing::debug;

use crate::core::contract::ContractHandle;
use crate::types::Account;

/// Shared session record.
///
/// `wallet_enabled` is a one-way latch and `activity_counter` strictly
/// increases; its absolute value only means "something changed since the
/// last observed value".
#[derive(Clone, Debug, PartialEq)]
pub struct SessionState {
    pub contract: Option<ContractHandle>,
    pub wallet_enabled: bool,
    pub selected_account: Option<Account>,
    pub activity_counter: u64,
}

impl SessionState {
    pub fn new() -> Self {
        Self {
            contract: None,
            wallet_enabled: false,
            selected_account: None,
            activity_counter: 0,
        }
    }

    /// A session is ready for transactions once a contract is bound and an
    /// account is selected.
    pub fn is_ready(&self) -> bool {
        self.contract.is_some() && self.selected_account.is_some()
    }
}

impl Default for SessionState {
    fn default() -> Self {
        Self::new()
    }
}

#[derive(Clone, Debug)]
pub enum SessionAction {
    SetHandle(ContractHandle),
    WalletEnabled,
    SetAccount(Account),
    ActivityTick,
}

/// Pure reducer: total, deterministic, never mutates its input.
pub fn reduce(state: &SessionState, action: &SessionAction) -> SessionState {
    let mut next = state.clone();
    match action {
        SessionAction::SetHandle(handle) => next.contract = Some(handle.clone()),
        SessionAction::WalletEnabled => next.wallet_enabled = true,
        SessionAction::SetAccount(account) => next.selected_account = Some(account.clone()),
        SessionAction::ActivityTick => next.activity_counter += 1,
    }
    next
}

/// Handle to the session record. Cheap to clone; all clones dispatch into
/// the same state.
#[derive(Clone)]
pub struct Session {
    tx: Arc<watch::Sender<SessionState>>,
}

impl Session {
    pub fn new() -> Self {
        let (tx, _rx) = watch::channel(SessionState::new());
        Self { tx: Arc::new(tx) }
    }

    /// Apply `action` atomically. Concurrent dispatches are serialized by
    /// the channel; no reader ever sees a partially-applied action.
    pub fn dispatch(&self, action: SessionAction) {
        debug!(?action, "session action");
        self.tx.send_modify(|state| *state = reduce(state, &action));
    }

    /// Current snapshot of the session.
    pub fn snapshot(&self) -> SessionState {
        self.tx.borrow().clone()
    }

    /// Subscribe to state changes. Every observed value is a complete
    /// snapshot; intermediate states may be coalesced.
    pub fn subscribe(&self) -> watch::Receiver<SessionState> {
        self.tx.subscribe()
    }
}

impl Default for Session {
    fn default() -> Self {
        Self::new()
    }
}
