//! Live view of the tokens owned by the selected account.
//!
//! The worker re-queries whenever the trigger tuple (contract bound,
//! selected address, activity counter) changes, and never runs without a
//! bound contract and a selected account. Results are tagged with the
//! generation that issued them; only a result newer than the last applied
//! one is published, so a slow stale query can never overwrite a fresh
//! result.

use serde_json::json;
use tokio::sync::{mpsc, watch};
use tokio::task::JoinHandle;
use tracing::{debug, warn};

use crate::core::contract::ContractHandle;
use crate::error::{CritterSdkError, Result};
use crate::session::{Session, SessionState};
use crate::types::SpeciesId;

/// Published read model: the owner it was computed for, the owned token
/// identifiers, and the generation that produced it.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct TokenView {
    pub owner: Option<String>,
    pub tokens: Vec<String>,
    pub generation: u64,
}

#[derive(PartialEq)]
struct TriggerKey {
    contract_bound: bool,
    owner: Option<String>,
    activity_counter: u64,
}

impl TriggerKey {
    fn of(state: &SessionState) -> Self {
        Self {
            contract_bound: state.contract.is_some(),
            owner: state
                .selected_account
                .as_ref()
                .map(|account| account.address.clone()),
            activity_counter: state.activity_counter,
        }
    }
}

/// Numeric species id for one owned token. Presentation uses this to
/// drive the cosmetic art lookup; it is not part of the re-query loop.
pub async fn species_of(contract: &ContractHandle, token: &str) -> Result<SpeciesId> {
    contract.query("species_of", json!({ "seed": token })).await
}

/// Spawn the token query worker for `session`.
///
/// Returns the view receiver and the worker task; the task stops once
/// `shutdown_rx` flips to true.
pub fn spawn_token_query(
    session: &Session,
    shutdown_rx: watch::Receiver<bool>,
) -> (watch::Receiver<TokenView>, JoinHandle<()>) {
    let (view_tx, view_rx) = watch::channel(TokenView::default());
    let session_rx = session.subscribe();
    let task = tokio::spawn(run_worker(session_rx, view_tx, shutdown_rx));
    (view_rx, task)
}

type QueryOutcome = (u64, String, std::result::Result<Vec<String>, CritterSdkError>);

async fn run_worker(
    mut session_rx: watch::Receiver<SessionState>,
    view_tx: watch::Sender<TokenView>,
    mut shutdown_rx: watch::Receiver<bool>,
) {
    let (result_tx, mut result_rx) = mpsc::unbounded_channel::<QueryOutcome>();
    let mut generation: u64 = 0;
    let mut applied: u64 = 0;
    let mut last_key: Option<TriggerKey> = None;

    loop {
        {
            let snapshot = session_rx.borrow_and_update().clone();
            let key = TriggerKey::of(&snapshot);
            if last_key.as_ref() != Some(&key) {
                last_key = Some(key);
                // The guard, not scheduling, enforces that no query ever
                // runs against an absent handle or account.
                if let (Some(contract), Some(account)) =
                    (snapshot.contract.clone(), snapshot.selected_account.clone())
                {
                    generation += 1;
                    let issued = generation;
                    let owner = account.address.clone();
                    let outcome_tx = result_tx.clone();
                    debug!(generation = issued, owner = %owner, "token query issued");
                    tokio::spawn(async move {
                        let result = contract
                            .query::<Vec<String>>("tokens_of", json!({ "owner": owner }))
                            .await;
                        let _ = outcome_tx.send((issued, owner, result));
                    });
                }
            }
        }

        tokio::select! {
            biased;
            changed = shutdown_rx.changed() => {
                if changed.is_err() || *shutdown_rx.borrow() {
                    break;
                }
            }
            changed = session_rx.changed() => {
                if changed.is_err() {
                    break;
                }
            }
            outcome = result_rx.recv() => {
                let Some((issued, owner, result)) = outcome else { break };
                if issued <= applied {
                    debug!(generation = issued, applied, "stale token query dropped");
                    continue;
                }
                match result {
                    Ok(tokens) => {
                        applied = issued;
                        view_tx.send_replace(TokenView {
                            owner: Some(owner),
                            tokens,
                            generation: issued,
                        });
                    }
                    // Query failures are local: the previously published
                    // view stays in place.
                    Err(error) => warn!(generation = issued, %error, "token query failed"),
                }
            }
        }
    }
}
